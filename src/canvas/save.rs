use crate::canvas::surface::SketchSurface;
use anyhow::{anyhow, Context, Result};
use chrono::Local;
use std::fs;
use std::path::{Path, PathBuf};

pub const SKETCH_EXPORT_SUBDIR: &str = "sketch_exports";

pub fn exe_relative_output_folder_from_path(exe_path: &Path) -> Result<PathBuf> {
    let parent = exe_path
        .parent()
        .ok_or_else(|| anyhow!("executable path has no parent: {}", exe_path.display()))?;
    Ok(parent.join(SKETCH_EXPORT_SUBDIR))
}

/// Resolve and create the folder sketches are saved into. An explicit
/// directory from settings wins over the exe-relative default.
pub fn ensure_output_folder(override_dir: Option<&str>) -> Result<PathBuf> {
    let output = match override_dir {
        Some(dir) if !dir.trim().is_empty() => PathBuf::from(dir),
        _ => {
            let exe_path = std::env::current_exe().context("resolve current executable")?;
            exe_relative_output_folder_from_path(&exe_path)?
        }
    };
    fs::create_dir_all(&output)
        .with_context(|| format!("create sketch output folder {}", output.display()))?;
    Ok(output)
}

pub fn timestamped_stem(now: chrono::DateTime<Local>) -> String {
    now.format("%Y%m%d_%H%M%S").to_string()
}

pub fn build_filename(stem: &str) -> String {
    format!("sketch_{stem}.png")
}

/// Write the current canvas contents as a PNG into `output_dir`.
pub fn save_surface(
    surface: &SketchSurface,
    output_dir: &Path,
    now: chrono::DateTime<Local>,
) -> Result<PathBuf> {
    let path = output_dir.join(build_filename(&timestamped_stem(now)));
    let image = surface.to_image()?;
    image
        .save(&path)
        .with_context(|| format!("write sketch png {}", path.display()))?;
    Ok(path)
}
