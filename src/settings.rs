use crate::canvas::model::{clamp_stroke_width, SketchColor};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Settings {
    /// Absolute URL of the recognition endpoint.
    #[serde(default = "default_analyze_endpoint")]
    pub analyze_endpoint: String,
    /// Seconds before an in-flight submission is abandoned as failed.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_canvas_width")]
    pub canvas_width: u32,
    #[serde(default = "default_canvas_height")]
    pub canvas_height: u32,
    #[serde(default = "default_background_color")]
    pub background_color: SketchColor,
    #[serde(default = "default_ink_color")]
    pub ink_color: SketchColor,
    /// Initial width of the stroke slider. Clamped into the supported range
    /// when the surface is built.
    #[serde(default = "default_stroke_width")]
    pub stroke_width: u32,
    /// Directory used for saving sketches. If `None`, an exe-relative folder
    /// is used.
    pub export_dir: Option<String>,
    /// Enable toast notifications in the UI.
    #[serde(default = "default_toasts")]
    pub enable_toasts: bool,
    /// Duration of toast notifications in seconds.
    #[serde(default = "default_toast_duration")]
    pub toast_duration: f32,
    /// When enabled the application initialises the logger at debug level.
    /// Defaults to `false` when the field is missing in the settings file.
    #[serde(default)]
    pub debug_logging: bool,
}

fn default_analyze_endpoint() -> String {
    "http://127.0.0.1:8000/calculate/analyze-image".to_string()
}

fn default_request_timeout_secs() -> u64 {
    20
}

fn default_canvas_width() -> u32 {
    800
}

fn default_canvas_height() -> u32 {
    600
}

fn default_background_color() -> SketchColor {
    SketchColor::rgb(0x0B, 0x21, 0x1F)
}

fn default_ink_color() -> SketchColor {
    SketchColor::rgb(255, 255, 255)
}

fn default_stroke_width() -> u32 {
    5
}

fn default_toasts() -> bool {
    true
}

fn default_toast_duration() -> f32 {
    3.0
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            analyze_endpoint: default_analyze_endpoint(),
            request_timeout_secs: default_request_timeout_secs(),
            canvas_width: default_canvas_width(),
            canvas_height: default_canvas_height(),
            background_color: default_background_color(),
            ink_color: default_ink_color(),
            stroke_width: default_stroke_width(),
            export_dir: None,
            enable_toasts: default_toasts(),
            toast_duration: default_toast_duration(),
            debug_logging: false,
        }
    }
}

impl Settings {
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path).unwrap_or_default();
        if content.is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save(&self, path: &str) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    pub fn initial_stroke_width(&self) -> u32 {
        clamp_stroke_width(self.stroke_width)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let temp_dir = tempfile::tempdir().expect("temp dir");
        let path = temp_dir.path().join("settings.json");
        let settings = Settings::load(path.to_str().expect("utf-8 path")).expect("load");
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn partial_file_fills_remaining_fields_with_defaults() {
        let temp_dir = tempfile::tempdir().expect("temp dir");
        let path = temp_dir.path().join("settings.json");
        std::fs::write(&path, r#"{"analyze_endpoint":"http://example.test/analyze-image"}"#)
            .expect("write");

        let settings = Settings::load(path.to_str().expect("utf-8 path")).expect("load");
        assert_eq!(settings.analyze_endpoint, "http://example.test/analyze-image");
        assert_eq!(settings.canvas_width, 800);
        assert_eq!(settings.request_timeout_secs, 20);
        assert!(settings.enable_toasts);
    }

    #[test]
    fn save_load_roundtrip_preserves_settings() {
        let temp_dir = tempfile::tempdir().expect("temp dir");
        let path = temp_dir.path().join("settings.json");
        let path = path.to_str().expect("utf-8 path");

        let mut settings = Settings::default();
        settings.stroke_width = 9;
        settings.export_dir = Some("/tmp/sketches".into());
        settings.save(path).expect("save");

        assert_eq!(Settings::load(path).expect("load"), settings);
    }

    #[test]
    fn out_of_range_stroke_width_is_clamped_for_the_surface() {
        let mut settings = Settings::default();
        settings.stroke_width = 99;
        assert_eq!(settings.initial_stroke_width(), 20);
        settings.stroke_width = 0;
        assert_eq!(settings.initial_stroke_width(), 1);
    }
}
