use crate::canvas::history::SnapshotHistory;
use crate::canvas::model::{clamp_stroke_width, BrushMode, SketchColor, HISTORY_CAPACITY};
use crate::canvas::render;
use anyhow::{anyhow, Context, Result};
use std::io::Cursor;

/// Stroke attributes captured when the stroke begins. Mode/color/width
/// changes made mid-stroke apply to future strokes only.
#[derive(Debug, Clone, PartialEq)]
struct ActiveStroke {
    last: (i32, i32),
    color: SketchColor,
    width: u32,
    /// Pre-stroke buffer, committed to history on the first pixel change so
    /// a click without movement never pollutes the undo stack.
    pending_snapshot: Option<Vec<u8>>,
}

/// Fixed-size RGBA sketching buffer with pointer-driven stroke state.
///
/// All mutation is synchronous; the surface never resizes. The `revision`
/// counter advances on every visible change so the GUI knows when to
/// re-upload its texture.
#[derive(Debug, Clone, PartialEq)]
pub struct SketchSurface {
    width: u32,
    height: u32,
    background: SketchColor,
    ink: SketchColor,
    stroke_width: u32,
    mode: BrushMode,
    pixels: Vec<u8>,
    active: Option<ActiveStroke>,
    history: SnapshotHistory,
    revision: u64,
}

impl SketchSurface {
    pub fn new(
        width: u32,
        height: u32,
        background: SketchColor,
        ink: SketchColor,
        stroke_width: u32,
    ) -> Self {
        let mut pixels = vec![0u8; (width as usize) * (height as usize) * 4];
        render::fill(&mut pixels, background);
        Self {
            width,
            height,
            background,
            ink,
            stroke_width: clamp_stroke_width(stroke_width),
            mode: BrushMode::Marker,
            pixels,
            active: None,
            history: SnapshotHistory::with_capacity(HISTORY_CAPACITY),
            revision: 0,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn background(&self) -> SketchColor {
        self.background
    }

    pub fn ink(&self) -> SketchColor {
        self.ink
    }

    pub fn stroke_width(&self) -> u32 {
        self.stroke_width
    }

    pub fn mode(&self) -> BrushMode {
        self.mode
    }

    pub fn is_drawing(&self) -> bool {
        self.active.is_some()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn pixel(&self, x: u32, y: u32) -> SketchColor {
        let idx = ((y * self.width + x) * 4) as usize;
        SketchColor::from_rgba_array([
            self.pixels[idx],
            self.pixels[idx + 1],
            self.pixels[idx + 2],
            self.pixels[idx + 3],
        ])
    }

    pub fn set_color(&mut self, color: SketchColor) {
        self.ink = color;
    }

    pub fn set_width(&mut self, width: u32) {
        self.stroke_width = clamp_stroke_width(width);
    }

    pub fn toggle_mode(&mut self) {
        self.mode = self.mode.toggled();
    }

    /// Start a stroke at the given point. No pixels change until the stroke
    /// is extended. Calling this while a stroke is already in progress
    /// restarts the path origin instead of opening a second stroke.
    pub fn begin_stroke(&mut self, x: i32, y: i32) {
        let point = self.clamp_point(x, y);
        if let Some(active) = self.active.as_mut() {
            active.last = point;
            return;
        }
        self.active = Some(ActiveStroke {
            last: point,
            color: match self.mode {
                BrushMode::Eraser => self.background,
                BrushMode::Marker => self.ink,
            },
            width: self.stroke_width,
            pending_snapshot: Some(self.pixels.clone()),
        });
    }

    /// Rasterize a segment from the last recorded point. Stray move events
    /// with no stroke in progress are absorbed.
    pub fn extend_stroke(&mut self, x: i32, y: i32) {
        let Some(mut active) = self.active.take() else {
            return;
        };
        let point = self.clamp_point(x, y);
        if let Some(snapshot) = active.pending_snapshot.take() {
            self.history.record(snapshot);
        }
        render::draw_segment(
            &mut self.pixels,
            self.width,
            self.height,
            active.last,
            point,
            active.color,
            active.width,
        );
        active.last = point;
        self.revision += 1;
        self.active = Some(active);
    }

    /// Finish the stroke in progress. Idempotent; also fired when the
    /// pointer leaves the canvas area mid-stroke.
    pub fn end_stroke(&mut self) {
        self.active = None;
    }

    /// Refill the buffer with the background color, discarding all strokes
    /// and the undo history.
    pub fn reset(&mut self) {
        render::fill(&mut self.pixels, self.background);
        self.active = None;
        self.history.clear();
        self.revision += 1;
    }

    pub fn undo(&mut self) -> bool {
        let Some(snapshot) = self.history.undo(self.pixels.clone()) else {
            return false;
        };
        self.pixels = snapshot;
        self.active = None;
        self.revision += 1;
        true
    }

    pub fn redo(&mut self) -> bool {
        let Some(snapshot) = self.history.redo(self.pixels.clone()) else {
            return false;
        };
        self.pixels = snapshot;
        self.active = None;
        self.revision += 1;
        true
    }

    pub fn to_image(&self) -> Result<image::RgbaImage> {
        image::RgbaImage::from_raw(self.width, self.height, self.pixels.clone())
            .ok_or_else(|| anyhow!("sketch buffer does not match its dimensions"))
    }

    /// PNG-encode the current buffer. Pure read; a pixel-exact snapshot of
    /// the canvas at call time.
    pub fn export_png(&self) -> Result<Vec<u8>> {
        let image = self.to_image()?;
        let mut bytes = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut bytes), image::ImageOutputFormat::Png)
            .context("encode sketch as png")?;
        Ok(bytes)
    }

    fn clamp_point(&self, x: i32, y: i32) -> (i32, i32) {
        (
            x.clamp(0, self.width as i32 - 1),
            y.clamp(0, self.height as i32 - 1),
        )
    }
}
