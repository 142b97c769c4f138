use crate::canvas::model::{BrushMode, SketchColor, MAX_STROKE_WIDTH, MIN_STROKE_WIDTH};
use crate::canvas::save;
use crate::canvas::surface::SketchSurface;
use crate::settings::Settings;
use crate::submit::client::Recognizer;
use crate::submit::controller::{SubmissionController, SubmitPhase};
use eframe::egui::{
    self, Color32, PointerButton, Pos2, Rect, Sense, TextureHandle, TextureOptions,
};
use egui_toast::{Toast, ToastKind, ToastOptions, Toasts};
use std::sync::Arc;
use std::time::Duration;

/// The math-sketch widget: a raster canvas with a marker/eraser toolbar and
/// a Check button that ships the canvas to the recognition service.
pub struct SketchApp {
    settings: Settings,
    surface: SketchSurface,
    controller: SubmissionController,
    tex: Option<TextureHandle>,
    tex_revision: u64,
    toasts: Toasts,
}

impl SketchApp {
    pub fn new(settings: Settings, recognizer: Arc<dyn Recognizer>) -> Self {
        let surface = SketchSurface::new(
            settings.canvas_width,
            settings.canvas_height,
            settings.background_color,
            settings.ink_color,
            settings.initial_stroke_width(),
        );
        let toasts = Toasts::new().anchor(egui::Align2::RIGHT_TOP, [10.0, 10.0]);
        Self {
            settings,
            surface,
            controller: SubmissionController::new(recognizer),
            tex: None,
            tex_revision: 0,
            toasts,
        }
    }

    fn push_toast(&mut self, kind: ToastKind, text: String) {
        if !self.settings.enable_toasts {
            return;
        }
        self.toasts.add(Toast {
            text: text.into(),
            kind,
            options: ToastOptions::default()
                .duration_in_seconds(self.settings.toast_duration as f64),
        });
    }

    fn submit_sketch(&mut self) {
        match self.surface.export_png() {
            Ok(png) => {
                if self.controller.submit(png) {
                    tracing::info!("submitted sketch for analysis");
                }
            }
            Err(err) => {
                tracing::error!("failed to export sketch: {err:#}");
                self.push_toast(ToastKind::Error, format!("Failed to export sketch: {err}"));
            }
        }
    }

    fn save_sketch(&mut self) {
        let outcome = save::ensure_output_folder(self.settings.export_dir.as_deref())
            .and_then(|dir| save::save_surface(&self.surface, &dir, chrono::Local::now()));
        match outcome {
            Ok(path) => {
                tracing::info!("saved sketch to {}", path.display());
                self.push_toast(ToastKind::Success, format!("Saved sketch {}", path.display()));
            }
            Err(err) => {
                tracing::error!("failed to save sketch: {err:#}");
                self.push_toast(ToastKind::Error, format!("Failed to save sketch: {err}"));
            }
        }
    }

    fn copy_result(&mut self) {
        let text = self.controller.result_text().to_string();
        if text.is_empty() {
            return;
        }
        let outcome = arboard::Clipboard::new().and_then(|mut clipboard| clipboard.set_text(text));
        match outcome {
            Ok(()) => self.push_toast(ToastKind::Success, "Copied result to clipboard".into()),
            Err(err) => {
                tracing::error!("failed to copy result: {err}");
                self.push_toast(ToastKind::Error, format!("Failed to copy result: {err}"));
            }
        }
    }

    fn toolbar_ui(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.label("Color");
            let ink = self.surface.ink();
            let mut color = Color32::from_rgb(ink.r, ink.g, ink.b);
            if ui.color_edit_button_srgba(&mut color).changed() {
                self.surface
                    .set_color(SketchColor::rgb(color.r(), color.g(), color.b()));
            }
            ui.separator();
            let mut width = self.surface.stroke_width();
            if ui
                .add(
                    egui::Slider::new(&mut width, MIN_STROKE_WIDTH..=MAX_STROKE_WIDTH)
                        .text("Width"),
                )
                .changed()
            {
                self.surface.set_width(width);
            }
            ui.separator();
            let eraser = self.surface.mode() == BrushMode::Eraser;
            if ui
                .selectable_label(eraser, "Eraser")
                .on_hover_text("Toggle between marker and eraser")
                .clicked()
            {
                self.surface.toggle_mode();
            }
        });

        ui.horizontal(|ui| {
            if ui.button("Undo").clicked() {
                self.surface.undo();
            }
            if ui.button("Redo").clicked() {
                self.surface.redo();
            }
            if ui.button("Reset").clicked() {
                self.surface.reset();
            }
            if ui.button("Save").clicked() {
                self.save_sketch();
            }
            ui.separator();
            let check =
                ui.add_enabled(!self.controller.is_submitting(), egui::Button::new("Check"));
            if check.clicked() {
                self.submit_sketch();
            }
            if self.controller.is_submitting() {
                ui.spinner();
            }
        });
    }

    fn canvas_ui(&mut self, ctx: &egui::Context, ui: &mut egui::Ui) {
        let canvas_size = egui::vec2(self.surface.width() as f32, self.surface.height() as f32);
        let (response, painter) = ui.allocate_painter(canvas_size, Sense::drag());
        let origin = response.rect.min;
        let to_canvas =
            |pos: Pos2| ((pos.x - origin.x).round() as i32, (pos.y - origin.y).round() as i32);

        if response.drag_started_by(PointerButton::Primary) {
            if let Some(pos) = response.interact_pointer_pos() {
                let (x, y) = to_canvas(pos);
                self.surface.begin_stroke(x, y);
            }
        } else if response.dragged_by(PointerButton::Primary) {
            if let Some(pos) = response.interact_pointer_pos() {
                let (x, y) = to_canvas(pos);
                self.surface.extend_stroke(x, y);
            }
        }
        if response.drag_stopped_by(PointerButton::Primary) {
            self.surface.end_stroke();
        }
        // A stroke must not stick when the pointer leaves the canvas with
        // the button still held.
        if self.surface.is_drawing() {
            let pointer_pos = ctx.input(|i| i.pointer.latest_pos());
            if pointer_pos.map_or(true, |pos| !response.rect.contains(pos)) {
                self.surface.end_stroke();
            }
        }

        let size = [
            self.surface.width() as usize,
            self.surface.height() as usize,
        ];
        let surface = &self.surface;
        let tex = self.tex.get_or_insert_with(|| {
            ctx.load_texture(
                "sketch",
                egui::ColorImage::from_rgba_unmultiplied(size, surface.pixels()),
                TextureOptions::NEAREST,
            )
        });
        if self.tex_revision != surface.revision() {
            tex.set(
                egui::ColorImage::from_rgba_unmultiplied(size, surface.pixels()),
                TextureOptions::NEAREST,
            );
            self.tex_revision = surface.revision();
        }
        painter.image(
            tex.id(),
            response.rect,
            Rect::from_min_max(Pos2::new(0.0, 0.0), Pos2::new(1.0, 1.0)),
            Color32::WHITE,
        );
    }

    fn result_ui(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| match self.controller.phase() {
            SubmitPhase::Submitting => {
                ui.label("Analyzing sketch...");
            }
            SubmitPhase::Idle => {
                ui.label(
                    "Write any mathematical equation or problem on the canvas using your \
                     cursor or stylus, then press Check.",
                );
            }
            SubmitPhase::Succeeded | SubmitPhase::Failed => {
                ui.label(self.controller.result_text().to_string());
                if ui.small_button("Copy").clicked() {
                    self.copy_result();
                }
            }
        });
    }

    fn handle_shortcuts(&mut self, ctx: &egui::Context) {
        let pressed_undo = ctx.input(|i| i.key_pressed(egui::Key::Z) && i.modifiers.ctrl);
        let pressed_redo = ctx.input(|i| {
            (i.key_pressed(egui::Key::Y) && i.modifiers.ctrl)
                || (i.key_pressed(egui::Key::Z) && i.modifiers.ctrl && i.modifiers.shift)
        });
        if pressed_undo {
            self.surface.undo();
        }
        if pressed_redo {
            self.surface.redo();
        }
        if ctx.input(|i| i.key_pressed(egui::Key::OpenBracket)) {
            let width = self.surface.stroke_width().saturating_sub(1);
            self.surface.set_width(width);
        }
        if ctx.input(|i| i.key_pressed(egui::Key::CloseBracket)) {
            let width = self.surface.stroke_width() + 1;
            self.surface.set_width(width);
        }
    }
}

impl eframe::App for SketchApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.controller.poll();
        self.handle_shortcuts(ctx);

        egui::CentralPanel::default().show(ctx, |ui| {
            self.toolbar_ui(ui);
            ui.separator();
            self.canvas_ui(ctx, ui);
            ui.separator();
            self.result_ui(ui);
        });

        if self.settings.enable_toasts {
            self.toasts.show(ctx);
        }
        if self.controller.is_submitting() {
            ctx.request_repaint_after(Duration::from_millis(100));
        }
    }
}
