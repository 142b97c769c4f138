use sketch_calc::gui::SketchApp;
use sketch_calc::logging;
use sketch_calc::settings::Settings;
use sketch_calc::submit::client::HttpRecognizer;

use eframe::egui;
use std::sync::Arc;

fn main() -> anyhow::Result<()> {
    let settings = Settings::load("settings.json")?;
    logging::init(settings.debug_logging);

    let recognizer = HttpRecognizer::new(
        settings.analyze_endpoint.clone(),
        settings.request_timeout(),
    )?;

    // Canvas plus toolbar and result rows.
    let inner_size = [
        (settings.canvas_width as f32 + 24.0).max(480.0),
        settings.canvas_height as f32 + 140.0,
    ];
    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(inner_size)
            .with_min_inner_size([480.0, 360.0]),
        ..Default::default()
    };

    let app = SketchApp::new(settings, Arc::new(recognizer));
    eframe::run_native(
        "Sketch Calc",
        native_options,
        Box::new(move |_cc| Box::new(app)),
    )
    .map_err(|err| anyhow::anyhow!("gui main loop failed: {err}"))
}
