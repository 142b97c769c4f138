pub mod canvas;
pub mod gui;
pub mod logging;
pub mod settings;
pub mod submit;
