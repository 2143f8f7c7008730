use eframe::egui;

use crate::{VERSION, gui::compare_app::CompareApp, query::PerformanceQuery};

pub mod compare_app;

pub fn open_window(initial_query: Option<PerformanceQuery>) {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([1080.0, 640.0]),
        ..Default::default()
    };

    let _ = eframe::run_native(
        &format!("Stock Comparison {VERSION}"),
        options,
        Box::new(|cc| Ok(Box::new(CompareApp::new(cc, initial_query)))),
    );
}
