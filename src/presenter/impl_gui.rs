use crate::analysis::core::Event;
use crate::presenter::interface::{Presenter, Screen};
use eframe::egui;
use parking_lot::Mutex;
use std::error::Error;
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::time::Duration;

struct AnalysisWindow {
    screen: Arc<Mutex<Screen>>,
    events: Sender<Event>,
    upload_path: String,
    upload_error: Option<String>,
}

impl AnalysisWindow {
    fn upload(&mut self) {
        match std::fs::read(self.upload_path.trim()) {
            Ok(bytes) => {
                self.upload_error = None;
                let _ = self.events.send(Event::UploadSelected {
                    bytes: Arc::new(bytes),
                });
            }
            Err(e) => self.upload_error = Some(e.to_string()),
        }
    }
}

impl eframe::App for AnalysisWindow {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let screen = self.screen.lock().clone();

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(20.0);

                ui.horizontal(|ui| {
                    if ui
                        .add_enabled(screen.can_start, egui::Button::new("Use Camera"))
                        .clicked()
                    {
                        let _ = self.events.send(Event::CameraSelected);
                    }

                    ui.text_edit_singleline(&mut self.upload_path);

                    if ui
                        .add_enabled(screen.can_start, egui::Button::new("Upload File"))
                        .clicked()
                    {
                        self.upload();
                    }
                });

                if let Some(error) = &self.upload_error {
                    ui.label(egui::RichText::new(error).color(egui::Color32::RED));
                }

                ui.add_space(10.0);

                for line in &screen.lines {
                    ui.label(egui::RichText::new(line).monospace().size(18.0));
                }
            });
        });

        // the analysis loop updates the screen from another thread
        ctx.request_repaint_after(Duration::from_millis(100));
    }
}

#[derive(Clone, Default)]
pub struct PresenterGui {
    screen: Arc<Mutex<Screen>>,
}

impl PresenterGui {
    pub fn new() -> Self {
        Self::default()
    }

    /// Blocks the calling thread, which must be the main thread, until the
    /// window is closed.
    pub fn run_window(&self, events: Sender<Event>) -> Result<(), Box<dyn Error + Send + Sync>> {
        let options = eframe::NativeOptions {
            viewport: egui::ViewportBuilder::default()
                .with_inner_size([480.0, 360.0])
                .with_resizable(false),
            ..Default::default()
        };

        let window = AnalysisWindow {
            screen: self.screen.clone(),
            events,
            upload_path: String::new(),
            upload_error: None,
        };

        eframe::run_native("Live Classifier", options, Box::new(|_cc| Box::new(window)))
            .map_err(|e| e.to_string().into())
    }
}

impl Presenter for PresenterGui {
    fn present(&mut self, screen: &Screen) -> Result<(), Box<dyn Error + Send + Sync>> {
        *self.screen.lock() = screen.clone();
        Ok(())
    }
}
