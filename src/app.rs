// Copyright 2025 Chris Custine
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! The status widget window.

use log::{error, info};

use warp_client::{ActionLabel, ProcessCli, StatusController, Ticker, TickerConfig, Tone};

use crate::config::AppConfig;
use crate::event_log::{EventLevel, EventLog};

pub const WINDOW_TITLE: &str = "Cloudflare WARP";

#[derive(Debug)]
pub struct WarpApp {
    controller: StatusController<ProcessCli>,
    /// Periodic poll trigger; `None` if the ticker thread could not start
    ticker: Option<Ticker>,
    /// Button text carried across frames, error states leave it as is
    button: ActionLabel,
    event_log: EventLog,
}

impl WarpApp {
    pub fn new(cc: &eframe::CreationContext<'_>, config: &AppConfig) -> Self {
        let repaint_ctx = cc.egui_ctx.clone();
        let ticker = match Ticker::spawn(TickerConfig::default(), move || repaint_ctx.request_repaint()) {
            Ok(ticker) => Some(ticker),
            Err(e) => {
                error!("Failed to start status ticker, status will only refresh on toggle: {}", e);
                None
            }
        };

        info!("Using control tool '{}'", config.cli_path);

        let mut app = Self {
            controller: StatusController::new(ProcessCli::new(&config.cli_path)),
            ticker,
            button: ActionLabel::default(),
            event_log: EventLog::new(config.event_log_limit),
        };

        // Show real status right away instead of waiting for the first tick
        app.refresh();
        app
    }

    fn refresh(&mut self) {
        let state = self.controller.poll();
        self.event_log.record_poll(state);
    }

    fn toggle(&mut self) {
        let acts = self.controller.state().toggle_action().is_some();
        let result = self.controller.toggle();
        self.event_log.record_toggle(acts, &result, self.controller.state());
    }

    fn render_events(&self, ui: &mut egui::Ui) {
        egui::CollapsingHeader::new(format!("Events ({})", self.event_log.len()))
            .default_open(false)
            .show(ui, |ui| {
                if self.event_log.is_empty() {
                    ui.label(egui::RichText::new("No events yet").size(10.0).color(MUTED));
                    return;
                }

                egui::ScrollArea::vertical()
                    .max_height(120.0)
                    .show(ui, |ui| {
                        for event in self.event_log.iter_recent() {
                            let color = match event.level {
                                EventLevel::Info => egui::Color32::from_rgb(150, 200, 220),
                                EventLevel::Warning => egui::Color32::from_rgb(255, 200, 100),
                                EventLevel::Error => egui::Color32::from_rgb(255, 100, 100),
                            };
                            ui.horizontal(|ui| {
                                ui.label(egui::RichText::new(event.timestamp.format("%H:%M:%S").to_string())
                                    .size(10.0)
                                    .color(MUTED));
                                ui.label(egui::RichText::new(&event.message).size(10.0).color(color));
                            });
                        }
                    });
            });
    }
}

const MUTED: egui::Color32 = egui::Color32::from_rgb(158, 158, 158);

fn tone_color(tone: Tone) -> egui::Color32 {
    match tone {
        Tone::Neutral => MUTED,
        Tone::Good => egui::Color32::from_rgb(76, 175, 80),
        Tone::Bad => egui::Color32::from_rgb(229, 57, 53),
        Tone::Warning => egui::Color32::from_rgb(255, 152, 0),
    }
}

impl eframe::App for WarpApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.ticker.as_mut().is_some_and(Ticker::ticked) {
            self.refresh();
        }

        let view = self.controller.view();
        self.button = view.action_label_or(self.button);

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(16.0);
                ui.label(egui::RichText::new(view.headline())
                    .size(16.0)
                    .strong()
                    .color(tone_color(view.tone)));

                ui.add_space(12.0);

                let button = egui::Button::new(self.button.as_str()).min_size(egui::vec2(120.0, 28.0));
                if ui.add_enabled(view.action_enabled, button).clicked() {
                    self.toggle();
                }

                if let Some(checked) = self.event_log.last_checked {
                    ui.add_space(8.0);
                    ui.label(egui::RichText::new(format!("Last checked {}", checked.format("%H:%M:%S")))
                        .size(10.0)
                        .color(MUTED));
                }
            });

            ui.separator();
            self.render_events(ui);
        });
    }
}
