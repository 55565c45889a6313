// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Top-level egui application shell for editing a field group record.
//! Handles layout, the save dialog, and wiring to background commands.

pub mod components;

use eframe::egui;

use crate::logic::record_io::ensure_extension;
use crate::mvu::{self, AppModel, Command, Msg};
use crate::ui::components::field_group;

/// Stateful egui application for editing field group records.
pub struct FieldGroupApp {
    model: AppModel,
    inbox: Vec<Msg>,
    cmd_tx: crossbeam_channel::Sender<Command>,
    msg_rx: crossbeam_channel::Receiver<Msg>,
}

impl FieldGroupApp {
    /// Spawn the command workers and queue any startup commands.
    pub fn new(model: AppModel, startup: Vec<Command>) -> Self {
        let (cmd_tx, cmd_rx) = crossbeam_channel::unbounded::<Command>();
        let (msg_tx, msg_rx) = crossbeam_channel::unbounded::<Msg>();

        let threads = std::thread::available_parallelism()
            .map(|n| n.get().clamp(2, 4))
            .unwrap_or(2);
        for _ in 0..threads {
            let cmd_rx = cmd_rx.clone();
            let msg_tx = msg_tx.clone();
            std::thread::spawn(move || {
                for cmd in cmd_rx.iter() {
                    let msg = mvu::run_command(cmd);
                    let _ = msg_tx.send(msg);
                }
            });
        }

        let mut app = Self {
            model,
            inbox: Vec::new(),
            cmd_tx,
            msg_rx,
        };
        for cmd in startup {
            app.send(cmd);
        }
        app
    }

    fn send(&mut self, cmd: Command) {
        if self.cmd_tx.send(cmd).is_ok() {
            self.model.pending_commands += 1;
        }
    }
}

impl eframe::App for FieldGroupApp {
    /// Required by eframe 0.34; all rendering happens in `update`, which
    /// eframe still invokes before `ui` each frame.
    fn ui(&mut self, _ui: &mut egui::Ui, _frame: &mut eframe::Frame) {}

    /// Drives a single UI frame: drains worker results, applies queued
    /// messages to the model, dispatches resulting commands, then renders the
    /// top bar, error modal, status bar and the field group editor.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        ctx.style_mut(|style| {
            style.spacing.item_spacing = egui::vec2(6.0, 6.0);
        });

        // Pull messages produced by the command workers.
        while let Ok(msg) = self.msg_rx.try_recv() {
            self.model.pending_commands = self.model.pending_commands.saturating_sub(1);
            self.inbox.push(msg);
        }

        // Messages apply in the order they were produced.
        let msgs = std::mem::take(&mut self.inbox);
        for msg in msgs {
            let mut commands = Vec::new();
            mvu::update(&mut self.model, msg, &mut commands);
            for cmd in commands {
                self.send(cmd);
            }
        }

        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            ui.add_space(6.0);
            ui.horizontal(|ui| {
                ui.heading("Field Group Editor");
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.add_space(2.0);
                    egui::widgets::global_theme_preference_switch(ui);
                    ui.separator();
                    self.render_save_button(ui);
                });
            });
            ui.add_space(4.0);
        });

        self.render_error_modal(ctx);

        egui::TopBottomPanel::bottom("status_panel")
            .resizable(false)
            .show(ctx, |ui| {
                self.render_status(ui);
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.add_space(8.0);
            egui::ScrollArea::vertical().show(ui, |ui| {
                self.render_source(ui);
                ui.add_space(8.0);
                let msgs = field_group::view(ui, &self.model.field_group);
                self.inbox.extend(msgs.into_iter().map(Msg::FieldGroup));
            });
        });
    }
}

impl FieldGroupApp {
    /// Render the save button and handle the save-file dialog interaction.
    ///
    /// Disabled while any enabled sub-field fails validation.
    fn render_save_button(&mut self, ui: &mut egui::Ui) {
        let save_enabled = !self.model.field_group.has_invalid_fields();
        let label = if self.model.field_group.is_dirty() {
            format!("{} Save record *", egui_phosphor::regular::FLOPPY_DISK)
        } else {
            format!("{} Save record", egui_phosphor::regular::FLOPPY_DISK)
        };

        if ui
            .add_enabled(save_enabled, egui::Button::new(label))
            .on_disabled_hover_text("Please fix invalid fields")
            .clicked()
        {
            let default_name = self
                .model
                .field_group
                .source()
                .and_then(|p| p.file_name())
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| "record.json".to_string());
            let dialog = rfd::FileDialog::new()
                .set_title("Save record")
                .add_filter("JSON", &["json"])
                .set_file_name(&default_name);

            if let Some(path) = dialog.save_file() {
                self.inbox
                    .push(Msg::SaveRequested(ensure_extension(path, "json")));
            } else {
                self.inbox.push(Msg::SaveCancelled);
            }
        }
    }

    fn render_source(&self, ui: &mut egui::Ui) {
        let text = match self.model.field_group.source() {
            Some(path) => format!("Record: {}", path.display()),
            None => "No record opened; rows start empty.".to_string(),
        };
        ui.label(
            egui::RichText::new(text)
                .small()
                .color(egui::Color32::from_gray(110)),
        );
    }

    /// Render a simple modal window for error messages.
    fn render_error_modal(&mut self, ctx: &egui::Context) {
        if let Some(message) = self.model.error.clone() {
            egui::Window::new("Error")
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
                .show(ctx, |ui| {
                    ui.label(message);
                    ui.add_space(8.0);
                    if ui.button("OK").clicked() {
                        self.inbox.push(Msg::DismissError);
                    }
                });
        }
    }

    /// Render latest status/error message when present.
    fn render_status(&self, ui: &mut egui::Ui) {
        if let Some(text) = &self.model.status {
            let display = if self.model.pending_commands > 0 {
                format!("{}  ({} working…)", text, self.model.pending_commands)
            } else {
                text.to_string()
            };
            ui.horizontal(|ui| {
                ui.label(egui::RichText::new(display).color(egui::Color32::from_gray(68)));
                if self.model.pending_commands > 0 {
                    ui.add(egui::Spinner::new().size(14.0));
                }
            });
        }
    }
}
