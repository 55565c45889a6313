// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Application entry point wiring egui/eframe to launch the field group editor.

pub mod args;
pub mod telemetry;

use anyhow::{Context, Result, anyhow};
use eframe::egui;
use egui_phosphor::Variant;

use crate::app::args::Args;
use crate::logic::record_io::read_template;
use crate::models::template::GroupTemplate;
use crate::mvu::{AppModel, Command};
use crate::ui::FieldGroupApp;

/// Build the initial model and startup commands from the arguments.
fn bootstrap(args: &Args) -> Result<(AppModel, Vec<Command>)> {
    let template = match &args.template {
        Some(path) => read_template(path)?,
        None => GroupTemplate::default(),
    };
    tracing::info!(
        group = %template.name,
        fields = template.items.len(),
        max_items = template.max_items,
        "field group template ready"
    );

    let model = AppModel::new(template, &args.repository_path)
        .context("Failed to build field group")?;
    let startup = args
        .record
        .iter()
        .cloned()
        .map(Command::LoadRecord)
        .collect();
    Ok((model, startup))
}

/// Bootstrap the desktop application and run the main egui event loop.
pub fn run(args: Args) -> Result<()> {
    let (model, startup) = bootstrap(&args)?;

    // Register Phosphor icon font.
    let mut fonts = egui::FontDefinitions::default();
    egui_phosphor::add_to_fonts(&mut fonts, Variant::Regular);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([900.0, 700.0])
            .with_min_inner_size([520.0, 360.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Field Group Editor",
        options,
        Box::new(|cc| {
            cc.egui_ctx.set_fonts(fonts);
            Ok(Box::new(FieldGroupApp::new(model, startup)))
        }),
    )
    .map_err(|e| anyhow!("UI terminated with an error: {e}"))
}
