// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Compact on/off switch used for the field group enable state.

use eframe::egui;

/// Switch widget bound to a boolean; a click flips it and marks the response changed.
pub struct ToggleSwitch<'a> {
    on: &'a mut bool,
}

impl<'a> ToggleSwitch<'a> {
    pub fn new(on: &'a mut bool) -> Self {
        Self { on }
    }
}

impl egui::Widget for ToggleSwitch<'_> {
    fn ui(self, ui: &mut egui::Ui) -> egui::Response {
        let interact = ui.style().spacing.interact_size;
        let size = egui::vec2(interact.x.max(32.0), interact.y.max(18.0));
        let (rect, mut response) = ui.allocate_exact_size(size, egui::Sense::click());
        if response.clicked() {
            *self.on = !*self.on;
            response.mark_changed();
        }

        if !ui.is_rect_visible(rect) {
            return response;
        }

        let t = ui.ctx().animate_bool(response.id, *self.on);
        let visuals = ui.style().interact_selectable(&response, *self.on);
        let off_fill = ui.visuals().widgets.inactive.bg_fill;
        let fill = lerp_color(off_fill, visuals.bg_fill, t);
        let radius = rect.height() * 0.5;

        ui.painter()
            .rect_filled(rect.expand(visuals.expansion), radius, fill);
        let knob_x = egui::lerp((rect.left() + radius)..=(rect.right() - radius), t);
        ui.painter().circle(
            egui::pos2(knob_x, rect.center().y),
            radius * 0.75,
            visuals.bg_fill,
            visuals.fg_stroke,
        );

        response
    }
}

fn lerp_color(from: egui::Color32, to: egui::Color32, t: f32) -> egui::Color32 {
    let channel = |a: u8, b: u8| egui::lerp(a as f32..=b as f32, t) as u8;
    egui::Color32::from_rgba_unmultiplied(
        channel(from.r(), to.r()),
        channel(from.g(), to.g()),
        channel(from.b(), to.b()),
        channel(from.a(), to.a()),
    )
}

/// Draw a toggle switch. Returns the response (clicked toggles the bool).
pub fn toggle_switch(ui: &mut egui::Ui, on: &mut bool) -> egui::Response {
    ui.add(ToggleSwitch::new(on))
}
