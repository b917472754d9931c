//! Equations sidebar and control panel UI
//!
//! Displays the governing equations of the active scene alongside its
//! live statistics and parameter controls using egui.

use egui::{Color32, Context, RichText};

/// An equation with its name and formula
pub struct Equation {
    pub name: &'static str,
    pub formula: &'static str,
    pub description: &'static str,
}

/// Draw the equations sidebar
pub fn draw_equations_sidebar(
    ctx: &Context,
    title: &str,
    equations: &[Equation],
    variables: &[(&str, &str)],
) {
    egui::SidePanel::right("equations_panel")
        .resizable(true)
        .default_width(280.0)
        .show(ctx, |ui| {
            ui.heading(RichText::new(title).color(Color32::LIGHT_BLUE));
            ui.separator();

            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.collapsing(RichText::new("📐 Equations").strong(), |ui| {
                    for eq in equations {
                        ui.group(|ui| {
                            ui.label(RichText::new(eq.name).strong().color(Color32::YELLOW));
                            ui.label(RichText::new(eq.formula).monospace().color(Color32::WHITE));
                            ui.label(RichText::new(eq.description).small().italics());
                        });
                        ui.add_space(4.0);
                    }
                });

                ui.add_space(8.0);

                ui.collapsing(RichText::new("📖 Variables").strong(), |ui| {
                    egui::Grid::new("variables_grid")
                        .num_columns(2)
                        .spacing([10.0, 4.0])
                        .show(ui, |ui| {
                            for (symbol, meaning) in variables {
                                ui.label(RichText::new(*symbol).monospace().color(Color32::LIGHT_GREEN));
                                ui.label(*meaning);
                                ui.end_row();
                            }
                        });
                });
            });
        });
}

/// Left-hand panel with scene parameters and live readouts
pub fn draw_controls_panel(
    ctx: &Context,
    stats: &[(&str, String)],
    add_controls: impl FnOnce(&mut egui::Ui),
) {
    egui::SidePanel::left("controls_panel")
        .resizable(true)
        .default_width(220.0)
        .show(ctx, |ui| {
            ui.heading(RichText::new("Controls").color(Color32::LIGHT_BLUE));
            ui.separator();
            add_controls(ui);

            if !stats.is_empty() {
                ui.add_space(8.0);
                ui.separator();
                egui::Grid::new("stats_grid")
                    .num_columns(2)
                    .spacing([10.0, 4.0])
                    .show(ui, |ui| {
                        for (name, value) in stats {
                            ui.label(RichText::new(*name).color(Color32::LIGHT_GRAY));
                            ui.label(RichText::new(value).monospace().color(Color32::WHITE));
                            ui.end_row();
                        }
                    });
            }
        });
}
