use crate::app::TraceApp;
use crate::ui::theme;
use egui::{menu, RichText, Ui};

/// Render the top toolbar / menu bar.
pub fn show_toolbar(app: &mut TraceApp, ui: &mut Ui) {
    menu::bar(ui, |ui| {
        ui.menu_button(RichText::new("  File  ").font(theme::font_menu()), |ui| {
            if ui.button("  Open Trace...       Ctrl+O").clicked() {
                app.open_trace();
                ui.close_menu();
            }
            ui.separator();
            if ui.button("  Export CSV...").clicked() {
                app.export_csv();
                ui.close_menu();
            }
        });

        ui.menu_button(RichText::new("  View  ").font(theme::font_menu()), |ui| {
            if ui.button("  Expand All          Ctrl+E").clicked() {
                app.expand_all();
                ui.close_menu();
            }
            if ui.button("  Collapse All        Ctrl+Shift+E").clicked() {
                app.collapse_all();
                ui.close_menu();
            }
            if ui.button("  Expand One Level").clicked() {
                app.expand_one_level();
                ui.close_menu();
            }
            if ui.button("  Collapse One Level").clicked() {
                app.collapse_one_level();
                ui.close_menu();
            }
            ui.separator();
            if ui.button("  Zoom In             Ctrl+Scroll ↑").clicked() {
                app.zoom_in();
                ui.close_menu();
            }
            if ui.button("  Zoom Out           Ctrl+Scroll ↓").clicked() {
                app.zoom_out();
                ui.close_menu();
            }
            if ui.button("  Reset Zoom").clicked() {
                app.reset_zoom();
                ui.close_menu();
            }
            ui.separator();
            ui.label(RichText::new("Zoom Level").small().weak());
            let mut level = app.controller.zoom();
            if ui
                .add(egui::Slider::new(&mut level, 0..=1000).show_value(true))
                .changed()
            {
                app.set_zoom(level);
            }
        });

        ui.menu_button(RichText::new("  Help  ").font(theme::font_menu()), |ui| {
            if ui.button("About").clicked() {
                app.show_about = true;
                ui.close_menu();
            }
            if ui.button("Trace Format...").clicked() {
                app.show_trace_help = true;
                ui.close_menu();
            }
        });

        // Right-aligned trace name
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            let source = if app.file_path.is_some() { "" } else { " (sample)" };
            ui.label(
                RichText::new(format!("{}{}", app.trace.name, source))
                    .size(11.0)
                    .weak(),
            );
        });
    });
}
