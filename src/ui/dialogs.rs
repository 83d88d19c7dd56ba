use crate::app::TraceApp;
use crate::ui::theme;
use egui::{Context, RichText, Window};

/// Render the "About" dialog.
pub fn show_about_dialog(app: &mut TraceApp, ctx: &Context) {
    let mut should_close = false;
    Window::new("About")
        .resizable(false)
        .collapsible(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .fixed_size([300.0, 180.0])
        .show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(12.0);
                ui.heading(RichText::new("Tracescope").strong());
                ui.add_space(2.0);
                ui.label(
                    RichText::new(format!("Version {}", env!("CARGO_PKG_VERSION")))
                        .color(theme::TEXT_SECONDARY),
                );
                ui.add_space(10.0);
                ui.label("A timeline viewer for agent workflow traces");
                ui.label("built with Rust and egui.");
                ui.add_space(14.0);
                if ui.add_sized([100.0, 28.0], egui::Button::new("Close")).clicked() {
                    should_close = true;
                }
            });
        });
    if should_close || ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
        app.show_about = false;
    }
}

/// Render the "Trace Format" help dialog.
pub fn show_trace_help_dialog(app: &mut TraceApp, ctx: &Context) {
    let mut should_close = false;

    Window::new(RichText::new("Trace File Format").strong().size(14.0))
        .resizable(true)
        .collapsible(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .default_size([560.0, 500.0])
        .show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.add_space(4.0);

                ui.label(RichText::new("Overview").strong());
                ui.label(
                    "A trace file is a JSON document with a name and a list of root \
                     tasks. Each task may nest child tasks to any depth.",
                );
                ui.add_space(8.0);

                // ── Task fields ──────────────────────────────────────────
                ui.label(RichText::new("Task Fields").strong());
                ui.add_space(2.0);
                egui::Grid::new("trace_fields")
                    .num_columns(2)
                    .striped(true)
                    .spacing([12.0, 4.0])
                    .show(ui, |ui| {
                        ui.label(RichText::new("Field").underline());
                        ui.label(RichText::new("Meaning").underline());
                        ui.end_row();

                        ui.label(RichText::new("id").strong());
                        ui.label("UUID, unique within the trace");
                        ui.end_row();

                        ui.label(RichText::new("name").strong());
                        ui.label("Display name of the unit of work");
                        ui.end_row();

                        ui.label(RichText::new("start / end").strong());
                        ui.label("RFC 3339 instants (e.g. 2026-08-06T12:00:00.250Z)");
                        ui.end_row();

                        ui.label(RichText::new("tags").strong());
                        ui.label("tool_call, llm_call, complex, manual (drives bar style)");
                        ui.end_row();

                        ui.label(RichText::new("children").strong());
                        ui.label("Nested subtasks, same shape");
                        ui.end_row();

                        ui.label(RichText::new("dependents").strong());
                        ui.label("Ids of causal successors (drawn as connector arrows)");
                        ui.end_row();

                        ui.label(RichText::new("issues").strong());
                        ui.label("Optional list of {id, summary, url}");
                        ui.end_row();
                    });
                ui.add_space(8.0);

                // ── Notes ────────────────────────────────────────────────
                ui.label(RichText::new("Notes").strong());
                ui.add_space(2.0);
                let notes = [
                    "• Unknown tag strings are accepted and rendered with the neutral style.",
                    "• Dependency arrows are only drawn while both endpoints are visible.",
                    "• parent_id is optional; ancestry is derived from nesting.",
                    "• A task whose start equals its end renders at the minimum bar width.",
                ];
                for note in &notes {
                    ui.label(RichText::new(*note).small());
                }
                ui.add_space(10.0);

                // ── Example ──────────────────────────────────────────────
                ui.label(RichText::new("Minimal Example").strong());
                ui.add_space(2.0);
                let example = r#"{
  "name": "agent run",
  "tasks": [
    {
      "id": "4b4b3f3e-8d55-4f0e-9a31-0f6ad27a6d1b",
      "name": "plan approach",
      "start": "2026-08-06T12:00:00.000Z",
      "end": "2026-08-06T12:00:08.400Z",
      "tags": ["llm_call"],
      "children": [],
      "dependents": []
    }
  ]
}"#;
                egui::Frame::dark_canvas(ui.style()).show(ui, |ui| {
                    ui.add(
                        egui::TextEdit::multiline(&mut example.to_string())
                            .font(egui::TextStyle::Monospace)
                            .desired_width(f32::INFINITY)
                            .interactive(false),
                    );
                });
                ui.add_space(8.0);
            });

            ui.separator();
            ui.add_space(4.0);
            ui.horizontal(|ui| {
                if ui.add_sized([80.0, 28.0], egui::Button::new("Close")).clicked() {
                    should_close = true;
                }
            });
            ui.add_space(2.0);
        });

    if should_close || ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
        app.show_trace_help = false;
    }
}
