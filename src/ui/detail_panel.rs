use crate::model::{Task, Trace};
use crate::timeline::bar;
use crate::ui::theme;
use egui::{RichText, Ui};
use uuid::Uuid;

/// Actions the detail panel can request.
pub enum DetailAction {
    None,
    /// Jump the selection to one of this task's successors.
    SelectTask(Uuid),
    /// Deep-link into the task's issues.
    ShowIssues(Uuid),
}

/// Read-only inspector for the selected task.
pub fn show_detail_panel(task: &Task, trace: &Trace, ui: &mut Ui) -> DetailAction {
    let mut action = DetailAction::None;

    ui.add_space(6.0);
    ui.horizontal(|ui| {
        ui.label(
            RichText::new("Task Details")
                .strong()
                .size(13.0)
                .color(theme::TEXT_PRIMARY),
        );
    });
    ui.add_space(4.0);

    let frame = egui::Frame {
        fill: theme::BG_DARK,
        rounding: egui::Rounding::same(4.0),
        inner_margin: egui::Margin::same(8.0),
        outer_margin: egui::Margin::ZERO,
        stroke: egui::Stroke::new(1.0, theme::BORDER_SUBTLE),
        shadow: egui::epaint::Shadow::NONE,
    };

    frame.show(ui, |ui| {
        ui.spacing_mut().item_spacing.y = 6.0;

        let style = bar::style_for_tags(&task.tags);
        ui.horizontal(|ui| {
            ui.label(RichText::new(style.icon).size(13.0).color(style.color));
            ui.label(
                RichText::new(&task.name)
                    .strong()
                    .size(12.5)
                    .color(theme::TEXT_PRIMARY),
            );
        });

        egui::Grid::new("task_detail_grid")
            .num_columns(2)
            .spacing([12.0, 4.0])
            .show(ui, |ui| {
                let dim = |s: &str| RichText::new(s.to_owned()).size(10.0).color(theme::TEXT_DIM);
                let val = |s: String| RichText::new(s).size(11.0).color(theme::TEXT_SECONDARY);

                ui.label(dim("Start"));
                ui.label(val(task.start.format("%H:%M:%S%.3f").to_string()));
                ui.end_row();

                ui.label(dim("End"));
                ui.label(val(task.end.format("%H:%M:%S%.3f").to_string()));
                ui.end_row();

                ui.label(dim("Duration"));
                ui.label(val(format!("{:.1}s", task.duration_ms() / 1000.0)));
                ui.end_row();

                if !task.tags.is_empty() {
                    let tags: Vec<&str> = task.tags.iter().map(|t| t.label()).collect();
                    ui.label(dim("Tags"));
                    ui.label(val(tags.join(", ")));
                    ui.end_row();
                }

                if !task.children.is_empty() {
                    ui.label(dim("Subtasks"));
                    ui.label(val(format!("{}", task.descendant_count())));
                    ui.end_row();
                }
            });

        // ── Successors ───────────────────────────────────────────────
        if !task.dependents.is_empty() {
            ui.add_space(2.0);
            ui.label(
                RichText::new("Unblocks")
                    .size(10.0)
                    .color(theme::TEXT_DIM)
                    .strong(),
            );
            for dep_id in &task.dependents {
                let name = trace
                    .find(*dep_id)
                    .map(|t| t.name.clone())
                    .unwrap_or_else(|| "(missing)".to_string());
                let row = ui.add(
                    egui::Button::new(
                        RichText::new(format!(
                            "{} {}",
                            egui_phosphor::regular::ARROW_RIGHT,
                            name
                        ))
                        .size(11.0)
                        .color(theme::TEXT_SECONDARY),
                    )
                    .frame(false),
                );
                if row.clicked() {
                    action = DetailAction::SelectTask(*dep_id);
                }
            }
        }

        // ── Issues ───────────────────────────────────────────────────
        if !task.issues.is_empty() {
            ui.add_space(2.0);
            ui.label(
                RichText::new("Issues")
                    .size(10.0)
                    .color(theme::TEXT_DIM)
                    .strong(),
            );
            for issue in &task.issues {
                ui.horizontal(|ui| {
                    ui.label(
                        RichText::new(egui_phosphor::regular::WARNING)
                            .size(11.0)
                            .color(theme::ISSUE_BADGE),
                    );
                    ui.label(
                        RichText::new(format!("{}: {}", issue.id, issue.summary))
                            .size(11.0)
                            .color(theme::TEXT_SECONDARY),
                    );
                });
            }
            ui.add_space(2.0);
            if ui
                .button(RichText::new("Show issues").size(11.0))
                .clicked()
            {
                action = DetailAction::ShowIssues(task.id);
            }
        }
    });

    action
}
