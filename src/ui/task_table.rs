use crate::model::Task;
use crate::timeline::hierarchy::HierarchyController;
use crate::timeline::{bar, layout};
use crate::ui::theme;
use egui::{Color32, RichText, Ui};
use uuid::Uuid;

/// Actions that the task table can request.
pub enum TaskTableAction {
    None,
    Select(Uuid),
    ToggleExpand(Uuid),
}

/// Render the left-side name column. Row order comes from the same flatten
/// pass as the chart, so the two stay in sync.
pub fn show_task_table(
    roots: &[Task],
    controller: &HierarchyController,
    selected_task: Option<Uuid>,
    ui: &mut Ui,
) -> TaskTableAction {
    let mut action = TaskTableAction::None;
    let rows = layout::flatten(roots, controller.expanded());

    // Header area
    ui.add_space(2.0);
    ui.horizontal(|ui| {
        ui.label(
            RichText::new("Tasks")
                .strong()
                .size(15.0)
                .color(theme::TEXT_PRIMARY),
        );
        ui.add_space(4.0);
        ui.label(
            RichText::new(format!("({})", rows.len()))
                .size(11.0)
                .color(theme::TEXT_DIM),
        );
    });
    ui.add_space(4.0);
    ui.separator();
    ui.add_space(2.0);

    egui::ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui| {
            for r in &rows {
                let task = r.task;
                let is_selected = selected_task == Some(task.id);

                let row_bg = if is_selected {
                    theme::BG_SELECTED
                } else if r.row % 2 == 0 {
                    theme::BG_PANEL
                } else {
                    theme::BG_DARK
                };

                let frame = egui::Frame {
                    fill: row_bg,
                    rounding: egui::Rounding::same(4.0),
                    inner_margin: egui::Margin::symmetric(6.0, 4.0),
                    outer_margin: egui::Margin::ZERO,
                    stroke: egui::Stroke::NONE,
                    shadow: egui::epaint::Shadow::NONE,
                };

                let frame_resp = frame.show(ui, |ui| {
                    ui.horizontal(|ui| {
                        ui.spacing_mut().item_spacing.x = 6.0;
                        ui.add_space(r.level as f32 * 12.0);

                        // Expand chevron (parents only)
                        if !task.is_leaf() {
                            let open = controller
                                .expanded()
                                .get(&task.id)
                                .copied()
                                .unwrap_or(false);
                            let icon = if open {
                                egui_phosphor::regular::CARET_DOWN
                            } else {
                                egui_phosphor::regular::CARET_RIGHT
                            };
                            let chevron = ui.add(
                                egui::Button::new(
                                    RichText::new(icon).size(11.0).color(theme::TEXT_SECONDARY),
                                )
                                .frame(false),
                            );
                            if chevron.clicked() {
                                action = TaskTableAction::ToggleExpand(task.id);
                            }
                        } else {
                            ui.add_space(14.0);
                        }

                        // Tag color dot
                        let style = bar::style_for_tags(&task.tags);
                        let (dot_rect, _) =
                            ui.allocate_exact_size(egui::vec2(6.0, 6.0), egui::Sense::hover());
                        ui.painter().circle_filled(dot_rect.center(), 3.0, style.color);

                        // Task name
                        let name_text =
                            RichText::new(&task.name).size(12.0).color(if is_selected {
                                Color32::WHITE
                            } else {
                                theme::TEXT_PRIMARY
                            });
                        ui.add(egui::Label::new(name_text).truncate());

                        ui.with_layout(
                            egui::Layout::right_to_left(egui::Align::Center),
                            |ui| {
                                ui.spacing_mut().item_spacing.x = 4.0;
                                if !task.issues.is_empty() {
                                    ui.label(
                                        RichText::new(egui_phosphor::regular::WARNING)
                                            .size(10.0)
                                            .color(theme::ISSUE_BADGE),
                                    );
                                }
                                ui.label(
                                    RichText::new(format!(
                                        "{:.1}s",
                                        task.duration_ms() / 1000.0
                                    ))
                                    .size(10.0)
                                    .color(theme::TEXT_SECONDARY),
                                );
                            },
                        );
                    });
                });

                // Make entire row clickable
                let row_rect = frame_resp.response.rect;
                let row_click = ui.interact(
                    row_rect,
                    egui::Id::new(("task-row", task.id)),
                    egui::Sense::click(),
                );
                if row_click.clicked() {
                    action = TaskTableAction::Select(task.id);
                }

                ui.add_space(1.0);
            }
        });

    action
}
