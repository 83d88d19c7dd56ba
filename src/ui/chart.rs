use std::collections::HashMap;

use crate::model::Task;
use crate::timeline::bar::{self, BarEmphasis, BarGeometry};
use crate::timeline::edge::{self, EdgePath};
use crate::timeline::hierarchy::HierarchyController;
use crate::timeline::{layout, ruler};
use crate::ui::theme;
use egui::epaint::{CubicBezierShape, QuadraticBezierShape};
use egui::{Color32, Pos2, Rect, Rounding, Sense, Shape, Stroke, Ui, Vec2};
use uuid::Uuid;

const HEADER_HEIGHT: f32 = theme::HEADER_HEIGHT;
const CHEVRON_SIZE: f32 = 14.0;

/// Result details from interactions in the timeline chart.
#[derive(Debug, Clone, Default)]
pub struct ChartInteraction {
    /// A task bar was clicked: select it.
    pub select: Option<Uuid>,
    /// The empty canvas was clicked: drop the selection.
    pub clear_selection: bool,
    /// A chevron was clicked: flip this task's expansion.
    pub toggle_expand: Option<Uuid>,
    /// An issue badge was clicked: deep-link into the task's issues.
    pub show_issues: Option<Uuid>,
}

/// Render the timeline chart area (central panel).
pub fn show_timeline(
    roots: &[Task],
    controller: &mut HierarchyController,
    selected: Option<Uuid>,
    in_path: &[Uuid],
    ui: &mut Ui,
) -> ChartInteraction {
    let mut interaction = ChartInteraction::default();
    let avail = ui.available_size();
    let viewport = ui.max_rect();

    // Pointer position relative to the viewport left edge; zoom anchoring
    // falls back to the viewport center when the pointer is elsewhere.
    let pointer_x = ui
        .input(|i| i.pointer.hover_pos())
        .map(|p| (p.x - viewport.left()).clamp(0.0, avail.x))
        .unwrap_or(avail.x / 2.0);
    let now_ms = ui.input(|i| i.time) * 1000.0;

    controller.set_container_width(avail.x, pointer_x);

    // Ctrl+scroll zooms; plain scroll keeps panning the view.
    if ui.rect_contains_pointer(viewport) {
        let (ctrl, wheel) = ui.input(|i| (i.modifiers.ctrl, i.smooth_scroll_delta.y));
        controller.handle_wheel(wheel, ctrl, now_ms);
    }
    if controller.pump(now_ms, pointer_x) {
        ui.ctx().request_repaint();
    }
    if controller.has_pending_wheel() {
        ui.ctx()
            .request_repaint_after(std::time::Duration::from_millis(8));
    }

    if controller.is_empty() {
        let (response, painter) = ui.allocate_painter(avail, Sense::hover());
        painter.rect_filled(response.rect, 0.0, theme::BG_DARK);
        painter.text(
            response.rect.center(),
            egui::Align2::CENTER_CENTER,
            "No trace loaded",
            theme::font_header(),
            theme::TEXT_DIM,
        );
        return interaction;
    }

    let rows = layout::flatten(roots, controller.expanded());
    let ranks = layout::dependency_ranks(&rows);
    let group_width = controller.effective_width();
    let global_start = controller.global_start_ms().unwrap_or(0.0);
    let global_end = controller.global_end_ms().unwrap_or(global_start);

    let chart_width = group_width.max(avail.x);
    let chart_height = HEADER_HEIGHT + rows.len() as f32 * bar::row_pitch() + 40.0;

    let mut scroll_area = egui::ScrollArea::both().auto_shrink([false, false]);
    if let Some(x) = controller.take_scroll_override() {
        scroll_area = scroll_area.horizontal_scroll_offset(x);
    }

    let output = scroll_area.show(ui, |ui| {
        let (response, painter) = ui.allocate_painter(
            Vec2::new(chart_width, chart_height.max(avail.y)),
            Sense::click(),
        );
        let origin = response.rect.min;
        let mut consumed_click = false;

        painter.rect_filled(response.rect, 0.0, theme::BG_DARK);

        draw_ruler(
            &painter,
            origin,
            controller.window_ms(),
            group_width,
            controller.zoom(),
            chart_width,
            chart_height,
        );

        // Alternating row bands
        for r in &rows {
            let y = origin.y + HEADER_HEIGHT + r.row as f32 * bar::row_pitch();
            let band = if r.row % 2 == 0 {
                theme::BG_PANEL
            } else {
                theme::BG_DARK
            };
            painter.rect_filled(
                Rect::from_min_size(
                    Pos2::new(origin.x, y),
                    Vec2::new(chart_width, bar::row_pitch()),
                ),
                0.0,
                band,
            );
            painter.line_segment(
                [
                    Pos2::new(origin.x, y + bar::row_pitch()),
                    Pos2::new(origin.x + chart_width, y + bar::row_pitch()),
                ],
                Stroke::new(0.5, theme::BORDER_SUBTLE),
            );
        }

        // Geometry pass, then bars, then edges on top.
        let mut geometries: HashMap<Uuid, BarGeometry> = HashMap::new();
        for r in &rows {
            geometries.insert(
                r.task.id,
                bar::bar_geometry(
                    r.task.start_ms(),
                    r.task.end_ms(),
                    global_start,
                    global_end,
                    group_width,
                    r.row,
                    bar::MIN_TASK_WIDTH,
                ),
            );
        }

        for r in &rows {
            let geometry = geometries[&r.task.id];
            let emphasis = if selected == Some(r.task.id) {
                BarEmphasis::Selected
            } else if in_path.contains(&r.task.id) {
                BarEmphasis::InSelectionPath
            } else {
                BarEmphasis::Plain
            };
            let bar_rect = draw_task_bar(&painter, origin, r.task, &geometry, emphasis);

            // Expand chevron on parent bars
            if !r.task.is_leaf() {
                let open = controller.expanded().get(&r.task.id).copied().unwrap_or(false);
                let cx = (bar_rect.left() - CHEVRON_SIZE * 0.75).max(origin.x + CHEVRON_SIZE * 0.5);
                let chevron_rect = Rect::from_center_size(
                    Pos2::new(cx, bar_rect.center().y),
                    Vec2::splat(CHEVRON_SIZE),
                );
                let icon = if open {
                    egui_phosphor::regular::CARET_DOWN
                } else {
                    egui_phosphor::regular::CARET_RIGHT
                };
                painter.text(
                    chevron_rect.center(),
                    egui::Align2::CENTER_CENTER,
                    icon,
                    theme::font_bar(),
                    theme::TEXT_SECONDARY,
                );
                let chevron_resp = ui.interact(
                    chevron_rect.expand(2.0),
                    ui.make_persistent_id(("task-expand", r.task.id)),
                    Sense::click(),
                );
                if chevron_resp.clicked() {
                    interaction.toggle_expand = Some(r.task.id);
                    consumed_click = true;
                }
            }

            // Issue badge just past the bar's trailing edge
            if !r.task.issues.is_empty() {
                let badge_rect = Rect::from_center_size(
                    Pos2::new(bar_rect.right() + 10.0, bar_rect.center().y),
                    Vec2::splat(CHEVRON_SIZE),
                );
                painter.text(
                    badge_rect.center(),
                    egui::Align2::CENTER_CENTER,
                    egui_phosphor::regular::WARNING,
                    theme::font_bar(),
                    theme::ISSUE_BADGE,
                );
                let badge_resp = ui.interact(
                    badge_rect.expand(2.0),
                    ui.make_persistent_id(("task-issues", r.task.id)),
                    Sense::click(),
                );
                if badge_resp.clicked() {
                    interaction.show_issues = Some(r.task.id);
                    consumed_click = true;
                }
                if badge_resp.hovered() {
                    egui::show_tooltip_at_pointer(
                        ui.ctx(),
                        ui.layer_id(),
                        egui::Id::new(("issue-tip", r.task.id)),
                        |ui| {
                            for issue in &r.task.issues {
                                ui.label(format!("{}: {}", issue.id, issue.summary));
                            }
                        },
                    );
                }
            }

            let bar_resp = ui.interact(
                bar_rect,
                ui.make_persistent_id(("task-bar", r.task.id)),
                Sense::click(),
            );
            if bar_resp.clicked() {
                interaction.select = Some(r.task.id);
                consumed_click = true;
            }
            if bar_resp.hovered() {
                ui.ctx().set_cursor_icon(egui::CursorIcon::PointingHand);
                egui::show_tooltip_at_pointer(
                    ui.ctx(),
                    ui.layer_id(),
                    egui::Id::new(("task-tip", r.task.id)),
                    |ui| {
                        ui.strong(&r.task.name);
                        ui.label(format!(
                            "{} → {}",
                            r.task.start.format("%H:%M:%S%.3f"),
                            r.task.end.format("%H:%M:%S%.3f"),
                        ));
                        ui.label(format!("Duration: {:.1}s", r.task.duration_ms() / 1000.0));
                        if !r.task.tags.is_empty() {
                            let tags: Vec<&str> =
                                r.task.tags.iter().map(|t| t.label()).collect();
                            ui.label(format!("Tags: {}", tags.join(", ")));
                        }
                    },
                );
            }
        }

        // Dependency edges, arrowheads at the target
        for e in &ranks.edges {
            let from = geometries[&e.from];
            let to = geometries[&e.to];
            let start = Pos2::new(
                origin.x + from.right(),
                origin.y + HEADER_HEIGHT + from.center_y(),
            );
            let end = Pos2::new(
                origin.x + to.left,
                origin.y + HEADER_HEIGHT + to.center_y(),
            );
            let path = edge::route(start, end, e.to_ordinal, ranks.fan_in(e.to));
            draw_edge(&painter, &path);
        }

        if response.clicked() && !consumed_click {
            interaction.clear_selection = true;
        }
    });

    controller.note_scroll(output.state.offset.x);
    interaction
}

fn draw_ruler(
    painter: &egui::Painter,
    origin: Pos2,
    window_ms: f64,
    group_width: f32,
    zoom: u32,
    chart_width: f32,
    chart_height: f32,
) {
    painter.rect_filled(
        Rect::from_min_size(origin, Vec2::new(chart_width, HEADER_HEIGHT)),
        0.0,
        theme::BG_HEADER,
    );
    painter.line_segment(
        [
            Pos2::new(origin.x, origin.y + HEADER_HEIGHT),
            Pos2::new(origin.x + chart_width, origin.y + HEADER_HEIGHT),
        ],
        Stroke::new(1.0, theme::BORDER_SUBTLE),
    );

    for tick in ruler::ticks(window_ms, group_width, zoom) {
        let x = origin.x + tick.x;
        painter.line_segment(
            [
                Pos2::new(x, origin.y + HEADER_HEIGHT),
                Pos2::new(x, origin.y + chart_height),
            ],
            Stroke::new(0.5, theme::GRID_LINE),
        );
        painter.text(
            Pos2::new(x + 3.0, origin.y + 28.0),
            egui::Align2::LEFT_CENTER,
            tick.label,
            theme::font_sub(),
            theme::TEXT_SECONDARY,
        );
    }
}

fn draw_task_bar(
    painter: &egui::Painter,
    origin: Pos2,
    task: &Task,
    geometry: &BarGeometry,
    emphasis: BarEmphasis,
) -> Rect {
    let bar_rect = Rect::from_min_size(
        Pos2::new(origin.x + geometry.left, origin.y + HEADER_HEIGHT + geometry.top),
        Vec2::new(geometry.width, geometry.height()),
    );
    let rounding = Rounding::same(bar::BAR_ROUNDING);
    let style = bar::style_for_tags(&task.tags);

    // Soft shadow
    let shadow_rect = bar_rect.translate(Vec2::new(1.0, 2.0));
    painter.rect_filled(shadow_rect, rounding, Color32::from_black_alpha(35));

    match emphasis {
        BarEmphasis::Selected => {
            painter.rect_filled(bar_rect, rounding, style.color);
            painter.rect_stroke(
                bar_rect.expand(1.5),
                Rounding::same(bar::BAR_ROUNDING + 1.5),
                Stroke::new(2.0, theme::BORDER_ACCENT),
            );
        }
        BarEmphasis::InSelectionPath => {
            painter.rect_filled(bar_rect, rounding, style.color.gamma_multiply(0.3));
            draw_stripes(painter, bar_rect);
            painter.rect_stroke(bar_rect, rounding, Stroke::new(1.0, style.color));
        }
        BarEmphasis::Plain => {
            painter.rect_filled(bar_rect, rounding, style.color.gamma_multiply(0.25));
            painter.rect_stroke(bar_rect, rounding, Stroke::new(1.0, style.color));
        }
    }

    // Icon + name on the bar, clipped to its bounds
    if geometry.width > 30.0 {
        let text = format!("{} {}", style.icon, task.name);
        let galley = painter.layout_no_wrap(text, theme::font_bar(), theme::TEXT_ON_BAR);
        let clipped = painter.with_clip_rect(bar_rect);
        let text_y = bar_rect.top() + (bar_rect.height() - galley.size().y) / 2.0;
        clipped.galley(
            Pos2::new(bar_rect.left() + 6.0, text_y),
            galley,
            Color32::TRANSPARENT,
        );
    }

    bar_rect
}

/// Diagonal hatch overlay for ancestors of the selection.
fn draw_stripes(painter: &egui::Painter, rect: Rect) {
    let clipped = painter.with_clip_rect(rect);
    let step = 7.0;
    let mut x = rect.left() - rect.height();
    while x < rect.right() {
        clipped.line_segment(
            [
                Pos2::new(x, rect.bottom()),
                Pos2::new(x + rect.height(), rect.top()),
            ],
            Stroke::new(2.0, theme::STRIPE_OVERLAY),
        );
        x += step;
    }
}

fn draw_edge(painter: &egui::Painter, path: &EdgePath) {
    let stroke = Stroke::new(1.5, theme::EDGE_LINE);
    match *path {
        EdgePath::SCurve {
            start,
            c1,
            c2,
            mid,
            c3,
            c4,
            end,
        } => {
            painter.add(CubicBezierShape::from_points_stroke(
                [start, c1, c2, mid],
                false,
                Color32::TRANSPARENT,
                stroke,
            ));
            painter.add(CubicBezierShape::from_points_stroke(
                [mid, c3, c4, end],
                false,
                Color32::TRANSPARENT,
                stroke,
            ));
        }
        EdgePath::Quadratic {
            start,
            control,
            end,
        } => {
            painter.add(QuadraticBezierShape::from_points_stroke(
                [start, control, end],
                false,
                Color32::TRANSPARENT,
                stroke,
            ));
        }
    }
    painter.add(Shape::convex_polygon(
        path.arrow_head().to_vec(),
        theme::EDGE_LINE,
        Stroke::NONE,
    ));
}
