use std::path::PathBuf;

use chrono::{Duration, Utc};
use uuid::Uuid;

use crate::model::{IssueRef, Task, TaskTag, Trace};
use crate::timeline::hierarchy::{self, HierarchyController};
use crate::ui;

/// Main application state.
pub struct TraceApp {
    pub trace: Trace,
    pub controller: HierarchyController,
    pub selected_task: Option<Uuid>,
    /// Ancestor chain of the selection, root first; drives the striped
    /// in-path bar treatment.
    pub selected_ancestors: Vec<Uuid>,
    pub file_path: Option<PathBuf>,

    // Dialog state
    pub show_about: bool,
    pub show_trace_help: bool,

    // Status message
    pub status_message: String,
}

impl TraceApp {
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        // Register Phosphor icon font as a fallback so icons render inline with text
        let mut fonts = egui::FontDefinitions::default();
        egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);
        _cc.egui_ctx.set_fonts(fonts);

        let trace = Self::sample_trace();
        let mut controller = HierarchyController::new();
        controller.load(&trace.tasks);

        Self {
            trace,
            controller,
            selected_task: None,
            selected_ancestors: Vec::new(),
            file_path: None,
            show_about: false,
            show_trace_help: false,
            status_message: "Ready".to_string(),
        }
    }

    /// Generate a sample trace for demonstration.
    fn sample_trace() -> Trace {
        let base = Utc::now() - Duration::seconds(120);
        let at = |offset_ms: i64| base + Duration::milliseconds(offset_ms);

        let mut trace = Trace::new("agent session #42");

        let mut root = Task::new("resolve ticket #1874", at(0), at(96_000));

        let mut plan = Task::new("plan approach", at(200), at(8_400));
        plan.tags = vec![TaskTag::LlmCall];
        plan.parent_id = Some(root.id);

        let mut explore = Task::new("explore repository", at(8_400), at(30_000));
        explore.tags = vec![TaskTag::ToolCall, TaskTag::Complex];
        explore.parent_id = Some(root.id);

        let mut grep = Task::new("grep workspace symbols", at(8_600), at(12_000));
        grep.tags = vec![TaskTag::ToolCall];
        grep.parent_id = Some(explore.id);
        let mut read_files = Task::new("read candidate files", at(12_200), at(29_500));
        read_files.tags = vec![TaskTag::ToolCall];
        read_files.parent_id = Some(explore.id);

        let mut draft = Task::new("draft patch", at(30_000), at(70_000));
        draft.tags = vec![TaskTag::LlmCall, TaskTag::Complex];
        draft.parent_id = Some(root.id);

        let mut generate = Task::new("generate diff", at(30_200), at(55_000));
        generate.tags = vec![TaskTag::LlmCall];
        generate.parent_id = Some(draft.id);
        let mut apply = Task::new("apply edits", at(55_200), at(69_500));
        apply.tags = vec![TaskTag::ToolCall];
        apply.parent_id = Some(draft.id);
        generate.dependents = vec![apply.id];

        let mut tests = Task::new("run test suite", at(70_000), at(88_000));
        tests.tags = vec![TaskTag::ToolCall];
        tests.parent_id = Some(root.id);
        tests.issues = vec![IssueRef {
            id: "ISS-17".to_string(),
            summary: "flaky integration test re-ran twice".to_string(),
            url: Some("https://issues.example.com/ISS-17".to_string()),
        }];

        let mut review = Task::new("review summary", at(88_000), at(96_000));
        review.tags = vec![TaskTag::Manual];
        review.parent_id = Some(root.id);

        // Causal chain across the phases
        plan.dependents = vec![explore.id];
        explore.dependents = vec![draft.id];
        draft.dependents = vec![tests.id];
        tests.dependents = vec![review.id];

        explore.children = vec![grep, read_files];
        draft.children = vec![generate, apply];
        root.children = vec![plan, explore, draft, tests, review];
        trace.tasks = vec![root];
        trace
    }

    // --- File operations ---

    pub fn open_trace(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Trace JSON", &["trace.json", "json"])
            .pick_file()
        {
            match crate::io::load_trace(&path) {
                Ok(trace) => {
                    self.trace = trace;
                    self.controller.load(&self.trace.tasks);
                    self.selected_task = None;
                    self.selected_ancestors.clear();
                    self.file_path = Some(path);
                    self.status_message =
                        format!("Loaded '{}' ({} tasks)", self.trace.name, self.trace.task_count());
                }
                Err(e) => {
                    self.status_message = format!("Error loading trace: {}", e);
                }
            }
        }
    }

    pub fn export_csv(&mut self) {
        if self.trace.tasks.is_empty() {
            self.status_message = "Nothing to export — trace has no tasks".to_string();
            return;
        }

        let default_name = format!("{}.csv", self.trace.name);
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV Files", &["csv"])
            .set_file_name(&default_name)
            .save_file()
        {
            match crate::io::csv_export::export_csv(&self.trace, &path) {
                Ok(count) => {
                    self.status_message = format!("Exported {} tasks to CSV", count);
                }
                Err(e) => {
                    self.status_message = format!("CSV export failed: {}", e);
                }
            }
        }
    }

    // --- Selection ---

    pub fn select_task(&mut self, id: Option<Uuid>) {
        self.selected_task = id;
        self.selected_ancestors = match id {
            Some(id) => hierarchy::ancestors(&self.trace.tasks, id),
            None => Vec::new(),
        };
    }

    /// Deep-link into a task's issues: open the tracker URL when the
    /// recorder provided one, otherwise report in the status bar.
    pub fn show_issues(&mut self, id: Uuid) {
        let Some(task) = self.trace.find(id) else {
            return;
        };
        if let Some(url) = task.issues.iter().find_map(|i| i.url.clone()) {
            match open::that(&url) {
                Ok(()) => self.status_message = format!("Opened {}", url),
                Err(e) => self.status_message = format!("Could not open issue link: {}", e),
            }
        } else {
            self.status_message = format!(
                "'{}' has {} issue(s), no tracker link",
                task.name,
                task.issues.len()
            );
        }
    }

    // --- View operations ---

    pub fn expand_all(&mut self) {
        self.controller.expand_all();
        self.status_message = "Expanded all tasks".to_string();
    }

    pub fn collapse_all(&mut self) {
        self.controller.collapse_all();
        self.status_message = "Collapsed all tasks".to_string();
    }

    pub fn expand_one_level(&mut self) {
        self.controller.expand_one_level(&self.trace.tasks);
    }

    pub fn collapse_one_level(&mut self) {
        self.controller.collapse_one_level(&self.trace.tasks);
    }

    fn zoom_anchor(&self) -> f32 {
        self.controller.base_width() / 2.0
    }

    pub fn zoom_in(&mut self) {
        let anchor = self.zoom_anchor();
        self.controller.zoom_in(anchor);
    }

    pub fn zoom_out(&mut self) {
        let anchor = self.zoom_anchor();
        self.controller.zoom_out(anchor);
    }

    pub fn reset_zoom(&mut self) {
        self.controller.reset_zoom();
    }

    pub fn set_zoom(&mut self, level: u32) {
        let anchor = self.zoom_anchor();
        self.controller.set_zoom(level, anchor);
    }
}

impl eframe::App for TraceApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        ui::theme::apply_theme(ctx);

        // Handle keyboard shortcuts outside closures to avoid borrow issues
        let should_open = ctx.input(|i| i.modifiers.ctrl && i.key_pressed(egui::Key::O));
        let should_expand = ctx.input(|i| {
            i.modifiers.ctrl && !i.modifiers.shift && i.key_pressed(egui::Key::E)
        });
        let should_collapse = ctx.input(|i| {
            i.modifiers.ctrl && i.modifiers.shift && i.key_pressed(egui::Key::E)
        });
        if should_open {
            self.open_trace();
        }
        if should_expand {
            self.expand_all();
        }
        if should_collapse {
            self.collapse_all();
        }

        // Top panel: toolbar
        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            ui::toolbar::show_toolbar(self, ui);
        });

        // Bottom panel: status bar with the zoom/width readout
        egui::TopBottomPanel::bottom("status_bar")
            .exact_height(ui::theme::STATUS_BAR_HEIGHT)
            .frame(
                egui::Frame::default()
                    .fill(ui::theme::BG_HEADER)
                    .inner_margin(egui::Margin::symmetric(10.0, 0.0)),
            )
            .show(ctx, |ui| {
                ui.horizontal_centered(|ui| {
                    ui.label(
                        egui::RichText::new(&self.status_message)
                            .font(ui::theme::font_status())
                            .color(ui::theme::TEXT_SECONDARY),
                    );
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        let dim = |s: String| {
                            egui::RichText::new(s).size(10.5).color(ui::theme::TEXT_DIM)
                        };
                        ui.label(dim(format!("Width: {:.0}px", self.controller.effective_width())));
                        ui.label(dim(" · ".to_string()));
                        ui.label(dim(format!("Zoom: {}", self.controller.zoom())));
                        ui.label(dim(" · ".to_string()));
                        ui.label(dim(format!("Tasks: {}", self.trace.task_count())));
                    });
                });
            });

        // Left panel: detail inspector + task table
        let mut table_action = ui::task_table::TaskTableAction::None;
        let mut detail_action = ui::detail_panel::DetailAction::None;
        egui::SidePanel::left("task_panel")
            .default_width(ui::theme::SIDE_PANEL_DEFAULT_WIDTH)
            .min_width(ui::theme::SIDE_PANEL_MIN_WIDTH)
            .max_width(ui::theme::SIDE_PANEL_DEFAULT_WIDTH * 2.0)
            .resizable(true)
            .frame(
                egui::Frame::default()
                    .fill(ui::theme::BG_PANEL)
                    .inner_margin(egui::Margin::same(8.0))
                    .stroke(egui::Stroke::new(1.0, ui::theme::BORDER_SUBTLE)),
            )
            .show(ctx, |ui| {
                if let Some(task) = self.selected_task.and_then(|id| self.trace.find(id)) {
                    detail_action = ui::detail_panel::show_detail_panel(task, &self.trace, ui);
                    ui.add_space(4.0);
                    ui.separator();
                    ui.add_space(2.0);
                }

                table_action = ui::task_table::show_task_table(
                    &self.trace.tasks,
                    &self.controller,
                    self.selected_task,
                    ui,
                );
            });

        match table_action {
            ui::task_table::TaskTableAction::Select(id) => self.select_task(Some(id)),
            ui::task_table::TaskTableAction::ToggleExpand(id) => {
                self.controller.toggle_expand(id);
            }
            ui::task_table::TaskTableAction::None => {}
        }
        match detail_action {
            ui::detail_panel::DetailAction::SelectTask(id) => self.select_task(Some(id)),
            ui::detail_panel::DetailAction::ShowIssues(id) => self.show_issues(id),
            ui::detail_panel::DetailAction::None => {}
        }

        // Central panel: timeline chart
        let mut chart_interaction = ui::chart::ChartInteraction::default();
        let chart_frame = egui::Frame::default()
            .fill(ui::theme::BG_DARK)
            .inner_margin(egui::Margin::ZERO);
        egui::CentralPanel::default().frame(chart_frame).show(ctx, |ui| {
            chart_interaction = ui::chart::show_timeline(
                &self.trace.tasks,
                &mut self.controller,
                self.selected_task,
                &self.selected_ancestors,
                ui,
            );
        });

        if let Some(id) = chart_interaction.select {
            self.select_task(Some(id));
        }
        if chart_interaction.clear_selection {
            self.select_task(None);
        }
        if let Some(id) = chart_interaction.toggle_expand {
            self.controller.toggle_expand(id);
        }
        if let Some(id) = chart_interaction.show_issues {
            self.show_issues(id);
        }

        // Dialogs
        if self.show_about {
            ui::dialogs::show_about_dialog(self, ctx);
        }
        if self.show_trace_help {
            ui::dialogs::show_trace_help_dialog(self, ctx);
        }
    }
}
