use std::collections::HashMap;

use uuid::Uuid;

use crate::model::Task;

use super::layout;

pub const MAX_ZOOM: u32 = 1000;
/// Narrowest the chart area may get, whatever the window size.
pub const MIN_BASE_WIDTH: f32 = 200.0;
/// Horizontal padding reserved inside the chart viewport.
const CHART_PADDING: f32 = 16.0;

/// Zoom increment at a given level. Finer steps at low zoom, coarser at high
/// zoom, so perceived zoom speed stays roughly constant.
pub fn zoom_step(level: u32) -> u32 {
    if level < 250 {
        5
    } else if level < 500 {
        10
    } else if level < 1000 {
        25
    } else {
        50
    }
}

/// Pure scroll-anchoring math: keep the time instant under `pointer_x`
/// visually fixed when the content width changes.
pub fn anchored_scroll(old_width: f32, new_width: f32, old_scroll: f32, pointer_x: f32) -> f32 {
    if old_width <= 0.0 {
        return 0.0;
    }
    ((old_scroll + pointer_x) * (new_width / old_width) - pointer_x).max(0.0)
}

/// Coalesces modifier-held wheel events so fast input triggers at most one
/// zoom recompute per window. The clock is an argument, not a timer.
#[derive(Debug, Default)]
pub struct WheelCoalescer {
    pending: f32,
    window_start_ms: Option<f64>,
}

impl WheelCoalescer {
    pub const WINDOW_MS: f64 = 8.0;

    pub fn push(&mut self, delta: f32, now_ms: f64) {
        if self.window_start_ms.is_none() {
            self.window_start_ms = Some(now_ms);
        }
        self.pending += delta;
    }

    /// Returns the accumulated delta once the window has elapsed.
    pub fn drain(&mut self, now_ms: f64) -> Option<f32> {
        let start = self.window_start_ms?;
        if now_ms - start < Self::WINDOW_MS {
            return None;
        }
        self.window_start_ms = None;
        let delta = self.pending;
        self.pending = 0.0;
        if delta == 0.0 {
            None
        } else {
            Some(delta)
        }
    }

    pub fn is_idle(&self) -> bool {
        self.window_start_ms.is_none()
    }
}

/// Owner of all timeline interaction state: zoom level, expand/collapse map,
/// base/effective width, and the scroll-anchoring logic. The sole writer of
/// this state; every layout pass reads an immutable snapshot.
pub struct HierarchyController {
    zoom: u32,
    expanded: HashMap<Uuid, bool>,
    container_width: f32,
    base_width: f32,
    global_start_ms: Option<f64>,
    global_end_ms: Option<f64>,
    shortest_ms: f64,
    scroll_x: f32,
    scroll_override: Option<f32>,
    first_layout: bool,
    wheel: WheelCoalescer,
}

impl Default for HierarchyController {
    fn default() -> Self {
        Self::new()
    }
}

impl HierarchyController {
    pub fn new() -> Self {
        Self {
            zoom: 0,
            expanded: HashMap::new(),
            container_width: 1024.0,
            base_width: 1024.0 - CHART_PADDING,
            global_start_ms: None,
            global_end_ms: None,
            shortest_ms: 1.0,
            scroll_x: 0.0,
            scroll_override: None,
            first_layout: true,
            wheel: WheelCoalescer::default(),
        }
    }

    /// Adopt a freshly loaded task forest: recompute the global time window
    /// and the shortest duration, reset zoom, expand every non-leaf, and pin
    /// scroll to 0 for the first layout.
    pub fn load(&mut self, roots: &[Task]) {
        self.global_start_ms = None;
        self.global_end_ms = None;
        self.shortest_ms = 1.0;
        self.expanded.clear();

        let mut shortest: Option<f64> = None;
        visit(roots, &mut |task| {
            let start = task.start_ms();
            let end = task.end_ms();
            self.global_start_ms = Some(self.global_start_ms.map_or(start, |s| s.min(start)));
            self.global_end_ms = Some(self.global_end_ms.map_or(end, |e| e.max(end)));
            let d = task.duration_ms();
            shortest = Some(shortest.map_or(d, |s: f64| s.min(d)));
            if !task.children.is_empty() {
                self.expanded.insert(task.id, true);
            }
        });
        self.shortest_ms = shortest.unwrap_or(1.0).max(1.0);

        self.zoom = 0;
        self.scroll_x = 0.0;
        self.scroll_override = Some(0.0);
        self.first_layout = true;
        self.wheel = WheelCoalescer::default();
    }

    /// No trace (or an empty one) means no window and zero rows.
    pub fn is_empty(&self) -> bool {
        self.global_start_ms.is_none()
    }

    pub fn zoom(&self) -> u32 {
        self.zoom
    }

    pub fn expanded(&self) -> &HashMap<Uuid, bool> {
        &self.expanded
    }

    pub fn global_start_ms(&self) -> Option<f64> {
        self.global_start_ms
    }

    pub fn global_end_ms(&self) -> Option<f64> {
        self.global_end_ms
    }

    /// Duration of the global window in milliseconds; 0 when empty.
    pub fn window_ms(&self) -> f64 {
        match (self.global_start_ms, self.global_end_ms) {
            (Some(s), Some(e)) => (e - s).max(0.0),
            _ => 0.0,
        }
    }

    pub fn base_width(&self) -> f32 {
        self.base_width
    }

    pub fn effective_width(&self) -> f32 {
        layout::effective_width(self.zoom, self.base_width, self.window_ms(), self.shortest_ms)
    }

    /// Observe the hosting viewport's width. Rescales anchored at the
    /// pointer when the resulting effective width changes.
    pub fn set_container_width(&mut self, width: f32, pointer_x: f32) {
        if (width - self.container_width).abs() < 0.5 {
            return;
        }
        let old = self.effective_width();
        self.container_width = width;
        self.base_width = (width - CHART_PADDING).max(MIN_BASE_WIDTH);
        let new = self.effective_width();
        self.apply_width_change(old, new, pointer_x);
    }

    fn apply_width_change(&mut self, old_width: f32, new_width: f32, pointer_x: f32) {
        if self.first_layout {
            self.scroll_x = 0.0;
            self.scroll_override = Some(0.0);
        } else if (new_width - old_width).abs() > 0.5 {
            self.scroll_x = anchored_scroll(old_width, new_width, self.scroll_x, pointer_x);
            self.scroll_override = Some(self.scroll_x);
        }
    }

    /// Set the zoom level directly (slider input), clamped to [0, MAX_ZOOM],
    /// anchored at `pointer_x`.
    pub fn set_zoom(&mut self, level: u32, pointer_x: f32) {
        let clamped = level.min(MAX_ZOOM);
        if clamped == self.zoom {
            return;
        }
        let old = self.effective_width();
        self.zoom = clamped;
        let new = self.effective_width();
        self.apply_width_change(old, new, pointer_x);
    }

    pub fn zoom_in(&mut self, pointer_x: f32) {
        let step = zoom_step(self.zoom);
        self.set_zoom(self.zoom.saturating_add(step), pointer_x);
    }

    pub fn zoom_out(&mut self, pointer_x: f32) {
        let step = zoom_step(self.zoom);
        self.set_zoom(self.zoom.saturating_sub(step), pointer_x);
    }

    pub fn reset_zoom(&mut self) {
        self.set_zoom(0, self.base_width / 2.0);
    }

    /// Feed one wheel event. Only active while the zoom modifier is held so
    /// normal scrolling stays untouched.
    pub fn handle_wheel(&mut self, delta: f32, modifier_held: bool, now_ms: f64) {
        if modifier_held && delta != 0.0 {
            self.wheel.push(delta, now_ms);
        }
    }

    /// Apply any coalesced wheel input whose window has elapsed. Returns
    /// true when the zoom level changed.
    pub fn pump(&mut self, now_ms: f64, pointer_x: f32) -> bool {
        match self.wheel.drain(now_ms) {
            Some(delta) => {
                let before = self.zoom;
                if delta > 0.0 {
                    self.zoom_in(pointer_x);
                } else {
                    self.zoom_out(pointer_x);
                }
                self.zoom != before
            }
            None => false,
        }
    }

    /// True while wheel input is waiting for its coalescing window.
    pub fn has_pending_wheel(&self) -> bool {
        !self.wheel.is_idle()
    }

    /// Flip one task's expansion. Unknown ids (and leaves) are no-ops.
    pub fn toggle_expand(&mut self, id: Uuid) {
        if let Some(open) = self.expanded.get_mut(&id) {
            *open = !*open;
        }
    }

    pub fn expand_all(&mut self) {
        for open in self.expanded.values_mut() {
            *open = true;
        }
    }

    pub fn collapse_all(&mut self) {
        for open in self.expanded.values_mut() {
            *open = false;
        }
    }

    /// Expand the tree-wide frontier one step: find the maximum depth among
    /// currently expanded tasks and expand every parent exactly one level
    /// below it. A breadth-synchronized step, not a per-branch toggle.
    pub fn expand_one_level(&mut self, roots: &[Task]) {
        let parents = parent_depths(roots);
        let deepest_open = parents
            .iter()
            .filter(|(id, _)| self.expanded.get(id).copied().unwrap_or(false))
            .map(|(_, depth)| *depth)
            .max();
        let target = deepest_open.map_or(0, |d| d + 1);
        for (id, depth) in parents {
            if depth == target {
                self.expanded.insert(id, true);
            }
        }
    }

    /// Collapse every expanded task at the deepest expanded depth. No-op
    /// when nothing is expanded.
    pub fn collapse_one_level(&mut self, roots: &[Task]) {
        let parents = parent_depths(roots);
        let open: Vec<(Uuid, usize)> = parents
            .into_iter()
            .filter(|(id, _)| self.expanded.get(id).copied().unwrap_or(false))
            .collect();
        let Some(deepest) = open.iter().map(|(_, d)| *d).max() else {
            return;
        };
        for (id, depth) in open {
            if depth == deepest {
                self.expanded.insert(id, false);
            }
        }
    }

    /// One-shot scroll position the chart must apply this frame.
    pub fn take_scroll_override(&mut self) -> Option<f32> {
        self.scroll_override.take()
    }

    /// Record the scroll offset the chart actually ended up at.
    pub fn note_scroll(&mut self, x: f32) {
        self.scroll_x = x;
        self.first_layout = false;
    }

    pub fn scroll_x(&self) -> f32 {
        self.scroll_x
    }
}

/// Ancestor chain of a task, ordered root -> immediate parent. There are no
/// stored back-pointers: each step scans for the task whose children list
/// contains the id. Unknown ids yield an empty chain.
pub fn ancestors(roots: &[Task], id: Uuid) -> Vec<Uuid> {
    let mut chain = Vec::new();
    let mut current = id;
    while let Some(parent) = parent_of(roots, current) {
        chain.push(parent);
        current = parent;
    }
    chain.reverse();
    chain
}

fn parent_of(roots: &[Task], id: Uuid) -> Option<Uuid> {
    let mut found = None;
    visit(roots, &mut |task| {
        if found.is_none() && task.children.iter().any(|c| c.id == id) {
            found = Some(task.id);
        }
    });
    found
}

fn visit<'a>(roots: &'a [Task], f: &mut impl FnMut(&'a Task)) {
    for task in roots {
        f(task);
        visit(&task.children, f);
    }
}

/// Every task that has children, with its depth in the forest.
fn parent_depths(roots: &[Task]) -> Vec<(Uuid, usize)> {
    fn walk(task: &Task, depth: usize, out: &mut Vec<(Uuid, usize)>) {
        if !task.children.is_empty() {
            out.push((task.id, depth));
        }
        for child in &task.children {
            walk(child, depth + 1, out);
        }
    }
    let mut out = Vec::new();
    for root in roots {
        walk(root, 0, &mut out);
    }
    out
}
