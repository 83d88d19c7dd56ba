use std::cmp::Ordering;
use std::collections::HashMap;

use uuid::Uuid;

use crate::model::Task;

use super::bar::{MIN_TASK_WIDTH, TASK_GAP};

/// One visible row of the flattened tree. Derived per pass, never stored:
/// row positions live here, not on the tasks.
#[derive(Debug, Clone, Copy)]
pub struct VisibleRow<'a> {
    pub task: &'a Task,
    /// Contiguous 0..n vertical position in visitation order.
    pub row: usize,
    /// Recursion depth; drives the name-column indent.
    pub level: usize,
}

/// Flatten a task forest into the ordered list of visible rows.
///
/// Depth-first over roots sorted ascending by start time; a task's children
/// (also start-sorted) are visited before its siblings only when the task is
/// expanded. Deterministic for identical inputs.
pub fn flatten<'a>(roots: &'a [Task], expanded: &HashMap<Uuid, bool>) -> Vec<VisibleRow<'a>> {
    fn push_subtree<'a>(
        task: &'a Task,
        level: usize,
        expanded: &HashMap<Uuid, bool>,
        rows: &mut Vec<VisibleRow<'a>>,
    ) {
        let row = rows.len();
        rows.push(VisibleRow { task, row, level });
        if expanded.get(&task.id).copied().unwrap_or(false) {
            let mut kids: Vec<&Task> = task.children.iter().collect();
            kids.sort_by_key(|t| t.start);
            for kid in kids {
                push_subtree(kid, level + 1, expanded, rows);
            }
        }
    }

    let mut ordered: Vec<&Task> = roots.iter().collect();
    ordered.sort_by_key(|t| t.start);

    let mut rows = Vec::new();
    for root in ordered {
        push_subtree(root, 0, expanded, &mut rows);
    }
    rows
}

/// Total pixel width of the timeline area at a zoom level.
///
/// "Full" zoom (level 100) is calibrated so the globally shortest task still
/// occupies `MIN_TASK_WIDTH` plus a visible gap; beyond 100 the width keeps
/// growing linearly.
pub fn effective_width(zoom: u32, base_width: f32, total_ms: f64, shortest_ms: f64) -> f32 {
    if total_ms <= 0.0 {
        return base_width;
    }
    let min_px_per_ms = (MIN_TASK_WIDTH + TASK_GAP) as f64 / shortest_ms.max(1.0);
    let full_width = (total_ms * min_px_per_ms).max(base_width as f64);

    if zoom == 0 {
        base_width
    } else if zoom <= 100 {
        let progress = zoom as f64 / 100.0;
        (base_width as f64 + (full_width - base_width as f64) * progress) as f32
    } else {
        (full_width * (1.0 + (zoom - 100) as f64 / 100.0)) as f32
    }
}

/// One dependency edge between two visible tasks, with its ordinal position
/// among the edges sharing each endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeRef {
    pub from: Uuid,
    pub to: Uuid,
    pub from_ordinal: usize,
    pub to_ordinal: usize,
}

/// Per-pass edge bookkeeping: inbound/outbound counts per task plus the
/// deterministic draw list. Recomputed every layout pass, never stored.
#[derive(Debug, Default)]
pub struct DependencyRanks {
    pub inbound: HashMap<Uuid, usize>,
    pub outbound: HashMap<Uuid, usize>,
    pub edges: Vec<EdgeRef>,
}

impl DependencyRanks {
    /// How many edges terminate at the given task.
    pub fn fan_in(&self, id: Uuid) -> usize {
        self.inbound.get(&id).copied().unwrap_or(0)
    }
}

/// Count and order every dependency edge whose endpoints are both visible.
///
/// Per source, targets are ordered by start time (ties broken by ascending
/// row) so the draw order is stable across passes.
pub fn dependency_ranks(rows: &[VisibleRow]) -> DependencyRanks {
    let mut row_of: HashMap<Uuid, usize> = HashMap::new();
    let mut start_of: HashMap<Uuid, f64> = HashMap::new();
    for r in rows {
        row_of.insert(r.task.id, r.row);
        start_of.insert(r.task.id, r.task.start_ms());
    }

    let mut ranks = DependencyRanks::default();
    for r in rows {
        let mut targets: Vec<(f64, usize, Uuid)> = r
            .task
            .dependents
            .iter()
            .filter_map(|id| {
                let row = *row_of.get(id)?;
                Some((start_of[id], row, *id))
            })
            .collect();
        targets.sort_by(|a, b| {
            a.0.partial_cmp(&b.0)
                .unwrap_or(Ordering::Equal)
                .then(a.1.cmp(&b.1))
        });

        for (_, _, to) in targets {
            let from_counter = ranks.outbound.entry(r.task.id).or_insert(0);
            let from_ordinal = *from_counter;
            *from_counter += 1;

            let to_counter = ranks.inbound.entry(to).or_insert(0);
            let to_ordinal = *to_counter;
            *to_counter += 1;

            ranks.edges.push(EdgeRef {
                from: r.task.id,
                to,
                from_ordinal,
                to_ordinal,
            });
        }
    }
    ranks
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};

    fn at(ms: i64) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(ms).unwrap()
    }

    /// root(0..1000) with A(100..400) and B(500..900); A has two leaves.
    fn forest() -> Vec<Task> {
        let mut root = Task::new("root", at(0), at(1000));
        let mut a = Task::new("a", at(100), at(400));
        a.children.push(Task::new("a2", at(250), at(300)));
        a.children.push(Task::new("a1", at(120), at(200)));
        let b = Task::new("b", at(500), at(900));
        root.children.push(b);
        root.children.push(a);
        vec![root]
    }

    fn all_expanded(roots: &[Task]) -> HashMap<Uuid, bool> {
        fn mark(t: &Task, m: &mut HashMap<Uuid, bool>) {
            if !t.children.is_empty() {
                m.insert(t.id, true);
            }
            for c in &t.children {
                mark(c, m);
            }
        }
        let mut m = HashMap::new();
        for r in roots {
            mark(r, &mut m);
        }
        m
    }

    #[test]
    fn test_flatten_rows_are_contiguous() {
        let roots = forest();
        let rows = flatten(&roots, &all_expanded(&roots));
        for (i, r) in rows.iter().enumerate() {
            assert_eq!(r.row, i);
        }
        assert_eq!(rows.len(), 5);
    }

    #[test]
    fn test_flatten_orders_by_start_time() {
        let roots = forest();
        let rows = flatten(&roots, &all_expanded(&roots));
        let names: Vec<&str> = rows.iter().map(|r| r.task.name.as_str()).collect();
        // Children sort by start even though "b" was pushed before "a".
        assert_eq!(names, vec!["root", "a", "a1", "a2", "b"]);
    }

    #[test]
    fn test_flatten_levels_match_depth() {
        let roots = forest();
        let rows = flatten(&roots, &all_expanded(&roots));
        let levels: Vec<usize> = rows.iter().map(|r| r.level).collect();
        assert_eq!(levels, vec![0, 1, 2, 2, 1]);
    }

    #[test]
    fn test_collapse_removes_exactly_the_descendants() {
        let roots = forest();
        let mut expanded = all_expanded(&roots);
        let before = flatten(&roots, &expanded).len();

        let a_id = roots[0]
            .children
            .iter()
            .find(|t| t.name == "a")
            .unwrap()
            .id;
        expanded.insert(a_id, false);
        let after = flatten(&roots, &expanded);
        assert_eq!(before - after.len(), 2); // a's two leaves

        // Total chart height shrinks by exactly two row pitches.
        let pitch = crate::timeline::bar::row_pitch();
        let height_delta = (before - after.len()) as f32 * pitch;
        assert_eq!(height_delta, 2.0 * pitch);

        expanded.insert(a_id, true);
        assert_eq!(flatten(&roots, &expanded).len(), before);
    }

    #[test]
    fn test_collapsed_root_yields_one_row() {
        let roots = forest();
        let expanded = HashMap::new();
        let rows = flatten(&roots, &expanded);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].task.name, "root");
    }

    #[test]
    fn test_flatten_is_deterministic() {
        let roots = forest();
        let expanded = all_expanded(&roots);
        let first: Vec<Uuid> = flatten(&roots, &expanded).iter().map(|r| r.task.id).collect();
        let second: Vec<Uuid> = flatten(&roots, &expanded).iter().map(|r| r.task.id).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_effective_width_monotonic_and_based() {
        let base = 1000.0;
        assert_eq!(effective_width(0, base, 100_000.0, 50.0), base);
        let mut prev = 0.0;
        for zoom in (0..=1000).step_by(7) {
            let w = effective_width(zoom, base, 100_000.0, 50.0);
            assert!(w >= prev, "width shrank at zoom {}", zoom);
            prev = w;
        }
    }

    #[test]
    fn test_full_width_calibrated_from_shortest_task() {
        // One outlier sub-millisecond task drives magnification for the whole
        // window. Intentional; this pins the formula.
        let base = 500.0;
        let total = 60_000.0;
        let shortest = 2.0;
        let expected_full = total * (MIN_TASK_WIDTH + TASK_GAP) as f64 / shortest;
        let full = effective_width(100, base, total, shortest);
        assert!((full as f64 - expected_full).abs() < 1.0);
    }

    #[test]
    fn test_width_beyond_full_keeps_growing_linearly() {
        let base = 500.0;
        let full = effective_width(100, base, 60_000.0, 2.0);
        let double = effective_width(200, base, 60_000.0, 2.0);
        assert!((double / full - 2.0).abs() < 1e-3);
    }

    #[test]
    fn test_empty_window_returns_base() {
        assert_eq!(effective_width(700, 640.0, 0.0, 1.0), 640.0);
    }

    #[test]
    fn test_dependency_ranks_count_and_order() {
        let mut a = Task::new("a", at(0), at(100));
        let b = Task::new("b", at(200), at(300));
        let c = Task::new("c", at(150), at(250));
        // a depends-on nothing but feeds both b and c; declared out of
        // start order to exercise the sort.
        a.dependents = vec![b.id, c.id];
        let roots = vec![a, b, c];
        let rows = flatten(&roots, &HashMap::new());
        let ranks = dependency_ranks(&rows);

        assert_eq!(ranks.edges.len(), 2);
        // c starts earlier, so it is drawn first.
        assert_eq!(ranks.edges[0].to, roots[2].id);
        assert_eq!(ranks.edges[0].from_ordinal, 0);
        assert_eq!(ranks.edges[1].from_ordinal, 1);
        assert_eq!(ranks.outbound[&roots[0].id], 2);
        assert_eq!(ranks.fan_in(roots[1].id), 1);
    }

    #[test]
    fn test_edges_to_hidden_tasks_are_skipped() {
        let mut root = Task::new("root", at(0), at(1000));
        let hidden = Task::new("hidden", at(100), at(200));
        let hidden_id = hidden.id;
        root.children.push(hidden);
        let mut outside = Task::new("outside", at(300), at(400));
        outside.dependents = vec![hidden_id];
        let roots = vec![root, outside];

        // Root collapsed: the target row does not exist this pass.
        let rows = flatten(&roots, &HashMap::new());
        let ranks = dependency_ranks(&rows);
        assert!(ranks.edges.is_empty());
        assert_eq!(ranks.fan_in(hidden_id), 0);
    }

    #[test]
    fn test_shared_target_ordinals_increment() {
        let mut a = Task::new("a", at(0), at(100));
        let mut b = Task::new("b", at(50), at(150));
        let c = Task::new("c", at(200), at(300));
        a.dependents = vec![c.id];
        b.dependents = vec![c.id];
        let roots = vec![a, b, c];
        let rows = flatten(&roots, &HashMap::new());
        let ranks = dependency_ranks(&rows);

        assert_eq!(ranks.fan_in(roots[2].id), 2);
        let ordinals: Vec<usize> = ranks.edges.iter().map(|e| e.to_ordinal).collect();
        assert_eq!(ordinals, vec![0, 1]);
    }
}
