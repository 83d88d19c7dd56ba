use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::task::Task;

/// A recorded execution: the full forest of tasks belonging to one run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trace {
    pub name: String,
    pub tasks: Vec<Task>,
    #[serde(default = "Utc::now")]
    pub recorded_at: DateTime<Utc>,
}

impl Default for Trace {
    fn default() -> Self {
        Self {
            name: "Untitled Trace".to_string(),
            tasks: Vec::new(),
            recorded_at: Utc::now(),
        }
    }
}

impl Trace {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Visit every task in the forest depth-first, parents before children.
    pub fn for_each_task<'a>(&'a self, f: &mut impl FnMut(&'a Task)) {
        fn walk<'a>(task: &'a Task, f: &mut impl FnMut(&'a Task)) {
            f(task);
            for child in &task.children {
                walk(child, f);
            }
        }
        for task in &self.tasks {
            walk(task, f);
        }
    }

    /// Find a task anywhere in the forest by id.
    pub fn find(&self, id: Uuid) -> Option<&Task> {
        let mut found = None;
        self.for_each_task(&mut |t| {
            if t.id == id && found.is_none() {
                found = Some(t);
            }
        });
        found
    }

    /// Total number of tasks, descendants included.
    pub fn task_count(&self) -> usize {
        let mut n = 0;
        self.for_each_task(&mut |_| n += 1);
        n
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(ms: i64) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(ms).unwrap()
    }

    fn sample() -> Trace {
        let mut trace = Trace::new("sample");
        let mut root = Task::new("root", at(0), at(1000));
        root.children.push(Task::new("a", at(100), at(400)));
        root.children.push(Task::new("b", at(500), at(900)));
        trace.tasks.push(root);
        trace
    }

    #[test]
    fn test_task_count_includes_descendants() {
        assert_eq!(sample().task_count(), 3);
    }

    #[test]
    fn test_find_nested_task() {
        let trace = sample();
        let b = trace.tasks[0].children[1].id;
        assert_eq!(trace.find(b).unwrap().name, "b");
    }

    #[test]
    fn test_find_unknown_id_is_none() {
        assert!(sample().find(Uuid::new_v4()).is_none());
    }

    #[test]
    fn test_for_each_visits_parents_first() {
        let trace = sample();
        let mut names = Vec::new();
        trace.for_each_task(&mut |t| names.push(t.name.clone()));
        assert_eq!(names, vec!["root", "a", "b"]);
    }
}
