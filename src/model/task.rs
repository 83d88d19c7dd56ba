use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Category tag carried by a task. Drives the bar color and icon.
///
/// Unknown tag strings in a trace file collapse to `Other` rather than
/// failing the load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskTag {
    ToolCall,
    LlmCall,
    Complex,
    Manual,
    #[serde(other)]
    Other,
}

impl TaskTag {
    pub fn label(&self) -> &'static str {
        match self {
            TaskTag::ToolCall => "tool call",
            TaskTag::LlmCall => "llm call",
            TaskTag::Complex => "complex",
            TaskTag::Manual => "manual",
            TaskTag::Other => "other",
        }
    }
}

/// Reference to an issue raised during a task's execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssueRef {
    pub id: String,
    #[serde(default)]
    pub summary: String,
    /// Deep link into the issue tracker, when the recorder provided one.
    #[serde(default)]
    pub url: Option<String>,
}

/// One executed unit of work in a trace, with optional nested child tasks.
///
/// Tasks are constructed once from a loaded trace and are read-only for the
/// duration of a viewing session. `parent_id` is a reference by id, never an
/// owning link; upward lookups scan children lists instead of following it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: Uuid,
    pub name: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    #[serde(default)]
    pub tags: Vec<TaskTag>,
    #[serde(default)]
    pub children: Vec<Task>,
    #[serde(default)]
    pub parent_id: Option<Uuid>,
    /// Ids of causal successors, independent of containment.
    #[serde(default)]
    pub dependents: Vec<Uuid>,
    #[serde(default)]
    pub issues: Vec<IssueRef>,
}

impl Task {
    /// Create a new task with sensible defaults.
    pub fn new(name: impl Into<String>, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            start,
            end,
            tags: Vec::new(),
            children: Vec::new(),
            parent_id: None,
            dependents: Vec::new(),
            issues: Vec::new(),
        }
    }

    pub fn start_ms(&self) -> f64 {
        self.start.timestamp_millis() as f64
    }

    pub fn end_ms(&self) -> f64 {
        self.end.timestamp_millis() as f64
    }

    /// Duration in milliseconds. Never negative, even for malformed input.
    pub fn duration_ms(&self) -> f64 {
        (self.end_ms() - self.start_ms()).max(0.0)
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Total number of descendants (children, grandchildren, ...).
    pub fn descendant_count(&self) -> usize {
        self.children.iter().map(|c| 1 + c.descendant_count()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(ms: i64) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(ms).unwrap()
    }

    #[test]
    fn test_duration_never_negative() {
        let t = Task::new("backwards", at(500), at(100));
        assert_eq!(t.duration_ms(), 0.0);
    }

    #[test]
    fn test_descendant_count_nested() {
        let mut root = Task::new("root", at(0), at(100));
        let mut mid = Task::new("mid", at(0), at(50));
        mid.children.push(Task::new("leaf", at(0), at(10)));
        root.children.push(mid);
        root.children.push(Task::new("sibling", at(50), at(100)));
        assert_eq!(root.descendant_count(), 3);
    }

    #[test]
    fn test_unknown_tag_deserializes_to_other() {
        let tag: TaskTag = serde_json::from_str("\"telemetry_probe\"").unwrap();
        assert_eq!(tag, TaskTag::Other);
    }

    #[test]
    fn test_task_roundtrip() {
        let mut t = Task::new("roundtrip", at(0), at(1000));
        t.tags.push(TaskTag::ToolCall);
        t.issues.push(IssueRef {
            id: "ISS-1".into(),
            summary: "timeout".into(),
            url: None,
        });
        let json = serde_json::to_string(&t).unwrap();
        let back: Task = serde_json::from_str(&json).unwrap();
        assert_eq!(back.id, t.id);
        assert_eq!(back.tags, vec![TaskTag::ToolCall]);
        assert_eq!(back.issues.len(), 1);
    }
}
