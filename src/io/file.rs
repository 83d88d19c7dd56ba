use crate::model::Trace;
use std::path::Path;

/// Load a trace from a JSON file.
pub fn load_trace(path: &Path) -> Result<Trace, String> {
    let json = std::fs::read_to_string(path).map_err(|e| e.to_string())?;
    serde_json::from_str(&json).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_trace_from_json() {
        let json = r#"{
            "name": "run",
            "tasks": [{
                "id": "4b4b3f3e-8d55-4f0e-9a31-0f6ad27a6d1b",
                "name": "plan",
                "start": "2026-08-06T12:00:00.000Z",
                "end": "2026-08-06T12:00:08.400Z",
                "tags": ["llm_call", "unknown_tag"]
            }]
        }"#;
        let dir = std::env::temp_dir();
        let path = dir.join("tracescope_test_load.json");
        std::fs::write(&path, json).unwrap();
        let trace = load_trace(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(trace.name, "run");
        assert_eq!(trace.task_count(), 1);
        assert_eq!(trace.tasks[0].tags.len(), 2);
    }

    #[test]
    fn test_load_missing_file_is_err() {
        assert!(load_trace(Path::new("/nonexistent/trace.json")).is_err());
    }
}
