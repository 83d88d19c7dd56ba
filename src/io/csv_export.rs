use crate::model::{Task, Trace};
use std::path::Path;

/// Export the task tree to a semicolon-delimited CSV file, depth-first so
/// the row order matches a fully expanded timeline.
///
/// Columns: Name ; Start ; End ; Duration (s) ; Tags ; Depth
/// Returns the number of tasks written.
pub fn export_csv(trace: &Trace, path: &Path) -> Result<usize, String> {
    let mut wtr = csv::WriterBuilder::new()
        .delimiter(b';')
        .has_headers(false)
        .from_path(path)
        .map_err(|e| format!("Failed to create CSV file: {}", e))?;

    wtr.write_record(["Name", "Start", "End", "Duration (s)", "Tags", "Depth"])
        .map_err(|e| format!("Failed to write header: {}", e))?;

    fn write_subtree(
        wtr: &mut csv::Writer<std::fs::File>,
        task: &Task,
        depth: usize,
        count: &mut usize,
    ) -> Result<(), String> {
        let tags: Vec<&str> = task.tags.iter().map(|t| t.label()).collect();
        wtr.write_record([
            task.name.as_str(),
            &task.start.to_rfc3339(),
            &task.end.to_rfc3339(),
            &format!("{:.1}", task.duration_ms() / 1000.0),
            &tags.join("+"),
            &depth.to_string(),
        ])
        .map_err(|e| format!("Failed to write task '{}': {}", task.name, e))?;
        *count += 1;
        for child in &task.children {
            write_subtree(wtr, child, depth + 1, count)?;
        }
        Ok(())
    }

    let mut count = 0;
    for task in &trace.tasks {
        write_subtree(&mut wtr, task, 0, &mut count)?;
    }

    wtr.flush().map_err(|e| format!("Failed to flush CSV: {}", e))?;
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_export_writes_all_rows_depth_first() {
        let at = |ms: i64| chrono::Utc.timestamp_millis_opt(ms).unwrap();
        let mut trace = Trace::new("export");
        let mut root = Task::new("root", at(0), at(1000));
        root.children.push(Task::new("child", at(100), at(400)));
        trace.tasks.push(root);

        let path = std::env::temp_dir().join("tracescope_test_export.csv");
        let written = export_csv(&trace, &path).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(written, 2);
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 3); // header + 2 rows
        assert!(lines[1].starts_with("root;"));
        assert!(lines[2].starts_with("child;"));
        assert!(lines[2].ends_with(";1")); // depth column
    }
}
