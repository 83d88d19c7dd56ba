use egui::Color32;

use crate::model::TaskTag;

// Geometry constants shared by the layout engine and the chart canvas.
pub const ROW_HEIGHT: f32 = 30.0;
pub const ROW_GAP: f32 = 2.0;
pub const BAR_INSET: f32 = 3.0; // vertical inset so bars don't touch row edges
pub const BAR_INNER_PADDING: f32 = 2.0;
pub const BAR_ROUNDING: f32 = 5.0;
/// Narrowest a bar may render, and the gap that must stay visible between
/// adjacent bars at full zoom.
pub const MIN_TASK_WIDTH: f32 = 8.0;
pub const TASK_GAP: f32 = 4.0;

/// Vertical distance between consecutive row tops.
pub fn row_pitch() -> f32 {
    ROW_HEIGHT + ROW_GAP
}

/// Horizontal and vertical placement of one task bar, relative to the chart
/// canvas origin (below the ruler header).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarGeometry {
    pub left: f32,
    pub width: f32,
    pub top: f32,
}

impl BarGeometry {
    pub fn right(&self) -> f32 {
        self.left + self.width
    }

    pub fn height(&self) -> f32 {
        ROW_HEIGHT - BAR_INSET * 2.0
    }

    pub fn center_y(&self) -> f32 {
        self.top + self.height() / 2.0
    }
}

/// Place one task bar within the group width.
///
/// A degenerate window (global start == global end) substitutes a divisor of
/// one millisecond so every bar degrades to `min_width` instead of NaN.
pub fn bar_geometry(
    start_ms: f64,
    end_ms: f64,
    global_start_ms: f64,
    global_end_ms: f64,
    group_width: f32,
    row: usize,
    min_width: f32,
) -> BarGeometry {
    let total = (global_end_ms - global_start_ms).max(1.0);
    let left = ((start_ms - global_start_ms) / total) as f32 * group_width + BAR_INNER_PADDING;
    let width = ((end_ms - start_ms).max(0.0) / total) as f32 * group_width
        - 2.0 * BAR_INNER_PADDING;
    BarGeometry {
        left,
        width: width.max(min_width),
        top: row as f32 * row_pitch() + BAR_INSET,
    }
}

/// Visual treatment of a bar relative to the current selection, independent
/// of tag styling: the selected task is solid, its ancestors are striped,
/// everything else is outlined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarEmphasis {
    Plain,
    Selected,
    InSelectionPath,
}

/// Fixed (color, icon) pair for a tag class.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TagStyle {
    pub color: Color32,
    pub icon: &'static str,
}

pub const STYLE_TOOL_CALL: TagStyle = TagStyle {
    color: Color32::from_rgb(251, 140, 0), // Orange
    icon: egui_phosphor::regular::WRENCH,
};
pub const STYLE_LLM_CALL: TagStyle = TagStyle {
    color: Color32::from_rgb(171, 71, 188), // Purple
    icon: egui_phosphor::regular::BRAIN,
};
pub const STYLE_COMPLEX: TagStyle = TagStyle {
    color: Color32::from_rgb(66, 133, 244), // Blue
    icon: egui_phosphor::regular::TREE_STRUCTURE,
};
pub const STYLE_MANUAL: TagStyle = TagStyle {
    color: Color32::from_rgb(52, 168, 83), // Green
    icon: egui_phosphor::regular::USER,
};
pub const STYLE_DEFAULT: TagStyle = TagStyle {
    color: Color32::from_rgb(120, 128, 148), // Neutral slate
    icon: egui_phosphor::regular::CIRCLE,
};

/// Pick the bar style for a tag set. First match wins, in fixed priority
/// order: tool_call > llm_call > complex > manual > default.
pub fn style_for_tags(tags: &[TaskTag]) -> TagStyle {
    if tags.contains(&TaskTag::ToolCall) {
        STYLE_TOOL_CALL
    } else if tags.contains(&TaskTag::LlmCall) {
        STYLE_LLM_CALL
    } else if tags.contains(&TaskTag::Complex) {
        STYLE_COMPLEX
    } else if tags.contains(&TaskTag::Manual) {
        STYLE_MANUAL
    } else {
        STYLE_DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bar_spans_its_time_fraction() {
        // Window 0..1000 ms over 1000 px: task 100..400 spans ~[100, 400) px.
        let g = bar_geometry(100.0, 400.0, 0.0, 1000.0, 1000.0, 0, MIN_TASK_WIDTH);
        assert!((g.left - (100.0 + BAR_INNER_PADDING)).abs() < 1e-3);
        assert!((g.width - (300.0 - 2.0 * BAR_INNER_PADDING)).abs() < 1e-3);
    }

    #[test]
    fn test_sibling_bars_share_the_window() {
        let w = 1000.0;
        let a = bar_geometry(100.0, 400.0, 0.0, 1000.0, w, 1, MIN_TASK_WIDTH);
        let b = bar_geometry(500.0, 900.0, 0.0, 1000.0, w, 2, MIN_TASK_WIDTH);
        assert!(a.right() < b.left);
        assert!((b.left - (500.0 + BAR_INNER_PADDING)).abs() < 1e-3);
    }

    #[test]
    fn test_zero_duration_degrades_to_min_width() {
        let g = bar_geometry(250.0, 250.0, 0.0, 1000.0, 1000.0, 0, MIN_TASK_WIDTH);
        assert_eq!(g.width, MIN_TASK_WIDTH);
    }

    #[test]
    fn test_degenerate_window_is_finite() {
        // global start == global end must not divide by zero.
        let g = bar_geometry(500.0, 500.0, 500.0, 500.0, 1000.0, 3, MIN_TASK_WIDTH);
        assert!(g.left.is_finite());
        assert_eq!(g.width, MIN_TASK_WIDTH);
    }

    #[test]
    fn test_top_follows_row_index() {
        let g0 = bar_geometry(0.0, 10.0, 0.0, 100.0, 100.0, 0, MIN_TASK_WIDTH);
        let g4 = bar_geometry(0.0, 10.0, 0.0, 100.0, 100.0, 4, MIN_TASK_WIDTH);
        assert_eq!(g0.top, BAR_INSET);
        assert_eq!(g4.top - g0.top, 4.0 * row_pitch());
    }

    #[test]
    fn test_tag_priority_first_match_wins() {
        use TaskTag::*;
        assert_eq!(style_for_tags(&[Manual, ToolCall]), STYLE_TOOL_CALL);
        assert_eq!(style_for_tags(&[Complex, LlmCall]), STYLE_LLM_CALL);
        assert_eq!(style_for_tags(&[Manual, Complex]), STYLE_COMPLEX);
        assert_eq!(style_for_tags(&[Manual]), STYLE_MANUAL);
        assert_eq!(style_for_tags(&[Other]), STYLE_DEFAULT);
        assert_eq!(style_for_tags(&[]), STYLE_DEFAULT);
    }
}
