use scraper::ElementRef;

use crate::classify::split_score;
use crate::dom::{self, Tag};
use crate::models::Assignment;

const CELL: Tag = Tag::new("td");
const CELL_CONTENT: Tag = Tag::with_class("span", "tablesaw-cell-content");
const LINK: Tag = Tag::new("a");
const STATUS_ICON: Tag = Tag::new("img");

const MISSING_LABEL: &str = "Missing";
const LATE_LABEL: &str = "Late";
const RED_MARKER: &str = "color:red";
const ROW_MISSING_ATTR: &str = "data-bmissing";

/// The independent cues that mark an assignment as missing.
///
/// Any one of them is enough.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MissingSignals {
    /// Grade cell icon labelled "Missing".
    pub status_label: bool,
    /// Assignment name link styled red.
    pub red_name: bool,
    /// `data-bmissing="1"` on the row.
    pub row_flag: bool,
}

impl MissingSignals {
    pub fn any(self) -> bool {
        self.status_label || self.red_name || self.row_flag
    }
}

/// Parses one assignment table row. Rows with fewer than four cells are skipped.
pub fn parse_assignment_row(row: ElementRef<'_>) -> Option<Assignment> {
    let cells: Vec<ElementRef<'_>> = dom::find_all(row, CELL).collect();
    if cells.len() < 4 {
        return None;
    }

    let mut assignment = Assignment::default();
    let mut signals = MissingSignals::default();

    if let Some(content) = cell_content(cells[0]) {
        assignment.due_date = dom::stripped_text(content);
    }

    if let Some(link) = cell_content(cells[1]).and_then(|content| dom::find(content, LINK)) {
        assignment.name = dom::stripped_text(link);
        signals.red_name = is_red(link);
    }

    if let Some(content) = cell_content(cells[2]) {
        assignment.weight = dom::stripped_text(content);
    }

    if let Some(content) = cell_content(cells[3]) {
        read_grade(content, &mut assignment, &mut signals);
    }

    if let Some(content) = cells.get(4).copied().and_then(cell_content) {
        assignment.feedback = dom::stripped_text(content);
    }

    signals.row_flag = dom::attr(row, ROW_MISSING_ATTR) == Some("1");
    assignment.is_missing = signals.any();

    Some(assignment)
}

fn cell_content(cell: ElementRef<'_>) -> Option<ElementRef<'_>> {
    dom::find(cell, CELL_CONTENT)
}

fn is_red(link: ElementRef<'_>) -> bool {
    dom::attr(link, "style").is_some_and(|style| style.contains(RED_MARKER))
}

/// A labelled status icon wins over the cell text.
fn read_grade(content: ElementRef<'_>, assignment: &mut Assignment, signals: &mut MissingSignals) {
    let label = dom::find(content, STATUS_ICON)
        .and_then(|icon| dom::attr(icon, "title"))
        .filter(|title| !title.is_empty());

    match label {
        Some(label) => {
            assignment.grade_raw = label.to_string();
            signals.status_label = label == MISSING_LABEL;
            assignment.is_late = label == LATE_LABEL;
        }
        None => {
            assignment.grade_raw = dom::stripped_text(content);
            let score = split_score(&assignment.grade_raw);
            assignment.grade_numeric = score.numeric;
            assignment.grade_letter = score.letter;
        }
    }
}
