use std::collections::HashSet;
use std::fmt::Write;

use chrono::NaiveDateTime;

use crate::classify::is_low_score;
use crate::models::{Assignment, ClassDetail, ClassSummary, GradeOverview, Standard};

/// Status labels shown alongside problem assignments even without a grade.
const NOTABLE_STATUSES: [&str; 2] = ["Excused", "Handed In"];

/// Grades under this are highlighted more strongly than ordinary low scores.
const VERY_LOW_SCORE: f64 = 2.0;

pub fn report_subject(student_name: &str, generated_at: NaiveDateTime) -> String {
    format!(
        "Grade Update: {} - {}",
        student_name,
        generated_at.format("%Y-%m-%d")
    )
}

/// Whether an assignment line belongs in the report.
pub fn is_reportable(assignment: &Assignment) -> bool {
    assignment.is_missing
        || is_low_score(assignment.is_missing, assignment.grade_numeric)
        || assignment.grade_raw.is_empty()
        || NOTABLE_STATUSES.contains(&assignment.grade_raw.as_str())
}

pub fn build_report(
    student_name: &str,
    generated_at: NaiveDateTime,
    overview: &GradeOverview,
    details: &[ClassDetail],
) -> String {
    let detailed: HashSet<&str> = details.iter().map(|d| d.class_name.as_str()).collect();
    let (attention, meeting): (Vec<&ClassSummary>, Vec<&ClassSummary>) = overview
        .classes
        .iter()
        .partition(|class| detailed.contains(class.name.as_str()));
    let total_missing: usize = details.iter().map(|d| d.missing_assignments_total).sum();

    let mut output = String::new();
    let report_date = generated_at.format("%Y-%m-%d %H:%M:%S");

    let _ = writeln!(output, "# Grade Report - {}", student_name);
    let _ = writeln!(output, "Report date: {}", report_date);
    let _ = writeln!(output);
    let _ = writeln!(output, "## Summary");
    let _ = writeln!(output, "- Total classes: {}", overview.summary.total_classes);
    let _ = writeln!(output, "- Meeting expectations: {}", meeting.len());
    let _ = writeln!(output, "- Needs attention: {}", attention.len());
    let _ = writeln!(output, "- Missing assignments: {}", total_missing);

    if !overview.missing_work.is_empty() {
        let _ = writeln!(output);
        let _ = writeln!(
            output,
            "## Missing Assignments ({})",
            overview.missing_work.len()
        );
        for item in overview.missing_work.iter() {
            let _ = writeln!(
                output,
                "- **{}** ({}), due {}",
                item.assignment_name, item.class_name, item.due_date
            );
        }
    }

    if !attention.is_empty() {
        let _ = writeln!(output);
        let _ = writeln!(output, "## Classes Needing Attention");
        for class in attention.iter() {
            let _ = writeln!(output, "- **{}** - {}", class.name, class.status.label());
        }
    }

    for detail in details {
        let _ = writeln!(output);
        write_class_detail(&mut output, detail);
    }

    if !meeting.is_empty() {
        let _ = writeln!(output);
        let _ = writeln!(output, "## Classes Meeting Expectations");
        for class in meeting.iter() {
            let _ = writeln!(output, "- {}", class.name);
        }
    }

    output
}

fn write_class_detail(output: &mut String, detail: &ClassDetail) {
    let _ = writeln!(output, "## {}", detail.class_name);
    if detail.missing_assignments_total > 0 {
        let _ = writeln!(
            output,
            "Missing assignments: {}",
            detail.missing_assignments_total
        );
    }

    // Depth-first with an explicit stack; nodes without problems hide their subtree.
    let mut stack: Vec<(&Standard, usize)> =
        detail.standards.iter().rev().map(|s| (s, 0)).collect();
    while let Some((standard, depth)) = stack.pop() {
        if !standard.needs_review() {
            continue;
        }

        let indent = "  ".repeat(depth);
        let _ = writeln!(
            output,
            "{}- **{}**: {}",
            indent,
            standard.name,
            display_or(&standard.score_raw, "no score")
        );

        for assignment in standard.assignments.iter().filter(|a| is_reportable(a)) {
            let _ = writeln!(
                output,
                "{}  - {} (due {}): {}{}",
                indent,
                assignment.name,
                display_or(&assignment.due_date, "no date"),
                display_or(&assignment.grade_raw, "Not Graded"),
                assignment_marker(assignment)
            );
        }

        stack.extend(standard.children.iter().rev().map(|child| (child, depth + 1)));
    }
}

fn assignment_marker(assignment: &Assignment) -> &'static str {
    if assignment.is_missing {
        " [MISSING]"
    } else if assignment.grade_numeric > 0.0 && assignment.grade_numeric < VERY_LOW_SCORE {
        " [LOW]"
    } else {
        ""
    }
}

fn display_or<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.is_empty() {
        fallback
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ClassStatus, MissingWorkItem};
    use chrono::NaiveDate;

    fn generated_at() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 9, 15)
            .and_then(|d| d.and_hms_opt(7, 30, 0))
            .expect("valid timestamp")
    }

    fn class(name: &str, status: ClassStatus) -> ClassSummary {
        ClassSummary {
            name: name.to_string(),
            instructor: "Unknown".to_string(),
            status,
            status_code: 0,
            targets_meeting: 0,
            targets_not_meeting: 0,
            total_targets: 0,
            class_id: None,
            cgp_id: None,
        }
    }

    fn assignment(name: &str, grade_raw: &str, grade_numeric: f64, is_missing: bool) -> Assignment {
        Assignment {
            name: name.to_string(),
            due_date: "9/1/2025".to_string(),
            grade_raw: grade_raw.to_string(),
            grade_numeric,
            is_missing,
            ..Default::default()
        }
    }

    #[test]
    fn subject_carries_student_and_date() {
        assert_eq!(
            report_subject("Sam", generated_at()),
            "Grade Update: Sam - 2025-09-15"
        );
    }

    #[test]
    fn reportable_assignments_follow_rules() {
        assert!(is_reportable(&assignment("a", "Missing", 0.0, true)));
        assert!(is_reportable(&assignment("b", "2.5=P", 2.5, false)));
        assert!(is_reportable(&assignment("c", "", 0.0, false)));
        assert!(is_reportable(&assignment("d", "Excused", 0.0, false)));
        assert!(!is_reportable(&assignment("e", "3.5=M", 3.5, false)));
    }

    #[test]
    fn report_lists_sections() {
        let overview = GradeOverview::new(
            vec![
                class("Math 7", ClassStatus::Meeting),
                class("French 7", ClassStatus::NeedsAttention),
            ],
            vec![MissingWorkItem {
                due_date: "9/11/2025 11:59 PM".to_string(),
                class_name: "French 7".to_string(),
                assignment_name: "Gimkit - avoir".to_string(),
            }],
        );

        let child = Standard {
            name: "Vocabulary".to_string(),
            score_raw: "1.5=B".to_string(),
            score_numeric: 1.5,
            score_letter: "B".to_string(),
            assignments: vec![
                assignment("Gimkit - avoir", "Missing", 0.0, true),
                assignment("Quiz", "3.5=M", 3.5, false),
            ],
            missing_count: 1,
            ..Default::default()
        };
        let root = Standard {
            name: "Speaking".to_string(),
            score_raw: "2.0=P".to_string(),
            children: vec![child],
            missing_count: 1,
            ..Default::default()
        };
        let meeting_root = Standard {
            name: "Listening".to_string(),
            score_raw: "3.2=M".to_string(),
            is_meeting: true,
            ..Default::default()
        };
        let details = vec![ClassDetail::new("French 7", vec![root, meeting_root])];

        let report = build_report("Sam", generated_at(), &overview, &details);

        assert!(report.contains("# Grade Report - Sam"));
        assert!(report.contains("Report date: 2025-09-15 07:30:00"));
        assert!(report.contains("- Needs attention: 1"));
        assert!(report.contains("- Missing assignments: 1"));
        assert!(report.contains("- **Gimkit - avoir** (French 7), due 9/11/2025 11:59 PM"));
        assert!(report.contains("- **French 7** - Needs Attention"));
        assert!(report.contains("- **Speaking**: 2.0=P"));
        assert!(report.contains("  - **Vocabulary**: 1.5=B"));
        assert!(report.contains("Gimkit - avoir (due 9/1/2025): Missing [MISSING]"));
        assert!(!report.contains("Quiz"));
        assert!(!report.contains("Listening"));
        assert!(report.contains("## Classes Meeting Expectations\n- Math 7"));
    }

    #[test]
    fn empty_overview_still_renders() {
        let report = build_report("Sam", generated_at(), &GradeOverview::default(), &[]);
        assert!(report.contains("- Total classes: 0"));
        assert!(!report.contains("## Missing Assignments"));
    }
}
