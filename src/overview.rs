use serde_json::Value;
use tracing::info;

use crate::extract::{extract_embedded_records, RawRecord};
use crate::missing_work::scan_missing_work;
use crate::models::{ClassStatus, ClassSummary, GradeOverview};

const UNKNOWN_CLASS: &str = "Unknown Class";
const UNKNOWN_INSTRUCTOR: &str = "Unknown";

/// Parses a rendered overview page. Never fails; sparse pages give sparse results.
///
/// The class records and the missing-work list come from independent parts of
/// the page and are only combined here.
pub fn parse_overview(page: &str) -> GradeOverview {
    let records = extract_embedded_records(page);
    let classes = reduce_classes(&records);
    let missing_work = scan_missing_work(page);

    let overview = GradeOverview::new(classes, missing_work);
    let summary = &overview.summary;
    info!(
        "parsed overview: {} classes, {} meeting, {} need attention, {} missing assignments",
        summary.total_classes,
        summary.meeting_expectations,
        summary.needs_attention,
        summary.missing_count
    );
    overview
}

pub fn reduce_classes(records: &[RawRecord]) -> Vec<ClassSummary> {
    records.iter().map(summarize_class).collect()
}

pub fn summarize_class(record: &RawRecord) -> ClassSummary {
    let name = record
        .get("ClassDescription")
        .and_then(Value::as_str)
        .unwrap_or(UNKNOWN_CLASS)
        .to_string();

    let instructor = record
        .get("InstructorDescription")
        .and_then(Value::as_array)
        .and_then(|list| list.first())
        .and_then(Value::as_str)
        .unwrap_or(UNKNOWN_INSTRUCTOR)
        .to_string();

    let status_code = record
        .get("GradeStatus")
        .and_then(|status| status.get("Status"))
        .and_then(integral_i64)
        .unwrap_or(0);

    let progress = record.get("Progress");
    let progress_count = |key: &str| {
        progress
            .and_then(|p| p.get(key))
            .and_then(integral_u64)
            .unwrap_or(0)
    };

    ClassSummary {
        name,
        instructor,
        status: ClassStatus::from_code(status_code),
        status_code,
        targets_meeting: progress_count("LearningTargetsMeeting"),
        targets_not_meeting: progress_count("LearningTargetsNotMeeting"),
        total_targets: progress_count("TotalLeafLearningTargets"),
        class_id: passthrough_id(record.get("ClassID")),
        cgp_id: passthrough_id(record.get("CurrentCGPID")),
    }
}

/// Whole numbers, including ones written as floats (`2.0`). Fractions and
/// non-numbers give `None`.
fn integral_i64(value: &Value) -> Option<i64> {
    if let Some(n) = value.as_i64() {
        return Some(n);
    }
    value
        .as_f64()
        .filter(|f| f.fract() == 0.0 && *f >= i64::MIN as f64 && *f < i64::MAX as f64)
        .map(|f| f as i64)
}

fn integral_u64(value: &Value) -> Option<u64> {
    if let Some(n) = value.as_u64() {
        return Some(n);
    }
    value
        .as_f64()
        .filter(|f| f.fract() == 0.0 && *f >= 0.0 && *f < u64::MAX as f64)
        .map(|f| f as u64)
}

/// Identifiers arrive as numbers or strings; empty, zero or null count as absent.
fn passthrough_id(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) if n.as_f64() != Some(0.0) => Some(n.to_string()),
        _ => None,
    }
}
