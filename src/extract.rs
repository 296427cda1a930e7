use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};
use tracing::{debug, error, info, warn};

/// One loosely-typed class record from the embedded data block.
pub type RawRecord = Map<String, Value>;

// The class list sits in a list-view initializer as `"data":{"Data":[...],"Total":N}`.
static EMBEDDED_DATA_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)"data":\{"Data":\[(.*?)\],"Total""#).expect("static regex must compile")
});

/// Pulls the embedded class array out of a rendered overview page.
///
/// Absent anchors and unparseable JSON both yield an empty list.
pub fn extract_embedded_records(page: &str) -> Vec<RawRecord> {
    let Some(captures) = EMBEDDED_DATA_RE.captures(page) else {
        warn!("embedded class data not found in page");
        return Vec::new();
    };

    let json = format!("[{}]", &captures[1]);
    let values: Vec<Value> = match serde_json::from_str(&json) {
        Ok(values) => values,
        Err(err) => {
            error!("failed to parse embedded class data: {err}");
            return Vec::new();
        }
    };

    let total = values.len();
    let records: Vec<RawRecord> = values
        .into_iter()
        .filter_map(|value| match value {
            Value::Object(record) => Some(record),
            other => {
                debug!("skipping non-object class record: {other}");
                None
            }
        })
        .collect();

    info!("extracted {} of {} embedded class records", records.len(), total);
    records
}
