use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::models::MissingWorkItem;

/// Longest assignment name accepted before a match is treated as noise.
pub const MAX_ASSIGNMENT_CHARS: usize = 199;

// `<date> <time> <class name ending in digits> `, then the assignment text.
static ITEM_HEADER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"([0-9]{1,2}/[0-9]{1,2}/[0-9]{4})\s+([0-9]{1,2}:[0-9]{2}\s+[AP]M)\s+([A-Z][^<\n]+?[0-9]+)\s+",
    )
    .expect("static regex must compile")
});

static DATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[0-9]{1,2}/[0-9]{1,2}/[0-9]{4}").expect("static regex must compile")
});

/// Scans rendered page text for overdue items, in page order.
///
/// Best effort: the list has no structural anchor, so an item is any
/// date/time/class header followed by text that runs up to the next date,
/// the end of the line, or the next tag.
///
/// Stopping at a tag is deliberate: `Essay <b>draft</b>` yields an item named
/// `Essay` rather than no item, so trailing inline markup does not hide
/// an overdue assignment.
pub fn scan_missing_work(page: &str) -> Vec<MissingWorkItem> {
    let mut items = Vec::new();
    let mut pos = 0;

    while let Some(captures) = ITEM_HEADER_RE.captures_at(page, pos) {
        let Some(header) = captures.get(0) else {
            break;
        };
        let text_start = header.end();
        let segment = assignment_segment(&page[text_start..]);

        if segment.is_empty() {
            pos = advance_past(page, header.start());
            continue;
        }
        pos = text_start + segment.len();

        let assignment_name = segment.trim();
        let length = assignment_name.chars().count();
        if length == 0 || length > MAX_ASSIGNMENT_CHARS {
            debug!("discarding missing-work match of {length} chars");
            continue;
        }

        items.push(MissingWorkItem {
            due_date: format!("{} {}", &captures[1], &captures[2]),
            class_name: captures[3].trim().to_string(),
            assignment_name: assignment_name.to_string(),
        });
    }

    items
}

/// Assignment text: at least one character, stopping before the next date,
/// a newline, or a `<`.
fn assignment_segment(rest: &str) -> &str {
    let line_end = rest.find(['\n', '<']).unwrap_or(rest.len());
    let line = &rest[..line_end];

    let Some(first) = line.chars().next() else {
        return line;
    };
    match DATE_RE.find_at(line, first.len_utf8()) {
        Some(next_date) => &line[..next_date.start()],
        None => line,
    }
}

fn advance_past(page: &str, start: usize) -> usize {
    page[start..]
        .chars()
        .next()
        .map_or(page.len(), |c| start + c.len_utf8())
}
