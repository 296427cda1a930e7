use crate::models::ClassStatus;

/// Scores at or above this numeric value are at the "Meeting" level.
pub const MEETING_THRESHOLD: f64 = 3.0;

/// Letter grade that marks a standard as meeting, whatever its numeric value.
pub const MEETING_LETTER: &str = "M";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScoreParts {
    pub numeric: f64,
    pub letter: String,
}

impl ClassStatus {
    pub fn from_code(code: i64) -> Self {
        match code {
            1 => ClassStatus::Meeting,
            2 => ClassStatus::NeedsAttention,
            _ => ClassStatus::NotAssessed,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ClassStatus::Meeting => "Meeting",
            ClassStatus::NeedsAttention => "Needs Attention",
            ClassStatus::NotAssessed => "Not Assessed",
        }
    }
}

/// Splits a `"<number>=<letter>"` token such as `"2.35=P"`.
///
/// Returns the default (0, empty letter) when there is no `=` or the numeric
/// prefix does not parse.
pub fn split_score(text: &str) -> ScoreParts {
    let mut parts = text.split('=');
    let (Some(number), Some(letter)) = (parts.next(), parts.next()) else {
        return ScoreParts::default();
    };

    match number.trim().parse::<f64>() {
        Ok(numeric) => ScoreParts {
            numeric,
            letter: letter.to_string(),
        },
        Err(_) => ScoreParts::default(),
    }
}

pub fn is_meeting_letter(letter: &str) -> bool {
    letter == MEETING_LETTER
}

pub fn is_low_score(is_missing: bool, grade_numeric: f64) -> bool {
    !is_missing && grade_numeric > 0.0 && grade_numeric < MEETING_THRESHOLD
}
