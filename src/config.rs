use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;

use crate::models::DetailKey;

pub const DEFAULT_STUDENT_NAME: &str = "Student";
pub const DEFAULT_REPORT_DIR: &str = "reports";

/// Resolved settings for one report run.
#[derive(Debug, Clone)]
pub struct Settings {
    pub student_name: String,
    pub report_dir: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            student_name: DEFAULT_STUDENT_NAME.to_string(),
            report_dir: PathBuf::from(DEFAULT_REPORT_DIR),
        }
    }
}

impl Settings {
    pub fn report_path(&self, generated_at: NaiveDateTime) -> PathBuf {
        self.report_dir.join(format!(
            "grade_report_{}.md",
            generated_at.format("%Y%m%d_%H%M%S")
        ))
    }
}

/// Saved detail pages are named `<classId>_<cgpId>.html`.
pub fn detail_page_path(dir: &Path, key: &DetailKey) -> PathBuf {
    dir.join(format!("{}_{}.html", key.class_id, key.cgp_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn report_path_uses_timestamp() {
        let settings = Settings::default();
        let at = NaiveDate::from_ymd_opt(2025, 9, 15)
            .and_then(|d| d.and_hms_opt(18, 5, 9))
            .expect("valid timestamp");
        assert_eq!(
            settings.report_path(at),
            PathBuf::from("reports/grade_report_20250915_180509.md")
        );
    }

    #[test]
    fn detail_page_named_by_identifiers() {
        let key = DetailKey {
            class_id: "4411".to_string(),
            cgp_id: "87".to_string(),
        };
        assert_eq!(
            detail_page_path(Path::new("pages"), &key),
            PathBuf::from("pages/4411_87.html")
        );
    }
}
