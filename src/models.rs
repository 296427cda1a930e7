use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ClassStatus {
    NotAssessed,
    Meeting,
    NeedsAttention,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassSummary {
    pub name: String,
    pub instructor: String,
    pub status: ClassStatus,
    pub status_code: i64,
    pub targets_meeting: u64,
    pub targets_not_meeting: u64,
    pub total_targets: u64,
    pub class_id: Option<String>,
    pub cgp_id: Option<String>,
}

/// Identifiers the driver needs to address a class detail page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailKey {
    pub class_id: String,
    pub cgp_id: String,
}

impl ClassSummary {
    pub fn needs_attention(&self) -> bool {
        self.status == ClassStatus::NeedsAttention
    }

    /// `None` when either identifier is absent or could step outside a
    /// directory once used in a file name; such a class cannot be fetched.
    pub fn detail_key(&self) -> Option<DetailKey> {
        let class_id = self.class_id.as_deref().filter(|id| is_plain_id(id))?;
        let cgp_id = self.cgp_id.as_deref().filter(|id| is_plain_id(id))?;
        Some(DetailKey {
            class_id: class_id.to_string(),
            cgp_id: cgp_id.to_string(),
        })
    }
}

fn is_plain_id(id: &str) -> bool {
    !id.is_empty() && !id.contains(['/', '\\']) && !id.contains("..")
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MissingWorkItem {
    pub due_date: String,
    pub class_name: String,
    pub assignment_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OverviewSummary {
    pub total_classes: usize,
    pub meeting_expectations: usize,
    pub needs_attention: usize,
    pub not_assessed: usize,
    pub total_targets_meeting: u64,
    pub total_targets_not_meeting: u64,
    pub missing_count: usize,
}

impl OverviewSummary {
    pub fn tally(classes: &[ClassSummary], missing_work: &[MissingWorkItem]) -> Self {
        let mut summary = OverviewSummary {
            total_classes: classes.len(),
            missing_count: missing_work.len(),
            ..Default::default()
        };

        for class in classes {
            match class.status {
                ClassStatus::Meeting => summary.meeting_expectations += 1,
                ClassStatus::NeedsAttention => summary.needs_attention += 1,
                ClassStatus::NotAssessed => summary.not_assessed += 1,
            }
            summary.total_targets_meeting =
                summary.total_targets_meeting.saturating_add(class.targets_meeting);
            summary.total_targets_not_meeting =
                summary.total_targets_not_meeting.saturating_add(class.targets_not_meeting);
        }

        summary
    }
}

/// Overview of every class plus the rendered missing-work list.
///
/// The counters in `summary` are derived from `classes` and `missing_work` at
/// construction and never updated on their own.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GradeOverview {
    pub classes: Vec<ClassSummary>,
    pub missing_work: Vec<MissingWorkItem>,
    pub summary: OverviewSummary,
}

impl GradeOverview {
    pub fn new(classes: Vec<ClassSummary>, missing_work: Vec<MissingWorkItem>) -> Self {
        let summary = OverviewSummary::tally(&classes, &missing_work);
        GradeOverview {
            classes,
            missing_work,
            summary,
        }
    }

    pub fn classes_needing_attention(&self) -> impl Iterator<Item = &ClassSummary> {
        self.classes.iter().filter(|class| class.needs_attention())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Assignment {
    pub due_date: String,
    pub name: String,
    pub weight: String,
    pub grade_raw: String,
    pub grade_numeric: f64,
    pub grade_letter: String,
    pub is_missing: bool,
    pub is_late: bool,
    pub feedback: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Standard {
    pub name: String,
    pub score_raw: String,
    pub score_numeric: f64,
    pub score_letter: String,
    pub is_meeting: bool,
    pub children: Vec<Standard>,
    pub assignments: Vec<Assignment>,
    pub missing_count: usize,
    pub low_score_count: usize,
}

impl Standard {
    pub fn needs_review(&self) -> bool {
        !self.is_meeting || self.missing_count > 0 || self.low_score_count > 0
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ClassDetail {
    pub class_name: String,
    pub standards: Vec<Standard>,
    pub missing_assignments_total: usize,
    pub low_score_total: usize,
}

impl ClassDetail {
    pub fn new(class_name: impl Into<String>, standards: Vec<Standard>) -> Self {
        let missing_assignments_total = standards.iter().map(|s| s.missing_count).sum();
        let low_score_total = standards.iter().map(|s| s.low_score_count).sum();
        ClassDetail {
            class_name: class_name.into(),
            standards,
            missing_assignments_total,
            low_score_total,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn class(status: ClassStatus, meeting: u64, not_meeting: u64) -> ClassSummary {
        ClassSummary {
            name: "Science 7".to_string(),
            instructor: "Ms. Rivera".to_string(),
            status,
            status_code: 0,
            targets_meeting: meeting,
            targets_not_meeting: not_meeting,
            total_targets: meeting.saturating_add(not_meeting),
            class_id: Some("101".to_string()),
            cgp_id: Some("9".to_string()),
        }
    }

    #[test]
    fn tally_counts_every_status_once() {
        let classes = vec![
            class(ClassStatus::Meeting, 4, 0),
            class(ClassStatus::NeedsAttention, 2, 3),
            class(ClassStatus::NotAssessed, 0, 0),
            class(ClassStatus::NeedsAttention, 1, 1),
        ];
        let overview = GradeOverview::new(classes, Vec::new());
        let s = &overview.summary;

        assert_eq!(s.total_classes, 4);
        assert_eq!(s.meeting_expectations + s.needs_attention + s.not_assessed, 4);
        assert_eq!(s.needs_attention, 2);
        assert_eq!(s.total_targets_meeting, 7);
        assert_eq!(s.total_targets_not_meeting, 4);
        assert_eq!(s.missing_count, 0);
        assert_eq!(overview.classes_needing_attention().count(), 2);
    }

    #[test]
    fn target_sums_saturate_instead_of_overflowing() {
        let classes = vec![
            class(ClassStatus::Meeting, u64::MAX, u64::MAX),
            class(ClassStatus::Meeting, 1, 5),
        ];
        let summary = OverviewSummary::tally(&classes, &[]);
        assert_eq!(summary.total_targets_meeting, u64::MAX);
        assert_eq!(summary.total_targets_not_meeting, u64::MAX);
        assert_eq!(summary.total_classes, 2);
    }

    #[test]
    fn detail_key_requires_both_identifiers() {
        let mut summary = class(ClassStatus::NeedsAttention, 0, 1);
        assert!(summary.detail_key().is_some());

        summary.cgp_id = None;
        assert_eq!(summary.detail_key(), None);
    }

    #[test]
    fn detail_key_rejects_path_like_identifiers() {
        for bad in ["../../x", "a/b", "a\\b", "..", ""] {
            let mut summary = class(ClassStatus::NeedsAttention, 0, 1);
            summary.class_id = Some(bad.to_string());
            assert_eq!(summary.detail_key(), None, "class id {bad:?}");

            let mut summary = class(ClassStatus::NeedsAttention, 0, 1);
            summary.cgp_id = Some(bad.to_string());
            assert_eq!(summary.detail_key(), None, "cgp id {bad:?}");
        }

        let summary = class(ClassStatus::NeedsAttention, 0, 1);
        assert_eq!(
            summary.detail_key(),
            Some(DetailKey {
                class_id: "101".to_string(),
                cgp_id: "9".to_string(),
            })
        );
    }

    #[test]
    fn class_detail_sums_root_counts() {
        let standards = vec![
            Standard {
                missing_count: 2,
                low_score_count: 1,
                ..Default::default()
            },
            Standard {
                missing_count: 1,
                ..Default::default()
            },
        ];
        let detail = ClassDetail::new("French 7", standards);
        assert_eq!(detail.missing_assignments_total, 3);
        assert_eq!(detail.low_score_total, 1);
    }
}
