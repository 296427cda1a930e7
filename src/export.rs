use std::io;
use std::path::Path;

use anyhow::Context;
use serde::Serialize;

use crate::models::{ClassSummary, MissingWorkItem};

#[derive(Serialize)]
struct ClassRow<'a> {
    name: &'a str,
    instructor: &'a str,
    status: &'static str,
    status_code: i64,
    targets_meeting: u64,
    targets_not_meeting: u64,
    total_targets: u64,
    class_id: Option<&'a str>,
    cgp_id: Option<&'a str>,
}

impl<'a> From<&'a ClassSummary> for ClassRow<'a> {
    fn from(class: &'a ClassSummary) -> Self {
        ClassRow {
            name: &class.name,
            instructor: &class.instructor,
            status: class.status.label(),
            status_code: class.status_code,
            targets_meeting: class.targets_meeting,
            targets_not_meeting: class.targets_not_meeting,
            total_targets: class.total_targets,
            class_id: class.class_id.as_deref(),
            cgp_id: class.cgp_id.as_deref(),
        }
    }
}

pub fn write_classes<W: io::Write>(writer: W, classes: &[ClassSummary]) -> anyhow::Result<usize> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for class in classes {
        csv_writer.serialize(ClassRow::from(class))?;
    }
    csv_writer.flush()?;
    Ok(classes.len())
}

pub fn write_missing_work<W: io::Write>(
    writer: W,
    items: &[MissingWorkItem],
) -> anyhow::Result<usize> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for item in items {
        csv_writer.serialize(item)?;
    }
    csv_writer.flush()?;
    Ok(items.len())
}

pub fn export_classes(path: &Path, classes: &[ClassSummary]) -> anyhow::Result<usize> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    write_classes(file, classes).with_context(|| format!("failed to write {}", path.display()))
}

pub fn export_missing_work(path: &Path, items: &[MissingWorkItem]) -> anyhow::Result<usize> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    write_missing_work(file, items).with_context(|| format!("failed to write {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ClassStatus;

    fn sample_class() -> ClassSummary {
        ClassSummary {
            name: "French 7".to_string(),
            instructor: "Mme Dubois".to_string(),
            status: ClassStatus::NeedsAttention,
            status_code: 2,
            targets_meeting: 3,
            targets_not_meeting: 2,
            total_targets: 5,
            class_id: Some("4411".to_string()),
            cgp_id: None,
        }
    }

    #[test]
    fn classes_have_header_and_label() {
        let mut buffer = Vec::new();
        let written = write_classes(&mut buffer, &[sample_class()]).expect("write csv");
        let text = String::from_utf8(buffer).expect("utf8");

        assert_eq!(written, 1);
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("name,instructor,status,status_code,targets_meeting,targets_not_meeting,total_targets,class_id,cgp_id")
        );
        assert_eq!(lines.next(), Some("French 7,Mme Dubois,Needs Attention,2,3,2,5,4411,"));
    }

    #[test]
    fn missing_work_round_trips_through_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("missing.csv");
        let items = vec![MissingWorkItem {
            due_date: "9/11/2025 11:59 PM".to_string(),
            class_name: "French 7".to_string(),
            assignment_name: "Gimkit - avoir".to_string(),
        }];

        assert_eq!(export_missing_work(&path, &items).expect("export"), 1);

        let mut reader = csv::Reader::from_path(&path).expect("open csv");
        let headers = reader.headers().expect("headers").clone();
        assert_eq!(
            headers.iter().collect::<Vec<_>>(),
            vec!["due_date", "class_name", "assignment_name"]
        );
        let first = reader.records().next().expect("one row").expect("valid row");
        assert_eq!(&first[2], "Gimkit - avoir");
    }
}
