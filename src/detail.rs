use scraper::{ElementRef, Html};
use tracing::{debug, info, warn};

use crate::assignment::parse_assignment_row;
use crate::classify::{is_low_score, is_meeting_letter, split_score};
use crate::dom::{self, Tag};
use crate::models::{ClassDetail, Standard};

const ROOT_LIST: Tag = Tag::with_class("ul", "root-standard-item");
const CHILD_LIST: Tag = Tag::with_class("ul", "standard-item");
const ITEM: Tag = Tag::new("li");
const DATA_BLOCK: Tag = Tag::with_class("div", "standard-item-data");
const DESCRIPTION: Tag = Tag::with_class("span", "standard-item-desc");
const SCORE: Tag = Tag::with_class("span", "standard-item-score-inner");
const ASSIGNMENT_CONTAINER: Tag = Tag::with_class("div", "divAsnContainer");
const ASSIGNMENT_TABLE: Tag = Tag::with_class("table", "assignmentTable");
const TABLE_BODY: Tag = Tag::new("tbody");
const ROW: Tag = Tag::new("tr");

/// Parses a class detail page into its standards tree.
///
/// `class_name` comes from the overview; the page itself is not trusted for it.
pub fn parse_class_detail(page: &str, class_name: &str) -> ClassDetail {
    let document = Html::parse_document(page);
    let root = document.root_element();

    let mut standards = Vec::new();
    let mut root_lists = 0usize;
    for list in dom::find_all(root, ROOT_LIST) {
        root_lists += 1;
        standards.extend(dom::children(list, ITEM).filter_map(build_standard_tree));
    }

    if root_lists == 0 {
        warn!("no root standards found for {class_name}");
    }

    let detail = ClassDetail::new(class_name, standards);
    info!(
        "parsed {}: {} standards, {} missing assignments, {} low scores",
        detail.class_name,
        detail.standards.len(),
        detail.missing_assignments_total,
        detail.low_score_total
    );
    detail
}

/// One accepted node while the tree is being collected.
struct PendingNode {
    standard: Standard,
    children: Vec<usize>,
}

/// Builds the standard rooted at `item` without recursing on the call stack.
///
/// Nodes are collected depth-first into a flat list where every child sits
/// after its parent, then folded back from the end so each node sees its
/// finished children. Invalid nodes are dropped with their whole subtree.
pub fn build_standard_tree(item: ElementRef<'_>) -> Option<Standard> {
    let mut nodes: Vec<PendingNode> = Vec::new();
    let mut stack: Vec<(ElementRef<'_>, Option<usize>)> = vec![(item, None)];

    while let Some((element, parent)) = stack.pop() {
        let Some(standard) = read_own_standard(element) else {
            debug!("skipping standard item without a data block");
            continue;
        };

        let index = nodes.len();
        nodes.push(PendingNode {
            standard,
            children: Vec::new(),
        });
        if let Some(parent) = parent {
            nodes[parent].children.push(index);
        }

        let child_items: Vec<ElementRef<'_>> = dom::children(element, CHILD_LIST)
            .flat_map(|list| dom::children(list, ITEM))
            .collect();
        stack.extend(child_items.into_iter().rev().map(|child| (child, Some(index))));
    }

    let mut finished: Vec<Option<Standard>> = Vec::with_capacity(nodes.len());
    finished.resize_with(nodes.len(), || None);

    for index in (0..nodes.len()).rev() {
        let children = std::mem::take(&mut nodes[index].children);
        let standard = &mut nodes[index].standard;
        for child_index in children {
            if let Some(child) = finished[child_index].take() {
                standard.missing_count += child.missing_count;
                standard.low_score_count += child.low_score_count;
                standard.children.push(child);
            }
        }
        finished[index] = Some(std::mem::take(standard));
    }

    finished.into_iter().next().flatten()
}

/// Reads name, score and directly attached assignments of one standard item.
/// Child standards are not touched here.
fn read_own_standard(item: ElementRef<'_>) -> Option<Standard> {
    let data = dom::find(item, DATA_BLOCK)?;
    let mut standard = Standard::default();

    if let Some(description) = dom::find(data, DESCRIPTION) {
        standard.name = dom::stripped_text(description);
    }

    if let Some(score) = dom::find(data, SCORE) {
        let text = dom::stripped_text(score);
        // Chart icons trail the score on a second line.
        let first_line = text.split('\n').next().unwrap_or_default().trim();
        standard.score_raw = first_line.to_string();

        let parts = split_score(&standard.score_raw);
        standard.is_meeting = is_meeting_letter(&parts.letter);
        standard.score_numeric = parts.numeric;
        standard.score_letter = parts.letter;
    }

    let rows = dom::find_child(item, ASSIGNMENT_CONTAINER)
        .and_then(|container| dom::find(container, ASSIGNMENT_TABLE))
        .and_then(|table| dom::find(table, TABLE_BODY))
        .map(|body| dom::find_all(body, ROW).collect::<Vec<_>>())
        .unwrap_or_default();

    for assignment in rows.into_iter().filter_map(parse_assignment_row) {
        if assignment.is_missing {
            standard.missing_count += 1;
        } else if is_low_score(assignment.is_missing, assignment.grade_numeric) {
            standard.low_score_count += 1;
        }
        standard.assignments.push(assignment);
    }

    Some(standard)
}
