//! Gradebook extraction: reduces a rendered overview page and per-class
//! detail pages into a normalized grade model, and renders a report from it.

pub mod assignment;
pub mod classify;
pub mod config;
pub mod detail;
pub mod dom;
pub mod export;
pub mod extract;
pub mod missing_work;
pub mod models;
pub mod overview;
pub mod report;

pub use detail::parse_class_detail;
pub use models::{
    Assignment, ClassDetail, ClassStatus, ClassSummary, DetailKey, GradeOverview, MissingWorkItem,
    OverviewSummary, Standard,
};
pub use overview::parse_overview;
