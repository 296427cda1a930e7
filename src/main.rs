use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use tokio::task::JoinSet;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use grade_digest::config::{self, Settings, DEFAULT_REPORT_DIR, DEFAULT_STUDENT_NAME};
use grade_digest::{export, parse_class_detail, parse_overview, report, ClassDetail, GradeOverview};

#[derive(Parser)]
#[command(name = "grade-digest")]
#[command(about = "Turns saved gradebook pages into a grade report", long_about = None)]
struct Cli {
    /// Log filter used when RUST_LOG is not set
    #[arg(long, env = "LOG_LEVEL", default_value = "info", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a saved overview page
    Overview {
        #[arg(long)]
        page: PathBuf,
        #[arg(long)]
        json: bool,
    },
    /// Parse a saved class detail page
    Detail {
        #[arg(long)]
        page: PathBuf,
        #[arg(long = "class")]
        class_name: String,
        #[arg(long)]
        json: bool,
    },
    /// Parse the overview and the detail pages of classes needing attention, then write a report
    Report {
        #[arg(long)]
        overview: PathBuf,
        /// Directory holding `<classId>_<cgpId>.html` detail pages
        #[arg(long)]
        details: PathBuf,
        #[arg(long)]
        out: Option<PathBuf>,
        #[arg(long, env = "STUDENT_NAME", default_value = DEFAULT_STUDENT_NAME)]
        student: String,
        #[arg(long, env = "REPORT_DIR", default_value = DEFAULT_REPORT_DIR)]
        report_dir: PathBuf,
    },
    /// Write the overview classes (and optionally missing work) as CSV
    Export {
        #[arg(long)]
        overview: PathBuf,
        #[arg(long)]
        classes: PathBuf,
        #[arg(long)]
        missing: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    match cli.command {
        Commands::Overview { page, json } => {
            let overview = parse_overview(&read_page(&page).await?);
            if json {
                println!("{}", serde_json::to_string_pretty(&overview)?);
            } else {
                print_overview(&overview);
            }
        }
        Commands::Detail {
            page,
            class_name,
            json,
        } => {
            let detail = parse_class_detail(&read_page(&page).await?, &class_name);
            if json {
                println!("{}", serde_json::to_string_pretty(&detail)?);
            } else {
                print_detail(&detail);
            }
        }
        Commands::Report {
            overview,
            details,
            out,
            student,
            report_dir,
        } => {
            let settings = Settings {
                student_name: student,
                report_dir,
            };
            let overview = parse_overview(&read_page(&overview).await?);
            let class_details = parse_attention_details(&overview, &details).await?;

            let generated_at = chrono::Local::now().naive_local();
            let body = report::build_report(
                &settings.student_name,
                generated_at,
                &overview,
                &class_details,
            );
            let out = out.unwrap_or_else(|| settings.report_path(generated_at));
            if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
                tokio::fs::create_dir_all(parent)
                    .await
                    .with_context(|| format!("failed to create {}", parent.display()))?;
            }
            tokio::fs::write(&out, body)
                .await
                .with_context(|| format!("failed to write {}", out.display()))?;

            info!(
                "{}",
                report::report_subject(&settings.student_name, generated_at)
            );
            println!(
                "Report written to {} ({} classes, {} detailed).",
                out.display(),
                overview.summary.total_classes,
                class_details.len()
            );
        }
        Commands::Export {
            overview,
            classes,
            missing,
        } => {
            let overview = parse_overview(&read_page(&overview).await?);
            let written = export::export_classes(&classes, &overview.classes)?;
            println!("Wrote {written} classes to {}.", classes.display());
            if let Some(missing) = missing {
                let written = export::export_missing_work(&missing, &overview.missing_work)?;
                println!("Wrote {written} missing items to {}.", missing.display());
            }
        }
    }

    Ok(())
}

fn init_tracing(default_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn read_page(path: &Path) -> anyhow::Result<String> {
    tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read page {}", path.display()))
}

/// Parses detail pages of every class needing attention, in overview order.
///
/// Classes without identifiers or without a saved page are skipped.
async fn parse_attention_details(
    overview: &GradeOverview,
    details_dir: &Path,
) -> anyhow::Result<Vec<ClassDetail>> {
    let mut tasks = JoinSet::new();

    for (position, class) in overview.classes_needing_attention().enumerate() {
        let Some(key) = class.detail_key() else {
            warn!("missing or unusable ClassID/CGPID for {}, skipping", class.name);
            continue;
        };

        let path = config::detail_page_path(details_dir, &key);
        let page = match tokio::fs::read_to_string(&path).await {
            Ok(page) => page,
            Err(err) => {
                warn!("no detail page for {} at {}: {err}", class.name, path.display());
                continue;
            }
        };

        info!(
            "parsing details for {} (ClassID={}, CGPID={})",
            class.name, key.class_id, key.cgp_id
        );
        let class_name = class.name.clone();
        tasks.spawn_blocking(move || (position, parse_class_detail(&page, &class_name)));
    }

    let mut parsed = Vec::with_capacity(tasks.len());
    while let Some(result) = tasks.join_next().await {
        parsed.push(result.context("detail parse task failed")?);
    }
    parsed.sort_by_key(|(position, _)| *position);

    Ok(parsed.into_iter().map(|(_, detail)| detail).collect())
}

fn print_overview(overview: &GradeOverview) {
    let summary = &overview.summary;
    println!(
        "{} classes: {} meeting, {} need attention, {} not assessed",
        summary.total_classes,
        summary.meeting_expectations,
        summary.needs_attention,
        summary.not_assessed
    );
    println!(
        "Targets: {} meeting, {} not meeting",
        summary.total_targets_meeting, summary.total_targets_not_meeting
    );

    for class in overview.classes.iter() {
        println!(
            "- {} ({}) {} [{}/{} targets]",
            class.name,
            class.instructor,
            class.status.label(),
            class.targets_meeting,
            class.total_targets
        );
    }

    if overview.missing_work.is_empty() {
        println!("No missing work found.");
        return;
    }

    println!("Missing work ({}):", summary.missing_count);
    for item in overview.missing_work.iter() {
        println!(
            "- {} ({}), due {}",
            item.assignment_name, item.class_name, item.due_date
        );
    }
}

fn print_detail(detail: &ClassDetail) {
    println!(
        "{}: {} standards, {} missing, {} low scores",
        detail.class_name,
        detail.standards.len(),
        detail.missing_assignments_total,
        detail.low_score_total
    );

    let mut stack: Vec<_> = detail.standards.iter().rev().map(|s| (s, 0usize)).collect();
    while let Some((standard, depth)) = stack.pop() {
        println!(
            "{}- {} {} (missing {}, low {})",
            "  ".repeat(depth),
            standard.name,
            standard.score_raw,
            standard.missing_count,
            standard.low_score_count
        );
        stack.extend(standard.children.iter().rev().map(|child| (child, depth + 1)));
    }
}
