use crate::cli::CommonArgs;
use crate::entropy::{aggregate_entropy, per_file_entropy};
use crate::error::Result;
use crate::git::GitRepo;
use crate::model::{EntropyReport, FileEntropyEntry, SCHEMA_VERSION};
use anyhow::Context;
use chrono::Utc;
use console::style;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub struct ScoreOptions {
    pub source: Option<String>,
    pub target: Option<String>,
    pub files: bool,
    pub json: bool,
    pub ndjson: bool,
    pub output: Option<PathBuf>,
}

pub fn exec(common: CommonArgs, opts: ScoreOptions) -> anyhow::Result<()> {
    let repo = GitRepo::open(common.repo.as_ref()).context("Failed to open git repository")?;

    let report = compute_report(&repo, opts.source.as_deref(), opts.target.as_deref(), opts.files || opts.ndjson)
        .context("Failed to compute repository entropy")?;

    if let Some(path) = &opts.output {
        save_json(&report, path)
            .with_context(|| format!("Failed to write report to {}", path.display()))?;
        info!(path = %path.display(), "report saved");
    }

    if opts.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else if opts.ndjson {
        output_ndjson(&report)?;
    } else {
        output_report(&report, opts.files);
    }

    Ok(())
}

/// Score `source..target`, defaulting to the whole history reachable from HEAD.
pub fn compute_report(
    repo: &GitRepo,
    source: Option<&str>,
    target: Option<&str>,
    with_files: bool,
) -> Result<EntropyReport> {
    let (source, target) = match (source, target) {
        (Some(s), Some(t)) => (repo.resolve_commit(s)?, repo.resolve_commit(t)?),
        (s, t) => {
            let (first, head) = repo.history_bounds()?;
            let source = match s {
                Some(s) => repo.resolve_commit(s)?,
                None => first,
            };
            let target = match t {
                Some(t) => repo.resolve_commit(t)?,
                None => head,
            };
            (source, target)
        }
    };
    debug!(source = %source.id, target = %target.id, "scoring commit range");

    let (files, counts) = repo.range_changes(&source.id, &target.id)?;
    let counts = counts.covering(&files);
    let score = aggregate_entropy(&counts, &files);

    let entries = if with_files {
        per_file_entropy(&counts)
            .into_iter()
            .map(|(path, entropy)| FileEntropyEntry {
                changed_lines: counts.get(&path),
                path,
                entropy,
            })
            .collect()
    } else {
        Vec::new()
    };

    Ok(EntropyReport {
        version: SCHEMA_VERSION,
        generated_at: Utc::now(),
        repo_path: repo.path().to_string_lossy().to_string(),
        source_commit: source.id,
        target_commit: target.id,
        file_count: files.len(),
        total_normalized_entropy: score,
        files: entries,
    })
}

pub fn save_json(report: &EntropyReport, path: &Path) -> Result<()> {
    let body = serde_json::to_string_pretty(report)?;
    std::fs::write(path, body)?;
    Ok(())
}

fn output_ndjson(report: &EntropyReport) -> anyhow::Result<()> {
    for e in &report.files {
        println!("{}", serde_json::to_string(e)?);
    }
    Ok(())
}

fn output_report(report: &EntropyReport, with_files: bool) {
    let border = "=".repeat(50);
    let separator = "-".repeat(50);

    println!("{border}");
    println!("{}", style(format!("{:^50}", "Entropy Report")).bold());
    println!("{border}");
    println!("Repository Path: {}", report.repo_path);
    println!(
        "Commit Range: {}..{}",
        style(short_id(&report.source_commit)).dim(),
        style(short_id(&report.target_commit)).dim()
    );
    println!("Files Considered: {}", style(report.file_count).cyan());
    println!(
        "Total Repository Normalized Entropy: {}",
        style(format!("{:.4}", report.total_normalized_entropy)).yellow()
    );
    println!("{separator}");

    if with_files {
        let mut rows: Vec<_> = report.files.iter().collect();
        rows.sort_by(|a, b| b.entropy.total_cmp(&a.entropy).then_with(|| a.path.cmp(&b.path)));
        println!("{:<50} {:>8} {:>8}", style("Path").bold(), style("Lines").bold(), style("Entropy").bold());
        for e in rows.iter().take(50) {
            println!("{:<50} {:>8} {:>8.4}", e.path, e.changed_lines, e.entropy);
        }
        if rows.len() > 50 {
            println!("\n... and {} more files", rows.len() - 50);
        }
        println!("{separator}");
    }
    println!("{border}");
}

fn short_id(id: &str) -> &str {
    id.get(..8).unwrap_or(id)
}
