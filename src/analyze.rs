use crate::entropy::aggregate_entropy;
use crate::error::Result;
use crate::git::{ClonedRepo, GitRepo};
use crate::model::{RepoAnalysis, SCHEMA_VERSION};
use crate::util::{days_between, iso_date};
use anyhow::Context;
use console::style;
use tracing::info;

pub fn exec(url: &str, json: bool) -> anyhow::Result<()> {
    let analysis = analyze_remote(url).with_context(|| format!("Failed to analyze {url}"))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&analysis)?);
    } else {
        output_summary(&analysis);
    }
    Ok(())
}

/// Clone `url` into a scoped temporary directory and summarize its history.
pub fn analyze_remote(url: &str) -> Result<RepoAnalysis> {
    let cloned = ClonedRepo::fetch(url)?;
    analyze_repo(cloned.repo(), url)
}

/// Entropy between the first and most recent commit, plus the span between them.
pub fn analyze_repo(repo: &GitRepo, label: &str) -> Result<RepoAnalysis> {
    let (first, latest) = repo.history_bounds()?;
    let (files, counts) = repo.range_changes(&first.id, &latest.id)?;
    let score = aggregate_entropy(&counts, &files);
    info!(repository = label, files = files.len(), score, "analysis complete");

    Ok(RepoAnalysis {
        version: SCHEMA_VERSION,
        repository_url: label.to_string(),
        total_normalized_entropy: score,
        first_commit_date: iso_date(&first.timestamp),
        most_recent_commit_date: iso_date(&latest.timestamp),
        time_of_existence_days: days_between(&first.timestamp, &latest.timestamp),
    })
}

fn output_summary(analysis: &RepoAnalysis) {
    println!("{}", style("Repository Analysis").bold());
    println!("{}", "─".repeat(50));
    println!("Repository URL: {}", analysis.repository_url);
    println!(
        "Total Normalized Entropy: {}",
        style(format!("{:.4}", analysis.total_normalized_entropy)).yellow()
    );
    println!("First commit: {}", style(&analysis.first_commit_date).dim());
    println!("Most recent commit: {}", style(&analysis.most_recent_commit_date).dim());
    println!("Time of existence: {} days", style(analysis.time_of_existence_days).cyan());
}
