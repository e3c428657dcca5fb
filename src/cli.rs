use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "almanack")]
#[command(about = "Software gardening health signals from git history")]
#[command(version)]
pub struct Cli {
    #[clap(flatten)]
    pub common: CommonArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Clone)]
pub struct CommonArgs {
    #[arg(long, global = true, help = "Path to git repository")]
    pub repo: Option<PathBuf>,

    #[arg(short, long, global = true, help = "Log progress details to stderr")]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Normalized entropy of the changes between two commits of a local repository
    Entropy {
        #[arg(long, help = "Source commit (defaults to the first commit)")]
        source: Option<String>,

        #[arg(long, help = "Target commit (defaults to HEAD)")]
        target: Option<String>,

        #[arg(long, help = "Include per-file entropy")]
        files: bool,

        #[arg(long, help = "Output as JSON")]
        json: bool,

        #[arg(long, help = "Output as NDJSON")]
        ndjson: bool,

        #[arg(long, help = "Also write the JSON report to this file")]
        output: Option<PathBuf>,
    },
    /// Clone a remote repository and summarize its entropy and lifetime
    Analyze {
        #[arg(help = "URL of the repository to clone")]
        url: String,

        #[arg(long, help = "Output as JSON")]
        json: bool,
    },
}

impl Cli {
    pub fn execute(self) -> Result<()> {
        crate::logging::init(self.common.verbose)?;

        match self.command {
            Commands::Entropy { source, target, files, json, ndjson, output } => {
                let opts = crate::score::ScoreOptions {
                    source,
                    target,
                    files,
                    json,
                    ndjson,
                    output,
                };
                crate::score::exec(self.common, opts)
            }
            Commands::Analyze { url, json } => crate::analyze::exec(&url, json),
        }
    }
}
