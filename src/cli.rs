use std::{fs, path::PathBuf, str::FromStr};

use anyhow::Context;
use clap::{ArgAction, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase log verbosity (-v for info, -vv for debug). `RUST_LOG` takes precedence.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Detect the issuing platform of one or more certificate URLs
    Classify {
        #[arg(value_name = "SRC", required = true)]
        from: Vec<Source>,
    },
    /// Fetch the metadata of one or more certificates
    Fetch {
        #[arg(value_name = "SRC", required = true)]
        from: Vec<Source>,

        /// Seconds before a request is abandoned
        #[arg(long, env = "CREDFETCH_TIMEOUT", default_value_t = 10)]
        timeout: u64,

        /// Browser user agent sent with certificate page requests
        #[arg(long, env = "CREDFETCH_USER_AGENT")]
        user_agent: Option<String>,

        /// Maximum number of certificates fetched at once
        #[arg(short, long, env = "CREDFETCH_JOBS", default_value_t = 8,
              value_parser = clap::value_parser!(u16).range(1..))]
        jobs: u16,
    },
}

#[derive(Clone, Debug)]
/// Defines where we can get certificate URLs from, which can either be
///
/// - a single URL, or
/// - a file listing one URL per line.
///
/// The latter will be treated as a list of the former.
pub enum Source {
    Url(String),
    File(PathBuf),
}

impl FromStr for Source {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Is this a path?
        if let Ok(path) = fs::canonicalize(s) {
            Ok(Source::File(path))
        }
        // No? Must be a URL then! Validation happens in the classifier.
        else {
            Ok(Source::Url(s.to_string()))
        }
    }
}

impl Source {
    /// The URLs this source stands for. Blank lines and `#` comments in files are skipped.
    pub fn urls(&self) -> anyhow::Result<Vec<String>> {
        match self {
            Source::Url(u) => Ok(vec![u.clone()]),
            Source::File(path) => {
                let text = fs::read_to_string(path)
                    .with_context(|| format!("failed to read URL list {}", path.display()))?;
                Ok(text
                    .lines()
                    .map(str::trim)
                    .filter(|l| !l.is_empty() && !l.starts_with('#'))
                    .map(str::to_string)
                    .collect())
            }
        }
    }
}

/// Flatten all sources into one ordered list of URLs.
pub fn collect_urls(sources: &[Source]) -> anyhow::Result<Vec<String>> {
    let mut out = Vec::new();
    for s in sources {
        out.extend(s.urls()?);
    }
    Ok(out)
}
