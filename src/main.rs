use std::{
    sync::atomic::{AtomicUsize, Ordering},
    time::Duration,
};

use anyhow::Context;
use clap::Parser;
use credfetch::{FetchConfig, Fetcher, classify, provider::unknown_platform_help};
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command, collect_urls};

mod cli;

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();
    init_tracing(args.verbose);

    match args.command {
        Command::Classify { from } => {
            for url in collect_urls(&from)? {
                classify_one(&url)?;
            }
        }
        Command::Fetch {
            from,
            timeout,
            user_agent,
            jobs,
        } => {
            let mut config = FetchConfig {
                timeout: Duration::from_secs(timeout),
                ..FetchConfig::default()
            };
            if let Some(ua) = user_agent {
                config.browser_user_agent = ua;
            }
            fetch_all(&Fetcher::new(config), &collect_urls(&from)?, jobs.into())?;
        }
    }
    Ok(())
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn classify_one(url: &str) -> anyhow::Result<()> {
    let parsed = classify(url);
    println!("{}", serde_json::to_string_pretty(&parsed)?);
    if !parsed.is_valid {
        eprintln!("{} not a valid URL: {}", "✗".red(), url.trim());
    } else if let Some(provider) = parsed.provider() {
        if let Some(kind) = parsed.platform.as_ref().and_then(|p| p.certificate_type) {
            eprintln!("{} {}", provider, kind.display_name());
        }
        if let Some(help) = provider.help_message() {
            eprintln!("{help}");
        }
    } else {
        eprintln!("{}", unknown_platform_help());
    }
    Ok(())
}

fn fetch_all(fetcher: &Fetcher, urls: &[String], jobs: usize) -> anyhow::Result<()> {
    let bar = ProgressBar::new(urls.len() as u64);
    bar.set_style(ProgressStyle::with_template("{spinner} {pos}/{len} {wide_msg}")?);

    let results = in_parallel(urls, jobs, |url| {
        let parsed = classify(url);
        let res = fetcher.fetch_parsed(&parsed);
        bar.inc(1);
        (parsed, res)
    })?;
    bar.finish_and_clear();

    let (mut ok, mut failed) = (0usize, 0usize);
    for (parsed, res) in results {
        match res {
            Ok(metadata) => {
                ok += 1;
                let platform = parsed.platform.as_ref().map(|p| p.name.as_str());
                let out = serde_json::json!({
                    "url": parsed.original_url,
                    "platform": platform,
                    "metadata": metadata,
                });
                println!("{}", serde_json::to_string_pretty(&out)?);
            }
            Err(e) => {
                failed += 1;
                eprintln!("{} {}: {}", "✗".red(), parsed.original_url.trim(), e);
                if let Some(help) = parsed.provider().and_then(|p| p.help_message()) {
                    eprintln!("  {help}");
                }
            }
        }
    }
    eprintln!("{} {}  {} {}", "✓".green(), ok, "✗".red(), failed);
    Ok(())
}

/// Map `f` over `items` on at most `jobs` scoped worker threads. Results come back in input
/// order.
fn in_parallel<T, R, F>(items: &[T], jobs: usize, f: F) -> anyhow::Result<Vec<R>>
where
    T: Sync,
    R: Send,
    F: Fn(&T) -> R + Sync,
{
    let next = AtomicUsize::new(0);
    let workers = jobs.clamp(1, items.len().max(1));
    let (next, f) = (&next, &f);

    let mut indexed = std::thread::scope(|s| -> anyhow::Result<Vec<(usize, R)>> {
        let mut handles = Vec::with_capacity(workers);
        for n in 0..workers {
            let handle = std::thread::Builder::new()
                .name(format!("fetch-{n}"))
                .spawn_scoped(s, move || {
                    let mut done = Vec::new();
                    loop {
                        let i = next.fetch_add(1, Ordering::Relaxed);
                        let Some(item) = items.get(i) else { break };
                        done.push((i, f(item)));
                    }
                    done
                })
                .context("failed to start fetch worker")?;
            handles.push(handle);
        }
        let mut out = Vec::with_capacity(items.len());
        for h in handles {
            out.extend(h.join().map_err(|_| anyhow::anyhow!("fetch worker panicked"))?);
        }
        Ok(out)
    })?;
    indexed.sort_unstable_by_key(|(i, _)| *i);
    Ok(indexed.into_iter().map(|(_, r)| r).collect())
}

#[cfg(test)]
mod tests {
    use std::{collections::HashSet, sync::Mutex, thread, time::Duration};

    use super::*;

    #[test]
    fn in_parallel_keeps_input_order() {
        let items: Vec<u64> = (0..50).collect();
        let out = in_parallel(&items, 4, |n| {
            thread::sleep(Duration::from_millis(50 - n));
            n * 2
        })
        .unwrap();
        assert_eq!(out, items.iter().map(|n| n * 2).collect::<Vec<_>>());
    }

    #[test]
    fn in_parallel_never_exceeds_jobs() {
        let items: Vec<u32> = (0..40).collect();
        let threads = Mutex::new(HashSet::new());
        in_parallel(&items, 3, |_| {
            threads.lock().unwrap().insert(thread::current().id());
            thread::sleep(Duration::from_millis(5));
        })
        .unwrap();
        let used = threads.lock().unwrap().len();
        assert!((1..=3).contains(&used), "used {used} threads");
    }

    #[test]
    fn in_parallel_handles_empty_input_and_zero_jobs() {
        let none: Vec<u8> = Vec::new();
        assert!(in_parallel(&none, 8, |b| *b).unwrap().is_empty());
        assert_eq!(in_parallel(&[1u8, 2], 0, |b| *b + 1).unwrap(), vec![2, 3]);
    }
}
