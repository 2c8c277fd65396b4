//! Gridmark: Bootstrap grid layout grader CLI

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use gridmark::analyzer::GradingEngine;
use gridmark::cache::{config_fingerprint, GradeCache};
use gridmark::config::{build_ignore_set, is_ignored, load_config, Config, CONFIG_FILENAME};
use gridmark::history::{
    append_run, find_project_root, format_delta, load_history, previous_percentage, save_history,
};
use gridmark::reporter::{ConsoleReporter, JsonReporter};
use gridmark::watcher::PageWatcher;
use gridmark::GradeReport;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use walkdir::WalkDir;

/// Gridmark: layout grader for Bootstrap grid pages
#[derive(Parser, Debug)]
#[command(name = "gridmark")]
#[command(author, version, about, long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
struct Args {
    #[command(subcommand)]
    command: Option<Commands>,

    /// HTML file or directory to grade (omit when using a subcommand)
    path: Option<PathBuf>,

    /// Output format as JSON
    #[arg(long, short)]
    json: bool,

    /// Minimum passing percentage (exit 1 if any page falls below)
    #[arg(long, short)]
    threshold: Option<f64>,

    /// Quiet mode (one score line per page)
    #[arg(long, short)]
    quiet: bool,

    /// Verbose output (include matched markup excerpts)
    #[arg(long, short)]
    verbose: bool,

    /// Grade with the strict rule set
    #[arg(long)]
    strict: bool,

    /// Path to config file (default: search .gridmarkrc.json in current dir and parents)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Watch for page changes and re-grade
    #[arg(long)]
    watch: bool,

    /// Disable caching (re-grade all pages even if unchanged)
    #[arg(long)]
    no_cache: bool,

    /// Clear the grading cache before running
    #[arg(long)]
    clear_cache: bool,

    /// Grade pages in parallel (default for directories with many pages)
    #[arg(long)]
    parallel: bool,

    /// Number of parallel threads (default: number of CPU cores)
    #[arg(long, value_name = "N")]
    jobs: Option<usize>,

    /// Grade a page hosted at a URL (GitHub view URLs are rewritten to raw)
    #[cfg(feature = "fetch")]
    #[arg(long)]
    url: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create .gridmarkrc.json with sensible defaults
    Init {
        /// Minimum passing percentage (e.g. 70)
        #[arg(long)]
        threshold: Option<f64>,

        /// Start from the strict rule set
        #[arg(long)]
        strict: bool,

        /// Directory in which to create config (default: current)
        #[arg(long)]
        dir: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", "Error".red().bold(), e);
            ExitCode::from(2)
        }
    }
}

fn run() -> Result<ExitCode> {
    let args = Args::parse();

    if let Some(Commands::Init {
        threshold,
        strict,
        dir,
    }) = args.command
    {
        return run_init(threshold, strict, dir.as_deref());
    }

    #[cfg(feature = "fetch")]
    if let Some(ref url) = args.url {
        return run_url(&args, url);
    }

    let Some(path) = args.path.clone() else {
        anyhow::bail!("No input path provided (see --help)");
    };

    if args.watch {
        return run_watch(&args, &path);
    }

    // Resolve work directory for config search
    let work_dir = if path.is_file() {
        path.parent().unwrap_or(Path::new("."))
    } else {
        path.as_path()
    };

    // Load config (CLI flags override config file)
    let config =
        load_config(work_dir, args.config.as_deref())?.merge_with_cli(args.threshold, args.strict);

    // Build ignore set from config
    let ignore_set = if config.ignore.is_empty() {
        None
    } else {
        Some(build_ignore_set(&config.ignore)?)
    };

    let pages = collect_pages(&path, ignore_set.as_ref(), &config.get_page_patterns())?;
    if pages.is_empty() {
        eprintln!("{}: No HTML pages found", "Warning".yellow());
        return Ok(ExitCode::from(2));
    }

    // Set up cache
    let project_root = find_project_root(work_dir).unwrap_or_else(|| work_dir.to_path_buf());
    let mut cache = if args.no_cache {
        GradeCache::disabled()
    } else {
        GradeCache::new(&project_root, config_fingerprint(&config))
    };

    if args.clear_cache {
        cache.clear();
        if !args.quiet {
            eprintln!("{}: Cache cleared", "Info".blue());
        }
    }

    // Set up parallel processing
    if let Some(jobs) = args.jobs {
        rayon::ThreadPoolBuilder::new()
            .num_threads(jobs)
            .build_global()
            .ok();
    }

    let engine = GradingEngine::from_config(&config);
    let use_parallel = args.parallel || pages.len() > 10;

    let (reports, had_errors) = grade_pages(&engine, &pages, &mut cache, use_parallel, args.quiet);

    if let Err(e) = cache.save() {
        if !args.quiet {
            eprintln!("{}: Failed to save cache: {}", "Warning".yellow(), e);
        }
    }

    if reports.is_empty() {
        eprintln!("{}: All pages failed to grade", "Error".red());
        return Ok(ExitCode::from(2));
    }
    if had_errors && !args.quiet {
        eprintln!("{}: Some pages could not be graded", "Warning".yellow());
    }

    let stats = engine.aggregate_stats(&reports);

    // Output results
    if args.json {
        let reporter = JsonReporter::new().pretty();
        if reports.len() == 1 {
            println!("{}", reporter.report(&reports[0]));
        } else {
            println!("{}", reporter.report_with_summary(&reports, &stats));
        }
    } else if args.quiet {
        let reporter = ConsoleReporter::new();
        let root = find_project_root(work_dir);
        let history = root.as_ref().map(|p| load_history(p.as_path()));
        for report in &reports {
            if let Some(ref h) = history {
                let prev = previous_percentage(h, &report.file_path);
                let delta = format_delta(prev, report.percentage);
                println!(
                    "{}: {:.1}% ({}){}",
                    report.file_path.display(),
                    report.percentage,
                    report.grade,
                    delta
                );
            } else {
                reporter.report_quiet(report);
            }
        }
        persist_history(root.as_deref(), &reports);
    } else {
        let mut reporter = ConsoleReporter::new();
        if args.verbose {
            reporter = reporter.verbose();
        }

        if reports.len() == 1 {
            reporter.report(&reports[0]);
        } else {
            reporter.report_many(&reports, &stats);
        }

        persist_history(find_project_root(work_dir).as_deref(), &reports);
    }

    Ok(threshold_exit(&config, &reports, args.quiet))
}

/// Exit 1 when any graded page falls below the configured threshold
fn threshold_exit(config: &Config, reports: &[GradeReport], quiet: bool) -> ExitCode {
    let Some(threshold) = config.threshold else {
        return ExitCode::SUCCESS;
    };
    let below: Vec<&GradeReport> = reports
        .iter()
        .filter(|r| r.percentage < threshold)
        .collect();
    if below.is_empty() {
        return ExitCode::SUCCESS;
    }
    if !quiet {
        for report in &below {
            eprintln!(
                "{}: {} scored {:.1}% (threshold {:.1}%)",
                "Below threshold".red(),
                report.file_path.display(),
                report.percentage,
                threshold
            );
        }
    }
    ExitCode::from(1)
}

fn persist_history(project_root: Option<&Path>, reports: &[GradeReport]) {
    if let Some(root) = project_root {
        let mut history = load_history(root);
        append_run(&mut history, reports);
        let _ = save_history(root, &history);
    }
}

/// Grade pages, consulting the cache first. Returns reports plus whether
/// any page failed to grade.
fn grade_pages(
    engine: &GradingEngine,
    pages: &[PathBuf],
    cache: &mut GradeCache,
    parallel: bool,
    quiet: bool,
) -> (Vec<GradeReport>, bool) {
    let outcomes: Vec<Result<(PathBuf, String, GradeReport, bool)>> = if parallel {
        use rayon::prelude::*;
        let shared: &GradeCache = cache;
        pages
            .par_iter()
            .map(|p| grade_one(engine, p, shared))
            .collect()
    } else {
        pages.iter().map(|p| grade_one(engine, p, cache)).collect()
    };

    let mut reports = Vec::with_capacity(pages.len());
    let mut had_errors = false;
    for outcome in outcomes {
        match outcome {
            Ok((path, content, report, from_cache)) => {
                if !from_cache {
                    cache.insert(&path, &content, &report);
                }
                reports.push(report);
            }
            Err(e) => {
                had_errors = true;
                if !quiet {
                    eprintln!("{}: {:#}", "Warning".yellow(), e);
                }
            }
        }
    }
    (reports, had_errors)
}

fn grade_one(
    engine: &GradingEngine,
    path: &Path,
    cache: &GradeCache,
) -> Result<(PathBuf, String, GradeReport, bool)> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read page: {}", path.display()))?;
    if let Some(report) = cache.get(path, &content) {
        return Ok((path.to_path_buf(), content, report, true));
    }
    let report = engine.grade_str(&content, path)?;
    Ok((path.to_path_buf(), content, report, false))
}

/// Collect gradable pages from a file or directory
fn collect_pages(
    path: &Path,
    ignore_set: Option<&globset::GlobSet>,
    patterns: &[&str],
) -> Result<Vec<PathBuf>> {
    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }
    if !path.exists() {
        anyhow::bail!("Path not found: {}", path.display());
    }

    let mut pages = Vec::new();
    for entry in WalkDir::new(path)
        .into_iter()
        .filter_entry(|e| {
            if e.depth() == 0 {
                return true;
            }
            let name = e.file_name().to_string_lossy();
            !(e.file_type().is_dir() && (name == "node_modules" || name.starts_with('.')))
        })
        .filter_map(|e| e.ok())
    {
        if !entry.file_type().is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy();
        if !patterns.iter().any(|suffix| name.ends_with(suffix)) {
            continue;
        }
        if let Some(set) = ignore_set {
            if is_ignored(entry.path(), set) {
                continue;
            }
        }
        pages.push(entry.path().to_path_buf());
    }
    pages.sort();
    Ok(pages)
}

fn run_init(threshold: Option<f64>, strict: bool, dir: Option<&Path>) -> Result<ExitCode> {
    let dir = dir.unwrap_or(Path::new("."));
    let path = dir.join(CONFIG_FILENAME);
    let rule_set = if strict { "strict" } else { "basic" };
    let threshold = threshold.unwrap_or(70.0);

    let content = format!(
        "{{\n  \"ruleSet\": \"{}\",\n  \"threshold\": {},\n  \"weights\": {{}},\n  \"ignore\": []\n}}\n",
        rule_set, threshold
    );
    fs::write(&path, content)
        .with_context(|| format!("Failed to write config: {}", path.display()))?;
    println!("{}: Created {}", "Info".blue(), path.display());
    Ok(ExitCode::SUCCESS)
}

fn run_watch(args: &Args, path: &Path) -> Result<ExitCode> {
    let work_dir = if path.is_file() {
        path.parent().unwrap_or(Path::new("."))
    } else {
        path
    };
    let config =
        load_config(work_dir, args.config.as_deref())?.merge_with_cli(args.threshold, args.strict);
    let engine = GradingEngine::from_config(&config);
    let mut reporter = ConsoleReporter::new();
    if args.verbose {
        reporter = reporter.verbose();
    }

    // Initial pass before waiting for changes
    let ignore_set = if config.ignore.is_empty() {
        None
    } else {
        Some(build_ignore_set(&config.ignore)?)
    };
    for page in collect_pages(path, ignore_set.as_ref(), &config.get_page_patterns())? {
        match engine.grade_file(&page) {
            Ok(report) => reporter.report(&report),
            Err(e) => eprintln!("{}: {:#}", "Warning".yellow(), e),
        }
    }

    println!(
        "{}: Watching {} for changes (Ctrl-C to stop)",
        "Info".blue(),
        path.display()
    );
    let watcher = PageWatcher::watch(path)
        .map_err(|e| anyhow::anyhow!("Failed to watch {}: {}", path.display(), e))?;

    loop {
        for changed in watcher.next_changes() {
            match engine.grade_file(&changed) {
                Ok(report) => reporter.report(&report),
                Err(e) => eprintln!("{}: {:#}", "Warning".yellow(), e),
            }
        }
    }
}

#[cfg(feature = "fetch")]
fn run_url(args: &Args, url: &str) -> Result<ExitCode> {
    let config = load_config(Path::new("."), args.config.as_deref())?
        .merge_with_cli(args.threshold, args.strict);
    let engine = GradingEngine::from_config(&config);

    let html = gridmark::fetch::fetch_submission(url).map_err(|e| anyhow::anyhow!("{}", e))?;
    let report = engine.grade_str(&html, Path::new(url))?;

    if args.json {
        println!("{}", JsonReporter::new().pretty().report(&report));
    } else if args.quiet {
        ConsoleReporter::new().report_quiet(&report);
    } else {
        let mut reporter = ConsoleReporter::new();
        if args.verbose {
            reporter = reporter.verbose();
        }
        reporter.report(&report);
    }

    Ok(threshold_exit(&config, std::slice::from_ref(&report), args.quiet))
}
