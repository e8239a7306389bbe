//! emoji-eraser: Find and remove emoji in source files.
//!
//! Usage:
//!   emoji-eraser [options] [path...]
//!
//! Comments, strings and Markdown are skipped according to the settings in
//! `.emojieraser.json`; command-line flags override the file.

mod report;
mod watch;

use clap::Parser as ClapParser;
use eraser_core::text::LineMap;
use eraser_diagnostics::{Diagnostic, Severity};
use eraser_options::{
    add_exclude_pattern_to_file, load_settings_file, save_settings_file, Settings, CONFIG_FILE_NAME,
};
use eraser_path::{
    exclude_extension_pattern, exclude_file_pattern, exclude_folder_pattern, relative_to_root,
};
use eraser_project::{read_source, CheckReport, Project};
use miette::NamedSource;
use std::path::{Path, PathBuf};
use std::process;

#[derive(ClapParser, Debug)]
#[command(
    name = "emoji-eraser",
    version,
    about = "Find and remove emoji in source files"
)]
struct Cli {
    /// Files or directories to check. Defaults to the project root.
    #[arg(value_name = "PATH")]
    paths: Vec<PathBuf>,

    /// Path to the settings file. Its directory becomes the project root.
    #[arg(short = 'c', long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Severity of reported emoji: error, warning, information or hint.
    #[arg(long, value_name = "LEVEL", value_parser = parse_severity)]
    severity: Option<Severity>,

    /// Skip emoji inside comments.
    #[arg(long, value_name = "BOOL")]
    ignore_in_comments: Option<bool>,

    /// Skip emoji inside string literals.
    #[arg(long, value_name = "BOOL")]
    ignore_in_strings: Option<bool>,

    /// Skip Markdown files entirely.
    #[arg(long, value_name = "BOOL")]
    ignore_markdown: Option<bool>,

    /// Treat every file as this language instead of detecting it.
    #[arg(long, value_name = "ID")]
    language: Option<String>,

    /// Remove every emoji from the selected files.
    #[arg(long)]
    fix: bool,

    /// Add an exclusion pattern for this file to the settings file.
    #[arg(long, value_name = "PATH")]
    exclude_file: Option<PathBuf>,

    /// Exclude every file with the same extension as this one.
    #[arg(long, value_name = "PATH")]
    exclude_extension: Option<PathBuf>,

    /// Exclude this folder and everything below it.
    #[arg(long, value_name = "PATH")]
    exclude_folder: Option<PathBuf>,

    /// Write a default settings file.
    #[arg(long)]
    init: bool,

    /// List the files that are checked.
    #[arg(long)]
    list_files: bool,

    /// Watch the selected paths and re-check changed files.
    #[arg(short = 'w', long)]
    watch: bool,

    /// Start the language server on stdio.
    #[arg(long)]
    lsp: bool,
}

fn parse_severity(value: &str) -> Result<Severity, String> {
    Severity::parse(value).ok_or_else(|| {
        format!("unknown severity '{value}' (expected error, warning, information or hint)")
    })
}

// ANSI color codes
const RED: &str = "\x1b[31m";
const YELLOW: &str = "\x1b[33m";
const GREEN: &str = "\x1b[32m";
const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

/// Where the project lives and where its settings file is.
#[derive(Debug)]
struct Context {
    cwd: PathBuf,
    root: PathBuf,
    config_path: PathBuf,
}

impl Context {
    fn resolve(cli: &Cli) -> std::io::Result<Self> {
        let cwd = std::env::current_dir()?;
        let (root, config_path) = match &cli.config {
            Some(config) => {
                let config_path = cwd.join(config);
                let root = config_path
                    .parent()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| cwd.clone());
                (root, config_path)
            }
            None => (cwd.clone(), cwd.join(CONFIG_FILE_NAME)),
        };
        Ok(Self {
            cwd,
            root,
            config_path,
        })
    }

    fn targets(&self, cli: &Cli) -> Vec<PathBuf> {
        if cli.paths.is_empty() {
            vec![self.root.clone()]
        } else {
            cli.paths.iter().map(|p| self.cwd.join(p)).collect()
        }
    }
}

fn main() {
    init_tracing();
    let cli = Cli::parse();
    process::exit(run(&cli));
}

fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    // Only initialize if RUST_LOG is set. Logs go to stderr so the language
    // server's stdout stays clean.
    if std::env::var("RUST_LOG").is_ok() {
        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(std::io::stderr).with_target(true))
            .with(EnvFilter::from_default_env())
            .init();
    }
}

fn run(cli: &Cli) -> i32 {
    if cli.lsp {
        return run_lsp();
    }

    let ctx = match Context::resolve(cli) {
        Ok(ctx) => ctx,
        Err(e) => {
            print_error(&format!("Failed to read the current directory: {}", e));
            return 1;
        }
    };

    tracing::debug!(
        root = %ctx.root.display(),
        config = %ctx.config_path.display(),
        "resolved project"
    );

    if cli.init {
        return run_init(&ctx);
    }

    let exclusions = [
        (&cli.exclude_file, exclude_file_pattern as fn(&str) -> String),
        (&cli.exclude_extension, exclude_extension_pattern),
        (&cli.exclude_folder, exclude_folder_pattern),
    ];
    if exclusions.iter().any(|(path, _)| path.is_some()) {
        let mut code = 0;
        for (path, build_pattern) in exclusions {
            if let Some(path) = path {
                code = code.max(run_exclude(&ctx, path, build_pattern));
            }
        }
        return code;
    }

    let settings = match load_settings_file(&ctx.config_path) {
        Ok(mut settings) => {
            apply_overrides(cli, &mut settings);
            settings
        }
        Err(e) => {
            print_error(&e.to_string());
            return 1;
        }
    };

    if cli.fix {
        return run_fix(cli, &ctx, settings);
    }

    if cli.watch {
        return run_watch(cli, &ctx, settings);
    }

    run_check(cli, &ctx, settings)
}

/// Command-line flags override the settings file.
fn apply_overrides(cli: &Cli, settings: &mut Settings) {
    if let Some(severity) = cli.severity {
        settings.severity = severity;
    }
    if let Some(value) = cli.ignore_in_comments {
        settings.ignore_in_comments = value;
    }
    if let Some(value) = cli.ignore_in_strings {
        settings.ignore_in_strings = value;
    }
    if let Some(value) = cli.ignore_markdown {
        settings.ignore_markdown = value;
    }
}

fn load_project(cli: &Cli, ctx: &Context, settings: Settings) -> Project {
    let mut project = Project::new(&ctx.root, settings);
    project.add_targets(&ctx.targets(cli));
    if cli.list_files {
        for file in project.files() {
            println!("{}", file.relative_path);
        }
    }
    project
}

fn run_check(cli: &Cli, ctx: &Context, settings: Settings) -> i32 {
    let project = load_project(cli, ctx, settings);
    if project.files().is_empty() {
        print_error("No input files found.");
        return 1;
    }
    check_and_print(&project, cli.language.as_deref())
}

/// Check a project, print what was found, and return the exit code.
fn check_and_print(project: &Project, language_id: Option<&str>) -> i32 {
    let report = project.check(language_id);
    for failure in &report.failures {
        print_error(&failure.to_string());
    }
    print_findings(project, &report);

    exit_code_for(&report)
}

fn exit_code_for(report: &CheckReport) -> i32 {
    if report.diagnostics.has_errors() {
        2
    } else if !report.failures.is_empty() {
        1
    } else {
        0
    }
}

fn print_findings(project: &Project, report: &CheckReport) {
    let use_color = atty_is_terminal();
    let diagnostics = report.diagnostics.diagnostics();

    // Diagnostics are sorted by file, so each file's findings are adjacent.
    let mut files = 0;
    let mut start = 0;
    while start < diagnostics.len() {
        let file = &diagnostics[start].file;
        let end = diagnostics[start..]
            .iter()
            .position(|d| &d.file != file)
            .map_or(diagnostics.len(), |offset| start + offset);
        print_file_findings(project, &diagnostics[start..end], use_color);
        files += 1;
        start = end;
    }

    let count = diagnostics.len();
    if count == 0 {
        return;
    }
    let summary = format!(
        "Found {} emoji{} in {} file{}.",
        count,
        if count == 1 { "" } else { "s" },
        files,
        if files == 1 { "" } else { "s" }
    );
    if use_color {
        let color = if report.diagnostics.has_errors() { RED } else { YELLOW };
        eprintln!("\n{}{}{}", color, summary, RESET);
    } else {
        eprintln!("\n{}", summary);
    }
}

/// Print the findings of one file, all of which share `file`.
fn print_file_findings(project: &Project, group: &[Diagnostic], use_color: bool) {
    let Some(relative_path) = group[0].file.as_deref() else {
        group.iter().for_each(|d| eprintln!("{}", d));
        return;
    };
    let text = match read_source(&project.root().join(relative_path)) {
        Ok(text) => text,
        Err(_) => {
            group.iter().for_each(|d| eprintln!("{}", d));
            return;
        }
    };

    if use_color {
        let source = NamedSource::new(relative_path, text);
        for diagnostic in group {
            eprint!("{}", report::render_fancy(diagnostic, &source));
        }
    } else {
        let line_map = LineMap::new(&text);
        for diagnostic in group {
            eprintln!("{}", report::render_plain(diagnostic, &text, &line_map));
        }
    }
}

fn run_fix(cli: &Cli, ctx: &Context, settings: Settings) -> i32 {
    let project = load_project(cli, ctx, settings);
    let summary = project.remove_emojis();
    for failure in &summary.failures {
        print_error(&failure.to_string());
    }

    if atty_is_terminal() && summary.changed > 0 {
        println!("{}{}{}", GREEN, summary.message(), RESET);
    } else {
        println!("{}", summary.message());
    }

    if summary.failures.is_empty() {
        0
    } else {
        1
    }
}

fn run_init(ctx: &Context) -> i32 {
    if ctx.config_path.exists() {
        print_error(&format!(
            "A {} file already exists at {}.",
            CONFIG_FILE_NAME,
            ctx.config_path.display()
        ));
        return 1;
    }

    match save_settings_file(&ctx.config_path, &Settings::default()) {
        Ok(()) => {
            println!("Successfully created a {} file.", CONFIG_FILE_NAME);
            0
        }
        Err(e) => {
            print_error(&e.to_string());
            1
        }
    }
}

fn run_exclude(ctx: &Context, path: &Path, build_pattern: fn(&str) -> String) -> i32 {
    let relative = relative_to_root(&ctx.root, &ctx.cwd.join(path));
    let pattern = build_pattern(&relative);

    match add_exclude_pattern_to_file(&ctx.config_path, &pattern) {
        Ok(true) => {
            println!("Added exclusion pattern \"{}\".", pattern);
            0
        }
        Ok(false) => {
            println!("Pattern already present (\"{}\").", pattern);
            0
        }
        Err(e) => {
            print_error(&e.to_string());
            1
        }
    }
}

fn run_watch(cli: &Cli, ctx: &Context, settings: Settings) -> i32 {
    println!("Starting check in watch mode...");
    println!();

    let _ = run_check(cli, ctx, settings.clone());

    println!();
    println!("Watching for file changes...");

    let result = watch::watch_paths(&ctx.targets(cli), |changed| {
        let mut project = Project::new(&ctx.root, settings.clone());
        project.add_targets(changed);
        if project.files().is_empty() {
            return;
        }
        println!();
        println!("File change detected. Checking {} file(s)...", project.files().len());
        let _ = check_and_print(&project, cli.language.as_deref());
    });

    match result {
        Ok(()) => 0,
        Err(e) => {
            print_error(&format!("Watch failed: {}", e));
            1
        }
    }
}

fn run_lsp() -> i32 {
    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            print_error(&format!("Failed to create tokio runtime: {}", e));
            return 1;
        }
    };
    rt.block_on(eraser_lsp::start_lsp_server());
    0
}

fn print_error(msg: &str) {
    if atty_is_terminal() {
        eprintln!("{}{}error{}: {}", BOLD, RED, RESET, msg);
    } else {
        eprintln!("error: {}", msg);
    }
}

fn atty_is_terminal() -> bool {
    // Simple check - on Unix, check if stderr is a terminal
    #[cfg(unix)]
    {
        unsafe { libc::isatty(2) != 0 }
    }
    #[cfg(not(unix))]
    {
        true // Assume terminal on other platforms
    }
}
