/*!
 * Command-line interface for clipfiles
 */

use std::env;
use std::fs;
use std::io::{self, BufRead, Read, Write};
use std::path::PathBuf;
use std::time::Instant;

use clap::{CommandFactory, Parser};
use clap_complete::generate;
use tracing::{debug, info};
use tracing_subscriber::{fmt, EnvFilter};

use clipfiles::clipboard::{copy_to_clipboard, read_from_clipboard};
use clipfiles::compact::{compact, DEFAULT_GROUP_DEPTH};
use clipfiles::config::{workspace_root, Args, Command, Config, Settings};
use clipfiles::error::Result;
use clipfiles::fs::LocalFs;
use clipfiles::import_list::{decode, encode, resolve};
use clipfiles::panel::{OptionsPanel, PanelEffect, PanelItem};
use clipfiles::report::{CopyReport, ReportFormat, Reporter};
use clipfiles::types::WorkspaceRoot;
use clipfiles::walker::directory_structure;
use clipfiles::writer::OpenFilesWriter;

const NOTHING_TO_COPY: &str = "Nothing to copy based on selected options.";

fn main() -> io::Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    if let Some(shell) = args.generate {
        let mut cmd = Args::command();
        generate(shell, &mut cmd, "clipfiles", &mut io::stdout());
        return Ok(());
    }

    init_tracing(args.verbose);

    // Create and validate configuration
    let config = Config::from_args(args);
    config.validate()?;

    run(&config)?;
    Ok(())
}

/// Log to stderr; RUST_LOG wins over `--verbose`
fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            "clipfiles=debug,warn".into()
        } else {
            "warn".into()
        }
    });

    fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn run(config: &Config) -> Result<()> {
    match &config.command {
        Command::Tree { directory } => {
            let start = Instant::now();
            let root = fs::canonicalize(directory)?;
            let text = directory_structure(&LocalFs, &root);
            let report = CopyReport {
                action: "Copy directory structure".to_string(),
                duration: start.elapsed(),
                total_lines: text.lines().count(),
                total_chars: text.chars().count(),
                ..Default::default()
            };
            deliver(config, &text, report)
        }

        Command::Files {
            paths,
            workspace,
            content,
            structure,
        } => {
            let mut settings = Settings::load(&config.settings_path);
            if let Some(content) = content {
                settings.copy_content = *content;
            }
            if let Some(structure) = structure {
                settings.copy_structure = *structure;
            }
            let workspace = open_workspace(workspace.as_deref())?;
            let paths = input_paths(paths, workspace.is_some())?;
            copy_files(config, settings, &paths, workspace.as_ref())
        }

        Command::Compact { paths, workspace } => {
            let start = Instant::now();
            let workspace = open_workspace(workspace.as_deref())?;
            let paths = input_paths(paths, workspace.is_some())?;
            let text = compact(&paths, DEFAULT_GROUP_DEPTH, workspace.as_ref());
            let report = CopyReport {
                action: "Copy compact paths".to_string(),
                duration: start.elapsed(),
                files: paths.len(),
                total_lines: text.lines().count(),
                total_chars: text.chars().count(),
                ..Default::default()
            };
            deliver(config, &text, report)
        }

        Command::Export { paths, workspace } => {
            let workspace = open_workspace(workspace.as_deref())?;
            let paths = input_paths(paths, workspace.is_some())?;
            export(config, &paths, workspace.as_ref())
        }

        Command::Import { text, workspaces } => {
            let text = match text {
                Some(text) => text.clone(),
                None if config.clip => read_from_clipboard()?,
                None => {
                    let mut buffer = String::new();
                    io::stdin().read_to_string(&mut buffer)?;
                    buffer
                }
            };
            let workspaces = workspaces
                .iter()
                .map(|dir| workspace_root(dir))
                .collect::<Result<Vec<_>>>()?;
            import(&text, workspaces)
        }

        Command::Options {
            toggle,
            paths,
            workspace,
        } => {
            let mut settings = Settings::load(&config.settings_path);
            match toggle {
                Some(which) => {
                    settings.toggle(*which);
                    settings.save(&config.settings_path)?;
                    info!("Toggled {}", which);
                    print_settings(&settings);
                    Ok(())
                }
                None => {
                    let workspace = open_workspace(workspace.as_deref())?;
                    let paths = absolutize(paths, workspace.is_some())?;
                    run_panel(config, settings, &paths, workspace.as_ref())
                }
            }
        }
    }
}

/// Copy the structure and/or contents of `paths`
fn copy_files(
    config: &Config,
    settings: Settings,
    paths: &[PathBuf],
    workspace: Option<&WorkspaceRoot>,
) -> Result<()> {
    let start = Instant::now();
    let writer = OpenFilesWriter::new(&LocalFs, settings, workspace);
    let output = writer.compose(paths);

    if output.is_empty() {
        eprintln!("{}", NOTHING_TO_COPY);
        return Ok(());
    }

    let report = CopyReport {
        action: "Copy open files".to_string(),
        duration: start.elapsed(),
        files: output.files,
        total_lines: output.total_lines,
        total_chars: output.text.chars().count(),
        missing: output
            .skipped
            .iter()
            .map(|p| p.display().to_string())
            .collect(),
        file_details: output.file_details,
    };
    deliver(config, &output.text, report)
}

fn export(config: &Config, paths: &[PathBuf], workspace: Option<&WorkspaceRoot>) -> Result<()> {
    let start = Instant::now();
    let text = encode(paths, workspace);
    if text.is_empty() {
        eprintln!("No files to export.");
        return Ok(());
    }
    let report = CopyReport {
        action: "Copy Import List".to_string(),
        duration: start.elapsed(),
        files: paths.len(),
        total_lines: 1,
        total_chars: text.chars().count(),
        ..Default::default()
    };
    deliver(config, &text, report)
}

/// Decode, resolve and print the files of an Import List
fn import(text: &str, mut workspaces: Vec<WorkspaceRoot>) -> Result<()> {
    if workspaces.is_empty() {
        workspaces.push(workspace_root(".")?);
    }

    let record = decode(text);
    let resolution = resolve(&record, &workspaces, &LocalFs);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    for file in &resolution.files {
        writeln!(out, "{}", file.display())?;
    }
    eprintln!("{}", resolution.summary());
    Ok(())
}

/// Print `text`, or copy it and report when `--clip` is set
fn deliver(config: &Config, text: &str, report: CopyReport) -> Result<()> {
    if config.clip {
        copy_to_clipboard(text)?;
        Reporter::new(ReportFormat::ConsoleTable).print_report(&report);
    } else {
        println!("{}", text);
    }
    Ok(())
}

/// Interactive options panel driven by stdin
fn run_panel(
    config: &Config,
    settings: Settings,
    paths: &[PathBuf],
    workspace: Option<&WorkspaceRoot>,
) -> Result<()> {
    let mut panel = OptionsPanel::new(settings);
    panel.open(None);

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        for (i, entry) in panel.entries().iter().enumerate() {
            let marker = if entry.active { ">" } else { " " };
            eprintln!(
                "{} {}. {}  ({})",
                marker,
                i + 1,
                entry.label,
                entry.description
            );
        }
        eprint!("Select [1-5, empty to cancel]: ");
        io::stderr().flush()?;

        let line = match lines.next() {
            Some(line) => line?,
            None => String::new(),
        };
        let Some(item) = parse_choice(&line, &panel) else {
            panel.cancel();
            debug!("Options panel cancelled");
            return Ok(());
        };

        match panel.select(item) {
            PanelEffect::None => return Ok(()),
            PanelEffect::Persist(settings) => settings.save(&config.settings_path)?,
            PanelEffect::Copy(settings) => return copy_files(config, settings, paths, workspace),
            PanelEffect::Export => return export(config, paths, workspace),
            PanelEffect::Import => {
                let text = if config.clip {
                    read_from_clipboard()?
                } else {
                    eprint!("Import List: ");
                    io::stderr().flush()?;
                    match lines.next() {
                        Some(line) => line?,
                        None => String::new(),
                    }
                };
                let workspaces = workspace.cloned().into_iter().collect();
                return import(&text, workspaces);
            }
        }
    }
}

/// Map a 1-based menu number or an item key to a panel item
fn parse_choice(line: &str, panel: &OptionsPanel) -> Option<PanelItem> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    let entries = panel.entries();
    if let Ok(n) = line.parse::<usize>() {
        return n.checked_sub(1).and_then(|i| entries.get(i)).map(|e| e.item);
    }
    entries
        .iter()
        .map(|e| e.item)
        .find(|item| item.to_string().eq_ignore_ascii_case(line))
}

fn print_settings(settings: &Settings) {
    println!(
        "content: {}\nstructure: {}",
        if settings.copy_content { "on" } else { "off" },
        if settings.copy_structure { "on" } else { "off" }
    );
}

fn open_workspace(dir: Option<&str>) -> Result<Option<WorkspaceRoot>> {
    dir.map(workspace_root).transpose()
}

/// Paths from the arguments, or one per line from stdin when none are given
fn input_paths(args: &[String], absolute: bool) -> Result<Vec<PathBuf>> {
    if !args.is_empty() {
        return absolutize(args, absolute);
    }

    let mut lines = Vec::new();
    for line in io::stdin().lock().lines() {
        let line = line?;
        let line = line.trim();
        if !line.is_empty() {
            lines.push(line.to_string());
        }
    }
    absolutize(&lines, absolute)
}

/// Anchor relative paths at the current directory when `absolute` is set
fn absolutize(paths: &[String], absolute: bool) -> Result<Vec<PathBuf>> {
    if !absolute {
        return Ok(paths.iter().map(PathBuf::from).collect());
    }
    let cwd = env::current_dir()?;
    Ok(paths
        .iter()
        .map(|p| {
            let path = PathBuf::from(p);
            if path.is_absolute() {
                path
            } else {
                cwd.join(path)
            }
        })
        .collect())
}
