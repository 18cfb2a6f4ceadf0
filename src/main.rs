use clap::Parser;
use dayone_to_markdown::{ExportConfig, execute};
use eyre::{Context, Result, eyre};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Convert a Day One JSON export archive to Markdown folders.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Day One export archive (.zip).
    #[arg(value_name = "ARCHIVE")]
    archive: PathBuf,

    /// Directory to create entry folders in.
    /// Required unless `destination` is set in config.
    #[arg(value_name = "DESTINATION")]
    destination: Option<PathBuf>,

    /// Journal to convert; reads <NAME>.json and writes under DESTINATION/<NAME>.
    #[arg(long, value_name = "NAME")]
    journal: Option<String>,

    /// Path to a specific configuration file.
    /// Defaults to $XDG_CONFIG_HOME/dayone-to-markdown/config.toml
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Increase log detail (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress log output and the final summary.
    #[arg(short, long)]
    quiet: bool,
}

#[derive(Deserialize, Default)]
struct FileConfig {
    destination: Option<PathBuf>,
    journal: Option<String>,
}

fn load_file_config(explicit_path: Option<&Path>) -> Result<FileConfig> {
    let path = if let Some(p) = explicit_path {
        if !p.exists() {
            return Err(eyre!("Config file not found: {}", p.display()));
        }
        Some(p.to_path_buf())
    } else {
        dirs::config_dir()
            .map(|d| d.join("dayone-to-markdown/config.toml"))
            .filter(|p| p.exists())
    };

    match path {
        None => Ok(FileConfig::default()),
        Some(p) => {
            let content = fs::read_to_string(&p)
                .wrap_err_with(|| format!("Failed to read config: {}", p.display()))?;
            toml::from_str(&content)
                .wrap_err_with(|| format!("Failed to parse config: {}", p.display()))
        }
    }
}

fn init_tracing(verbose: u8, quiet: bool) {
    use std::io::IsTerminal;
    use tracing_subscriber::EnvFilter;

    if quiet {
        return;
    }

    // Honor RUST_LOG if set, otherwise use verbosity flag
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        match verbose {
            0 => EnvFilter::new("warn"),
            1 => EnvFilter::new("info"),
            2 => EnvFilter::new("debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .with_target(false)
        .with_ansi(std::io::stderr().is_terminal())
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    // 1. Load config file (CLI path > default path)
    let file_cfg = load_file_config(cli.config.as_deref())?;

    // 2. Resolve destination (CLI > Config)
    let destination = cli.destination.or(file_cfg.destination).ok_or_else(|| {
        eyre!("No destination given.\nPass DESTINATION, or set destination in config.toml.")
    })?;

    // 3. Resolve journal (CLI > Config); an empty name selects the default journal
    let journal = cli.journal.or(file_cfg.journal);

    let config = ExportConfig {
        archive_path: cli.archive,
        destination,
        journal,
    };

    // 4. Run the conversion
    let report = execute(&config)?;

    if !cli.quiet {
        let mut summary = format!("Done. {} entries written.", report.written.len());
        if !report.diagnostics.is_empty() {
            summary.push_str(&format!(
                " Completed with {} issue(s).",
                report.diagnostics.len()
            ));
        }
        eprintln!("{}", summary);
    }

    Ok(())
}
