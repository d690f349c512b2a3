use anyhow::{Context as AnyhowContext, Result};
use clap::Parser;
use go2md_flowdoc::{process_dir, FlowDocConfig, OutlineRenderer, RunSummary};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "go2md")]
#[command(about = "Generate Markdown flow documentation for a Go package", long_about = None)]
#[command(version)]
struct Cli {
    /// Directory containing the Go package
    #[arg(default_value = ".")]
    dir: PathBuf,

    /// Link to sources outside the project with absolute local paths
    #[arg(short, long)]
    local_links: bool,

    /// Project root (default: closest directory containing .git)
    #[arg(long)]
    project_root: Option<PathBuf>,

    /// Additional Go workspace root, searched before GOPATH (repeatable)
    #[arg(long = "search-root")]
    search_roots: Vec<PathBuf>,

    /// Configuration file (default: go2md.toml in the package directory)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,

    /// Log only warnings and errors
    #[arg(short, long)]
    quiet: bool,
}

impl Cli {
    /// Configuration file values with the command line applied on top
    fn config(&self) -> Result<FlowDocConfig> {
        let mut config = match &self.config {
            Some(path) => FlowDocConfig::from_file(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?,
            None => FlowDocConfig::load(&self.dir)
                .with_context(|| format!("Failed to load config from {}", self.dir.display()))?,
        };

        if self.local_links {
            config.local_links = true;
        }
        if let Some(root) = &self.project_root {
            config.project_root = Some(root.clone());
        }
        if !self.search_roots.is_empty() {
            let mut roots = self.search_roots.clone();
            roots.append(&mut config.search_roots);
            config.search_roots = roots;
        }
        Ok(config)
    }
}

fn init_logging(cli: &Cli) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();
}

pub fn main_entry() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli);
    let summary = run(&cli)?;
    log::info!(
        "Documented {} flows ({} source parts): {} documents written, {} failed",
        summary.flows,
        summary.parts,
        summary.documents_written,
        summary.documents_failed
    );
    Ok(())
}

fn run(cli: &Cli) -> Result<RunSummary> {
    let config = cli.config()?;
    let settings = config
        .resolve(&cli.dir)
        .with_context(|| format!("Cannot document {}", cli.dir.display()))?;
    log::debug!(
        "Project root {}, {} search roots",
        settings.project_root.display(),
        settings.search_roots.len()
    );

    process_dir(&settings, &OutlineRenderer)
        .with_context(|| format!("Failed to document {}", settings.working_dir.display()))
}
