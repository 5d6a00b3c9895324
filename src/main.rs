use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::{Path, PathBuf};

mod config;
mod init;
mod site;

#[derive(Parser)]
#[command(name = "mdsite", version, about = "Static site generator for Markdown content")]
struct Cli {
    /// Suppress non-essential output
    #[arg(long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum RenderFormat {
    /// The `<div>` fragment only
    Html,
    /// A full page filled into `--template`
    Page,
    /// The HTML node tree as JSON
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Mirror static assets and render every page into the output directory
    Build {
        /// Site root (default: nearest directory with a site.json, else CWD)
        #[arg(long)]
        root: Option<PathBuf>,

        /// Config file (default: <root>/site.json)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Show every copied file
        #[arg(long)]
        verbose: bool,

        /// Rebuild whenever content, static files or the template change
        #[arg(long)]
        watch: bool,
    },

    /// Render a single Markdown file to stdout
    Render {
        /// Path to the .md file
        file: String,

        /// Output format
        #[arg(long, value_enum, default_value = "html")]
        format: RenderFormat,

        /// Page template, required for `--format page`
        #[arg(long)]
        template: Option<PathBuf>,
    },

    /// Scaffold a new site
    Init {
        /// Directory to initialize (default: current directory)
        path: Option<String>,

        /// Only the files a build needs, no sample blog post
        #[arg(long)]
        minimal: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Build {
            root,
            config,
            verbose,
            watch,
        } => {
            let opts = site::BuildOpts {
                verbose,
                quiet: cli.quiet,
            };
            handle_build(root, config.as_deref(), watch, &opts)?;
        }
        Commands::Render {
            file,
            format,
            template,
        } => {
            handle_render(&file, format, template.as_deref())?;
        }
        Commands::Init { path, minimal } => {
            init::init_site(path.as_deref(), minimal, cli.quiet)?;
        }
    }

    Ok(())
}

fn handle_build(
    root: Option<PathBuf>,
    config_path: Option<&Path>,
    watch: bool,
    opts: &site::BuildOpts,
) -> Result<()> {
    let root = match root {
        Some(root) => root,
        None => site::find_site_root()?,
    };
    let config = config::load_config(&root, config_path)?;

    let report = site::run_build(&root, &config, opts)?;
    if !opts.quiet {
        report.print_summary();
    }

    if watch {
        return site::watch::watch_and_rebuild(&root, &config, opts);
    }

    if report.has_failures() {
        if opts.quiet {
            for f in &report.failures {
                eprintln!("{} {}", "error:".red().bold(), f);
            }
        }
        std::process::exit(1);
    }

    Ok(())
}

fn handle_render(file: &str, format: RenderFormat, template: Option<&Path>) -> Result<()> {
    let content = std::fs::read_to_string(file)
        .map_err(|e| anyhow::anyhow!("Failed to read '{}': {}", file, e))?;

    let output = match format {
        RenderFormat::Html => {
            let result = mdsite_parse::markdown_to_html_node(&content);
            print_diagnostics(file, &result.diagnostics);
            result.to_html()?
        }
        RenderFormat::Json => {
            let result = mdsite_parse::markdown_to_html_node(&content);
            print_diagnostics(file, &result.diagnostics);
            serde_json::to_string_pretty(&result.root)?
        }
        RenderFormat::Page => {
            let template_path =
                template.ok_or_else(|| anyhow::anyhow!("--format page needs --template"))?;
            let template = std::fs::read_to_string(template_path)
                .with_context(|| format!("Failed to read template {}", template_path.display()))?;
            let page = mdsite_parse::render_page(&content, &template)
                .with_context(|| format!("Failed to render '{}'", file))?;
            print_diagnostics(file, &page.diagnostics);
            page.html
        }
    };

    println!("{output}");
    Ok(())
}

/// Print conversion diagnostics to stderr.
fn print_diagnostics(file: &str, diagnostics: &[mdsite_parse::Diagnostic]) {
    for diag in diagnostics {
        let line_info = match diag.block {
            Some(block) => format!("{}: block {}", file, block + 1),
            None => file.to_string(),
        };
        let severity_str = match diag.severity {
            mdsite_parse::Severity::Error => format!("{}", "error".red().bold()),
            mdsite_parse::Severity::Warning => format!("{}", "warning".yellow().bold()),
            mdsite_parse::Severity::Info => format!("{}", "info".cyan().bold()),
        };
        let code_str = match &diag.code {
            Some(c) => format!("[{}] ", c),
            None => String::new(),
        };
        eprintln!("{line_info}: {severity_str}: {code_str}{}", diag.message);
    }
}
