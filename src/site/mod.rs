pub mod mirror;
pub mod pages;
pub mod watch;

use anyhow::{Context, Result};
use colored::Colorize;
use std::path::{Path, PathBuf};

use crate::config::{self, SiteConfig};

/// Options passed from CLI to the build pipeline.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuildOpts {
    pub verbose: bool,
    pub quiet: bool,
}

impl BuildOpts {
    /// Whether per-file lines should be printed.
    pub fn chatty(&self) -> bool {
        self.verbose && !self.quiet
    }
}

/// Aggregate report from one build.
#[derive(Debug, Default)]
pub struct BuildReport {
    /// Stale files deleted from the output directory.
    pub removed: usize,
    /// Static assets copied.
    pub copied: usize,
    /// Pages written.
    pub pages: usize,
    /// Non-fatal problems, e.g. blocks that fell back to plain text.
    pub warnings: Vec<String>,
    /// Pages that could not be generated.
    pub failures: Vec<String>,
}

impl BuildReport {
    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }

    pub fn print_summary(&self) {
        println!();
        println!("{}", "========================================".dimmed());
        if self.has_failures() {
            println!("{}", "Build finished with errors".red().bold());
        } else {
            println!("{}", "Build complete!".green().bold());
        }
        println!();

        let mut parts = vec![format!("{} pages", self.pages)];
        if self.copied > 0 {
            parts.push(format!("{} assets copied", self.copied));
        }
        if self.removed > 0 {
            parts.push(format!("{} stale files removed", self.removed));
        }
        println!("Output: {}", parts.join(", "));

        for w in &self.warnings {
            println!("{} {}", "WARNING:".yellow(), w);
        }
        for f in &self.failures {
            println!("{} {}", "ERROR:".red(), f);
        }
    }
}

/// Find the site root by walking up from CWD looking for site.json.
///
/// Falls back to CWD when no config file is found, so a bare
/// `content/` + `static/` layout builds with defaults.
pub fn find_site_root() -> Result<PathBuf> {
    let cwd = std::env::current_dir().context("Failed to get current directory")?;
    let mut dir = cwd.as_path();

    loop {
        if dir.join(config::CONFIG_FILE).exists() {
            return Ok(dir.to_path_buf());
        }
        match dir.parent() {
            Some(parent) => dir = parent,
            None => return Ok(cwd),
        }
    }
}

/// Run the full build: mirror static assets, then generate every page.
pub fn run_build(root: &Path, config: &SiteConfig, opts: &BuildOpts) -> Result<BuildReport> {
    let paths = config.resolve(root);

    if !opts.quiet {
        println!(
            "{} {}",
            "mdsite build".bold(),
            format!("— {}", root.display()).dimmed()
        );
        println!("{}", "================================".dimmed());
    }

    // Sources must survive the output wipe below
    for source in [&paths.content, &paths.template] {
        mirror::ensure_outside(&paths.output, source)?;
    }

    let mut report = BuildReport::default();

    // 1. Replace the output directory with a copy of the static assets
    if !opts.quiet {
        println!();
        println!(
            "{}",
            format!(
                "[Static] Mirroring {} -> {}...",
                config.static_dir, config.output_dir
            )
            .bold()
        );
    }
    mirror::mirror_dir(&paths.static_assets, &paths.output, opts, &mut report)?;

    // 2. Render every Markdown file under the content directory
    if !opts.quiet {
        println!();
        println!(
            "{}",
            format!("[Pages] Rendering {}...", config.content_dir).bold()
        );
    }
    pages::generate_pages(
        &paths.content,
        &paths.template,
        &paths.output,
        opts,
        &mut report,
    )?;

    Ok(report)
}
