use anyhow::{Context, Result};
use colored::Colorize;
use mdsite_parse::{PageError, render_page};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::{BuildOpts, BuildReport};

/// Render every `.md` file under `content_dir` into `dest_dir`, keeping the
/// relative layout and swapping the extension for `.html`.
pub fn generate_pages(
    content_dir: &Path,
    template_path: &Path,
    dest_dir: &Path,
    opts: &BuildOpts,
    report: &mut BuildReport,
) -> Result<()> {
    let template = fs::read_to_string(template_path)
        .with_context(|| format!("Failed to read template {}", template_path.display()))?;

    if !content_dir.exists() {
        report.warnings.push(format!(
            "{} does not exist; no pages generated",
            content_dir.display()
        ));
        return Ok(());
    }

    for entry in WalkDir::new(content_dir).min_depth(1).sort_by_file_name() {
        let entry = entry.with_context(|| format!("Failed to walk {}", content_dir.display()))?;
        if !entry.file_type().is_file() || !is_markdown(entry.path()) {
            continue;
        }
        let dest = page_destination(content_dir, entry.path(), dest_dir)?;
        generate_page(entry.path(), &template, &dest, opts, report)?;
    }

    Ok(())
}

fn is_markdown(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "md")
}

/// `content/blog/post.md` → `public/blog/post.html`.
pub fn page_destination(content_dir: &Path, source: &Path, dest_dir: &Path) -> Result<PathBuf> {
    let rel = source.strip_prefix(content_dir).with_context(|| {
        format!(
            "{} is not inside {}",
            source.display(),
            content_dir.display()
        )
    })?;
    Ok(dest_dir.join(rel).with_extension("html"))
}

/// Render one Markdown file through `template` and write it to `dest`.
///
/// A page without a `# ` title is recorded as a failure and skipped; I/O
/// errors abort the build.
pub fn generate_page(
    source: &Path,
    template: &str,
    dest: &Path,
    opts: &BuildOpts,
    report: &mut BuildReport,
) -> Result<()> {
    let markdown = fs::read_to_string(source)
        .with_context(|| format!("Failed to read {}", source.display()))?;

    let page = match render_page(&markdown, template) {
        Ok(page) => page,
        Err(PageError::Title(e)) => {
            report.failures.push(format!("{}: {}", source.display(), e));
            if !opts.quiet {
                println!("  {} {} {}", "Skipped".red(), source.display(), format!("({e})").dimmed());
            }
            return Ok(());
        }
        Err(e) => {
            return Err(e).with_context(|| format!("Failed to render {}", source.display()));
        }
    };

    for diag in &page.diagnostics {
        let location = match diag.block {
            Some(block) => format!("{} (block {})", source.display(), block + 1),
            None => source.display().to_string(),
        };
        report.warnings.push(format!("{location}: {}", diag.message));
    }

    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    fs::write(dest, &page.html).with_context(|| format!("Failed to write {}", dest.display()))?;
    report.pages += 1;

    if !opts.quiet {
        println!(
            "  {} {} → {} {}",
            "page".dimmed(),
            source.display(),
            dest.display(),
            format!("\"{}\"", page.title).dimmed()
        );
    }

    Ok(())
}
