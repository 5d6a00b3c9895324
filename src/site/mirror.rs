use anyhow::{Context, Result};
use colored::Colorize;
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

use super::{BuildOpts, BuildReport};

/// Replace `dst` with a recursive copy of `src`.
///
/// Everything under `dst` is deleted first, so files removed from `src` do
/// not linger in the output. A missing `src` leaves `dst` empty and records
/// a warning.
pub fn mirror_dir(src: &Path, dst: &Path, opts: &BuildOpts, report: &mut BuildReport) -> Result<()> {
    ensure_outside(dst, src)?;

    if dst.exists() {
        let stale = count_files(dst);
        fs::remove_dir_all(dst)
            .with_context(|| format!("Failed to remove {}", dst.display()))?;
        if opts.chatty() && stale > 0 {
            println!("  {} {} ({} files)", "Cleared".yellow(), dst.display(), stale);
        }
        report.removed += stale;
    }

    fs::create_dir_all(dst).with_context(|| format!("Failed to create {}", dst.display()))?;

    if !src.exists() {
        report
            .warnings
            .push(format!("{} does not exist; no static assets copied", src.display()));
        return Ok(());
    }

    for entry in WalkDir::new(src).min_depth(1).sort_by_file_name() {
        let entry = entry.with_context(|| format!("Failed to walk {}", src.display()))?;
        let rel = entry.path().strip_prefix(src)?;
        let dest_path = dst.join(rel);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&dest_path)
                .with_context(|| format!("Failed to create {}", dest_path.display()))?;
        } else {
            if let Some(parent) = dest_path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(entry.path(), &dest_path).with_context(|| {
                format!(
                    "Failed to copy {} -> {}",
                    entry.path().display(),
                    dest_path.display()
                )
            })?;
            report.copied += 1;
            if opts.chatty() {
                println!("  {} {}", "Copied".green(), rel.display());
            }
        }
    }

    Ok(())
}

/// Fail if `source` is `dst` itself or lives somewhere under it, since
/// clearing `dst` would delete it. Paths that do not exist yet pass.
pub fn ensure_outside(dst: &Path, source: &Path) -> Result<()> {
    if !source.exists() || !dst.exists() {
        return Ok(());
    }
    let source_abs = source
        .canonicalize()
        .with_context(|| format!("Failed to resolve {}", source.display()))?;
    let dst_abs = dst
        .canonicalize()
        .with_context(|| format!("Failed to resolve {}", dst.display()))?;
    if source_abs.starts_with(&dst_abs) {
        anyhow::bail!(
            "Refusing to clear {}: it contains {}",
            dst.display(),
            source.display()
        );
    }
    Ok(())
}

fn count_files(dir: &Path) -> usize {
    WalkDir::new(dir)
        .min_depth(1)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .count()
}
