use anyhow::Result;
use colored::Colorize;
use notify::{EventKind, RecursiveMode, Watcher};
use std::path::Path;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use super::{BuildOpts, run_build};
use crate::config::{SiteConfig, SitePaths};

/// Watch the content directory, the static directory and the template, and
/// rebuild the whole site on each change.
///
/// Debounces rapid events (e.g. editors that write in stages) with a 200ms window.
/// Events under the output directory are ignored so a build never retriggers
/// itself. Ctrl+C exits.
pub fn watch_and_rebuild(root: &Path, config: &SiteConfig, opts: &BuildOpts) -> Result<()> {
    let paths = config.resolve(root);

    println!(
        "{} {} for changes (Ctrl+C to stop)",
        "Watching".cyan().bold(),
        root.display()
    );

    let (tx, rx) = mpsc::channel();
    let mut watcher = notify::recommended_watcher(move |res: notify::Result<notify::Event>| {
        if let Ok(event) = res {
            let _ = tx.send(event);
        }
    })?;

    for dir in [&paths.content, &paths.static_assets] {
        if dir.exists() {
            watcher.watch(dir, RecursiveMode::Recursive)?;
        }
    }
    // Editors that save by rename replace the template's inode, so watch its
    // directory and filter on the path instead
    let template_parent = template_dir(&paths);
    let covered = [&paths.content, &paths.static_assets]
        .iter()
        .any(|dir| dir.exists() && template_parent.starts_with(dir));
    if template_parent.exists() && !covered {
        watcher.watch(template_parent, RecursiveMode::NonRecursive)?;
    }

    let mut last_rebuild = Instant::now();
    let debounce = Duration::from_millis(200);

    loop {
        match rx.recv_timeout(Duration::from_secs(1)) {
            Ok(event) => {
                let is_change = matches!(
                    event.kind,
                    EventKind::Modify(_) | EventKind::Create(_) | EventKind::Remove(_)
                );
                let outside_output = event.paths.iter().all(|p| !p.starts_with(&paths.output));
                let relevant = event.paths.iter().any(|p| triggers_rebuild(&paths, p));

                if is_change && outside_output && relevant && last_rebuild.elapsed() > debounce {
                    // Small delay to let the editor finish writing
                    std::thread::sleep(Duration::from_millis(50));

                    match run_build(root, config, opts) {
                        Ok(report) => {
                            if !opts.quiet {
                                report.print_summary();
                            }
                            last_rebuild = Instant::now();
                        }
                        Err(e) => {
                            eprintln!("{} {:#}", "Build error:".red().bold(), e);
                        }
                    }
                }
            }
            Err(mpsc::RecvTimeoutError::Timeout) => {}
            Err(mpsc::RecvTimeoutError::Disconnected) => break,
        }
    }

    Ok(())
}

fn template_dir(paths: &SitePaths) -> &Path {
    paths
        .template
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or(Path::new("."))
}

/// Whether a change at `path` affects the built site.
fn triggers_rebuild(paths: &SitePaths, path: &Path) -> bool {
    path.starts_with(&paths.content)
        || path.starts_with(&paths.static_assets)
        || path == paths.template
}
