use anyhow::{Context, Result};
use colored::Colorize;
use std::fs;
use std::path::{Path, PathBuf};

/// Scaffold a new site at the given path.
///
/// Existing files are left untouched, so running this inside a half-built
/// site only fills in what is missing.
pub fn init_site(path: Option<&str>, minimal: bool, quiet: bool) -> Result<()> {
    let target = match path {
        Some(p) => PathBuf::from(p),
        None => std::env::current_dir()?,
    };

    let site_name = target
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "my-site".to_string());

    if !quiet {
        println!(
            "{} {} at {}",
            "Initializing".green().bold(),
            site_name,
            target.display()
        );
    }

    fs::create_dir_all(&target)
        .with_context(|| format!("Failed to create {}", target.display()))?;

    let mut files: Vec<(&str, String)> = vec![
        ("site.json", generate_site_json()),
        ("template.html", generate_template()),
        ("content/index.md", generate_index_md(&site_name)),
        ("static/index.css", generate_css()),
    ];
    if !minimal {
        files.push(("content/blog/first-post.md", generate_first_post()));
    }

    for (rel, content) in &files {
        write_if_missing(&target, rel, content, quiet)?;
    }

    if !quiet {
        println!();
        println!("{}", "Done! Next steps:".bold());
        println!("  1. Write pages under content/");
        println!("  2. Run `mdsite build` to render them into public/");
    }

    Ok(())
}

fn write_if_missing(root: &Path, rel: &str, content: &str, quiet: bool) -> Result<()> {
    let path = root.join(rel);
    if path.exists() {
        if !quiet {
            println!("  {} {}", "Exists".dimmed(), rel);
        }
        return Ok(());
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    fs::write(&path, content).with_context(|| format!("Failed to write {}", path.display()))?;
    if !quiet {
        println!("  {} {}", "Created".green(), rel);
    }
    Ok(())
}

fn generate_site_json() -> String {
    r#"{
  "contentDir": "content",
  "staticDir": "static",
  "outputDir": "public",
  "template": "template.html"
}
"#
    .to_string()
}

fn generate_template() -> String {
    r#"<!doctype html>
<html>
  <head>
    <meta charset="utf-8" />
    <meta name="viewport" content="width=device-width, initial-scale=1" />
    <title>{{ Title }}</title>
    <link href="/index.css" rel="stylesheet" />
  </head>
  <body>
    <article>{{ Content }}</article>
  </body>
</html>
"#
    .to_string()
}

fn generate_index_md(name: &str) -> String {
    format!(
        "# {name}\n\n\
         Welcome to **{name}**. Edit `content/index.md` to change this page.\n\n\
         - Pages live under `content/`\n\
         - Static files live under `static/`\n"
    )
}

fn generate_first_post() -> String {
    "# First post\n\n\
     > Every site starts somewhere.\n\n\
     1. Write Markdown\n\
     2. Run the build\n\
     3. Publish `public/`\n"
        .to_string()
}

fn generate_css() -> String {
    "body {\n  font-family: sans-serif;\n  max-width: 40rem;\n  margin: 2rem auto;\n  line-height: 1.5;\n}\n"
        .to_string()
}
