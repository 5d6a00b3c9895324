use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Default config file name, looked up in the site root.
pub const CONFIG_FILE: &str = "site.json";

/// Top-level site.json schema.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteConfig {
    /// Directory of Markdown sources, mirrored into `output_dir` as pages.
    #[serde(default = "default_content_dir")]
    pub content_dir: String,

    /// Directory of static assets copied verbatim into `output_dir`.
    #[serde(default = "default_static_dir")]
    pub static_dir: String,

    /// Build output; deleted and recreated on every build.
    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    /// Page template with `{{ Title }}` and `{{ Content }}` placeholders.
    #[serde(default = "default_template")]
    pub template: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            content_dir: default_content_dir(),
            static_dir: default_static_dir(),
            output_dir: default_output_dir(),
            template: default_template(),
        }
    }
}

fn default_content_dir() -> String {
    "content".to_string()
}
fn default_static_dir() -> String {
    "static".to_string()
}
fn default_output_dir() -> String {
    "public".to_string()
}
fn default_template() -> String {
    "template.html".to_string()
}

impl SiteConfig {
    /// Paths from this config, resolved against the site root.
    pub fn resolve(&self, root: &Path) -> SitePaths {
        SitePaths {
            content: root.join(&self.content_dir),
            static_assets: root.join(&self.static_dir),
            output: root.join(&self.output_dir),
            template: root.join(&self.template),
        }
    }
}

/// Absolute (root-joined) locations a build reads from and writes to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SitePaths {
    pub content: PathBuf,
    pub static_assets: PathBuf,
    pub output: PathBuf,
    pub template: PathBuf,
}

/// Load config from an explicit file, or from `site.json` in `root`, or
/// return defaults if neither exists.
///
/// An explicitly named file must exist.
pub fn load_config(root: &Path, explicit: Option<&Path>) -> Result<SiteConfig> {
    let config_path = match explicit {
        Some(path) => path.to_path_buf(),
        None => root.join(CONFIG_FILE),
    };

    if config_path.exists() {
        let raw = std::fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read {}", config_path.display()))?;
        let config: SiteConfig = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse {}", config_path.display()))?;
        Ok(config)
    } else if explicit.is_some() {
        anyhow::bail!("Config file {} does not exist", config_path.display())
    } else {
        Ok(SiteConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_full_config() {
        let json = r#"{
            "contentDir": "docs",
            "staticDir": "assets",
            "outputDir": "dist",
            "template": "layout/page.html"
        }"#;

        let config: SiteConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.content_dir, "docs");
        assert_eq!(config.static_dir, "assets");
        assert_eq!(config.output_dir, "dist");
        assert_eq!(config.template, "layout/page.html");
    }

    #[test]
    fn test_parse_partial_config() {
        let json = r#"{ "outputDir": "docs" }"#;
        let config: SiteConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.output_dir, "docs");
        assert_eq!(config.content_dir, "content");
        assert_eq!(config.template, "template.html");
    }

    #[test]
    fn test_defaults() {
        let config: SiteConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, SiteConfig::default());
        assert_eq!(config.static_dir, "static");
        assert_eq!(config.output_dir, "public");
    }

    #[test]
    fn test_resolve_joins_root() {
        let paths = SiteConfig::default().resolve(Path::new("/site"));
        assert_eq!(paths.content, Path::new("/site/content"));
        assert_eq!(paths.static_assets, Path::new("/site/static"));
        assert_eq!(paths.output, Path::new("/site/public"));
        assert_eq!(paths.template, Path::new("/site/template.html"));
    }

    #[test]
    fn test_missing_default_file_gives_defaults() {
        let root = std::env::temp_dir().join("mdsite-config-test-missing");
        let config = load_config(&root, None).unwrap();
        assert_eq!(config, SiteConfig::default());
    }

    #[test]
    fn test_missing_explicit_file_fails() {
        let root = std::env::temp_dir();
        let missing = root.join("mdsite-config-test-does-not-exist.json");
        assert!(load_config(&root, Some(&missing)).is_err());
    }
}
