//! Page assembly helpers: title extraction and template substitution.

use serde::Serialize;

use crate::convert::markdown_to_html_node;
use crate::error::{Diagnostic, PageError, TitleError};

/// Placeholder replaced with the page title.
pub const TITLE_TOKEN: &str = "{{ Title }}";
/// Placeholder replaced with the rendered document.
pub const CONTENT_TOKEN: &str = "{{ Content }}";

/// Return the text of the first `# ` heading line, trimmed.
pub fn extract_title(markdown: &str) -> Result<String, TitleError> {
    markdown
        .lines()
        .find_map(|line| line.strip_prefix("# "))
        .map(|title| title.trim().to_string())
        .ok_or(TitleError::NoTitleHeading)
}

/// Substitute every title and content placeholder in `template`.
pub fn fill_template(template: &str, title: &str, content: &str) -> String {
    template
        .replace(TITLE_TOKEN, title)
        .replace(CONTENT_TOKEN, content)
}

/// A fully assembled page.
#[derive(Debug, Clone, Serialize)]
pub struct RenderedPage {
    pub title: String,
    /// The rendered `<div>` fragment.
    pub content: String,
    /// `template` with both placeholders filled.
    pub html: String,
    pub diagnostics: Vec<Diagnostic>,
}

/// Convert `markdown` and drop it into `template`.
///
/// Fails when the document has no `# ` title line.
pub fn render_page(markdown: &str, template: &str) -> Result<RenderedPage, PageError> {
    let title = extract_title(markdown)?;
    let result = markdown_to_html_node(markdown);
    let content = result.to_html()?;
    let html = fill_template(template, &title, &content);
    Ok(RenderedPage {
        title,
        content,
        html,
        diagnostics: result.diagnostics,
    })
}

// ------------------------------------------------------------------
// Tests
// ------------------------------------------------------------------
