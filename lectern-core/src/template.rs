use std::path::{Path, PathBuf};

use serde::Serialize;
use tera::{Context, Tera};

use crate::config::SiteConfig;

const PAGE_TEMPLATE: &str = "page.html";
const DEFAULT_PAGE: &str = include_str!("../templates/page.html");

#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    #[error("Template error: {0}")]
    Tera(#[from] tera::Error),
    #[error("Failed to read template {}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Everything a page template can refer to.
#[derive(Debug, Serialize)]
pub struct PageContext<'a> {
    pub title: &'a str,
    /// Converted document body, inserted unescaped.
    pub content: &'a str,
    /// Sidebar fragment, inserted unescaped.
    pub navigation: &'a str,
    /// Href of the site stylesheet relative to this page.
    pub stylesheet: String,
    /// Relative prefix back to the output root (`""`, `"../"`, ...).
    pub root: String,
    pub site: &'a SiteConfig,
}

/// Renders the single page layout shared by every document.
pub struct TemplateRenderer {
    tera: Tera,
}

impl TemplateRenderer {
    /// Renderer using the built-in layout.
    pub fn new() -> Result<Self, TemplateError> {
        Self::from_source(DEFAULT_PAGE)
    }

    /// Renderer using a Tera template read from `path`.
    pub fn from_file(path: &Path) -> Result<Self, TemplateError> {
        let source = std::fs::read_to_string(path).map_err(|source| TemplateError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_source(&source)
    }

    pub fn from_source(source: &str) -> Result<Self, TemplateError> {
        let mut tera = Tera::default();
        tera.add_raw_template(PAGE_TEMPLATE, source)?;

        Ok(Self { tera })
    }

    pub fn render(&self, page: &PageContext) -> Result<String, TemplateError> {
        let context = Context::from_serialize(page)?;
        Ok(self.tera.render(PAGE_TEMPLATE, &context)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context<'a>(site: &'a SiteConfig, navigation: &'a str) -> PageContext<'a> {
        PageContext {
            title: "Intro",
            content: "<h1>Intro</h1>",
            navigation,
            stylesheet: "../assets/style.css".into(),
            root: "../".into(),
            site,
        }
    }

    #[test]
    fn test_default_layout_substitutes_all_points() {
        let site = SiteConfig::default();
        let renderer = TemplateRenderer::new().unwrap();
        let html = renderer
            .render(&context(&site, "<a href=\"../ROADMAP.html\">ROADMAP</a>"))
            .unwrap();

        assert!(html.contains("<title>Intro - MoAI Master Class</title>"));
        assert!(html.contains("<h1>Intro</h1>"));
        assert!(html.contains("<a href=\"../ROADMAP.html\">ROADMAP</a>"));
        assert!(html.contains("href=\"../assets/style.css\""));
        assert!(html.contains("mermaid.initialize({ startOnLoad: true, theme: 'dark' });"));
        assert!(html.contains(
            "href=\"https://cdnjs.cloudflare.com/ajax/libs/highlight.js/11.9.0/styles/github-dark.min.css\""
        ));
    }

    #[test]
    fn test_title_is_escaped() {
        let site = SiteConfig::default();
        let renderer = TemplateRenderer::from_source("{{ title }}|{{ content | safe }}").unwrap();
        let mut page = context(&site, "");
        page.title = "Q&A";

        assert_eq!(renderer.render(&page).unwrap(), "Q&amp;A|<h1>Intro</h1>");
    }

    #[test]
    fn test_custom_template_from_file() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("layout.html");
        std::fs::write(&path, "<link href=\"{{ root | safe }}assets/x.css\">{{ navigation | safe }}").unwrap();

        let site = SiteConfig::default();
        let renderer = TemplateRenderer::from_file(&path).unwrap();
        let html = renderer.render(&context(&site, "<nav></nav>")).unwrap();

        assert_eq!(html, "<link href=\"../assets/x.css\"><nav></nav>");
    }

    #[test]
    fn test_missing_template_file() {
        let temp = tempfile::tempdir().unwrap();
        let result = TemplateRenderer::from_file(&temp.path().join("missing.html"));
        assert!(matches!(result, Err(TemplateError::Io { .. })));
    }

    #[test]
    fn test_invalid_template_source() {
        assert!(matches!(
            TemplateRenderer::from_source("{{ unclosed"),
            Err(TemplateError::Tera(_))
        ));
    }
}
