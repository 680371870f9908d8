//! Converter for the lecture markup dialect.
//!
//! The dialect is a small subset of Markdown: `#`/`##`/`###` headings, `> `
//! quotes, flat `- ` lists with `[ ]`/`[x]` checkboxes, fenced code blocks,
//! and the inline forms `**bold**`, `*italic*`, `` `code` `` and
//! `[text](url)`. Everything else is copied through untouched, raw HTML
//! included, and no paragraphs are ever wrapped.
//!
//! Conversion happens in two stages. First the rewrite passes in [`PASSES`]
//! run over the whole text, strictly in table order, each seeing the output
//! of the one before. Their order is observable: headings and emphasis are
//! rewritten before fences are cut out, so they show up (escaped) inside
//! code blocks, and inline code keeps any emphasis found inside it. Then
//! [`parse_page`] classifies the resulting lines into quotes, lists and
//! plain lines, and [`render_elements_to_html`] joins them back together.

use std::sync::LazyLock;

use regex::{Captures, Regex};

const UNCHECKED_BOX: &str = "☐";
const CHECKED_BOX: &str = "☑";

static H1: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^# (.*)$").unwrap());
static H2: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^## (.*)$").unwrap());
static H3: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^### (.*)$").unwrap());
static BOLD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*\*(.*?)\*\*").unwrap());
static ITALIC: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*(.*?)\*").unwrap());
static FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```(\w+)?\n(.*?)```").unwrap());
static INLINE_CODE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"`([^`]+)`").unwrap());
static LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]+)\]\(([^)]+)\)").unwrap());

/// A named text rewrite.
pub struct Pass {
    pub name: &'static str,
    pub apply: fn(&str) -> String,
}

/// Whole-text rewrites, in the order they run.
pub const PASSES: [Pass; 6] = [
    Pass { name: "headings", apply: headings },
    Pass { name: "bold", apply: bold },
    Pass { name: "italic", apply: italic },
    Pass { name: "fenced_code", apply: fenced_code },
    Pass { name: "inline_code", apply: inline_code },
    Pass { name: "links", apply: links },
];

#[derive(Debug, Clone, PartialEq)]
pub enum PageElement {
    /// A line that matched no block rule. Rendered without a wrapper.
    Line(String),
    BlockQuote(String),
    List { items: Vec<ListItem> },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ListItem {
    pub content: String,
}

/// Convert a whole document to an HTML fragment.
pub fn markdown_to_html(source: &str) -> String {
    render_elements_to_html(&parse_page(source))
}

/// Run every pass, then split the result into block elements: one per line,
/// except that each run of list lines becomes a single list.
pub fn parse_page(source: &str) -> Vec<PageElement> {
    let text = PASSES
        .iter()
        .fold(source.to_string(), |text, pass| (pass.apply)(&text));

    let mut elements = Vec::new();
    let mut lines = text.split('\n').peekable();

    while let Some(line) = lines.next() {
        if let Some(quoted) = line.strip_prefix("> ") {
            elements.push(PageElement::BlockQuote(quoted.to_string()));
            continue;
        }

        let Some(first) = list_item(line) else {
            elements.push(PageElement::Line(line.to_string()));
            continue;
        };

        let mut items = vec![first];
        while let Some(item) = lines.peek().and_then(|next| list_item(next)) {
            items.push(item);
            lines.next();
        }
        elements.push(PageElement::List { items });
    }

    elements
}

fn list_item(line: &str) -> Option<ListItem> {
    let text = line.trim().strip_prefix("- ")?;
    let content = text
        .replace("[ ]", UNCHECKED_BOX)
        .replace("[x]", CHECKED_BOX);

    Some(ListItem { content })
}

fn headings(text: &str) -> String {
    let text = H1.replace_all(text, "<h1>${1}</h1>");
    let text = H2.replace_all(&text, "<h2>${1}</h2>");
    H3.replace_all(&text, "<h3>${1}</h3>").into_owned()
}

fn bold(text: &str) -> String {
    BOLD.replace_all(text, "<strong>${1}</strong>").into_owned()
}

fn italic(text: &str) -> String {
    ITALIC.replace_all(text, "<em>${1}</em>").into_owned()
}

fn fenced_code(text: &str) -> String {
    FENCE
        .replace_all(text, |caps: &Captures| {
            let language = caps.get(1).map_or("", |m| m.as_str());
            let code = escape_angle_brackets(&caps[2]);
            if language == "mermaid" {
                format!("<pre class=\"mermaid\">{code}</pre>")
            } else {
                format!("<pre><code class=\"language-{language}\">{code}</code></pre>")
            }
        })
        .into_owned()
}

fn inline_code(text: &str) -> String {
    INLINE_CODE.replace_all(text, "<code>${1}</code>").into_owned()
}

fn links(text: &str) -> String {
    LINK.replace_all(text, |caps: &Captures| {
        format!("<a href=\"{}\">{}</a>", rewrite_document_url(&caps[2]), &caps[1])
    })
    .into_owned()
}

/// Links between documents point at `.md` sources; the site serves `.html`.
fn rewrite_document_url(url: &str) -> String {
    match url.strip_suffix(".md") {
        Some(stem) => format!("{stem}.html"),
        None => url.to_string(),
    }
}

/// Only angle brackets are escaped so entities written in code stay as typed.
fn escape_angle_brackets(text: &str) -> String {
    text.replace('<', "&lt;").replace('>', "&gt;")
}

// HTML Rendering functions
pub fn render_elements_to_html(elements: &[PageElement]) -> String {
    elements
        .iter()
        .map(render_element)
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_element(element: &PageElement) -> String {
    match element {
        PageElement::Line(line) => line.clone(),
        PageElement::BlockQuote(content) => format!("<blockquote>{content}</blockquote>"),
        PageElement::List { items } => {
            let mut lines = Vec::with_capacity(items.len() + 2);
            lines.push("<ul>".to_string());
            for item in items {
                lines.push(format!("<li>{}</li>", item.content));
            }
            lines.push("</ul>".to_string());
            lines.join("\n")
        }
    }
}
