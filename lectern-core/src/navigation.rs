//! Sidebar navigation.
//!
//! The sidebar lists every group with all of its documents. Hrefs are
//! relative to the page being rendered, and the entry for that page is
//! marked `active`.

use html_escape::{encode_double_quoted_attribute, encode_text};

use crate::site::{Collection, Page};

#[derive(Debug, Clone, PartialEq)]
pub struct NavItem {
    pub text: String,
    pub link: String,
    pub active: bool,
}

/// Sidebar entries for one group as seen from `current`.
pub fn nav_items(current: &Page, collection: &Collection) -> Vec<NavItem> {
    let from = current.out_path();

    collection
        .pages
        .iter()
        .map(|page| NavItem {
            text: page.nav_title(),
            link: from.href_to(&page.out_path()),
            active: page.path == current.path,
        })
        .collect()
}

pub fn build_navigation(current: &Page, groups: &[Collection]) -> String {
    let mut nav = Vec::new();

    for group in groups {
        nav.push(format!(
            "<div class=\"nav-group\"><div class=\"nav-group-title\">{}</div>",
            encode_text(&group.name)
        ));

        for item in nav_items(current, group) {
            let active_class = if item.active { " active" } else { "" };
            nav.push(format!(
                "<a href=\"{}\" class=\"nav-link{}\">{}</a>",
                encode_double_quoted_attribute(&item.link),
                active_class,
                encode_text(&item.text)
            ));
        }

        nav.push("</div>".to_string());
    }

    nav.join("\n")
}
