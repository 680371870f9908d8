use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Site-wide settings that end up in every rendered page.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    pub site: SiteConfig,
    /// Sidebar groups, rendered in this order.
    pub groups: Vec<GroupConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            site: SiteConfig::default(),
            groups: vec![
                GroupConfig {
                    title: "Core Track".into(),
                    dir: PathBuf::from("."),
                    first: Some("ROADMAP.md".into()),
                    exclude: vec!["ROADMAP.KR.md".into()],
                },
                GroupConfig {
                    title: "Kotlin Vibe".into(),
                    dir: PathBuf::from("kotlin"),
                    first: Some("ROADMAP.md".into()),
                    exclude: Vec::new(),
                },
            ],
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct SiteConfig {
    /// Appended to every page's `<title>`.
    pub title: String,
    pub sidebar_title: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "MoAI Master Class".into(),
            sidebar_title: "MoAI-ADK Class 🗿".into(),
        }
    }
}

/// One sidebar group: the markup files directly inside `dir`.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct GroupConfig {
    pub title: String,
    /// Relative to the source root.
    pub dir: PathBuf,
    /// File name listed before everything else, e.g. a roadmap.
    #[serde(default)]
    pub first: Option<String>,
    /// File names left out of the listing.
    #[serde(default)]
    pub exclude: Vec<String>,
}
