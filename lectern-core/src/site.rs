use std::fmt;
use std::path::{Component, Path, PathBuf};

/// A markup document, identified by its path relative to the source root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    /// File stem, used as the page title.
    pub title: String,
    pub path: PathBuf,
}

impl Page {
    pub fn new<P: AsRef<Path>>(path: P) -> Option<Self> {
        let path = normalize(path.as_ref());
        let title = path.file_stem()?.to_string_lossy().to_string();

        Some(Self { title, path })
    }

    /// Where the rendered page lives, relative to the output root.
    pub fn out_path(&self) -> SitePath {
        SitePath::from_relative(&self.path.with_extension("html"))
    }

    /// Label shown in the sidebar.
    pub fn nav_title(&self) -> String {
        self.title.replace('_', " ")
    }

    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_default()
    }
}

/// A labelled group of documents shown under one sidebar heading.
#[derive(Debug, Clone, PartialEq)]
pub struct Collection {
    pub name: String,
    pub pages: Vec<Page>,
}

/// A location inside the output tree.
///
/// Every cross-reference on a page is derived from two of these: the page's
/// own location and the target's.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SitePath {
    segments: Vec<String>,
}

impl SitePath {
    pub fn from_relative(path: &Path) -> Self {
        let segments = path
            .components()
            .filter_map(|c| match c {
                Component::Normal(s) => Some(s.to_string_lossy().to_string()),
                _ => None,
            })
            .collect();

        Self { segments }
    }

    pub fn stylesheet() -> Self {
        Self::from_relative(Path::new("assets/style.css"))
    }

    /// Number of directories between the output root and this file.
    pub fn depth(&self) -> usize {
        self.segments.len().saturating_sub(1)
    }

    /// Relative prefix that leads from this file back to the output root.
    pub fn root_prefix(&self) -> String {
        "../".repeat(self.depth())
    }

    /// Relative href from this file to `target`.
    ///
    /// The href always climbs to the output root and descends from there,
    /// so a page at depth one reaches its own sibling as `../dir/sibling`.
    pub fn href_to(&self, target: &SitePath) -> String {
        format!("{}{}", self.root_prefix(), target)
    }

    pub fn to_path_buf(&self) -> PathBuf {
        self.segments.iter().collect()
    }
}

impl fmt::Display for SitePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("/"))
    }
}

/// Drops `.` components so `./kotlin/Intro.md` and `kotlin/Intro.md` compare
/// equal.
pub(crate) fn normalize(path: &Path) -> PathBuf {
    path.components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}
