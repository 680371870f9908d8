use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::{DirEntry, WalkDir};

use crate::config::GroupConfig;
use crate::site::{Collection, Page, normalize};

#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("Source directory does not exist: {}", .0.display())]
    MissingSourceDir(PathBuf),
    #[error("Failed to read directory {}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to walk source tree")]
    Walk(#[from] walkdir::Error),
}

/// Discovers the documents to render and the documents listed in each
/// sidebar group.
pub struct SiteScanner {
    source_dir: PathBuf,
    skip: Option<PathBuf>,
    exclude: Vec<String>,
}

impl SiteScanner {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            source_dir: path.as_ref().to_path_buf(),
            skip: None,
            exclude: Vec::new(),
        }
    }

    /// Never descend into `dir`. Used for the output directory when it sits
    /// inside the source tree.
    pub fn skip_dir<P: AsRef<Path>>(mut self, dir: P) -> Self {
        let source = normalize(&self.source_dir);
        self.skip = normalize(dir.as_ref())
            .strip_prefix(&source)
            .ok()
            .filter(|rel| !rel.as_os_str().is_empty())
            .map(Path::to_path_buf);
        self
    }

    /// Never descend into directories with any of these names.
    pub fn exclude(mut self, names: Vec<String>) -> Self {
        self.exclude = names;
        self
    }

    pub fn scan(&self, groups: &[GroupConfig]) -> Result<(Vec<Page>, Vec<Collection>), ScanError> {
        debug!("Scanning: {}", self.source_dir.display());

        let pages = self.scan_pages()?;
        let collections = self.scan_collections(groups)?;

        Ok((pages, collections))
    }

    /// Every markup document under the source root, in sorted order.
    pub fn scan_pages(&self) -> Result<Vec<Page>, ScanError> {
        if !self.source_dir.is_dir() {
            return Err(ScanError::MissingSourceDir(self.source_dir.clone()));
        }

        let mut pages = Vec::new();
        let walker = WalkDir::new(&self.source_dir)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| !self.is_excluded(e));

        for entry in walker {
            let entry = entry?;
            if !entry.file_type().is_file() || !is_markdown(entry.path()) {
                continue;
            }

            let relative = entry
                .path()
                .strip_prefix(&self.source_dir)
                .unwrap_or(entry.path());
            if let Some(page) = Page::new(relative) {
                pages.push(page);
            }
        }

        Ok(pages)
    }

    pub fn scan_collections(&self, groups: &[GroupConfig]) -> Result<Vec<Collection>, ScanError> {
        let mut collections = Vec::new();

        for group in groups {
            if let Some(collection) = self.scan_collection(group)? {
                collections.push(collection);
            }
        }

        Ok(collections)
    }

    /// `None` when the group's directory does not exist.
    fn scan_collection(&self, group: &GroupConfig) -> Result<Option<Collection>, ScanError> {
        let dir = self.source_dir.join(&group.dir);
        if !dir.is_dir() {
            debug!("Skipping group {}: {} not found", group.title, dir.display());
            return Ok(None);
        }

        let io_error = |source: std::io::Error| ScanError::Io {
            path: dir.clone(),
            source,
        };

        let mut pages = Vec::new();
        for entry in std::fs::read_dir(&dir).map_err(io_error)? {
            let path = entry.map_err(io_error)?.path();
            if !path.is_file() || !is_markdown(&path) {
                continue;
            }

            let Some(page) = Page::new(group.dir.join(path.file_name().unwrap_or_default())) else {
                continue;
            };
            if group.exclude.contains(&page.file_name()) {
                continue;
            }
            pages.push(page);
        }

        pages.sort_by_key(Page::file_name);

        if let Some(first) = &group.first
            && let Some(pos) = pages.iter().position(|p| &p.file_name() == first)
        {
            let page = pages.remove(pos);
            pages.insert(0, page);
        }

        Ok(Some(Collection {
            name: group.title.clone(),
            pages,
        }))
    }

    fn is_excluded(&self, entry: &DirEntry) -> bool {
        if entry.depth() == 0 || !entry.file_type().is_dir() {
            return false;
        }

        let relative = entry
            .path()
            .strip_prefix(&self.source_dir)
            .unwrap_or(entry.path());
        if self.skip.as_deref() == Some(normalize(relative).as_path()) {
            debug!("Skipping output directory {}", entry.path().display());
            return true;
        }

        let name = entry.file_name().to_string_lossy();
        self.exclude.iter().any(|excluded| excluded.as_str() == name)
    }
}

fn is_markdown(path: &Path) -> bool {
    path.extension().map(|ext| ext == "md").unwrap_or(false)
}
