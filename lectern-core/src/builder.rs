use std::fs;
use std::path::{Component, Path, PathBuf};

use tracing::{debug, info};

use crate::config::{Config, SiteConfig};
use crate::markdown::markdown_to_html;
use crate::navigation::build_navigation;
use crate::scanner::{ScanError, SiteScanner};
use crate::site::{Collection, Page, SitePath};
use crate::template::{PageContext, TemplateError, TemplateRenderer};

#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("Source directory not specified")]
    MissingSourceDir,
    #[error("Stylesheet not specified")]
    MissingStylesheet,
    #[error(
        "Output directory {} would delete source directory {}",
        output.display(),
        source_dir.display()
    )]
    OutputContainsSource { output: PathBuf, source_dir: PathBuf },
    #[error(transparent)]
    Scan(#[from] ScanError),
    #[error(transparent)]
    Template(#[from] TemplateError),
    #[error("IO error on {}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl BuildError {
    fn io(path: &Path) -> impl FnOnce(std::io::Error) -> Self + '_ {
        move |source| BuildError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

pub struct SiteBuilder {
    source_dir: Option<PathBuf>,
    output_dir: PathBuf,
    template: Option<PathBuf>,
    stylesheet: Option<PathBuf>,
    exclude: Vec<String>,
    config: Config,
}

impl Default for SiteBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SiteBuilder {
    pub fn new() -> Self {
        Self {
            source_dir: None,
            output_dir: PathBuf::from("./site"),
            template: None,
            stylesheet: None,
            exclude: vec!["scripts".to_string()],
            config: Config::default(),
        }
    }

    // Required configuration
    pub fn source_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.source_dir = Some(path.as_ref().to_path_buf());
        self
    }

    pub fn stylesheet<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.stylesheet = Some(path.as_ref().to_path_buf());
        self
    }

    // Optional paths
    pub fn output_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.output_dir = path.as_ref().to_path_buf();
        self
    }

    /// Use a Tera template file instead of the built-in layout.
    pub fn template<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.template = Some(path.as_ref().to_path_buf());
        self
    }

    /// Directory names under the source root that never hold content.
    pub fn exclude(mut self, names: Vec<String>) -> Self {
        self.exclude = names;
        self
    }

    // Site labels and sidebar groups
    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Load the template and discover content. Nothing is written yet.
    pub fn build(self) -> Result<Site, BuildError> {
        let source_dir = self.source_dir.ok_or(BuildError::MissingSourceDir)?;
        let stylesheet = self.stylesheet.ok_or(BuildError::MissingStylesheet)?;

        // The output directory is wiped on every run.
        let resolved_source = resolve(&source_dir)?;
        let output = resolve(&self.output_dir)?;
        if resolved_source.starts_with(&output) {
            return Err(BuildError::OutputContainsSource {
                output,
                source_dir: resolved_source,
            });
        }

        let renderer = match &self.template {
            Some(path) => TemplateRenderer::from_file(path)?,
            None => TemplateRenderer::new()?,
        };

        let scanner = SiteScanner::new(&source_dir)
            .skip_dir(&self.output_dir)
            .exclude(self.exclude);
        let (pages, collections) = scanner.scan(&self.config.groups)?;

        debug!(
            "Discovered {} pages in {} groups",
            pages.len(),
            collections.len()
        );

        Ok(Site {
            pages,
            collections,
            renderer,
            source_dir,
            output_dir: self.output_dir,
            stylesheet,
            site: self.config.site,
        })
    }
}

/// Absolute form of `path` with `.` and `..` folded away, without touching
/// the filesystem.
fn resolve(path: &Path) -> Result<PathBuf, BuildError> {
    let absolute = std::path::absolute(path).map_err(BuildError::io(path))?;

    let mut resolved = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                resolved.pop();
            }
            other => resolved.push(other),
        }
    }

    Ok(resolved)
}

pub struct Site {
    pages: Vec<Page>,
    collections: Vec<Collection>,
    renderer: TemplateRenderer,
    source_dir: PathBuf,
    output_dir: PathBuf,
    stylesheet: PathBuf,
    site: SiteConfig,
}

impl Site {
    /// Rebuild the whole output tree. Returns the pages written, in order.
    ///
    /// Whatever was in the output directory before is deleted first. The
    /// first error stops the run and leaves the tree as it is at that point.
    pub fn render_all(&self) -> Result<Vec<PathBuf>, BuildError> {
        self.reset_output_dir()?;
        self.copy_stylesheet()?;

        let mut written = Vec::with_capacity(self.pages.len());
        for page in &self.pages {
            written.push(self.render_page(page)?);
        }

        Ok(written)
    }

    fn reset_output_dir(&self) -> Result<(), BuildError> {
        if self.output_dir.exists() {
            debug!("Clearing {}", self.output_dir.display());
            fs::remove_dir_all(&self.output_dir).map_err(BuildError::io(&self.output_dir))?;
        }

        fs::create_dir_all(&self.output_dir).map_err(BuildError::io(&self.output_dir))?;

        Ok(())
    }

    fn copy_stylesheet(&self) -> Result<(), BuildError> {
        let target = self.output_dir.join(SitePath::stylesheet().to_path_buf());
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(BuildError::io(parent))?;
        }

        debug!("Copying {} to {}", self.stylesheet.display(), target.display());
        fs::copy(&self.stylesheet, &target).map_err(BuildError::io(&self.stylesheet))?;

        Ok(())
    }

    fn render_page(&self, page: &Page) -> Result<PathBuf, BuildError> {
        let source_path = self.source_dir.join(&page.path);
        info!("Processing {}...", source_path.display());

        let markup = fs::read_to_string(&source_path).map_err(BuildError::io(&source_path))?;
        let content = markdown_to_html(&markup);

        let location = page.out_path();
        let navigation = build_navigation(page, &self.collections);

        let html = self.renderer.render(&PageContext {
            title: &page.title,
            content: &content,
            navigation: &navigation,
            stylesheet: location.href_to(&SitePath::stylesheet()),
            root: location.root_prefix(),
            site: &self.site,
        })?;

        let output_path = self.output_dir.join(location.to_path_buf());
        if let Some(parent) = output_path.parent() {
            fs::create_dir_all(parent).map_err(BuildError::io(parent))?;
        }
        fs::write(&output_path, html).map_err(BuildError::io(&output_path))?;

        Ok(output_path)
    }
}
