pub mod builder;
pub mod config;
pub mod markdown;
pub mod navigation;
pub mod scanner;
pub mod site;
pub mod template;

// Re-export main types
pub use builder::{BuildError, Site, SiteBuilder};
pub use markdown::{markdown_to_html, parse_page};
pub use navigation::{NavItem, build_navigation};
pub use scanner::{ScanError, SiteScanner};
pub use site::{Collection, Page, SitePath};
pub use template::{TemplateError, TemplateRenderer};
