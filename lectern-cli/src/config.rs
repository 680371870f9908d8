use anyhow::Result;
use clap::ArgMatches;
use config::{Config as ConfigBuilder, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Complete configuration that merges CLI args, env vars, config files, and defaults
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct LecternConfig {
    /// Build configuration
    pub build: BuildConfig,
    /// Site labels and sidebar groups (from lectern-core)
    #[serde(flatten)]
    pub site: lectern_core::config::Config,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BuildConfig {
    /// Source directory containing markdown files
    pub source: String,
    /// Output directory for generated site, wiped on every build
    pub output: String,
    /// Tera page template; the built-in layout when unset
    pub template: Option<String>,
    /// Stylesheet copied to assets/style.css
    pub stylesheet: String,
    /// Directory names under the source that hold no content
    pub exclude: Vec<String>,
    /// Configuration file path
    pub config: String,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            source: "lecture".to_string(),
            output: "lecture/site".to_string(),
            template: None,
            stylesheet: "lecture/scripts/assets/style.css".to_string(),
            exclude: vec!["scripts".to_string()],
            config: "lectern.toml".to_string(),
        }
    }
}

impl LecternConfig {
    /// Load configuration with cascading precedence:
    /// 1. CLI arguments (highest priority)
    /// 2. Environment variables (LECTERN_*)
    /// 3. Configuration file
    /// 4. Defaults (lowest priority)
    pub fn load(args: &ArgMatches) -> Result<Self> {
        let defaults = Self::default();
        let config_file = args
            .get_one::<String>("config")
            .cloned()
            .unwrap_or_else(|| defaults.build.config.clone());

        let mut builder = ConfigBuilder::builder();

        // 1. Start with defaults
        builder = builder.add_source(ConfigBuilder::try_from(&defaults)?);

        // 2. Add configuration file if it exists
        let config_path = PathBuf::from(&config_file);
        if config_path.exists() {
            builder = builder.add_source(File::from(config_path));
        }

        // 3. Add environment variables with LECTERN_ prefix
        builder = builder.add_source(
            Environment::with_prefix("LECTERN")
                .prefix_separator("_")
                .separator("__"), // Use double underscore for nested keys
        );

        // 4. Override with CLI arguments (highest priority)
        for key in ["source", "output", "template", "stylesheet"] {
            if let Some(value) = args.get_one::<String>(key) {
                builder = builder.set_override(format!("build.{key}"), value.as_str())?;
            }
        }
        builder = builder.set_override("build.config", config_file)?;

        if let Some(exclude) = args.get_many::<String>("exclude") {
            let names: Vec<String> = exclude.cloned().collect();
            builder = builder.set_override("build.exclude", names)?;
        }

        // Build and deserialize
        let config = builder.build()?;
        let lectern_config: LecternConfig = config.try_deserialize()?;

        Ok(lectern_config)
    }

    /// Get the build configuration
    pub fn build_config(&self) -> &BuildConfig {
        &self.build
    }
}

/// Load configuration specifically for build commands
pub fn load_build_config(args: &ArgMatches) -> Result<LecternConfig> {
    LecternConfig::load(args)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cmd::build::add_build_args;
    use clap::Command;

    fn matches(args: &[&str]) -> ArgMatches {
        add_build_args(Command::new("test"))
            .try_get_matches_from(args)
            .unwrap()
    }

    #[test]
    fn test_default_config() {
        let config = LecternConfig::default();
        assert_eq!(config.build.source, "lecture");
        assert_eq!(config.build.output, "lecture/site");
        assert_eq!(config.build.stylesheet, "lecture/scripts/assets/style.css");
        assert_eq!(config.build.exclude, ["scripts"]);
        assert!(config.build.template.is_none());
        assert_eq!(config.site.groups.len(), 2);
    }

    #[test]
    fn test_no_args_uses_defaults() {
        let temp = tempfile::tempdir().unwrap();
        let missing = temp.path().join("lectern.toml");
        let config = LecternConfig::load(&matches(&[
            "test",
            "--config",
            missing.to_str().unwrap(),
        ]))
        .unwrap();

        assert_eq!(config.build.source, "lecture");
        assert_eq!(config.build.output, "lecture/site");
        assert!(config.build.template.is_none());
        assert_eq!(config.site.site.title, "MoAI Master Class");
        assert_eq!(config.site.groups[0].title, "Core Track");
    }

    #[test]
    fn test_cli_args_override() {
        let temp = tempfile::tempdir().unwrap();
        let missing = temp.path().join("lectern.toml");
        let config = LecternConfig::load(&matches(&[
            "test",
            "--config",
            missing.to_str().unwrap(),
            "--source",
            "/custom/source",
            "--output",
            "/custom/output",
            "--exclude",
            "tools",
            "--exclude",
            "drafts",
        ]))
        .unwrap();

        assert_eq!(config.build.source, "/custom/source");
        assert_eq!(config.build.output, "/custom/output");
        assert_eq!(config.build.exclude, ["tools", "drafts"]);
        // Should still have defaults for non-overridden values
        assert_eq!(config.build.stylesheet, "lecture/scripts/assets/style.css");
    }

    #[test]
    fn test_config_file_sits_between_defaults_and_cli() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("lectern.toml");
        std::fs::write(
            &path,
            r#"
[build]
source = "notes"
output = "notes/out"
template = "notes/layout.html"

[site]
title = "Rust Course"
"#,
        )
        .unwrap();

        let config = LecternConfig::load(&matches(&[
            "test",
            "--config",
            path.to_str().unwrap(),
            "--output",
            "public",
        ]))
        .unwrap();

        assert_eq!(config.build.source, "notes");
        assert_eq!(config.build.output, "public");
        assert_eq!(config.build.template.as_deref(), Some("notes/layout.html"));
        assert_eq!(config.site.site.title, "Rust Course");
    }
}
