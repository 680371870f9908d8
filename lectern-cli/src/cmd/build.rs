use crate::config::load_build_config;
use anyhow::{Context, Result};
use clap::{Arg, ArgAction, ArgMatches, Command};
use lectern_core::SiteBuilder;
use tracing::{debug, info};

pub fn add_build_args(command: Command) -> Command {
    command
        .arg(
            Arg::new("source")
                .short('s')
                .long("source")
                .value_name("DIR")
                .help("Source directory containing markdown files [default: lecture]"),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("DIR")
                .help("Output directory, deleted and recreated on every build [default: lecture/site]"),
        )
        .arg(
            Arg::new("template")
                .short('t')
                .long("template")
                .value_name("FILE")
                .help("Tera page template [default: built-in layout]"),
        )
        .arg(
            Arg::new("stylesheet")
                .long("stylesheet")
                .value_name("FILE")
                .help("Stylesheet copied to assets/style.css [default: lecture/scripts/assets/style.css]"),
        )
        .arg(
            Arg::new("exclude")
                .short('x')
                .long("exclude")
                .value_name("NAME")
                .action(ArgAction::Append)
                .help("Directory name to skip while looking for documents [default: scripts]"),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Configuration file [default: lectern.toml]"),
        )
}

pub fn make_subcommand() -> Command {
    add_build_args(Command::new("build")).about("Rebuild the whole site from markdown files")
}

pub fn execute(args: &ArgMatches) -> Result<()> {
    // Load cascading configuration
    let lectern_config = load_build_config(args).context("Failed to load configuration")?;
    let build_config = lectern_config.build_config();
    debug!("{lectern_config:#?}");

    let mut builder = SiteBuilder::new()
        .source_dir(&build_config.source)
        .output_dir(&build_config.output)
        .stylesheet(&build_config.stylesheet)
        .exclude(build_config.exclude.clone())
        .config(lectern_config.site.clone());

    if let Some(template) = &build_config.template {
        builder = builder.template(template);
    }

    let site = builder.build().context("Failed to prepare site")?;
    let written = site
        .render_all()
        .with_context(|| format!("Failed to build site into {}", build_config.output))?;

    info!(
        "Site built successfully in {} ({} pages)",
        build_config.output,
        written.len()
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_execute_builds_site() {
        let temp = tempfile::tempdir().unwrap();
        let source = temp.path().join("lecture");
        let output = temp.path().join("out");
        let stylesheet = temp.path().join("style.css");
        fs::create_dir_all(source.join("kotlin")).unwrap();
        fs::write(source.join("ROADMAP.md"), "# Roadmap\n").unwrap();
        fs::write(source.join("kotlin/Intro.md"), "# Intro\n").unwrap();
        fs::write(&stylesheet, "body {}\n").unwrap();

        let args = add_build_args(Command::new("test"))
            .try_get_matches_from([
                "test",
                "--config",
                temp.path().join("lectern.toml").to_str().unwrap(),
                "--source",
                source.to_str().unwrap(),
                "--output",
                output.to_str().unwrap(),
                "--stylesheet",
                stylesheet.to_str().unwrap(),
            ])
            .unwrap();

        execute(&args).unwrap();

        assert!(output.join("ROADMAP.html").is_file());
        assert!(output.join("kotlin/Intro.html").is_file());
        assert!(output.join("assets/style.css").is_file());
    }

    #[test]
    fn test_execute_fails_on_missing_source() {
        let temp = tempfile::tempdir().unwrap();
        let args = add_build_args(Command::new("test"))
            .try_get_matches_from([
                "test",
                "--config",
                temp.path().join("lectern.toml").to_str().unwrap(),
                "--source",
                temp.path().join("missing").to_str().unwrap(),
            ])
            .unwrap();

        assert!(execute(&args).is_err());
    }
}
