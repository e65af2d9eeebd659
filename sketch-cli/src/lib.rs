//! # SketchFlow CLI
//!
//! Command-line access to the projects a SketchFlow data directory holds.
//!
//! ## Usage
//!
//! ```bash
//! sketchflow new --name "Shop" --goal "Browse products, add to cart, then check out"
//! sketchflow blueprint --target nextjs --out shop.md
//! sketchflow list
//! ```
//!
//! ## Architecture
//!
//! - `CliArgs` - Command-line arguments parsed with clap
//! - `CliConfig` - Resolved data directory, snapping, and command
//! - `run` - Opens a `ProjectStore` on disk, executes one command, flushes

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use sketch_core::{
    screen_goal_fragments, DeviceType, FsStorage, ProjectId, ProjectStore, StoreConfig,
};
use sketch_export::{generate_blueprint, ExportTarget};

/// Default project directory, relative to the working directory.
pub const DEFAULT_DATA_DIR: &str = "./.sketchflow";

/// Command-line arguments for sketchflow.
#[derive(Debug, Clone, Parser)]
#[command(name = "sketchflow")]
#[command(about = "SketchFlow wireframe projects from the command line")]
#[command(version)]
pub struct CliArgs {
    /// Directory holding project records
    #[arg(long, env = "SKETCHFLOW_DATA_DIR", default_value = DEFAULT_DATA_DIR)]
    pub data_dir: PathBuf,

    /// Disable grid snapping
    #[arg(long, env = "SKETCHFLOW_NO_SNAP")]
    pub no_snap: bool,

    /// What to do
    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// List stored projects, most recent first
    List,
    /// Create a project and make it active
    New {
        /// Project name
        #[arg(long)]
        name: Option<String>,
        /// Overall goal; a multi-step goal scaffolds one screen per step
        #[arg(long)]
        goal: Option<String>,
        /// Target device: mobile, tablet, or desktop
        #[arg(long, value_parser = parse_device)]
        device: Option<DeviceType>,
    },
    /// Import a project JSON file and make it active
    Import {
        /// File to read
        file: PathBuf,
    },
    /// Write the active project as JSON
    ExportJson {
        /// Output file (stdout when omitted)
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Write the Markdown blueprint of the active project
    Blueprint {
        /// react-tailwind, html-css, or nextjs
        #[arg(long, env = "SKETCHFLOW_TARGET", default_value = "react-tailwind")]
        target: ExportTarget,
        /// Output file (stdout when omitted)
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Make a stored project active
    Switch {
        /// Project id
        id: String,
    },
    /// Delete a stored project other than the active one
    Delete {
        /// Project id
        id: String,
    },
}

fn parse_device(name: &str) -> Result<DeviceType, String> {
    DeviceType::parse(&name.to_ascii_lowercase())
        .ok_or_else(|| format!("unknown device '{name}' (expected mobile, tablet, or desktop)"))
}

/// Resolved CLI configuration.
#[derive(Debug, Clone)]
pub struct CliConfig {
    /// Directory holding project records.
    pub data_dir: PathBuf,
    /// Whether positions snap to the grid.
    pub snap_enabled: bool,
    /// Command to run.
    pub command: Command,
}

impl CliConfig {
    /// Store settings for this invocation.
    #[must_use]
    pub fn store_config(&self) -> StoreConfig {
        StoreConfig::default().with_snap(self.snap_enabled)
    }
}

impl From<CliArgs> for CliConfig {
    fn from(args: CliArgs) -> Self {
        Self {
            data_dir: args.data_dir,
            snap_enabled: !args.no_snap,
            command: args.command,
        }
    }
}

/// Execute one command against the data directory, writing results to `out`.
///
/// Pending writes are flushed before returning.
///
/// # Errors
///
/// Returns an error if the data directory cannot be opened, an input file
/// cannot be read, an import is rejected, the project to switch to does not
/// exist, or output cannot be written.
pub fn run(config: &CliConfig, out: &mut impl Write) -> anyhow::Result<()> {
    let storage = FsStorage::open(&config.data_dir).with_context(|| {
        format!("Failed to open data directory {}", config.data_dir.display())
    })?;
    let mut store = ProjectStore::open(Arc::new(storage), config.store_config());

    let result = execute(&mut store, &config.command, out);
    store.dispose();
    result
}

fn execute(store: &mut ProjectStore, command: &Command, out: &mut impl Write) -> anyhow::Result<()> {
    match command {
        Command::List => {
            let active = store.project().id.clone();
            for entry in store.get_project_list() {
                let marker = if entry.id == active { '*' } else { ' ' };
                writeln!(
                    out,
                    "{marker} {}  {}  {}",
                    entry.id, entry.name, entry.updated_at
                )?;
            }
        }
        Command::New { name, goal, device } => {
            let id = store.create_new_project();
            if let Some(name) = name {
                store.set_project_name(name.as_str());
            }
            if let Some(device) = device {
                store.set_device(*device);
            }
            if let Some(goal) = goal {
                store.set_project_goal(goal.as_str());
                let fragments = screen_goal_fragments(goal);
                if fragments.len() >= 2 {
                    store.scaffold_screens_with_goals(&fragments);
                }
            }
            tracing::info!(project = %id, screens = store.project().screens.len(), "Created project");
            writeln!(out, "{id}")?;
        }
        Command::Import { file } => {
            let json = read_input(file)?;
            let id = store
                .import_project_json(&json)
                .with_context(|| format!("Failed to import {}", file.display()))?;
            writeln!(out, "{id}")?;
        }
        Command::ExportJson { out: path } => {
            let json = store.export_project_json()?;
            emit(path.as_deref(), &json, out)?;
        }
        Command::Blueprint { target, out: path } => {
            let text = generate_blueprint(store.project(), *target);
            emit(path.as_deref(), &text, out)?;
        }
        Command::Switch { id } => {
            store.switch_project(&ProjectId::from(id.as_str()))?;
            writeln!(out, "{id}")?;
        }
        Command::Delete { id } => {
            let id = ProjectId::from(id.as_str());
            if id == store.project().id {
                bail!("Cannot delete the active project {id}; switch to another first");
            }
            if !store.delete_project(&id) {
                bail!("No stored project {id} was deleted");
            }
            writeln!(out, "{id}")?;
        }
    }
    Ok(())
}

fn read_input(path: &Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

/// Write `text` to `path`, or to `out` when no path is given.
fn emit(path: Option<&Path>, text: &str, out: &mut impl Write) -> anyhow::Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, text)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            tracing::info!("Wrote {}", path.display());
        }
        None => out.write_all(text.as_bytes())?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_into_config() {
        let args = CliArgs::parse_from(["sketchflow", "--data-dir", "/tmp/x", "--no-snap", "list"]);
        let config = CliConfig::from(args);
        assert_eq!(config.data_dir, PathBuf::from("/tmp/x"));
        assert!(!config.snap_enabled);
        assert!(!config.store_config().snap_enabled);
        assert!(matches!(config.command, Command::List));
    }

    #[test]
    fn test_blueprint_target_parsing() {
        let args = CliArgs::parse_from(["sketchflow", "blueprint", "--target", "html-css"]);
        assert!(matches!(
            args.command,
            Command::Blueprint {
                target: ExportTarget::HtmlCss,
                out: None
            }
        ));

        let bad = CliArgs::try_parse_from(["sketchflow", "blueprint", "--target", "svelte"]);
        assert!(bad.is_err());
    }

    #[test]
    fn test_device_parsing() {
        assert_eq!(parse_device("Tablet"), Ok(DeviceType::Tablet));
        assert!(parse_device("watch").is_err());
    }
}
