// SPDX-License-Identifier: MIT OR Apache-2.0
//! `blocknet` - inspect and create blocknet documents.

use blocknet_component::InstanceType;
use blocknet_editor::commands::{
    AddElementCommand, AddPortCommand, AddRootCommand, AddSubcomponentCommand, BindCommand, ConnectCommand,
};
use blocknet_editor::document::DOCUMENT_EXTENSION;
use blocknet_editor::{outline, EditorConfig, EditorState, Result};
use blocknet_graph::PortDirection;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

/// Command-line arguments for the blocknet tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the configuration file (RON)
    #[arg(short, long, default_value = "blocknet.ron")]
    config: PathBuf,

    /// Tracing directive, overriding the configured filter
    #[arg(long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the outline of a document
    Show {
        /// Document to open
        document: PathBuf,
    },
    /// Write a small sample plant
    Sample {
        /// Where to write the document
        document: PathBuf,
    },
}

fn main() {
    let args = Args::parse();

    let config = match EditorConfig::load_or_default(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load {}: {e}", args.config.display());
            std::process::exit(1);
        }
    };
    let directive = args.log_level.as_deref().unwrap_or(&config.log_filter);
    if let Err(e) = blocknet_editor::init_tracing(directive) {
        eprintln!("{e}");
    }
    tracing::debug!("Parsed arguments: {args:?}");

    let mut state = EditorState::new(config);
    let result = match &args.command {
        Command::Show { document } => show(&mut state, document),
        Command::Sample { document } => sample(&mut state, document),
    };
    if let Err(e) = result {
        tracing::error!("{e}");
        std::process::exit(1);
    }

    if let Err(e) = state.config.save(&args.config) {
        tracing::warn!("Failed to save config: {e}");
    }
}

fn show(state: &mut EditorState, path: &Path) -> Result<()> {
    state.open(path)?;
    println!("{} ({} element(s))", state.name, state.project.element_count());
    print!("{}", outline(&state.project));
    Ok(())
}

fn sample(state: &mut EditorState, path: &Path) -> Result<()> {
    state.new_document("Sample plant");
    let block_name = state.config.default_block_name.clone();
    let network_name = state.config.default_network_name.clone();

    let plant = state
        .execute(&AddRootCommand { name: network_name })?
        .unwrap_or_default();
    let source = state
        .execute(&AddElementCommand::block(plant, format!("{block_name} 1")))?
        .unwrap_or_default();
    let pump = state
        .execute(&AddElementCommand::block(plant, "Pump").at(200.0, 0.0))?
        .unwrap_or_default();

    let outlet = state
        .execute(&AddPortCommand {
            element: source,
            name: "out".to_string(),
            direction: PortDirection::Output,
        })?
        .unwrap_or_default();

    let component = state
        .project
        .components_mut()
        .create("Centrifugal pump", InstanceType::Component);
    state.execute(&BindCommand { block: pump, component })?;
    let inlet = state
        .execute(&AddSubcomponentCommand {
            parent: component,
            slot: "inlet".to_string(),
            instance_type: InstanceType::InPort,
        })?
        .unwrap_or_default();

    state.execute(&ConnectCommand { a: outlet, b: inlet })?;
    if path.extension().is_some() {
        state.save_as(path)?;
    } else {
        state.save_as(&path.with_extension(DOCUMENT_EXTENSION))?;
    }
    print!("{}", outline(&state.project));
    Ok(())
}
