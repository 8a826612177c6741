//! blob-export - mesh blob export tool
//!
//! Converts glTF/GLB scene layers to chunked triangle-soup blobs
//! (.p .pl .pn .pc .pt .pnc .pct .pnt .pnct) and walkmesh blobs.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

// Use modules from library
use blob_export::{config, inspect, manifest, ExportJob, SceneRef};

#[derive(Parser)]
#[command(name = "blob-export")]
#[command(about = "Mesh blob export tool")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Export the meshes of a scene layer as triangle soup
    Meshes {
        /// Input glTF/GLB scene, optionally suffixed with :<layer> (1-20, default 1)
        input: SceneRef,

        /// Output blob; the suffix selects the vertex attributes
        #[arg(value_parser = parse_soup_output)]
        output: PathBuf,
    },

    /// Export the meshes of a scene layer as welded walkmeshes
    Walkmeshes {
        /// Input glTF/GLB scene, optionally suffixed with :<layer> (1-20, default 1)
        input: SceneRef,

        /// Output walkmesh blob
        output: PathBuf,
    },

    /// Run every export listed in a manifest file
    Build {
        /// Path to blobs.toml manifest
        #[arg(default_value = "blobs.toml")]
        manifest: PathBuf,

        /// Output directory (overrides manifest)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Validate manifest without exporting
    Check {
        /// Path to blobs.toml manifest
        #[arg(default_value = "blobs.toml")]
        manifest: PathBuf,
    },

    /// Print the chunks and index of an existing blob
    Inspect {
        /// Blob file to read
        blob: PathBuf,
    },
}

fn parse_soup_output(s: &str) -> Result<PathBuf, blob_export::ConfigError> {
    let path = PathBuf::from(s);
    config::resolve_output_attributes(&path)?;
    Ok(path)
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Meshes { input, output } => {
            let job = ExportJob::meshes(input, output)?;
            job.run()?;
        }

        Commands::Walkmeshes { input, output } => {
            let job = ExportJob::walkmeshes(input, output);
            job.run()?;
        }

        Commands::Build { manifest, output } => {
            tracing::info!("Building blobs from {:?}", manifest);
            let config = manifest::load_manifest(&manifest)?;
            let summaries = manifest::build_all(&config, output.as_deref())?;
            tracing::info!("Build complete! {} blobs written", summaries.len());
        }

        Commands::Check { manifest } => {
            tracing::info!("Checking manifest {:?}", manifest);
            let config = manifest::load_manifest(&manifest)?;
            let jobs = manifest::validate(&config)?;
            tracing::info!("Manifest is valid! {} exports", jobs.len());
        }

        Commands::Inspect { blob } => {
            inspect::inspect_blob(&blob)?;
        }
    }

    Ok(())
}
