///
/// This module implements the CLI interface for agent-docs: command parsing,
/// argument validation, and user-visible output.
///
/// All compression logic lives in the [`agent-docs-core`] crate. This module is
/// strictly CLI glue: it loads the config, resolves cache directories, calls
/// into the core, and prints or injects the result.
///
/// ## How To Use
/// - Command-line users: run the installed `agent-docs` binary with `--help`.
/// - Programmatic/integration use: call [`run`] with a constructed [`Cli`].
///
/// [`agent-docs-core`]: ../../agent-docs-core/
use crate::load_config::load_config;
use agent_docs_core::catalog::StaticChangeCatalog;
use agent_docs_core::compress::{compress_all, CompressedIndex};
use agent_docs_core::fetch::LocalCacheFetcher;
use agent_docs_core::inject::inject_into_file;
use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;

/// CLI for agent-docs: compress framework docs into agent manifest indexes.
#[derive(Parser)]
#[clap(
    name = "agent-docs",
    version,
    about = "Compress cached framework documentation into compact indexes for AGENTS.md"
)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compress configured skills and print the indexes (or inject them into the manifest)
    Compress {
        /// Path to the YAML config file
        #[clap(long)]
        config: PathBuf,
        /// Only compress this skill
        #[clap(long)]
        skill: Option<String>,
        /// Write the indexes into the manifest's managed section instead of stdout
        #[clap(long)]
        inject: bool,
    },
    /// Report original vs. compressed sizes for configured skills
    Stats {
        /// Path to the YAML config file
        #[clap(long)]
        config: PathBuf,
        /// Only report this skill
        #[clap(long)]
        skill: Option<String>,
        /// Print as JSON
        #[clap(long)]
        json: bool,
    },
}

/// Extracted async CLI logic entrypoint for integration tests and main()
pub async fn run(cli: Cli) -> Result<()> {
    // Emit a top-level 'trace_initialised' event at the very start
    tracing::info!("trace_initialised");

    match cli.command {
        Commands::Compress {
            config,
            skill,
            inject,
        } => {
            let config = load_config(config)?;
            tracing::info!(command = "compress", inject, "Starting compression");
            let results = compress_configured(&config, skill.as_deref()).await?;

            let combined = results
                .iter()
                .map(|r| r.index.as_str())
                .collect::<Vec<_>>()
                .join("\n\n");

            if inject {
                let manifest = config.manifest_path();
                inject_into_file(&manifest, &combined).map_err(|e| {
                    tracing::error!(
                        command = "compress",
                        error = %e,
                        manifest = %manifest.display(),
                        "Injection failed"
                    );
                    anyhow::anyhow!("Failed to inject index into {}: {e}", manifest.display())
                })?;
                println!(
                    "Injected {} index(es) into {}",
                    results.len(),
                    manifest.display()
                );
            } else {
                println!("{combined}");
            }
            tracing::info!(command = "compress", count = results.len(), "Compression complete");
            Ok(())
        }
        Commands::Stats {
            config,
            skill,
            json,
        } => {
            let config = load_config(config)?;
            tracing::info!(command = "stats", "Collecting compression stats");
            let results = compress_configured(&config, skill.as_deref()).await?;

            if json {
                let report: serde_json::Map<String, serde_json::Value> = results
                    .iter()
                    .map(|r| -> Result<_, serde_json::Error> {
                        Ok((r.skill.id.clone(), serde_json::to_value(r.stats)?))
                    })
                    .collect::<Result<_, _>>()?;
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                for r in &results {
                    println!(
                        "{}: {} -> {} bytes ({}% reduction)",
                        r.skill.id,
                        r.stats.original_size,
                        r.stats.compressed_size,
                        r.stats.reduction_percent
                    );
                }
            }
            Ok(())
        }
    }
}

async fn compress_configured(
    config: &crate::load_config::CliConfig,
    only: Option<&str>,
) -> Result<Vec<CompressedIndex>> {
    let skills = config.skill_specs(only)?;
    let fetcher = LocalCacheFetcher::new(config.compress.clone());
    compress_all(
        skills,
        &fetcher,
        Arc::new(StaticChangeCatalog::builtin()),
        &config.compress,
    )
    .await
    .map_err(|e| {
        tracing::error!(error = %e, "Compression failed");
        anyhow::Error::msg(format!("Compression failed: {e}"))
    })
}
