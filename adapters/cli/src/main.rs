#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that replays recorded process frames through the minimap overlay.

mod config;
mod fixtures;
mod headless;

use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use clap::Parser;
use headless::HeadlessBackend;
use log::info;
use minimap_core::{Config, ProcessSource};
use minimap_overlay::MapOverlay;
use minimap_rendering::RenderingBackend;
use minimap_session::LevelSource;

/// Replays a scripted sequence of process snapshots against a headless renderer.
#[derive(Debug, Parser)]
#[command(name = "minimap", version, about)]
struct Args {
    /// TOML configuration file; defaults apply when omitted.
    #[arg(long)]
    config: Option<PathBuf>,
    /// JSON reference dataset (level names, objects, strings, guides).
    #[arg(long)]
    reference: PathBuf,
    /// JSON map of pre-decoded levels keyed by level id.
    #[arg(long)]
    levels: PathBuf,
    /// JSON script of process frames to replay.
    #[arg(long)]
    script: PathBuf,
}

/// Entry point for the minimap command-line interface.
fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => config::load_config(path)?,
        None => Config::default(),
    };
    let reference = fixtures::load_reference(&args.reference)?;
    let levels = fixtures::load_levels(&args.levels)?;
    let mut process = fixtures::load_script(&args.script)?;

    let mut backend = HeadlessBackend::default();
    let mut overlay =
        MapOverlay::new(config, Arc::new(reference), levels).context("invalid configuration")?;
    let ticks = replay(&mut overlay, &mut process, &mut backend)?;

    println!(
        "replayed {ticks} frames with {} level decodes: {}",
        overlay.session().source().decodes(),
        backend.stats()
    );
    Ok(())
}

/// Drives the overlay with every frame the process source yields.
///
/// Returns the number of frames processed.
fn replay<S, P, B>(overlay: &mut MapOverlay<S>, process: &mut P, backend: &mut B) -> Result<usize>
where
    S: LevelSource,
    P: ProcessSource,
    B: RenderingBackend,
{
    let mut ticks = 0;
    while let Some(snapshot) = process.poll() {
        if let Some(rect) = process.take_window_change() {
            overlay
                .window_moved(rect, backend)
                .with_context(|| format!("frame {ticks}: failed to move window"))?;
        }
        overlay
            .update(&snapshot, backend)
            .with_context(|| format!("frame {ticks}: failed to update minimap"))?;
        let drawn = overlay
            .render(backend)
            .with_context(|| format!("frame {ticks}: failed to render minimap"))?;

        let view = overlay.model().view();
        info!(
            "frame {ticks}: level {} player ({}, {}) {}",
            snapshot.level_id.get(),
            snapshot.player.x,
            snapshot.player.y,
            if drawn {
                format!(
                    "drawn with {} labels and {} guides",
                    view.labels.len(),
                    view.guides.len()
                )
            } else {
                "hidden".to_owned()
            }
        );
        ticks += 1;
    }
    Ok(ticks)
}
