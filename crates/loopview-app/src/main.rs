//! Loopview - interactive video loop viewer
//!
//! Entry point: parses the source argument, opens it, and runs the
//! player window until the user quits or the stream ends.

mod controls;
mod player;
mod sink;

use anyhow::{Context, Result};
use eframe::egui;
use loopview_core::{PlayerConfig, CONFIG_ENV_VAR};
use loopview_media::{RestartPolicy, SourceCursor, SourceSpec};
use loopview_playback::PlaybackScheduler;
use player::LoopviewApp;
use std::cell::RefCell;
use std::rc::Rc;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

fn usage() -> String {
    format!(
        "Usage: loopview [SOURCE]\n\n\
         SOURCE is a camera index (digits only, default 0) or a video file path.\n\n\
         Environment:\n  \
         {}  path to a JSON player config\n  \
         RUST_LOG          log filter (default: info)",
        CONFIG_ENV_VAR
    )
}

fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let arg = std::env::args().nth(1);
    if matches!(arg.as_deref(), Some("-h" | "--help")) {
        println!("{}", usage());
        return Ok(());
    }

    let config = PlayerConfig::from_env().context("failed to load player config")?;
    let spec = SourceSpec::from_arg(arg.as_deref());
    info!("Loopview starting with source {}", spec);

    let decoder =
        loopview_media::open(&spec).with_context(|| format!("cannot open source {}", spec))?;
    let policy = if config.cycle_finite_sources {
        RestartPolicy::Cycle
    } else {
        RestartPolicy::Stop
    };
    let scheduler = PlaybackScheduler::new(SourceCursor::new(decoder, policy), &config)
        .with_context(|| format!("cannot start playback of {}", spec))?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 720.0])
            .with_title(scheduler.status()),
        renderer: eframe::Renderer::Wgpu,
        ..Default::default()
    };

    let fatal = Rc::new(RefCell::new(None));
    let app_fatal = fatal.clone();
    eframe::run_native(
        "Loopview",
        options,
        Box::new(move |cc| Ok(Box::new(LoopviewApp::new(cc, scheduler, app_fatal)))),
    )
    .map_err(|e| anyhow::anyhow!("window error: {}", e))?;

    if let Some(err) = fatal.borrow_mut().take() {
        return Err(anyhow::Error::new(err).context("playback failed"));
    }
    info!("Loopview exiting");
    Ok(())
}
