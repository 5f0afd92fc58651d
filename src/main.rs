//! pixwalk: a masked sprite walking around an MO5 screen.
//!
//! The machine is emulated on the terminal; see [`gfx::curses`]. Logs go to
//! `pixwalk/pixwalk.log` under the system temp directory, since the terminal
//! itself is taken over by the game. Set `PIXWALK_LOG` to change the filter.

#![deny(unused)]
#![deny(warnings)]

use std::path::Path;

use anyhow::Context as _;
use tracing_appender::non_blocking::NonBlocking;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

pub mod actor;
pub mod assets;
pub mod config;
pub mod damage;
pub mod game;
pub mod geo;
pub mod gfx;
pub mod input;
pub mod timing;

/// Opens `pixwalk.log` in `dir`, creating the directory if needed.
fn log_writer(dir: &Path) -> anyhow::Result<(NonBlocking, WorkerGuard)> {
  std::fs::create_dir_all(dir).with_context(|| {
    format!("cannot create log directory {}", dir.display())
  })?;
  let appender = tracing_appender::rolling::never(dir, "pixwalk.log");
  Ok(tracing_appender::non_blocking(appender))
}

fn main() -> anyhow::Result<()> {
  let log_dir = std::env::temp_dir().join("pixwalk");
  let (writer, _guard) = log_writer(&log_dir)?;

  let filter = EnvFilter::try_from_env("PIXWALK_LOG")
    .unwrap_or_else(|_| EnvFilter::new("info"));
  tracing_subscriber::registry()
    .with(filter)
    .with(fmt::layer().with_writer(writer).with_ansi(false))
    .init();

  let config = config::Config::from_env();
  tracing::info!(log_dir = %log_dir.display(), "starting pixwalk");

  let platform = gfx::Curses::init(config.backdrop.0)?;
  let actor = actor::Actor::spawn(assets::player(), gfx::framebuffer::SCREEN);
  game::Game::new(platform, actor, config).run()
}
