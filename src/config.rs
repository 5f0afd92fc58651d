//! Runtime configuration.
//!
//! Every setting has a default and can be overridden through a `PIXWALK_*`
//! environment variable. A value that fails to parse is logged and the
//! default kept.

use std::fmt;
use std::str::FromStr;

use anyhow::bail;
use anyhow::Context as _;

use crate::damage::EraseMode;
use crate::damage::RedrawPolicy;
use crate::game::SyncOrder;
use crate::geo::Point;
use crate::gfx::Color;
use crate::input::KeyBindings;

/// Per-axis step sizes: bytes horizontally, pixel rows vertically.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct Step(pub Point);

impl Default for Step {
  fn default() -> Self {
    Self(Point::new(1, 4))
  }
}

impl FromStr for Step {
  type Err = anyhow::Error;

  /// Parses `x,y`, e.g. `1,4`. Both sizes must be positive.
  fn from_str(s: &str) -> anyhow::Result<Self> {
    let (x, y) = match s.split_once(',') {
      Some(xy) => xy,
      None => bail!("expected a step of the form x,y, got {:?}", s),
    };
    let x = x.trim().parse::<u16>().context("bad horizontal step")?;
    let y = y.trim().parse::<u16>().context("bad vertical step")?;
    if x == 0 || y == 0 {
      bail!("step sizes must be positive, got {:?}", s);
    }
    Ok(Self(Point::new(x, y)))
  }
}

/// An optional backdrop color; `none` turns the backdrop off.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct Backdrop(pub Option<Color>);

impl FromStr for Backdrop {
  type Err = anyhow::Error;

  fn from_str(s: &str) -> anyhow::Result<Self> {
    match s.to_ascii_lowercase().as_str() {
      "none" | "off" | "0" => Ok(Self(None)),
      _ => Ok(Self(Some(s.parse()?))),
    }
  }
}

/// All knobs of the demo.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct Config {
  pub keys: KeyBindings,
  pub step: Step,
  pub redraw: RedrawPolicy,
  pub erase: EraseMode,
  pub sync: SyncOrder,
  pub background: Color,
  pub foreground: Color,
  pub backdrop: Backdrop,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      keys: KeyBindings::default(),
      step: Step::default(),
      redraw: RedrawPolicy::default(),
      erase: EraseMode::default(),
      sync: SyncOrder::default(),
      background: Color::Black,
      foreground: Color::White,
      backdrop: Backdrop(Some(Color::Gray)),
    }
  }
}

impl Config {
  /// Reads the configuration from the process environment.
  pub fn from_env() -> Self {
    Self::from_lookup(|name| std::env::var(name).ok())
  }

  /// Reads the configuration from `lookup`, which maps variable names to
  /// values.
  pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
    let mut config = Self::default();
    override_with(&lookup, "PIXWALK_KEYS", &mut config.keys);
    override_with(&lookup, "PIXWALK_STEP", &mut config.step);
    override_with(&lookup, "PIXWALK_REDRAW", &mut config.redraw);
    override_with(&lookup, "PIXWALK_ERASE", &mut config.erase);
    override_with(&lookup, "PIXWALK_SYNC", &mut config.sync);
    override_with(&lookup, "PIXWALK_PAPER", &mut config.background);
    override_with(&lookup, "PIXWALK_INK", &mut config.foreground);
    override_with(&lookup, "PIXWALK_BACKDROP", &mut config.backdrop);
    config
  }
}

fn override_with<T>(
  lookup: &impl Fn(&str) -> Option<String>,
  name: &str,
  slot: &mut T,
) where
  T: FromStr<Err = anyhow::Error> + fmt::Debug,
{
  let raw = match lookup(name) {
    Some(raw) => raw,
    None => return,
  };
  match raw.parse::<T>() {
    Ok(value) => *slot = value,
    Err(e) => tracing::warn!(
      name,
      value = %raw,
      default = ?slot,
      "ignoring bad setting: {:#}",
      e
    ),
  }
}
