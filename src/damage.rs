//! Damage tracking: deciding what, if anything, to redraw after a move.

use std::fmt;
use std::str::FromStr;

use anyhow::bail;

use crate::geo::Point;

bitflags::bitflags! {
  /// The set of axes along which a sprite moved between two frames.
  pub struct Damage: u8 {
    const X = 1 << 0;
    const Y = 1 << 1;
  }
}

impl Damage {
  /// Computes the damage between the position a sprite was drawn at and the
  /// position it should now be drawn at.
  #[inline]
  pub fn between(old: Point, new: Point) -> Self {
    let mut damage = Self::empty();
    if old.x() != new.x() {
      damage |= Self::X;
    }
    if old.y() != new.y() {
      damage |= Self::Y;
    }
    damage
  }
}

/// Returns whether a sprite drawn at `old` must be redrawn to appear at `new`.
#[inline]
pub fn needs_redraw(old: Point, new: Point) -> bool {
  !Damage::between(old, new).is_empty()
}

/// When to issue redraws.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum RedrawPolicy {
  /// Erase and redraw every frame, moved or not.
  Always,
  /// Only redraw when the position changed.
  OnChange,
}

impl Default for RedrawPolicy {
  fn default() -> Self {
    Self::OnChange
  }
}

impl FromStr for RedrawPolicy {
  type Err = anyhow::Error;

  fn from_str(s: &str) -> anyhow::Result<Self> {
    match s.to_ascii_lowercase().as_str() {
      "always" => Ok(Self::Always),
      "on_change" | "on-change" => Ok(Self::OnChange),
      _ => bail!("unknown redraw policy {:?}", s),
    }
  }
}

/// How a sprite's old footprint is removed.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum EraseMode {
  /// Fill the footprint with the background color.
  Clear,
  /// Copy back whatever was behind the sprite when the display was set up.
  RestoreBackground,
}

impl Default for EraseMode {
  fn default() -> Self {
    Self::RestoreBackground
  }
}

impl FromStr for EraseMode {
  type Err = anyhow::Error;

  fn from_str(s: &str) -> anyhow::Result<Self> {
    match s.to_ascii_lowercase().as_str() {
      "clear" => Ok(Self::Clear),
      "restore" | "restore_background" => Ok(Self::RestoreBackground),
      _ => bail!("unknown erase mode {:?}", s),
    }
  }
}

/// A pending screen update: erase the sprite at `erase`, then draw it at
/// `draw`.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct Redraw {
  pub erase: Point,
  pub draw: Point,
  pub damage: Damage,
}

impl Redraw {
  /// Plans the update for a sprite last drawn at `old` that should now be at
  /// `new`.
  ///
  /// Returns `None` when `policy` allows skipping the frame.
  pub fn plan(policy: RedrawPolicy, old: Point, new: Point) -> Option<Self> {
    if policy == RedrawPolicy::OnChange && !needs_redraw(old, new) {
      return None;
    }
    Some(Self {
      erase: old,
      draw: new,
      damage: Damage::between(old, new),
    })
  }
}

impl fmt::Display for Redraw {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{} -> {}", self.erase, self.draw)
  }
}
