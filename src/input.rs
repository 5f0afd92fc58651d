//! Input decoding.
//!
//! The keyboard hands us raw platform key codes; this module turns them into
//! a directional [`Intent`]. The mapping is a pure function of the code and
//! the configured [`KeyBindings`], so the movement logic never sees a raw
//! code.

use std::fmt;
use std::str::FromStr;

use anyhow::bail;

use crate::geo::Axis;

/// A raw key code, as returned by the platform keyboard.
///
/// On the MO5 these are ASCII codes plus a handful of control codes for the
/// cursor keys. Zero means "no key pressed".
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Hash, Default)]
pub struct KeyCode(pub u8);

impl KeyCode {
  /// The "no key yet" code.
  pub const NONE: Self = Self(0);

  /// Cursor-left control code.
  pub const CURSOR_LEFT: Self = Self(0x08);
  /// Cursor-right control code.
  pub const CURSOR_RIGHT: Self = Self(0x09);
  /// Cursor-down control code.
  pub const CURSOR_DOWN: Self = Self(0x0a);
  /// Cursor-up control code.
  pub const CURSOR_UP: Self = Self(0x0b);

  /// Returns whether this is the "no key yet" code.
  #[inline]
  pub fn is_none(self) -> bool {
    self == Self::NONE
  }

  /// Folds lowercase ASCII letters to uppercase; other codes are unchanged.
  #[inline]
  pub fn to_upper(self) -> Self {
    Self(self.0.to_ascii_uppercase())
  }
}

impl From<char> for KeyCode {
  /// Converts an ASCII character; anything else becomes [`KeyCode::NONE`].
  fn from(c: char) -> Self {
    if c.is_ascii() {
      Self(c as u8)
    } else {
      Self::NONE
    }
  }
}

impl fmt::Display for KeyCode {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if self.0.is_ascii_graphic() {
      write!(f, "'{}'", self.0 as char)
    } else {
      write!(f, "{:#04x}", self.0)
    }
  }
}

/// The decoded meaning of a key press.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Hash)]
pub enum Intent {
  Up,
  Down,
  Left,
  Right,
  None,
}

impl Intent {
  /// Returns the axis this intent moves along and the sign of the motion,
  /// or `None` for [`Intent::None`].
  ///
  /// Up is towards row zero.
  #[inline]
  pub fn direction(self) -> Option<(Axis, i32)> {
    match self {
      Self::Up => Some((Axis::Y, -1)),
      Self::Down => Some((Axis::Y, 1)),
      Self::Left => Some((Axis::X, -1)),
      Self::Right => Some((Axis::X, 1)),
      Self::None => None,
    }
  }
}

/// The four key codes that steer the actor.
///
/// Bindings are stored uppercased and matched case-insensitively.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct KeyBindings {
  up: KeyCode,
  down: KeyCode,
  left: KeyCode,
  right: KeyCode,
}

impl KeyBindings {
  /// Creates a new set of bindings.
  pub fn new(
    up: impl Into<KeyCode>,
    down: impl Into<KeyCode>,
    left: impl Into<KeyCode>,
    right: impl Into<KeyCode>,
  ) -> Self {
    Self {
      up: up.into().to_upper(),
      down: down.into().to_upper(),
      left: left.into().to_upper(),
      right: right.into().to_upper(),
    }
  }

  /// Bindings for the cursor keys.
  pub fn cursor() -> Self {
    Self::new(
      KeyCode::CURSOR_UP,
      KeyCode::CURSOR_DOWN,
      KeyCode::CURSOR_LEFT,
      KeyCode::CURSOR_RIGHT,
    )
  }
}

impl Default for KeyBindings {
  /// `Z`/`S`/`A`/`E`: the AZERTY home-row layout of the MO5 keyboard.
  fn default() -> Self {
    Self::new('Z', 'S', 'A', 'E')
  }
}

impl FromStr for KeyBindings {
  type Err = anyhow::Error;

  /// Parses four ASCII characters in up, down, left, right order, or the word
  /// `cursor`.
  fn from_str(s: &str) -> anyhow::Result<Self> {
    if s.eq_ignore_ascii_case("cursor") {
      return Ok(Self::cursor());
    }

    let keys = s.chars().map(KeyCode::from).collect::<Vec<_>>();
    if keys.len() != 4 || keys.iter().any(|k| k.is_none()) {
      bail!("expected four ASCII keys (up, down, left, right), got {:?}", s);
    }

    let mut folded = keys.iter().map(|k| k.to_upper()).collect::<Vec<_>>();
    folded.sort();
    folded.dedup();
    if folded.len() != keys.len() {
      bail!("key bindings must be four distinct keys, got {:?}", s);
    }

    Ok(Self::new(keys[0], keys[1], keys[2], keys[3]))
  }
}

/// Maps a raw key code to the intent it is bound to.
///
/// Letters match regardless of case. Codes with no binding, including
/// [`KeyCode::NONE`], map to [`Intent::None`].
pub fn map_key(bindings: &KeyBindings, key: KeyCode) -> Intent {
  let key = key.to_upper();
  if key.is_none() {
    Intent::None
  } else if key == bindings.up {
    Intent::Up
  } else if key == bindings.down {
    Intent::Down
  } else if key == bindings.left {
    Intent::Left
  } else if key == bindings.right {
    Intent::Right
  } else {
    Intent::None
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn default_bindings() {
    let b = KeyBindings::default();
    assert_eq!(map_key(&b, 'Z'.into()), Intent::Up);
    assert_eq!(map_key(&b, 'S'.into()), Intent::Down);
    assert_eq!(map_key(&b, 'A'.into()), Intent::Left);
    assert_eq!(map_key(&b, 'E'.into()), Intent::Right);
  }

  #[test]
  fn case_insensitive() {
    let b = KeyBindings::default();
    assert_eq!(map_key(&b, 'z'.into()), Intent::Up);
    assert_eq!(map_key(&b, 'e'.into()), Intent::Right);

    let lower = KeyBindings::new('w', 's', 'a', 'd');
    assert_eq!(map_key(&lower, 'W'.into()), Intent::Up);
    assert_eq!(map_key(&lower, 'd'.into()), Intent::Right);
  }

  #[test]
  fn every_code_maps_to_exactly_one_intent() {
    let b = KeyBindings::default();
    let mut bound = 0;
    for code in 0..=u8::MAX {
      if map_key(&b, KeyCode(code)) != Intent::None {
        bound += 1;
      }
    }
    // Four letters, each in two cases.
    assert_eq!(bound, 8);
    assert_eq!(map_key(&b, KeyCode::NONE), Intent::None);
    assert_eq!(map_key(&b, 'q'.into()), Intent::None);
  }

  #[test]
  fn cursor_bindings() {
    let b = KeyBindings::cursor();
    assert_eq!(map_key(&b, KeyCode::CURSOR_UP), Intent::Up);
    assert_eq!(map_key(&b, KeyCode::CURSOR_LEFT), Intent::Left);
    assert_eq!(map_key(&b, 'Z'.into()), Intent::None);
  }

  #[test]
  fn parse_bindings() {
    assert_eq!("zsae".parse::<KeyBindings>().unwrap(), KeyBindings::default());
    assert_eq!(
      "Cursor".parse::<KeyBindings>().unwrap(),
      KeyBindings::cursor()
    );
    assert!("zsa".parse::<KeyBindings>().is_err());
    assert!("zzae".parse::<KeyBindings>().is_err());
    assert!("zSae!".parse::<KeyBindings>().is_err());
    assert!("zsé!".parse::<KeyBindings>().is_err());
  }

  #[test]
  fn direction_moves_one_axis() {
    assert_eq!(Intent::Up.direction(), Some((Axis::Y, -1)));
    assert_eq!(Intent::Right.direction(), Some((Axis::X, 1)));
    assert_eq!(Intent::None.direction(), None);
  }
}
