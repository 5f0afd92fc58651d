//! The MO5 16-color palette.
//!
//! Every byte of video memory has a companion color byte (an [`Attr`]) that
//! picks a foreground color for its set bits and a background color for its
//! clear bits.

use std::str::FromStr;

use anyhow::bail;

/// An RGB value for presenting a palette entry on the host.
pub type Rgb = palette::Srgb<u8>;

/// One of the sixteen palette entries.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Hash)]
#[allow(missing_docs)]
#[rustfmt::skip]
pub enum Color {
  Black, Red, Green, Yellow, Blue, Magenta, Cyan, White,
  Gray, Pink, LightGreen, LightYellow, LightBlue, Mauve, LightCyan, Orange,
}

impl Color {
  /// All colors, in palette order.
  #[rustfmt::skip]
  pub const ALL: [Self; 16] = [
    Self::Black, Self::Red, Self::Green, Self::Yellow,
    Self::Blue, Self::Magenta, Self::Cyan, Self::White,
    Self::Gray, Self::Pink, Self::LightGreen, Self::LightYellow,
    Self::LightBlue, Self::Mauve, Self::LightCyan, Self::Orange,
  ];

  /// Returns the palette index, `0..16`.
  #[inline]
  pub fn index(self) -> u8 {
    self as u8
  }

  /// Looks up a color by the low four bits of `nibble`.
  #[inline]
  pub fn from_nibble(nibble: u8) -> Self {
    Self::ALL[usize::from(nibble & 0x0f)]
  }

  /// Returns the RGB value used to present this color.
  pub fn rgb(self) -> Rgb {
    let (r, g, b) = match self {
      Self::Black => (0x00, 0x00, 0x00),
      Self::Red => (0xff, 0x00, 0x00),
      Self::Green => (0x00, 0xff, 0x00),
      Self::Yellow => (0xff, 0xff, 0x00),
      Self::Blue => (0x00, 0x00, 0xff),
      Self::Magenta => (0xff, 0x00, 0xff),
      Self::Cyan => (0x00, 0xff, 0xff),
      Self::White => (0xff, 0xff, 0xff),
      Self::Gray => (0xbb, 0xbb, 0xbb),
      Self::Pink => (0xdd, 0x77, 0x77),
      Self::LightGreen => (0x77, 0xdd, 0x77),
      Self::LightYellow => (0xdd, 0xdd, 0x77),
      Self::LightBlue => (0x77, 0x77, 0xdd),
      Self::Mauve => (0xdd, 0x77, 0xee),
      Self::LightCyan => (0xbb, 0xff, 0xff),
      Self::Orange => (0xee, 0xbb, 0x00),
    };
    Rgb::new(r, g, b)
  }
}

impl FromStr for Color {
  type Err = anyhow::Error;

  /// Parses a color name such as `light_blue`, or a palette index.
  fn from_str(s: &str) -> anyhow::Result<Self> {
    if let Ok(index) = s.parse::<u8>() {
      if index < 16 {
        return Ok(Self::from_nibble(index));
      }
      bail!("palette index {} out of range", index);
    }

    let name = s.to_ascii_lowercase().replace('-', "_");
    let color = match name.as_str() {
      "black" => Self::Black,
      "red" => Self::Red,
      "green" => Self::Green,
      "yellow" => Self::Yellow,
      "blue" => Self::Blue,
      "magenta" => Self::Magenta,
      "cyan" => Self::Cyan,
      "white" => Self::White,
      "gray" | "grey" => Self::Gray,
      "pink" => Self::Pink,
      "light_green" => Self::LightGreen,
      "light_yellow" => Self::LightYellow,
      "light_blue" => Self::LightBlue,
      "mauve" => Self::Mauve,
      "light_cyan" => Self::LightCyan,
      "orange" => Self::Orange,
      _ => bail!("unknown color {:?}", s),
    };
    Ok(color)
  }
}

/// A packed color byte: foreground in the high nibble, background in the low
/// nibble.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Hash, Default)]
pub struct Attr(pub u8);

impl Attr {
  /// Packs a foreground and background color.
  #[inline]
  pub fn new(fg: Color, bg: Color) -> Self {
    Self(fg.index() << 4 | bg.index())
  }

  /// Returns the foreground color.
  #[inline]
  pub fn fg(self) -> Color {
    Color::from_nibble(self.0 >> 4)
  }

  /// Returns the background color.
  #[inline]
  pub fn bg(self) -> Color {
    Color::from_nibble(self.0)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn attr_packing() {
    let attr = Attr::new(Color::Orange, Color::Blue);
    assert_eq!(attr.0, 0xf4);
    assert_eq!(attr.fg(), Color::Orange);
    assert_eq!(attr.bg(), Color::Blue);
    assert_eq!(Attr::new(Color::Black, Color::Black).0, 0);
  }

  #[test]
  fn indices_round_trip() {
    for (i, c) in Color::ALL.iter().enumerate() {
      assert_eq!(usize::from(c.index()), i);
      assert_eq!(Color::from_nibble(c.index()), *c);
    }
  }

  #[test]
  fn parse_colors() {
    assert_eq!("Light-Blue".parse::<Color>().unwrap(), Color::LightBlue);
    assert_eq!("15".parse::<Color>().unwrap(), Color::Orange);
    assert!("16".parse::<Color>().is_err());
    assert!("chartreuse".parse::<Color>().is_err());
  }

  #[test]
  fn rgb_values() {
    let white = Color::White.rgb();
    assert_eq!((white.red, white.green, white.blue), (0xff, 0xff, 0xff));
    assert_eq!(Color::Black.rgb().red, 0);
  }
}
