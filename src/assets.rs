//! Built-in sprite data.

use crate::actor::Sprite;
use crate::geo::Coord;

/// Width of the player sprite, in bytes.
pub const PLAYER_WIDTH: Coord = 2;
/// Height of the player sprite, in pixel rows.
pub const PLAYER_HEIGHT: Coord = 16;

#[rustfmt::skip]
static PLAYER_BITMAP: [u8; 32] = [
  0x07, 0xe0,
  0x0f, 0xf0,
  0x0d, 0xb0,
  0x0f, 0xf0,
  0x0e, 0x70,
  0x07, 0xe0,
  0x03, 0xc0,
  0x3f, 0xfc,
  0x6f, 0xf6,
  0xcf, 0xf3,
  0x0f, 0xf0,
  0x0e, 0x70,
  0x0c, 0x30,
  0x0c, 0x30,
  0x0c, 0x30,
  0x3c, 0x3c,
];

// Same silhouette, with the eyes and mouth filled in so they punch through
// to the paper color instead of showing the backdrop.
#[rustfmt::skip]
static PLAYER_MASK: [u8; 32] = [
  0x07, 0xe0,
  0x0f, 0xf0,
  0x0f, 0xf0,
  0x0f, 0xf0,
  0x0f, 0xf0,
  0x07, 0xe0,
  0x03, 0xc0,
  0x3f, 0xfc,
  0x6f, 0xf6,
  0xcf, 0xf3,
  0x0f, 0xf0,
  0x0e, 0x70,
  0x0c, 0x30,
  0x0c, 0x30,
  0x0c, 0x30,
  0x3c, 0x3c,
];

/// The walking figure: 16x16 pixels, two bytes wide.
pub fn player() -> Sprite<'static> {
  Sprite::new(&PLAYER_BITMAP, &PLAYER_MASK, PLAYER_WIDTH, PLAYER_HEIGHT)
}
