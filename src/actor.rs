//! The actor: a sprite, where it is, and where it was last drawn.

use crate::geo;
use crate::geo::Coord;
use crate::geo::Point;
use crate::input::Intent;

/// An immutable view of a sprite's pixel data.
///
/// `bitmap` holds the pixel bits and `mask` the opacity bits, both packed
/// eight pixels per byte, row-major, `width` bytes per row and `height` rows.
/// A mask bit of 1 means the corresponding bitmap bit is drawn.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct Sprite<'a> {
  bitmap: &'a [u8],
  mask: &'a [u8],
  width: Coord,
  height: Coord,
}

impl<'a> Sprite<'a> {
  /// Creates a new `Sprite` over static asset data.
  ///
  /// # Panics
  ///
  /// Panics if either slice does not hold exactly `width * height` bytes.
  pub fn new(
    bitmap: &'a [u8],
    mask: &'a [u8],
    width: Coord,
    height: Coord,
  ) -> Self {
    let len = usize::from(width) * usize::from(height);
    assert_eq!(bitmap.len(), len, "bitmap is not {}x{}", width, height);
    assert_eq!(mask.len(), len, "mask is not {}x{}", width, height);
    Self {
      bitmap,
      mask,
      width,
      height,
    }
  }

  /// Returns the pixel bits.
  #[inline]
  pub fn bitmap(&self) -> &'a [u8] {
    self.bitmap
  }

  /// Returns the opacity bits.
  #[inline]
  pub fn mask(&self) -> &'a [u8] {
    self.mask
  }

  /// Returns the width, in bytes.
  #[inline]
  pub fn width(&self) -> Coord {
    self.width
  }

  /// Returns the height, in pixel rows.
  #[inline]
  pub fn height(&self) -> Coord {
    self.height
  }

  /// Returns the width and height as a [`Point`].
  #[inline]
  pub fn dims(&self) -> Point {
    Point::new(self.width(), self.height())
  }
}

/// Computes where `intent` takes an actor at `pos`.
///
/// `step` gives the distance moved along each axis and `max` the largest
/// legal coordinate on each axis (the lower bound is always zero). Only the
/// axis named by the intent changes; [`Intent::None`] returns `pos`
/// unchanged.
pub fn resolve(pos: Point, intent: Intent, step: Point, max: Point) -> Point {
  let (axis, sign) = match intent.direction() {
    Some(d) => d,
    None => return pos,
  };

  let delta = sign * i32::from(step.along(axis));
  let moved = geo::saturating_step(pos.along(axis), delta, 0, max.along(axis));
  pos.with(axis, moved)
}

/// The single movable on-screen entity.
///
/// The sprite data is borrowed, since assets outlive the actor.
#[derive(Clone, Debug)]
pub struct Actor<'a> {
  sprite: Sprite<'a>,
  position: Point,
  old_position: Point,
  max: Point,
}

impl<'a> Actor<'a> {
  /// Spawns an actor centered on a screen of the given size.
  ///
  /// The previous position starts out equal to the current one, so there is
  /// nothing to erase before the first draw.
  pub fn spawn(sprite: Sprite<'a>, screen: Point) -> Self {
    let position = geo::centered(screen, sprite.dims());
    Self {
      sprite,
      position,
      old_position: position,
      max: geo::max_origin(screen, sprite.dims()),
    }
  }

  /// Returns this actor's sprite.
  #[inline]
  pub fn sprite(&self) -> &Sprite<'a> {
    &self.sprite
  }

  /// Returns the current position.
  #[inline]
  pub fn position(&self) -> Point {
    self.position
  }

  /// Returns the position the sprite was last drawn at.
  #[inline]
  pub fn old_position(&self) -> Point {
    self.old_position
  }

  /// Returns the largest legal position.
  #[inline]
  pub fn max(&self) -> Point {
    self.max
  }

  /// Moves the actor according to `intent`, returning the new position.
  ///
  /// This does not touch `old_position`; see [`Actor::commit()`].
  pub fn apply(&mut self, intent: Intent, step: Point) -> Point {
    self.position = resolve(self.position, intent, step, self.max);
    self.position
  }

  /// Records that the sprite is now drawn at its current position.
  #[inline]
  pub fn commit(&mut self) {
    self.old_position = self.position;
  }
}
