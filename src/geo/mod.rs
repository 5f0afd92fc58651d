//! Geometry on the screen grid.
//!
//! Coordinates are unsigned: `x` counts bytes (8-pixel columns) from the left
//! edge, `y` counts pixel rows from the top. Everything in here is a pure
//! function; in particular, nothing ever subtracts two coordinates without
//! first checking that the result stays in range.

use num::NumCast;
use num::PrimInt;
use num::Zero;

mod impls;

/// The coordinate type used for positions and extents on the screen.
pub type Coord = u16;

/// One of the two screen axes.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Hash)]
pub enum Axis {
  /// Horizontal, measured in bytes.
  X,
  /// Vertical, measured in pixel rows.
  Y,
}

/// A two-dimensional point.
///
/// The same type doubles as an extent (width and height) and as a per-axis
/// pair of step sizes or bounds.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Hash, Default)]
pub struct Point<T = Coord>([T; 2]);

impl<T> Point<T> {
  /// Creates a new `Point` with the given coordinates.
  #[inline]
  pub const fn new(x: T, y: T) -> Self {
    Self([x, y])
  }

  /// Creates a new `Point` representing the origin.
  #[inline]
  pub fn zero() -> Self
  where
    T: Zero,
  {
    Self::new(T::zero(), T::zero())
  }

  /// Returns the `x` coordinate.
  #[inline]
  pub fn x(self) -> T
  where
    T: Copy,
  {
    self.0[0]
  }

  /// Returns the `y` coordinate.
  #[inline]
  pub fn y(self) -> T
  where
    T: Copy,
  {
    self.0[1]
  }

  /// Returns the coordinate along `axis`.
  #[inline]
  pub fn along(self, axis: Axis) -> T
  where
    T: Copy,
  {
    match axis {
      Axis::X => self.x(),
      Axis::Y => self.y(),
    }
  }

  /// Returns a copy of this `Point` with the coordinate along `axis` replaced.
  #[inline]
  pub fn with(mut self, axis: Axis, value: T) -> Self {
    match axis {
      Axis::X => self.0[0] = value,
      Axis::Y => self.0[1] = value,
    }
    self
  }

  /// Applies `f` to both coordinates.
  #[inline]
  pub fn map<U>(self, mut f: impl FnMut(Axis, T) -> U) -> Point<U> {
    let [x, y] = self.0;
    Point::new(f(Axis::X, x), f(Axis::Y, y))
  }
}

/// Limits `value` to the closed range `[min, max]`.
///
/// Returns `min` if `value < min` and `max` if `value > max`.
#[inline]
pub fn clamp<T: PartialOrd>(value: T, min: T, max: T) -> T {
  if value < min {
    min
  } else if value > max {
    max
  } else {
    value
  }
}

/// Applies a signed `delta` to an unsigned coordinate, saturating at `min`
/// and `max` instead of wrapping.
///
/// The distance to the bound in the direction of travel is measured first,
/// and the step is only taken if it fits inside that distance; otherwise the
/// bound itself is returned. A `delta` whose magnitude does not even fit in
/// `T` always saturates.
///
/// The result is always in `[min, max]`, including when `current` itself was
/// out of range.
pub fn saturating_step<T: PrimInt>(
  current: T,
  delta: i32,
  min: T,
  max: T,
) -> T {
  let current = clamp(current, min, max);
  let magnitude = <T as NumCast>::from(delta.unsigned_abs());

  if delta < 0 {
    let room = current - min;
    match magnitude {
      Some(m) if m <= room => current - m,
      _ => min,
    }
  } else {
    let room = max - current;
    match magnitude {
      Some(m) if m <= room => current + m,
      _ => max,
    }
  }
}

/// Returns the largest origin at which a box of size `sprite` still fits
/// entirely inside `screen`.
///
/// An axis on which the sprite is larger than the screen yields zero.
#[inline]
pub fn max_origin<T: PrimInt>(
  screen: Point<T>,
  sprite: Point<T>,
) -> Point<T> {
  screen.map(|axis, s| s.saturating_sub(sprite.along(axis)))
}

/// Returns the origin that centers a box of size `sprite` inside `screen`,
/// rounding towards the top-left.
#[inline]
pub fn centered<T: PrimInt>(
  screen: Point<T>,
  sprite: Point<T>,
) -> Point<T> {
  let two = T::one() + T::one();
  max_origin(screen, sprite).map(|_, m| m / two)
}

#[cfg(test)]
mod tests {
  use super::centered;
  use super::clamp;
  use super::max_origin;
  use super::saturating_step;
  use super::Axis;
  use super::Point;

  use rand::rngs::StdRng;
  use rand::Rng as _;
  use rand::SeedableRng as _;

  #[test]
  fn clamp_is_total() {
    assert_eq!(clamp(-3, 0, 10), 0);
    assert_eq!(clamp(11, 0, 10), 10);
    assert_eq!(clamp(7, 0, 10), 7);
    assert_eq!(clamp(0, 0, 0), 0);
  }

  #[test]
  fn step_back_saturates_at_min() {
    assert_eq!(saturating_step(0u16, -1, 0, 36), 0);
    assert_eq!(saturating_step(3u16, -4, 0, 184), 0);
    assert_eq!(saturating_step(4u16, -4, 0, 184), 0);
    assert_eq!(saturating_step(5u16, -4, 0, 184), 1);
    assert_eq!(saturating_step(10u8, -1000, 2, 20), 2);
  }

  #[test]
  fn step_forward_saturates_at_max() {
    assert_eq!(saturating_step(36u16, 1, 0, 36), 36);
    assert_eq!(saturating_step(35u16, 1, 0, 36), 36);
    assert_eq!(saturating_step(182u16, 4, 0, 184), 184);
    assert_eq!(saturating_step(200u8, 1000, 0, 250), 250);
  }

  #[test]
  fn zero_step_is_identity() {
    assert_eq!(saturating_step(17u16, 0, 0, 36), 17);
  }

  #[test]
  fn out_of_range_current_is_pulled_in() {
    assert_eq!(saturating_step(50u16, 0, 0, 36), 36);
    assert_eq!(saturating_step(50u16, -1, 0, 36), 35);
    assert_eq!(saturating_step(1u16, 0, 5, 36), 5);
  }

  #[test]
  fn step_never_leaves_range() {
    let mut rng = StdRng::seed_from_u64(0x4d4f35);
    for _ in 0..10_000 {
      let max: u16 = rng.gen_range(0..=400);
      let p: u16 = rng.gen_range(0..=max);
      let s: i32 = rng.gen_range(1..=64);

      let back = saturating_step(p, -s, 0, max);
      assert!(back <= max);
      if i32::from(p) < s {
        assert_eq!(back, 0, "p={} s={}", p, s);
      } else {
        assert_eq!(i32::from(back), i32::from(p) - s);
      }

      let fwd = saturating_step(p, s, 0, max);
      assert!(fwd <= max);
      if i32::from(p) + s > i32::from(max) {
        assert_eq!(fwd, max, "p={} s={} max={}", p, s, max);
      } else {
        assert_eq!(i32::from(fwd), i32::from(p) + s);
      }
    }
  }

  #[test]
  fn origin_bounds() {
    let screen = Point::new(40u16, 200);
    let sprite = Point::new(2u16, 16);
    assert_eq!(max_origin(screen, sprite), Point::new(38, 184));
    assert_eq!(centered(screen, sprite), Point::new(19, 92));

    let huge = Point::new(64u16, 16);
    assert_eq!(max_origin(screen, huge), Point::new(0, 184));
  }

  #[test]
  fn axis_access() {
    let p = Point::new(3u16, 9);
    assert_eq!(p.along(Axis::X), 3);
    assert_eq!(p.along(Axis::Y), 9);
    assert_eq!(p.with(Axis::Y, 1), Point::new(3, 1));
  }
}
