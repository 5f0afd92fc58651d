//! Trait impls for geometry types.

use std::fmt;
use std::ops::Index;
use std::ops::IndexMut;

use crate::geo::Axis;
use crate::geo::Point;

impl<T> Index<Axis> for Point<T> {
  type Output = T;
  #[inline]
  fn index(&self, axis: Axis) -> &T {
    match axis {
      Axis::X => &self.0[0],
      Axis::Y => &self.0[1],
    }
  }
}

impl<T> IndexMut<Axis> for Point<T> {
  #[inline]
  fn index_mut(&mut self, axis: Axis) -> &mut T {
    match axis {
      Axis::X => &mut self.0[0],
      Axis::Y => &mut self.0[1],
    }
  }
}

impl<T> From<(T, T)> for Point<T> {
  #[inline]
  fn from((x, y): (T, T)) -> Self {
    Self::new(x, y)
  }
}

impl<T> From<[T; 2]> for Point<T> {
  #[inline]
  fn from(xs: [T; 2]) -> Self {
    Self(xs)
  }
}

impl<T: fmt::Display> fmt::Display for Point<T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "({}, {})", self.0[0], self.0[1])
  }
}
