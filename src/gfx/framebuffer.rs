//! An in-memory model of MO5 video memory.
//!
//! The screen is 320x200 pixels stored as two planes of 40x200 bytes: the
//! *form* plane holds one bit per pixel, and the *color* plane holds one
//! [`Attr`] per form byte. Sprites are blitted through a mask, one byte at a
//! time, so horizontal positions are in bytes.

use crate::actor::Sprite;
use crate::geo::Coord;
use crate::geo::Point;
use crate::gfx::color::Attr;
use crate::gfx::color::Color;

/// Screen width, in bytes.
pub const WIDTH: Coord = 40;
/// Screen height, in pixel rows.
pub const HEIGHT: Coord = 200;
/// Screen dimensions, in bytes by rows.
pub const SCREEN: Point = Point::new(WIDTH, HEIGHT);

const LEN: usize = WIDTH as usize * HEIGHT as usize;

/// A rectangular region of the screen, in bytes by rows.
///
/// `end` is exclusive.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct Region {
  pub origin: Point,
  pub end: Point,
}

impl Region {
  /// Returns the smallest region covering both `self` and `other`.
  pub fn union(self, other: Region) -> Region {
    Region {
      origin: Point::new(
        self.origin.x().min(other.origin.x()),
        self.origin.y().min(other.origin.y()),
      ),
      end: Point::new(
        self.end.x().max(other.end.x()),
        self.end.y().max(other.end.y()),
      ),
    }
  }
}

/// Video memory plus a saved copy of the background.
pub struct Framebuffer {
  form: Box<[u8]>,
  color: Box<[Attr]>,
  saved_form: Box<[u8]>,
  saved_color: Box<[Attr]>,
  paper: Attr,
  ink: Color,
  dirty: Option<Region>,
}

impl Framebuffer {
  /// Creates a cleared screen with the given background and foreground
  /// colors.
  ///
  /// The cleared screen is also the initial saved background.
  pub fn new(background: Color, foreground: Color) -> Self {
    let paper = Attr::new(foreground, background);
    Self {
      form: vec![0; LEN].into_boxed_slice(),
      color: vec![paper; LEN].into_boxed_slice(),
      saved_form: vec![0; LEN].into_boxed_slice(),
      saved_color: vec![paper; LEN].into_boxed_slice(),
      paper,
      ink: foreground,
      dirty: Some(Region {
        origin: Point::zero(),
        end: SCREEN,
      }),
    }
  }

  /// Paints the form plane with `pattern(col, row)` and saves the result as
  /// the background that [`Framebuffer::restore()`] copies from.
  pub fn paint_backdrop(
    &mut self,
    color: Color,
    mut pattern: impl FnMut(Coord, Coord) -> u8,
  ) {
    let attr = Attr::new(color, self.paper.bg());
    for row in 0..HEIGHT {
      for col in 0..WIDTH {
        let i = index(col, row);
        self.form[i] = pattern(col, row);
        self.color[i] = attr;
      }
    }
    self.saved_form.copy_from_slice(&self.form);
    self.saved_color.copy_from_slice(&self.color);
    self.mark(Region {
      origin: Point::zero(),
      end: SCREEN,
    });
  }

  /// Blits `sprite` with its top-left byte at `at`.
  ///
  /// Bits outside the sprite's mask are left alone. Set mask bytes take on
  /// the foreground color. The footprint is clipped to the screen.
  pub fn blit(&mut self, at: Point, sprite: &Sprite<'_>) {
    let (bitmap, mask) = (sprite.bitmap(), sprite.mask());
    let ink = self.ink;
    self.for_each_byte(at, sprite.dims(), |fb, i, s| {
      let m = mask[s];
      if m == 0 {
        return;
      }
      fb.form[i] = (fb.form[i] & !m) | (bitmap[s] & m);
      fb.color[i] = Attr::new(ink, fb.color[i].bg());
    });
  }

  /// Clears a `dims`-sized footprint at `at` to the background color.
  pub fn clear(&mut self, at: Point, dims: Point) {
    let paper = self.paper;
    self.for_each_byte(at, dims, |fb, i, _| {
      fb.form[i] = 0;
      fb.color[i] = paper;
    });
  }

  /// Copies a `dims`-sized footprint at `at` back from the saved background.
  pub fn restore(&mut self, at: Point, dims: Point) {
    self.for_each_byte(at, dims, |fb, i, _| {
      fb.form[i] = fb.saved_form[i];
      fb.color[i] = fb.saved_color[i];
    });
  }

  /// Returns the form byte at `(col, row)`.
  #[inline]
  pub fn form(&self, col: Coord, row: Coord) -> u8 {
    self.form[index(col, row)]
  }

  /// Returns the color byte at `(col, row)`.
  #[inline]
  pub fn attr(&self, col: Coord, row: Coord) -> Attr {
    self.color[index(col, row)]
  }

  /// Returns the region touched since the last call, if any.
  pub fn take_dirty(&mut self) -> Option<Region> {
    self.dirty.take()
  }

  fn mark(&mut self, region: Region) {
    self.dirty = Some(match self.dirty {
      Some(d) => d.union(region),
      None => region,
    });
  }

  /// Calls `f(self, screen_index, sprite_index)` for each on-screen byte of
  /// a `dims`-sized footprint at `at`.
  fn for_each_byte(
    &mut self,
    at: Point,
    dims: Point,
    mut f: impl FnMut(&mut Self, usize, usize),
  ) {
    let cols = dims.x().min(WIDTH.saturating_sub(at.x()));
    let rows = dims.y().min(HEIGHT.saturating_sub(at.y()));
    if cols == 0 || rows == 0 {
      return;
    }

    for row in 0..rows {
      for col in 0..cols {
        let s = usize::from(row) * usize::from(dims.x()) + usize::from(col);
        f(self, index(at.x() + col, at.y() + row), s);
      }
    }
    self.mark(Region {
      origin: at,
      end: Point::new(at.x() + cols, at.y() + rows),
    });
  }
}

#[inline]
fn index(col: Coord, row: Coord) -> usize {
  usize::from(row) * usize::from(WIDTH) + usize::from(col)
}
