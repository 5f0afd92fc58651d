//! The platform boundary: display, keyboard and frame sync.
//!
//! The game only talks to hardware through the three traits in this module,
//! all implemented by a single owned platform value.
//!
//! [`curses`] implements all three on top of a terminal, emulating MO5 video
//! memory with a [`framebuffer::Framebuffer`].

use crate::actor::Sprite;
use crate::geo::Point;
use crate::input::KeyCode;

pub mod color;
pub mod curses;
pub mod framebuffer;

pub use color::Color;
pub use curses::Curses;

/// A display that sprites can be drawn on.
///
/// Positions are top-left corners, `x` in bytes and `y` in pixel rows.
/// [`Screen::init_display()`] must be called exactly once, before any other
/// method.
pub trait Screen {
  /// Enters graphics mode with the given paper and ink colors.
  fn init_display(&mut self, background: Color, foreground: Color);

  /// Draws `sprite` through its mask at `at`.
  ///
  /// Drawing the same sprite twice at the same spot has no further effect.
  fn draw_sprite(&mut self, at: Point, sprite: &Sprite<'_>);

  /// Clears a `dims`-sized footprint at `at` to the background color.
  fn erase_sprite(&mut self, at: Point, dims: Point);

  /// Restores a `dims`-sized footprint at `at` from the background captured
  /// when the display was set up.
  fn restore_background(&mut self, at: Point, dims: Point);

  /// Makes everything drawn since the last call visible at once.
  ///
  /// Draws and erases may be buffered until this is called.
  fn present(&mut self);
}

/// A keyboard.
pub trait Keyboard {
  /// Returns the key currently pressed, or [`KeyCode::NONE`].
  fn poll_key(&mut self) -> KeyCode;

  /// Blocks until a key is pressed and returns it.
  ///
  /// Never returns [`KeyCode::NONE`].
  fn read_key_blocking(&mut self) -> KeyCode {
    loop {
      let key = self.poll_key();
      if !key.is_none() {
        return key;
      }
    }
  }
}

/// A source of display refresh boundaries.
pub trait FrameSync {
  /// Blocks until the start of the next frame.
  fn wait_for_frame_sync(&mut self);
}

#[cfg(test)]
mod tests {
  use super::*;

  use std::collections::VecDeque;

  struct Scripted(VecDeque<u8>, usize);

  impl Keyboard for Scripted {
    fn poll_key(&mut self) -> KeyCode {
      self.1 += 1;
      KeyCode(self.0.pop_front().expect("script ran dry"))
    }
  }

  #[test]
  fn blocking_read_skips_empty_polls() {
    let mut kb = Scripted(vec![0, 0, 0, b'z', 0, b'e'].into(), 0);
    assert_eq!(kb.read_key_blocking(), KeyCode(b'z'));
    assert_eq!(kb.1, 4);
    assert_eq!(kb.read_key_blocking(), KeyCode(b'e'));
    assert_eq!(kb.1, 6);
  }
}
