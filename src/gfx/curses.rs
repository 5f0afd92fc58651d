//! Terminal platform.
//!
//! Emulates an MO5 on a VT100-style terminal: video memory lives in a
//! [`Framebuffer`] and is presented as an 80x25 grid of half-block glyphs,
//! each cell covering 4x8 pixels. Drawing only touches the framebuffer;
//! [`Screen::present()`] then writes out the cells inside the dirty region
//! whose glyph actually changed.
//!
//! All errors from the terminal will panic, since those errors are effectively
//! unrecoverable once the screen has been taken over.

use std::io;
use std::time::Duration;

use crossterm::event;
use crossterm::event::Event;
use crossterm::event::KeyEvent;
use crossterm::event::KeyModifiers;

use crate::actor::Sprite;
use crate::geo::Coord;
use crate::geo::Point;
use crate::gfx::color::Color;
use crate::gfx::framebuffer;
use crate::gfx::framebuffer::Framebuffer;
use crate::gfx::framebuffer::Region;
use crate::gfx::FrameSync;
use crate::gfx::Keyboard;
use crate::gfx::Screen;
use crate::input::KeyCode;
use crate::timing::FrameTimer;

/// Terminal columns used to present the screen.
pub const COLS: u16 = framebuffer::WIDTH * 2;
/// Terminal rows used to present the screen.
pub const ROWS: u16 = framebuffer::HEIGHT / 8;

/// Vertical refresh rate of the emulated display.
pub const REFRESH_HZ: u32 = 50;

const GLYPH: char = '\u{2580}';

/// The colors of one presented cell: the upper 4x4 pixels and the lower 4x4.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
struct Cell {
  top: Color,
  bottom: Color,
}

/// An emulated MO5 on a terminal.
pub struct Curses<W: io::Write = io::Stdout> {
  w: W,
  raw: bool,
  backdrop: Option<Color>,
  fb: Option<Framebuffer>,
  presented: Box<[Option<Cell>]>,
  timer: FrameTimer,
}

impl Curses {
  /// Takes over the process's terminal.
  ///
  /// If `backdrop` is set, [`Screen::init_display()`] paints a ground pattern
  /// in that color for sprites to walk over.
  pub fn init(backdrop: Option<Color>) -> crossterm::Result<Curses> {
    let mut curses = Curses::with(io::stdout(), backdrop)?;
    crossterm::terminal::enable_raw_mode()?;
    curses.raw = true;

    let (cols, rows) = crossterm::terminal::size()?;
    if cols < COLS || rows < ROWS {
      tracing::warn!(
        cols,
        rows,
        "terminal is smaller than {}x{}, the screen will be cut off",
        COLS,
        ROWS
      );
    }
    Ok(curses)
  }
}

impl<W: io::Write> Curses<W> {
  /// Sets up the terminal behind `w`, without touching raw mode.
  pub fn with(
    mut w: W,
    backdrop: Option<Color>,
  ) -> crossterm::Result<Curses<W>> {
    crossterm::execute!(
      w,
      crossterm::terminal::EnterAlternateScreen,
      crossterm::cursor::Hide,
      crossterm::terminal::DisableLineWrap,
    )?;

    Ok(Curses {
      w,
      raw: false,
      backdrop,
      fb: None,
      presented: vec![None; usize::from(COLS) * usize::from(ROWS)]
        .into_boxed_slice(),
      timer: FrameTimer::new(REFRESH_HZ),
    })
  }

  /// Returns the emulated video memory, once the display is initialized.
  #[cfg(test)]
  pub fn framebuffer(&self) -> Option<&Framebuffer> {
    self.fb.as_ref()
  }

  /// Returns the underlying writer.
  #[cfg(test)]
  pub fn writer(&self) -> &W {
    &self.w
  }

  fn with_fb(&mut self, op: &str, f: impl FnOnce(&mut Framebuffer)) {
    match &mut self.fb {
      Some(fb) => f(fb),
      None => tracing::error!(op, "display used before init_display"),
    }
  }

  /// Turns a terminal key event into an MO5 key code.
  ///
  /// Esc and Ctrl-C switch the emulated machine off.
  fn decode(&mut self, e: KeyEvent) -> KeyCode {
    use crossterm::event::KeyCode as Term;

    match e.code {
      Term::Char('c') | Term::Char('C')
        if e.modifiers.contains(KeyModifiers::CONTROL) =>
      {
        self.die(0)
      }
      Term::Esc => self.die(0),
      Term::Char(c) => KeyCode::from(c),
      Term::Left => KeyCode::CURSOR_LEFT,
      Term::Right => KeyCode::CURSOR_RIGHT,
      Term::Down => KeyCode::CURSOR_DOWN,
      Term::Up => KeyCode::CURSOR_UP,
      _ => KeyCode::NONE,
    }
  }

  /// Clean up whatever mess the terminal made.
  fn cleanup(&mut self) {
    let _ = crossterm::execute!(
      self.w,
      crossterm::style::ResetColor,
      crossterm::terminal::LeaveAlternateScreen,
      crossterm::cursor::Show,
      crossterm::terminal::EnableLineWrap,
    );
    if self.raw {
      let _ = crossterm::terminal::disable_raw_mode();
      self.raw = false;
    }
    let _ = self.w.flush();
  }

  /// Restores the terminal and exits the process.
  pub fn die(&mut self, exit: i32) -> ! {
    tracing::info!(exit, "powering off");
    self.cleanup();
    std::process::exit(exit);
  }
}

impl<W: io::Write> Screen for Curses<W> {
  fn init_display(&mut self, background: Color, foreground: Color) {
    if self.fb.is_some() {
      tracing::warn!("init_display called twice, resetting video memory");
    }

    let mut fb = Framebuffer::new(background, foreground);
    if let Some(color) = self.backdrop {
      fb.paint_backdrop(color, ground);
    }
    self.fb = Some(fb);
    for slot in self.presented.iter_mut() {
      *slot = None;
    }

    crossterm::queue!(
      self.w,
      crossterm::terminal::Clear(crossterm::terminal::ClearType::All)
    )
    .expect("failed to clear terminal");
    self.present();
    tracing::info!(?background, ?foreground, "display initialized");
  }

  fn draw_sprite(&mut self, at: Point, sprite: &Sprite<'_>) {
    self.with_fb("draw_sprite", |fb| fb.blit(at, sprite));
  }

  fn erase_sprite(&mut self, at: Point, dims: Point) {
    self.with_fb("erase_sprite", |fb| fb.clear(at, dims));
  }

  fn restore_background(&mut self, at: Point, dims: Point) {
    self.with_fb("restore_background", |fb| fb.restore(at, dims));
  }

  /// Writes every cell in the framebuffer's dirty region whose glyph differs
  /// from what the terminal shows.
  fn present(&mut self) {
    let changed = match &mut self.fb {
      Some(fb) => changed_cells(fb, &mut self.presented),
      None => return,
    };
    if changed.is_empty() {
      return;
    }

    for &(cx, cy, cell) in &changed {
      crossterm::queue!(
        self.w,
        crossterm::cursor::MoveTo(cx, cy),
        crossterm::style::SetColors(crossterm::style::Colors {
          foreground: Some(term_color(cell.top)),
          background: Some(term_color(cell.bottom)),
        }),
        crossterm::style::Print(GLYPH),
      )
      .expect("failed to queue terminal output");
    }
    self.w.flush().expect("failed to flush terminal");
    tracing::trace!(cells = changed.len(), "presented");
  }
}

impl<W: io::Write> Keyboard for Curses<W> {
  fn poll_key(&mut self) -> KeyCode {
    let ready = event::poll(Duration::default()).expect("failed to poll input");
    if !ready {
      return KeyCode::NONE;
    }
    match event::read().expect("failed to read input") {
      Event::Key(e) => self.decode(e),
      _ => KeyCode::NONE,
    }
  }

  fn read_key_blocking(&mut self) -> KeyCode {
    loop {
      if let Event::Key(e) = event::read().expect("failed to read input") {
        let key = self.decode(e);
        if !key.is_none() {
          return key;
        }
      }
    }
  }
}

impl<W: io::Write> FrameSync for Curses<W> {
  fn wait_for_frame_sync(&mut self) {
    self.timer.wait();
    if self.timer.frame_count() % u64::from(REFRESH_HZ) == 0 {
      let fps = self.timer.measure_fps(Duration::from_secs(1));
      tracing::debug!(fps, frames = self.timer.frame_count(), "frame sync");
    }
  }
}

impl<W: io::Write> Drop for Curses<W> {
  fn drop(&mut self) {
    self.cleanup();
  }
}

/// The backdrop: a dotted ground line every 16 rows with a few pebbles in
/// between.
fn ground(col: Coord, row: Coord) -> u8 {
  if row % 16 == 15 {
    0xaa
  } else if row % 16 == 7 && col % 3 == 0 {
    0x10
  } else {
    0
  }
}

/// Collects the cells in `fb`'s dirty region that differ from what is on
/// the terminal, recording them as presented.
fn changed_cells(
  fb: &mut Framebuffer,
  presented: &mut [Option<Cell>],
) -> Vec<(u16, u16, Cell)> {
  let Region { origin, end } = match fb.take_dirty() {
    Some(r) => r,
    None => return Vec::new(),
  };

  let mut changed = Vec::new();
  for cy in origin.y() / 8..(end.y() + 7) / 8 {
    for cx in origin.x() * 2..end.x() * 2 {
      let cell = cell_at(fb, cx, cy);
      let slot = &mut presented[usize::from(cy) * usize::from(COLS)
        + usize::from(cx)];
      if *slot != Some(cell) {
        *slot = Some(cell);
        changed.push((cx, cy, cell));
      }
    }
  }
  changed
}

/// Computes the presented colors of cell `(cx, cy)`.
///
/// Each half takes the ink color of its first lit pixel, or the paper color
/// of its first row if none is lit.
fn cell_at(fb: &Framebuffer, cx: u16, cy: u16) -> Cell {
  let col = cx / 2;
  let bits = if cx % 2 == 0 { 0xf0 } else { 0x0f };
  let half = |first: Coord| {
    for row in first..first + 4 {
      if fb.form(col, row) & bits != 0 {
        return fb.attr(col, row).fg();
      }
    }
    fb.attr(col, first).bg()
  };
  Cell {
    top: half(cy * 8),
    bottom: half(cy * 8 + 4),
  }
}

fn term_color(color: Color) -> crossterm::style::Color {
  let rgb = color.rgb();
  crossterm::style::Color::Rgb {
    r: rgb.red,
    g: rgb.green,
    b: rgb.blue,
  }
}
