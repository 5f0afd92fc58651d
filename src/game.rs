//! The main loop.
//!
//! [`Game`] owns the actor and the platform, and drives the
//! input -> intent -> position -> redraw pipeline once per frame. It starts
//! in [`Phase::Initializing`], which sets up the display and draws the actor
//! at its spawn point, and then stays in [`Phase::Running`] for good: the
//! loop ends only when the machine is switched off.

use std::str::FromStr;

use anyhow::bail;

use crate::actor::Actor;
use crate::actor::Sprite;
use crate::config::Config;
use crate::damage::EraseMode;
use crate::damage::Redraw;
use crate::geo::Point;
use crate::gfx::FrameSync;
use crate::gfx::Keyboard;
use crate::gfx::Screen;
use crate::input;
use crate::input::Intent;
use crate::input::KeyCode;
use crate::timing::StageTimer;

/// How often, in frames, stage timings are logged.
const REPORT_EVERY: u64 = 64;

/// Where in a frame to wait for the display refresh.
///
/// Waiting after input means the move is rendered on the first refresh after
/// the key press; waiting before input means the key is sampled right after a
/// refresh and rendered without waiting.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum SyncOrder {
  /// Never wait.
  Off,
  /// Read the key, wait for the refresh, then move and render.
  AfterInput,
  /// Wait for the refresh, then read the key, move and render.
  BeforeInput,
}

impl Default for SyncOrder {
  fn default() -> Self {
    Self::AfterInput
  }
}

impl FromStr for SyncOrder {
  type Err = anyhow::Error;

  fn from_str(s: &str) -> anyhow::Result<Self> {
    match s.to_ascii_lowercase().as_str() {
      "off" | "none" => Ok(Self::Off),
      "after_input" | "after-input" => Ok(Self::AfterInput),
      "before_input" | "before-input" => Ok(Self::BeforeInput),
      _ => bail!("unknown sync order {:?}", s),
    }
  }
}

/// The state of the main loop.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Phase {
  Initializing,
  Running,
}

/// What happened during one frame.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct Frame {
  pub key: KeyCode,
  pub intent: Intent,
  pub position: Point,
  pub redraw: Option<Redraw>,
}

/// The orchestrator.
///
/// `P` is the platform: one value acting as screen, keyboard and frame sync.
pub struct Game<'a, P> {
  platform: P,
  actor: Actor<'a>,
  config: Config,
  phase: Phase,
  frames: u64,
  timer: StageTimer,
}

impl<'a, P> Game<'a, P>
where
  P: Screen + Keyboard + FrameSync,
{
  /// Creates a new `Game` from a platform and a freshly spawned actor.
  ///
  /// Nothing touches the platform until the first frame.
  pub fn new(platform: P, actor: Actor<'a>, config: Config) -> Self {
    Self {
      platform,
      actor,
      config,
      phase: Phase::Initializing,
      frames: 0,
      timer: StageTimer::new(),
    }
  }

  /// Sets up the display and draws the actor at its spawn point.
  ///
  /// Does nothing once the game is running.
  pub fn init(&mut self) {
    if self.phase != Phase::Initializing {
      return;
    }

    self
      .platform
      .init_display(self.config.background, self.config.foreground);
    self
      .platform
      .draw_sprite(self.actor.position(), self.actor.sprite());
    self.platform.present();
    self.actor.commit();
    self.phase = Phase::Running;

    tracing::info!(
      position = %self.actor.position(),
      max = %self.actor.max(),
      config = ?self.config,
      "actor spawned"
    );
  }

  /// Runs one frame, initializing first if necessary.
  ///
  /// Blocks until a key is pressed, and, depending on the configured
  /// [`SyncOrder`], until the next display refresh.
  pub fn step(&mut self) -> Frame {
    self.init();

    if self.config.sync == SyncOrder::BeforeInput {
      self.platform.wait_for_frame_sync();
    }
    let key = self.platform.read_key_blocking();
    if self.config.sync == SyncOrder::AfterInput {
      self.platform.wait_for_frame_sync();
    }

    let intent = input::map_key(&self.config.keys, key);
    let step = self.config.step.0;
    let actor = &mut self.actor;
    let position =
      self.timer.time("game::resolve", || actor.apply(intent, step));

    let redraw =
      Redraw::plan(self.config.redraw, self.actor.old_position(), position);
    if let Some(redraw) = redraw {
      let (platform, actor) = (&mut self.platform, &mut self.actor);
      let erase = self.config.erase;
      self.timer.time("game::redraw", || {
        render(platform, actor.sprite(), erase, redraw);
        actor.commit();
      });
      tracing::debug!(
        %key,
        ?intent,
        %redraw,
        damage = ?redraw.damage,
        "redrew"
      );
    }

    self.frames += 1;
    if self.frames % REPORT_EVERY == 0 {
      for (stage, mean) in self.timer.drain_means() {
        tracing::trace!(stage, ?mean, frames = self.frames, "stage timing");
      }
    }

    Frame {
      key,
      intent,
      position,
      redraw,
    }
  }

  /// Runs the game until the process is terminated.
  pub fn run(mut self) -> ! {
    self.init();
    loop {
      let frame = self.step();
      if frame.redraw.is_none() {
        tracing::trace!(
          key = %frame.key,
          intent = ?frame.intent,
          position = %frame.position,
          "nothing to redraw"
        );
      }
    }
  }
}

/// Erases the sprite at its old spot, draws it at the new one, and presents
/// both together.
fn render<S: Screen>(
  screen: &mut S,
  sprite: &Sprite<'_>,
  erase: EraseMode,
  redraw: Redraw,
) {
  match erase {
    EraseMode::Clear => screen.erase_sprite(redraw.erase, sprite.dims()),
    EraseMode::RestoreBackground => {
      screen.restore_background(redraw.erase, sprite.dims())
    }
  }
  screen.draw_sprite(redraw.draw, sprite);
  screen.present();
}

#[cfg(test)]
mod tests {
  use super::*;

  use std::cell::RefCell;
  use std::collections::VecDeque;
  use std::rc::Rc;

  use rand::rngs::StdRng;
  use rand::Rng as _;
  use rand::SeedableRng as _;

  use crate::assets;
  use crate::damage::RedrawPolicy;
  use crate::gfx::framebuffer::SCREEN;
  use crate::gfx::Color;

  #[derive(Clone, PartialEq, Eq, Debug)]
  enum Call {
    Init(Color, Color),
    Draw(Point),
    Erase(Point, Point),
    Restore(Point, Point),
    Present,
    Poll(u8),
    Sync,
  }

  impl Call {
    fn is_render(&self) -> bool {
      matches!(
        self,
        Call::Draw(..)
          | Call::Erase(..)
          | Call::Restore(..)
          | Call::Init(..)
          | Call::Present
      )
    }
  }

  type Log = Rc<RefCell<Vec<Call>>>;

  struct Fake {
    log: Log,
    keys: VecDeque<u8>,
  }

  impl Screen for Fake {
    fn init_display(&mut self, background: Color, foreground: Color) {
      self.log.borrow_mut().push(Call::Init(background, foreground));
    }
    fn draw_sprite(&mut self, at: Point, _: &Sprite<'_>) {
      self.log.borrow_mut().push(Call::Draw(at));
    }
    fn erase_sprite(&mut self, at: Point, dims: Point) {
      self.log.borrow_mut().push(Call::Erase(at, dims));
    }
    fn restore_background(&mut self, at: Point, dims: Point) {
      self.log.borrow_mut().push(Call::Restore(at, dims));
    }
    fn present(&mut self) {
      self.log.borrow_mut().push(Call::Present);
    }
  }

  impl Keyboard for Fake {
    fn poll_key(&mut self) -> KeyCode {
      let code = self.keys.pop_front().expect("ran out of scripted keys");
      self.log.borrow_mut().push(Call::Poll(code));
      KeyCode(code)
    }
  }

  impl FrameSync for Fake {
    fn wait_for_frame_sync(&mut self) {
      self.log.borrow_mut().push(Call::Sync);
    }
  }

  fn game(keys: &[u8], config: Config) -> (Game<'static, Fake>, Log) {
    let log = Log::default();
    let fake = Fake {
      log: log.clone(),
      keys: keys.iter().copied().collect(),
    };
    let game = Game::new(
      fake,
      Actor::spawn(assets::player(), SCREEN),
      config,
    );
    (game, log)
  }

  fn renders(log: &Log) -> Vec<Call> {
    log.borrow().iter().filter(|c| c.is_render()).cloned().collect()
  }

  const DIMS: Point = Point::new(2, 16);

  #[test]
  fn init_draws_without_erasing() {
    let (mut game, log) = game(b"", Config::default());
    assert_eq!(game.phase, Phase::Initializing);
    game.init();
    assert_eq!(game.phase, Phase::Running);
    assert_eq!(
      *log.borrow(),
      vec![
        Call::Init(Color::Black, Color::White),
        Call::Draw(Point::new(19, 92)),
        Call::Present,
      ]
    );

    // A second init is a no-op.
    game.init();
    assert_eq!(log.borrow().len(), 3);
  }

  #[test]
  fn up_moves_and_redraws_once() {
    let config = Config {
      erase: EraseMode::Clear,
      ..Config::default()
    };
    let (mut game, log) = game(b"Z", config);
    game.init();
    log.borrow_mut().clear();

    let frame = game.step();
    assert_eq!(frame.intent, Intent::Up);
    assert_eq!(frame.position, Point::new(19, 88));
    assert_eq!(
      renders(&log),
      vec![
        Call::Erase(Point::new(19, 92), DIMS),
        Call::Draw(Point::new(19, 88)),
        Call::Present,
      ]
    );
    assert_eq!(game.actor.old_position(), Point::new(19, 88));
  }

  #[test]
  fn restore_mode_restores_background() {
    let (mut game, log) = game(b"e", Config::default());
    game.init();
    log.borrow_mut().clear();

    game.step();
    assert_eq!(
      renders(&log),
      vec![
        Call::Restore(Point::new(19, 92), DIMS),
        Call::Draw(Point::new(20, 92)),
        Call::Present,
      ]
    );
  }

  #[test]
  fn unbound_key_renders_nothing() {
    let (mut game, log) = game(b"q", Config::default());
    game.init();
    log.borrow_mut().clear();

    let frame = game.step();
    assert_eq!(frame.intent, Intent::None);
    assert_eq!(frame.redraw, None);
    assert!(renders(&log).is_empty());
    assert_eq!(game.frames, 1);
  }

  #[test]
  fn blocked_move_renders_nothing() {
    let keys = [b'a'; 25];
    let (mut game, log) = game(&keys, Config::default());
    for _ in 0..19 {
      game.step();
    }
    assert_eq!(game.actor.position().x(), 0);
    log.borrow_mut().clear();

    for _ in 19..25 {
      let frame = game.step();
      assert_eq!(frame.position.x(), 0);
      assert_eq!(frame.redraw, None);
    }
    assert!(renders(&log).is_empty());
  }

  #[test]
  fn always_policy_redraws_in_place() {
    let config = Config {
      redraw: RedrawPolicy::Always,
      erase: EraseMode::Clear,
      ..Config::default()
    };
    let (mut game, log) = game(b"q", config);
    game.init();
    log.borrow_mut().clear();

    game.step();
    let spawn = Point::new(19, 92);
    assert_eq!(
      renders(&log),
      vec![Call::Erase(spawn, DIMS), Call::Draw(spawn), Call::Present]
    );
  }

  #[test]
  fn sync_order() {
    let run = |sync| {
      let (mut game, log) = game(b"\0q", Config {
        sync,
        ..Config::default()
      });
      game.init();
      log.borrow_mut().clear();
      game.step();
      let calls = log.borrow().clone();
      calls
    };

    assert_eq!(
      run(SyncOrder::AfterInput),
      vec![Call::Poll(0), Call::Poll(b'q'), Call::Sync]
    );
    assert_eq!(
      run(SyncOrder::BeforeInput),
      vec![Call::Sync, Call::Poll(0), Call::Poll(b'q')]
    );
    assert_eq!(run(SyncOrder::Off), vec![Call::Poll(0), Call::Poll(b'q')]);
  }

  #[test]
  fn sync_precedes_render() {
    let (mut game, log) = game(b"s", Config::default());
    game.init();
    log.borrow_mut().clear();
    game.step();
    assert_eq!(
      *log.borrow(),
      vec![
        Call::Poll(b's'),
        Call::Sync,
        Call::Restore(Point::new(19, 92), DIMS),
        Call::Draw(Point::new(19, 96)),
        Call::Present,
      ]
    );
  }

  #[test]
  fn random_walk_stays_on_screen_and_erases_last_draw() {
    let mut rng = StdRng::seed_from_u64(0x0d5);
    let alphabet = b"zsaeZSAEq1 ";
    let keys = (0..2000)
      .map(|_| alphabet[rng.gen_range(0..alphabet.len())])
      .collect::<Vec<_>>();

    let (mut game, log) = game(&keys, Config::default());
    for _ in 0..keys.len() {
      game.step();
    }

    let mut drawn = None;
    for call in renders(&log) {
      match call {
        Call::Draw(p) => {
          assert!(p.x() + DIMS.x() <= SCREEN.x());
          assert!(p.y() + DIMS.y() <= SCREEN.y());
          drawn = Some(p);
        }
        Call::Restore(p, dims) => {
          assert_eq!(Some(p), drawn);
          assert_eq!(dims, DIMS);
        }
        Call::Init(..) => assert_eq!(drawn, None),
        Call::Present => assert!(drawn.is_some()),
        other => panic!("unexpected call {:?}", other),
      }
    }
    assert_eq!(drawn, Some(game.actor.position()));
  }

  #[test]
  fn parse_sync_order() {
    assert_eq!("OFF".parse::<SyncOrder>().unwrap(), SyncOrder::Off);
    assert_eq!(
      "before-input".parse::<SyncOrder>().unwrap(),
      SyncOrder::BeforeInput
    );
    assert!("sometimes".parse::<SyncOrder>().is_err());
  }
}
