//! Timing primitives.

use std::sync::Mutex;
use std::thread;
use std::time::Duration;
use std::time::Instant;

use chashmap::CHashMap;

/// A software stand-in for the vertical blank.
///
/// Frame boundaries fall on a fixed grid starting when the timer was created,
/// so waiting always ends on the *next* boundary, like a real vblank does,
/// no matter how long the caller spent since the last one.
pub struct FrameTimer {
  origin: Instant,
  period: Duration,
  frame_count: u64,

  fps: f64,
  last_measurement: Instant,
  last_measurement_frame: u64,
}

impl FrameTimer {
  /// Creates a new `FrameTimer` ticking `rate` times per second.
  ///
  /// # Panics
  ///
  /// Panics if `rate` is zero.
  pub fn new(rate: u32) -> FrameTimer {
    assert!(rate > 0, "frame rate must be positive");
    FrameTimer {
      origin: Instant::now(),
      period: Duration::from_secs(1) / rate,
      frame_count: 0,
      fps: 0.0,
      last_measurement: Instant::now(),
      last_measurement_frame: 0,
    }
  }

  /// Returns the number of frames waited for so far.
  pub fn frame_count(&self) -> u64 {
    self.frame_count
  }

  /// Returns how long it is until the next frame boundary.
  pub fn until_next(&self) -> Duration {
    let period = self.period.as_nanos();
    let elapsed = self.origin.elapsed().as_nanos();
    let next = (elapsed / period + 1) * period;
    Duration::from_nanos((next - elapsed) as u64)
  }

  /// Blocks until the next frame boundary.
  pub fn wait(&mut self) {
    thread::sleep(self.until_next());
    self.frame_count += 1;
  }

  /// Measures the frames per second at the given measurement interval.
  ///
  /// Between measurements the previous value is returned.
  pub fn measure_fps(&mut self, measurement_interval: Duration) -> f64 {
    if self.last_measurement.elapsed() < measurement_interval {
      return self.fps;
    }

    let frames = (self.frame_count - self.last_measurement_frame) as f64;
    self.fps = frames / self.last_measurement.elapsed().as_secs_f64();
    self.last_measurement = Instant::now();
    self.last_measurement_frame = self.frame_count;
    self.fps
  }
}

/// Accumulates the average time spent in each named stage of a frame, such
/// as `game::resolve`.
///
/// Means are taken over a window that [`StageTimer::drain_means()`] resets.
pub struct StageTimer {
  windows: CHashMap<&'static str, Window>,
  order: Mutex<Vec<&'static str>>,
}

/// Total time and sample count for one stage since the last drain.
#[derive(Default)]
struct Window {
  total: Duration,
  samples: u32,
}

impl StageTimer {
  /// Creates a new `StageTimer`.
  pub fn new() -> Self {
    Self {
      windows: CHashMap::new(),
      order: Mutex::new(Vec::new()),
    }
  }

  /// Runs `f`, charging the time it takes to `stage`.
  pub fn time<R>(&self, stage: &'static str, f: impl FnOnce() -> R) -> R {
    let started = Instant::now();
    let result = f();
    self.record(stage, started.elapsed());
    result
  }

  fn record(&self, stage: &'static str, elapsed: Duration) {
    let order = &self.order;
    self.windows.upsert(
      stage,
      || {
        if let Ok(mut order) = order.lock() {
          order.push(stage);
        }
        Window {
          total: elapsed,
          samples: 1,
        }
      },
      |window| {
        window.total += elapsed;
        window.samples += 1;
      },
    );
  }

  /// Returns the mean duration of each stage since the previous call, in the
  /// order stages were first seen, and resets the averages.
  ///
  /// Stages that were not timed since the previous call are skipped.
  pub fn drain_means(&self) -> Vec<(&'static str, Duration)> {
    let order = match self.order.lock() {
      Ok(order) => order.clone(),
      Err(_) => return Vec::new(),
    };

    order
      .into_iter()
      .filter_map(|stage| {
        let mut window = self.windows.get_mut(stage)?;
        let taken = std::mem::take(&mut *window);
        if taken.samples == 0 {
          return None;
        }
        Some((stage, taken.total / taken.samples))
      })
      .collect()
  }
}

impl Default for StageTimer {
  fn default() -> Self {
    Self::new()
  }
}
