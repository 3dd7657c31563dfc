//=========================================================================
// Frame Clock
//=========================================================================
//
// Per-frame timing source for the stage.
//
// Paced modes keep a fixed frame duration (1 / fps) and sleep away the
// remainder of each frame, the same fixed-rate pacing the engine's logic
// thread used. `Raf` leaves pacing to the display (vsync) entirely.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::thread;
use std::time::{Duration, Instant};

//=== TimingMode ==========================================================

/// How frames are scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimingMode {
    /// Timer driven, paced to the target fps.
    Timeout,

    /// Display driven, throttled to the target fps.
    #[default]
    RafSynched,

    /// Display driven at its own refresh rate; fps is ignored.
    Raf,
}

//=== Validation ==========================================================

/// Frame duration for `fps`.
///
/// # Panics
///
/// Panics if `fps <= 0.0` (or NaN), or if `fps` is so small that one frame
/// does not fit in a `Duration` or a deadline `Instant`.
pub(crate) fn checked_frame_duration(fps: f64) -> Duration {
    assert!(fps > 0.0, "FPS must be positive, got {}", fps);

    match Duration::try_from_secs_f64(fps.recip()) {
        Ok(duration) if Instant::now().checked_add(duration).is_some() => duration,
        _ => panic!("FPS too small for a representable frame duration, got {}", fps),
    }
}

//=== FrameClock ==========================================================

/// Fixed-rate frame pacing.
#[derive(Debug, Clone)]
pub struct FrameClock {
    fps: f64,
    mode: TimingMode,
    frame_duration: Duration,
    frame_start: Instant,
    frames: u64,
}

impl FrameClock {
    /// # Panics
    ///
    /// Panics if `fps <= 0.0` or too small for a representable frame.
    pub fn new(fps: f64, mode: TimingMode) -> Self {
        Self {
            fps,
            mode,
            frame_duration: checked_frame_duration(fps),
            frame_start: Instant::now(),
            frames: 0,
        }
    }

    pub fn fps(&self) -> f64 {
        self.fps
    }

    pub fn mode(&self) -> TimingMode {
        self.mode
    }

    /// Frames begun since the clock was created.
    pub fn frames_elapsed(&self) -> u64 {
        self.frames
    }

    pub fn frame_duration(&self) -> Duration {
        self.frame_duration
    }

    /// Marks the start of a frame.
    pub fn begin_frame(&mut self) {
        self.frame_start = Instant::now();
        self.frames += 1;
    }

    /// When the next frame is due, or `None` when the display paces frames.
    pub fn next_deadline(&self) -> Option<Instant> {
        match self.mode {
            TimingMode::Raf => None,
            TimingMode::Timeout | TimingMode::RafSynched => {
                self.frame_start.checked_add(self.frame_duration)
            }
        }
    }

    /// When a paced loop should wake up next.
    ///
    /// An overdue frame (no frame ran since the deadline) is retried one
    /// frame duration after `now`, so a loop whose redraws are withheld
    /// keeps sleeping instead of waking immediately.
    pub fn next_wake(&self, now: Instant) -> Option<Instant> {
        let deadline = self.next_deadline()?;
        if deadline > now {
            Some(deadline)
        } else {
            now.checked_add(self.frame_duration)
        }
    }

    /// Time left in the current frame.
    pub fn remaining(&self) -> Duration {
        self.next_deadline()
            .map(|deadline| deadline.saturating_duration_since(Instant::now()))
            .unwrap_or(Duration::ZERO)
    }

    /// Sleeps away the rest of the current frame.
    pub fn wait_for_next_frame(&self) {
        let remaining = self.remaining();
        if !remaining.is_zero() {
            thread::sleep(remaining);
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
