//! Logical playhead clock.
//!
//! The clock owns the only timer in the system. Every transition that flips
//! `playing` or changes `speed` tears the current timer down and, if still
//! playing, starts a fresh one under a new generation number. Ticks carrying
//! an older generation are dropped, so an already-queued tick from a
//! cancelled timer can never advance time twice.

use crate::error::TimelineError;
use isound_transport::{Millis, PlaybackState};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

/// Timer that delivers ticks to whoever owns the clock.
pub trait TickSource: Send {
    /// Start delivering ticks tagged with `generation` every `interval`.
    /// Implementations must stop any previously started timer first.
    fn start(&mut self, generation: u64, interval: Duration);

    /// Stop delivering ticks. Synchronous and unconditional.
    fn stop(&mut self);
}

pub struct Clock {
    current_time: Millis,
    timeline_duration: Millis,
    state: PlaybackState,
    speed: f64,
    tick_interval_ms: u64,
    generation: u64,
    ticker: Box<dyn TickSource>,
}

impl Clock {
    pub fn new(timeline_duration: Millis, tick_interval_ms: u64, ticker: Box<dyn TickSource>) -> Self {
        Self {
            current_time: 0.0,
            timeline_duration: timeline_duration.max(0.0),
            state: PlaybackState::Stopped,
            speed: 1.0,
            tick_interval_ms,
            generation: 0,
            ticker,
        }
    }

    /// Start playback. Replaying from the very end wraps to the origin.
    pub fn play(&mut self) {
        if self.state.is_playing() {
            return;
        }
        if self.current_time >= self.timeline_duration {
            self.current_time = 0.0;
        }
        self.state = PlaybackState::Playing;
        self.restart_timer();
        log::info!("playing from {}ms at {}x", self.current_time, self.speed);
    }

    /// Returns whether playback was actually running.
    pub fn pause(&mut self) -> bool {
        let was_playing = self.halt();
        if was_playing {
            log::info!("paused at {}ms", self.current_time);
        }
        was_playing
    }

    pub fn toggle(&mut self) {
        if self.state.is_playing() {
            self.pause();
        } else {
            self.play();
        }
    }

    /// Move the playhead. Always leaves the clock stopped.
    pub fn seek(&mut self, time: Millis) {
        self.halt();
        self.current_time = if time.is_nan() {
            0.0
        } else {
            time.clamp(0.0, self.timeline_duration)
        };
    }

    /// Advance by `delta` scaled by the current speed. Returns whether time
    /// moved. Reaching the end clamps exactly and stops.
    pub fn tick(&mut self, delta: Millis) -> bool {
        if !self.state.is_playing() {
            return false;
        }

        let next = self.current_time + delta * self.speed;
        if next >= self.timeline_duration {
            self.current_time = self.timeline_duration;
            self.halt();
            log::info!("reached end of timeline at {}ms", self.timeline_duration);
        } else {
            self.current_time = next;
            log::trace!("tick -> {}ms", self.current_time);
        }
        true
    }

    /// Entry point for the timer. Stale generations are ignored.
    pub fn on_timer(&mut self, generation: u64) -> bool {
        if generation != self.generation || !self.state.is_playing() {
            log::trace!(
                "dropping stale tick (generation {generation}, current {})",
                self.generation
            );
            return false;
        }
        self.tick(self.tick_interval_ms as Millis)
    }

    pub fn set_speed(&mut self, speed: f64) -> Result<(), TimelineError> {
        if !speed.is_finite() || speed <= 0.0 {
            return Err(TimelineError::InvalidSpeed(speed));
        }
        self.speed = speed;
        if self.state.is_playing() {
            self.restart_timer();
        }
        log::info!("speed set to {speed}x");
        Ok(())
    }

    /// Change the timeline length. Stops playback and pulls the playhead in
    /// if it now lies past the end.
    pub fn set_timeline_duration(&mut self, duration: Millis) -> Result<(), TimelineError> {
        if !duration.is_finite() || duration <= 0.0 {
            return Err(TimelineError::InvalidDuration(duration));
        }
        self.halt();
        self.timeline_duration = duration;
        self.current_time = self.current_time.min(duration);
        log::info!("timeline duration set to {duration}ms");
        Ok(())
    }

    pub fn current_time(&self) -> Millis {
        self.current_time
    }

    pub fn timeline_duration(&self) -> Millis {
        self.timeline_duration
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state.is_playing()
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn tick_interval_ms(&self) -> u64 {
        self.tick_interval_ms
    }

    /// Generation of the timer that is currently allowed to tick.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    fn restart_timer(&mut self) {
        self.ticker.stop();
        self.generation += 1;
        self.ticker
            .start(self.generation, Duration::from_millis(self.tick_interval_ms));
    }

    fn halt(&mut self) -> bool {
        if !self.state.is_playing() {
            return false;
        }
        self.state = PlaybackState::Stopped;
        self.ticker.stop();
        self.generation += 1;
        true
    }
}

impl Drop for Clock {
    fn drop(&mut self) {
        self.ticker.stop();
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct ManualTickerState {
    pub running: Option<(u64, Duration)>,
    pub starts: usize,
    pub stops: usize,
}

/// A [`TickSource`] that never fires on its own. The host (or a test)
/// reads the running generation and calls [`Clock::on_timer`] itself.
#[derive(Debug, Clone, Default)]
pub struct ManualTicker {
    state: Arc<Mutex<ManualTickerState>>,
}

impl ManualTicker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> ManualTickerState {
        self.lock().clone()
    }

    /// Generation of the running timer, if any.
    pub fn running_generation(&self) -> Option<u64> {
        self.lock().running.map(|(generation, _)| generation)
    }

    fn lock(&self) -> MutexGuard<'_, ManualTickerState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl TickSource for ManualTicker {
    fn start(&mut self, generation: u64, interval: Duration) {
        let mut state = self.lock();
        state.running = Some((generation, interval));
        state.starts += 1;
    }

    fn stop(&mut self) {
        let mut state = self.lock();
        if state.running.take().is_some() {
            state.stops += 1;
        }
    }
}
