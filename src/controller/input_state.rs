//! # Input State Module
//!
//! Two-generation button buffer with press/release edge detection, plus
//! dead-zone filtered axis reads.
//!
//! ## Update Cycle
//!
//! [`InputState::update`] is the only operation that changes button state. It
//! must run exactly once at the start of every control tick:
//!
//! 1. The current generation is copied into the previous generation
//! 2. Every button channel `1..=button_count` is re-read from the joystick
//!
//! All button queries in the same tick then read from these two buffers, so
//! their answers are stable until the next `update()`.
//!
//! ## Axes
//!
//! Axes are not buffered. [`InputState::read_axis`] reads the joystick live and
//! returns the value only if its magnitude is strictly greater than the dead zone.
//!
//! ## Usage
//!
//! ```
//! use padpoll::controller::{InputState, Joystick};
//!
//! struct Trigger(bool);
//!
//! impl Joystick for Trigger {
//!     fn raw_button(&self, channel: usize) -> bool { channel == 1 && self.0 }
//!     fn raw_axis(&self, _channel: usize) -> f64 { 0.02 }
//! }
//!
//! let mut input = InputState::with_dead_zone(Trigger(true), 4, 0.05);
//! input.update();
//! assert!(input.was_pressed(1)?);
//! assert_eq!(input.read_axis(1), 0.0); // inside the dead zone
//! # Ok::<(), padpoll::error::PadPollError>(())
//! ```

use tracing::trace;

use super::joystick::Joystick;
use crate::error::{PadPollError, Result};

/// Debounced, edge-detectable state of one joystick's buttons.
///
/// Owns the joystick it polls. Not thread-safe; drive it from the thread that
/// runs the control loop, or wrap the whole value in a mutex.
#[derive(Debug)]
pub struct InputState<J> {
    joystick: J,
    /// Button levels as of the previous `update()`.
    previous: Box<[bool]>,
    /// Button levels as of the latest `update()`.
    current: Box<[bool]>,
    /// Axis readings with magnitude `<=` this are reported as exactly 0.0.
    dead_zone: f64,
}

impl<J: Joystick> InputState<J> {
    /// Creates an input state tracking `button_count` buttons with a dead zone of 0.0.
    ///
    /// Both generations start out all released.
    #[must_use]
    pub fn new(joystick: J, button_count: usize) -> Self {
        Self::with_dead_zone(joystick, button_count, 0.0)
    }

    /// Creates an input state tracking `button_count` buttons with the given dead zone.
    ///
    /// The dead zone is taken as-is. A negative value disables filtering entirely,
    /// including for readings of exactly 0.0.
    #[must_use]
    pub fn with_dead_zone(joystick: J, button_count: usize, dead_zone: f64) -> Self {
        Self {
            joystick,
            previous: vec![false; button_count].into_boxed_slice(),
            current: vec![false; button_count].into_boxed_slice(),
            dead_zone,
        }
    }

    /// Number of buttons tracked, fixed at construction.
    #[must_use]
    pub fn button_count(&self) -> usize {
        self.current.len()
    }

    /// Returns the current dead zone.
    #[must_use]
    pub fn dead_zone(&self) -> f64 {
        self.dead_zone
    }

    /// Sets the dead zone. Takes effect on the next axis read.
    pub fn set_dead_zone(&mut self, dead_zone: f64) {
        self.dead_zone = dead_zone;
    }

    /// Read-only access to the underlying joystick.
    #[must_use]
    pub fn joystick(&self) -> &J {
        &self.joystick
    }

    /// Samples a new generation of button state.
    ///
    /// Call once per control tick, before any query in that tick.
    pub fn update(&mut self) {
        self.previous.copy_from_slice(&self.current);

        for (index, level) in self.current.iter_mut().enumerate() {
            *level = self.joystick.raw_button(index + 1);
        }

        trace!(buttons = ?self.current, "sampled button generation");
    }

    /// Returns `true` if `button` is held down as of the latest update.
    ///
    /// # Errors
    ///
    /// Returns `ButtonOutOfRange` if `button` is not in `1..=button_count`.
    pub fn is_down(&self, button: usize) -> Result<bool> {
        let slot = self.slot(button)?;
        Ok(self.current[slot])
    }

    /// Returns `true` if `button` went from released to held between the last two updates.
    ///
    /// # Errors
    ///
    /// Returns `ButtonOutOfRange` if `button` is not in `1..=button_count`.
    pub fn was_pressed(&self, button: usize) -> Result<bool> {
        let slot = self.slot(button)?;
        Ok(!self.previous[slot] && self.current[slot])
    }

    /// Returns `true` if `button` went from held to released between the last two updates.
    ///
    /// # Errors
    ///
    /// Returns `ButtonOutOfRange` if `button` is not in `1..=button_count`.
    pub fn was_released(&self, button: usize) -> Result<bool> {
        let slot = self.slot(button)?;
        Ok(self.previous[slot] && !self.current[slot])
    }

    /// Reads `axis` live from the joystick and applies the dead zone.
    ///
    /// Returns the raw value unchanged if `|value| > dead_zone`, otherwise exactly 0.0.
    #[must_use]
    pub fn read_axis(&self, axis: usize) -> f64 {
        let value = self.joystick.raw_axis(axis);
        if value.abs() > self.dead_zone {
            value
        } else {
            0.0
        }
    }

    /// Maps a 1-based button number onto a buffer slot.
    fn slot(&self, button: usize) -> Result<usize> {
        if button == 0 || button > self.button_count() {
            return Err(PadPollError::ButtonOutOfRange {
                button,
                count: self.button_count(),
            });
        }
        Ok(button - 1)
    }
}
