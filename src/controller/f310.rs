//! # Logitech F310 Layout
//!
//! Named buttons and axes for the Logitech F310 gamepad in DirectInput ("D") mode.
//!
//! ## Buttons
//!
//! | Button | Number |
//! |--------|--------|
//! | X | 1 |
//! | A | 2 |
//! | B | 3 |
//! | Y | 4 |
//! | Left bumper | 5 |
//! | Right bumper | 6 |
//! | Left trigger | 7 |
//! | Right trigger | 8 |
//! | Back | 9 |
//! | Start | 10 |
//! | Left stick click | 11 |
//! | Right stick click | 12 |
//!
//! ## Axes
//!
//! | Axis | Number | Range |
//! |------|--------|-------|
//! | Left stick X | 1 | -1.0 (left) to 1.0 (right) |
//! | Left stick Y | 2 | -1.0 (up) to 1.0 (down) |
//! | Right stick X | 3 | -1.0 (left) to 1.0 (right) |
//! | Right stick Y | 4 | -1.0 (up) to 1.0 (down) |
//! | D-Pad X | 5 | -1.0 (left) to 1.0 (right) |
//! | D-Pad Y | 6 | -1.0 (up) to 1.0 (down) |
//!
//! In D mode the D-Pad reports as an axis pair, so the directional accessors
//! ([`F310::dpad_up`] and friends) derive booleans by comparing against
//! [`PAD_THRESHOLD`].
//!
//! ## Usage
//!
//! ```no_run
//! use padpoll::controller::{f310::button, EvdevJoystick, F310};
//!
//! let mut pad = F310::with_dead_zone(EvdevJoystick::open(0)?, 0.1);
//!
//! loop {
//!     pad.update();
//!     if pad.was_pressed(button::A)? {
//!         println!("A pressed, left stick at {:.2}", pad.left_stick_x());
//!     }
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use super::input_state::InputState;
use super::joystick::Joystick;
use crate::error::Result;

/// Number of buttons on the F310.
pub const F310_BUTTON_COUNT: usize = 12;

/// Minimum D-Pad axis magnitude for a direction to count as pressed.
pub const PAD_THRESHOLD: f64 = 0.5;

/// Button numbers for use with [`F310::is_down`], [`F310::was_pressed`] and [`F310::was_released`].
pub mod button {
    pub const X: usize = 1;
    pub const A: usize = 2;
    pub const B: usize = 3;
    pub const Y: usize = 4;
    pub const LEFT_BUMPER: usize = 5;
    pub const RIGHT_BUMPER: usize = 6;
    pub const LEFT_TRIGGER: usize = 7;
    pub const RIGHT_TRIGGER: usize = 8;
    pub const BACK: usize = 9;
    pub const START: usize = 10;
    /// Left stick pressed in.
    pub const LEFT_STICK: usize = 11;
    /// Right stick pressed in.
    pub const RIGHT_STICK: usize = 12;

    /// All buttons with their display names, in button-number order.
    pub const ALL: [(usize, &str); super::F310_BUTTON_COUNT] = [
        (X, "X"),
        (A, "A"),
        (B, "B"),
        (Y, "Y"),
        (LEFT_BUMPER, "LB"),
        (RIGHT_BUMPER, "RB"),
        (LEFT_TRIGGER, "LT"),
        (RIGHT_TRIGGER, "RT"),
        (BACK, "Back"),
        (START, "Start"),
        (LEFT_STICK, "L3"),
        (RIGHT_STICK, "R3"),
    ];

    /// Display name of a button number, or `None` if the F310 has no such button.
    #[must_use]
    pub fn name(button: usize) -> Option<&'static str> {
        ALL.iter().find(|(b, _)| *b == button).map(|(_, name)| *name)
    }
}

/// Axis numbers for use with [`InputState::read_axis`].
pub mod axis {
    pub const LEFT_X: usize = 1;
    pub const LEFT_Y: usize = 2;
    pub const RIGHT_X: usize = 3;
    pub const RIGHT_Y: usize = 4;
    pub const DPAD_X: usize = 5;
    pub const DPAD_Y: usize = 6;
}

/// Logitech F310 (D mode) on top of a generic [`InputState`].
///
/// Adds no state of its own; every accessor delegates to the wrapped input state
/// with a fixed button or axis number.
#[derive(Debug)]
pub struct F310<J> {
    input: InputState<J>,
}

impl<J: Joystick> F310<J> {
    /// Creates an F310 layout with a dead zone of 0.0.
    #[must_use]
    pub fn new(joystick: J) -> Self {
        Self::with_dead_zone(joystick, 0.0)
    }

    /// Creates an F310 layout with the given axis dead zone.
    #[must_use]
    pub fn with_dead_zone(joystick: J, dead_zone: f64) -> Self {
        Self {
            input: InputState::with_dead_zone(joystick, F310_BUTTON_COUNT, dead_zone),
        }
    }

    /// The generic input state behind this layout.
    #[must_use]
    pub fn input(&self) -> &InputState<J> {
        &self.input
    }

    /// Mutable access to the generic input state, e.g. to change the dead zone.
    pub fn input_mut(&mut self) -> &mut InputState<J> {
        &mut self.input
    }

    /// Read-only access to the underlying joystick.
    #[must_use]
    pub fn joystick(&self) -> &J {
        self.input.joystick()
    }

    /// Samples a new generation of button state. Call once per control tick.
    pub fn update(&mut self) {
        self.input.update();
    }

    /// See [`InputState::is_down`].
    pub fn is_down(&self, button: usize) -> Result<bool> {
        self.input.is_down(button)
    }

    /// See [`InputState::was_pressed`].
    pub fn was_pressed(&self, button: usize) -> Result<bool> {
        self.input.was_pressed(button)
    }

    /// See [`InputState::was_released`].
    pub fn was_released(&self, button: usize) -> Result<bool> {
        self.input.was_released(button)
    }

    /// Left stick X axis, negative to the left.
    #[must_use]
    pub fn left_stick_x(&self) -> f64 {
        self.input.read_axis(axis::LEFT_X)
    }

    /// Left stick Y axis, negative when pushed up.
    #[must_use]
    pub fn left_stick_y(&self) -> f64 {
        self.input.read_axis(axis::LEFT_Y)
    }

    /// Right stick X axis, negative to the left.
    #[must_use]
    pub fn right_stick_x(&self) -> f64 {
        self.input.read_axis(axis::RIGHT_X)
    }

    /// Right stick Y axis, negative when pushed up.
    #[must_use]
    pub fn right_stick_y(&self) -> f64 {
        self.input.read_axis(axis::RIGHT_Y)
    }

    /// D-Pad X axis, negative to the left.
    #[must_use]
    pub fn dpad_x(&self) -> f64 {
        self.input.read_axis(axis::DPAD_X)
    }

    /// D-Pad Y axis, negative when pushed up.
    #[must_use]
    pub fn dpad_y(&self) -> f64 {
        self.input.read_axis(axis::DPAD_Y)
    }

    /// D-Pad pushed up (negative Y).
    #[must_use]
    pub fn dpad_up(&self) -> bool {
        self.dpad_y() < -PAD_THRESHOLD
    }

    /// D-Pad pushed down (positive Y).
    #[must_use]
    pub fn dpad_down(&self) -> bool {
        self.dpad_y() > PAD_THRESHOLD
    }

    /// D-Pad pushed left (negative X).
    #[must_use]
    pub fn dpad_left(&self) -> bool {
        self.dpad_x() < -PAD_THRESHOLD
    }

    /// D-Pad pushed right (positive X).
    #[must_use]
    pub fn dpad_right(&self) -> bool {
        self.dpad_x() > PAD_THRESHOLD
    }
}
