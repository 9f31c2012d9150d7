//! # padpoll
//!
//! Tick-driven polling for physical game controllers used in periodic control loops.
//!
//! A [`controller::InputState`] samples every digital button once per tick, keeps the
//! previous sample around for press/release edge detection and filters analog axes
//! through a dead zone. Layout mappings such as [`controller::F310`] put semantic names
//! on top of the raw 1-based button and axis numbers.
//!
//! ```
//! use padpoll::controller::{f310::button, Joystick, F310};
//!
//! struct Idle;
//!
//! impl Joystick for Idle {
//!     fn raw_button(&self, _channel: usize) -> bool { false }
//!     fn raw_axis(&self, _channel: usize) -> f64 { 0.0 }
//! }
//!
//! let mut pad = F310::new(Idle);
//! pad.update();
//! assert!(!pad.was_pressed(button::A)?);
//! assert!(!pad.dpad_up());
//! # Ok::<(), padpoll::error::PadPollError>(())
//! ```

pub mod config;
pub mod controller;
pub mod error;
