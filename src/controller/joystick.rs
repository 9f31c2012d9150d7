//! # Joystick Capability
//!
//! The narrow contract an input device must provide to be polled by
//! [`InputState`](super::InputState).
//!
//! Channels are 1-based, matching the numbering printed on controllers and
//! used by most joystick drivers. Reads are live, non-blocking and infallible:
//! an implementation that loses its device returns a last-known or default
//! value instead of an error.

/// Live access to the raw digital and analog lines of one input device.
///
/// An [`InputState`](super::InputState) takes its joystick by value and is the
/// only thing that reads from it. One device must never back two state buffers,
/// so the trait is implemented for owned boxes but not for `&J`.
#[cfg_attr(test, mockall::automock)]
pub trait Joystick {
    /// Current level of digital channel `channel` (1-based).
    fn raw_button(&self, channel: usize) -> bool;

    /// Current value of analog channel `channel` (1-based), typically in `-1.0..=1.0`.
    fn raw_axis(&self, channel: usize) -> f64;
}

impl<J: Joystick + ?Sized> Joystick for Box<J> {
    fn raw_button(&self, channel: usize) -> bool {
        (**self).raw_button(channel)
    }

    fn raw_axis(&self, channel: usize) -> f64 {
        (**self).raw_axis(channel)
    }
}
