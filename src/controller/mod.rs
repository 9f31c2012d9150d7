//! # Controller Module
//!
//! Game controller input handling.
//!
//! This module handles:
//! - The device capability contract ([`Joystick`])
//! - Per-tick button sampling with press/release edge detection
//! - Dead-zone filtering of analog axes
//! - Named layouts for specific controller models
//! - Reading Linux evdev devices

pub mod evdev_joystick;
pub mod f310;
pub mod input_state;
pub mod joystick;

pub use evdev_joystick::{ChannelMap, EvdevJoystick};
pub use f310::F310;
pub use input_state::InputState;
pub use joystick::Joystick;
