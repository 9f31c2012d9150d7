//! # padpoll
//!
//! Polls a Logitech F310 (D mode) once per control tick and logs what the
//! application logic would see: button press/release edges, D-Pad direction
//! changes and, optionally, stick positions.
//!
//! # Usage
//!
//! ```bash
//! cargo run --release -- config/default.toml
//! RUST_LOG=padpoll=debug cargo run
//! ```
//!
//! Expected output:
//! ```text
//! INFO padpoll: padpoll v0.1.0 starting...
//! INFO padpoll::controller::evdev_joystick: Opened controller Logitech Logitech Dual Action at /dev/input/event5
//! INFO padpoll: Polling at 50Hz (dead zone 0.10)
//! INFO padpoll: A pressed
//! INFO padpoll: A released
//! INFO padpoll: D-Pad up
//! INFO padpoll: D-Pad up released
//! ```

use anyhow::{Context, Result};
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info};

use padpoll::config::Config;
use padpoll::controller::f310::button;
use padpoll::controller::{ChannelMap, EvdevJoystick, Joystick, F310};

/// D-Pad directions as derived on one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct DpadDirections {
    up: bool,
    down: bool,
    left: bool,
    right: bool,
}

impl DpadDirections {
    fn read<J: Joystick>(pad: &F310<J>) -> Self {
        Self {
            up: pad.dpad_up(),
            down: pad.dpad_down(),
            left: pad.dpad_left(),
            right: pad.dpad_right(),
        }
    }

    /// Directions held now that were not held in `previous`.
    fn newly_held(&self, previous: &Self) -> Vec<&'static str> {
        [
            (self.up && !previous.up, "up"),
            (self.down && !previous.down, "down"),
            (self.left && !previous.left, "left"),
            (self.right && !previous.right, "right"),
        ]
        .into_iter()
        .filter_map(|(held, name)| held.then_some(name))
        .collect()
    }

    /// Directions held in `previous` that are no longer held.
    fn newly_released(&self, previous: &Self) -> Vec<&'static str> {
        previous.newly_held(self)
    }
}

/// One control tick: sample, then report edges.
///
/// Returns the names of buttons pressed this tick.
fn poll_tick<J: Joystick>(
    pad: &mut F310<J>,
    dpad: &mut DpadDirections,
    log_axes: bool,
) -> padpoll::error::Result<Vec<&'static str>> {
    pad.update();

    let mut pressed = Vec::new();
    for (number, name) in button::ALL {
        if pad.was_pressed(number)? {
            info!("{} pressed", name);
            pressed.push(name);
        }
        if pad.was_released(number)? {
            info!("{} released", name);
        }
    }

    let current = DpadDirections::read(pad);
    for direction in current.newly_held(dpad) {
        info!("D-Pad {}", direction);
    }
    for direction in current.newly_released(dpad) {
        info!("D-Pad {} released", direction);
    }
    *dpad = current;

    if log_axes {
        debug!(
            "left ({:+.2}, {:+.2}) right ({:+.2}, {:+.2})",
            pad.left_stick_x(),
            pad.left_stick_y(),
            pad.right_stick_x(),
            pad.right_stick_y()
        );
    }

    Ok(pressed)
}

fn open_joystick(config: &Config) -> padpoll::error::Result<EvdevJoystick> {
    if config.controller.device_path.is_empty() {
        EvdevJoystick::open(config.controller.port)
    } else {
        EvdevJoystick::open_path(&config.controller.device_path, ChannelMap::direct_input())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!("padpoll v{} starting...", env!("CARGO_PKG_VERSION"));

    let config = match std::env::args().nth(1) {
        Some(path) => Config::load(&path).with_context(|| format!("loading {}", path))?,
        None => Config::default(),
    };
    debug!("Configuration: {:?}", config);

    let joystick = open_joystick(&config).context("opening controller")?;
    let mut pad = F310::with_dead_zone(joystick, config.controller.dead_zone);

    let mut ticker = interval(config.tick_period());
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    info!(
        "Polling at {}Hz (dead zone {:.2})",
        config.control_loop.rate_hz,
        pad.input().dead_zone()
    );
    info!("Press Ctrl+C to exit");

    let mut dpad = DpadDirections::default();
    let mut ticks: u64 = 0;

    // Main control loop
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                poll_tick(&mut pad, &mut dpad, config.control_loop.log_axes)?;
                ticks += 1;
            }

            _ = tokio::signal::ctrl_c() => {
                info!("Received Ctrl+C, shutting down...");
                info!("Total ticks: {}", ticks);
                break;
            }
        }
    }

    Ok(())
}
