//! # evdev Joystick Module
//!
//! A [`Joystick`] backed by a Linux evdev input device.
//!
//! ## Device Selection
//!
//! Devices are addressed by a port number, counted from 0 over the
//! joystick-class devices under `/dev/input/event*` in path order. A device is
//! joystick-class if it reports `BTN_TRIGGER` (generic HID joysticks, including
//! gamepads in DirectInput mode) or `BTN_SOUTH` (XInput-style gamepads).
//! Devices that do not cover the channel map are not counted.
//!
//! ## Reads
//!
//! Button and axis reads query the kernel's current device state directly
//! (`EVIOCGKEY` / `EVIOCGABS`), so they never block and never depend on
//! draining the event queue. A read that fails (e.g. the controller was
//! unplugged) is answered with the last value seen on that channel. The first
//! failure after a good read is logged, the rest are silent until the device
//! answers again.
//!
//! ## Channel Map
//!
//! | Channel | Button | Axis |
//! |---------|--------|------|
//! | 1 | BTN_TRIGGER | ABS_X |
//! | 2 | BTN_THUMB | ABS_Y |
//! | 3 | BTN_THUMB2 | ABS_Z |
//! | 4 | BTN_TOP | ABS_RZ |
//! | 5 | BTN_TOP2 | ABS_HAT0X |
//! | 6 | BTN_PINKIE | ABS_HAT0Y |
//! | 7 | BTN_BASE | |
//! | 8 | BTN_BASE2 | |
//! | 9 | BTN_BASE3 | |
//! | 10 | BTN_BASE4 | |
//! | 11 | BTN_BASE5 | |
//! | 12 | BTN_BASE6 | |
//!
//! This is [`ChannelMap::direct_input`], the numbering a DirectInput HID
//! gamepad such as the Logitech F310 in D mode exposes. A device is only
//! opened if it reports every key and axis its channel map names.

use evdev::{AbsoluteAxisType, AttributeSetRef, Device, Key};
use std::cell::Cell;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use super::joystick::Joystick;
use crate::error::{PadPollError, Result};

/// Directory scanned for input devices.
const INPUT_DIR: &str = "/dev/input";

/// Assignment of 1-based channels to evdev key and axis codes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelMap {
    buttons: Vec<Key>,
    axes: Vec<AbsoluteAxisType>,
}

impl Default for ChannelMap {
    fn default() -> Self {
        Self::direct_input()
    }
}

impl ChannelMap {
    /// Creates a channel map; `buttons[0]` and `axes[0]` become channel 1.
    #[must_use]
    pub fn new(buttons: Vec<Key>, axes: Vec<AbsoluteAxisType>) -> Self {
        Self { buttons, axes }
    }

    /// Generic HID joystick numbering (twelve buttons, six axes).
    #[must_use]
    pub fn direct_input() -> Self {
        Self::new(
            vec![
                Key::BTN_TRIGGER,
                Key::BTN_THUMB,
                Key::BTN_THUMB2,
                Key::BTN_TOP,
                Key::BTN_TOP2,
                Key::BTN_PINKIE,
                Key::BTN_BASE,
                Key::BTN_BASE2,
                Key::BTN_BASE3,
                Key::BTN_BASE4,
                Key::BTN_BASE5,
                Key::BTN_BASE6,
            ],
            vec![
                AbsoluteAxisType::ABS_X,
                AbsoluteAxisType::ABS_Y,
                AbsoluteAxisType::ABS_Z,
                AbsoluteAxisType::ABS_RZ,
                AbsoluteAxisType::ABS_HAT0X,
                AbsoluteAxisType::ABS_HAT0Y,
            ],
        )
    }

    /// Number of mapped button channels.
    #[must_use]
    pub fn button_count(&self) -> usize {
        self.buttons.len()
    }

    /// Number of mapped axis channels.
    #[must_use]
    pub fn axis_count(&self) -> usize {
        self.axes.len()
    }

    /// Key code for a 1-based button channel.
    #[must_use]
    pub fn button(&self, channel: usize) -> Option<Key> {
        channel.checked_sub(1).and_then(|i| self.buttons.get(i)).copied()
    }

    /// Axis code for a 1-based axis channel.
    #[must_use]
    pub fn axis(&self, channel: usize) -> Option<AbsoluteAxisType> {
        channel.checked_sub(1).and_then(|i| self.axes.get(i)).copied()
    }

    /// Mapped keys absent from `supported`, in channel order.
    #[must_use]
    pub fn missing_buttons(&self, supported: &AttributeSetRef<Key>) -> Vec<Key> {
        self.buttons
            .iter()
            .copied()
            .filter(|&key| !supported.contains(key))
            .collect()
    }

    /// Mapped axes absent from `supported`, in channel order.
    #[must_use]
    pub fn missing_axes(
        &self,
        supported: &AttributeSetRef<AbsoluteAxisType>,
    ) -> Vec<AbsoluteAxisType> {
        self.axes
            .iter()
            .copied()
            .filter(|&axis| !supported.contains(axis))
            .collect()
    }

    /// Checks that a device reports every mapped key and axis.
    ///
    /// `None` stands for a device with no keys (or no axes) at all.
    ///
    /// # Errors
    ///
    /// Returns `Controller` naming the missing codes.
    pub fn check_coverage(
        &self,
        keys: Option<&AttributeSetRef<Key>>,
        axes: Option<&AttributeSetRef<AbsoluteAxisType>>,
    ) -> Result<()> {
        let missing_buttons =
            keys.map_or_else(|| self.buttons.clone(), |keys| self.missing_buttons(keys));
        let missing_axes = axes.map_or_else(|| self.axes.clone(), |axes| self.missing_axes(axes));

        if missing_buttons.is_empty() && missing_axes.is_empty() {
            return Ok(());
        }

        Err(PadPollError::Controller(format!(
            "device does not match channel map (missing keys {:?}, missing axes {:?})",
            missing_buttons, missing_axes
        )))
    }
}

/// Scales a raw evdev axis value from `minimum..=maximum` onto `-1.0..=1.0`.
///
/// Degenerate ranges (`maximum <= minimum`) read as 0.0.
#[must_use]
pub fn normalize_axis(value: i32, minimum: i32, maximum: i32) -> f64 {
    if maximum <= minimum {
        return 0.0;
    }

    let span = f64::from(maximum) - f64::from(minimum);
    let scaled = (f64::from(value) - f64::from(minimum)) / span * 2.0 - 1.0;
    scaled.clamp(-1.0, 1.0)
}

/// Joystick-class devices report one of these keys.
fn is_joystick_class(device: &Device) -> bool {
    device.supported_keys().map_or(false, |keys| {
        keys.contains(Key::BTN_TRIGGER) || keys.contains(Key::BTN_SOUTH)
    })
}

/// Picks the fresh reading when there is one, otherwise the last good one.
fn settle<T: Copy>(read: io::Result<T>, last: &Cell<T>) -> (T, Option<io::Error>) {
    match read {
        Ok(value) => {
            last.set(value);
            (value, None)
        }
        Err(e) => (last.get(), Some(e)),
    }
}

/// Tracks whether the device is currently failing reads.
#[derive(Debug, Default)]
struct FailureLatch {
    failing: Cell<bool>,
}

impl FailureLatch {
    /// Records a failed read; `true` only for the first one in a run.
    fn trip(&self) -> bool {
        !self.failing.replace(true)
    }

    /// Records a good read; `true` only when it ends a run of failures.
    fn reset(&self) -> bool {
        self.failing.replace(false)
    }
}

/// evdev-backed joystick.
///
/// Owns the device handle and a last-known value per mapped channel.
pub struct EvdevJoystick {
    device: Device,
    device_path: PathBuf,
    channels: ChannelMap,
    last_buttons: Vec<Cell<bool>>,
    last_axes: Vec<Cell<f64>>,
    read_failures: FailureLatch,
}

impl std::fmt::Debug for EvdevJoystick {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EvdevJoystick")
            .field("device_path", &self.device_path)
            .field("channels", &self.channels)
            .finish_non_exhaustive()
    }
}

impl EvdevJoystick {
    /// Opens the joystick-class device at `port` with the DirectInput channel map.
    ///
    /// # Errors
    ///
    /// - `Controller`: `/dev/input` is missing or unreadable
    /// - `ControllerNotFound`: fewer than `port + 1` joystick-class devices matching
    ///   the channel map could be opened
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use padpoll::controller::EvdevJoystick;
    ///
    /// let joystick = EvdevJoystick::open(0)?;
    /// println!("Polling {}", joystick.device_path().display());
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn open(port: u32) -> Result<Self> {
        Self::open_port_with_map(port, ChannelMap::direct_input())
    }

    /// Opens the joystick-class device at `port` with a custom channel map.
    ///
    /// # Errors
    ///
    /// See [`EvdevJoystick::open`].
    pub fn open_port_with_map(port: u32, channels: ChannelMap) -> Result<Self> {
        let input_dir = Path::new(INPUT_DIR);

        if !input_dir.exists() {
            return Err(PadPollError::Controller(format!(
                "{} directory not found",
                INPUT_DIR
            )));
        }

        let mut paths: Vec<PathBuf> = std::fs::read_dir(input_dir)
            .map_err(|e| PadPollError::Controller(format!("Failed to read {}: {}", INPUT_DIR, e)))?
            .filter_map(|entry| entry.ok().map(|entry| entry.path()))
            .filter(|path| {
                path.file_name()
                    .map_or(false, |name| name.to_string_lossy().starts_with("event"))
            })
            .collect();

        // Sort so port numbers are stable between runs
        paths.sort();

        let mut found = 0;
        for path in paths {
            let device = match Device::open(&path) {
                Ok(device) => device,
                Err(e) => {
                    debug!("Could not open {}: {}", path.display(), e);
                    continue;
                }
            };

            if !is_joystick_class(&device) {
                continue;
            }

            let coverage =
                channels.check_coverage(device.supported_keys(), device.supported_absolute_axes());
            if let Err(e) = coverage {
                debug!("Skipping {}: {}", path.display(), e);
                continue;
            }

            debug!(
                "Joystick-class device on port {}: {} ({})",
                found,
                path.display(),
                device.name().unwrap_or("unnamed")
            );

            if found == port {
                return Ok(Self::from_device(device, path, channels));
            }
            found += 1;
        }

        Err(PadPollError::ControllerNotFound { port })
    }

    /// Opens a specific device node with a custom channel map.
    ///
    /// # Errors
    ///
    /// - `Io`: the device cannot be opened
    /// - `Controller`: the device lacks keys or axes named by `channels`
    pub fn open_path<P: AsRef<Path>>(path: P, channels: ChannelMap) -> Result<Self> {
        let path = path.as_ref();
        let device = Device::open(path)?;
        channels
            .check_coverage(device.supported_keys(), device.supported_absolute_axes())
            .map_err(|e| PadPollError::Controller(format!("{}: {}", path.display(), e)))?;
        Ok(Self::from_device(device, path.to_path_buf(), channels))
    }

    fn from_device(device: Device, device_path: PathBuf, channels: ChannelMap) -> Self {
        info!(
            "Opened controller {} at {}",
            device.name().unwrap_or("unnamed"),
            device_path.display()
        );

        let last_buttons = (0..channels.button_count()).map(|_| Cell::new(false)).collect();
        let last_axes = (0..channels.axis_count()).map(|_| Cell::new(0.0)).collect();

        Self {
            device,
            device_path,
            channels,
            last_buttons,
            last_axes,
            read_failures: FailureLatch::default(),
        }
    }

    /// Logs the start and end of a run of failed reads.
    fn note_read(&self, what: &str, channel: usize, error: Option<io::Error>) {
        match error {
            Some(e) if self.read_failures.trip() => warn!(
                "Failed to read {} {} from {}: {} (reusing last known values)",
                what,
                channel,
                self.device_path.display(),
                e
            ),
            Some(_) => {}
            None if self.read_failures.reset() => {
                info!("Reads from {} recovered", self.device_path.display());
            }
            None => {}
        }
    }

    /// Path of the opened device node.
    #[must_use]
    pub fn device_path(&self) -> &Path {
        &self.device_path
    }

    /// Human-readable device name reported by the driver.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.device.name()
    }

    /// The channel map in use.
    #[must_use]
    pub fn channels(&self) -> &ChannelMap {
        &self.channels
    }
}

impl Joystick for EvdevJoystick {
    fn raw_button(&self, channel: usize) -> bool {
        let Some(key) = self.channels.button(channel) else {
            return false;
        };

        let read = self.device.get_key_state().map(|keys| keys.contains(key));
        let (level, error) = settle(read, &self.last_buttons[channel - 1]);
        self.note_read("button", channel, error);
        level
    }

    fn raw_axis(&self, channel: usize) -> f64 {
        let Some(axis) = self.channels.axis(channel) else {
            return 0.0;
        };

        let read = self.device.get_abs_state().map(|state| {
            let info = &state[usize::from(axis.0)];
            normalize_axis(info.value, info.minimum, info.maximum)
        });
        let (value, error) = settle(read, &self.last_axes[channel - 1]);
        self.note_read("axis", channel, error);
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use evdev::AttributeSet;

    #[test]
    fn test_direct_input_map_shape() {
        let map = ChannelMap::direct_input();
        assert_eq!(map.button_count(), 12);
        assert_eq!(map.axis_count(), 6);
        assert_eq!(map, ChannelMap::default());
    }

    #[test]
    fn test_channel_lookup_is_one_based() {
        let map = ChannelMap::direct_input();
        assert_eq!(map.button(1), Some(Key::BTN_TRIGGER));
        assert_eq!(map.button(12), Some(Key::BTN_BASE6));
        assert_eq!(map.axis(1), Some(AbsoluteAxisType::ABS_X));
        assert_eq!(map.axis(6), Some(AbsoluteAxisType::ABS_HAT0Y));
    }

    #[test]
    fn test_unmapped_channels() {
        let map = ChannelMap::direct_input();
        assert_eq!(map.button(0), None);
        assert_eq!(map.button(13), None);
        assert_eq!(map.axis(0), None);
        assert_eq!(map.axis(7), None);
    }

    #[test]
    fn test_custom_map() {
        let map = ChannelMap::new(vec![Key::BTN_SOUTH], vec![AbsoluteAxisType::ABS_RX]);
        assert_eq!(map.button(1), Some(Key::BTN_SOUTH));
        assert_eq!(map.axis(1), Some(AbsoluteAxisType::ABS_RX));
        assert_eq!(map.button(2), None);
    }

    #[test]
    fn test_normalize_byte_axis() {
        assert_eq!(normalize_axis(0, 0, 255), -1.0);
        assert_eq!(normalize_axis(255, 0, 255), 1.0);

        // 8-bit sticks have no exact center
        let center = normalize_axis(128, 0, 255);
        assert!(center.abs() < 0.01, "center was {}", center);
    }

    #[test]
    fn test_normalize_hat_axis_is_identity() {
        assert_eq!(normalize_axis(-1, -1, 1), -1.0);
        assert_eq!(normalize_axis(0, -1, 1), 0.0);
        assert_eq!(normalize_axis(1, -1, 1), 1.0);
    }

    #[test]
    fn test_normalize_signed_16_bit_axis() {
        assert_eq!(normalize_axis(-32768, -32768, 32767), -1.0);
        assert_eq!(normalize_axis(32767, -32768, 32767), 1.0);
    }

    #[test]
    fn test_normalize_clamps_out_of_range_values() {
        assert_eq!(normalize_axis(300, 0, 255), 1.0);
        assert_eq!(normalize_axis(-20, 0, 255), -1.0);
    }

    #[test]
    fn test_normalize_degenerate_range() {
        assert_eq!(normalize_axis(5, 10, 10), 0.0);
        assert_eq!(normalize_axis(5, 10, 0), 0.0);
    }

    // ==================== Coverage Tests ====================

    #[test]
    fn test_direct_input_map_fits_direct_input_pad() {
        let map = ChannelMap::direct_input();
        let keys: AttributeSet<Key> = map.buttons.iter().copied().collect();
        let axes: AttributeSet<AbsoluteAxisType> = map.axes.iter().copied().collect();

        assert!(map.missing_buttons(&keys).is_empty());
        assert!(map.missing_axes(&axes).is_empty());
        assert!(map.check_coverage(Some(&keys), Some(&axes)).is_ok());
    }

    #[test]
    fn test_direct_input_map_rejects_xinput_pad() {
        let map = ChannelMap::direct_input();
        let keys: AttributeSet<Key> = [
            Key::BTN_SOUTH,
            Key::BTN_EAST,
            Key::BTN_NORTH,
            Key::BTN_WEST,
            Key::BTN_TL,
            Key::BTN_TR,
            Key::BTN_SELECT,
            Key::BTN_START,
            Key::BTN_MODE,
            Key::BTN_THUMBL,
            Key::BTN_THUMBR,
        ]
        .into_iter()
        .collect();
        let axes: AttributeSet<AbsoluteAxisType> = [
            AbsoluteAxisType::ABS_X,
            AbsoluteAxisType::ABS_Y,
            AbsoluteAxisType::ABS_Z,
            AbsoluteAxisType::ABS_RX,
            AbsoluteAxisType::ABS_RY,
            AbsoluteAxisType::ABS_RZ,
            AbsoluteAxisType::ABS_HAT0X,
            AbsoluteAxisType::ABS_HAT0Y,
        ]
        .into_iter()
        .collect();

        assert_eq!(map.missing_buttons(&keys).len(), 12);
        assert!(map.missing_axes(&axes).is_empty());
        assert!(matches!(
            map.check_coverage(Some(&keys), Some(&axes)),
            Err(PadPollError::Controller(_))
        ));
    }

    #[test]
    fn test_missing_codes_reported_in_channel_order() {
        let map = ChannelMap::direct_input();
        let keys: AttributeSet<Key> = map.buttons[..10].iter().copied().collect();
        let axes: AttributeSet<AbsoluteAxisType> =
            [AbsoluteAxisType::ABS_X, AbsoluteAxisType::ABS_Y].into_iter().collect();

        assert_eq!(map.missing_buttons(&keys), vec![Key::BTN_BASE5, Key::BTN_BASE6]);
        assert_eq!(
            map.missing_axes(&axes),
            vec![
                AbsoluteAxisType::ABS_Z,
                AbsoluteAxisType::ABS_RZ,
                AbsoluteAxisType::ABS_HAT0X,
                AbsoluteAxisType::ABS_HAT0Y,
            ]
        );
    }

    #[test]
    fn test_device_without_keys_or_axes_does_not_fit() {
        let map = ChannelMap::direct_input();
        assert!(map.check_coverage(None, None).is_err());

        let empty = ChannelMap::new(Vec::new(), Vec::new());
        assert!(empty.check_coverage(None, None).is_ok());
    }

    // ==================== Read Fallback Tests ====================

    #[test]
    fn test_settle_keeps_fresh_reading() {
        let last = Cell::new(false);
        let (level, error) = settle(Ok(true), &last);

        assert!(level);
        assert!(error.is_none());
        assert!(last.get());
    }

    #[test]
    fn test_settle_falls_back_to_last_known() {
        let last = Cell::new(0.4);
        let (value, error) = settle(Err(io::Error::from(io::ErrorKind::NotFound)), &last);

        assert_eq!(value, 0.4);
        assert_eq!(error.map(|e| e.kind()), Some(io::ErrorKind::NotFound));
        assert_eq!(last.get(), 0.4);
    }

    #[test]
    fn test_settle_default_before_any_good_read() {
        let last = Cell::new(false);
        let (level, _) = settle(Err(io::Error::from(io::ErrorKind::BrokenPipe)), &last);
        assert!(!level);
    }

    #[test]
    fn test_failure_latch_reports_run_edges_once() {
        let latch = FailureLatch::default();

        // Good reads while healthy are not news
        assert!(!latch.reset());

        assert!(latch.trip());
        for _ in 0..12 {
            assert!(!latch.trip());
        }

        assert!(latch.reset());
        assert!(!latch.reset());
        assert!(latch.trip());
    }

    #[test]
    fn test_open_missing_path() {
        let result = EvdevJoystick::open_path("/nonexistent", ChannelMap::direct_input());
        assert!(matches!(result, Err(PadPollError::Io(_))));
    }

    // Integration test - only runs with real hardware
    #[test]
    #[ignore]
    fn test_open_with_real_hardware() {
        // This test requires a connected joystick or gamepad
        let joystick = EvdevJoystick::open(0).expect("No controller found");
        assert!(joystick.device_path().starts_with(INPUT_DIR));
        assert!(joystick.name().is_some());

        // Unmapped channels never touch the device
        assert!(!joystick.raw_button(0));
        assert_eq!(joystick.raw_axis(99), 0.0);

        let x = joystick.raw_axis(1);
        assert!((-1.0..=1.0).contains(&x));
    }
}
