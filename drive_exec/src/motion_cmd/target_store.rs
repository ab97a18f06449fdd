//! Shared store of the latest wheel targets

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{debug, info};
use std::sync::atomic::{AtomicBool, Ordering};

// Internal
use super::decode;
use crate::atomic::AtomicF32;
use comms_if::{
    eqpt::{WheelId, NUM_WHEELS},
    tc::MotionCommand,
};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Latest velocity targets and motor driver enable state.
///
/// Written only by the command source, read by every wheel loop. Each wheel's target is an
/// independent atomic cell, so a loop always sees either the old or the new value for its own
/// wheel. Wheels may briefly observe targets from different commands.
#[derive(Debug)]
pub struct TargetStore {
    targets: [AtomicF32; NUM_WHEELS],
    drive_enabled: AtomicBool,
    base_speed_rpm: f32,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl TargetStore {
    /// Create a store with zero targets and the drivers disabled.
    pub fn new(base_speed_rpm: f32) -> Self {
        Self {
            targets: Default::default(),
            drive_enabled: AtomicBool::new(false),
            base_speed_rpm,
        }
    }

    /// Apply a decoded motion command.
    pub fn on_command(&self, cmd: MotionCommand) {
        let targets = decode(cmd, self.base_speed_rpm);

        for (cell, target) in self.targets.iter().zip(targets.iter()) {
            cell.store(*target, Ordering::Release);
        }

        if let Some(enable) = cmd.drive_enable() {
            let was = self.drive_enabled.swap(enable, Ordering::AcqRel);
            if was != enable {
                info!("Motor drivers {}", if enable { "enabled" } else { "disabled" });
            }
        }

        debug!("Applied motion command {}: targets {:?}", cmd, targets);
    }

    /// Apply a numeric command code.
    pub fn on_code(&self, code: i32) {
        self.on_command(MotionCommand::from_code(code));
    }

    /// Apply a frame received over the radio link.
    ///
    /// Only the first byte is meaningful. Empty frames and frames starting with NUL carry no
    /// command and are ignored.
    pub fn on_radio_frame(&self, frame: &[u8]) {
        match frame.first() {
            Some(&b) if b != 0 => self.on_command(MotionCommand::from_radio_byte(b)),
            _ => (),
        }
    }

    /// Target for a single wheel.
    ///
    /// Units: RPM
    pub fn target(&self, id: WheelId) -> f32 {
        self.targets[id.index()].load(Ordering::Acquire)
    }

    /// All targets in `WheelId` index order.
    pub fn targets(&self) -> [f32; NUM_WHEELS] {
        let mut out = [0.0; NUM_WHEELS];
        for (o, cell) in out.iter_mut().zip(self.targets.iter()) {
            *o = cell.load(Ordering::Acquire);
        }
        out
    }

    pub fn drive_enabled(&self) -> bool {
        self.drive_enabled.load(Ordering::Acquire)
    }

    pub fn base_speed_rpm(&self) -> f32 {
        self.base_speed_rpm
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_initial_state() {
        let store = TargetStore::new(15.0);
        assert_eq!(store.targets(), [0.0; NUM_WHEELS]);
        assert!(!store.drive_enabled());
    }

    #[test]
    fn test_commands_and_enable() {
        let store = TargetStore::new(15.0);

        store.on_command(MotionCommand::Left);
        assert_eq!(store.targets(), [15.0, -15.0, 15.0, -15.0]);
        assert_eq!(store.target(WheelId::B), -15.0);
        assert!(store.drive_enabled());

        // Idle zeroes the targets but leaves the drivers enabled
        store.on_command(MotionCommand::Idle);
        assert_eq!(store.targets(), [0.0; NUM_WHEELS]);
        assert!(store.drive_enabled());

        store.on_code(1);
        assert_eq!(store.targets(), [15.0; NUM_WHEELS]);

        store.on_command(MotionCommand::Stop);
        assert_eq!(store.targets(), [0.0; NUM_WHEELS]);
        assert!(!store.drive_enabled());

        // Unknown codes leave the drivers alone
        store.on_code(7);
        assert!(!store.drive_enabled());
    }

    #[test]
    fn test_radio_frames() {
        let store = TargetStore::new(15.0);

        store.on_radio_frame(b"2");
        assert_eq!(store.targets(), [-15.0; NUM_WHEELS]);

        // Ignored frames
        store.on_radio_frame(b"");
        store.on_radio_frame(&[0u8, b'1']);
        assert_eq!(store.targets(), [-15.0; NUM_WHEELS]);

        // Trailing bytes are ignored
        store.on_radio_frame(b"8xyz");
        assert_eq!(store.targets(), [-15.0, 15.0, -15.0, 15.0]);
    }
}
