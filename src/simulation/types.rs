//! Core types and road geometry for the corridor simulation
//!
//! These are standalone types that don't depend on any UI layer.

/// A unique identifier for a vehicle
/// This is a simple wrapper around a u64 for type safety
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VehicleId(pub u64);

impl VehicleId {
    /// Hue in `[0, 1)` used by renderers to color this vehicle.
    /// Derived from the id so it is stable for the vehicle's lifetime.
    pub fn hue(&self) -> f32 {
        (self.0 as f32 * 0.071).fract()
    }
}

/// Length of the corridor in cells
pub const ROAD_LEN: usize = 160;

/// Number of parallel lanes
pub const LANES: usize = 3;

/// Cell index of the main (upstream) entry point
pub const ENTRY_MAIN: usize = 0;

/// Cell index of the side (midway) entry point
pub const ENTRY_SIDE: usize = 45;

/// Cell index of the ring exit. Vehicles that want this exit must pass
/// through the capacity-bounded merge ring when it is enabled.
pub const RING_EXIT: usize = 110;

/// Cell index at which the terminal exit begins consuming vehicles
pub const TERMINAL_EXIT: usize = 155;

/// How many cells before the ring exit a vehicle may start merging
pub const MERGE_WINDOW: usize = 3;

/// How many cells ahead of a red signal vehicles start braking
pub const SIGNAL_LOOKAHEAD: usize = 4;

/// Cells per density segment
pub const SEG_SIZE: usize = 8;

/// Number of density segments covering the corridor
pub const SEG_COUNT: usize = ROAD_LEN / SEG_SIZE + 1;

/// Real-world length the corridor stands for, used in diagnostic labels
pub const CORRIDOR_KM: usize = 70;

/// The two entry points, in queue-drain order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryPoint {
    Main,
    Side,
}

impl EntryPoint {
    /// Cell index where vehicles from this entry are placed
    pub fn position(&self) -> usize {
        match self {
            EntryPoint::Main => ENTRY_MAIN,
            EntryPoint::Side => ENTRY_SIDE,
        }
    }
}

/// The two exit points
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitPoint {
    /// The ring exit, fed either by the merge ring or directly when the
    /// ring is disabled
    Ring,
    /// The end of the corridor
    Terminal,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hue_is_stable_and_in_range() {
        let id = VehicleId(42);
        assert_eq!(id.hue(), id.hue());
        assert!(id.hue() >= 0.0 && id.hue() < 1.0);
    }

    #[test]
    fn segments_cover_the_whole_road() {
        assert!(SEG_COUNT * SEG_SIZE >= ROAD_LEN);
    }
}
