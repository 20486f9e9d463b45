//! Vehicle state
//!
//! A vehicle is owned by exactly one road-grid cell or by the merge ring's
//! member list, never both. Movement hands the value off rather than copying
//! a reference.

use super::types::VehicleId;

/// A single vehicle on the corridor
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vehicle {
    pub id: VehicleId,
    /// Lane index, mutated by lane changes
    pub lane: usize,
    /// Cell index along the corridor
    pub pos: usize,
    /// Recomputed from scratch every tick, never carried across ticks
    pub braking: bool,
    /// Fixed at creation. Decides whether the vehicle targets the ring exit
    /// or rides through to the terminal.
    pub wants_exit: bool,
    /// True only while the ring owns this vehicle
    pub in_ring: bool,
    /// Ticks spent inside the ring. Meaningless outside it.
    pub ring_progress: u32,
}

impl Vehicle {
    pub fn new(id: VehicleId, lane: usize, pos: usize, wants_exit: bool) -> Self {
        Self {
            id,
            lane,
            pos,
            braking: false,
            wants_exit,
            in_ring: false,
            ring_progress: 0,
        }
    }
}
