//! The read-only data contract between the simulation and its consumers
//!
//! A snapshot is taken once per tick under the world lock, so renderers and
//! diagnostics panels never observe a partially-updated grid. Everything in
//! here is plain data; cloning it is cheap relative to a tick.

use super::diagnostics::Diagnosis;
use super::types::{
    ENTRY_MAIN, ENTRY_SIDE, LANES, RING_EXIT, ROAD_LEN, TERMINAL_EXIT,
};

/// One vehicle as seen by a renderer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VehicleView {
    pub id: u64,
    pub lane: usize,
    pub pos: usize,
    pub braking: bool,
    pub wants_exit: bool,
    /// Stable color seed in `[0, 1)`
    pub hue: f32,
}

/// One ring member as seen by a renderer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RingMemberView {
    pub id: u64,
    pub progress: u32,
}

/// The merge ring's membership and capacity
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RingView {
    pub members: Vec<RingMemberView>,
    pub capacity: usize,
}

/// One signal's position and state
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignalView {
    pub name: &'static str,
    pub position: usize,
    pub red: bool,
}

/// Pending length and high-water mark for one entry queue
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct QueueView {
    pub length: usize,
    pub high_water: usize,
}

/// Complete read-only state published after every tick
#[derive(Debug, Clone, PartialEq)]
pub struct SimSnapshot {
    /// Simulation clock in milliseconds since start or last reset
    pub clock_ms: u64,
    /// Every vehicle on the grid
    pub vehicles: Vec<VehicleView>,
    pub queue_main: QueueView,
    pub queue_side: QueueView,
    pub ring: RingView,
    pub signals: Vec<SignalView>,
    /// Occupancy ratio per road segment, `0..=1`
    pub seg_density: Vec<f64>,
    /// Total-vehicle-count samples, oldest first
    pub history: Vec<f64>,
    pub entered_main: u64,
    pub entered_side: u64,
    pub exited_ring: u64,
    pub exited_terminal: u64,
    /// Vehicles on the grid plus ring members
    pub vehicles_on_road: usize,
    pub diagnosis: Diagnosis,
}

impl SimSnapshot {
    /// Print a one-screen summary of the simulation state
    pub fn print_summary(&self) {
        println!("=== Corridor Simulation Summary ===");
        println!(
            "Clock: {:02}:{:02}",
            self.clock_ms / 60_000,
            self.clock_ms % 60_000 / 1000
        );
        println!(
            "On road: {} ({} in the ring, capacity {})",
            self.vehicles_on_road,
            self.ring.members.len(),
            self.ring.capacity
        );
        println!(
            "Queues: main={} (peak {}), side={} (peak {})",
            self.queue_main.length,
            self.queue_main.high_water,
            self.queue_side.length,
            self.queue_side.high_water
        );
        println!(
            "Entered: main={} side={}  Exited: ring={} terminal={}",
            self.entered_main, self.entered_side, self.exited_ring, self.exited_terminal
        );
        for signal in &self.signals {
            println!(
                "Signal {} @ {}: {}",
                signal.name,
                signal.position,
                if signal.red { "RED" } else { "green" }
            );
        }
        println!("Diagnosis: {}", self.diagnosis.message());
    }

    /// Draw the corridor as ASCII art, one row per lane
    pub fn draw_road(&self) {
        let mut rows = vec![vec!['.'; ROAD_LEN]; LANES];
        for vehicle in &self.vehicles {
            rows[vehicle.lane][vehicle.pos] = if vehicle.braking { '!' } else { 'o' };
        }

        // Landmark ruler above the lanes
        let mut ruler = vec![' '; ROAD_LEN];
        ruler[ENTRY_MAIN] = 'E';
        ruler[ENTRY_SIDE] = 'e';
        ruler[RING_EXIT] = 'X';
        ruler[TERMINAL_EXIT] = 'T';
        for signal in &self.signals {
            if signal.position < ROAD_LEN {
                ruler[signal.position] = if signal.red { 'R' } else { 'G' };
            }
        }

        println!("=== Road Map ===");
        println!("Legend: E/e=entries, X=ring exit, T=terminal, R/G=signal, o=car, !=braking");
        println!("{}", ruler.iter().collect::<String>());
        for row in &rows {
            println!("{}", row.iter().collect::<String>());
        }
        println!(
            "ring: {}/{} inside",
            self.ring.members.len(),
            self.ring.capacity
        );
    }
}
