//! Live simulation parameters
//!
//! Every knob the control layer exposes is an atomic read live by the tick,
//! so sliders can move while the simulation runs without taking the world
//! lock. Out-of-range values are clamped here, at the point of acceptance,
//! and never re-checked inside the tick logic.

use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, AtomicUsize, Ordering};

/// Default entry rate at the main entry, vehicles per minute
pub const DEF_ENTRY_MAIN: u32 = 30;
/// Default entry rate at the side entry, vehicles per minute
pub const DEF_ENTRY_SIDE: u32 = 20;
/// Default ring exit rate, vehicles per minute
pub const DEF_EXIT_RING: u32 = 12;
/// Default terminal exit rate, vehicles per minute
pub const DEF_EXIT_TERMINAL: u32 = 20;
/// Default minimum spacing between vehicles, in cells
pub const DEF_MIN_GAP: u32 = 2;
/// Default tick period in milliseconds
pub const DEF_TICK_MS: u64 = 80;
/// Default ring capacity, vehicles
pub const DEF_RING_CAPACITY: usize = 6;
/// Default ring drain rate, vehicles per minute
pub const DEF_RING_DRAIN: u32 = 10;
/// Default share of vehicles that want the ring exit, percent
pub const DEF_EXIT_SHARE_PCT: u32 = 35;

const MAX_GAP: u32 = 8;

/// Shared, live-mutable configuration.
///
/// All loads and stores are `Relaxed`; the tick reads each value at most a
/// few times per pass and nothing orders across fields.
#[derive(Debug)]
pub struct SimConfig {
    entry_rate_main: AtomicU32,
    entry_rate_side: AtomicU32,
    exit_rate_ring: AtomicU32,
    exit_rate_terminal: AtomicU32,
    min_gap: AtomicU32,
    tick_ms: AtomicU64,
    ring_capacity: AtomicUsize,
    ring_drain_rate: AtomicU32,
    exit_share_pct: AtomicU32,
    ring_enabled: AtomicBool,
    signals_enabled: AtomicBool,
}

impl SimConfig {
    pub fn new() -> Self {
        Self {
            entry_rate_main: AtomicU32::new(DEF_ENTRY_MAIN),
            entry_rate_side: AtomicU32::new(DEF_ENTRY_SIDE),
            exit_rate_ring: AtomicU32::new(DEF_EXIT_RING),
            exit_rate_terminal: AtomicU32::new(DEF_EXIT_TERMINAL),
            min_gap: AtomicU32::new(DEF_MIN_GAP),
            tick_ms: AtomicU64::new(DEF_TICK_MS),
            ring_capacity: AtomicUsize::new(DEF_RING_CAPACITY),
            ring_drain_rate: AtomicU32::new(DEF_RING_DRAIN),
            exit_share_pct: AtomicU32::new(DEF_EXIT_SHARE_PCT),
            ring_enabled: AtomicBool::new(true),
            signals_enabled: AtomicBool::new(true),
        }
    }

    /// Restore every parameter to its default value
    pub fn restore_defaults(&self) {
        self.entry_rate_main.store(DEF_ENTRY_MAIN, Ordering::Relaxed);
        self.entry_rate_side.store(DEF_ENTRY_SIDE, Ordering::Relaxed);
        self.exit_rate_ring.store(DEF_EXIT_RING, Ordering::Relaxed);
        self.exit_rate_terminal
            .store(DEF_EXIT_TERMINAL, Ordering::Relaxed);
        self.min_gap.store(DEF_MIN_GAP, Ordering::Relaxed);
        self.tick_ms.store(DEF_TICK_MS, Ordering::Relaxed);
        self.ring_capacity.store(DEF_RING_CAPACITY, Ordering::Relaxed);
        self.ring_drain_rate.store(DEF_RING_DRAIN, Ordering::Relaxed);
        self.exit_share_pct
            .store(DEF_EXIT_SHARE_PCT, Ordering::Relaxed);
        self.ring_enabled.store(true, Ordering::Relaxed);
        self.signals_enabled.store(true, Ordering::Relaxed);
    }

    pub fn entry_rate_main(&self) -> u32 {
        self.entry_rate_main.load(Ordering::Relaxed)
    }

    pub fn set_entry_rate_main(&self, per_min: u32) {
        self.entry_rate_main.store(per_min, Ordering::Relaxed);
    }

    pub fn entry_rate_side(&self) -> u32 {
        self.entry_rate_side.load(Ordering::Relaxed)
    }

    pub fn set_entry_rate_side(&self, per_min: u32) {
        self.entry_rate_side.store(per_min, Ordering::Relaxed);
    }

    pub fn exit_rate_ring(&self) -> u32 {
        self.exit_rate_ring.load(Ordering::Relaxed)
    }

    pub fn set_exit_rate_ring(&self, per_min: u32) {
        self.exit_rate_ring.store(per_min, Ordering::Relaxed);
    }

    pub fn exit_rate_terminal(&self) -> u32 {
        self.exit_rate_terminal.load(Ordering::Relaxed)
    }

    pub fn set_exit_rate_terminal(&self, per_min: u32) {
        self.exit_rate_terminal.store(per_min, Ordering::Relaxed);
    }

    pub fn min_gap(&self) -> usize {
        self.min_gap.load(Ordering::Relaxed) as usize
    }

    /// Minimum spacing in cells, clamped to `1..=8`
    pub fn set_min_gap(&self, cells: u32) {
        self.min_gap.store(cells.clamp(1, MAX_GAP), Ordering::Relaxed);
    }

    pub fn tick_ms(&self) -> u64 {
        self.tick_ms.load(Ordering::Relaxed)
    }

    /// Tick period, clamped to at least one millisecond
    pub fn set_tick_ms(&self, ms: u64) {
        self.tick_ms.store(ms.max(1), Ordering::Relaxed);
    }

    pub fn ring_capacity(&self) -> usize {
        self.ring_capacity.load(Ordering::Relaxed)
    }

    /// Ring capacity, clamped to at least one slot
    pub fn set_ring_capacity(&self, vehicles: usize) {
        self.ring_capacity.store(vehicles.max(1), Ordering::Relaxed);
    }

    pub fn ring_drain_rate(&self) -> u32 {
        self.ring_drain_rate.load(Ordering::Relaxed)
    }

    pub fn set_ring_drain_rate(&self, per_min: u32) {
        self.ring_drain_rate.store(per_min, Ordering::Relaxed);
    }

    pub fn exit_share_pct(&self) -> u32 {
        self.exit_share_pct.load(Ordering::Relaxed)
    }

    /// Share of vehicles that want the ring exit, clamped to `0..=100`
    pub fn set_exit_share_pct(&self, pct: u32) {
        self.exit_share_pct.store(pct.min(100), Ordering::Relaxed);
    }

    pub fn ring_enabled(&self) -> bool {
        self.ring_enabled.load(Ordering::Relaxed)
    }

    pub fn set_ring_enabled(&self, enabled: bool) {
        self.ring_enabled.store(enabled, Ordering::Relaxed);
    }

    pub fn signals_enabled(&self) -> bool {
        self.signals_enabled.load(Ordering::Relaxed)
    }

    pub fn set_signals_enabled(&self, enabled: bool) {
        self.signals_enabled.store(enabled, Ordering::Relaxed);
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        Self::new()
    }
}
