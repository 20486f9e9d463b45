//! Standalone corridor traffic simulation
//!
//! This module contains the whole simulation core: the road grid, vehicle
//! movement, the bounded merge ring, the exit rate limiters, signals,
//! metrics and the bottleneck diagnosis. It runs headless and can be tested
//! without any UI; renderers consume [`SimSnapshot`]s.

mod config;
mod diagnostics;
mod driver;
mod entry_queue;
mod grid;
mod metrics;
mod movement;
mod rate_limiter;
mod roundabout;
mod signal;
mod snapshot;
mod types;
mod vehicle;
mod world;

// Re-export public types for external use
// These may not be used within this crate but are part of the public API
#[allow(unused_imports)]
pub use config::{
    SimConfig, DEF_ENTRY_MAIN, DEF_ENTRY_SIDE, DEF_EXIT_RING, DEF_EXIT_SHARE_PCT,
    DEF_EXIT_TERMINAL, DEF_MIN_GAP, DEF_RING_CAPACITY, DEF_RING_DRAIN, DEF_TICK_MS,
};
#[allow(unused_imports)]
pub use diagnostics::{
    classify, BottleneckZone, Diagnosis, DiagnosticInputs, Severity, TrafficCondition,
    BOTTLENECK_THRESHOLD, DEMAND_WARNING_FACTOR, LIGHT_TRAFFIC_MAX,
};
#[allow(unused_imports)]
pub use driver::{SimDriver, ARRIVAL_POLL_MS};
#[allow(unused_imports)]
pub use entry_queue::{EntryQueue, VehicleIdGen};
#[allow(unused_imports)]
pub use grid::RoadGrid;
#[allow(unused_imports)]
pub use metrics::{HistoryRing, MetricsCollector, HISTORY_LEN, HISTORY_SAMPLE_MS};
#[allow(unused_imports)]
pub use rate_limiter::{TokenBucket, TOKEN_CEILING};
#[allow(unused_imports)]
pub use roundabout::{Roundabout, RING_MAX_DWELL, RING_MIN_DWELL};
#[allow(unused_imports)]
pub use signal::SignalController;
#[allow(unused_imports)]
pub use snapshot::{QueueView, RingMemberView, RingView, SignalView, SimSnapshot, VehicleView};
#[allow(unused_imports)]
pub use types::{
    EntryPoint, ExitPoint, VehicleId, CORRIDOR_KM, ENTRY_MAIN, ENTRY_SIDE, LANES, MERGE_WINDOW,
    RING_EXIT, ROAD_LEN, SEG_COUNT, SEG_SIZE, SIGNAL_LOOKAHEAD, TERMINAL_EXIT,
};
#[allow(unused_imports)]
pub use vehicle::Vehicle;
pub use world::SimWorld;
