//! Main simulation world that ties everything together
//!
//! One `SimWorld` owns the whole mutable state of the corridor: the grid,
//! the merge ring, the exit limiters, the signals and the metrics. The tick
//! is the unit of atomicity; callers drive it under a lock and publish the
//! resulting snapshot. Only the entry queues are shared with the outside,
//! which is why they hang off `Arc`s.

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::Rng;
use rand::SeedableRng;

use super::config::SimConfig;
use super::diagnostics::{self, Diagnosis, DiagnosticInputs};
use super::entry_queue::{EntryQueue, VehicleIdGen};
use super::grid::RoadGrid;
use super::metrics::MetricsCollector;
use super::movement::{self, MovementParams};
use super::rate_limiter::TokenBucket;
use super::roundabout::Roundabout;
use super::signal::SignalController;
use super::snapshot::{
    QueueView, RingMemberView, RingView, SignalView, SimSnapshot, VehicleView,
};
use super::types::{EntryPoint, ExitPoint, VehicleId, ENTRY_SIDE, LANES, RING_EXIT, ROAD_LEN};
use super::vehicle::Vehicle;

/// The main simulation world
pub struct SimWorld {
    config: Arc<SimConfig>,

    grid: RoadGrid,
    ring: Roundabout,

    queue_main: Arc<EntryQueue>,
    queue_side: Arc<EntryQueue>,
    ids: Arc<VehicleIdGen>,

    /// Consumes vehicles at the end of the corridor
    terminal_limiter: TokenBucket,
    /// Consumes ring-exit vehicles directly while the ring is disabled
    ring_limiter: TokenBucket,
    /// Drains the ring itself
    ring_drain: TokenBucket,

    signals: Vec<SignalController>,
    metrics: MetricsCollector,
    diagnosis: Diagnosis,

    /// Milliseconds of simulated time since start or last reset
    clock_ms: u64,

    /// Optional seeded RNG for reproducible runs
    rng: Option<StdRng>,
}

impl SimWorld {
    fn new_internal(config: Arc<SimConfig>, rng: Option<StdRng>) -> Self {
        let capacity = config.ring_capacity();
        Self {
            grid: RoadGrid::new(LANES, ROAD_LEN),
            ring: Roundabout::new(capacity),
            queue_main: Arc::new(EntryQueue::new()),
            queue_side: Arc::new(EntryQueue::new()),
            ids: Arc::new(VehicleIdGen::new()),
            terminal_limiter: TokenBucket::new(config.exit_rate_terminal() as f64),
            ring_limiter: TokenBucket::new(config.exit_rate_ring() as f64),
            ring_drain: TokenBucket::new(config.ring_drain_rate() as f64),
            signals: Self::default_signals(),
            metrics: MetricsCollector::new(),
            diagnosis: Diagnosis::initial(),
            clock_ms: 0,
            rng,
            config,
        }
    }

    pub fn new(config: Arc<SimConfig>) -> Self {
        Self::new_internal(config, None)
    }

    /// Create a world with a seeded RNG so the exit-intent draws, and with
    /// them whole runs given identical arrivals, are reproducible
    pub fn new_with_seed(config: Arc<SimConfig>, seed: u64) -> Self {
        Self::new_internal(config, Some(StdRng::seed_from_u64(seed)))
    }

    /// The two fixed signals: one guarding the ring approach and one just
    /// past the side entry
    fn default_signals() -> Vec<SignalController> {
        vec![
            SignalController::new(RING_EXIT - 5, "ring approach", 5000, 3500),
            SignalController::new(ENTRY_SIDE + 3, "side entry", 6000, 2500),
        ]
    }

    /// Get a percentage draw in `[0, 100)`, using the seeded RNG if there is
    /// one
    fn draw_percent(rng: &mut Option<StdRng>) -> f64 {
        match rng {
            Some(rng) => rng.random_range(0.0..100.0),
            None => rand::rng().random_range(0.0..100.0),
        }
    }

    /// Advance the whole world by one tick of `dt_ms` simulated
    /// milliseconds. Callers serialize ticks; everything in here assumes
    /// exclusive access.
    pub fn tick(&mut self, dt_ms: u64) {
        self.clock_ms += dt_ms;

        // Configuration is read live, once per tick
        let gap = self.config.min_gap();
        let ring_enabled = self.config.ring_enabled();
        let signals_enabled = self.config.signals_enabled();

        self.terminal_limiter
            .set_rate(self.config.exit_rate_terminal() as f64);
        self.ring_limiter.set_rate(self.config.exit_rate_ring() as f64);
        self.ring_drain.set_rate(self.config.ring_drain_rate() as f64);
        self.terminal_limiter.tick(dt_ms);
        self.ring_limiter.tick(dt_ms);
        self.ring_drain.tick(dt_ms);

        self.ring.set_capacity(self.config.ring_capacity());

        if signals_enabled {
            for signal in &mut self.signals {
                signal.update(self.clock_ms);
            }
        }

        self.admit_from_queues(gap);

        let tally = movement::advance_all(
            &mut self.grid,
            &mut self.ring,
            &mut self.terminal_limiter,
            &mut self.ring_limiter,
            &self.signals,
            MovementParams {
                gap,
                ring_enabled,
                signals_enabled,
            },
        );
        self.metrics
            .record_exits(ExitPoint::Terminal, tally.terminal_exits);
        self.metrics
            .record_exits(ExitPoint::Ring, tally.ring_direct_exits);

        if ring_enabled {
            let drained = self.ring.advance(&mut self.ring_drain);
            self.metrics.record_exits(ExitPoint::Ring, drained);
        }

        self.metrics
            .recompute(&self.grid, &self.ring, self.clock_ms);
        self.metrics
            .observe_queue_lengths(self.queue_main.len(), self.queue_side.len());

        self.diagnosis = diagnostics::classify(DiagnosticInputs {
            seg_density: self.metrics.seg_density(),
            vehicles_on_road: self.metrics.vehicles_on_road(),
            entry_rate_total: self.config.entry_rate_main() + self.config.entry_rate_side(),
            exit_rate_terminal: self.config.exit_rate_terminal(),
            exit_rate_ring: self.config.exit_rate_ring(),
            ring_drain_rate: self.config.ring_drain_rate(),
            ring_enabled,
            ring_capacity: self.config.ring_capacity(),
        });
    }

    /// Pull at most one pending vehicle per entry point onto the grid,
    /// trying lanes in a fixed order. A pending id stays queued, peeked but
    /// not popped, until a cell is actually granted.
    fn admit_from_queues(&mut self, gap: usize) {
        let exit_share = self.config.exit_share_pct() as f64;
        for entry in [EntryPoint::Main, EntryPoint::Side] {
            let queue = match entry {
                EntryPoint::Main => Arc::clone(&self.queue_main),
                EntryPoint::Side => Arc::clone(&self.queue_side),
            };
            let Some(pending) = queue.peek() else {
                continue;
            };
            let pos = entry.position();
            for lane in 0..self.grid.lanes() {
                let rng = &mut self.rng;
                let queue = &queue;
                let placed = self.grid.try_place(lane, pos, gap, || {
                    let _ = queue.pop();
                    let wants_exit = Self::draw_percent(rng) < exit_share;
                    Vehicle::new(VehicleId(pending), lane, pos, wants_exit)
                });
                if placed {
                    self.metrics.record_entry(entry);
                    break;
                }
            }
        }
    }

    /// Clear the road, the ring, the queues, every counter and the history,
    /// and restart the clock. Configuration and accumulated limiter tokens
    /// survive, as does the id sequence.
    pub fn reset(&mut self) {
        self.grid.clear_all();
        self.ring.clear();
        self.queue_main.clear();
        self.queue_side.clear();
        self.metrics.reset();
        self.clock_ms = 0;
        for signal in &mut self.signals {
            signal.reset_clock();
        }
        self.diagnosis = Diagnosis::initial();
    }

    /// Build the read-only view published to renderers and panels
    pub fn snapshot(&self) -> SimSnapshot {
        SimSnapshot {
            clock_ms: self.clock_ms,
            vehicles: self
                .grid
                .iter_vehicles()
                .map(|(lane, pos, vehicle)| VehicleView {
                    id: vehicle.id.0,
                    lane,
                    pos,
                    braking: vehicle.braking,
                    wants_exit: vehicle.wants_exit,
                    hue: vehicle.id.hue(),
                })
                .collect(),
            queue_main: QueueView {
                length: self.queue_main.len(),
                high_water: self.metrics.queue_high_water(EntryPoint::Main),
            },
            queue_side: QueueView {
                length: self.queue_side.len(),
                high_water: self.metrics.queue_high_water(EntryPoint::Side),
            },
            ring: RingView {
                members: self
                    .ring
                    .members()
                    .iter()
                    .map(|member| RingMemberView {
                        id: member.id.0,
                        progress: member.ring_progress,
                    })
                    .collect(),
                capacity: self.ring.capacity(),
            },
            signals: self
                .signals
                .iter()
                .map(|signal| SignalView {
                    name: signal.name(),
                    position: signal.position(),
                    red: signal.is_red(),
                })
                .collect(),
            seg_density: self.metrics.seg_density().to_vec(),
            history: self.metrics.history().ordered(),
            entered_main: self.metrics.entered(EntryPoint::Main),
            entered_side: self.metrics.entered(EntryPoint::Side),
            exited_ring: self.metrics.exited(ExitPoint::Ring),
            exited_terminal: self.metrics.exited(ExitPoint::Terminal),
            vehicles_on_road: self.metrics.vehicles_on_road(),
            diagnosis: self.diagnosis,
        }
    }

    pub fn config(&self) -> &Arc<SimConfig> {
        &self.config
    }

    /// The shared queue for one entry point, for arrival producers
    pub fn queue(&self, entry: EntryPoint) -> &Arc<EntryQueue> {
        match entry {
            EntryPoint::Main => &self.queue_main,
            EntryPoint::Side => &self.queue_side,
        }
    }

    /// The shared vehicle id source, for arrival producers
    pub fn id_gen(&self) -> &Arc<VehicleIdGen> {
        &self.ids
    }

    pub fn clock_ms(&self) -> u64 {
        self.clock_ms
    }
}
