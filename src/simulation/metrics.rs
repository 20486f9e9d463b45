//! Derived metrics: segment densities, history and counters
//!
//! Everything here is recomputed from or appended to by the tick; nothing is
//! mutated from outside it.

use super::grid::RoadGrid;
use super::roundabout::Roundabout;
use super::types::{EntryPoint, ExitPoint, LANES, RING_EXIT, SEG_COUNT, SEG_SIZE};

/// Number of samples the history ring keeps
pub const HISTORY_LEN: usize = 200;

/// How often a history sample is taken, in elapsed simulation time.
/// Time-based rather than tick-based so the chart reflects real elapsed
/// time even when the tick period changes.
pub const HISTORY_SAMPLE_MS: u64 = 600;

/// Fixed-capacity ring buffer of vehicle-count samples
#[derive(Debug, Clone, Default)]
pub struct HistoryRing {
    samples: Vec<f64>,
    head: usize,
}

impl HistoryRing {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, sample: f64) {
        if self.samples.len() < HISTORY_LEN {
            self.samples.push(sample);
        } else {
            self.samples[self.head] = sample;
            self.head = (self.head + 1) % HISTORY_LEN;
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Samples in chronological order, oldest first
    pub fn ordered(&self) -> Vec<f64> {
        let mut out = Vec::with_capacity(self.samples.len());
        out.extend_from_slice(&self.samples[self.head..]);
        out.extend_from_slice(&self.samples[..self.head]);
        out
    }

    pub fn clear(&mut self) {
        self.samples.clear();
        self.head = 0;
    }
}

/// Per-tick derived state plus monotonic counters
#[derive(Debug, Clone)]
pub struct MetricsCollector {
    seg_density: [f64; SEG_COUNT],
    history: HistoryRing,
    vehicles_on_road: usize,
    entered_main: u64,
    entered_side: u64,
    exited_ring: u64,
    exited_terminal: u64,
    queue_high_water_main: usize,
    queue_high_water_side: usize,
    last_sample_ms: u64,
}

impl MetricsCollector {
    pub fn new() -> Self {
        Self {
            seg_density: [0.0; SEG_COUNT],
            history: HistoryRing::new(),
            vehicles_on_road: 0,
            entered_main: 0,
            entered_side: 0,
            exited_ring: 0,
            exited_terminal: 0,
            queue_high_water_main: 0,
            queue_high_water_side: 0,
            last_sample_ms: 0,
        }
    }

    /// Recompute per-segment occupancy and the total vehicle count, and take
    /// a history sample when the cadence is due.
    ///
    /// Ring members are attributed to the segment containing the merge
    /// point, so a saturated ring shows up in the density chart.
    pub fn recompute(&mut self, grid: &RoadGrid, ring: &Roundabout, now_ms: u64) {
        let mut counts = [0usize; SEG_COUNT];
        let mut total = 0usize;
        for (_, pos, _) in grid.iter_vehicles() {
            counts[pos / SEG_SIZE] += 1;
            total += 1;
        }
        counts[RING_EXIT / SEG_SIZE] += ring.len();
        total += ring.len();

        let segment_capacity = (SEG_SIZE * LANES) as f64;
        for (density, count) in self.seg_density.iter_mut().zip(counts) {
            *density = count as f64 / segment_capacity;
        }
        self.vehicles_on_road = total;

        if now_ms.saturating_sub(self.last_sample_ms) >= HISTORY_SAMPLE_MS {
            self.history.push(total as f64);
            self.last_sample_ms = now_ms;
        }
    }

    pub fn record_entry(&mut self, entry: EntryPoint) {
        match entry {
            EntryPoint::Main => self.entered_main += 1,
            EntryPoint::Side => self.entered_side += 1,
        }
    }

    pub fn record_exits(&mut self, exit: ExitPoint, count: u64) {
        match exit {
            ExitPoint::Ring => self.exited_ring += count,
            ExitPoint::Terminal => self.exited_terminal += count,
        }
    }

    /// Update the running queue-length high-water marks
    pub fn observe_queue_lengths(&mut self, main: usize, side: usize) {
        self.queue_high_water_main = self.queue_high_water_main.max(main);
        self.queue_high_water_side = self.queue_high_water_side.max(side);
    }

    pub fn seg_density(&self) -> &[f64] {
        &self.seg_density
    }

    pub fn history(&self) -> &HistoryRing {
        &self.history
    }

    pub fn vehicles_on_road(&self) -> usize {
        self.vehicles_on_road
    }

    pub fn entered(&self, entry: EntryPoint) -> u64 {
        match entry {
            EntryPoint::Main => self.entered_main,
            EntryPoint::Side => self.entered_side,
        }
    }

    pub fn exited(&self, exit: ExitPoint) -> u64 {
        match exit {
            ExitPoint::Ring => self.exited_ring,
            ExitPoint::Terminal => self.exited_terminal,
        }
    }

    pub fn queue_high_water(&self, entry: EntryPoint) -> usize {
        match entry {
            EntryPoint::Main => self.queue_high_water_main,
            EntryPoint::Side => self.queue_high_water_side,
        }
    }

    /// Zero every counter, density and the history, and restart the
    /// sampling cadence
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::types::{VehicleId, ROAD_LEN};
    use crate::simulation::vehicle::Vehicle;

    #[test]
    fn history_ring_wraps_and_stays_ordered() {
        let mut history = HistoryRing::new();
        for i in 0..HISTORY_LEN + 10 {
            history.push(i as f64);
        }
        assert_eq!(history.len(), HISTORY_LEN);
        let ordered = history.ordered();
        assert_eq!(ordered[0], 10.0);
        assert_eq!(*ordered.last().unwrap(), (HISTORY_LEN + 9) as f64);
    }

    #[test]
    fn density_counts_ring_members_at_the_merge_segment() {
        let grid = RoadGrid::new(LANES, ROAD_LEN);
        let mut ring = Roundabout::new(6);
        for id in 1..=3 {
            assert!(ring.try_enter(Vehicle::new(VehicleId(id), 0, RING_EXIT, true)));
        }

        let mut metrics = MetricsCollector::new();
        metrics.recompute(&grid, &ring, 0);

        let merge_segment = RING_EXIT / SEG_SIZE;
        let expected = 3.0 / (SEG_SIZE * LANES) as f64;
        assert!((metrics.seg_density()[merge_segment] - expected).abs() < 1e-9);
        assert_eq!(metrics.vehicles_on_road(), 3);
    }

    #[test]
    fn sampling_follows_elapsed_time_not_ticks() {
        let grid = RoadGrid::new(LANES, ROAD_LEN);
        let ring = Roundabout::new(6);
        let mut metrics = MetricsCollector::new();

        // Cadence counts from time zero, so the first sample lands once a
        // full interval has elapsed
        metrics.recompute(&grid, &ring, 100);
        assert_eq!(metrics.history().len(), 0);

        metrics.recompute(&grid, &ring, HISTORY_SAMPLE_MS);
        assert_eq!(metrics.history().len(), 1);

        // Many quick ticks inside one interval add nothing
        metrics.recompute(&grid, &ring, HISTORY_SAMPLE_MS + 10);
        metrics.recompute(&grid, &ring, HISTORY_SAMPLE_MS + 20);
        assert_eq!(metrics.history().len(), 1);

        metrics.recompute(&grid, &ring, 2 * HISTORY_SAMPLE_MS);
        assert_eq!(metrics.history().len(), 2);
    }

    #[test]
    fn high_water_marks_only_rise() {
        let mut metrics = MetricsCollector::new();
        metrics.observe_queue_lengths(5, 2);
        metrics.observe_queue_lengths(3, 7);
        assert_eq!(metrics.queue_high_water(EntryPoint::Main), 5);
        assert_eq!(metrics.queue_high_water(EntryPoint::Side), 7);
    }
}
