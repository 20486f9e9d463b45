//! Periodic drivers for the simulation
//!
//! Three threads run the show: two arrival producers that enqueue pending
//! vehicle ids at a fixed poll rate, and one tick thread that advances the
//! world. The world sits behind a mutex so a tick is all-or-nothing; the
//! producers never touch anything but their entry queue and the shared id
//! counter.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use anyhow::{anyhow, Result};
use log::{debug, info};
use parking_lot::Mutex;
use rand::Rng;

use super::config::SimConfig;
use super::snapshot::SimSnapshot;
use super::types::EntryPoint;
use super::world::SimWorld;

/// How often each arrival producer rolls the dice, in milliseconds
pub const ARRIVAL_POLL_MS: u64 = 80;

/// Polls per minute, the denominator that turns a per-minute entry rate
/// into a per-poll probability
const POLLS_PER_MIN: f64 = 60_000.0 / ARRIVAL_POLL_MS as f64;

/// Owns the simulation threads and the latest published snapshot
pub struct SimDriver {
    world: Arc<Mutex<SimWorld>>,
    config: Arc<SimConfig>,
    latest: Arc<Mutex<SimSnapshot>>,
    paused: Arc<AtomicBool>,
    shutdown: Arc<AtomicBool>,
    threads: Vec<JoinHandle<()>>,
}

impl SimDriver {
    /// Take ownership of a world and start the periodic threads
    pub fn start(world: SimWorld) -> Self {
        let config = Arc::clone(world.config());
        let latest = Arc::new(Mutex::new(world.snapshot()));
        let paused = Arc::new(AtomicBool::new(false));
        let shutdown = Arc::new(AtomicBool::new(false));

        let mut threads = Vec::new();

        // One producer per entry point
        for entry in [EntryPoint::Main, EntryPoint::Side] {
            let queue = Arc::clone(world.queue(entry));
            let ids = Arc::clone(world.id_gen());
            let config = Arc::clone(&config);
            let paused = Arc::clone(&paused);
            let shutdown = Arc::clone(&shutdown);
            threads.push(std::thread::spawn(move || {
                let mut rng = rand::rng();
                while !shutdown.load(Ordering::Relaxed) {
                    if !paused.load(Ordering::Relaxed) {
                        let rate = match entry {
                            EntryPoint::Main => config.entry_rate_main(),
                            EntryPoint::Side => config.entry_rate_side(),
                        };
                        if rate > 0 && rng.random::<f64>() < rate as f64 / POLLS_PER_MIN {
                            queue.push(ids.next_id());
                        }
                    }
                    std::thread::sleep(Duration::from_millis(ARRIVAL_POLL_MS));
                }
            }));
        }

        let world = Arc::new(Mutex::new(world));
        {
            let world = Arc::clone(&world);
            let config = Arc::clone(&config);
            let latest = Arc::clone(&latest);
            let paused = Arc::clone(&paused);
            let shutdown = Arc::clone(&shutdown);
            threads.push(std::thread::spawn(move || {
                let mut last = Instant::now();
                while !shutdown.load(Ordering::Relaxed) {
                    let period = Duration::from_millis(config.tick_ms());
                    if paused.load(Ordering::Relaxed) {
                        // Skip state mutation entirely and forget the time
                        // spent paused, so resuming doesn't replay it
                        last = Instant::now();
                        std::thread::sleep(period);
                        continue;
                    }
                    let now = Instant::now();
                    let dt_ms = now.duration_since(last).as_millis() as u64;
                    last = now;
                    {
                        let mut world = world.lock();
                        world.tick(dt_ms);
                        *latest.lock() = world.snapshot();
                    }
                    std::thread::sleep(period);
                }
            }));
        }

        info!("simulation driver started ({} threads)", threads.len());

        Self {
            world,
            config,
            latest,
            paused,
            shutdown,
            threads,
        }
    }

    pub fn config(&self) -> &Arc<SimConfig> {
        &self.config
    }

    /// Clone of the most recently published snapshot
    pub fn snapshot(&self) -> SimSnapshot {
        self.latest.lock().clone()
    }

    /// Suspend all state mutation. Arrivals are suppressed too, so the
    /// queues hold still while paused.
    pub fn pause(&self) {
        self.paused.store(true, Ordering::Relaxed);
        debug!("simulation paused");
    }

    pub fn resume(&self) {
        self.paused.store(false, Ordering::Relaxed);
        debug!("simulation resumed");
    }

    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::Relaxed)
    }

    /// Clear the world back to an empty road. Runs under the world lock, so
    /// it never lands in the middle of a tick.
    pub fn reset(&self) {
        let mut world = self.world.lock();
        world.reset();
        *self.latest.lock() = world.snapshot();
        info!("simulation reset");
    }

    /// Run a closure against the locked world. Mostly useful for tests and
    /// embedders that need more than the snapshot.
    pub fn with_world<T>(&self, f: impl FnOnce(&mut SimWorld) -> T) -> T {
        f(&mut self.world.lock())
    }

    /// Stop the periodic threads. In-flight ticks finish first; nothing is
    /// interrupted mid-update.
    pub fn stop(mut self) -> Result<()> {
        self.shutdown.store(true, Ordering::Relaxed);
        for handle in self.threads.drain(..) {
            handle
                .join()
                .map_err(|_| anyhow!("simulation thread panicked"))?;
        }
        info!("simulation driver stopped");
        Ok(())
    }
}

impl Drop for SimDriver {
    fn drop(&mut self) {
        // Threads check this flag on their next poll; dropping without
        // stop() still winds them down
        self.shutdown.store(true, Ordering::Relaxed);
    }
}
