//! The per-tick vehicle advancement pass
//!
//! Positions are scanned from the far end of the corridor toward the origin,
//! so a cell vacated this tick cannot be reoccupied by a trailing vehicle in
//! the same pass. That scan order is what guarantees no vehicle advances
//! twice in one tick, and it is why the forward spacing check only looks
//! ahead.

use super::grid::RoadGrid;
use super::rate_limiter::TokenBucket;
use super::roundabout::Roundabout;
use super::signal::SignalController;
use super::types::{MERGE_WINDOW, RING_EXIT, SIGNAL_LOOKAHEAD, TERMINAL_EXIT};

/// Flags and spacing read from configuration once per tick
#[derive(Debug, Clone, Copy)]
pub(crate) struct MovementParams {
    pub gap: usize,
    pub ring_enabled: bool,
    pub signals_enabled: bool,
}

/// How many vehicles each exit consumed during one pass
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct MovementTally {
    pub terminal_exits: u64,
    pub ring_direct_exits: u64,
}

/// Advance every vehicle on the grid by at most one cell.
///
/// Per occupied cell the rules run in a fixed order: terminal consumption,
/// merge entry (or direct ring exit when the ring is disabled), red-signal
/// lookahead, forward move, and finally a lane change for vehicles that are
/// still blocked. Every acquisition is non-blocking; failure just asserts
/// the braking flag and the vehicle retries next tick.
pub(crate) fn advance_all(
    grid: &mut RoadGrid,
    ring: &mut Roundabout,
    terminal_limiter: &mut TokenBucket,
    ring_limiter: &mut TokenBucket,
    signals: &[SignalController],
    params: MovementParams,
) -> MovementTally {
    let mut tally = MovementTally::default();

    for lane in 0..grid.lanes() {
        for pos in (0..grid.length()).rev() {
            let Some(vehicle) = grid.get(lane, pos).copied() else {
                continue;
            };
            // Braking is transient; every vehicle starts the tick clear
            let mut braking = false;

            // Terminal exit: consume or queue up in place
            if pos >= TERMINAL_EXIT {
                if terminal_limiter.try_consume() {
                    grid.take(lane, pos);
                    tally.terminal_exits += 1;
                    continue;
                }
                braking = true;
            }

            // Merge window ahead of the ring exit
            if vehicle.wants_exit && pos + MERGE_WINDOW >= RING_EXIT && pos <= RING_EXIT {
                if params.ring_enabled {
                    // Hand-off: the grid cell is cleared only once the ring
                    // has accepted the vehicle
                    if ring.try_enter(vehicle) {
                        grid.take(lane, pos);
                        continue;
                    }
                    braking = true;
                } else if ring_limiter.try_consume() {
                    grid.take(lane, pos);
                    tally.ring_direct_exits += 1;
                    continue;
                } else {
                    braking = true;
                }
            }

            // A red signal within the lookahead window forces braking even
            // on an otherwise clear path
            if params.signals_enabled {
                for signal in signals {
                    if signal.is_red()
                        && pos < signal.position()
                        && pos + SIGNAL_LOOKAHEAD >= signal.position()
                    {
                        braking = true;
                    }
                }
            }

            if !braking && !grid.advance(lane, pos, params.gap) {
                braking = true;
            }

            if braking {
                grid.mark_braking(lane, pos);
                grid.try_lane_change(lane, pos, params.gap);
            }
        }
    }

    tally
}
