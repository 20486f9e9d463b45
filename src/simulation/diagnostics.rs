//! Bottleneck classification and the human-readable diagnosis
//!
//! A pure function of the current metrics and configuration, recomputed
//! every tick. The classification is a tagged enum decided by ordered range
//! checks; turning it into display text is a separate step so the state
//! machine stays testable without string matching.

use super::types::{CORRIDOR_KM, ENTRY_SIDE, RING_EXIT, ROAD_LEN, SEG_SIZE, TERMINAL_EXIT};

/// Density above which a segment counts as a bottleneck
pub const BOTTLENECK_THRESHOLD: f64 = 0.40;

/// Inflow/outflow ratio above which congestion is considered imminent
pub const DEMAND_WARNING_FACTOR: f64 = 1.3;

/// Below this many vehicles the corridor counts as lightly loaded
pub const LIGHT_TRAFFIC_MAX: usize = 10;

/// Where along the corridor a congested segment sits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BottleneckZone {
    /// The merge ring and its approach
    MergeRing { capacity: usize },
    /// The terminal end of the corridor
    TerminalExit,
    /// Around the side entry
    SideEntry,
    /// Anywhere else, labelled by its approximate kilometre point
    Corridor { km: usize },
}

impl BottleneckZone {
    /// Classify a segment by its starting cell. Ranges are checked in a
    /// fixed priority order and the first match wins.
    fn for_segment(segment: usize, ring_capacity: usize) -> Self {
        let pos = segment * SEG_SIZE;
        if pos + 12 >= RING_EXIT && pos <= RING_EXIT + 4 {
            BottleneckZone::MergeRing {
                capacity: ring_capacity,
            }
        } else if pos + 8 >= TERMINAL_EXIT {
            BottleneckZone::TerminalExit
        } else if pos + 4 >= ENTRY_SIDE && pos <= ENTRY_SIDE + 8 {
            BottleneckZone::SideEntry
        } else {
            BottleneckZone::Corridor {
                km: pos * CORRIDOR_KM / ROAD_LEN,
            }
        }
    }
}

/// The single mutually-exclusive traffic classification for a tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TrafficCondition {
    /// A segment is over the density threshold
    Jam { segment: usize, zone: BottleneckZone },
    /// No jam yet, but arrivals outpace the effective exit capacity
    OverDemand { inflow: u32, outflow: u32 },
    /// Nothing on the road and nothing arriving
    Empty,
    /// A handful of vehicles, no contention
    Light,
    /// Inflow and outflow are in balance
    Balanced { inflow: u32, outflow: u32 },
}

/// Severity tag with the display color used by chart and panel renderers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Critical,
    High,
    Elevated,
    Warning,
    Idle,
    Good,
    Info,
}

impl Severity {
    pub fn rgb(&self) -> (u8, u8, u8) {
        match self {
            Severity::Critical => (255, 80, 80),
            Severity::High => (255, 120, 60),
            Severity::Elevated => (255, 160, 40),
            Severity::Warning => (255, 200, 60),
            Severity::Idle => (150, 150, 180),
            Severity::Good => (80, 220, 130),
            Severity::Info => (100, 200, 255),
        }
    }
}

/// Everything the classifier needs for one tick
#[derive(Debug, Clone, Copy)]
pub struct DiagnosticInputs<'a> {
    pub seg_density: &'a [f64],
    pub vehicles_on_road: usize,
    pub entry_rate_total: u32,
    pub exit_rate_terminal: u32,
    pub exit_rate_ring: u32,
    pub ring_drain_rate: u32,
    pub ring_enabled: bool,
    pub ring_capacity: usize,
}

/// The published diagnosis for one tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Diagnosis {
    /// Index of the bottleneck segment, if any segment is over threshold
    pub bottleneck_segment: Option<usize>,
    pub condition: TrafficCondition,
    pub severity: Severity,
}

impl Diagnosis {
    /// Placeholder diagnosis used before the first tick
    pub fn initial() -> Self {
        Self {
            bottleneck_segment: None,
            condition: TrafficCondition::Empty,
            severity: Severity::Idle,
        }
    }

    /// Render the classification as advice for the control panel
    pub fn message(&self) -> String {
        match self.condition {
            TrafficCondition::Jam { zone, .. } => match zone {
                BottleneckZone::MergeRing { capacity } => format!(
                    "Jam at the merge ring! The ring is a bounded critical section and \
                     capacity {} is not keeping up. Raise the capacity or lower the entries.",
                    capacity
                ),
                BottleneckZone::TerminalExit => "Jam at the terminal exit! A slow consumer is \
                     backing the whole corridor up. Raise the terminal exit rate."
                    .to_string(),
                BottleneckZone::SideEntry => "Congestion around the side entry! Density is \
                     high. Lower the entry rates or raise the exits."
                    .to_string(),
                BottleneckZone::Corridor { km } => format!(
                    "Congestion near km {}! Density is high. Lower the entry rates or raise \
                     the exits.",
                    km
                ),
            },
            TrafficCondition::OverDemand { inflow, outflow } => format!(
                "Careful: {}/min arriving but only ~{}/min leaving. Producers outpacing \
                 consumers means a jam is coming.",
                inflow, outflow
            ),
            TrafficCondition::Empty => {
                "The corridor is empty. Raise the entry rates to get started.".to_string()
            }
            TrafficCondition::Light => {
                "Free-flowing traffic. No contention anywhere.".to_string()
            }
            TrafficCondition::Balanced { inflow, outflow } => format!(
                "Normal traffic. Arrivals ({}/min) are balanced with exits (~{}/min). The \
                 system is stable.",
                inflow, outflow
            ),
        }
    }
}

/// Classify the current tick. Exactly one condition comes out.
pub fn classify(inputs: DiagnosticInputs<'_>) -> Diagnosis {
    // Hunt for the densest segment first
    let mut max_density = 0.0;
    let mut max_segment = None;
    for (segment, &density) in inputs.seg_density.iter().enumerate() {
        if density > max_density {
            max_density = density;
            max_segment = Some(segment);
        }
    }

    if let Some(segment) = max_segment {
        if max_density > BOTTLENECK_THRESHOLD {
            let zone = BottleneckZone::for_segment(segment, inputs.ring_capacity);
            let severity = match zone {
                BottleneckZone::MergeRing { .. } => Severity::Critical,
                BottleneckZone::TerminalExit => Severity::High,
                _ => Severity::Elevated,
            };
            return Diagnosis {
                bottleneck_segment: Some(segment),
                condition: TrafficCondition::Jam { segment, zone },
                severity,
            };
        }
    }

    // No hot segment: compare demand against effective capacity. When the
    // ring is enabled its drain rate can cap the ring exit.
    let inflow = inputs.entry_rate_total;
    let ring_out = if inputs.ring_enabled {
        inputs.exit_rate_ring.min(inputs.ring_drain_rate)
    } else {
        inputs.exit_rate_ring
    };
    let outflow = inputs.exit_rate_terminal + ring_out;

    let (condition, severity) = if inflow as f64 > outflow as f64 * DEMAND_WARNING_FACTOR {
        (TrafficCondition::OverDemand { inflow, outflow }, Severity::Warning)
    } else if inputs.vehicles_on_road == 0 && inflow == 0 {
        (TrafficCondition::Empty, Severity::Idle)
    } else if inputs.vehicles_on_road < LIGHT_TRAFFIC_MAX {
        (TrafficCondition::Light, Severity::Good)
    } else {
        (TrafficCondition::Balanced { inflow, outflow }, Severity::Info)
    };

    Diagnosis {
        bottleneck_segment: None,
        condition,
        severity,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::types::SEG_COUNT;

    fn inputs<'a>(seg_density: &'a [f64]) -> DiagnosticInputs<'a> {
        DiagnosticInputs {
            seg_density,
            vehicles_on_road: 20,
            entry_rate_total: 50,
            exit_rate_terminal: 20,
            exit_rate_ring: 12,
            ring_drain_rate: 10,
            ring_enabled: true,
            ring_capacity: 6,
        }
    }

    #[test]
    fn merge_ring_zone_wins_over_the_generic_label() {
        let mut density = [0.0; SEG_COUNT];
        let merge_segment = RING_EXIT / SEG_SIZE;
        density[merge_segment] = 0.5;

        let diagnosis = classify(inputs(&density));
        assert_eq!(diagnosis.bottleneck_segment, Some(merge_segment));
        assert!(matches!(
            diagnosis.condition,
            TrafficCondition::Jam {
                zone: BottleneckZone::MergeRing { capacity: 6 },
                ..
            }
        ));
        assert_eq!(diagnosis.severity, Severity::Critical);
    }

    #[test]
    fn terminal_zone_is_detected() {
        let mut density = [0.0; SEG_COUNT];
        let segment = (TERMINAL_EXIT - 3) / SEG_SIZE;
        density[segment] = 0.6;

        let diagnosis = classify(inputs(&density));
        assert!(matches!(
            diagnosis.condition,
            TrafficCondition::Jam {
                zone: BottleneckZone::TerminalExit,
                ..
            }
        ));
        assert_eq!(diagnosis.severity, Severity::High);
    }

    #[test]
    fn side_entry_zone_is_detected() {
        let mut density = [0.0; SEG_COUNT];
        // First segment whose start cell falls inside the side-entry range
        let segment = (ENTRY_SIDE + SEG_SIZE - 1) / SEG_SIZE;
        density[segment] = 0.5;

        let diagnosis = classify(inputs(&density));
        assert!(matches!(
            diagnosis.condition,
            TrafficCondition::Jam {
                zone: BottleneckZone::SideEntry,
                ..
            }
        ));
    }

    #[test]
    fn midway_congestion_gets_a_km_label() {
        let mut density = [0.0; SEG_COUNT];
        density[9] = 0.5;

        let diagnosis = classify(inputs(&density));
        let expected_km = 9 * SEG_SIZE * CORRIDOR_KM / ROAD_LEN;
        assert!(matches!(
            diagnosis.condition,
            TrafficCondition::Jam {
                zone: BottleneckZone::Corridor { km },
                ..
            } if km == expected_km
        ));
    }

    #[test]
    fn threshold_is_strictly_greater() {
        let mut density = [0.0; SEG_COUNT];
        density[9] = BOTTLENECK_THRESHOLD;

        let diagnosis = classify(inputs(&density));
        assert_eq!(diagnosis.bottleneck_segment, None);
    }

    #[test]
    fn overdemand_warns_before_any_jam() {
        let density = [0.0; SEG_COUNT];
        let mut input = inputs(&density);
        // Effective outflow: 20 + min(12, 10) = 30, and 50 > 39
        input.entry_rate_total = 50;

        let diagnosis = classify(input);
        assert!(matches!(
            diagnosis.condition,
            TrafficCondition::OverDemand {
                inflow: 50,
                outflow: 30
            }
        ));
        assert_eq!(diagnosis.severity, Severity::Warning);
    }

    #[test]
    fn disabling_the_ring_lifts_the_drain_cap() {
        let density = [0.0; SEG_COUNT];
        let mut input = inputs(&density);
        input.entry_rate_total = 40;
        input.ring_enabled = false;

        // Outflow becomes 20 + 12 = 32 and 40 <= 41.6, so no warning
        let diagnosis = classify(input);
        assert!(matches!(
            diagnosis.condition,
            TrafficCondition::Balanced { .. }
        ));
    }

    #[test]
    fn quiet_road_classifications() {
        let density = [0.0; SEG_COUNT];

        let mut input = inputs(&density);
        input.entry_rate_total = 0;
        input.vehicles_on_road = 0;
        assert_eq!(classify(input).condition, TrafficCondition::Empty);

        let mut input = inputs(&density);
        input.entry_rate_total = 10;
        input.vehicles_on_road = 3;
        assert_eq!(classify(input).condition, TrafficCondition::Light);
    }

    #[test]
    fn every_condition_has_a_message() {
        let conditions = [
            TrafficCondition::Jam {
                segment: 13,
                zone: BottleneckZone::MergeRing { capacity: 6 },
            },
            TrafficCondition::OverDemand {
                inflow: 50,
                outflow: 30,
            },
            TrafficCondition::Empty,
            TrafficCondition::Light,
            TrafficCondition::Balanced {
                inflow: 30,
                outflow: 30,
            },
        ];
        for condition in conditions {
            let diagnosis = Diagnosis {
                bottleneck_segment: None,
                condition,
                severity: Severity::Info,
            };
            assert!(!diagnosis.message().is_empty());
        }
    }
}
