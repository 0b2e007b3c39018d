use super::*;
use crate::models::tolerance::MzTolerance;
use std::collections::HashMap;

// Half a dalton keeps every bound exactly representable in binary,
// so the expected intervals can be compared with `==`.
const HALF_DA: MzTolerance = MzTolerance::Absolute((0.5, 0.5));

fn obs(mz: f64, intensity: f64) -> Observation {
    Observation::new(mz, intensity)
}

fn interval_of(partition: &IntervalPartition, mz: f64) -> MzInterval {
    partition.containing(mz).unwrap().0
}

#[test]
fn test_seed_absorb_and_discard() {
    let tol = MzTolerance::Absolute((0.01, 0.01));
    let mut partition = IntervalPartition::new();

    let first = partition.place(0, obs(100.0, 1000.0), 100.0, &tol);
    let Placement::Seeded(trace) = first else {
        panic!("Expected a seeded trace, got {:?}", first);
    };
    assert_eq!(
        partition.place(1, obs(100.001, 900.0), 100.0, &tol),
        Placement::Absorbed {
            trace,
            inserted: true
        }
    );
    assert_eq!(
        partition.place(1, obs(100.002, 850.0), 100.0, &tol),
        Placement::Absorbed {
            trace,
            inserted: false
        }
    );
    assert_eq!(
        partition.place(1, obs(150.0, 50.0), 100.0, &tol),
        Placement::BelowSeedIntensity
    );
    assert_eq!(partition.len(), 1);
    assert_eq!(partition.trace(trace).len(), 2);
    assert_eq!(partition.trace(trace).observation_at(1).unwrap().intensity, 900.0);
}

#[test]
fn test_clip_against_left_neighbour() {
    let mut partition = IntervalPartition::new();
    partition.place(0, obs(100.0, 10.0), 0.0, &HALF_DA);
    partition.place(0, obs(100.75, 9.0), 0.0, &HALF_DA);

    assert_eq!(
        interval_of(&partition, 100.0),
        MzInterval {
            low: 99.5,
            high: 100.5
        }
    );
    assert_eq!(
        interval_of(&partition, 100.75),
        MzInterval {
            low: 100.5,
            high: 101.25
        }
    );
}

#[test]
fn test_clip_against_right_neighbour() {
    let mut partition = IntervalPartition::new();
    partition.place(0, obs(100.0, 10.0), 0.0, &HALF_DA);
    partition.place(0, obs(99.25, 9.0), 0.0, &HALF_DA);

    assert_eq!(
        interval_of(&partition, 99.25),
        MzInterval {
            low: 98.75,
            high: 99.5
        }
    );
}

#[test]
fn test_clip_against_both_neighbours() {
    let mut partition = IntervalPartition::new();
    partition.place(0, obs(199.5, 10.0), 0.0, &HALF_DA);
    partition.place(0, obs(201.0, 9.0), 0.0, &HALF_DA);
    partition.place(0, obs(200.25, 8.0), 0.0, &HALF_DA);

    assert_eq!(
        interval_of(&partition, 200.25),
        MzInterval {
            low: 200.0,
            high: 200.5
        }
    );
    assert_eq!(partition.len(), 3);
    assert!(partition.is_disjoint());
}

#[test]
fn test_boundaries_are_closed_open() {
    let mut partition = IntervalPartition::new();
    partition.place(0, obs(100.0, 10.0), 0.0, &HALF_DA);
    assert!(partition.containing(99.5).is_some());
    assert!(partition.containing(100.5).is_none());

    // Exactly on the high bound, seeds a new neighbour sharing the endpoint.
    let placement = partition.place(0, obs(100.5, 5.0), 0.0, &HALF_DA);
    assert!(matches!(placement, Placement::Seeded(_)));
    assert_eq!(
        interval_of(&partition, 100.5),
        MzInterval {
            low: 100.5,
            high: 101.0
        }
    );
}

#[test]
fn test_neighbour_inside_the_window_is_clipped_too() {
    // A narrow trace followed by a wide window that fully contains it,
    // as happens with mass dependent tolerances.
    let policy = |mz: f64| {
        if mz < 100.25 {
            TupleRange::try_new(mz - 0.125, mz + 0.125).unwrap()
        } else {
            TupleRange::try_new(mz - 1.0, mz + 1.0).unwrap()
        }
    };
    let mut partition = IntervalPartition::new();
    partition.place(0, obs(100.0, 10.0), 0.0, &policy);
    partition.place(0, obs(100.5, 9.0), 0.0, &policy);

    assert_eq!(
        interval_of(&partition, 100.5),
        MzInterval {
            low: 100.125,
            high: 101.5
        }
    );
    assert!(partition.is_disjoint());
}

#[test]
fn test_resolve_seed_bounds_cases() {
    let window = TupleRange::try_new(10.0, 12.0).unwrap();
    let left = MzInterval {
        low: 9.0,
        high: 10.5,
    };
    let right = MzInterval {
        low: 11.5,
        high: 13.0,
    };

    assert_eq!(
        resolve_seed_bounds(window, None, None),
        SeedBounds::New(MzInterval {
            low: 10.0,
            high: 12.0
        })
    );
    assert_eq!(
        resolve_seed_bounds(window, None, Some(right)),
        SeedBounds::New(MzInterval {
            low: 10.0,
            high: 11.5
        })
    );
    assert_eq!(
        resolve_seed_bounds(window, Some(left), None),
        SeedBounds::New(MzInterval {
            low: 10.5,
            high: 12.0
        })
    );
    assert_eq!(
        resolve_seed_bounds(window, Some(left), Some(right)),
        SeedBounds::New(MzInterval {
            low: 10.5,
            high: 11.5
        })
    );

    let touching_right = MzInterval {
        low: 10.5,
        high: 13.0,
    };
    assert_eq!(
        resolve_seed_bounds(window, Some(left), Some(touching_right)),
        SeedBounds::CollapseIntoRight
    );

    let wide_left = MzInterval {
        low: 9.0,
        high: 12.0,
    };
    assert_eq!(
        resolve_seed_bounds(window, Some(wide_left), None),
        SeedBounds::Unresolved {
            low: 12.0,
            high: 12.0
        }
    );
    let overlapping_right = MzInterval {
        low: 10.25,
        high: 13.0,
    };
    assert_eq!(
        resolve_seed_bounds(window, Some(left), Some(overlapping_right)),
        SeedBounds::Unresolved {
            low: 10.5,
            high: 10.25
        }
    );
}

#[test]
#[should_panic(expected = "already claimed")]
fn test_seeding_a_claimed_mass_panics() {
    let mut partition = IntervalPartition::new();
    partition.place(0, obs(100.0, 10.0), 0.0, &HALF_DA);
    let window = HALF_DA.mz_window(100.25);
    partition.seed(1, obs(100.25, 5.0), window);
}

#[test]
#[should_panic(expected = "does not contain the seed")]
fn test_window_not_containing_the_seed_panics() {
    let mut partition = IntervalPartition::new();
    let window = TupleRange::try_new(101.0, 102.0).unwrap();
    partition.seed(0, obs(100.0, 5.0), window);
}

#[test]
#[should_panic(expected = "overlaps")]
fn test_overlapping_insert_panics() {
    let mut partition = IntervalPartition::new();
    partition.insert(
        MzInterval {
            low: 1.0,
            high: 2.0,
        },
        TraceAccumulator::new(0, obs(1.5, 1.0)),
    );
    partition.insert(
        MzInterval {
            low: 1.5,
            high: 2.5,
        },
        TraceAccumulator::new(0, obs(2.0, 1.0)),
    );
}

#[test]
#[should_panic(expected = "Unable to resolve")]
fn test_degenerate_window_without_right_neighbour_panics() {
    // A policy with no upper tolerance leaves [mz - 0.5, mz), which does
    // not hold mz itself. The next observation at that mass cannot be
    // placed anywhere.
    let policy = |mz: f64| TupleRange::try_new(mz - 0.5, mz).unwrap();
    let mut partition = IntervalPartition::new();
    partition.place(0, obs(100.0, 10.0), 0.0, &policy);
    partition.place(1, obs(100.0, 9.0), 0.0, &policy);
}

#[test]
fn test_into_traces_is_mz_ordered() {
    let mut partition = IntervalPartition::new();
    for (mz, intensity) in [(300.0, 10.0), (100.0, 9.0), (200.0, 8.0)] {
        partition.place(0, obs(mz, intensity), 0.0, &HALF_DA);
    }
    let mzs: Vec<f64> = partition
        .into_traces()
        .iter()
        .map(|x| x.mean_mz())
        .collect();
    assert_eq!(mzs, vec![100.0, 200.0, 300.0]);
}

/// Small deterministic generator so the test does not need `rand`.
struct Lcg(u64);

impl Lcg {
    fn next_f64(&mut self) -> f64 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        (self.0 >> 11) as f64 / (1u64 << 53) as f64
    }
}

#[test]
fn test_disjointness_and_highest_intensity_wins_on_noisy_data() {
    let mut rng = Lcg(42);
    let centers = [400.1, 400.102, 400.11, 512.3, 512.31, 800.0];
    let mut observations = Vec::new();
    for scan in 0..60u32 {
        for &center in centers.iter() {
            for _ in 0..4 {
                let mz = center + (rng.next_f64() - 0.5) * 0.02;
                let intensity = rng.next_f64() * 1000.0;
                observations.push((scan, obs(mz, intensity)));
            }
        }
    }
    observations.sort_by(|a, b| b.1.intensity.total_cmp(&a.1.intensity));

    let tol = MzTolerance::Ppm((10.0, 10.0));
    let mut partition = IntervalPartition::new();
    let mut best_seen: HashMap<(TraceId, ScanPosition), f64> = HashMap::new();

    for (scan, observation) in observations {
        let placement = partition.place(scan, observation, 0.0, &tol);
        let trace = match placement {
            Placement::Seeded(t) => t,
            Placement::Absorbed { trace, .. } => trace,
            other => panic!("Unexpected placement {:?}", other),
        };
        assert_eq!(partition.containing(observation.mz).unwrap().1, trace);
        let best = best_seen.entry((trace, scan)).or_insert(observation.intensity);
        *best = best.max(observation.intensity);
        assert!(partition.is_disjoint());
    }

    for ((trace, scan), best) in best_seen {
        let kept = partition.trace(trace).observation_at(scan).unwrap();
        assert_eq!(kept.intensity, best);
    }
    for (_, trace) in partition.iter() {
        assert!(trace.len() <= 60);
    }
}
