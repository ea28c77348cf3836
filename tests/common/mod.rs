#![allow(dead_code)]
use calor_hits::step::{StepPoint, Track};
use calor_hits::vector::ThreeVector;
use calor_hits::{Config, Detector, Gun, Output, Setup};

pub fn setup_config(outdir: &str) -> Config {
    // This is a small configuration so that a whole run
    // can be used in testing.
    Config {
        setup: Setup {
            n_events: 12,
            n_threads: 3,
            print_progress: 5,
            seed: 42,
        },
        detector: Detector {
            absorber_collection: "AbsorberHitsCollection".to_string(),
            gap_collection: "GapHitsCollection".to_string(),
            n_layers: 4,
            absorber_thickness: 10.0,
            gap_thickness: 5.0,
            verbose_level: 2,
        },
        gun: Gun {
            particle: "e-".to_string(),
            energy: 1000.0,
            position_sigma: 1.0,
            angular_sigma: 0.01,
            brem_probability: 0.5,
        },
        output: Output {
            write_output: true,
            outdir: outdir.to_string(),
            ntuple_name: "B4".to_string(),
        },
    }
}

/// Pre and post points of a straight step along +z starting at `z`.
pub fn points(z: f64, momentum: f64, process: &str) -> (StepPoint, StepPoint) {
    let p = ThreeVector::new(0.0, 0.0, momentum);
    (
        StepPoint::new(ThreeVector::new(1.0, 2.0, z), p),
        StepPoint::new(ThreeVector::new(1.5, 2.5, z + 5.0), p).with_process(process),
    )
}

/// e-, gamma and e- tracks: a primary and two of its secondaries.
pub fn three_tracks() -> Vec<Track> {
    vec![
        Track::primary(1, "e-"),
        Track::secondary(2, 1, "gamma", "eBrem"),
        Track::secondary(3, 1, "e-", "compt"),
    ]
}
