use serde::Deserialize;
use std::fs;

use anyhow::{Context, Result};
use log::info;

pub mod analysis;
pub mod error;
pub mod event;
pub mod event_action;
pub mod hits;
pub mod registry;
pub mod run_manager;
pub mod save;
pub mod sd;
pub mod step;
pub mod transport;
pub mod units;
pub mod vector;

// All physical quantities are double precision. Lengths are in mm and
// energies/momenta in MeV, see `units`.
pub type Float = f64;

#[derive(Deserialize, Clone, Debug)]
pub struct Config {
    pub setup: Setup,
    pub detector: Detector,
    pub gun: Gun,
    pub output: Output,
}

#[derive(Deserialize, Clone, Debug)]
pub struct Setup {
    pub n_events: u32,
    /// 0 lets rayon pick
    #[serde(default)]
    pub n_threads: usize,
    /// log every n-th event, 0 or less never
    #[serde(default)]
    pub print_progress: i32,
    #[serde(default)]
    pub seed: u64,
}

#[derive(Deserialize, Clone, Debug)]
pub struct Detector {
    pub absorber_collection: String,
    pub gap_collection: String,
    pub n_layers: usize,
    pub absorber_thickness: Float,
    pub gap_thickness: Float,
    #[serde(default)]
    pub verbose_level: i32,
}

#[derive(Deserialize, Clone, Debug)]
pub struct Gun {
    pub particle: String,
    pub energy: Float,
    pub position_sigma: Float,
    pub angular_sigma: Float,
    pub brem_probability: Float,
}

#[derive(Deserialize, Clone, Debug)]
pub struct Output {
    pub write_output: bool,
    pub outdir: String,
    pub ntuple_name: String,
}

impl Config {
    pub fn new() -> Result<Config> {
        Config::from_file("config.toml")
    }

    pub fn from_file(path: &str) -> Result<Config> {
        let contents =
            fs::read_to_string(path).with_context(|| format!("Could not open the {} file", path))?;
        toml::from_str(&contents).with_context(|| "Could not parse Config file")
    }

    pub fn validate(&self) -> Result<()> {
        if self.detector.n_layers == 0 {
            return Err(anyhow::Error::msg("The calorimeter needs at least one layer"));
        }
        if !(self.detector.absorber_thickness > 0.0) || !(self.detector.gap_thickness > 0.0) {
            return Err(anyhow::Error::msg(
                "Absorber and gap thicknesses must be positive",
            ));
        }
        if !(0.0..=1.0).contains(&self.gun.brem_probability) {
            return Err(anyhow::Error::msg(
                "brem_probability must lie between 0 and 1",
            ));
        }
        if !(self.gun.energy >= 0.0) {
            return Err(anyhow::Error::msg("Gun energy can't be negative"));
        }
        if transport::particle_mass(&self.gun.particle).is_none() {
            return Err(anyhow::anyhow!(
                "Unknown particle `{}` for the gun",
                self.gun.particle
            ));
        }
        if self.setup.n_events > i32::MAX as u32 {
            return Err(anyhow::Error::msg("Too many events"));
        }
        Ok(())
    }
}

pub fn run(cfg: Config) -> Result<()> {
    cfg.validate()?;

    let ntuple = run_manager::run_events(&cfg)?;
    info!(
        "recorded {} absorber hits in {} events",
        ntuple.entries(),
        cfg.setup.n_events
    );

    if cfg.output.write_output {
        save::save_ntuple(&ntuple, &cfg.output.outdir)?;
        info!("ntuple written to {}/{}", cfg.output.outdir, ntuple.name());
    }
    Ok(())
}
