use crate::analysis::Ntuple;
use crate::event::Event;
use crate::event_action::{book_hits_ntuple, EventAction};
use crate::registry::SdManager;
use crate::sd::{CalorimeterSD, SensitiveDetector};
use crate::transport::{Transport, Volume};
use crate::Config;
use anyhow::{Context, Result};
use log::{debug, info};
use rand::prelude::*;
use rayon::prelude::*;
use std::ops::Range;

pub const ABSORBER_SD_NAME: &str = "Absorber";
pub const GAP_SD_NAME: &str = "Gap";

/// Declares the collections of both calorimeter detectors.
pub fn build_registry(cfg: &Config) -> SdManager {
    let mut sdm = SdManager::new();
    sdm.register(ABSORBER_SD_NAME, &cfg.detector.absorber_collection);
    sdm.register(GAP_SD_NAME, &cfg.detector.gap_collection);
    sdm
}

/// Everything one thread needs to process events on its own.
pub struct Worker<'r> {
    registry: &'r SdManager,
    absorber: CalorimeterSD,
    gap: CalorimeterSD,
    event_action: EventAction,
    transport: Transport,
    ntuple: Ntuple,
    seed: u64,
}

impl<'r> Worker<'r> {
    pub fn new(cfg: &Config, registry: &'r SdManager, ntuple: Ntuple) -> Worker<'r> {
        let n_cells = cfg.detector.n_layers;
        let mut absorber =
            CalorimeterSD::new(ABSORBER_SD_NAME, &cfg.detector.absorber_collection, n_cells);
        let mut gap = CalorimeterSD::new(GAP_SD_NAME, &cfg.detector.gap_collection, n_cells);
        absorber.verbose_level = cfg.detector.verbose_level;
        gap.verbose_level = cfg.detector.verbose_level;
        Worker {
            registry,
            absorber,
            gap,
            event_action: EventAction::new(
                &cfg.detector.absorber_collection,
                Some(&cfg.detector.gap_collection),
                cfg.setup.print_progress,
            ),
            transport: Transport::new(cfg),
            ntuple,
            seed: cfg.setup.seed,
        }
    }

    pub fn process_event(&mut self, event_id: i32) -> Result<()> {
        let mut event = Event::new(event_id);
        self.event_action.begin_of_event_action(&event);

        self.absorber
            .initialize(event.hc_of_this_event_mut(), self.registry)?;
        self.gap
            .initialize(event.hc_of_this_event_mut(), self.registry)?;

        // seeded per event so results don't depend on the thread layout
        let mut rng = StdRng::seed_from_u64(self.seed.wrapping_add(event_id as u64));
        {
            let hce = event.hc_of_this_event_mut();
            let absorber = &mut self.absorber;
            let gap = &mut self.gap;
            self.transport
                .transport_event(&mut rng, |step, volume| {
                    match volume {
                        Volume::Absorber => {
                            absorber.process_hits(step, hce)?;
                        }
                        Volume::Gap => {
                            gap.process_hits(step, hce)?;
                        }
                        Volume::World => {}
                    }
                    Ok(())
                })
                .with_context(|| format!("Transport failed in event {}", event_id))?;
        }

        self.absorber.end_of_event(event.hc_of_this_event());
        self.gap.end_of_event(event.hc_of_this_event());

        self.event_action
            .end_of_event_action(&event, self.registry, &mut self.ntuple)
    }

    pub fn run(mut self, events: Range<i32>) -> Result<Ntuple> {
        debug!("worker starting events {:?}", events);
        for event_id in events {
            self.process_event(event_id)?;
        }
        Ok(self.ntuple)
    }
}

/// Splits `0..n_events` into `n_chunks` contiguous ranges, the first ones
/// one event longer when it doesn't divide evenly.
pub fn split_events(n_events: u32, n_chunks: usize) -> Vec<Range<i32>> {
    let n_chunks = n_chunks.max(1) as u32;
    let base = n_events / n_chunks;
    let extra = n_events % n_chunks;
    let mut start = 0;
    (0..n_chunks)
        .map(|i| {
            let len = base + if i < extra { 1 } else { 0 };
            let range = start as i32..(start + len) as i32;
            start += len;
            range
        })
        .filter(|r| !r.is_empty())
        .collect()
}

/// Runs all events of `cfg` and returns the merged hits ntuple, rows in
/// event order.
pub fn run_events(cfg: &Config) -> Result<Ntuple> {
    let registry = build_registry(cfg);
    let template = book_hits_ntuple(&cfg.output.ntuple_name);

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(cfg.setup.n_threads)
        .build()
        .context("Could not start the worker threads")?;
    let chunks = split_events(cfg.setup.n_events, pool.current_num_threads());
    info!(
        "processing {} events on {} workers",
        cfg.setup.n_events,
        chunks.len()
    );

    let parts: Vec<Ntuple> = pool.install(|| {
        chunks
            .into_par_iter()
            .map(|events| Worker::new(cfg, &registry, template.empty_copy()).run(events))
            .collect::<Result<Vec<Ntuple>>>()
    })?;

    let mut total = template;
    for part in parts {
        total.merge(part)?;
    }
    Ok(total)
}
