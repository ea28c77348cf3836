use crate::analysis::Ntuple;
use crate::error::HitsError;
use crate::event::Event;
use crate::hits::{CalorHit, HitsCollection};
use crate::registry::CollectionRegistry;
use crate::units::{best_unit, Category, CM, GEV};
use crate::Float;
use anyhow::{Context, Result};
use log::info;

// Column layout of the hits ntuple, see `book_hits_ntuple`.
const COL_EVT: usize = 0;
const COL_NHITS: usize = 1;
const COL_TRACK_ID: usize = 2;
const COL_PARTICLE: usize = 3;
const COL_X: usize = 4;
const COL_Y: usize = 5;
const COL_Z: usize = 6;
const COL_MOM: usize = 7;
const COL_TH_X: usize = 8;
const COL_TH_Y: usize = 9;
const COL_PROCESS: usize = 10;
const COL_PARENT: usize = 11;
const COL_CREATOR_PROC: usize = 12;

/// Creates the ntuple `EventAction` fills: one row per absorber hit.
pub fn book_hits_ntuple(name: &str) -> Ntuple {
    let mut nt = Ntuple::new(name, "Hits in the absorber");
    nt.create_i_column("Evt");
    nt.create_i_column("NHits");
    nt.create_i_column("TrackID");
    nt.create_s_column("Particle");
    nt.create_d_column("X");
    nt.create_d_column("Y");
    nt.create_d_column("Z");
    nt.create_d_column("Mom");
    nt.create_d_column("ThX");
    nt.create_d_column("ThY");
    nt.create_s_column("Process");
    nt.create_i_column("Parent");
    nt.create_s_column("CreatorProc");
    nt
}

/// End-of-event hook: copies the absorber hits of each event into the
/// analysis ntuple.
pub struct EventAction {
    abs_hc_name: String,
    gap_hc_name: Option<String>,
    // resolved on the first end of event
    abs_hcid: Option<usize>,
    gap_hcid: Option<usize>,
    print_progress: i32,
}

impl EventAction {
    pub fn new(
        absorber_collection: &str,
        gap_collection: Option<&str>,
        print_progress: i32,
    ) -> EventAction {
        EventAction {
            abs_hc_name: absorber_collection.to_string(),
            gap_hc_name: gap_collection.map(|s| s.to_string()),
            abs_hcid: None,
            gap_hcid: None,
            print_progress,
        }
    }

    pub fn get_hits_collection<'e>(
        &self,
        hc_id: usize,
        event: &'e Event,
    ) -> Result<&'e HitsCollection<CalorHit>, HitsError> {
        event
            .hc_of_this_event()
            .get_hc::<CalorHit>(hc_id)
            .ok_or_else(|| HitsError::not_found_id(hc_id))
    }

    pub fn print_event_statistics(
        &self,
        abso_edep: Float,
        abso_track_length: Float,
        gap_edep: Float,
        gap_track_length: Float,
    ) {
        info!(
            "   Absorber: total energy: {:>7}       total track length: {:>7}",
            best_unit(abso_edep, Category::Energy),
            best_unit(abso_track_length, Category::Length)
        );
        info!(
            "        Gap: total energy: {:>7}       total track length: {:>7}",
            best_unit(gap_edep, Category::Energy),
            best_unit(gap_track_length, Category::Length)
        );
    }

    pub fn begin_of_event_action(&mut self, _event: &Event) {}

    fn resolve_ids(&mut self, registry: &dyn CollectionRegistry) -> Result<(usize, Option<usize>)> {
        if self.abs_hcid.is_none() {
            let abs = registry
                .collection_id(&self.abs_hc_name)
                .context("Could not resolve the absorber hits collection")?;
            let gap = match &self.gap_hc_name {
                Some(name) => Some(
                    registry
                        .collection_id(name)
                        .context("Could not resolve the gap hits collection")?,
                ),
                None => None,
            };
            self.abs_hcid = Some(abs);
            self.gap_hcid = gap;
        }
        let abs = self
            .abs_hcid
            .ok_or_else(|| HitsError::not_found_name(&self.abs_hc_name))?;
        Ok((abs, self.gap_hcid))
    }

    pub fn end_of_event_action(
        &mut self,
        event: &Event,
        registry: &dyn CollectionRegistry,
        ntuple: &mut Ntuple,
    ) -> Result<()> {
        let (abs_hcid, gap_hcid) = self.resolve_ids(registry)?;

        let abso_hc = self
            .get_hits_collection(abs_hcid, event)
            .context(format!("No absorber hits in event {}", event.event_id()))?;

        // the last hit carries the event totals
        let abso_hit = abso_hc.last();

        let event_id = event.event_id();
        if self.print_progress > 0 && event_id % self.print_progress == 0 {
            info!("---> End of event: {}", event_id);
            // nothing calls Hit::add on recorded hits, so these totals stay at zero
            if let Some(abso_hit) = abso_hit {
                let gap_hit = gap_hcid
                    .and_then(|id| self.get_hits_collection(id, event).ok())
                    .and_then(|hc| hc.last());
                let (gap_edep, gap_len) = gap_hit
                    .map(|h| (h.edep(), h.track_length()))
                    .unwrap_or((0.0, 0.0));
                self.print_event_statistics(
                    abso_hit.edep(),
                    abso_hit.track_length(),
                    gap_edep,
                    gap_len,
                );
            }
        }

        let nhits = abso_hc.entries() as i32;
        for hit in abso_hc.iter() {
            let position = hit.position();
            ntuple.fill_i_column(COL_EVT, event_id)?;
            ntuple.fill_i_column(COL_NHITS, nhits)?;
            ntuple.fill_i_column(COL_TRACK_ID, hit.track_id())?;
            ntuple.fill_s_column(COL_PARTICLE, hit.particle())?;
            ntuple.fill_d_column(COL_X, position.x() / CM)?;
            ntuple.fill_d_column(COL_Y, position.y() / CM)?;
            ntuple.fill_d_column(COL_Z, position.z() / CM)?;
            ntuple.fill_d_column(COL_MOM, hit.momentum() / GEV)?;
            ntuple.fill_d_column(COL_TH_X, hit.th_x())?;
            ntuple.fill_d_column(COL_TH_Y, hit.th_y())?;
            ntuple.fill_s_column(COL_PROCESS, hit.process())?;
            ntuple.fill_i_column(COL_PARENT, hit.parent())?;
            ntuple.fill_s_column(COL_CREATOR_PROC, hit.creator_process())?;
            ntuple.add_row();
        }

        Ok(())
    }
}
