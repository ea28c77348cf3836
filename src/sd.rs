use crate::error::HitsError;
use crate::hits::{CalorHit, HCofThisEvent, Hit, HitsCollection};
use crate::registry::CollectionRegistry;
use crate::step::Step;
use log::{debug, info};

/// Hooks the transport engine calls on an instrumented volume.
pub trait SensitiveDetector {
    fn name(&self) -> &str;

    fn collection_names(&self) -> &[String];

    /// Start of event: create and register this detector's collections.
    fn initialize(
        &mut self,
        hce: &mut HCofThisEvent,
        registry: &dyn CollectionRegistry,
    ) -> Result<(), HitsError>;

    /// Called for every step inside the volume. `Ok(false)` would mean the
    /// step was not recorded.
    fn process_hits(&mut self, step: &Step, hce: &mut HCofThisEvent) -> Result<bool, HitsError>;

    fn end_of_event(&mut self, _hce: &HCofThisEvent) {}
}

/// Records one `CalorHit` per step taken inside a calorimeter volume.
pub struct CalorimeterSD {
    name: String,
    collection_name: Vec<String>,
    n_cells: usize,
    pub verbose_level: i32,
    hc_id: Option<usize>,
}

impl CalorimeterSD {
    pub fn new(name: &str, hits_collection_name: &str, n_cells: usize) -> CalorimeterSD {
        CalorimeterSD {
            name: name.to_string(),
            collection_name: vec![hits_collection_name.to_string()],
            n_cells,
            verbose_level: 0,
            hc_id: None,
        }
    }

    pub fn n_cells(&self) -> usize {
        self.n_cells
    }

    fn hits_collection_mut<'h>(
        &self,
        hce: &'h mut HCofThisEvent,
    ) -> Result<&'h mut HitsCollection<CalorHit>, HitsError> {
        let id = self
            .hc_id
            .ok_or_else(|| HitsError::not_found_name(&self.collection_name[0]))?;
        hce.get_hc_mut::<CalorHit>(id)
            .ok_or_else(|| HitsError::not_found_id(id))
    }
}

impl SensitiveDetector for CalorimeterSD {
    fn name(&self) -> &str {
        &self.name
    }

    fn collection_names(&self) -> &[String] {
        &self.collection_name
    }

    fn initialize(
        &mut self,
        hce: &mut HCofThisEvent,
        registry: &dyn CollectionRegistry,
    ) -> Result<(), HitsError> {
        let hits_collection = HitsCollection::<CalorHit>::new(&self.name, &self.collection_name[0]);
        let id = registry.collection_id(&self.collection_name[0])?;
        hce.add_hits_collection(id, hits_collection);
        self.hc_id = Some(id);
        Ok(())
    }

    fn process_hits(&mut self, step: &Step, hce: &mut HCofThisEvent) -> Result<bool, HitsError> {
        let hits_collection = self.hits_collection_mut(hce)?;

        let pre_position = step.pre_step_point.position;
        let displace = step.delta_position();

        let track = step.track;
        let parent = track.parent_id;

        let total_momentum = step.pre_step_point.momentum.mag();
        if displace.z == 0.0 {
            debug!(
                "track {}: step with no z displacement, angles are not finite",
                track.track_id
            );
        }
        let th_x = (displace.x / displace.z).atan();
        let th_y = (displace.y / displace.z).atan();

        let process_name = step
            .post_step_point
            .process_defined_step
            .as_ref()
            .map(|p| p.process_name())
            .unwrap_or("");

        let creator_proc_name = if parent > 0 {
            track
                .creator_process
                .as_ref()
                .map(|p| p.process_name())
                .unwrap_or("")
        } else {
            ""
        };

        let mut new_hit = CalorHit::allocate();
        new_hit.set_track_id(track.track_id);
        new_hit.set_particle(&track.particle_name);
        new_hit.set_position(pre_position);
        new_hit.set_momentum(total_momentum);
        new_hit.set_th_x(th_x);
        new_hit.set_th_y(th_y);
        new_hit.set_process(process_name);
        new_hit.set_parent(parent);
        new_hit.set_creator_process(creator_proc_name);

        hits_collection.insert(new_hit);

        Ok(true)
    }

    fn end_of_event(&mut self, hce: &HCofThisEvent) {
        if self.verbose_level > 1 {
            let hits_collection = match self.hc_id.and_then(|id| hce.get_hc::<CalorHit>(id)) {
                Some(hc) => hc,
                None => return,
            };
            info!(
                "-------->Hits Collection: in this event they are {} hits in the {} ({} cells): ",
                hits_collection.entries(),
                self.name,
                self.n_cells
            );
            for hit in hits_collection.iter() {
                hit.print();
            }
        }
    }
}
