use crate::hits::Hit;
use std::any::Any;
use std::ops::Index;

/// Insertion-ordered hits of one sensitive detector for one event.
///
/// Owns its hits; they are handed back to their pool when the collection
/// is dropped.
pub struct HitsCollection<H: Hit> {
    sd_name: String,
    col_name: String,
    hits: Vec<Box<H>>,
}

impl<H: Hit> HitsCollection<H> {
    pub fn new(sd_name: &str, col_name: &str) -> HitsCollection<H> {
        HitsCollection {
            sd_name: sd_name.to_string(),
            col_name: col_name.to_string(),
            hits: Vec::new(),
        }
    }

    /// Appends a hit and returns the new number of entries.
    pub fn insert(&mut self, hit: Box<H>) -> usize {
        self.hits.push(hit);
        self.hits.len()
    }

    pub fn entries(&self) -> usize {
        self.hits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }

    pub fn get(&self, i: usize) -> Option<&H> {
        self.hits.get(i).map(|h| h.as_ref())
    }

    pub fn last(&self) -> Option<&H> {
        self.hits.last().map(|h| h.as_ref())
    }

    pub fn iter(&self) -> impl Iterator<Item = &H> + '_ {
        self.hits.iter().map(|h| h.as_ref())
    }

    pub fn sd_name(&self) -> &str {
        &self.sd_name
    }

    pub fn name(&self) -> &str {
        &self.col_name
    }
}

impl<H: Hit> Index<usize> for HitsCollection<H> {
    type Output = H;
    fn index(&self, i: usize) -> &H {
        &self.hits[i]
    }
}

impl<H: Hit> Drop for HitsCollection<H> {
    fn drop(&mut self) {
        for hit in self.hits.drain(..) {
            hit.release();
        }
    }
}

/// The per-event table of hits collections, indexed by collection id.
#[derive(Default)]
pub struct HCofThisEvent {
    slots: Vec<Option<Box<dyn Any>>>,
}

impl HCofThisEvent {
    pub fn new() -> HCofThisEvent {
        HCofThisEvent { slots: Vec::new() }
    }

    /// Stores `collection` under `id`, replacing whatever was there.
    pub fn add_hits_collection<H: Hit>(&mut self, id: usize, collection: HitsCollection<H>) {
        if id >= self.slots.len() {
            self.slots.resize_with(id + 1, || None);
        }
        self.slots[id] = Some(Box::new(collection));
    }

    /// `None` if nothing is stored under `id` or it holds another hit type.
    pub fn get_hc<H: Hit>(&self, id: usize) -> Option<&HitsCollection<H>> {
        self.slots.get(id)?.as_ref()?.downcast_ref()
    }

    pub fn get_hc_mut<H: Hit>(&mut self, id: usize) -> Option<&mut HitsCollection<H>> {
        self.slots.get_mut(id)?.as_mut()?.downcast_mut()
    }

    /// Number of occupied slots.
    pub fn number_of_collections(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }
}
