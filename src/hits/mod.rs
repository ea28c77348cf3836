use crate::units::{best_unit, Category, GEV};
use crate::vector::ThreeVector;
use crate::Float;
use log::info;
use std::cell::RefCell;
use std::fmt;

pub mod allocator;
pub mod collection;

use crate::hits::allocator::{Allocator, AllocatorStats};
pub use crate::hits::collection::{HCofThisEvent, HitsCollection};

/// What the framework needs from a hit type: it can be created, compared,
/// printed and accumulated into.
pub trait Hit: PartialEq + 'static {
    fn allocate() -> Box<Self>
    where
        Self: Sized;

    /// Hands a hit back once its collection is done with it.
    fn release(self: Box<Self>)
    where
        Self: Sized,
    {
        drop(self)
    }

    /// Hits are data only, so there is nothing to draw.
    fn draw(&self) {}

    fn print(&self);

    fn add(&mut self, de: Float, dl: Float);
}

/// One step of a track inside a calorimeter volume.
///
/// The nine step observables are written once by the sensitive detector
/// and only read afterwards. `edep` and `track_length` are accumulators
/// that start at zero and only change through `Hit::add`.
#[derive(Clone, Debug, Default)]
pub struct CalorHit {
    track_id: i32,
    particle: String,
    position: ThreeVector,
    momentum: Float,
    th_x: Float,
    th_y: Float,
    process: String,
    parent: i32,
    creator_process: String,
    edep: Float,
    track_length: Float,
}

thread_local! {
    static CALOR_HIT_ALLOCATOR: RefCell<Option<Allocator<CalorHit>>> = RefCell::new(None);
}

impl CalorHit {
    /// Statistics of this thread's hit pool. The pool is created on first use.
    pub fn pool_stats() -> AllocatorStats {
        CALOR_HIT_ALLOCATOR.with(|cell| {
            cell.borrow_mut()
                .get_or_insert_with(Allocator::new)
                .stats()
        })
    }

    pub fn set_track_id(&mut self, trkid: i32) {
        self.track_id = trkid;
    }
    pub fn track_id(&self) -> i32 {
        self.track_id
    }

    pub fn set_particle(&mut self, particle: &str) {
        self.particle = particle.to_string();
    }
    pub fn particle(&self) -> &str {
        &self.particle
    }

    pub fn set_position(&mut self, position: ThreeVector) {
        self.position = position;
    }
    pub fn position(&self) -> ThreeVector {
        self.position
    }

    pub fn set_momentum(&mut self, mom: Float) {
        self.momentum = mom;
    }
    pub fn momentum(&self) -> Float {
        self.momentum
    }

    pub fn set_th_x(&mut self, th_x: Float) {
        self.th_x = th_x;
    }
    pub fn th_x(&self) -> Float {
        self.th_x
    }

    pub fn set_th_y(&mut self, th_y: Float) {
        self.th_y = th_y;
    }
    pub fn th_y(&self) -> Float {
        self.th_y
    }

    pub fn set_process(&mut self, process: &str) {
        self.process = process.to_string();
    }
    pub fn process(&self) -> &str {
        &self.process
    }

    pub fn set_parent(&mut self, parent: i32) {
        self.parent = parent;
    }
    pub fn parent(&self) -> i32 {
        self.parent
    }

    pub fn set_creator_process(&mut self, creator_process: &str) {
        self.creator_process = creator_process.to_string();
    }
    pub fn creator_process(&self) -> &str {
        &self.creator_process
    }

    pub fn edep(&self) -> Float {
        self.edep
    }
    pub fn track_length(&self) -> Float {
        self.track_length
    }
}

impl Hit for CalorHit {
    fn allocate() -> Box<CalorHit> {
        CALOR_HIT_ALLOCATOR.with(|cell| {
            cell.borrow_mut()
                .get_or_insert_with(Allocator::new)
                .malloc_single()
        })
    }

    fn release(self: Box<CalorHit>) {
        // During thread teardown the pool may already be gone; the box is
        // then simply dropped.
        let mut hit = Some(self);
        let _ = CALOR_HIT_ALLOCATOR.try_with(|cell| {
            if let (Ok(mut slot), Some(h)) = (cell.try_borrow_mut(), hit.take()) {
                slot.get_or_insert_with(Allocator::new).free_single(h);
            }
        });
    }

    fn print(&self) {
        info!("{}", self);
    }

    fn add(&mut self, de: Float, dl: Float) {
        self.edep += de;
        self.track_length += dl;
    }
}

// Identity is the recorded step, the accumulators are left out.
impl PartialEq for CalorHit {
    fn eq(&self, other: &CalorHit) -> bool {
        self.track_id == other.track_id
            && self.particle == other.particle
            && self.position == other.position
            && self.momentum == other.momentum
            && self.th_x == other.th_x
            && self.th_y == other.th_y
            && self.process == other.process
            && self.parent == other.parent
            && self.creator_process == other.creator_process
    }
}

impl fmt::Display for CalorHit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "trackID: {} particle: {} position: ({}, {}, {}) momentum: {:.6} GeV \
             thX: {:.6} thY: {:.6} process: {} parent: {} creator: {} \
             Edep: {} track length: {}",
            self.track_id,
            self.particle,
            best_unit(self.position.x, Category::Length),
            best_unit(self.position.y, Category::Length),
            best_unit(self.position.z, Category::Length),
            self.momentum / GEV,
            self.th_x,
            self.th_y,
            self.process,
            self.parent,
            self.creator_process,
            best_unit(self.edep, Category::Energy),
            best_unit(self.track_length, Category::Length),
        )
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;

    pub fn filled_hit() -> Box<CalorHit> {
        let mut h = CalorHit::allocate();
        h.set_track_id(2);
        h.set_particle("gamma");
        h.set_position(ThreeVector::new(1.0, -2.0, 30.0));
        h.set_momentum(1500.0);
        h.set_th_x(0.01);
        h.set_th_y(-0.02);
        h.set_process("compt");
        h.set_parent(1);
        h.set_creator_process("eBrem");
        h
    }

    #[test]
    fn getters_return_what_was_set() {
        let h = filled_hit();
        assert_eq!(h.track_id(), 2);
        assert_eq!(h.particle(), "gamma");
        assert_eq!(h.position(), ThreeVector::new(1.0, -2.0, 30.0));
        assert_eq!(h.momentum(), 1500.0);
        assert_eq!(h.th_x(), 0.01);
        assert_eq!(h.th_y(), -0.02);
        assert_eq!(h.process(), "compt");
        assert_eq!(h.parent(), 1);
        assert_eq!(h.creator_process(), "eBrem");
        h.draw();
        // reading twice changes nothing
        assert_eq!(h.particle(), "gamma");
        assert_eq!(h.momentum(), 1500.0);
    }

    #[test]
    fn equality_covers_every_observable() {
        let a = filled_hit();
        assert!(*a == *filled_hit());

        let mut b = filled_hit();
        b.set_th_y(0.0);
        assert!(*a != *b);

        let mut c = filled_hit();
        c.set_creator_process("");
        assert!(*a != *c);

        let mut d = filled_hit();
        d.set_position(ThreeVector::new(1.0, -2.0, 30.5));
        assert!(*a != *d);
    }

    #[test]
    fn accumulators_are_not_part_of_identity() {
        let a = filled_hit();
        let mut b = filled_hit();
        b.add(0.5, 2.0);
        b.add(0.25, 1.0);
        assert_eq!(b.edep(), 0.75);
        assert_eq!(b.track_length(), 3.0);
        assert!(*a == *b);
    }

    #[test]
    fn pooled_hits_come_back_empty() {
        let h = filled_hit();
        h.release();
        let reused = CalorHit::allocate();
        assert_eq!(*reused, CalorHit::default());
        assert!(CalorHit::pool_stats().reused >= 1);
    }

    #[test]
    fn display_reports_in_readable_units() {
        let line = filled_hit().to_string();
        assert!(line.starts_with("trackID: 2 particle: gamma"));
        assert!(line.contains("position: (1 mm, -2 mm, 3 cm)"));
        assert!(line.contains("momentum: 1.500000 GeV"));
        assert!(line.contains("creator: eBrem"));
    }
}
