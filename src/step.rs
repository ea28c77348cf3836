//! The parts of a transport step a sensitive detector reads. The transport
//! engine fills these; nothing here is computed by this crate.
use crate::vector::ThreeVector;

#[derive(Clone, Debug, PartialEq)]
pub struct Process {
    pub name: String,
}

impl Process {
    pub fn new(name: &str) -> Process {
        Process {
            name: name.to_string(),
        }
    }

    pub fn process_name(&self) -> &str {
        &self.name
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct StepPoint {
    pub position: ThreeVector,
    pub momentum: ThreeVector,
    /// process that limited the step ending at this point
    pub process_defined_step: Option<Process>,
}

impl StepPoint {
    pub fn new(position: ThreeVector, momentum: ThreeVector) -> StepPoint {
        StepPoint {
            position,
            momentum,
            process_defined_step: None,
        }
    }

    pub fn with_process(mut self, name: &str) -> StepPoint {
        self.process_defined_step = Some(Process::new(name));
        self
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Track {
    pub track_id: i32,
    /// 0 for primaries
    pub parent_id: i32,
    pub particle_name: String,
    /// `None` for primaries
    pub creator_process: Option<Process>,
}

impl Track {
    pub fn primary(track_id: i32, particle_name: &str) -> Track {
        Track {
            track_id,
            parent_id: 0,
            particle_name: particle_name.to_string(),
            creator_process: None,
        }
    }

    pub fn secondary(track_id: i32, parent_id: i32, particle_name: &str, creator: &str) -> Track {
        Track {
            track_id,
            parent_id,
            particle_name: particle_name.to_string(),
            creator_process: Some(Process::new(creator)),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Step<'a> {
    pub pre_step_point: StepPoint,
    pub post_step_point: StepPoint,
    pub track: &'a Track,
}

impl<'a> Step<'a> {
    pub fn new(track: &'a Track, pre: StepPoint, post: StepPoint) -> Step<'a> {
        Step {
            pre_step_point: pre,
            post_step_point: post,
            track,
        }
    }

    pub fn delta_position(&self) -> ThreeVector {
        self.post_step_point.position - self.pre_step_point.position
    }
}
