use crate::hits::HCofThisEvent;

/// One simulated event as seen by the user hooks.
pub struct Event {
    event_id: i32,
    hce: HCofThisEvent,
}

impl Event {
    pub fn new(event_id: i32) -> Event {
        Event {
            event_id,
            hce: HCofThisEvent::new(),
        }
    }

    pub fn event_id(&self) -> i32 {
        self.event_id
    }

    pub fn hc_of_this_event(&self) -> &HCofThisEvent {
        &self.hce
    }

    pub fn hc_of_this_event_mut(&mut self) -> &mut HCofThisEvent {
        &mut self.hce
    }
}
