mod common;

use calor_hits::analysis::ColumnData;
use calor_hits::error::HitsError;
use calor_hits::event::Event;
use calor_hits::event_action::{book_hits_ntuple, EventAction};
use calor_hits::hits::CalorHit;
use calor_hits::registry::SdManager;
use calor_hits::sd::{CalorimeterSD, SensitiveDetector};
use calor_hits::step::Step;
use itertools::izip;

fn registry() -> SdManager {
    let mut sdm = SdManager::new();
    sdm.register("Absorber", "AbsorberHitsCollection");
    sdm
}

#[test]
fn three_steps_three_rows() {
    let sdm = registry();
    let mut sd = CalorimeterSD::new("Absorber", "AbsorberHitsCollection", 10);
    let mut action = EventAction::new("AbsorberHitsCollection", None, 1);
    let mut nt = book_hits_ntuple("B4");

    let mut event = Event::new(0);
    sd.initialize(event.hc_of_this_event_mut(), &sdm).unwrap();
    let tracks = common::three_tracks();
    for (i, track) in tracks.iter().enumerate() {
        let (pre, post) = common::points(10.0 * i as f64, 1000.0, "eIoni");
        let handled = sd
            .process_hits(&Step::new(track, pre, post), event.hc_of_this_event_mut())
            .unwrap();
        assert!(handled);
    }
    sd.end_of_event(event.hc_of_this_event());

    let hc = event.hc_of_this_event().get_hc::<CalorHit>(0).unwrap();
    assert_eq!(hc.entries(), 3);
    let particles: Vec<&str> = hc.iter().map(|h| h.particle()).collect();
    assert_eq!(particles, vec!["e-", "gamma", "e-"]);

    action.end_of_event_action(&event, &sdm, &mut nt).unwrap();
    assert_eq!(nt.entries(), 3);
    assert_eq!(nt.column("TrackID"), Some(&ColumnData::I(vec![1, 2, 3])));
    assert_eq!(nt.column("Parent"), Some(&ColumnData::I(vec![0, 1, 1])));
    assert_eq!(nt.column("NHits"), Some(&ColumnData::I(vec![3, 3, 3])));
    assert_eq!(
        nt.column("CreatorProc"),
        Some(&ColumnData::S(vec![
            String::new(),
            "eBrem".to_string(),
            "compt".to_string()
        ]))
    );

    // x = 1 mm, y = 2 mm, z = 0, 10, 20 mm; p = 1000 MeV
    assert_eq!(nt.column("X"), Some(&ColumnData::D(vec![0.1, 0.1, 0.1])));
    assert_eq!(nt.column("Z"), Some(&ColumnData::D(vec![0.0, 1.0, 2.0])));
    assert_eq!(nt.column("Mom"), Some(&ColumnData::D(vec![1.0, 1.0, 1.0])));

    // rows mirror the hits one for one
    if let (Some(ColumnData::D(th_x)), Some(ColumnData::S(process))) =
        (nt.column("ThX"), nt.column("Process"))
    {
        for (hit, th_x, process) in izip!(hc.iter(), th_x, process) {
            assert_eq!(hit.th_x(), *th_x);
            assert_eq!(hit.th_x(), (0.5f64 / 5.0).atan());
            assert_eq!(hit.process(), process.as_str());
        }
    } else {
        panic!("ThX and Process columns missing");
    }
}

#[test]
fn zero_steps_zero_rows() {
    let sdm = registry();
    let mut sd = CalorimeterSD::new("Absorber", "AbsorberHitsCollection", 10);
    let mut action = EventAction::new("AbsorberHitsCollection", None, 1);
    let mut nt = book_hits_ntuple("B4");

    let mut event = Event::new(0);
    sd.initialize(event.hc_of_this_event_mut(), &sdm).unwrap();
    sd.end_of_event(event.hc_of_this_event());

    action.end_of_event_action(&event, &sdm, &mut nt).unwrap();
    assert!(event
        .hc_of_this_event()
        .get_hc::<CalorHit>(0)
        .unwrap()
        .is_empty());
    assert_eq!(nt.entries(), 0);
}

#[test]
fn n_steps_n_hits_in_order() {
    let sdm = registry();
    let mut sd = CalorimeterSD::new("Absorber", "AbsorberHitsCollection", 10);
    let mut event = Event::new(7);
    sd.initialize(event.hc_of_this_event_mut(), &sdm).unwrap();

    let track = calor_hits::step::Track::primary(1, "mu-");
    for i in 0..50 {
        let (pre, post) = common::points(i as f64, 5000.0 - i as f64, "Transportation");
        sd.process_hits(&Step::new(&track, pre, post), event.hc_of_this_event_mut())
            .unwrap();
    }
    let hc = event.hc_of_this_event().get_hc::<CalorHit>(0).unwrap();
    assert_eq!(hc.entries(), 50);
    for (i, hit) in hc.iter().enumerate() {
        assert_eq!(hit.position().z, i as f64);
        assert_eq!(hit.momentum(), 5000.0 - i as f64);
    }
}

#[test]
fn rows_accumulate_across_events() {
    let sdm = registry();
    let mut sd = CalorimeterSD::new("Absorber", "AbsorberHitsCollection", 10);
    let mut action = EventAction::new("AbsorberHitsCollection", None, 0);
    let mut nt = book_hits_ntuple("B4");
    let tracks = common::three_tracks();

    for (event_id, n_steps) in [(0, 2), (1, 0), (2, 1)].iter() {
        let mut event = Event::new(*event_id);
        sd.initialize(event.hc_of_this_event_mut(), &sdm).unwrap();
        for track in tracks.iter().take(*n_steps) {
            let (pre, post) = common::points(0.0, 100.0, "eIoni");
            sd.process_hits(&Step::new(track, pre, post), event.hc_of_this_event_mut())
                .unwrap();
        }
        action.end_of_event_action(&event, &sdm, &mut nt).unwrap();
    }
    assert_eq!(nt.column("Evt"), Some(&ColumnData::I(vec![0, 0, 2])));
    assert_eq!(nt.column("NHits"), Some(&ColumnData::I(vec![2, 2, 1])));
}

#[test]
fn unregistered_collection_stops_the_event() {
    let sdm = SdManager::new();
    let mut sd = CalorimeterSD::new("Absorber", "AbsorberHitsCollection", 10);
    let mut event = Event::new(0);
    assert_eq!(
        sd.initialize(event.hc_of_this_event_mut(), &sdm),
        Err(HitsError::not_found_name("AbsorberHitsCollection"))
    );

    let mut action = EventAction::new("AbsorberHitsCollection", None, 0);
    let mut nt = book_hits_ntuple("B4");
    let err = action.end_of_event_action(&event, &sdm, &mut nt).unwrap_err();
    assert!(err.downcast_ref::<HitsError>().is_some());
    assert_eq!(nt.entries(), 0);
}
