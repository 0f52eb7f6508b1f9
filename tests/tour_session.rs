pub mod test_utils;

use anyhow::Result;
use biketrack_core::storage::Storage;
use biketrack_core::tour::Tour;
use biketrack_core::tour_session::{
    Destination, GpsStatus, MenuState, Navigation, StartOutcome, TourSession, TrackingButton,
    TrackingService,
};
use tempdir::TempDir;
use test_utils::t0;

#[derive(Default)]
struct FakeService {
    running_for: Option<Tour>,
    fail_to_start: bool,
}

impl TrackingService for FakeService {
    fn is_running(&self) -> bool {
        self.running_for.is_some()
    }

    fn start(&mut self, tour: &Tour) -> Result<()> {
        if self.fail_to_start {
            anyhow::bail!("service refused to start");
        }
        self.running_for = Some(tour.clone());
        Ok(())
    }

    fn stop(&mut self) -> Result<bool> {
        Ok(self.running_for.take().is_some())
    }
}

struct Gps(bool);

impl GpsStatus for Gps {
    fn is_gps_enabled(&self) -> bool {
        self.0
    }
}

fn new_storage(name: &str) -> (TempDir, Storage) {
    let temp_dir = TempDir::new(name).unwrap();
    let storage = Storage::init(temp_dir.path().to_str().unwrap()).unwrap();
    (temp_dir, storage)
}

#[test]
fn new_tour_lifecycle() {
    let (_temp_dir, storage) = new_storage("tour_session-new_tour");
    let mut service = FakeService::default();
    let mut session = TourSession::new(None);

    assert_eq!(session.title(), "New tour");
    assert_eq!(session.tracking_button(&service), TrackingButton::Start);
    assert_eq!(
        session.menu(&service),
        MenuState {
            show_records: false,
            show_map: false,
            show_live_view: false,
        }
    );
    assert_eq!(session.navigate(Destination::Map), None);

    assert_eq!(
        session
            .start_tracking(&storage, &mut service, &Gps(true))
            .unwrap(),
        StartOutcome::Started
    );
    let tour = session.tour().unwrap().clone();
    assert_eq!(service.running_for.as_ref(), Some(&tour));
    assert_eq!(
        storage.with_db_txn(|txn| txn.list_tours()).unwrap(),
        vec![tour.clone()]
    );
    assert_eq!(session.tracking_button(&service), TrackingButton::Stop);
    assert!(session.menu(&service).show_live_view);
    assert!(!session.menu(&service).show_map);

    // a second start does not create another tour
    assert_eq!(
        session
            .start_tracking(&storage, &mut service, &Gps(true))
            .unwrap(),
        StartOutcome::AlreadyRunning
    );
    assert_eq!(storage.with_db_txn(|txn| txn.list_tours()).unwrap().len(), 1);

    assert!(session.stop_tracking(&mut service).unwrap());
    assert_eq!(session.tracking_button(&service), TrackingButton::Continue);
    assert_eq!(
        session.menu(&service),
        MenuState {
            show_records: true,
            show_map: true,
            show_live_view: false,
        }
    );
    assert_eq!(
        session.navigate(Destination::Records),
        Some(Navigation::Records(tour.id))
    );
    assert!(!session.stop_tracking(&mut service).unwrap());

    // continuing keeps recording into the same tour
    session
        .start_tracking(&storage, &mut service, &Gps(true))
        .unwrap();
    assert_eq!(service.running_for.as_ref(), Some(&tour));
    assert_eq!(session.tracking_button(&service), TrackingButton::Stop);
    // records and map stay available once the tour has data
    assert_eq!(
        session.menu(&service),
        MenuState {
            show_records: true,
            show_map: true,
            show_live_view: true,
        }
    );
    assert!(session.stop_tracking(&mut service).unwrap());
    assert_eq!(session.tracking_button(&service), TrackingButton::Continue);
}

#[test]
fn gps_must_be_enabled() {
    let (_temp_dir, storage) = new_storage("tour_session-gps");
    let mut service = FakeService::default();
    let mut session = TourSession::new(None);
    assert_eq!(
        session
            .start_tracking(&storage, &mut service, &Gps(false))
            .unwrap(),
        StartOutcome::GpsDisabled
    );
    assert!(session.tour().is_none());
    assert!(!service.is_running());
    assert!(storage.with_db_txn(|txn| txn.list_tours()).unwrap().is_empty());
}

#[test]
fn service_failure_is_reported() {
    let (_temp_dir, storage) = new_storage("tour_session-failure");
    let mut service = FakeService {
        fail_to_start: true,
        ..Default::default()
    };
    let mut session = TourSession::new(None);
    assert!(session
        .start_tracking(&storage, &mut service, &Gps(true))
        .is_err());
    assert_eq!(session.tracking_button(&service), TrackingButton::Start);
    // the tour row exists, but nothing was recorded into it
    assert!(session.tour().is_some());
    assert!(!session.menu(&service).show_records);
    assert!(!session.menu(&service).show_map);
    assert_eq!(session.navigate(Destination::Records), None);
}

#[test]
fn recorded_tour() {
    let (_temp_dir, storage) = new_storage("tour_session-recorded");
    let tour = storage.with_db_txn(|txn| txn.create_tour(t0())).unwrap();
    let service = FakeService::default();
    let session = TourSession::new(Some(tour.clone()));

    assert_eq!(session.title(), tour.label());
    assert_eq!(session.tracking_button(&service), TrackingButton::Hidden);
    assert!(session.menu(&service).show_records);
    assert_eq!(
        session.navigate(Destination::Map),
        Some(Navigation::Map(tour.id))
    );
    assert_eq!(
        session.navigate(Destination::LiveTracking),
        Some(Navigation::LiveTracking)
    );
}

#[test]
fn recorded_tour_while_tracking_another() {
    let (_temp_dir, storage) = new_storage("tour_session-recorded_while_tracking");
    let tour = storage.with_db_txn(|txn| txn.create_tour(t0())).unwrap();
    let other = storage.with_db_txn(|txn| txn.create_tour(t0())).unwrap();
    let service = FakeService {
        running_for: Some(other),
        ..Default::default()
    };
    let session = TourSession::new(Some(tour));

    assert_eq!(session.tracking_button(&service), TrackingButton::Stop);
    assert_eq!(
        session.menu(&service),
        MenuState {
            show_records: true,
            show_map: true,
            show_live_view: true,
        }
    );
}
