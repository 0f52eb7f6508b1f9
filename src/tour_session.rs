use anyhow::Result;
use chrono::Utc;

use crate::storage::Storage;
use crate::tour::{Tour, TourId};

/// The platform service that records location stamps in the background.
pub trait TrackingService {
    fn is_running(&self) -> bool;
    fn start(&mut self, tour: &Tour) -> Result<()>;
    /// Returns `false` if the service was not running.
    fn stop(&mut self) -> Result<bool>;
}

pub trait GpsStatus {
    fn is_gps_enabled(&self) -> bool;
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum StartOutcome {
    Started,
    AlreadyRunning,
    /// The shell should offer to open the location settings.
    GpsDisabled,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TrackingButton {
    Start,
    Stop,
    Continue,
    Hidden,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct MenuState {
    pub show_records: bool,
    pub show_map: bool,
    pub show_live_view: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Destination {
    Records,
    Map,
    LiveTracking,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Navigation {
    Records(TourId),
    Map(TourId),
    LiveTracking,
}

/// State behind the tour screen: which tour is shown and what the user can do
/// with it. A session opened without a tour gets one created when tracking
/// starts.
pub struct TourSession {
    tour: Option<Tour>,
    // opened on a tour that was recorded earlier
    recorded: bool,
    stopped_here: bool,
}

impl TourSession {
    pub fn new(tour: Option<Tour>) -> Self {
        if tour.is_none() {
            info!("No tour was supplied, a new one is created when tracking starts");
        }
        TourSession {
            recorded: tour.is_some(),
            tour,
            stopped_here: false,
        }
    }

    pub fn tour(&self) -> Option<&Tour> {
        self.tour.as_ref()
    }

    pub fn title(&self) -> String {
        match &self.tour {
            Some(tour) => tour.label(),
            None => "New tour".to_string(),
        }
    }

    pub fn start_tracking(
        &mut self,
        storage: &Storage,
        service: &mut dyn TrackingService,
        gps: &dyn GpsStatus,
    ) -> Result<StartOutcome> {
        if !gps.is_gps_enabled() {
            return Ok(StartOutcome::GpsDisabled);
        }
        if service.is_running() {
            return Ok(StartOutcome::AlreadyRunning);
        }
        let tour = match &self.tour {
            Some(tour) => tour.clone(),
            None => {
                let tour = storage.with_db_txn(|txn| txn.create_tour(Utc::now()))?;
                self.tour = Some(tour.clone());
                tour
            }
        };
        if let Err(error) = service.start(&tour) {
            error!("Couldn't start tracking-service: {:?}", error);
            return Err(error);
        }
        info!("Tracking started for tour {}", tour.id);
        Ok(StartOutcome::Started)
    }

    /// After a successful stop the statistics should be reloaded.
    pub fn stop_tracking(&mut self, service: &mut dyn TrackingService) -> Result<bool> {
        match service.stop() {
            Ok(true) => {
                info!("Tracking stopped");
                self.stopped_here = true;
                Ok(true)
            }
            Ok(false) => Ok(false),
            Err(error) => {
                error!("Couldn't stop tracking-service: {:?}", error);
                Err(error)
            }
        }
    }

    pub fn tracking_button(&self, service: &dyn TrackingService) -> TrackingButton {
        if service.is_running() {
            TrackingButton::Stop
        } else if self.stopped_here {
            TrackingButton::Continue
        } else if self.recorded {
            TrackingButton::Hidden
        } else {
            TrackingButton::Start
        }
    }

    /// Records and map need a tour with data: one opened from the list, or
    /// one tracked in this session and stopped at least once. Once shown they
    /// stay, also while tracking continues.
    fn has_data(&self) -> bool {
        self.tour.is_some() && (self.recorded || self.stopped_here)
    }

    pub fn menu(&self, service: &dyn TrackingService) -> MenuState {
        let has_data = self.has_data();
        MenuState {
            show_records: has_data,
            show_map: has_data,
            show_live_view: service.is_running(),
        }
    }

    pub fn navigate(&self, destination: Destination) -> Option<Navigation> {
        let tour = self.tour.as_ref().filter(|_| self.has_data());
        match destination {
            Destination::Records => tour.map(|x| Navigation::Records(x.id)),
            Destination::Map => tour.map(|x| Navigation::Map(x.id)),
            Destination::LiveTracking => Some(Navigation::LiveTracking),
        }
    }
}
