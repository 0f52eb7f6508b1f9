use std::sync::mpsc::{self, Receiver, RecvError, TryRecvError};
use std::sync::Arc;
use std::thread;

use crate::storage::SampleStore;
use crate::tour::TourId;
use crate::tour_statistics::{self, TourStatistics};
use crate::units::UnitFormatter;

/// Fetches the stamps of `tour_id` and computes its statistics. A failing
/// store is reported like a tour without data: the caller shows the empty
/// state either way.
pub fn load<S, F>(store: &S, tour_id: TourId, formatter: &F) -> Option<TourStatistics>
where
    S: SampleStore + ?Sized,
    F: UnitFormatter + ?Sized,
{
    let stamps = match store.location_stamps(tour_id) {
        Ok(stamps) => stamps,
        Err(error) => {
            error!(
                "[statistic_loader] failed to load stamps for tour {}: {:?}",
                tour_id, error
            );
            return None;
        }
    };
    debug!("Got {} stamps for tour-ID: {}", stamps.len(), tour_id);
    tour_statistics::compute(&stamps, formatter)
}

/// Runs [`load`] on its own thread. The result is published exactly once;
/// dropping the loader before that simply throws the result away.
pub struct StatisticLoader {
    receiver: Receiver<Option<TourStatistics>>,
}

impl StatisticLoader {
    pub fn spawn<S, F>(store: Arc<S>, tour_id: TourId, formatter: F) -> Self
    where
        S: SampleStore + Send + Sync + 'static + ?Sized,
        F: UnitFormatter + Send + 'static,
    {
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let result = load(store.as_ref(), tour_id, &formatter);
            // the receiving side may be gone already, nobody cares then
            let _ = tx.send(result);
        });
        StatisticLoader { receiver: rx }
    }

    pub fn recv(&self) -> Result<Option<TourStatistics>, RecvError> {
        self.receiver.recv()
    }

    /// `Err(TryRecvError::Empty)` while the computation is still running.
    pub fn try_recv(&self) -> Result<Option<TourStatistics>, TryRecvError> {
        self.receiver.try_recv()
    }
}
