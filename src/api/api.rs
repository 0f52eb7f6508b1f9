use std::sync::{Arc, OnceLock};

use anyhow::Result;
use log::LevelFilter;

use crate::location_stamp::LocationStamp;
use crate::statistic_loader::{self, StatisticLoader};
use crate::storage::Storage;
use crate::tour::{Tour, TourId};
use crate::tour_statistics::TourStatistics;
use crate::units::{LocaleFormatter, UnitSystem};
use crate::{logs, utils};

struct MainState {
    storage: Arc<Storage>,
    cache_dir: String,
}

static MAIN_STATE: OnceLock<MainState> = OnceLock::new();

pub fn init(support_dir: String, cache_dir: String) -> Result<()> {
    if MAIN_STATE.get().is_some() {
        warn!("`init` is called multiple times");
        return Ok(());
    }

    let storage = Storage::init(&support_dir)?;

    // the level is a setting, so logging comes up after storage
    if let Err(error) = logs::init(&cache_dir, storage.log_level()) {
        // most likely a logger is already installed, keep using that one
        eprintln!("failed to initialize logging: {}", error);
    }

    let state = MainState {
        storage: Arc::new(storage),
        cache_dir,
    };
    if MAIN_STATE.set(state).is_err() {
        warn!("`init` is called multiple times");
    } else {
        info!("initialized");
    }
    Ok(())
}

fn get() -> Result<&'static MainState> {
    MAIN_STATE
        .get()
        .ok_or_else(|| anyhow!("main state is not initialized"))
}

/// Shared handle for the parts of the shell that drive a `TourSession`.
pub fn storage() -> Result<Arc<Storage>> {
    Ok(get()?.storage.clone())
}

pub fn list_tours() -> Result<Vec<Tour>> {
    get()?.storage.with_db_txn(|txn| txn.list_tours())
}

pub fn get_tour(tour_id: i64) -> Result<Option<Tour>> {
    get()?.storage.with_db_txn(|txn| txn.get_tour(TourId(tour_id)))
}

pub fn rename_tour(tour_id: i64, name: Option<String>) -> Result<()> {
    get()?
        .storage
        .with_db_txn(|txn| txn.rename_tour(TourId(tour_id), name))
}

pub fn delete_tour(tour_id: i64) -> Result<()> {
    get()?
        .storage
        .with_db_txn(|txn| txn.delete_tour(TourId(tour_id)))
}

pub fn record_location(
    tour_id: i64,
    timestamp_ms: i64,
    latitude: f64,
    longitude: f64,
    altitude: f64,
    speed: f64,
) -> Result<()> {
    let stamp = LocationStamp {
        timestamp: utils::datetime_of_timestamp_ms(timestamp_ms)?,
        latitude,
        longitude,
        altitude,
        speed,
    };
    get()?.storage.record_location(TourId(tour_id), &stamp)
}

pub fn unit_system() -> Result<UnitSystem> {
    Ok(get()?.storage.unit_system())
}

pub fn set_unit_system(unit_system: UnitSystem) -> Result<()> {
    get()?.storage.set_unit_system(unit_system)
}

/// `None` means there is nothing to show for this tour, either because it
/// has no stamps or because they could not be loaded.
pub fn load_tour_statistics(tour_id: i64) -> Option<TourStatistics> {
    let state = match get() {
        Ok(state) => state,
        Err(error) => {
            error!("[load_tour_statistics] {}", error);
            return None;
        }
    };
    let formatter = LocaleFormatter::local(state.storage.unit_system());
    statistic_loader::load(state.storage.as_ref(), TourId(tour_id), &formatter)
}

/// Same as `load_tour_statistics`, but off the calling thread.
pub fn spawn_tour_statistics_loader(tour_id: i64) -> Result<StatisticLoader> {
    let state = get()?;
    let formatter = LocaleFormatter::local(state.storage.unit_system());
    Ok(StatisticLoader::spawn(
        state.storage.clone(),
        TourId(tour_id),
        formatter,
    ))
}

/// The groups as a JSON array, in display order.
pub fn load_tour_statistics_json(tour_id: i64) -> Result<Option<String>> {
    match load_tour_statistics(tour_id) {
        None => Ok(None),
        Some(statistics) => Ok(Some(serde_json::to_string(&statistics.into_groups())?)),
    }
}

/// Persisted, and applied right away.
pub fn set_log_level(level: LevelFilter) -> Result<()> {
    get()?.storage.set_log_level(level)?;
    logs::set_level(level);
    Ok(())
}

pub fn export_logs(target_file_path: String) -> Result<()> {
    logs::export(&get()?.cache_dir, &target_file_path)
}
