use anyhow::Result;
use log::LevelFilter;
use std::error::Error;
use std::str::FromStr;
use std::sync::Mutex;

use crate::location_stamp::LocationStamp;
use crate::main_db::{MainDb, Setting, Txn};
use crate::tour::TourId;
use crate::units::UnitSystem;

/// Where the statistics get their samples from. Implementations must return
/// the stamps of exactly one tour, ordered by timestamp.
pub trait SampleStore {
    fn location_stamps(&self, tour_id: TourId) -> Result<Vec<LocationStamp>>;
}

pub struct Storage {
    main_db: Mutex<MainDb>,
}

impl Storage {
    pub fn init(support_dir: &str) -> Result<Self> {
        let main_db = MainDb::open(support_dir)?;
        Ok(Storage {
            main_db: Mutex::new(main_db),
        })
    }

    fn lock_main_db(&self) -> Result<std::sync::MutexGuard<'_, MainDb>> {
        self.main_db
            .lock()
            .map_err(|_| anyhow!("main db lock is poisoned"))
    }

    pub fn with_db_txn<F, O>(&self, f: F) -> Result<O>
    where
        F: FnOnce(&mut Txn) -> Result<O>,
    {
        self.lock_main_db()?.with_txn(f)
    }

    pub fn record_location(&self, tour_id: TourId, stamp: &LocationStamp) -> Result<()> {
        self.lock_main_db()?.record_location(tour_id, stamp)
    }

    fn setting_with_default<T: FromStr>(&self, setting: Setting, default: T) -> T
    where
        <T as FromStr>::Err: Error + Send + Sync + 'static,
    {
        match self.lock_main_db() {
            Ok(mut main_db) => main_db.get_setting_with_default(setting, default),
            Err(error) => {
                warn!("[storage.setting_with_default] setting:{:?}, error:{}", setting, error);
                default
            }
        }
    }

    pub fn unit_system(&self) -> UnitSystem {
        self.setting_with_default(Setting::UnitSystem, UnitSystem::default())
    }

    pub fn set_unit_system(&self, unit_system: UnitSystem) -> Result<()> {
        debug!("[storage] unit system set to {}", unit_system);
        self.lock_main_db()?
            .set_setting(Setting::UnitSystem, unit_system)
    }

    pub fn log_level(&self) -> LevelFilter {
        self.setting_with_default(Setting::LogLevel, LevelFilter::Info)
    }

    pub fn set_log_level(&self, level: LevelFilter) -> Result<()> {
        self.lock_main_db()?.set_setting(Setting::LogLevel, level)
    }
}

impl SampleStore for Storage {
    fn location_stamps(&self, tour_id: TourId) -> Result<Vec<LocationStamp>> {
        self.with_db_txn(|txn| txn.get_location_stamps(tour_id))
    }
}
