use anyhow::Result;
use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, Row, Transaction};
use std::cmp::Ordering;
use std::error::Error;
use std::path::Path;
use std::str::FromStr;

use crate::location_stamp::LocationStamp;
use crate::tour::{Tour, TourId};
use crate::utils;

/* The main database. `tour` keeps one row per recorded ride and
`location_stamp` keeps every GPS fix the tracking service recorded for it.
Timestamps are stored as milliseconds since epoch.
*/

#[allow(clippy::type_complexity)]
fn open_db_and_run_migration(
    support_dir: &str,
    file_name: &str,
    migrations: &[&dyn Fn(&Transaction) -> Result<()>],
) -> Result<Connection> {
    debug!("open and run migration for {}", file_name);
    let mut conn = Connection::open(Path::new(support_dir).join(file_name))?;
    // sqlite keeps this off unless asked, per connection
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    let tx = conn.transaction()?;

    let version = utils::db::init_metadata_and_get_version(&tx)? as usize;
    let target_version = migrations.len();
    debug!(
        "current version = {}, target_version = {}",
        version, target_version
    );
    match version.cmp(&target_version) {
        Ordering::Equal => (),
        Ordering::Less => {
            for (i, f) in migrations.iter().enumerate().skip(version) {
                info!("running migration for version: {}", i + 1);
                f(&tx)?;
            }
            utils::db::set_version_in_metadata(&tx, target_version as i32)?;
        }
        Ordering::Greater => {
            bail!(
                "version too high: current version = {}, target_version = {}",
                version,
                target_version
            );
        }
    }
    tx.commit()?;
    Ok(conn)
}

fn tour_of_row(row: &Row) -> rusqlite::Result<(i64, i64, Option<String>)> {
    Ok((row.get(0)?, row.get(1)?, row.get(2)?))
}

fn build_tour((id, started_at_ms, name): (i64, i64, Option<String>)) -> Result<Tour> {
    Ok(Tour {
        id: TourId(id),
        started_at: utils::datetime_of_timestamp_ms(started_at_ms)?,
        name,
    })
}

pub struct Txn<'a> {
    db_txn: rusqlite::Transaction<'a>,
}

impl Txn<'_> {
    /// `started_at` is stored with millisecond precision, the returned tour
    /// carries the stored value.
    pub fn create_tour(&mut self, started_at: DateTime<Utc>) -> Result<Tour> {
        let started_at_ms = started_at.timestamp_millis();
        self.db_txn.execute(
            "INSERT INTO tour (started_at, name) VALUES (?1, NULL);",
            (started_at_ms,),
        )?;
        let id = self.db_txn.last_insert_rowid();
        info!("Created tour: id={}", id);
        build_tour((id, started_at_ms, None))
    }

    pub fn get_tour(&self, id: TourId) -> Result<Option<Tour>> {
        let mut query = self
            .db_txn
            .prepare("SELECT id, started_at, name FROM tour WHERE id = ?1;")?;
        match query.query_row((id.0,), tour_of_row).optional()? {
            None => Ok(None),
            Some(row) => Ok(Some(build_tour(row)?)),
        }
    }

    // newest first
    pub fn list_tours(&self) -> Result<Vec<Tour>> {
        let mut query = self
            .db_txn
            .prepare("SELECT id, started_at, name FROM tour ORDER BY started_at DESC, id DESC;")?;
        let mut tours = Vec::new();
        for row in query.query_map((), tour_of_row)? {
            tours.push(build_tour(row?)?);
        }
        Ok(tours)
    }

    pub fn rename_tour(&mut self, id: TourId, name: Option<String>) -> Result<()> {
        let changes = self
            .db_txn
            .execute("UPDATE tour SET name = ?1 WHERE id = ?2;", (name, id.0))?;
        if changes == 1 {
            Ok(())
        } else {
            Err(anyhow!("Failed to find tour with id = {}", id))
        }
    }

    pub fn delete_tour(&mut self, id: TourId) -> Result<()> {
        info!("Deleting tour: id={}", id);
        // stamps go with it, `ON DELETE CASCADE`
        let changes = self
            .db_txn
            .execute("DELETE FROM tour WHERE id = ?1;", (id.0,))?;
        if changes != 1 {
            bail!("Failed to find tour with id = {}", id);
        }
        Ok(())
    }

    /// All stamps of a tour, oldest first.
    pub fn get_location_stamps(&self, tour_id: TourId) -> Result<Vec<LocationStamp>> {
        // `id` breaks ties between stamps with the same timestamp
        let mut query = self.db_txn.prepare(
            "SELECT timestamp_ms, latitude, longitude, altitude, speed FROM location_stamp WHERE tour_id = ?1 ORDER BY timestamp_ms, id;",
        )?;
        let rows = query.query_map((tour_id.0,), |row| {
            let timestamp_ms: i64 = row.get(0)?;
            let latitude: f64 = row.get(1)?;
            let longitude: f64 = row.get(2)?;
            let altitude: f64 = row.get(3)?;
            let speed: f64 = row.get(4)?;
            Ok((timestamp_ms, latitude, longitude, altitude, speed))
        })?;
        let mut stamps = Vec::new();
        for row in rows {
            let (timestamp_ms, latitude, longitude, altitude, speed) = row?;
            stamps.push(LocationStamp {
                timestamp: utils::datetime_of_timestamp_ms(timestamp_ms)?,
                latitude,
                longitude,
                altitude,
                speed,
            });
        }
        Ok(stamps)
    }

    pub fn count_location_stamps(&self, tour_id: TourId) -> Result<i64> {
        Ok(self.db_txn.query_row(
            "SELECT COUNT(*) FROM location_stamp WHERE tour_id = ?1;",
            (tour_id.0,),
            |row| row.get(0),
        )?)
    }
}

pub struct MainDb {
    conn: Connection,
}

impl MainDb {
    pub fn open(support_dir: &str) -> Result<MainDb> {
        let conn = open_db_and_run_migration(
            support_dir,
            "main.db",
            &[&|tx| {
                let sql = "
                CREATE TABLE tour (
                    id             INTEGER PRIMARY KEY AUTOINCREMENT
                                        UNIQUE
                                        NOT NULL,
                    started_at     INTEGER NOT NULL,
                    name           TEXT
                );
                CREATE TABLE location_stamp (
                    id             INTEGER PRIMARY KEY AUTOINCREMENT
                                        UNIQUE
                                        NOT NULL,
                    tour_id        INTEGER NOT NULL
                                        REFERENCES tour (id) ON DELETE CASCADE,
                    timestamp_ms   INTEGER NOT NULL,
                    latitude       REAL    NOT NULL,
                    longitude      REAL    NOT NULL,
                    altitude       REAL    NOT NULL,
                    speed          REAL    NOT NULL
                );
                CREATE INDEX location_stamp_tour_index ON location_stamp (
                    tour_id,
                    timestamp_ms
                );
                CREATE TABLE setting (
                    key               TEXT    PRIMARY KEY
                                              NOT NULL
                                              UNIQUE,
                    value             TEXT
                );
                ";
                for s in sql_split::split(sql) {
                    tx.execute(&s, ())?;
                }
                Ok(())
            }],
        )?;
        Ok(MainDb { conn })
    }

    /// The transaction is only committed when `f` succeeds, any other exit
    /// drops (and so rolls back) it.
    pub fn with_txn<F, O>(&mut self, f: F) -> Result<O>
    where
        F: FnOnce(&mut Txn) -> Result<O>,
    {
        let mut txn = Txn {
            db_txn: self.conn.transaction()?,
        };
        let output = f(&mut txn)?;
        txn.db_txn.commit()?;
        Ok(output)
    }

    pub fn record_location(&mut self, tour_id: TourId, stamp: &LocationStamp) -> Result<()> {
        if !stamp.is_valid() {
            bail!("Refusing to record invalid location stamp: {:?}", stamp);
        }
        // an unknown `tour_id` violates the foreign key and fails the insert
        let tx = self.conn.transaction()?;
        let sql = "INSERT INTO location_stamp (tour_id, timestamp_ms, latitude, longitude, altitude, speed) VALUES (?1, ?2, ?3, ?4, ?5, ?6);";
        tx.prepare_cached(sql)?.execute((
            tour_id.0,
            stamp.timestamp.timestamp_millis(),
            stamp.latitude,
            stamp.longitude,
            stamp.altitude,
            stamp.speed,
        ))?;
        tx.commit()?;
        Ok(())
    }

    fn get_setting<T: FromStr>(&mut self, setting: Setting) -> Result<Option<T>>
    where
        <T as FromStr>::Err: Error + Send + Sync + 'static,
    {
        let tx = self.conn.transaction()?;
        let mut query = tx.prepare("SELECT value FROM setting WHERE key = ?1;")?;
        let result: Option<String> = query
            .query_row([setting.to_db_key()], |row| row.get(0))
            .optional()?;
        match result {
            None => Ok(None),
            Some(s) => {
                let v = FromStr::from_str(&s)?;
                Ok(Some(v))
            }
        }
    }

    pub fn get_setting_with_default<T: FromStr>(&mut self, setting: Setting, default: T) -> T
    where
        <T as FromStr>::Err: Error + Send + Sync + 'static,
    {
        match self.get_setting(setting) {
            Ok(v) => v,
            Err(error) => {
                warn!(
                    "[main_db.get_setting_with_default] setting:{:?}, error:{}",
                    setting, error
                );
                None
            }
        }
        .unwrap_or(default)
    }

    pub fn set_setting<T: ToString>(&mut self, setting: Setting, value: T) -> Result<()> {
        let tx = self.conn.transaction()?;
        let sql = "INSERT OR REPLACE INTO setting (key, value) VALUES (?1, ?2);";
        tx.execute(sql, (setting.to_db_key(), value.to_string()))?;
        tx.commit()?;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy)]
pub enum Setting {
    UnitSystem,
    LogLevel,
}

impl Setting {
    fn to_db_key(self) -> &'static str {
        match self {
            Self::UnitSystem => "UNIT_SYSTEM",
            Self::LogLevel => "LOG_LEVEL",
        }
    }
}
