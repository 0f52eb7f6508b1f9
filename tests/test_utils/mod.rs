#![allow(dead_code)]

use biketrack_core::location_stamp::LocationStamp;
use biketrack_core::units::{LocaleFormatter, UnitSystem};
use chrono::{DateTime, Duration, FixedOffset, TimeZone, Utc};
use rand::Rng;

pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2023, 9, 17, 9, 30, 0).unwrap()
}

pub fn stamp(seconds: i64, latitude: f64, longitude: f64, altitude: f64, speed: f64) -> LocationStamp {
    LocationStamp {
        timestamp: t0() + Duration::seconds(seconds),
        latitude,
        longitude,
        altitude,
        speed,
    }
}

pub fn utc_formatter(unit_system: UnitSystem) -> LocaleFormatter {
    LocaleFormatter::new(unit_system, FixedOffset::east_opt(0).unwrap())
}

/// A wobbly ride heading north-east, one stamp per second.
pub fn random_tour<R: Rng>(rng: &mut R, len: usize) -> Vec<LocationStamp> {
    let mut latitude = 31.23;
    let mut longitude = 121.47;
    let mut altitude = 10.0;
    (0..len)
        .map(|i| {
            latitude += rng.random_range(0.0..0.0001);
            longitude += rng.random_range(0.0..0.0001);
            altitude += rng.random_range(-1.0..1.0);
            stamp(i as i64, latitude, longitude, altitude, rng.random_range(0.0..15.0))
        })
        .collect()
}
