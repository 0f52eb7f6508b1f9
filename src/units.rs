use chrono::{DateTime, FixedOffset, Local, Utc};
use strum_macros::{Display, EnumString};

const METERS_PER_KILOMETER: f64 = 1000.0;
const METERS_PER_MILE: f64 = 1609.344;
const MPS_TO_KMH: f64 = 3.6;
const MPS_TO_MPH: f64 = 3600.0 / METERS_PER_MILE;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum UnitSystem {
    #[default]
    Metric,
    Imperial,
}

/// Everything the statistics need to know about how numbers are shown to the
/// user. Values are always handed in as meters and meters per second.
pub trait UnitFormatter {
    fn distance_value(&self, meters: f64) -> f64;
    fn distance_unit(&self) -> &str;
    fn speed_value(&self, meters_per_second: f64) -> f64;
    fn speed_unit(&self) -> &str;
    fn format_date(&self, time: DateTime<Utc>) -> String;
    fn format_time(&self, time: DateTime<Utc>) -> String;

    fn format_distance(&self, meters: f64) -> String {
        format!("{:.2}", self.distance_value(meters))
    }

    fn format_speed(&self, meters_per_second: f64) -> String {
        format!("{:.1}", self.speed_value(meters_per_second))
    }
}

#[derive(Clone, Debug)]
pub struct LocaleFormatter {
    pub unit_system: UnitSystem,
    pub offset: FixedOffset,
}

impl LocaleFormatter {
    pub fn new(unit_system: UnitSystem, offset: FixedOffset) -> Self {
        Self {
            unit_system,
            offset,
        }
    }

    /// Uses the device's current UTC offset.
    pub fn local(unit_system: UnitSystem) -> Self {
        Self::new(unit_system, *Local::now().offset())
    }
}

impl UnitFormatter for LocaleFormatter {
    fn distance_value(&self, meters: f64) -> f64 {
        match self.unit_system {
            UnitSystem::Metric => meters / METERS_PER_KILOMETER,
            UnitSystem::Imperial => meters / METERS_PER_MILE,
        }
    }

    fn distance_unit(&self) -> &str {
        match self.unit_system {
            UnitSystem::Metric => "km",
            UnitSystem::Imperial => "mi",
        }
    }

    fn speed_value(&self, meters_per_second: f64) -> f64 {
        match self.unit_system {
            UnitSystem::Metric => meters_per_second * MPS_TO_KMH,
            UnitSystem::Imperial => meters_per_second * MPS_TO_MPH,
        }
    }

    fn speed_unit(&self) -> &str {
        match self.unit_system {
            UnitSystem::Metric => "km/h",
            UnitSystem::Imperial => "mph",
        }
    }

    fn format_date(&self, time: DateTime<Utc>) -> String {
        time.with_timezone(&self.offset)
            .format("%-d. %b %Y")
            .to_string()
    }

    fn format_time(&self, time: DateTime<Utc>) -> String {
        time.with_timezone(&self.offset).format("%H:%M").to_string()
    }
}
