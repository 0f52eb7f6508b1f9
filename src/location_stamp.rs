use chrono::{DateTime, Utc};
use geo::{Distance, Geodesic};

#[derive(Clone, Debug, PartialEq)]
pub struct Point {
    pub latitude: f64,
    pub longitude: f64,
}

impl Point {
    fn to_geo(&self) -> geo::Point {
        geo::Point::new(self.longitude, self.latitude)
    }

    /// Distance in meters along the geodesic on the WGS84 ellipsoid. This is
    /// what the phone's location API reports, so the numbers line up with
    /// what the tracking service sees.
    pub fn distance_to(&self, other: &Point) -> f64 {
        Geodesic.distance(self.to_geo(), other.to_geo())
    }
}

/// One GPS fix of a tour.
#[derive(Clone, Debug, PartialEq)]
pub struct LocationStamp {
    pub timestamp: DateTime<Utc>,
    pub latitude: f64,
    pub longitude: f64,
    // meters
    pub altitude: f64,
    // meters per second, as reported by the sensor
    pub speed: f64,
}

impl LocationStamp {
    pub fn point(&self) -> Point {
        Point {
            latitude: self.latitude,
            longitude: self.longitude,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && self.altitude.is_finite()
            && self.speed.is_finite()
    }
}
