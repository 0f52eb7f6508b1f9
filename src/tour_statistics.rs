use chrono::{DateTime, Utc};
use itertools::Itertools;
use std::cmp::Ordering;

use crate::location_stamp::LocationStamp;
use crate::statistic::{Bar, GroupKind, Line, LineKind, Statistic, StatisticGroup, Terrain};
use crate::units::UnitFormatter;

/// Altitude changes within this band (meters) count as flat.
pub const FLAT_TOLERANCE: f64 = 0.2;
/// How much the altitude trend line moves per up/down step.
pub const ALTITUDE_TREND_STEP: f64 = 0.1;

#[derive(Clone, Debug, PartialEq)]
pub struct TourStatistics {
    pub speed: StatisticGroup,
    pub track: StatisticGroup,
    pub time: StatisticGroup,
}

impl TourStatistics {
    /// Groups in display order.
    pub fn groups(&self) -> [&StatisticGroup; 3] {
        [&self.speed, &self.track, &self.time]
    }

    pub fn into_groups(self) -> Vec<StatisticGroup> {
        vec![self.speed, self.track, self.time]
    }
}

/// Derives all statistics of one tour. `samples` must be sorted by
/// timestamp. Returns `None` when there is nothing to show.
pub fn compute<F>(samples: &[LocationStamp], formatter: &F) -> Option<TourStatistics>
where
    F: UnitFormatter + ?Sized,
{
    let speed = SpeedSummary::of(samples)?;
    let track = TrackSummary::of(samples)?;
    let time = TimeSummary::of(samples)?;
    Some(TourStatistics {
        speed: speed.into_group(formatter),
        track: track.into_group(formatter),
        time: time.into_group(formatter),
    })
}

#[derive(Clone, Debug, PartialEq)]
pub struct SpeedSummary {
    // m/s
    pub top_speed: f64,
    pub average_speed: f64,
    pub speed_line: Line,
    pub altitude_line: Line,
}

impl SpeedSummary {
    pub fn of(samples: &[LocationStamp]) -> Option<Self> {
        if samples.is_empty() {
            return None;
        }
        let top_speed = samples
            .iter()
            .map(|s| s.speed)
            .fold(f64::NEG_INFINITY, f64::max);
        let average_speed = samples.iter().map(|s| s.speed).sum::<f64>() / samples.len() as f64;

        // only every second stamp, the chart gets too busy otherwise
        let mut speed_line = Line::new(LineKind::Speed);
        for (x, sample) in samples.iter().step_by(2).enumerate() {
            speed_line.add_point(x as f64, sample.speed);
        }

        // the trend line is shifted up to sit in the middle of the speed line
        let mut altitude_line = Line::new(LineKind::Altitude);
        let mut y = 0.0;
        for (i, (last, current)) in samples.iter().tuple_windows().enumerate() {
            match last.altitude.partial_cmp(&current.altitude) {
                Some(Ordering::Greater) => y -= ALTITUDE_TREND_STEP,
                Some(Ordering::Less) => y += ALTITUDE_TREND_STEP,
                _ => (),
            }
            altitude_line.add_point((i + 1) as f64, y + top_speed / 2.0);
        }

        Some(SpeedSummary {
            top_speed,
            average_speed,
            speed_line,
            altitude_line,
        })
    }

    fn into_group<F: UnitFormatter + ?Sized>(self, formatter: &F) -> StatisticGroup {
        let mut group = StatisticGroup::new(GroupKind::Speed);
        group.add(Statistic::text(
            formatter.format_speed(self.top_speed),
            formatter.speed_unit(),
            "Top speed",
        ));
        group.add(Statistic::text(
            formatter.format_speed(self.average_speed),
            formatter.speed_unit(),
            "Average speed",
        ));
        group.add(Statistic::LineChart {
            caption: "Speed over time".to_string(),
            max_value: self.top_speed,
            lines: vec![self.speed_line, self.altitude_line],
        });
        group
    }
}

/// Distances in meters.
#[derive(Clone, Debug, PartialEq)]
pub struct TrackSummary {
    pub total_distance: f64,
    pub uphill_distance: f64,
    pub flat_distance: f64,
    pub downhill_distance: f64,
}

impl TrackSummary {
    /// The first segment only counts towards the total: its end point is
    /// where the altitude comparison starts. From then on every segment is
    /// classified by the altitude change between its two ends.
    pub fn of(samples: &[LocationStamp]) -> Option<Self> {
        if samples.is_empty() {
            return None;
        }
        let mut summary = TrackSummary {
            total_distance: 0.0,
            uphill_distance: 0.0,
            flat_distance: 0.0,
            downhill_distance: 0.0,
        };
        let mut last_altitude = None;
        for (last, current) in samples.iter().tuple_windows() {
            let distance = last.point().distance_to(&current.point());
            summary.total_distance += distance;

            if let Some(last_altitude) = last_altitude {
                let delta: f64 = current.altitude - last_altitude;
                if delta > FLAT_TOLERANCE {
                    summary.uphill_distance += distance;
                } else if delta < -FLAT_TOLERANCE {
                    summary.downhill_distance += distance;
                } else {
                    summary.flat_distance += distance;
                }
            }
            last_altitude = Some(current.altitude);
        }
        Some(summary)
    }

    pub fn distance_of(&self, terrain: Terrain) -> f64 {
        match terrain {
            Terrain::Uphill => self.uphill_distance,
            Terrain::Flat => self.flat_distance,
            Terrain::Downhill => self.downhill_distance,
        }
    }

    fn into_group<F: UnitFormatter + ?Sized>(self, formatter: &F) -> StatisticGroup {
        let mut group = StatisticGroup::new(GroupKind::Track);
        group.add(Statistic::text(
            formatter.format_distance(self.total_distance),
            formatter.distance_unit(),
            "Distance",
        ));
        let bars = [Terrain::Uphill, Terrain::Flat, Terrain::Downhill]
            .into_iter()
            .map(|terrain| Bar {
                terrain,
                value: formatter.distance_value(self.distance_of(terrain)),
            })
            .collect();
        group.add(Statistic::BarChart {
            caption: "Terrain".to_string(),
            unit: formatter.distance_unit().to_string(),
            bars,
        });
        group
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct TimeSummary {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    // truncated, never rounded
    pub elapsed_minutes: i64,
}

impl TimeSummary {
    pub fn of(samples: &[LocationStamp]) -> Option<Self> {
        let start = samples.first()?.timestamp;
        let end = samples.last()?.timestamp;
        Some(TimeSummary {
            start,
            end,
            elapsed_minutes: (end - start).num_seconds() / 60,
        })
    }

    fn into_group<F: UnitFormatter + ?Sized>(self, formatter: &F) -> StatisticGroup {
        let mut group = StatisticGroup::new(GroupKind::Time);
        group.add(Statistic::text(formatter.format_date(self.start), "", "Date"));
        group.add(Statistic::text(
            formatter.format_time(self.start),
            "",
            "Start time",
        ));
        group.add(Statistic::text(formatter.format_time(self.end), "", "End time"));
        group.add(Statistic::text(self.elapsed_minutes, "min", "Overall time"));
        group
    }
}
