use serde::Serialize;
use strum_macros::{Display, EnumIter};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Display, EnumIter, Serialize)]
pub enum GroupKind {
    Speed,
    Track,
    Time,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Display, EnumIter, Serialize)]
pub enum Terrain {
    Uphill,
    Flat,
    Downhill,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Display, Serialize)]
pub enum LineKind {
    Speed,
    Altitude,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Bar {
    pub terrain: Terrain,
    pub value: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LinePoint {
    pub x: f64,
    pub y: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Line {
    pub kind: LineKind,
    pub points: Vec<LinePoint>,
}

impl Line {
    pub fn new(kind: LineKind) -> Self {
        Line {
            kind,
            points: Vec::new(),
        }
    }

    pub fn add_point(&mut self, x: f64, y: f64) {
        self.points.push(LinePoint { x, y });
    }
}

/// A single entry of a statistic group. Colors, widgets and layout are up to
/// the shell; this only carries the data to draw.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum Statistic {
    Text {
        value: String,
        unit: String,
        caption: String,
    },
    BarChart {
        caption: String,
        unit: String,
        bars: Vec<Bar>,
    },
    LineChart {
        caption: String,
        // upper bound of the y axis
        max_value: f64,
        lines: Vec<Line>,
    },
}

impl Statistic {
    pub fn text(value: impl ToString, unit: &str, caption: &str) -> Self {
        Statistic::Text {
            value: value.to_string(),
            unit: unit.to_string(),
            caption: caption.to_string(),
        }
    }

    pub fn caption(&self) -> &str {
        match self {
            Statistic::Text { caption, .. }
            | Statistic::BarChart { caption, .. }
            | Statistic::LineChart { caption, .. } => caption,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StatisticGroup {
    pub kind: GroupKind,
    pub statistics: Vec<Statistic>,
}

impl StatisticGroup {
    pub fn new(kind: GroupKind) -> Self {
        StatisticGroup {
            kind,
            statistics: Vec::new(),
        }
    }

    pub fn name(&self) -> String {
        self.kind.to_string()
    }

    pub fn add(&mut self, statistic: Statistic) {
        self.statistics.push(statistic);
    }
}
