use chrono::{DateTime, Utc};
use std::fmt;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct TourId(pub i64);

impl fmt::Display for TourId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A recorded ride. Only tours that exist in the database are represented by
/// this type, a session without a tour simply has `None`.
#[derive(Clone, Debug, PartialEq)]
pub struct Tour {
    pub id: TourId,
    pub started_at: DateTime<Utc>,
    pub name: Option<String>,
}

impl Tour {
    pub fn label(&self) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => format!("Tour from {}", self.started_at.format("%Y-%m-%d %H:%M")),
        }
    }
}

impl fmt::Display for Tour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}
