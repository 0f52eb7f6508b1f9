#![allow(clippy::new_without_default)]

#[macro_use]
extern crate log;
#[macro_use]
extern crate anyhow;

pub mod api;
pub mod location_stamp;
mod logs;
pub mod main_db;
pub mod statistic;
pub mod statistic_loader;
pub mod storage;
pub mod tour;
pub mod tour_session;
pub mod tour_statistics;
pub mod units;
pub mod utils;
