//! Descriptive statistics over a loaded trip dataset.
//!
//! Four independent aggregators (travel times, stations, trip durations and
//! riders) each take the trips plus the dataset schema and return `None`
//! when the columns they need are absent.

pub mod analyzer;
pub mod duration;
pub mod station;
pub mod time;
pub mod types;
pub mod user;
pub mod utility;
