pub mod analyzers;
pub mod dataset;
pub mod error;
pub mod filter;
pub mod loader;
pub mod output;
pub mod registry;
pub mod session;
pub mod source;
pub mod stats;
pub mod viewer;

pub use error::{Error, Result};
