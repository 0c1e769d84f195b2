#[cfg_attr(not(test), allow(unused_imports))]
#[macro_use]
extern crate approx;

// Organized modules
pub mod geometry;

pub mod config;
pub mod controller;
pub mod draw;
pub mod error;
pub mod evaluator;
pub mod form;
pub mod input;
pub mod network;
pub mod region;
pub mod render;
pub mod results;
pub mod validate;
pub mod viewport;

#[cfg(test)]
mod testing;

pub use geometry::r2;
pub use geometry::transform;

// Re-export key types for external use
pub use config::ClientConfig;
pub use controller::{Controller, Phase, Rejection, Ticket, View};
pub use draw::{DrawCommand, Drawing};
pub use error::{ConfigError, EvaluatorError, ValidationError};
pub use evaluator::{Endpoint, Evaluator, EvaluatorRequest, EvaluatorResponse, Method};
pub use form::{ChoiceGroup, Field, Form};
pub use input::{EditOutcome, NumericInput};
pub use r2::R2;
pub use region::{Region, RegionParameter, SubRegion};
pub use render::{paint, render, Surface, Ticks};
pub use results::{ResultRow, ResultsTable};
pub use validate::Point;
pub use viewport::{BackingSize, Viewport};

/// Parse a log level string into LevelFilter.
pub fn parse_log_level(level: Option<&str>) -> Result<log::LevelFilter, ConfigError> {
    match level {
        Some("error") => Ok(log::LevelFilter::Error),
        Some("warn") => Ok(log::LevelFilter::Warn),
        Some("info") | Some("") | None => Ok(log::LevelFilter::Info),
        Some("debug") => Ok(log::LevelFilter::Debug),
        Some("trace") => Ok(log::LevelFilter::Trace),
        Some(level) => Err(ConfigError::LogLevel(level.to_string())),
    }
}
