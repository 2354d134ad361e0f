pub mod charts;
pub mod config;
pub mod correlation;
pub mod error;
pub mod filters;
pub mod interpolation;
pub mod metrics;
pub mod outputs;
pub mod pipeline;
pub mod ranking;
pub mod report;
pub mod schema;
