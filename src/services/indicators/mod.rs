pub mod backend;
pub mod calculator;
pub mod metrics;
pub mod processor;
pub mod smoothing;
