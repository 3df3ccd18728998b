pub mod correlation;
pub mod indicators;
pub mod market_data;
pub mod pipeline;
pub mod plotting;
pub mod profiling;
pub mod sentiment;
