pub mod charts;
pub mod processor;
