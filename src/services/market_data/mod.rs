pub mod returns;
pub mod standardizer;
