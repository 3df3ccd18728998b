pub mod ohlcv;
pub mod summary;
pub mod table;
