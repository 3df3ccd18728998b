pub mod polarity;
pub mod scorer;
