pub mod models;

#[cfg(test)]
pub(crate) mod test_support;
