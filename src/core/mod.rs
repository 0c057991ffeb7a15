pub mod errors;
pub mod interfaces;
pub mod models;
pub mod orchestrators;

#[cfg(test)]
pub mod test_support;
