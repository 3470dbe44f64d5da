mod cache;
#[cfg(test)]
pub mod fake;
pub mod gateway;
pub mod tree;
