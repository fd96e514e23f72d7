pub mod config;
pub mod ensemble;
pub mod error;
pub mod features;
pub mod models;
pub mod recommend;
pub mod sampler;
pub mod training;

#[cfg(test)]
mod test_support;
