//! Models module - the generic tag model driver.

mod model_config;
mod model_driver;


pub use model_config::{ModelRunSummary, TagModelConfig};
pub use model_driver::ModelDriver;
