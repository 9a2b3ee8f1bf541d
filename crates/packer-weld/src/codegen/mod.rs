//! Code generation for extension bundles
//!
//! - `webpack`: CommonJS bundler config modules and their JSON form

pub mod webpack;

pub use webpack::{WebpackConfigGenerator, WEBPACK_CONFIG_FILE};
