pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::{CompileCliConfig, RouteCliConfig};

pub use crate::adapters::LocalStorage;
pub use crate::config::{OutputFormat, TomlConfig};
pub use crate::core::{
    calculator::{RouteCalculator, RouteRequest},
    compiler::DataCompiler,
    engine::{CompileEngine, CompileSummary},
};
pub use crate::domain::model::RouteResult;
pub use crate::utils::error::{Result, RouteError};
