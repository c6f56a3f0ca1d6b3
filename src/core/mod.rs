pub mod calculator;
pub mod compiler;
pub mod datastore;
pub mod engine;
pub mod pathfinding;
pub mod report;

pub use crate::domain::model::{InfoData, RouteResult};
pub use crate::domain::ports::{CompilePipeline, ConfigProvider, Storage};
pub use crate::utils::error::Result;
