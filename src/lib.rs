// Library interface for glance
// The binary, integration tests and benchmarks all go through these modules

pub mod collector;
pub mod config;
pub mod error;
pub mod fields;
pub mod netcache;
pub mod render;
pub mod snapshot;
pub mod stats;
pub mod text;
pub mod uptime;

pub use collector::Collector;
pub use config::Config;
pub use error::{GlanceError, Result};
pub use fields::{Field, FieldSpec};
pub use render::{render, StyleConfig};
pub use snapshot::Snapshot;
pub use stats::{default_source, Source, StaticSource};
