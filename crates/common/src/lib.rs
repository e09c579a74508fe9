// Common types and serialization for the SearchML plugin

pub mod agent;
pub mod error;
pub mod utils;
pub mod wire;

pub use agent::{ParameterMap, ToolSpec, ToolSpecBuilder};
pub use error::{Error, Result};
pub use wire::{ProtocolVersion, WireReader, WireWriter};
