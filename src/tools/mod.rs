mod errors;
mod registry;
mod tool;
mod tool_builder;

pub use errors::{ToolExecutionError, ToolRegistryError};
pub use registry::*;
pub use tool::*;
pub use tool_builder::*;
