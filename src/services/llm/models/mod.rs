pub mod base;
pub mod chat;
pub mod errors;
pub mod wire;

pub use base::*;
pub use chat::*;
pub use errors::*;
