mod invocations;

pub use invocations::*;
