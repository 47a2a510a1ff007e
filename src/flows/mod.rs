mod control_loop;
mod routing;
mod state;

pub use self::{control_loop::*, routing::*, state::*};
