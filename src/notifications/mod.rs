mod handler;
mod notification;
mod notification_content;

pub use handler::*;
pub use notification::*;
pub use notification_content::*;
