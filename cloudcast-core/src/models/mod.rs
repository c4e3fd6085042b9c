mod message;
mod organization;
mod project;
mod task;
mod user;

pub use message::*;
pub use organization::*;
pub use project::*;
pub use task::*;
pub use user::*;
