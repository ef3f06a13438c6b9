mod event;
mod models;

pub use event::{EventKind, Points, Team};
pub use models::*;
