pub mod dto;
mod games;
pub mod response;
mod router;
pub mod validation;

pub use games::games_router;
pub use router::{AppState, create_router};
