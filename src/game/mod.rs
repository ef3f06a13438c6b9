//! Pure game rules: clock arithmetic and foul projections. Storage and HTTP
//! live in [`crate::store`] and [`crate::server`].

mod clock;
mod fouls;

pub use clock::ClockState;
pub use fouls::{FoulSummary, PlayerFoulLine, TeamFoulLine, bonus_free_throws, summarize};
