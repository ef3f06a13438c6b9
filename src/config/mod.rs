mod rules;
mod server;

pub use rules::{DEFAULT_OVERTIME_MS, DEFAULT_QUARTER_MS, GameRules};
pub use server::ServerConfig;
