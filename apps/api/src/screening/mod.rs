// Candidate screening: single analysis, batch runs, leaderboard and duels.
// All inference goes through the ScreeningOracle seam; nothing here talks HTTP to the model directly.

pub mod analysis;
pub mod batch;
pub mod duel;
pub mod handlers;
pub mod intake;
pub mod models;
pub mod oracle;
pub mod prompts;
pub mod ranking;
pub mod selection;
pub mod session;
