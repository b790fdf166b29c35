pub mod arcade;
pub mod render;

pub use arcade::{ArcadeService, GuessSummary, JoinReply};
