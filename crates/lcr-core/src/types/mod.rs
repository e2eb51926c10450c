//! Record types for problems, reviews, and timer sessions.

mod problem;
mod review;
mod session;

pub use problem::{Difficulty, Problem};
pub use review::{ChainId, Review, ReviewStatus};
pub use session::Session;
