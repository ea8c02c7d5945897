pub mod registry;
pub mod session;

pub use registry::{SessionRegistry, spawn_ticker};
pub use session::{Phase, QuizEvent, QuizSession};
