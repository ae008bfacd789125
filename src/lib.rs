pub mod config;
pub mod engine;
pub mod pipeline;
pub mod session;

pub use engine::ledger::{DriveLedger, Field, FieldEdit, Gain, PlayRecord, Side};
pub use session::GameSession;
