pub mod config;
pub mod game;
pub mod runner;
pub mod types;

pub use config::EngineConfig;
pub use game::{EngineContext, Game};
pub use runner::GameRunner;
pub use types::{PoolId, ScheduleId, SingleId, SlotId};
