//! Domain model module declarations.

pub mod engine;
pub mod level;
pub mod record;
pub mod status;

pub use engine::{CardioData, CheckinData, EnginePayload, MealData, SourceEngine, TrainingData};
pub use level::LogLevel;
pub use record::{EngineEvent, ExceptionInfo, SystemLogRecord};
pub use status::{EngineStatus, SystemStatus};
