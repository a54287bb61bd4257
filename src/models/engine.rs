//! Source engines and their event payloads.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::status::join;
use crate::AppError;

/// Engine that produced an LST Master event.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceEngine {
    /// Meal delivery and compliance.
    Meal,
    /// Strength training sets.
    Training,
    /// Daily wellness check-ins.
    Checkin,
    /// Cardio sessions.
    Cardio,
}

impl SourceEngine {
    /// Every accepted engine.
    pub const ALL: [Self; 4] = [Self::Meal, Self::Training, Self::Checkin, Self::Cardio];

    /// Wire name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Meal => "meal",
            Self::Training => "training",
            Self::Checkin => "checkin",
            Self::Cardio => "cardio",
        }
    }

    /// Name of the sink that receives this engine's events.
    #[must_use]
    pub fn sink_name(self) -> String {
        format!("engine_{}", self.as_str())
    }
}

impl Display for SourceEngine {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SourceEngine {
    type Err = AppError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|engine| engine.as_str() == raw)
            .ok_or_else(|| {
                AppError::Schema(format!(
                    "invalid source_engine: {raw}. Must be one of {}",
                    join(Self::ALL.iter().map(|e| e.as_str()))
                ))
            })
    }
}

/// Meal event payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealData {
    /// Plan-scoped meal identifier, e.g. `planC_meal3`.
    pub meal_id: String,
    /// Fields the schema does not name; carried through untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Training set payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingData {
    /// Exercise catalogue identifier.
    pub exercise_id: String,
    /// Human-readable exercise name.
    pub exercise_name: String,
    /// Load lifted.
    pub weight_kg: f64,
    /// Repetitions completed.
    pub reps: i64,
    /// Training block identifier.
    pub block_id: String,
    /// Day position inside the block.
    pub day_index: i64,
    /// Fields the schema does not name; carried through untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Check-in payload. The wellness fields are free text (often emoji).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckinData {
    /// Body weight.
    pub weight: f64,
    /// Mood marker.
    pub mood: String,
    /// Soreness marker.
    pub soreness: String,
    /// Stress marker.
    pub stress: String,
    /// Sleep marker.
    pub sleep: String,
    /// Optional client note.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Fields the schema does not name; carried through untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Cardio session payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardioData {
    /// Minutes prescribed.
    pub assigned_minutes: i64,
    /// Minutes performed.
    pub actual_minutes: i64,
    /// Fields the schema does not name; carried through untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Engine-specific `data` of an LST Master record.
///
/// Serializes as the bare payload mapping; the engine is recorded
/// separately in `source_engine`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum EnginePayload {
    /// `source_engine = meal`.
    Meal(MealData),
    /// `source_engine = training`.
    Training(TrainingData),
    /// `source_engine = checkin`.
    Checkin(CheckinData),
    /// `source_engine = cardio`.
    Cardio(CardioData),
}

impl EnginePayload {
    /// Engine this payload belongs to.
    #[must_use]
    pub fn engine(&self) -> SourceEngine {
        match self {
            Self::Meal(_) => SourceEngine::Meal,
            Self::Training(_) => SourceEngine::Training,
            Self::Checkin(_) => SourceEngine::Checkin,
            Self::Cardio(_) => SourceEngine::Cardio,
        }
    }

    /// Decode a payload mapping for the given engine.
    ///
    /// Performs only serde decoding; run
    /// [`crate::validation::validate_engine_data`] first for rule-by-rule
    /// error messages.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Schema` if the mapping does not decode.
    pub fn from_value(engine: SourceEngine, data: Value) -> crate::Result<Self> {
        let decoded = match engine {
            SourceEngine::Meal => serde_json::from_value(data).map(Self::Meal),
            SourceEngine::Training => serde_json::from_value(data).map(Self::Training),
            SourceEngine::Checkin => serde_json::from_value(data).map(Self::Checkin),
            SourceEngine::Cardio => serde_json::from_value(data).map(Self::Cardio),
        };
        decoded.map_err(|err| AppError::Schema(format!("{engine} data does not decode: {err}")))
    }
}
