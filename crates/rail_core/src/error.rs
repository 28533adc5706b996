use thiserror::Error;

use crate::TrainId;

#[derive(Error, Debug)]
pub enum SaveError {
    #[error("malformed save data: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported save version: expected {expected}, found {found}")]
    UnsupportedVersion { found: u32, expected: u32 },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProgramEditError {
    #[error("train {0} is neither active nor scheduled")]
    UnknownTrain(TrainId),

    #[error("order index {index} out of range for a program of {len} orders")]
    IndexOutOfRange { index: usize, len: usize },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DepartureParseError {
    #[error("departure time '{0}' is not in HH:MM form")]
    Format(String),

    #[error("departure time '{0}' is out of range")]
    OutOfRange(String),
}
