use thiserror::Error;

use super::model::{CLASS_RANGE, SCORE_RANGE};

/// Validation failures raised by roster mutations.
///
/// Any of these aborts the operation and leaves the roster untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RosterError {
    #[error("姓名不能为空")]
    EmptyName,

    #[error("班级必须在 {}..={} 之间 (got {0})", CLASS_RANGE.start(), CLASS_RANGE.end())]
    ClassOutOfRange(i64),

    #[error("分数必须在 {}..={} 之间 (got {0})", SCORE_RANGE.start(), SCORE_RANGE.end())]
    ScoreOutOfRange(i64),
}

pub type Result<T> = std::result::Result<T, RosterError>;
