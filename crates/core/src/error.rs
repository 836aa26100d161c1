use crate::bounds::HorizontalAlign;

/// Hard errors that abort processing of a whole text entity
///
/// Nothing is committed when one of these is returned.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LeaderError {
    #[error("invalid horizontal alignment `{}`", .0.as_str())]
    InvalidAlignment(HorizontalAlign),
    #[error("commanded angle {0} must lie strictly between 0 and 90 degrees")]
    InvalidAngle(f64),
    #[error("view scale {0} must be a positive finite number")]
    InvalidScale(f64),
}

pub type LeaderResult<T> = Result<T, LeaderError>;
