use thiserror::Error;

/// Errors produced while keeping local state in step with the backend
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyncError {
  /// The request could not complete (connect failure, timeout, ...)
  #[error("network failure: {0}")]
  Network(String),

  /// The backend answered with a non-success status
  #[error("backend returned HTTP {0}")]
  Status(u16),

  /// A response arrived but did not have the expected shape
  #[error("unexpected response: {0}")]
  BadResponseShape(String),

  /// A draft failed its checks before anything was sent
  #[error("invalid input: {0}")]
  Validation(#[from] ValidationError),

  /// Update requested while no record is being edited
  #[error("no record is being edited")]
  NotEditing,
}

impl SyncError {
  /// Whether the error was raised before any remote call was issued
  pub fn is_local(&self) -> bool {
    matches!(self, SyncError::Validation(_) | SyncError::NotEditing)
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
  #[error("name is required")]
  EmptyName,
  #[error("age must be a positive whole number")]
  InvalidAge,
  #[error("part is required")]
  EmptyPart,
}
