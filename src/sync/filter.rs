use crate::api::types::Part;

/// The currently selected part.
///
/// Only changed by user selection; the controller reacts to every change by
/// invalidating the cache and fetching the new part.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilterState {
  part: Part,
}

impl FilterState {
  pub fn new(part: Part) -> Self {
    Self { part }
  }

  pub fn part(&self) -> Part {
    self.part
  }

  pub(super) fn set(&mut self, part: Part) {
    self.part = part;
  }
}
