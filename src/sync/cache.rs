//! Local mirror of the backend's user list for the selected part.
//!
//! Each fetch is tagged with a sequence number when it is issued. Only the
//! completion carrying the most recently issued number is applied; anything
//! older is dropped, so a slow response for a previous part can never
//! overwrite a newer one.

use crate::api::types::{Part, User};
use crate::sync::error::SyncError;

/// Sequence number attached to an issued fetch
pub type FetchSeq = u64;

/// Load state of the cache, as shown to the user
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FetchState {
  /// Nothing fetched yet
  #[default]
  Idle,
  /// A fetch is in flight
  Loading,
  /// The last applied fetch succeeded
  Ready,
  /// The last applied fetch failed; records are empty
  Failed(SyncError),
}

impl FetchState {
  pub fn is_loading(&self) -> bool {
    matches!(self, FetchState::Loading)
  }
}

/// Outcome of offering a fetch completion to the cache
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
  /// The records were replaced
  Replaced,
  /// The fetch failed and the records were emptied
  Cleared,
  /// A newer fetch has been issued since; nothing changed
  Stale,
}

#[derive(Debug, Default)]
pub struct RecordCache {
  records: Vec<User>,
  part: Option<Part>,
  state: FetchState,
  issued: FetchSeq,
}

impl RecordCache {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn records(&self) -> &[User] {
    &self.records
  }

  pub fn state(&self) -> &FetchState {
    &self.state
  }

  /// Part the current records belong to, if any have been applied
  pub fn part(&self) -> Option<Part> {
    self.part
  }

  /// Drop all records; used when the filter changes
  pub fn invalidate(&mut self) {
    self.records.clear();
    self.part = None;
  }

  /// Register a new fetch and return its sequence number.
  ///
  /// Any fetch issued before this one becomes stale.
  pub fn begin_fetch(&mut self) -> FetchSeq {
    self.issued += 1;
    self.state = FetchState::Loading;
    self.issued
  }

  /// Whether `seq` is the most recently issued fetch
  pub fn is_current(&self, seq: FetchSeq) -> bool {
    seq == self.issued
  }

  /// Apply a fetch completion if it is still the latest one issued.
  ///
  /// Success replaces the records wholesale, in backend order. Failure
  /// empties them.
  pub fn apply(
    &mut self,
    seq: FetchSeq,
    part: Part,
    result: Result<Vec<User>, SyncError>,
  ) -> Applied {
    if !self.is_current(seq) {
      return Applied::Stale;
    }

    self.part = Some(part);
    match result {
      Ok(records) => {
        self.records = records;
        self.state = FetchState::Ready;
        Applied::Replaced
      }
      Err(e) => {
        self.records.clear();
        self.state = FetchState::Failed(e);
        Applied::Cleared
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn user(id: u64, name: &str, part: &str) -> User {
    User {
      id,
      name: name.to_string(),
      age: 20,
      part: part.to_string(),
    }
  }

  #[test]
  fn test_starts_empty() {
    let cache = RecordCache::new();
    assert!(cache.records().is_empty());
    assert_eq!(cache.state(), &FetchState::Idle);
    assert_eq!(cache.part(), None);
  }

  #[test]
  fn test_apply_replaces_in_order() {
    let mut cache = RecordCache::new();
    let seq = cache.begin_fetch();
    assert!(cache.state().is_loading());

    let records = vec![user(3, "C", "web"), user(1, "A", "web")];
    assert_eq!(
      cache.apply(seq, Part::Web, Ok(records.clone())),
      Applied::Replaced
    );
    assert_eq!(cache.records(), records.as_slice());
    assert_eq!(cache.state(), &FetchState::Ready);
    assert_eq!(cache.part(), Some(Part::Web));
  }

  #[test]
  fn test_failure_empties() {
    let mut cache = RecordCache::new();
    let seq = cache.begin_fetch();
    cache.apply(seq, Part::Web, Ok(vec![user(1, "A", "web")]));

    let seq = cache.begin_fetch();
    let result = cache.apply(seq, Part::Web, Err(SyncError::Status(500)));
    assert_eq!(result, Applied::Cleared);
    assert!(cache.records().is_empty());
    assert_eq!(cache.state(), &FetchState::Failed(SyncError::Status(500)));
  }

  #[test]
  fn test_stale_completion_is_dropped() {
    let mut cache = RecordCache::new();
    let web = cache.begin_fetch();
    let ios = cache.begin_fetch();

    // Newer fetch lands first
    assert_eq!(cache.apply(ios, Part::Ios, Ok(vec![])), Applied::Replaced);
    // Older one arrives late and must not overwrite
    assert_eq!(
      cache.apply(web, Part::Web, Ok(vec![user(1, "A", "web")])),
      Applied::Stale
    );
    assert!(cache.records().is_empty());
    assert_eq!(cache.part(), Some(Part::Ios));
  }

  #[test]
  fn test_stale_failure_does_not_clear() {
    let mut cache = RecordCache::new();
    let old = cache.begin_fetch();
    let new = cache.begin_fetch();
    cache.apply(new, Part::Web, Ok(vec![user(1, "A", "web")]));

    assert_eq!(
      cache.apply(old, Part::Web, Err(SyncError::Network("timeout".into()))),
      Applied::Stale
    );
    assert_eq!(cache.records().len(), 1);
    assert_eq!(cache.state(), &FetchState::Ready);
  }

  #[test]
  fn test_out_of_order_older_first_still_loading() {
    let mut cache = RecordCache::new();
    let old = cache.begin_fetch();
    let new = cache.begin_fetch();

    assert_eq!(
      cache.apply(old, Part::Web, Ok(vec![user(1, "A", "web")])),
      Applied::Stale
    );
    assert!(cache.state().is_loading());
    assert!(cache.records().is_empty());

    cache.apply(new, Part::Ios, Ok(vec![user(2, "B", "ios")]));
    assert_eq!(cache.records()[0].id, 2);
  }
}
