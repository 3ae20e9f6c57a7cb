//! Orchestrates remote calls and keeps the local state coherent with them.
//!
//! Every remote call runs as a spawned task and reports back over a channel.
//! Completions are applied here, on the caller's task, so the record cache
//! has a single writer. Mutations never touch the cache directly: a
//! successful create, update or delete is always followed by a full refetch
//! of the selected part.

use crate::api::types::{Part, User};
use crate::sync::backend::UserBackend;
use crate::sync::cache::{Applied, FetchSeq, RecordCache};
use crate::sync::draft::{Form, UserDraft};
use crate::sync::error::SyncError;
use crate::sync::filter::FilterState;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Completion of a remote call, delivered back to the controller
#[derive(Debug)]
pub enum SyncEvent {
  Fetched {
    seq: FetchSeq,
    part: Part,
    result: Result<Vec<User>, SyncError>,
  },
  Created(Result<(), SyncError>),
  Updated {
    id: u64,
    result: Result<(), SyncError>,
  },
  Deleted {
    id: u64,
    result: Result<(), SyncError>,
  },
}

pub struct SyncController<B: UserBackend> {
  backend: Arc<B>,
  filter: FilterState,
  form: Form,
  cache: RecordCache,
  last_error: Option<SyncError>,
  in_flight: usize,
  tx: mpsc::UnboundedSender<SyncEvent>,
  rx: mpsc::UnboundedReceiver<SyncEvent>,
}

impl<B: UserBackend> SyncController<B> {
  /// Create a controller for `part`. Nothing is fetched until `refresh`.
  pub fn new(backend: Arc<B>, part: Part) -> Self {
    let (tx, rx) = mpsc::unbounded_channel();
    Self {
      backend,
      filter: FilterState::new(part),
      form: Form::default(),
      cache: RecordCache::new(),
      last_error: None,
      in_flight: 0,
      tx,
      rx,
    }
  }

  // Accessors for UI rendering

  pub fn part(&self) -> Part {
    self.filter.part()
  }

  pub fn cache(&self) -> &RecordCache {
    &self.cache
  }

  pub fn records(&self) -> &[User] {
    self.cache.records()
  }

  pub fn form(&self) -> &Form {
    &self.form
  }

  /// Mutable access for typing into the shared inputs
  pub fn form_mut(&mut self) -> &mut Form {
    &mut self.form
  }

  /// Last error from any operation, cleared by the next success
  pub fn last_error(&self) -> Option<&SyncError> {
    self.last_error.as_ref()
  }

  pub fn dismiss_error(&mut self) {
    self.last_error = None;
  }

  /// Number of remote calls whose completion has not been applied yet
  pub fn in_flight(&self) -> usize {
    self.in_flight
  }

  // Filter

  /// Switch to `part`, dropping the cached records and fetching afresh
  pub fn select_part(&mut self, part: Part) {
    info!(part = %part, "selecting part");
    self.filter.set(part);
    self.cache.invalidate();
    self.fetch();
  }

  pub fn next_part(&mut self) {
    self.select_part(self.part().next());
  }

  pub fn previous_part(&mut self) {
    self.select_part(self.part().previous());
  }

  /// Refetch the current part
  pub fn refresh(&mut self) {
    self.fetch();
  }

  fn fetch(&mut self) {
    let seq = self.cache.begin_fetch();
    let part = self.part();
    debug!(seq, part = %part, "fetching users");

    self.spawn(move |backend| async move {
      let result = backend.list_users(part).await;
      SyncEvent::Fetched { seq, part, result }
    });
  }

  // Mutations

  /// Create a user from the create-draft.
  ///
  /// An invalid draft is rejected here without any remote call.
  pub fn create(&mut self) -> Result<(), SyncError> {
    let validated = self.create_draft().validate();
    let body = validated.map_err(|e| self.reject(e.into()))?;

    info!(name = %body.name, part = %body.part, "creating user");
    self.spawn(move |backend| async move {
      SyncEvent::Created(backend.create_user(&body).await)
    });
    Ok(())
  }

  /// Send the edit-draft to the backend.
  ///
  /// Requires an active edit; an invalid draft is rejected without any
  /// remote call.
  pub fn update(&mut self) -> Result<(), SyncError> {
    let editing = match &self.form {
      Form::Editing { id, draft, .. } => Some((*id, draft.validate())),
      Form::Creating(_) => None,
    };
    let Some((id, validated)) = editing else {
      return Err(self.reject(SyncError::NotEditing));
    };
    let body = validated.map_err(|e| self.reject(e.into()))?;

    info!(id, "updating user");
    self.spawn(move |backend| async move {
      let result = backend.update_user(id, &body).await;
      SyncEvent::Updated { id, result }
    });
    Ok(())
  }

  /// Delete a user by id. There is no confirmation step.
  pub fn delete(&mut self, id: u64) {
    info!(id, "deleting user");
    self.spawn(move |backend| async move {
      let result = backend.delete_user(id).await;
      SyncEvent::Deleted { id, result }
    });
  }

  /// Create or update depending on what the shared inputs are bound to
  pub fn submit(&mut self) -> Result<(), SyncError> {
    if self.form.is_editing() {
      self.update()
    } else {
      self.create()
    }
  }

  // Edit toggling

  /// Copy the cached record `id` into the edit-draft. Returns false if the
  /// record is not in the cache.
  pub fn edit(&mut self, id: u64) -> bool {
    match self.cache.records().iter().find(|u| u.id == id) {
      Some(user) => {
        debug!(id, "editing user");
        self.form.start_edit(user);
        true
      }
      None => false,
    }
  }

  /// Discard the edit-draft without any remote call
  pub fn cancel_edit(&mut self) -> bool {
    self.form.cancel_edit()
  }

  /// The create-draft, whether or not it is currently shown
  pub fn create_draft(&self) -> &UserDraft {
    match &self.form {
      Form::Creating(draft) => draft,
      Form::Editing { stashed, .. } => stashed,
    }
  }

  // Completion handling

  /// Apply every completion that has already arrived.
  ///
  /// Returns true if anything was applied. Call this from the UI tick.
  pub fn poll(&mut self) -> bool {
    let mut changed = false;
    while let Ok(event) = self.rx.try_recv() {
      self.handle(event);
      changed = true;
    }
    changed
  }

  /// Wait until every issued call, including refetches triggered by
  /// mutations, has completed and been applied.
  pub async fn settle(&mut self) {
    while self.in_flight > 0 {
      match self.rx.recv().await {
        Some(event) => self.handle(event),
        None => break,
      }
    }
  }

  fn handle(&mut self, event: SyncEvent) {
    self.in_flight = self.in_flight.saturating_sub(1);

    match event {
      SyncEvent::Fetched { seq, part, result } => {
        let failure = result.as_ref().err().cloned();
        match self.cache.apply(seq, part, result) {
          Applied::Replaced => {
            debug!(seq, part = %part, count = self.cache.records().len(), "users loaded");
            self.last_error = None;
          }
          Applied::Cleared => {
            if let Some(e) = failure {
              warn!(seq, part = %part, error = %e, "failed to fetch users");
              self.last_error = Some(e);
            }
          }
          Applied::Stale => {
            debug!(seq, part = %part, "discarding stale fetch result");
          }
        }
      }
      SyncEvent::Created(result) => match result {
        Ok(()) => {
          self.form.reset_create();
          self.mutation_succeeded();
        }
        Err(e) => self.mutation_failed("create", e),
      },
      SyncEvent::Updated { id, result } => match result {
        Ok(()) => {
          if self.form.editing_id() == Some(id) {
            self.form.finish_edit();
          }
          self.mutation_succeeded();
        }
        Err(e) => self.mutation_failed("update", e),
      },
      SyncEvent::Deleted { id, result } => match result {
        Ok(()) => {
          debug!(id, "user deleted");
          self.mutation_succeeded();
        }
        Err(e) => self.mutation_failed("delete", e),
      },
    }
  }

  fn mutation_succeeded(&mut self) {
    self.last_error = None;
    self.fetch();
  }

  fn mutation_failed(&mut self, op: &str, e: SyncError) {
    warn!(op, error = %e, "mutation failed");
    self.last_error = Some(e);
  }

  fn reject(&mut self, e: SyncError) -> SyncError {
    debug!(error = %e, "rejected before sending");
    self.last_error = Some(e.clone());
    e
  }

  fn spawn<F, Fut>(&mut self, op: F)
  where
    F: FnOnce(Arc<B>) -> Fut,
    Fut: Future<Output = SyncEvent> + Send + 'static,
  {
    self.in_flight += 1;
    let tx = self.tx.clone();
    let future = op(Arc::clone(&self.backend));
    tokio::spawn(async move {
      // Receiver lives as long as the controller
      let _ = tx.send(future.await);
    });
  }
}

#[cfg(test)]
pub(crate) mod tests {
  use super::*;
  use crate::api::types::UserBody;
  use crate::sync::cache::FetchState;
  use crate::sync::draft::FormField;
  use crate::sync::error::ValidationError;
  use async_trait::async_trait;
  use std::collections::HashMap;
  use std::sync::Mutex;
  use std::time::Duration;

  /// In-memory backend that records every call it receives
  #[derive(Default)]
  pub(crate) struct FakeBackend {
    users: Mutex<Vec<User>>,
    next_id: Mutex<u64>,
    calls: Mutex<Vec<String>>,
    delays: Mutex<HashMap<Part, Duration>>,
    failing: Mutex<Option<SyncError>>,
  }

  impl FakeBackend {
    pub(crate) fn with_users(users: Vec<User>) -> Arc<Self> {
      let next_id = users.iter().map(|u| u.id).max().unwrap_or(0) + 1;
      Arc::new(Self {
        users: Mutex::new(users),
        next_id: Mutex::new(next_id),
        ..Default::default()
      })
    }

    pub(crate) fn calls(&self) -> Vec<String> {
      self.calls.lock().unwrap().clone()
    }

    fn delay(&self, part: Part, delay: Duration) {
      self.delays.lock().unwrap().insert(part, delay);
    }

    fn fail_with(&self, error: Option<SyncError>) {
      *self.failing.lock().unwrap() = error;
    }

    fn record(&self, call: String) -> Result<(), SyncError> {
      self.calls.lock().unwrap().push(call);
      match self.failing.lock().unwrap().clone() {
        Some(e) => Err(e),
        None => Ok(()),
      }
    }

    fn snapshot(&self, part: Part) -> Vec<User> {
      self
        .users
        .lock()
        .unwrap()
        .iter()
        .filter(|u| u.part == part.as_str())
        .cloned()
        .collect()
    }
  }

  #[async_trait]
  impl UserBackend for FakeBackend {
    async fn list_users(&self, part: Part) -> Result<Vec<User>, SyncError> {
      self.record(format!("list {}", part))?;
      let delay = self.delays.lock().unwrap().get(&part).copied();
      if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
      }
      Ok(self.snapshot(part))
    }

    async fn create_user(&self, body: &UserBody) -> Result<(), SyncError> {
      self.record(format!("create {}", body.name))?;
      let mut next_id = self.next_id.lock().unwrap();
      self.users.lock().unwrap().push(User {
        id: *next_id,
        name: body.name.clone(),
        age: body.age,
        part: body.part.clone(),
      });
      *next_id += 1;
      Ok(())
    }

    async fn update_user(&self, id: u64, body: &UserBody) -> Result<(), SyncError> {
      self.record(format!("update {}", id))?;
      let mut users = self.users.lock().unwrap();
      let user = users
        .iter_mut()
        .find(|u| u.id == id)
        .ok_or(SyncError::Status(404))?;
      user.name = body.name.clone();
      user.age = body.age;
      user.part = body.part.clone();
      Ok(())
    }

    async fn delete_user(&self, id: u64) -> Result<(), SyncError> {
      self.record(format!("delete {}", id))?;
      self.users.lock().unwrap().retain(|u| u.id != id);
      Ok(())
    }
  }

  pub(crate) fn user(id: u64, name: &str, age: u32, part: &str) -> User {
    User {
      id,
      name: name.to_string(),
      age,
      part: part.to_string(),
    }
  }

  fn seeded() -> Arc<FakeBackend> {
    FakeBackend::with_users(vec![
      user(1, "Ann", 22, "web"),
      user(2, "Cho", 25, "server"),
      user(3, "Dan", 31, "web"),
    ])
  }

  async fn loaded(backend: &Arc<FakeBackend>, part: Part) -> SyncController<FakeBackend> {
    let mut controller = SyncController::new(Arc::clone(backend), part);
    controller.refresh();
    controller.settle().await;
    controller
  }

  fn fill(controller: &mut SyncController<FakeBackend>, name: &str, age: &str, part: &str) {
    let draft = controller.form_mut().draft_mut();
    *draft.field_mut(FormField::Name) = name.to_string();
    *draft.field_mut(FormField::Age) = age.to_string();
    *draft.field_mut(FormField::Part) = part.to_string();
  }

  #[tokio::test]
  async fn test_fetch_mirrors_backend_order() {
    let backend = FakeBackend::with_users(vec![
      user(9, "Zed", 40, "web"),
      user(2, "Ann", 22, "web"),
      user(5, "Mo", 33, "web"),
    ]);
    let controller = loaded(&backend, Part::Web).await;

    assert_eq!(controller.records(), backend.snapshot(Part::Web).as_slice());
    assert_eq!(controller.cache().state(), &FetchState::Ready);
    assert_eq!(controller.in_flight(), 0);
  }

  #[tokio::test]
  async fn test_switching_parts_refetches() {
    let backend = FakeBackend::with_users(vec![user(1, "Ann", 22, "web")]);
    let mut controller = loaded(&backend, Part::Web).await;
    let web_rows = controller.records().to_vec();
    assert_eq!(web_rows, vec![user(1, "Ann", 22, "web")]);

    controller.select_part(Part::Ios);
    assert!(controller.records().is_empty());
    controller.settle().await;
    assert!(controller.records().is_empty());
    assert_eq!(controller.cache().part(), Some(Part::Ios));

    controller.select_part(Part::Web);
    controller.settle().await;
    assert_eq!(controller.records(), web_rows.as_slice());
    assert_eq!(backend.calls(), vec!["list web", "list ios", "list web"]);
  }

  #[tokio::test]
  async fn test_stale_fetch_never_applied() {
    let backend = seeded();
    backend.delay(Part::Web, Duration::from_millis(50));

    let mut controller = SyncController::new(Arc::clone(&backend), Part::Web);
    controller.refresh();
    controller.select_part(Part::Server);
    controller.settle().await;

    assert_eq!(controller.part(), Part::Server);
    assert_eq!(controller.records(), backend.snapshot(Part::Server).as_slice());
    assert_eq!(controller.cache().part(), Some(Part::Server));
  }

  #[tokio::test]
  async fn test_invalid_create_sends_nothing() {
    let backend = seeded();
    let mut controller = loaded(&backend, Part::Web).await;
    let before = controller.records().to_vec();

    for (name, age, part) in [("", "30", "web"), ("Bo", "", "web"), ("Bo", "x", "web"), ("Bo", "30", "")] {
      fill(&mut controller, name, age, part);
      assert!(matches!(
        controller.create(),
        Err(SyncError::Validation(_))
      ));
    }

    assert_eq!(controller.in_flight(), 0);
    assert_eq!(backend.calls(), vec!["list web"]);
    assert_eq!(controller.records(), before.as_slice());
    assert_eq!(
      controller.last_error(),
      Some(&SyncError::Validation(ValidationError::EmptyPart))
    );
  }

  #[tokio::test]
  async fn test_create_refetches_and_resets_draft() {
    let backend = seeded();
    let mut controller = loaded(&backend, Part::Server).await;

    fill(&mut controller, "Bo", "30", "server");
    controller.create().unwrap();
    controller.settle().await;

    assert_eq!(controller.form(), &Form::Creating(UserDraft::default()));
    assert_eq!(controller.records(), backend.snapshot(Part::Server).as_slice());

    let bo = controller
      .records()
      .iter()
      .find(|u| u.name == "Bo")
      .expect("created user is listed");
    assert_eq!(bo.age, 30);
    assert_eq!(bo.id, 4);
    assert_eq!(
      backend.calls(),
      vec!["list server", "create Bo", "list server"]
    );
  }

  #[tokio::test]
  async fn test_create_for_other_part_is_not_shown() {
    let backend = seeded();
    let mut controller = loaded(&backend, Part::Web).await;

    fill(&mut controller, "Eve", "27", "ios");
    controller.create().unwrap();
    controller.settle().await;

    assert!(controller.records().iter().all(|u| u.name != "Eve"));
    assert_eq!(controller.records().len(), 2);
  }

  #[tokio::test]
  async fn test_delete_removes_after_refetch() {
    let backend = seeded();
    let mut controller = loaded(&backend, Part::Web).await;

    controller.delete(1);
    // Still shown until the refetch lands
    assert!(controller.records().iter().any(|u| u.id == 1));
    controller.settle().await;

    assert!(controller.records().iter().all(|u| u.id != 1));
    assert_eq!(controller.records(), backend.snapshot(Part::Web).as_slice());
  }

  #[tokio::test]
  async fn test_update_without_edit_is_noop() {
    let backend = seeded();
    let mut controller = loaded(&backend, Part::Web).await;

    assert_eq!(controller.update(), Err(SyncError::NotEditing));
    assert_eq!(controller.in_flight(), 0);
    assert_eq!(backend.calls(), vec!["list web"]);
  }

  #[tokio::test]
  async fn test_update_commits_edit() {
    let backend = seeded();
    let mut controller = loaded(&backend, Part::Web).await;
    fill(&mut controller, "draft", "", "");

    assert!(controller.edit(3));
    controller.form_mut().draft_mut().age = "32".to_string();
    // The cache keeps the original until the update is confirmed
    assert_eq!(controller.records()[1].age, 31);

    controller.submit().unwrap();
    controller.settle().await;

    assert!(!controller.form().is_editing());
    assert_eq!(controller.form().draft().name, "draft");
    assert_eq!(controller.records()[1], user(3, "Dan", 32, "web"));
    assert_eq!(backend.calls(), vec!["list web", "update 3", "list web"]);
  }

  #[tokio::test]
  async fn test_invalid_update_sends_nothing() {
    let backend = seeded();
    let mut controller = loaded(&backend, Part::Web).await;

    controller.edit(1);
    controller.form_mut().draft_mut().name.clear();
    assert!(matches!(controller.update(), Err(SyncError::Validation(_))));
    assert!(controller.form().is_editing());
    assert_eq!(backend.calls(), vec!["list web"]);
  }

  #[tokio::test]
  async fn test_cancel_edit_is_local() {
    let backend = seeded();
    let mut controller = loaded(&backend, Part::Web).await;

    assert!(!controller.edit(42));
    assert!(controller.edit(1));
    assert!(controller.cancel_edit());
    assert!(!controller.form().is_editing());
    assert_eq!(controller.in_flight(), 0);
    assert_eq!(backend.calls(), vec!["list web"]);
  }

  #[tokio::test]
  async fn test_fetch_failure_empties_cache() {
    let backend = seeded();
    let mut controller = loaded(&backend, Part::Web).await;
    assert!(!controller.records().is_empty());

    backend.fail_with(Some(SyncError::Status(503)));
    controller.refresh();
    controller.settle().await;

    assert!(controller.records().is_empty());
    assert_eq!(controller.last_error(), Some(&SyncError::Status(503)));
    assert_eq!(
      controller.cache().state(),
      &FetchState::Failed(SyncError::Status(503))
    );

    backend.fail_with(None);
    controller.refresh();
    controller.settle().await;
    assert_eq!(controller.records().len(), 2);
    assert_eq!(controller.last_error(), None);
  }

  #[tokio::test]
  async fn test_failed_mutation_keeps_state() {
    let backend = seeded();
    let mut controller = loaded(&backend, Part::Web).await;
    let before = controller.records().to_vec();

    fill(&mut controller, "Bo", "30", "web");
    backend.fail_with(Some(SyncError::Network("connection refused".into())));
    controller.create().unwrap();
    controller.settle().await;

    assert_eq!(controller.records(), before.as_slice());
    assert_eq!(controller.form().draft().name, "Bo");
    assert!(matches!(
      controller.last_error(),
      Some(SyncError::Network(_))
    ));
    // No refetch after a failed mutation
    assert_eq!(backend.calls(), vec!["list web", "create Bo"]);
  }

  #[tokio::test]
  async fn test_poll_applies_arrived_events() {
    let backend = seeded();
    let mut controller = SyncController::new(Arc::clone(&backend), Part::Web);
    controller.refresh();

    let mut polls = 0;
    while !controller.poll() {
      polls += 1;
      assert!(polls < 100, "fetch never completed");
      tokio::time::sleep(Duration::from_millis(5)).await;
    }
    assert_eq!(controller.records().len(), 2);
  }
}
