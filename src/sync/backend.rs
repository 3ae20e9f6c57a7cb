use crate::api::types::{Part, User, UserBody};
use crate::sync::error::SyncError;
use async_trait::async_trait;

/// The four remote operations the controller needs.
///
/// `UsersClient` talks HTTP; tests plug in an in-memory implementation.
#[async_trait]
pub trait UserBackend: Send + Sync + 'static {
  /// List users for a part, in backend order
  async fn list_users(&self, part: Part) -> Result<Vec<User>, SyncError>;

  async fn create_user(&self, body: &UserBody) -> Result<(), SyncError>;

  async fn update_user(&self, id: u64, body: &UserBody) -> Result<(), SyncError>;

  async fn delete_user(&self, id: u64) -> Result<(), SyncError>;
}
