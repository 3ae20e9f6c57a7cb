//! Client-side state kept in step with the users backend.
//!
//! - `FilterState`: the selected part
//! - `Form`: the shared add/update inputs, either creating or editing
//! - `RecordCache`: the users of the selected part, as last fetched
//! - `SyncController`: issues remote calls and applies their completions

mod backend;
mod cache;
mod controller;
mod draft;
mod error;
mod filter;

pub use backend::UserBackend;
pub use cache::{FetchState, RecordCache};
pub use controller::SyncController;
pub use draft::{Form, FormField, UserDraft};
pub use error::SyncError;

#[cfg(test)]
pub(crate) use controller::tests::{user, FakeBackend};
