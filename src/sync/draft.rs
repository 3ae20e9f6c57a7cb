//! Form state for the shared add/update inputs.
//!
//! The same three input fields serve both creating a new user and editing an
//! existing one. Which one is active is carried by the `Form` variant, never
//! by checking whether an edit record happens to be present.

use crate::api::types::{User, UserBody};
use crate::sync::error::ValidationError;

/// Unvalidated text for the three user fields
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserDraft {
  pub name: String,
  pub age: String,
  pub part: String,
}

impl UserDraft {
  /// Check presence of every field and that age is a positive integer
  pub fn validate(&self) -> Result<UserBody, ValidationError> {
    let name = self.name.trim();
    if name.is_empty() {
      return Err(ValidationError::EmptyName);
    }

    let age = match self.age.trim().parse::<u32>() {
      Ok(age) if age > 0 => age,
      _ => return Err(ValidationError::InvalidAge),
    };

    let part = self.part.trim();
    if part.is_empty() {
      return Err(ValidationError::EmptyPart);
    }

    Ok(UserBody {
      name: name.to_string(),
      age,
      part: part.to_string(),
    })
  }

  pub fn field(&self, field: FormField) -> &str {
    match field {
      FormField::Name => &self.name,
      FormField::Age => &self.age,
      FormField::Part => &self.part,
    }
  }

  pub fn field_mut(&mut self, field: FormField) -> &mut String {
    match field {
      FormField::Name => &mut self.name,
      FormField::Age => &mut self.age,
      FormField::Part => &mut self.part,
    }
  }
}

impl From<&User> for UserDraft {
  fn from(user: &User) -> Self {
    Self {
      name: user.name.clone(),
      age: user.age.to_string(),
      part: user.part.clone(),
    }
  }
}

/// One of the shared input fields
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FormField {
  #[default]
  Name,
  Age,
  Part,
}

impl FormField {
  pub const ALL: [FormField; 3] = [FormField::Name, FormField::Age, FormField::Part];

  pub fn label(&self) -> &'static str {
    match self {
      FormField::Name => "Name",
      FormField::Age => "Age",
      FormField::Part => "Part",
    }
  }

  pub fn next(&self) -> FormField {
    match self {
      FormField::Name => FormField::Age,
      FormField::Age => FormField::Part,
      FormField::Part => FormField::Name,
    }
  }

  pub fn previous(&self) -> FormField {
    match self {
      FormField::Name => FormField::Part,
      FormField::Age => FormField::Name,
      FormField::Part => FormField::Age,
    }
  }
}

/// What the shared inputs are currently bound to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Form {
  /// Filling in a new user
  Creating(UserDraft),
  /// Editing a copy of an existing user.
  ///
  /// `stashed` keeps the create-draft that was in progress so cancelling
  /// the edit puts it back.
  Editing {
    id: u64,
    draft: UserDraft,
    stashed: UserDraft,
  },
}

impl Default for Form {
  fn default() -> Self {
    Form::Creating(UserDraft::default())
  }
}

impl Form {
  /// The draft the inputs currently show
  pub fn draft(&self) -> &UserDraft {
    match self {
      Form::Creating(draft) => draft,
      Form::Editing { draft, .. } => draft,
    }
  }

  pub fn draft_mut(&mut self) -> &mut UserDraft {
    match self {
      Form::Creating(draft) => draft,
      Form::Editing { draft, .. } => draft,
    }
  }

  /// Id of the record being edited, if any
  pub fn editing_id(&self) -> Option<u64> {
    match self {
      Form::Creating(_) => None,
      Form::Editing { id, .. } => Some(*id),
    }
  }

  pub fn is_editing(&self) -> bool {
    matches!(self, Form::Editing { .. })
  }

  /// Bind the inputs to a copy of `user`.
  ///
  /// Selecting another record while already editing replaces the edit but
  /// keeps the original stashed create-draft.
  pub fn start_edit(&mut self, user: &User) {
    let stashed = match std::mem::take(self) {
      Form::Creating(draft) => draft,
      Form::Editing { stashed, .. } => stashed,
    };
    *self = Form::Editing {
      id: user.id,
      draft: UserDraft::from(user),
      stashed,
    };
  }

  /// Drop the edit without sending anything. Returns false if not editing.
  pub fn cancel_edit(&mut self) -> bool {
    match std::mem::take(self) {
      Form::Editing { stashed, .. } => {
        *self = Form::Creating(stashed);
        true
      }
      creating => {
        *self = creating;
        false
      }
    }
  }

  /// After a successful update the inputs go back to the stashed create-draft
  pub(super) fn finish_edit(&mut self) {
    self.cancel_edit();
  }

  /// After a successful create the create-draft is emptied
  pub(super) fn reset_create(&mut self) {
    match self {
      Form::Creating(draft) => *draft = UserDraft::default(),
      Form::Editing { stashed, .. } => *stashed = UserDraft::default(),
    }
  }
}
