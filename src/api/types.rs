use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A user record as stored by the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
  /// Server-assigned, never set by the client
  pub id: u64,
  pub name: String,
  pub age: u32,
  pub part: String,
}

/// Validated request body for create and update calls
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserBody {
  pub name: String,
  pub age: u32,
  pub part: String,
}

/// The fixed set of parts users are grouped by
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Part {
  #[default]
  Web,
  Ios,
  Server,
}

impl Part {
  pub const ALL: [Part; 3] = [Part::Web, Part::Ios, Part::Server];

  /// Wire value used in the `part` query parameter
  pub fn as_str(&self) -> &'static str {
    match self {
      Part::Web => "web",
      Part::Ios => "ios",
      Part::Server => "server",
    }
  }

  /// Position in `Part::ALL`
  pub fn index(&self) -> usize {
    match self {
      Part::Web => 0,
      Part::Ios => 1,
      Part::Server => 2,
    }
  }

  /// Next part, wrapping around
  pub fn next(&self) -> Part {
    Part::ALL[(self.index() + 1) % Part::ALL.len()]
  }

  /// Previous part, wrapping around
  pub fn previous(&self) -> Part {
    Part::ALL[(self.index() + Part::ALL.len() - 1) % Part::ALL.len()]
  }
}

impl fmt::Display for Part {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for Part {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_lowercase().as_str() {
      "web" => Ok(Part::Web),
      "ios" => Ok(Part::Ios),
      "server" => Ok(Part::Server),
      other => Err(format!("unknown part '{}' (expected web, ios or server)", other)),
    }
  }
}
