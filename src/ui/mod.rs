mod components;
mod renderfns;
mod views;

pub use components::{edit_buffer, InputResult};

use crate::app::{App, Mode};
use crate::sync::UserBackend;
use ratatui::prelude::*;

/// Main draw function
pub fn draw<B: UserBackend>(frame: &mut Frame, app: &App<B>) {
  let chunks = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(1), // Header
      Constraint::Min(3),    // Users
      Constraint::Length(3), // Form
      Constraint::Length(1), // Status bar
    ])
    .split(frame.area());

  let sync = app.sync();

  renderfns::draw_header(frame, chunks[0], app.title(), sync.part());
  views::draw_user_table(
    frame,
    chunks[1],
    sync.cache(),
    sync.part(),
    app.selected(),
    sync.form().editing_id(),
  );
  views::draw_user_form(
    frame,
    chunks[2],
    sync.form(),
    app.focus(),
    *app.mode() == Mode::Form,
  );
  renderfns::draw_footer(
    frame,
    chunks[3],
    sync.last_error(),
    *app.mode() == Mode::Form,
    sync.in_flight(),
  );
}
