use crate::api::types::{Part, User};
use crate::event::{Event, EventHandler};
use crate::sync::{FormField, SyncController, UserBackend};
use crate::ui::{self, edit_buffer, InputResult};
use color_eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal::{
  disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use ratatui::prelude::*;
use std::io::stdout;
use std::time::Duration;
use tracing::info;

/// Input mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
  /// Browsing the table
  Normal,
  /// Typing into the shared form
  Form,
}

/// Main application state
pub struct App<B: UserBackend> {
  sync: SyncController<B>,

  /// Current input mode
  mode: Mode,

  /// Form field receiving typed characters
  focus: FormField,

  /// Selected row in the user table
  selected: usize,

  /// Header title
  title: String,

  /// Whether to quit
  should_quit: bool,
}

impl<B: UserBackend> App<B> {
  pub fn new(sync: SyncController<B>, title: String) -> Self {
    Self {
      sync,
      mode: Mode::Normal,
      focus: FormField::default(),
      selected: 0,
      title,
      should_quit: false,
    }
  }

  pub async fn run(&mut self) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    let mut events = EventHandler::new(Duration::from_millis(100));

    // Initial data load
    info!(part = %self.sync.part(), "starting");
    self.sync.refresh();

    let result = self.event_loop(&mut terminal, &mut events).await;

    // Cleanup terminal, even if the loop failed
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    result
  }

  async fn event_loop(
    &mut self,
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    events: &mut EventHandler,
  ) -> Result<()> {
    while !self.should_quit() {
      terminal.draw(|frame| ui::draw(frame, self))?;

      match events.next().await {
        Some(event) => self.handle_event(event),
        None => break,
      }
    }
    Ok(())
  }

  fn handle_event(&mut self, event: Event) {
    match event {
      Event::Key(key) => self.handle_key(key),
      Event::Resize => {} // Redrawn on the next loop iteration
      Event::Tick => {}
    }

    if self.sync.poll() {
      self.clamp_selection();
    }
  }

  pub fn handle_key(&mut self, key: KeyEvent) {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
      self.should_quit = true;
      return;
    }

    match self.mode {
      Mode::Normal => self.handle_normal_key(key),
      Mode::Form => self.handle_form_key(key),
    }
  }

  fn handle_normal_key(&mut self, key: KeyEvent) {
    match key.code {
      KeyCode::Char('q') => self.should_quit = true,

      // Part selection
      KeyCode::Char('1') => self.select_part(Part::Web),
      KeyCode::Char('2') => self.select_part(Part::Ios),
      KeyCode::Char('3') => self.select_part(Part::Server),
      KeyCode::Char('l') | KeyCode::Right => {
        self.sync.next_part();
        self.selected = 0;
      }
      KeyCode::Char('h') | KeyCode::Left => {
        self.sync.previous_part();
        self.selected = 0;
      }

      // Navigation
      KeyCode::Char('j') | KeyCode::Down => self.move_selection(1),
      KeyCode::Char('k') | KeyCode::Up => self.move_selection(-1),

      // Record actions
      KeyCode::Char('e') | KeyCode::Enter => {
        if let Some(id) = self.selected_user().map(|u| u.id) {
          if self.sync.edit(id) {
            self.enter_form();
          }
        }
      }
      KeyCode::Char('d') => {
        if let Some(id) = self.selected_user().map(|u| u.id) {
          self.sync.delete(id);
        }
      }
      KeyCode::Char('a') | KeyCode::Char('i') => self.enter_form(),
      KeyCode::Char('r') => self.sync.refresh(),

      KeyCode::Esc => {
        if !self.sync.cancel_edit() {
          self.sync.dismiss_error();
        }
      }

      _ => {}
    }
  }

  fn handle_form_key(&mut self, key: KeyEvent) {
    let buffer = self.sync.form_mut().draft_mut().field_mut(self.focus);

    match edit_buffer(buffer, key) {
      InputResult::Consumed => {}
      InputResult::Submitted => {
        // Errors are kept by the controller and shown in the status line
        if self.sync.submit().is_ok() {
          self.mode = Mode::Normal;
        }
      }
      InputResult::Cancelled => self.mode = Mode::Normal,
      InputResult::NotHandled => match key.code {
        KeyCode::Tab | KeyCode::Down => self.focus = self.focus.next(),
        KeyCode::BackTab | KeyCode::Up => self.focus = self.focus.previous(),
        _ => {}
      },
    }
  }

  fn enter_form(&mut self) {
    self.mode = Mode::Form;
    self.focus = FormField::Name;
  }

  fn select_part(&mut self, part: Part) {
    self.sync.select_part(part);
    self.selected = 0;
  }

  fn move_selection(&mut self, delta: i32) {
    let len = self.sync.records().len();
    if len > 0 {
      self.selected = (self.selected as i32 + delta).rem_euclid(len as i32) as usize;
    }
  }

  fn clamp_selection(&mut self) {
    let len = self.sync.records().len();
    if self.selected >= len {
      self.selected = len.saturating_sub(1);
    }
  }

  fn selected_user(&self) -> Option<&User> {
    self.sync.records().get(self.selected)
  }

  // Accessors for UI rendering

  pub fn sync(&self) -> &SyncController<B> {
    &self.sync
  }

  pub fn mode(&self) -> &Mode {
    &self.mode
  }

  pub fn focus(&self) -> FormField {
    self.focus
  }

  pub fn selected(&self) -> usize {
    self.selected
  }

  pub fn title(&self) -> &str {
    &self.title
  }

  pub fn should_quit(&self) -> bool {
    self.should_quit
  }
}
