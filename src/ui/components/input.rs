use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Result of handling a key event in a text field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputResult {
  /// Key was handled, continue input mode
  Consumed,
  /// Enter pressed
  Submitted,
  /// Escape pressed
  Cancelled,
  /// Key not handled, pass to next handler
  NotHandled,
}

/// Apply a key press to a text field buffer. Editing happens at the end of
/// the buffer; the form fields are short enough not to need a cursor.
pub fn edit_buffer(buffer: &mut String, key: KeyEvent) -> InputResult {
  let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

  match key.code {
    KeyCode::Esc => InputResult::Cancelled,
    KeyCode::Enter => InputResult::Submitted,
    KeyCode::Backspace => {
      buffer.pop();
      InputResult::Consumed
    }
    KeyCode::Char('u') if ctrl => {
      buffer.clear();
      InputResult::Consumed
    }
    KeyCode::Char('w') if ctrl => {
      // Delete last word
      let trimmed = buffer.trim_end().len();
      let cut = buffer[..trimmed].rfind(' ').map(|i| i + 1).unwrap_or(0);
      buffer.truncate(cut);
      InputResult::Consumed
    }
    KeyCode::Char(_) if ctrl => InputResult::NotHandled,
    KeyCode::Char(c) => {
      buffer.push(c);
      InputResult::Consumed
    }
    _ => InputResult::NotHandled,
  }
}
