use ratatui::prelude::Color;

/// Truncate a string to a maximum number of characters, adding "..." if truncated
pub fn truncate(s: &str, max_len: usize) -> String {
  if s.chars().count() <= max_len {
    s.to_string()
  } else {
    let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
    format!("{}...", kept)
  }
}

/// Display color for a part label
pub fn part_color(part: &str) -> Color {
  match part {
    "web" => Color::Cyan,
    "ios" => Color::Magenta,
    "server" => Color::Green,
    _ => Color::White,
  }
}
