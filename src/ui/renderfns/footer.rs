use crate::sync::SyncError;
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

const NORMAL_HINTS: &str =
  " 1-3/h/l:part  j/k:nav  e:edit  d:delete  a:add  r:refresh  Esc:cancel edit  q:quit";
const FORM_HINTS: &str = " Tab:next field  Enter:submit  Esc:back";

/// Draw the status line: the last error if there is one, otherwise key hints
pub fn draw_footer(
  frame: &mut Frame,
  area: Rect,
  error: Option<&SyncError>,
  in_form: bool,
  in_flight: usize,
) {
  let mut spans = Vec::new();

  match error {
    Some(e) => {
      // Rejected drafts never reached the backend
      let bg = if e.is_local() { Color::Yellow } else { Color::Red };
      spans.push(Span::styled(
        format!(" ✗ {} ", e),
        Style::default().fg(Color::Black).bg(bg).bold(),
      ));
      spans.push(Span::styled(
        "  Esc:dismiss",
        Style::default().fg(Color::DarkGray),
      ));
    }
    None => {
      let hints = if in_form { FORM_HINTS } else { NORMAL_HINTS };
      spans.push(Span::styled(hints, Style::default().fg(Color::DarkGray)));
    }
  }

  if in_flight > 0 {
    spans.push(Span::styled(
      format!("  ⟳ {}", in_flight),
      Style::default().fg(Color::Yellow),
    ));
  }

  let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::Black));
  frame.render_widget(paragraph, area);
}
