use crate::api::types::Part;
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

/// Draw the header bar with title and part tabs
pub fn draw_header(frame: &mut Frame, area: Rect, title: &str, selected: Part) {
  let mut spans = vec![
    Span::styled(" roster ", Style::default().fg(Color::Cyan).bold()),
    Span::styled("│", Style::default().fg(Color::DarkGray)),
    Span::styled(format!(" {} ", title), Style::default().fg(Color::White)),
    Span::styled("│", Style::default().fg(Color::DarkGray)),
    Span::raw(" "),
  ];
  spans.extend(part_tabs(selected));

  let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::Black));
  frame.render_widget(paragraph, area);
}

/// One tab per part, numbered for the 1/2/3 shortcuts
fn part_tabs(selected: Part) -> Vec<Span<'static>> {
  Part::ALL
    .iter()
    .enumerate()
    .flat_map(|(i, part)| {
      let label = format!(" {}:{} ", i + 1, part.as_str().to_uppercase());
      let style = if *part == selected {
        Style::default().fg(Color::Black).bg(Color::Blue).bold()
      } else {
        Style::default().fg(Color::Gray)
      };
      [Span::styled(label, style), Span::raw(" ")]
    })
    .collect()
}
