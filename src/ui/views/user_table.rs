use crate::api::types::{Part, User};
use crate::sync::{FetchState, RecordCache};
use crate::ui::renderfns::{part_color, truncate};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};

pub fn draw_user_table(
  frame: &mut Frame,
  area: Rect,
  cache: &RecordCache,
  part: Part,
  selected: usize,
  editing: Option<u64>,
) {
  let users = cache.records();
  let block = Block::default()
    .title(table_title(cache.state(), part, users.len()))
    .title_alignment(Alignment::Center)
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::Blue));

  if users.is_empty() {
    let content = match cache.state() {
      FetchState::Idle | FetchState::Loading => "Loading...",
      FetchState::Failed(_) => "Failed to load users. Press 'r' to retry.",
      FetchState::Ready => "No users found",
    };
    let paragraph = Paragraph::new(content)
      .block(block)
      .alignment(Alignment::Center)
      .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(paragraph, area);
    return;
  }

  let mut items = vec![ListItem::new(header_line())];
  items.extend(users.iter().map(|user| ListItem::new(user_line(user, editing))));

  let list = List::new(items)
    .block(block)
    .highlight_style(
      Style::default()
        .bg(Color::DarkGray)
        .add_modifier(Modifier::BOLD),
    )
    .highlight_symbol("> ");

  // Row 0 is the column header
  let mut state = ListState::default();
  state.select(Some(selected.min(users.len() - 1) + 1));

  frame.render_stateful_widget(list, area, &mut state);
}

fn table_title(state: &FetchState, part: Part, count: usize) -> String {
  let part = part.as_str().to_uppercase();
  match state {
    FetchState::Loading => format!(" Users [{}] (loading...) ", part),
    FetchState::Failed(e) => format!(" Users [{}] (error: {}) ", part, e),
    _ => format!(" Users [{}] ({}) ", part, count),
  }
}

fn header_line() -> Line<'static> {
  Line::from(Span::styled(
    format!("  {:<24} {:>5}  {:<10}", "Name", "Age", "Part"),
    Style::default().fg(Color::Gray).add_modifier(Modifier::UNDERLINED),
  ))
}

fn user_line(user: &User, editing: Option<u64>) -> Line<'static> {
  let marker = if editing == Some(user.id) { " ✎" } else { "" };
  Line::from(vec![
    Span::raw(format!("{:<24}", truncate(&user.name, 24))),
    Span::raw(" "),
    Span::styled(
      format!("{:>5}", user.age),
      Style::default().fg(Color::Yellow),
    ),
    Span::raw("  "),
    Span::styled(
      format!("{:<10}", truncate(&user.part, 10)),
      Style::default().fg(part_color(&user.part)),
    ),
    Span::styled(marker, Style::default().fg(Color::Cyan)),
  ])
}
