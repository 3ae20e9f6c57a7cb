use crate::sync::{Form, FormField};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph};

/// Draw the shared add/update inputs.
///
/// The border and action label follow the form variant: green "Add" while
/// creating, blue "Update #id" while editing.
pub fn draw_user_form(frame: &mut Frame, area: Rect, form: &Form, focus: FormField, active: bool) {
  let (title, color) = match form {
    Form::Creating(_) => (" Add user ".to_string(), Color::Green),
    Form::Editing { id, .. } => (format!(" Update #{} ", id), Color::Blue),
  };

  let border = if active { color } else { Color::DarkGray };
  let block = Block::default()
    .title(title)
    .borders(Borders::ALL)
    .border_style(Style::default().fg(border));

  let paragraph = Paragraph::new(form_line(form, focus, active)).block(block);
  frame.render_widget(paragraph, area);
}

fn form_line(form: &Form, focus: FormField, active: bool) -> Line<'static> {
  let draft = form.draft();
  let mut spans = Vec::new();

  for field in FormField::ALL {
    let focused = active && field == focus;
    let label_style = if focused {
      Style::default().fg(Color::Yellow).bold()
    } else {
      Style::default().fg(Color::Gray)
    };

    spans.push(Span::styled(format!("{}: ", field.label()), label_style));

    let value = draft.field(field);
    if value.is_empty() && !focused {
      spans.push(Span::styled(
        placeholder(field),
        Style::default().fg(Color::DarkGray).italic(),
      ));
    } else {
      spans.push(Span::raw(value.to_string()));
    }
    if focused {
      spans.push(Span::styled("_", Style::default().fg(Color::Yellow)));
    }
    spans.push(Span::raw("   "));
  }

  Line::from(spans)
}

fn placeholder(field: FormField) -> &'static str {
  match field {
    FormField::Name => "name",
    FormField::Age => "age",
    FormField::Part => "web/ios/server",
  }
}
