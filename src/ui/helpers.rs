use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use crate::render::BookItem;

/// Lines shown inside a book card: title, author and year, then the actions
/// the item offers.
pub(crate) fn book_card_lines(item: &BookItem, selected: bool) -> Vec<Line<'static>> {
    let title = if selected {
        format!("▶ {}", item.title)
    } else {
        item.title.clone()
    };

    let author = if item.author.trim().is_empty() {
        "Unknown author".to_string()
    } else {
        item.author.clone()
    };

    let actions = item
        .actions
        .iter()
        .map(|action| action.label())
        .collect::<Vec<_>>()
        .join(" • ");

    vec![
        Line::from(Span::styled(
            title,
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(author, Style::default().fg(Color::Gray))),
        Line::from(Span::raw(format!("Year: {}", item.year))),
        Line::from(Span::styled(actions, Style::default().fg(Color::Cyan))),
    ]
}

/// Produce a rectangle centered within `area` that spans the requested percent
/// of the width and height. Used for modal dialogs.
pub(crate) fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(area);

    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(horizontal[1]);

    vertical[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::BookAction;

    #[test]
    fn card_lists_fields_and_actions() {
        let item = BookItem {
            id: 1,
            title: "Dune".to_string(),
            author: String::new(),
            year: 1965,
            actions: vec![BookAction::Complete(1), BookAction::Delete(1)],
            visible: true,
        };
        let lines = book_card_lines(&item, true);
        let text: Vec<String> = lines.iter().map(|line| line.to_string()).collect();
        assert_eq!(
            text,
            vec!["▶ Dune", "Unknown author", "Year: 1965", "Mark read • Delete"]
        );
    }

    #[test]
    fn centered_rect_stays_inside_area() {
        let area = Rect::new(0, 0, 100, 50);
        let popup = centered_rect(60, 40, area);
        assert!(popup.x >= area.x && popup.right() <= area.right());
        assert!(popup.y >= area.y && popup.bottom() <= area.bottom());
    }
}
