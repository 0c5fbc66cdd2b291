use std::cmp::min;
use std::mem;

use crossterm::event::KeyCode;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::prelude::*;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

use crate::error::StorageError;
use crate::persistence::LoadOutcome;
use crate::render::{BookAction, BookItem, Group};
use crate::shelf::Shelf;

use super::forms::{BookField, BookForm, ConfirmBookDelete, Notice};
use super::helpers::{book_card_lines, centered_rect};
use super::screens::ShelfView;

/// Footer space reserved for status messages and instructions.
const FOOTER_HEIGHT: u16 = 3;
/// Height of a book card: four text lines plus the border.
const BOOK_CARD_HEIGHT: u16 = 6;
/// Prompt shown in the search bar; also used to place the cursor.
const SEARCH_PROMPT: &str = "Search title: ";

/// Modal state layered over the shelf screen.
enum Mode {
    Normal,
    AddingBook(BookForm),
    ConfirmDelete(ConfirmBookDelete),
    Searching(SearchState),
    Notice(Notice),
}

/// State for an active inline search.
struct SearchState {
    query: String,
}

/// Holds the footer message text plus its severity.
struct StatusMessage {
    text: String,
    kind: StatusKind,
}

/// Severity levels shown in the footer.
enum StatusKind {
    Info,
    Error,
}

impl StatusKind {
    fn style(&self) -> Style {
        match self {
            StatusKind::Info => Style::default().fg(Color::Green),
            StatusKind::Error => Style::default().fg(Color::Red),
        }
    }
}

/// Central application state for the TUI.
pub struct App {
    shelf: Shelf<ShelfView>,
    mode: Mode,
    status: Option<StatusMessage>,
    storage_notice_shown: bool,
}

impl App {
    /// Wrap a loaded shelf. Startup problems with the stored data open a
    /// notice straight away.
    pub fn new(shelf: Shelf<ShelfView>, outcome: LoadOutcome) -> Self {
        let mut app = Self {
            shelf,
            mode: Mode::Normal,
            status: None,
            storage_notice_shown: false,
        };

        match outcome {
            LoadOutcome::Unavailable => {
                app.storage_notice_shown = true;
                app.mode = Mode::Notice(Notice {
                    title: "Storage Unavailable",
                    message: StorageError::Unavailable.to_string(),
                });
            }
            LoadOutcome::Discarded { reason } => {
                app.mode = Mode::Notice(Notice {
                    title: "Saved Data Ignored",
                    message: format!(
                        "Stored books could not be read and were skipped ({reason}). \
                         The next change will overwrite them."
                    ),
                });
            }
            LoadOutcome::Loaded(count) => {
                app.set_status(format!("Loaded {count} books."), StatusKind::Info);
            }
            LoadOutcome::Empty => {}
        }

        app
    }

    pub fn shelf(&self) -> &Shelf<ShelfView> {
        &self.shelf
    }

    /// Feed one key press through the current mode. Returns `true` when the
    /// user asked to quit.
    pub fn handle_key(&mut self, code: KeyCode) -> bool {
        let mut exit = false;
        let mode = mem::replace(&mut self.mode, Mode::Normal);

        self.mode = match mode {
            Mode::Normal => self.handle_normal_key(code, &mut exit),
            Mode::AddingBook(form) => self.handle_add_book(code, form),
            Mode::ConfirmDelete(confirm) => self.handle_confirm_delete(code, confirm),
            Mode::Searching(state) => self.handle_search(code, state),
            Mode::Notice(notice) => match code {
                KeyCode::Enter | KeyCode::Esc => Mode::Normal,
                _ => Mode::Notice(notice),
            },
        };

        exit
    }

    fn handle_normal_key(&mut self, code: KeyCode, exit: &mut bool) -> Mode {
        let view = self.shelf.display_mut();
        match code {
            KeyCode::Char('q') => {
                *exit = true;
            }
            KeyCode::Left | KeyCode::Right | KeyCode::Tab | KeyCode::BackTab => {
                view.switch_focus()
            }
            KeyCode::Up => view.move_selection(-1),
            KeyCode::Down => view.move_selection(1),
            KeyCode::PageUp => view.move_selection(-5),
            KeyCode::PageDown => view.move_selection(5),
            KeyCode::Home => view.select_first(),
            KeyCode::End => view.select_last(),
            KeyCode::Char('+') | KeyCode::Char('a') => {
                self.clear_status();
                return Mode::AddingBook(BookForm::default());
            }
            KeyCode::Char('c') | KeyCode::Char(' ') | KeyCode::Enter => {
                match view.current_item().and_then(BookItem::toggle_action) {
                    Some(action) => return self.apply_action(action),
                    None => self.set_status("No book selected.", StatusKind::Error),
                }
            }
            KeyCode::Char('-') | KeyCode::Char('d') | KeyCode::Delete => {
                match view.current_item().map(ConfirmBookDelete::from_item) {
                    Some(confirm) => {
                        self.clear_status();
                        return Mode::ConfirmDelete(confirm);
                    }
                    None => self.set_status("No book selected to delete.", StatusKind::Error),
                }
            }
            KeyCode::Char('f') | KeyCode::Char('/') => {
                self.shelf.search("");
                self.shelf.display_mut().ensure_in_bounds();
                return Mode::Searching(SearchState {
                    query: String::new(),
                });
            }
            _ => {}
        }
        Mode::Normal
    }

    fn handle_add_book(&mut self, code: KeyCode, mut form: BookForm) -> Mode {
        match code {
            KeyCode::Esc => {
                self.set_status("Add book cancelled.", StatusKind::Info);
                Mode::Normal
            }
            KeyCode::Tab | KeyCode::Down => {
                form.next_field();
                Mode::AddingBook(form)
            }
            KeyCode::BackTab | KeyCode::Up => {
                form.previous_field();
                Mode::AddingBook(form)
            }
            KeyCode::Backspace => {
                form.backspace();
                Mode::AddingBook(form)
            }
            KeyCode::Enter => match self.shelf.add_book(form.to_new_book()) {
                Ok(book) => {
                    self.shelf.display_mut().focus_book(book.id);
                    self.set_status("Book added.", StatusKind::Info);
                    Mode::Normal
                }
                Err(err) => self.report_storage_error(err),
            },
            KeyCode::Char(ch) => {
                form.push_char(ch);
                Mode::AddingBook(form)
            }
            _ => Mode::AddingBook(form),
        }
    }

    fn handle_confirm_delete(&mut self, code: KeyCode, confirm: ConfirmBookDelete) -> Mode {
        match code {
            KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') => {
                self.set_status("Deletion cancelled.", StatusKind::Info);
                Mode::Normal
            }
            KeyCode::Enter | KeyCode::Char('y') | KeyCode::Char('Y') => {
                self.apply_action(BookAction::Delete(confirm.id))
            }
            _ => Mode::ConfirmDelete(confirm),
        }
    }

    fn handle_search(&mut self, code: KeyCode, mut state: SearchState) -> Mode {
        match code {
            KeyCode::Esc => {
                self.shelf.search("");
                self.shelf.display_mut().ensure_in_bounds();
                return Mode::Normal;
            }
            KeyCode::Enter => return Mode::Normal,
            KeyCode::Up => {
                self.shelf.display_mut().move_selection(-1);
                return Mode::Searching(state);
            }
            KeyCode::Down => {
                self.shelf.display_mut().move_selection(1);
                return Mode::Searching(state);
            }
            KeyCode::Tab | KeyCode::BackTab => {
                self.shelf.display_mut().switch_focus();
                return Mode::Searching(state);
            }
            KeyCode::Backspace => {
                state.query.pop();
            }
            KeyCode::Char(ch) if !ch.is_control() => state.query.push(ch),
            _ => return Mode::Searching(state),
        }

        let shown = self.shelf.search(&state.query);
        self.shelf.display_mut().ensure_in_bounds();
        if shown == 0 && !state.query.is_empty() {
            self.set_status("No titles match the search.", StatusKind::Error);
        } else {
            self.clear_status();
        }
        Mode::Searching(state)
    }

    /// Run an item action through the shelf and report the result.
    fn apply_action(&mut self, action: BookAction) -> Mode {
        match self.shelf.apply(action) {
            Ok(true) => {
                self.shelf.display_mut().focus_book(action.book_id());
                let message = match action {
                    BookAction::Complete(_) => "Book marked as read.",
                    BookAction::Undo(_) => "Book moved back to unread.",
                    BookAction::Delete(_) => "Book deleted.",
                };
                self.set_status(message, StatusKind::Info);
                Mode::Normal
            }
            Ok(false) => Mode::Normal,
            Err(err) => self.report_storage_error(err),
        }
    }

    /// The first unavailable-storage failure of a session blocks with a
    /// notice; later ones only update the footer.
    fn report_storage_error(&mut self, err: StorageError) -> Mode {
        let message = err.to_string();
        if matches!(err, StorageError::Unavailable) && self.storage_notice_shown {
            self.set_status(message, StatusKind::Error);
            return Mode::Normal;
        }
        self.storage_notice_shown = true;
        self.set_status("Changes were not saved.", StatusKind::Error);
        Mode::Notice(Notice {
            title: "Save Failed",
            message,
        })
    }

    pub fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        let footer_height = FOOTER_HEIGHT.min(area.height);

        let (content_area, footer_area) = if area.height > footer_height {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(0), Constraint::Length(footer_height)])
                .split(area);
            (chunks[0], chunks[1])
        } else {
            (area, area)
        };

        self.draw_shelf(frame, content_area);

        if area.height >= footer_height {
            self.draw_footer(frame, footer_area);
        }

        match &self.mode {
            Mode::AddingBook(form) => self.draw_book_form(frame, area, form),
            Mode::ConfirmDelete(confirm) => self.draw_confirm_delete(frame, area, confirm),
            Mode::Searching(state) => self.draw_search_bar(frame, area, state),
            Mode::Notice(notice) => self.draw_notice(frame, area, notice),
            Mode::Normal => {}
        }
    }

    fn draw_shelf(&self, frame: &mut Frame, area: Rect) {
        let view = self.shelf.display();
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(area);

        for (group, chunk) in [Group::Incomplete, Group::Completed]
            .into_iter()
            .zip(columns.iter())
        {
            let items = view.groups().visible(group);
            let total = view.groups().group(group).len();
            let heading = if items.len() == total {
                format!("{} ({total})", group.title())
            } else {
                format!("{} ({}/{total})", group.title(), items.len())
            };

            let mut block = Block::default().borders(Borders::ALL).title(heading);
            if view.focus == group {
                block = block.border_style(Style::default().fg(Color::Yellow));
            }
            let inner = block.inner(*chunk);
            frame.render_widget(block, *chunk);

            if items.is_empty() {
                let text = if total == 0 {
                    match group {
                        Group::Incomplete => "No unread books. Press '+' to add one.",
                        Group::Completed => "No completed books yet.",
                    }
                } else {
                    "No titles match the search."
                };
                let message = Paragraph::new(text)
                    .alignment(Alignment::Center)
                    .wrap(Wrap { trim: true });
                frame.render_widget(message, inner);
                continue;
            }

            let selected = (view.focus == group).then(|| view.selected(group));
            self.render_book_cards(frame, inner, &items, selected);
        }
    }

    fn render_book_cards(
        &self,
        frame: &mut Frame,
        area: Rect,
        items: &[&BookItem],
        selected: Option<usize>,
    ) {
        if items.is_empty() || area.height == 0 {
            return;
        }

        let card_height = BOOK_CARD_HEIGHT as usize;
        let capacity = ((area.height as usize) / card_height).max(1);
        let len = items.len();
        let cursor = selected.unwrap_or(0);
        let mut start = if cursor >= capacity {
            cursor + 1 - capacity
        } else {
            0
        };
        if start + capacity > len {
            start = len.saturating_sub(capacity);
        }
        let end = min(start + capacity, len);

        let constraints: Vec<Constraint> = (start..end)
            .map(|_| Constraint::Length(BOOK_CARD_HEIGHT))
            .collect();
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(area);

        for (chunk, index) in rows.iter().zip(start..end) {
            if chunk.height == 0 {
                continue;
            }
            let is_selected = selected == Some(index);
            let mut block = Block::default().borders(Borders::ALL);
            if is_selected {
                block = block.style(Style::default().fg(Color::Yellow));
            }

            let paragraph = Paragraph::new(book_card_lines(items[index], is_selected))
                .block(block)
                .wrap(Wrap { trim: true })
                .alignment(Alignment::Left);
            frame.render_widget(paragraph, *chunk);
        }
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::TOP);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let status_line = if let Some(status) = &self.status {
            Line::from(vec![Span::styled(status.text.clone(), status.kind.style())])
        } else {
            Line::from("")
        };

        let paragraph = Paragraph::new(vec![status_line, self.footer_instructions()])
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn footer_instructions(&self) -> Line<'static> {
        let key_style = Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD);
        let hints: &[(&str, &str)] = match &self.mode {
            Mode::AddingBook(form) if form.active == BookField::Complete => &[
                ("[Tab]", " Next Field   "),
                ("[Space]", " Toggle Completed   "),
                ("[Enter]", " Save   "),
                ("[Esc]", " Cancel"),
            ],
            Mode::AddingBook(_) => &[
                ("[Tab]", " Next Field   "),
                ("[Enter]", " Save   "),
                ("[Esc]", " Cancel"),
            ],
            Mode::ConfirmDelete(_) => &[("[y]", " Delete   "), ("[n]", " Keep")],
            Mode::Searching(_) => &[
                ("[↑↓]", " Select   "),
                ("[Tab]", " Switch List   "),
                ("[Enter]", " Keep Filter   "),
                ("[Esc]", " Clear"),
            ],
            Mode::Notice(_) => &[("[Enter]", " Dismiss")],
            Mode::Normal => &[
                ("[←→]", " Switch List   "),
                ("[↑↓]", " Select   "),
                ("[+]", " Add   "),
                ("[c]", " Read/Undo   "),
                ("[-]", " Delete   "),
                ("[f]", " Search   "),
                ("[q]", " Quit"),
            ],
        };

        let spans: Vec<Span<'static>> = hints
            .iter()
            .flat_map(|(key, label)| {
                [
                    Span::styled(key.to_string(), key_style),
                    Span::raw(label.to_string()),
                ]
            })
            .collect();
        Line::from(spans)
    }

    fn draw_search_bar(&self, frame: &mut Frame, area: Rect, state: &SearchState) {
        let height = 3u16.min(area.height);
        let popup_area = Rect {
            x: area.x,
            y: area.y,
            width: area.width,
            height,
        };
        frame.render_widget(Clear, popup_area);

        let block = Block::default().borders(Borders::ALL).title("Search");
        let paragraph = Paragraph::new(Span::raw(format!("{SEARCH_PROMPT}{}", state.query)))
            .block(block.clone())
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, popup_area);

        let inner = block.inner(popup_area);
        let cursor_x = inner.x + SEARCH_PROMPT.len() as u16 + state.query.chars().count() as u16;
        frame.set_cursor_position((cursor_x, inner.y));
    }

    fn draw_book_form(&self, frame: &mut Frame, area: Rect, form: &BookForm) {
        let popup_area = centered_rect(60, 50, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default().title("Add Book").borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let fields = [
            ("Title", BookField::Title),
            ("Author", BookField::Author),
            ("Year", BookField::Year),
            ("Completed", BookField::Complete),
        ];
        let mut lines: Vec<Line> = fields
            .iter()
            .map(|(name, field)| form.build_line(name, *field))
            .collect();
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("Enter: {} • Tab to switch • Esc to cancel", form.submit_label()),
            Style::default().fg(Color::Gray),
        )));

        let paragraph = Paragraph::new(lines).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);

        if let Some(row) = fields.iter().position(|(_, field)| *field == form.active) {
            let (name, field) = fields[row];
            let prefix = name.len() as u16 + 2;
            let cursor_x = inner.x + prefix + form.value_len(field) as u16;
            frame.set_cursor_position((cursor_x, inner.y + row as u16));
        }
    }

    fn draw_confirm_delete(&self, frame: &mut Frame, area: Rect, confirm: &ConfirmBookDelete) {
        let popup_area = centered_rect(60, 30, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title("Confirm Deletion")
            .borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let lines = vec![
            Line::from(format!("Delete \"{}\" from the shelf?", confirm.title)),
            Line::from(""),
            Line::from(Span::styled(
                "Press Y to confirm or N / Esc to cancel.",
                Style::default().fg(Color::Gray),
            )),
        ];

        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Left)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn draw_notice(&self, frame: &mut Frame, area: Rect, notice: &Notice) {
        let popup_area = centered_rect(60, 30, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title(notice.title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Red));
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let lines = vec![
            Line::from(notice.message.clone()),
            Line::from(""),
            Line::from(Span::styled(
                "Press Enter to continue.",
                Style::default().fg(Color::Gray),
            )),
        ];
        let paragraph = Paragraph::new(lines).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn set_status<S: Into<String>>(&mut self, text: S, kind: StatusKind) {
        self.status = Some(StatusMessage {
            text: text.into(),
            kind,
        });
    }

    fn clear_status(&mut self) {
        self.status = None;
    }
}
