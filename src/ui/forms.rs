use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

use crate::models::NewBook;
use crate::render::BookItem;

/// Internal representation of the "add book" form fields.
#[derive(Default, Clone)]
pub(crate) struct BookForm {
    pub(crate) title: String,
    pub(crate) author: String,
    pub(crate) year: String,
    pub(crate) is_complete: bool,
    pub(crate) active: BookField,
}

/// Fields available within the book form, in focus order.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub(crate) enum BookField {
    #[default]
    Title,
    Author,
    Year,
    Complete,
}

impl BookForm {
    /// Cycle focus forward across the four fields.
    pub(crate) fn next_field(&mut self) {
        self.active = match self.active {
            BookField::Title => BookField::Author,
            BookField::Author => BookField::Year,
            BookField::Year => BookField::Complete,
            BookField::Complete => BookField::Title,
        };
    }

    pub(crate) fn previous_field(&mut self) {
        self.active = match self.active {
            BookField::Title => BookField::Complete,
            BookField::Author => BookField::Title,
            BookField::Year => BookField::Author,
            BookField::Complete => BookField::Year,
        };
    }

    pub(crate) fn toggle_complete(&mut self) {
        self.is_complete = !self.is_complete;
    }

    /// Append a character to the active field. The year only takes digits and
    /// a leading minus sign; the checkbox flips on space.
    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        if ch.is_control() {
            return false;
        }
        match self.active {
            BookField::Title => self.title.push(ch),
            BookField::Author => self.author.push(ch),
            BookField::Year => {
                let sign_ok = ch == '-' && self.year.is_empty();
                if !(ch.is_ascii_digit() || sign_ok) {
                    return false;
                }
                self.year.push(ch);
            }
            BookField::Complete => {
                if ch != ' ' {
                    return false;
                }
                self.toggle_complete();
            }
        }
        true
    }

    pub(crate) fn backspace(&mut self) {
        match self.active {
            BookField::Title => {
                self.title.pop();
            }
            BookField::Author => {
                self.author.pop();
            }
            BookField::Year => {
                self.year.pop();
            }
            BookField::Complete => {}
        }
    }

    /// Convert the raw inputs into a draft. No validation beyond coercing the
    /// year into an integer.
    pub(crate) fn to_new_book(&self) -> NewBook {
        NewBook::new(
            self.title.trim(),
            self.author.trim(),
            coerce_year(&self.year),
        )
        .completed(self.is_complete)
    }

    /// Label for the submit hint, following the checkbox.
    pub(crate) fn submit_label(&self) -> &'static str {
        if self.is_complete {
            "Save as completed"
        } else {
            "Save as unread"
        }
    }

    /// Render a single line for the form widget.
    pub(crate) fn build_line(&self, field_name: &str, field: BookField) -> Line<'static> {
        let is_active = self.active == field;
        let value = match field {
            BookField::Title => self.title.clone(),
            BookField::Author => self.author.clone(),
            BookField::Year => self.year.clone(),
            BookField::Complete => {
                let mark = if self.is_complete { "[x]" } else { "[ ]" };
                mark.to_string()
            }
        };

        let display = if value.is_empty() {
            "<empty>".to_string()
        } else {
            value.clone()
        };

        let style = if is_active {
            Style::default().fg(Color::Yellow)
        } else if value.is_empty() {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default()
        };

        Line::from(vec![
            Span::raw(format!("{field_name}: ")),
            Span::styled(display, style),
        ])
    }

    /// Character count for the requested field, used to place the cursor.
    pub(crate) fn value_len(&self, field: BookField) -> usize {
        match field {
            BookField::Title => self.title.chars().count(),
            BookField::Author => self.author.chars().count(),
            BookField::Year => self.year.chars().count(),
            BookField::Complete => 1,
        }
    }
}

/// Integer coercion with `parseInt`-like leniency: optional sign, then the
/// leading digits. Digit runs too large for `i64` saturate; input with no
/// leading digits becomes `0`.
pub(crate) fn coerce_year(raw: &str) -> i64 {
    let trimmed = raw.trim_start();
    let (sign, digits) = match trimmed.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };
    let end = digits
        .find(|ch: char| !ch.is_ascii_digit())
        .unwrap_or(digits.len());
    let digits = &digits[..end];
    if digits.is_empty() {
        return 0;
    }
    match digits.parse::<i64>() {
        Ok(value) => sign * value,
        Err(_) if sign < 0 => i64::MIN,
        Err(_) => i64::MAX,
    }
}

/// State for confirming the removal of a book.
#[derive(Clone)]
pub(crate) struct ConfirmBookDelete {
    pub(crate) id: i64,
    pub(crate) title: String,
}

impl ConfirmBookDelete {
    pub(crate) fn from_item(item: &BookItem) -> Self {
        Self {
            id: item.id,
            title: item.title.clone(),
        }
    }
}

/// Blocking message the user has to dismiss before doing anything else.
#[derive(Clone)]
pub(crate) struct Notice {
    pub(crate) title: &'static str,
    pub(crate) message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coerces_years_like_parse_int() {
        assert_eq!(coerce_year("1965"), 1965);
        assert_eq!(coerce_year("  2001abc"), 2001);
        assert_eq!(coerce_year("-44"), -44);
        assert_eq!(coerce_year("+12"), 12);
        assert_eq!(coerce_year(""), 0);
        assert_eq!(coerce_year("abc"), 0);
        assert_eq!(coerce_year("-"), 0);
    }

    #[test]
    fn oversized_years_saturate() {
        assert_eq!(coerce_year("99999999999999999999"), i64::MAX);
        assert_eq!(coerce_year("-99999999999999999999x"), i64::MIN);
        assert_eq!(coerce_year("-9223372036854775808"), i64::MIN);
    }

    #[test]
    fn year_field_rejects_letters_and_late_signs() {
        let mut form = BookForm {
            active: BookField::Year,
            ..BookForm::default()
        };
        assert!(form.push_char('-'));
        assert!(form.push_char('4'));
        assert!(!form.push_char('-'));
        assert!(!form.push_char('x'));
        assert_eq!(form.year, "-4");
    }

    #[test]
    fn space_on_checkbox_flips_completion_and_label() {
        let mut form = BookForm {
            active: BookField::Complete,
            ..BookForm::default()
        };
        assert_eq!(form.submit_label(), "Save as unread");
        assert!(form.push_char(' '));
        assert!(form.is_complete);
        assert_eq!(form.submit_label(), "Save as completed");
        assert!(!form.push_char('y'));
    }

    #[test]
    fn draft_trims_text_and_keeps_checkbox() {
        let form = BookForm {
            title: "  Dune ".to_string(),
            author: "Herbert".to_string(),
            year: "1965".to_string(),
            is_complete: true,
            active: BookField::Title,
        };
        assert_eq!(
            form.to_new_book(),
            NewBook::new("Dune", "Herbert", 1965).completed(true)
        );
    }

    #[test]
    fn focus_wraps_both_ways() {
        let mut form = BookForm::default();
        form.previous_field();
        assert_eq!(form.active, BookField::Complete);
        form.next_field();
        assert_eq!(form.active, BookField::Title);
    }
}
