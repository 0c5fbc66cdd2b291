//! Projection of the collection into the two on-screen groups. Every call to
//! [`render`] rebuilds both groups from scratch.

use crate::models::Book;

/// Something a rendered item lets the user do. The book id is copied into the
/// action, so a stale item can only ever point at an id, never at a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookAction {
    Complete(i64),
    Undo(i64),
    Delete(i64),
}

impl BookAction {
    pub fn book_id(&self) -> i64 {
        match *self {
            BookAction::Complete(id) | BookAction::Undo(id) | BookAction::Delete(id) => id,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            BookAction::Complete(_) => "Mark read",
            BookAction::Undo(_) => "Undo",
            BookAction::Delete(_) => "Delete",
        }
    }
}

/// One rendered book.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookItem {
    pub id: i64,
    pub title: String,
    pub author: String,
    pub year: i64,
    pub actions: Vec<BookAction>,
    /// Cleared by the search filter; every fresh render starts visible.
    pub visible: bool,
}

impl BookItem {
    fn from_book(book: &Book) -> Self {
        let toggle = if book.is_complete {
            BookAction::Undo(book.id)
        } else {
            BookAction::Complete(book.id)
        };
        Self {
            id: book.id,
            title: book.title.clone(),
            author: book.author.clone(),
            year: book.year,
            actions: vec![toggle, BookAction::Delete(book.id)],
            visible: true,
        }
    }

    /// The complete/undo action, whichever this item carries.
    pub fn toggle_action(&self) -> Option<BookAction> {
        self.actions
            .iter()
            .copied()
            .find(|action| !matches!(action, BookAction::Delete(_)))
    }
}

/// Which of the two groups an item lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Group {
    Incomplete,
    Completed,
}

impl Group {
    pub fn title(&self) -> &'static str {
        match self {
            Group::Incomplete => "Unread",
            Group::Completed => "Completed",
        }
    }

    pub fn other(&self) -> Group {
        match self {
            Group::Incomplete => Group::Completed,
            Group::Completed => Group::Incomplete,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookGroups {
    pub incomplete: Vec<BookItem>,
    pub completed: Vec<BookItem>,
}

impl BookGroups {
    pub fn group(&self, group: Group) -> &[BookItem] {
        match group {
            Group::Incomplete => &self.incomplete,
            Group::Completed => &self.completed,
        }
    }

    /// Items of `group` that survive the current filter.
    pub fn visible(&self, group: Group) -> Vec<&BookItem> {
        self.group(group).iter().filter(|item| item.visible).collect()
    }

    pub fn items_mut(&mut self) -> impl Iterator<Item = &mut BookItem> {
        self.incomplete.iter_mut().chain(self.completed.iter_mut())
    }

    pub fn len(&self) -> usize {
        self.incomplete.len() + self.completed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Collaborator that puts rendered groups in front of the user.
pub trait BookDisplay {
    /// Replace whatever was shown before with `groups`.
    fn display(&mut self, groups: BookGroups);

    /// Current rendered output, used by the search filter.
    fn groups_mut(&mut self) -> &mut BookGroups;
}

/// Partition `books` by completion, keeping collection order in each group.
pub fn render(books: &[Book]) -> BookGroups {
    let mut groups = BookGroups::default();
    for book in books {
        let item = BookItem::from_book(book);
        if book.is_complete {
            groups.completed.push(item);
        } else {
            groups.incomplete.push(item);
        }
    }
    groups
}
