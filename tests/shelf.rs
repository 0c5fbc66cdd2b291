use std::cell::RefCell;
use std::rc::Rc;

use bookshelf::db::{open_in_memory, SqliteStore};
use bookshelf::{
    BookAction, BookDisplay, BookGroups, Group, LoadOutcome, NewBook, Persistence, Shelf,
    ShelfEvent, StorageError,
};

/// Display double that keeps the last groups and counts redraws.
#[derive(Default)]
struct RecordingDisplay {
    groups: BookGroups,
    redraws: usize,
}

impl BookDisplay for RecordingDisplay {
    fn display(&mut self, groups: BookGroups) {
        self.groups = groups;
        self.redraws += 1;
    }

    fn groups_mut(&mut self) -> &mut BookGroups {
        &mut self.groups
    }
}

fn memory_shelf() -> Shelf<RecordingDisplay> {
    let persistence = Persistence::new(SqliteStore::new(open_in_memory().unwrap()));
    let (shelf, outcome) = Shelf::load(persistence, RecordingDisplay::default());
    assert_eq!(outcome, LoadOutcome::Empty);
    shelf
}

fn titles(shelf: &Shelf<RecordingDisplay>, group: Group) -> Vec<String> {
    shelf
        .display()
        .groups
        .group(group)
        .iter()
        .map(|item| item.title.clone())
        .collect()
}

#[test]
fn dune_moves_between_groups_when_toggled() {
    let mut shelf = memory_shelf();
    let dune = shelf
        .add_book(NewBook::new("Dune", "Herbert", 1965))
        .unwrap();

    assert_eq!(titles(&shelf, Group::Incomplete), vec!["Dune"]);
    assert!(titles(&shelf, Group::Completed).is_empty());

    assert!(shelf.mark_complete(dune.id).unwrap());
    assert!(titles(&shelf, Group::Incomplete).is_empty());
    assert_eq!(titles(&shelf, Group::Completed), vec!["Dune"]);

    assert!(shelf.undo_complete(dune.id).unwrap());
    assert_eq!(shelf.books()[0], dune);
}

#[test]
fn deleting_second_of_three_keeps_the_others_in_order() {
    let mut shelf = memory_shelf();
    let first = shelf.add_book(NewBook::new("One", "A", 1)).unwrap();
    let second = shelf.add_book(NewBook::new("Two", "B", 2)).unwrap();
    let third = shelf.add_book(NewBook::new("Three", "C", 3)).unwrap();

    let removed = shelf.remove_book(second.id).unwrap();
    assert_eq!(removed, Some(second));

    let ids: Vec<i64> = shelf.books().iter().map(|book| book.id).collect();
    assert_eq!(ids, vec![first.id, third.id]);
    assert_eq!(titles(&shelf, Group::Incomplete), vec!["One", "Three"]);
}

#[test]
fn search_hides_items_without_touching_the_collection() {
    let mut shelf = memory_shelf();
    shelf.add_book(NewBook::new("Dune", "Herbert", 1965)).unwrap();
    shelf.add_book(NewBook::new("Emma", "Austen", 1815)).unwrap();
    let before = shelf.books().to_vec();

    assert_eq!(shelf.search("dun"), 1);

    let groups = &shelf.display().groups;
    let visible: Vec<&str> = groups
        .visible(Group::Incomplete)
        .iter()
        .map(|item| item.title.as_str())
        .collect();
    assert_eq!(visible, vec!["Dune"]);
    assert_eq!(shelf.books(), before.as_slice());
}

#[test]
fn next_mutation_resets_the_filter() {
    let mut shelf = memory_shelf();
    shelf.add_book(NewBook::new("Dune", "Herbert", 1965)).unwrap();
    let emma = shelf.add_book(NewBook::new("Emma", "Austen", 1815)).unwrap();
    shelf.search("dune");

    shelf.mark_complete(emma.id).unwrap();

    let groups = &shelf.display().groups;
    assert_eq!(groups.visible(Group::Incomplete).len(), 1);
    assert_eq!(groups.visible(Group::Completed).len(), 1);
}

#[test]
fn render_precedes_save_for_every_mutation() {
    let mut shelf = memory_shelf();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    shelf.subscribe(move |event| sink.borrow_mut().push(event.clone()));

    let book = shelf.add_book(NewBook::new("Dune", "Herbert", 1965)).unwrap();
    shelf.apply(BookAction::Delete(book.id)).unwrap();

    let events = seen.borrow();
    assert_eq!(events.len(), 4);
    assert_eq!(events[0], ShelfEvent::RenderRequested { total: 1 });
    assert!(matches!(events[1], ShelfEvent::Saved { bytes } if bytes > 2));
    assert_eq!(events[2], ShelfEvent::RenderRequested { total: 0 });
    assert_eq!(events[3], ShelfEvent::Saved { bytes: 2 });
}

#[test]
fn unknown_ids_skip_render_and_save() {
    let mut shelf = memory_shelf();
    let redraws = shelf.display().redraws;
    let seen = Rc::new(RefCell::new(0usize));
    let sink = Rc::clone(&seen);
    shelf.subscribe(move |_| *sink.borrow_mut() += 1);

    assert!(!shelf.mark_complete(99).unwrap());
    assert!(!shelf.undo_complete(99).unwrap());
    assert_eq!(shelf.remove_book(99).unwrap(), None);
    assert!(!shelf.apply(BookAction::Complete(99)).unwrap());

    assert_eq!(*seen.borrow(), 0);
    assert_eq!(shelf.display().redraws, redraws);
}

#[test]
fn unavailable_storage_still_updates_memory_but_never_signals_saved() {
    let (mut shelf, outcome) = Shelf::load(Persistence::unavailable(), RecordingDisplay::default());
    assert_eq!(outcome, LoadOutcome::Unavailable);
    assert!(!shelf.storage_available());

    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    shelf.subscribe(move |event| sink.borrow_mut().push(event.clone()));

    let result = shelf.add_book(NewBook::new("Dune", "Herbert", 1965));
    assert!(matches!(result, Err(StorageError::Unavailable)));
    assert_eq!(shelf.store().len(), 1);
    assert_eq!(titles(&shelf, Group::Incomplete), vec!["Dune"]);
    assert_eq!(*seen.borrow(), vec![ShelfEvent::RenderRequested { total: 1 }]);
}

#[test]
fn reload_restores_the_same_collection() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("bookshelf.sqlite");

    let saved = {
        let (mut shelf, _) = Shelf::load(Persistence::open(&db_path), RecordingDisplay::default());
        let dune = shelf.add_book(NewBook::new("Dune", "Herbert", 1965)).unwrap();
        shelf.add_book(NewBook::new("Emma", "Austen", 1815).completed(true)).unwrap();
        shelf.mark_complete(dune.id).unwrap();
        shelf.books().to_vec()
    };

    let (shelf, outcome) = Shelf::load(Persistence::open(&db_path), RecordingDisplay::default());
    assert_eq!(outcome, LoadOutcome::Loaded(2));
    assert_eq!(shelf.books(), saved.as_slice());
    assert_eq!(shelf.display().redraws, 1);
    assert_eq!(titles(&shelf, Group::Completed), vec!["Dune", "Emma"]);
}
