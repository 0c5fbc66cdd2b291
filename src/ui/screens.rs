use crate::render::{BookDisplay, BookGroups, BookItem, Group};

/// Display collaborator backing the two-panel shelf screen. Holds the last
/// rendered groups plus cursor state for each panel.
#[derive(Debug, Clone)]
pub struct ShelfView {
    pub(crate) groups: BookGroups,
    pub(crate) focus: Group,
    selected_incomplete: usize,
    selected_completed: usize,
    redraws: usize,
}

impl Default for ShelfView {
    fn default() -> Self {
        Self {
            groups: BookGroups::default(),
            focus: Group::Incomplete,
            selected_incomplete: 0,
            selected_completed: 0,
            redraws: 0,
        }
    }
}

impl BookDisplay for ShelfView {
    fn display(&mut self, groups: BookGroups) {
        self.groups = groups;
        self.redraws += 1;
        self.ensure_in_bounds();
    }

    fn groups_mut(&mut self) -> &mut BookGroups {
        &mut self.groups
    }
}

impl ShelfView {
    pub fn groups(&self) -> &BookGroups {
        &self.groups
    }

    /// How many times the view was handed a fresh render.
    pub fn redraws(&self) -> usize {
        self.redraws
    }

    pub(crate) fn selected(&self, group: Group) -> usize {
        match group {
            Group::Incomplete => self.selected_incomplete,
            Group::Completed => self.selected_completed,
        }
    }

    fn selected_mut(&mut self, group: Group) -> &mut usize {
        match group {
            Group::Incomplete => &mut self.selected_incomplete,
            Group::Completed => &mut self.selected_completed,
        }
    }

    pub(crate) fn visible_len(&self, group: Group) -> usize {
        self.groups
            .group(group)
            .iter()
            .filter(|item| item.visible)
            .count()
    }

    /// Item under the cursor in the focused panel, skipping hidden items.
    pub(crate) fn current_item(&self) -> Option<&BookItem> {
        let index = self.selected(self.focus);
        self.groups
            .group(self.focus)
            .iter()
            .filter(|item| item.visible)
            .nth(index)
    }

    pub(crate) fn switch_focus(&mut self) {
        self.focus = self.focus.other();
    }

    pub(crate) fn move_selection(&mut self, offset: isize) {
        let len = self.visible_len(self.focus) as isize;
        if len == 0 {
            return;
        }
        let current = self.selected(self.focus) as isize;
        let new = (current + offset).clamp(0, len - 1);
        *self.selected_mut(self.focus) = new as usize;
    }

    pub(crate) fn select_first(&mut self) {
        *self.selected_mut(self.focus) = 0;
    }

    pub(crate) fn select_last(&mut self) {
        let len = self.visible_len(self.focus);
        *self.selected_mut(self.focus) = len.saturating_sub(1);
    }

    /// Put the cursor on `id`, switching panels if the book moved groups.
    pub(crate) fn focus_book(&mut self, id: i64) {
        for group in [Group::Incomplete, Group::Completed] {
            let position = self
                .groups
                .group(group)
                .iter()
                .filter(|item| item.visible)
                .position(|item| item.id == id);
            if let Some(index) = position {
                self.focus = group;
                *self.selected_mut(group) = index;
                return;
            }
        }
    }

    /// Clamp both cursors after the visible set changed.
    pub(crate) fn ensure_in_bounds(&mut self) {
        for group in [Group::Incomplete, Group::Completed] {
            let len = self.visible_len(group);
            let selected = self.selected_mut(group);
            if len == 0 {
                *selected = 0;
            } else if *selected >= len {
                *selected = len - 1;
            }
        }
    }
}
