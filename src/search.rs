use crate::render::BookGroups;

/// Show items whose title contains `query` (case-insensitive) and hide the
/// rest. Only the rendered output changes; the next render resets it.
/// Returns how many items stayed visible.
pub fn filter(groups: &mut BookGroups, query: &str) -> usize {
    let needle = query.to_lowercase();
    let mut shown = 0;
    for item in groups.items_mut() {
        item.visible = item.title.to_lowercase().contains(&needle);
        if item.visible {
            shown += 1;
        }
    }
    shown
}
