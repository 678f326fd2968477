/// Move selection cursor one item up, stopping at the first item.
pub fn select_prev(selected: usize) -> usize {
    selected.saturating_sub(1)
}

/// Move selection cursor one item down if another item exists.
pub fn select_next(selected: usize, item_count: usize) -> usize {
    if selected + 1 < item_count {
        selected + 1
    } else {
        selected
    }
}

/// Move one item forward, wrapping from the last item to the first.
pub fn cycle_next(selected: usize, item_count: usize) -> usize {
    if item_count == 0 {
        0
    } else {
        (selected + 1) % item_count
    }
}

/// Move one item back, wrapping from the first item to the last.
pub fn cycle_prev(selected: usize, item_count: usize) -> usize {
    if item_count == 0 {
        0
    } else if selected == 0 || selected >= item_count {
        item_count - 1
    } else {
        selected - 1
    }
}
