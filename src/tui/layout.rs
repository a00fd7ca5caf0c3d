//! Grid geometry: how many goal cards fit per row, which row an index lives
//! on, and the smallest scroll change that keeps a row on screen.

/// Width of one goal card, including its right margin.
pub const CELL_WIDTH: u16 = 22;

/// Height of one goal card, including its bottom margin.
pub const CELL_HEIGHT: u16 = 4;

/// Lines taken by the header (title + search line).
pub const HEADER_HEIGHT: u16 = 2;

/// Lines taken by the footer (status + shortcuts).
pub const FOOTER_HEIGHT: u16 = 2;

/// Number of grid columns for a viewport width. Never less than 1.
pub fn columns_for(width: u16) -> usize {
    usize::from(width / CELL_WIDTH).max(1)
}

/// Number of fully visible grid rows for a viewport height. Never less than 1.
pub fn visible_rows_for(height: u16) -> usize {
    let grid = height.saturating_sub(HEADER_HEIGHT + FOOTER_HEIGHT);
    usize::from(grid / CELL_HEIGHT).max(1)
}

pub fn row_of(index: usize, columns: usize) -> usize {
    index / columns.max(1)
}

pub fn column_of(index: usize, columns: usize) -> usize {
    index % columns.max(1)
}

pub fn total_rows(len: usize, columns: usize) -> usize {
    len.div_ceil(columns.max(1))
}

/// Largest valid first row for the given geometry.
pub fn max_scroll(total_rows: usize, visible_rows: usize) -> usize {
    total_rows.saturating_sub(visible_rows.max(1))
}

/// Scroll offset that keeps `selected_row` visible while moving the view as
/// little as possible. Never re-centers.
pub fn minimal_scroll(
    selected_row: usize,
    first_row: usize,
    visible_rows: usize,
    total_rows: usize,
) -> usize {
    let visible_rows = visible_rows.max(1);

    let offset = if selected_row < first_row {
        selected_row
    } else if selected_row > first_row + visible_rows - 1 {
        selected_row + 1 - visible_rows
    } else {
        first_row
    };

    offset.min(max_scroll(total_rows, visible_rows))
}

/// Scroll offset for a cursor index in a list of `len` items.
pub fn scroll_for_cursor(
    cursor: usize,
    len: usize,
    scroll_offset: usize,
    width: u16,
    height: u16,
) -> usize {
    let columns = columns_for(width);
    minimal_scroll(
        row_of(cursor, columns),
        scroll_offset,
        visible_rows_for(height),
        total_rows(len, columns),
    )
}
