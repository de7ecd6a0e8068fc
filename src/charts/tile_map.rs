//! Tile-grid layout of the US: one equal-size tile per state plus DC.

pub const GRID_COLS: u8 = 11;
pub const GRID_ROWS: u8 = 8;

/// (code, column, row)
const TILES: [(&str, u8, u8); 51] = [
    ("AK", 0, 0),
    ("ME", 10, 0),
    ("VT", 9, 1),
    ("NH", 10, 1),
    ("WA", 0, 2),
    ("ID", 1, 2),
    ("MT", 2, 2),
    ("ND", 3, 2),
    ("MN", 4, 2),
    ("IL", 5, 2),
    ("WI", 6, 2),
    ("MI", 7, 2),
    ("NY", 8, 2),
    ("RI", 9, 2),
    ("MA", 10, 2),
    ("OR", 0, 3),
    ("NV", 1, 3),
    ("WY", 2, 3),
    ("SD", 3, 3),
    ("IA", 4, 3),
    ("IN", 5, 3),
    ("OH", 6, 3),
    ("PA", 7, 3),
    ("NJ", 8, 3),
    ("CT", 9, 3),
    ("CA", 0, 4),
    ("UT", 1, 4),
    ("CO", 2, 4),
    ("NE", 3, 4),
    ("MO", 4, 4),
    ("KY", 5, 4),
    ("WV", 6, 4),
    ("VA", 7, 4),
    ("MD", 8, 4),
    ("DE", 9, 4),
    ("AZ", 1, 5),
    ("NM", 2, 5),
    ("KS", 3, 5),
    ("AR", 4, 5),
    ("TN", 5, 5),
    ("NC", 6, 5),
    ("SC", 7, 5),
    ("DC", 8, 5),
    ("OK", 3, 6),
    ("LA", 4, 6),
    ("MS", 5, 6),
    ("AL", 6, 6),
    ("GA", 7, 6),
    ("HI", 0, 7),
    ("TX", 3, 7),
    ("FL", 8, 7),
];

/// Grid cell `(column, row)` for a canonical code.
pub fn tile_position(code: &str) -> Option<(u8, u8)> {
    TILES
        .iter()
        .find(|(c, _, _)| *c == code)
        .map(|&(_, col, row)| (col, row))
}

/// Code placed at a grid cell, if any.
pub fn tile_at(col: u8, row: u8) -> Option<&'static str> {
    TILES
        .iter()
        .find(|(_, c, r)| *c == col && *r == row)
        .map(|(code, _, _)| *code)
}

/// Every tile in layout order.
pub fn tiles() -> impl Iterator<Item = (&'static str, u8, u8)> {
    TILES.iter().copied()
}
