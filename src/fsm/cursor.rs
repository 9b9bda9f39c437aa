//! Wrapping list cursor with a scroll window.
//!
//! Lists have `rows` entries of which `visible` are on screen at once.
//! Some rows (section headers) cannot hold the cursor.  Moving past either
//! end wraps around; the window follows the cursor so it is always visible.

use serde::Serialize;

/// Shape of a list at the moment of navigation.
#[derive(Clone, Copy)]
pub struct ListShape {
    pub rows: u8,
    pub visible: u8,
    pub selectable: fn(u8) -> bool,
}

fn any_row(_row: u8) -> bool {
    true
}

impl ListShape {
    /// A list whose every row accepts the cursor.
    pub const fn uniform(rows: u8, visible: u8) -> Self {
        Self { rows, visible, selectable: any_row }
    }

    pub fn is_selectable(&self, row: u8) -> bool {
        row < self.rows && (self.selectable)(row)
    }

    /// First row shown when the list is scrolled all the way down.
    pub fn max_first_visible(&self) -> u8 {
        self.rows.saturating_sub(self.visible.max(1))
    }
}

impl core::fmt::Debug for ListShape {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ListShape")
            .field("rows", &self.rows)
            .field("visible", &self.visible)
            .finish_non_exhaustive()
    }
}

/// Selected row plus the first row of the scroll window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ListCursor {
    row: u8,
    first_visible: u8,
}

impl ListCursor {
    pub fn row(&self) -> u8 {
        self.row
    }

    pub fn first_visible(&self) -> u8 {
        self.first_visible
    }

    /// Back to the top of the list, on the first selectable row.
    pub fn reset(&mut self, shape: &ListShape) {
        *self = Self::default();
        if shape.rows > 0 && !shape.is_selectable(0) {
            self.step(shape, true);
        }
    }

    pub fn up(&mut self, shape: &ListShape) {
        self.step(shape, false);
    }

    pub fn down(&mut self, shape: &ListShape) {
        self.step(shape, true);
    }

    /// Pull the cursor and window back inside a list that may have shrunk.
    pub fn clamp(&mut self, shape: &ListShape) {
        if shape.rows == 0 {
            *self = Self::default();
            return;
        }
        self.row = self.row.min(shape.rows - 1);
        if !shape.is_selectable(self.row) {
            self.step(shape, true);
        }
        self.first_visible = self.first_visible.min(shape.max_first_visible());
        self.scroll_into_view(shape);
    }

    fn step(&mut self, shape: &ListShape, forward: bool) {
        if shape.rows == 0 {
            *self = Self::default();
            return;
        }
        let last = shape.rows - 1;
        let mut row = self.row.min(last);
        for _ in 0..shape.rows {
            row = match (forward, row) {
                (true, r) if r >= last => 0,
                (true, r) => r + 1,
                (false, 0) => last,
                (false, r) => r - 1,
            };
            if shape.is_selectable(row) {
                self.row = row;
                self.scroll_into_view(shape);
                return;
            }
        }
    }

    fn scroll_into_view(&mut self, shape: &ListShape) {
        let visible = shape.visible.max(1);
        if self.row < self.first_visible {
            self.first_visible = self.row;
        } else if u16::from(self.row) >= u16::from(self.first_visible) + u16::from(visible) {
            self.first_visible = self.row + 1 - visible;
        }
    }
}
