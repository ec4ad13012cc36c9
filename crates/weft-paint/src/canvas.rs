//! Character-grid buffer with guarded writes.

/// A `height` × `width` grid of characters, row-major, initialized to
/// spaces. Writes outside the grid are silently dropped: paint-time overflow
/// is accepted truncation behavior, not an error.
#[derive(Debug, Clone)]
pub struct Canvas {
    width: u32,
    height: u32,
    cells: Vec<char>,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            cells: vec![' '; (width as usize).saturating_mul(height as usize)],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Writes one character at `(row, col)`; out-of-grid writes are dropped.
    pub fn put(&mut self, row: i32, col: i32, ch: char) {
        if row < 0 || col < 0 {
            return;
        }
        let (row, col) = (row as u32, col as u32);
        if row >= self.height || col >= self.width {
            return;
        }
        let idx = (row as usize).saturating_mul(self.width as usize) + col as usize;
        self.cells[idx] = ch;
    }

    /// Writes a text run left to right starting at `(row, col)`, overwriting
    /// whatever is there. The run truncates at the grid edge; no wrapping.
    pub fn put_text(&mut self, row: i32, col: i32, text: &str) {
        for (offset, ch) in text.chars().enumerate() {
            self.put(row, col + offset as i32, ch);
        }
    }

    /// Serializes the buffer row-major as newline-joined rows.
    pub fn to_text(&self) -> String {
        let width = self.width as usize;
        let mut out = String::with_capacity(self.cells.len() + self.height as usize);
        for (index, row) in self.cells.chunks(width.max(1)).enumerate() {
            if index > 0 {
                out.push('\n');
            }
            out.extend(row.iter());
        }
        out
    }
}
