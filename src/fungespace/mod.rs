/*
rsfunge – a standard-conforming Befunge-93/98/109 interpreter
Copyright © 2022 The rsfunge developers

This program is free software: you can redistribute it and/or modify
it under the terms of the GNU Affero General Public License as
published by the Free Software Foundation, either version 3 of the
License, or (at your option) any later version.

This program is distributed in the hope that it will be useful,
but WITHOUT ANY WARRANTY; without even the implied warranty of
MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
GNU Affero General Public License for more details.

You should have received a copy of the GNU Affero General Public License
along with this program. If not, see <https://www.gnu.org/licenses/>.
*/

//! Funge-space: the sparse, unbounded, self-modifiable program grid.
//!
//! A dense array covers a window around the origin where almost all programs
//! live; everything outside it goes into a hash map keyed by exact
//! coordinates. The space tracks a bounding rectangle around all non-blank
//! cells, which is what the wrapping algorithm and the sysinfo instruction
//! consult. The rectangle may overestimate: writing a space never shrinks it.

pub mod index;

use hashbrown::HashMap;

use crate::cell::{Cell, SPACE};

pub use self::index::{fvec, FungeVector, ORIGIN};

const STATIC_WIDTH: i64 = 512;
const STATIC_HEIGHT: i64 = 1024;
const STATIC_OFFSET_X: i64 = 64;
const STATIC_OFFSET_Y: i64 = 64;

/// Linear index into the dense window, if the position lies within it.
#[inline(always)]
fn static_index(position: FungeVector) -> Option<usize> {
    // The unsigned wrap folds both below-window and above-window coordinates
    // past the range check.
    let x = (position.x as i64).wrapping_add(STATIC_OFFSET_X) as u64;
    let y = (position.y as i64).wrapping_add(STATIC_OFFSET_Y) as u64;
    if x < STATIC_WIDTH as u64 && y < STATIC_HEIGHT as u64 {
        Some((y * STATIC_WIDTH as u64 + x) as usize)
    } else {
        None
    }
}

/// The shared two-dimensional grid holding the program.
pub struct FungeSpace {
    static_area: Vec<Cell>,
    entries: HashMap<FungeVector, Cell>,
    top_left: FungeVector,
    bottom_right: FungeVector,
    /// False until the first non-blank cell is written, so that a program
    /// not anchored at the origin still gets a tight rectangle on load.
    bounds_valid: bool,
}

impl Default for FungeSpace {
    fn default() -> Self {
        Self::new()
    }
}

impl FungeSpace {
    pub fn new() -> Self {
        Self {
            static_area: vec![SPACE; (STATIC_WIDTH * STATIC_HEIGHT) as usize],
            entries: HashMap::new(),
            top_left: ORIGIN,
            bottom_right: ORIGIN,
            bounds_valid: false,
        }
    }

    /// Read the cell at `position`. Unset cells read as space.
    pub fn get(&self, position: FungeVector) -> Cell {
        if let Some(idx) = static_index(position) {
            self.static_area[idx]
        } else {
            self.entries.get(&position).copied().unwrap_or(SPACE)
        }
    }

    /// Read the cell at `position + offset` (the `g` instruction).
    pub fn get_offset(&self, position: FungeVector, offset: FungeVector) -> Cell {
        self.get(position + offset)
    }

    fn set_no_bounds_update(&mut self, position: FungeVector, value: Cell) {
        if let Some(idx) = static_index(position) {
            self.static_area[idx] = value;
        } else if value == SPACE {
            self.entries.remove(&position);
        } else {
            self.entries.insert(position, value);
        }
    }

    /// Write the cell at `position`, growing the bounding rectangle around
    /// any non-blank value.
    pub fn set(&mut self, position: FungeVector, value: Cell) {
        self.set_no_bounds_update(position, value);
        if value != SPACE {
            if !self.bounds_valid {
                self.top_left = position;
                self.bottom_right = position;
                self.bounds_valid = true;
            } else {
                self.top_left.x = self.top_left.x.min(position.x);
                self.top_left.y = self.top_left.y.min(position.y);
                self.bottom_right.x = self.bottom_right.x.max(position.x);
                self.bottom_right.y = self.bottom_right.y.max(position.y);
            }
        }
    }

    /// Write the cell at `position + offset` (the `p` instruction).
    pub fn set_offset(&mut self, position: FungeVector, offset: FungeVector, value: Cell) {
        self.set(position + offset, value);
    }

    /// The bounding rectangle as an inclusive (top-left, bottom-right) pair.
    pub fn bounds(&self) -> (FungeVector, FungeVector) {
        (self.top_left, self.bottom_right)
    }

    #[inline]
    fn in_range(&self, position: FungeVector) -> bool {
        position.x >= self.top_left.x
            && position.x <= self.bottom_right.x
            && position.y >= self.top_left.y
            && position.y <= self.bottom_right.y
    }

    /// Bring an out-of-bounds position back into the bounding rectangle
    /// without crossing the blank exterior (Lahey-space wrapping).
    ///
    /// A cardinal delta snaps straight to the opposite edge. Any other delta
    /// walks backwards along its own ray through the rectangle and stops at
    /// the last in-range point on the far side.
    pub fn wrap(&self, position: &mut FungeVector, delta: FungeVector) {
        if self.in_range(*position) {
            return;
        }
        if delta.is_cardinal() {
            if position.x < self.top_left.x {
                position.x = self.bottom_right.x;
            } else if position.x > self.bottom_right.x {
                position.x = self.top_left.x;
            }
            if position.y < self.top_left.y {
                position.y = self.bottom_right.y;
            } else if position.y > self.bottom_right.y {
                position.y = self.top_left.y;
            }
        } else {
            loop {
                *position -= delta;
                if !self.in_range(*position) {
                    break;
                }
            }
            *position += delta;
        }
    }

    /// Load a program into funge-space with its first character at the
    /// origin. Any of CR, LF and CRLF end a line (they may be mixed within
    /// one file); Form Feed is ignored; spaces are transparent.
    pub fn load_string(&mut self, program: &[u8]) {
        let mut last_was_cr = false;
        let mut x: Cell = 0;
        let mut y: Cell = 0;
        for &byte in program {
            match byte {
                b'\x0c' => {}
                b'\r' => {
                    last_was_cr = true;
                }
                b'\n' => {
                    x = 0;
                    y += 1;
                    last_was_cr = false;
                }
                _ => {
                    if last_was_cr {
                        last_was_cr = false;
                        x = 0;
                        y += 1;
                    }
                    if byte != b' ' {
                        self.set(fvec(x, y), byte as Cell);
                    }
                    x += 1;
                }
            }
        }
    }

    /// Load file contents at `offset` (the `i` instruction). Returns the
    /// size of the loaded region.
    ///
    /// In text mode line ends reset x and advance y, and spaces are
    /// transparent like in [FungeSpace::load_string]. In binary mode every
    /// byte lands in one long row, line ends included.
    pub fn load_at_offset(&mut self, src: &[u8], offset: FungeVector, binary: bool) -> FungeVector {
        let mut size = ORIGIN;
        let mut last_was_cr = false;
        let mut x: Cell = 0;
        let mut y: Cell = 0;
        if binary {
            for &byte in src {
                self.set(fvec(x, y) + offset, byte as Cell);
                x += 1;
            }
        } else {
            for &byte in src {
                match byte {
                    b'\r' => {
                        last_was_cr = true;
                    }
                    b'\n' => {
                        size.x = size.x.max(x);
                        x = 0;
                        y += 1;
                        last_was_cr = false;
                    }
                    _ => {
                        if last_was_cr {
                            last_was_cr = false;
                            size.x = size.x.max(x);
                            x = 0;
                            y += 1;
                        }
                        if byte != b' ' {
                            self.set(fvec(x, y) + offset, byte as Cell);
                        }
                        x += 1;
                    }
                }
            }
        }
        size.x = size.x.max(x);
        size.y = size.y.max(y);
        size
    }

    /// Render the rectangle at `offset` of the given `size` for the `o`
    /// instruction.
    ///
    /// Binary mode emits exactly `size.x` bytes per row, each row ended by a
    /// line feed. Text mode strips trailing spaces from every row and
    /// trailing line ends from the whole output.
    pub fn save_region(&self, offset: FungeVector, size: FungeVector, textfile: bool) -> Vec<u8> {
        let mut out = Vec::new();
        let mut y = offset.y;
        while y < offset.y + size.y {
            let row_end = out.len();
            let mut x = offset.x;
            while x < offset.x + size.x {
                out.push(self.get(fvec(x, y)) as u8);
                x += 1;
            }
            if textfile {
                while out.len() > row_end && out.last() == Some(&b' ') {
                    out.pop();
                }
            }
            out.push(b'\n');
            y += 1;
        }
        if textfile {
            while out.last() == Some(&b'\n') {
                out.pop();
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn space_with(src: &str) -> FungeSpace {
        let mut space = FungeSpace::new();
        space.load_string(src.as_bytes());
        space
    }

    #[test]
    fn test_load_and_get() {
        let space = space_with("1   5  8\n\n  a b    c\r\n A");
        assert_eq!(space.get(fvec(0, 0)), '1' as Cell);
        assert_eq!(space.get(fvec(7, 0)), '8' as Cell);
        assert_eq!(space.get(fvec(2, 2)), 'a' as Cell);
        assert_eq!(space.get(fvec(9, 2)), 'c' as Cell);
        assert_eq!(space.get(fvec(1, 3)), 'A' as Cell);
        assert_eq!(space.get(fvec(1, 0)), SPACE);
        assert_eq!(space.get(fvec(-30, 17)), SPACE);
        assert_eq!(space.bounds(), (fvec(0, 0), fvec(9, 3)));
    }

    #[test]
    fn test_form_feed_is_ignored() {
        let space = space_with("ab\x0ccd\nx");
        assert_eq!(space.get(fvec(3, 0)), 'd' as Cell);
        assert_eq!(space.get(fvec(0, 1)), 'x' as Cell);
    }

    #[test]
    fn test_bounds_of_unanchored_program() {
        let mut space = FungeSpace::new();
        space.load_string(b"   q");
        assert_eq!(space.bounds(), (fvec(3, 0), fvec(3, 0)));
    }

    #[test]
    fn test_far_away_cells_use_the_sparse_region() {
        let mut space = FungeSpace::new();
        space.set(fvec(32000, 8000), '0' as Cell);
        assert_eq!(space.get(fvec(32000, 8000)), '0' as Cell);
        space.set(fvec(32000, 8000), SPACE);
        assert_eq!(space.get(fvec(32000, 8000)), SPACE);
        assert!(space.entries.is_empty());
    }

    #[test]
    fn test_bounds_grow_but_never_shrink() {
        let mut space = space_with("abc");
        space.set(fvec(10, 5), 'x' as Cell);
        assert_eq!(space.bounds(), (fvec(0, 0), fvec(10, 5)));
        space.set(fvec(-2, -1), 'y' as Cell);
        assert_eq!(space.bounds(), (fvec(-2, -1), fvec(10, 5)));
        // blanking a cell must not contract the rectangle
        space.set(fvec(10, 5), SPACE);
        space.set(fvec(-2, -1), SPACE);
        assert_eq!(space.bounds(), (fvec(-2, -1), fvec(10, 5)));
    }

    #[test]
    fn test_wrap_is_idempotent_inside() {
        let space = space_with("12345\n67890");
        for delta in [fvec(1, 0), fvec(0, -1), fvec(2, 3)] {
            let mut pos = fvec(3, 1);
            space.wrap(&mut pos, delta);
            assert_eq!(pos, fvec(3, 1));
        }
    }

    #[test]
    fn test_cardinal_wrap_snaps_to_opposite_edge() {
        let space = space_with("12345\n67890\nabcde");
        let mut pos = fvec(-1, 1);
        space.wrap(&mut pos, fvec(-1, 0));
        assert_eq!(pos, fvec(4, 1));
        let mut pos = fvec(5, 0);
        space.wrap(&mut pos, fvec(1, 0));
        assert_eq!(pos, fvec(0, 0));
        let mut pos = fvec(2, 3);
        space.wrap(&mut pos, fvec(0, 1));
        assert_eq!(pos, fvec(2, 0));
        let mut pos = fvec(2, -1);
        space.wrap(&mut pos, fvec(0, -1));
        assert_eq!(pos, fvec(2, 2));
    }

    #[test]
    fn test_flying_wrap_walks_back_through_the_rectangle() {
        // 10 columns, 5 rows
        let space = space_with("xxxxxxxxxx\nxxxxxxxxxx\nxxxxxxxxxx\nxxxxxxxxxx\nxxxxxxxxxx");
        let mut pos = fvec(10, 5);
        space.wrap(&mut pos, fvec(1, 1));
        assert_eq!(pos, fvec(5, 0));
        let mut pos = fvec(-1, 2);
        space.wrap(&mut pos, fvec(-2, 0));
        assert_eq!(pos, fvec(9, 2));
    }

    #[test]
    fn test_load_at_offset_text() {
        let mut space = FungeSpace::new();
        space.set(fvec(0, 0), 'q' as Cell);
        let size = space.load_at_offset(b"ab\ncdef\r\ng h", fvec(10, 2), false);
        assert_eq!(size, fvec(4, 2));
        assert_eq!(space.get(fvec(10, 2)), 'a' as Cell);
        assert_eq!(space.get(fvec(13, 3)), 'f' as Cell);
        assert_eq!(space.get(fvec(10, 4)), 'g' as Cell);
        assert_eq!(space.get(fvec(12, 4)), 'h' as Cell);
        // spaces in the file are transparent
        assert_eq!(space.get(fvec(11, 4)), SPACE);
    }

    #[test]
    fn test_load_at_offset_binary() {
        let mut space = FungeSpace::new();
        space.set(fvec(0, 0), 'q' as Cell);
        let size = space.load_at_offset(b"ab\ncd", fvec(5, 1), true);
        assert_eq!(size, fvec(5, 0));
        assert_eq!(space.get(fvec(5, 1)), 'a' as Cell);
        assert_eq!(space.get(fvec(7, 1)), '\n' as Cell);
        assert_eq!(space.get(fvec(9, 1)), 'd' as Cell);
    }

    #[test]
    fn test_save_region_binary() {
        let space = space_with("ab\ncd");
        let data = space.save_region(fvec(0, 0), fvec(3, 2), false);
        assert_eq!(data, b"ab \ncd \n");
    }

    #[test]
    fn test_save_region_text_trims() {
        let space = space_with("ab\ncd");
        let data = space.save_region(fvec(0, 0), fvec(3, 4), true);
        assert_eq!(data, b"ab\ncd");
        let data = space.save_region(fvec(1, 0), fvec(2, 2), true);
        assert_eq!(data, b"b\nd");
    }
}
