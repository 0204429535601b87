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

//! The funge cell type and total arithmetic on it.
//!
//! Cells are 64-bit signed integers by default; building with the `cell32`
//! feature shrinks them to 32 bits. Programs can query the width through the
//! sysinfo instruction.

/// One slot in funge-space or on a stack.
#[cfg(feature = "cell32")]
pub type Cell = i32;
/// One slot in funge-space or on a stack.
#[cfg(not(feature = "cell32"))]
pub type Cell = i64;

/// The blank value of funge-space.
pub const SPACE: Cell = ' ' as Cell;

/// Number of bits in a [Cell], as reported by sysinfo.
pub const CELL_BITS: Cell = (std::mem::size_of::<Cell>() * 8) as Cell;

/// Division that can never raise an arithmetic signal.
///
/// Division by zero yields 0, and `MIN / -1` yields `MIN` instead of
/// overflowing.
#[inline(always)]
pub fn cell_div(numerator: Cell, denominator: Cell) -> Cell {
    if denominator == 0 {
        0
    } else if numerator == Cell::MIN && denominator == -1 {
        Cell::MIN
    } else {
        numerator / denominator
    }
}

/// Remainder that can never raise an arithmetic signal.
///
/// Modulus by zero yields 0, and `MIN % -1` yields 0.
#[inline(always)]
pub fn cell_rem(numerator: Cell, denominator: Cell) -> Cell {
    if denominator == 0 {
        0
    } else if numerator == Cell::MIN && denominator == -1 {
        0
    } else {
        numerator % denominator
    }
}

/// Return the cell as a character, if the unicode code point exists.
pub fn try_to_char(value: Cell) -> Option<char> {
    u32::try_from(value).ok().and_then(char::from_u32)
}

/// Return the cell as a character, or U+FFFD �
pub fn to_char(value: Cell) -> char {
    try_to_char(value).unwrap_or('�')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_division_is_total() {
        assert_eq!(cell_div(7, 2), 3);
        assert_eq!(cell_div(-7, 2), -3);
        assert_eq!(cell_div(7, 0), 0);
        assert_eq!(cell_div(0, 0), 0);
        assert_eq!(cell_div(Cell::MIN, -1), Cell::MIN);
        assert_eq!(cell_div(Cell::MAX, -1), -Cell::MAX);
    }

    #[test]
    fn test_modulus_is_total() {
        assert_eq!(cell_rem(7, 2), 1);
        assert_eq!(cell_rem(-7, 2), -1);
        assert_eq!(cell_rem(7, 0), 0);
        assert_eq!(cell_rem(Cell::MIN, -1), 0);
    }

    #[test]
    fn test_to_char() {
        assert_eq!(to_char('A' as Cell), 'A');
        assert_eq!(to_char(-1), '�');
        assert_eq!(try_to_char(0x110000), None);
    }
}
