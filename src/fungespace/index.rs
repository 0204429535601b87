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

use std::fmt::{Display, Formatter};
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};

use crate::cell::Cell;

/// A position in, or movement over, funge-space. The two roles share one
/// type; the interpreter freely mixes them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FungeVector {
    pub x: Cell,
    pub y: Cell,
}

/// Convenience function to create a [FungeVector]
#[inline(always)]
pub const fn fvec(x: Cell, y: Cell) -> FungeVector {
    FungeVector { x, y }
}

/// The origin, (0, 0).
pub const ORIGIN: FungeVector = fvec(0, 0);

impl FungeVector {
    /// A vector is cardinal iff it is one of the four unit directions.
    pub fn is_cardinal(&self) -> bool {
        let x = self.x.unsigned_abs();
        let y = self.y.unsigned_abs();
        x.wrapping_add(y) == 1 && (x == 0 || y == 0)
    }

    /// The delta after a 90° turn to the left, as seen by an IP travelling
    /// over a grid whose y axis grows downwards.
    pub fn turned_left(&self) -> Self {
        fvec(self.y, -self.x)
    }

    /// The delta after a 90° turn to the right.
    pub fn turned_right(&self) -> Self {
        fvec(-self.y, self.x)
    }
}

impl Display for FungeVector {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl Add for FungeVector {
    type Output = Self;
    #[inline(always)]
    fn add(self, rhs: Self) -> Self {
        fvec(self.x.wrapping_add(rhs.x), self.y.wrapping_add(rhs.y))
    }
}

impl AddAssign for FungeVector {
    #[inline(always)]
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sub for FungeVector {
    type Output = Self;
    #[inline(always)]
    fn sub(self, rhs: Self) -> Self {
        fvec(self.x.wrapping_sub(rhs.x), self.y.wrapping_sub(rhs.y))
    }
}

impl SubAssign for FungeVector {
    #[inline(always)]
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl Mul<Cell> for FungeVector {
    type Output = Self;
    #[inline(always)]
    fn mul(self, rhs: Cell) -> Self {
        fvec(self.x.wrapping_mul(rhs), self.y.wrapping_mul(rhs))
    }
}

impl Neg for FungeVector {
    type Output = Self;
    #[inline(always)]
    fn neg(self) -> Self {
        fvec(self.x.wrapping_neg(), self.y.wrapping_neg())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vector_math() {
        assert_eq!(fvec(0, 5) + fvec(12, -3), fvec(12, 2));
        assert_eq!(fvec(3, 4) - fvec(7, 15), fvec(-4, -11));
        assert_eq!(fvec(4, 7) * 3, fvec(12, 21));
        assert_eq!(-fvec(1, -2), fvec(-1, 2));
    }

    #[test]
    fn test_is_cardinal() {
        assert!(fvec(1, 0).is_cardinal());
        assert!(fvec(-1, 0).is_cardinal());
        assert!(fvec(0, 1).is_cardinal());
        assert!(fvec(0, -1).is_cardinal());
        assert!(!fvec(0, 0).is_cardinal());
        assert!(!fvec(1, 1).is_cardinal());
        assert!(!fvec(2, 0).is_cardinal());
        assert!(!fvec(0, -2).is_cardinal());
        assert!(!fvec(Cell::MIN, 0).is_cardinal());
    }

    #[test]
    fn test_turns() {
        assert_eq!(fvec(1, 0).turned_right(), fvec(0, 1));
        assert_eq!(fvec(1, 0).turned_left(), fvec(0, -1));
        let d = fvec(3, -2);
        assert_eq!(d.turned_left().turned_right(), d);
        assert_eq!(
            d.turned_right().turned_right().turned_right().turned_right(),
            d
        );
    }
}
