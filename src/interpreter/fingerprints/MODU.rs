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

use crate::cell::{cell_rem, Cell};
use crate::interpreter::instruction_set::{Instruction, InstructionResult, InstructionSet};
use crate::interpreter::ip::InstructionPointer;
use crate::interpreter::InterpreterEnv;
use crate::FungeSpace;

/// From the catseye library
///
/// Fingerprint 0x4d4f4455 ('MODU')
///
/// The MODU fingerprint implements some of the finer, less-well-agreed-upon
/// points of modulo arithmetic. With positive arguments these instructions
/// all agree with `%`; they differ on what a negative remainder means:
///
/// - `M` is the floored-division remainder (the result follows the sign of
///   the divisor, as in Python).
/// - `U` is the Euclidean remainder (never negative).
/// - `R` is the C-language truncating remainder.
///
/// All three treat a zero divisor like `%` does: the result is 0.
pub fn load<Env: InterpreterEnv>(instructionset: &mut InstructionSet<Env>) -> bool {
    let layer: [(char, Instruction<Env>); 3] =
        [('M', signed_rem), ('R', c_rem), ('U', unsigned_rem)];
    instructionset.add_layer(&layer);
    true
}

pub fn unload<Env: InterpreterEnv>(instructionset: &mut InstructionSet<Env>) -> bool {
    instructionset.pop_layer("MRU")
}

fn signed_rem<Env: InterpreterEnv>(
    ip: &mut InstructionPointer<Env>,
    _space: &mut FungeSpace,
    _env: &mut Env,
) -> InstructionResult {
    let b = ip.pop();
    let a = ip.pop();
    let r = cell_rem(a, b);
    ip.push(if r != 0 && (r < 0) != (b < 0) {
        r.wrapping_add(b)
    } else {
        r
    });
    InstructionResult::Continue
}

fn unsigned_rem<Env: InterpreterEnv>(
    ip: &mut InstructionPointer<Env>,
    _space: &mut FungeSpace,
    _env: &mut Env,
) -> InstructionResult {
    let b = ip.pop();
    let a = ip.pop();
    let r = cell_rem(a, b);
    ip.push(if r < 0 {
        r.wrapping_add(b.wrapping_abs())
    } else {
        r
    });
    InstructionResult::Continue
}

fn c_rem<Env: InterpreterEnv>(
    ip: &mut InstructionPointer<Env>,
    _space: &mut FungeSpace,
    _env: &mut Env,
) -> InstructionResult {
    let b = ip.pop();
    let a = ip.pop();
    ip.push(cell_rem(a, b));
    InstructionResult::Continue
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::tests::NoEnv;

    fn apply(
        f: Instruction<NoEnv>,
        a: Cell,
        b: Cell,
    ) -> Cell {
        let mut ip = InstructionPointer::<NoEnv>::new();
        let mut space = FungeSpace::new();
        let mut env = NoEnv::new();
        ip.push(a);
        ip.push(b);
        f(&mut ip, &mut space, &mut env);
        ip.pop()
    }

    #[test]
    fn test_signed_rem() {
        assert_eq!(apply(signed_rem, 7, 3), 1);
        assert_eq!(apply(signed_rem, -7, 3), 2);
        assert_eq!(apply(signed_rem, 7, -3), -2);
        assert_eq!(apply(signed_rem, -7, -3), -1);
        assert_eq!(apply(signed_rem, -6, 3), 0);
        assert_eq!(apply(signed_rem, 7, 0), 0);
    }

    #[test]
    fn test_unsigned_rem() {
        assert_eq!(apply(unsigned_rem, 7, 3), 1);
        assert_eq!(apply(unsigned_rem, -7, 3), 2);
        assert_eq!(apply(unsigned_rem, -7, -3), 2);
        assert_eq!(apply(unsigned_rem, 7, 0), 0);
    }

    #[test]
    fn test_c_rem() {
        assert_eq!(apply(c_rem, 7, 3), 1);
        assert_eq!(apply(c_rem, -7, 3), -1);
        assert_eq!(apply(c_rem, 7, -3), 1);
        assert_eq!(apply(c_rem, 7, 0), 0);
    }
}
