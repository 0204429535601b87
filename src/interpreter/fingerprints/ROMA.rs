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

use crate::cell::Cell;
use crate::interpreter::instruction_set::{Instruction, InstructionResult, InstructionSet};
use crate::interpreter::ip::InstructionPointer;
use crate::interpreter::InterpreterEnv;
use crate::FungeSpace;

/// From the catseye library
///
/// Fingerprint 0x524f4d41 ('ROMA')
///
/// After successfully loading ROMA, the instructions `C`, `D`, `I`, `L`,
/// `M`, `V`, and `X` take on new semantics: each pushes the value of its
/// roman numeral.
///
/// Note that these are just digits, you still have to do the arithmetic
/// yourself. Executing `MCMLXXXIV` will not leave 1984 on the stack. But
/// executing `MCM\-+LXXX+++IV\-++` should.
pub fn load<Env: InterpreterEnv>(instructionset: &mut InstructionSet<Env>) -> bool {
    let layer: [(char, Instruction<Env>); 7] = [
        ('I', unum),
        ('V', quinque),
        ('X', decem),
        ('L', quinquaginta),
        ('C', centum),
        ('D', quingenti),
        ('M', mille),
    ];
    instructionset.add_layer(&layer);
    true
}

pub fn unload<Env: InterpreterEnv>(instructionset: &mut InstructionSet<Env>) -> bool {
    instructionset.pop_layer("IVXLCDM")
}

fn push_value<Env: InterpreterEnv>(ip: &mut InstructionPointer<Env>, value: Cell) {
    ip.push(value);
}

fn unum<Env: InterpreterEnv>(
    ip: &mut InstructionPointer<Env>,
    _space: &mut FungeSpace,
    _env: &mut Env,
) -> InstructionResult {
    push_value(ip, 1);
    InstructionResult::Continue
}

fn quinque<Env: InterpreterEnv>(
    ip: &mut InstructionPointer<Env>,
    _space: &mut FungeSpace,
    _env: &mut Env,
) -> InstructionResult {
    push_value(ip, 5);
    InstructionResult::Continue
}

fn decem<Env: InterpreterEnv>(
    ip: &mut InstructionPointer<Env>,
    _space: &mut FungeSpace,
    _env: &mut Env,
) -> InstructionResult {
    push_value(ip, 10);
    InstructionResult::Continue
}

fn quinquaginta<Env: InterpreterEnv>(
    ip: &mut InstructionPointer<Env>,
    _space: &mut FungeSpace,
    _env: &mut Env,
) -> InstructionResult {
    push_value(ip, 50);
    InstructionResult::Continue
}

fn centum<Env: InterpreterEnv>(
    ip: &mut InstructionPointer<Env>,
    _space: &mut FungeSpace,
    _env: &mut Env,
) -> InstructionResult {
    push_value(ip, 100);
    InstructionResult::Continue
}

fn quingenti<Env: InterpreterEnv>(
    ip: &mut InstructionPointer<Env>,
    _space: &mut FungeSpace,
    _env: &mut Env,
) -> InstructionResult {
    push_value(ip, 500);
    InstructionResult::Continue
}

fn mille<Env: InterpreterEnv>(
    ip: &mut InstructionPointer<Env>,
    _space: &mut FungeSpace,
    _env: &mut Env,
) -> InstructionResult {
    push_value(ip, 1000);
    InstructionResult::Continue
}
