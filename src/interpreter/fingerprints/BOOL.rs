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

use crate::interpreter::instruction_set::{Instruction, InstructionResult, InstructionSet};
use crate::interpreter::ip::InstructionPointer;
use crate::interpreter::InterpreterEnv;
use crate::FungeSpace;

/// Fingerprint 0x424f4f4c ('BOOL'): bitwise and, or, not and xor.
pub fn load<Env: InterpreterEnv>(instructionset: &mut InstructionSet<Env>) -> bool {
    let layer: [(char, Instruction<Env>); 4] = [('A', and), ('N', not), ('O', or), ('X', xor)];
    instructionset.add_layer(&layer);
    true
}

pub fn unload<Env: InterpreterEnv>(instructionset: &mut InstructionSet<Env>) -> bool {
    instructionset.pop_layer("ANOX")
}

fn and<Env: InterpreterEnv>(
    ip: &mut InstructionPointer<Env>,
    _space: &mut FungeSpace,
    _env: &mut Env,
) -> InstructionResult {
    let b = ip.pop();
    let a = ip.pop();
    ip.push(a & b);
    InstructionResult::Continue
}

fn or<Env: InterpreterEnv>(
    ip: &mut InstructionPointer<Env>,
    _space: &mut FungeSpace,
    _env: &mut Env,
) -> InstructionResult {
    let b = ip.pop();
    let a = ip.pop();
    ip.push(a | b);
    InstructionResult::Continue
}

fn not<Env: InterpreterEnv>(
    ip: &mut InstructionPointer<Env>,
    _space: &mut FungeSpace,
    _env: &mut Env,
) -> InstructionResult {
    let n = ip.pop();
    ip.push(!n);
    InstructionResult::Continue
}

fn xor<Env: InterpreterEnv>(
    ip: &mut InstructionPointer<Env>,
    _space: &mut FungeSpace,
    _env: &mut Env,
) -> InstructionResult {
    let b = ip.pop();
    let a = ip.pop();
    ip.push(a ^ b);
    InstructionResult::Continue
}
