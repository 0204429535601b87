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

//! A Befunge-93/98/109 interpreter.
//!
//! The pieces fit together like this: [FungeSpace] is the grid the program
//! lives on, [Interpreter] owns the space and the list of instruction
//! pointers, and an [InterpreterEnv] supplied by the embedder connects a
//! running program to IO, the filesystem and the environment. The command
//! line binary is one such embedder; the test suite is another.

pub mod cell;
pub mod fungespace;
pub mod interpreter;
pub mod stack;

pub use crate::cell::Cell;
pub use crate::fungespace::{fvec, FungeSpace, FungeVector};
pub use crate::interpreter::{
    all_fingerprints, safe_fingerprints, string_to_fingerprint, ExecMode, FungeInput,
    InstructionPointer, InstructionResult, Interpreter, InterpreterEnv, LineBuffer, ProgramResult,
    RunMode, Standard,
};
pub use crate::stack::{FungeStack, StackStack};

/// Create a new Befunge interpreter with an empty funge-space.
///
/// The environment, env, is where you pass IO functions and interpreter
/// settings. After creating the interpreter, fill funge-space through
/// [FungeSpace::load_string].
pub fn new_interpreter<Env>(env: Env) -> Interpreter<Env>
where
    Env: InterpreterEnv,
{
    Interpreter::new(FungeSpace::new(), env)
}
