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

//! Instruction decoding and the per-IP fingerprint overlays.
//!
//! Core instructions are dispatched straight from the match statement in
//! [exec_instruction]; the uppercase letters go through the IP's
//! [InstructionSet], a stack of handlers per letter that fingerprints push
//! onto and pop off again.

use std::fmt::{Debug, Formatter};
use std::io::Write;

use rand::Rng;

use super::fingerprints;
use super::instructions;
use super::ip::{InstructionPointer, IpMode};
use super::{InterpreterEnv, Standard};
use crate::cell::{cell_div, cell_rem, to_char, try_to_char, Cell, SPACE};
use crate::fungespace::{fvec, FungeSpace};
use crate::interpreter::input::ReadIntResult;

/// Result of a single instruction. Most instructions return
/// [InstructionResult::Continue].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstructionResult {
    /// Done; this instruction consumed the tick
    Continue,
    /// Done, but without consuming the tick (space, `;` and `z`)
    Skip,
    /// Spawn this many new IPs (`t`, possibly repeated by `k`)
    Fork(u32),
    /// Stop this IP (only used by `@`)
    Stop,
    /// Exit the program with a supplied code (only used by `q`)
    Exit(i32),
    /// Abort; the program cannot continue
    Panic,
}

/// A fingerprint instruction handler.
pub type Instruction<Env> =
    fn(&mut InstructionPointer<Env>, &mut FungeSpace, &mut Env) -> InstructionResult;

/// Struct encapsulating the opcode overlays loaded for an IP: one stack of
/// handlers per uppercase letter. Loading a fingerprint pushes a new layer
/// for the letters it implements, unloading pops one again.
pub struct InstructionSet<Env>
where
    Env: InterpreterEnv,
{
    overlays: [Vec<Instruction<Env>>; 26],
}

// Can't derive Clone by macro because it requires the type parameter to be
// Clone...
impl<Env> Clone for InstructionSet<Env>
where
    Env: InterpreterEnv,
{
    fn clone(&self) -> Self {
        Self {
            overlays: self.overlays.clone(),
        }
    }
}

// Can't derive Debug by macro because of the function pointers
impl<Env> Debug for InstructionSet<Env>
where
    Env: InterpreterEnv,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "<InstructionSet>")
    }
}

impl<Env> Default for InstructionSet<Env>
where
    Env: InterpreterEnv,
{
    fn default() -> Self {
        Self::new()
    }
}

fn letter_index(letter: char) -> Option<usize> {
    if letter.is_ascii_uppercase() {
        Some(letter as usize - 'A' as usize)
    } else {
        None
    }
}

impl<Env> InstructionSet<Env>
where
    Env: InterpreterEnv,
{
    pub fn new() -> Self {
        Self {
            overlays: std::array::from_fn(|_| Vec::new()),
        }
    }

    /// The active handler for a letter, if any fingerprint provides one.
    pub fn get(&self, letter: char) -> Option<Instruction<Env>> {
        let idx = letter_index(letter)?;
        self.overlays[idx].last().copied()
    }

    /// Push a set of handlers as a new layer.
    pub fn add_layer(&mut self, layer: &[(char, Instruction<Env>)]) {
        for &(letter, handler) in layer {
            if let Some(idx) = letter_index(letter) {
                self.overlays[idx].push(handler);
            }
        }
    }

    /// Remove the top layer for the given letters. Letters with nothing
    /// loaded are skipped silently.
    pub fn pop_layer(&mut self, letters: &str) -> bool {
        let mut any_popped = false;
        for letter in letters.chars() {
            if let Some(idx) = letter_index(letter) {
                if self.overlays[idx].pop().is_some() {
                    any_popped = true;
                }
            }
        }
        any_popped
    }
}

fn warn_unknown<Env: InterpreterEnv>(env: &mut Env, ip: &InstructionPointer<Env>, opcode: Cell) {
    env.warn(&format!(
        "Unknown instruction at {}: '{}' ({})",
        ip.position,
        to_char(opcode),
        opcode
    ));
}

#[inline]
pub(super) fn exec_instruction<Env: InterpreterEnv>(
    raw_instruction: Cell,
    ip: &mut InstructionPointer<Env>,
    space: &mut FungeSpace,
    env: &mut Env,
) -> InstructionResult {
    if ip.mode == IpMode::String {
        return exec_string_instruction(raw_instruction, ip, env);
    }
    if let Some(letter) = try_to_char(raw_instruction).filter(char::is_ascii_uppercase) {
        return exec_fingerprint_instruction(raw_instruction, letter, ip, space, env);
    }
    exec_core_instruction(raw_instruction, ip, space, env)
}

fn exec_string_instruction<Env: InterpreterEnv>(
    raw_instruction: Cell,
    ip: &mut InstructionPointer<Env>,
    env: &mut Env,
) -> InstructionResult {
    if raw_instruction == '"' as Cell {
        ip.mode = IpMode::Code;
    } else if raw_instruction != SPACE {
        ip.string_last_was_space = false;
        ip.push(raw_instruction);
    } else if !ip.string_last_was_space || env.standard() == Standard::S93 {
        // standard 98 folds runs of spaces into one; 93 does not
        ip.string_last_was_space = true;
        ip.push(raw_instruction);
    }
    InstructionResult::Continue
}

fn exec_fingerprint_instruction<Env: InterpreterEnv>(
    raw_instruction: Cell,
    letter: char,
    ip: &mut InstructionPointer<Env>,
    space: &mut FungeSpace,
    env: &mut Env,
) -> InstructionResult {
    if !env.fingerprints_disabled() {
        if let Some(handler) = ip.instructions.get(letter) {
            return handler(ip, space, env);
        }
    }
    warn_unknown(env, ip, raw_instruction);
    ip.reflect();
    InstructionResult::Continue
}

fn exec_core_instruction<Env: InterpreterEnv>(
    raw_instruction: Cell,
    ip: &mut InstructionPointer<Env>,
    space: &mut FungeSpace,
    env: &mut Env,
) -> InstructionResult {
    match try_to_char(raw_instruction) {
        Some(' ') => {
            // Zero tick: slide to the next non-space cell and re-dispatch
            // within the same scheduler step.
            let start = ip.position;
            loop {
                ip.forward(space, 1);
                if ip.position == start {
                    // nothing but blanks on this orbit
                    return InstructionResult::Panic;
                }
                if space.get(ip.position) != SPACE {
                    break;
                }
            }
            ip.need_move = false;
            InstructionResult::Skip
        }
        Some(';') => {
            let start = ip.position;
            loop {
                ip.forward(space, 1);
                if ip.position == start {
                    // unterminated comment
                    return InstructionResult::Panic;
                }
                if space.get(ip.position) == ';' as Cell {
                    break;
                }
            }
            InstructionResult::Skip
        }
        Some('z') => InstructionResult::Skip,
        Some('@') => InstructionResult::Stop,
        Some('t') => InstructionResult::Fork(1),
        Some('q') => InstructionResult::Exit(ip.pop() as i32),
        Some('#') => {
            // Trampoline
            ip.forward(space, 1);
            InstructionResult::Continue
        }
        Some('^') => {
            ip.delta = fvec(0, -1);
            InstructionResult::Continue
        }
        Some('>') => {
            ip.delta = fvec(1, 0);
            InstructionResult::Continue
        }
        Some('v') => {
            ip.delta = fvec(0, 1);
            InstructionResult::Continue
        }
        Some('<') => {
            ip.delta = fvec(-1, 0);
            InstructionResult::Continue
        }
        Some('?') => {
            ip.delta = match rand::thread_rng().gen_range(0..4) {
                0 => fvec(0, -1),
                1 => fvec(1, 0),
                2 => fvec(0, 1),
                _ => fvec(-1, 0),
            };
            InstructionResult::Continue
        }
        Some('r') => {
            ip.reflect();
            InstructionResult::Continue
        }
        Some('[') => {
            ip.turn_left();
            InstructionResult::Continue
        }
        Some(']') => {
            ip.turn_right();
            InstructionResult::Continue
        }
        Some('x') => {
            ip.delta = ip.pop_vector();
            InstructionResult::Continue
        }
        Some('j') => {
            let jumps = ip.pop();
            if jumps != 0 {
                // Scale the delta so wrapping sees the whole jump at once.
                let saved = ip.delta;
                ip.delta = ip.delta * jumps;
                ip.forward(space, 1);
                ip.delta = saved;
            }
            InstructionResult::Continue
        }
        Some(digit @ '0'..='9') => {
            ip.push(digit as Cell - '0' as Cell);
            InstructionResult::Continue
        }
        Some(digit @ 'a'..='f') => {
            ip.push(0xa + digit as Cell - 'a' as Cell);
            InstructionResult::Continue
        }
        Some('"') => {
            ip.mode = IpMode::String;
            ip.string_last_was_space = false;
            InstructionResult::Continue
        }
        Some(':') => {
            ip.stack_mut().dup_top();
            InstructionResult::Continue
        }
        Some('\\') => {
            ip.stack_mut().swap_top();
            InstructionResult::Continue
        }
        Some('$') => {
            ip.stack_mut().pop_discard();
            InstructionResult::Continue
        }
        Some('n') => {
            ip.stack_mut().clear();
            InstructionResult::Continue
        }
        Some('_') => {
            ip.delta = if ip.pop() == 0 { fvec(1, 0) } else { fvec(-1, 0) };
            InstructionResult::Continue
        }
        Some('|') => {
            ip.delta = if ip.pop() == 0 { fvec(0, 1) } else { fvec(0, -1) };
            InstructionResult::Continue
        }
        Some('w') => {
            let b = ip.pop();
            let a = ip.pop();
            if a < b {
                ip.turn_left();
            } else if a > b {
                ip.turn_right();
            }
            InstructionResult::Continue
        }
        Some('+') => {
            let b = ip.pop();
            let a = ip.pop();
            ip.push(a.wrapping_add(b));
            InstructionResult::Continue
        }
        Some('-') => {
            let b = ip.pop();
            let a = ip.pop();
            ip.push(a.wrapping_sub(b));
            InstructionResult::Continue
        }
        Some('*') => {
            let b = ip.pop();
            let a = ip.pop();
            ip.push(a.wrapping_mul(b));
            InstructionResult::Continue
        }
        Some('/') => {
            let b = ip.pop();
            let a = ip.pop();
            ip.push(cell_div(a, b));
            InstructionResult::Continue
        }
        Some('%') => {
            let b = ip.pop();
            let a = ip.pop();
            ip.push(cell_rem(a, b));
            InstructionResult::Continue
        }
        Some('!') => {
            let v = ip.pop();
            ip.push(if v == 0 { 1 } else { 0 });
            InstructionResult::Continue
        }
        Some('`') => {
            let b = ip.pop();
            let a = ip.pop();
            ip.push(if a > b { 1 } else { 0 });
            InstructionResult::Continue
        }
        Some('p') => {
            let pos = ip.pop_vector();
            let value = ip.pop();
            space.set_offset(pos, ip.storage_offset, value);
            InstructionResult::Continue
        }
        Some('g') => {
            let pos = ip.pop_vector();
            ip.push(space.get_offset(pos, ip.storage_offset));
            InstructionResult::Continue
        }
        Some('\'') => {
            ip.forward(space, 1);
            ip.push(space.get(ip.position));
            InstructionResult::Continue
        }
        Some('s') => {
            ip.forward(space, 1);
            let value = ip.pop();
            space.set(ip.position, value);
            InstructionResult::Continue
        }
        Some('.') => {
            let value = ip.pop();
            if write!(env.output_writer(), "{} ", value).is_err() {
                env.warn("IO Error");
            }
            InstructionResult::Continue
        }
        Some(',') => {
            let value = ip.pop();
            if env.output_writer().write_all(&[value as u8]).is_err() {
                env.warn("IO Error");
            }
            InstructionResult::Continue
        }
        Some('~') => {
            let _ = env.output_writer().flush();
            match env.input().getchar() {
                Some(c) => ip.push(c),
                None => ip.reflect(),
            }
            InstructionResult::Continue
        }
        Some('&') => {
            let _ = env.output_writer().flush();
            loop {
                match env.input().getint(10) {
                    ReadIntResult::Value(v) => {
                        ip.push(v);
                        break;
                    }
                    ReadIntResult::NoDigit => continue,
                    ReadIntResult::Eof => {
                        ip.reflect();
                        break;
                    }
                }
            }
            InstructionResult::Continue
        }
        Some('k') => instructions::iterate(ip, space, env),
        Some('y') => instructions::sysinfo(ip, space, env),
        Some('{') => instructions::begin_block(ip, space, env),
        Some('}') => instructions::end_block(ip, space, env),
        Some('u') => instructions::stack_under_stack(ip, space, env),
        Some('i') => instructions::input_file(ip, space, env),
        Some('o') => instructions::output_file(ip, space, env),
        Some('=') => instructions::execute(ip, space, env),
        Some(opcode @ ('(' | ')')) => {
            let count = ip.pop();
            if count < 1 {
                ip.reflect();
            } else if env.fingerprints_disabled() {
                ip.stack_mut().pop_n_discard(count as usize);
                ip.reflect();
            } else {
                if count > 8 {
                    env.warn(&format!(
                        "{} at {}: count is very large ({}), probably a bug",
                        opcode, ip.position, count
                    ));
                }
                let mut fprint: Cell = 0;
                let mut i = count;
                while i > 0 {
                    fprint = fprint.wrapping_shl(8).wrapping_add(ip.pop());
                    i -= 1;
                }
                let known = fprint != 0 && env.is_fingerprint_enabled(fprint);
                if opcode == '(' {
                    if known && fingerprints::load(&mut ip.instructions, fprint) {
                        ip.push(fprint);
                        ip.push(1);
                    } else {
                        ip.reflect();
                    }
                } else if !(known && fingerprints::unload(&mut ip.instructions, fprint)) {
                    ip.reflect();
                }
            }
            InstructionResult::Continue
        }
        Some(_) | None => {
            warn_unknown(env, ip, raw_instruction);
            ip.reflect();
            InstructionResult::Continue
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::NoEnv;
    use super::*;

    fn nop_for_test(
        _ip: &mut InstructionPointer<NoEnv>,
        _space: &mut FungeSpace,
        _env: &mut NoEnv,
    ) -> InstructionResult {
        InstructionResult::Continue
    }

    #[test]
    fn test_instruction_layers() {
        let mut is = InstructionSet::<NoEnv>::new();
        assert!(is.get('A').is_none());
        assert!(is.get('B').is_none());
        is.add_layer(&[('B', nop_for_test), ('E', nop_for_test)]);
        assert!(is.get('A').is_none());
        assert!(is.get('B').is_some());
        assert!(is.get('E').is_some());
        assert!(is.pop_layer("BE"));
        assert!(is.get('B').is_none());
        assert!(is.get('E').is_none());
        assert!(!is.pop_layer("BE"));
    }

    #[test]
    fn test_layers_stack() {
        let mut is = InstructionSet::<NoEnv>::new();
        is.add_layer(&[('Q', nop_for_test)]);
        is.add_layer(&[('Q', nop_for_test)]);
        assert!(is.pop_layer("Q"));
        assert!(is.get('Q').is_some());
        assert!(is.pop_layer("Q"));
        assert!(is.get('Q').is_none());
    }

    #[test]
    fn test_non_letters_are_ignored() {
        let mut is = InstructionSet::<NoEnv>::new();
        is.add_layer(&[('ä', nop_for_test), ('3', nop_for_test)]);
        assert!(!is.pop_layer("ä3"));
    }
}
