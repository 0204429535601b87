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

//! This module contains only complex instructions; most instructions are
//! built into the dispatcher's match statement.

use std::mem::size_of;

use chrono::prelude::Utc;
use chrono::{Datelike, Timelike};
use pkg_version::{pkg_version_major, pkg_version_minor, pkg_version_patch};

use super::instruction_set::{exec_instruction, InstructionResult};
use super::ip::InstructionPointer;
use super::{ExecMode, InterpreterEnv, Standard};
use crate::cell::{to_char, Cell, CELL_BITS, SPACE};
use crate::fungespace::{FungeSpace, FungeVector};

/// The `k` iterate combinator: pop n, find the next real instruction along
/// the delta, and execute it n times in place.
pub(super) fn iterate<Env: InterpreterEnv>(
    ip: &mut InstructionPointer<Env>,
    space: &mut FungeSpace,
    env: &mut Env,
) -> InstructionResult {
    let n = ip.pop();
    if n == 0 {
        // 0k skips the instruction that 1k would execute once
        ip.forward(space, 1);
        return InstructionResult::Continue;
    }
    if n < 0 {
        ip.reflect();
        return InstructionResult::Continue;
    }

    // The instruction executes *at* k: if it moves the IP or turns it, that
    // sticks; if it does neither, the IP afterwards jumps past the
    // instruction's own cell.
    let old_position = ip.position;
    ip.forward(space, 1);
    let mut target = space.get(ip.position);
    if target == SPACE {
        // Spaces between k and its target never take a tick, not even under
        // standard 98.
        let scan_start = ip.position;
        loop {
            ip.forward(space, 1);
            if ip.position == scan_start {
                return InstructionResult::Panic;
            }
            target = space.get(ip.position);
            if target != SPACE {
                break;
            }
        }
    }
    let target_position = ip.position;
    ip.position = old_position;

    match to_char(target) {
        'z' => InstructionResult::Continue,
        'k' | ';' => {
            env.warn(&format!(
                "k at {} cannot execute: '{}' ({})",
                ip.position,
                to_char(target),
                target
            ));
            ip.reflect();
            InstructionResult::Continue
        }
        '@' => exec_instruction(target, ip, space, env),
        _ => {
            let old_delta = ip.delta;
            let mut forks: u32 = 0;
            let mut result = InstructionResult::Continue;
            let mut i = n;
            while i > 0 {
                i -= 1;
                if env.trace_level() > 5 {
                    eprintln!(
                        "  * in k: iteration {}, instruction '{}' ({})",
                        i,
                        to_char(target),
                        target
                    );
                }
                match exec_instruction(target, ip, space, env) {
                    InstructionResult::Continue | InstructionResult::Skip => {}
                    InstructionResult::Fork(count) => forks += count,
                    other => {
                        result = other;
                        break;
                    }
                }
            }
            if ip.delta == old_delta && ip.position == old_position {
                ip.position = target_position;
            }
            if forks > 0 && result == InstructionResult::Continue {
                InstructionResult::Fork(forks)
            } else {
                result
            }
        }
    }
}

/// `{`: push a new stack onto the stack-stack and move the storage offset to
/// the cell past this instruction.
pub(super) fn begin_block<Env: InterpreterEnv>(
    ip: &mut InstructionPointer<Env>,
    space: &mut FungeSpace,
    _env: &mut Env,
) -> InstructionResult {
    let count = ip.pop();
    // the new storage offset, computed before anything changes
    ip.forward(space, 1);
    let new_offset = ip.position;
    ip.forward(space, -1);
    ip.stack_stack.begin(count, ip.storage_offset);
    ip.storage_offset = new_offset;
    InstructionResult::Continue
}

/// `}`: drop the top stack, restoring the storage offset recorded by `{`.
/// Reflects on a stack-stack of one.
pub(super) fn end_block<Env: InterpreterEnv>(
    ip: &mut InstructionPointer<Env>,
    _space: &mut FungeSpace,
    _env: &mut Env,
) -> InstructionResult {
    if ip.stack_stack.len() == 1 {
        ip.reflect();
        return InstructionResult::Continue;
    }
    let count = ip.pop();
    match ip.stack_stack.end(count) {
        Some(offset) => ip.storage_offset = offset,
        None => ip.reflect(),
    }
    InstructionResult::Continue
}

/// `u`: transfer cells between SOSS and TOSS. Reflects on a stack-stack of
/// one.
pub(super) fn stack_under_stack<Env: InterpreterEnv>(
    ip: &mut InstructionPointer<Env>,
    _space: &mut FungeSpace,
    _env: &mut Env,
) -> InstructionResult {
    if ip.stack_stack.len() == 1 {
        ip.reflect();
        return InstructionResult::Continue;
    }
    let count = ip.pop();
    ip.stack_stack.transfer(count);
    InstructionResult::Continue
}

/// `i`: load a file into funge-space at an offset.
pub(super) fn input_file<Env: InterpreterEnv>(
    ip: &mut InstructionPointer<Env>,
    space: &mut FungeSpace,
    env: &mut Env,
) -> InstructionResult {
    if !env.have_file_input() {
        ip.reflect();
        return InstructionResult::Continue;
    }
    let filename = ip.pop_gnirts();
    if filename.is_empty() {
        ip.reflect();
        return InstructionResult::Continue;
    }
    let flags = ip.pop();
    let offset = ip.pop_vector();
    let binary = flags & 1 == 1;
    match env.read_file(&filename) {
        Ok(src) => {
            let size = space.load_at_offset(&src, offset + ip.storage_offset, binary);
            ip.push_vector(size);
            ip.push_vector(offset);
        }
        Err(_) => ip.reflect(),
    }
    InstructionResult::Continue
}

/// `o`: save a rectangle of funge-space to a file.
pub(super) fn output_file<Env: InterpreterEnv>(
    ip: &mut InstructionPointer<Env>,
    space: &mut FungeSpace,
    env: &mut Env,
) -> InstructionResult {
    if !env.have_file_output() {
        ip.reflect();
        return InstructionResult::Continue;
    }
    let filename = ip.pop_gnirts();
    let flags = ip.pop();
    let offset = ip.pop_vector();
    let size = ip.pop_vector();
    if filename.is_empty() || size.x < 1 || size.y < 1 {
        ip.reflect();
        return InstructionResult::Continue;
    }
    let textfile = flags & 1 == 1;
    let data = space.save_region(offset + ip.storage_offset, size, textfile);
    if env.write_file(&filename, &data).is_err() {
        ip.reflect();
    }
    InstructionResult::Continue
}

/// `=`: run a shell command and push its exit status.
pub(super) fn execute<Env: InterpreterEnv>(
    ip: &mut InstructionPointer<Env>,
    _space: &mut FungeSpace,
    env: &mut Env,
) -> InstructionResult {
    if env.have_execute() == ExecMode::Disabled {
        ip.reflect();
        return InstructionResult::Continue;
    }
    let command = ip.pop_gnirts();
    if command.is_empty() {
        ip.push(-2);
        return InstructionResult::Continue;
    }
    let status = env.execute_command(&command);
    ip.push(status);
    InstructionResult::Continue
}

/// Append a vector to a report being built top-first.
fn put_vector(cells: &mut Vec<Cell>, v: FungeVector) {
    cells.push(v.y);
    cells.push(v.x);
}

/// The `y` sysinfo instruction.
///
/// The report is built in full, top cell first, then either pushed whole
/// (n < 1), sampled for a single cell (n in 1..=9 or a larger n within the
/// report), or used as a pop count when n reaches beyond the report.
pub(super) fn sysinfo<Env: InterpreterEnv>(
    ip: &mut InstructionPointer<Env>,
    space: &mut FungeSpace,
    env: &mut Env,
) -> InstructionResult {
    let n = ip.pop();
    // TOSS size as the report describes it, before y pushes anything
    let toss_size = ip.stack().len();

    let mut cells: Vec<Cell> = Vec::new();

    // 1. flags
    let mut flags = 0x01; // concurrent t
    if env.have_file_input() {
        flags |= 0x02;
    }
    if env.have_file_output() {
        flags |= 0x04;
    }
    if env.have_execute() != ExecMode::Disabled {
        flags |= 0x08;
    }
    if !env.is_io_buffered() {
        flags |= 0x10;
    }
    if env.standard() == Standard::S109 {
        flags |= 0x20;
    }
    cells.push(flags);

    // 2. size of a cell in bytes
    cells.push(size_of::<Cell>() as Cell);

    // 3. handprint
    cells.push(env.handprint());

    // 4. version number
    cells.push(
        (pkg_version_major!() * 1000000 + pkg_version_minor!() * 1000 + pkg_version_patch!())
            as Cell,
    );

    // 5. operating paradigm of =
    cells.push(match env.have_execute() {
        ExecMode::Disabled => 0,
        ExecMode::System => 1,
    });

    // 6. path separator
    cells.push(std::path::MAIN_SEPARATOR as Cell);

    // 7. scalars per vector
    cells.push(2);

    // 8. IP id
    cells.push(ip.id);

    // 9. team number
    cells.push(0);

    // 10. position
    put_vector(&mut cells, ip.position);

    // 11. delta
    put_vector(&mut cells, ip.delta);

    // 12. storage offset
    put_vector(&mut cells, ip.storage_offset);

    // 13 & 14. the bounding rectangle: least point, then greatest point
    // relative to it
    let (top_left, bottom_right) = space.bounds();
    put_vector(&mut cells, top_left);
    put_vector(&mut cells, bottom_right - top_left);

    // 15. ((year - 1900) << 16) + (month << 8) + day, UTC
    let now = Utc::now();
    cells.push(
        (((now.year() - 1900) * 256 * 256) + (now.month() as i32 * 256) + now.day() as i32)
            as Cell,
    );

    // 16. (hour << 16) + (minute << 8) + second, UTC
    cells.push(
        ((now.hour() as i32 * 256 * 256) + (now.minute() as i32 * 256) + now.second() as i32)
            as Cell,
    );

    // 17. number of stacks on the stack-stack
    cells.push(ip.stack_stack.len() as Cell);

    // 18. per-stack sizes, TOSS topmost
    cells.push(toss_size as Cell);
    let stacks = ip.stack_stack.stacks();
    for stack in stacks[..stacks.len() - 1].iter().rev() {
        cells.push(stack.len() as Cell);
    }

    // 19. command line arguments, argv[0] topmost, double-0 terminated
    for arg in env.argv() {
        for c in arg.chars() {
            cells.push(c as Cell);
        }
        cells.push(0);
    }
    cells.push(0);
    cells.push(0);

    // 20. environment, one extra 0 after the last entry
    for (key, value) in env.env_vars() {
        for c in key.chars() {
            cells.push(c as Cell);
        }
        cells.push('=' as Cell);
        for c in value.chars() {
            cells.push(c as Cell);
        }
        cells.push(0);
    }
    cells.push(0);

    if env.standard() == Standard::S109 {
        // 21. unit of the cell size report (bytes)
        cells.push(2);
        // 22. cell size in bits
        cells.push(CELL_BITS);
    }

    if n <= 0 {
        for &cell in cells.iter().rev() {
            ip.push(cell);
        }
    } else {
        match usize::try_from(n) {
            Ok(pick) if pick <= cells.len() => ip.push(cells[pick - 1]),
            Ok(pick) => ip.stack_mut().pop_n_discard(pick - cells.len()),
            Err(_) => ip.stack_mut().clear(),
        }
    }
    InstructionResult::Continue
}
