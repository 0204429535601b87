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

use std::rc::Rc;

use chrono::prelude::Utc;

use crate::cell::Cell;
use crate::interpreter::instruction_set::{Instruction, InstructionResult, InstructionSet};
use crate::interpreter::ip::InstructionPointer;
use crate::interpreter::InterpreterEnv;
use crate::FungeSpace;

/// The HRTI fingerprint allows a Funge program to measure elapsed time much
/// more finely than the clock values returned by `y`.
///
/// After successfully loading HRTI, the instructions `E`, `G`, `M`, `S`,
/// and `T` take on new semantics. The timer mark is per-IP state; a forked
/// IP starts without one.
pub fn load<Env: InterpreterEnv>(instructionset: &mut InstructionSet<Env>) -> bool {
    let layer: [(char, Instruction<Env>); 5] = [
        ('E', erase),
        ('G', granularity),
        ('M', mark),
        ('S', second),
        ('T', timer),
    ];
    instructionset.add_layer(&layer);
    true
}

pub fn unload<Env: InterpreterEnv>(instructionset: &mut InstructionSet<Env>) -> bool {
    instructionset.pop_layer("EGMST")
}

fn now_micros() -> i64 {
    Utc::now().timestamp_nanos() / 1000
}

/// `G` 'Granularity' pushes the smallest clock tick the underlying system
/// can reliably handle, measured in microseconds.
fn granularity<Env: InterpreterEnv>(
    ip: &mut InstructionPointer<Env>,
    _space: &mut FungeSpace,
    _env: &mut Env,
) -> InstructionResult {
    ip.push(1);
    InstructionResult::Continue
}

/// `M` 'Mark' designates the timer as having been read by the IP with this
/// ID at this instance in time.
fn mark<Env: InterpreterEnv>(
    ip: &mut InstructionPointer<Env>,
    _space: &mut FungeSpace,
    _env: &mut Env,
) -> InstructionResult {
    ip.private_data
        .insert("HRTI.mark".to_owned(), Rc::new(now_micros()));
    InstructionResult::Continue
}

/// `T` 'Timer' pushes the number of microseconds elapsed since the last
/// time this IP marked the timer. If there is no previous mark, acts like
/// `r`.
fn timer<Env: InterpreterEnv>(
    ip: &mut InstructionPointer<Env>,
    _space: &mut FungeSpace,
    _env: &mut Env,
) -> InstructionResult {
    let mark = ip
        .private_data
        .get("HRTI.mark")
        .and_then(|any_ref| any_ref.downcast_ref::<i64>())
        .copied();
    match mark {
        Some(then) => ip.push((now_micros() - then) as Cell),
        None => ip.reflect(),
    }
    InstructionResult::Continue
}

/// `E` 'Erase mark' erases the last timer mark by this IP (such that `T`
/// above will act like `r`)
fn erase<Env: InterpreterEnv>(
    ip: &mut InstructionPointer<Env>,
    _space: &mut FungeSpace,
    _env: &mut Env,
) -> InstructionResult {
    ip.private_data.remove("HRTI.mark");
    InstructionResult::Continue
}

/// `S` 'Second' pushes the number of microseconds elapsed since the last
/// whole second.
fn second<Env: InterpreterEnv>(
    ip: &mut InstructionPointer<Env>,
    _space: &mut FungeSpace,
    _env: &mut Env,
) -> InstructionResult {
    ip.push(Utc::now().timestamp_subsec_micros() as Cell);
    InstructionResult::Continue
}
