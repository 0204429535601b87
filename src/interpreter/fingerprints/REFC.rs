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

use std::cell::{RefCell, RefMut};
use std::rc::Rc;

use crate::cell::Cell;
use crate::fungespace::FungeVector;
use crate::interpreter::instruction_set::{Instruction, InstructionResult, InstructionSet};
use crate::interpreter::ip::InstructionPointer;
use crate::interpreter::InterpreterEnv;
use crate::FungeSpace;

/// From the catseye library
///
/// Fingerprint 0x52454643 ('REFC')
///
/// `R` 'Reference' pops a vector off the stack, and pushes a scalar value
/// back onto the stack, unique within an internal list of references, which
/// refers to that vector.
///
/// `D` 'Dereference' pops a scalar value off the stack, and pushes the
/// vector back onto the stack which corresponds to that unique reference
/// value.
///
/// The reference list lives in the IP's private data; an IP forked off
/// after loading shares it with its parent, while an IP that loads REFC
/// independently gets its own list.
pub fn load<Env: InterpreterEnv>(instructionset: &mut InstructionSet<Env>) -> bool {
    let layer: [(char, Instruction<Env>); 2] = [('D', dereference), ('R', reference)];
    instructionset.add_layer(&layer);
    true
}

pub fn unload<Env: InterpreterEnv>(instructionset: &mut InstructionSet<Env>) -> bool {
    instructionset.pop_layer("DR")
}

fn get_reflist<Env: InterpreterEnv>(ip: &mut InstructionPointer<Env>) -> RefMut<Vec<FungeVector>> {
    if !ip.private_data.contains_key("REFC.reflist") {
        ip.private_data.insert(
            "REFC.reflist".to_owned(),
            Rc::new(RefCell::new(Vec::<FungeVector>::new())),
        );
    }
    ip.private_data
        .get("REFC.reflist")
        .and_then(|any_ref| any_ref.downcast_ref::<RefCell<Vec<FungeVector>>>())
        .map(|refcell| refcell.borrow_mut())
        .expect("REFC reference list has the wrong type")
}

fn reference<Env: InterpreterEnv>(
    ip: &mut InstructionPointer<Env>,
    _space: &mut FungeSpace,
    _env: &mut Env,
) -> InstructionResult {
    let vector = ip.pop_vector();
    let ref_idx = {
        let mut reflist = get_reflist(ip);
        match reflist.iter().position(|v| *v == vector) {
            Some(idx) => idx as Cell,
            None => {
                reflist.push(vector);
                reflist.len() as Cell - 1
            }
        }
    };
    ip.push(ref_idx);
    InstructionResult::Continue
}

fn dereference<Env: InterpreterEnv>(
    ip: &mut InstructionPointer<Env>,
    _space: &mut FungeSpace,
    _env: &mut Env,
) -> InstructionResult {
    let idx = ip.pop();
    let vector = usize::try_from(idx)
        .ok()
        .and_then(|idx| get_reflist(ip).get(idx).copied());
    match vector {
        Some(v) => ip.push_vector(v),
        None => ip.reflect(),
    }
    InstructionResult::Continue
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fungespace::fvec;
    use crate::interpreter::tests::NoEnv;

    #[test]
    fn test_reference_round_trip() {
        let mut ip = InstructionPointer::<NoEnv>::new();
        let mut space = FungeSpace::new();
        let mut env = NoEnv::new();

        ip.push_vector(fvec(12, -7));
        reference(&mut ip, &mut space, &mut env);
        let handle = ip.stack().peek();
        dereference(&mut ip, &mut space, &mut env);
        assert_eq!(ip.pop_vector(), fvec(12, -7));

        // referencing the same vector again yields the same handle
        ip.push_vector(fvec(12, -7));
        reference(&mut ip, &mut space, &mut env);
        assert_eq!(ip.pop(), handle);
    }

    #[test]
    fn test_dereference_unknown_reflects() {
        let mut ip = InstructionPointer::<NoEnv>::new();
        let mut space = FungeSpace::new();
        let mut env = NoEnv::new();
        let delta = ip.delta;

        ip.push(42);
        dereference(&mut ip, &mut space, &mut env);
        assert_eq!(ip.delta, -delta);
    }
}
