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

use std::any::Any;
use std::rc::Rc;

use hashbrown::HashMap;

use super::instruction_set::InstructionSet;
use super::InterpreterEnv;
use crate::cell::Cell;
use crate::fungespace::{fvec, FungeSpace, FungeVector, ORIGIN};
use crate::stack::{FungeStack, StackStack};

/// Code or string mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IpMode {
    Code,
    String,
}

/// Struct encapsulating the state of the/an IP
#[derive(Debug)]
pub struct InstructionPointer<Env>
where
    Env: InterpreterEnv,
{
    /// Identifier of the IP, unique among all IPs ever forked
    pub id: Cell,
    /// Location of the IP (initial: the origin)
    pub position: FungeVector,
    /// Current delta (initial: East)
    pub delta: FungeVector,
    /// Current storage offset (initial: the origin)
    pub storage_offset: FungeVector,
    /// Code or string mode
    pub mode: IpMode,
    /// In string mode, whether the previous cell was a space; standard 98
    /// folds runs of spaces into one
    pub string_last_was_space: bool,
    /// Whether the scheduler still owes this IP its end-of-tick step
    pub need_move: bool,
    /// The stack stack
    pub stack_stack: StackStack,
    /// Per-letter fingerprint opcode overlays
    pub instructions: InstructionSet<Env>,
    /// If fingerprints need to store additional data with the IP, they put
    /// it here.
    pub private_data: HashMap<String, Rc<dyn Any>>,
}

// Can't derive Clone by macro because it requires the type parameter to be
// Clone...
impl<Env> Clone for InstructionPointer<Env>
where
    Env: InterpreterEnv,
{
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            position: self.position,
            delta: self.delta,
            storage_offset: self.storage_offset,
            mode: self.mode,
            string_last_was_space: self.string_last_was_space,
            need_move: self.need_move,
            stack_stack: self.stack_stack.clone(),
            instructions: self.instructions.clone(),
            private_data: self.private_data.clone(),
        }
    }
}

impl<Env> Default for InstructionPointer<Env>
where
    Env: InterpreterEnv,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<Env> InstructionPointer<Env>
where
    Env: InterpreterEnv,
{
    pub fn new() -> Self {
        Self {
            id: 0,
            position: ORIGIN,
            delta: fvec(1, 0),
            storage_offset: ORIGIN,
            mode: IpMode::Code,
            string_last_was_space: false,
            need_move: true,
            stack_stack: StackStack::new(),
            instructions: InstructionSet::new(),
            private_data: HashMap::new(),
        }
    }

    /// Get the top of the stack stack
    #[inline]
    pub fn stack(&self) -> &FungeStack {
        self.stack_stack.toss()
    }

    /// Get the top of the stack stack (mutable version)
    #[inline]
    pub fn stack_mut(&mut self) -> &mut FungeStack {
        self.stack_stack.toss_mut()
    }

    /// Pop one number from the stack and return it
    #[inline]
    pub fn pop(&mut self) -> Cell {
        self.stack_mut().pop()
    }

    /// Push a number onto the stack
    #[inline]
    pub fn push(&mut self, value: Cell) {
        self.stack_mut().push(value)
    }

    #[inline]
    pub fn pop_vector(&mut self) -> FungeVector {
        self.stack_mut().pop_vector()
    }

    #[inline]
    pub fn push_vector(&mut self, v: FungeVector) {
        self.stack_mut().push_vector(v)
    }

    /// Pop a 0gnirts off the stack as a string
    #[inline]
    pub fn pop_gnirts(&mut self) -> String {
        self.stack_mut().pop_gnirts()
    }

    /// Push a string onto the stack as a 0gnirts
    #[inline]
    pub fn push_gnirts(&mut self, s: &str) {
        self.stack_mut().push_gnirts(s)
    }

    /// Reflect the IP
    #[inline]
    pub fn reflect(&mut self) {
        self.delta = -self.delta;
    }

    #[inline]
    pub fn turn_left(&mut self) {
        self.delta = self.delta.turned_left();
    }

    #[inline]
    pub fn turn_right(&mut self) {
        self.delta = self.delta.turned_right();
    }

    /// Take `steps` steps along the delta, wrapping on the far side of the
    /// bounding rectangle if that leaves it.
    pub fn forward(&mut self, space: &FungeSpace, steps: Cell) {
        self.position += self.delta * steps;
        space.wrap(&mut self.position, self.delta);
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::NoEnv;
    use super::*;

    #[test]
    fn test_stack_basics() {
        let mut ip = InstructionPointer::<NoEnv>::new();

        assert_eq!(ip.pop(), 0);
        ip.push(1);
        ip.push(2);
        assert_eq!(ip.pop(), 2);
        ip.push(3);
        assert_eq!(ip.pop(), 3);
        assert_eq!(ip.pop(), 1);
        ip.push(4);
        ip.push(5);

        ip.stack_stack.begin(0, ORIGIN);
        assert_eq!(ip.pop(), 0);

        assert!(ip.stack_stack.end(0).is_some());
        assert_eq!(ip.pop(), 5);
        assert_eq!(ip.stack().len(), 1);
    }

    #[test]
    fn test_gnirts_via_ip() {
        let mut ip = InstructionPointer::<NoEnv>::new();
        ip.push_gnirts("file.b98");
        assert_eq!(ip.pop_gnirts(), "file.b98");
        assert!(ip.stack().is_empty());
    }

    #[test]
    fn test_reflect_and_turn() {
        let mut ip = InstructionPointer::<NoEnv>::new();
        assert_eq!(ip.delta, fvec(1, 0));
        ip.reflect();
        assert_eq!(ip.delta, fvec(-1, 0));
        ip.turn_left();
        assert_eq!(ip.delta, fvec(0, 1));
        ip.turn_right();
        assert_eq!(ip.delta, fvec(-1, 0));
    }

    #[test]
    fn test_forward_wraps() {
        let mut space = FungeSpace::new();
        space.load_string(b"abc");
        let mut ip = InstructionPointer::<NoEnv>::new();
        ip.forward(&space, 1);
        assert_eq!(ip.position, fvec(1, 0));
        ip.forward(&space, -2);
        assert_eq!(ip.position, fvec(2, 0));
    }
}
