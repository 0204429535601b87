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

//! The interpreter proper: the IP list, the scheduler, and the environment
//! trait connecting a running program to the outside world.

pub mod fingerprints;
pub mod input;
pub mod instruction_set;
mod instructions;
pub mod ip;
pub mod safe_env;

use std::io;
use std::io::Write;

use self::instruction_set::exec_instruction;
use crate::cell::{to_char, Cell};
use crate::fungespace::FungeSpace;

pub use self::fingerprints::{all_fingerprints, safe_fingerprints, string_to_fingerprint};
pub use self::input::{FungeInput, LineBuffer, ReadIntResult};
pub use self::instruction_set::{Instruction, InstructionResult, InstructionSet};
pub use self::ip::{InstructionPointer, IpMode};

/// Possible results of calling [Interpreter::run]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgramResult {
    /// Program finished with the indicated code
    Done(i32),
    /// Catastrophic failure
    Panic,
    /// Program is paused (only returned if using [RunMode::Step])
    Paused,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// Run program to the end
    Run,
    /// Execute a single tick (for all IPs)
    Step,
}

/// Which revision of the language the interpreter simulates. The default is
/// 98; 93 changes string-mode space handling, 109 adds two sysinfo groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Standard {
    S93,
    S98,
    S109,
}

/// Execution mode of `=` as indicated by the sysinfo (`y`) instruction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecMode {
    Disabled,
    System,
}

/// An interpreter environment provides things like IO and will be
/// implemented differently depending on whether the interpreter is running
/// from the command line, in a test harness, or embedded somewhere else.
pub trait InterpreterEnv {
    /// stdout or equivalent
    fn output_writer(&mut self) -> &mut dyn Write;
    /// Line-buffered stdin or equivalent
    fn input(&mut self) -> &mut dyn FungeInput;
    /// Method called on warnings like "unknown instruction"
    fn warn(&mut self, msg: &str);
    /// Which language standard are we simulating?
    fn standard(&self) -> Standard {
        Standard::S98
    }
    /// Trace verbosity; 0 is silent
    fn trace_level(&self) -> u32 {
        0
    }
    /// Should sysinfo (`y`) say that IO is buffered?
    fn is_io_buffered(&self) -> bool {
        true
    }
    /// What handprint should sysinfo (`y`) name? Default: 0x5253464e
    fn handprint(&self) -> Cell {
        0x5253464e // RSFN
    }
    /// Is `i` available? (see also: [InterpreterEnv::read_file])
    fn have_file_input(&self) -> bool {
        false
    }
    /// Is `o` available? (see also: [InterpreterEnv::write_file])
    fn have_file_output(&self) -> bool {
        false
    }
    /// Is `=` available, and how does [InterpreterEnv::execute_command] act
    /// (in the terms defined for sysinfo (`y`))?
    fn have_execute(&self) -> ExecMode {
        ExecMode::Disabled
    }
    /// Get the contents of a named file.
    fn read_file(&mut self, _filename: &str) -> io::Result<Vec<u8>> {
        Err(io::Error::from(io::ErrorKind::PermissionDenied))
    }
    /// Write data to a named file.
    fn write_file(&mut self, _filename: &str, _content: &[u8]) -> io::Result<()> {
        Err(io::Error::from(io::ErrorKind::PermissionDenied))
    }
    /// Execute a command and return the exit status
    fn execute_command(&mut self, _command: &str) -> Cell {
        -1
    }
    /// Get the environment variables to pass to the program
    fn env_vars(&mut self) -> Vec<(String, String)> {
        Vec::new()
    }
    /// Get the command line arguments to pass to the program (the first
    /// element should be the name of the script)
    fn argv(&mut self) -> Vec<String> {
        Vec::new()
    }
    /// Were fingerprints switched off altogether?
    fn fingerprints_disabled(&self) -> bool {
        false
    }
    /// Is a given fingerprint available? (See also: [all_fingerprints],
    /// [safe_fingerprints])
    fn is_fingerprint_enabled(&self, _fprint: Cell) -> bool {
        false
    }
}

/// State of an rsfunge interpreter
pub struct Interpreter<Env>
where
    Env: InterpreterEnv,
{
    /// Currently active IPs
    pub ips: Vec<InstructionPointer<Env>>,
    /// Funge-space
    pub space: FungeSpace,
    /// User-supplied environment permitting access to the outside world
    pub env: Env,
    highest_id: Cell,
}

impl<Env> Interpreter<Env>
where
    Env: InterpreterEnv,
{
    pub fn new(space: FungeSpace, env: Env) -> Self {
        Self {
            ips: vec![InstructionPointer::new()],
            space,
            env,
            highest_id: 0,
        }
    }

    /// Run the program. In [RunMode::Step] every IP executes one
    /// tick-consuming instruction and control returns with
    /// [ProgramResult::Paused].
    pub fn run(&mut self, mode: RunMode) -> ProgramResult {
        loop {
            // One tick: every IP, from the top of the list down, executes
            // until it uses up its tick.
            let mut i = self.ips.len();
            while i > 0 {
                i -= 1;
                loop {
                    let opcode = self.space.get(self.ips[i].position);
                    self.trace(i, opcode);
                    let result =
                        exec_instruction(opcode, &mut self.ips[i], &mut self.space, &mut self.env);
                    match result {
                        InstructionResult::Continue => {
                            self.step_ip(i);
                            break;
                        }
                        InstructionResult::Skip => {
                            // zero-tick: move on and go again
                            self.step_ip(i);
                        }
                        InstructionResult::Fork(count) => {
                            self.fork(i, count);
                            self.step_ip(i);
                            break;
                        }
                        InstructionResult::Stop => {
                            self.ips.remove(i);
                            if self.ips.is_empty() {
                                let _ = self.env.output_writer().flush();
                                return ProgramResult::Done(0);
                            }
                            break;
                        }
                        InstructionResult::Exit(code) => {
                            let _ = self.env.output_writer().flush();
                            return ProgramResult::Done(code);
                        }
                        InstructionResult::Panic => return ProgramResult::Panic,
                    }
                }
            }
            if mode == RunMode::Step {
                return ProgramResult::Paused;
            }
        }
    }

    /// The end-of-instruction advance, unless the instruction already placed
    /// the IP where it wants it.
    fn step_ip(&mut self, i: usize) {
        let ip = &mut self.ips[i];
        if ip.need_move {
            ip.forward(&self.space, 1);
        } else {
            ip.need_move = true;
        }
    }

    /// Fork `count` children off the IP at list index `i`. Each child is a
    /// full copy with the delta reversed and one step taken, inserted right
    /// above its parent so it runs first from the next tick on.
    fn fork(&mut self, i: usize, count: u32) {
        for _ in 0..count {
            self.highest_id += 1;
            let parent = &self.ips[i];
            let mut child = parent.clone();
            child.id = self.highest_id;
            child.delta = -parent.delta;
            child.forward(&self.space, 1);
            self.ips.insert(i + 1, child);
        }
    }

    fn trace(&mut self, tix: usize, opcode: Cell) {
        let level = self.env.trace_level();
        if level > 3 {
            let ip = &self.ips[tix];
            eprintln!(
                "tix={} tid={} x={} y={}: {} ({})",
                tix,
                ip.id,
                ip.position.x,
                ip.position.y,
                to_char(opcode),
                opcode
            );
            if level > 8 {
                let stack = ip.stack();
                if stack.is_empty() {
                    eprintln!("\tstack is empty");
                } else {
                    let shown: Vec<String> = (0..stack.len().min(5))
                        .map(|depth| stack.get_indexed(stack.len() - depth).to_string())
                        .collect();
                    eprintln!(
                        "\tstack has {} elements, top 5 (or less): {}",
                        stack.len(),
                        shown.join(" ")
                    );
                }
            }
        } else if level > 2 {
            eprint!("{}", to_char(opcode));
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::io;
    use std::io::Cursor;

    use super::input::LineBuffer;
    use super::*;
    use crate::fungespace::fvec;

    /// An environment connected to nothing at all.
    pub struct NoEnv {
        input: LineBuffer<io::Empty>,
        output: io::Sink,
    }

    impl NoEnv {
        pub fn new() -> Self {
            Self {
                input: LineBuffer::new(io::empty()),
                output: io::sink(),
            }
        }
    }

    impl Default for NoEnv {
        fn default() -> Self {
            Self::new()
        }
    }

    impl InterpreterEnv for NoEnv {
        fn output_writer(&mut self) -> &mut dyn Write {
            &mut self.output
        }
        fn input(&mut self) -> &mut dyn FungeInput {
            &mut self.input
        }
        fn warn(&mut self, _msg: &str) {}
    }

    /// An environment capturing output, with canned input.
    pub struct BufferEnv {
        pub output: Vec<u8>,
        pub input: LineBuffer<Cursor<Vec<u8>>>,
    }

    impl BufferEnv {
        pub fn new(input: &str) -> Self {
            Self {
                output: Vec::new(),
                input: LineBuffer::new(Cursor::new(input.as_bytes().to_vec())),
            }
        }
    }

    impl InterpreterEnv for BufferEnv {
        fn output_writer(&mut self) -> &mut dyn Write {
            &mut self.output
        }
        fn input(&mut self) -> &mut dyn FungeInput {
            &mut self.input
        }
        fn warn(&mut self, _msg: &str) {}
        fn is_fingerprint_enabled(&self, fprint: Cell) -> bool {
            all_fingerprints().contains(&fprint)
        }
    }

    pub fn run_program(src: &str, input: &str) -> (ProgramResult, String) {
        let mut space = FungeSpace::new();
        space.load_string(src.as_bytes());
        let mut interpreter = Interpreter::new(space, BufferEnv::new(input));
        let result = interpreter.run(RunMode::Run);
        (result, String::from_utf8_lossy(&interpreter.env.output).into_owned())
    }

    #[test]
    fn test_arithmetic_program() {
        let (result, output) = run_program("6 5 * . @", "");
        assert_eq!(result, ProgramResult::Done(0));
        assert_eq!(output, "30 ");
    }

    #[test]
    fn test_division_by_zero_in_program() {
        let (result, output) = run_program("50/.@", "");
        assert_eq!(result, ProgramResult::Done(0));
        assert_eq!(output, "0 ");
    }

    #[test]
    fn test_exit_code() {
        let (result, output) = run_program("7q", "");
        assert_eq!(result, ProgramResult::Done(7));
        assert_eq!(output, "");
    }

    #[test]
    fn test_empty_space_panics_instead_of_hanging() {
        let (result, _) = run_program(" ", "");
        assert_eq!(result, ProgramResult::Panic);
    }

    #[test]
    fn test_determinism() {
        let src = "\"!dlroW olleH\">:#,_@";
        let (r1, out1) = run_program(src, "");
        let (r2, out2) = run_program(src, "");
        assert_eq!(r1, r2);
        assert_eq!(out1, out2);
        assert_eq!(out1, "Hello World!");
    }

    #[test]
    fn test_step_mode_pauses() {
        let mut space = FungeSpace::new();
        space.load_string(b"1 2 + . @");
        let mut interpreter = Interpreter::new(space, BufferEnv::new(""));
        assert_eq!(interpreter.run(RunMode::Step), ProgramResult::Paused);
        assert_eq!(interpreter.ips[0].position, fvec(1, 0));
        let mut result = ProgramResult::Paused;
        for _ in 0..10 {
            result = interpreter.run(RunMode::Step);
            if result != ProgramResult::Paused {
                break;
            }
        }
        assert_eq!(result, ProgramResult::Done(0));
    }

    #[test]
    fn test_fork_deep_copies_ip_state() {
        let mut parent = InstructionPointer::<NoEnv>::new();
        parent.push(1);
        assert!(fingerprints::load(
            &mut parent.instructions,
            string_to_fingerprint("ROMA")
        ));
        let mut child = parent.clone();

        parent.push(2);
        assert_eq!(child.stack().len(), 1);
        child.push(3);
        child.push(4);
        assert_eq!(parent.stack().len(), 2);

        assert!(parent.instructions.pop_layer("CDILMVX"));
        assert!(parent.instructions.get('C').is_none());
        assert!(child.instructions.get('C').is_some());
    }
}
