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

use std::fs::File;
use std::io;
use std::io::{Read, Write};
use std::process::Command;

use clap::{App, AppSettings, Arg};

use rsfunge::cell::CELL_BITS;
use rsfunge::interpreter::fingerprints::FINGERPRINTS;
use rsfunge::interpreter::safe_env::env_var_is_safe;
use rsfunge::{
    all_fingerprints, new_interpreter, safe_fingerprints, Cell, ExecMode, FungeInput,
    InterpreterEnv, LineBuffer, ProgramResult, RunMode, Standard,
};

/// The environment used when running from the command line: real stdio,
/// real files, real subprocesses, all of it subject to the sandbox flag.
struct CmdLineEnv {
    stdout: io::Stdout,
    input: LineBuffer<io::Stdin>,
    warnings: bool,
    sandbox: bool,
    standard: Standard,
    trace_level: u32,
    disable_fingerprints: bool,
    argv: Vec<String>,
    allowed_fingerprints: Vec<Cell>,
}

impl CmdLineEnv {
    #[allow(clippy::too_many_arguments)]
    fn new(
        warnings: bool,
        sandbox: bool,
        standard: Standard,
        trace_level: u32,
        disable_fingerprints: bool,
        argv: Vec<String>,
    ) -> Self {
        Self {
            stdout: io::stdout(),
            input: LineBuffer::new(io::stdin()),
            warnings,
            sandbox,
            standard,
            trace_level,
            disable_fingerprints,
            argv,
            allowed_fingerprints: if sandbox {
                safe_fingerprints()
            } else {
                all_fingerprints()
            },
        }
    }
}

impl InterpreterEnv for CmdLineEnv {
    fn output_writer(&mut self) -> &mut dyn Write {
        &mut self.stdout
    }
    fn input(&mut self) -> &mut dyn FungeInput {
        &mut self.input
    }
    fn warn(&mut self, msg: &str) {
        if self.warnings {
            eprintln!("WARN: {}", msg);
        }
    }
    fn standard(&self) -> Standard {
        self.standard
    }
    fn trace_level(&self) -> u32 {
        self.trace_level
    }
    fn have_file_input(&self) -> bool {
        !self.sandbox
    }
    fn have_file_output(&self) -> bool {
        !self.sandbox
    }
    fn have_execute(&self) -> ExecMode {
        if self.sandbox {
            ExecMode::Disabled
        } else {
            ExecMode::System
        }
    }
    fn read_file(&mut self, filename: &str) -> io::Result<Vec<u8>> {
        if self.sandbox {
            Err(io::Error::from(io::ErrorKind::PermissionDenied))
        } else {
            let mut buf = Vec::new();
            File::open(filename).and_then(|mut f| f.read_to_end(&mut buf))?;
            Ok(buf)
        }
    }
    fn write_file(&mut self, filename: &str, content: &[u8]) -> io::Result<()> {
        if self.sandbox {
            Err(io::Error::from(io::ErrorKind::PermissionDenied))
        } else {
            File::create(filename).and_then(|mut f| f.write_all(content))
        }
    }
    fn execute_command(&mut self, command: &str) -> Cell {
        if self.sandbox {
            -1
        } else if cfg!(unix) {
            Command::new("sh")
                .arg("-c")
                .arg(command)
                .status()
                .ok()
                .and_then(|s| s.code())
                .unwrap_or(-1) as Cell
        } else if cfg!(windows) {
            Command::new("CMD")
                .arg("/C")
                .arg(command)
                .status()
                .ok()
                .and_then(|s| s.code())
                .unwrap_or(-1) as Cell
        } else {
            eprintln!("WARNING: Attempted to execute command, but I don't know how on this system!");
            -1
        }
    }
    fn env_vars(&mut self) -> Vec<(String, String)> {
        std::env::vars()
            .filter(|(key, _)| !self.sandbox || env_var_is_safe(key))
            .collect()
    }
    fn argv(&mut self) -> Vec<String> {
        self.argv.clone()
    }
    fn fingerprints_disabled(&self) -> bool {
        self.disable_fingerprints
    }
    fn is_fingerprint_enabled(&self, fprint: Cell) -> bool {
        !self.disable_fingerprints && self.allowed_fingerprints.contains(&fprint)
    }
}

fn print_features() {
    println!("Features compiled into this binary:");
    println!(" * Cell size is {} bits ({} bytes).", CELL_BITS, CELL_BITS / 8);
    println!(" + Concurrency using the t instruction is enabled.");
    println!(" + Sandbox mode is available (-S).");
    println!();
    println!("Supported fingerprints in this binary:");
    for spec in FINGERPRINTS {
        println!(
            "0x{:x} {}{} {}",
            spec.fprint,
            spec.name,
            if spec.safe {
                ""
            } else {
                " (not available in sandbox mode)"
            },
            spec.url
        );
    }
}

fn main() {
    let arg_matches = App::new(env!("CARGO_BIN_NAME"))
        .version(env!("CARGO_PKG_VERSION"))
        .about("Standard-conforming Befunge-93/98/109 interpreter")
        .setting(AppSettings::TrailingVarArg)
        .arg(
            Arg::with_name("no-fingerprints")
                .short("F")
                .help("Disable all fingerprints"),
        )
        .arg(
            Arg::with_name("features")
                .short("f")
                .help("Show list of features and fingerprints supported in this binary, then exit"),
        )
        .arg(
            Arg::with_name("sandbox")
                .short("S")
                .long("sandbox")
                .help("Enable sandbox mode (no file/filesystem/network IO, restricted environment)"),
        )
        .arg(
            Arg::with_name("standard")
                .short("s")
                .long("standard")
                .takes_value(true)
                .possible_values(&["93", "98", "108", "109"])
                .default_value("98")
                .help("Use the given standard"),
        )
        .arg(
            Arg::with_name("trace")
                .short("t")
                .takes_value(true)
                .value_name("LEVEL")
                .default_value("0")
                .help("Use given trace level"),
        )
        .arg(
            Arg::with_name("warn")
                .short("W")
                .long("warn")
                .help("Show warnings"),
        )
        .arg(
            Arg::with_name("PROGRAM")
                .help("Befunge source to execute")
                .required_unless("features"),
        )
        .arg(
            Arg::with_name("ARGS")
                .help("Arguments to pass to the program")
                .required(false)
                .multiple(true),
        )
        .get_matches();

    if arg_matches.is_present("features") {
        print_features();
        std::process::exit(0);
    }

    let filename = arg_matches.value_of("PROGRAM").unwrap();

    let standard = match arg_matches.value_of("standard").unwrap() {
        "93" => Standard::S93,
        "98" => Standard::S98,
        // 108 was the working title of the 109 standard
        _ => Standard::S109,
    };

    let trace_level = match arg_matches.value_of("trace").unwrap().parse() {
        Ok(level) => level,
        Err(_) => {
            eprintln!("The trace level has to be a non-negative number.");
            std::process::exit(1);
        }
    };

    let mut argv = vec![filename.to_owned()];
    argv.append(&mut arg_matches.values_of_lossy("ARGS").unwrap_or_default());

    let src = match std::fs::read(filename) {
        Ok(src) => src,
        Err(err) => {
            eprintln!("Failed to process file \"{}\": {}", filename, err);
            std::process::exit(1);
        }
    };

    let env = CmdLineEnv::new(
        arg_matches.is_present("warn"),
        arg_matches.is_present("sandbox"),
        standard,
        trace_level,
        arg_matches.is_present("no-fingerprints"),
        argv,
    );

    let mut interpreter = new_interpreter(env);
    interpreter.space.load_string(&src);

    std::process::exit(match interpreter.run(RunMode::Run) {
        ProgramResult::Done(returncode) => returncode,
        ProgramResult::Panic | ProgramResult::Paused => 1,
    });
}
