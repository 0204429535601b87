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

//! The fingerprint manager.
//!
//! Every compiled-in fingerprint is listed in [FINGERPRINTS] with its id
//! (the big-endian packing of its four-letter name), a sandbox-safety flag,
//! the letters it implements, and a reference URL. Loaders only ever *push*
//! handlers onto the IP's overlays, so loading twice stacks and unloading
//! peels one layer off again.

#![allow(non_snake_case)]

mod BOOL;
mod HRTI;
mod MODU;
mod NULL;
mod REFC;
mod ROMA;

use super::{InstructionSet, InterpreterEnv};
use crate::cell::Cell;

/// Compile-time description of one fingerprint.
pub struct FingerprintSpec {
    pub fprint: Cell,
    pub name: &'static str,
    /// May this fingerprint be loaded in sandbox mode?
    pub safe: bool,
    /// The letters the fingerprint implements, sorted.
    pub opcodes: &'static str,
    pub url: &'static str,
}

/// All compiled-in fingerprints, sorted by id.
pub const FINGERPRINTS: &[FingerprintSpec] = &[
    FingerprintSpec {
        fprint: 0x424f4f4c,
        name: "BOOL",
        safe: true,
        opcodes: "ANOX",
        url: "http://web.archive.org/web/20020816190021/http://homer.span.ch/~spaw1088/funge.html",
    },
    FingerprintSpec {
        fprint: 0x48525449,
        name: "HRTI",
        safe: true,
        opcodes: "EGMST",
        url: "http://catseye.tc/projects/funge98/library/HRTI.html",
    },
    FingerprintSpec {
        fprint: 0x4d4f4455,
        name: "MODU",
        safe: true,
        opcodes: "MRU",
        url: "http://catseye.tc/projects/funge98/library/MODU.html",
    },
    FingerprintSpec {
        fprint: 0x4e554c4c,
        name: "NULL",
        safe: true,
        opcodes: "ABCDEFGHIJKLMNOPQRSTUVWXYZ",
        url: "http://catseye.tc/projects/funge98/library/NULL.html",
    },
    FingerprintSpec {
        fprint: 0x52454643,
        name: "REFC",
        safe: true,
        opcodes: "DR",
        url: "http://catseye.tc/projects/funge98/library/REFC.html",
    },
    FingerprintSpec {
        fprint: 0x524f4d41,
        name: "ROMA",
        safe: true,
        opcodes: "CDILMVX",
        url: "http://catseye.tc/projects/funge98/library/ROMA.html",
    },
];

/// Convert a fingerprint string to a numeric fingerprint
pub fn string_to_fingerprint(fprint_str: &str) -> Cell {
    let mut fprint: Cell = 0;
    for c in fprint_str.chars() {
        fprint = fprint.wrapping_shl(8).wrapping_add(c as Cell);
    }
    fprint
}

/// Find the table entry for a fingerprint id.
pub fn lookup(fprint: Cell) -> Option<&'static FingerprintSpec> {
    FINGERPRINTS
        .binary_search_by_key(&fprint, |spec| spec.fprint)
        .ok()
        .map(|idx| &FINGERPRINTS[idx])
}

/// Get a list of all available fingerprints that are considered "safe"
/// (i.e., no executing external commands, no IO)
pub fn safe_fingerprints() -> Vec<Cell> {
    FINGERPRINTS
        .iter()
        .filter(|spec| spec.safe)
        .map(|spec| spec.fprint)
        .collect()
}

/// Get a list of all available fingerprints
pub fn all_fingerprints() -> Vec<Cell> {
    FINGERPRINTS.iter().map(|spec| spec.fprint).collect()
}

pub fn load<Env: InterpreterEnv>(instructionset: &mut InstructionSet<Env>, fprint: Cell) -> bool {
    if fprint == string_to_fingerprint("BOOL") {
        BOOL::load(instructionset)
    } else if fprint == string_to_fingerprint("HRTI") {
        HRTI::load(instructionset)
    } else if fprint == string_to_fingerprint("MODU") {
        MODU::load(instructionset)
    } else if fprint == string_to_fingerprint("NULL") {
        NULL::load(instructionset)
    } else if fprint == string_to_fingerprint("REFC") {
        REFC::load(instructionset)
    } else if fprint == string_to_fingerprint("ROMA") {
        ROMA::load(instructionset)
    } else {
        false
    }
}

pub fn unload<Env: InterpreterEnv>(instructionset: &mut InstructionSet<Env>, fprint: Cell) -> bool {
    if fprint == string_to_fingerprint("BOOL") {
        BOOL::unload(instructionset)
    } else if fprint == string_to_fingerprint("HRTI") {
        HRTI::unload(instructionset)
    } else if fprint == string_to_fingerprint("MODU") {
        MODU::unload(instructionset)
    } else if fprint == string_to_fingerprint("NULL") {
        NULL::unload(instructionset)
    } else if fprint == string_to_fingerprint("REFC") {
        REFC::unload(instructionset)
    } else if fprint == string_to_fingerprint("ROMA") {
        ROMA::unload(instructionset)
    } else {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_matches_names() {
        for spec in FINGERPRINTS {
            assert_eq!(spec.fprint, string_to_fingerprint(spec.name));
        }
    }

    #[test]
    fn test_table_is_sorted() {
        for pair in FINGERPRINTS.windows(2) {
            assert!(pair[0].fprint < pair[1].fprint);
        }
    }

    #[test]
    fn test_lookup() {
        assert_eq!(lookup(0x4e554c4c).map(|s| s.name), Some("NULL"));
        assert!(lookup(0x464f4f21).is_none());
    }

    #[test]
    fn test_string_to_fingerprint() {
        assert_eq!(string_to_fingerprint("NULL"), 0x4e554c4c);
        assert_eq!(string_to_fingerprint("ROMA"), 0x524f4d41);
    }
}
