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

//! The allow-list of environment variables that sysinfo may reveal in
//! sandbox mode. Everything else stays hidden from the program.

/// Environment variables considered harmless. Kept sorted for binary search.
pub const SAFE_ENV_VARS: &[&str] = &[
    "COLORTERM",
    "COLUMNS",
    "DISPLAY",
    "EDITOR",
    "GROUP",
    "HOME",
    "HOST",
    "LANG",
    "LC_ADDRESS",
    "LC_ALL",
    "LC_COLLATE",
    "LC_CTYPE",
    "LC_IDENTIFICATION",
    "LC_MEASUREMENT",
    "LC_MESSAGES",
    "LC_MONETARY",
    "LC_NAME",
    "LC_NUMERIC",
    "LC_PAPER",
    "LC_TELEPHONE",
    "LC_TIME",
    "MACHTYPE",
    "OSTYPE",
    "PAGER",
    "PATH",
    "PS1",
    "PWD",
    "SHELL",
    "TERM",
    "TZ",
    "USER",
    "VISUAL",
];

/// Is this variable safe to expose to a sandboxed program?
pub fn env_var_is_safe(name: &str) -> bool {
    SAFE_ENV_VARS.binary_search(&name).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_is_sorted() {
        let mut sorted = SAFE_ENV_VARS.to_vec();
        sorted.sort_unstable();
        assert_eq!(sorted, SAFE_ENV_VARS);
    }

    #[test]
    fn test_allow_list() {
        assert!(env_var_is_safe("PATH"));
        assert!(env_var_is_safe("LC_ALL"));
        assert!(env_var_is_safe("TZ"));
        assert!(!env_var_is_safe("SSH_AUTH_SOCK"));
        assert!(!env_var_is_safe("AWS_SECRET_ACCESS_KEY"));
        assert!(!env_var_is_safe(""));
    }
}
