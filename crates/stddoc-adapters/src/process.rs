//! Shared helpers for running external tools.

use std::io;
use std::process::Command;

/// Run `command` to completion with inherited stdio.
///
/// Returns the exit code; a process killed by a signal reports `-1`.
pub(crate) fn exit_code(command: &mut Command) -> io::Result<i32> {
    let status = command.status()?;
    Ok(status.code().unwrap_or(-1))
}

/// Shell-like rendering for log lines.
pub(crate) fn describe(command: &Command) -> String {
    std::iter::once(command.get_program())
        .chain(command.get_args())
        .map(|part| part.to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join(" ")
}
