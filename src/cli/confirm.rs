//! Operator confirmation prompt
//!
//! A run proceeds only on an explicit affirmative. Anything else,
//! including an empty line or EOF, aborts with zero actions executed.

use std::io::{self, BufRead, Write};

/// Case-insensitive affirmative match: `y` or `yes`.
pub fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

/// Read one line from the reader and interpret it as a yes/no answer.
pub fn read_confirmation<R: BufRead>(reader: &mut R) -> io::Result<bool> {
    let mut line = String::new();
    let bytes = reader.read_line(&mut line)?;
    if bytes == 0 {
        // EOF counts as a decline.
        return Ok(false);
    }
    Ok(is_affirmative(&line))
}

/// Print a prompt and read the answer from stdin.
pub fn ask(prompt: &str) -> io::Result<bool> {
    print!(
        "{prompt}\n\
         to continue - y\n\
         to cancel - n or leave empty\n\n\
         Answer: "
    );
    io::stdout().flush()?;

    let stdin = io::stdin();
    let mut lock = stdin.lock();
    read_confirmation(&mut lock)
}
