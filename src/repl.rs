use rustyline::{error::ReadlineError, DefaultEditor};
use tracing::warn;

use crate::{runner::Interpreter, value::Value};

const PROMPT: &str = "LISP>> ";

pub fn banner() -> String {
    format!(
        "Welcome to my LISP Interpreter\nVersion:{}\nPress 'Ctrl+C' to exit",
        env!("CARGO_PKG_VERSION")
    )
}

/// Runs the interactive loop until the user interrupts it. Errors from a
/// single line are printed and the loop goes on.
pub fn start(interpreter: &Interpreter) -> Result<(), ReadlineError> {
    let mut rl = DefaultEditor::new()?;

    loop {
        let line = match rl.readline(PROMPT) {
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                println!("\nExiting\n");
                break;
            }
            Err(err) => return Err(err),
            Ok(line) => line,
        };

        if line.trim().is_empty() {
            continue;
        }
        if let Err(err) = rl.add_history_entry(line.as_str()) {
            warn!(%err, "could not record history");
        }

        match interpreter.rep(&line) {
            Ok(Value::Nil) => {}
            Ok(value) => println!("{}", value),
            Err(err) => println!("{}", err),
        }
    }

    Ok(())
}
