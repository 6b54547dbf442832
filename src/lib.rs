pub mod builtins;
pub mod env;
pub mod error;
pub mod eval;
pub mod reader;
pub mod repl;
pub mod runner;
pub mod value;

pub use env::Env;
pub use error::{EvalError, LispError, ReadError};
pub use eval::eval;
pub use runner::Interpreter;
pub use value::Value;
