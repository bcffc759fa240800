pub mod commands;
pub mod terminal;

pub use commands::{Cli, Commands};
pub use terminal::{read_commands, TerminalView};
