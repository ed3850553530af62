pub mod cli;
pub mod console;
pub mod logging;
pub mod run;

pub use cli::{Cli, Cmd};
pub use console::{parse_input, read_commands, Input};
pub use logging::init_logging;
pub use run::run;
