pub mod commands;
pub mod engine;
pub mod cli;
pub mod utils;

pub use commands::*;
pub use engine::*;
pub use cli::*;
pub use utils::*;
