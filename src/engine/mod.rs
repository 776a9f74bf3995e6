// Command execution components
pub mod environment;
pub mod execution_context;
pub mod delegate;
pub mod command_runner;

pub use environment::*;
pub use execution_context::*;
pub use delegate::*;
pub use command_runner::*;
