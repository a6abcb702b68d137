//! Command implementations.

pub mod cache;
pub mod completions;
pub mod inspect_log;
pub mod run;
pub mod validate;

pub use cache::CacheCommand;
pub use completions::CompletionsCommand;
pub use inspect_log::InspectLogCommand;
pub use run::RunCommand;
pub use validate::ValidateCommand;
