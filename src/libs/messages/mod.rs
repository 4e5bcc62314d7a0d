pub mod display;
pub mod macros;
pub mod prompts;
pub mod types;

pub use types::Message;
