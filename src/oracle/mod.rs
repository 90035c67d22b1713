pub mod client;
pub mod prompts;
pub mod task;
