pub mod classifier;
pub mod config;
pub mod device;
pub mod dispatcher;
pub mod executor;
pub mod intent;
pub mod lifecycle;
pub mod llm;
pub mod messages;
pub mod terminal;
