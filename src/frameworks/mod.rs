// Frameworks layer: runtime bootstrap, env configuration and the built-in level.

pub mod arena;
pub mod config;
pub mod runtime;
