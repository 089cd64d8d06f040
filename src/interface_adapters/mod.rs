// Interface adapters: input collaborators, wire DTOs and the headless render consumer.

pub mod input;
pub mod protocol;
pub mod render;
pub mod script;

pub use input::KeyStack;
pub use render::frame_serializer;
pub use script::{ScriptStep, parse_script, play_script};
