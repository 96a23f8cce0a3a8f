mod scripted_system;

pub use scripted_system::{Scripted, ScriptedSystem};
