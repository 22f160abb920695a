//! Presence events reported by the voice platform

mod voice_state;

pub use voice_state::{PresenceTransition, VoiceState, VoiceStateUpdate};
