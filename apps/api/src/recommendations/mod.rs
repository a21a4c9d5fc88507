//! Course recommendation pipeline: normalize the client body, ask the
//! backend (or fall back to the canned list), reshape for the client.

pub mod handlers;
pub mod normalize;
pub mod transform;
