// Canned payloads served when the recommendation backend is unreachable.
// Each one matches the shape of the live response for its endpoint.

pub mod chat;
pub mod payloads;
