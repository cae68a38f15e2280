// Video platform client (search + videos endpoints).
//
// Auth: API key as the `key` query parameter, scoped to one channel.

mod client;
pub mod types;

pub use client::VideoClient;
