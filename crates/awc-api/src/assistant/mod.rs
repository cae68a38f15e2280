// Generative chat backend client (`generateContent`).
//
// Auth: API key in the `x-goog-api-key` header.

mod client;
pub mod types;

pub use client::AssistantClient;
