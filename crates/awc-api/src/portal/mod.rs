// Portal REST API client.
//
// Base path: the portal origin (e.g. https://portal.example.org/)
// Auth: Authorization: Bearer <session token>

mod client;
pub mod types;

pub use client::PortalClient;
