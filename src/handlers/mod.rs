// handlers/mod.rs - Two-tier handler layout
//
// Public (no auth) → Admin (JWT auth + verified administrator)
pub mod admin;  // /api/admin/* - privileged handle acquired per request
pub mod public; // /, /health
