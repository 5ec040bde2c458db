// handlers/public/mod.rs - Public handlers (no authentication required)
//
// Token acquisition and service status.
pub mod authentication;
pub mod status;
