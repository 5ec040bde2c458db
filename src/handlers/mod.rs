// handlers/mod.rs - two security tiers
//
// Public (no auth) → Protected (JWT auth, plus a city-claim check for
// point-of-interest routes).
pub mod protected;
pub mod public;
