// Adapters layer: concrete implementations for external systems.

pub mod cloudflare;
pub mod pushplus;
pub mod uouin;
