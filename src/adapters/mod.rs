// Adapters layer: concrete implementations for external systems (store, http transport).

pub mod gateway;
pub mod reply;
pub mod server;
pub mod supabase;
