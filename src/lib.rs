/// TTRPG Compendium - Filter State Synchronization
///
/// Core library keeping a list page's filter state consistent across its
/// in-memory store, the address-bar query string, and a per-device
/// persisted cache.

pub mod config;
pub mod core;


pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
