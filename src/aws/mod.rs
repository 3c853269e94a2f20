//! AWS credential resolution and session construction.

pub mod profile;
pub mod session;

pub use profile::{resolve_profile, ProfileConfig};
pub use session::load_sdk_config;
