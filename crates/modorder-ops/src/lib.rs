pub mod ops_profile;
pub mod ops_registry;
pub mod ops_scan;
pub mod ops_session;

pub use ops_session::Session;
