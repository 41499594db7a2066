pub mod cache;
pub mod location;
