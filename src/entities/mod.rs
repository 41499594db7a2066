pub mod prelude;

pub mod location;
pub mod movie;
pub mod weather;
