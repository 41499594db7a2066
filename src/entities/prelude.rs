pub use super::location::Entity as Location;
pub use super::movie::Entity as Movie;
pub use super::weather::Entity as Weather;
