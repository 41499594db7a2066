pub mod darksky;
pub mod geocode;
pub mod tmdb;
pub mod yelp;

pub use darksky::WeatherClient;
pub use geocode::GeocodeClient;
pub use tmdb::TmdbClient;
pub use yelp::YelpClient;
