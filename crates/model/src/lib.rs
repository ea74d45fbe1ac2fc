pub mod geo_point;
pub mod geojson;
pub mod heat;
pub mod overlay;
pub mod path;

pub use geo_point::GeoPoint;
