pub mod history;
pub mod osm;
