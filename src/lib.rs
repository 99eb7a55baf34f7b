//! Extracts the history of a chosen set of tags for every node, way and
//! relation in an OpenStreetMap full-history export, in a single streaming pass.

pub mod config;
pub mod data;
pub mod errors;
pub mod etl;
pub mod pipeline;
pub mod stream;
