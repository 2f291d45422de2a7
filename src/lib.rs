//! Site map KML generator.
//!
//! Turns a published spreadsheet of candidate and installed sites into a
//! KML dataset (one styled placemark per valid row, grouped into folders by
//! classification) and a KML network link that keeps mapping clients
//! refreshing it.

pub mod analysis;
pub mod config;
pub mod ingest;
pub mod logging;
pub mod model;
pub mod output;
pub mod pipeline;
pub mod render;
pub mod styles;
pub mod validate;
