//! Catalog entities

pub mod dataset;
pub mod lineage_edge;
pub mod local_copy;
