//! Reference-data lookup models

use serde::{Deserialize, Serialize};

/// One row of a reference lookup table (quality, colour, type, location)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefItem {
    pub id: i32,
    pub name: String,
}

/// All four lookup tables in one response
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MasterNames {
    pub qualities: Vec<RefItem>,
    pub colours: Vec<RefItem>,
    pub product_types: Vec<RefItem>,
    pub storage_locations: Vec<RefItem>,
}
