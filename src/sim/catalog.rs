//! Item catalogue
//!
//! An ordered list of item types; the order is the spawn order. The last
//! entry is the single final item.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One catalogue entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemTypeSpec {
    /// Display name ("chips")
    pub name: String,
    /// Sprite key handed to the renderer (image file name)
    pub sprite: String,
    /// Points awarded per catch
    pub point_value: u32,
    /// How many of this type are spawned
    pub total_count: u32,
    /// Slow, high-value closer
    #[serde(default)]
    pub is_final: bool,
}

impl ItemTypeSpec {
    pub fn new(name: &str, sprite: &str, point_value: u32, total_count: u32) -> Self {
        Self {
            name: name.to_string(),
            sprite: sprite.to_string(),
            point_value,
            total_count,
            is_final: false,
        }
    }

    pub fn final_item(name: &str, sprite: &str, point_value: u32) -> Self {
        Self {
            is_final: true,
            ..Self::new(name, sprite, point_value, 1)
        }
    }

    /// Name with a leading capital, as shown on the HUD
    pub fn display_name(&self) -> String {
        let mut chars = self.name.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("item catalogue is empty")]
    Empty,
    #[error("item type '{name}' has a zero count")]
    ZeroCount { name: String },
    #[error("final item must be the last catalogue entry (found at index {index})")]
    FinalNotLast { index: usize },
    #[error("catalogue must contain exactly one final item, found {found}")]
    FinalCount { found: usize },
}

/// The stock five-type catalogue (38 items)
pub fn default_catalog() -> Vec<ItemTypeSpec> {
    vec![
        ItemTypeSpec::new("chocolates", "chocolates.jpg", 2, 15),
        ItemTypeSpec::new("chips", "chips.jpg", 3, 10),
        ItemTypeSpec::new("donuts", "donuts.jpg", 4, 8),
        ItemTypeSpec::new("pizza", "pizza.jpg", 5, 4),
        ItemTypeSpec::final_item("persons_face", "persons_face.png", 10),
    ]
}

/// Check catalogue invariants: non-empty, every count >= 1, exactly one
/// final entry and it is last.
pub fn validate_catalog(catalog: &[ItemTypeSpec]) -> Result<(), CatalogError> {
    if catalog.is_empty() {
        return Err(CatalogError::Empty);
    }
    if let Some(spec) = catalog.iter().find(|spec| spec.total_count == 0) {
        return Err(CatalogError::ZeroCount {
            name: spec.name.clone(),
        });
    }
    let finals = catalog.iter().filter(|spec| spec.is_final).count();
    if finals != 1 {
        return Err(CatalogError::FinalCount { found: finals });
    }
    if let Some(index) = catalog.iter().position(|spec| spec.is_final) {
        if index != catalog.len() - 1 {
            return Err(CatalogError::FinalNotLast { index });
        }
    }
    Ok(())
}

/// Number of catches needed for a perfect run
pub fn total_to_catch(catalog: &[ItemTypeSpec]) -> u32 {
    catalog.iter().map(|spec| spec.total_count).sum()
}
