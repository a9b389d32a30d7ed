use serde::{Deserialize, Serialize};

/// A catalogue ingredient, looked up while composing recipes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Ingredient {
    #[serde(deserialize_with = "super::id::string_or_number")]
    pub id: String,
    pub name: String,
    /// Kilocalories per unit.
    #[serde(default)]
    pub calories: Option<f64>,
    #[serde(default)]
    pub unit: Option<String>,
}
