//! Product catalog for the daily reconciliation form.
//!
//! The catalog is a fixed, ordered list of products supplied by
//! configuration. It is never edited at runtime: rows of the report
//! reference catalog entries by id, and an id that does not resolve is a
//! validation error at save time.

use serde::{Deserialize, Serialize};

/// How a product is counted and priced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitKind {
    /// Counted and priced in whole units.
    #[default]
    Discrete,
    /// Counted in whole grams, priced per kilogram.
    WeightInGrams,
}

/// Static catalog entry. Defined once per deployment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductDefinition {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub unit_kind: UnitKind,
}

/// The fixed ordered product list, with id lookup.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: Vec<ProductDefinition>,
}

impl Catalog {
    pub fn new(products: Vec<ProductDefinition>) -> Self {
        Self { products }
    }

    /// Parse a catalog from its JSON configuration document, an array of
    /// product definitions. `unit_kind` may be omitted for discrete products.
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        let products: Vec<ProductDefinition> = serde_json::from_str(raw)?;
        Ok(Self::new(products))
    }

    /// Resolve a product id. `None` means the id is not in the catalog.
    pub fn get(&self, product_id: &str) -> Option<&ProductDefinition> {
        self.products.iter().find(|p| p.id == product_id)
    }

    pub fn contains(&self, product_id: &str) -> bool {
        self.get(product_id).is_some()
    }

    /// Products in definition order.
    pub fn iter(&self) -> impl Iterator<Item = &ProductDefinition> {
        self.products.iter()
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// The catalog this system ships with: one weight-priced masa product
    /// (entered in grams, priced per kilo) and seventeen discrete ones.
    pub fn default_catalog() -> Self {
        let mut products = vec![ProductDefinition {
            id: "PROD01".to_string(),
            name: "Masa".to_string(),
            unit_kind: UnitKind::WeightInGrams,
        }];
        let discrete = [
            ("PROD02", "Palos de Queso"),
            ("PROD03", "Panzeroti"),
            ("PROD04", "Queso Mozarella"),
            ("PROD05", "Gaseosas"),
            ("PROD06", "Coca-Cola"),
            ("PROD07", "Agua Grande"),
            ("PROD08", "Torta Chocolo"),
            ("PROD09", "Salchichón"),
            ("PROD10", "Torta de Carne"),
            ("PROD11", "Tinto"),
            ("PROD12", "Café"),
            ("PROD13", "Pastel de Pollo"),
            ("PROD14", "Arepa Huevo"),
            ("PROD15", "Empanada"),
            ("PROD16", "Empanada Paisa"),
            ("PROD17", "Papas"),
            ("PROD18", "Galletas"),
        ];
        products.extend(discrete.iter().map(|(id, name)| ProductDefinition {
            id: (*id).to_string(),
            name: (*name).to_string(),
            unit_kind: UnitKind::Discrete,
        }));
        Self { products }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_resolves_known_ids_only() {
        let catalog = Catalog::default_catalog();
        assert!(catalog.contains("PROD01"));
        assert_eq!(catalog.get("PROD02").unwrap().name, "Palos de Queso");
        assert!(catalog.get("PROD99").is_none());
        assert!(!catalog.contains(""));
    }

    #[test]
    fn default_catalog_has_one_weight_priced_product() {
        let catalog = Catalog::default_catalog();
        assert_eq!(catalog.len(), 18);
        let by_weight: Vec<_> = catalog
            .iter()
            .filter(|p| p.unit_kind == UnitKind::WeightInGrams)
            .collect();
        assert_eq!(by_weight.len(), 1);
        assert_eq!(by_weight[0].id, "PROD01");
    }

    #[test]
    fn iteration_preserves_definition_order() {
        let catalog = Catalog::new(vec![
            ProductDefinition {
                id: "B".to_string(),
                name: "Second".to_string(),
                unit_kind: UnitKind::Discrete,
            },
            ProductDefinition {
                id: "A".to_string(),
                name: "First".to_string(),
                unit_kind: UnitKind::Discrete,
            },
        ]);
        let ids: Vec<_> = catalog.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["B", "A"]);
    }

    #[test]
    fn from_json_defaults_unit_kind_to_discrete() {
        let raw = r#"[
            {"id": "P1", "name": "Masa", "unit_kind": "weight_in_grams"},
            {"id": "P2", "name": "Empanada"}
        ]"#;
        let catalog = Catalog::from_json(raw).expect("parse catalog");
        assert_eq!(catalog.get("P1").unwrap().unit_kind, UnitKind::WeightInGrams);
        assert_eq!(catalog.get("P2").unwrap().unit_kind, UnitKind::Discrete);
    }

    #[test]
    fn from_json_rejects_malformed_documents() {
        assert!(Catalog::from_json("{\"not\": \"a list\"}").is_err());
    }
}
