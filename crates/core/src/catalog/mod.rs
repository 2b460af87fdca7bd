//! Static product catalog and its loaders.

mod loader;
mod seed;

use std::collections::HashSet;

use serde::Serialize;

use crate::domain::product::{Product, ProductId, SkinType};
use crate::errors::DomainError;

pub use loader::{load, CatalogError, CatalogSource, CSV_COLUMNS};

/// Immutable, ordered product table. Iteration order is load order and is
/// the tie-breaker wherever products compare equal.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Catalog {
    products: Vec<Product>,
}

/// Filter used when browsing the catalog by hand.
#[derive(Clone, Debug, Default)]
pub struct BrowseFilter {
    /// Exact skin type; `None` lists every product.
    pub skin_type: Option<SkinType>,
    /// Case-insensitive substring of any concern tag.
    pub concern: Option<String>,
}

impl Catalog {
    pub fn new(products: Vec<Product>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::with_capacity(products.len());
        for product in &products {
            if !seen.insert(&product.id) {
                return Err(CatalogError::DuplicateId(product.id.0.clone()));
            }
        }
        Ok(Self { products })
    }

    pub fn seeded() -> Self {
        Self { products: seed::seed_products() }
    }

    pub fn find(&self, product_id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|product| &product.id == product_id)
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Product> {
        self.products.iter()
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    pub fn browse(&self, filter: &BrowseFilter) -> Vec<&Product> {
        let concern = filter
            .concern
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_lowercase);

        self.products
            .iter()
            .filter(|product| filter.skin_type.map_or(true, |wanted| product.skin_type == wanted))
            .filter(|product| {
                concern.as_deref().map_or(true, |needle| product.mentions_concern(needle))
            })
            .collect()
    }

    /// Sum of the prices of the selected products, as shown on the budget
    /// sheet. Selecting the same product twice counts it twice.
    pub fn selection_total(&self, selected: &[ProductId]) -> Result<u64, DomainError> {
        selected.iter().try_fold(0u64, |total, product_id| {
            let product = self
                .find(product_id)
                .ok_or_else(|| DomainError::UnknownProduct(product_id.0.clone()))?;
            total.checked_add(product.price).ok_or_else(|| {
                DomainError::InvariantViolation("selection total overflowed".to_owned())
            })
        })
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a Product;
    type IntoIter = std::slice::Iter<'a, Product>;

    fn into_iter(self) -> Self::IntoIter {
        self.products.iter()
    }
}

#[cfg(test)]
mod tests {
    use crate::domain::product::{ProductId, SkinType};
    use crate::errors::DomainError;

    use super::{BrowseFilter, Catalog, CatalogError};

    #[test]
    fn seeded_catalog_has_unique_ids() {
        let seeded = Catalog::seeded();
        assert!(!seeded.is_empty());
        assert!(Catalog::new(seeded.products().to_vec()).is_ok());
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let mut products = Catalog::seeded().products().to_vec();
        products.push(products[0].clone());

        let error = Catalog::new(products).expect_err("duplicate id should fail");
        assert!(matches!(error, CatalogError::DuplicateId(ref id) if id == "cln-gel-001"));
    }

    #[test]
    fn browse_filters_by_exact_skin_type_and_concern_substring() {
        let catalog = Catalog::seeded();

        let everything = catalog.browse(&BrowseFilter::default());
        assert_eq!(everything.len(), catalog.len());

        let oily_acne = catalog.browse(&BrowseFilter {
            skin_type: Some(SkinType::Oily),
            concern: Some("ACNE".to_owned()),
        });
        assert!(!oily_acne.is_empty());
        assert!(oily_acne.iter().all(|product| {
            product.skin_type == SkinType::Oily && product.mentions_concern("acne")
        }));

        let blank_concern =
            catalog.browse(&BrowseFilter { skin_type: None, concern: Some("  ".to_owned()) });
        assert_eq!(blank_concern.len(), catalog.len());
    }

    #[test]
    fn selection_total_sums_prices_and_rejects_unknown_ids() {
        let catalog = Catalog::seeded();
        let selection = [ProductId("cln-bha-003".to_owned()), ProductId("srm-niac-001".to_owned())];
        let total = catalog.selection_total(&selection).expect("known products");
        assert_eq!(total, 299 + 590);

        assert_eq!(catalog.selection_total(&[]), Ok(0));

        let error = catalog
            .selection_total(&[ProductId("missing".to_owned())])
            .expect_err("unknown product");
        assert_eq!(error, DomainError::UnknownProduct("missing".to_owned()));
    }
}
