use crate::catalog::Catalog;
use crate::domain::allocation::{BudgetAllocation, CategoryAllocation};
use crate::domain::product::{Category, Product};
use crate::domain::profile::SkinProfile;

use super::matcher::matching;

/// Greedy per-category allocation in [`Category::CANONICAL_ORDER`].
///
/// Each category takes its cheapest matching product that still fits in what
/// is left of the budget; price ties keep catalog order. Earlier picks are
/// never revisited, so a cheaper overall combination can exist. A category
/// with nothing affordable is recorded as `None` and allocation carries on.
pub fn allocate_budget(catalog: &Catalog, profile: &SkinProfile, budget: u64) -> BudgetAllocation {
    let mut total_spent = 0u64;
    let mut entries = Vec::with_capacity(Category::CANONICAL_ORDER.len());

    for category in Category::CANONICAL_ORDER {
        let remaining = budget - total_spent;
        let product = cheapest_affordable(catalog, category, profile, remaining);
        if let Some(product) = &product {
            total_spent += product.price;
        }
        entries.push(CategoryAllocation { category, product });
    }

    BudgetAllocation { budget, total_spent, entries }
}

fn cheapest_affordable(
    catalog: &Catalog,
    category: Category,
    profile: &SkinProfile,
    remaining: u64,
) -> Option<Product> {
    let mut candidates: Vec<&Product> = matching(catalog, category, profile).collect();
    // Stable: equal prices stay in catalog order.
    candidates.sort_by_key(|product| product.price);
    candidates.into_iter().find(|product| product.price <= remaining).cloned()
}

#[cfg(test)]
mod tests {
    use crate::catalog::Catalog;
    use crate::domain::product::{Category, ConcernTags, Product, ProductId, SkinType};
    use crate::domain::profile::SkinProfile;
    use crate::recommend::match_products;

    use super::allocate_budget;

    fn product(id: &str, category: Category, price: u64) -> Product {
        Product {
            id: ProductId(id.to_owned()),
            brand: "Studio".to_owned(),
            name: id.to_owned(),
            category,
            skin_type: SkinType::Oily,
            concern_tags: ConcernTags::new(),
            price,
        }
    }

    fn oily() -> SkinProfile {
        SkinProfile::new(SkinType::Oily)
    }

    #[test]
    fn picks_cheapest_affordable_cleanser() {
        let catalog = Catalog::new(vec![
            product("premium", Category::Cleanser, 100),
            product("budget", Category::Cleanser, 50),
        ])
        .expect("catalog");

        let allocation = allocate_budget(&catalog, &oily(), 75);

        assert_eq!(allocation.get(Category::Cleanser).map(|p| p.id.0.as_str()), Some("budget"));
        assert_eq!(allocation.total_spent, 50);
        assert_eq!(allocation.remaining(), 25);
    }

    #[test]
    fn zero_budget_allocates_nothing() {
        let allocation = allocate_budget(&Catalog::seeded(), &oily(), 0);

        assert_eq!(allocation.total_spent, 0);
        assert_eq!(allocation.entries.len(), Category::CANONICAL_ORDER.len());
        assert!(allocation.entries.iter().all(|entry| entry.product.is_none()));
    }

    #[test]
    fn zero_priced_products_fit_a_zero_budget() {
        let catalog =
            Catalog::new(vec![product("sample", Category::Toner, 0)]).expect("catalog");
        let allocation = allocate_budget(&catalog, &oily(), 0);
        assert!(allocation.get(Category::Toner).is_some());
        assert_eq!(allocation.total_spent, 0);
    }

    #[test]
    fn exhausted_category_is_skipped_and_later_categories_still_filled() {
        let catalog = Catalog::new(vec![
            product("wash", Category::Cleanser, 60),
            product("toner", Category::Toner, 80),
            product("serum", Category::Serum, 30),
        ])
        .expect("catalog");

        let allocation = allocate_budget(&catalog, &oily(), 100);

        assert!(allocation.get(Category::Cleanser).is_some());
        assert!(allocation.get(Category::Toner).is_none());
        assert!(allocation.get(Category::Serum).is_some());
        assert_eq!(allocation.total_spent, 90);
        assert_eq!(
            allocation.unfilled().collect::<Vec<_>>(),
            vec![Category::Toner, Category::Moisturizer, Category::Sunscreen, Category::Exfoliant]
        );
    }

    #[test]
    fn greedy_order_is_kept_even_when_a_better_packing_exists() {
        // Optimal would skip the cleanser to afford toner + serum; greedy does not.
        let catalog = Catalog::new(vec![
            product("wash", Category::Cleanser, 70),
            product("toner", Category::Toner, 50),
            product("serum", Category::Serum, 50),
        ])
        .expect("catalog");

        let allocation = allocate_budget(&catalog, &oily(), 100);

        assert_eq!(
            allocation.assigned().map(|p| p.id.0.as_str()).collect::<Vec<_>>(),
            vec!["wash"]
        );
        assert_eq!(allocation.total_spent, 70);
    }

    #[test]
    fn price_ties_resolve_to_catalog_order() {
        let catalog = Catalog::new(vec![
            product("first", Category::Serum, 40),
            product("second", Category::Serum, 40),
        ])
        .expect("catalog");

        let allocation = allocate_budget(&catalog, &oily(), 40);
        assert_eq!(allocation.get(Category::Serum).map(|p| p.id.0.as_str()), Some("first"));
    }

    #[test]
    fn spend_never_exceeds_budget_and_picks_are_locally_cheapest() {
        let catalog = Catalog::seeded();
        let profiles = [
            SkinProfile::new(SkinType::Oily),
            SkinProfile::new(SkinType::Dry),
            SkinProfile::from_tokens("combination", ["pigmentation", "acne"]),
            SkinProfile::from_tokens("unknown", Vec::<String>::new()),
        ];

        for profile in &profiles {
            for budget in (0..=12_000).step_by(137) {
                let allocation = allocate_budget(&catalog, profile, budget);
                assert!(allocation.total_spent <= budget);

                let mut remaining = budget;
                for entry in &allocation.entries {
                    let affordable_min = match_products(&catalog, entry.category, profile)
                        .into_iter()
                        .map(|candidate| candidate.price)
                        .filter(|price| *price <= remaining)
                        .min();
                    assert_eq!(entry.product.as_ref().map(|p| p.price), affordable_min);
                    if let Some(chosen) = &entry.product {
                        remaining -= chosen.price;
                    }
                }
            }
        }
    }
}
