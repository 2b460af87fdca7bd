use serde::{Deserialize, Serialize};

use crate::domain::product::{Category, Product};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryAllocation {
    pub category: Category,
    pub product: Option<Product>,
}

/// One entry per category in canonical order. `total_spent <= budget` holds
/// for every value built by the allocator.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetAllocation {
    pub budget: u64,
    pub total_spent: u64,
    pub entries: Vec<CategoryAllocation>,
}

impl BudgetAllocation {
    pub fn get(&self, category: Category) -> Option<&Product> {
        self.entries
            .iter()
            .find(|entry| entry.category == category)
            .and_then(|entry| entry.product.as_ref())
    }

    pub fn remaining(&self) -> u64 {
        self.budget.saturating_sub(self.total_spent)
    }

    pub fn assigned(&self) -> impl Iterator<Item = &Product> {
        self.entries.iter().filter_map(|entry| entry.product.as_ref())
    }

    pub fn unfilled(&self) -> impl Iterator<Item = Category> + '_ {
        self.entries.iter().filter(|entry| entry.product.is_none()).map(|entry| entry.category)
    }
}
