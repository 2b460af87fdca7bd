use std::collections::HashSet;

use crate::catalog::Catalog;
use crate::domain::product::{Category, Product, ProductId, SkinType};
use crate::domain::routine::{RoutinePlan, MAX_SUGGESTIONS};
use crate::domain::scores::AnalysisScores;

pub const BASELINE_AM: [&str; 5] =
    ["Cleanser", "Hydrating/Toner", "Serum (targeted)", "Moisturizer", "Sunscreen"];
pub const BASELINE_PM: [&str; 4] =
    ["Cleanser", "Toner (gentle)", "Treatment Serum", "Moisturizer/Night"];

pub const BHA_SERUM_STEP: &str = "BHA/Salicylic Serum";
pub const BRIGHTENING_SERUM_STEP: &str = "Vitamin C/Brightening Serum";
pub const ACID_EXFOLIATION_STEP: &str = "AHA/BHA (2x week)";
pub const HYDRATING_SERUM_STEP: &str = "Hydrating Serum (HA)";
pub const OVERNIGHT_HYDRATION_STEP: &str = "Overnight Hydrating Mask/Rich Moisturizer";

pub const ACNE_THRESHOLD: f64 = 30.0;
pub const PIGMENTATION_THRESHOLD: f64 = 30.0;
pub const LOW_HYDRATION_THRESHOLD: f64 = 40.0;

/// Builds the AM/PM routine and supplemental suggestions from analysis
/// scores. Missing scores resolve to 50 but never fire a rule; only reported
/// values are compared against the thresholds. Rules run in a fixed order (acne,
/// pigmentation, hydration) and stack. `skin_type` does not change the
/// outcome today; it is accepted so callers pass the full consultation
/// context.
pub fn route_from_scores(
    scores: &AnalysisScores,
    _skin_type: SkinType,
    catalog: &Catalog,
) -> RoutinePlan {
    let scores = scores.resolved();

    let mut am_steps: Vec<String> = BASELINE_AM.iter().map(|step| (*step).to_owned()).collect();
    let mut pm_steps: Vec<String> = BASELINE_PM.iter().map(|step| (*step).to_owned()).collect();
    let mut pool = SuggestionPool::default();

    if scores.acne.above(ACNE_THRESHOLD) {
        insert_step(&mut pm_steps, 1, BHA_SERUM_STEP);
        pool.extend(
            catalog.iter().filter(|product| {
                product.mentions_concern("acne") || product.category == Category::Serum
            }),
        );
    }

    if scores.pigmentation.above(PIGMENTATION_THRESHOLD) {
        pool.extend(catalog.iter().filter(|product| {
            product.name_mentions("pigment") || product.mentions_concern("pigment")
        }));
        insert_step(&mut am_steps, 2, BRIGHTENING_SERUM_STEP);
        insert_step(&mut pm_steps, 2, ACID_EXFOLIATION_STEP);
    }

    if scores.hydration.below(LOW_HYDRATION_THRESHOLD) {
        insert_step(&mut am_steps, 1, HYDRATING_SERUM_STEP);
        pm_steps.push(OVERNIGHT_HYDRATION_STEP.to_owned());
        pool.extend(catalog.iter().filter(|product| product.category == Category::Moisturizer));
    }

    RoutinePlan { am_steps, pm_steps, suggestions: pool.finish() }
}

fn insert_step(steps: &mut Vec<String>, index: usize, label: &str) {
    let index = index.min(steps.len());
    steps.insert(index, label.to_owned());
}

/// First-seen order, unique by product id.
#[derive(Default)]
struct SuggestionPool {
    seen: HashSet<ProductId>,
    products: Vec<Product>,
}

impl SuggestionPool {
    fn extend<'a>(&mut self, products: impl Iterator<Item = &'a Product>) {
        for product in products {
            if self.products.len() >= MAX_SUGGESTIONS {
                return;
            }
            if self.seen.insert(product.id.clone()) {
                self.products.push(product.clone());
            }
        }
    }

    fn finish(self) -> Vec<Product> {
        self.products
    }
}
