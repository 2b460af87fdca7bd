pub mod allocator;
pub mod matcher;
pub mod router;

use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::domain::allocation::BudgetAllocation;
use crate::domain::profile::SkinProfile;
use crate::domain::routine::RoutinePlan;
use crate::domain::scores::AnalysisScores;

pub use allocator::allocate_budget;
pub use matcher::match_products;
pub use router::route_from_scores;

#[derive(Clone, Debug)]
pub struct ConsultationInput<'a> {
    pub profile: &'a SkinProfile,
    pub budget: u64,
    pub scores: &'a AnalysisScores,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsultationPlan {
    pub allocation: BudgetAllocation,
    pub routine: RoutinePlan,
}

pub trait Recommender: Send + Sync {
    fn plan(&self, catalog: &Catalog, input: ConsultationInput<'_>) -> ConsultationPlan;
}

/// Runs the allocator and the score router side by side over one catalog
/// snapshot.
#[derive(Clone, Copy, Debug, Default)]
pub struct DeterministicRecommender;

impl Recommender for DeterministicRecommender {
    fn plan(&self, catalog: &Catalog, input: ConsultationInput<'_>) -> ConsultationPlan {
        ConsultationPlan {
            allocation: allocate_budget(catalog, input.profile, input.budget),
            routine: route_from_scores(input.scores, input.profile.skin_type, catalog),
        }
    }
}
