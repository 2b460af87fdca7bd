pub mod analysis;
pub mod catalog;
pub mod config;
pub mod domain;
pub mod errors;
pub mod export;
pub mod recommend;
pub mod tracker;

pub use chrono;

pub use analysis::{AnalysisProvider, MockAnalysisProvider, RawAnalysis};
pub use catalog::{BrowseFilter, Catalog, CatalogError, CatalogSource};
pub use domain::allocation::{BudgetAllocation, CategoryAllocation};
pub use domain::client::{ClientId, ClientRecord, NewClient};
pub use domain::product::{Category, Product, ProductId, SkinType};
pub use domain::profile::SkinProfile;
pub use domain::routine::RoutinePlan;
pub use domain::scores::AnalysisScores;
pub use errors::{ApplicationError, DomainError, InterfaceError};
pub use recommend::{
    allocate_budget, match_products, route_from_scores, ConsultationInput, ConsultationPlan,
    DeterministicRecommender, Recommender,
};
pub use tracker::{RoutineChecklist, RoutineProgress, RoutineTemplate};
