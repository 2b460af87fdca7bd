use serde::{Deserialize, Serialize};

use crate::domain::product::Product;

/// Upper bound on supplemental product suggestions per plan.
pub const MAX_SUGGESTIONS: usize = 6;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutinePlan {
    pub am_steps: Vec<String>,
    pub pm_steps: Vec<String>,
    pub suggestions: Vec<Product>,
}
