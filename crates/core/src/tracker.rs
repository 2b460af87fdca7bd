use std::collections::BTreeSet;

use serde::Serialize;

use crate::errors::DomainError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RoutineTemplate {
    Oily,
    Dry,
    Combination,
}

impl RoutineTemplate {
    pub fn steps(&self) -> &'static [&'static str] {
        match self {
            Self::Oily => &["Cleanser", "Toner", "BHA/Serum", "Moisturizer", "Sunscreen"],
            Self::Dry => &["Gentle Cleanser", "Hydrating Serum", "Moisturizer", "Sunscreen"],
            Self::Combination => &["Cleanser", "Toner", "Serum", "Moisturizer", "Sunscreen"],
        }
    }
}

impl std::str::FromStr for RoutineTemplate {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "oily" => Ok(Self::Oily),
            "dry" => Ok(Self::Dry),
            "combination" | "combo" => Ok(Self::Combination),
            other => {
                Err(format!("unknown routine template `{other}` (expected oily|dry|combination)"))
            }
        }
    }
}

/// Daily checklist over an ordered list of routine steps.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RoutineChecklist {
    steps: Vec<String>,
    done: BTreeSet<usize>,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct RoutineProgress {
    pub completed: usize,
    pub total: usize,
    pub ratio: f64,
}

impl RoutineChecklist {
    pub fn from_template(template: RoutineTemplate) -> Self {
        Self::new(template.steps().iter().map(|step| (*step).to_owned()))
    }

    /// Comma-separated custom routine; blank entries are dropped.
    pub fn from_custom(raw: &str) -> Self {
        Self::new(raw.split(',').map(str::trim).filter(|step| !step.is_empty()).map(str::to_owned))
    }

    /// Steps are keyed by label; a repeated label (ignoring case) keeps only
    /// its first occurrence.
    pub fn new(steps: impl IntoIterator<Item = String>) -> Self {
        let mut unique: Vec<String> = Vec::new();
        for step in steps {
            if !unique.iter().any(|seen| seen.eq_ignore_ascii_case(&step)) {
                unique.push(step);
            }
        }
        Self { steps: unique, done: BTreeSet::new() }
    }

    pub fn steps(&self) -> &[String] {
        &self.steps
    }

    pub fn is_done(&self, step: &str) -> bool {
        self.position(step).is_some_and(|index| self.done.contains(&index))
    }

    pub fn set_done(&mut self, step: &str, done: bool) -> Result<(), DomainError> {
        let index = self.position(step).ok_or_else(|| {
            DomainError::InvariantViolation(format!("routine has no step named `{}`", step.trim()))
        })?;
        if done {
            self.done.insert(index);
        } else {
            self.done.remove(&index);
        }
        Ok(())
    }

    pub fn progress(&self) -> RoutineProgress {
        let total = self.steps.len();
        let completed = self.done.len();
        let ratio = if total == 0 { 0.0 } else { completed as f64 / total as f64 };
        RoutineProgress { completed, total, ratio }
    }

    fn position(&self, step: &str) -> Option<usize> {
        let wanted = step.trim();
        self.steps.iter().position(|candidate| candidate.eq_ignore_ascii_case(wanted))
    }
}
