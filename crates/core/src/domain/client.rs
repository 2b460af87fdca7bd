use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::product::{parse_concern_tags, SkinType};
use crate::domain::profile::SkinProfile;
use crate::errors::DomainError;

pub const MIN_CLIENT_AGE: u8 = 1;
pub const MAX_CLIENT_AGE: u8 = 120;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClientId(pub Uuid);

/// Consultation intake form as captured from the operator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewClient {
    pub name: String,
    pub age: u8,
    pub skin_type: SkinType,
    pub concerns: String,
    pub notes: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientRecord {
    pub id: ClientId,
    pub name: String,
    pub age: u8,
    pub skin_type: SkinType,
    pub concerns: String,
    pub notes: String,
    pub created_at: DateTime<Utc>,
}

impl NewClient {
    pub fn validate(self, created_at: DateTime<Utc>) -> Result<ClientRecord, DomainError> {
        let name = self.name.trim().to_owned();
        if name.is_empty() {
            return Err(DomainError::InvalidClient("client name is required".to_owned()));
        }
        if !(MIN_CLIENT_AGE..=MAX_CLIENT_AGE).contains(&self.age) {
            return Err(DomainError::InvalidClient(format!(
                "client age must be in range {MIN_CLIENT_AGE}..={MAX_CLIENT_AGE}, got {}",
                self.age
            )));
        }

        Ok(ClientRecord {
            id: ClientId(Uuid::new_v4()),
            name,
            age: self.age,
            skin_type: self.skin_type,
            concerns: self.concerns.trim().to_owned(),
            notes: self.notes.trim().to_owned(),
            created_at,
        })
    }
}

impl ClientRecord {
    pub fn profile(&self) -> SkinProfile {
        SkinProfile { skin_type: self.skin_type, concern_tags: parse_concern_tags(&self.concerns) }
    }
}
