use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A user-named skin mark tracked across analyses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LesionProfile {
    pub id: Uuid,
    pub name: String,
    pub body_location: String,
    pub created_at: jiff::Timestamp,
}

impl LesionProfile {
    pub fn new(name: impl Into<String>, body_location: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            body_location: body_location.into(),
            created_at: jiff::Timestamp::now(),
        }
    }
}
