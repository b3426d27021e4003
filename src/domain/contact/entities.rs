use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::import_contact::{ImportContact, PersonalizationFields};

/// A person unique by phone number, independent of any campaign
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct GlobalContact {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: String,
    pub created_at: DateTime<Utc>,
}

/// Campaign-scoped call state of a linked contact
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum LinkStatus {
    #[default]
    Pending,
    Called,
    Completed,
    Failed,
}

impl LinkStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LinkStatus::Pending => "pending",
            LinkStatus::Called => "called",
            LinkStatus::Completed => "completed",
            LinkStatus::Failed => "failed",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "pending" => Some(LinkStatus::Pending),
            "called" => Some(LinkStatus::Called),
            "completed" => Some(LinkStatus::Completed),
            "failed" => Some(LinkStatus::Failed),
            _ => None,
        }
    }
}

impl std::fmt::Display for LinkStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A campaign-contact link joined with the contact it points at
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct CampaignContact {
    pub id: Uuid,
    pub campaign_id: String,
    pub contact_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: String,
    pub status: LinkStatus,
    #[serde(default)]
    pub personalization_fields: PersonalizationFields,
    pub created_at: DateTime<Utc>,
}

impl CampaignContact {
    /// Render as an import row, for review lists that mix both shapes
    pub fn to_import_contact(&self) -> ImportContact {
        ImportContact {
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            phone_number: self.phone_number.clone(),
            personalization_fields: (!self.personalization_fields.is_empty())
                .then(|| self.personalization_fields.clone()),
            row_number: None,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct NewContact {
    pub first_name: String,
    pub last_name: String,
    pub phone_number: String,
}

impl From<&ImportContact> for NewContact {
    fn from(c: &ImportContact) -> Self {
        Self {
            first_name: c.first_name.clone(),
            last_name: c.last_name.clone(),
            phone_number: c.phone_number.clone(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct NewCampaignLink {
    pub campaign_id: String,
    pub contact_id: Uuid,
    pub status: LinkStatus,
    pub personalization_fields: PersonalizationFields,
}
