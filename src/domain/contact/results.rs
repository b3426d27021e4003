// ============================================================
// RECONCILIATION RESULTS
// ============================================================
// Reviewable previews for the additive and subtractive paths, and
// the report returned once a preview is committed

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::entities::CampaignContact;
use super::import_contact::{ImportContact, ImportError};

/// Additive-path preview; counts are always derived from the buckets
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportResult {
    /// Contacts new to the system (the `toImport` bucket)
    pub contacts: Vec<ImportContact>,
    pub successful: usize,
    pub existing: usize,
    pub failed: usize,
    pub errors: Vec<ImportError>,

    /// Known globally, not yet linked to the campaign
    #[serde(default)]
    pub in_system: Vec<ImportContact>,

    /// Already linked to the campaign; a no-op on commit
    #[serde(default)]
    pub in_campaign: Vec<ImportContact>,

    #[serde(default)]
    pub total_rows: usize,
}

impl ImportResult {
    pub fn from_buckets(
        to_import: Vec<ImportContact>,
        in_system: Vec<ImportContact>,
        in_campaign: Vec<ImportContact>,
        errors: Vec<ImportError>,
        total_rows: usize,
    ) -> Self {
        Self {
            successful: to_import.len(),
            existing: in_system.len() + in_campaign.len(),
            failed: errors.len(),
            contacts: to_import,
            errors,
            in_system,
            in_campaign,
            total_rows,
        }
    }

    /// Every decoded row is accounted for exactly once
    pub fn is_complete(&self) -> bool {
        self.contacts.len() + self.in_system.len() + self.in_campaign.len() + self.errors.len()
            == self.total_rows
    }

    /// Contacts a commit will link (new ones first)
    pub fn linkable(&self) -> impl Iterator<Item = &ImportContact> {
        self.contacts.iter().chain(self.in_system.iter())
    }
}

/// Which array of a removal preview is authoritative for deletion
#[derive(Debug, Clone, Copy)]
pub enum RemovalTargets<'a> {
    /// Mode A: file rows matched to campaign membership
    Listed(&'a [ImportContact]),
    /// Mode B: campaign members absent from the file
    Unlisted(&'a [CampaignContact]),
}

/// Subtractive-path preview
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemovalResult {
    /// Removal set when `remove_others` is false, keep set otherwise
    pub contacts: Vec<ImportContact>,
    pub successful: usize,
    pub existing: usize,
    pub failed: usize,
    pub errors: Vec<ImportError>,

    /// File rows with no matching campaign membership
    #[serde(default)]
    pub not_in_campaign: Vec<ImportContact>,

    /// Removal set when `remove_others` is true
    #[serde(default)]
    pub to_remove_if_enabled: Vec<CampaignContact>,

    pub remove_others: bool,

    #[serde(default)]
    pub total_rows: usize,
}

impl RemovalResult {
    /// Mode A: `contacts` is what gets removed
    pub fn remove_listed(
        to_remove: Vec<ImportContact>,
        not_in_campaign: Vec<ImportContact>,
        errors: Vec<ImportError>,
        total_rows: usize,
    ) -> Self {
        Self {
            successful: to_remove.len(),
            existing: 0,
            failed: errors.len(),
            contacts: to_remove,
            errors,
            not_in_campaign,
            to_remove_if_enabled: Vec::new(),
            remove_others: false,
            total_rows,
        }
    }

    /// Mode B: `to_remove_if_enabled` is what gets removed, `contacts` is kept
    pub fn keep_listed(
        keep: Vec<ImportContact>,
        to_remove: Vec<CampaignContact>,
        not_in_campaign: Vec<ImportContact>,
        errors: Vec<ImportError>,
        total_rows: usize,
    ) -> Self {
        Self {
            successful: to_remove.len(),
            existing: keep.len(),
            failed: errors.len(),
            contacts: keep,
            errors,
            not_in_campaign,
            to_remove_if_enabled: to_remove,
            remove_others: true,
            total_rows,
        }
    }

    pub fn targets(&self) -> RemovalTargets<'_> {
        if self.remove_others {
            RemovalTargets::Unlisted(&self.to_remove_if_enabled)
        } else {
            RemovalTargets::Listed(&self.contacts)
        }
    }

    pub fn removal_count(&self) -> usize {
        match self.targets() {
            RemovalTargets::Listed(rows) => rows.len(),
            RemovalTargets::Unlisted(links) => links.len(),
        }
    }
}

/// Commit step that failed for a contact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommitStage {
    Lookup,
    CreateContact,
    Link,
    Unlink,
    DeleteContact,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitFailure {
    pub phone_number: String,
    pub contact_id: Option<Uuid>,
    pub stage: CommitStage,
    pub message: String,
}

/// Outcome of a confirmed commit; partial progress is never rolled back
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitReport {
    pub created_contacts: usize,
    pub linked: usize,
    pub already_linked: usize,
    pub unlinked: usize,
    pub deleted_contacts: usize,
    pub failures: Vec<CommitFailure>,
}

impl CommitReport {
    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }

    pub(crate) fn fail(
        &mut self,
        phone_number: &str,
        contact_id: Option<Uuid>,
        stage: CommitStage,
        message: impl Into<String>,
    ) {
        self.failures.push(CommitFailure {
            phone_number: phone_number.to_string(),
            contact_id,
            stage,
            message: message.into(),
        });
    }
}
