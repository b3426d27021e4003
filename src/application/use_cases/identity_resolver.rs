// ============================================================
// IDENTITY RESOLVER
// ============================================================
// Which uploaded phones already exist globally, and which are already
// linked to the target campaign

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, error};

use crate::domain::error::{AppError, Result};
use crate::infrastructure::store::RecordStore;

/// Point-in-time identity state for one campaign and one phone set
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdentitySnapshot {
    pub in_system: HashSet<String>,
    pub in_campaign: HashSet<String>,
}

impl IdentitySnapshot {
    /// Build a snapshot, folding campaign phones into the system set
    pub fn new(in_system: HashSet<String>, in_campaign: HashSet<String>) -> Self {
        let mut in_system = in_system;
        in_system.extend(in_campaign.iter().cloned());
        Self {
            in_system,
            in_campaign,
        }
    }

    pub fn is_in_system(&self, phone_number: &str) -> bool {
        self.in_system.contains(phone_number)
    }

    pub fn is_in_campaign(&self, phone_number: &str) -> bool {
        self.in_campaign.contains(phone_number)
    }
}

#[async_trait]
pub trait IdentityResolver: Send + Sync {
    async fn resolve(&self, campaign_id: &str, phone_numbers: &[String]) -> Result<IdentitySnapshot>;
}

/// Resolver backed by a record store
pub struct StoreIdentityResolver {
    store: Arc<dyn RecordStore>,
}

impl StoreIdentityResolver {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl IdentityResolver for StoreIdentityResolver {
    async fn resolve(&self, campaign_id: &str, phone_numbers: &[String]) -> Result<IdentitySnapshot> {
        if phone_numbers.is_empty() {
            return Ok(IdentitySnapshot::default());
        }

        let (contacts, links) = tokio::try_join!(
            self.store.find_contacts_by_phones(phone_numbers),
            self.store
                .find_campaign_links_by_phones(campaign_id, phone_numbers),
        )
        .map_err(|e| {
            error!(error = %e, campaign_id, "Identity lookup failed");
            AppError::IdentityLookup(e.to_string())
        })?;

        let snapshot = IdentitySnapshot::new(
            contacts.into_iter().map(|c| c.phone_number).collect(),
            links.into_iter().map(|l| l.phone_number).collect(),
        );

        debug!(
            campaign_id,
            phones = phone_numbers.len(),
            in_system = snapshot.in_system.len(),
            in_campaign = snapshot.in_campaign.len(),
            "Resolved identities"
        );

        Ok(snapshot)
    }
}
