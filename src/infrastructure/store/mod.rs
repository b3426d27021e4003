pub mod memory;

use crate::domain::contact::{CampaignContact, GlobalContact, NewCampaignLink, NewContact};
use crate::domain::error::Result;
use async_trait::async_trait;
use uuid::Uuid;

pub use memory::InMemoryRecordStore;

/// Persistence boundary for global contacts and campaign links.
///
/// Implementations must keep phone numbers unique across contacts and
/// `(campaign_id, contact_id)` unique across links.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn find_contact_by_phone(&self, phone_number: &str) -> Result<Option<GlobalContact>>;

    async fn find_contacts_by_phones(&self, phone_numbers: &[String]) -> Result<Vec<GlobalContact>>;

    /// Links of one campaign whose contact id is in `contact_ids`
    async fn find_campaign_links(
        &self,
        campaign_id: &str,
        contact_ids: &[Uuid],
    ) -> Result<Vec<CampaignContact>>;

    /// Links of one campaign whose contact phone is in `phone_numbers`
    async fn find_campaign_links_by_phones(
        &self,
        campaign_id: &str,
        phone_numbers: &[String],
    ) -> Result<Vec<CampaignContact>>;

    async fn list_campaign_contacts(&self, campaign_id: &str) -> Result<Vec<CampaignContact>>;

    /// Insert contacts, skipping phones that already exist; returns the rows created
    async fn insert_contacts(&self, contacts: &[NewContact]) -> Result<Vec<GlobalContact>>;

    /// Insert links, ignoring ones already present; returns how many were created
    async fn insert_campaign_links(&self, links: &[NewCampaignLink]) -> Result<u64>;

    async fn delete_campaign_links(&self, campaign_id: &str, contact_ids: &[Uuid]) -> Result<u64>;

    /// Links remaining for a contact across every campaign
    async fn count_contact_links(&self, contact_id: Uuid) -> Result<i64>;

    /// Delete a contact only while it has no links; returns rows deleted
    async fn delete_orphaned_contact(&self, contact_id: Uuid) -> Result<u64>;
}
