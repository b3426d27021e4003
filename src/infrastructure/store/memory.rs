//! In-memory record store.
//!
//! Mirrors the uniqueness rules of the SQLite store so reconciliation and
//! commit logic can be exercised against fixed snapshots without a database.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::RecordStore;
use crate::domain::contact::{
    CampaignContact, GlobalContact, LinkStatus, NewCampaignLink, NewContact,
    PersonalizationFields,
};
use crate::domain::error::{AppError, Result};

#[derive(Debug, Clone)]
struct LinkRow {
    id: Uuid,
    campaign_id: String,
    contact_id: Uuid,
    status: LinkStatus,
    personalization_fields: PersonalizationFields,
    created_at: chrono::DateTime<Utc>,
}

#[derive(Debug, Default)]
struct MemoryState {
    contacts: HashMap<Uuid, GlobalContact>,
    by_phone: HashMap<String, Uuid>,
    links: Vec<LinkRow>,
}

impl MemoryState {
    fn join(&self, link: &LinkRow) -> Option<CampaignContact> {
        let contact = self.contacts.get(&link.contact_id)?;
        Some(CampaignContact {
            id: link.id,
            campaign_id: link.campaign_id.clone(),
            contact_id: link.contact_id,
            first_name: contact.first_name.clone(),
            last_name: contact.last_name.clone(),
            phone_number: contact.phone_number.clone(),
            status: link.status,
            personalization_fields: link.personalization_fields.clone(),
            created_at: link.created_at,
        })
    }

    fn campaign_links<'a>(
        &'a self,
        campaign_id: &'a str,
    ) -> impl Iterator<Item = CampaignContact> + 'a {
        self.links
            .iter()
            .filter(move |l| l.campaign_id == campaign_id)
            .filter_map(move |l| self.join(l))
    }
}

#[derive(Debug, Default)]
pub struct InMemoryRecordStore {
    state: RwLock<MemoryState>,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total links across all campaigns
    pub async fn link_count(&self) -> usize {
        self.state.read().await.links.len()
    }

    pub async fn contact_count(&self) -> usize {
        self.state.read().await.contacts.len()
    }
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn find_contact_by_phone(&self, phone_number: &str) -> Result<Option<GlobalContact>> {
        let state = self.state.read().await;
        let contact = state
            .by_phone
            .get(phone_number)
            .and_then(|id| state.contacts.get(id))
            .cloned();
        Ok(contact)
    }

    async fn find_contacts_by_phones(&self, phone_numbers: &[String]) -> Result<Vec<GlobalContact>> {
        let state = self.state.read().await;
        let wanted: HashSet<&str> = phone_numbers.iter().map(|p| p.as_str()).collect();
        let contacts = wanted
            .into_iter()
            .filter_map(|p| state.by_phone.get(p))
            .filter_map(|id| state.contacts.get(id))
            .cloned()
            .collect();
        Ok(contacts)
    }

    async fn find_campaign_links(
        &self,
        campaign_id: &str,
        contact_ids: &[Uuid],
    ) -> Result<Vec<CampaignContact>> {
        let state = self.state.read().await;
        let wanted: HashSet<&Uuid> = contact_ids.iter().collect();
        let links = state
            .campaign_links(campaign_id)
            .filter(|c| wanted.contains(&c.contact_id))
            .collect();
        Ok(links)
    }

    async fn find_campaign_links_by_phones(
        &self,
        campaign_id: &str,
        phone_numbers: &[String],
    ) -> Result<Vec<CampaignContact>> {
        let state = self.state.read().await;
        let wanted: HashSet<&str> = phone_numbers.iter().map(|p| p.as_str()).collect();
        let links = state
            .campaign_links(campaign_id)
            .filter(|c| wanted.contains(c.phone_number.as_str()))
            .collect();
        Ok(links)
    }

    async fn list_campaign_contacts(&self, campaign_id: &str) -> Result<Vec<CampaignContact>> {
        let state = self.state.read().await;
        let links = state.campaign_links(campaign_id).collect();
        Ok(links)
    }

    async fn insert_contacts(&self, contacts: &[NewContact]) -> Result<Vec<GlobalContact>> {
        let mut state = self.state.write().await;
        let mut created = Vec::new();

        for input in contacts {
            if state.by_phone.contains_key(&input.phone_number) {
                continue;
            }
            let contact = GlobalContact {
                id: Uuid::new_v4(),
                first_name: input.first_name.clone(),
                last_name: input.last_name.clone(),
                phone_number: input.phone_number.clone(),
                created_at: Utc::now(),
            };
            state.by_phone.insert(contact.phone_number.clone(), contact.id);
            state.contacts.insert(contact.id, contact.clone());
            created.push(contact);
        }

        Ok(created)
    }

    async fn insert_campaign_links(&self, links: &[NewCampaignLink]) -> Result<u64> {
        let mut state = self.state.write().await;
        let mut inserted = 0;

        for input in links {
            // Same outcome as a foreign-key violation would have in SQL
            if !state.contacts.contains_key(&input.contact_id) {
                return Err(AppError::DatabaseError(format!(
                    "Contact not found: {}",
                    input.contact_id
                )));
            }
            let exists = state
                .links
                .iter()
                .any(|l| l.campaign_id == input.campaign_id && l.contact_id == input.contact_id);
            if exists {
                continue;
            }
            state.links.push(LinkRow {
                id: Uuid::new_v4(),
                campaign_id: input.campaign_id.clone(),
                contact_id: input.contact_id,
                status: input.status,
                personalization_fields: input.personalization_fields.clone(),
                created_at: Utc::now(),
            });
            inserted += 1;
        }

        Ok(inserted)
    }

    async fn delete_campaign_links(&self, campaign_id: &str, contact_ids: &[Uuid]) -> Result<u64> {
        let mut state = self.state.write().await;
        let before = state.links.len();
        state
            .links
            .retain(|l| !(l.campaign_id == campaign_id && contact_ids.contains(&l.contact_id)));
        Ok((before - state.links.len()) as u64)
    }

    async fn count_contact_links(&self, contact_id: Uuid) -> Result<i64> {
        let state = self.state.read().await;
        let count = state.links.iter().filter(|l| l.contact_id == contact_id).count();
        Ok(count as i64)
    }

    async fn delete_orphaned_contact(&self, contact_id: Uuid) -> Result<u64> {
        let mut state = self.state.write().await;
        if state.links.iter().any(|l| l.contact_id == contact_id) {
            return Ok(0);
        }
        match state.contacts.remove(&contact_id) {
            Some(contact) => {
                state.by_phone.remove(&contact.phone_number);
                Ok(1)
            }
            None => Ok(0),
        }
    }
}
