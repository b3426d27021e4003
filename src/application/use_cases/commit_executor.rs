// ============================================================
// COMMIT EXECUTOR
// ============================================================
// Applies a confirmed preview to the record store. Identity is re-resolved
// at commit time; failures are recorded per contact and the batch carries on.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::domain::contact::{
    CommitReport, CommitStage, ImportConfig, ImportContact, ImportResult, NewCampaignLink,
    NewContact, PersonalizationFields, RemovalResult, RemovalTargets,
};
use crate::domain::error::{AppError, Result};
use crate::infrastructure::store::RecordStore;

pub struct CommitExecutor {
    store: Arc<dyn RecordStore>,
    config: ImportConfig,
}

impl CommitExecutor {
    pub fn new(store: Arc<dyn RecordStore>, config: ImportConfig) -> Self {
        Self { store, config }
    }

    fn batch_size(&self) -> usize {
        self.config.batch_size.max(1)
    }

    /// Create missing contacts, then link new and known contacts to the campaign
    pub async fn commit_import(&self, campaign_id: &str, preview: &ImportResult) -> Result<CommitReport> {
        require_campaign(campaign_id)?;

        let mut report = CommitReport::default();
        self.verify_in_campaign(campaign_id, &preview.in_campaign, &mut report).await;
        let linkable: Vec<&ImportContact> = preview.linkable().collect();

        for chunk in linkable.chunks(self.batch_size()) {
            self.import_chunk(campaign_id, chunk, &mut report).await;
        }

        info!(
            campaign_id,
            created = report.created_contacts,
            linked = report.linked,
            already_linked = report.already_linked,
            failures = report.failures.len(),
            "Committed contact import"
        );

        Ok(report)
    }

    /// Count preview members that are still linked; unlinked ones are left alone
    async fn verify_in_campaign(
        &self,
        campaign_id: &str,
        members: &[ImportContact],
        report: &mut CommitReport,
    ) {
        for chunk in members.chunks(self.batch_size()) {
            let phones: Vec<String> = chunk.iter().map(|c| c.phone_number.clone()).collect();
            match self.store.find_campaign_links_by_phones(campaign_id, &phones).await {
                Ok(links) => {
                    if links.len() < phones.len() {
                        debug!(
                            campaign_id,
                            unlinked = phones.len() - links.len(),
                            "Campaign members unlinked since preview"
                        );
                    }
                    report.already_linked += links.len();
                }
                Err(e) => {
                    for phone in &phones {
                        record(report, phone, None, CommitStage::Lookup, &e);
                    }
                }
            }
        }
    }

    async fn import_chunk(
        &self,
        campaign_id: &str,
        chunk: &[&ImportContact],
        report: &mut CommitReport,
    ) {
        let phones: Vec<String> = chunk.iter().map(|c| c.phone_number.clone()).collect();

        let mut ids: HashMap<String, Uuid> = match self.store.find_contacts_by_phones(&phones).await {
            Ok(found) => found.into_iter().map(|c| (c.phone_number, c.id)).collect(),
            Err(e) => {
                fail_all(report, chunk, CommitStage::Lookup, &e);
                return;
            }
        };

        let missing: Vec<NewContact> = chunk
            .iter()
            .filter(|c| !ids.contains_key(&c.phone_number))
            .map(|c| NewContact::from(*c))
            .collect();

        if !missing.is_empty() {
            match self.store.insert_contacts(&missing).await {
                Ok(created) => {
                    report.created_contacts += created.len();
                    ids.extend(created.into_iter().map(|c| (c.phone_number, c.id)));
                    self.resolve_raced(&missing, &mut ids, report).await;
                }
                Err(e) => {
                    for contact in &missing {
                        record(report, &contact.phone_number, None, CommitStage::CreateContact, &e);
                    }
                }
            }
        }

        let resolved: Vec<(&ImportContact, Uuid)> = chunk
            .iter()
            .filter_map(|c| ids.get(&c.phone_number).map(|id| (*c, *id)))
            .collect();
        if resolved.is_empty() {
            return;
        }

        let contact_ids: Vec<Uuid> = resolved.iter().map(|(_, id)| *id).collect();
        let linked: HashSet<Uuid> = match self.store.find_campaign_links(campaign_id, &contact_ids).await {
            Ok(links) => links.into_iter().map(|l| l.contact_id).collect(),
            Err(e) => {
                for (contact, id) in &resolved {
                    record(report, &contact.phone_number, Some(*id), CommitStage::Lookup, &e);
                }
                return;
            }
        };
        report.already_linked += linked.len();

        let pending: Vec<(&ImportContact, Uuid)> = resolved
            .into_iter()
            .filter(|(_, id)| !linked.contains(id))
            .collect();
        if pending.is_empty() {
            return;
        }

        let links: Vec<NewCampaignLink> = pending
            .iter()
            .map(|(contact, id)| NewCampaignLink {
                campaign_id: campaign_id.to_string(),
                contact_id: *id,
                status: self.config.default_link_status,
                personalization_fields: self.link_fields(contact),
            })
            .collect();

        match self.store.insert_campaign_links(&links).await {
            Ok(inserted) => {
                let inserted = inserted as usize;
                report.linked += inserted;
                // Links that appeared between the check and the insert
                report.already_linked += pending.len().saturating_sub(inserted);
            }
            Err(e) => {
                for (contact, id) in &pending {
                    record(report, &contact.phone_number, Some(*id), CommitStage::Link, &e);
                }
            }
        }
    }

    /// Rows skipped by the insert were created by someone else meanwhile
    async fn resolve_raced(
        &self,
        missing: &[NewContact],
        ids: &mut HashMap<String, Uuid>,
        report: &mut CommitReport,
    ) {
        let raced: Vec<String> = missing
            .iter()
            .map(|c| c.phone_number.clone())
            .filter(|p| !ids.contains_key(p))
            .collect();
        if raced.is_empty() {
            return;
        }

        debug!(count = raced.len(), "Re-resolving contacts created concurrently");
        match self.store.find_contacts_by_phones(&raced).await {
            Ok(found) => ids.extend(found.into_iter().map(|c| (c.phone_number, c.id))),
            Err(e) => {
                for phone in &raced {
                    record(report, phone, None, CommitStage::Lookup, &e);
                }
                return;
            }
        }
        for phone in raced.iter().filter(|p| !ids.contains_key(*p)) {
            report.fail(phone, None, CommitStage::CreateContact, "Contact could not be created");
        }
    }

    /// Personalization values plus the reserved display-name key, which always wins
    fn link_fields(&self, contact: &ImportContact) -> PersonalizationFields {
        let mut fields = contact.personalization_fields.clone().unwrap_or_default();
        fields.insert(self.config.display_name_key.clone(), contact.display_name());
        fields
    }

    /// Unlink the removal set, then delete contacts left without any link
    pub async fn commit_removal(&self, campaign_id: &str, preview: &RemovalResult) -> Result<CommitReport> {
        require_campaign(campaign_id)?;

        let mut report = CommitReport::default();

        let targets: Vec<(String, Uuid)> = match preview.targets() {
            RemovalTargets::Listed(rows) => self.resolve_listed(campaign_id, rows, &mut report).await,
            RemovalTargets::Unlisted(links) => links
                .iter()
                .map(|l| (l.phone_number.clone(), l.contact_id))
                .collect(),
        };

        for chunk in targets.chunks(self.batch_size()) {
            self.remove_chunk(campaign_id, chunk, &mut report).await;
        }

        info!(
            campaign_id,
            remove_others = preview.remove_others,
            unlinked = report.unlinked,
            deleted_contacts = report.deleted_contacts,
            failures = report.failures.len(),
            "Committed contact removal"
        );

        Ok(report)
    }

    /// Current links for file rows; rows no longer linked are skipped
    async fn resolve_listed(
        &self,
        campaign_id: &str,
        rows: &[ImportContact],
        report: &mut CommitReport,
    ) -> Vec<(String, Uuid)> {
        let mut targets = Vec::new();
        for chunk in rows.chunks(self.batch_size()) {
            let phones: Vec<String> = chunk.iter().map(|c| c.phone_number.clone()).collect();
            match self.store.find_campaign_links_by_phones(campaign_id, &phones).await {
                Ok(links) => {
                    if links.len() < phones.len() {
                        debug!(
                            campaign_id,
                            skipped = phones.len() - links.len(),
                            "Listed contacts no longer linked"
                        );
                    }
                    targets.extend(links.into_iter().map(|l| (l.phone_number, l.contact_id)));
                }
                Err(e) => {
                    for phone in &phones {
                        record(report, phone, None, CommitStage::Lookup, &e);
                    }
                }
            }
        }
        targets
    }

    async fn remove_chunk(&self, campaign_id: &str, chunk: &[(String, Uuid)], report: &mut CommitReport) {
        let ids: Vec<Uuid> = chunk.iter().map(|(_, id)| *id).collect();

        match self.store.delete_campaign_links(campaign_id, &ids).await {
            Ok(deleted) => report.unlinked += deleted as usize,
            Err(e) => {
                for (phone, id) in chunk {
                    record(report, phone, Some(*id), CommitStage::Unlink, &e);
                }
                return;
            }
        }

        for (phone, id) in chunk {
            match self.store.count_contact_links(*id).await {
                Ok(0) => match self.store.delete_orphaned_contact(*id).await {
                    Ok(deleted) => report.deleted_contacts += deleted as usize,
                    Err(e) => record(report, phone, Some(*id), CommitStage::DeleteContact, &e),
                },
                Ok(remaining) => {
                    debug!(contact_id = %id, remaining, "Contact still linked elsewhere");
                }
                Err(e) => record(report, phone, Some(*id), CommitStage::DeleteContact, &e),
            }
        }
    }
}

fn require_campaign(campaign_id: &str) -> Result<()> {
    if campaign_id.trim().is_empty() {
        return Err(AppError::ValidationError("Campaign id is required".to_string()));
    }
    Ok(())
}

fn record(
    report: &mut CommitReport,
    phone_number: &str,
    contact_id: Option<Uuid>,
    stage: CommitStage,
    error: &AppError,
) {
    warn!(phone_number, ?stage, error = %error, "Commit step failed");
    report.fail(phone_number, contact_id, stage, error.to_string());
}

fn fail_all(report: &mut CommitReport, chunk: &[&ImportContact], stage: CommitStage, error: &AppError) {
    for contact in chunk {
        record(report, &contact.phone_number, None, stage, error);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::contact::{CampaignContact, GlobalContact, LinkStatus};
    use crate::infrastructure::store::InMemoryRecordStore;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn contact(first: &str, phone: &str) -> ImportContact {
        ImportContact::new(first, "Doe", phone)
    }

    fn preview(to_import: Vec<ImportContact>, in_system: Vec<ImportContact>) -> ImportResult {
        let total = to_import.len() + in_system.len();
        ImportResult::from_buckets(to_import, in_system, Vec::new(), Vec::new(), total)
    }

    fn executor(store: Arc<dyn RecordStore>) -> CommitExecutor {
        CommitExecutor::new(store, ImportConfig::default())
    }

    async fn seed(store: &InMemoryRecordStore, phone: &str, campaigns: &[&str]) -> Uuid {
        let id = store
            .insert_contacts(&[NewContact::from(&contact("Seed", phone))])
            .await
            .unwrap()[0]
            .id;
        for campaign in campaigns {
            store
                .insert_campaign_links(&[NewCampaignLink {
                    campaign_id: campaign.to_string(),
                    contact_id: id,
                    status: LinkStatus::Pending,
                    personalization_fields: PersonalizationFields::new(),
                }])
                .await
                .unwrap();
        }
        id
    }

    #[tokio::test]
    async fn test_import_creates_then_links() {
        let store = Arc::new(InMemoryRecordStore::new());
        seed(&store, "+15550002", &[]).await;

        let report = executor(store.clone())
            .commit_import(
                "C1",
                &preview(vec![contact("A", "+15550001")], vec![contact("B", "+15550002")]),
            )
            .await
            .unwrap();

        assert_eq!(report.created_contacts, 1);
        assert_eq!(report.linked, 2);
        assert!(!report.has_failures());
        assert_eq!(store.contact_count().await, 2);
        assert_eq!(store.list_campaign_contacts("C1").await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_reimport_is_idempotent() {
        let store = Arc::new(InMemoryRecordStore::new());
        let executor = executor(store.clone());
        let preview = preview(vec![contact("A", "+15550001"), contact("B", "+15550002")], Vec::new());

        executor.commit_import("C1", &preview).await.unwrap();
        let again = executor.commit_import("C1", &preview).await.unwrap();

        assert_eq!(again.created_contacts, 0);
        assert_eq!(again.linked, 0);
        assert_eq!(again.already_linked, 2);
        assert_eq!(store.link_count().await, 2);
        assert_eq!(store.contact_count().await, 2);
    }

    #[tokio::test]
    async fn test_display_name_key_wins_over_personalization() {
        let store = Arc::new(InMemoryRecordStore::new());
        let mut jane = contact("Jane", "+15550001");
        let mut fields = PersonalizationFields::new();
        fields.insert("name".into(), "Override".into());
        fields.insert("company".into(), "Acme".into());
        jane.personalization_fields = Some(fields);

        executor(store.clone())
            .commit_import("C1", &preview(vec![jane], Vec::new()))
            .await
            .unwrap();

        let links = store.list_campaign_contacts("C1").await.unwrap();
        let fields = &links[0].personalization_fields;
        assert_eq!(fields.get("name").map(String::as_str), Some("Jane Doe"));
        assert_eq!(fields.get("company").map(String::as_str), Some("Acme"));
    }

    #[tokio::test]
    async fn test_in_campaign_rows_are_noop() {
        let store = Arc::new(InMemoryRecordStore::new());
        seed(&store, "+15550003", &["C1"]).await;
        let preview = ImportResult::from_buckets(
            Vec::new(),
            Vec::new(),
            vec![contact("C", "+15550003")],
            Vec::new(),
            1,
        );

        let report = executor(store.clone()).commit_import("C1", &preview).await.unwrap();
        assert_eq!(report.already_linked, 1);
        assert_eq!(report.linked, 0);
        assert_eq!(store.link_count().await, 1);
    }

    #[tokio::test]
    async fn test_in_campaign_row_unlinked_before_confirm_not_counted() {
        let store = Arc::new(InMemoryRecordStore::new());
        let id = seed(&store, "+15550003", &["C1"]).await;
        let preview = ImportResult::from_buckets(
            Vec::new(),
            Vec::new(),
            vec![contact("C", "+15550003")],
            Vec::new(),
            1,
        );
        store.delete_campaign_links("C1", &[id]).await.unwrap();

        let report = executor(store.clone()).commit_import("C1", &preview).await.unwrap();
        assert_eq!(report.already_linked, 0);
        assert_eq!(report.linked, 0);
        assert!(!report.has_failures());
        assert_eq!(store.link_count().await, 0);
    }

    #[tokio::test]
    async fn test_removal_deletes_orphan_keeps_shared() {
        let store = Arc::new(InMemoryRecordStore::new());
        let only_here = seed(&store, "+15550001", &["C1"]).await;
        let shared = seed(&store, "+15550002", &["C1", "C2"]).await;

        let preview = RemovalResult::remove_listed(
            vec![contact("X", "+15550001"), contact("Y", "+15550002")],
            Vec::new(),
            Vec::new(),
            2,
        );
        let report = executor(store.clone()).commit_removal("C1", &preview).await.unwrap();

        assert_eq!(report.unlinked, 2);
        assert_eq!(report.deleted_contacts, 1);
        assert!(store.find_contact_by_phone("+15550001").await.unwrap().is_none());
        assert_eq!(store.count_contact_links(only_here).await.unwrap(), 0);
        assert_eq!(store.count_contact_links(shared).await.unwrap(), 1);
        assert!(store.find_contact_by_phone("+15550002").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_keep_mode_removes_unlisted_links() {
        let store = Arc::new(InMemoryRecordStore::new());
        seed(&store, "+15550001", &["C1"]).await;
        seed(&store, "+15550002", &["C1"]).await;
        let members = store.list_campaign_contacts("C1").await.unwrap();
        let (keep, remove): (Vec<CampaignContact>, Vec<CampaignContact>) = members
            .into_iter()
            .partition(|m| m.phone_number == "+15550001");

        let preview = RemovalResult::keep_listed(
            keep.iter().map(|m| m.to_import_contact()).collect(),
            remove,
            Vec::new(),
            Vec::new(),
            1,
        );
        let report = executor(store.clone()).commit_removal("C1", &preview).await.unwrap();

        assert_eq!(report.unlinked, 1);
        assert_eq!(report.deleted_contacts, 1);
        let remaining = store.list_campaign_contacts("C1").await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].phone_number, "+15550001");
    }

    #[tokio::test]
    async fn test_blank_campaign_rejected() {
        let store = Arc::new(InMemoryRecordStore::new());
        let result = executor(store).commit_import(" ", &ImportResult::default()).await;
        assert!(matches!(result, Err(AppError::ValidationError(_))));
    }

    /// Fails the Nth link insert or unlink, delegating everything else
    #[derive(Default)]
    struct FlakyStore {
        inner: InMemoryRecordStore,
        link_calls: AtomicUsize,
        unlink_calls: AtomicUsize,
        fail_link_on: usize,
        fail_unlink_on: usize,
    }

    fn nth_call(counter: &AtomicUsize, fail_on: usize) -> Result<()> {
        if counter.fetch_add(1, Ordering::SeqCst) + 1 == fail_on {
            return Err(AppError::DatabaseError("database is locked".into()));
        }
        Ok(())
    }

    #[async_trait]
    impl RecordStore for FlakyStore {
        async fn find_contact_by_phone(&self, phone: &str) -> Result<Option<GlobalContact>> {
            self.inner.find_contact_by_phone(phone).await
        }
        async fn find_contacts_by_phones(&self, phones: &[String]) -> Result<Vec<GlobalContact>> {
            self.inner.find_contacts_by_phones(phones).await
        }
        async fn find_campaign_links(&self, campaign_id: &str, ids: &[Uuid]) -> Result<Vec<CampaignContact>> {
            self.inner.find_campaign_links(campaign_id, ids).await
        }
        async fn find_campaign_links_by_phones(
            &self,
            campaign_id: &str,
            phones: &[String],
        ) -> Result<Vec<CampaignContact>> {
            self.inner.find_campaign_links_by_phones(campaign_id, phones).await
        }
        async fn list_campaign_contacts(&self, campaign_id: &str) -> Result<Vec<CampaignContact>> {
            self.inner.list_campaign_contacts(campaign_id).await
        }
        async fn insert_contacts(&self, contacts: &[NewContact]) -> Result<Vec<GlobalContact>> {
            self.inner.insert_contacts(contacts).await
        }
        async fn insert_campaign_links(&self, links: &[NewCampaignLink]) -> Result<u64> {
            nth_call(&self.link_calls, self.fail_link_on)?;
            self.inner.insert_campaign_links(links).await
        }
        async fn delete_campaign_links(&self, campaign_id: &str, ids: &[Uuid]) -> Result<u64> {
            nth_call(&self.unlink_calls, self.fail_unlink_on)?;
            self.inner.delete_campaign_links(campaign_id, ids).await
        }
        async fn count_contact_links(&self, id: Uuid) -> Result<i64> {
            self.inner.count_contact_links(id).await
        }
        async fn delete_orphaned_contact(&self, id: Uuid) -> Result<u64> {
            self.inner.delete_orphaned_contact(id).await
        }
    }

    #[tokio::test]
    async fn test_link_failure_recorded_and_batch_continues() {
        let store = Arc::new(FlakyStore {
            fail_link_on: 2,
            ..Default::default()
        });
        let config = ImportConfig {
            batch_size: 1,
            ..Default::default()
        };
        let preview = preview(
            vec![
                contact("A", "+15550001"),
                contact("B", "+15550002"),
                contact("C", "+15550003"),
            ],
            Vec::new(),
        );

        let report = CommitExecutor::new(store.clone(), config)
            .commit_import("C1", &preview)
            .await
            .unwrap();

        assert_eq!(report.created_contacts, 3);
        assert_eq!(report.linked, 2);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].phone_number, "+15550002");
        assert_eq!(report.failures[0].stage, CommitStage::Link);
        assert!(report.failures[0].contact_id.is_some());
        assert_eq!(store.inner.link_count().await, 2);
    }

    #[tokio::test]
    async fn test_unlink_failure_recorded_and_batch_continues() {
        let store = Arc::new(FlakyStore {
            fail_unlink_on: 2,
            ..Default::default()
        });
        seed(&store.inner, "+15550001", &["C1"]).await;
        let kept = seed(&store.inner, "+15550002", &["C1"]).await;
        seed(&store.inner, "+15550003", &["C1"]).await;
        let config = ImportConfig {
            batch_size: 1,
            ..Default::default()
        };
        let preview = RemovalResult::remove_listed(
            vec![
                contact("A", "+15550001"),
                contact("B", "+15550002"),
                contact("C", "+15550003"),
            ],
            Vec::new(),
            Vec::new(),
            3,
        );

        let report = CommitExecutor::new(store.clone(), config)
            .commit_removal("C1", &preview)
            .await
            .unwrap();

        assert_eq!(report.unlinked, 2);
        assert_eq!(report.deleted_contacts, 2);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].phone_number, "+15550002");
        assert_eq!(report.failures[0].stage, CommitStage::Unlink);
        assert_eq!(report.failures[0].contact_id, Some(kept));

        assert!(store.inner.find_contact_by_phone("+15550001").await.unwrap().is_none());
        assert!(store.inner.find_contact_by_phone("+15550003").await.unwrap().is_none());
        assert!(store.inner.find_contact_by_phone("+15550002").await.unwrap().is_some());
        assert_eq!(store.inner.count_contact_links(kept).await.unwrap(), 1);
    }

    /// Creates contacts but reports none, as when a concurrent writer won the insert
    struct RacingStore {
        inner: InMemoryRecordStore,
    }

    #[async_trait]
    impl RecordStore for RacingStore {
        async fn find_contact_by_phone(&self, phone: &str) -> Result<Option<GlobalContact>> {
            self.inner.find_contact_by_phone(phone).await
        }
        async fn find_contacts_by_phones(&self, phones: &[String]) -> Result<Vec<GlobalContact>> {
            self.inner.find_contacts_by_phones(phones).await
        }
        async fn find_campaign_links(&self, campaign_id: &str, ids: &[Uuid]) -> Result<Vec<CampaignContact>> {
            self.inner.find_campaign_links(campaign_id, ids).await
        }
        async fn find_campaign_links_by_phones(
            &self,
            campaign_id: &str,
            phones: &[String],
        ) -> Result<Vec<CampaignContact>> {
            self.inner.find_campaign_links_by_phones(campaign_id, phones).await
        }
        async fn list_campaign_contacts(&self, campaign_id: &str) -> Result<Vec<CampaignContact>> {
            self.inner.list_campaign_contacts(campaign_id).await
        }
        async fn insert_contacts(&self, contacts: &[NewContact]) -> Result<Vec<GlobalContact>> {
            self.inner.insert_contacts(contacts).await?;
            Ok(Vec::new())
        }
        async fn insert_campaign_links(&self, links: &[NewCampaignLink]) -> Result<u64> {
            self.inner.insert_campaign_links(links).await
        }
        async fn delete_campaign_links(&self, campaign_id: &str, ids: &[Uuid]) -> Result<u64> {
            self.inner.delete_campaign_links(campaign_id, ids).await
        }
        async fn count_contact_links(&self, id: Uuid) -> Result<i64> {
            self.inner.count_contact_links(id).await
        }
        async fn delete_orphaned_contact(&self, id: Uuid) -> Result<u64> {
            self.inner.delete_orphaned_contact(id).await
        }
    }

    #[tokio::test]
    async fn test_contact_created_concurrently_is_still_linked() {
        let store = Arc::new(RacingStore {
            inner: InMemoryRecordStore::new(),
        });

        let report = executor(store.clone())
            .commit_import("C1", &preview(vec![contact("A", "+15550001")], Vec::new()))
            .await
            .unwrap();

        assert_eq!(report.created_contacts, 0);
        assert_eq!(report.linked, 1);
        assert!(!report.has_failures());
        assert_eq!(store.inner.contact_count().await, 1);
        assert_eq!(store.inner.link_count().await, 1);
        let links = store.inner.list_campaign_contacts("C1").await.unwrap();
        assert_eq!(links[0].phone_number, "+15550001");
    }
}
