use std::sync::Arc;

use tracing::{info, instrument};

use super::commit_executor::CommitExecutor;
use super::identity_resolver::{IdentityResolver, StoreIdentityResolver};
use super::import_reconciler::reconcile_import;
use super::removal_reconciler::reconcile_removal;
use super::row_validator::RowValidator;
use super::tabular_decoder::TabularDecoder;
use crate::domain::contact::{
    CampaignContact, CommitReport, FieldMapping, ImportConfig, ImportResult, RemovalResult,
    TabularData, ValidatedRows,
};
use crate::domain::error::{AppError, Result};
use crate::infrastructure::store::RecordStore;

/// An uploaded file as handed over by the intake layer
#[derive(Debug, Clone, Copy)]
pub enum Upload<'a> {
    Text(&'a str),
    Bytes {
        data: &'a [u8],
        file_name: Option<&'a str>,
    },
}

/// Preview and confirm flow for adding contacts to, or removing them from,
/// a campaign. Previews never write; only `confirm_*` touches the store.
pub struct ContactImportService {
    store: Arc<dyn RecordStore>,
    resolver: Arc<dyn IdentityResolver>,
    decoder: TabularDecoder,
    validator: RowValidator,
    executor: CommitExecutor,
}

impl ContactImportService {
    pub fn new(store: Arc<dyn RecordStore>, config: ImportConfig) -> Self {
        Self {
            resolver: Arc::new(StoreIdentityResolver::new(store.clone())),
            decoder: TabularDecoder::new(&config),
            validator: RowValidator::new(&config),
            executor: CommitExecutor::new(store.clone(), config),
            store,
        }
    }

    /// Swap the identity resolver, e.g. for a cached or remote one
    pub fn with_resolver(mut self, resolver: Arc<dyn IdentityResolver>) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn decode(&self, upload: Upload<'_>) -> Result<TabularData> {
        match upload {
            Upload::Text(content) => self.decoder.decode_text(content),
            Upload::Bytes { data, file_name } => self.decoder.decode_bytes(data, file_name),
        }
    }

    /// Decode an upload and pre-fill a mapping from its headers
    pub fn suggest_mapping(&self, upload: Upload<'_>) -> Result<(TabularData, FieldMapping)> {
        let data = self.decode(upload)?;
        let mapping = FieldMapping::suggest(&data.headers);
        Ok((data, mapping))
    }

    pub fn validate(&self, data: &TabularData, mapping: &FieldMapping) -> Result<ValidatedRows> {
        self.validator.validate_rows(data, mapping)
    }

    #[instrument(skip(self, upload, mapping))]
    pub async fn preview_import(
        &self,
        campaign_id: &str,
        upload: Upload<'_>,
        mapping: &FieldMapping,
    ) -> Result<ImportResult> {
        require_campaign(campaign_id)?;
        let data = self.decode(upload)?;
        self.preview_import_rows(campaign_id, &data, mapping).await
    }

    /// Preview against rows already decoded, e.g. after the mapping was edited
    pub async fn preview_import_rows(
        &self,
        campaign_id: &str,
        data: &TabularData,
        mapping: &FieldMapping,
    ) -> Result<ImportResult> {
        require_campaign(campaign_id)?;
        let validated = self.validate(data, mapping)?;
        let snapshot = self
            .resolver
            .resolve(campaign_id, &validated.phone_numbers())
            .await?;
        Ok(reconcile_import(validated, &snapshot))
    }

    #[instrument(skip(self, preview), fields(to_import = preview.contacts.len(), in_system = preview.in_system.len()))]
    pub async fn confirm_import(&self, campaign_id: &str, preview: &ImportResult) -> Result<CommitReport> {
        self.executor.commit_import(campaign_id, preview).await
    }

    #[instrument(skip(self, upload, mapping))]
    pub async fn preview_removal(
        &self,
        campaign_id: &str,
        upload: Upload<'_>,
        mapping: &FieldMapping,
        remove_others: bool,
    ) -> Result<RemovalResult> {
        require_campaign(campaign_id)?;
        let data = self.decode(upload)?;
        self.preview_removal_rows(campaign_id, &data, mapping, remove_others)
            .await
    }

    pub async fn preview_removal_rows(
        &self,
        campaign_id: &str,
        data: &TabularData,
        mapping: &FieldMapping,
        remove_others: bool,
    ) -> Result<RemovalResult> {
        require_campaign(campaign_id)?;
        let validated = self.validate(data, mapping)?;
        let membership = self
            .store
            .list_campaign_contacts(campaign_id)
            .await
            .map_err(|e| AppError::IdentityLookup(e.to_string()))?;

        info!(campaign_id, members = membership.len(), "Loaded campaign membership");
        Ok(reconcile_removal(validated, &membership, remove_others))
    }

    #[instrument(skip(self, preview), fields(remove_others = preview.remove_others, to_remove = preview.removal_count()))]
    pub async fn confirm_removal(&self, campaign_id: &str, preview: &RemovalResult) -> Result<CommitReport> {
        self.executor.commit_removal(campaign_id, preview).await
    }

    pub async fn campaign_contacts(&self, campaign_id: &str) -> Result<Vec<CampaignContact>> {
        self.store.list_campaign_contacts(campaign_id).await
    }
}

fn require_campaign(campaign_id: &str) -> Result<()> {
    if campaign_id.trim().is_empty() {
        return Err(AppError::ValidationError("Campaign id is required".to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::contact::{NewCampaignLink, NewContact, PersonalizationEntry};
    use crate::infrastructure::store::InMemoryRecordStore;

    const SAMPLE_CSV: &str = "first,last,phone\nJane,Doe,555-0100\n,Smith,555-0101";

    fn service(store: Arc<InMemoryRecordStore>) -> ContactImportService {
        ContactImportService::new(store, ImportConfig::default())
    }

    fn mapping() -> FieldMapping {
        FieldMapping::with_columns("first", "last", "phone")
    }

    #[tokio::test]
    async fn test_preview_then_confirm_import() {
        let store = Arc::new(InMemoryRecordStore::new());
        let service = service(store.clone());

        let preview = service
            .preview_import("C1", Upload::Text(SAMPLE_CSV), &mapping())
            .await
            .unwrap();

        assert_eq!(preview.contacts.len(), 1);
        assert_eq!(preview.contacts[0].phone_number, "+15550100");
        assert_eq!(preview.errors[0].row_number, 3);
        assert_eq!(preview.errors[0].message, "First name is required");
        assert_eq!(preview.errors[0].data.phone, "5550101");
        assert!(preview.is_complete());

        // Nothing is written until confirmation
        assert_eq!(store.contact_count().await, 0);

        let report = service.confirm_import("C1", &preview).await.unwrap();
        assert_eq!(report.created_contacts, 1);
        assert_eq!(report.linked, 1);

        let members = service.campaign_contacts("C1").await.unwrap();
        assert_eq!(members[0].personalization_fields.get("name").map(String::as_str), Some("Jane Doe"));
    }

    #[tokio::test]
    async fn test_known_contact_lands_in_system_bucket() {
        let store = Arc::new(InMemoryRecordStore::new());
        store
            .insert_contacts(&[NewContact {
                first_name: "Jane".into(),
                last_name: "Doe".into(),
                phone_number: "+15550100".into(),
            }])
            .await
            .unwrap();
        let service = service(store.clone());

        let csv = "first,last,phone\nJane,Doe,+1 555 0100\nJohn,Roe,555-0102";
        let preview = service
            .preview_import("C1", Upload::Text(csv), &mapping())
            .await
            .unwrap();

        assert_eq!(preview.in_system.len(), 1);
        assert_eq!(preview.in_system[0].first_name, "Jane");
        assert_eq!(preview.contacts.len(), 1);
        assert_eq!(preview.contacts[0].first_name, "John");
        assert_eq!(preview.existing, 1);

        let report = service.confirm_import("C1", &preview).await.unwrap();
        assert_eq!(report.created_contacts, 1);
        assert_eq!(report.linked, 2);
        assert_eq!(store.contact_count().await, 2);

        let again = service
            .preview_import("C1", Upload::Text(csv), &mapping())
            .await
            .unwrap();
        assert_eq!(again.in_campaign.len(), 2);
        assert!(again.contacts.is_empty());
    }

    #[tokio::test]
    async fn test_keep_only_listed_then_confirm() {
        let store = Arc::new(InMemoryRecordStore::new());
        let new_contacts: Vec<NewContact> = (0..10)
            .map(|i| NewContact {
                first_name: format!("Member{}", i),
                last_name: "Doe".into(),
                phone_number: format!("+1555010{}", i),
            })
            .collect();
        let created = store.insert_contacts(&new_contacts).await.unwrap();
        let links: Vec<NewCampaignLink> = created
            .iter()
            .map(|c| NewCampaignLink {
                campaign_id: "C1".into(),
                contact_id: c.id,
                status: Default::default(),
                personalization_fields: Default::default(),
            })
            .collect();
        store.insert_campaign_links(&links).await.unwrap();
        let service = service(store.clone());

        let csv = "first,last,phone\nMember2,Doe,555-0102\nMember5,Doe,555-0105";
        let preview = service
            .preview_removal("C1", Upload::Text(csv), &mapping(), true)
            .await
            .unwrap();
        assert_eq!(preview.to_remove_if_enabled.len(), 8);
        assert_eq!(preview.contacts.len(), 2);

        let report = service.confirm_removal("C1", &preview).await.unwrap();
        assert_eq!(report.unlinked, 8);
        assert_eq!(report.deleted_contacts, 8);
        assert_eq!(service.campaign_contacts("C1").await.unwrap().len(), 2);
        assert_eq!(store.contact_count().await, 2);
    }

    #[tokio::test]
    async fn test_suggest_mapping_and_personalization() {
        let store = Arc::new(InMemoryRecordStore::new());
        let service = service(store);
        let csv = "First Name,Last Name,Mobile,Company\nJane,Doe,555-0100,Acme";

        let (data, mut mapping) = service.suggest_mapping(Upload::Text(csv)).unwrap();
        assert!(mapping.is_ready());
        mapping
            .personalization
            .push(PersonalizationEntry::new("company", "Company"));

        let preview = service.preview_import_rows("C1", &data, &mapping).await.unwrap();
        let fields = preview.contacts[0].personalization_fields.as_ref().unwrap();
        assert_eq!(fields.get("company").map(String::as_str), Some("Acme"));
    }

    #[tokio::test]
    async fn test_bad_upload_is_fatal() {
        let service = service(Arc::new(InMemoryRecordStore::new()));
        let result = service
            .preview_import("C1", Upload::Bytes { data: b"", file_name: None }, &mapping())
            .await;
        assert!(matches!(result, Err(AppError::FormatError(_))));

        let result = service
            .preview_import("", Upload::Text(SAMPLE_CSV), &mapping())
            .await;
        assert!(matches!(result, Err(AppError::ValidationError(_))));
    }
}
