// ============================================================
// IMPORT RECONCILER
// ============================================================
// Buckets validated contacts against an identity snapshot. Pure; the
// commit executor re-resolves before writing anything.

use tracing::info;

use super::identity_resolver::IdentitySnapshot;
use crate::domain::contact::{ImportResult, ValidatedRows};

/// Split valid rows into toImport / inSystem / inCampaign; errors carry over
pub fn reconcile_import(validated: ValidatedRows, snapshot: &IdentitySnapshot) -> ImportResult {
    let ValidatedRows {
        contacts,
        errors,
        total_rows,
    } = validated;

    let mut to_import = Vec::new();
    let mut in_system = Vec::new();
    let mut in_campaign = Vec::new();

    for contact in contacts {
        if snapshot.is_in_campaign(&contact.phone_number) {
            in_campaign.push(contact);
        } else if snapshot.is_in_system(&contact.phone_number) {
            in_system.push(contact);
        } else {
            to_import.push(contact);
        }
    }

    let result = ImportResult::from_buckets(to_import, in_system, in_campaign, errors, total_rows);

    info!(
        to_import = result.contacts.len(),
        in_system = result.in_system.len(),
        in_campaign = result.in_campaign.len(),
        failed = result.failed,
        "Reconciled import preview"
    );

    result
}
