// ============================================================
// REMOVAL RECONCILER
// ============================================================
// Subtractive preview. With `remove_others` off the file lists who to
// remove; with it on the file lists who to keep.

use std::collections::{HashMap, HashSet};

use tracing::info;

use crate::domain::contact::{CampaignContact, RemovalResult, ValidatedRows};

pub fn reconcile_removal(
    validated: ValidatedRows,
    membership: &[CampaignContact],
    remove_others: bool,
) -> RemovalResult {
    let ValidatedRows {
        contacts,
        errors,
        total_rows,
    } = validated;

    let result = if remove_others {
        let file_rows: HashMap<&str, Option<usize>> = contacts
            .iter()
            .map(|c| (c.phone_number.as_str(), c.row_number))
            .collect();

        let mut keep = Vec::new();
        let mut to_remove = Vec::new();
        for member in membership {
            match file_rows.get(member.phone_number.as_str()) {
                Some(row_number) => {
                    let mut kept = member.to_import_contact();
                    kept.row_number = *row_number;
                    keep.push(kept);
                }
                None => to_remove.push(member.clone()),
            }
        }

        let member_phones: HashSet<&str> =
            membership.iter().map(|m| m.phone_number.as_str()).collect();
        let not_in_campaign = contacts
            .iter()
            .filter(|c| !member_phones.contains(c.phone_number.as_str()))
            .cloned()
            .collect();

        RemovalResult::keep_listed(keep, to_remove, not_in_campaign, errors, total_rows)
    } else {
        let member_phones: HashSet<&str> =
            membership.iter().map(|m| m.phone_number.as_str()).collect();
        let (to_remove, not_in_campaign): (Vec<_>, Vec<_>) = contacts
            .into_iter()
            .partition(|c| member_phones.contains(c.phone_number.as_str()));

        RemovalResult::remove_listed(to_remove, not_in_campaign, errors, total_rows)
    };

    info!(
        remove_others,
        to_remove = result.removal_count(),
        kept = result.existing,
        not_in_campaign = result.not_in_campaign.len(),
        failed = result.failed,
        "Reconciled removal preview"
    );

    result
}
