//! The workflow engine: transition validation and worklist visibility
//!
//! Both functions here are pure. They take document values and return new
//! ones (or a rejection); persistence of the result belongs to the caller,
//! which must also serialize writers per document.

use super::document::{Document, EntryStatus, ProcessHistoryEntry, TimeStamp};
use super::error::WorkflowError;
use super::policy::{self, Actor, DocumentStatus, Role, TransitionClass};

/// Validate and apply one status transition.
///
/// Checks run in a fixed order and the first failure wins: locked document,
/// then role authorization against the policy table, then target legality,
/// then the note requirement on return transitions. Admin skips the table
/// checks but never the locked check, and a forced transition is tagged as
/// an administrative override in the history.
///
/// On success the input is left untouched and a new document is returned
/// with the status applied, one history entry appended, and the lock set
/// when the target is terminal.
pub fn attempt_transition(
    document: &Document,
    actor: &Actor,
    target: DocumentStatus,
    note: Option<&str>,
) -> Result<Document, WorkflowError> {
    if document.locked {
        return Err(WorkflowError::DocumentLocked {
            status: document.status,
        });
    }

    if actor.role == Role::Admin {
        return Ok(apply(document, actor, target, note, true));
    }

    let allowed = policy::transitions_for(document.status, actor.role);
    if allowed.is_empty() {
        return Err(WorkflowError::Forbidden {
            role: actor.role,
            status: document.status,
        });
    }

    let Some(transition) = allowed.iter().find(|t| t.target == target) else {
        return Err(WorkflowError::IllegalTransition {
            from: document.status,
            to: target,
            role: actor.role,
        });
    };

    if transition.class == TransitionClass::Return && note.is_none_or(|n| n.trim().is_empty()) {
        return Err(WorkflowError::NoteRequired);
    }

    Ok(apply(document, actor, target, note, false))
}

// The single mutation point. Everything before this is read-only validation.
fn apply(
    document: &Document,
    actor: &Actor,
    target: DocumentStatus,
    note: Option<&str>,
    admin_override: bool,
) -> Document {
    let mut updated = document.clone();

    updated.append_entry(ProcessHistoryEntry {
        timestamp: TimeStamp::new(),
        status: EntryStatus::Moved(target),
        actor: actor.name.clone(),
        note: note.map(str::to_string),
        admin_override,
    });
    updated.status = target;

    if target.is_terminal() {
        updated.locked = true;
    }

    updated
}

/// Whether a role may currently see/act on a document. Admin sees all,
/// the input staff see their own submissions, every other role sees exactly
/// the documents sitting in the one status it acts on.
pub fn is_visible_to(actor: &Actor, document: &Document) -> bool {
    match actor.role {
        Role::Admin => true,
        Role::InputStaff => document.creator == actor.name,
        role => policy::actionable_status(role) == Some(document.status),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{DocumentDetailsBuilder, DocumentKind};

    fn sample_document() -> Document {
        let details = DocumentDetailsBuilder::new()
            .set_document_number("0002/DOC/2025")
            .set_period("Februari", "2025")
            .set_spp_number("SPP-002")
            .set_po_number("PO-002")
            .set_pr_number("PR-002")
            .set_payment_purpose("Pengadaan server")
            .set_category("Infrastruktur")
            .set_kind(DocumentKind::Investment)
            .set_amount_rupiah(250_000_000)
            .build()
            .unwrap();

        Document::create(details, "Andi").unwrap()
    }

    #[test]
    fn approve_appends_exactly_one_entry() {
        let doc = sample_document();
        let verifier = Actor::new(Role::InitialVerifier, "Ibu B");

        let updated = attempt_transition(
            &doc,
            &verifier,
            DocumentStatus::AwaitingDocumentSupervisorApproval,
            None,
        )
        .unwrap();

        assert_eq!(updated.history.len(), doc.history.len() + 1);
        assert_eq!(
            updated.status,
            DocumentStatus::AwaitingDocumentSupervisorApproval
        );
        // input untouched
        assert_eq!(doc.status, DocumentStatus::AwaitingInitialVerification);
        assert_eq!(doc.history.len(), 1);
    }

    #[test]
    fn admin_override_is_tagged() {
        let doc = sample_document();
        let admin = Actor::new(Role::Admin, "Root");

        let updated =
            attempt_transition(&doc, &admin, DocumentStatus::DisbursementProcessing, None).unwrap();

        assert!(updated.history.last().unwrap().admin_override);
        assert_eq!(updated.status, DocumentStatus::DisbursementProcessing);
    }

    #[test]
    fn admin_cannot_touch_a_locked_document() {
        let mut doc = sample_document();
        doc.status = DocumentStatus::Completed;
        doc.locked = true;

        let admin = Actor::new(Role::Admin, "Root");
        let err = attempt_transition(&doc, &admin, DocumentStatus::TaxProcessing, None)
            .unwrap_err();

        assert_eq!(
            err,
            WorkflowError::DocumentLocked {
                status: DocumentStatus::Completed
            }
        );
    }

    #[test]
    fn whitespace_note_does_not_satisfy_a_return() {
        let doc = sample_document();
        let verifier = Actor::new(Role::InitialVerifier, "Ibu B");

        let err = attempt_transition(
            &doc,
            &verifier,
            DocumentStatus::ReturnedForCorrection,
            Some("   "),
        )
        .unwrap_err();

        assert_eq!(err, WorkflowError::NoteRequired);
    }

    #[test]
    fn creator_visibility_is_by_ownership_not_role() {
        let doc = sample_document();

        let owner = Actor::new(Role::InputStaff, "Andi");
        let other = Actor::new(Role::InputStaff, "Budi");

        assert!(is_visible_to(&owner, &doc));
        assert!(!is_visible_to(&other, &doc));
    }

    #[test]
    fn roles_without_table_entries_see_nothing() {
        let doc = sample_document();

        for role in [Role::DocumentDrafter, Role::DisbursementSupervisor] {
            let actor = Actor::new(role, "Citra");
            assert!(!is_visible_to(&actor, &doc));
        }
    }
}
