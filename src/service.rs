//! Service layer API for document workflow operations
use super::document::{Document, DocumentDetails, EntryStatus, ProcessHistoryEntry, TimeStamp};
use super::engine;
use super::error::WorkflowError;
use super::policy::{Actor, DocumentStatus, Role};
use std::sync::Arc;

pub struct DocumentService {
    instance: Arc<sled::Db>,
    // in future we could add a config for retention of completed documents
}

impl DocumentService {
    pub fn new(instance: Arc<sled::Db>) -> Self {
        Self { instance }
    }

    /// Intake: create a new document and store it at the workflow entry
    /// status. Only the input staff (or an admin) may submit.
    pub fn submit_document(
        &self,
        details: DocumentDetails,
        creator: &Actor,
    ) -> anyhow::Result<Document> {
        if !matches!(creator.role, Role::InputStaff | Role::Admin) {
            return Err(anyhow::anyhow!(
                "role '{}' may not submit new documents",
                creator.role
            ));
        }

        let document = Document::create(details, &creator.name)?;
        document.save_to_db(&self.instance)?;

        Ok(document)
    }

    /// Run one workflow transition: load, validate through the engine, store
    /// the returned document back. The engine rejection surfaces unchanged.
    pub fn perform_transition(
        &self,
        doc_id: &str,
        actor: &Actor,
        target: DocumentStatus,
        note: Option<&str>,
    ) -> anyhow::Result<Document> {
        let document = Document::load_from_db(&self.instance, doc_id)?;

        let updated = engine::attempt_transition(&document, actor, target, note)?;
        updated.save_to_db(&self.instance)?;

        Ok(updated)
    }

    /// Re-enter the workflow after a correction. This is an intake concern,
    /// not an engine one: only the creator may resubmit, and only from the
    /// returned-for-correction status. History continuity is preserved by
    /// appending a normal entry.
    pub fn resubmit_document(&self, doc_id: &str, actor: &Actor) -> anyhow::Result<Document> {
        let mut document = Document::load_from_db(&self.instance, doc_id)?;

        if document.locked {
            return Err(WorkflowError::DocumentLocked {
                status: document.status,
            }
            .into());
        }
        if actor.name != document.creator {
            return Err(WorkflowError::Forbidden {
                role: actor.role,
                status: document.status,
            }
            .into());
        }
        if document.status != DocumentStatus::ReturnedForCorrection {
            return Err(WorkflowError::IllegalTransition {
                from: document.status,
                to: DocumentStatus::AwaitingInitialVerification,
                role: actor.role,
            }
            .into());
        }

        document.append_entry(ProcessHistoryEntry::new(
            TimeStamp::new(),
            EntryStatus::Moved(DocumentStatus::AwaitingInitialVerification),
            actor.name.clone(),
            Some("Dokumen diperbaiki dan diajukan ulang".to_string()),
        ));
        document.status = DocumentStatus::AwaitingInitialVerification;
        document.save_to_db(&self.instance)?;

        Ok(document)
    }

    /// Load a single document by id
    pub fn load_document(&self, doc_id: &str) -> anyhow::Result<Document> {
        Document::load_from_db(&self.instance, doc_id)
    }

    /// The documents an actor may currently see, newest first (by creation
    /// event timestamp).
    pub fn worklist_for(&self, actor: &Actor) -> anyhow::Result<Vec<Document>> {
        let mut documents = Vec::new();

        for kv in self.instance.iter() {
            let (_, bytes) = kv?;
            let document: Document = minicbor::decode(bytes.as_ref())?;

            if engine::is_visible_to(actor, &document) {
                documents.push(document);
            }
        }

        documents
            .sort_by_key(|doc| std::cmp::Reverse(doc.created_at().map(|ts| ts.to_datetime_utc())));

        Ok(documents)
    }
}
