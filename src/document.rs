//! Document, details intake and the append-only process history
use super::error::IntakeError;
use super::policy::DocumentStatus;
use super::utils;
use chrono::{DateTime, TimeZone, Utc};
use sled::Db;

#[derive(minicbor::Encode, minicbor::Decode, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    #[n(0)]
    Investment,
    #[n(1)]
    Operating,
}

/// Descriptive payload of a payment request. Opaque to the engine: it is
/// carried through every transition untouched and never inspected.
#[derive(minicbor::Encode, minicbor::Decode, Debug, Clone, PartialEq, Eq)]
pub struct DocumentDetails {
    #[n(0)]
    pub document_number: String,
    #[n(1)]
    pub month: String,
    #[n(2)]
    pub year: String,
    #[n(3)]
    pub spp_number: String,
    #[n(4)]
    pub po_number: String,
    #[n(5)]
    pub pr_number: String,
    #[n(6)]
    pub payment_purpose: String,
    #[n(7)]
    pub category: String,
    #[n(8)]
    pub kind: DocumentKind,
    #[n(9)]
    pub amount_rupiah: u64, // integer rupiah, no fractional amounts
}

// Used for constructing drafts before intake accepts them
#[derive(Default)]
pub struct DocumentDetailsBuilder {
    document_number: Option<String>,
    month: Option<String>,
    year: Option<String>,
    spp_number: Option<String>,
    po_number: Option<String>,
    pr_number: Option<String>,
    payment_purpose: Option<String>,
    category: Option<String>,
    kind: Option<DocumentKind>,
    amount_rupiah: u64,
}

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone)]
pub struct TimeStamp<T: TimeZone>(DateTime<T>);

impl TimeStamp<Utc> {
    pub fn new() -> Self {
        Self(Utc::now())
    }
    pub fn new_with(year: i32, month: u32, day: u32, hour: u32, min: u32, sec: u32) -> Self {
        Utc.with_ymd_and_hms(year, month, day, hour, min, sec)
            .unwrap()
            .into()
    }
    pub fn to_datetime_utc(&self) -> DateTime<Utc> {
        self.0
    }
}

impl Default for TimeStamp<Utc> {
    fn default() -> Self {
        Self::new()
    }
}

/// What a history entry moved the document into. Entry 0 of every history is
/// the `Created` sentinel, which is not a workflow status.
#[derive(minicbor::Encode, minicbor::Decode, Debug, Clone, PartialEq, Eq)]
pub enum EntryStatus {
    #[n(0)]
    Created,
    #[n(1)]
    Moved(#[n(0)] DocumentStatus),
}

/// An immutable audit record. One is appended per successful transition and
/// none is ever reordered, rewritten or dropped.
#[derive(minicbor::Encode, minicbor::Decode, Debug, Clone, PartialEq, Eq)]
pub struct ProcessHistoryEntry {
    #[n(0)]
    pub timestamp: TimeStamp<Utc>,
    #[n(1)]
    pub status: EntryStatus,
    #[n(2)]
    pub actor: String,
    #[n(3)]
    pub note: Option<String>,
    #[n(4)]
    pub admin_override: bool,
}

impl ProcessHistoryEntry {
    pub fn new(
        timestamp: TimeStamp<Utc>,
        status: EntryStatus,
        actor: String,
        note: Option<String>,
    ) -> Self {
        Self {
            timestamp,
            status,
            actor,
            note,
            admin_override: false,
        }
    }
}

/// The unit of work moving through the approval stages.
#[derive(minicbor::Encode, minicbor::Decode, Debug, Clone, PartialEq, Eq)]
pub struct Document {
    #[n(0)]
    pub doc_id: String, // uuid7, bech32m encoded; immutable
    #[n(1)]
    pub status: DocumentStatus,
    #[n(2)]
    pub creator: String, // display name of the submitting user; immutable
    #[n(3)]
    pub details: DocumentDetails,
    #[n(4)]
    pub history: Vec<ProcessHistoryEntry>,
    #[n(5)]
    pub locked: bool,
}

impl DocumentDetailsBuilder {
    /// Construct a new builder object, this becomes the basis for a draft
    pub fn new() -> Self {
        Self::default()
    }
    pub fn set_document_number(mut self, number: &str) -> Self {
        self.document_number = Some(number.to_string());
        self
    }
    pub fn set_period(mut self, month: &str, year: &str) -> Self {
        self.month = Some(month.to_string());
        self.year = Some(year.to_string());
        self
    }
    pub fn set_spp_number(mut self, number: &str) -> Self {
        self.spp_number = Some(number.to_string());
        self
    }
    pub fn set_po_number(mut self, number: &str) -> Self {
        self.po_number = Some(number.to_string());
        self
    }
    pub fn set_pr_number(mut self, number: &str) -> Self {
        self.pr_number = Some(number.to_string());
        self
    }
    pub fn set_payment_purpose(mut self, purpose: &str) -> Self {
        self.payment_purpose = Some(purpose.to_string());
        self
    }
    pub fn set_category(mut self, category: &str) -> Self {
        self.category = Some(category.to_string());
        self
    }
    pub fn set_kind(mut self, kind: DocumentKind) -> Self {
        self.kind = Some(kind);
        self
    }
    pub fn set_amount_rupiah(mut self, amount: u64) -> Self {
        self.amount_rupiah = amount;
        self
    }
    /// Checks required fields and produces the finished details payload.
    pub fn build(self) -> Result<DocumentDetails, IntakeError> {
        let document_number = self
            .document_number
            .ok_or(IntakeError::MissingField("document_number"))?;
        let month = self.month.ok_or(IntakeError::MissingField("month"))?;
        let year = self.year.ok_or(IntakeError::MissingField("year"))?;
        let spp_number = self
            .spp_number
            .ok_or(IntakeError::MissingField("spp_number"))?;
        let po_number = self
            .po_number
            .ok_or(IntakeError::MissingField("po_number"))?;
        let pr_number = self
            .pr_number
            .ok_or(IntakeError::MissingField("pr_number"))?;
        let payment_purpose = self
            .payment_purpose
            .ok_or(IntakeError::MissingField("payment_purpose"))?;
        let category = self.category.ok_or(IntakeError::MissingField("category"))?;
        let kind = self.kind.ok_or(IntakeError::MissingField("kind"))?;

        if self.amount_rupiah == 0 {
            return Err(IntakeError::ZeroAmount);
        }

        Ok(DocumentDetails {
            document_number,
            month,
            year,
            spp_number,
            po_number,
            pr_number,
            payment_purpose,
            category,
            kind,
            amount_rupiah: self.amount_rupiah,
        })
    }
}

impl Document {
    /// Intake entry point: a fresh document starts at the workflow's single
    /// entry status with a one-element history carrying the creation event.
    pub fn create(details: DocumentDetails, creator: &str) -> anyhow::Result<Self> {
        let doc_id = utils::new_uuid_to_bech32("doc")?;

        let created = ProcessHistoryEntry::new(
            TimeStamp::new(),
            EntryStatus::Created,
            creator.to_string(),
            Some("Dokumen dibuat oleh Staf Input".to_string()),
        );

        Ok(Self {
            doc_id,
            status: DocumentStatus::AwaitingInitialVerification,
            creator: creator.to_string(),
            details,
            history: vec![created],
            locked: false,
        })
    }

    /// Append an audit record. Timestamps are clamped to the previous entry
    /// so the history stays monotonically non-decreasing under clock skew.
    pub fn append_entry(&mut self, mut entry: ProcessHistoryEntry) {
        if let Some(last) = self.history.last() {
            if entry.timestamp.to_datetime_utc() < last.timestamp.to_datetime_utc() {
                entry.timestamp = last.timestamp.clone();
            }
        }
        self.history.push(entry);
    }

    /// Timestamp of the creation event, used for newest-first worklists.
    pub fn created_at(&self) -> Option<&TimeStamp<Utc>> {
        self.history.first().map(|entry| &entry.timestamp)
    }

    /// Replay the history from the entry status forward. The result must
    /// always equal `self.status`; anything else means the audit trail and
    /// the document disagree.
    pub fn replayed_status(&self) -> DocumentStatus {
        self.history
            .iter()
            .fold(DocumentStatus::AwaitingInitialVerification, |current, entry| {
                match entry.status {
                    EntryStatus::Created => current,
                    EntryStatus::Moved(status) => status,
                }
            })
    }

    /// Load a document from the database by id
    pub fn load_from_db(db: &Db, doc_id: &str) -> anyhow::Result<Self> {
        let bytes = db
            .get(doc_id.as_bytes())?
            .ok_or_else(|| anyhow::anyhow!("no document found with id: {}", doc_id))?;

        Ok(minicbor::decode(bytes.as_ref())?)
    }

    /// Persist the document keyed by its id
    pub fn save_to_db(&self, db: &Db) -> anyhow::Result<()> {
        db.insert(self.doc_id.as_bytes(), minicbor::to_vec(self)?)?;
        Ok(())
    }
}

impl<T: TimeZone> From<DateTime<T>> for TimeStamp<T> {
    fn from(value: DateTime<T>) -> Self {
        TimeStamp(value)
    }
}

// Nanosecond precision so ordering survives the round-trip.
impl<C> minicbor::Encode<C> for TimeStamp<Utc> {
    fn encode<W: minicbor::encode::Write>(
        &self,
        e: &mut minicbor::Encoder<W>,
        _: &mut C,
    ) -> Result<(), minicbor::encode::Error<W::Error>> {
        if let Some(nsec) = self.0.timestamp_nanos_opt() {
            return e.i64(nsec)?.ok();
        }

        Err(minicbor::encode::Error::message(
            "failed to encode timestamp. timestamp_nanos_opt returned None",
        ))
    }
}

impl<'b, C> minicbor::Decode<'b, C> for TimeStamp<Utc> {
    fn decode(d: &mut minicbor::Decoder<'b>, _: &mut C) -> Result<Self, minicbor::decode::Error> {
        let nsecs = d.i64()?;

        Ok(TimeStamp(DateTime::from_timestamp_nanos(nsecs)))
    }
}
