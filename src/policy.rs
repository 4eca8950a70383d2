//! Workflow policy table: statuses, roles and the legal transitions between them
//!
//! This module is pure data. The engine consults it, nothing here mutates
//! anything or performs I/O. Status and role labels are opaque tags; they
//! are displayed and parsed whole but never interpreted.

use super::error::ParseLabelError;

/// The closed set of workflow statuses, in workflow order.
#[derive(minicbor::Encode, minicbor::Decode, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentStatus {
    #[n(0)]
    AwaitingInitialVerification,
    #[n(1)]
    AwaitingDocumentSupervisorApproval,
    #[n(2)]
    ReturnedForCorrection,
    #[n(3)]
    TaxProcessing,
    #[n(4)]
    AwaitingTaxSupervisorApproval,
    #[n(5)]
    AccountingProcessing,
    #[n(6)]
    AwaitingAccountingSupervisorApproval,
    #[n(7)]
    DisbursementProcessing,
    #[n(8)]
    Completed,
    #[n(9)]
    RejectedFinal,
}

/// The closed set of organizational roles. Two of these (DocumentDrafter,
/// DisbursementSupervisor) have no workflow actions and exist only so the
/// empty-entry rules are exercised against the real role set.
#[derive(minicbor::Encode, minicbor::Decode, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    #[n(0)]
    InputStaff,
    #[n(1)]
    InitialVerifier,
    #[n(2)]
    DocumentDrafter,
    #[n(3)]
    DocumentSupervisor,
    #[n(4)]
    TaxStaff,
    #[n(5)]
    TaxSupervisor,
    #[n(6)]
    AccountingStaff,
    #[n(7)]
    AccountingSupervisor,
    #[n(8)]
    DisbursementStaff,
    #[n(9)]
    DisbursementSupervisor,
    #[n(10)]
    Admin,
}

/// The (role, display name) pair attempting a transition. Identity is
/// established upstream; the engine only does workflow-level authorization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub role: Role,
    pub name: String,
}

impl Actor {
    pub fn new(role: Role, name: impl Into<String>) -> Self {
        Self {
            role,
            name: name.into(),
        }
    }
}

/// How a transition is classified. Return-class transitions always require a
/// justification note.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionClass {
    Approve,
    Return,
    Complete,
}

/// One legal move out of a status, as declared by the policy table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub target: DocumentStatus,
    pub label: &'static str,
    pub class: TransitionClass,
}

/// The legal transitions for a (status, role) pair. Pairs absent from the
/// table get an empty slice. Admin is deliberately NOT in this table; the
/// engine handles the override path separately.
pub fn transitions_for(status: DocumentStatus, role: Role) -> &'static [Transition] {
    use DocumentStatus::*;
    use Role::*;

    match (status, role) {
        (AwaitingInitialVerification, InitialVerifier) => &[
            Transition {
                target: AwaitingDocumentSupervisorApproval,
                label: "Setujui",
                class: TransitionClass::Approve,
            },
            Transition {
                target: ReturnedForCorrection,
                label: "Kembalikan",
                class: TransitionClass::Return,
            },
        ],
        (AwaitingDocumentSupervisorApproval, DocumentSupervisor) => &[
            Transition {
                target: TaxProcessing,
                label: "Setujui",
                class: TransitionClass::Approve,
            },
            Transition {
                target: ReturnedForCorrection,
                label: "Kembalikan",
                class: TransitionClass::Return,
            },
        ],
        (TaxProcessing, TaxStaff) => &[Transition {
            target: AwaitingTaxSupervisorApproval,
            label: "Selesai Pajak",
            class: TransitionClass::Complete,
        }],
        (AwaitingTaxSupervisorApproval, TaxSupervisor) => &[
            Transition {
                target: AccountingProcessing,
                label: "Setujui",
                class: TransitionClass::Approve,
            },
            Transition {
                target: TaxProcessing,
                label: "Kembalikan",
                class: TransitionClass::Return,
            },
        ],
        (AccountingProcessing, AccountingStaff) => &[Transition {
            target: AwaitingAccountingSupervisorApproval,
            label: "Selesai Akuntansi",
            class: TransitionClass::Complete,
        }],
        (AwaitingAccountingSupervisorApproval, AccountingSupervisor) => &[
            Transition {
                target: DisbursementProcessing,
                label: "Setujui",
                class: TransitionClass::Approve,
            },
            Transition {
                target: AccountingProcessing,
                label: "Kembalikan",
                class: TransitionClass::Return,
            },
        ],
        (DisbursementProcessing, DisbursementStaff) => &[Transition {
            target: Completed,
            label: "Selesai Dibayar",
            class: TransitionClass::Complete,
        }],
        _ => &[],
    }
}

/// The single status a role is eligible to act on, for worklist visibility.
/// Roles with no table entries (and the creator/admin roles, which are
/// visibility special cases) get None.
pub fn actionable_status(role: Role) -> Option<DocumentStatus> {
    use DocumentStatus::*;
    use Role::*;

    match role {
        InitialVerifier => Some(AwaitingInitialVerification),
        DocumentSupervisor => Some(AwaitingDocumentSupervisorApproval),
        TaxStaff => Some(TaxProcessing),
        TaxSupervisor => Some(AwaitingTaxSupervisorApproval),
        AccountingStaff => Some(AccountingProcessing),
        AccountingSupervisor => Some(AwaitingAccountingSupervisorApproval),
        DisbursementStaff => Some(DisbursementProcessing),
        _ => None,
    }
}

impl DocumentStatus {
    /// All ten statuses in workflow order.
    pub const ALL: [DocumentStatus; 10] = [
        DocumentStatus::AwaitingInitialVerification,
        DocumentStatus::AwaitingDocumentSupervisorApproval,
        DocumentStatus::ReturnedForCorrection,
        DocumentStatus::TaxProcessing,
        DocumentStatus::AwaitingTaxSupervisorApproval,
        DocumentStatus::AccountingProcessing,
        DocumentStatus::AwaitingAccountingSupervisorApproval,
        DocumentStatus::DisbursementProcessing,
        DocumentStatus::Completed,
        DocumentStatus::RejectedFinal,
    ];

    /// Terminal statuses have no outgoing transitions; reaching one locks the
    /// document.
    pub fn is_terminal(self) -> bool {
        matches!(self, DocumentStatus::Completed | DocumentStatus::RejectedFinal)
    }

    /// The opaque display label (carried over verbatim, parentheses included).
    pub fn label(self) -> &'static str {
        match self {
            DocumentStatus::AwaitingInitialVerification => "Menunggu Verifikasi (Ibu B)",
            DocumentStatus::AwaitingDocumentSupervisorApproval => {
                "Menunggu Persetujuan (Kasubag Dokumen)"
            }
            DocumentStatus::ReturnedForCorrection => "Ditolak (Menunggu Perbaikan)",
            DocumentStatus::TaxProcessing => "Proses Perpajakan",
            DocumentStatus::AwaitingTaxSupervisorApproval => "Menunggu Persetujuan (Kasubag Pajak)",
            DocumentStatus::AccountingProcessing => "Proses Akuntansi",
            DocumentStatus::AwaitingAccountingSupervisorApproval => {
                "Menunggu Persetujuan (Kasubag Akuntansi)"
            }
            DocumentStatus::DisbursementProcessing => "Proses Pencairan",
            DocumentStatus::Completed => "Selesai Dibayar",
            DocumentStatus::RejectedFinal => "Ditolak Final",
        }
    }
}

impl Role {
    pub const ALL: [Role; 11] = [
        Role::InputStaff,
        Role::InitialVerifier,
        Role::DocumentDrafter,
        Role::DocumentSupervisor,
        Role::TaxStaff,
        Role::TaxSupervisor,
        Role::AccountingStaff,
        Role::AccountingSupervisor,
        Role::DisbursementStaff,
        Role::DisbursementSupervisor,
        Role::Admin,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Role::InputStaff => "Staf Input",
            Role::InitialVerifier => "Verifikator Awal",
            Role::DocumentDrafter => "Pembuat Dokumen",
            Role::DocumentSupervisor => "Kasubag Dokumen",
            Role::TaxStaff => "Staf Perpajakan",
            Role::TaxSupervisor => "Kasubag Perpajakan",
            Role::AccountingStaff => "Staf Akuntansi",
            Role::AccountingSupervisor => "Kasubag Akuntansi",
            Role::DisbursementStaff => "Staf Pencairan",
            Role::DisbursementSupervisor => "Kasubag Pencairan",
            Role::Admin => "Admin",
        }
    }
}

impl std::fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for DocumentStatus {
    type Err = ParseLabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DocumentStatus::ALL
            .into_iter()
            .find(|status| status.label() == s)
            .ok_or_else(|| ParseLabelError::Status(s.to_string()))
    }
}

impl std::str::FromStr for Role {
    type Err = ParseLabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|role| role.label() == s)
            .ok_or_else(|| ParseLabelError::Role(s.to_string()))
    }
}
