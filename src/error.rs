use super::policy::{DocumentStatus, Role};

/// Rejections produced by the workflow engine. All four are caller errors,
/// reported synchronously before any mutation; none is retried automatically.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum WorkflowError {
    #[error("document is locked in terminal status '{status}'")]
    DocumentLocked { status: DocumentStatus },
    #[error("role '{role}' may not act on a document in status '{status}'")]
    Forbidden { role: Role, status: DocumentStatus },
    #[error("role '{role}' may not move a document from '{from}' to '{to}'")]
    IllegalTransition {
        from: DocumentStatus,
        to: DocumentStatus,
        role: Role,
    },
    #[error("a return transition requires a justification note")]
    NoteRequired,
}

/// Intake-layer rejections for incomplete document details.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum IntakeError {
    #[error("required field '{0}' is not set")]
    MissingField(&'static str),
    #[error("amount must be greater than zero")]
    ZeroAmount,
}

/// An unrecognized status or role label.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseLabelError {
    #[error("unknown status label '{0}'")]
    Status(String),
    #[error("unknown role label '{0}'")]
    Role(String),
}
