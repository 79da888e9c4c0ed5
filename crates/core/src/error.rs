use std::fmt;

/// A single failed form field, with a user-facing message.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// Every field that failed validation on one form submission.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.push(FieldError {
            field,
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn fields(&self) -> &[FieldError] {
        &self.0
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.0.iter().any(|e| e.field == field)
    }

    /// `Ok(())` when nothing was recorded, otherwise a [`ClinicError::Validation`].
    pub fn into_result(self) -> ClinicResult<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(ClinicError::Validation(self))
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self
            .0
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect::<Vec<_>>()
            .join("; ");
        write!(f, "{joined}")
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ClinicError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("validation failed: {0}")]
    Validation(ValidationErrors),

    #[error("user not found: {0}")]
    UserNotFound(String),
    #[error("patient not found: {0}")]
    PatientNotFound(String),
    #[error("professional not found: {0}")]
    ProfessionalNotFound(String),
    #[error("appointment not found: {0}")]
    AppointmentNotFound(String),

    #[error("no user is logged in")]
    NotLoggedIn,
    #[error("no user available with the {0} role")]
    NoUserForRole(crate::UserRole),
    #[error("current user is a {actual}, expected a {expected}")]
    WrongRole {
        expected: crate::UserRole,
        actual: crate::UserRole,
    },
    #[error("slot {time} on {date} is not available for professional {professional_id}")]
    SlotUnavailable {
        professional_id: String,
        date: chrono::NaiveDate,
        time: crate::Slot,
    },

    #[error("failed to read seed file: {0}")]
    SeedRead(std::io::Error),
    #[error("seed schema mismatch at {path}: {message}")]
    SeedSchema { path: String, message: String },
    #[error("invalid text: {0}")]
    Text(#[from] medico_types::TextError),
}

pub type ClinicResult<T> = std::result::Result<T, ClinicError>;
