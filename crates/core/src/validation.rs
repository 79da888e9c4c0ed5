//! Form validation.
//!
//! Forms arrive as raw strings. Validation checks every field and reports all failures at
//! once as a [`ValidationErrors`] list, then converts the form into the typed value the store
//! accepts.

use crate::constants::{CPF_MAX_CHARS, CPF_MIN_CHARS, PATIENT_NAME_MIN_CHARS, PHONE_MIN_CHARS};
use crate::error::ValidationErrors;
use crate::models::{NewPatient, PatientUpdate};
use crate::ClinicResult;
use medico_types::NonEmptyText;

/// Raw patient registration form.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PatientForm {
    pub name: String,
    pub cpf: String,
    pub phone: String,
    pub insurance: Option<String>,
    pub medical_history: Option<String>,
}

impl PatientForm {
    /// Validates the form and builds a [`NewPatient`].
    ///
    /// # Errors
    ///
    /// Returns [`crate::ClinicError::Validation`] listing every failing field.
    pub fn validate(self) -> ClinicResult<NewPatient> {
        let mut errors = ValidationErrors::new();
        check_name(&self.name, &mut errors);
        check_cpf(&self.cpf, &mut errors);
        check_phone(&self.phone, &mut errors);
        errors.into_result()?;

        Ok(NewPatient {
            name: NonEmptyText::new(&self.name)?,
            cpf: self.cpf.trim().to_string(),
            phone: self.phone.trim().to_string(),
            insurance: self.insurance.unwrap_or_default().trim().to_string(),
            medical_history: self.medical_history.unwrap_or_default(),
        })
    }
}

/// Raw partial patient edit. Only supplied fields are validated and changed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PatientEditForm {
    pub name: Option<String>,
    pub cpf: Option<String>,
    pub phone: Option<String>,
    pub insurance: Option<String>,
    pub medical_history: Option<String>,
}

impl PatientEditForm {
    pub fn validate(self) -> ClinicResult<PatientUpdate> {
        let mut errors = ValidationErrors::new();
        if let Some(name) = &self.name {
            check_name(name, &mut errors);
        }
        if let Some(cpf) = &self.cpf {
            check_cpf(cpf, &mut errors);
        }
        if let Some(phone) = &self.phone {
            check_phone(phone, &mut errors);
        }
        errors.into_result()?;

        Ok(PatientUpdate {
            name: self.name.as_deref().map(NonEmptyText::new).transpose()?,
            cpf: self.cpf.map(|v| v.trim().to_string()),
            phone: self.phone.map(|v| v.trim().to_string()),
            insurance: self.insurance.map(|v| v.trim().to_string()),
            medical_history: self.medical_history,
        })
    }
}

fn char_len(value: &str) -> usize {
    value.trim().chars().count()
}

fn check_name(name: &str, errors: &mut ValidationErrors) {
    if char_len(name) < PATIENT_NAME_MIN_CHARS {
        errors.push(
            "name",
            format!("name must have at least {PATIENT_NAME_MIN_CHARS} characters"),
        );
    }
}

fn check_cpf(cpf: &str, errors: &mut ValidationErrors) {
    let len = char_len(cpf);
    if len < CPF_MIN_CHARS {
        errors.push("cpf", format!("CPF must have at least {CPF_MIN_CHARS} characters"));
    } else if len > CPF_MAX_CHARS {
        errors.push("cpf", format!("CPF must have at most {CPF_MAX_CHARS} characters"));
    }
}

fn check_phone(phone: &str, errors: &mut ValidationErrors) {
    if char_len(phone) < PHONE_MIN_CHARS {
        errors.push(
            "phone",
            format!("phone must have at least {PHONE_MIN_CHARS} characters"),
        );
    }
}
