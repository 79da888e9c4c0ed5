//! Clinic records: patients, professionals, appointments and users.
//!
//! These are flat records. Cross-references are by ID (appointment lists on
//! patients/professionals hold appointment IDs), and only the operations in
//! [`crate::store`] keep them in step.

use crate::slot::Slot;
use chrono::{DateTime, NaiveDate, Utc};
use medico_types::{EmailAddress, NonEmptyText};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Patient {
    pub id: String,
    pub name: NonEmptyText,
    /// Brazilian national taxpayer number, as typed (punctuated or not).
    pub cpf: String,
    pub phone: String,
    #[serde(default)]
    pub insurance: String,
    #[serde(default)]
    pub medical_history: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub appointments: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HealthcareProfessional {
    pub id: String,
    pub name: NonEmptyText,
    pub specialty: NonEmptyText,
    #[serde(default)]
    pub appointments: Vec<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AppointmentStatus {
    Scheduled,
    Completed,
    Cancelled,
    NoShow,
}

impl AppointmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Scheduled => "scheduled",
            AppointmentStatus::Completed => "completed",
            AppointmentStatus::Cancelled => "cancelled",
            AppointmentStatus::NoShow => "no-show",
        }
    }

    pub const ALL: [AppointmentStatus; 4] = [
        AppointmentStatus::Scheduled,
        AppointmentStatus::Completed,
        AppointmentStatus::Cancelled,
        AppointmentStatus::NoShow,
    ];
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AppointmentStatus {
    type Err = crate::ClinicError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s.trim())
            .ok_or_else(|| crate::ClinicError::InvalidInput(format!("unknown status '{s}'")))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Insurance,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Paid => "paid",
            PaymentStatus::Insurance => "insurance",
        }
    }

    pub const ALL: [PaymentStatus; 3] = [
        PaymentStatus::Pending,
        PaymentStatus::Paid,
        PaymentStatus::Insurance,
    ];
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PaymentStatus {
    type Err = crate::ClinicError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s.trim())
            .ok_or_else(|| {
                crate::ClinicError::InvalidInput(format!("unknown payment status '{s}'"))
            })
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Appointment {
    pub id: String,
    pub patient_id: String,
    /// Copied from the patient at booking time; not kept in sync afterwards.
    pub patient_name: String,
    pub professional_id: String,
    pub date: NaiveDate,
    pub time: Slot,
    pub status: AppointmentStatus,
    #[serde(default)]
    pub notes: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symptoms: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diagnosis: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prescriptions: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exams: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_status: Option<PaymentStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_amount: Option<f64>,
}

impl Appointment {
    /// Whether this appointment holds its slot in the professional's schedule.
    pub fn occupies_slot(&self) -> bool {
        self.status != AppointmentStatus::Cancelled
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Professional,
    Patient,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Professional => "professional",
            UserRole::Patient => "patient",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for UserRole {
    type Err = crate::ClinicError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "professional" => Ok(UserRole::Professional),
            "patient" => Ok(UserRole::Patient),
            other => Err(crate::ClinicError::InvalidInput(format!(
                "unknown role '{other}'"
            ))),
        }
    }
}

/// A login identity. `profile_id` points at a patient or a professional depending on `role`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct User {
    pub id: String,
    pub name: NonEmptyText,
    pub email: EmailAddress,
    pub role: UserRole,
    pub profile_id: String,
}

/// The record a [`User`] resolves to.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Profile {
    Patient(Patient),
    Professional(HealthcareProfessional),
}

impl Profile {
    pub fn id(&self) -> &str {
        match self {
            Profile::Patient(p) => &p.id,
            Profile::Professional(p) => &p.id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Profile::Patient(p) => p.name.as_str(),
            Profile::Professional(p) => p.name.as_str(),
        }
    }
}

/// Fields supplied when registering a patient; the store assigns the rest.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewPatient {
    pub name: NonEmptyText,
    pub cpf: String,
    pub phone: String,
    pub insurance: String,
    pub medical_history: String,
}

/// Partial patient update. `None` leaves a field untouched.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PatientUpdate {
    pub name: Option<NonEmptyText>,
    pub cpf: Option<String>,
    pub phone: Option<String>,
    pub insurance: Option<String>,
    pub medical_history: Option<String>,
}

impl PatientUpdate {
    pub(crate) fn apply(self, patient: &mut Patient) {
        if let Some(name) = self.name {
            patient.name = name;
        }
        if let Some(cpf) = self.cpf {
            patient.cpf = cpf;
        }
        if let Some(phone) = self.phone {
            patient.phone = phone;
        }
        if let Some(insurance) = self.insurance {
            patient.insurance = insurance;
        }
        if let Some(medical_history) = self.medical_history {
            patient.medical_history = medical_history;
        }
    }
}

/// Everything about an appointment except its ID.
#[derive(Clone, Debug, PartialEq)]
pub struct NewAppointment {
    pub patient_id: String,
    pub patient_name: String,
    pub professional_id: String,
    pub date: NaiveDate,
    pub time: Slot,
    pub status: AppointmentStatus,
    pub notes: String,
    pub symptoms: Option<String>,
    pub diagnosis: Option<String>,
    pub prescriptions: Option<Vec<String>>,
    pub exams: Option<Vec<String>>,
    pub payment_status: Option<PaymentStatus>,
    pub payment_amount: Option<f64>,
}

impl NewAppointment {
    /// A freshly booked appointment: scheduled, payment pending, no clinical data.
    pub fn scheduled(
        patient_id: impl Into<String>,
        patient_name: impl Into<String>,
        professional_id: impl Into<String>,
        date: NaiveDate,
        time: Slot,
        notes: impl Into<String>,
    ) -> Self {
        Self {
            patient_id: patient_id.into(),
            patient_name: patient_name.into(),
            professional_id: professional_id.into(),
            date,
            time,
            status: AppointmentStatus::Scheduled,
            notes: notes.into(),
            symptoms: None,
            diagnosis: None,
            prescriptions: None,
            exams: None,
            payment_status: Some(PaymentStatus::Pending),
            payment_amount: None,
        }
    }

    pub(crate) fn into_appointment(self, id: String) -> Appointment {
        Appointment {
            id,
            patient_id: self.patient_id,
            patient_name: self.patient_name,
            professional_id: self.professional_id,
            date: self.date,
            time: self.time,
            status: self.status,
            notes: self.notes,
            symptoms: self.symptoms,
            diagnosis: self.diagnosis,
            prescriptions: self.prescriptions,
            exams: self.exams,
            payment_status: self.payment_status,
            payment_amount: self.payment_amount,
        }
    }
}

/// Partial appointment update. `None` leaves a field untouched.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AppointmentUpdate {
    pub date: Option<NaiveDate>,
    pub time: Option<Slot>,
    pub status: Option<AppointmentStatus>,
    pub notes: Option<String>,
    pub symptoms: Option<String>,
    pub diagnosis: Option<String>,
    pub prescriptions: Option<Vec<String>>,
    pub exams: Option<Vec<String>>,
    pub payment_status: Option<PaymentStatus>,
    pub payment_amount: Option<f64>,
}

impl AppointmentUpdate {
    pub fn status(status: AppointmentStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    pub(crate) fn apply(self, appointment: &mut Appointment) {
        if let Some(date) = self.date {
            appointment.date = date;
        }
        if let Some(time) = self.time {
            appointment.time = time;
        }
        if let Some(status) = self.status {
            appointment.status = status;
        }
        if let Some(notes) = self.notes {
            appointment.notes = notes;
        }
        if self.symptoms.is_some() {
            appointment.symptoms = self.symptoms;
        }
        if self.diagnosis.is_some() {
            appointment.diagnosis = self.diagnosis;
        }
        if self.prescriptions.is_some() {
            appointment.prescriptions = self.prescriptions;
        }
        if self.exams.is_some() {
            appointment.exams = self.exams;
        }
        if self.payment_status.is_some() {
            appointment.payment_status = self.payment_status;
        }
        if self.payment_amount.is_some() {
            appointment.payment_amount = self.payment_amount;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_wire_names_match_original_values() {
        let json = serde_json::to_string(&AppointmentStatus::NoShow).unwrap();
        assert_eq!(json, "\"no-show\"");
        let parsed: AppointmentStatus = "no-show".parse().unwrap();
        assert_eq!(parsed, AppointmentStatus::NoShow);
        assert!("noshow".parse::<AppointmentStatus>().is_err());
    }

    #[test]
    fn cancelled_appointments_release_their_slot() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
        let mut appointment = NewAppointment::scheduled(
            "pat1",
            "João Santos",
            "prof1",
            date,
            Slot::parse("09:00").unwrap(),
            "",
        )
        .into_appointment("app1".into());
        assert!(appointment.occupies_slot());

        appointment.status = AppointmentStatus::NoShow;
        assert!(appointment.occupies_slot());

        appointment.status = AppointmentStatus::Cancelled;
        assert!(!appointment.occupies_slot());
    }

    #[test]
    fn appointment_update_only_touches_supplied_fields() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
        let mut appointment = NewAppointment::scheduled(
            "pat1",
            "João Santos",
            "prof1",
            date,
            Slot::parse("09:00").unwrap(),
            "primeira consulta",
        )
        .into_appointment("app1".into());

        AppointmentUpdate {
            diagnosis: Some("Infecção viral".into()),
            ..AppointmentUpdate::default()
        }
        .apply(&mut appointment);

        assert_eq!(appointment.diagnosis.as_deref(), Some("Infecção viral"));
        assert_eq!(appointment.notes, "primeira consulta");
        assert_eq!(appointment.status, AppointmentStatus::Scheduled);
        assert_eq!(appointment.payment_status, Some(PaymentStatus::Pending));
    }

    #[test]
    fn role_parses_from_wire_name() {
        assert_eq!("patient".parse::<UserRole>().unwrap(), UserRole::Patient);
        assert!("admin".parse::<UserRole>().is_err());
    }
}
