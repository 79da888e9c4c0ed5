//! Consultation records and the patient's view of their history.

use crate::error::{ClinicError, ClinicResult};
use crate::models::{Appointment, AppointmentStatus, AppointmentUpdate};
use crate::store::ClinicStore;
use chrono::NaiveDate;
use serde::Serialize;

/// What the professional writes down during a consultation.
///
/// `prescriptions` and `exams` are free text with one item per line.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ConsultationNotes {
    pub notes: String,
    pub symptoms: String,
    pub diagnosis: String,
    pub prescriptions: String,
    pub exams: String,
}

/// Splits free text into trimmed, non-blank lines.
pub fn split_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// A patient's completed consultations and everything prescribed or ordered in them.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MedicalRecords {
    /// Completed appointments, newest first.
    pub consultations: Vec<Appointment>,
    /// Distinct prescriptions in first-seen order.
    pub prescriptions: Vec<String>,
    /// Distinct exams in first-seen order.
    pub exams: Vec<String>,
}

/// A patient's appointments split around `today`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PatientAgenda {
    /// Scheduled appointments from `today` on, soonest first.
    pub upcoming: Vec<Appointment>,
    /// Everything else, most recent first.
    pub past: Vec<Appointment>,
}

/// Whether the appointment can still be cancelled.
pub fn can_cancel(appointment: &Appointment, today: NaiveDate) -> bool {
    appointment.status == AppointmentStatus::Scheduled && appointment.date >= today
}

fn push_distinct(target: &mut Vec<String>, items: Option<&Vec<String>>) {
    for item in items.into_iter().flatten() {
        if !target.contains(item) {
            target.push(item.clone());
        }
    }
}

impl ClinicStore {
    /// Save the consultation and mark the appointment completed.
    ///
    /// # Errors
    ///
    /// Returns [`ClinicError::AppointmentNotFound`] for an unknown ID.
    pub fn record_consultation(
        &mut self,
        appointment_id: &str,
        consultation: ConsultationNotes,
    ) -> ClinicResult<Appointment> {
        let update = AppointmentUpdate {
            status: Some(AppointmentStatus::Completed),
            notes: Some(consultation.notes),
            symptoms: Some(consultation.symptoms),
            diagnosis: Some(consultation.diagnosis),
            prescriptions: Some(split_lines(&consultation.prescriptions)),
            exams: Some(split_lines(&consultation.exams)),
            ..AppointmentUpdate::default()
        };
        self.update_appointment(appointment_id, update)
    }

    pub fn complete_appointment(&mut self, appointment_id: &str) -> ClinicResult<Appointment> {
        self.update_appointment(
            appointment_id,
            AppointmentUpdate::status(AppointmentStatus::Completed),
        )
    }

    /// # Errors
    ///
    /// Returns [`ClinicError::PatientNotFound`] for an unknown patient.
    pub fn medical_records(&self, patient_id: &str) -> ClinicResult<MedicalRecords> {
        self.patient(patient_id)
            .ok_or_else(|| ClinicError::PatientNotFound(patient_id.to_string()))?;

        let mut consultations: Vec<Appointment> = self
            .appointments_for_patient(patient_id)
            .filter(|a| a.status == AppointmentStatus::Completed)
            .cloned()
            .collect();
        consultations.sort_by(|a, b| (b.date, b.time).cmp(&(a.date, a.time)));

        let mut prescriptions = Vec::new();
        let mut exams = Vec::new();
        for consultation in &consultations {
            push_distinct(&mut prescriptions, consultation.prescriptions.as_ref());
            push_distinct(&mut exams, consultation.exams.as_ref());
        }

        Ok(MedicalRecords {
            consultations,
            prescriptions,
            exams,
        })
    }

    /// # Errors
    ///
    /// Returns [`ClinicError::PatientNotFound`] for an unknown patient.
    pub fn patient_agenda(
        &self,
        patient_id: &str,
        today: NaiveDate,
    ) -> ClinicResult<PatientAgenda> {
        self.patient(patient_id)
            .ok_or_else(|| ClinicError::PatientNotFound(patient_id.to_string()))?;

        let (mut upcoming, mut past): (Vec<Appointment>, Vec<Appointment>) = self
            .appointments_for_patient(patient_id)
            .cloned()
            .partition(|a| can_cancel(a, today));
        upcoming.sort_by(|a, b| (a.date, a.time).cmp(&(b.date, b.time)));
        past.sort_by(|a, b| (b.date, b.time).cmp(&(a.date, a.time)));

        Ok(PatientAgenda { upcoming, past })
    }
}
