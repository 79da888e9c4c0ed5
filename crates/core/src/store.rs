//! In-memory clinic state.
//!
//! [`ClinicStore`] is the single shared state object: current user, users, patients,
//! professionals and appointments. Mutations are applied immediately. A mutation that fails
//! a guard (unknown ID) returns an error and leaves the store untouched.
//!
//! Nothing here is persisted; a new process starts again from the seed.

use crate::constants::{APPOINTMENT_ID_PREFIX, PATIENT_ID_PREFIX};
use crate::error::{ClinicError, ClinicResult};
use crate::models::{
    Appointment, AppointmentStatus, AppointmentUpdate, HealthcareProfessional, NewAppointment,
    NewPatient, Patient, PatientUpdate, User,
};
use crate::seed::SeedData;
use chrono::Utc;

#[derive(Clone, Debug, Default)]
pub struct ClinicStore {
    pub(crate) current_user: Option<String>,
    pub(crate) users: Vec<User>,
    pub(crate) patients: Vec<Patient>,
    pub(crate) professionals: Vec<HealthcareProfessional>,
    pub(crate) appointments: Vec<Appointment>,
}

impl ClinicStore {
    /// Builds a store from seed data, linking every appointment into its patient's and
    /// professional's appointment lists.
    pub fn from_seed(seed: SeedData) -> Self {
        let SeedData {
            users,
            patients,
            professionals,
            appointments,
        } = seed;

        let mut store = Self {
            current_user: None,
            users,
            patients,
            professionals,
            appointments,
        };

        let links: Vec<(String, String, String)> = store
            .appointments
            .iter()
            .map(|a| (a.id.clone(), a.patient_id.clone(), a.professional_id.clone()))
            .collect();
        for (appointment_id, patient_id, professional_id) in links {
            store.link_appointment(&appointment_id, &patient_id, &professional_id);
        }

        tracing::debug!(
            users = store.users.len(),
            patients = store.patients.len(),
            professionals = store.professionals.len(),
            appointments = store.appointments.len(),
            "clinic store seeded"
        );

        store
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn patients(&self) -> &[Patient] {
        &self.patients
    }

    pub fn professionals(&self) -> &[HealthcareProfessional] {
        &self.professionals
    }

    pub fn appointments(&self) -> &[Appointment] {
        &self.appointments
    }

    pub fn user(&self, id: &str) -> Option<&User> {
        self.users.iter().find(|u| u.id == id)
    }

    pub fn patient(&self, id: &str) -> Option<&Patient> {
        self.patients.iter().find(|p| p.id == id)
    }

    pub fn professional(&self, id: &str) -> Option<&HealthcareProfessional> {
        self.professionals.iter().find(|p| p.id == id)
    }

    pub fn appointment(&self, id: &str) -> Option<&Appointment> {
        self.appointments.iter().find(|a| a.id == id)
    }

    pub fn appointments_for_patient<'a>(
        &'a self,
        patient_id: &'a str,
    ) -> impl Iterator<Item = &'a Appointment> + 'a {
        self.appointments
            .iter()
            .filter(move |a| a.patient_id == patient_id)
    }

    pub fn appointments_for_professional<'a>(
        &'a self,
        professional_id: &'a str,
    ) -> impl Iterator<Item = &'a Appointment> + 'a {
        self.appointments
            .iter()
            .filter(move |a| a.professional_id == professional_id)
    }

    /// Filters patients by name (case-insensitive), CPF or phone substring.
    pub fn search_patients(&self, query: &str) -> Vec<&Patient> {
        let query = query.trim();
        let lowered = query.to_lowercase();
        self.patients
            .iter()
            .filter(|p| {
                p.name.as_str().to_lowercase().contains(&lowered)
                    || p.cpf.contains(query)
                    || p.phone.contains(query)
            })
            .collect()
    }

    /// Registers a patient with a fresh ID, the current timestamp and no appointments.
    pub fn add_patient(&mut self, new: NewPatient) -> Patient {
        let id = next_id(PATIENT_ID_PREFIX, self.patients.iter().map(|p| p.id.as_str()));
        let patient = Patient {
            id,
            name: new.name,
            cpf: new.cpf,
            phone: new.phone,
            insurance: new.insurance,
            medical_history: new.medical_history,
            created_at: Utc::now(),
            appointments: Vec::new(),
        };
        tracing::info!(patient_id = %patient.id, name = %patient.name, "patient registered");
        self.patients.push(patient.clone());
        patient
    }

    pub fn update_patient(
        &mut self,
        patient_id: &str,
        changes: PatientUpdate,
    ) -> ClinicResult<Patient> {
        let patient = self
            .patients
            .iter_mut()
            .find(|p| p.id == patient_id)
            .ok_or_else(|| ClinicError::PatientNotFound(patient_id.to_string()))?;
        changes.apply(patient);
        tracing::info!(patient_id, "patient updated");
        Ok(patient.clone())
    }

    /// Appends an appointment and records its ID on the patient and the professional.
    ///
    /// No existence or availability checks happen here; see [`crate::booking`] for the
    /// guarded entry points.
    pub fn add_appointment(&mut self, new: NewAppointment) -> Appointment {
        let id = next_id(
            APPOINTMENT_ID_PREFIX,
            self.appointments.iter().map(|a| a.id.as_str()),
        );
        let appointment = new.into_appointment(id);
        self.link_appointment(
            &appointment.id,
            &appointment.patient_id,
            &appointment.professional_id,
        );
        tracing::info!(
            appointment_id = %appointment.id,
            professional_id = %appointment.professional_id,
            date = %appointment.date,
            time = %appointment.time,
            "appointment scheduled"
        );
        self.appointments.push(appointment.clone());
        appointment
    }

    /// Merges `changes` into an appointment.
    ///
    /// Moving an appointment to another date or slot, or bringing a cancelled one back, is
    /// rejected with [`ClinicError::SlotUnavailable`] when another live appointment already
    /// holds the target slot. Nothing is written on failure.
    pub fn update_appointment(
        &mut self,
        appointment_id: &str,
        changes: AppointmentUpdate,
    ) -> ClinicResult<Appointment> {
        let index = self
            .appointments
            .iter()
            .position(|a| a.id == appointment_id)
            .ok_or_else(|| ClinicError::AppointmentNotFound(appointment_id.to_string()))?;
        self.ensure_target_slot_free(&self.appointments[index], &changes)?;

        let appointment = &mut self.appointments[index];
        let status_change = changes.status;
        changes.apply(appointment);
        match status_change {
            Some(status) => tracing::info!(appointment_id, %status, "appointment status changed"),
            None => tracing::info!(appointment_id, "appointment updated"),
        }
        Ok(appointment.clone())
    }

    pub fn cancel_appointment(&mut self, appointment_id: &str) -> ClinicResult<Appointment> {
        self.update_appointment(
            appointment_id,
            AppointmentUpdate::status(AppointmentStatus::Cancelled),
        )
    }

    fn ensure_target_slot_free(
        &self,
        current: &Appointment,
        changes: &AppointmentUpdate,
    ) -> ClinicResult<()> {
        let date = changes.date.unwrap_or(current.date);
        let time = changes.time.unwrap_or(current.time);
        let status = changes.status.unwrap_or(current.status);
        let moved = date != current.date || time != current.time;
        let revived = !current.occupies_slot();
        if status == AppointmentStatus::Cancelled || !(moved || revived) {
            return Ok(());
        }

        let taken = self.appointments.iter().any(|a| {
            a.id != current.id
                && a.professional_id == current.professional_id
                && a.date == date
                && a.time == time
                && a.occupies_slot()
        });
        if taken {
            tracing::warn!(
                appointment_id = %current.id,
                professional_id = %current.professional_id,
                %date,
                %time,
                "slot already taken"
            );
            return Err(ClinicError::SlotUnavailable {
                professional_id: current.professional_id.clone(),
                date,
                time,
            });
        }
        Ok(())
    }

    fn link_appointment(&mut self, appointment_id: &str, patient_id: &str, professional_id: &str) {
        if let Some(patient) = self.patients.iter_mut().find(|p| p.id == patient_id) {
            if !patient.appointments.iter().any(|id| id == appointment_id) {
                patient.appointments.push(appointment_id.to_string());
            }
        }
        if let Some(professional) = self
            .professionals
            .iter_mut()
            .find(|p| p.id == professional_id)
        {
            if !professional.appointments.iter().any(|id| id == appointment_id) {
                professional.appointments.push(appointment_id.to_string());
            }
        }
    }
}

/// `{prefix}{n}` where `n` is one past the highest numeric suffix already in use.
pub(crate) fn next_id<'a>(prefix: &str, existing: impl Iterator<Item = &'a str>) -> String {
    let highest = existing
        .filter_map(|id| id.strip_prefix(prefix))
        .filter_map(|suffix| suffix.parse::<u64>().ok())
        .max()
        .unwrap_or(0);
    format!("{prefix}{}", highest + 1)
}
