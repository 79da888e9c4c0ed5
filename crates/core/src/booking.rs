//! Guarded appointment creation.
//!
//! Two entry points mirror the two sides of the clinic:
//! - a logged-in patient books themselves with a professional ([`BookingForm`]);
//! - a logged-in professional schedules a patient into their own agenda ([`AppointmentForm`]).
//!
//! Both run the same pipeline: field validation, existence checks, then a slot check against
//! the live appointment list. Any failure returns before the store is touched.

use crate::error::{ClinicError, ClinicResult, ValidationErrors};
use crate::models::{Appointment, NewAppointment, UserRole};
use crate::slot::Slot;
use crate::store::ClinicStore;
use chrono::NaiveDate;

/// Patient self-booking form. Empty strings count as missing.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BookingForm {
    pub professional_id: String,
    /// `YYYY-MM-DD`.
    pub date: String,
    /// `HH:MM`, one of the daily slots.
    pub time: String,
}

/// Professional-side scheduling form. Empty strings count as missing; notes are optional.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AppointmentForm {
    pub patient_id: String,
    pub date: String,
    pub time: String,
    pub notes: String,
}

fn required<'a>(
    field: &'static str,
    value: &'a str,
    errors: &mut ValidationErrors,
) -> Option<&'a str> {
    let value = value.trim();
    if value.is_empty() {
        errors.push(field, format!("{field} is required"));
        None
    } else {
        Some(value)
    }
}

/// Parses the date and slot fields, recording a field error for each that is missing or
/// malformed.
fn parse_when(date: &str, time: &str, errors: &mut ValidationErrors) -> Option<(NaiveDate, Slot)> {
    let date = required("date", date, errors).and_then(|raw| {
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map_err(|_| errors.push("date", format!("'{raw}' is not a YYYY-MM-DD date")))
            .ok()
    });
    let time = required("time", time, errors).and_then(|raw| {
        Slot::parse(raw)
            .map_err(|_| errors.push("time", format!("'{raw}' is not a clinic slot")))
            .ok()
    });
    date.zip(time)
}

impl ClinicStore {
    /// Book an appointment for the logged-in patient.
    ///
    /// # Errors
    ///
    /// - [`ClinicError::Validation`] when a field or the current user is missing, or a
    ///   field is malformed.
    /// - [`ClinicError::WrongRole`] when the current user is not a patient.
    /// - [`ClinicError::ProfessionalNotFound`] for an unknown professional.
    /// - [`ClinicError::SlotUnavailable`] when the slot is already taken.
    pub fn book_for_current_patient(&mut self, form: &BookingForm) -> ClinicResult<Appointment> {
        let mut errors = ValidationErrors::new();
        if self.current_user().is_none() {
            errors.push("user", "you must be logged in to book");
        }
        let professional_id = required("professional_id", &form.professional_id, &mut errors);
        let when = parse_when(&form.date, &form.time, &mut errors);
        errors.into_result()?;

        let (Some(professional_id), Some((date, time))) = (professional_id, when) else {
            return Err(ClinicError::InvalidInput("incomplete booking form".into()));
        };

        let user = self.require_role(UserRole::Patient)?;
        let (patient_id, patient_name) = (user.profile_id.clone(), user.name.to_string());

        if self.professional(professional_id).is_none() {
            return Err(ClinicError::ProfessionalNotFound(professional_id.to_string()));
        }
        self.ensure_slot_free(professional_id, date, time)?;

        Ok(self.add_appointment(NewAppointment::scheduled(
            patient_id,
            patient_name,
            professional_id,
            date,
            time,
            "",
        )))
    }

    /// Schedule a patient into the logged-in professional's agenda.
    ///
    /// # Errors
    ///
    /// - [`ClinicError::NotLoggedIn`] or [`ClinicError::WrongRole`] unless a professional is
    ///   logged in.
    /// - [`ClinicError::Validation`] for missing or malformed fields.
    /// - [`ClinicError::PatientNotFound`] / [`ClinicError::ProfessionalNotFound`] for
    ///   unknown records.
    /// - [`ClinicError::SlotUnavailable`] when the slot is already taken.
    pub fn schedule_for_current_professional(
        &mut self,
        form: &AppointmentForm,
    ) -> ClinicResult<Appointment> {
        let professional_id = self.require_role(UserRole::Professional)?.profile_id.clone();

        let mut errors = ValidationErrors::new();
        let patient_id = required("patient_id", &form.patient_id, &mut errors);
        let when = parse_when(&form.date, &form.time, &mut errors);
        errors.into_result()?;

        let (Some(patient_id), Some((date, time))) = (patient_id, when) else {
            return Err(ClinicError::InvalidInput("incomplete appointment form".into()));
        };

        let patient_name = self
            .patient(patient_id)
            .map(|p| p.name.to_string())
            .ok_or_else(|| ClinicError::PatientNotFound(patient_id.to_string()))?;
        if self.professional(&professional_id).is_none() {
            return Err(ClinicError::ProfessionalNotFound(professional_id));
        }
        self.ensure_slot_free(&professional_id, date, time)?;

        Ok(self.add_appointment(NewAppointment::scheduled(
            patient_id,
            patient_name,
            professional_id,
            date,
            time,
            form.notes.trim(),
        )))
    }

    fn ensure_slot_free(
        &self,
        professional_id: &str,
        date: NaiveDate,
        time: Slot,
    ) -> ClinicResult<()> {
        if self.is_slot_available(date, professional_id, time) {
            Ok(())
        } else {
            tracing::warn!(professional_id, %date, %time, "slot already taken");
            Err(ClinicError::SlotUnavailable {
                professional_id: professional_id.to_string(),
                date,
                time,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AppointmentStatus, PaymentStatus};
    use crate::seed::default_seed;

    fn store() -> ClinicStore {
        ClinicStore::from_seed(default_seed(NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(), 1, 0))
    }

    fn booking(professional_id: &str, date: &str, time: &str) -> BookingForm {
        BookingForm {
            professional_id: professional_id.into(),
            date: date.into(),
            time: time.into(),
        }
    }

    fn fields(err: ClinicError) -> Vec<&'static str> {
        match err {
            ClinicError::Validation(errors) => errors.fields().iter().map(|e| e.field).collect(),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn patient_books_with_professional() {
        let mut store = store();
        store.login("user2").unwrap();

        let appointment = store
            .book_for_current_patient(&booking("prof1", "2025-03-12", "08:00"))
            .expect("slot is free");

        assert_eq!(appointment.patient_id, "pat1");
        assert_eq!(appointment.patient_name, "João Santos");
        assert_eq!(appointment.status, AppointmentStatus::Scheduled);
        assert_eq!(appointment.payment_status, Some(PaymentStatus::Pending));
        assert_eq!(appointment.notes, "");
        assert!(store.patient("pat1").unwrap().appointments.contains(&appointment.id));
    }

    #[test]
    fn booking_flow_removes_and_restores_slot() {
        let mut store = store();
        store.login("user2").unwrap();
        let day = NaiveDate::from_ymd_opt(2025, 3, 12).unwrap();
        assert_eq!(store.available_slots(day, "prof1").len(), 16);

        let appointment = store
            .book_for_current_patient(&booking("prof1", "2025-03-12", "08:00"))
            .unwrap();
        let free = store.available_slots(day, "prof1");
        assert_eq!(free.len(), 15);
        assert!(!free.contains(&Slot::parse("08:00").unwrap()));

        store.cancel_appointment(&appointment.id).unwrap();
        assert_eq!(store.available_slots(day, "prof1").len(), 16);
    }

    #[test]
    fn incomplete_form_lists_missing_fields_and_creates_nothing() {
        let mut store = store();
        let err = store
            .book_for_current_patient(&booking("", "2025-03-12", " "))
            .unwrap_err();

        assert_eq!(fields(err), vec!["user", "professional_id", "time"]);
        assert!(store.appointments().is_empty());
    }

    #[test]
    fn unknown_professional_creates_nothing() {
        let mut store = store();
        store.login("user3").unwrap();
        let err = store
            .book_for_current_patient(&booking("prof9", "2025-03-12", "09:00"))
            .unwrap_err();

        assert!(matches!(err, ClinicError::ProfessionalNotFound(id) if id == "prof9"));
        assert!(store.appointments().is_empty());
        assert!(store.patient("pat2").unwrap().appointments.is_empty());
    }

    #[test]
    fn taken_slot_is_rejected() {
        let mut store = store();
        store.login("user2").unwrap();
        store
            .book_for_current_patient(&booking("prof2", "2025-03-12", "14:00"))
            .unwrap();

        store.login("user3").unwrap();
        let err = store
            .book_for_current_patient(&booking("prof2", "2025-03-12", "14:00"))
            .unwrap_err();
        assert!(matches!(err, ClinicError::SlotUnavailable { .. }));
        assert_eq!(store.appointments().len(), 1);

        // Another professional is still free at that time.
        assert!(store
            .book_for_current_patient(&booking("prof1", "2025-03-12", "14:00"))
            .is_ok());
    }

    #[test]
    fn malformed_date_and_off_schedule_time_are_field_errors() {
        let mut store = store();
        store.login("user2").unwrap();
        let err = store
            .book_for_current_patient(&booking("prof1", "12/03/2025", "12:00"))
            .unwrap_err();
        assert_eq!(fields(err), vec!["date", "time"]);
    }

    #[test]
    fn professional_cannot_self_book_as_patient() {
        let mut store = store();
        store.login("user1").unwrap();
        let err = store
            .book_for_current_patient(&booking("prof2", "2025-03-12", "09:00"))
            .unwrap_err();
        assert!(matches!(err, ClinicError::WrongRole { .. }));
        assert!(store.appointments().is_empty());
    }

    #[test]
    fn professional_schedules_patient_with_notes() {
        let mut store = store();
        store.login("user1").unwrap();
        let appointment = store
            .schedule_for_current_professional(&AppointmentForm {
                patient_id: "pat3".into(),
                date: "2025-03-14".into(),
                time: "16:30".into(),
                notes: "retorno".into(),
            })
            .unwrap();

        assert_eq!(appointment.professional_id, "prof1");
        assert_eq!(appointment.patient_name, "Pedro Almeida");
        assert_eq!(appointment.notes, "retorno");
        assert!(store.professional("prof1").unwrap().appointments.contains(&appointment.id));
    }

    #[test]
    fn scheduling_unknown_patient_creates_nothing() {
        let mut store = store();
        store.login("user1").unwrap();
        let err = store
            .schedule_for_current_professional(&AppointmentForm {
                patient_id: "pat42".into(),
                date: "2025-03-14".into(),
                time: "16:30".into(),
                notes: String::new(),
            })
            .unwrap_err();
        assert!(matches!(err, ClinicError::PatientNotFound(_)));
        assert!(store.appointments().is_empty());
    }

    #[test]
    fn scheduling_requires_professional_session() {
        let mut store = store();
        let form = AppointmentForm {
            patient_id: "pat1".into(),
            date: "2025-03-14".into(),
            time: "08:00".into(),
            notes: String::new(),
        };
        assert!(matches!(
            store.schedule_for_current_professional(&form),
            Err(ClinicError::NotLoggedIn)
        ));

        store.login("user2").unwrap();
        assert!(matches!(
            store.schedule_for_current_professional(&form),
            Err(ClinicError::WrongRole { .. })
        ));
    }
}
