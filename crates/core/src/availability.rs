//! Slot availability.
//!
//! A professional's free slots on a date are the daily schedule minus every slot held by a
//! non-cancelled appointment with that professional on that date. The computation always
//! runs over the store's current appointments, so a cancellation frees its slot for the
//! next query.

use crate::models::Appointment;
use crate::slot::{daily_schedule, Slot};
use crate::store::ClinicStore;
use chrono::NaiveDate;
use std::collections::HashSet;

/// Free slots for `professional_id` on `date`, in schedule order.
///
/// The professional is not looked up: an unknown ID simply has no bookings and gets the
/// full schedule.
pub fn available_slots(
    appointments: &[Appointment],
    date: NaiveDate,
    professional_id: &str,
) -> Vec<Slot> {
    let booked: HashSet<Slot> = appointments
        .iter()
        .filter(|a| a.professional_id == professional_id && a.date == date && a.occupies_slot())
        .map(|a| a.time)
        .collect();

    daily_schedule()
        .into_iter()
        .filter(|slot| !booked.contains(slot))
        .collect()
}

impl ClinicStore {
    pub fn available_slots(&self, date: NaiveDate, professional_id: &str) -> Vec<Slot> {
        available_slots(&self.appointments, date, professional_id)
    }

    /// Whether the professional has at least one free slot on `date`.
    pub fn has_availability(&self, date: NaiveDate, professional_id: &str) -> bool {
        !self.available_slots(date, professional_id).is_empty()
    }

    pub fn is_slot_available(&self, date: NaiveDate, professional_id: &str, slot: Slot) -> bool {
        !self.appointments.iter().any(|a| {
            a.professional_id == professional_id
                && a.date == date
                && a.time == slot
                && a.occupies_slot()
        })
    }
}
