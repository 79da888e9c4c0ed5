//! A professional's calendar views.

use crate::models::{Appointment, AppointmentStatus};
use crate::store::ClinicStore;
use chrono::NaiveDate;
use std::collections::BTreeSet;

impl ClinicStore {
    /// All of the professional's appointments on `date`, any status, in slot order.
    pub fn day_agenda(&self, professional_id: &str, date: NaiveDate) -> Vec<Appointment> {
        let mut day: Vec<Appointment> = self
            .appointments_for_professional(professional_id)
            .filter(|a| a.date == date)
            .cloned()
            .collect();
        day.sort_by_key(|a| a.time);
        day
    }

    /// Distinct dates, ascending, on which the professional has a scheduled appointment.
    pub fn dates_with_scheduled(&self, professional_id: &str) -> Vec<NaiveDate> {
        self.appointments_for_professional(professional_id)
            .filter(|a| a.status == AppointmentStatus::Scheduled)
            .map(|a| a.date)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewAppointment;
    use crate::seed::default_seed;
    use crate::slot::Slot;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, d).unwrap()
    }

    fn book(store: &mut ClinicStore, professional_id: &str, day: u32, at: &str) -> String {
        store
            .add_appointment(NewAppointment::scheduled(
                "pat2",
                "Maria Oliveira",
                professional_id,
                date(day),
                Slot::parse(at).unwrap(),
                "",
            ))
            .id
    }

    #[test]
    fn day_agenda_is_sorted_by_slot() {
        let mut store = ClinicStore::from_seed(default_seed(date(1), 1, 0));
        let late = book(&mut store, "prof1", 5, "15:30");
        let early = book(&mut store, "prof1", 5, "08:30");
        book(&mut store, "prof1", 6, "08:00");
        book(&mut store, "prof2", 5, "08:00");
        store.cancel_appointment(&late).unwrap();

        let ids: Vec<String> = store
            .day_agenda("prof1", date(5))
            .into_iter()
            .map(|a| a.id)
            .collect();
        assert_eq!(ids, vec![early, late]);
    }

    #[test]
    fn highlighted_dates_only_count_scheduled() {
        let mut store = ClinicStore::from_seed(default_seed(date(1), 1, 0));
        book(&mut store, "prof1", 9, "08:00");
        book(&mut store, "prof1", 9, "09:00");
        book(&mut store, "prof1", 4, "08:00");
        let cancelled = book(&mut store, "prof1", 7, "08:00");
        store.cancel_appointment(&cancelled).unwrap();

        assert_eq!(store.dates_with_scheduled("prof1"), vec![date(4), date(9)]);
        assert!(store.dates_with_scheduled("prof2").is_empty());
    }
}
