//! Monthly revenue summary for a professional.

use crate::models::{AppointmentStatus, PaymentStatus};
use crate::store::ClinicStore;
use chrono::Datelike;
use serde::Serialize;

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct FinancialOverview {
    pub professional_id: String,
    pub year: i32,
    pub month: u32,
    /// Sum of payment amounts; a completed appointment without an amount adds nothing.
    pub total_revenue: f64,
    pub completed_appointments: usize,
    /// `total_revenue / completed_appointments`, or 0 for an empty month.
    pub average_ticket: f64,
    pub paid: usize,
    pub pending: usize,
    pub insurance: usize,
}

impl ClinicStore {
    /// Revenue from the professional's completed appointments in one calendar month.
    pub fn financial_overview(
        &self,
        professional_id: &str,
        year: i32,
        month: u32,
    ) -> FinancialOverview {
        let mut overview = FinancialOverview {
            professional_id: professional_id.to_string(),
            year,
            month,
            ..FinancialOverview::default()
        };

        for appointment in self
            .appointments_for_professional(professional_id)
            .filter(|a| a.status == AppointmentStatus::Completed)
            .filter(|a| a.date.year() == year && a.date.month() == month)
        {
            overview.completed_appointments += 1;
            overview.total_revenue += appointment.payment_amount.unwrap_or(0.0);
            match appointment.payment_status {
                Some(PaymentStatus::Paid) => overview.paid += 1,
                Some(PaymentStatus::Pending) => overview.pending += 1,
                Some(PaymentStatus::Insurance) => overview.insurance += 1,
                None => {}
            }
        }

        if overview.completed_appointments > 0 {
            overview.average_ticket =
                overview.total_revenue / overview.completed_appointments as f64;
        }
        overview
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AppointmentUpdate, NewAppointment};
    use crate::seed::default_seed;
    use crate::slot::Slot;
    use chrono::NaiveDate;

    fn completed(
        store: &mut ClinicStore,
        date: NaiveDate,
        payment: PaymentStatus,
        amount: Option<f64>,
    ) -> String {
        let id = store
            .add_appointment(NewAppointment::scheduled(
                "pat1",
                "João Santos",
                "prof1",
                date,
                Slot::parse("09:00").unwrap(),
                "",
            ))
            .id;
        store
            .update_appointment(
                &id,
                AppointmentUpdate {
                    status: Some(AppointmentStatus::Completed),
                    payment_status: Some(payment),
                    payment_amount: amount,
                    ..AppointmentUpdate::default()
                },
            )
            .unwrap();
        id
    }

    #[test]
    fn sums_completed_appointments_in_month() {
        let mut store = ClinicStore::from_seed(default_seed(
            NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
            1,
            0,
        ));
        let march = |d| NaiveDate::from_ymd_opt(2025, 3, d).unwrap();
        completed(&mut store, march(3), PaymentStatus::Paid, Some(200.0));
        completed(&mut store, march(4), PaymentStatus::Insurance, Some(150.0));
        completed(&mut store, march(5), PaymentStatus::Pending, None);
        completed(
            &mut store,
            NaiveDate::from_ymd_opt(2025, 4, 1).unwrap(),
            PaymentStatus::Paid,
            Some(999.0),
        );
        store.add_appointment(NewAppointment::scheduled(
            "pat1",
            "João Santos",
            "prof1",
            march(6),
            Slot::parse("10:00").unwrap(),
            "",
        ));

        let overview = store.financial_overview("prof1", 2025, 3);
        assert_eq!(overview.completed_appointments, 3);
        assert_eq!(overview.total_revenue, 350.0);
        assert!((overview.average_ticket - 350.0 / 3.0).abs() < 1e-9);
        assert_eq!((overview.paid, overview.pending, overview.insurance), (1, 1, 1));
    }

    #[test]
    fn empty_month_has_zero_average() {
        let store = ClinicStore::default();
        let overview = store.financial_overview("prof1", 2025, 2);
        assert_eq!(overview.completed_appointments, 0);
        assert_eq!(overview.average_ticket, 0.0);
        assert_eq!(overview.total_revenue, 0.0);
    }
}
