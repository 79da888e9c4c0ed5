//! Seed data for the in-memory store.
//!
//! Two sources are supported:
//! - the built-in clinic (three users, three patients, two professionals) with appointments
//!   generated from a seeded RNG, so a given seed and start date always yield the same data;
//! - a YAML file with the same shape as [`SeedData`], parsed strictly.
//!
//! ## YAML layout
//!
//! ```yaml
//! users:
//!   - { id: user1, name: Dr. Ana Silva, email: ana.silva@example.com, role: professional, profile_id: prof1 }
//! patients: [...]
//! professionals: [...]
//! appointments: [...]
//! ```

use crate::config::{CoreConfig, SeedSource};
use crate::constants::{APPOINTMENT_ID_PREFIX, DEFAULT_SEED_HORIZON_DAYS};
use crate::error::{ClinicError, ClinicResult};
use crate::models::{
    Appointment, AppointmentStatus, HealthcareProfessional, NewAppointment, Patient,
    PaymentStatus, User, UserRole,
};
use crate::slot::daily_schedule;
use chrono::{Days, NaiveDate, TimeZone, Utc};
use medico_types::{EmailAddress, NonEmptyText, TextError};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SeedData {
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub patients: Vec<Patient>,
    #[serde(default)]
    pub professionals: Vec<HealthcareProfessional>,
    #[serde(default)]
    pub appointments: Vec<Appointment>,
}

impl SeedData {
    /// Parse seed data from YAML text.
    ///
    /// Uses `serde_path_to_error` so a schema mismatch names the failing field
    /// (for example `appointments[3].time`).
    ///
    /// # Errors
    ///
    /// Returns [`ClinicError::SeedSchema`] if the YAML does not match the seed layout,
    /// contains unknown keys, or carries values that fail validation (empty names, slots
    /// off the schedule, malformed emails).
    pub fn parse_yaml(yaml_text: &str) -> ClinicResult<Self> {
        let deserializer = serde_yaml::Deserializer::from_str(yaml_text);
        serde_path_to_error::deserialize::<_, SeedData>(deserializer).map_err(|err| {
            let path = err.path().to_string();
            let path = if path.is_empty() || path == "." {
                "<root>".to_string()
            } else {
                path
            };
            ClinicError::SeedSchema {
                path,
                message: err.into_inner().to_string(),
            }
        })
    }

    pub fn render_yaml(&self) -> ClinicResult<String> {
        serde_yaml::to_string(self).map_err(|e| ClinicError::SeedSchema {
            path: "<root>".into(),
            message: e.to_string(),
        })
    }
}

/// Read and parse a YAML seed file.
pub fn load_seed_file(path: &Path) -> ClinicResult<SeedData> {
    let text = std::fs::read_to_string(path).map_err(ClinicError::SeedRead)?;
    let seed = SeedData::parse_yaml(&text)?;
    tracing::info!(path = %path.display(), "loaded seed file");
    Ok(seed)
}

/// Resolve the configured seed source. `start` anchors generated appointment dates.
pub fn load_seed(cfg: &CoreConfig, start: NaiveDate) -> ClinicResult<SeedData> {
    match cfg.seed_source() {
        SeedSource::Builtin {
            rng_seed,
            appointment_count,
        } => Ok(default_seed(start, *rng_seed, *appointment_count)),
        SeedSource::File(path) => load_seed_file(path),
    }
}

/// The built-in clinic with `appointment_count` generated appointments over the
/// [`DEFAULT_SEED_HORIZON_DAYS`] days from `start`.
pub fn default_seed(start: NaiveDate, rng_seed: u64, appointment_count: usize) -> SeedData {
    let users = builtin_users();
    let patients = builtin_patients();
    let professionals = builtin_professionals();

    let mut rng = StdRng::seed_from_u64(rng_seed);
    let appointments = generate_appointments(
        &patients,
        &professionals,
        start,
        DEFAULT_SEED_HORIZON_DAYS,
        appointment_count,
        &mut rng,
    );

    SeedData {
        users,
        patients,
        professionals,
        appointments,
    }
}

/// Randomly book `count` appointments across the given patients and professionals.
///
/// IDs follow generation order (`app1`, `app2`, ...); the returned list is sorted by
/// date, then slot. Completed appointments carry a canned consultation record, and
/// settled payments an amount between 100 and 399.
pub fn generate_appointments<R: Rng>(
    patients: &[Patient],
    professionals: &[HealthcareProfessional],
    start: NaiveDate,
    horizon_days: u32,
    count: usize,
    rng: &mut R,
) -> Vec<Appointment> {
    if patients.is_empty() || professionals.is_empty() || horizon_days == 0 {
        return Vec::new();
    }

    let schedule = daily_schedule();
    let mut appointments = Vec::new();

    for n in 1..=count {
        let patient = &patients[rng.gen_range(0..patients.len())];
        let professional = &professionals[rng.gen_range(0..professionals.len())];
        let offset = rng.gen_range(0..horizon_days);
        let date = start
            .checked_add_days(Days::new(u64::from(offset)))
            .unwrap_or(start);
        let time = schedule[rng.gen_range(0..schedule.len())];
        let status = AppointmentStatus::ALL[rng.gen_range(0..AppointmentStatus::ALL.len())];
        let payment_status = PaymentStatus::ALL[rng.gen_range(0..PaymentStatus::ALL.len())];

        let completed = status == AppointmentStatus::Completed;
        let payment_amount = (payment_status != PaymentStatus::Pending)
            .then(|| f64::from(rng.gen_range(100u32..400)));

        let new = NewAppointment {
            patient_id: patient.id.clone(),
            patient_name: patient.name.to_string(),
            professional_id: professional.id.clone(),
            date,
            time,
            status,
            notes: if completed {
                "Consulta realizada com sucesso.".into()
            } else {
                String::new()
            },
            symptoms: completed.then(|| "Dor de cabeça, febre".to_string()),
            diagnosis: completed.then(|| "Infecção viral".to_string()),
            prescriptions: completed
                .then(|| vec!["Paracetamol 500mg".to_string(), "Repouso".to_string()]),
            exams: completed.then(|| vec!["Hemograma completo".to_string()]),
            payment_status: Some(payment_status),
            payment_amount,
        };
        appointments.push(new.into_appointment(format!("{APPOINTMENT_ID_PREFIX}{n}")));
    }

    appointments.sort_by(|a, b| a.date.cmp(&b.date).then(a.time.cmp(&b.time)));
    appointments
}

fn text(s: &str) -> NonEmptyText {
    NonEmptyText::new(s).unwrap_or_else(|e: TextError| unreachable!("builtin seed text: {e}"))
}

fn email(s: &str) -> EmailAddress {
    EmailAddress::parse(s).unwrap_or_else(|e| unreachable!("builtin seed email: {e}"))
}

fn builtin_users() -> Vec<User> {
    [
        ("user1", "Dr. Ana Silva", "ana.silva@example.com", UserRole::Professional, "prof1"),
        ("user2", "João Santos", "joao.santos@example.com", UserRole::Patient, "pat1"),
        ("user3", "Maria Oliveira", "maria@example.com", UserRole::Patient, "pat2"),
    ]
    .into_iter()
    .map(|(id, name, mail, role, profile_id)| User {
        id: id.into(),
        name: text(name),
        email: email(mail),
        role,
        profile_id: profile_id.into(),
    })
    .collect()
}

fn builtin_patients() -> Vec<Patient> {
    [
        (
            "pat1",
            "João Santos",
            "123.456.789-00",
            "(11) 98765-4321",
            "Unimed",
            "Hipertensão, diabetes tipo 2",
            (2023, 1, 15),
        ),
        (
            "pat2",
            "Maria Oliveira",
            "987.654.321-00",
            "(11) 91234-5678",
            "Amil",
            "Asma, alergia a penicilina",
            (2023, 3, 22),
        ),
        (
            "pat3",
            "Pedro Almeida",
            "456.789.123-00",
            "(11) 95555-7777",
            "SulAmérica",
            "Colesterol alto",
            (2023, 5, 10),
        ),
    ]
    .into_iter()
    .map(
        |(id, name, cpf, phone, insurance, history, (y, m, d))| Patient {
            id: id.into(),
            name: text(name),
            cpf: cpf.into(),
            phone: phone.into(),
            insurance: insurance.into(),
            medical_history: history.into(),
            created_at: Utc
                .with_ymd_and_hms(y, m, d, 0, 0, 0)
                .single()
                .unwrap_or_else(|| unreachable!("builtin seed date {y}-{m}-{d}")),
            appointments: Vec::new(),
        },
    )
    .collect()
}

fn builtin_professionals() -> Vec<HealthcareProfessional> {
    [
        ("prof1", "Dra. Ana Silva", "Clínica Geral"),
        ("prof2", "Dr. Carlos Mendes", "Cardiologia"),
    ]
    .into_iter()
    .map(|(id, name, specialty)| HealthcareProfessional {
        id: id.into(),
        name: text(name),
        specialty: text(specialty),
        appointments: Vec::new(),
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CoreConfig;
    use std::fs;
    use tempfile::TempDir;

    fn start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 1).unwrap()
    }

    #[test]
    fn builtin_seed_has_original_clinic() {
        let seed = default_seed(start(), 1, 25);
        assert_eq!(seed.users.len(), 3);
        assert_eq!(seed.patients.len(), 3);
        assert_eq!(seed.professionals.len(), 2);
        assert_eq!(seed.appointments.len(), 25);

        let ana = &seed.users[0];
        assert_eq!(ana.role, UserRole::Professional);
        assert_eq!(ana.profile_id, "prof1");
        assert_eq!(seed.professionals[1].specialty.as_str(), "Cardiologia");
    }

    #[test]
    fn generation_is_deterministic_for_a_seed() {
        let a = default_seed(start(), 7, 25);
        let b = default_seed(start(), 7, 25);
        assert_eq!(a, b);
    }

    #[test]
    fn generated_appointments_are_sorted_and_in_range() {
        let seed = default_seed(start(), 3, 40);
        let last_day = start()
            .checked_add_days(Days::new(u64::from(DEFAULT_SEED_HORIZON_DAYS - 1)))
            .unwrap();

        assert!(seed
            .appointments
            .windows(2)
            .all(|w| (w[0].date, w[0].time) <= (w[1].date, w[1].time)));

        for appointment in &seed.appointments {
            assert!(appointment.date >= start() && appointment.date <= last_day);
            match appointment.payment_status {
                Some(PaymentStatus::Pending) => assert!(appointment.payment_amount.is_none()),
                Some(_) => {
                    let amount = appointment.payment_amount.expect("settled payment has amount");
                    assert!((100.0..400.0).contains(&amount));
                }
                None => panic!("generated appointments always carry a payment status"),
            }
            let completed = appointment.status == AppointmentStatus::Completed;
            assert_eq!(appointment.diagnosis.is_some(), completed);
            assert_eq!(appointment.prescriptions.is_some(), completed);
        }
    }

    #[test]
    fn generated_ids_cover_generation_order() {
        let seed = default_seed(start(), 11, 10);
        let mut ids: Vec<u32> = seed
            .appointments
            .iter()
            .map(|a| a.id.trim_start_matches("app").parse().unwrap())
            .collect();
        ids.sort_unstable();
        assert_eq!(ids, (1..=10).collect::<Vec<_>>());
    }

    #[test]
    fn generation_without_patients_is_empty() {
        let mut rng = StdRng::seed_from_u64(0);
        let appointments =
            generate_appointments(&[], &builtin_professionals(), start(), 30, 5, &mut rng);
        assert!(appointments.is_empty());
    }

    #[test]
    fn yaml_round_trips_builtin_seed() {
        let seed = default_seed(start(), 5, 8);
        let yaml = seed.render_yaml().expect("render");
        let parsed = SeedData::parse_yaml(&yaml).expect("parse");
        assert_eq!(parsed, seed);
    }

    #[test]
    fn yaml_rejects_unknown_keys_with_path() {
        let yaml = r#"professionals:
  - id: prof1
    name: Dra. Ana Silva
    specialty: Clínica Geral
    room: 12
"#;
        let err = SeedData::parse_yaml(yaml).expect_err("unknown key");
        match err {
            ClinicError::SeedSchema { path, message } => {
                assert!(path.starts_with("professionals"), "path was {path}");
                assert!(message.contains("room"));
            }
            other => panic!("expected SeedSchema, got {other:?}"),
        }
    }

    #[test]
    fn yaml_rejects_slot_off_schedule() {
        let yaml = r#"appointments:
  - id: app1
    patient_id: pat1
    patient_name: João Santos
    professional_id: prof1
    date: 2025-03-10
    time: "12:00"
    status: scheduled
"#;
        let err = SeedData::parse_yaml(yaml).expect_err("12:00 is lunch");
        match err {
            ClinicError::SeedSchema { path, .. } => {
                assert!(path.contains("time"), "path was {path}")
            }
            other => panic!("expected SeedSchema, got {other:?}"),
        }
    }

    #[test]
    fn load_seed_reads_configured_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("seed.yaml");
        fs::write(
            &path,
            r#"professionals:
  - id: prof9
    name: Dra. Beatriz Lima
    specialty: Dermatologia
"#,
        )
        .expect("write seed");

        let cfg = CoreConfig::new(SeedSource::File(path)).expect("config");
        let seed = load_seed(&cfg, start()).expect("load");
        assert_eq!(seed.professionals.len(), 1);
        assert_eq!(seed.professionals[0].id, "prof9");
        assert!(seed.appointments.is_empty());
    }

    #[test]
    fn load_seed_reports_missing_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let err = load_seed_file(&temp_dir.path().join("missing.yaml")).expect_err("missing");
        assert!(matches!(err, ClinicError::SeedRead(_)));
    }
}
