//! Constants used throughout the Médico Conectado core crate.
//!
//! Schedule labels, identifier prefixes and seed defaults live here so the
//! store, the seed generator and the API agree on them.

/// The clinic's fixed daily schedule, in half-hour slots.
pub const DAILY_SLOT_LABELS: [&str; 16] = [
    "08:00", "08:30", "09:00", "09:30", "10:00", "10:30", "11:00", "11:30", "14:00", "14:30",
    "15:00", "15:30", "16:00", "16:30", "17:00", "17:30",
];

/// Identifier prefix for patients (`pat1`, `pat2`, ...).
pub const PATIENT_ID_PREFIX: &str = "pat";

/// Identifier prefix for appointments (`app1`, `app2`, ...).
pub const APPOINTMENT_ID_PREFIX: &str = "app";

/// Number of scripted triage questions before the assistant gives a recommendation.
pub const TRIAGE_SCRIPTED_QUESTIONS: usize = 5;

/// Specialty recommended when no keyword matched by the end of triage.
pub const TRIAGE_FALLBACK_SPECIALTY: &str = "Clínico Geral";

/// Default number of generated seed appointments.
pub const DEFAULT_SEED_APPOINTMENTS: usize = 25;

/// Upper bound on generated seed appointments.
pub const MAX_SEED_APPOINTMENTS: usize = 10_000;

/// Default window, in days from the start date, over which seed appointments are spread.
pub const DEFAULT_SEED_HORIZON_DAYS: u32 = 30;

/// Default RNG seed for generated appointments.
pub const DEFAULT_RNG_SEED: u64 = 42;

/// Minimum length of a patient name on the registration form.
pub const PATIENT_NAME_MIN_CHARS: usize = 3;

/// Accepted CPF length range (digits only or punctuated).
pub const CPF_MIN_CHARS: usize = 11;
pub const CPF_MAX_CHARS: usize = 14;

/// Minimum length of a phone number on the registration form.
pub const PHONE_MIN_CHARS: usize = 10;
