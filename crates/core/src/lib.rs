//! # Médico Core
//!
//! Core business logic for the Médico Conectado clinic.
//!
//! This crate holds the data model and every clinic operation:
//! - the in-memory [`ClinicStore`] with session, patient and appointment operations
//! - slot availability, booking guards and form validation
//! - consultation records, agendas and the monthly finance summary
//! - the keyword triage assistant
//! - built-in and YAML seed data
//!
//! **No API concerns**: HTTP servers and command-line handling belong in `api-rest` and
//! `medico-cli`.

pub mod agenda;
pub mod availability;
pub mod booking;
pub mod config;
pub mod constants;
pub mod error;
pub mod finance;
pub mod models;
pub mod records;
pub mod seed;
pub mod session;
pub mod slot;
pub mod store;
pub mod triage;
pub mod validation;

pub use booking::{AppointmentForm, BookingForm};
pub use config::{seed_source_from_env_values, CoreConfig, SeedSource};
pub use error::{ClinicError, ClinicResult, FieldError, ValidationErrors};
pub use finance::FinancialOverview;
pub use models::{
    Appointment, AppointmentStatus, AppointmentUpdate, HealthcareProfessional, NewAppointment,
    NewPatient, Patient, PatientUpdate, PaymentStatus, Profile, User, UserRole,
};
pub use records::{can_cancel, ConsultationNotes, MedicalRecords, PatientAgenda};
pub use seed::{default_seed, load_seed, SeedData};
pub use slot::{daily_schedule, Slot};
pub use store::ClinicStore;
pub use triage::{match_specialties, triage_turn, Recommendation, TriageReply, TriageSession};
pub use validation::{PatientEditForm, PatientForm};

pub use medico_types::{EmailAddress, NonEmptyText, TextError};
