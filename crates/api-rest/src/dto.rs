//! Request and response bodies.
//!
//! Wire types use plain strings for dates (`YYYY-MM-DD`), slots (`HH:MM`) and enum values so
//! the OpenAPI schema stays flat. Conversions from the core records live here.

use medico_core::{
    Appointment, AppointmentStatus, AppointmentUpdate, ConsultationNotes, FinancialOverview,
    HealthcareProfessional, MedicalRecords, Patient, PatientAgenda, PatientEditForm, PatientForm,
    PaymentStatus, Profile, Recommendation, Slot, TriageReply, User,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::error::ApiError;

pub(crate) const DATE_FORMAT: &str = "%Y-%m-%d";

pub(crate) fn parse_date(raw: &str) -> Result<chrono::NaiveDate, ApiError> {
    chrono::NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)
        .map_err(|_| ApiError::BadRequest(format!("'{raw}' is not a YYYY-MM-DD date")))
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
}

// ---- session ----

#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginReq {
    pub user_id: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SwitchRoleReq {
    /// `professional` or `patient`.
    pub role: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserRes {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: String,
    pub profile_id: String,
}

impl From<&User> for UserRes {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            name: user.name.to_string(),
            email: user.email.to_string(),
            role: user.role.to_string(),
            profile_id: user.profile_id.clone(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SessionRes {
    pub user: Option<UserRes>,
    pub patient: Option<PatientRes>,
    pub professional: Option<ProfessionalRes>,
}

impl SessionRes {
    pub(crate) fn new(user: Option<&User>, profile: Option<Profile>) -> Self {
        let (patient, professional) = match profile {
            Some(Profile::Patient(p)) => (Some(PatientRes::from(&p)), None),
            Some(Profile::Professional(p)) => (None, Some(ProfessionalRes::from(&p))),
            None => (None, None),
        };
        Self {
            user: user.map(UserRes::from),
            patient,
            professional,
        }
    }
}

// ---- patients ----

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PatientSearch {
    /// Matches name (case-insensitive), CPF or phone.
    pub search: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PatientRes {
    pub id: String,
    pub name: String,
    pub cpf: String,
    pub phone: String,
    pub insurance: String,
    pub medical_history: String,
    /// RFC 3339 timestamp.
    pub created_at: String,
    pub appointments: Vec<String>,
}

impl From<&Patient> for PatientRes {
    fn from(p: &Patient) -> Self {
        Self {
            id: p.id.clone(),
            name: p.name.to_string(),
            cpf: p.cpf.clone(),
            phone: p.phone.clone(),
            insurance: p.insurance.clone(),
            medical_history: p.medical_history.clone(),
            created_at: p.created_at.to_rfc3339(),
            appointments: p.appointments.clone(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ListPatientsRes {
    pub patients: Vec<PatientRes>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreatePatientReq {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub cpf: String,
    #[serde(default)]
    pub phone: String,
    pub insurance: Option<String>,
    pub medical_history: Option<String>,
}

impl From<CreatePatientReq> for PatientForm {
    fn from(req: CreatePatientReq) -> Self {
        PatientForm {
            name: req.name,
            cpf: req.cpf,
            phone: req.phone,
            insurance: req.insurance,
            medical_history: req.medical_history,
        }
    }
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdatePatientReq {
    pub name: Option<String>,
    pub cpf: Option<String>,
    pub phone: Option<String>,
    pub insurance: Option<String>,
    pub medical_history: Option<String>,
}

impl From<UpdatePatientReq> for PatientEditForm {
    fn from(req: UpdatePatientReq) -> Self {
        PatientEditForm {
            name: req.name,
            cpf: req.cpf,
            phone: req.phone,
            insurance: req.insurance,
            medical_history: req.medical_history,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MedicalRecordsRes {
    pub consultations: Vec<AppointmentRes>,
    pub prescriptions: Vec<String>,
    pub exams: Vec<String>,
}

impl From<MedicalRecords> for MedicalRecordsRes {
    fn from(records: MedicalRecords) -> Self {
        Self {
            consultations: records.consultations.iter().map(AppointmentRes::from).collect(),
            prescriptions: records.prescriptions,
            exams: records.exams,
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TodayQuery {
    /// Reference date, `YYYY-MM-DD`; defaults to the server's current UTC date.
    pub today: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PatientAgendaRes {
    pub upcoming: Vec<AppointmentRes>,
    pub past: Vec<AppointmentRes>,
}

impl From<PatientAgenda> for PatientAgendaRes {
    fn from(agenda: PatientAgenda) -> Self {
        Self {
            upcoming: agenda.upcoming.iter().map(AppointmentRes::from).collect(),
            past: agenda.past.iter().map(AppointmentRes::from).collect(),
        }
    }
}

// ---- professionals ----

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProfessionalRes {
    pub id: String,
    pub name: String,
    pub specialty: String,
    pub appointments: Vec<String>,
}

impl From<&HealthcareProfessional> for ProfessionalRes {
    fn from(p: &HealthcareProfessional) -> Self {
        Self {
            id: p.id.clone(),
            name: p.name.to_string(),
            specialty: p.specialty.to_string(),
            appointments: p.appointments.clone(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ListProfessionalsRes {
    pub professionals: Vec<ProfessionalRes>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DateQuery {
    /// `YYYY-MM-DD`.
    pub date: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AvailabilityRes {
    pub professional_id: String,
    pub date: String,
    /// False when every slot of the day is taken.
    pub has_availability: bool,
    pub slots: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DayAgendaRes {
    pub professional_id: String,
    pub date: String,
    pub appointments: Vec<AppointmentRes>,
    /// Every date holding a scheduled appointment for this professional.
    pub scheduled_dates: Vec<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct MonthQuery {
    pub year: i32,
    /// 1 to 12.
    pub month: u32,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct FinanceRes {
    pub professional_id: String,
    pub year: i32,
    pub month: u32,
    pub total_revenue: f64,
    pub completed_appointments: usize,
    pub average_ticket: f64,
    pub paid: usize,
    pub pending: usize,
    pub insurance: usize,
}

impl From<FinancialOverview> for FinanceRes {
    fn from(o: FinancialOverview) -> Self {
        Self {
            professional_id: o.professional_id,
            year: o.year,
            month: o.month,
            total_revenue: o.total_revenue,
            completed_appointments: o.completed_appointments,
            average_ticket: o.average_ticket,
            paid: o.paid,
            pending: o.pending,
            insurance: o.insurance,
        }
    }
}

// ---- appointments ----

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AppointmentFilter {
    pub patient_id: Option<String>,
    pub professional_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AppointmentRes {
    pub id: String,
    pub patient_id: String,
    pub patient_name: String,
    pub professional_id: String,
    pub date: String,
    pub time: String,
    /// `scheduled`, `completed`, `cancelled` or `no-show`.
    pub status: String,
    pub notes: String,
    pub symptoms: Option<String>,
    pub diagnosis: Option<String>,
    pub prescriptions: Option<Vec<String>>,
    pub exams: Option<Vec<String>>,
    pub payment_status: Option<String>,
    pub payment_amount: Option<f64>,
}

impl From<&Appointment> for AppointmentRes {
    fn from(a: &Appointment) -> Self {
        Self {
            id: a.id.clone(),
            patient_id: a.patient_id.clone(),
            patient_name: a.patient_name.clone(),
            professional_id: a.professional_id.clone(),
            date: a.date.format(DATE_FORMAT).to_string(),
            time: a.time.label(),
            status: a.status.to_string(),
            notes: a.notes.clone(),
            symptoms: a.symptoms.clone(),
            diagnosis: a.diagnosis.clone(),
            prescriptions: a.prescriptions.clone(),
            exams: a.exams.clone(),
            payment_status: a.payment_status.map(|s| s.to_string()),
            payment_amount: a.payment_amount,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ListAppointmentsRes {
    pub appointments: Vec<AppointmentRes>,
}

/// Patient self-booking. Missing fields are reported together.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct BookAppointmentReq {
    #[serde(default)]
    pub professional_id: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub time: String,
}

impl From<BookAppointmentReq> for medico_core::BookingForm {
    fn from(req: BookAppointmentReq) -> Self {
        Self {
            professional_id: req.professional_id,
            date: req.date,
            time: req.time,
        }
    }
}

/// Professional-side scheduling into the caller's own agenda.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct ScheduleAppointmentReq {
    #[serde(default)]
    pub patient_id: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub time: String,
    #[serde(default)]
    pub notes: String,
}

impl From<ScheduleAppointmentReq> for medico_core::AppointmentForm {
    fn from(req: ScheduleAppointmentReq) -> Self {
        Self {
            patient_id: req.patient_id,
            date: req.date,
            time: req.time,
            notes: req.notes,
        }
    }
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateAppointmentReq {
    pub date: Option<String>,
    pub time: Option<String>,
    pub status: Option<String>,
    pub notes: Option<String>,
    pub symptoms: Option<String>,
    pub diagnosis: Option<String>,
    pub prescriptions: Option<Vec<String>>,
    pub exams: Option<Vec<String>>,
    pub payment_status: Option<String>,
    pub payment_amount: Option<f64>,
}

impl TryFrom<UpdateAppointmentReq> for AppointmentUpdate {
    type Error = ApiError;

    fn try_from(req: UpdateAppointmentReq) -> Result<Self, Self::Error> {
        Ok(AppointmentUpdate {
            date: req.date.as_deref().map(parse_date).transpose()?,
            time: req.time.as_deref().map(Slot::parse).transpose()?,
            status: req
                .status
                .as_deref()
                .map(str::parse::<AppointmentStatus>)
                .transpose()?,
            notes: req.notes,
            symptoms: req.symptoms,
            diagnosis: req.diagnosis,
            prescriptions: req.prescriptions,
            exams: req.exams,
            payment_status: req
                .payment_status
                .as_deref()
                .map(str::parse::<PaymentStatus>)
                .transpose()?,
            payment_amount: req.payment_amount,
        })
    }
}

/// Consultation write-up. Prescriptions and exams hold one item per line.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct ConsultationReq {
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub symptoms: String,
    #[serde(default)]
    pub diagnosis: String,
    #[serde(default)]
    pub prescriptions: String,
    #[serde(default)]
    pub exams: String,
}

impl From<ConsultationReq> for ConsultationNotes {
    fn from(req: ConsultationReq) -> Self {
        Self {
            notes: req.notes,
            symptoms: req.symptoms,
            diagnosis: req.diagnosis,
            prescriptions: req.prescriptions,
            exams: req.exams,
        }
    }
}

// ---- triage ----

#[derive(Debug, Deserialize, ToSchema)]
pub struct TriageReq {
    pub message: String,
    /// Messages already answered earlier in this conversation.
    #[serde(default)]
    pub answered: usize,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SpecialtyRes {
    pub specialty: String,
    pub description: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RecommendationRes {
    pub specialty: String,
    pub description: Option<String>,
    /// True when nothing matched and general practice is suggested.
    pub fallback: bool,
}

impl From<&Recommendation> for RecommendationRes {
    fn from(r: &Recommendation) -> Self {
        match r {
            Recommendation::Specialty {
                specialty,
                description,
            } => Self {
                specialty: specialty.to_string(),
                description: Some(description.to_string()),
                fallback: false,
            },
            Recommendation::Fallback { specialty } => Self {
                specialty: specialty.to_string(),
                description: None,
                fallback: true,
            },
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TriageRes {
    pub matches: Vec<SpecialtyRes>,
    pub next_question: Option<usize>,
    pub recommendation: Option<RecommendationRes>,
}

impl From<TriageReply> for TriageRes {
    fn from(reply: TriageReply) -> Self {
        Self {
            matches: reply
                .matches
                .iter()
                .map(|route| SpecialtyRes {
                    specialty: route.specialty.to_string(),
                    description: route.description.to_string(),
                })
                .collect(),
            next_question: reply.next_question,
            recommendation: reply.recommendation.as_ref().map(RecommendationRes::from),
        }
    }
}
