//! # API REST
//!
//! REST API for the Médico clinic.
//!
//! Handles:
//! - HTTP endpoints with axum
//! - OpenAPI/Swagger documentation
//! - REST-specific concerns (JSON serialization, CORS, error status mapping)
//!
//! All clinic behaviour lives in `medico-core`; this crate only adapts it to HTTP.

#![warn(rust_2018_idioms)]

pub mod dto;
pub mod error;
mod handlers;

use axum::{
    routing::{get, post},
    Router,
};
use medico_core::ClinicStore;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub use error::ApiError;

/// Application state for the REST API server
///
/// One clinic store shared by every request. Reads share the lock; each mutation takes it
/// exclusively, so mutations are applied one at a time.
#[derive(Clone)]
pub struct AppState {
    store: Arc<RwLock<ClinicStore>>,
}

impl AppState {
    pub fn new(store: ClinicStore) -> Self {
        Self {
            store: Arc::new(RwLock::new(store)),
        }
    }

    pub(crate) fn read(&self) -> Result<RwLockReadGuard<'_, ClinicStore>, ApiError> {
        self.store
            .read()
            .map_err(|_| ApiError::Internal("clinic store lock poisoned".into()))
    }

    pub(crate) fn write(&self) -> Result<RwLockWriteGuard<'_, ClinicStore>, ApiError> {
        self.store
            .write()
            .map_err(|_| ApiError::Internal("clinic store lock poisoned".into()))
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health,
        handlers::current_session,
        handlers::login,
        handlers::logout,
        handlers::switch_role,
        handlers::list_patients,
        handlers::create_patient,
        handlers::update_patient,
        handlers::patient_records,
        handlers::patient_agenda,
        handlers::list_professionals,
        handlers::availability,
        handlers::professional_agenda,
        handlers::professional_finance,
        handlers::list_appointments,
        handlers::book_appointment,
        handlers::schedule_appointment,
        handlers::update_appointment,
        handlers::cancel_appointment,
        handlers::complete_appointment,
        handlers::record_consultation,
        handlers::triage,
    ),
    components(schemas(
        dto::HealthRes,
        dto::LoginReq,
        dto::SwitchRoleReq,
        dto::UserRes,
        dto::SessionRes,
        dto::PatientRes,
        dto::ListPatientsRes,
        dto::CreatePatientReq,
        dto::UpdatePatientReq,
        dto::MedicalRecordsRes,
        dto::PatientAgendaRes,
        dto::ProfessionalRes,
        dto::ListProfessionalsRes,
        dto::AvailabilityRes,
        dto::DayAgendaRes,
        dto::FinanceRes,
        dto::AppointmentRes,
        dto::ListAppointmentsRes,
        dto::BookAppointmentReq,
        dto::ScheduleAppointmentReq,
        dto::UpdateAppointmentReq,
        dto::ConsultationReq,
        dto::TriageReq,
        dto::SpecialtyRes,
        dto::RecommendationRes,
        dto::TriageRes,
    ))
)]
pub struct ApiDoc;

/// Build the REST router, including Swagger UI at `/swagger-ui`.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/session", get(handlers::current_session))
        .route("/session/login", post(handlers::login))
        .route("/session/logout", post(handlers::logout))
        .route("/session/role", post(handlers::switch_role))
        .route(
            "/patients",
            get(handlers::list_patients).post(handlers::create_patient),
        )
        .route("/patients/:id", axum::routing::put(handlers::update_patient))
        .route("/patients/:id/records", get(handlers::patient_records))
        .route("/patients/:id/agenda", get(handlers::patient_agenda))
        .route("/professionals", get(handlers::list_professionals))
        .route(
            "/professionals/:id/availability",
            get(handlers::availability),
        )
        .route("/professionals/:id/agenda", get(handlers::professional_agenda))
        .route(
            "/professionals/:id/finance",
            get(handlers::professional_finance),
        )
        .route(
            "/appointments",
            get(handlers::list_appointments).post(handlers::schedule_appointment),
        )
        .route("/appointments/book", post(handlers::book_appointment))
        .route(
            "/appointments/:id",
            axum::routing::put(handlers::update_appointment),
        )
        .route(
            "/appointments/:id/cancel",
            post(handlers::cancel_appointment),
        )
        .route(
            "/appointments/:id/complete",
            post(handlers::complete_appointment),
        )
        .route(
            "/appointments/:id/consultation",
            post(handlers::record_consultation),
        )
        .route("/triage", post(handlers::triage))
        .merge(
            SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()),
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
}
