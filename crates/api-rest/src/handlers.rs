//! Route handlers.
//!
//! Each handler takes the store lock once, runs one clinic operation and converts the result
//! into a response body. Nothing awaits while a lock guard is alive.

use axum::{
    extract::{Path as AxumPath, Query, State},
    http::StatusCode,
    response::Json,
};
use chrono::Utc;
use medico_core::{
    triage_turn, AppointmentForm, AppointmentUpdate, BookingForm, ClinicError, PatientEditForm,
    PatientForm, UserRole,
};

use crate::dto::{self, parse_date, DATE_FORMAT};
use crate::error::ApiError;
use crate::AppState;

type ApiResult<T> = Result<Json<T>, ApiError>;
type Created<T> = Result<(StatusCode, Json<T>), ApiError>;

fn today_or(raw: Option<&str>) -> Result<chrono::NaiveDate, ApiError> {
    match raw {
        Some(raw) => parse_date(raw),
        None => Ok(Utc::now().date_naive()),
    }
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = dto::HealthRes)
    )
)]
/// Health check endpoint for the REST API
///
/// Used for monitoring and load balancer health checks.
#[axum::debug_handler]
pub(crate) async fn health(State(_state): State<AppState>) -> Json<dto::HealthRes> {
    Json(dto::HealthRes {
        ok: true,
        message: "Médico REST API is alive".into(),
    })
}

// ---- session ----

#[utoipa::path(
    get,
    path = "/session",
    responses(
        (status = 200, description = "Current user and profile, if any", body = dto::SessionRes)
    )
)]
#[axum::debug_handler]
pub(crate) async fn current_session(State(state): State<AppState>) -> ApiResult<dto::SessionRes> {
    let store = state.read()?;
    Ok(Json(dto::SessionRes::new(
        store.current_user(),
        store.current_profile(),
    )))
}

#[utoipa::path(
    post,
    path = "/session/login",
    request_body = dto::LoginReq,
    responses(
        (status = 200, description = "Logged in", body = dto::SessionRes),
        (status = 404, description = "Unknown user")
    )
)]
/// Select one of the known users as the current user.
#[axum::debug_handler]
pub(crate) async fn login(
    State(state): State<AppState>,
    Json(req): Json<dto::LoginReq>,
) -> ApiResult<dto::SessionRes> {
    let mut store = state.write()?;
    store.login(req.user_id.trim())?;
    Ok(Json(dto::SessionRes::new(
        store.current_user(),
        store.current_profile(),
    )))
}

#[utoipa::path(
    post,
    path = "/session/logout",
    responses(
        (status = 200, description = "Logged out", body = dto::SessionRes)
    )
)]
#[axum::debug_handler]
pub(crate) async fn logout(State(state): State<AppState>) -> ApiResult<dto::SessionRes> {
    let mut store = state.write()?;
    store.logout();
    Ok(Json(dto::SessionRes::new(None, None)))
}

#[utoipa::path(
    post,
    path = "/session/role",
    request_body = dto::SwitchRoleReq,
    responses(
        (status = 200, description = "Switched to the first user with the role", body = dto::SessionRes),
        (status = 400, description = "Unknown role"),
        (status = 401, description = "Nobody is logged in"),
        (status = 404, description = "No user holds the role")
    )
)]
#[axum::debug_handler]
pub(crate) async fn switch_role(
    State(state): State<AppState>,
    Json(req): Json<dto::SwitchRoleReq>,
) -> ApiResult<dto::SessionRes> {
    let role: UserRole = req.role.parse()?;
    let mut store = state.write()?;
    store.switch_role(role)?;
    Ok(Json(dto::SessionRes::new(
        store.current_user(),
        store.current_profile(),
    )))
}

// ---- patients ----

#[utoipa::path(
    get,
    path = "/patients",
    params(dto::PatientSearch),
    responses(
        (status = 200, description = "Patients matching the search", body = dto::ListPatientsRes)
    )
)]
#[axum::debug_handler]
pub(crate) async fn list_patients(
    State(state): State<AppState>,
    Query(query): Query<dto::PatientSearch>,
) -> ApiResult<dto::ListPatientsRes> {
    let store = state.read()?;
    let patients = store
        .search_patients(query.search.as_deref().unwrap_or(""))
        .into_iter()
        .map(dto::PatientRes::from)
        .collect();
    Ok(Json(dto::ListPatientsRes { patients }))
}

#[utoipa::path(
    post,
    path = "/patients",
    request_body = dto::CreatePatientReq,
    responses(
        (status = 201, description = "Patient registered", body = dto::PatientRes),
        (status = 400, description = "Form rejected; every failing field is listed")
    )
)]
/// Register a patient.
///
/// Name needs at least 3 characters, CPF 11 to 14, phone at least 10.
#[axum::debug_handler]
pub(crate) async fn create_patient(
    State(state): State<AppState>,
    Json(req): Json<dto::CreatePatientReq>,
) -> Created<dto::PatientRes> {
    let new = PatientForm::from(req).validate()?;
    let mut store = state.write()?;
    let patient = store.add_patient(new);
    Ok((StatusCode::CREATED, Json(dto::PatientRes::from(&patient))))
}

#[utoipa::path(
    put,
    path = "/patients/{id}",
    params(("id" = String, Path, description = "Patient ID")),
    request_body = dto::UpdatePatientReq,
    responses(
        (status = 200, description = "Patient updated", body = dto::PatientRes),
        (status = 400, description = "Form rejected"),
        (status = 404, description = "Unknown patient")
    )
)]
#[axum::debug_handler]
pub(crate) async fn update_patient(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<String>,
    Json(req): Json<dto::UpdatePatientReq>,
) -> ApiResult<dto::PatientRes> {
    let changes = PatientEditForm::from(req).validate()?;
    let mut store = state.write()?;
    let patient = store.update_patient(&id, changes)?;
    Ok(Json(dto::PatientRes::from(&patient)))
}

#[utoipa::path(
    get,
    path = "/patients/{id}/records",
    params(("id" = String, Path, description = "Patient ID")),
    responses(
        (status = 200, description = "Completed consultations, newest first", body = dto::MedicalRecordsRes),
        (status = 404, description = "Unknown patient")
    )
)]
#[axum::debug_handler]
pub(crate) async fn patient_records(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<String>,
) -> ApiResult<dto::MedicalRecordsRes> {
    let store = state.read()?;
    Ok(Json(store.medical_records(&id)?.into()))
}

#[utoipa::path(
    get,
    path = "/patients/{id}/agenda",
    params(("id" = String, Path, description = "Patient ID"), dto::TodayQuery),
    responses(
        (status = 200, description = "Upcoming and past appointments", body = dto::PatientAgendaRes),
        (status = 404, description = "Unknown patient")
    )
)]
#[axum::debug_handler]
pub(crate) async fn patient_agenda(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<String>,
    Query(query): Query<dto::TodayQuery>,
) -> ApiResult<dto::PatientAgendaRes> {
    let today = today_or(query.today.as_deref())?;
    let store = state.read()?;
    Ok(Json(store.patient_agenda(&id, today)?.into()))
}

// ---- professionals ----

#[utoipa::path(
    get,
    path = "/professionals",
    responses(
        (status = 200, description = "All professionals", body = dto::ListProfessionalsRes)
    )
)]
#[axum::debug_handler]
pub(crate) async fn list_professionals(
    State(state): State<AppState>,
) -> ApiResult<dto::ListProfessionalsRes> {
    let store = state.read()?;
    let professionals = store
        .professionals()
        .iter()
        .map(dto::ProfessionalRes::from)
        .collect();
    Ok(Json(dto::ListProfessionalsRes { professionals }))
}

#[utoipa::path(
    get,
    path = "/professionals/{id}/availability",
    params(("id" = String, Path, description = "Professional ID"), dto::DateQuery),
    responses(
        (status = 200, description = "Free slots in schedule order", body = dto::AvailabilityRes),
        (status = 400, description = "Malformed date")
    )
)]
/// Free slots for a professional on a date.
///
/// An unknown professional has no bookings and gets the full schedule.
#[axum::debug_handler]
pub(crate) async fn availability(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<String>,
    Query(query): Query<dto::DateQuery>,
) -> ApiResult<dto::AvailabilityRes> {
    let date = parse_date(&query.date)?;
    let store = state.read()?;
    let slots = store
        .available_slots(date, &id)
        .into_iter()
        .map(|slot| slot.label())
        .collect();
    let has_availability = store.has_availability(date, &id);
    Ok(Json(dto::AvailabilityRes {
        professional_id: id,
        date: date.format(DATE_FORMAT).to_string(),
        has_availability,
        slots,
    }))
}

#[utoipa::path(
    get,
    path = "/professionals/{id}/agenda",
    params(("id" = String, Path, description = "Professional ID"), dto::DateQuery),
    responses(
        (status = 200, description = "The day's appointments in slot order", body = dto::DayAgendaRes),
        (status = 404, description = "Unknown professional")
    )
)]
#[axum::debug_handler]
pub(crate) async fn professional_agenda(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<String>,
    Query(query): Query<dto::DateQuery>,
) -> ApiResult<dto::DayAgendaRes> {
    let date = parse_date(&query.date)?;
    let store = state.read()?;
    if store.professional(&id).is_none() {
        return Err(ClinicError::ProfessionalNotFound(id).into());
    }
    let appointments = store
        .day_agenda(&id, date)
        .iter()
        .map(dto::AppointmentRes::from)
        .collect();
    let scheduled_dates = store
        .dates_with_scheduled(&id)
        .into_iter()
        .map(|d| d.format(DATE_FORMAT).to_string())
        .collect();
    Ok(Json(dto::DayAgendaRes {
        professional_id: id,
        date: date.format(DATE_FORMAT).to_string(),
        appointments,
        scheduled_dates,
    }))
}

#[utoipa::path(
    get,
    path = "/professionals/{id}/finance",
    params(("id" = String, Path, description = "Professional ID"), dto::MonthQuery),
    responses(
        (status = 200, description = "Revenue from completed appointments in the month", body = dto::FinanceRes),
        (status = 400, description = "Month out of range"),
        (status = 404, description = "Unknown professional")
    )
)]
#[axum::debug_handler]
pub(crate) async fn professional_finance(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<String>,
    Query(query): Query<dto::MonthQuery>,
) -> ApiResult<dto::FinanceRes> {
    if !(1..=12).contains(&query.month) {
        return Err(ApiError::BadRequest(format!(
            "month must be between 1 and 12, got {}",
            query.month
        )));
    }
    let store = state.read()?;
    if store.professional(&id).is_none() {
        return Err(ClinicError::ProfessionalNotFound(id).into());
    }
    Ok(Json(
        store.financial_overview(&id, query.year, query.month).into(),
    ))
}

// ---- appointments ----

#[utoipa::path(
    get,
    path = "/appointments",
    params(dto::AppointmentFilter),
    responses(
        (status = 200, description = "Appointments, optionally filtered", body = dto::ListAppointmentsRes)
    )
)]
#[axum::debug_handler]
pub(crate) async fn list_appointments(
    State(state): State<AppState>,
    Query(filter): Query<dto::AppointmentFilter>,
) -> ApiResult<dto::ListAppointmentsRes> {
    let store = state.read()?;
    let appointments = store
        .appointments()
        .iter()
        .filter(|a| {
            filter
                .patient_id
                .as_deref()
                .map_or(true, |id| a.patient_id == id)
        })
        .filter(|a| {
            filter
                .professional_id
                .as_deref()
                .map_or(true, |id| a.professional_id == id)
        })
        .map(dto::AppointmentRes::from)
        .collect();
    Ok(Json(dto::ListAppointmentsRes { appointments }))
}

#[utoipa::path(
    post,
    path = "/appointments/book",
    request_body = dto::BookAppointmentReq,
    responses(
        (status = 201, description = "Appointment booked for the logged-in patient", body = dto::AppointmentRes),
        (status = 400, description = "Missing or malformed fields"),
        (status = 403, description = "Current user is not a patient"),
        (status = 404, description = "Unknown professional"),
        (status = 409, description = "Slot already taken")
    )
)]
#[axum::debug_handler]
pub(crate) async fn book_appointment(
    State(state): State<AppState>,
    Json(req): Json<dto::BookAppointmentReq>,
) -> Created<dto::AppointmentRes> {
    let form: BookingForm = req.into();
    let mut store = state.write()?;
    let appointment = store.book_for_current_patient(&form)?;
    Ok((StatusCode::CREATED, Json(dto::AppointmentRes::from(&appointment))))
}

#[utoipa::path(
    post,
    path = "/appointments",
    request_body = dto::ScheduleAppointmentReq,
    responses(
        (status = 201, description = "Appointment added to the logged-in professional's agenda", body = dto::AppointmentRes),
        (status = 400, description = "Missing or malformed fields"),
        (status = 401, description = "Nobody is logged in"),
        (status = 403, description = "Current user is not a professional"),
        (status = 404, description = "Unknown patient"),
        (status = 409, description = "Slot already taken")
    )
)]
#[axum::debug_handler]
pub(crate) async fn schedule_appointment(
    State(state): State<AppState>,
    Json(req): Json<dto::ScheduleAppointmentReq>,
) -> Created<dto::AppointmentRes> {
    let form: AppointmentForm = req.into();
    let mut store = state.write()?;
    let appointment = store.schedule_for_current_professional(&form)?;
    Ok((StatusCode::CREATED, Json(dto::AppointmentRes::from(&appointment))))
}

#[utoipa::path(
    put,
    path = "/appointments/{id}",
    params(("id" = String, Path, description = "Appointment ID")),
    request_body = dto::UpdateAppointmentReq,
    responses(
        (status = 200, description = "Appointment updated", body = dto::AppointmentRes),
        (status = 400, description = "Malformed field"),
        (status = 404, description = "Unknown appointment"),
        (status = 409, description = "Target slot already held")
    )
)]
#[axum::debug_handler]
pub(crate) async fn update_appointment(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<String>,
    Json(req): Json<dto::UpdateAppointmentReq>,
) -> ApiResult<dto::AppointmentRes> {
    let changes = AppointmentUpdate::try_from(req)?;
    let mut store = state.write()?;
    let appointment = store.update_appointment(&id, changes)?;
    Ok(Json(dto::AppointmentRes::from(&appointment)))
}

#[utoipa::path(
    post,
    path = "/appointments/{id}/cancel",
    params(("id" = String, Path, description = "Appointment ID")),
    responses(
        (status = 200, description = "Appointment cancelled; its slot is free again", body = dto::AppointmentRes),
        (status = 404, description = "Unknown appointment")
    )
)]
#[axum::debug_handler]
pub(crate) async fn cancel_appointment(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<String>,
) -> ApiResult<dto::AppointmentRes> {
    let mut store = state.write()?;
    let appointment = store.cancel_appointment(&id)?;
    Ok(Json(dto::AppointmentRes::from(&appointment)))
}

#[utoipa::path(
    post,
    path = "/appointments/{id}/complete",
    params(("id" = String, Path, description = "Appointment ID")),
    responses(
        (status = 200, description = "Appointment completed", body = dto::AppointmentRes),
        (status = 404, description = "Unknown appointment")
    )
)]
#[axum::debug_handler]
pub(crate) async fn complete_appointment(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<String>,
) -> ApiResult<dto::AppointmentRes> {
    let mut store = state.write()?;
    let appointment = store.complete_appointment(&id)?;
    Ok(Json(dto::AppointmentRes::from(&appointment)))
}

#[utoipa::path(
    post,
    path = "/appointments/{id}/consultation",
    params(("id" = String, Path, description = "Appointment ID")),
    request_body = dto::ConsultationReq,
    responses(
        (status = 200, description = "Consultation saved and appointment completed", body = dto::AppointmentRes),
        (status = 404, description = "Unknown appointment")
    )
)]
#[axum::debug_handler]
pub(crate) async fn record_consultation(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<String>,
    Json(req): Json<dto::ConsultationReq>,
) -> ApiResult<dto::AppointmentRes> {
    let mut store = state.write()?;
    let appointment = store.record_consultation(&id, req.into())?;
    Ok(Json(dto::AppointmentRes::from(&appointment)))
}

// ---- triage ----

#[utoipa::path(
    post,
    path = "/triage",
    request_body = dto::TriageReq,
    responses(
        (status = 200, description = "Matched specialties, plus a recommendation once the scripted questions are done", body = dto::TriageRes),
        (status = 400, description = "Blank message")
    )
)]
/// One triage turn.
///
/// The server keeps no conversation state; clients send how many messages were already
/// answered.
#[axum::debug_handler]
pub(crate) async fn triage(
    State(_state): State<AppState>,
    Json(req): Json<dto::TriageReq>,
) -> ApiResult<dto::TriageRes> {
    if req.message.trim().is_empty() {
        return Err(ApiError::BadRequest("message must not be blank".into()));
    }
    Ok(Json(triage_turn(&req.message, req.answered).into()))
}
