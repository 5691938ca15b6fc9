use anyhow::anyhow;
use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{Html, IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::{auth_redirect_target, token_from_headers, AuthStatus};
use crate::disclosure::DisclosureSnapshot;
use crate::errors::AppError;
use crate::state::AppState;
use crate::views::home::list_resumes;
use crate::views::render::{render_home, render_pending, render_view};
use crate::views::session::ViewModel;

#[derive(Deserialize)]
pub struct CreateViewRequest {
    pub resume_id: String,
}

/// Auth status of the request, plus the token it presented.
struct Caller {
    status: AuthStatus,
    token: Option<String>,
}

async fn caller(state: &AppState, headers: &HeaderMap) -> Result<Caller, AppError> {
    let token = token_from_headers(headers);
    let status = state.auth.status(token.as_deref()).await?;
    Ok(Caller { status, token })
}

async fn auth_status(state: &AppState, headers: &HeaderMap) -> Result<AuthStatus, AppError> {
    Ok(caller(state, headers).await?.status)
}

/// 303 to `location`. Invalid header bytes become an error, never a panic.
fn see_other(location: &str) -> Result<Response, AppError> {
    let location = HeaderValue::from_str(location)
        .map_err(|e| AppError::Internal(anyhow!("invalid redirect location: {e}")))?;
    Ok((StatusCode::SEE_OTHER, [(header::LOCATION, location)]).into_response())
}

/// Redirect (signed out) or pending page (still checking) for browser routes.
fn page_gate(status: AuthStatus, path: &str, label: &str) -> Result<Option<Response>, AppError> {
    if status.requires_redirect() {
        Ok(Some(see_other(&auth_redirect_target(path))?))
    } else if status.is_loading {
        Ok(Some(Html(render_pending(label)).into_response()))
    } else {
        Ok(None)
    }
}

fn api_gate(status: AuthStatus, path: &str) -> Result<(), AppError> {
    if status.is_authenticated {
        Ok(())
    } else if status.is_loading {
        Err(AppError::AuthPending)
    } else {
        Err(AppError::Unauthorized {
            redirect_to: auth_redirect_target(path),
        })
    }
}

fn view_not_found(view_id: Uuid) -> AppError {
    AppError::NotFound(format!("View {view_id} not found"))
}

fn render_page(state: &AppState, view_id: Uuid) -> Result<Response, AppError> {
    let html = state
        .views
        .with_session(view_id, |s| render_view(s))
        .ok_or_else(|| view_not_found(view_id))??;
    Ok(Html(html).into_response())
}

fn view_model(state: &AppState, view_id: Uuid) -> Result<ViewModel, AppError> {
    state
        .views
        .with_session(view_id, |s| s.view_model())
        .ok_or_else(|| view_not_found(view_id))
}

fn toggle_panel(
    state: &AppState,
    view_id: Uuid,
    item: &str,
) -> Result<DisclosureSnapshot, AppError> {
    let snapshot = state
        .views
        .with_session(view_id, |s| {
            s.disclosure.toggle(item)?;
            Ok::<_, AppError>(s.disclosure.snapshot())
        })
        .ok_or_else(|| view_not_found(view_id))??;
    Ok(snapshot)
}

/// GET /
pub async fn handle_home_page(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let status = auth_status(&state, &headers).await?;
    if let Some(gate) = page_gate(status, "/", "your resumes")? {
        return Ok(gate);
    }
    let resumes = list_resumes(state.kv.as_ref()).await?;
    Ok(Html(render_home(&resumes)).into_response())
}

/// GET /resume/:id
pub async fn handle_resume_page(
    State(state): State<AppState>,
    Path(resume_id): Path<String>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let caller = caller(&state, &headers).await?;
    if let Some(gate) = page_gate(caller.status, &format!("/resume/{resume_id}"), &resume_id)? {
        return Ok(gate);
    }

    let loaded = state.loader().load(&resume_id).await;
    let view_id = state.views.open(&resume_id, caller.token.as_deref(), loaded);
    render_page(&state, view_id)
}

/// GET /views/:view_id
pub async fn handle_view_page(
    State(state): State<AppState>,
    Path(view_id): Path<Uuid>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let status = auth_status(&state, &headers).await?;
    if let Some(gate) = page_gate(status, &format!("/views/{view_id}"), &view_id.to_string())? {
        return Ok(gate);
    }
    render_page(&state, view_id)
}

/// POST /views/:view_id/panels/:item/toggle
pub async fn handle_toggle_page(
    State(state): State<AppState>,
    Path((view_id, item)): Path<(Uuid, String)>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let path = format!("/views/{view_id}");
    let status = auth_status(&state, &headers).await?;
    if let Some(gate) = page_gate(status, &path, &view_id.to_string())? {
        return Ok(gate);
    }
    toggle_panel(&state, view_id, &item)?;
    see_other(&path)
}

/// GET /blobs/:blob_id
pub async fn handle_blob(
    State(state): State<AppState>,
    Path(blob_id): Path<Uuid>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let status = auth_status(&state, &headers).await?;
    api_gate(status, &format!("/blobs/{blob_id}"))?;
    let blob = state
        .blobs
        .get(blob_id)
        .ok_or_else(|| AppError::NotFound(format!("Blob {blob_id} not found")))?;
    Ok(([(header::CONTENT_TYPE, blob.content_type)], blob.bytes).into_response())
}

/// POST /api/v1/views
pub async fn handle_create_view(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<CreateViewRequest>,
) -> Result<(StatusCode, Json<ViewModel>), AppError> {
    let caller = caller(&state, &headers).await?;
    api_gate(caller.status, &format!("/resume/{}", req.resume_id))?;

    let loaded = state.loader().load(&req.resume_id).await;
    let view_id = state
        .views
        .open(&req.resume_id, caller.token.as_deref(), loaded);
    Ok((StatusCode::CREATED, Json(view_model(&state, view_id)?)))
}

/// GET /api/v1/views/:view_id
pub async fn handle_get_view(
    State(state): State<AppState>,
    Path(view_id): Path<Uuid>,
    headers: HeaderMap,
) -> Result<Json<ViewModel>, AppError> {
    let status = auth_status(&state, &headers).await?;
    api_gate(status, &format!("/views/{view_id}"))?;
    Ok(Json(view_model(&state, view_id)?))
}

/// POST /api/v1/views/:view_id/reload
pub async fn handle_reload_view(
    State(state): State<AppState>,
    Path(view_id): Path<Uuid>,
    headers: HeaderMap,
) -> Result<Json<ViewModel>, AppError> {
    let status = auth_status(&state, &headers).await?;
    api_gate(status, &format!("/views/{view_id}"))?;

    let resume_id = state
        .views
        .resume_id(view_id)
        .ok_or_else(|| view_not_found(view_id))?;
    let loaded = state.loader().load(&resume_id).await;
    // The view may have been closed while loading; the new leases then drop here.
    if !state.views.replace(view_id, loaded) {
        return Err(view_not_found(view_id));
    }
    Ok(Json(view_model(&state, view_id)?))
}

/// POST /api/v1/views/:view_id/panels/:item/toggle
pub async fn handle_toggle_panel(
    State(state): State<AppState>,
    Path((view_id, item)): Path<(Uuid, String)>,
    headers: HeaderMap,
) -> Result<Json<DisclosureSnapshot>, AppError> {
    let status = auth_status(&state, &headers).await?;
    api_gate(status, &format!("/views/{view_id}"))?;
    Ok(Json(toggle_panel(&state, view_id, &item)?))
}

/// DELETE /api/v1/views/:view_id
pub async fn handle_close_view(
    State(state): State<AppState>,
    Path(view_id): Path<Uuid>,
    headers: HeaderMap,
) -> Result<StatusCode, AppError> {
    let status = auth_status(&state, &headers).await?;
    api_gate(status, &format!("/views/{view_id}"))?;
    if state.views.remove(view_id) {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(view_not_found(view_id))
    }
}
