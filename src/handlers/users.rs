// src/handlers/users.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use validator::Validate;

use crate::{
    common::{
        error::{ApiError, AppError},
        response::ApiResponse,
    },
    config::AppState,
    middleware::{
        i18n::Locale,
        rbac::{PermUsersManage, RequirePermission},
    },
    models::auth::{AssignPermissionsPayload, CreateUserPayload, Permission, SetActivePayload, User},
};

#[utoipa::path(
    get,
    path = "/api/usuarios",
    tag = "Usuarios",
    security(("api_jwt" = [])),
    responses(
        (status = 200, description = "Lista de usuários", body = [User]),
        (status = 403, description = "Sem permissão")
    )
)]
pub async fn list_users(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequirePermission<PermUsersManage>,
) -> Result<impl IntoResponse, ApiError> {
    let users = app_state
        .user_service
        .list_users()
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(ApiResponse::data(users)))
}

#[utoipa::path(
    post,
    path = "/api/usuarios/crear",
    tag = "Usuarios",
    security(("api_jwt" = [])),
    request_body = CreateUserPayload,
    responses(
        (status = 201, description = "Usuário criado", body = User),
        (status = 409, description = "Usuário já existe")
    )
)]
pub async fn create_user(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequirePermission<PermUsersManage>,
    Json(payload): Json<CreateUserPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let user = app_state
        .user_service
        .create_user(&payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(user, "Usuario creado")),
    ))
}

pub async fn set_user_active(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequirePermission<PermUsersManage>,
    Path(user_id): Path<i32>,
    Json(payload): Json<SetActivePayload>,
) -> Result<impl IntoResponse, ApiError> {
    let user = app_state
        .user_service
        .set_active(user_id, payload.active)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(ApiResponse::data(user)))
}

pub async fn delete_user(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequirePermission<PermUsersManage>,
    Path(user_id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .user_service
        .delete_user(user_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(ApiResponse::message("Usuario eliminado")))
}

pub async fn user_permissions(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequirePermission<PermUsersManage>,
    Path(user_id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let permissions = app_state
        .user_service
        .permissions_of(user_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(ApiResponse::data(permissions)))
}

#[utoipa::path(
    get,
    path = "/api/permisos",
    tag = "Usuarios",
    security(("api_jwt" = [])),
    responses((status = 200, description = "Catálogo de permissões", body = [Permission]))
)]
pub async fn list_permissions(
    State(app_state): State<AppState>,
    locale: Locale,
) -> Result<impl IntoResponse, ApiError> {
    let permissions = app_state
        .user_service
        .list_permissions()
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(ApiResponse::data(permissions)))
}

// Substitui o conjunto inteiro (nomes desconhecidos → 400)
#[utoipa::path(
    post,
    path = "/api/usuarios/asignar-permisos",
    tag = "Usuarios",
    security(("api_jwt" = [])),
    request_body = AssignPermissionsPayload,
    responses(
        (status = 200, description = "Permissões atribuídas", body = [String]),
        (status = 400, description = "Permissão desconhecida")
    )
)]
pub async fn assign_permissions(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequirePermission<PermUsersManage>,
    Json(payload): Json<AssignPermissionsPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let granted = app_state
        .user_service
        .assign_permissions(payload.user_id, &payload.permissions)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(ApiResponse::with_message(granted, "Permisos asignados")))
}
