// src/middleware/rbac.rs

use std::marker::PhantomData;

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts},
};

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{auth::AuthenticatedUser, i18n::Locale},
};

/// 1. O Trait que define o que é uma Permissão
pub trait PermissionDef: Send + Sync + 'static {
    fn slug() -> &'static str;
}

/// 2. O Extractor (Guardião)
pub struct RequirePermission<T>(pub PhantomData<T>);

// 3. Implementação do FromRequestParts
impl<T, S> FromRequestParts<S> for RequirePermission<T>
where
    T: PermissionDef,
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);
        let locale = Locale::from_header(
            parts
                .headers
                .get(header::ACCEPT_LANGUAGE)
                .and_then(|v| v.to_str().ok()),
        );
        let reject = |e: AppError| e.to_api_error(&locale, &app_state.i18n_store);

        // A. Extrai Usuário
        let user = parts
            .extensions
            .get::<AuthenticatedUser>()
            .ok_or_else(|| reject(AppError::InvalidToken))?;

        // B. Verifica no Banco
        let required_perm = T::slug();
        let has_permission = app_state
            .user_service
            .has_permission(user.0.id, required_perm)
            .await
            .map_err(reject)?;

        if !has_permission {
            tracing::warn!(user_id = user.0.id, permission = required_perm, "Permissão negada");
            return Err(reject(AppError::MissingPermission(required_perm.to_string())));
        }

        Ok(RequirePermission(PhantomData))
    }
}

// ---
// DEFINIÇÃO DAS PERMISSÕES (TIPOS)
// ---

pub struct PermUsersManage;
impl PermissionDef for PermUsersManage {
    fn slug() -> &'static str {
        "usuarios.gestionar"
    }
}
