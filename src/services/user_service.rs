// src/services/user_service.rs

use bcrypt::hash;
use sqlx::PgPool;

use crate::{
    common::error::AppError,
    db::UserRepository,
    models::auth::{CreateUserPayload, Permission, User},
};

/// Nomes pedidos que não existem no catálogo de permissões.
pub fn unknown_permissions(requested: &[String], known: &[Permission]) -> Vec<String> {
    requested
        .iter()
        .filter(|name| !known.iter().any(|p| &p.name == *name))
        .cloned()
        .collect()
}

#[derive(Clone)]
pub struct UserService {
    repo: UserRepository,
    pool: PgPool,
}

impl UserService {
    pub fn new(repo: UserRepository, pool: PgPool) -> Self {
        Self { repo, pool }
    }

    pub async fn create_user(&self, payload: &CreateUserPayload) -> Result<User, AppError> {
        // Hashing fora do runtime async
        let password_clone = payload.password.clone();
        let hashed_password =
            tokio::task::spawn_blocking(move || hash(&password_clone, bcrypt::DEFAULT_COST))
                .await
                .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;

        let user = self
            .repo
            .create_user(
                &self.pool,
                payload.full_name.trim(),
                payload.username.trim(),
                &hashed_password,
                payload.role.trim(),
            )
            .await?;

        tracing::info!(user_id = user.id, username = %user.username, "Usuário criado");
        Ok(user)
    }

    pub async fn list_users(&self) -> Result<Vec<User>, AppError> {
        self.repo.list().await
    }

    pub async fn set_active(&self, user_id: i32, active: bool) -> Result<User, AppError> {
        let user = self.repo.set_active(user_id, active).await?;
        tracing::info!(user_id, active, "Estado do usuário alterado");
        Ok(user)
    }

    pub async fn delete_user(&self, user_id: i32) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        self.repo.clear_permissions(&mut *tx, user_id).await?;
        if !self.repo.delete_user(&mut *tx, user_id).await? {
            return Err(AppError::UserNotFound);
        }

        tx.commit().await?;
        tracing::info!(user_id, "Usuário excluído");
        Ok(())
    }

    // --- PERMISSÕES ---

    pub async fn list_permissions(&self) -> Result<Vec<Permission>, AppError> {
        self.repo.list_permissions().await
    }

    pub async fn permissions_of(&self, user_id: i32) -> Result<Vec<String>, AppError> {
        self.repo.permissions_of(user_id).await
    }

    pub async fn has_permission(&self, user_id: i32, name: &str) -> Result<bool, AppError> {
        self.repo.user_has_permission(user_id, name).await
    }

    /// Substitui o conjunto de permissões do usuário.
    pub async fn assign_permissions(
        &self,
        user_id: i32,
        names: &[String],
    ) -> Result<Vec<String>, AppError> {
        self.repo
            .find_by_id(user_id)
            .await?
            .ok_or(AppError::UserNotFound)?;

        // 1. Inicia Transação
        let mut tx = self.pool.begin().await?;

        // 2. Resolve nomes ("caja.operar") para IDs
        let permissions = self.repo.find_permissions_by_names(&mut *tx, names).await?;
        let unknown = unknown_permissions(names, &permissions);
        if !unknown.is_empty() {
            return Err(AppError::InvalidInput(format!(
                "permisos desconocidos: {}",
                unknown.join(", ")
            )));
        }

        // 3. Troca o vínculo
        let permission_ids: Vec<i32> = permissions.iter().map(|p| p.id).collect();
        self.repo.clear_permissions(&mut *tx, user_id).await?;
        self.repo.grant_permissions(&mut *tx, user_id, &permission_ids).await?;

        // 4. Commit
        tx.commit().await?;

        tracing::info!(user_id, count = permission_ids.len(), "Permissões atribuídas");
        Ok(permissions.into_iter().map(|p| p.name).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_names_missing_from_catalog() {
        let known = vec![
            Permission { id: 1, name: "caja.operar".into() },
            Permission { id: 2, name: "reportes.ver".into() },
        ];
        let requested = vec!["caja.operar".to_string(), "caja.borrar".to_string()];
        assert_eq!(unknown_permissions(&requested, &known), vec!["caja.borrar".to_string()]);
        assert!(unknown_permissions(&["reportes.ver".to_string()], &known).is_empty());
    }
}
