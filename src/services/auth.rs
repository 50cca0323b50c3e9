// src/services/auth.rs

use bcrypt::{hash, verify};
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::MemoryStore,
    models::auth::{AuthResponse, Claims, User, UserStatus},
};

#[derive(Clone)]
pub struct AuthService {
    store: MemoryStore,
    jwt_secret: String,
}

impl AuthService {
    pub fn new(store: MemoryStore, jwt_secret: String) -> Self {
        Self { store, jwt_secret }
    }

    pub async fn login_user(&self, email: &str, password: &str) -> Result<AuthResponse, AppError> {
        // 1. Busca o usuário (só leitura; o guard é solto antes do bcrypt)
        let (user_id, password_hash, status) = {
            let data = self.store.read().await;
            let user = data
                .user_by_email(email)
                .ok_or(AppError::InvalidCredentials)?;
            (user.id, user.password_hash.clone(), user.status)
        };

        if status == UserStatus::Inactive {
            return Err(AppError::InactiveUser);
        }

        // 2. Verifica a senha em uma thread separada (bcrypt é pesado)
        let password_clone = password.to_owned();
        let is_password_valid = tokio::task::spawn_blocking(move || {
            verify(&password_clone, &password_hash)
        })
        .await
        .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {}", e))??;

        if !is_password_valid {
            return Err(AppError::InvalidCredentials);
        }

        // 3. Marca o login: atualiza last_login e ativa convidados
        let user = {
            let mut data = self.store.write().await;
            let user = data.user_mut(user_id).ok_or(AppError::UserNotFound)?;
            user.last_login = Some(Utc::now());
            if user.status == UserStatus::Invited {
                user.status = UserStatus::Active;
            }
            user.clone()
        };

        let token = self.create_token(user.id)?;
        let force_password_change = user.force_password_change;

        Ok(AuthResponse {
            token,
            user,
            force_password_change,
        })
    }

    // Troca de senha do próprio usuário. Se `force_password_change` está
    // ativo (primeiro acesso), a senha atual não é exigida.
    pub async fn change_password(
        &self,
        user_id: Uuid,
        current_password: Option<&str>,
        new_password: &str,
    ) -> Result<(), AppError> {
        let (current_hash, force_change) = {
            let data = self.store.read().await;
            let user = data.user(user_id).ok_or(AppError::UserNotFound)?;
            (user.password_hash.clone(), user.force_password_change)
        };

        if !force_change {
            let provided = current_password.ok_or_else(|| {
                AppError::InvalidInput("Informe a senha atual.".to_string())
            })?;
            let provided = provided.to_owned();
            let is_valid = tokio::task::spawn_blocking(move || verify(&provided, &current_hash))
                .await
                .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {}", e))??;
            if !is_valid {
                return Err(AppError::InvalidCredentials);
            }
        }

        let new_password = new_password.to_owned();
        let new_hash = tokio::task::spawn_blocking(move || hash(&new_password, bcrypt::DEFAULT_COST))
            .await
            .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;

        let mut data = self.store.write().await;
        let user = data.user_mut(user_id).ok_or(AppError::UserNotFound)?;
        user.password_hash = new_hash;
        user.force_password_change = false;
        user.updated_at = Utc::now();

        Ok(())
    }

    pub async fn validate_token(&self, token: &str) -> Result<User, AppError> {
        let validation = Validation::default();
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_ref()),
            &validation,
        )
        .map_err(|_| AppError::InvalidToken)?;

        let data = self.store.read().await;
        data.user(token_data.claims.sub)
            .cloned()
            .ok_or(AppError::UserNotFound)
    }

    fn create_token(&self, user_id: Uuid) -> Result<String, AppError> {
        let now = Utc::now();
        let expires_at = now + chrono::Duration::days(7);

        let claims = Claims {
            sub: user_id,
            exp: expires_at.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        Ok(encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_ref()),
        )?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::store::test_support::{company, user};
    use crate::db::StoreData;
    use crate::models::auth::Role;

    fn service_with_user(mut seeded: crate::models::auth::User) -> (AuthService, Uuid) {
        // Custo mínimo do bcrypt: suficiente para o teste, rápido de rodar
        seeded.password_hash = bcrypt::hash("password123", 4).unwrap();
        let user_id = seeded.id;

        let mut data = StoreData::default();
        let c = company();
        seeded.company_id = Some(c.id);
        data.companies.push(c);
        data.users.push(seeded);

        let store = MemoryStore::new(data);
        (AuthService::new(store, "segredo-de-teste".into()), user_id)
    }

    #[tokio::test]
    async fn login_issues_token_and_marks_the_login() {
        let mut invited = user(Role::Client, None, vec![]);
        invited.status = UserStatus::Invited;
        invited.email = "maria.g@client.com".into();
        let (service, user_id) = service_with_user(invited);

        let response = service
            .login_user("maria.g@client.com", "password123")
            .await
            .unwrap();

        assert!(!response.token.is_empty());
        assert_eq!(response.user.id, user_id);
        assert!(response.user.last_login.is_some());
        // Convidado vira Ativo no primeiro login
        assert_eq!(response.user.status, UserStatus::Active);

        // O token emitido valida de volta para o mesmo usuário
        let validated = service.validate_token(&response.token).await.unwrap();
        assert_eq!(validated.id, user_id);
    }

    #[tokio::test]
    async fn wrong_password_is_rejected() {
        let u = user(Role::Admin, None, vec![]);
        let email = u.email.clone();
        let (service, _) = service_with_user(u);

        let result = service.login_user(&email, "senha-errada").await;
        assert!(matches!(result, Err(AppError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn inactive_user_cannot_login() {
        let mut u = user(Role::Technician, None, vec![]);
        u.status = UserStatus::Inactive;
        let email = u.email.clone();
        let (service, _) = service_with_user(u);

        let result = service.login_user(&email, "password123").await;
        assert!(matches!(result, Err(AppError::InactiveUser)));
    }

    #[tokio::test]
    async fn forced_change_skips_current_password_and_clears_the_flag() {
        let mut u = user(Role::Client, None, vec![]);
        u.force_password_change = true;
        let email = u.email.clone();
        let (service, user_id) = service_with_user(u);

        service
            .change_password(user_id, None, "senha-nova-123")
            .await
            .unwrap();

        let response = service.login_user(&email, "senha-nova-123").await.unwrap();
        assert!(!response.force_password_change);
    }
}
