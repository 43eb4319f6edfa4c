use axum::{extract::FromRequestParts, http::header};
use jsonwebtoken::{DecodingKey, Validation, decode, errors::ErrorKind};
use sea_orm::EntityTrait;
use uuid::Uuid;

use crate::{
    dto::auth::Claims,
    entity::Users,
    error::AppError,
    models::Role,
    state::AppState,
};

/// The caller resolved from a bearer token.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub role: Role,
}

impl AuthUser {
    pub fn is_staff(&self) -> bool {
        self.role.is_staff()
    }
}

pub fn authorize(user: &AuthUser, allowed: &[Role]) -> Result<(), AppError> {
    if !allowed.contains(&user.role) {
        return Err(AppError::Forbidden(format!(
            "Access denied. {} role is not authorized to access this resource.",
            user.role
        )));
    }
    Ok(())
}

pub fn ensure_admin(user: &AuthUser) -> Result<(), AppError> {
    authorize(user, &[Role::Admin])
}

pub fn ensure_staff(user: &AuthUser) -> Result<(), AppError> {
    authorize(user, &[Role::Employee, Role::Admin])
}

pub fn ensure_customer(user: &AuthUser) -> Result<(), AppError> {
    authorize(user, &[Role::Customer])
}

pub fn decode_token(token: &str, secret: &str) -> Result<Claims, AppError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|err| match err.kind() {
        ErrorKind::ExpiredSignature => {
            AppError::Unauthorized("Token expired. Please login again.".into())
        }
        _ => AppError::Unauthorized("Invalid token.".into()),
    })
}

fn bearer_token(parts: &axum::http::request::Parts) -> Result<&str, AppError> {
    let auth_header = parts
        .headers
        .get(header::AUTHORIZATION)
        .ok_or_else(|| AppError::Unauthorized("Access denied. No token provided.".into()))?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| AppError::Unauthorized("Invalid Authorization header".into()))?;

    let token = auth_str
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::Unauthorized("Invalid Authorization scheme".into()))?;
    Ok(token)
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?;
        let claims = decode_token(token, &state.config.jwt_secret)?;

        let user_id = Uuid::parse_str(&claims.sub)
            .map_err(|_| AppError::Unauthorized("Invalid token.".into()))?;

        // The role is read from the store, not the token, so role changes and
        // deactivation take effect immediately.
        let user = Users::find_by_id(user_id)
            .one(&state.orm)
            .await?
            .ok_or_else(|| AppError::Unauthorized("Invalid token. User not found.".into()))?;

        if !user.is_active {
            return Err(AppError::Unauthorized(
                "Account is deactivated. Please contact support.".into(),
            ));
        }

        Ok(AuthUser {
            user_id: user.id,
            role: user.role,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{EncodingKey, Header, encode};

    fn user(role: Role) -> AuthUser {
        AuthUser {
            user_id: Uuid::new_v4(),
            role,
        }
    }

    #[test]
    fn staff_guard_allows_employee_and_admin_only() {
        assert!(ensure_staff(&user(Role::Employee)).is_ok());
        assert!(ensure_staff(&user(Role::Admin)).is_ok());
        assert!(matches!(
            ensure_staff(&user(Role::Customer)),
            Err(AppError::Forbidden(_))
        ));
    }

    #[test]
    fn customer_guard_rejects_staff() {
        assert!(ensure_customer(&user(Role::Customer)).is_ok());
        assert!(ensure_customer(&user(Role::Admin)).is_err());
    }

    #[test]
    fn expired_token_is_unauthorized() {
        let claims = Claims {
            sub: Uuid::new_v4().to_string(),
            role: Role::Customer,
            exp: 1_000,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"secret"),
        )
        .expect("encode");

        match decode_token(&token, "secret") {
            Err(AppError::Unauthorized(msg)) => assert!(msg.contains("expired")),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn wrong_secret_is_unauthorized() {
        let claims = Claims {
            sub: Uuid::new_v4().to_string(),
            role: Role::Admin,
            exp: (chrono::Utc::now().timestamp() + 3600) as usize,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"one"),
        )
        .expect("encode");

        assert!(matches!(
            decode_token(&token, "two"),
            Err(AppError::Unauthorized(_))
        ));
        assert!(decode_token(&token, "one").is_ok());
    }
}
