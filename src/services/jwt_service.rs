use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::env;

use crate::models::user::User;
use crate::utils::errors::AppError;

/// Claims del JWT
#[derive(Debug, Serialize, Deserialize)]
pub struct JwtClaims {
    pub sub: String,
    pub username: String,
    pub role: String,
    pub exp: i64,
    pub iat: i64,
}

/// Configuración JWT
pub struct JwtConfig {
    pub secret: String,
    pub algorithm: Algorithm,
    pub access_token_duration: Duration,
}

impl JwtConfig {
    pub fn new() -> Self {
        let secret = env::var("JWT_SECRET")
            .unwrap_or_else(|_| "tracker-dev-secret-change-in-production".to_string());

        Self {
            secret,
            algorithm: Algorithm::HS256,
            access_token_duration: Duration::hours(24),
        }
    }
}

/// Servicio JWT
pub struct JwtService {
    config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl JwtService {
    pub fn new() -> Self {
        let config = JwtConfig::new();
        let encoding_key = EncodingKey::from_secret(config.secret.as_ref());
        let decoding_key = DecodingKey::from_secret(config.secret.as_ref());

        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    /// Genera un token de acceso para un usuario
    pub fn generate_access_token(&self, user: &User) -> Result<String, AppError> {
        let now = Utc::now();
        let exp = now + self.config.access_token_duration;

        let claims = JwtClaims {
            sub: user.id.to_string(),
            username: user.username.clone(),
            role: user.role.clone(),
            exp: exp.timestamp(),
            iat: now.timestamp(),
        };

        encode(&Header::new(self.config.algorithm), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(format!("Error generando JWT: {}", e)))
    }

    /// Valida y decodifica un token
    pub fn validate_token(&self, token: &str) -> Result<JwtClaims, AppError> {
        let validation = Validation::new(self.config.algorithm);

        decode::<JwtClaims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|_| AppError::Unauthorized("Token inválido".to_string()))
    }
}

impl Default for JwtService {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn test_user() -> User {
        User {
            id: Uuid::new_v4(),
            username: "jane.roe".to_string(),
            email: "jane@example.org".to_string(),
            password_hash: "x".to_string(),
            full_name: "Jane Roe".to_string(),
            role: "driver".to_string(),
            is_active: true,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_generate_and_validate_token() {
        let jwt_service = JwtService::new();
        let user = test_user();

        let token = jwt_service.generate_access_token(&user).unwrap();
        assert!(!token.is_empty());

        let claims = jwt_service.validate_token(&token).unwrap();
        assert_eq!(claims.sub, user.id.to_string());
        assert_eq!(claims.username, "jane.roe");
        assert_eq!(claims.role, "driver");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_garbage_token_is_rejected() {
        let jwt_service = JwtService::new();
        assert!(jwt_service.validate_token("not-a-token").is_err());
    }
}
