use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, TokenData, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::Config;
use crate::error::{AppError, AppResult};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: Uuid,
    pub email: String,
    pub exp: i64,
    pub iat: i64,
}

pub fn create_token(user_id: Uuid, email: &str, config: &Config) -> AppResult<String> {
    let now = Utc::now();
    let claims = Claims {
        sub: user_id,
        email: email.to_string(),
        exp: (now + Duration::seconds(config.jwt_ttl_secs)).timestamp(),
        iat: now.timestamp(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to create token: {}", e)))
}

pub fn verify_token(token: &str, config: &Config) -> AppResult<TokenData<Claims>> {
    let mut validation = Validation::default();
    validation.validate_exp = true;

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret.as_bytes()),
        &validation,
    )
    .map_err(|_| AppError::Unauthorized)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> Config {
        Config {
            database_url: String::new(),
            host: "127.0.0.1".into(),
            port: 5000,
            frontend_url: String::new(),
            jwt_secret: "test-secret".into(),
            jwt_ttl_secs: 604800,
            gemini_api_key: String::new(),
            gemini_model: String::new(),
            overpass_url: String::new(),
            nominatim_url: String::new(),
        }
    }

    #[test]
    fn test_token_round_trip() {
        let config = test_config();
        let user_id = Uuid::new_v4();

        let token = create_token(user_id, "user@example.com", &config).unwrap();
        let data = verify_token(&token, &config).unwrap();

        assert_eq!(data.claims.sub, user_id);
        assert_eq!(data.claims.email, "user@example.com");
        assert_eq!(data.claims.exp - data.claims.iat, 604800);
    }

    #[test]
    fn test_token_rejects_wrong_secret() {
        let config = test_config();
        let token = create_token(Uuid::new_v4(), "user@example.com", &config).unwrap();

        let mut other = test_config();
        other.jwt_secret = "different-secret".into();
        assert!(verify_token(&token, &other).is_err());
    }

    #[test]
    fn test_token_rejects_garbage() {
        let config = test_config();
        assert!(verify_token("not-a-jwt", &config).is_err());
    }
}
