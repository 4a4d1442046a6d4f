use crate::entities::Role;
use crate::error::{AppError, AppResult};
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // user_id
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merchant_id: Option<i64>,
    pub exp: i64,
    pub iat: i64,
    pub token_type: String,
}

#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    access_token_expires_in: i64,
}

impl JwtService {
    pub fn new(secret: &str, access_expires_in: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            access_token_expires_in: access_expires_in,
        }
    }

    pub fn generate_access_token(
        &self,
        user_id: i64,
        role: Role,
        merchant_id: Option<i64>,
    ) -> AppResult<String> {
        let now = Utc::now();
        let exp = now + Duration::seconds(self.access_token_expires_in);

        let claims = Claims {
            sub: user_id.to_string(),
            role,
            merchant_id,
            exp: exp.timestamp(),
            iat: now.timestamp(),
            token_type: "access".to_string(),
        };

        encode(&Header::default(), &claims, &self.encoding_key).map_err(AppError::JwtError)
    }

    pub fn verify_token(&self, token: &str) -> AppResult<Claims> {
        let validation = Validation::new(Algorithm::HS256);
        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(AppError::JwtError)
    }

    pub fn verify_access_token(&self, token: &str) -> AppResult<Claims> {
        let claims = self.verify_token(token)?;

        if claims.token_type != "access" {
            return Err(AppError::AuthError("Invalid access token type".to_string()));
        }

        Ok(claims)
    }

    /// 从 Claims 中解析用户ID
    pub fn user_id(claims: &Claims) -> AppResult<i64> {
        claims
            .sub
            .parse::<i64>()
            .map_err(|_| AppError::AuthError("Invalid access token".to_string()))
    }

    pub fn get_access_token_expires_in(&self) -> i64 {
        self.access_token_expires_in
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_and_verify_access_token() {
        let service = JwtService::new("test-secret", 3600);
        let token = service.generate_access_token(42, Role::Merchant, Some(7)).unwrap();
        let claims = service.verify_access_token(&token).unwrap();
        assert_eq!(JwtService::user_id(&claims).unwrap(), 42);
        assert_eq!(claims.role, Role::Merchant);
        assert_eq!(claims.merchant_id, Some(7));
    }

    #[test]
    fn test_token_signed_with_other_secret_is_rejected() {
        let issuer = JwtService::new("secret-a", 3600);
        let verifier = JwtService::new("secret-b", 3600);
        let token = issuer.generate_access_token(1, Role::Admin, None).unwrap();
        assert!(verifier.verify_access_token(&token).is_err());
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let service = JwtService::new("test-secret", -3600);
        let token = service.generate_access_token(1, Role::Member, None).unwrap();
        assert!(service.verify_access_token(&token).is_err());
    }
}
