//! Token issuance and verification (design §4.3). A single administrator
//! credential is provisioned from the environment at startup; tokens are
//! stateless HMAC-signed JWTs carrying `subject = "superuser"`.

use std::time::Duration;

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use xkcd_types::error::DomainError;
use xkcd_types::model::Credential;
use xkcd_types::ADMIN_SUBJECT;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
}

pub struct Authenticator {
    secret: String,
    credential: Credential,
    token_ttl: Duration,
}

impl Authenticator {
    pub fn new(secret: String, credential: Credential, token_ttl: Duration) -> Self {
        Self { secret, credential, token_ttl }
    }

    pub fn login(&self, name: &str, password: &str) -> Result<String, DomainError> {
        if name != self.credential.name || password != self.credential.password {
            return Err(DomainError::InvalidCredentials);
        }

        let now = chrono::Utc::now();
        let exp = now + chrono::Duration::from_std(self.token_ttl).unwrap_or(chrono::Duration::hours(1));
        let claims = Claims { sub: ADMIN_SUBJECT.to_string(), iat: now.timestamp(), exp: exp.timestamp() };

        encode(&Header::new(Algorithm::HS256), &claims, &EncodingKey::from_secret(self.secret.as_bytes()))
            .map_err(DomainError::upstream)
    }

    /// Accepts an `Authorization` header value carrying either the `Bearer `
    /// or `Token ` prefix (design §9: both kept, neither deprecated).
    pub fn verify(&self, authorization: &str) -> Result<Claims, DomainError> {
        let token = authorization
            .strip_prefix("Bearer ")
            .or_else(|| authorization.strip_prefix("Token "))
            .ok_or_else(|| DomainError::InvalidToken("missing Bearer/Token prefix".to_string()))?;

        let validation = Validation::new(Algorithm::HS256);
        let data = decode::<Claims>(token, &DecodingKey::from_secret(self.secret.as_bytes()), &validation)
            .map_err(|e| DomainError::InvalidToken(e.to_string()))?;

        if data.claims.sub != ADMIN_SUBJECT {
            return Err(DomainError::InvalidToken("unexpected subject".to_string()));
        }
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn authenticator() -> Authenticator {
        Authenticator::new(
            "test-secret".to_string(),
            Credential { name: "admin".to_string(), password: "pw".to_string() },
            Duration::from_secs(3600),
        )
    }

    #[test]
    fn login_then_verify_round_trips() {
        let auth = authenticator();
        let token = auth.login("admin", "pw").unwrap();
        let claims = auth.verify(&format!("Bearer {token}")).unwrap();
        assert_eq!(claims.sub, "superuser");
    }

    #[test]
    fn token_prefix_is_also_accepted() {
        let auth = authenticator();
        let token = auth.login("admin", "pw").unwrap();
        assert!(auth.verify(&format!("Token {token}")).is_ok());
    }

    #[test]
    fn wrong_credentials_are_rejected() {
        let auth = authenticator();
        assert_eq!(auth.login("admin", "wrong").unwrap_err(), DomainError::InvalidCredentials);
    }

    #[test]
    fn garbage_token_is_rejected() {
        let auth = authenticator();
        assert!(auth.verify("Bearer not-a-jwt").is_err());
    }

    #[test]
    fn missing_prefix_is_rejected() {
        let auth = authenticator();
        let token = auth.login("admin", "pw").unwrap();
        assert!(auth.verify(&token).is_err());
    }

    #[test]
    fn token_signed_with_different_secret_is_rejected() {
        let auth = authenticator();
        let other = Authenticator::new(
            "other-secret".to_string(),
            Credential { name: "admin".to_string(), password: "pw".to_string() },
            Duration::from_secs(3600),
        );
        let token = other.login("admin", "pw").unwrap();
        assert!(auth.verify(&format!("Bearer {token}")).is_err());
    }
}
