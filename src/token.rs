//! Manage json web tokens.

use std::time::{SystemTime, UNIX_EPOCH};

use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode,
};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Tokens live 7 days; re-login is the only renewal path.
pub const EXPIRATION_TIME: u64 = 60 * 60 * 24 * 7;

/// Pieces of information asserted on a JWT.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Claims {
    /// Identifies the expiration time on or after which the JWT must not be
    /// accepted for processing.
    pub exp: u64,
    /// Identifies the time at which the JWT was issued.
    pub iat: u64,
    /// Identifies the organization that issued the JWT.
    pub iss: String,
    /// User ID.
    pub sub: String,
    /// User email.
    pub email: String,
}

/// Manage JWT tokens.
#[derive(Clone)]
pub struct TokenManager {
    algorithm: Algorithm,
    decoding_key: DecodingKey,
    encoding_key: EncodingKey,
    name: String,
}

impl TokenManager {
    /// Create a new [`TokenManager`] instance.
    pub fn new(name: &str, secret: &str) -> Self {
        Self {
            algorithm: Algorithm::HS256,
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            name: name.to_owned(),
        }
    }

    /// Create a new [`jsonwebtoken`].
    pub fn create(&self, user_id: &str, email: &str) -> Result<String> {
        let time = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|err| crate::error::ServerError::Internal {
                details: err.to_string(),
            })?
            .as_secs();
        let header = Header::new(self.algorithm);
        let claims = Claims {
            exp: time + EXPIRATION_TIME,
            iat: time,
            iss: self.name.clone(),
            sub: user_id.to_owned(),
            email: email.to_owned(),
        };

        Ok(encode(&header, &claims, &self.encoding_key)?)
    }

    /// Decode and check a token.
    pub fn decode(&self, token: &str) -> Result<Claims> {
        let mut validation = Validation::new(self.algorithm);
        validation.validate_exp = true;

        Ok(decode::<Claims>(token, &self.decoding_key, &validation)?.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager() -> TokenManager {
        TokenManager::new("capabnb", "secret-for-tests")
    }

    fn now() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_secs()
    }

    #[test]
    fn test_create_then_decode() {
        let token = manager().create("user-1", "a@x.com").unwrap();
        let claims = manager().decode(&token).unwrap();

        assert_eq!(claims.sub, "user-1");
        assert_eq!(claims.email, "a@x.com");
        assert_eq!(claims.iss, "capabnb");
        assert_eq!(claims.exp, claims.iat + EXPIRATION_TIME);
        assert!(claims.exp > now());
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let time = now();
        let claims = Claims {
            exp: time - 3600, // past the default leeway.
            iat: time - 3600 - EXPIRATION_TIME,
            iss: "capabnb".into(),
            sub: "user-1".into(),
            email: "a@x.com".into(),
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(b"secret-for-tests"),
        )
        .unwrap();

        assert!(manager().decode(&token).is_err());
    }

    #[test]
    fn test_foreign_signature_is_rejected() {
        let forged = TokenManager::new("capabnb", "other-secret")
            .create("user-1", "a@x.com")
            .unwrap();

        assert!(manager().decode(&forged).is_err());
    }
}
