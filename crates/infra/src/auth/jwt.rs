//! HS256 JSON Web Tokens for API authentication

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use timebook_core::{IssuedToken, TokenClaims, TokenIssuer};
use timebook_domain::{Result as DomainResult, TimebookError, User};
use tracing::{debug, error};

const INVALID_TOKEN: &str = "Invalid or expired token";

/// Signs and checks access tokens with a shared secret
pub struct JwtTokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    /// `None` when the configured lifetime does not fit a `Duration`.
    ttl: Option<Duration>,
}

impl JwtTokenIssuer {
    /// Create an issuer whose tokens live for `ttl_seconds`.
    pub fn new(secret: &str, ttl_seconds: u64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl: i64::try_from(ttl_seconds).ok().and_then(Duration::try_seconds),
        }
    }
}

impl TokenIssuer for JwtTokenIssuer {
    fn issue(&self, user: &User) -> DomainResult<IssuedToken> {
        let issued_at = Utc::now();
        let expires_at =
            self.ttl.and_then(|ttl| issued_at.checked_add_signed(ttl)).ok_or_else(|| {
                error!(user_id = %user.id, "token lifetime overflows the clock");
                TimebookError::Config("auth.token_ttl_seconds is too large".to_string())
            })?;
        let claims = TokenClaims {
            sub: user.id.clone(),
            adm: user.is_admin,
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding).map_err(|e| {
            error!(error = %e, user_id = %user.id, "failed to sign access token");
            TimebookError::Internal(format!("failed to sign token: {e}"))
        })?;

        Ok(IssuedToken { token, expires_at })
    }

    fn verify(&self, token: &str) -> DomainResult<TokenClaims> {
        decode::<TokenClaims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                debug!(error = %e, "rejected access token");
                TimebookError::Auth(INVALID_TOKEN.to_string())
            })
    }
}

#[cfg(test)]
mod tests {
    use timebook_domain::{EmploymentType, User};

    use super::*;

    fn user(is_admin: bool) -> User {
        let now = Utc::now();
        User {
            id: "u1".into(),
            number: 1,
            username: "ana".into(),
            email: "ana@example.com".into(),
            id_number: "12345".into(),
            first_name: "Ana".into(),
            last_name: "Horvat".into(),
            phone: None,
            is_admin,
            employment_type: EmploymentType::default(),
            hourly_rate: None,
            travel_rate: None,
            rates: Vec::new(),
            last_report_day: 0,
            archived: false,
            password_hash: String::new(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn issued_token_verifies() {
        let issuer = JwtTokenIssuer::new("test-secret", 3600);
        let issued = issuer.issue(&user(true)).unwrap();

        let claims = issuer.verify(&issued.token).unwrap();
        assert_eq!(claims.sub, "u1");
        assert!(claims.adm);
        assert_eq!(claims.exp, issued.expires_at.timestamp());
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn foreign_signature_is_rejected() {
        let issued = JwtTokenIssuer::new("secret-a", 3600).issue(&user(false)).unwrap();
        let err = JwtTokenIssuer::new("secret-b", 3600).verify(&issued.token).unwrap_err();

        assert_eq!(err, TimebookError::Auth(INVALID_TOKEN.to_string()));
    }

    #[test]
    fn expired_token_is_rejected() {
        let issuer = JwtTokenIssuer::new("test-secret", 3600);
        let now = Utc::now().timestamp();
        let claims = TokenClaims { sub: "u1".into(), adm: false, iat: now - 7200, exp: now - 3600 };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &issuer.encoding).unwrap();

        assert!(matches!(issuer.verify(&token), Err(TimebookError::Auth(_))));
    }

    #[test]
    fn oversized_lifetime_fails_without_panicking() {
        for ttl in [u64::MAX, i64::MAX as u64, 9_000_000_000_000] {
            let err = JwtTokenIssuer::new("test-secret", ttl).issue(&user(false)).unwrap_err();
            assert!(matches!(err, TimebookError::Config(_)), "{ttl}: {err:?}");
        }
    }

    #[test]
    fn garbage_is_rejected() {
        let issuer = JwtTokenIssuer::new("test-secret", 3600);
        assert!(matches!(issuer.verify("not.a.token"), Err(TimebookError::Auth(_))));
    }
}
