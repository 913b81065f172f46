//! Session token issuance and verification.
//!
//! Tokens are HS256 JWTs signed with the process-wide secret. Verification
//! is a pure function of the token, the secret and the clock: nothing is
//! persisted, so a token stays valid until its `exp` even after logout or a
//! password change.

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

use super::claims::{AuthSubject, Claims};

/// Any verification failure: malformed, bad signature, expired or an
/// unusable subject. Callers cannot tell which.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("invalid session token")]
pub struct InvalidToken;

/// Issues and verifies session tokens.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl_secs: i64,
}

impl TokenService {
    pub fn new(secret: &[u8], ttl_secs: i64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            ttl_secs,
        }
    }

    /// Validity window of every issued token, in seconds.
    pub fn ttl_secs(&self) -> i64 {
        self.ttl_secs
    }

    /// Issue a token for the given admin, valid from now.
    pub fn issue(
        &self,
        admin_id: Uuid,
        username: &str,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        self.issue_at(admin_id, username, now_secs())
    }

    pub(crate) fn issue_at(
        &self,
        admin_id: Uuid,
        username: &str,
        issued_at: i64,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let claims = Claims {
            sub: admin_id.to_string(),
            username: username.to_string(),
            iat: issued_at,
            exp: issued_at + self.ttl_secs,
        };
        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
    }

    /// Verify a token and return the admin it was issued to.
    pub fn verify(&self, token: &str) -> Result<AuthSubject, InvalidToken> {
        let claims = jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|_| InvalidToken)?
            .claims;

        // jsonwebtoken accepts exp == now; the window is half-open.
        if claims.exp <= now_secs() {
            return Err(InvalidToken);
        }

        let id = Uuid::parse_str(&claims.sub).map_err(|_| InvalidToken)?;
        Ok(AuthSubject {
            id,
            username: claims.username,
        })
    }
}

fn now_secs() -> i64 {
    chrono::Utc::now().timestamp()
}

#[cfg(test)]
mod tests {
    use super::*;
    use partytime_shared::constants::TOKEN_TTL_SECS;

    fn test_tokens() -> TokenService {
        TokenService::new(b"test-secret-key-for-testing", TOKEN_TTL_SECS)
    }

    #[test]
    fn issue_and_verify() {
        let tokens = test_tokens();
        let id = Uuid::new_v4();
        let token = tokens.issue(id, "admin").unwrap();

        let subject = tokens.verify(&token).unwrap();
        assert_eq!(subject.id, id);
        assert_eq!(subject.username, "admin");
    }

    #[test]
    fn valid_until_the_end_of_the_window() {
        let tokens = test_tokens();
        let issued = now_secs() - TOKEN_TTL_SECS + 60;
        let token = tokens.issue_at(Uuid::new_v4(), "admin", issued).unwrap();
        assert!(tokens.verify(&token).is_ok());
    }

    #[test]
    fn rejected_after_the_window() {
        let tokens = test_tokens();
        let issued = now_secs() - TOKEN_TTL_SECS - 1;
        let token = tokens.issue_at(Uuid::new_v4(), "admin", issued).unwrap();
        assert_eq!(tokens.verify(&token), Err(InvalidToken));
    }

    #[test]
    fn wrong_secret_rejected() {
        let token = test_tokens().issue(Uuid::new_v4(), "admin").unwrap();
        let other = TokenService::new(b"different-secret", TOKEN_TTL_SECS);
        assert_eq!(other.verify(&token), Err(InvalidToken));
    }

    #[test]
    fn garbage_rejected() {
        let tokens = test_tokens();
        assert_eq!(tokens.verify(""), Err(InvalidToken));
        assert_eq!(tokens.verify("not-a-valid-token"), Err(InvalidToken));
        assert_eq!(tokens.verify("a.b.c"), Err(InvalidToken));
    }

    #[test]
    fn any_payload_mutation_rejected() {
        let tokens = test_tokens();
        let token = tokens.issue(Uuid::new_v4(), "admin").unwrap();
        let parts: Vec<&str> = token.split('.').collect();
        assert_eq!(parts.len(), 3);

        let payload = parts[1];
        for (i, ch) in payload.char_indices() {
            let replacement = if ch == 'A' { 'B' } else { 'A' };
            let mut mutated = payload.to_string();
            mutated.replace_range(i..i + ch.len_utf8(), &replacement.to_string());

            let forged = format!("{}.{}.{}", parts[0], mutated, parts[2]);
            assert!(tokens.verify(&forged).is_err(), "mutation at {i} accepted");
        }
    }

    #[test]
    fn signature_mutation_rejected() {
        let tokens = test_tokens();
        let token = tokens.issue(Uuid::new_v4(), "admin").unwrap();
        let (body, sig) = token.rsplit_once('.').unwrap();
        let first = sig.chars().next().unwrap();
        let replacement = if first == 'A' { 'B' } else { 'A' };
        let forged = format!("{body}.{replacement}{}", &sig[1..]);
        assert!(tokens.verify(&forged).is_err());
    }

    #[test]
    fn unsigned_token_rejected() {
        let tokens = test_tokens();
        let token = tokens.issue(Uuid::new_v4(), "admin").unwrap();
        let (body, _) = token.rsplit_once('.').unwrap();
        assert!(tokens.verify(&format!("{body}.")).is_err());
    }
}
