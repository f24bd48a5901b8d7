//! HS256 JSON Web Token implementation of the `TokenIssuer` port.
//!
//! Claims carry the account id as `sub`, the issue time as `iat`, and an
//! `exp` only when a lifetime is configured. Expiry is checked against the
//! injected clock rather than the system time.

use std::sync::Arc;

use chrono::TimeDelta;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use mockable::Clock;
use serde::{Deserialize, Serialize};

use crate::domain::ports::{TokenIssuer, TokenIssuerError};
use crate::domain::{AccessToken, AccountId};

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    iat: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    exp: Option<i64>,
}

/// Signs and validates bearer tokens with a shared secret.
#[derive(Clone)]
pub struct JwtTokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Option<TimeDelta>,
    clock: Arc<dyn Clock>,
}

impl JwtTokenIssuer {
    /// Build an issuer for `secret`.
    ///
    /// `ttl` of `None` issues tokens that never expire.
    pub fn new(secret: &[u8], ttl: Option<TimeDelta>, clock: Arc<dyn Clock>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.set_required_spec_claims(&["sub"]);
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
            ttl,
            clock,
        }
    }
}

impl TokenIssuer for JwtTokenIssuer {
    fn issue(&self, account_id: &AccountId) -> Result<AccessToken, TokenIssuerError> {
        let now = self.clock.utc();
        let claims = Claims {
            sub: account_id.to_string(),
            iat: now.timestamp(),
            exp: self.ttl.map(|ttl| (now + ttl).timestamp()),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map(AccessToken::new)
            .map_err(|err| TokenIssuerError::signing(err.to_string()))
    }

    fn validate(&self, token: &str) -> Result<AccountId, TokenIssuerError> {
        let data = decode::<Claims>(token, &self.decoding, &self.validation)
            .map_err(|err| TokenIssuerError::invalid(err.to_string()))?;
        if data
            .claims
            .exp
            .is_some_and(|exp| exp <= self.clock.utc().timestamp())
        {
            return Err(TokenIssuerError::expired());
        }
        data.claims
            .sub
            .parse()
            .map_err(|_| TokenIssuerError::invalid("subject is not an account id"))
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for JWT issuing and validation.
    use super::*;
    use chrono::{DateTime, Utc};
    use mockable::MockClock;
    use rstest::rstest;

    const SECRET: &[u8] = b"test-signing-secret-with-enough-entropy";

    fn clock_at(timestamp: i64) -> Arc<dyn Clock> {
        let at = DateTime::<Utc>::from_timestamp(timestamp, 0).expect("valid timestamp");
        let mut clock = MockClock::new();
        clock.expect_utc().return_const(at);
        Arc::new(clock)
    }

    #[rstest]
    fn issued_tokens_resolve_to_their_subject() {
        let issuer = JwtTokenIssuer::new(SECRET, None, clock_at(1_700_000_000));
        let account = AccountId::random();

        let token = issuer.issue(&account).expect("issue");

        assert_eq!(issuer.validate(token.as_str()).expect("validate"), account);
    }

    #[rstest]
    fn tokens_without_lifetime_never_expire() {
        let issued = JwtTokenIssuer::new(SECRET, None, clock_at(1_700_000_000))
            .issue(&AccountId::random())
            .expect("issue");
        let much_later = JwtTokenIssuer::new(SECRET, None, clock_at(2_500_000_000));

        assert!(much_later.validate(issued.as_str()).is_ok());
    }

    #[rstest]
    #[case(3_599, true)]
    #[case(3_600, false)]
    fn lifetime_is_enforced_with_the_clock(#[case] elapsed: i64, #[case] valid: bool) {
        let ttl = Some(TimeDelta::hours(1));
        let token = JwtTokenIssuer::new(SECRET, ttl, clock_at(1_700_000_000))
            .issue(&AccountId::random())
            .expect("issue");
        let checker = JwtTokenIssuer::new(SECRET, ttl, clock_at(1_700_000_000 + elapsed));

        let result = checker.validate(token.as_str());
        if valid {
            assert!(result.is_ok());
        } else {
            assert_eq!(result, Err(TokenIssuerError::Expired));
        }
    }

    #[rstest]
    #[case("")]
    #[case("not-a-token")]
    #[case("eyJhbGciOiJIUzI1NiJ9.e30.c2lnbmF0dXJl")]
    fn garbage_is_invalid(#[case] token: &str) {
        let issuer = JwtTokenIssuer::new(SECRET, None, clock_at(1_700_000_000));
        assert!(matches!(
            issuer.validate(token),
            Err(TokenIssuerError::Invalid { .. })
        ));
    }

    #[rstest]
    fn tokens_signed_with_another_secret_are_invalid() {
        let token = JwtTokenIssuer::new(b"another-secret", None, clock_at(1_700_000_000))
            .issue(&AccountId::random())
            .expect("issue");
        let issuer = JwtTokenIssuer::new(SECRET, None, clock_at(1_700_000_000));

        assert!(matches!(
            issuer.validate(token.as_str()),
            Err(TokenIssuerError::Invalid { .. })
        ));
    }
}
