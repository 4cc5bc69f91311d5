//! Tests for session token issue and verification.

use crate::identity::{
    domain::{AccessRole, Identity, UserId},
    services::{MAX_TOKEN_TTL_HOURS, TokenCodec, TokenError},
};
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use rstest::{fixture, rstest};

#[fixture]
fn codec() -> TokenCodec {
    TokenCodec::new(b"terreiro-test-secret", TimeDelta::hours(12)).expect("valid codec")
}

#[fixture]
fn issued_at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 7, 19, 0, 0)
        .single()
        .expect("valid timestamp")
}

#[fixture]
fn identity() -> Identity {
    Identity::new(UserId::new(), AccessRole::User)
}

#[rstest]
fn issued_token_verifies_to_the_same_identity(
    codec: TokenCodec,
    issued_at: DateTime<Utc>,
    identity: Identity,
) {
    let token = codec.issue(&identity, issued_at).expect("token issues");

    assert_eq!(token.expires_at(), issued_at + TimeDelta::hours(12));
    assert_eq!(
        codec.verify(token.as_str(), issued_at + TimeDelta::hours(11)),
        Some(identity)
    );
}

#[rstest]
#[case(TimeDelta::hours(12))]
#[case(TimeDelta::hours(13))]
fn token_is_rejected_once_expired(
    codec: TokenCodec,
    issued_at: DateTime<Utc>,
    identity: Identity,
    #[case] elapsed: TimeDelta,
) {
    let token = codec.issue(&identity, issued_at).expect("token issues");
    assert_eq!(codec.verify(token.as_str(), issued_at + elapsed), None);
}

#[rstest]
fn token_with_forged_role_is_rejected(
    codec: TokenCodec,
    issued_at: DateTime<Utc>,
    identity: Identity,
) {
    let token = codec.issue(&identity, issued_at).expect("token issues");
    let (_, signature) = token.as_str().split_once('.').expect("two segments");
    let forged_claims = serde_json::json!({
        "sub": identity.user_id(),
        "role": "admin",
        "iat": issued_at.timestamp(),
        "exp": (issued_at + TimeDelta::hours(12)).timestamp(),
    });
    let forged_payload = URL_SAFE_NO_PAD.encode(forged_claims.to_string());
    let forged = format!("{forged_payload}.{signature}");

    assert_eq!(codec.verify(&forged, issued_at), None);
}

#[rstest]
fn token_signed_with_another_secret_is_rejected(
    codec: TokenCodec,
    issued_at: DateTime<Utc>,
    identity: Identity,
) {
    let other = TokenCodec::new(b"another-secret", TimeDelta::hours(12)).expect("valid codec");
    let token = other.issue(&identity, issued_at).expect("token issues");

    assert_eq!(codec.verify(token.as_str(), issued_at), None);
}

#[rstest]
#[case("")]
#[case("no-separator")]
#[case("!!!.???")]
#[case("e30.AAAA")]
fn malformed_tokens_are_rejected(codec: TokenCodec, issued_at: DateTime<Utc>, #[case] raw: &str) {
    assert_eq!(codec.verify(raw, issued_at), None);
}

#[rstest]
fn codec_rejects_empty_secret_and_non_positive_ttl() {
    assert_eq!(
        TokenCodec::new(b"", TimeDelta::hours(1)).map(|_| ()),
        Err(TokenError::EmptySecret)
    );
    assert_eq!(
        TokenCodec::new(b"secret", TimeDelta::zero()).map(|_| ()),
        Err(TokenError::NonPositiveTtl)
    );
}

#[rstest]
fn codec_rejects_lifetime_beyond_a_year() {
    assert_eq!(
        TokenCodec::new(b"secret", TimeDelta::hours(MAX_TOKEN_TTL_HOURS + 1)).map(|_| ()),
        Err(TokenError::TtlTooLong)
    );
    assert!(TokenCodec::new(b"secret", TimeDelta::hours(MAX_TOKEN_TTL_HOURS)).is_ok());
}

#[rstest]
fn expiry_past_the_calendar_end_is_an_error(codec: TokenCodec, identity: Identity) {
    let result = codec.issue(&identity, DateTime::<Utc>::MAX_UTC);
    assert_eq!(result, Err(TokenError::ExpiryOutOfRange));
}

#[rstest]
fn codec_debug_output_hides_the_secret(codec: TokenCodec) {
    let rendered = format!("{codec:?}");
    assert!(!rendered.contains("terreiro-test-secret"));
}
