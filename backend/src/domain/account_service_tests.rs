//! Tests for the account service.

use std::sync::Arc;

use chrono::{DateTime, Local, TimeZone, Utc};
use mockable::Clock;
use rstest::{fixture, rstest};
use zeroize::Zeroizing;

use super::*;
use crate::domain::ports::{
    MockAccountRepository, MockCredentialHasher, MockProfessionalRepository, MockTokenIssuer,
};
use crate::domain::{
    AccountKind, CredentialHash, EmailAddress, ErrorCode, NationalId, ProfessionalId,
    ProfessionalForm, ProfessionalListing, ProfessionalProfile, RegistrationForm,
    StoredCredentials,
};

struct FixtureClock;

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0)
            .single()
            .expect("valid fixture timestamp")
    }
}

struct Doubles {
    accounts: MockAccountRepository,
    professionals: MockProfessionalRepository,
    hasher: MockCredentialHasher,
    tokens: MockTokenIssuer,
}

impl Doubles {
    fn into_service(self) -> AccountService<MockAccountRepository, MockProfessionalRepository> {
        AccountService::new(
            Arc::new(self.accounts),
            Arc::new(self.professionals),
            Arc::new(self.hasher),
            Arc::new(self.tokens),
            Arc::new(FixtureClock),
        )
    }
}

#[fixture]
fn doubles() -> Doubles {
    Doubles {
        accounts: MockAccountRepository::new(),
        professionals: MockProfessionalRepository::new(),
        hasher: MockCredentialHasher::new(),
        tokens: MockTokenIssuer::new(),
    }
}

fn account(kind: AccountKind) -> Account {
    let created = Utc
        .with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
        .single()
        .expect("valid timestamp");
    Account {
        id: AccountId::random(),
        email: EmailAddress::new("amanda.silva@email.com").expect("valid email"),
        full_name: "Amanda Silva".to_owned(),
        phone: Some("(11) 99999-1111".to_owned()),
        date_of_birth: None,
        gender: Some("Feminino".to_owned()),
        national_id: NationalId::new("123.456.789-01").expect("valid national id"),
        kind,
        created_at: created,
        updated_at: created,
    }
}

fn stored(account: Account) -> StoredCredentials {
    StoredCredentials {
        account,
        password_hash: CredentialHash::new("hashed:123456"),
    }
}

fn listing_for(owner: &Account) -> ProfessionalListing {
    ProfessionalListing {
        profile: ProfessionalProfile {
            id: ProfessionalId::random(),
            account_id: owner.id,
            license_number: "CRP 06/123456".to_owned(),
            specialty: "Psicologia Clínica".to_owned(),
            bio: None,
            experience_years: 10,
            consultation_price: 120.0,
            approach: Some("TCC".to_owned()),
            languages: "Português".to_owned(),
            is_verified: true,
            rating: 4.8,
            review_count: 45,
            is_available: true,
            created_at: owner.created_at,
            updated_at: owner.updated_at,
        },
        account: owner.into(),
    }
}

fn registration() -> Registration {
    Registration::try_from_form(RegistrationForm {
        email: Some("amanda.silva@email.com".to_owned()),
        password: Some(Zeroizing::new("123456".to_owned())),
        full_name: Some("Amanda Silva".to_owned()),
        national_id: Some("123.456.789-01".to_owned()),
        account_kind: Some("patient".to_owned()),
        ..RegistrationForm::default()
    })
    .expect("valid registration")
}

fn professional_registration() -> Registration {
    Registration::try_from_form(RegistrationForm {
        email: Some("dr.carlos@email.com".to_owned()),
        password: Some(Zeroizing::new("123456".to_owned())),
        full_name: Some("Dr. Carlos Mendes".to_owned()),
        national_id: Some("987.654.321-00".to_owned()),
        account_kind: Some("professional".to_owned()),
        professional: ProfessionalForm {
            license_number: Some("CRP 06/123456".to_owned()),
            specialty: Some("Psicologia Clínica".to_owned()),
            consultation_price: Some(150.0),
            experience_years: Some(10),
            ..ProfessionalForm::default()
        },
        ..RegistrationForm::default()
    })
    .expect("valid registration")
}

fn credentials(password: &str) -> LoginCredentials {
    LoginCredentials::try_from_parts(Some("amanda.silva@email.com"), Some(password))
        .expect("complete credentials")
}

#[rstest]
#[tokio::test]
async fn register_hashes_password_and_issues_token(mut doubles: Doubles) {
    doubles.accounts.expect_email_exists().return_once(|_| Ok(false));
    doubles
        .accounts
        .expect_national_id_exists()
        .return_once(|_| Ok(false));
    doubles
        .hasher
        .expect_hash()
        .withf(|plaintext| plaintext == "123456")
        .return_once(|_| Ok(CredentialHash::new("hashed:123456")));
    doubles
        .accounts
        .expect_insert()
        .withf(|account, hash| {
            hash.as_str() == "hashed:123456" && account.created_at == FixtureClock.utc()
        })
        .times(1)
        .return_once(|_, _| Ok(()));
    doubles
        .tokens
        .expect_issue()
        .return_once(|_| Ok(AccessToken::new("token")));

    let registered = doubles
        .into_service()
        .register(registration())
        .await
        .expect("registration succeeds");

    assert_eq!(registered.token.as_str(), "token");
    assert_eq!(registered.profile.account.kind, AccountKind::Patient);
    assert!(registered.profile.professional.is_none());
}

#[rstest]
#[tokio::test]
async fn professional_registration_creates_profile_atomically(mut doubles: Doubles) {
    doubles.accounts.expect_email_exists().return_once(|_| Ok(false));
    doubles
        .accounts
        .expect_national_id_exists()
        .return_once(|_| Ok(false));
    doubles
        .hasher
        .expect_hash()
        .return_once(|_| Ok(CredentialHash::new("hashed:123456")));
    doubles.accounts.expect_insert().never();
    doubles
        .accounts
        .expect_insert_with_profile()
        .withf(|account, _, profile| {
            profile.account_id == account.id
                && profile.specialty == "Psicologia Clínica"
                && profile.experience_years == 10
                && !profile.is_verified
                && profile.is_available
                && profile.review_count == 0
                && profile.created_at == FixtureClock.utc()
        })
        .times(1)
        .return_once(|_, _, _| Ok(()));
    doubles
        .tokens
        .expect_issue()
        .return_once(|_| Ok(AccessToken::new("token")));

    let registered = doubles
        .into_service()
        .register(professional_registration())
        .await
        .expect("registration succeeds");

    assert_eq!(registered.profile.account.kind, AccountKind::Professional);
    assert!(registered.profile.professional.is_none());
}

#[rstest]
#[case::email(true, false, "email")]
#[case::national_id(false, true, "nationalId")]
#[tokio::test]
async fn register_rejects_taken_identifiers(
    mut doubles: Doubles,
    #[case] email_taken: bool,
    #[case] national_id_taken: bool,
    #[case] field: &str,
) {
    doubles
        .accounts
        .expect_email_exists()
        .return_once(move |_| Ok(email_taken));
    doubles
        .accounts
        .expect_national_id_exists()
        .returning(move |_| Ok(national_id_taken));
    doubles.accounts.expect_insert().never();

    let err = doubles
        .into_service()
        .register(registration())
        .await
        .expect_err("duplicate rejected");

    assert_eq!(err.code(), ErrorCode::Conflict);
    let details = err.details().expect("details present");
    assert_eq!(details["field"], field);
}

#[rstest]
#[tokio::test]
async fn register_maps_raced_unique_violation_to_conflict(mut doubles: Doubles) {
    doubles.accounts.expect_email_exists().return_once(|_| Ok(false));
    doubles
        .accounts
        .expect_national_id_exists()
        .return_once(|_| Ok(false));
    doubles
        .hasher
        .expect_hash()
        .return_once(|_| Ok(CredentialHash::new("hashed")));
    doubles
        .accounts
        .expect_insert()
        .return_once(|_, _| Err(AccountRepositoryError::duplicate_email()));
    doubles.tokens.expect_issue().never();

    let err = doubles
        .into_service()
        .register(registration())
        .await
        .expect_err("conflict");
    assert_eq!(err.code(), ErrorCode::Conflict);
}

#[rstest]
#[case::unknown_email(false, false)]
#[case::wrong_password(true, false)]
#[tokio::test]
async fn login_failures_are_indistinguishable(
    mut doubles: Doubles,
    #[case] exists: bool,
    #[case] password_matches: bool,
) {
    let found = exists.then(|| stored(account(AccountKind::Patient)));
    doubles
        .accounts
        .expect_find_credentials_by_email()
        .return_once(move |_| Ok(found));
    doubles
        .hasher
        .expect_verify()
        .returning(move |_, _| Ok(password_matches));
    doubles.tokens.expect_issue().never();

    let err = doubles
        .into_service()
        .login(&credentials("wrong"))
        .await
        .expect_err("login rejected");

    assert_eq!(err.code(), ErrorCode::Unauthorized);
    assert_eq!(err.message(), "invalid credentials");
}

#[rstest]
#[tokio::test]
async fn login_embeds_professional_profile(mut doubles: Doubles) {
    let owner = account(AccountKind::Professional);
    let listing = listing_for(&owner);
    let expected_profile = listing.profile.clone();
    doubles
        .accounts
        .expect_find_credentials_by_email()
        .return_once(move |_| Ok(Some(stored(owner))));
    doubles.hasher.expect_verify().return_once(|_, _| Ok(true));
    doubles
        .tokens
        .expect_issue()
        .return_once(|_| Ok(AccessToken::new("token")));
    doubles
        .professionals
        .expect_find_by_account_id()
        .return_once(move |_| Ok(Some(listing)));

    let authenticated = doubles
        .into_service()
        .login(&credentials("123456"))
        .await
        .expect("login succeeds");

    assert_eq!(authenticated.profile.professional, Some(expected_profile));
}

#[rstest]
#[case::expired(TokenIssuerError::expired(), "token expired")]
#[case::invalid(TokenIssuerError::invalid("bad signature"), "invalid token")]
#[tokio::test]
async fn token_failures_are_unauthorized(
    mut doubles: Doubles,
    #[case] failure: TokenIssuerError,
    #[case] message: &str,
) {
    doubles
        .tokens
        .expect_validate()
        .return_once(move |_| Err(failure));

    let err = doubles
        .into_service()
        .resolve_token("garbage")
        .await
        .expect_err("token rejected");
    assert_eq!(err.code(), ErrorCode::Unauthorized);
    assert_eq!(err.message(), message);
}

#[rstest]
#[tokio::test]
async fn verify_reports_deleted_accounts_as_not_found(mut doubles: Doubles) {
    doubles.accounts.expect_find_by_id().return_once(|_| Ok(None));

    let err = doubles
        .into_service()
        .verify(&AccountId::random())
        .await
        .expect_err("missing account");
    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn wrong_current_password_leaves_hash_untouched(mut doubles: Doubles) {
    let owner = account(AccountKind::Patient);
    let id = owner.id;
    doubles
        .accounts
        .expect_find_credentials_by_id()
        .return_once(move |_| Ok(Some(stored(owner))));
    doubles.hasher.expect_verify().return_once(|_, _| Ok(false));
    doubles.hasher.expect_hash().never();
    doubles.accounts.expect_update_password_hash().never();

    let change = PasswordChange::try_from_parts(Some("nope"), Some("654321")).expect("complete");
    let err = doubles
        .into_service()
        .change_password(&id, &change)
        .await
        .expect_err("mismatch");
    assert_eq!(err.code(), ErrorCode::InvalidRequest);
}

#[rstest]
#[tokio::test]
async fn change_password_stores_new_hash(mut doubles: Doubles) {
    let owner = account(AccountKind::Patient);
    let id = owner.id;
    doubles
        .accounts
        .expect_find_credentials_by_id()
        .return_once(move |_| Ok(Some(stored(owner))));
    doubles
        .hasher
        .expect_verify()
        .withf(|plaintext, _| plaintext == "123456")
        .return_once(|_, _| Ok(true));
    doubles
        .hasher
        .expect_hash()
        .withf(|plaintext| plaintext == "654321")
        .return_once(|_| Ok(CredentialHash::new("hashed:654321")));
    doubles
        .accounts
        .expect_update_password_hash()
        .withf(move |target, hash, _| *target == id && hash.as_str() == "hashed:654321")
        .times(1)
        .return_once(|_, _, _| Ok(()));

    let change = PasswordChange::try_from_parts(Some("123456"), Some("654321")).expect("complete");
    doubles
        .into_service()
        .change_password(&id, &change)
        .await
        .expect("password changed");
}

#[rstest]
#[tokio::test]
async fn empty_update_skips_the_write(mut doubles: Doubles) {
    let owner = account(AccountKind::Patient);
    let id = owner.id;
    doubles
        .accounts
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(owner)));
    doubles.accounts.expect_update_profile().never();

    let profile = doubles
        .into_service()
        .update_profile(&id, AccountUpdate::default())
        .await
        .expect("no-op update");
    assert_eq!(profile.account.id, id);
}

#[rstest]
#[tokio::test]
async fn update_applies_fields_and_stamps_time(mut doubles: Doubles) {
    let owner = account(AccountKind::Patient);
    let id = owner.id;
    doubles
        .accounts
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(owner)));
    doubles
        .accounts
        .expect_update_profile()
        .withf(|account| {
            account.full_name == "Amanda S." && account.updated_at == FixtureClock.utc()
        })
        .times(1)
        .return_once(|_| Ok(()));

    let update = AccountUpdate {
        full_name: Some("Amanda S.".to_owned()),
        ..AccountUpdate::default()
    };
    let profile = doubles
        .into_service()
        .update_profile(&id, update)
        .await
        .expect("update succeeds");
    assert_eq!(profile.account.full_name, "Amanda S.");
    assert_eq!(profile.account.gender.as_deref(), Some("Feminino"));
}

#[rstest]
#[tokio::test]
async fn oversized_update_is_rejected_before_loading(mut doubles: Doubles) {
    doubles.accounts.expect_find_by_id().never();
    doubles.accounts.expect_update_profile().never();

    let update = AccountUpdate {
        gender: Some(Some("x".repeat(40))),
        ..AccountUpdate::default()
    };
    let err = doubles
        .into_service()
        .update_profile(&AccountId::random(), update)
        .await
        .expect_err("oversized gender");
    assert_eq!(err.code(), ErrorCode::InvalidRequest);
    let details = err.details().expect("details present");
    assert_eq!(details["field"], "gender");
    assert_eq!(details["code"], "too_long");
}

#[rstest]
#[tokio::test]
async fn reading_another_account_is_forbidden(mut doubles: Doubles) {
    doubles.accounts.expect_find_by_id().never();

    let err = doubles
        .into_service()
        .account_by_id(&AccountId::random(), &AccountId::random())
        .await
        .expect_err("forbidden");
    assert_eq!(err.code(), ErrorCode::Forbidden);
}

#[rstest]
#[tokio::test]
async fn repository_outage_is_internal(mut doubles: Doubles) {
    doubles
        .accounts
        .expect_find_by_id()
        .return_once(|_| Err(AccountRepositoryError::connection("pool timed out")));

    let err = doubles
        .into_service()
        .profile(&AccountId::random())
        .await
        .expect_err("outage");
    assert_eq!(err.code(), ErrorCode::InternalError);
}
