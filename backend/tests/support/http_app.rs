//! Shared Actix harness for the HTTP integration suites.
//!
//! Builds the production route table over in-memory repositories and offers
//! small helpers for sending requests and seeding professional profiles.

use actix_web::body::MessageBody;
use actix_web::dev::{Service, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{App, test, web};
use chrono::Utc;
use mentecare::Trace;
use mentecare::domain::ports::{AccountRepository, CredentialHasher};
use mentecare::domain::{
    Account, AccountId, AccountKind, EmailAddress, NationalId, ProfessionalId,
    ProfessionalProfile, Registration, RegistrationForm,
};
use mentecare::inbound::http::accounts_dto::RegisterRequest;
use mentecare::inbound::http::health::HealthState;
use mentecare::inbound::http::{configure, route_not_found};
use mentecare::test_support::{InMemoryDatabase, PlainTextHasher, bearer_for, http_state};
use serde_json::{Value, json};

pub const PASSWORD: &str = "123456";

/// The production app wiring over `db`.
pub fn app(
    db: &InMemoryDatabase,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    > + use<>,
> {
    App::new()
        .app_data(web::Data::new(http_state(db)))
        .app_data(web::Data::new(HealthState::new()))
        .wrap(Trace)
        .configure(configure)
        .default_service(web::to(route_not_found))
}

/// Send `request` and return the status with the JSON body (`Null` if none).
pub async fn send<S, R, B>(app: &S, request: R) -> (StatusCode, Value)
where
    S: Service<R, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let response = test::call_service(app, request).await;
    let status = response.status();
    let bytes = test::read_body(response).await;
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

/// Registration body with every optional field filled in.
///
/// Profile fields are always sent; patient registrations ignore them.
pub fn registration(email: &str, national_id: &str, kind: &str) -> Value {
    json!({
        "email": email,
        "password": PASSWORD,
        "fullName": "Amanda Silva",
        "nationalId": national_id,
        "accountKind": kind,
        "phone": "(11) 99999-1111",
        "dateOfBirth": "1990-05-15",
        "gender": "Feminino",
        "licenseNumber": "CRP 06/123456",
        "specialty": "Psicologia Clínica",
        "consultationPrice": 150.0,
        "experienceYears": 10,
    })
}

/// Register a patient through the auth port; returns its id and bearer value.
pub async fn register_patient(
    db: &InMemoryDatabase,
    email: &str,
    national_id: &str,
) -> (AccountId, String) {
    let request: RegisterRequest =
        serde_json::from_value(registration(email, national_id, "patient")).expect("valid body");
    let registration =
        Registration::try_from_form(RegistrationForm::from(request)).expect("valid registration");
    let authenticated = http_state(db)
        .auth
        .register(registration)
        .await
        .expect("registration succeeds");
    let id = authenticated.profile.account.id;
    (id, bearer_for(&id))
}

/// Text at `pointer`, or an empty string.
pub fn text<'a>(body: &'a Value, pointer: &str) -> &'a str {
    body.pointer(pointer).and_then(Value::as_str).unwrap_or_default()
}

/// Whether any object key anywhere in `value` mentions a password.
pub fn mentions_password(value: &Value) -> bool {
    match value {
        Value::Object(map) => map
            .iter()
            .any(|(key, nested)| key.to_lowercase().contains("password") || mentions_password(nested)),
        Value::Array(items) => items.iter().any(mentions_password),
        _ => false,
    }
}

/// Tunable fields of a seeded professional.
#[derive(Debug, Clone)]
pub struct ProfessionalSeed {
    pub specialty: &'static str,
    pub price: f64,
    pub rating: f64,
    pub reviews: u32,
    pub verified: bool,
    pub available: bool,
}

impl ProfessionalSeed {
    pub fn listed(specialty: &'static str, price: f64, rating: f64, reviews: u32) -> Self {
        Self {
            specialty,
            price,
            rating,
            reviews,
            verified: true,
            available: true,
        }
    }
}

/// Insert a professional account with its profile, numbered by `n`.
pub async fn insert_professional(
    db: &InMemoryDatabase,
    n: u32,
    seed: ProfessionalSeed,
) -> (AccountId, ProfessionalId) {
    let now = Utc::now();
    let account = Account {
        id: AccountId::random(),
        email: EmailAddress::new(format!("pro{n}@mentecare.test")).expect("valid email"),
        full_name: format!("Professional {n}"),
        phone: Some("(11) 98888-0000".to_owned()),
        date_of_birth: None,
        gender: None,
        national_id: NationalId::new(format!("900.000.{:03}-{:02}", n / 100, n % 100))
            .expect("valid national id"),
        kind: AccountKind::Professional,
        created_at: now,
        updated_at: now,
    };
    let profile = ProfessionalProfile {
        id: ProfessionalId::random(),
        account_id: account.id,
        license_number: format!("CRP 06/{n:06}"),
        specialty: seed.specialty.to_owned(),
        bio: Some("Atendimento online e presencial.".to_owned()),
        experience_years: 5,
        consultation_price: seed.price,
        approach: Some("Terapia Cognitivo-Comportamental".to_owned()),
        languages: "Português, Inglês".to_owned(),
        is_verified: seed.verified,
        rating: seed.rating,
        review_count: seed.reviews,
        is_available: seed.available,
        created_at: now,
        updated_at: now,
    };
    let hash = PlainTextHasher.hash(PASSWORD).expect("hash");
    db.accounts()
        .insert_with_profile(&account, &hash, &profile)
        .await
        .expect("insert professional");
    (account.id, profile.id)
}
