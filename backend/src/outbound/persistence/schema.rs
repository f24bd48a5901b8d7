//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. When a
//! migration changes a table, regenerate with `diesel print-schema` or edit
//! this file by hand.

diesel::table! {
    /// Registered accounts, patients and professionals alike.
    ///
    /// `email` and `national_id` carry the named unique constraints
    /// `accounts_email_key` and `accounts_national_id_key`.
    accounts (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Login email, unique.
        email -> Varchar,
        /// Argon2 PHC string. Never leaves the persistence layer except for
        /// password verification.
        password_hash -> Text,
        full_name -> Varchar,
        phone -> Nullable<Varchar>,
        date_of_birth -> Nullable<Date>,
        gender -> Nullable<Varchar>,
        /// CPF formatted as `###.###.###-##`, unique.
        national_id -> Varchar,
        /// `patient` or `professional`.
        account_kind -> Varchar,
        created_at -> Timestamptz,
        /// Refreshed by the adapter and, as a fallback, by trigger.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Professional extension of an account; one row per professional.
    ///
    /// Rows are deleted with their account (`ON DELETE CASCADE`).
    professionals (id) {
        id -> Uuid,
        /// Owning account, unique.
        account_id -> Uuid,
        license_number -> Varchar,
        specialty -> Varchar,
        bio -> Nullable<Text>,
        experience_years -> Int4,
        /// Strictly positive (CHECK constraint).
        consultation_price -> Float8,
        approach -> Nullable<Varchar>,
        /// Comma-separated free text.
        languages -> Varchar,
        is_verified -> Bool,
        rating -> Float8,
        review_count -> Int4,
        is_available -> Bool,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::joinable!(professionals -> accounts (account_id));
diesel::allow_tables_to_appear_in_same_query!(accounts, professionals);
