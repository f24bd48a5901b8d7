//! Startup wiring for demo data seeding.

mod startup;

pub use startup::{StartupSeedingError, seed_demo_data, seed_demo_data_on_startup};
