//! Business (tenant) profiles.

mod profile;

pub use profile::{BusinessProfile, BusinessType};
