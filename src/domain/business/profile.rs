//! Business profile aggregate.
//!
//! Everything the assistant is allowed to say about a property comes from
//! this profile or the business's knowledge base.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{BusinessId, Timestamp, ValidationError};
use crate::domain::tier::{Tier, TierFeatures};

/// Kind of hospitality business.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BusinessType {
    Hotel,
    BedAndBreakfast,
    Resort,
    Hostel,
    VacationRental,
    Other,
}

impl BusinessType {
    /// Human wording used in prompts and templates.
    pub fn describe(&self) -> &'static str {
        match self {
            BusinessType::Hotel => "hotel",
            BusinessType::BedAndBreakfast => "bed and breakfast",
            BusinessType::Resort => "resort",
            BusinessType::Hostel => "hostel",
            BusinessType::VacationRental => "vacation rental",
            BusinessType::Other => "hospitality business",
        }
    }

    /// Storage name, matching the serde representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            BusinessType::Hotel => "hotel",
            BusinessType::BedAndBreakfast => "bed_and_breakfast",
            BusinessType::Resort => "resort",
            BusinessType::Hostel => "hostel",
            BusinessType::VacationRental => "vacation_rental",
            BusinessType::Other => "other",
        }
    }

    /// Parses a storage name; unknown values map to `Other`.
    pub fn parse(value: &str) -> Self {
        match value {
            "hotel" => BusinessType::Hotel,
            "bed_and_breakfast" => BusinessType::BedAndBreakfast,
            "resort" => BusinessType::Resort,
            "hostel" => BusinessType::Hostel,
            "vacation_rental" => BusinessType::VacationRental,
            _ => BusinessType::Other,
        }
    }
}

/// Tenant profile used to ground assistant replies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusinessProfile {
    pub id: BusinessId,
    pub name: String,
    pub business_type: BusinessType,
    pub tier: Tier,
    pub description: Option<String>,
    pub location: Option<String>,
    /// Local check-in time, free text such as "15:00".
    pub check_in_time: Option<String>,
    pub check_out_time: Option<String>,
    pub contact_phone: Option<String>,
    pub contact_email: Option<String>,
    pub booking_url: Option<String>,
    pub amenities: Vec<String>,
    pub policies: Vec<String>,
    /// ISO 639-1 code of the default reply language.
    pub default_language: String,
    pub custom_instructions: Option<String>,
    pub active: bool,
    pub created_at: Timestamp,
}

impl BusinessProfile {
    /// Creates an active profile with only the required fields set.
    pub fn new(
        name: impl Into<String>,
        business_type: BusinessType,
        tier: Tier,
    ) -> Result<Self, ValidationError> {
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return Err(ValidationError::empty_field("name"));
        }

        Ok(Self {
            id: BusinessId::new(),
            name,
            business_type,
            tier,
            description: None,
            location: None,
            check_in_time: None,
            check_out_time: None,
            contact_phone: None,
            contact_email: None,
            booking_url: None,
            amenities: Vec::new(),
            policies: Vec::new(),
            default_language: "en".to_string(),
            custom_instructions: None,
            active: true,
            created_at: Timestamp::now(),
        })
    }

    /// Re-checks invariants on a profile assembled elsewhere (storage, API).
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::empty_field("name"));
        }
        if let Some(email) = non_blank(&self.contact_email) {
            if !email.contains('@') {
                return Err(ValidationError::invalid_format(
                    "contact_email",
                    "must contain '@'",
                ));
            }
        }
        if self.default_language.trim().is_empty() {
            return Err(ValidationError::empty_field("default_language"));
        }
        Ok(())
    }

    /// Features for this business's tier with default model.
    pub fn features(&self) -> TierFeatures {
        TierFeatures::for_tier(self.tier)
    }

    pub fn location(&self) -> Option<&str> {
        non_blank(&self.location)
    }

    pub fn check_in_time(&self) -> Option<&str> {
        non_blank(&self.check_in_time)
    }

    pub fn check_out_time(&self) -> Option<&str> {
        non_blank(&self.check_out_time)
    }

    pub fn contact_phone(&self) -> Option<&str> {
        non_blank(&self.contact_phone)
    }

    pub fn contact_email(&self) -> Option<&str> {
        non_blank(&self.contact_email)
    }

    pub fn booking_url(&self) -> Option<&str> {
        non_blank(&self.booking_url)
    }

    pub fn custom_instructions(&self) -> Option<&str> {
        non_blank(&self.custom_instructions)
    }

    /// Best single contact line ("call +1 555 0100 or email desk@x.com").
    pub fn contact_line(&self) -> Option<String> {
        match (self.contact_phone(), self.contact_email()) {
            (Some(phone), Some(email)) => Some(format!("call {} or email {}", phone, email)),
            (Some(phone), None) => Some(format!("call {}", phone)),
            (None, Some(email)) => Some(format!("email {}", email)),
            (None, None) => None,
        }
    }

    /// Amenities with blank entries removed.
    pub fn listed_amenities(&self) -> Vec<&str> {
        self.amenities
            .iter()
            .map(|a| a.trim())
            .filter(|a| !a.is_empty())
            .collect()
    }

    /// Policies with blank entries removed.
    pub fn listed_policies(&self) -> Vec<&str> {
        self.policies
            .iter()
            .map(|p| p.trim())
            .filter(|p| !p.is_empty())
            .collect()
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}
