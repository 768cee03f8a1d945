use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::EligibilityError;
use crate::utils::mask_sensitive;

/// Portal credentials for one verification run.
///
/// Supplied by the caller per call (the credential vault is a collaborator,
/// not part of the core) and dropped when the run ends.
#[derive(Clone)]
pub struct Credential {
    pub username: String,
    pub password: String,
}

impl Credential {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("username", &mask_sensitive(&self.username))
            .field("password", &"********")
            .finish()
    }
}

/// Immutable input to one eligibility run. Construction validates the
/// patient identifiers, so a malformed query never reaches a browser.
#[derive(Debug, Clone)]
pub struct EligibilityQuery {
    emirates_id: String,
    mobile_number: String,
    insurer: String,
}

impl EligibilityQuery {
    pub fn new(
        emirates_id: impl Into<String>,
        mobile_number: impl Into<String>,
        insurer: impl Into<String>,
    ) -> Result<Self, EligibilityError> {
        let emirates_id = emirates_id.into();
        let mobile_number = mobile_number.into();

        validate_emirates_id(&emirates_id)?;
        validate_mobile_number(&mobile_number)?;

        Ok(Self {
            emirates_id,
            mobile_number,
            insurer: insurer.into(),
        })
    }

    pub fn emirates_id(&self) -> &str {
        &self.emirates_id
    }

    pub fn mobile_number(&self) -> &str {
        &self.mobile_number
    }

    pub fn insurer(&self) -> &str {
        &self.insurer
    }
}

fn validate_emirates_id(eid: &str) -> Result<(), EligibilityError> {
    if eid.len() != 15 || !eid.starts_with("784") || !eid.chars().all(|c| c.is_ascii_digit()) {
        return Err(EligibilityError::Validation(
            "Emirates ID must start with 784, contain only digits, and be 15 digits long".into(),
        ));
    }
    Ok(())
}

fn validate_mobile_number(mobile: &str) -> Result<(), EligibilityError> {
    if mobile.len() != 9 || !mobile.starts_with('5') || !mobile.chars().all(|c| c.is_ascii_digit()) {
        return Err(EligibilityError::Validation(
            "mobile number must start with 5, contain only digits, and be 9 digits long".into(),
        ));
    }
    Ok(())
}

/// Overall outcome label persisted by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    Success,
    Error,
    Skipped,
}

/// Eligibility verdict as shown by the portal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EligibilityStatus {
    Eligible,
    #[serde(rename = "Not Eligible")]
    NotEligible,
    Unknown,
}

impl EligibilityStatus {
    /// Maps the portal's free-text verdict onto the canonical values.
    /// Anything unrecognized is reported as `Unknown`, never guessed.
    pub fn from_portal_text(text: &str) -> Self {
        let text = text.trim();
        if text.eq_ignore_ascii_case("Not Eligible") || text.contains("Not Eligible") {
            EligibilityStatus::NotEligible
        } else if text.eq_ignore_ascii_case("Eligible") || text.contains("Eligible") {
            EligibilityStatus::Eligible
        } else {
            EligibilityStatus::Unknown
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EligibilityStatus::Eligible => "Eligible",
            EligibilityStatus::NotEligible => "Not Eligible",
            EligibilityStatus::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for EligibilityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Key/value pairs parsed from the member-details popup
/// (TPA_Member_ID, DOB, Gender, Policy_Number, ...).
pub type MemberPolicyDetails = BTreeMap<String, String>;

/// Raw text fragments pulled from a result page before normalization.
/// Insurer-specific: the NextCare portal only ever fills `status_text`.
#[derive(Debug, Clone, Default)]
pub struct RawExtraction {
    pub status_text: String,
    pub reference_no: String,
    pub request_date: String,
    pub effective_from: String,
    pub effective_to: String,
    pub effective_at: String,
    pub coverage_text: String,
    pub ineligible_reason: String,
    pub member_policy_block: String,
}

/// Canonical eligibility record handed back to the caller for persistence.
///
/// The serialized field names are the storage contract with the clinic
/// web application and must not change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EligibilityResult {
    pub status: RunStatus,
    #[serde(rename = "Is_Eligible")]
    pub is_eligible: EligibilityStatus,
    #[serde(rename = "Reference_No")]
    pub reference_no: String,
    #[serde(rename = "Request_Date")]
    pub request_date: String,
    #[serde(rename = "Effective_From")]
    pub effective_from: String,
    #[serde(rename = "Effective_To")]
    pub effective_to: String,
    #[serde(rename = "Effective_At")]
    pub effective_at: String,
    #[serde(rename = "Coverage_Details")]
    pub coverage_details: String,
    #[serde(rename = "Notes")]
    pub notes: String,
    #[serde(rename = "Emirates_ID")]
    pub emirates_id: String,
    #[serde(rename = "Member_Policy_Details")]
    pub member_policy_details: MemberPolicyDetails,
}

impl EligibilityResult {
    /// Record returned when no portal adapter serves the insurer code.
    /// No navigation is attempted for these.
    pub fn skipped(emirates_id: &str, note: impl Into<String>) -> Self {
        Self {
            status: RunStatus::Skipped,
            is_eligible: EligibilityStatus::Unknown,
            reference_no: String::new(),
            request_date: String::new(),
            effective_from: String::new(),
            effective_to: String::new(),
            effective_at: String::new(),
            coverage_details: String::new(),
            notes: note.into(),
            emirates_id: emirates_id.to_string(),
            member_policy_details: MemberPolicyDetails::new(),
        }
    }
}
