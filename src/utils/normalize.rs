//! Pure normalization of scraped portal text into the canonical
//! eligibility record. No I/O happens here.

use std::collections::BTreeMap;

use crate::models::{
    EligibilityResult, EligibilityStatus, MemberPolicyDetails, RawExtraction, RunStatus,
};

/// Notes value recorded for an eligible member.
pub const ELIGIBLE_NOTES: &str = "Valid member for Service Provider";

/// Client-info slice of the result page, after label stripping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientInfo {
    pub reference_no: String,
    pub request_date: String,
    pub effective_from: String,
    pub effective_to: String,
    pub effective_at: String,
}

/// Strips the known label prefixes from raw result-page fragments.
///
/// Portal text formatting is inconsistent, so this removes substrings
/// rather than parsing: "Reference No:", "Request Date:",
/// "Effective from :", the literal "to", and everything up to the first
/// "at" token of the effective-at fragment.
pub fn extract_client_info(
    ref_no: &str,
    request_date: &str,
    from_date: &str,
    to_date: &str,
    at_text: &str,
) -> ClientInfo {
    let effective_at = match at_text.trim().split_once("at") {
        Some((_, rest)) => rest.trim().to_string(),
        None => String::new(),
    };

    ClientInfo {
        reference_no: strip_label(ref_no, "Reference No:"),
        request_date: strip_label(request_date, "Request Date:"),
        effective_from: strip_label(from_date, "Effective from :"),
        effective_to: to_date.replace("to", "").trim().to_string(),
        effective_at,
    }
}

fn strip_label(text: &str, label: &str) -> String {
    text.rsplit_once(label)
        .map(|(_, rest)| rest)
        .unwrap_or(text)
        .trim()
        .to_string()
}

/// Parses the member-details popup text into key/value pairs.
///
/// The block is alternating lines: a key line followed by its value line.
/// Keys are whitespace-normalized to underscores. A trailing unpaired key
/// line is dropped; the portal sometimes emits one and the observed
/// behavior is to ignore it.
pub fn parse_member_details(block: &str) -> MemberPolicyDetails {
    let lines: Vec<&str> = block.split('\n').collect();
    let mut details = BTreeMap::new();

    let mut i = 0;
    while i + 1 < lines.len() {
        let key = lines[i].trim().replace(' ', "_");
        let value = lines[i + 1].trim().to_string();
        details.insert(key, value);
        i += 2;
    }

    details
}

/// Builds the canonical record from one raw extraction.
///
/// Sub-sections that failed to scrape come through as empty fields rather
/// than failing the whole record; missing top-level elements never get this
/// far because extraction reports them as run errors.
pub fn normalize(raw: &RawExtraction, emirates_id: &str) -> EligibilityResult {
    let info = extract_client_info(
        &raw.reference_no,
        &raw.request_date,
        &raw.effective_from,
        &raw.effective_to,
        &raw.effective_at,
    );

    let is_eligible = EligibilityStatus::from_portal_text(&raw.status_text);
    let (coverage_details, notes) = match is_eligible {
        EligibilityStatus::Eligible => (raw.coverage_text.clone(), ELIGIBLE_NOTES.to_string()),
        EligibilityStatus::NotEligible => (String::new(), raw.ineligible_reason.clone()),
        EligibilityStatus::Unknown => (String::new(), String::new()),
    };

    let member_policy_details = if raw.member_policy_block.trim().is_empty() {
        MemberPolicyDetails::new()
    } else {
        parse_member_details(&raw.member_policy_block)
    };

    EligibilityResult {
        status: RunStatus::Success,
        is_eligible,
        reference_no: info.reference_no,
        request_date: info.request_date,
        effective_from: info.effective_from,
        effective_to: info.effective_to,
        effective_at: info.effective_at,
        coverage_details,
        notes,
        emirates_id: emirates_id.to_string(),
        member_policy_details,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_reference_label() {
        let info = extract_client_info("Reference No: 12345", "", "", "", "");
        assert_eq!(info.reference_no, "12345");
    }

    #[test]
    fn strips_all_labels() {
        let info = extract_client_info(
            "Reference No: REF-9",
            "Request Date: 01/02/2025",
            "Effective from : 01/01/2025",
            "to 31/12/2025",
            "Valid at XYZ Clinic",
        );
        assert_eq!(info.reference_no, "REF-9");
        assert_eq!(info.request_date, "01/02/2025");
        assert_eq!(info.effective_from, "01/01/2025");
        assert_eq!(info.effective_to, "31/12/2025");
        assert_eq!(info.effective_at, "XYZ Clinic");
    }

    #[test]
    fn effective_at_without_token_is_empty() {
        let info = extract_client_info("", "", "", "", "XYZ Clinic");
        assert_eq!(info.effective_at, "");
    }

    #[test]
    fn missing_label_keeps_raw_text() {
        let info = extract_client_info("12345", "", "", "", "");
        assert_eq!(info.reference_no, "12345");
    }

    #[test]
    fn parses_alternating_key_value_lines() {
        let block = "TPA Member ID\nTPA-001\nDOB\n12/05/1990\nPolicy Number\nPN-42";
        let details = parse_member_details(block);

        assert_eq!(details["TPA_Member_ID"], "TPA-001");
        assert_eq!(details["DOB"], "12/05/1990");
        assert_eq!(details["Policy_Number"], "PN-42");
        assert_eq!(details.len(), 3);
    }

    #[test]
    fn odd_line_count_drops_only_the_final_line() {
        let block = "Gender\nMale\nSub Group\nA1\nDangling Key";
        let details = parse_member_details(block);

        assert_eq!(details["Gender"], "Male");
        assert_eq!(details["Sub_Group"], "A1");
        assert_eq!(details.len(), 2);
        assert!(!details.contains_key("Dangling_Key"));
    }

    #[test]
    fn parsing_is_idempotent() {
        let block = "Category\nGold\nClient Number\nCL-7";
        assert_eq!(parse_member_details(block), parse_member_details(block));
    }

    #[test]
    fn normalizes_eligible_member() {
        let raw = RawExtraction {
            status_text: "Eligible".into(),
            reference_no: "Reference No: 555".into(),
            request_date: "Request Date: 03/03/2025".into(),
            effective_from: "Effective from : 01/01/2025".into(),
            effective_to: "to 31/12/2025".into(),
            effective_at: "Valid at XYZ Clinic".into(),
            coverage_text: "OP consultation covered".into(),
            member_policy_block: "DOB\n01/01/1980".into(),
            ..RawExtraction::default()
        };

        let result = normalize(&raw, "784199012345671");

        assert_eq!(result.status, RunStatus::Success);
        assert_eq!(result.is_eligible, EligibilityStatus::Eligible);
        assert_eq!(result.reference_no, "555");
        assert_eq!(result.effective_at, "XYZ Clinic");
        assert_eq!(result.coverage_details, "OP consultation covered");
        assert_eq!(result.notes, ELIGIBLE_NOTES);
        assert_eq!(result.emirates_id, "784199012345671");
        assert_eq!(result.member_policy_details["DOB"], "01/01/1980");
    }

    #[test]
    fn normalizes_ineligible_member_with_reason() {
        let raw = RawExtraction {
            status_text: "Not Eligible".into(),
            reference_no: "Reference No: 556".into(),
            ineligible_reason: "Policy expired on 01/01/2024".into(),
            coverage_text: "should be discarded".into(),
            ..RawExtraction::default()
        };

        let result = normalize(&raw, "784199012345671");

        assert_eq!(result.is_eligible, EligibilityStatus::NotEligible);
        assert_eq!(result.coverage_details, "");
        assert_eq!(result.notes, "Policy expired on 01/01/2024");
        assert!(result.member_policy_details.is_empty());
    }

    #[test]
    fn unknown_status_keeps_fields_empty() {
        let raw = RawExtraction {
            status_text: "Pending review".into(),
            ..RawExtraction::default()
        };

        let result = normalize(&raw, "784199012345671");

        assert_eq!(result.is_eligible, EligibilityStatus::Unknown);
        assert_eq!(result.coverage_details, "");
        assert_eq!(result.notes, "");
    }
}
