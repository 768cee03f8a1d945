/// Locator table for the Jet portal.
///
/// These identifiers are a compatibility contract with the insurer's
/// markup: a site redesign means editing this table, not the navigation
/// code. Several element ids carry the portal's own spelling mistakes
/// ("Eligbility", "cpatcha", "Memper"); they are load-bearing.
pub struct JetLocators;

impl JetLocators {
    // Login page
    pub const USERNAME_INPUT: &'static str = "#Username";
    pub const PASSWORD_INPUT: &'static str = "#Password";
    pub const LOGIN_BUTTON_XPATH: &'static str = "//button[@type='submit']";

    // Landing page
    pub const ANNOUNCEMENT_MODAL_CLOSE_XPATH: &'static str =
        "//*[@id='UsersModalAnnoucement']/div/div/div[1]/button";
    pub const ELIGIBILITY_SECTION: &'static str = "#EligibilityColumn";

    // Eligibility form
    pub const NETWORK_LOGO: &'static str = ".sellogo";
    pub const RADIO_NAS: &'static str = "#RadioNAS";
    pub const RADIO_NEURON: &'static str = "#RadioNeuron";
    pub const RADIO_NATIONAL_ID: &'static str = "#RadioNationalID";
    pub const NATIONAL_ID_INPUT: &'static str = "#EligbilityAddNationalID";
    pub const TREATMENT_BASIS_DROPDOWN_XPATH: &'static str =
        "//*[@id='ddlTreatmentbasis_chosen']/a/div";
    pub const TREATMENT_BASIS_OPTION_XPATH: &'static str =
        "//*[@id='ddlTreatmentbasis_chosen']/div/ul/li[3]";
    pub const MOBILE_INPUT: &'static str = "#txtAddBenefPhone";
    pub const CAPTCHA_INPUT: &'static str = "#cpatchaTextBox";
    pub const SUBMIT_BUTTON: &'static str = "#btnSubmitNewEligibility";

    // The portal computes its CAPTCHA answer into this page-level script
    // variable; no image solving is involved.
    pub const CAPTCHA_SCRIPT_VARIABLE: &'static str = "code";

    // Result page
    pub const RESULT_URL_MARKER: &'static str = "EligibilityDetails";
    pub const RESULT_STATUS: &'static str = "#cphBody_rptResponseFile_dvResult_0";
    pub const REFERENCE_NO_XPATH: &'static str =
        "//*[@id='cphBody_rptResponseFile_dvMemDet_0']/div[2]/div[4]/div[1]/div[1]/div";
    pub const REQUEST_DATE_XPATH: &'static str =
        "//*[@id='cphBody_rptResponseFile_dvMemDet_0']/div[2]/div[4]/div[1]/div[2]/div";
    pub const EFFECTIVE_FROM_XPATH: &'static str =
        "//*[@id='cphBody_rptResponseFile_dvMemDet_0']/div[2]/div[2]/div[1]";
    pub const EFFECTIVE_TO_XPATH: &'static str =
        "//*[@id='cphBody_rptResponseFile_dvMemDet_0']/div[2]/div[2]/div[2]";
    pub const EFFECTIVE_AT_XPATH: &'static str =
        "//*[@id='cphBody_rptResponseFile_dvMemDet_0']/div[2]/div[2]/div[3]";
    pub const COVERAGE_MESSAGES: &'static str = "#cphBody_rptResponseFile_dvMessages_0";
    pub const INELIGIBILITY_MESSAGE: &'static str =
        "#cphBody_rptResponseFile_dvEligibilityMessage_0";
    pub const MEMBER_DETAILS_BUTTON: &'static str =
        "#cphBody_rptResponseFile_aEligibilityMemberDetails_0";
    pub const MEMBER_DETAILS_PANEL: &'static str = "#cphBody_upMemperDetails";
}
