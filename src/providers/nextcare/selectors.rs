/// Locator table for the NextCare "Pulse" portal. A portal redesign means
/// editing this table, not the navigation code.
pub struct NextCareLocators;

impl NextCareLocators {
    // Login page
    pub const USERNAME_INPUT: &'static str = "#txtUserName";
    pub const PASSWORD_INPUT: &'static str = "#txtPassword";
    pub const LOGIN_BUTTON: &'static str = "#btnLogin";

    // Eligibility Checking section (the menu entry has a numeric id, which
    // needs the attribute form to stay a valid CSS selector)
    pub const ELIGIBILITY_MENU_LINK: &'static str = "[id='441240'] > a";
    pub const OTHER_ID_TAB: &'static str = "#ulEligibilityTabs > div > label:nth-of-type(3)";
    pub const ID_VALUE_INPUT: &'static str = "#txtIDTypeValue";
    pub const TYPE_DROPDOWN: &'static str = "#ctl00_ContentPlaceHolderBody_cmbType_chosen > a";
    pub const TYPE_OPTION_OUT_PATIENT: &'static str =
        "#ctl00_ContentPlaceHolderBody_cmbType_chosen > div > ul > li:nth-of-type(2)";
    pub const CHECK_BUTTON: &'static str = "#btnCheckEligibilityorSearchbyPolicy";

    // Result
    pub const RESULT_MESSAGE: &'static str = "#lblResultMessage1 > b:first-of-type";
}
