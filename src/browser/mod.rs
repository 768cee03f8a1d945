pub mod cdp;
pub mod chrome;

pub use cdp::{create_cdp_browser, wait_for_network_idle};
pub use chrome::launch_chrome;
