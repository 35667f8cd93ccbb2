pub mod app_config;
pub mod site_config;
pub mod webdriver_config;
