pub mod config;
pub mod confirmation;
pub mod webdriver;
