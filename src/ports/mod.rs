pub mod browser;
pub mod login_confirmation;
