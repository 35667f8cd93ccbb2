pub mod credentials;
pub mod errors;
pub mod money;
pub mod order;
pub mod price;
