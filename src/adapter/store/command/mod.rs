
pub mod audit;
pub mod user;
