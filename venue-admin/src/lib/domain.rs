pub mod account;
pub mod pagination;
