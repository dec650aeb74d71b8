pub mod catalog;
pub mod currency;
pub mod investment;
