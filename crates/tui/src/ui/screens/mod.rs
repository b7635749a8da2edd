pub mod keep;
pub mod login;
pub mod records;
