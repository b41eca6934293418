pub mod health;
pub mod pages;
pub mod process;
pub mod upload;
