pub mod checkin;
pub mod checkout;
pub mod config;
pub mod db;
pub mod init;
pub mod list;
pub mod status;
pub mod sync;
