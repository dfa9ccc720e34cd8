pub mod attendance;
pub mod geo;
pub mod retry;
pub mod status;
