pub mod event;
pub mod event_type;
pub mod status;
pub mod venue;
pub mod worker;
