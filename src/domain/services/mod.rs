pub mod appointment_service;
pub mod availability;
pub mod booking_flow;
pub mod feedback_service;
pub mod wizard;
