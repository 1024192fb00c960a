pub mod appointment;
pub mod contact;
pub mod review;
pub mod service;
pub mod slot;
pub mod submission;
pub mod validation;
