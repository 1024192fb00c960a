pub mod sqlite_appointment_repo;
pub mod sqlite_contact_repo;
pub mod sqlite_review_repo;
pub mod sqlite_service_repo;
pub mod sqlite_slot_repo;
