pub mod assignments;
pub mod check_ins;
pub mod events;
pub mod scoring;
pub mod standings;
