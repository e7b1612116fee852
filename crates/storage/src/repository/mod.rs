pub mod check_in;
pub mod event;
pub mod participant;
pub mod score;
