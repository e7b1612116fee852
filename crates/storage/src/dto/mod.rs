pub mod assignment;
pub mod check_in;
pub mod common;
pub mod event;
pub mod scoring;
pub mod standings;
