pub mod allocation;
pub mod assignment;
pub mod capacity;
pub mod check_in;
pub mod scoring;
pub mod standings;
