pub mod allocate;
pub mod policies;
