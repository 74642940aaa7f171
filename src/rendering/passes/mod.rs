pub mod background_pass;
pub mod bounds_pass;
pub mod cell_pass;
pub mod pass;
