pub mod app_state;
pub mod errors;
pub mod extract;
pub mod startup;
pub mod wiring;
