pub mod gate;
pub mod store;
