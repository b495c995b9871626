// Business domains
pub mod resources;
