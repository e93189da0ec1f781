pub mod health;
pub mod location_map;
