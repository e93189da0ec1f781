pub mod country_reference;
pub mod location_map_service;
