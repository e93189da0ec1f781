pub mod location_map_repo;
