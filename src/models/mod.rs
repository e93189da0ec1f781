pub mod country_aggregate;

pub use country_aggregate::CountryAggregateRow;
