#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CountryAggregateRow {
    pub country_code: String,
    pub record_count: i64,
    pub mean_latitude: Option<f64>,
    pub mean_longitude: Option<f64>,
}
