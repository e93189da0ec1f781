use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Static reference entry for one ISO-3166 alpha-2 country code.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CountryReference {
    pub name: &'static str,
    pub latitude: f64,
    pub longitude: f64,
}

// (code, name, latitude, longitude) of the geographic centre used for map pins.
const COUNTRIES: &[(&str, &str, f64, f64)] = &[
    ("US", "United States", 39.8283, -98.5795),
    ("CA", "Canada", 56.1304, -106.3468),
    ("GB", "United Kingdom", 55.3781, -3.4360),
    ("DE", "Germany", 51.1657, 10.4515),
    ("FR", "France", 46.2276, 2.2137),
    ("ES", "Spain", 40.4637, -3.7492),
    ("IT", "Italy", 41.8719, 12.5674),
    ("NL", "Netherlands", 52.1326, 5.2913),
    ("BE", "Belgium", 50.5039, 4.4699),
    ("CH", "Switzerland", 46.8182, 8.2275),
    ("AT", "Austria", 47.5162, 14.5501),
    ("SE", "Sweden", 60.1282, 18.6435),
    ("NO", "Norway", 60.4720, 8.4689),
    ("DK", "Denmark", 56.2639, 9.5018),
    ("FI", "Finland", 61.9241, 25.7482),
    ("JP", "Japan", 36.2048, 138.2529),
    ("CN", "China", 35.8617, 104.1954),
    ("IN", "India", 20.5937, 78.9629),
    ("AU", "Australia", -25.2744, 133.7751),
    ("BR", "Brazil", -14.2350, -51.9253),
    ("MX", "Mexico", 23.6345, -102.5528),
    ("AR", "Argentina", -38.4161, -63.6167),
    ("CL", "Chile", -35.6751, -71.5430),
    ("CO", "Colombia", 4.5709, -74.2973),
    ("PE", "Peru", -9.1900, -75.0152),
    ("RU", "Russia", 61.5240, 105.3188),
    ("UA", "Ukraine", 48.3794, 31.1656),
    ("PL", "Poland", 51.9194, 19.1451),
    ("CZ", "Czech Republic", 49.8175, 15.4730),
    ("HU", "Hungary", 47.1625, 19.5033),
    ("RO", "Romania", 45.9432, 24.9668),
    ("GR", "Greece", 39.0742, 21.8243),
    ("PT", "Portugal", 39.3999, -8.2245),
    ("IE", "Ireland", 53.1424, -7.6921),
    ("ZA", "South Africa", -30.5595, 22.9375),
    ("EG", "Egypt", 26.0975, 30.0444),
    ("NG", "Nigeria", 9.0820, 8.6753),
    ("KE", "Kenya", -0.0236, 37.9062),
    ("MA", "Morocco", 31.7917, -7.0926),
];

static COUNTRY_INDEX: Lazy<HashMap<&'static str, CountryReference>> = Lazy::new(|| {
    COUNTRIES
        .iter()
        .map(|&(code, name, latitude, longitude)| {
            (
                code,
                CountryReference {
                    name,
                    latitude,
                    longitude,
                },
            )
        })
        .collect()
});

/// Looks up a country by its alpha-2 code. Codes are stored upper-case.
pub fn lookup(country_code: &str) -> Option<&'static CountryReference> {
    COUNTRY_INDEX.get(country_code)
}

pub fn country_name(country_code: &str) -> Option<&'static str> {
    lookup(country_code).map(|c| c.name)
}

pub fn country_coordinates(country_code: &str) -> Option<(f64, f64)> {
    lookup(country_code).map(|c| (c.latitude, c.longitude))
}
