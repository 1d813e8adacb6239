use serde::Deserialize;

/// A city taking part in the ranking, identified by a stable key
#[derive(Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct City {
    pub id: String,
    pub name: String,
}

impl City {
    pub fn new(id: &str, name: &str) -> Self {
        Self { id: id.to_string(), name: name.to_string() }
    }
}

const CITIES: [(&str, &str); 15] = [
    ("moscow", "Moscow"),
    ("paris", "Paris"),
    ("london", "London"),
    ("berlin", "Berlin"),
    ("beijing", "Beijing"),
    ("kazan", "Kazan"),
    ("spetersburg", "Saint Petersburg"),
    ("volgograd", "Volgograd"),
    ("novosibirsk", "Novosibirsk"),
    ("kaliningrad", "Kaliningrad"),
    ("abudhabi", "Abu Dhabi"),
    ("warszawa", "Warsaw"),
    ("bucharest", "Bucharest"),
    ("roma", "Rome"),
    ("cairo", "Cairo"),
];

/// Returns the built-in city set
///
pub fn default_cities() -> Vec<City> {
    CITIES.iter().map(|(id, name)| City::new(id, name)).collect()
}

/// Builds the forecast url for a city given a url template holding a {city} placeholder
///
/// # Arguments
///
/// * 'base_url' - the url template
/// * 'city_id' - the city key to put into the template
pub fn url_for(base_url: &str, city_id: &str) -> String {
    base_url.replace("{city}", city_id)
}
