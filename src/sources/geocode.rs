use std::fmt;

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::location::Coordinate;

const CITY_NOT_FOUND: &str = "City not found";
const COUNTRY_NOT_FOUND: &str = "Country not found";

#[derive(Deserialize, Debug)]
struct GeocodeResponse {
    address: Option<Address>,
}

#[derive(Deserialize, Debug)]
struct Address {
    city: Option<String>,
    town: Option<String>,
    village: Option<String>,
    country: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Place {
    pub city: String,
    pub country: String,
}

impl Place {
    pub fn not_found() -> Self {
        Place {
            city: CITY_NOT_FOUND.to_string(),
            country: COUNTRY_NOT_FOUND.to_string(),
        }
    }
}

impl Default for Place {
    fn default() -> Self {
        Place::not_found()
    }
}

impl fmt::Display for Place {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.city, self.country)
    }
}

pub fn url(base: &str, at: Coordinate) -> String {
    format!(
        "{base}?format=json&lat={}&lon={}",
        at.latitude(),
        at.longitude()
    )
}

pub fn parse(body: &str) -> Result<Place> {
    let response: GeocodeResponse = serde_json::from_str(body)?;
    let address = response
        .address
        .ok_or_else(|| Error::DataContract("missing address".to_string()))?;

    let city = address
        .city
        .or(address.town)
        .or(address.village)
        .unwrap_or_else(|| CITY_NOT_FOUND.to_string());
    let country = address
        .country
        .unwrap_or_else(|| COUNTRY_NOT_FOUND.to_string());

    Ok(Place { city, country })
}
