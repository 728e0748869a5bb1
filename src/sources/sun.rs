use chrono::NaiveDate;
use chrono_tz::Tz;
use serde::Deserialize;

use crate::error::{Error, Result};
use crate::location::Coordinate;

#[derive(Deserialize, Debug)]
struct SunResponse {
    results: Option<SunResults>,
}

#[derive(Deserialize, Debug)]
struct SunResults {
    sunrise: Option<String>,
    sunset: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SunTimes {
    pub sunrise: String,
    pub sunset: String,
}

pub fn url(base: &str, at: Coordinate, date: Option<NaiveDate>, timezone: Option<Tz>) -> String {
    let mut url = format!("{base}?lat={}&lng={}", at.latitude(), at.longitude());
    if let Some(date) = date {
        url.push_str(&format!("&date={}", date.format("%Y-%m-%d")));
    }
    if let Some(tz) = timezone {
        url.push_str(&format!("&timezone={}", tz.name()));
    }
    url
}

pub fn parse(body: &str) -> Result<SunTimes> {
    let response: SunResponse = serde_json::from_str(body)?;
    let results = response
        .results
        .ok_or_else(|| Error::DataContract("missing results".to_string()))?;

    let field = |value: Option<String>, name: &str| {
        value
            .filter(|v| !v.is_empty())
            .ok_or_else(|| Error::DataContract(format!("missing results.{name}")))
    };

    Ok(SunTimes {
        sunrise: field(results.sunrise, "sunrise")?,
        sunset: field(results.sunset, "sunset")?,
    })
}
