use serde::Deserialize;

use crate::error::{Error, Result};
use crate::location::Coordinate;

#[derive(Deserialize, Debug)]
struct IpResponse {
    latitude: Option<f64>,
    longitude: Option<f64>,
    reason: Option<String>,
}

pub fn parse(body: &str) -> Result<Coordinate> {
    let response: IpResponse = serde_json::from_str(body)?;
    match (response.latitude, response.longitude) {
        (Some(lat), Some(long)) => Coordinate::new(lat, long)
            .ok_or_else(|| Error::DataContract(format!("coordinate out of range: {lat}, {long}"))),
        _ => Err(Error::DataContract(match response.reason {
            Some(reason) => format!("no position: {reason}"),
            None => "missing latitude/longitude".to_string(),
        })),
    }
}
