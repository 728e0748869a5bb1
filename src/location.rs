pub mod catalog;
pub mod strategies;

use std::fmt;
use std::str::FromStr;
use std::time::{Duration as stdDuration, Instant};

use async_std::future;
use futures::future::BoxFuture;
use log::{info, warn};
use serde::Deserialize;

use crate::error::Error;

pub use catalog::{default_city, find_city, find_nearest_city, City};

pub const EARTH_RADIUS_KM: f64 = 6371.0;

#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Coordinate {
    latitude: f64,
    longitude: f64,
}

impl Coordinate {
    /// Returns `None` for NaN or out-of-range values.
    pub fn new(latitude: f64, longitude: f64) -> Option<Self> {
        if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
            return None;
        }
        Some(Coordinate {
            latitude,
            longitude,
        })
    }

    pub(crate) const fn new_unchecked(latitude: f64, longitude: f64) -> Self {
        Coordinate {
            latitude,
            longitude,
        }
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Lat {}, Long {}", self.latitude, self.longitude)
    }
}

pub fn haversine_km(a: Coordinate, b: Coordinate) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let d_lat = lat2 - lat1;
    let d_long = b.longitude.to_radians() - a.longitude.to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_long / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    EARTH_RADIUS_KM * c
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct DeviceFix {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub accuracy_m: Option<f64>,
}

impl FromStr for DeviceFix {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || Error::Config(format!("Invalid device position {s:?}"));
        let parts: Vec<f64> = s
            .split(',')
            .map(|p| p.trim().parse::<f64>())
            .collect::<Result<_, _>>()
            .map_err(|_| bad())?;

        match parts[..] {
            [latitude, longitude] => Ok(DeviceFix {
                latitude,
                longitude,
                accuracy_m: None,
            }),
            [latitude, longitude, accuracy] => Ok(DeviceFix {
                latitude,
                longitude,
                accuracy_m: Some(accuracy),
            }),
            _ => Err(bad()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LocationSource {
    Device,
    Ip,
    NearestCity(&'static str),
    Catalog(&'static str),
    Default,
}

impl fmt::Display for LocationSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LocationSource::Device => write!(f, "device"),
            LocationSource::Ip => write!(f, "ip lookup"),
            LocationSource::NearestCity(name) => write!(f, "nearest city {name}"),
            LocationSource::Catalog(name) => write!(f, "selected city {name}"),
            LocationSource::Default => write!(f, "default"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resolution {
    pub coordinate: Coordinate,
    pub source: LocationSource,
}

impl Resolution {
    pub fn from_city(city: &'static City) -> Self {
        Resolution {
            coordinate: city.coordinate,
            source: LocationSource::Catalog(city.name),
        }
    }
}

#[derive(Debug)]
pub enum Attempt {
    Resolved(Resolution),
    /// A rough position that is not good enough on its own, passed on as a hint
    Partial(Coordinate),
    Failed(Error),
    Skipped,
}

pub trait LocationStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    fn attempt(&self, hint: Option<Coordinate>) -> BoxFuture<'_, Attempt>;
}

pub struct LocationResolver {
    strategies: Vec<Box<dyn LocationStrategy>>,
    stage_timeout: stdDuration,
}

impl LocationResolver {
    pub fn new(strategies: Vec<Box<dyn LocationStrategy>>, stage_timeout: stdDuration) -> Self {
        LocationResolver {
            strategies,
            stage_timeout,
        }
    }

    pub async fn resolve(&self) -> Resolution {
        info!("Resolving location...");
        let now = Instant::now();
        let mut hint = None;

        for strategy in &self.strategies {
            let attempt = future::timeout(self.stage_timeout, strategy.attempt(hint)).await;
            let attempt = match attempt {
                Ok(a) => a,
                Err(e) => Attempt::Failed(Error::Network(format!("Timeout: {e}"))),
            };

            match attempt {
                Attempt::Resolved(resolution) => {
                    let elapsed = format!("{:.2?}", now.elapsed());
                    info!(
                        "Location from {}: {} (took {elapsed})",
                        resolution.source, resolution.coordinate
                    );
                    return resolution;
                }
                Attempt::Partial(coordinate) => {
                    info!("{} gave a rough position {coordinate}", strategy.name());
                    hint = Some(coordinate);
                }
                Attempt::Failed(e) => warn!("{} failed: {e}", strategy.name()),
                Attempt::Skipped => {}
            }
        }

        warn!("Every location stage failed, using {}", default_city().name);
        Resolution {
            coordinate: default_city().coordinate,
            source: LocationSource::Default,
        }
    }
}
