use std::sync::Arc;
use std::time::Duration as stdDuration;

use futures::future::{self, BoxFuture};
use futures::FutureExt;

use super::{
    default_city, find_nearest_city, Attempt, Coordinate, DeviceFix, LocationResolver,
    LocationSource, LocationStrategy, Resolution,
};
use crate::config::Config;
use crate::error::Error;
use crate::sources::IpLocator;

pub struct DeviceStrategy {
    fix: Option<DeviceFix>,
    max_accuracy_m: f64,
}

impl DeviceStrategy {
    pub fn new(fix: Option<DeviceFix>, max_accuracy_m: f64) -> Self {
        DeviceStrategy {
            fix,
            max_accuracy_m,
        }
    }

    fn read(&self) -> Attempt {
        let Some(fix) = self.fix else {
            return Attempt::Failed(Error::Geolocation("not available".to_string()));
        };
        let Some(coordinate) = Coordinate::new(fix.latitude, fix.longitude) else {
            return Attempt::Failed(Error::Geolocation(format!(
                "bad fix {}, {}",
                fix.latitude, fix.longitude
            )));
        };

        match fix.accuracy_m {
            Some(accuracy) if accuracy > self.max_accuracy_m => Attempt::Partial(coordinate),
            _ => Attempt::Resolved(Resolution {
                coordinate,
                source: LocationSource::Device,
            }),
        }
    }
}

impl LocationStrategy for DeviceStrategy {
    fn name(&self) -> &'static str {
        "device geolocation"
    }

    fn attempt(&self, _hint: Option<Coordinate>) -> BoxFuture<'_, Attempt> {
        future::ready(self.read()).boxed()
    }
}

pub struct IpStrategy {
    locator: Arc<dyn IpLocator>,
}

impl IpStrategy {
    pub fn new(locator: Arc<dyn IpLocator>) -> Self {
        IpStrategy { locator }
    }
}

impl LocationStrategy for IpStrategy {
    fn name(&self) -> &'static str {
        "ip geolocation"
    }

    fn attempt(&self, _hint: Option<Coordinate>) -> BoxFuture<'_, Attempt> {
        async move {
            match self.locator.locate().await {
                Ok(coordinate) => Attempt::Resolved(Resolution {
                    coordinate,
                    source: LocationSource::Ip,
                }),
                Err(e) => Attempt::Failed(e),
            }
        }
        .boxed()
    }
}

pub struct NearestCityStrategy;

impl LocationStrategy for NearestCityStrategy {
    fn name(&self) -> &'static str {
        "nearest city"
    }

    fn attempt(&self, hint: Option<Coordinate>) -> BoxFuture<'_, Attempt> {
        let attempt = match hint {
            Some(rough) => {
                let (city, _) = find_nearest_city(rough);
                Attempt::Resolved(Resolution {
                    coordinate: city.coordinate,
                    source: LocationSource::NearestCity(city.name),
                })
            }
            None => Attempt::Skipped,
        };
        future::ready(attempt).boxed()
    }
}

pub struct DefaultStrategy;

impl LocationStrategy for DefaultStrategy {
    fn name(&self) -> &'static str {
        "default"
    }

    fn attempt(&self, _hint: Option<Coordinate>) -> BoxFuture<'_, Attempt> {
        future::ready(Attempt::Resolved(Resolution {
            coordinate: default_city().coordinate,
            source: LocationSource::Default,
        }))
        .boxed()
    }
}

pub fn standard_chain(config: &Config, ip: Arc<dyn IpLocator>) -> LocationResolver {
    LocationResolver::new(
        vec![
            Box::new(DeviceStrategy::new(config.device, config.max_device_accuracy_m)),
            Box::new(IpStrategy::new(ip)),
            Box::new(NearestCityStrategy),
            Box::new(DefaultStrategy),
        ],
        stdDuration::from_secs(config.stage_timeout_secs),
    )
}
