pub mod geocode;
pub mod ip;
pub mod sun;

use std::time::Duration as stdDuration;

use chrono::NaiveDate;
use chrono_tz::Tz;
use futures::future::BoxFuture;
use futures::FutureExt;
use log::info;
use reqwest::header;

use crate::config::Config;
use crate::error::Result;
use crate::location::Coordinate;

pub use geocode::Place;
pub use sun::SunTimes;

pub trait SunSource: Send + Sync {
    fn sun_times(&self, at: Coordinate) -> BoxFuture<'_, Result<SunTimes>>;
}

pub trait ReverseGeocoder: Send + Sync {
    fn place(&self, at: Coordinate) -> BoxFuture<'_, Result<Place>>;
}

pub trait IpLocator: Send + Sync {
    fn locate(&self) -> BoxFuture<'_, Result<Coordinate>>;
}

#[derive(Clone)]
pub struct HttpSources {
    client: reqwest::Client,
    sun_api_url: String,
    geocode_url: String,
    ip_api_url: String,
    date: Option<NaiveDate>,
    timezone: Option<Tz>,
}

impl HttpSources {
    pub fn new(config: &Config) -> Result<Self> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::USER_AGENT,
            header::HeaderValue::from_str(&config.user_agent)
                .map_err(|e| crate::error::Error::Config(format!("user_agent: {e}")))?,
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .redirect(reqwest::redirect::Policy::none())
            .timeout(stdDuration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(HttpSources {
            client,
            sun_api_url: config.sun_api_url.clone(),
            geocode_url: config.geocode_url.clone(),
            ip_api_url: config.ip_api_url.clone(),
            date: config.date,
            timezone: config.timezone()?,
        })
    }

    async fn get_text(&self, url: &str) -> Result<String> {
        info!("GET {url}");
        let response = self.client.get(url).send().await?;
        let response = response.error_for_status()?;
        Ok(response.text().await?)
    }
}

impl SunSource for HttpSources {
    fn sun_times(&self, at: Coordinate) -> BoxFuture<'_, Result<SunTimes>> {
        async move {
            let url = sun::url(&self.sun_api_url, at, self.date, self.timezone);
            let body = self.get_text(&url).await?;
            sun::parse(&body)
        }
        .boxed()
    }
}

impl ReverseGeocoder for HttpSources {
    fn place(&self, at: Coordinate) -> BoxFuture<'_, Result<Place>> {
        async move {
            let url = geocode::url(&self.geocode_url, at);
            let body = self.get_text(&url).await?;
            geocode::parse(&body)
        }
        .boxed()
    }
}

impl IpLocator for HttpSources {
    fn locate(&self) -> BoxFuture<'_, Result<Coordinate>> {
        async move {
            let body = self.get_text(&self.ip_api_url).await?;
            ip::parse(&body)
        }
        .boxed()
    }
}
