use std::sync::Arc;
use std::time::Instant;

use log::{debug, error, info, warn};

use crate::clock::ClockDuration;
use crate::location::{find_city, Resolution};
use crate::solar::{Percentage, SolarDay};
use crate::sources::{Place, ReverseGeocoder, SunSource};
use crate::viewport::{classify, clamp_into, PanelExtents, Pointer, Rect, Region, Viewport};

pub const INFO_PANEL_SIZE: (f64, f64) = (260.0, 180.0);

pub const LOADING_TEXT: &str = "Loading...";
pub const ERROR_TEXT: &str = "Error loading data. Please try again.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    Loading,
    Ready,
    Failed,
}

impl Status {
    pub fn message(&self) -> Option<&'static str> {
        match self {
            Status::Loading => Some(LOADING_TEXT),
            Status::Ready => None,
            Status::Failed => Some(ERROR_TEXT),
        }
    }
}

#[derive(Debug, Clone)]
pub struct DisplayState {
    pub solar: Option<SolarDay>,
    pub place: Place,
    pub resolution: Option<Resolution>,
    pub viewport: Viewport,
    // 0 until data arrives
    pub threshold: f64,
    pub pointer: Option<Pointer>,
    pub status: Status,
}

impl DisplayState {
    fn new(viewport: Viewport) -> Self {
        DisplayState {
            solar: None,
            place: Place::not_found(),
            resolution: None,
            viewport,
            threshold: 0.0,
            pointer: None,
            status: Status::Loading,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct InfoPanel {
    pub region: Region,
    pub hours: ClockDuration,
    pub percentage: Percentage,
    pub place: Place,
    pub position: (f64, f64),
}

impl InfoPanel {
    fn new(region: Region, solar: &SolarDay, place: &Place, position: (f64, f64)) -> Self {
        let (hours, percentage) = match region {
            Region::Daytime => (solar.day_hours, solar.split.day),
            Region::Nighttime => (solar.night_hours, solar.split.night),
        };
        InfoPanel {
            region,
            hours,
            percentage,
            place: place.clone(),
            position,
        }
    }

    pub fn icon(&self) -> &'static str {
        match self.region {
            Region::Daytime => "☀",
            Region::Nighttime => "☾",
        }
    }

    pub fn lines(&self) -> [String; 3] {
        let what = match self.region {
            Region::Daytime => "day",
            Region::Nighttime => "night",
        };
        [
            "Today".to_string(),
            format!("{} hours of {what}", self.hours),
            format!("{}%", self.percentage),
        ]
    }

    pub fn location_line(&self) -> String {
        format!("Location: {}", self.place)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Layout {
    Desktop { info: Option<InfoPanel> },
    Mobile { night: InfoPanel, day: InfoPanel },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub viewport: Viewport,
    pub bands: Option<(Rect, Rect)>,
    pub layout: Option<Layout>,
    pub status: Status,
}

pub struct Controller {
    sun: Arc<dyn SunSource>,
    geocoder: Arc<dyn ReverseGeocoder>,
    state: DisplayState,
}

impl Controller {
    pub fn new(
        sun: Arc<dyn SunSource>,
        geocoder: Arc<dyn ReverseGeocoder>,
        viewport: Viewport,
    ) -> Self {
        Controller {
            sun,
            geocoder,
            state: DisplayState::new(viewport),
        }
    }

    #[cfg(test)]
    pub fn state(&self) -> &DisplayState {
        &self.state
    }

    /// Fetches sun data and the place name for `resolution` and replaces the display state.
    pub async fn load(&mut self, resolution: Resolution) {
        let at = resolution.coordinate;
        info!("Loading sun data for {at} ({})", resolution.source);
        let now = Instant::now();

        self.state.resolution = Some(resolution);
        self.state.status = Status::Loading;

        let times = match self.sun.sun_times(at).await {
            Ok(t) => t,
            Err(e) => {
                error!("Sun data failed for {at}: {e}");
                self.state.solar = None;
                self.state.status = Status::Failed;
                self.recompute_threshold();
                return;
            }
        };

        let solar = SolarDay::from_raw(&times.sunrise, &times.sunset);
        info!(
            "Sunrise {} sunset {}: {} of day ({}%), {} of night ({}%)",
            solar.sunrise,
            solar.sunset,
            solar.day_hours,
            solar.split.day,
            solar.night_hours,
            solar.split.night
        );

        let place = match self.geocoder.place(at).await {
            Ok(place) => place,
            Err(e) => {
                warn!("Reverse lookup failed for {at}: {e}");
                Place::not_found()
            }
        };

        self.state.solar = Some(solar);
        self.state.place = place;
        self.state.status = Status::Ready;
        self.recompute_threshold();

        let elapsed = format!("{:.2?}", now.elapsed());
        if let Some(resolution) = &self.state.resolution {
            info!("Loaded {} from {} in {elapsed}", self.state.place, resolution.source);
        }
    }

    pub async fn select_city(&mut self, name: &str) -> bool {
        match find_city(name) {
            Some(city) => {
                self.load(Resolution::from_city(city)).await;
                true
            }
            None => {
                warn!("Unknown city {name:?}");
                false
            }
        }
    }

    pub fn resize(&mut self, viewport: Viewport) {
        self.state.viewport = viewport;
        self.recompute_threshold();
    }

    pub fn pointer_moved(&mut self, pointer: Pointer) -> Option<InfoPanel> {
        self.state.pointer = Some(pointer);
        self.floating_panel()
    }

    fn floating_panel(&self) -> Option<InfoPanel> {
        let state = &self.state;
        let solar = state.solar.as_ref()?;
        let pointer = state.pointer?;
        if state.viewport.is_mobile() {
            return None;
        }

        let region = classify(state.viewport.axis_position(pointer), state.threshold);
        let position = clamp_into(state.viewport, pointer, INFO_PANEL_SIZE);
        Some(InfoPanel::new(region, solar, &state.place, position))
    }

    fn recompute_threshold(&mut self) {
        let viewport = self.state.viewport;
        self.state.threshold = match &self.state.solar {
            Some(solar) => {
                let (day, night) = PanelExtents::new(solar.split, viewport.is_mobile()).css();
                debug!("Panels day {day} night {night}");
                viewport.threshold(solar.split)
            }
            None => 0.0,
        };
    }

    pub fn frame(&self) -> Frame {
        let state = &self.state;
        let viewport = state.viewport;

        let Some(solar) = state.solar.as_ref() else {
            return Frame {
                viewport,
                bands: None,
                layout: None,
                status: state.status.clone(),
            };
        };

        let extents = PanelExtents::new(solar.split, viewport.is_mobile());
        let (night_rect, day_rect) = extents.rects(viewport);

        let layout = if viewport.is_mobile() {
            let centred = |rect: Rect| {
                let (cx, cy) = rect.center();
                let pointer = Pointer {
                    x: cx - INFO_PANEL_SIZE.0 / 2.0,
                    y: cy - INFO_PANEL_SIZE.1 / 2.0,
                };
                clamp_into(viewport, pointer, INFO_PANEL_SIZE)
            };
            Layout::Mobile {
                night: InfoPanel::new(Region::Nighttime, solar, &state.place, centred(night_rect)),
                day: InfoPanel::new(Region::Daytime, solar, &state.place, centred(day_rect)),
            }
        } else {
            Layout::Desktop {
                info: self.floating_panel(),
            }
        };

        Frame {
            viewport,
            bands: Some((night_rect, day_rect)),
            layout: Some(layout),
            status: state.status.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Error, Result};
    use crate::location::{default_city, LocationSource};
    use crate::sources::SunTimes;
    use futures::future::{self, BoxFuture};
    use futures::FutureExt;

    struct FakeSun(Option<(&'static str, &'static str)>);

    impl SunSource for FakeSun {
        fn sun_times(&self, _at: crate::location::Coordinate) -> BoxFuture<'_, Result<SunTimes>> {
            let result = match self.0 {
                Some((sunrise, sunset)) => Ok(SunTimes {
                    sunrise: sunrise.to_string(),
                    sunset: sunset.to_string(),
                }),
                None => Err(Error::Network("503 Service Unavailable".to_string())),
            };
            future::ready(result).boxed()
        }
    }

    struct FakeGeocoder(Option<Place>);

    impl ReverseGeocoder for FakeGeocoder {
        fn place(&self, _at: crate::location::Coordinate) -> BoxFuture<'_, Result<Place>> {
            let result = self
                .0
                .clone()
                .ok_or_else(|| Error::DataContract("missing address".to_string()));
            future::ready(result).boxed()
        }
    }

    fn bath() -> Place {
        Place {
            city: "Bath".to_string(),
            country: "United Kingdom".to_string(),
        }
    }

    fn controller(
        sun: Option<(&'static str, &'static str)>,
        place: Option<Place>,
        viewport: Viewport,
    ) -> Controller {
        Controller::new(
            Arc::new(FakeSun(sun)),
            Arc::new(FakeGeocoder(place)),
            viewport,
        )
    }

    fn default_resolution() -> Resolution {
        Resolution {
            coordinate: default_city().coordinate,
            source: LocationSource::Default,
        }
    }

    const DESKTOP: Viewport = Viewport {
        width: 1920,
        height: 1080,
    };

    #[tokio::test]
    async fn test_load_fills_state() {
        let mut c = controller(Some(("6:00:00 AM", "8:00:00 PM")), Some(bath()), DESKTOP);
        c.load(default_resolution()).await;

        let state = c.state();
        assert_eq!(state.status, Status::Ready);
        let solar = state.solar.unwrap();
        assert_eq!(solar.day_hours.to_string(), "14:00");
        assert_eq!(solar.split.night.to_string(), "41.67");
        assert_eq!(state.place, bath());
        // 1920 × 41.67 %
        assert!((state.threshold - 800.064).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_pointer_picks_side() {
        let mut c = controller(Some(("6:00:00 AM", "8:00:00 PM")), Some(bath()), DESKTOP);
        c.load(default_resolution()).await;

        let night = c.pointer_moved(Pointer { x: 100.0, y: 100.0 }).unwrap();
        assert_eq!(night.region, Region::Nighttime);
        assert_eq!(night.icon(), "☾");
        assert_eq!(night.lines()[1], "10:00 hours of night");
        assert_eq!(night.lines()[2], "41.67%");
        assert_eq!(night.location_line(), "Location: Bath, United Kingdom");

        let day = c.pointer_moved(Pointer { x: 1900.0, y: 1070.0 }).unwrap();
        assert_eq!(day.region, Region::Daytime);
        assert_eq!(day.lines()[1], "14:00 hours of day");
        assert_eq!(day.lines()[2], "58.33%");
        assert_eq!(day.position, (1920.0 - 260.0, 1080.0 - 180.0));
    }

    #[tokio::test]
    async fn test_events_before_load_are_harmless() {
        let mut c = controller(None, None, DESKTOP);
        assert!(c.pointer_moved(Pointer { x: 5.0, y: 5.0 }).is_none());
        c.resize(Viewport { width: 400, height: 800 });
        assert_eq!(c.state().threshold, 0.0);

        let frame = c.frame();
        assert_eq!(frame.status.message(), Some(LOADING_TEXT));
        assert!(frame.bands.is_none());
    }

    #[tokio::test]
    async fn test_sun_failure_shows_retry_message() {
        let mut c = controller(None, Some(bath()), DESKTOP);
        c.load(default_resolution()).await;
        assert_eq!(c.state().status, Status::Failed);
        assert_eq!(c.frame().status.message(), Some(ERROR_TEXT));
        assert!(c.pointer_moved(Pointer { x: 1.0, y: 1.0 }).is_none());
    }

    #[tokio::test]
    async fn test_geocode_failure_does_not_block() {
        let mut c = controller(Some(("7:00:00 AM", "7:00:00 PM")), None, DESKTOP);
        c.load(default_resolution()).await;
        assert_eq!(c.state().status, Status::Ready);
        assert_eq!(c.state().place, Place::not_found());
    }

    #[tokio::test]
    async fn test_resize_switches_layout() {
        let mut c = controller(Some(("6:00:00 AM", "8:00:00 PM")), Some(bath()), DESKTOP);
        c.load(default_resolution()).await;
        c.pointer_moved(Pointer { x: 10.0, y: 10.0 });
        assert!(matches!(
            c.frame().layout,
            Some(Layout::Desktop { info: Some(_) })
        ));

        c.resize(Viewport { width: 500, height: 1000 });
        assert!((c.state().threshold - 416.7).abs() < 1e-9);
        assert!(c.pointer_moved(Pointer { x: 10.0, y: 10.0 }).is_none());

        let frame = c.frame();
        let (night, day) = frame.bands.unwrap();
        assert_eq!(night.width, 500.0);
        assert!((day.y - 416.7).abs() < 1e-9);
        match frame.layout {
            Some(Layout::Mobile { night, day }) => {
                assert_eq!(night.region, Region::Nighttime);
                assert_eq!(day.region, Region::Daytime);
                assert!(night.position.1 < day.position.1);
            }
            other => panic!("unexpected layout {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_select_city() {
        let mut c = controller(Some(("6:00:00 AM", "6:00:00 PM")), Some(bath()), DESKTOP);
        assert!(c.select_city("tokyo").await);
        assert_eq!(
            c.state().resolution.unwrap().source,
            LocationSource::Catalog("Tokyo")
        );
        assert!(!c.select_city("Atlantis").await);
        assert_eq!(
            c.state().resolution.unwrap().source,
            LocationSource::Catalog("Tokyo")
        );
    }

    #[tokio::test]
    async fn test_latest_load_wins() {
        let mut c = controller(Some(("6:00:00 AM", "8:00:00 PM")), Some(bath()), DESKTOP);
        c.load(default_resolution()).await;
        c.sun = Arc::new(FakeSun(None));
        c.select_city("Sydney").await;
        assert!(c.state().solar.is_none());
        assert_eq!(c.state().status, Status::Failed);
    }
}
