use serde::Deserialize;

use crate::solar::{Percentage, SolarSplit};

pub const MOBILE_BREAKPOINT: u32 = 768;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Default for Viewport {
    fn default() -> Self {
        Viewport {
            width: 1920,
            height: 1080,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Default)]
pub struct Pointer {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    Daytime,
    Nighttime,
}

impl Viewport {
    pub fn is_mobile(&self) -> bool {
        self.width <= MOBILE_BREAKPOINT
    }

    pub fn dominant_axis_size(&self) -> f64 {
        if self.is_mobile() {
            self.height as f64
        } else {
            self.width as f64
        }
    }

    pub fn axis_position(&self, pointer: Pointer) -> f64 {
        if self.is_mobile() {
            pointer.y
        } else {
            pointer.x
        }
    }

    pub fn threshold(&self, split: SolarSplit) -> f64 {
        pixel_threshold(self.dominant_axis_size(), split.night)
    }
}

// night is the leading band, so it sets the threshold
pub fn pixel_threshold(axis_size: f64, fraction: Percentage) -> f64 {
    axis_size * fraction.as_f64() / 100.0
}

pub fn classify(position: f64, threshold: f64) -> Region {
    if position < threshold {
        Region::Nighttime
    } else {
        Region::Daytime
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Width,
    Height,
}

impl Axis {
    pub fn unit(&self) -> &'static str {
        match self {
            Axis::Width => "svw",
            Axis::Height => "svh",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanelExtents {
    pub axis: Axis,
    pub day: Percentage,
    pub night: Percentage,
}

impl PanelExtents {
    pub fn new(split: SolarSplit, is_mobile: bool) -> Self {
        PanelExtents {
            axis: if is_mobile { Axis::Height } else { Axis::Width },
            day: split.day,
            night: split.night,
        }
    }

    /// Style-sheet form of the extents, e.g. `("58.33svw", "41.67svw")`.
    pub fn css(&self) -> (String, String) {
        let unit = self.axis.unit();
        (format!("{}{unit}", self.day), format!("{}{unit}", self.night))
    }

    pub fn rects(&self, viewport: Viewport) -> (Rect, Rect) {
        let (w, h) = (viewport.width as f64, viewport.height as f64);
        match self.axis {
            Axis::Width => {
                let night = pixel_threshold(w, self.night);
                (
                    Rect { x: 0.0, y: 0.0, width: night, height: h },
                    Rect { x: night, y: 0.0, width: w - night, height: h },
                )
            }
            Axis::Height => {
                let night = pixel_threshold(h, self.night);
                (
                    Rect { x: 0.0, y: 0.0, width: w, height: night },
                    Rect { x: 0.0, y: night, width: w, height: h - night },
                )
            }
        }
    }
}

pub fn clamp_into(viewport: Viewport, pointer: Pointer, size: (f64, f64)) -> (f64, f64) {
    let max_x = (viewport.width as f64 - size.0).max(0.0);
    let max_y = (viewport.height as f64 - size.1).max(0.0);
    (pointer.x.max(0.0).min(max_x), pointer.y.max(0.0).min(max_y))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::{ClockDuration, ClockTime};

    fn split(day_hundredths: u32) -> SolarSplit {
        // 14:24 of daylight is exactly 60 %
        let minutes = day_hundredths * 1440 / 10_000;
        let end = ClockTime::new((minutes / 60) as u8, (minutes % 60) as u8).unwrap();
        SolarSplit::from_daylight(ClockDuration::between(ClockTime::MIDNIGHT, end))
    }

    #[test]
    fn test_breakpoint_picks_axis() {
        let desktop = Viewport { width: 1920, height: 1080 };
        let edge = Viewport { width: 768, height: 1024 };
        let phone = Viewport { width: 390, height: 844 };
        assert_eq!(desktop.dominant_axis_size(), 1920.0);
        assert_eq!(edge.dominant_axis_size(), 1024.0);
        assert_eq!(phone.dominant_axis_size(), 844.0);
        assert!(!Viewport { width: 769, height: 10 }.is_mobile());
    }

    #[test]
    fn test_desktop_threshold_uses_night_share() {
        let s = split(6000);
        assert_eq!(s.night.to_string(), "40");
        let desktop = Viewport { width: 1920, height: 1080 };
        assert_eq!(desktop.threshold(s), 768.0);
    }

    #[test]
    fn test_classify_night_leads() {
        assert_eq!(classify(0.0, 768.0), Region::Nighttime);
        assert_eq!(classify(767.9, 768.0), Region::Nighttime);
        assert_eq!(classify(768.0, 768.0), Region::Daytime);
        assert_eq!(classify(1900.0, 768.0), Region::Daytime);
        // no data yet: threshold 0 means everything reads as day
        assert_eq!(classify(10.0, 0.0), Region::Daytime);
    }

    #[test]
    fn test_mobile_classifies_on_y() {
        let phone = Viewport { width: 400, height: 1000 };
        let s = split(6000);
        let threshold = phone.threshold(s);
        assert_eq!(threshold, 400.0);
        let top = Pointer { x: 399.0, y: 100.0 };
        let bottom = Pointer { x: 1.0, y: 900.0 };
        assert_eq!(classify(phone.axis_position(top), threshold), Region::Nighttime);
        assert_eq!(classify(phone.axis_position(bottom), threshold), Region::Daytime);
    }

    #[test]
    fn test_extents_follow_layout() {
        let s = split(6000);
        let desktop = PanelExtents::new(s, false);
        assert_eq!(desktop.css(), ("60svw".to_string(), "40svw".to_string()));
        let mobile = PanelExtents::new(s, true);
        assert_eq!(mobile.css(), ("60svh".to_string(), "40svh".to_string()));

        let (night, day) = desktop.rects(Viewport { width: 1000, height: 500 });
        assert_eq!(night, Rect { x: 0.0, y: 0.0, width: 400.0, height: 500.0 });
        assert_eq!(day, Rect { x: 400.0, y: 0.0, width: 600.0, height: 500.0 });

        let (night, day) = mobile.rects(Viewport { width: 500, height: 1000 });
        assert_eq!(night.height, 400.0);
        assert_eq!(day.y, 400.0);
        assert_eq!(day.width, 500.0);
    }

    #[test]
    fn test_clamp_keeps_box_on_screen() {
        let vp = Viewport { width: 1000, height: 600 };
        let size = (200.0, 100.0);
        assert_eq!(clamp_into(vp, Pointer { x: 50.0, y: 50.0 }, size), (50.0, 50.0));
        assert_eq!(clamp_into(vp, Pointer { x: 990.0, y: 590.0 }, size), (800.0, 500.0));
        assert_eq!(clamp_into(vp, Pointer { x: -5.0, y: -1.0 }, size), (0.0, 0.0));
        // box larger than the screen pins to the origin
        let tiny = Viewport { width: 100, height: 50 };
        assert_eq!(clamp_into(tiny, Pointer { x: 80.0, y: 40.0 }, size), (0.0, 0.0));
    }
}
