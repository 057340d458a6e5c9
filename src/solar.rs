//! Solar event resolution for a geographic location.
//!
//! [`GeoSolar`] is the [`SolarEventSource`] the CLI hands to root intervals
//! that use `sunrise` or `sunset`. Times come from the `sunrise` crate and
//! are reported in UTC for the requested calendar date.

use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use sunrise::{Coordinates, SolarDay};

use crate::time_spec::{SolarEvent, SolarEventSource};

/// Sunrise and sunset times at a fixed latitude/longitude.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoSolar {
    latitude: f64,
    longitude: f64,
}

impl GeoSolar {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
        if Coordinates::new(latitude, longitude).is_none() {
            anyhow::bail!("Invalid coordinates: lat={latitude:.4}, lon={longitude:.4}");
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

impl SolarEventSource for GeoSolar {
    fn event_time(&self, event: SolarEvent, date: NaiveDate) -> Option<DateTime<Utc>> {
        let coordinates = Coordinates::new(self.latitude, self.longitude)?;
        let solar_day = SolarDay::new(coordinates, date);
        let time = solar_day.event_time(match event {
            SolarEvent::Sunrise => sunrise::SolarEvent::Sunrise,
            SolarEvent::Sunset => sunrise::SolarEvent::Sunset,
        });

        // Polar day and night produce times that do not belong to the date
        let days_apart = (time.date_naive() - date).num_days().abs();
        if days_apart > 1 {
            log_debug!("No {event} on {date} at {:.4}, {:.4}", self.latitude, self.longitude);
            return None;
        }
        Some(time)
    }
}
