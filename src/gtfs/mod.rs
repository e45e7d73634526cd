// Copyright (C) 2017 Kisio Digital and/or its affiliates.
//
// This program is free software: you can redistribute it and/or modify it
// under the terms of the GNU Affero General Public License as published by the
// Free Software Foundation, version 3.

// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more
// details.

// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>

//! [GTFS](http://gtfs.org/) records read from the agency feed.
//!
//! Fields mirror the GTFS columns of the same name.

#![allow(missing_docs)]

mod read;

use crate::objects::{Date, ExceptionType, RouteType};
use crate::serde_utils::*;
use crate::Result;
use anyhow::anyhow;
use chrono::{Datelike, Weekday};
use serde::Deserialize;
use std::collections::{BTreeSet, HashMap};
use std::path::Path;
use tracing::info;
use typed_index_collection::{CollectionWithId, Id};

/// A GTFS agency
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct Agency {
    #[serde(rename = "agency_id")]
    pub id: Option<String>,
    #[serde(rename = "agency_name")]
    pub name: String,
    #[serde(rename = "agency_url")]
    pub url: String,
    #[serde(rename = "agency_timezone")]
    pub timezone: String,
}

/// A GTFS route
#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Route {
    #[serde(rename = "route_id")]
    pub id: String,
    pub agency_id: Option<String>,
    #[serde(rename = "route_short_name", default)]
    pub short_name: String,
    #[serde(rename = "route_long_name", default)]
    pub long_name: String,
    #[serde(default)]
    pub route_type: RouteType,
    /// Hexadecimal color, absent when the feed leaves it empty
    #[serde(
        rename = "route_color",
        default,
        deserialize_with = "de_option_empty_string"
    )]
    pub color: Option<String>,
    #[serde(
        rename = "route_text_color",
        default,
        deserialize_with = "de_option_empty_string"
    )]
    pub text_color: Option<String>,
}

impl Id<Route> for Route {
    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }
}

/// A GTFS trip
#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Trip {
    pub route_id: String,
    pub service_id: String,
    #[serde(rename = "trip_id")]
    pub id: String,
    #[serde(
        rename = "trip_headsign",
        default,
        deserialize_with = "de_with_empty_default"
    )]
    pub headsign: String,
    /// 0 or 1
    #[serde(default, deserialize_with = "de_with_empty_default")]
    pub direction_id: u8,
}

impl Id<Trip> for Trip {
    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }
}

/// A GTFS stop
#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Stop {
    #[serde(rename = "stop_id")]
    pub id: String,
    /// Raw code, absent when the feed leaves it empty
    #[serde(
        rename = "stop_code",
        default,
        deserialize_with = "de_option_empty_string"
    )]
    pub code: Option<String>,
    #[serde(rename = "stop_name")]
    pub name: String,
    #[serde(rename = "stop_lat")]
    pub lat: f64,
    #[serde(rename = "stop_lon")]
    pub lon: f64,
}

impl Id<Stop> for Stop {
    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }
}

/// A GTFS stop time; times are kept as written in the feed
#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
pub struct StopTime {
    pub trip_id: String,
    #[serde(default)]
    pub arrival_time: String,
    #[serde(default)]
    pub departure_time: String,
    pub stop_id: String,
    pub stop_sequence: u32,
}

/// A GTFS regular weekly service
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct Calendar {
    pub service_id: String,
    #[serde(deserialize_with = "de_from_u8")]
    pub monday: bool,
    #[serde(deserialize_with = "de_from_u8")]
    pub tuesday: bool,
    #[serde(deserialize_with = "de_from_u8")]
    pub wednesday: bool,
    #[serde(deserialize_with = "de_from_u8")]
    pub thursday: bool,
    #[serde(deserialize_with = "de_from_u8")]
    pub friday: bool,
    #[serde(deserialize_with = "de_from_u8")]
    pub saturday: bool,
    #[serde(deserialize_with = "de_from_u8")]
    pub sunday: bool,
    #[serde(deserialize_with = "de_from_date_string")]
    pub start_date: Date,
    #[serde(deserialize_with = "de_from_date_string")]
    pub end_date: Date,
}

impl Calendar {
    fn get_valid_days(&self) -> Vec<Weekday> {
        let mut valid_days: Vec<Weekday> = vec![];
        if self.monday {
            valid_days.push(Weekday::Mon);
        }
        if self.tuesday {
            valid_days.push(Weekday::Tue);
        }
        if self.wednesday {
            valid_days.push(Weekday::Wed);
        }
        if self.thursday {
            valid_days.push(Weekday::Thu);
        }
        if self.friday {
            valid_days.push(Weekday::Fri);
        }
        if self.saturday {
            valid_days.push(Weekday::Sat);
        }
        if self.sunday {
            valid_days.push(Weekday::Sun);
        }

        valid_days
    }

    /// Every date between start and end dates on an active weekday
    pub fn get_valid_dates(&self) -> BTreeSet<Date> {
        let valid_days = self.get_valid_days();
        let duration = self.end_date - self.start_date;
        (0..=duration.num_days())
            .map(|i| self.start_date + chrono::Duration::days(i))
            .filter(|d| valid_days.contains(&d.weekday()))
            .collect()
    }
}

/// A GTFS exception to the regular services
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct CalendarDate {
    pub service_id: String,
    #[serde(deserialize_with = "de_from_date_string")]
    pub date: Date,
    pub exception_type: ExceptionType,
}

/// The records of a GTFS feed
#[derive(Default)]
pub struct Feed {
    pub agencies: Vec<Agency>,
    pub routes: CollectionWithId<Route>,
    pub trips: CollectionWithId<Trip>,
    pub stops: CollectionWithId<Stop>,
    pub stop_times: Vec<StopTime>,
    pub calendars: Vec<Calendar>,
    pub calendar_dates: Vec<CalendarDate>,
}

impl Feed {
    /// Stop times grouped by trip, each group ordered by stop_sequence
    pub fn stop_times_by_trip(&self) -> HashMap<&str, Vec<&StopTime>> {
        let mut stop_times_by_trip: HashMap<&str, Vec<&StopTime>> = HashMap::new();
        for stop_time in &self.stop_times {
            stop_times_by_trip
                .entry(stop_time.trip_id.as_str())
                .or_default()
                .push(stop_time);
        }
        for stop_times in stop_times_by_trip.values_mut() {
            stop_times.sort_by_key(|st| st.stop_sequence);
        }
        stop_times_by_trip
    }
}

/// Read a GTFS feed from a directory or a zip archive
pub fn read<P: AsRef<Path>>(path: P) -> Result<Feed> {
    let p = path.as_ref();
    if p.is_file() {
        info!("Reading zipped GTFS from {:?}", p);
        let mut file_handler = crate::read_utils::ZipHandler::new(p)
            .map_err(|e| e.context(format!("impossible to read zipped gtfs {:?}", p)))?;
        read::read_feed(&mut file_handler)
    } else if p.is_dir() {
        info!("Reading GTFS from {:?}", p);
        let mut file_handler = crate::read_utils::PathFileHandler::new(p.to_path_buf());
        read::read_feed(&mut file_handler)
    } else {
        Err(anyhow!(
            "file {:?} is neither a file nor a directory, cannot read a gtfs from it",
            p
        ))
    }
}
