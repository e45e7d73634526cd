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

//! Normalized MTransit objects, with integer identifiers and cleaned labels.

mod write;

pub use write::write;

use crate::objects::{Date, RouteType};
use crate::serde_utils::ser_from_naive_date;
use serde::Serialize;

/// The agency, as displayed in the application
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct MAgency {
    /// GTFS agency_id, empty if the feed has none
    pub id: String,
    /// Hexadecimal color used for routes without one
    pub color: String,
    /// Mode of every route of the agency
    pub route_type: RouteType,
}

/// A route
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct MRoute {
    #[allow(missing_docs)]
    pub id: i64,
    #[allow(missing_docs)]
    pub short_name: String,
    #[allow(missing_docs)]
    pub long_name: String,
    /// Hexadecimal color, the agency color applies when absent
    pub color: Option<String>,
}

/// One direction of a route
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct MTrip {
    /// See [`MTrip::new`]
    pub id: i64,
    #[allow(missing_docs)]
    pub route_id: i64,
    /// Label shown to riders
    pub headsign_value: String,
    /// Direction, 0 or 1
    pub headsign_id: i32,
}

impl MTrip {
    /// Largest route id whose trip ids still fit an `i64`
    pub const MAX_ROUTE_ID: i64 = (i64::MAX - 99) / 100;

    /// The trip id encodes its route and direction: `route_id * 100 + headsign_id`
    pub fn new(route_id: i64, headsign_value: String, headsign_id: i32) -> Self {
        MTrip {
            id: Self::id_of(route_id, headsign_id),
            route_id,
            headsign_value,
            headsign_id,
        }
    }

    /// Id of the trip of `route_id` in direction `headsign_id`
    pub fn id_of(route_id: i64, headsign_id: i32) -> i64 {
        route_id * 100 + i64::from(headsign_id)
    }

    /// Replace the headsign, keeping the id coherent with the direction
    pub fn set_headsign(&mut self, headsign_value: String, headsign_id: i32) {
        self.headsign_value = headsign_value;
        self.headsign_id = headsign_id;
        self.id = Self::id_of(self.route_id, headsign_id);
    }
}

/// A stop
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct MStop {
    #[allow(missing_docs)]
    pub id: i32,
    /// Code displayed at the stop, empty if none
    pub code: String,
    #[allow(missing_docs)]
    pub name: String,
    #[allow(missing_docs)]
    pub lat: f64,
    #[allow(missing_docs)]
    pub lon: f64,
}

/// A stop served by a trip, in the order of the trip
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct MTripStop {
    #[allow(missing_docs)]
    pub trip_id: i64,
    #[allow(missing_docs)]
    pub stop_id: i32,
    /// 1-based position in the trip
    pub stop_sequence: u32,
}

/// A date on which a service runs
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct MServiceDate {
    #[allow(missing_docs)]
    pub service_id: String,
    #[allow(missing_docs)]
    #[serde(serialize_with = "ser_from_naive_date")]
    pub date: Date,
}

/// Everything exported for one agency
#[derive(Debug, Default, Clone, PartialEq)]
pub struct MSpec {
    /// Absent when every record was excluded
    pub agency: Option<MAgency>,
    #[allow(missing_docs)]
    pub routes: Vec<MRoute>,
    #[allow(missing_docs)]
    pub trips: Vec<MTrip>,
    #[allow(missing_docs)]
    pub stops: Vec<MStop>,
    #[allow(missing_docs)]
    pub trip_stops: Vec<MTripStop>,
    #[allow(missing_docs)]
    pub service_dates: Vec<MServiceDate>,
}
