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

use std::fmt;
use thiserror::Error;

/// What is wrong with a GTFS `stop_id` that cannot be turned into an integer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopIdIssue {
    /// No digit at all in the identifier
    MissingDigits,
    /// The identifier does not start with a known prefix
    UnknownPrefix,
    /// The identifier does not end with a known suffix
    UnknownSuffix,
    /// The computed identifier does not fit an `i32`
    OutOfRange,
}

impl fmt::Display for StopIdIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StopIdIssue::MissingDigits => write!(f, "no digits"),
            StopIdIssue::UnknownPrefix => write!(f, "unknown prefix"),
            StopIdIssue::UnknownSuffix => write!(f, "unknown suffix"),
            StopIdIssue::OutOfRange => write!(f, "out of range"),
        }
    }
}

/// A record of the feed that the agency rules do not anticipate.
///
/// Every variant aborts the export: the feed changed shape and the rules
/// must be updated.
#[derive(Debug, Error, PartialEq)]
pub enum AgencyError {
    /// The route short name cannot be turned into a route id
    #[error("unexpected route id for route short name '{short_name}'")]
    UnexpectedRouteId {
        /// GTFS route_short_name
        short_name: String,
    },
    /// The route has no color and its short name is not in the color table
    #[error("unexpected route color for route short name '{short_name}'")]
    UnexpectedRouteColor {
        /// GTFS route_short_name
        short_name: String,
    },
    /// The GTFS stop_id cannot be turned into a stop id
    #[error("unexpected stop id '{stop_id}' ({issue})")]
    UnexpectedStopId {
        /// GTFS stop_id
        stop_id: String,
        /// Which rule rejected the identifier
        issue: StopIdIssue,
    },
    /// A route with special headsign rules has an unknown headsign
    #[error("{route_id}: unexpected trip '{trip_id}' with headsign '{headsign}'")]
    UnexpectedTripHeadsign {
        /// MTransit route id
        route_id: i64,
        /// GTFS trip_id
        trip_id: String,
        /// GTFS trip_headsign
        headsign: String,
    },
    /// Two headsigns of the same trip direction cannot be merged
    #[error("{route_id}: unexpected trips to merge '{headsign}' & '{headsign_to_merge}'")]
    UnexpectedHeadsignMerge {
        /// MTransit route id
        route_id: i64,
        /// Headsign already set
        headsign: String,
        /// Headsign of the trip to merge
        headsign_to_merge: String,
    },
    /// A stop of a split route is in none of the route's stop lists
    #[error("{route_id}: unexpected stop {stop_id} in trip '{trip_id}'")]
    UnexpectedSplitStop {
        /// MTransit route id
        route_id: i64,
        /// GTFS trip_id
        trip_id: String,
        /// MTransit stop id
        stop_id: i32,
    },
}
