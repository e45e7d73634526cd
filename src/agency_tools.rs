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

//! Extension points of the export, one per rendered field.
//!
//! Every method has a pass-through default; an agency overrides only what its
//! feed needs.

use crate::{
    clean_utils::clean_label,
    exporter::Configuration,
    gtfs::{Calendar, CalendarDate, Feed, Route, Stop, Trip},
    mt::{MRoute, MTrip},
    objects::RouteType,
    split_utils::{RouteTripSpec, SplitTripStop},
    Result,
};
use anyhow::Context;
use std::cmp::Ordering;

/// Rules rendering the GTFS feed of one agency
pub trait AgencyTools {
    /// Name used in the logs
    fn agency_name(&self) -> &str;

    /// Hexadecimal color of the agency
    fn agency_color(&self) -> &str;

    /// Mode of every route of the agency
    fn agency_route_type(&self) -> RouteType {
        RouteType::Bus
    }

    /// Called once the feed is read, before any other method
    fn start(&mut self, _feed: &Feed, _configuration: &Configuration) -> Result<()> {
        Ok(())
    }

    /// Nothing at all should be exported
    fn excluding_all(&self) -> bool {
        false
    }

    #[allow(missing_docs)]
    fn exclude_calendar(&self, _calendar: &Calendar) -> bool {
        false
    }

    #[allow(missing_docs)]
    fn exclude_calendar_date(&self, _calendar_date: &CalendarDate) -> bool {
        false
    }

    #[allow(missing_docs)]
    fn exclude_route(&self, _route: &Route) -> bool {
        false
    }

    #[allow(missing_docs)]
    fn exclude_trip(&self, _trip: &Trip) -> bool {
        false
    }

    /// Integer id of the route, the GTFS route_id by default
    fn route_id(&self, route: &Route) -> Result<i64> {
        route
            .id
            .parse()
            .with_context(|| format!("route_id '{}' is not an integer", route.id))
    }

    #[allow(missing_docs)]
    fn route_short_name(&self, route: &Route) -> String {
        route.short_name.trim().to_string()
    }

    #[allow(missing_docs)]
    fn route_long_name(&self, route: &Route) -> String {
        clean_label(&route.long_name)
    }

    /// `None` lets the agency color apply
    fn route_color(&self, route: &Route) -> Result<Option<String>> {
        Ok(route.color.as_ref().map(|c| c.to_uppercase()))
    }

    /// The trip (direction and headsign) a GTFS trip belongs to.
    ///
    /// Not called for routes with a [`RouteTripSpec`].
    fn trip_headsign(&self, route: &MRoute, trip: &Trip) -> Result<MTrip> {
        Ok(MTrip::new(
            route.id,
            self.clean_trip_headsign(&trip.headsign),
            i32::from(trip.direction_id),
        ))
    }

    #[allow(missing_docs)]
    fn clean_trip_headsign(&self, headsign: &str) -> String {
        clean_label(headsign)
    }

    /// Merge the headsign of `trip_to_merge` into `trip`, both with the same id.
    ///
    /// Returns `false` when the headsigns cannot be merged.
    fn merge_headsign(&self, trip: &mut MTrip, trip_to_merge: &MTrip) -> Result<bool> {
        if trip.headsign_value == trip_to_merge.headsign_value
            || trip_to_merge.headsign_value.is_empty()
        {
            return Ok(true);
        }
        if trip.headsign_value.is_empty() {
            trip.set_headsign(trip_to_merge.headsign_value.clone(), trip.headsign_id);
            return Ok(true);
        }
        Ok(false)
    }

    /// Code displayed at the stop
    fn stop_code(&self, stop: &Stop) -> Option<String> {
        stop.code
            .as_ref()
            .map(|code| code.trim().to_string())
            .filter(|code| !code.is_empty())
    }

    /// Integer id of the stop, the GTFS stop_id by default
    fn stop_id(&self, stop: &Stop) -> Result<i32> {
        stop.id
            .parse()
            .with_context(|| format!("stop_id '{}' is not an integer", stop.id))
    }

    #[allow(missing_docs)]
    fn clean_stop_name(&self, name: &str) -> String {
        clean_label(name)
    }

    /// Hand written directions replacing the GTFS trips of the route
    fn route_trip_spec(&self, _route_id: i64) -> Option<&RouteTripSpec> {
        None
    }

    /// The trips replacing `trip`, `None` to use [`AgencyTools::trip_headsign`]
    fn split_trip(&self, route: &MRoute, _trip: &Trip) -> Option<Vec<MTrip>> {
        self.route_trip_spec(route.id).map(RouteTripSpec::all_trips)
    }

    /// Assign the stops of `trip`, `(stop_id, stop_sequence)` in order, to
    /// the trips returned by [`AgencyTools::split_trip`]
    fn split_trip_stops(
        &self,
        route: &MRoute,
        trip: &Trip,
        stops: &[(i32, u32)],
    ) -> Result<Vec<SplitTripStop>> {
        match self.route_trip_spec(route.id) {
            Some(spec) => spec.split_trip_stops(&trip.id, stops),
            None => {
                let trip_id = MTrip::id_of(route.id, i32::from(trip.direction_id));
                Ok(stops
                    .iter()
                    .map(|&(stop_id, gtfs_stop_sequence)| SplitTripStop {
                        trip_id,
                        stop_id,
                        gtfs_stop_sequence,
                    })
                    .collect())
            }
        }
    }

    /// Order of two stops of the trip `trip_id` known before looking at the
    /// GTFS trips, `Ordering::Equal` if none
    fn compare_early(&self, route_id: i64, trip_id: i64, stop_id1: i32, stop_id2: i32) -> Ordering {
        self.route_trip_spec(route_id)
            .map(|spec| spec.compare(trip_id, stop_id1, stop_id2))
            .unwrap_or(Ordering::Equal)
    }
}
