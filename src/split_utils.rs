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

//! Hand written directions for routes whose GTFS trips cannot be used as is,
//! typically loops published as one trip going out and back.

use crate::{mt::MTrip, AgencyError, Result};
use std::cmp::Ordering;

/// One direction of a [`RouteTripSpec`]
#[derive(Debug, Clone, PartialEq)]
pub struct TripSpec {
    headsign_id: i32,
    headsign_value: String,
    stop_ids: Vec<i32>,
}

impl TripSpec {
    /// A direction with its ordered stops
    pub fn new(headsign_id: i32, headsign_value: &str, stop_ids: &[i32]) -> Self {
        TripSpec {
            headsign_id,
            headsign_value: headsign_value.to_string(),
            stop_ids: stop_ids.to_vec(),
        }
    }

    /// Ordered stops of the direction
    pub fn stop_ids(&self) -> &[i32] {
        &self.stop_ids
    }

    fn position(&self, stop_id: i32) -> Option<usize> {
        self.stop_ids.iter().position(|&id| id == stop_id)
    }

    fn is_last(&self, position: usize) -> bool {
        position + 1 == self.stop_ids.len()
    }
}

/// A stop of a GTFS trip assigned to one direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplitTripStop {
    /// MTransit trip (direction) the stop belongs to
    pub trip_id: i64,
    #[allow(missing_docs)]
    pub stop_id: i32,
    /// stop_sequence of the stop in the GTFS trip
    pub gtfs_stop_sequence: u32,
}

/// The directions of one route, replacing the GTFS trips of this route
#[derive(Debug, Clone, PartialEq)]
pub struct RouteTripSpec {
    route_id: i64,
    directions: Vec<TripSpec>,
}

impl RouteTripSpec {
    /// Directions of `route_id`
    pub fn new(route_id: i64, directions: Vec<TripSpec>) -> Self {
        RouteTripSpec {
            route_id,
            directions,
        }
    }

    #[allow(missing_docs)]
    pub fn route_id(&self) -> i64 {
        self.route_id
    }

    /// The trips replacing the GTFS trips of the route
    pub fn all_trips(&self) -> Vec<MTrip> {
        self.directions
            .iter()
            .map(|d| MTrip::new(self.route_id, d.headsign_value.clone(), d.headsign_id))
            .collect()
    }

    /// Stops of the direction with the given trip id
    pub fn trip_stop_ids(&self, trip_id: i64) -> Option<&[i32]> {
        self.direction(trip_id).map(TripSpec::stop_ids)
    }

    fn direction(&self, trip_id: i64) -> Option<&TripSpec> {
        self.directions
            .iter()
            .find(|d| MTrip::id_of(self.route_id, d.headsign_id) == trip_id)
    }

    /// Assign each stop of the GTFS trip `gtfs_trip_id` to a direction.
    ///
    /// `stops` are `(stop_id, stop_sequence)` in the order of the GTFS trip.
    /// The walk stays in a direction while the stops move forward in its list.
    /// When it switches, the previous stop also opens the new direction if it
    /// is the stop preceding the current one there (shared terminus).
    pub fn split_trip_stops(
        &self,
        gtfs_trip_id: &str,
        stops: &[(i32, u32)],
    ) -> Result<Vec<SplitTripStop>> {
        let mut split = Vec::with_capacity(stops.len() + 1);
        let mut current: Option<(usize, usize)> = None;
        let mut previous: Option<(i32, u32)> = None;
        for &(stop_id, gtfs_stop_sequence) in stops {
            let forward = current.and_then(|(d, position)| {
                self.directions[d]
                    .position(stop_id)
                    .filter(|&p| p > position)
                    .map(|p| (d, p))
            });
            let (d, p) = match forward {
                Some(next) => next,
                None => {
                    let (d, p) = self.switch_direction(current, stop_id).ok_or_else(|| {
                        AgencyError::UnexpectedSplitStop {
                            route_id: self.route_id,
                            trip_id: gtfs_trip_id.to_string(),
                            stop_id,
                        }
                    })?;
                    if let Some((previous_stop_id, previous_sequence)) = previous {
                        if p > 0 && self.directions[d].stop_ids[p - 1] == previous_stop_id {
                            split.push(self.split_trip_stop(
                                d,
                                previous_stop_id,
                                previous_sequence,
                            ));
                        }
                    }
                    (d, p)
                }
            };
            split.push(self.split_trip_stop(d, stop_id, gtfs_stop_sequence));
            current = Some((d, p));
            previous = Some((stop_id, gtfs_stop_sequence));
        }
        Ok(split)
    }

    // another direction first, one where the stop is not the terminus first
    fn switch_direction(&self, current: Option<(usize, usize)>, stop_id: i32) -> Option<(usize, usize)> {
        let current_direction = current.map(|(d, _)| d);
        let candidates: Vec<(usize, usize)> = self
            .directions
            .iter()
            .enumerate()
            .filter_map(|(d, spec)| spec.position(stop_id).map(|p| (d, p)))
            .collect();
        candidates
            .iter()
            .filter(|(d, _)| Some(*d) != current_direction)
            .min_by_key(|(d, p)| self.directions[*d].is_last(*p))
            .or_else(|| candidates.first())
            .copied()
    }

    fn split_trip_stop(&self, direction: usize, stop_id: i32, gtfs_stop_sequence: u32) -> SplitTripStop {
        SplitTripStop {
            trip_id: MTrip::id_of(self.route_id, self.directions[direction].headsign_id),
            stop_id,
            gtfs_stop_sequence,
        }
    }

    /// Order two stops of the trip `trip_id` by their position in its direction.
    ///
    /// `Ordering::Equal` when the trip or one of the stops is unknown.
    pub fn compare(&self, trip_id: i64, stop_id1: i32, stop_id2: i32) -> Ordering {
        match self.direction(trip_id) {
            Some(direction) => match (direction.position(stop_id1), direction.position(stop_id2)) {
                (Some(p1), Some(p2)) => p1.cmp(&p2),
                _ => Ordering::Equal,
            },
            None => Ordering::Equal,
        }
    }
}
