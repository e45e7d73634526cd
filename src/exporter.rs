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

//! Render a GTFS feed into MTransit files with the rules of an agency.

use crate::{
    agency_tools::AgencyTools,
    gtfs::{self, Feed, Stop, Trip},
    mt::{self, MAgency, MRoute, MServiceDate, MSpec, MStop, MTrip, MTripStop},
    objects::Date,
    serde_utils::de_option_date_string,
    service_ids::service_dates,
    AgencyError, Result,
};
use anyhow::{anyhow, Context};
use serde::Deserialize;
use std::cmp::Reverse;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Settings of an export
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Configuration {
    /// Prepended to every written file name
    pub files_prefix: String,
    /// Services without any date from this one on are left out (`YYYYMMDD`)
    #[serde(deserialize_with = "de_option_date_string")]
    pub reference_date: Option<Date>,
    /// Leave out the trips and calendars of the services no longer running
    pub filter_useless_services: bool,
}

impl Default for Configuration {
    fn default() -> Self {
        Configuration {
            files_prefix: String::new(),
            reference_date: None,
            filter_useless_services: true,
        }
    }
}

/// Read the GTFS at `input`, apply the rules of `agency` and write the
/// MTransit files into `output`.
///
/// Nothing is written when the agency excludes everything.
pub fn export<A, P, Q>(
    agency: &mut A,
    input: P,
    output: Q,
    configuration: &Configuration,
) -> Result<()>
where
    A: AgencyTools + ?Sized,
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let start = Instant::now();
    info!("Generating {} data...", agency.agency_name());
    let feed = gtfs::read(input)?;
    agency.start(&feed, configuration)?;
    if agency.excluding_all() {
        warn!(
            "Excluding all data for {}, nothing written",
            agency.agency_name()
        );
        return Ok(());
    }
    let spec = build_spec(&*agency, &feed)?;
    mt::write(&spec, output, &configuration.files_prefix)?;
    info!(
        "Generating {} data... DONE in {:.2?}",
        agency.agency_name(),
        start.elapsed()
    );
    Ok(())
}

/// Stop ids of one GTFS trip, by MTransit trip
type TripStopLists = BTreeMap<i64, Vec<Vec<i32>>>;

/// Apply the rules of `agency` to `feed`.
///
/// [`AgencyTools::start`] must have been called with this feed.
pub fn build_spec<A>(agency: &A, feed: &Feed) -> Result<MSpec>
where
    A: AgencyTools + ?Sized,
{
    let trips: Vec<&Trip> = feed
        .trips
        .values()
        .filter(|trip| !agency.exclude_trip(trip))
        .filter(|trip| {
            feed.routes
                .get(&trip.route_id)
                .map(|route| !agency.exclude_route(route))
                .unwrap_or_else(|| {
                    warn!("route {} of trip {} not found", trip.route_id, trip.id);
                    false
                })
        })
        .collect();
    let routes_with_trips: HashSet<&str> = trips.iter().map(|t| t.route_id.as_str()).collect();

    let mut m_routes: BTreeMap<i64, MRoute> = BTreeMap::new();
    let mut route_ids: HashMap<&str, i64> = HashMap::new();
    for route in feed.routes.values() {
        if !routes_with_trips.contains(route.id.as_str()) {
            continue;
        }
        let route_id = agency.route_id(route)?;
        if !(0..=MTrip::MAX_ROUTE_ID).contains(&route_id) {
            return Err(AgencyError::UnexpectedRouteId {
                short_name: route.short_name.clone(),
            }
            .into());
        }
        route_ids.insert(route.id.as_str(), route_id);
        if m_routes.contains_key(&route_id) {
            debug!("route {} already rendered as {}", route.id, route_id);
            continue;
        }
        m_routes.insert(
            route_id,
            MRoute {
                id: route_id,
                short_name: agency.route_short_name(route),
                long_name: agency.route_long_name(route),
                color: agency.route_color(route)?,
            },
        );
    }

    let stop_times_by_trip = feed.stop_times_by_trip();
    let mut stop_ids: HashMap<&str, i32> = HashMap::new();
    let mut m_stops: BTreeMap<i32, MStop> = BTreeMap::new();
    let mut m_trips: BTreeMap<i64, MTrip> = BTreeMap::new();
    let mut trip_stop_lists = TripStopLists::new();
    let mut service_ids: HashSet<&str> = HashSet::new();
    for trip in trips {
        let stop_times = match stop_times_by_trip.get(trip.id.as_str()) {
            Some(stop_times) => stop_times,
            None => {
                warn!("trip {} has no stop time", trip.id);
                continue;
            }
        };
        let m_route = route_ids
            .get(trip.route_id.as_str())
            .and_then(|route_id| m_routes.get(route_id))
            .ok_or_else(|| anyhow!("route {} of trip {} not rendered", trip.route_id, trip.id))?;

        let mut stops = Vec::with_capacity(stop_times.len());
        for stop_time in stop_times {
            let stop_id = match stop_ids.get(stop_time.stop_id.as_str()) {
                Some(stop_id) => *stop_id,
                None => {
                    let stop = feed.stops.get(&stop_time.stop_id).ok_or_else(|| {
                        anyhow!("stop {} of trip {} not found", stop_time.stop_id, trip.id)
                    })?;
                    let stop_id = agency.stop_id(stop)?;
                    stop_ids.insert(stop.id.as_str(), stop_id);
                    m_stops
                        .entry(stop_id)
                        .or_insert_with(|| m_stop(agency, stop, stop_id));
                    stop_id
                }
            };
            stops.push((stop_id, stop_time.stop_sequence));
        }

        let lists: BTreeMap<i64, Vec<i32>> = match agency.split_trip(m_route, trip) {
            Some(split_trips) => {
                for split_trip in split_trips {
                    m_trips.entry(split_trip.id).or_insert(split_trip);
                }
                let split = agency
                    .split_trip_stops(m_route, trip, &stops)
                    .with_context(|| format!("Error splitting trip {}", trip.id))?;
                let mut lists: BTreeMap<i64, Vec<i32>> = BTreeMap::new();
                for split_trip_stop in split {
                    lists
                        .entry(split_trip_stop.trip_id)
                        .or_default()
                        .push(split_trip_stop.stop_id);
                }
                lists
            }
            None => {
                let m_trip = agency.trip_headsign(m_route, trip)?;
                let trip_id = m_trip.id;
                add_trip(agency, &mut m_trips, m_trip)?;
                let list = stops.iter().map(|&(stop_id, _)| stop_id).collect();
                std::iter::once((trip_id, list)).collect()
            }
        };
        for (trip_id, list) in lists {
            trip_stop_lists.entry(trip_id).or_default().push(list);
        }
        service_ids.insert(trip.service_id.as_str());
    }

    let mut trip_stops = Vec::new();
    for (trip_id, lists) in trip_stop_lists {
        let m_trip = m_trips
            .get(&trip_id)
            .ok_or_else(|| anyhow!("stops assigned to unknown trip {}", trip_id))?;
        let mut stop_ids = merge_stop_lists(lists);
        stop_ids.sort_by(|a, b| agency.compare_early(m_trip.route_id, trip_id, *a, *b));
        trip_stops.extend(stop_ids.into_iter().zip(1..).map(|(stop_id, stop_sequence)| {
            MTripStop {
                trip_id,
                stop_id,
                stop_sequence,
            }
        }));
    }

    let dates = service_dates(
        feed.calendars
            .iter()
            .filter(|calendar| !agency.exclude_calendar(calendar)),
        feed.calendar_dates
            .iter()
            .filter(|calendar_date| !agency.exclude_calendar_date(calendar_date)),
    );
    let service_dates = dates
        .into_iter()
        .filter(|(service_id, _)| service_ids.contains(service_id.as_str()))
        .flat_map(|(service_id, dates): (String, BTreeSet<Date>)| {
            dates.into_iter().map(move |date| MServiceDate {
                service_id: service_id.clone(),
                date,
            })
        })
        .collect();

    let agency_id = feed
        .agencies
        .first()
        .and_then(|a| a.id.clone())
        .unwrap_or_default();
    Ok(MSpec {
        agency: Some(MAgency {
            id: agency_id,
            color: agency.agency_color().to_string(),
            route_type: agency.agency_route_type(),
        }),
        routes: m_routes.into_iter().map(|(_, r)| r).collect(),
        trips: m_trips.into_iter().map(|(_, t)| t).collect(),
        stops: m_stops.into_iter().map(|(_, s)| s).collect(),
        trip_stops,
        service_dates,
    })
}

fn m_stop<A: AgencyTools + ?Sized>(agency: &A, stop: &Stop, stop_id: i32) -> MStop {
    MStop {
        id: stop_id,
        code: agency.stop_code(stop).unwrap_or_default(),
        name: agency.clean_stop_name(&stop.name),
        lat: stop.lat,
        lon: stop.lon,
    }
}

fn add_trip<A: AgencyTools + ?Sized>(
    agency: &A,
    m_trips: &mut BTreeMap<i64, MTrip>,
    m_trip: MTrip,
) -> Result<()> {
    match m_trips.get_mut(&m_trip.id) {
        Some(existing) if existing.headsign_value != m_trip.headsign_value => {
            if !agency.merge_headsign(existing, &m_trip)? {
                return Err(AgencyError::UnexpectedHeadsignMerge {
                    route_id: existing.route_id,
                    headsign: existing.headsign_value.clone(),
                    headsign_to_merge: m_trip.headsign_value,
                }
                .into());
            }
        }
        Some(_) => {}
        None => {
            m_trips.insert(m_trip.id, m_trip);
        }
    }
    Ok(())
}

/// Merge the stop lists of several GTFS trips of the same direction.
///
/// Starts from the longest list; a stop missing from the result is inserted
/// right after the stop preceding it in its own list.
fn merge_stop_lists(mut lists: Vec<Vec<i32>>) -> Vec<i32> {
    lists.sort_by_key(|list| Reverse(list.len()));
    let mut lists = lists.into_iter();
    let mut merged = match lists.next() {
        Some(longest) => longest,
        None => return Vec::new(),
    };
    for list in lists {
        let mut previous: Option<usize> = None;
        for stop_id in list {
            let position = match merged.iter().position(|&id| id == stop_id) {
                Some(position) => position,
                None => {
                    let position = previous.map(|p| p + 1).unwrap_or(0);
                    merged.insert(position, stop_id);
                    position
                }
            };
            previous = Some(position);
        }
    }
    merged
}
