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

//! Rules of the Le Richelain bus agency (CITLR).
//!
//! Feed: <https://exo.quebec/xdata/citlr/google_transit.zip>

use crate::{
    agency_tools::AgencyTools,
    clean_utils::{self, FROM_TO, SAINT, SAINT_REPLACEMENT},
    exporter::Configuration,
    gtfs::{Calendar, CalendarDate, Feed, Route, Stop, Trip},
    mt::{MRoute, MTrip},
    objects::RouteType,
    service_ids::{self, extract_useful_service_ids},
    split_utils::{RouteTripSpec, TripSpec},
    AgencyError, Result, StopIdIssue,
};
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::{HashMap, HashSet};
use tracing::debug;

const AGENCY_COLOR: &str = "1F1F1F";

/// Taxi routes "T-NN" get the id 20000 + NN
const TAXI_ROUTE_ID_OFFSET: i64 = 20_000;
const TAXI_PREFIX: &str = "T";

const STOP_ID_PREFIX: &str = "CAN";
const STOP_ID_PREFIX_OFFSET: i32 = 100_000;
const STOP_ID_SUFFIX: &str = "D";
const STOP_ID_SUFFIX_OFFSET: i32 = 4_000;

const ROUTE_25: i64 = 25;
const ROUTE_32: i64 = 32;
const ROUTE_T51: i64 = TAXI_ROUTE_ID_OFFSET + 51;
const ROUTE_340: i64 = 340;

lazy_static! {
    /// Colors of the routes the feed leaves without one, by GTFS short name
    static ref ROUTE_COLORS: HashMap<&'static str, &'static str> = [
        ("11", "FF7C80"),
        ("21", "B1A0C7"),
        ("22", "84582D"),
        ("23", "31869B"),
        ("28", "53A9FF"),
        ("29", "99CCFF"),
        ("31", "FFC000"),
        ("32", "C0504D"),
        ("33", "92D050"),
        ("38", "FF9933"),
        ("39", "FF9933"),
        ("121", "8064A2"),
        ("122", "C4BD97"),
        ("123", "4BACC6"),
        ("124", "C4BD97"),
        ("132", "963634"),
        ("133", "7EC234"),
        ("321", "4BACC6"),
        ("323", "8064A2"),
        ("340", "FF7C80"),
        ("341", "FF6569"),
        ("343", "FF6569"),
        ("T-11", "FF5050"),
        ("T-12", "8064A2"),
        ("T-22", "305496"),
        ("T-25", "1F497C"),
        ("T-27", "808080"),
        ("T-28", "366092"),
        ("T-35", "D0504D"),
        ("T-36", "F79646"),
        ("T-37", "FF9A00"),
        ("T-51", "60497A"),
    ]
    .iter()
    .cloned()
    .collect();

    static ref ALL_ROUTE_TRIPS: HashMap<i64, RouteTripSpec> = {
        let mut all_route_trips = HashMap::new();
        all_route_trips.insert(
            ROUTE_340,
            RouteTripSpec::new(
                ROUTE_340,
                vec![
                    TripSpec::new(
                        0,
                        "Cégep",
                        &[64402, 64118, 64120, 64124, 64130, 64136, 64140],
                    ),
                    TripSpec::new(
                        1,
                        "Terminus Longueuil",
                        &[64140, 64144, 64150, 64156, 64160, 64402],
                    ),
                ],
            ),
        );
        all_route_trips
    };

    static ref DIGITS: Regex = Regex::new(r"\d+").unwrap();
    static ref CLEAN_TAXI: Regex = Regex::new(r"(?i)T-(\d+)").unwrap();

    static ref DIRECTION: Regex = Regex::new(r"(?i)\bdirection\s+").unwrap();
    static ref SECTEUR: Regex = Regex::new(r"(?i)\bsecteurs?\s+").unwrap();
    static ref SERVICE: Regex = Regex::new(r"(?i)\bservice\s+([ap]m)\b").unwrap();
    static ref STATIONNEMENT_INCITATIF: Regex =
        clean_utils::clean_words(&["stationnement incitatif"]);
    static ref STATIONNEMENT_INCITATIF_REPLACEMENT: String =
        clean_utils::clean_words_replacement("Stat Incitatif");
    static ref SPACED_DASH: Regex = Regex::new(r"\s+-\s+").unwrap();
    static ref EXPRESS: Regex = clean_utils::clean_words(&["express"]);
    static ref EXPRESS_REPLACEMENT: String = clean_utils::clean_words_replacement("");

    static ref START_WITH_FACES: Regex =
        Regex::new(r"(?i)^(devant|face\s+à|face\s+au|face)\s+").unwrap();
    static ref SPACE_FACES: Regex =
        Regex::new(r"(?i)\s+(devant|face\s+à|face\s+au|face)\s+").unwrap();
    static ref AVENUE: Regex = Regex::new(r"(?i)(\s)avenue(\W|$)").unwrap();
    static ref AVENUE_REPLACEMENT: String = "${1}av.${2}".to_string();
}

/// Rules of the Le Richelain bus agency
#[derive(Debug, Default)]
pub struct LeRichelainBusAgencyTools {
    // computed by `start`, None when the services are not filtered
    service_ids: Option<HashSet<String>>,
}

impl LeRichelainBusAgencyTools {
    #[allow(missing_docs)]
    pub fn new() -> Self {
        Self::default()
    }

    fn unexpected_headsign(route: &MRoute, trip: &Trip) -> anyhow::Error {
        AgencyError::UnexpectedTripHeadsign {
            route_id: route.id,
            trip_id: trip.id.clone(),
            headsign: trip.headsign.clone(),
        }
        .into()
    }
}

fn is_digits_only(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_digit())
}

fn headsigns_within(expected: &[&str], trip: &MTrip, trip_to_merge: &MTrip) -> bool {
    expected.contains(&trip.headsign_value.as_str())
        && expected.contains(&trip_to_merge.headsign_value.as_str())
}

impl AgencyTools for LeRichelainBusAgencyTools {
    fn agency_name(&self) -> &str {
        "CITLR bus"
    }

    fn agency_color(&self) -> &str {
        AGENCY_COLOR
    }

    fn agency_route_type(&self) -> RouteType {
        RouteType::Bus
    }

    fn start(&mut self, feed: &Feed, configuration: &Configuration) -> Result<()> {
        if configuration.filter_useless_services {
            let service_ids = extract_useful_service_ids(feed, &*self, configuration.reference_date);
            self.service_ids = Some(service_ids);
        }
        Ok(())
    }

    fn excluding_all(&self) -> bool {
        self.service_ids
            .as_ref()
            .map(HashSet::is_empty)
            .unwrap_or(false)
    }

    fn exclude_calendar(&self, calendar: &Calendar) -> bool {
        match &self.service_ids {
            Some(service_ids) => service_ids::exclude_useless_calendar(calendar, service_ids),
            None => false,
        }
    }

    fn exclude_calendar_date(&self, calendar_date: &CalendarDate) -> bool {
        match &self.service_ids {
            Some(service_ids) => {
                service_ids::exclude_useless_calendar_date(calendar_date, service_ids)
            }
            None => false,
        }
    }

    fn exclude_trip(&self, trip: &Trip) -> bool {
        match &self.service_ids {
            Some(service_ids) => service_ids::exclude_useless_trip(trip, service_ids),
            None => false,
        }
    }

    fn route_id(&self, route: &Route) -> Result<i64> {
        let short_name = route.short_name.as_str();
        let route_id = if is_digits_only(short_name) {
            short_name.parse::<i64>().ok()
        } else if short_name.starts_with(TAXI_PREFIX) {
            DIGITS
                .find(short_name)
                .and_then(|digits| digits.as_str().parse::<i64>().ok())
                .and_then(|digits| digits.checked_add(TAXI_ROUTE_ID_OFFSET))
        } else {
            None
        };
        route_id
            .filter(|route_id| *route_id <= MTrip::MAX_ROUTE_ID)
            .ok_or_else(|| {
                AgencyError::UnexpectedRouteId {
                    short_name: short_name.to_string(),
                }
                .into()
            })
    }

    fn route_short_name(&self, route: &Route) -> String {
        CLEAN_TAXI.replace_all(&route.short_name, "T$1").into_owned()
    }

    fn route_long_name(&self, route: &Route) -> String {
        let long_name = SAINT.replace_all(&route.long_name, SAINT_REPLACEMENT.as_str());
        clean_utils::clean_label(&long_name)
    }

    fn route_color(&self, route: &Route) -> Result<Option<String>> {
        if let Some(color) = &route.color {
            return Ok(Some(color.clone()));
        }
        match ROUTE_COLORS.get(route.short_name.as_str()) {
            Some(color) => Ok(Some(color.to_string())),
            None => Err(AgencyError::UnexpectedRouteColor {
                short_name: route.short_name.clone(),
            }
            .into()),
        }
    }

    fn trip_headsign(&self, route: &MRoute, trip: &Trip) -> Result<MTrip> {
        match route.id {
            // same direction_id for both directions
            ROUTE_25 => {
                let headsign_id = match (trip.direction_id, trip.headsign.as_str()) {
                    (0, "Vers Symbiocité") => 0,
                    (0, "Vers Stationnement incitatif La Prairie") => 1,
                    _ => return Err(Self::unexpected_headsign(route, trip)),
                };
                Ok(MTrip::new(
                    route.id,
                    self.clean_trip_headsign(&trip.headsign),
                    headsign_id,
                ))
            }
            ROUTE_32 => {
                if trip.headsign.contains("AM") {
                    Ok(MTrip::new(route.id, "AM".to_string(), 0))
                } else if trip.headsign.contains("PM") {
                    Ok(MTrip::new(route.id, "PM".to_string(), 1))
                } else {
                    Err(Self::unexpected_headsign(route, trip))
                }
            }
            _ => Ok(MTrip::new(
                route.id,
                self.clean_trip_headsign(&trip.headsign),
                i32::from(trip.direction_id),
            )),
        }
    }

    fn clean_trip_headsign(&self, headsign: &str) -> String {
        let headsign = clean_utils::keep_to_fr(headsign);
        let headsign = DIRECTION.replace_all(&headsign, "");
        let headsign = STATIONNEMENT_INCITATIF
            .replace_all(&headsign, STATIONNEMENT_INCITATIF_REPLACEMENT.as_str());
        let headsign = SECTEUR.replace_all(&headsign, "");
        let headsign = SERVICE.replace_all(&headsign, "$1");
        let headsign = SPACED_DASH.replace_all(&headsign, FROM_TO);
        let headsign = EXPRESS.replace_all(&headsign, EXPRESS_REPLACEMENT.as_str());
        let headsign = clean_utils::clean_street_types_fr_ca(&headsign);
        let headsign = clean_utils::clean_label_fr(&headsign);
        clean_utils::clean_bounds(&headsign)
    }

    fn merge_headsign(&self, trip: &mut MTrip, trip_to_merge: &MTrip) -> Result<bool> {
        let merged = match trip.route_id {
            ROUTE_T51 if headsigns_within(&["Candiac", "Brossard"], trip, trip_to_merge) => {
                Some("Brossard")
            }
            ROUTE_340
                if headsigns_within(
                    &["Terminus Longueuil", "Prairie", "Prairie / Candiac", "Cégep"],
                    trip,
                    trip_to_merge,
                ) =>
            {
                Some("Cégep")
            }
            _ => None,
        };
        match merged {
            Some(headsign) => {
                debug!(
                    "{}: merged '{}' & '{}' into '{}'",
                    trip.route_id, trip.headsign_value, trip_to_merge.headsign_value, headsign
                );
                let headsign_id = trip.headsign_id;
                trip.set_headsign(headsign.to_string(), headsign_id);
                Ok(true)
            }
            None => Err(AgencyError::UnexpectedHeadsignMerge {
                route_id: trip.route_id,
                headsign: trip.headsign_value.clone(),
                headsign_to_merge: trip_to_merge.headsign_value.clone(),
            }
            .into()),
        }
    }

    fn stop_code(&self, stop: &Stop) -> Option<String> {
        stop.code
            .as_deref()
            .map(str::trim)
            .filter(|code| !code.is_empty() && *code != "0")
            .map(str::to_string)
    }

    fn stop_id(&self, stop: &Stop) -> Result<i32> {
        let unexpected = |issue| AgencyError::UnexpectedStopId {
            stop_id: stop.id.clone(),
            issue,
        };
        if let Some(code) = self.stop_code(stop).filter(|code| is_digits_only(code)) {
            return code
                .parse()
                .map_err(|_| unexpected(StopIdIssue::OutOfRange).into());
        }
        let digits = DIGITS
            .find(&stop.id)
            .ok_or_else(|| unexpected(StopIdIssue::MissingDigits))?;
        let digits: i32 = digits
            .as_str()
            .parse()
            .map_err(|_| unexpected(StopIdIssue::OutOfRange))?;
        if !stop.id.starts_with(STOP_ID_PREFIX) {
            return Err(unexpected(StopIdIssue::UnknownPrefix).into());
        }
        if !stop.id.ends_with(STOP_ID_SUFFIX) {
            return Err(unexpected(StopIdIssue::UnknownSuffix).into());
        }
        digits
            .checked_add(STOP_ID_PREFIX_OFFSET + STOP_ID_SUFFIX_OFFSET)
            .ok_or_else(|| unexpected(StopIdIssue::OutOfRange).into())
    }

    fn clean_stop_name(&self, name: &str) -> String {
        let name = STATIONNEMENT_INCITATIF
            .replace_all(name, STATIONNEMENT_INCITATIF_REPLACEMENT.as_str());
        let name = START_WITH_FACES.replace(&name, "");
        let name = SPACE_FACES.replace_all(&name, " ");
        let name = SPACED_DASH.replace_all(&name, " ");
        let name = AVENUE.replace_all(&name, AVENUE_REPLACEMENT.as_str());
        let name = clean_utils::clean_bounds(&name);
        let name = clean_utils::clean_street_types_fr_ca(&name);
        clean_utils::clean_label_fr(&name)
    }

    fn route_trip_spec(&self, route_id: i64) -> Option<&RouteTripSpec> {
        ALL_ROUTE_TRIPS.get(&route_id)
    }
}
