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

//! Services still running, used to leave out the trips and calendars of
//! past services.

use crate::{
    agency_tools::AgencyTools,
    gtfs::{Calendar, CalendarDate, Feed, Trip},
    objects::{Date, ExceptionType},
};
use std::collections::{BTreeMap, BTreeSet, HashSet};
use tracing::{debug, info};

/// Active dates of every service, calendar weekdays plus added dates minus
/// removed dates
pub fn service_dates<'a, C, D>(calendars: C, calendar_dates: D) -> BTreeMap<String, BTreeSet<Date>>
where
    C: IntoIterator<Item = &'a Calendar>,
    D: IntoIterator<Item = &'a CalendarDate>,
{
    let mut dates: BTreeMap<String, BTreeSet<Date>> = BTreeMap::new();
    for calendar in calendars {
        dates
            .entry(calendar.service_id.clone())
            .or_default()
            .extend(calendar.get_valid_dates());
    }
    // removals come after every addition, whatever the file order
    let calendar_dates: Vec<&CalendarDate> = calendar_dates.into_iter().collect();
    for calendar_date in &calendar_dates {
        if calendar_date.exception_type == ExceptionType::Add {
            dates
                .entry(calendar_date.service_id.clone())
                .or_default()
                .insert(calendar_date.date);
        }
    }
    for calendar_date in &calendar_dates {
        if calendar_date.exception_type == ExceptionType::Remove {
            if let Some(service_dates) = dates.get_mut(&calendar_date.service_id) {
                service_dates.remove(&calendar_date.date);
            }
        }
    }
    dates
}

/// Service ids used by a trip of a kept route, with a date on or after
/// `reference_date` (any date when absent)
pub fn extract_useful_service_ids<A>(
    feed: &Feed,
    agency: &A,
    reference_date: Option<Date>,
) -> HashSet<String>
where
    A: AgencyTools + ?Sized,
{
    let referenced: HashSet<&str> = feed
        .trips
        .values()
        .filter(|trip| {
            feed.routes
                .get(&trip.route_id)
                .map(|route| !agency.exclude_route(route))
                .unwrap_or(false)
        })
        .map(|trip| trip.service_id.as_str())
        .collect();
    let service_ids: HashSet<String> = service_dates(&feed.calendars, &feed.calendar_dates)
        .into_iter()
        .filter(|(service_id, _)| referenced.contains(service_id.as_str()))
        .filter(|(service_id, dates)| {
            let useful = match reference_date {
                Some(reference_date) => dates.range(reference_date..).next().is_some(),
                None => !dates.is_empty(),
            };
            if !useful {
                debug!(%service_id, "Service without date left");
            }
            useful
        })
        .map(|(service_id, _)| service_id)
        .collect();
    info!(
        "{} useful service ids out of {} referenced",
        service_ids.len(),
        referenced.len()
    );
    service_ids
}

#[allow(missing_docs)]
pub fn exclude_useless_calendar(calendar: &Calendar, service_ids: &HashSet<String>) -> bool {
    !service_ids.contains(&calendar.service_id)
}

#[allow(missing_docs)]
pub fn exclude_useless_calendar_date(
    calendar_date: &CalendarDate,
    service_ids: &HashSet<String>,
) -> bool {
    !service_ids.contains(&calendar_date.service_id)
}

#[allow(missing_docs)]
pub fn exclude_useless_trip(trip: &Trip, service_ids: &HashSet<String>) -> bool {
    !service_ids.contains(&trip.service_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gtfs::Route;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use typed_index_collection::CollectionWithId;

    struct NoRule;

    impl AgencyTools for NoRule {
        fn agency_name(&self) -> &str {
            "test"
        }

        fn agency_color(&self) -> &str {
            "000000"
        }
    }

    struct No99;

    impl AgencyTools for No99 {
        fn agency_name(&self) -> &str {
            "test"
        }

        fn agency_color(&self) -> &str {
            "000000"
        }

        fn exclude_route(&self, route: &Route) -> bool {
            route.id == "99"
        }
    }

    fn date(day: u32) -> Date {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    fn calendar(service_id: &str, start: u32, end: u32) -> Calendar {
        Calendar {
            service_id: service_id.to_string(),
            monday: true,
            tuesday: true,
            wednesday: true,
            thursday: true,
            friday: true,
            saturday: false,
            sunday: false,
            start_date: date(start),
            end_date: date(end),
        }
    }

    fn calendar_date(service_id: &str, day: u32, exception_type: ExceptionType) -> CalendarDate {
        CalendarDate {
            service_id: service_id.to_string(),
            date: date(day),
            exception_type,
        }
    }

    fn trip(id: &str, route_id: &str, service_id: &str) -> Trip {
        Trip {
            id: id.to_string(),
            route_id: route_id.to_string(),
            service_id: service_id.to_string(),
            ..Default::default()
        }
    }

    fn route(id: &str) -> Route {
        Route {
            id: id.to_string(),
            ..Default::default()
        }
    }

    fn feed() -> Feed {
        Feed {
            routes: CollectionWithId::new(vec![route("25"), route("99")]).unwrap(),
            trips: CollectionWithId::new(vec![
                trip("t1", "25", "OLD"),
                trip("t2", "25", "SEM"),
                trip("t3", "99", "SAM"),
                trip("t4", "25", "FERIE"),
            ])
            .unwrap(),
            calendars: vec![calendar("OLD", 1, 5), calendar("SEM", 1, 31)],
            calendar_dates: vec![
                calendar_date("SAM", 20, ExceptionType::Add),
                calendar_date("FERIE", 22, ExceptionType::Add),
                calendar_date("FERIE", 22, ExceptionType::Remove),
                calendar_date("UNUSED", 22, ExceptionType::Add),
            ],
            ..Default::default()
        }
    }

    #[test]
    fn dates_of_services() {
        let feed = feed();
        let dates = service_dates(&feed.calendars, &feed.calendar_dates);
        // 2024-01-01 is a monday
        assert_eq!(
            vec![date(1), date(2), date(3), date(4), date(5)],
            dates["OLD"].iter().cloned().collect::<Vec<_>>()
        );
        assert_eq!(23, dates["SEM"].len());
        assert!(dates["FERIE"].is_empty());
        assert_eq!(1, dates["SAM"].len());
    }

    #[test]
    fn removed_date_before_added_one_is_still_removed() {
        let dates = service_dates(
            &Vec::<Calendar>::new(),
            &[
                calendar_date("FERIE", 22, ExceptionType::Remove),
                calendar_date("FERIE", 22, ExceptionType::Add),
            ],
        );
        assert!(dates["FERIE"].is_empty());
    }

    #[test]
    fn only_running_services_are_useful() {
        let service_ids = extract_useful_service_ids(&feed(), &No99, Some(date(15)));
        let expected: HashSet<String> = vec!["SEM".to_string()].into_iter().collect();
        assert_eq!(expected, service_ids);
    }

    #[test]
    fn without_reference_date_every_dated_service_is_useful() {
        let service_ids = extract_useful_service_ids(&feed(), &NoRule, None);
        let mut service_ids: Vec<String> = service_ids.into_iter().collect();
        service_ids.sort();
        assert_eq!(vec!["OLD", "SAM", "SEM"], service_ids);
    }

    #[test]
    fn useless_records_are_excluded() {
        let service_ids: HashSet<String> = vec!["SEM".to_string()].into_iter().collect();
        assert!(exclude_useless_calendar(&calendar("OLD", 1, 5), &service_ids));
        assert!(!exclude_useless_calendar(&calendar("SEM", 1, 5), &service_ids));
        assert!(exclude_useless_calendar_date(
            &calendar_date("SAM", 20, ExceptionType::Add),
            &service_ids
        ));
        assert!(!exclude_useless_trip(&trip("t2", "25", "SEM"), &service_ids));
        assert!(exclude_useless_trip(&trip("t1", "25", "OLD"), &service_ids));
    }
}
