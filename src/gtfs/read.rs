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

use super::{Calendar, CalendarDate, Feed};
use crate::read_utils::{read_objects, read_opt_objects, FileHandler};
use crate::Result;
use anyhow::{bail, Context};
use typed_index_collection::CollectionWithId;

pub(super) fn read_feed<H>(file_handler: &mut H) -> Result<Feed>
where
    for<'a> &'a mut H: FileHandler,
{
    let agencies = read_opt_objects(file_handler, "agency.txt")?;
    let routes = CollectionWithId::new(read_objects(file_handler, "routes.txt")?)
        .context("invalid routes.txt")?;
    let trips = CollectionWithId::new(read_objects(file_handler, "trips.txt")?)
        .context("invalid trips.txt")?;
    let stops = CollectionWithId::new(read_objects(file_handler, "stops.txt")?)
        .context("invalid stops.txt")?;
    let stop_times = read_objects(file_handler, "stop_times.txt")?;
    let calendars: Vec<Calendar> = read_opt_objects(file_handler, "calendar.txt")?;
    let calendar_dates: Vec<CalendarDate> =
        read_opt_objects(file_handler, "calendar_dates.txt")?;
    if calendars.is_empty() && calendar_dates.is_empty() {
        bail!("calendar_dates.txt or calendar.txt not found");
    }
    Ok(Feed {
        agencies,
        routes,
        trips,
        stops,
        stop_times,
        calendars,
        calendar_dates,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objects::{ExceptionType, RouteType};
    use crate::read_utils::PathFileHandler;
    use crate::test_utils::*;
    use pretty_assertions::assert_eq;
    use std::path::Path;

    fn create_minimal_feed(path: &Path) {
        create_file_with_content(
            path,
            "routes.txt",
            "route_id,agency_id,route_short_name,route_long_name,route_type,route_color\n\
             r340,CITLR,340,Terminus Longueuil - Cégep,3,\n\
             rT51,CITLR,T-51,Brossard - Candiac,3,60497A",
        );
        create_file_with_content(
            path,
            "trips.txt",
            "route_id,service_id,trip_id,trip_headsign,direction_id\n\
             r340,SEM,t1,Cégep,0\n\
             rT51,SEM,t2,,",
        );
        create_file_with_content(
            path,
            "stops.txt",
            "stop_id,stop_code,stop_name,stop_lat,stop_lon\n\
             CAN123D,0,Face à la gare,45.4,-73.5\n\
             CAN124D,64402,Terminus Longueuil,45.5,-73.5",
        );
        create_file_with_content(
            path,
            "stop_times.txt",
            "trip_id,arrival_time,departure_time,stop_id,stop_sequence\n\
             t1,08:00:00,08:00:00,CAN124D,2\n\
             t1,07:55:00,07:55:00,CAN123D,1",
        );
    }

    #[test]
    fn read_feed_from_directory() {
        test_in_tmp_dir(|path| {
            create_minimal_feed(path);
            create_file_with_content(
                path,
                "calendar_dates.txt",
                "service_id,date,exception_type\nSEM,20240115,1\nSEM,20240116,2",
            );
            let mut file_handler = PathFileHandler::new(path.to_path_buf());
            let feed = read_feed(&mut file_handler).unwrap();

            assert!(feed.agencies.is_empty());
            assert_eq!(2, feed.routes.len());
            let route = feed.routes.get("r340").unwrap();
            assert_eq!("340", route.short_name);
            assert_eq!(RouteType::Bus, route.route_type);
            assert_eq!(None, route.color);
            assert_eq!(
                Some("60497A".to_string()),
                feed.routes.get("rT51").unwrap().color
            );

            let trip = feed.trips.get("t2").unwrap();
            assert_eq!("", trip.headsign);
            assert_eq!(0, trip.direction_id);

            assert_eq!(Some("0".to_string()), feed.stops.get("CAN123D").unwrap().code);
            assert!(feed.calendars.is_empty());
            assert_eq!(ExceptionType::Remove, feed.calendar_dates[1].exception_type);

            let stop_times = feed.stop_times_by_trip();
            let t1: Vec<&str> = stop_times["t1"].iter().map(|st| st.stop_id.as_str()).collect();
            assert_eq!(vec!["CAN123D", "CAN124D"], t1);
        });
    }

    #[test]
    fn feed_without_calendars_is_rejected() {
        test_in_tmp_dir(|path| {
            create_minimal_feed(path);
            let mut file_handler = PathFileHandler::new(path.to_path_buf());
            let err = read_feed(&mut file_handler).err().unwrap();
            assert_eq!(
                "calendar_dates.txt or calendar.txt not found",
                err.to_string()
            );
        });
    }

    #[test]
    fn duplicated_route_id_is_rejected() {
        test_in_tmp_dir(|path| {
            create_minimal_feed(path);
            create_file_with_content(
                path,
                "routes.txt",
                "route_id,route_short_name,route_long_name,route_type\n\
                 r1,11,A,3\n\
                 r1,21,B,3",
            );
            create_file_with_content(
                path,
                "calendar.txt",
                "service_id,monday,tuesday,wednesday,thursday,friday,saturday,sunday,start_date,end_date\n\
                 SEM,1,1,1,1,1,0,0,20240101,20240131",
            );
            let mut file_handler = PathFileHandler::new(path.to_path_buf());
            assert!(read_feed(&mut file_handler).is_err());
        });
    }
}
