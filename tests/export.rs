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

use chrono::NaiveDate;
use citlr_bus::{
    exporter::{self, Configuration},
    test_utils::*,
    AgencyError, LeRichelainBusAgencyTools,
};
use pretty_assertions::assert_eq;
use std::fs;
use std::path::Path;

const FIXTURE: &str = "tests/fixtures/citlr";
const GTFS_FILES: [&str; 7] = [
    "agency.txt",
    "routes.txt",
    "trips.txt",
    "stops.txt",
    "stop_times.txt",
    "calendar.txt",
    "calendar_dates.txt",
];

fn configuration(files_prefix: &str, year: i32, month: u32, day: u32) -> Configuration {
    Configuration {
        files_prefix: files_prefix.to_string(),
        reference_date: NaiveDate::from_ymd_opt(year, month, day),
        ..Default::default()
    }
}

fn export(input: &Path, output: &Path, configuration: &Configuration) -> citlr_bus::Result<()> {
    let mut agency = LeRichelainBusAgencyTools::new();
    exporter::export(&mut agency, input, output, configuration)
}

fn assert_exported(output: &Path, prefix: &str) {
    let file = |name: &str| output.join(format!("{}{}", prefix, name));
    assert_file_lines(file("agency.txt"), &["id,color,route_type", "CITLR,1F1F1F,3"]);
    assert_file_lines(
        file("routes.txt"),
        &[
            "id,short_name,long_name,color",
            "25,25,Symbiocité - Stationnement incitatif La Prairie,D0504D",
            "340,340,Terminus Longueuil - Cégep,FF7C80",
            "20051,T51,Brossard - Candiac,60497A",
        ],
    );
    assert_file_lines(
        file("trips.txt"),
        &[
            "id,route_id,headsign_value,headsign_id",
            "2500,25,Symbiocité,0",
            "2501,25,Stat Incitatif La Prairie,1",
            "34000,340,Cégep,0",
            "34001,340,Terminus Longueuil,1",
            "2005100,20051,Brossard,0",
        ],
    );
    assert_file_lines(
        file("stops.txt"),
        &[
            "id,code,name,lat,lon",
            "64118,64118,La gare av. des Pins,45.511,-73.502",
            "64120,64120,Boul. Taschereau Saint-Charles,45.502,-73.491",
            "64124,64124,Ch. de Saint-Jean,45.493,-73.482",
            "64130,64130,Rue Principale,45.484,-73.473",
            "64136,64136,Le Parc,45.475,-73.464",
            "64140,64140,Cégep,45.466,-73.455",
            "64144,64144,Rue Sainte-Rose,45.477,-73.466",
            "64150,64150,Stat Incitatif La Prairie,45.488,-73.477",
            "64156,64156,Rue Notre-Dame,45.499,-73.488",
            "64160,64160,Boul. Marie-Victorin,45.51,-73.499",
            "64402,64402,Terminus Longueuil,45.525,-73.521",
            "104201,,Symbiocité,45.401,-73.511",
            "104202,,Rue Saint-Pierre,45.412,-73.522",
            "104301,,Gare Candiac,45.381,-73.517",
            "104302,,Terminus Brossard,45.451,-73.463",
        ],
    );
    assert_file_lines(
        file("trip_stops.txt"),
        &[
            "trip_id,stop_id,stop_sequence",
            "2500,104202,1",
            "2500,104201,2",
            "2501,104201,1",
            "2501,104202,2",
            "34000,64402,1",
            "34000,64118,2",
            "34000,64120,3",
            "34000,64124,4",
            "34000,64130,5",
            "34000,64136,6",
            "34000,64140,7",
            "34001,64140,1",
            "34001,64144,2",
            "34001,64150,3",
            "34001,64156,4",
            "34001,64160,5",
            "34001,64402,6",
            "2005100,104302,1",
            "2005100,104301,2",
        ],
    );
    let service_dates = get_file_content(file("service_dates.txt"));
    let service_dates: Vec<&str> = service_dates.lines().collect();
    // weekdays of January 2024, without the 1st
    assert_eq!(23, service_dates.len());
    assert_eq!("service_id,date", service_dates[0]);
    assert_eq!("SEM,20240102", service_dates[1]);
    assert_eq!("SEM,20240131", service_dates[22]);
}

#[test]
fn export_directory() {
    test_in_tmp_dir(|path| {
        let output = path.join("output");
        export(
            Path::new(FIXTURE),
            &output,
            &configuration("ca_le_richelain_citlr_bus_", 2024, 1, 15),
        )
        .unwrap();
        assert_exported(&output, "ca_le_richelain_citlr_bus_");
    });
}

#[test]
fn export_zip() {
    test_in_tmp_dir(|path| {
        let contents: Vec<(&str, String)> = GTFS_FILES
            .iter()
            .map(|file| (*file, get_file_content(Path::new(FIXTURE).join(file))))
            .collect();
        let files: Vec<(&str, &str)> = contents
            .iter()
            .map(|(file, content)| (*file, content.as_str()))
            .collect();
        let zip_path = path.join("gtfs.zip");
        create_zip_with_content(&zip_path, &files);

        let output = path.join("output");
        export(&zip_path, &output, &configuration("", 2024, 1, 15)).unwrap();
        assert_exported(&output, "");
    });
}

#[test]
fn nothing_exported_once_every_service_ended() {
    test_in_tmp_dir(|path| {
        let output = path.join("output");
        export(Path::new(FIXTURE), &output, &configuration("", 2024, 2, 1)).unwrap();
        assert!(!output.exists());
    });
}

#[test]
fn past_services_kept_without_filter() {
    test_in_tmp_dir(|path| {
        let output = path.join("output");
        let configuration = Configuration {
            filter_useless_services: false,
            ..configuration("", 2024, 2, 1)
        };
        export(Path::new(FIXTURE), &output, &configuration).unwrap();
        let routes = get_file_content(output.join("routes.txt"));
        assert!(routes.contains("121,121,St-Constant,8064A2"));
    });
}

#[test]
fn unexpected_route_aborts_export() {
    test_in_tmp_dir(|path| {
        let input = path.join("input");
        fs::create_dir(&input).unwrap();
        for file in GTFS_FILES.iter() {
            fs::copy(Path::new(FIXTURE).join(file), input.join(file)).unwrap();
        }
        create_file_with_content(
            &input,
            "routes.txt",
            "route_id,agency_id,route_short_name,route_long_name,route_type,route_color\n\
             r25,CITLR,25,Symbiocité,3,D0504D\n\
             r340,CITLR,340,Terminus Longueuil - Cégep,3,\n\
             rT51,CITLR,X-51,Brossard - Candiac,3,\n\
             r121,CITLR,121,Saint-Constant,3,",
        );
        let output = path.join("output");
        let err = export(&input, &output, &configuration("", 2024, 1, 15)).unwrap_err();
        assert_eq!(
            Some(&AgencyError::UnexpectedRouteId {
                short_name: "X-51".to_string()
            }),
            err.downcast_ref::<AgencyError>()
        );
        assert!(!output.exists());
    });
}
