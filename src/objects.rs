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

//! Objects shared by the GTFS input and the MTransit output.

use serde::{Deserialize, Serialize};

/// A calendar day
pub type Date = chrono::NaiveDate;

/// Is a calendar date an addition or a removal of service
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum ExceptionType {
    /// Service added on this date
    #[serde(rename = "1")]
    Add,
    /// Service removed on this date
    #[serde(rename = "2")]
    Remove,
}

/// GTFS route_type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RouteType {
    #[allow(missing_docs)]
    LightRail,
    #[allow(missing_docs)]
    Metro,
    #[allow(missing_docs)]
    Rail,
    #[allow(missing_docs)]
    Bus,
    #[allow(missing_docs)]
    Ferry,
    #[allow(missing_docs)]
    CableCar,
    #[allow(missing_docs)]
    Gondola,
    #[allow(missing_docs)]
    Funicular,
    /// Any extended route type
    Other(u16),
}

impl RouteType {
    /// The numeric value written in GTFS and MTransit files
    pub fn to_gtfs_value(self) -> u16 {
        match self {
            RouteType::LightRail => 0,
            RouteType::Metro => 1,
            RouteType::Rail => 2,
            RouteType::Bus => 3,
            RouteType::Ferry => 4,
            RouteType::CableCar => 5,
            RouteType::Gondola => 6,
            RouteType::Funicular => 7,
            RouteType::Other(i) => i,
        }
    }
}

impl From<u16> for RouteType {
    fn from(i: u16) -> Self {
        match i {
            0 => RouteType::LightRail,
            1 => RouteType::Metro,
            2 => RouteType::Rail,
            3 => RouteType::Bus,
            4 => RouteType::Ferry,
            5 => RouteType::CableCar,
            6 => RouteType::Gondola,
            7 => RouteType::Funicular,
            i => RouteType::Other(i),
        }
    }
}

impl Default for RouteType {
    fn default() -> Self {
        RouteType::Bus
    }
}

impl<'de> Deserialize<'de> for RouteType {
    fn deserialize<D>(deserializer: D) -> Result<RouteType, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let i = u16::deserialize(deserializer)?;
        Ok(RouteType::from(i))
    }
}

impl Serialize for RouteType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_u16(self.to_gtfs_value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn route_type_round_trip_on_known_values() {
        assert_eq!(RouteType::Bus, RouteType::from(3));
        assert_eq!(3, RouteType::Bus.to_gtfs_value());
        assert_eq!(RouteType::Other(715), RouteType::from(715));
        assert_eq!(715, RouteType::Other(715).to_gtfs_value());
    }
}
