use std::fmt;
use std::str::FromStr;

use engine::Vec2;
use thiserror::Error;

use crate::config::LayoutConfig;

pub const FIELD_COUNT: usize = 5;
const LOCATION_COUNT: usize = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Location {
    Farm,
    Field1,
    Field2,
    Field3,
    Field4,
    Field5,
    SoupFactory,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown location '{name}'")]
pub struct LocationError {
    pub name: String,
}

impl Location {
    pub const ALL: [Location; LOCATION_COUNT] = [
        Location::Farm,
        Location::Field1,
        Location::Field2,
        Location::Field3,
        Location::Field4,
        Location::Field5,
        Location::SoupFactory,
    ];

    pub fn as_token(self) -> &'static str {
        match self {
            Self::Farm => "FARM",
            Self::Field1 => "FIELD1",
            Self::Field2 => "FIELD2",
            Self::Field3 => "FIELD3",
            Self::Field4 => "FIELD4",
            Self::Field5 => "FIELD5",
            Self::SoupFactory => "SOUP_FACTORY",
        }
    }

    /// Zero-based field slot, `None` for buildings.
    pub fn field_index(self) -> Option<usize> {
        match self {
            Self::Field1 => Some(0),
            Self::Field2 => Some(1),
            Self::Field3 => Some(2),
            Self::Field4 => Some(3),
            Self::Field5 => Some(4),
            Self::Farm | Self::SoupFactory => None,
        }
    }

    const fn index(self) -> usize {
        match self {
            Self::Farm => 0,
            Self::Field1 => 1,
            Self::Field2 => 2,
            Self::Field3 => 3,
            Self::Field4 => 4,
            Self::Field5 => 5,
            Self::SoupFactory => 6,
        }
    }
}

impl FromStr for Location {
    type Err = LocationError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|location| location.as_token() == name)
            .ok_or_else(|| LocationError {
                name: name.to_string(),
            })
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_token())
    }
}

/// Local, pre-rotation coordinate of every [`Location`] inside one farm.
///
/// Fields sit on one row at `field_offset + slot * field_distance`; the
/// farm building and soup factory sit at their configured distances from the
/// farm origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocationTable {
    positions: [Vec2; LOCATION_COUNT],
}

impl LocationTable {
    pub fn from_layout(layout: &LayoutConfig) -> Self {
        let mut positions = [Vec2::default(); LOCATION_COUNT];
        for location in Location::ALL {
            positions[location.index()] = match location.field_index() {
                Some(slot) => Vec2 {
                    x: layout.field_offset + slot as f32 * layout.field_distance,
                    y: layout.field_width + layout.field_row_margin,
                },
                None if location == Location::Farm => Vec2 {
                    x: layout.farm_building_distance,
                    y: layout.farm_building_width,
                },
                None => Vec2 {
                    x: layout.soup_factory_distance,
                    y: layout.soup_factory_width,
                },
            };
        }
        Self { positions }
    }

    pub fn position(&self, location: Location) -> Vec2 {
        self.positions[location.index()]
    }
}

impl Default for LocationTable {
    fn default() -> Self {
        Self::from_layout(&LayoutConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_round_trip_through_parse() {
        for location in Location::ALL {
            assert_eq!(location.as_token().parse::<Location>(), Ok(location));
        }
    }

    #[test]
    fn parse_is_case_sensitive_and_reports_name() {
        let error = "field2".parse::<Location>().expect_err("lowercase rejected");
        assert_eq!(error.name, "field2");
        assert!("GREENHOUSE".parse::<Location>().is_err());
    }

    #[test]
    fn every_location_has_a_distinct_table_entry() {
        let table = LocationTable::default();
        for (index, a) in Location::ALL.iter().enumerate() {
            for b in &Location::ALL[index + 1..] {
                assert_ne!(table.position(*a), table.position(*b), "{a} vs {b}");
            }
        }
    }

    #[test]
    fn fields_are_evenly_spaced_on_one_row() {
        let layout = LayoutConfig::default();
        let table = LocationTable::from_layout(&layout);
        let field1 = table.position(Location::Field1);
        let field2 = table.position(Location::Field2);
        let field5 = table.position(Location::Field5);
        assert_eq!(field1.x, layout.field_offset);
        assert_eq!(field2.x - field1.x, layout.field_distance);
        assert_eq!(field5.x, layout.field_offset + 4.0 * layout.field_distance);
        assert_eq!(field1.y, field5.y);
    }
}
