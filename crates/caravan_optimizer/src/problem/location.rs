use geo::{Distance, Euclidean};
use serde::Serialize;

use crate::index_newtype;

index_newtype!(LocationIdx, Location);

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LocationKind {
    Depot,
    Customer,
    RefuelingStation,
}

impl LocationKind {
    /// Boundary strings are matched case-insensitively; anything unrecognized
    /// degrades to a customer stop.
    pub fn parse(kind: &str) -> LocationKind {
        match kind.to_ascii_lowercase().as_str() {
            "depot" => LocationKind::Depot,
            "refueling_station" => LocationKind::RefuelingStation,
            _ => LocationKind::Customer,
        }
    }
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq)]
pub struct TimeWindow {
    pub earliest: f64,
    pub latest: f64,
}

impl TimeWindow {
    pub const UNBOUNDED: TimeWindow = TimeWindow {
        earliest: 0.0,
        latest: f64::MAX,
    };

    pub fn new(earliest: f64, latest: f64) -> Self {
        TimeWindow { earliest, latest }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Location {
    external_id: u32,
    point: geo::Point,
    demand: f64,
    time_window: TimeWindow,
    service_time: f64,
    kind: LocationKind,
}

impl Location {
    pub fn new(
        external_id: u32,
        x: f64,
        y: f64,
        demand: f64,
        time_window: TimeWindow,
        service_time: f64,
        kind: LocationKind,
    ) -> Self {
        Location {
            external_id,
            point: geo::Point::new(x, y),
            demand,
            time_window,
            service_time,
            kind,
        }
    }

    pub fn depot(external_id: u32, x: f64, y: f64) -> Self {
        Location::new(
            external_id,
            x,
            y,
            0.0,
            TimeWindow::UNBOUNDED,
            0.0,
            LocationKind::Depot,
        )
    }

    pub fn refueling_station(external_id: u32, x: f64, y: f64) -> Self {
        Location::new(
            external_id,
            x,
            y,
            0.0,
            TimeWindow::UNBOUNDED,
            0.0,
            LocationKind::RefuelingStation,
        )
    }

    pub fn external_id(&self) -> u32 {
        self.external_id
    }

    pub fn point(&self) -> geo::Point {
        self.point
    }

    pub fn x(&self) -> f64 {
        self.point.x()
    }

    pub fn y(&self) -> f64 {
        self.point.y()
    }

    pub fn demand(&self) -> f64 {
        self.demand
    }

    pub fn time_window(&self) -> TimeWindow {
        self.time_window
    }

    pub fn service_time(&self) -> f64 {
        self.service_time
    }

    pub fn kind(&self) -> LocationKind {
        self.kind
    }

    pub fn is_depot(&self) -> bool {
        self.kind == LocationKind::Depot
    }

    pub fn is_customer(&self) -> bool {
        self.kind == LocationKind::Customer
    }

    pub fn is_refueling_station(&self) -> bool {
        self.kind == LocationKind::RefuelingStation
    }

    pub fn euclidean_distance(&self, to: &Location) -> f64 {
        Euclidean.distance(&self.point, &to.point)
    }
}
