use rstar::{AABB, RTree, RTreeObject};
use serde::Serialize;

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RoadEventKind {
    Clear,
    Accident,
    Construction,
    Roadblock,
}

impl RoadEventKind {
    /// Unrecognized event strings carry no delay.
    pub fn parse(kind: &str) -> RoadEventKind {
        match kind.to_ascii_lowercase().as_str() {
            "accident" => RoadEventKind::Accident,
            "construction" => RoadEventKind::Construction,
            "roadblock" => RoadEventKind::Roadblock,
            _ => RoadEventKind::Clear,
        }
    }

    pub fn delay_minutes(self) -> f64 {
        match self {
            RoadEventKind::Clear => 0.0,
            RoadEventKind::Accident => 5.0,
            RoadEventKind::Construction => 10.0,
            RoadEventKind::Roadblock => 15.0,
        }
    }
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum WeatherKind {
    Clear,
    LightRain,
    HeavyRain,
    Fog,
    Snow,
    Storm,
}

impl WeatherKind {
    /// Unrecognized weather strings carry no delay.
    pub fn parse(kind: &str) -> WeatherKind {
        match kind.to_ascii_lowercase().as_str() {
            "light rain" => WeatherKind::LightRain,
            "heavy rain" => WeatherKind::HeavyRain,
            "fog" => WeatherKind::Fog,
            "snow" => WeatherKind::Snow,
            "storm" => WeatherKind::Storm,
            _ => WeatherKind::Clear,
        }
    }

    pub fn delay_minutes(self) -> f64 {
        match self {
            WeatherKind::Clear => 0.0,
            WeatherKind::LightRain => 3.0,
            WeatherKind::HeavyRain | WeatherKind::Fog => 8.0,
            WeatherKind::Snow | WeatherKind::Storm => 15.0,
        }
    }
}

/// Congestion delay as a step function of the measured traffic speed (km/h).
pub fn congestion_delay_minutes(traffic_speed: f64) -> f64 {
    if traffic_speed > 60.0 {
        0.0
    } else if traffic_speed > 40.0 {
        5.0
    } else if traffic_speed > 20.0 {
        10.0
    } else {
        15.0
    }
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq)]
pub enum DisruptionCause {
    TrafficCongestion { traffic_speed: f64 },
    RoadEvent(RoadEventKind),
    Weather(WeatherKind),
}

impl DisruptionCause {
    fn delay_minutes(&self) -> f64 {
        match *self {
            DisruptionCause::TrafficCongestion { traffic_speed } => {
                congestion_delay_minutes(traffic_speed)
            }
            DisruptionCause::RoadEvent(kind) => kind.delay_minutes(),
            DisruptionCause::Weather(kind) => kind.delay_minutes(),
        }
    }
}

/// An edge-like penalty region. The delay is fixed at construction and never
/// recomputed.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct DisruptionSegment {
    begin: geo::Point,
    end: geo::Point,
    cause: DisruptionCause,
    delay_minutes: f64,
}

impl DisruptionSegment {
    pub fn new(begin: geo::Point, end: geo::Point, cause: DisruptionCause) -> Self {
        let delay_minutes = cause.delay_minutes();
        DisruptionSegment {
            begin,
            end,
            cause,
            delay_minutes,
        }
    }

    pub fn congestion(x1: f64, y1: f64, x2: f64, y2: f64, traffic_speed: f64) -> Self {
        DisruptionSegment::new(
            geo::Point::new(x1, y1),
            geo::Point::new(x2, y2),
            DisruptionCause::TrafficCongestion { traffic_speed },
        )
    }

    pub fn road_event(x1: f64, y1: f64, x2: f64, y2: f64, kind: RoadEventKind) -> Self {
        DisruptionSegment::new(
            geo::Point::new(x1, y1),
            geo::Point::new(x2, y2),
            DisruptionCause::RoadEvent(kind),
        )
    }

    pub fn weather(x1: f64, y1: f64, x2: f64, y2: f64, kind: WeatherKind) -> Self {
        DisruptionSegment::new(
            geo::Point::new(x1, y1),
            geo::Point::new(x2, y2),
            DisruptionCause::Weather(kind),
        )
    }

    pub fn cause(&self) -> DisruptionCause {
        self.cause
    }

    pub fn delay_minutes(&self) -> f64 {
        self.delay_minutes
    }
}

impl RTreeObject for DisruptionSegment {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_corners(
            [
                self.begin.x().min(self.end.x()),
                self.begin.y().min(self.end.y()),
            ],
            [
                self.begin.x().max(self.end.x()),
                self.begin.y().max(self.end.y()),
            ],
        )
    }
}

/// Static spatial index over all disruption segments. Edges are matched by
/// axis-aligned bounding-box overlap, not true segment intersection.
#[derive(Debug)]
pub struct DisruptionMap {
    tree: RTree<DisruptionSegment>,
}

impl DisruptionMap {
    pub fn new(segments: Vec<DisruptionSegment>) -> Self {
        DisruptionMap {
            tree: RTree::bulk_load(segments),
        }
    }

    pub fn empty() -> Self {
        DisruptionMap::new(Vec::new())
    }

    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }

    /// Total delay in minutes over an edge, summed over every segment whose
    /// bounding box overlaps the edge's bounding box.
    pub fn edge_delay_minutes(&self, from: geo::Point, to: geo::Point) -> f64 {
        let envelope = AABB::from_corners(
            [from.x().min(to.x()), from.y().min(to.y())],
            [from.x().max(to.x()), from.y().max(to.y())],
        );

        self.tree
            .locate_in_envelope_intersecting(&envelope)
            .map(|segment| segment.delay_minutes)
            .sum()
    }
}
