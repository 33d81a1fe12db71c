//! Data models.
//!
//! Upstream types mirror the OpenTripPlanner GraphQL schema and are only
//! deserialized. Output types are the compact shapes consumed by the map
//! front end and are only serialized.

use serde::{Deserialize, Serialize};

/// Trip reference embedded in a vehicle position
#[derive(Debug, Clone, PartialEq, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct TripRef {
    pub gtfs_id: Option<String>,
    pub trip_short_name: Option<String>,
    pub trip_headsign: Option<String>,
}

/// Realtime position of one vehicle
///
/// Every field may be missing or null upstream.
#[derive(Debug, Clone, PartialEq, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct VehiclePosition {
    pub trip: Option<TripRef>,
    pub vehicle_id: Option<String>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub label: Option<String>,
    /// Speed in m/s
    pub speed: Option<f64>,
    /// Heading in degrees
    pub heading: Option<f64>,
}

impl VehiclePosition {
    /// Trip id to fetch details for, if the vehicle is assigned to a trip
    ///
    /// An empty id counts as no trip here; the output record still carries
    /// the upstream value unchanged.
    pub fn trip_id(&self) -> Option<&str> {
        self.trip
            .as_ref()
            .and_then(|trip| trip.gtfs_id.as_deref())
            .filter(|id| !id.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Route {
    pub long_name: Option<String>,
    /// Fetched but not emitted
    pub short_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Stop {
    pub name: Option<String>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub platform_code: Option<String>,
}

/// Arrival and departure of one trip at one stop
///
/// Times are seconds since the start of the service day, delays are seconds.
#[derive(Debug, Clone, PartialEq, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct StopTime {
    pub stop: Option<Stop>,
    pub realtime_arrival: Option<i64>,
    pub realtime_departure: Option<i64>,
    pub arrival_delay: Option<i64>,
    pub departure_delay: Option<i64>,
    pub scheduled_arrival: Option<i64>,
    pub scheduled_departure: Option<i64>,
}

/// Route metadata and stop times of one trip on one service day
#[derive(Debug, Clone, PartialEq, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct TripDetail {
    pub gtfs_id: Option<String>,
    pub trip_headsign: Option<String>,
    pub train_category_name: Option<String>,
    pub train_name: Option<String>,
    pub route: Option<Route>,
    pub stoptimes: Option<Vec<StopTime>>,
}

impl TripDetail {
    pub fn route_long_name(&self) -> Option<&str> {
        self.route.as_ref().and_then(|route| route.long_name.as_deref())
    }

    pub fn stop_times(&self) -> &[StopTime] {
        self.stoptimes.as_deref().unwrap_or_default()
    }
}

/// One stop in the published snapshot
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompactStop {
    pub name: Option<String>,
    /// Realtime arrival
    pub ra: Option<i64>,
    /// Realtime departure
    pub rd: Option<i64>,
    /// Scheduled arrival
    pub sa: Option<i64>,
    /// Scheduled departure
    pub sd: Option<i64>,
    /// Arrival delay
    pub a: Option<i64>,
    /// Departure delay
    pub d: Option<i64>,
    /// Platform ("vágány")
    pub v: Option<String>,
}

/// One vehicle in the published snapshot
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutputVehicleRecord {
    pub id: Option<String>,
    pub name: Option<String>,
    #[serde(rename = "headsgn")]
    pub headsign: Option<String>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    #[serde(rename = "sp")]
    pub speed: Option<f64>,
    #[serde(rename = "hd")]
    pub heading: Option<f64>,
    pub stops: Vec<CompactStop>,
}

/// Root document written for the front end
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    /// Generation time in seconds from Unix epoch
    pub last_updated: i64,
    pub vehicles: Vec<OutputVehicleRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_vehicle_position() {
        let s = r#"{
            "trip": {
                "gtfsId": "1:2134567_241018",
                "tripShortName": "2134 személyvonat",
                "tripHeadsign": "Szob"
            },
            "vehicleId": "1:5341009",
            "lat": 47.5003,
            "lon": 19.0245,
            "label": "2134",
            "speed": 12.5,
            "heading": 271.0
        }"#;
        let position: VehiclePosition = serde_json::from_str(s).unwrap();
        let expected = VehiclePosition {
            trip: Some(TripRef {
                gtfs_id: Some("1:2134567_241018".to_string()),
                trip_short_name: Some("2134 személyvonat".to_string()),
                trip_headsign: Some("Szob".to_string()),
            }),
            vehicle_id: Some("1:5341009".to_string()),
            lat: Some(47.5003),
            lon: Some(19.0245),
            label: Some("2134".to_string()),
            speed: Some(12.5),
            heading: Some(271.0),
        };

        assert_eq!(position, expected);
        assert_eq!(position.trip_id(), Some("1:2134567_241018"));
    }

    #[test]
    fn parse_vehicle_position_nulls() {
        let s = r#"{
            "trip": null,
            "vehicleId": "1:5341009",
            "lat": 47.5,
            "lon": 19.0,
            "label": null,
            "speed": null
        }"#;
        let position: VehiclePosition = serde_json::from_str(s).unwrap();

        assert_eq!(position.trip, None);
        assert_eq!(position.trip_id(), None);
        assert_eq!(position.heading, None);
    }

    #[test]
    fn empty_trip_id_is_no_trip() {
        let position = VehiclePosition {
            trip: Some(TripRef {
                gtfs_id: Some(String::new()),
                ..Default::default()
            }),
            ..Default::default()
        };

        assert_eq!(position.trip_id(), None);
    }

    #[test]
    fn parse_trip_detail() {
        let s = r#"{
            "gtfsId": "1:2134567_241018",
            "tripHeadsign": "Szob",
            "trainCategoryName": "személyvonat",
            "trainName": null,
            "route": { "longName": "S70", "shortName": "S70" },
            "stoptimes": [
                {
                    "stop": { "name": "Budapest-Nyugati", "lat": 47.5107, "lon": 19.0564, "platformCode": "12" },
                    "realtimeArrival": 49500,
                    "realtimeDeparture": 49560,
                    "arrivalDelay": 0,
                    "departureDelay": 60,
                    "scheduledArrival": 49500,
                    "scheduledDeparture": 49500
                }
            ]
        }"#;
        let detail: TripDetail = serde_json::from_str(s).unwrap();

        assert_eq!(detail.route_long_name(), Some("S70"));
        assert_eq!(detail.train_name, None);
        assert_eq!(detail.stop_times().len(), 1);
        let stop_time = &detail.stop_times()[0];
        assert_eq!(stop_time.departure_delay, Some(60));
        assert_eq!(
            stop_time.stop.as_ref().and_then(|s| s.platform_code.as_deref()),
            Some("12")
        );
    }

    #[test]
    fn empty_trip_detail_has_no_fields() {
        let detail = TripDetail::default();

        assert_eq!(detail.route_long_name(), None);
        assert!(detail.stop_times().is_empty());
    }

    #[test]
    fn serialize_snapshot_compact_keys() {
        let snapshot = Snapshot {
            last_updated: 1729252800,
            vehicles: vec![OutputVehicleRecord {
                id: Some("1:T1".to_string()),
                name: Some("[S60] 60".to_string()),
                headsign: Some("Győr".to_string()),
                lat: Some(47.5),
                lon: Some(19.25),
                speed: None,
                heading: Some(90.0),
                stops: vec![CompactStop {
                    name: Some("Kelenföld".to_string()),
                    ra: Some(100),
                    rd: Some(160),
                    sa: Some(100),
                    sd: Some(120),
                    a: Some(0),
                    d: Some(40),
                    v: None,
                }],
            }],
        };

        let json = serde_json::to_string(&snapshot).unwrap();
        assert_eq!(
            json,
            r#"{"lastUpdated":1729252800,"vehicles":[{"id":"1:T1","name":"[S60] 60","headsgn":"Győr","lat":47.5,"lon":19.25,"sp":null,"hd":90.0,"stops":[{"name":"Kelenföld","ra":100,"rd":160,"sa":100,"sd":120,"a":0,"d":40,"v":null}]}]}"#
        );
    }
}
