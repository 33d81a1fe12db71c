//! Merging of vehicle positions and trip details into compact output records

use crate::models::{CompactStop, OutputVehicleRecord, StopTime, TripDetail, VehiclePosition};

/// Display name of a train
///
/// Defaults to the trip short name. Line labels such as "S60" are only
/// exposed by the API through the route long name, which otherwise holds
/// long free text, so a long name shorter than `short_label_max_len`
/// characters is taken as a label and prefixed in brackets.
pub fn display_name(
    trip_short_name: Option<&str>,
    route_long_name: Option<&str>,
    short_label_max_len: usize,
) -> Option<String> {
    let short_name = trip_short_name?;
    match route_long_name {
        Some(label) if label.chars().count() < short_label_max_len => {
            Some(format!("[{}] {}", label, short_name))
        }
        _ => Some(short_name.to_string()),
    }
}

pub fn compress_stop_time(stop_time: &StopTime) -> CompactStop {
    let stop = stop_time.stop.as_ref();
    CompactStop {
        name: stop.and_then(|s| s.name.clone()),
        ra: stop_time.realtime_arrival,
        rd: stop_time.realtime_departure,
        sa: stop_time.scheduled_arrival,
        sd: stop_time.scheduled_departure,
        a: stop_time.arrival_delay,
        d: stop_time.departure_delay,
        v: stop.and_then(|s| s.platform_code.clone()),
    }
}

/// Compress stop times, preserving upstream order
pub fn compress_stop_times(stop_times: &[StopTime]) -> Vec<CompactStop> {
    stop_times.iter().map(compress_stop_time).collect()
}

/// Build the output record of one vehicle
///
/// `detail` is `None` when the vehicle has no trip or the trip is unknown
/// upstream; trip-derived fields are then null and the stop list is empty.
pub fn build_record(
    position: &VehiclePosition,
    detail: Option<&TripDetail>,
    short_label_max_len: usize,
) -> OutputVehicleRecord {
    let trip = position.trip.as_ref();
    let name = display_name(
        trip.and_then(|t| t.trip_short_name.as_deref()),
        detail.and_then(TripDetail::route_long_name),
        short_label_max_len,
    );

    OutputVehicleRecord {
        id: trip.and_then(|t| t.gtfs_id.clone()),
        name,
        headsign: trip.and_then(|t| t.trip_headsign.clone()),
        lat: position.lat,
        lon: position.lon,
        speed: position.speed,
        heading: position.heading,
        stops: detail
            .map(|d| compress_stop_times(d.stop_times()))
            .unwrap_or_default(),
    }
}
