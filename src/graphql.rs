//! GraphQL client for the OpenTripPlanner backend

use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::{
    config::{GraphQlConfig, RegionConfig},
    errors::UpdaterError,
    models::{TripDetail, VehiclePosition},
};

pub const VEHICLE_POSITIONS_QUERY: &str = r#"
query VehiclePositions($swLat: Float!, $swLon: Float!, $neLat: Float!, $neLon: Float!, $modes: [Mode]) {
  vehiclePositions(swLat: $swLat, swLon: $swLon, neLat: $neLat, neLon: $neLon, modes: $modes) {
    trip {
      gtfsId
      tripShortName
      tripHeadsign
    }
    vehicleId
    lat
    lon
    label
    speed
    heading
  }
}"#;

pub const TRIP_DETAIL_QUERY: &str = r#"
query TripDetail($id: String!, $serviceDay: String!, $language: String) {
  trip(id: $id, serviceDay: $serviceDay) {
    gtfsId
    tripHeadsign
    trainCategoryName
    trainName
    route {
      longName(language: $language)
      shortName
    }
    stoptimes {
      stop {
        name
        lat
        lon
        platformCode
      }
      realtimeArrival
      realtimeDeparture
      arrivalDelay
      departureDelay
      scheduledArrival
      scheduledDeparture
    }
  }
}"#;

/// Request body sent to the endpoint
#[derive(Debug, Serialize)]
pub struct GraphQlRequest<'a> {
    pub query: &'a str,
    pub variables: Value,
}

#[derive(Debug, Deserialize)]
pub struct GraphQlError {
    pub message: String,
}

/// Response envelope
#[derive(Debug, Deserialize)]
pub struct GraphQlResponse<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VehiclePositionsData {
    vehicle_positions: Option<Vec<VehiclePosition>>,
}

#[derive(Debug, Deserialize)]
struct TripData {
    trip: Option<TripDetail>,
}

/// Source of vehicle positions and trip details
///
/// Implemented over HTTP by [`HttpTransitApi`]; tests supply canned data.
#[allow(async_fn_in_trait)]
pub trait TransitApi {
    /// All vehicles currently reported in the configured region
    async fn fetch_vehicle_positions(&self) -> Result<Vec<VehiclePosition>, UpdaterError>;

    /// Details of one trip on one service day, `None` if the trip is unknown
    async fn fetch_trip_details(
        &self,
        trip_id: &str,
        service_day: &str,
    ) -> Result<Option<TripDetail>, UpdaterError>;
}

pub struct HttpTransitApi {
    client: reqwest::Client,
    endpoint: String,
    language: String,
    region: RegionConfig,
}

impl HttpTransitApi {
    pub fn new(graphql: &GraphQlConfig, region: &RegionConfig) -> Result<Self, UpdaterError> {
        let client = reqwest::Client::builder()
            .timeout(graphql.timeout)
            .build()?;

        Ok(Self {
            client,
            endpoint: graphql.endpoint.clone(),
            language: graphql.language.clone(),
            region: region.clone(),
        })
    }

    async fn post<T: DeserializeOwned>(
        &self,
        query: &str,
        variables: Value,
    ) -> Result<T, UpdaterError> {
        let response = self
            .client
            .post(&self.endpoint)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .json(&GraphQlRequest { query, variables })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(UpdaterError::HttpStatus {
                status: response.status(),
                endpoint: self.endpoint.clone(),
            });
        }

        let body = response.bytes().await?;
        debug!("Received {} bytes from {}", body.len(), self.endpoint);
        decode_response(&body)
    }
}

impl TransitApi for HttpTransitApi {
    async fn fetch_vehicle_positions(&self) -> Result<Vec<VehiclePosition>, UpdaterError> {
        let variables = json!({
            "swLat": self.region.sw_lat,
            "swLon": self.region.sw_lon,
            "neLat": self.region.ne_lat,
            "neLon": self.region.ne_lon,
            "modes": self.region.modes,
        });
        let data: VehiclePositionsData = self.post(VEHICLE_POSITIONS_QUERY, variables).await?;
        data.vehicle_positions.ok_or_else(|| {
            UpdaterError::MalformedResponse("missing data.vehiclePositions".to_string())
        })
    }

    async fn fetch_trip_details(
        &self,
        trip_id: &str,
        service_day: &str,
    ) -> Result<Option<TripDetail>, UpdaterError> {
        validate_trip_id(trip_id)?;
        let variables = json!({
            "id": trip_id,
            "serviceDay": service_day,
            "language": self.language,
        });
        let data: TripData = self.post(TRIP_DETAIL_QUERY, variables).await?;
        Ok(data.trip)
    }
}

/// Unwrap the `data` member of a GraphQL response body
///
/// Errors reported next to usable data are logged and otherwise ignored.
pub fn decode_response<T: DeserializeOwned>(body: &[u8]) -> Result<T, UpdaterError> {
    let response: GraphQlResponse<T> = serde_json::from_slice(body)
        .map_err(|e| UpdaterError::MalformedResponse(e.to_string()))?;

    let messages = || {
        response
            .errors
            .iter()
            .map(|e| e.message.as_str())
            .collect::<Vec<_>>()
            .join("; ")
    };

    match response.data {
        Some(data) => {
            if !response.errors.is_empty() {
                warn!("GraphQL response carried errors: {}", messages());
            }
            Ok(data)
        }
        None if !response.errors.is_empty() => Err(UpdaterError::GraphQlErrors(messages())),
        None => Err(UpdaterError::MalformedResponse(
            "missing data field".to_string(),
        )),
    }
}

/// Reject identifiers that are empty or carry control characters
pub fn validate_trip_id(trip_id: &str) -> Result<(), UpdaterError> {
    if trip_id.is_empty() || trip_id.chars().any(char::is_control) {
        return Err(UpdaterError::InvalidTripId(trip_id.to_string()));
    }
    Ok(())
}
