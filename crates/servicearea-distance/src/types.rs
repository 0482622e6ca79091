//! Distance-matrix response types and their interpretation.
//!
//! Every field the provider might omit is optional here so that a
//! structurally odd body still deserializes and can be classified, rather
//! than failing as a generic parse error.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::Deserialize;
use servicearea_core::{DistanceError, DistanceResult};

const METERS_PER_KM: i64 = 1000;
const STATUS_OK: &str = "OK";

/// Top-level distance-matrix envelope.
#[derive(Debug, Deserialize)]
pub struct MatrixResponse {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub rows: Vec<MatrixRow>,
}

#[derive(Debug, Deserialize)]
pub struct MatrixRow {
    #[serde(default)]
    pub elements: Vec<MatrixElement>,
}

/// One origin/destination pair.
#[derive(Debug, Deserialize)]
pub struct MatrixElement {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub distance: Option<DistanceValue>,
    #[serde(default)]
    pub duration: Option<DurationText>,
}

/// Distance in meters. Kept as a JSON number so no precision is lost
/// before the decimal conversion.
#[derive(Debug, Deserialize)]
pub struct DistanceValue {
    pub value: serde_json::Number,
}

#[derive(Debug, Deserialize)]
pub struct DurationText {
    pub text: String,
}

impl MatrixResponse {
    /// Classify the response and convert the first element into a
    /// [`DistanceResult`].
    ///
    /// # Errors
    ///
    /// - [`DistanceError::ProviderRejected`] if the top-level status is not `OK`.
    /// - [`DistanceError::NoRouteFound`] if the element status is not `OK`.
    /// - [`DistanceError::ProviderUnavailable`] if required fields are missing
    ///   or the distance is negative or not a number.
    pub fn into_result(self) -> Result<DistanceResult, DistanceError> {
        let status = self
            .status
            .ok_or_else(|| unavailable("response has no status"))?;
        if status != STATUS_OK {
            tracing::warn!(
                status = %status,
                error_message = self.error_message.as_deref().unwrap_or(""),
                "distance provider rejected request"
            );
            return Err(DistanceError::ProviderRejected { status });
        }

        let element = self
            .rows
            .into_iter()
            .next()
            .and_then(|row| row.elements.into_iter().next())
            .ok_or_else(|| unavailable("response has no elements"))?;

        let element_status = element
            .status
            .ok_or_else(|| unavailable("element has no status"))?;
        if element_status != STATUS_OK {
            return Err(DistanceError::NoRouteFound {
                status: element_status,
            });
        }

        let meters = element
            .distance
            .ok_or_else(|| unavailable("element has no distance"))?
            .value;
        let duration = element
            .duration
            .ok_or_else(|| unavailable("element has no duration"))?;

        Ok(DistanceResult {
            distance_km: meters_to_km(&meters)?,
            duration_text: duration.text,
        })
    }
}

/// Exact decimal conversion of a meter count to kilometers.
///
/// # Errors
///
/// Returns [`DistanceError::ProviderUnavailable`] if the value is negative or
/// not representable as a decimal.
pub fn meters_to_km(meters: &serde_json::Number) -> Result<Decimal, DistanceError> {
    let raw = meters.to_string();
    let meters = Decimal::from_str(&raw)
        .or_else(|_| Decimal::from_scientific(&raw))
        .map_err(|e| unavailable(&format!("distance value '{raw}' is not a decimal: {e}")))?;
    if meters < Decimal::ZERO {
        return Err(unavailable(&format!("negative distance value {meters}")));
    }
    Ok(meters / Decimal::from(METERS_PER_KM))
}

fn unavailable(reason: &str) -> DistanceError {
    DistanceError::ProviderUnavailable(format!("malformed distance response: {reason}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(body: &serde_json::Value) -> MatrixResponse {
        serde_json::from_value(body.clone()).expect("fixture should deserialize")
    }

    #[test]
    fn ok_response_converts_meters_to_km() {
        let response = parse(&serde_json::json!({
            "status": "OK",
            "rows": [{ "elements": [{
                "status": "OK",
                "distance": { "value": 12_345, "text": "12.3 km" },
                "duration": { "value": 900, "text": "15 mins" }
            }]}]
        }));

        let result = response.into_result().expect("should succeed");
        assert_eq!(result.distance_km, Decimal::new(12_345, 3));
        assert_eq!(result.duration_text, "15 mins");
    }

    #[test]
    fn only_first_element_is_consulted() {
        let response = parse(&serde_json::json!({
            "status": "OK",
            "rows": [
                { "elements": [
                    { "status": "OK", "distance": { "value": 1000 }, "duration": { "text": "1 min" } },
                    { "status": "NOT_FOUND" }
                ]},
                { "elements": [{ "status": "ZERO_RESULTS" }] }
            ]
        }));

        let result = response.into_result().expect("should succeed");
        assert_eq!(result.distance_km, Decimal::ONE);
    }

    #[test]
    fn top_level_status_wins_over_elements() {
        let response = parse(&serde_json::json!({
            "status": "OVER_QUERY_LIMIT",
            "error_message": "quota",
            "rows": []
        }));

        assert_eq!(
            response.into_result(),
            Err(DistanceError::ProviderRejected {
                status: "OVER_QUERY_LIMIT".to_owned()
            })
        );
    }

    #[test]
    fn element_status_becomes_no_route() {
        let response = parse(&serde_json::json!({
            "status": "OK",
            "rows": [{ "elements": [{ "status": "ZERO_RESULTS" }] }]
        }));

        assert_eq!(
            response.into_result(),
            Err(DistanceError::NoRouteFound {
                status: "ZERO_RESULTS".to_owned()
            })
        );
    }

    #[test]
    fn missing_pieces_are_unavailable() {
        let fixtures = [
            serde_json::json!({}),
            serde_json::json!({ "status": "OK" }),
            serde_json::json!({ "status": "OK", "rows": [{ "elements": [] }] }),
            serde_json::json!({ "status": "OK", "rows": [{ "elements": [{}] }] }),
            serde_json::json!({
                "status": "OK",
                "rows": [{ "elements": [{ "status": "OK", "duration": { "text": "1 min" } }] }]
            }),
            serde_json::json!({
                "status": "OK",
                "rows": [{ "elements": [{ "status": "OK", "distance": { "value": 10 } }] }]
            }),
        ];

        for fixture in fixtures {
            let result = parse(&fixture).into_result();
            assert!(
                matches!(result, Err(DistanceError::ProviderUnavailable(_))),
                "expected unavailable for {fixture}, got {result:?}"
            );
        }
    }

    #[test]
    fn negative_distance_is_unavailable() {
        let meters = serde_json::Number::from(-5);
        assert!(matches!(
            meters_to_km(&meters),
            Err(DistanceError::ProviderUnavailable(_))
        ));
    }

    #[test]
    fn conversion_is_exact() {
        let cases = [
            (serde_json::Number::from(0), Decimal::ZERO),
            (serde_json::Number::from(1), Decimal::new(1, 3)),
            (serde_json::Number::from(10_000), Decimal::from(10)),
            (serde_json::Number::from(999_999), Decimal::new(999_999, 3)),
        ];
        for (meters, expected) in cases {
            assert_eq!(meters_to_km(&meters).unwrap(), expected, "meters {meters}");
        }
    }
}
