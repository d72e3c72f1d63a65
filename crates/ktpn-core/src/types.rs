//! Request types shared by the lookup pipeline and the CLI.
//!
//! A lookup is identified by a normalized plate number and a vehicle type
//! code. Both are immutable once built.

use crate::error::KtpnError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Newtype for a normalized licence plate number.
///
/// Normalization uppercases every letter and strips `.` and `-`, so
/// `"29a-123.45"` becomes `"29A12345"`. Normalizing twice is a no-op.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlateNumber(String);

impl PlateNumber {
    /// Create a `PlateNumber` from raw user input.
    #[must_use]
    pub fn new(raw: impl AsRef<str>) -> Self {
        Self(Self::normalize(raw.as_ref()))
    }

    /// Apply the plate normalization rule to a raw string.
    #[must_use]
    pub fn normalize(raw: &str) -> String {
        raw.chars()
            .filter(|c| !matches!(c, '.' | '-'))
            .flat_map(char::to_uppercase)
            .collect()
    }

    /// Get the inner string value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlateNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Vehicle categories understood by the portal.
///
/// The portal identifies each category by a small numeric code sent as a
/// form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VehicleType {
    /// Passenger car
    #[default]
    Car,
}

impl VehicleType {
    /// Numeric code the portal expects for this vehicle type.
    #[must_use]
    pub fn code(self) -> u8 {
        match self {
            Self::Car => 1,
        }
    }

    /// Look up a vehicle type by its portal code.
    ///
    /// # Errors
    /// Returns error if no vehicle type uses the given code.
    pub fn from_code(code: u8) -> Result<Self, KtpnError> {
        match code {
            1 => Ok(Self::Car),
            other => Err(KtpnError::Validation(format!(
                "unknown vehicle type code: {other}"
            ))),
        }
    }
}

impl fmt::Display for VehicleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for VehicleType {
    type Err = KtpnError;

    /// Accepts either the lowercase name (`car`) or the numeric code (`1`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(code) = s.parse::<u8>() {
            return Self::from_code(code);
        }
        match s.to_ascii_lowercase().as_str() {
            "car" => Ok(Self::Car),
            _ => Err(KtpnError::Validation(format!(
                "unknown vehicle type: '{s}' (expected 'car' or '1')"
            ))),
        }
    }
}

/// A single lookup to run against the portal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupRequest {
    /// Normalized plate number
    pub plate: PlateNumber,
    /// Vehicle category
    pub vehicle_type: VehicleType,
}

impl LookupRequest {
    /// Build a request, normalizing the raw plate number.
    #[must_use]
    pub fn new(plate: impl AsRef<str>, vehicle_type: VehicleType) -> Self {
        Self {
            plate: PlateNumber::new(plate),
            vehicle_type,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plate_normalization() {
        assert_eq!(PlateNumber::new("29a-123.45").as_str(), "29A12345");
        assert_eq!(PlateNumber::new("51F-999.99").as_str(), "51F99999");
        assert_eq!(PlateNumber::new("30e12345").as_str(), "30E12345");
        assert_eq!(PlateNumber::new("").as_str(), "");
        assert_eq!(PlateNumber::new("..--").as_str(), "");
    }

    #[test]
    fn test_plate_normalization_is_idempotent() {
        let inputs = [
            "29a-123.45",
            "51f.999-99",
            "already12345",
            "a.b-c.d",
            "-.-29-.-",
            "đà-nẵng",
        ];

        for input in inputs {
            let once = PlateNumber::normalize(input);
            let twice = PlateNumber::normalize(&once);
            assert_eq!(once, twice, "normalization not idempotent for {input:?}");
            assert!(!once.contains('.'));
            assert!(!once.contains('-'));
            assert!(!once.chars().any(char::is_lowercase));
        }
    }

    #[test]
    fn test_plate_display() {
        let plate = PlateNumber::new("29a-123.45");
        assert_eq!(plate.to_string(), "29A12345");
    }

    #[test]
    fn test_vehicle_type_code() {
        assert_eq!(VehicleType::Car.code(), 1);
        assert_eq!(VehicleType::Car.to_string(), "1");
        assert_eq!(VehicleType::default(), VehicleType::Car);
    }

    #[test]
    fn test_vehicle_type_from_code() {
        assert_eq!(VehicleType::from_code(1).expect("car code"), VehicleType::Car);
        assert!(VehicleType::from_code(2).is_err());
    }

    #[test]
    fn test_vehicle_type_from_str() {
        assert_eq!("car".parse::<VehicleType>().expect("name"), VehicleType::Car);
        assert_eq!("CAR".parse::<VehicleType>().expect("upper name"), VehicleType::Car);
        assert_eq!("1".parse::<VehicleType>().expect("code"), VehicleType::Car);

        let err = "truck".parse::<VehicleType>().expect_err("unknown name");
        assert!(err.to_string().contains("truck"));
    }

    #[test]
    fn test_vehicle_type_serialization() {
        let json = serde_json::to_string(&VehicleType::Car).expect("serialize");
        assert_eq!(json, "\"car\"");
    }

    #[test]
    fn test_lookup_request_normalizes_plate() {
        let request = LookupRequest::new("29a-123.45", VehicleType::Car);
        assert_eq!(request.plate.as_str(), "29A12345");
        assert_eq!(request.vehicle_type, VehicleType::Car);
    }
}
