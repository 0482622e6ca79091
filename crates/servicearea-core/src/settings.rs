//! Business settings for the service area.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Service radius applied when nothing has been configured yet (km).
pub const DEFAULT_MAX_SERVICE_RADIUS_KM: i64 = 50;

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Origin address used for customer-facing service checks.
    pub store_address: String,
    /// Furthest distance (km) the business serves.
    pub max_service_radius: Decimal,
    /// Distance provider API key.
    pub api_key: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            store_address: String::new(),
            max_service_radius: Decimal::from(DEFAULT_MAX_SERVICE_RADIUS_KM),
            api_key: String::new(),
        }
    }
}

impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("store_address", &self.store_address)
            .field("max_service_radius", &self.max_service_radius)
            .field(
                "api_key",
                &if self.api_key.is_empty() {
                    "[unset]"
                } else {
                    "[redacted]"
                },
            )
            .finish()
    }
}

/// Partial settings update. `None` fields keep their stored value.
#[derive(Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SettingsPatch {
    pub store_address: Option<String>,
    pub max_service_radius: Option<Decimal>,
    pub api_key: Option<String>,
}

impl std::fmt::Debug for SettingsPatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SettingsPatch")
            .field("store_address", &self.store_address)
            .field("max_service_radius", &self.max_service_radius)
            .field("api_key", &self.api_key.as_ref().map(|_| "[redacted]"))
            .finish()
    }
}

impl SettingsPatch {
    /// `current` with this patch's fields laid over it, normalized.
    #[must_use]
    pub fn apply_to(&self, current: &Settings) -> Settings {
        Settings {
            store_address: self
                .store_address
                .clone()
                .unwrap_or_else(|| current.store_address.clone()),
            max_service_radius: self
                .max_service_radius
                .unwrap_or(current.max_service_radius),
            api_key: self
                .api_key
                .clone()
                .unwrap_or_else(|| current.api_key.clone()),
        }
        .normalized()
    }
}

/// Result of a [`SettingsPatch`] applied by a store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsChange {
    pub settings: Settings,
    pub changed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettingsError {
    #[error("invalid setting {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl Settings {
    /// Returns a copy with surrounding whitespace removed from text fields.
    #[must_use]
    pub fn normalized(&self) -> Self {
        Self {
            store_address: self.store_address.trim().to_owned(),
            max_service_radius: self.max_service_radius,
            api_key: self.api_key.trim().to_owned(),
        }
    }

    /// # Errors
    ///
    /// Returns [`SettingsError::Invalid`] if `max_service_radius` is negative.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.max_service_radius < Decimal::ZERO {
            return Err(SettingsError::Invalid {
                field: "max_service_radius",
                reason: format!("must be non-negative, got {}", self.max_service_radius),
            });
        }
        Ok(())
    }

    /// Returns `true` if `distance_km` is inside the configured service radius.
    #[must_use]
    pub fn within_service_area(&self, distance_km: Decimal) -> bool {
        distance_km <= self.max_service_radius
    }

    #[must_use]
    pub fn has_api_key(&self) -> bool {
        !self.api_key.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_first_install_values() {
        let settings = Settings::default();
        assert_eq!(settings.store_address, "");
        assert_eq!(settings.max_service_radius, Decimal::from(50));
        assert!(!settings.has_api_key());
    }

    #[test]
    fn negative_radius_is_rejected() {
        let settings = Settings {
            max_service_radius: Decimal::from(-1),
            ..Settings::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(SettingsError::Invalid {
                field: "max_service_radius",
                ..
            })
        ));
    }

    #[test]
    fn radius_boundary_is_inside_service_area() {
        let settings = Settings::default();
        assert!(settings.within_service_area(Decimal::from(50)));
        assert!(!settings.within_service_area(Decimal::new(50001, 3)));
    }

    #[test]
    fn normalized_trims_text_fields() {
        let settings = Settings {
            store_address: "  1 Main St ".to_owned(),
            max_service_radius: Decimal::from(10),
            api_key: " key ".to_owned(),
        };
        let normalized = settings.normalized();
        assert_eq!(normalized.store_address, "1 Main St");
        assert_eq!(normalized.api_key, "key");
    }

    #[test]
    fn patch_keeps_fields_it_does_not_name() {
        let current = Settings {
            store_address: "1 Main St".to_owned(),
            max_service_radius: Decimal::from(20),
            api_key: "key".to_owned(),
        };
        let patch = SettingsPatch {
            max_service_radius: Some(Decimal::from(35)),
            ..SettingsPatch::default()
        };

        let next = patch.apply_to(&current);
        assert_eq!(next.store_address, "1 Main St");
        assert_eq!(next.max_service_radius, Decimal::from(35));
        assert_eq!(next.api_key, "key");
    }

    #[test]
    fn patch_debug_redacts_api_key() {
        let patch = SettingsPatch {
            api_key: Some("super-secret".to_owned()),
            ..SettingsPatch::default()
        };
        assert!(!format!("{patch:?}").contains("super-secret"));
    }

    #[test]
    fn debug_redacts_api_key() {
        let settings = Settings {
            api_key: "super-secret".to_owned(),
            ..Settings::default()
        };
        let rendered = format!("{settings:?}");
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("[redacted]"));
    }
}
