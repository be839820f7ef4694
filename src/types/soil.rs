//! Soil sample and query types with their validation rules.
//!
//! Every query that reaches the recommendation client is built through one
//! of the constructors here, so range checks and text normalization hold by
//! construction.

use serde::{Deserialize, Serialize};

// ============================================================================
// Validation Error
// ============================================================================

/// Pre-flight validation failure. Never reaches the network.
///
/// The `Display` text is the message shown to the user.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    /// A required field was empty (or whitespace only).
    #[error("Please fill in all fields")]
    MissingField(&'static str),

    /// A numeric field did not parse as a finite number.
    #[error("Please enter valid numbers for all soil parameters")]
    NotANumber(&'static str),

    /// A numeric field was outside its inclusive range.
    #[error("{label} must be between {min}-{max}{unit}")]
    OutOfRange {
        label: &'static str,
        min: f64,
        max: f64,
        unit: &'static str,
        value: f64,
    },
}

impl ValidationError {
    /// Name of the field that failed.
    pub fn field(&self) -> &'static str {
        match self {
            Self::MissingField(f) | Self::NotANumber(f) => f,
            Self::OutOfRange { label, .. } => label,
        }
    }
}

// ============================================================================
// Ranges
// ============================================================================

/// Inclusive range for one soil parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NutrientRange {
    pub label: &'static str,
    pub min: f64,
    pub max: f64,
    pub unit: &'static str,
}

impl NutrientRange {
    pub const fn new(label: &'static str, min: f64, max: f64, unit: &'static str) -> Self {
        Self { label, min, max, unit }
    }

    pub fn contains(&self, value: f64) -> bool {
        (self.min..=self.max).contains(&value)
    }

    fn check(&self, value: f64) -> Result<f64, ValidationError> {
        if self.contains(value) {
            Ok(value)
        } else {
            Err(ValidationError::OutOfRange {
                label: self.label,
                min: self.min,
                max: self.max,
                unit: self.unit,
                value,
            })
        }
    }
}

/// Per-parameter limits accepted by a prediction endpoint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SoilLimits {
    pub nitrogen: NutrientRange,
    pub phosphorus: NutrientRange,
    pub ph: NutrientRange,
    pub potassium: NutrientRange,
}

const NITROGEN: NutrientRange = NutrientRange::new("Nitrogen", 0.0, 5.0, "%");
const SOIL_PH: NutrientRange = NutrientRange::new("Soil pH", 3.0, 10.0, "");

/// Which endpoint family a soil sample feeds. The models were trained on
/// different phosphorus and potassium spans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SampleProfile {
    /// Soil organic carbon predictor.
    SoilCarbon,
    /// Fertilizer and organic fertilizer recommenders.
    Fertilizer,
}

impl SampleProfile {
    pub const fn limits(self) -> SoilLimits {
        match self {
            Self::SoilCarbon => SoilLimits {
                nitrogen: NITROGEN,
                phosphorus: NutrientRange::new("Phosphorus", 0.0, 900.0, " ppm"),
                ph: SOIL_PH,
                potassium: NutrientRange::new("Potassium", 0.0, 5.0, " meq%"),
            },
            Self::Fertilizer => SoilLimits {
                nitrogen: NITROGEN,
                phosphorus: NutrientRange::new("Phosphorus", 0.0, 200.0, " ppm"),
                ph: SOIL_PH,
                potassium: NutrientRange::new("Potassium", 0.0, 10.0, " meq%"),
            },
        }
    }
}

// ============================================================================
// Soil Sample
// ============================================================================

/// NPK + pH measurement for one field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SoilSample {
    pub nitrogen_percent: f64,
    pub phosphorus_ppm: f64,
    pub soil_ph: f64,
    pub potassium_meq_percent: f64,
}

impl SoilSample {
    /// Build a sample, rejecting the first out-of-range value (N, P, pH, K order).
    pub fn new(
        nitrogen_percent: f64,
        phosphorus_ppm: f64,
        soil_ph: f64,
        potassium_meq_percent: f64,
        profile: SampleProfile,
    ) -> Result<Self, ValidationError> {
        let limits = profile.limits();
        Ok(Self {
            nitrogen_percent: limits.nitrogen.check(nitrogen_percent)?,
            phosphorus_ppm: limits.phosphorus.check(phosphorus_ppm)?,
            soil_ph: limits.ph.check(soil_ph)?,
            potassium_meq_percent: limits.potassium.check(potassium_meq_percent)?,
        })
    }
}

// ============================================================================
// Queries
// ============================================================================

/// Soil sample plus the crop to be grown. Crop is stored trimmed and lower-cased.
#[derive(Debug, Clone, PartialEq)]
pub struct FertilizerQuery {
    sample: SoilSample,
    crop: String,
}

impl FertilizerQuery {
    pub fn new(sample: SoilSample, crop: &str) -> Result<Self, ValidationError> {
        Ok(Self {
            sample,
            crop: normalize_crop(crop).ok_or(ValidationError::MissingField("crop"))?,
        })
    }

    pub fn sample(&self) -> &SoilSample {
        &self.sample
    }

    pub fn crop(&self) -> &str {
        &self.crop
    }
}

/// County + crop for the region-based recommender.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionalQuery {
    county: String,
    crop: String,
}

impl RegionalQuery {
    pub fn new(county: &str, crop: &str) -> Result<Self, ValidationError> {
        let county = normalize_county(county).ok_or(ValidationError::MissingField("county"))?;
        let crop = normalize_crop(crop).ok_or(ValidationError::MissingField("crop"))?;
        Ok(Self { county, crop })
    }

    pub fn county(&self) -> &str {
        &self.county
    }

    pub fn crop(&self) -> &str {
        &self.crop
    }
}

/// Trim and lower-case a crop name. `None` when blank.
pub fn normalize_crop(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_lowercase())
    }
}

/// Trim a county name, upper-case its first letter and lower-case the rest.
/// `None` when blank.
pub fn normalize_county(raw: &str) -> Option<String> {
    let mut chars = raw.trim().chars();
    let first = chars.next()?;
    let mut county: String = first.to_uppercase().collect();
    county.push_str(&chars.as_str().to_lowercase());
    Some(county)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nitrogen_bounds_are_inclusive() {
        let p = SampleProfile::Fertilizer;
        assert!(SoilSample::new(0.0, 10.0, 6.5, 1.0, p).is_ok());
        assert!(SoilSample::new(5.0, 10.0, 6.5, 1.0, p).is_ok());
        assert!(SoilSample::new(-0.1, 10.0, 6.5, 1.0, p).is_err());
        assert!(SoilSample::new(5.1, 10.0, 6.5, 1.0, p).is_err());
    }

    #[test]
    fn test_profiles_differ_on_phosphorus_and_potassium() {
        assert!(SoilSample::new(1.0, 850.0, 6.5, 1.0, SampleProfile::SoilCarbon).is_ok());
        assert!(SoilSample::new(1.0, 850.0, 6.5, 1.0, SampleProfile::Fertilizer).is_err());
        assert!(SoilSample::new(1.0, 50.0, 6.5, 8.0, SampleProfile::Fertilizer).is_ok());
        assert!(SoilSample::new(1.0, 50.0, 6.5, 8.0, SampleProfile::SoilCarbon).is_err());
    }

    #[test]
    fn test_first_violation_wins() {
        // pH and K both bad; pH is checked first
        let err = SoilSample::new(1.0, 10.0, 2.0, 50.0, SampleProfile::Fertilizer).unwrap_err();
        assert_eq!(err.to_string(), "Soil pH must be between 3-10");
    }

    #[test]
    fn test_range_messages() {
        let err = SoilSample::new(9.0, 10.0, 6.0, 1.0, SampleProfile::Fertilizer).unwrap_err();
        assert_eq!(err.to_string(), "Nitrogen must be between 0-5%");

        let err = SoilSample::new(1.0, 901.0, 6.0, 1.0, SampleProfile::SoilCarbon).unwrap_err();
        assert_eq!(err.to_string(), "Phosphorus must be between 0-900 ppm");

        let err = SoilSample::new(1.0, 10.0, 6.0, 11.0, SampleProfile::Fertilizer).unwrap_err();
        assert_eq!(err.to_string(), "Potassium must be between 0-10 meq%");
        assert_eq!(err.field(), "Potassium");
    }

    #[test]
    fn test_nan_is_out_of_range() {
        assert!(SoilSample::new(f64::NAN, 10.0, 6.0, 1.0, SampleProfile::Fertilizer).is_err());
    }

    #[test]
    fn test_county_capitalization() {
        assert_eq!(normalize_county("kiambu").as_deref(), Some("Kiambu"));
        assert_eq!(normalize_county("  NAKURU ").as_deref(), Some("Nakuru"));
        assert_eq!(normalize_county("mERU").as_deref(), Some("Meru"));
        assert_eq!(normalize_county("   "), None);
    }

    #[test]
    fn test_crop_lowercased() {
        assert_eq!(normalize_crop(" MAIZE ").as_deref(), Some("maize"));
        assert_eq!(normalize_crop(""), None);
    }

    #[test]
    fn test_regional_query_requires_both_fields() {
        assert_eq!(
            RegionalQuery::new("", "maize").unwrap_err(),
            ValidationError::MissingField("county")
        );
        assert_eq!(
            RegionalQuery::new("Kiambu", "  ").unwrap_err(),
            ValidationError::MissingField("crop")
        );
        let q = RegionalQuery::new("kiambu", "MAIZE").unwrap();
        assert_eq!(q.county(), "Kiambu");
        assert_eq!(q.crop(), "maize");
    }

    #[test]
    fn test_fertilizer_query_normalizes_crop() {
        let sample = SoilSample::new(1.0, 10.0, 6.0, 1.0, SampleProfile::Fertilizer).unwrap();
        let q = FertilizerQuery::new(sample, "  Beans").unwrap();
        assert_eq!(q.crop(), "beans");
        assert!(FertilizerQuery::new(sample, "").is_err());
    }
}
