//! Soil parameter forms for the soil-carbon and fertilizer views.

use serde::{Deserialize, Serialize};

use super::{string_or_number, Form, FormError, FormField};
use crate::types::{FertilizerQuery, SampleProfile, SoilSample, ValidationError};

/// The four NPK/pH inputs as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SoilForm {
    #[serde(default, deserialize_with = "string_or_number")]
    pub nitrogen: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub phosphorus: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub soil_ph: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub potassium: String,
}

impl SoilForm {
    pub fn new(
        nitrogen: impl Into<String>,
        phosphorus: impl Into<String>,
        soil_ph: impl Into<String>,
        potassium: impl Into<String>,
    ) -> Self {
        Self {
            nitrogen: nitrogen.into(),
            phosphorus: phosphorus.into(),
            soil_ph: soil_ph.into(),
            potassium: potassium.into(),
        }
    }

    fn fields(&self) -> [(&'static str, &str); 4] {
        [
            ("nitrogen", &self.nitrogen),
            ("phosphorus", &self.phosphorus),
            ("soilPh", &self.soil_ph),
            ("potassium", &self.potassium),
        ]
    }

    /// Fails on the first blank field.
    pub fn check_present(&self) -> Result<(), ValidationError> {
        match self.fields().iter().find(|(_, v)| v.trim().is_empty()) {
            Some(&(name, _)) => Err(ValidationError::MissingField(name)),
            None => Ok(()),
        }
    }

    /// Presence, then numeric parse, then range checks for `profile`.
    pub fn parse(&self, profile: SampleProfile) -> Result<SoilSample, ValidationError> {
        self.check_present()?;

        let mut values = [0.0_f64; 4];
        for (slot, (name, raw)) in values.iter_mut().zip(self.fields()) {
            *slot = raw
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or(ValidationError::NotANumber(name))?;
        }
        let [n, p, ph, k] = values;

        SoilSample::new(n, p, ph, k, profile)
    }

    fn set(&mut self, field: FormField, value: String, form: &'static str) -> Result<(), FormError> {
        match field {
            FormField::Nitrogen => self.nitrogen = value,
            FormField::Phosphorus => self.phosphorus = value,
            FormField::SoilPh => self.soil_ph = value,
            FormField::Potassium => self.potassium = value,
            FormField::Crop | FormField::County => {
                return Err(FormError::NotOnForm { field, form })
            }
        }
        Ok(())
    }
}

// ============================================================================
// Soil Carbon Form
// ============================================================================

/// Soil organic carbon prediction input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarbonForm {
    #[serde(flatten)]
    pub soil: SoilForm,
}

impl Form for CarbonForm {
    type Query = SoilSample;
    const NAME: &'static str = "soil-carbon";

    fn set_field(&mut self, field: FormField, value: String) -> Result<(), FormError> {
        self.soil.set(field, value, Self::NAME)
    }

    fn validate(&self) -> Result<SoilSample, ValidationError> {
        self.soil.parse(SampleProfile::SoilCarbon)
    }
}

// ============================================================================
// Fertilizer Form
// ============================================================================

/// Fertilizer recommendation input: soil parameters plus crop.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FertilizerForm {
    #[serde(flatten)]
    pub soil: SoilForm,
    #[serde(default)]
    pub crop: String,
}

impl Form for FertilizerForm {
    type Query = FertilizerQuery;
    const NAME: &'static str = "fertilizer";

    fn set_field(&mut self, field: FormField, value: String) -> Result<(), FormError> {
        match field {
            FormField::Crop => {
                self.crop = value;
                Ok(())
            }
            other => self.soil.set(other, value, Self::NAME),
        }
    }

    fn validate(&self) -> Result<FertilizerQuery, ValidationError> {
        self.soil.check_present()?;
        if self.crop.trim().is_empty() {
            return Err(ValidationError::MissingField("crop"));
        }
        let sample = self.soil.parse(SampleProfile::Fertilizer)?;
        FertilizerQuery::new(sample, &self.crop)
    }
}
