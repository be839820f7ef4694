//! County + crop form for the region-based recommendation view.

use serde::{Deserialize, Serialize};

use super::{Form, FormError, FormField};
use crate::types::{RegionalQuery, ValidationError};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionalForm {
    #[serde(default)]
    pub county: String,
    #[serde(default)]
    pub crop: String,
}

impl RegionalForm {
    pub fn new(county: impl Into<String>, crop: impl Into<String>) -> Self {
        Self {
            county: county.into(),
            crop: crop.into(),
        }
    }
}

impl Form for RegionalForm {
    type Query = RegionalQuery;
    const NAME: &'static str = "regional";

    fn set_field(&mut self, field: FormField, value: String) -> Result<(), FormError> {
        match field {
            FormField::County => self.county = value,
            FormField::Crop => self.crop = value,
            other => {
                return Err(FormError::NotOnForm {
                    field: other,
                    form: Self::NAME,
                })
            }
        }
        Ok(())
    }

    /// Non-empty county and crop after trimming; normalization happens in the query.
    fn validate(&self) -> Result<RegionalQuery, ValidationError> {
        RegionalQuery::new(&self.county, &self.crop)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_inputs_rejected() {
        assert!(RegionalForm::new("  ", "maize").validate().is_err());
        assert!(RegionalForm::new("Meru", "").validate().is_err());
    }

    #[test]
    fn test_query_is_normalized() {
        let q = RegionalForm::new("kiambu", "MAIZE").validate().unwrap();
        assert_eq!(q.county(), "Kiambu");
        assert_eq!(q.crop(), "maize");
    }

    #[test]
    fn test_soil_fields_not_on_form() {
        let mut form = RegionalForm::default();
        assert!(form.set_field(FormField::Nitrogen, "1".to_string()).is_err());
        form.set_field(FormField::County, "Nakuru".to_string()).unwrap();
        assert_eq!(form.county, "Nakuru");
    }
}
