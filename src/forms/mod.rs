//! Form state for the three recommendation views
//!
//! A form is a plain struct of string fields exactly as typed by the user.
//! [`Form::validate`] turns it into a typed query or the first validation
//! failure.

mod regional;
mod soil;

pub use regional::RegionalForm;
pub use soil::{CarbonForm, FertilizerForm, SoilForm};

use serde::{Deserialize, Deserializer, Serialize};

use crate::types::ValidationError;

/// Input field names, as the front end sends them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FormField {
    Nitrogen,
    Phosphorus,
    SoilPh,
    Potassium,
    Crop,
    County,
}

impl FormField {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Nitrogen => "nitrogen",
            Self::Phosphorus => "phosphorus",
            Self::SoilPh => "soilPh",
            Self::Potassium => "potassium",
            Self::Crop => "crop",
            Self::County => "county",
        }
    }
}

impl std::fmt::Display for FormField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for FormField {
    type Err = FormError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "nitrogen" => Ok(Self::Nitrogen),
            "phosphorus" => Ok(Self::Phosphorus),
            "soilPh" | "soil_ph" | "ph" => Ok(Self::SoilPh),
            "potassium" => Ok(Self::Potassium),
            "crop" => Ok(Self::Crop),
            "county" => Ok(Self::County),
            other => Err(FormError::UnrecognizedName(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    #[error("Field '{field}' is not part of the {form} form")]
    NotOnForm { field: FormField, form: &'static str },

    #[error("Unknown form field '{0}'")]
    UnrecognizedName(String),
}

/// Editable form backing one workflow.
pub trait Form: Default + Clone + Send + Sync {
    /// Validated, normalized query produced on submit.
    type Query: Send;

    /// Short name used in logs and errors.
    const NAME: &'static str;

    fn set_field(&mut self, field: FormField, value: String) -> Result<(), FormError>;

    /// Check the current input and build the query, stopping at the first failure.
    fn validate(&self) -> Result<Self::Query, ValidationError>;

    fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Accept either a JSON string or a JSON number for a text field.
pub(crate) fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(s) => s,
        Raw::Number(n) => n.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_names_match_front_end() {
        assert_eq!(serde_json::to_value(FormField::SoilPh).unwrap(), "soilPh");
        assert_eq!("soilPh".parse::<FormField>().unwrap(), FormField::SoilPh);
        assert_eq!("county".parse::<FormField>().unwrap(), FormField::County);
        assert!("moisture".parse::<FormField>().is_err());
    }
}
