//! Plain-text rendering of prediction results for the terminal.

use std::fmt::Write;

use crate::types::{
    CombinedFertilizerResult, FertilizerResult, OrganicFertilizerResult, PredictionResult,
    RegionalResult,
};

/// Something that can be printed as a short report.
pub trait Report {
    fn render(&self) -> String;
}

impl Report for PredictionResult {
    fn render(&self) -> String {
        let p = &self.input_parameters;
        let mut out = String::new();
        let _ = writeln!(out, "Predicted organic carbon: {:.2}%", self.organic_carbon);
        let _ = writeln!(
            out,
            "  Inputs: N {}%, P {} ppm, pH {}, K {} meq%",
            p.nitrogen, p.phosphorus, p.ph, p.potassium
        );
        out
    }
}

impl Report for FertilizerResult {
    fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "Recommended fertilizer: {} ({:.1}% confidence, {})",
            self.primary_recommendation,
            self.confidence,
            self.confidence_level()
        );
        let _ = writeln!(out, "  Crop: {}", self.input_parameters.crop);
        if !self.all_recommendations.is_empty() {
            let _ = writeln!(out, "  All recommendations:");
            for (i, rec) in self.all_recommendations.iter().enumerate() {
                let _ = writeln!(
                    out,
                    "    {}. {} ({:.1}%, {})",
                    i + 1,
                    rec.fertilizer,
                    rec.confidence,
                    rec.confidence_level()
                );
            }
        }
        write_warnings(&mut out, &self.validation_warnings);
        out
    }
}

impl Report for OrganicFertilizerResult {
    fn render(&self) -> String {
        let ci = &self.confidence_interval;
        let mut out = String::new();
        let _ = writeln!(
            out,
            "Organic fertilizer rate: {:.2} tons/acre",
            self.predicted_rate_tons_per_acre
        );
        let _ = writeln!(
            out,
            "  Range: {:.2} - {:.2} tons/acre (std {:.2})",
            ci.lower, ci.upper, ci.std
        );
        write_warnings(&mut out, &self.validation_warnings);
        out
    }
}

impl Report for CombinedFertilizerResult {
    fn render(&self) -> String {
        format!("{}\n{}", self.fertilizer.render(), self.organic.render())
    }
}

impl Report for RegionalResult {
    fn render(&self) -> String {
        let params = &self.input_parameters;
        let mut out = String::new();
        let _ = writeln!(
            out,
            "Recommended fertilizer for {} in {}: {} ({:.1}% confidence, {})",
            params.crop,
            params.county,
            self.primary_recommendation,
            self.confidence,
            self.confidence_level()
        );
        for rec in &self.all_recommendations {
            let _ = writeln!(
                out,
                "    {}. {} ({:.1}%, {})",
                rec.rank,
                rec.fertilizer,
                rec.confidence,
                rec.confidence_level()
            );
        }
        out
    }
}

fn write_warnings(out: &mut String, warnings: &[String]) {
    if warnings.is_empty() {
        return;
    }
    let _ = writeln!(out, "  Warnings:");
    for w in warnings {
        let _ = writeln!(out, "    - {w}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{RankedRecommendation, RegionalParameters};

    #[test]
    fn test_regional_report_lists_ranks() {
        let result = RegionalResult {
            primary_recommendation: "DAP".to_string(),
            confidence: 72.5,
            all_recommendations: vec![
                RankedRecommendation {
                    fertilizer: "DAP".to_string(),
                    confidence: 72.5,
                    rank: 1,
                },
                RankedRecommendation {
                    fertilizer: "CAN".to_string(),
                    confidence: 40.0,
                    rank: 2,
                },
            ],
            input_parameters: RegionalParameters {
                county: "Kiambu".to_string(),
                crop: "maize".to_string(),
            },
        };
        let text = result.render();
        assert!(text.starts_with("Recommended fertilizer for maize in Kiambu: DAP (72.5% confidence, high)"));
        assert!(text.contains("2. CAN (40.0%, low)"));
    }
}
