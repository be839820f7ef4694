//! Smart Farm Dashboard
//!
//! Client and dashboard model for hosted soil and fertilizer prediction
//! services.
//!
//! ## Architecture
//!
//! - **Types**: validated soil samples, request payloads, response shapes
//! - **Client**: the [`Recommender`] seam and its reqwest implementation
//! - **Forms / Workflow**: raw user input, validation, and the per-view
//!   submission state machine
//! - **Dashboard**: view selection over the three workflows
//! - **API**: axum HTTP surface over the dashboard and the client

pub mod api;
pub mod client;
pub mod config;
pub mod dashboard;
pub mod forms;
pub mod report;
pub mod types;
pub mod workflow;

// Re-export configuration
pub use config::DashboardConfig;

// Re-export commonly used types
pub use types::{
    CombinedFertilizerResult, ConfidenceLevel, FertilizerQuery, FertilizerResult,
    OrganicFertilizerResult, PredictionResult, RegionalQuery, RegionalResult, SampleProfile,
    SoilSample, ValidationError,
};

// Re-export the client seam
pub use client::{ClientError, Endpoint, RecommendationClient, Recommender};

// Re-export dashboard state
pub use dashboard::{Dashboard, DashboardView};
pub use workflow::{Workflow, WorkflowState};
