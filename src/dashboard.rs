//! Dashboard view selection and the three recommendation workflows
//!
//! The dashboard is a single owned value: the selected view plus one
//! workflow per form. Handlers receive it explicitly; nothing is global.
//!
//! Submitting is split in three so the caller can release its lock while
//! the request is in flight:
//!
//! 1. [`Dashboard::begin_submit`] validates and hands out a [`PendingSubmission`]
//! 2. [`PendingSubmission::execute`] calls the recommender (no dashboard access)
//! 3. [`Dashboard::complete`] records the outcome unless it went stale

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::client::{ClientError, Recommender};
use crate::forms::{CarbonForm, FertilizerForm, FormError, FormField, RegionalForm};
use crate::types::{
    CombinedFertilizerResult, FertilizerQuery, PredictionResult, RegionalQuery, RegionalResult,
    SoilSample,
};
use crate::workflow::{Submission, Ticket, Workflow};

// ============================================================================
// Views
// ============================================================================

/// Which page the dashboard shows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DashboardView {
    #[default]
    Home,
    SoilCarbon,
    Fertilizer,
    Regional,
}

impl DashboardView {
    pub const ALL: [Self; 4] = [Self::Home, Self::SoilCarbon, Self::Fertilizer, Self::Regional];

    pub const fn title(self) -> &'static str {
        match self {
            Self::Home => "Dashboard Home",
            Self::SoilCarbon => "Soil Carbon Prediction",
            Self::Fertilizer => "Fertilizer Recommendation",
            Self::Regional => "Regional Recommendation",
        }
    }

    pub const fn slug(self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::SoilCarbon => "soil-carbon",
            Self::Fertilizer => "fertilizer",
            Self::Regional => "regional",
        }
    }

    pub const fn has_form(self) -> bool {
        !matches!(self, Self::Home)
    }
}

impl std::fmt::Display for DashboardView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.slug())
    }
}

impl std::str::FromStr for DashboardView {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|v| v.slug() == s)
            .ok_or_else(|| format!("Unknown view '{s}'"))
    }
}

/// Sidebar entry.
#[derive(Debug, Clone, Serialize)]
pub struct NavigationItem {
    pub title: &'static str,
    pub view: DashboardView,
}

/// Sidebar entries in display order.
pub fn navigation_items() -> Vec<NavigationItem> {
    DashboardView::ALL
        .into_iter()
        .map(|view| NavigationItem {
            title: view.title(),
            view,
        })
        .collect()
}

// ============================================================================
// Dashboard
// ============================================================================

pub type CarbonWorkflow = Workflow<CarbonForm, PredictionResult>;
pub type FertilizerWorkflow = Workflow<FertilizerForm, CombinedFertilizerResult>;
pub type RegionalWorkflow = Workflow<RegionalForm, RegionalResult>;

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum DashboardError {
    #[error("The {0} view has no form")]
    NoForm(DashboardView),

    #[error(transparent)]
    Form(#[from] FormError),
}

/// Selected view plus per-view workflow state.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Dashboard {
    view: DashboardView,
    soil_carbon: CarbonWorkflow,
    fertilizer: FertilizerWorkflow,
    regional: RegionalWorkflow,
}

impl Dashboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> DashboardView {
        self.view
    }

    pub fn soil_carbon(&self) -> &CarbonWorkflow {
        &self.soil_carbon
    }

    pub fn fertilizer(&self) -> &FertilizerWorkflow {
        &self.fertilizer
    }

    pub fn regional(&self) -> &RegionalWorkflow {
        &self.regional
    }

    /// Switch views. Leaving a form view discards its input and result.
    pub fn navigate(&mut self, view: DashboardView) {
        if view == self.view {
            return;
        }
        match self.view {
            DashboardView::Home => {}
            DashboardView::SoilCarbon => self.soil_carbon.reset(),
            DashboardView::Fertilizer => self.fertilizer.reset(),
            DashboardView::Regional => self.regional.reset(),
        }
        info!(from = %self.view, to = %view, "Navigated");
        self.view = view;
    }

    pub fn handle_input_change(
        &mut self,
        view: DashboardView,
        field: FormField,
        value: impl Into<String>,
    ) -> Result<(), DashboardError> {
        match view {
            DashboardView::Home => return Err(DashboardError::NoForm(view)),
            DashboardView::SoilCarbon => self.soil_carbon.handle_input_change(field, value)?,
            DashboardView::Fertilizer => self.fertilizer.handle_input_change(field, value)?,
            DashboardView::Regional => self.regional.handle_input_change(field, value)?,
        }
        Ok(())
    }

    pub fn reset(&mut self, view: DashboardView) -> Result<(), DashboardError> {
        match view {
            DashboardView::Home => return Err(DashboardError::NoForm(view)),
            DashboardView::SoilCarbon => self.soil_carbon.reset(),
            DashboardView::Fertilizer => self.fertilizer.reset(),
            DashboardView::Regional => self.regional.reset(),
        }
        Ok(())
    }

    /// Validate the view's form. `Ok(None)` means validation failed and the
    /// workflow now holds the message.
    pub fn begin_submit(
        &mut self,
        view: DashboardView,
    ) -> Result<Option<PendingSubmission>, DashboardError> {
        Ok(match view {
            DashboardView::Home => return Err(DashboardError::NoForm(view)),
            DashboardView::SoilCarbon => self
                .soil_carbon
                .begin_submit()
                .map(PendingSubmission::SoilCarbon),
            DashboardView::Fertilizer => self
                .fertilizer
                .begin_submit()
                .map(PendingSubmission::Fertilizer),
            DashboardView::Regional => self
                .regional
                .begin_submit()
                .map(PendingSubmission::Regional),
        })
    }

    /// Record a finished submission. Returns `false` if it was stale.
    pub fn complete(&mut self, done: CompletedSubmission) -> bool {
        match done {
            CompletedSubmission::SoilCarbon(ticket, outcome) => self.soil_carbon.complete(ticket, outcome),
            CompletedSubmission::Fertilizer(ticket, outcome) => self.fertilizer.complete(ticket, outcome),
            CompletedSubmission::Regional(ticket, outcome) => self.regional.complete(ticket, outcome),
        }
    }
}

// ============================================================================
// Submissions
// ============================================================================

/// Validated query waiting to be sent.
#[derive(Debug)]
pub enum PendingSubmission {
    SoilCarbon(Submission<SoilSample>),
    Fertilizer(Submission<FertilizerQuery>),
    Regional(Submission<RegionalQuery>),
}

/// Outcome of a sent query, tagged with its ticket.
#[derive(Debug)]
pub enum CompletedSubmission {
    SoilCarbon(Ticket, Result<PredictionResult, ClientError>),
    Fertilizer(Ticket, Result<CombinedFertilizerResult, ClientError>),
    Regional(Ticket, Result<RegionalResult, ClientError>),
}

impl PendingSubmission {
    pub fn view(&self) -> DashboardView {
        match self {
            Self::SoilCarbon(_) => DashboardView::SoilCarbon,
            Self::Fertilizer(_) => DashboardView::Fertilizer,
            Self::Regional(_) => DashboardView::Regional,
        }
    }

    /// Send the query. The fertilizer view always runs the combined call.
    pub async fn execute(self, recommender: &dyn Recommender) -> CompletedSubmission {
        match self {
            Self::SoilCarbon(Submission { ticket, query }) => {
                CompletedSubmission::SoilCarbon(ticket, recommender.predict_soil_carbon(&query).await)
            }
            Self::Fertilizer(Submission { ticket, query }) => CompletedSubmission::Fertilizer(
                ticket,
                recommender.predict_fertilizer_combined(&query).await,
            ),
            Self::Regional(Submission { ticket, query }) => {
                CompletedSubmission::Regional(ticket, recommender.predict_regional(&query).await)
            }
        }
    }
}
