use serde::Serialize;

use super::domain::StudentId;
use super::repository::{ApplicationMarkerStore, MarkerStoreError};

pub const UNDER_REVIEW: &str = "Under Review";

/// Screens the registration flow can hand off to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Route {
    Home,
    Status,
}

impl Route {
    pub const fn path(self) -> &'static str {
        match self {
            Route::Home => "/",
            Route::Status => "/status",
        }
    }
}

/// What the status page renders after a registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum StatusView {
    Redirect { to: Route },
    Submitted {
        application_id: StudentId,
        status: &'static str,
    },
}

/// Show the stored application, or send the visitor home when there is none.
pub fn resolve_status(
    marker: &dyn ApplicationMarkerStore,
) -> Result<StatusView, MarkerStoreError> {
    Ok(match marker.get()? {
        Some(application_id) => StatusView::Submitted {
            application_id,
            status: UNDER_REVIEW,
        },
        None => StatusView::Redirect { to: Route::Home },
    })
}
