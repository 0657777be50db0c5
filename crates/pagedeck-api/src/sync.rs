use axum::{extract::State, response::Redirect};
use tracing::error;

use pagedeck_sync::SyncError;
use pagedeck_types::api::FlashLevel;

use crate::state::AppState;

/// GET|POST /sync-data: run a full sync, then back to the dashboard.
///
/// The outcome is reported through flash messages; the response is always a
/// redirect.
pub async fn sync_data(State(state): State<AppState>) -> Redirect {
    match pagedeck_sync::run(state.graph.as_ref(), &state.db).await {
        Ok(summary) => {
            state.flashes.push(FlashLevel::Success, summary.describe());
            for warning in summary.warnings() {
                state.flashes.push(FlashLevel::Warning, warning);
            }
        }
        Err(SyncError::PageListing) => {
            error!("Sync aborted: page listing failed");
            state
                .flashes
                .push(FlashLevel::Error, "Failed to fetch pages from the API.");
        }
        Err(e) => {
            error!("Sync failed: {}", e);
            state
                .flashes
                .push(FlashLevel::Error, format!("Error syncing data: {e}"));
        }
    }

    Redirect::to("/")
}
