//! Read-only report of the last submitted profile, with mail and PDF export.

use std::path::{Path, PathBuf};

use crate::api::{ApiClient, ApiError};
use crate::notify::Notification;
use crate::record::{ProfileView, SubmissionResult};
use crate::route::{Redirect, Route};
use crate::store::RecordStore;

pub const MAIL_SENT_MESSAGE: &str = "Mail sent successfully!";
pub const MAIL_UNEXPECTED_MESSAGE: &str =
    "Unexpected error occurred while sending mail. Please try again later.";
pub const EXPORTED_MESSAGE: &str = "Data exported successfully!";
pub const EXPORT_UNEXPECTED_MESSAGE: &str =
    "Unexpected error occurred while exporting data. Please try again later.";

/// Result of opening the report page.
#[derive(Debug)]
pub enum ReportMount {
    /// Nothing was submitted yet; go back to the form.
    Redirect(Redirect),
    Ready(ReportPage),
}

#[derive(Debug)]
pub struct ReportPage {
    record: SubmissionResult,
    view: ProfileView,
    loading: bool,
}

impl ReportPage {
    /// Load the persisted record. An absent or empty record redirects to the
    /// form before anything is rendered.
    pub fn mount(records: &RecordStore) -> ReportMount {
        match records.load() {
            Some(record) => {
                let view = ProfileView::from(&record);
                ReportMount::Ready(Self {
                    record,
                    view,
                    loading: false,
                })
            }
            None => {
                tracing::debug!("no stored record, redirecting to form");
                ReportMount::Redirect(Redirect::now(Route::Form))
            }
        }
    }

    pub fn view(&self) -> &ProfileView {
        &self.view
    }

    pub fn record(&self) -> &SubmissionResult {
        &self.record
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Mail the stored record. Does not touch persisted state.
    pub async fn send_mail(&mut self, api: &ApiClient) -> Notification {
        self.loading = true;
        let result = api.send_mail(&self.record).await;
        self.loading = false;
        mail_notification(result)
    }

    /// Export the stored record as `{dir}/{name}.pdf`.
    pub async fn export_data(&mut self, api: &ApiClient, dir: &Path) -> Notification {
        self.loading = true;
        let result = api.export_pdf(&self.record).await;
        let file_name = format!("{}.pdf", self.view.name);
        let notification = export_notification(result, dir, &file_name).await;
        self.loading = false;
        notification
    }
}

/// Notification for a finished mail action.
pub(crate) fn mail_notification(result: Result<(), ApiError>) -> Notification {
    match result {
        Ok(()) => {
            tracing::info!("mail sent");
            Notification::success(MAIL_SENT_MESSAGE)
        }
        Err(ApiError::Status { status, body, .. }) => {
            tracing::warn!(status, ?body, "mail rejected");
            Notification::error(format!(
                "Error sending mail: {}",
                body.detail().unwrap_or_default()
            ))
        }
        Err(err) => {
            tracing::error!(error = %err, "mail request failed");
            Notification::error(MAIL_UNEXPECTED_MESSAGE)
        }
    }
}

/// Write a downloaded PDF and build the matching notification.
pub(crate) async fn export_notification(
    result: Result<Vec<u8>, ApiError>,
    dir: &Path,
    file_name: &str,
) -> Notification {
    match result {
        Ok(pdf) => match save_download(dir, file_name, &pdf).await {
            Ok(path) => {
                tracing::info!(path = %path.display(), bytes = pdf.len(), "export saved");
                Notification::success(EXPORTED_MESSAGE)
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to save export");
                Notification::error(EXPORT_UNEXPECTED_MESSAGE)
            }
        },
        Err(ApiError::Status { status, body, .. }) => {
            tracing::warn!(status, ?body, "export rejected");
            Notification::error(format!(
                "Error exporting data: {}",
                body.detail().unwrap_or_default()
            ))
        }
        Err(err) => {
            tracing::error!(error = %err, "export request failed");
            Notification::error(EXPORT_UNEXPECTED_MESSAGE)
        }
    }
}

async fn save_download(dir: &Path, file_name: &str, bytes: &[u8]) -> std::io::Result<PathBuf> {
    tokio::fs::create_dir_all(dir).await?;
    let path = dir.join(sanitize_filename::sanitize(file_name));
    tokio::fs::write(&path, bytes).await?;
    Ok(path)
}
