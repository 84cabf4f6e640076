//! Listing of every stored profile with per-row mail/export actions.

use std::path::Path;

use serde_json::Value;

use crate::api::ApiClient;
use crate::notify::Notification;
use crate::record::value_text;
use crate::report::{export_notification, mail_notification};

/// One row of the listing. `id` is a 1-based position assigned on load;
/// `server_id` is the backend's `_id` used by the row actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingRow {
    pub id: usize,
    pub server_id: String,
    pub name: String,
    pub email: String,
    pub age: String,
    pub role: String,
    pub companyname: String,
    pub image: Option<String>,
    pub status: String,
}

impl ListingRow {
    fn from_record(id: usize, record: &Value) -> Self {
        let text = |key: &str| value_text(record.get(key));
        let image = text("image");
        // Older records store the role under `roll`.
        let role = match text("role") {
            role if role.is_empty() => text("roll"),
            role => role,
        };
        Self {
            id,
            server_id: text("_id"),
            name: text("name"),
            email: text("email"),
            age: text("age"),
            role,
            companyname: text("companyname"),
            image: (!image.is_empty()).then_some(image),
            status: text("status"),
        }
    }

    /// Drives the presence dot next to the avatar.
    pub fn is_active(&self) -> bool {
        self.status == "active"
    }
}

#[derive(Debug, Default)]
pub struct ListingView {
    rows: Vec<ListingRow>,
    notification: Option<Notification>,
}

impl ListingView {
    /// Fetch the collection once. A failed fetch leaves the table empty.
    pub async fn mount(api: &ApiClient) -> Self {
        match api.user_list().await {
            Ok(list) => {
                let rows = rows_from(list.data.unwrap_or_default());
                tracing::debug!(rows = rows.len(), "listing loaded");
                Self {
                    rows,
                    notification: None,
                }
            }
            Err(err) => {
                tracing::error!(error = %err, "error fetching listing");
                Self {
                    rows: Vec::new(),
                    notification: Some(Notification::error(format!(
                        "Error fetching data: {}",
                        err
                    ))),
                }
            }
        }
    }

    pub fn rows(&self) -> &[ListingRow] {
        &self.rows
    }

    /// Set when the initial fetch failed.
    pub fn notification(&self) -> Option<&Notification> {
        self.notification.as_ref()
    }

    pub fn row(&self, id: usize) -> Option<&ListingRow> {
        self.rows.iter().find(|row| row.id == id)
    }

    /// `GET /send_mail_id?id=` for the row with synthetic id `id`.
    pub async fn send_mail(&self, api: &ApiClient, id: usize) -> Notification {
        let Some(row) = self.row(id) else {
            return missing_row(id);
        };
        mail_notification(api.send_mail_by_id(&row.server_id).await)
    }

    /// `GET /export_pdf?id=`, saved as `{dir}/data_{_id}.pdf`.
    pub async fn export_pdf(&self, api: &ApiClient, id: usize, dir: &Path) -> Notification {
        let Some(row) = self.row(id) else {
            return missing_row(id);
        };
        let result = api.export_pdf_by_id(&row.server_id).await;
        export_notification(result, dir, &format!("data_{}.pdf", row.server_id)).await
    }
}

fn rows_from(records: Vec<Value>) -> Vec<ListingRow> {
    records
        .iter()
        .enumerate()
        .map(|(index, record)| ListingRow::from_record(index + 1, record))
        .collect()
}

fn missing_row(id: usize) -> Notification {
    Notification::error(format!("No row with id {}", id))
}
