use std::time::Duration;

use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Response, Url};

use crate::api::error::{ApiError, ErrorBody};
use crate::api::types::{ProfileSubmission, UserList};
use crate::config::ApiConfig;
use crate::record::SubmissionResult;

/// Typed access to the backend endpoints.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base: Url,
}

impl ApiClient {
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let mut base = Url::parse(&config.base_url).map_err(|e| ApiError::InvalidUrl {
            url: config.base_url.clone(),
            message: e.to_string(),
        })?;
        // Url::join replaces the last segment unless the path ends in '/'
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(u64::from(config.timeout_seconds)))
            .connect_timeout(Duration::from_secs(u64::from(config.connect_timeout_seconds)))
            .build()
            .map_err(ApiError::Client)?;

        Ok(Self { client, base })
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.base.join(path).map_err(|e| ApiError::InvalidUrl {
            url: format!("{}{}", self.base, path),
            message: e.to_string(),
        })
    }

    fn endpoint_with_id(&self, path: &str, id: &str) -> Result<Url, ApiError> {
        let mut url = self.endpoint(path)?;
        url.query_pairs_mut().append_pair("id", id);
        Ok(url)
    }

    /// Sends the request and turns non-2xx statuses into [`ApiError::Status`].
    async fn execute(&self, request: RequestBuilder, url: &Url) -> Result<Response, ApiError> {
        let response = request.send().await.map_err(|source| ApiError::Network {
            url: url.to_string(),
            source,
        })?;

        let status = response.status();
        if status.is_success() {
            tracing::debug!(url = %url, status = status.as_u16(), "request succeeded");
            return Ok(response);
        }

        let body = response
            .json::<ErrorBody>()
            .await
            .map_err(|source| ApiError::Decode {
                url: url.to_string(),
                source,
            })?;
        tracing::debug!(url = %url, status = status.as_u16(), ?body, "request rejected");
        Err(ApiError::Status {
            url: url.to_string(),
            status: status.as_u16(),
            body,
        })
    }

    async fn read_bytes(response: Response, url: &Url) -> Result<Vec<u8>, ApiError> {
        let bytes = response.bytes().await.map_err(|source| ApiError::Decode {
            url: url.to_string(),
            source,
        })?;
        Ok(bytes.to_vec())
    }

    /// `POST /add_user` as multipart; returns the stored record.
    pub async fn add_user(
        &self,
        profile: ProfileSubmission,
    ) -> Result<SubmissionResult, ApiError> {
        let url = self.endpoint("add_user")?;
        let mut form = Form::new()
            .text("email", profile.email)
            .text("name", profile.name)
            .text("age", profile.age)
            .text("role", profile.role)
            .text("companyname", profile.companyname);

        if let Some(file) = profile.file {
            let file_name = file.file_name().to_string();
            let mime = file.mime().to_string();
            let part = Part::bytes(file.into_bytes())
                .file_name(file_name)
                .mime_str(&mime)
                .map_err(ApiError::Multipart)?;
            form = form.part("file", part);
        }

        let response = self
            .execute(self.client.post(url.clone()).multipart(form), &url)
            .await?;
        response
            .json::<SubmissionResult>()
            .await
            .map_err(|source| ApiError::Decode {
                url: url.to_string(),
                source,
            })
    }

    /// `POST /send_mail` with the full record.
    pub async fn send_mail(&self, record: &SubmissionResult) -> Result<(), ApiError> {
        let url = self.endpoint("send_mail")?;
        self.execute(self.client.post(url.clone()).json(record), &url)
            .await?;
        Ok(())
    }

    /// `GET /send_mail_id?id=`.
    pub async fn send_mail_by_id(&self, id: &str) -> Result<(), ApiError> {
        let url = self.endpoint_with_id("send_mail_id", id)?;
        self.execute(self.client.get(url.clone()), &url).await?;
        Ok(())
    }

    /// `POST /export_pdf` with the full record; returns the PDF bytes.
    pub async fn export_pdf(&self, record: &SubmissionResult) -> Result<Vec<u8>, ApiError> {
        let url = self.endpoint("export_pdf")?;
        let response = self
            .execute(self.client.post(url.clone()).json(record), &url)
            .await?;
        Self::read_bytes(response, &url).await
    }

    /// `GET /export_pdf?id=`; returns the PDF bytes.
    pub async fn export_pdf_by_id(&self, id: &str) -> Result<Vec<u8>, ApiError> {
        let url = self.endpoint_with_id("export_pdf", id)?;
        let response = self.execute(self.client.get(url.clone()), &url).await?;
        Self::read_bytes(response, &url).await
    }

    /// `GET /getuserlist`.
    pub async fn user_list(&self) -> Result<UserList, ApiError> {
        let url = self.endpoint("getuserlist")?;
        let response = self.execute(self.client.get(url.clone()), &url).await?;
        response
            .json::<UserList>()
            .await
            .map_err(|source| ApiError::Decode {
                url: url.to_string(),
                source,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base_url: &str) -> ApiClient {
        ApiClient::new(&ApiConfig {
            base_url: base_url.to_string(),
            ..ApiConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn endpoints_join_onto_base() {
        let api = client("http://localhost:3100");
        assert_eq!(
            api.endpoint("add_user").unwrap().as_str(),
            "http://localhost:3100/add_user"
        );
    }

    #[test]
    fn base_path_is_kept() {
        let api = client("http://example.com/api");
        assert_eq!(
            api.endpoint("getuserlist").unwrap().as_str(),
            "http://example.com/api/getuserlist"
        );
    }

    #[test]
    fn ids_are_query_encoded() {
        let api = client("http://localhost:3100/");
        assert_eq!(
            api.endpoint_with_id("export_pdf", "a b&c").unwrap().as_str(),
            "http://localhost:3100/export_pdf?id=a+b%26c"
        );
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let err = ApiClient::new(&ApiConfig {
            base_url: "not a url".to_string(),
            ..ApiConfig::default()
        })
        .unwrap_err();
        assert!(matches!(err, ApiError::InvalidUrl { .. }));
    }
}
