// Posts API HTTP client.
// Issues GET/PATCH requests against a fixed base URL and converts error statuses.

use reqwest::{
    Client, Response, StatusCode,
    header::{CONTENT_TYPE, HeaderMap, HeaderValue, USER_AGENT},
};
use serde::Serialize;

use crate::error::{PostdeckError, Result};

/// HTTP client bound to a single API base URL.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Create a client for the given base URL. A trailing slash is ignored.
    pub fn new(base_url: &str) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(USER_AGENT, HeaderValue::from_static("postdeck"));

        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(PostdeckError::Api)?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    /// Make a GET request.
    pub async fn get(&self, endpoint: &str) -> Result<Response> {
        let response = self
            .client
            .get(self.url(endpoint))
            .send()
            .await
            .map_err(PostdeckError::Api)?;

        check_response(response).await
    }

    /// Make a GET request with query parameters.
    pub async fn get_with_params<T: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        params: &T,
    ) -> Result<Response> {
        let response = self
            .client
            .get(self.url(endpoint))
            .query(params)
            .send()
            .await
            .map_err(PostdeckError::Api)?;

        check_response(response).await
    }

    /// Make a PATCH request with a JSON body.
    pub async fn patch_json<T: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        body: &T,
    ) -> Result<Response> {
        let response = self
            .client
            .patch(self.url(endpoint))
            .json(body)
            .send()
            .await
            .map_err(PostdeckError::Api)?;

        check_response(response).await
    }
}

/// Check response status and convert errors.
async fn check_response(response: Response) -> Result<Response> {
    match response.status() {
        status if status.is_success() => Ok(response),
        StatusCode::NOT_FOUND => Err(PostdeckError::NotFound(response.url().to_string())),
        status => Err(PostdeckError::Status {
            status: status.as_u16(),
            body: response.text().await.unwrap_or_default(),
        }),
    }
}
