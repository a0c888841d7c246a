use crate::config::Config;
use crate::errors::AppError;
use crate::models::StoreObject;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};

/// Client for the hosted document store (Cosmic-compatible REST API).
///
/// The store holds all domain records (`counselors`, `students`,
/// `risk-assessments`) as `{id, slug, title, metadata}` objects. This client
/// covers exactly the three calls the application depends on: `find`,
/// `find_one` and `insert_one`.
///
/// No timeout or retry is configured around these calls: each request blocks
/// on the store's answer and a hang or transient failure propagates directly
/// as a request failure.
#[derive(Clone)]
pub struct DocumentStore {
    client: reqwest::Client,
    base_url: String,
    bucket_slug: String,
    read_key: String,
    write_key: String,
}

#[derive(Debug, Deserialize)]
struct FindResponse<M> {
    objects: Vec<StoreObject<M>>,
}

#[derive(Debug, Deserialize)]
struct FindOneResponse<M> {
    object: StoreObject<M>,
}

impl DocumentStore {
    /// Creates a store client from configuration.
    pub fn new(config: &Config) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: config.store_base_url.clone(),
            bucket_slug: config.store_bucket_slug.clone(),
            read_key: config.store_read_key.clone(),
            write_key: config.store_write_key.clone(),
        }
    }

    fn objects_url(&self) -> String {
        format!("{}/v3/buckets/{}/objects", self.base_url, self.bucket_slug)
    }

    /// Fetches all records of the given type, in the store's iteration order.
    ///
    /// `depth` controls reference expansion: 0 returns bare ids, 1 expands
    /// referenced objects inline.
    ///
    /// A no-match query is an upstream 404 and surfaces as
    /// [`AppError::NotFound`]; callers decide whether that means "empty
    /// collection" or a hard failure.
    pub async fn find<M: DeserializeOwned>(
        &self,
        object_type: &str,
        depth: u8,
    ) -> Result<Vec<StoreObject<M>>, AppError> {
        // Encode the query through the URL builder to keep the JSON filter
        // intact regardless of its content.
        let query = json!({ "type": object_type }).to_string();
        let depth_param = depth.to_string();
        let url = reqwest::Url::parse_with_params(
            &self.objects_url(),
            &[
                ("query", query.as_str()),
                ("read_key", self.read_key.as_str()),
                ("props", "id,slug,title,metadata"),
                ("depth", depth_param.as_str()),
            ],
        )
        .map_err(|e| AppError::Upstream {
            message: format!("Failed to build store URL: {}", e),
            details: None,
        })?;

        tracing::debug!("Store find: type={} depth={}", object_type, depth);

        let response = self.client.get(url).send().await.map_err(|e| {
            AppError::Upstream {
                message: format!("Store request failed: {}", e),
                details: None,
            }
        })?;

        let body: FindResponse<M> = Self::decode(response, object_type).await?;
        Ok(body.objects)
    }

    /// Fetches a single record by id, or [`AppError::NotFound`] if the store
    /// has no such object.
    pub async fn find_one<M: DeserializeOwned>(
        &self,
        object_type: &str,
        id: &str,
    ) -> Result<StoreObject<M>, AppError> {
        let url = reqwest::Url::parse_with_params(
            &format!("{}/{}", self.objects_url(), id),
            &[
                ("read_key", self.read_key.as_str()),
                ("props", "id,slug,title,metadata"),
            ],
        )
        .map_err(|e| AppError::Upstream {
            message: format!("Failed to build store URL: {}", e),
            details: None,
        })?;

        tracing::debug!("Store find_one: type={} id={}", object_type, id);

        let response = self.client.get(url).send().await.map_err(|e| {
            AppError::Upstream {
                message: format!("Store request failed: {}", e),
                details: None,
            }
        })?;

        let body: FindOneResponse<M> = Self::decode(response, object_type).await?;
        Ok(body.object)
    }

    /// Creates a record and returns it with its store-assigned identity.
    ///
    /// `metadata` is written exactly as given: omitted optional fields must
    /// already be absent from the map, not present as null.
    pub async fn insert_one(
        &self,
        object_type: &str,
        title: &str,
        metadata: Value,
    ) -> Result<StoreObject<Value>, AppError> {
        let body = json!({
            "title": title,
            "type": object_type,
            "metadata": metadata,
        });

        tracing::info!("Store insert_one: type={} title={}", object_type, title);

        let response = self
            .client
            .post(self.objects_url())
            .header("Authorization", format!("Bearer {}", self.write_key))
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::Upstream {
                message: format!("Store request failed: {}", e),
                details: None,
            })?;

        let body: FindOneResponse<Value> = Self::decode(response, object_type).await?;
        Ok(body.object)
    }

    /// Classifies a store response and decodes its JSON body.
    ///
    /// Upstream 404 becomes `NotFound`; any other non-success status becomes
    /// `Upstream` carrying the status and response body as diagnostic detail.
    async fn decode<T: DeserializeOwned>(
        response: reqwest::Response,
        object_type: &str,
    ) -> Result<T, AppError> {
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            return Err(AppError::NotFound(format!(
                "No '{}' objects found in store",
                object_type
            )));
        }

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            tracing::error!("Store returned {} for '{}': {}", status, object_type, error_text);
            return Err(AppError::Upstream {
                message: format!("Store returned status {}", status),
                details: Some(error_text),
            });
        }

        response.json().await.map_err(|e| AppError::Upstream {
            message: format!("Failed to parse store response: {}", e),
            details: None,
        })
    }
}
