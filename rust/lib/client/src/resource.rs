use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use catalog_types::{EntityId, Resource};
use reqwest::Method;

use crate::transport::Transport;
use crate::{ApiError, RemoteStore};

/// How a changed record is sent back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateVerb {
    /// `PUT {collection}/{id}`.
    Put,
    /// `POST {collection}` with the id in the body; the server upserts.
    Upsert,
}

/// Type-safe CRUD client for one collection.
///
/// Top-level collections live at `{base}/api/{T::PATH}`; nested ones at
/// `{base}/api/{parent}/{parent_id}/{T::PATH}`.
pub struct ResourceClient<T: Resource> {
    transport: Arc<Transport>,
    prefix: String,
    update_verb: UpdateVerb,
    _phantom: PhantomData<T>,
}

impl<T: Resource> Clone for ResourceClient<T> {
    fn clone(&self) -> Self {
        Self {
            transport: self.transport.clone(),
            prefix: self.prefix.clone(),
            update_verb: self.update_verb,
            _phantom: PhantomData,
        }
    }
}

impl<T: Resource> ResourceClient<T> {
    pub(crate) fn new(transport: Arc<Transport>) -> Self {
        Self {
            transport,
            prefix: String::new(),
            update_verb: UpdateVerb::Put,
            _phantom: PhantomData,
        }
    }

    /// A collection nested under `{parent}/{parent_id}`. Nested
    /// collections have no PUT; updates go through the upserting POST.
    pub(crate) fn nested(transport: Arc<Transport>, parent: &str, parent_id: EntityId) -> Self {
        Self {
            transport,
            prefix: format!("{}/{}/", parent, parent_id),
            update_verb: UpdateVerb::Upsert,
            _phantom: PhantomData,
        }
    }

    pub fn update_verb(&self) -> UpdateVerb {
        self.update_verb
    }

    pub fn collection_url(&self) -> String {
        self.transport.api_url(&format!("{}{}", self.prefix, T::PATH))
    }

    pub fn item_url(&self, id: EntityId) -> String {
        format!("{}/{}", self.collection_url(), id)
    }

    /// Fetch the whole collection.
    ///
    /// Accepts a bare JSON array or an object wrapping the array under
    /// [`Resource::envelope_key`].
    pub async fn list(&self) -> Result<Vec<T>, ApiError> {
        let body: serde_json::Value = self
            .transport
            .call::<(), _>(Method::GET, &self.collection_url(), None)
            .await?;
        unwrap_list(body)
    }

    pub async fn get(&self, id: EntityId) -> Result<T, ApiError> {
        self.transport
            .call::<(), _>(Method::GET, &self.item_url(id), None)
            .await
    }

    /// POST a new record; returns the record as stored by the server.
    pub async fn create(&self, item: &T) -> Result<T, ApiError> {
        self.transport
            .call(Method::POST, &self.collection_url(), Some(item))
            .await
    }

    /// Send a changed record; returns the record as stored by the server.
    pub async fn update(&self, id: EntityId, item: &T) -> Result<T, ApiError> {
        match self.update_verb {
            UpdateVerb::Put => {
                self.transport
                    .call(Method::PUT, &self.item_url(id), Some(item))
                    .await
            }
            UpdateVerb::Upsert => self.create(item).await,
        }
    }

    /// DELETE by id. Only the status is checked.
    pub async fn remove(&self, id: EntityId) -> Result<(), ApiError> {
        self.transport
            .call_empty(Method::DELETE, &self.item_url(id))
            .await
    }
}

fn unwrap_list<T: Resource>(body: serde_json::Value) -> Result<Vec<T>, ApiError> {
    let items = match body {
        serde_json::Value::Array(items) => serde_json::Value::Array(items),
        serde_json::Value::Object(mut map) => map
            .remove(T::envelope_key())
            .ok_or_else(|| ApiError::Decode(format!("{} list: missing \"{}\"", T::NAME, T::envelope_key())))?,
        other => {
            return Err(ApiError::Decode(format!(
                "{} list: unexpected {}",
                T::NAME,
                json_kind(&other)
            )))
        }
    };
    serde_json::from_value(items).map_err(|e| ApiError::Decode(format!("{} list: {}", T::NAME, e)))
}

fn json_kind(v: &serde_json::Value) -> &'static str {
    match v {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

#[async_trait]
impl<T: Resource> RemoteStore<T> for ResourceClient<T> {
    async fn list(&self) -> Result<Vec<T>, ApiError> {
        ResourceClient::list(self).await
    }

    async fn create(&self, item: &T) -> Result<T, ApiError> {
        ResourceClient::create(self, item).await
    }

    async fn update(&self, id: EntityId, item: &T) -> Result<T, ApiError> {
        ResourceClient::update(self, id, item).await
    }

    async fn remove(&self, id: EntityId) -> Result<(), ApiError> {
        ResourceClient::remove(self, id).await
    }
}
