//! Hosted document store over the documents REST API.
//!
//! WIRE FORMAT
//! ===========
//! Field values are typed objects: `{"stringValue": "..."}`,
//! `{"integerValue": "42"}` (integers travel as strings),
//! `{"timestampValue": "2024-01-01T00:00:00Z"}`, and so on. Non-scalar values
//! written by other clients are skipped on read.

#[cfg(test)]
#[path = "documents_test.rs"]
mod documents_test;

use std::rc::Rc;

use async_trait::async_trait;
use serde_json::{Map, Value as Json, json};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use super::{Shared, status_error};
use crate::config::PlatformConfig;
use crate::document::{Document, Value};
use crate::error::StoreError;
use crate::store::DocumentStore;

/// [`DocumentStore`] backed by the hosted database.
pub struct HostedDocuments {
    shared: Rc<Shared>,
}

impl HostedDocuments {
    pub(crate) fn new(shared: Rc<Shared>) -> Self {
        Self { shared }
    }

    async fn authorized(&self, request: reqwest::RequestBuilder) -> Result<reqwest::Response, StoreError> {
        let request = match self.shared.bearer().await? {
            Some(token) => request.bearer_auth(token),
            None => request,
        };
        Ok(request.send().await?)
    }
}

#[async_trait(?Send)]
impl DocumentStore for HostedDocuments {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError> {
        let url = document_url(&self.shared.config, collection, id);
        let resp = self.authorized(self.shared.http.get(&url)).await?;
        let status = resp.status().as_u16();
        if status == 404 {
            return Ok(None);
        }
        if !resp.status().is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(status_error(status, &body, &format!("{collection}/{id}")));
        }
        let body: Json = resp.json().await.map_err(|e| StoreError::Decode(e.to_string()))?;
        decode_document(&body).map(Some)
    }

    async fn set(&self, collection: &str, id: &str, doc: Document) -> Result<(), StoreError> {
        let url = document_url(&self.shared.config, collection, id);
        let resp = self.authorized(self.shared.http.patch(&url).json(&encode_document(&doc))).await?;
        expect_success(resp, collection, id).await
    }

    async fn update(&self, collection: &str, id: &str, partial: Document) -> Result<(), StoreError> {
        // Without a field mask the PATCH would replace the whole document.
        if partial.is_empty() {
            return Ok(());
        }
        let url = format!("{}?{}", document_url(&self.shared.config, collection, id), update_query(&partial));
        let resp = self.authorized(self.shared.http.patch(&url).json(&encode_document(&partial))).await?;
        expect_success(resp, collection, id).await
    }
}

async fn expect_success(resp: reqwest::Response, collection: &str, id: &str) -> Result<(), StoreError> {
    if resp.status().is_success() {
        return Ok(());
    }
    let status = resp.status().as_u16();
    let body = resp.text().await.unwrap_or_default();
    let err = status_error(status, &body, &format!("{collection}/{id}"));
    log::error!("hosted documents: write to {collection}/{id} failed: {err}");
    Err(err)
}

fn document_url(config: &PlatformConfig, collection: &str, id: &str) -> String {
    format!(
        "{}/v1/projects/{}/databases/(default)/documents/{}/{}",
        config.endpoints.documents,
        urlencoding::encode(&config.project_id),
        urlencoding::encode(collection),
        urlencoding::encode(id),
    )
}

/// Query string for a merge update: require the document to exist and only
/// touch the fields present in `partial`.
fn update_query(partial: &Document) -> String {
    let mut query = String::from("currentDocument.exists=true");
    for key in partial.keys() {
        query.push_str("&updateMask.fieldPaths=");
        query.push_str(&urlencoding::encode(&field_path(key)));
    }
    query
}

/// Simple identifiers are used as-is; anything else is backtick-quoted.
fn field_path(key: &str) -> String {
    let mut chars = key.chars();
    let simple = chars.next().is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_');
    if simple {
        key.to_owned()
    } else {
        format!("`{}`", key.replace('\\', "\\\\").replace('`', "\\`"))
    }
}

fn encode_document(doc: &Document) -> Json {
    let fields: Map<String, Json> = doc.iter().map(|(k, v)| (k.clone(), encode_value(v))).collect();
    json!({ "fields": fields })
}

fn encode_value(value: &Value) -> Json {
    match value {
        Value::Null => json!({ "nullValue": null }),
        Value::Bool(b) => json!({ "booleanValue": b }),
        Value::Integer(i) => json!({ "integerValue": i.to_string() }),
        Value::Double(d) => json!({ "doubleValue": d }),
        Value::String(s) => json!({ "stringValue": s }),
        Value::Timestamp(ts) => {
            let formatted = ts.format(&Rfc3339).unwrap_or_else(|_| ts.unix_timestamp().to_string());
            json!({ "timestampValue": formatted })
        }
    }
}

fn decode_document(body: &Json) -> Result<Document, StoreError> {
    let Some(fields) = body.get("fields") else {
        return Ok(Document::new());
    };
    let fields = fields
        .as_object()
        .ok_or_else(|| StoreError::Decode("document fields is not an object".to_owned()))?;
    let mut doc = Document::new();
    for (key, raw) in fields {
        match decode_value(raw)? {
            Some(value) => {
                doc.insert(key.clone(), value);
            }
            None => log::debug!("hosted documents: skipping non-scalar field {key}"),
        }
    }
    Ok(doc)
}

fn decode_value(raw: &Json) -> Result<Option<Value>, StoreError> {
    let Some(object) = raw.as_object() else {
        return Err(StoreError::Decode(format!("field value is not an object: {raw}")));
    };
    let Some((kind, inner)) = object.iter().next() else {
        return Err(StoreError::Decode("empty field value".to_owned()));
    };
    let bad = || StoreError::Decode(format!("invalid {kind}: {inner}"));
    let value = match kind.as_str() {
        "nullValue" => Value::Null,
        "booleanValue" => Value::Bool(inner.as_bool().ok_or_else(bad)?),
        "integerValue" => {
            let parsed = match inner {
                Json::String(s) => s.parse::<i64>().ok(),
                other => other.as_i64(),
            };
            Value::Integer(parsed.ok_or_else(bad)?)
        }
        "doubleValue" => Value::Double(inner.as_f64().ok_or_else(bad)?),
        "stringValue" => Value::String(inner.as_str().ok_or_else(bad)?.to_owned()),
        "timestampValue" => {
            let raw_ts = inner.as_str().ok_or_else(bad)?;
            Value::Timestamp(OffsetDateTime::parse(raw_ts, &Rfc3339).map_err(|_| bad())?)
        }
        _ => return Ok(None),
    };
    Ok(Some(value))
}
