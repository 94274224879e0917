#![forbid(unsafe_code)]

use crate::protocol::{
    CreateParams, DeleteParams, IdParams, ListParams, MoveParams, Request, UpdateParams,
    category_json, category_list_json, error_response, ok_response, page_json, violation_json,
};
use catalog_storage::{SqliteStore, StoreError};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value, json};

const STATUS_OK: u16 = 200;
const STATUS_CREATED: u16 = 201;
const STATUS_NO_CONTENT: u16 = 204;
const STATUS_BAD_REQUEST: u16 = 400;
const STATUS_NOT_FOUND: u16 = 404;

#[derive(Debug)]
pub(crate) enum DispatchError {
    Parse(String),
    InvalidRequest(String),
    InvalidParams(String),
    UnknownMethod(String),
    Store(StoreError),
}

impl DispatchError {
    fn status(&self) -> u16 {
        match self {
            Self::Parse(_) | Self::InvalidRequest(_) | Self::InvalidParams(_) => STATUS_BAD_REQUEST,
            Self::UnknownMethod(_) => STATUS_NOT_FOUND,
            Self::Store(err) => err.status_code(),
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Self::Parse(_) => "parse_error",
            Self::InvalidRequest(_) => "invalid_request",
            Self::InvalidParams(_) => "invalid_params",
            Self::UnknownMethod(_) => "unknown_method",
            Self::Store(err) => err.kind(),
        }
    }
}

impl std::fmt::Display for DispatchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(message) => write!(f, "parse error: {message}"),
            Self::InvalidRequest(message) => write!(f, "invalid request: {message}"),
            Self::InvalidParams(message) => write!(f, "invalid params: {message}"),
            Self::UnknownMethod(method) => write!(f, "unknown method: {method}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl From<StoreError> for DispatchError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// Routes one request line to the store and renders the response envelope.
pub(crate) struct CatalogServer {
    store: SqliteStore,
}

impl CatalogServer {
    pub(crate) fn new(store: SqliteStore) -> Self {
        Self { store }
    }

    pub(crate) fn handle_bytes(&mut self, raw: &[u8]) -> Option<Value> {
        match std::str::from_utf8(raw) {
            Ok(text) => self.handle_line(text),
            Err(err) => Some(render_error(
                None,
                &DispatchError::Parse(format!("line is not valid UTF-8: {err}")),
            )),
        }
    }

    /// `None` for blank lines; every other line gets exactly one response.
    pub(crate) fn handle_line(&mut self, raw: &str) -> Option<Value> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }

        let data: Value = match serde_json::from_str(raw) {
            Ok(v) => v,
            Err(err) => return Some(render_error(None, &DispatchError::Parse(err.to_string()))),
        };
        let id = data.get("id").cloned();
        let request: Request = match serde_json::from_value(data) {
            Ok(v) => v,
            Err(err) => {
                return Some(render_error(
                    id,
                    &DispatchError::InvalidRequest(err.to_string()),
                ));
            }
        };

        Some(self.handle(request))
    }

    pub(crate) fn handle(&mut self, request: Request) -> Value {
        let Request { id, method, params } = request;
        let params = params.unwrap_or_else(|| Value::Object(Map::new()));

        match self.dispatch(&method, params) {
            Ok((status, result)) => {
                tracing::debug!(method = %method, status, "request handled");
                ok_response(id, status, result)
            }
            Err(err) => {
                if err.status() >= 500 {
                    tracing::error!(method = %method, error = %err, "request failed");
                } else {
                    tracing::debug!(method = %method, kind = err.kind(), "request rejected");
                }
                render_error(id, &err)
            }
        }
    }

    fn dispatch(&mut self, method: &str, params: Value) -> Result<(u16, Value), DispatchError> {
        match method {
            "category.create" => {
                let params: CreateParams = parse_params(params)?;
                let created = self.store.category_create(params.into())?;
                Ok((STATUS_CREATED, category_json(&created)))
            }
            "category.get" => {
                let params: IdParams = parse_params(params)?;
                let category = self.store.category_get(params.id)?;
                Ok((STATUS_OK, category_json(&category)))
            }
            "category.list" => {
                let params: ListParams = parse_params(params)?;
                let page = self.store.category_list(params.into())?;
                Ok((STATUS_OK, page_json(&page)))
            }
            "category.update" => {
                let params: UpdateParams = parse_params(params)?;
                let id = params.id;
                let updated = self.store.category_update(id, params.into())?;
                Ok((STATUS_OK, category_json(&updated)))
            }
            "category.move" => {
                let params: MoveParams = parse_params(params)?;
                let moved =
                    self.store
                        .category_move(params.id, params.parent_id, params.expected_version)?;
                Ok((STATUS_OK, category_json(&moved)))
            }
            "category.delete" => {
                let params: DeleteParams = parse_params(params)?;
                let changed = self.store.category_delete(params.id, params.force)?;
                Ok((
                    STATUS_NO_CONTENT,
                    json!({ "id": params.id, "changed": changed, "force": params.force }),
                ))
            }
            "category.descendants" => {
                let params: IdParams = parse_params(params)?;
                let descendants = self.store.category_descendants(params.id)?;
                Ok((STATUS_OK, category_list_json(&descendants)))
            }
            "category.audit" => {
                let _: Map<String, Value> = parse_params(params)?;
                let violations = self.store.category_audit()?;
                Ok((
                    STATUS_OK,
                    json!({
                        "ok": violations.is_empty(),
                        "violations": violations.iter().map(violation_json).collect::<Vec<_>>(),
                    }),
                ))
            }
            other => Err(DispatchError::UnknownMethod(other.to_string())),
        }
    }
}

fn parse_params<T: DeserializeOwned>(params: Value) -> Result<T, DispatchError> {
    serde_json::from_value(params).map_err(|err| DispatchError::InvalidParams(err.to_string()))
}

fn render_error(id: Option<Value>, err: &DispatchError) -> Value {
    error_response(id, err.status(), err.kind(), &err.to_string())
}
