//! Declarative endpoint specifications and the one builder that consumes them.
//!
//! # Design
//! An endpoint is plain data: method, which API host it lives on, a path
//! template with `{placeholders}`, an auth scheme, a body encoding, and an
//! optional parameter schema. `EndpointRequest` turns a spec plus caller
//! input into a `Descriptor`, and is the single place where the wire rules
//! are enforced:
//!
//! - every placeholder resolves to a non-empty, single-segment value
//! - required parameters are present, nothing outside the schema slips in
//! - parameters whose value is `null` are omitted rather than sent
//!
//! The catalogue of concrete specs lives in `endpoints`.

use serde::Serialize;
use serde_json::Value;

use crate::config::ClientConfig;
use crate::descriptor::{Descriptor, Parameters};
use crate::error::ApiError;
use crate::finite;
use crate::http::{BodyEncoding, HttpMethod};

/// Which vendor host an endpoint lives on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Api {
    Authorization,
    Control,
}

/// How the `Authorization` header is formed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Auth {
    /// `Basic <base64 client keys>`, token endpoints only.
    Basic,
    /// `Bearer <access token>`.
    Bearer,
}

impl Auth {
    fn header_value(&self, credential: &str) -> String {
        match self {
            Auth::Basic => format!("Basic {credential}"),
            Auth::Bearer => format!("Bearer {credential}"),
        }
    }
}

/// One entry of a body parameter schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Param {
    pub name: &'static str,
    pub required: bool,
}

impl Param {
    pub const fn required(name: &'static str) -> Self {
        Self { name, required: true }
    }

    pub const fn optional(name: &'static str) -> Self {
        Self { name, required: false }
    }
}

/// Static description of one vendor operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EndpointSpec {
    pub name: &'static str,
    pub method: HttpMethod,
    pub api: Api,
    /// Path below the API base URL, e.g. `/groups/{groupId}/playback`.
    pub path: &'static str,
    pub auth: Auth,
    pub encoding: BodyEncoding,
    /// `None` means the request never carries a body.
    pub params: Option<&'static [Param]>,
}

impl EndpointSpec {
    /// A control-API endpoint: bearer auth, JSON body.
    pub const fn control(
        name: &'static str,
        method: HttpMethod,
        path: &'static str,
        params: Option<&'static [Param]>,
    ) -> Self {
        Self {
            name,
            method,
            api: Api::Control,
            path,
            auth: Auth::Bearer,
            encoding: BodyEncoding::Json,
            params,
        }
    }

    /// A token endpoint: basic auth, form body, always POST.
    pub const fn authorization(name: &'static str, path: &'static str, params: &'static [Param]) -> Self {
        Self {
            name,
            method: HttpMethod::Post,
            api: Api::Authorization,
            path,
            auth: Auth::Basic,
            encoding: BodyEncoding::Form,
            params: Some(params),
        }
    }

    /// Placeholder names in template order.
    pub fn path_parameters(&self) -> Vec<&'static str> {
        let mut names = Vec::new();
        let mut rest = self.path;
        while let Some(start) = rest.find('{') {
            let after = &rest[start + 1..];
            match after.find('}') {
                Some(end) => {
                    names.push(&after[..end]);
                    rest = &after[end + 1..];
                }
                None => break,
            }
        }
        names
    }

    /// Parameters the caller must always supply.
    pub fn required_parameters(&self) -> impl Iterator<Item = &'static str> {
        self.params
            .unwrap_or(&[])
            .iter()
            .filter(|p| p.required)
            .map(|p| p.name)
    }

    fn accepts(&self, name: &str) -> bool {
        self.params.unwrap_or(&[]).iter().any(|p| p.name == name)
    }

    /// Start building a descriptor for this endpoint.
    pub fn request(&self) -> EndpointRequest {
        EndpointRequest {
            spec: *self,
            path: Vec::new(),
            credential: None,
            parameters: Parameters::new(),
            error: None,
        }
    }
}

/// Caller input for one endpoint, accumulated before `build`.
///
/// Setters never fail; the first problem is remembered and reported by
/// `build`, so a chain of calls reads like the request it produces.
#[derive(Debug)]
pub struct EndpointRequest {
    spec: EndpointSpec,
    path: Vec<(String, String)>,
    credential: Option<String>,
    parameters: Parameters,
    error: Option<ApiError>,
}

impl EndpointRequest {
    /// Value for a `{name}` placeholder.
    pub fn path(mut self, name: &str, value: impl Into<String>) -> Self {
        let value = value.into();
        match self.path.iter_mut().find(|(key, _)| key == name) {
            Some(slot) => slot.1 = value,
            None => self.path.push((name.to_string(), value)),
        }
        self
    }

    /// Access token or base64 client keys, depending on the endpoint's auth.
    pub fn credential(mut self, credential: impl Into<String>) -> Self {
        self.credential = Some(credential.into());
        self
    }

    /// A single body parameter. `None` and other `null` values are omitted.
    ///
    /// NaN and infinite floats are an encoding error, not an omission.
    pub fn param(mut self, name: &str, value: impl Serialize) -> Self {
        if let Err(e) = finite::check(&value) {
            self.fail(ApiError::Encoding(format!("parameter `{name}`: {e}")));
            return self;
        }
        match serde_json::to_value(value) {
            Ok(Value::Null) => {
                self.parameters.remove(name);
            }
            Ok(value) => {
                self.parameters.insert(name.to_string(), value);
            }
            Err(e) => self.fail(ApiError::Encoding(format!("parameter `{name}`: {e}"))),
        }
        self
    }

    /// Merge the fields of a serializable struct or map into the body,
    /// skipping any that serialize to `null`.
    pub fn params(mut self, body: &impl Serialize) -> Self {
        if let Err(e) = finite::check(body) {
            self.fail(ApiError::Encoding(format!("body for `{}`: {e}", self.spec.name)));
            return self;
        }
        match serde_json::to_value(body) {
            Ok(Value::Object(fields)) => {
                for (name, value) in fields {
                    if value.is_null() {
                        self.parameters.remove(&name);
                    } else {
                        self.parameters.insert(name, value);
                    }
                }
            }
            Ok(_) => self.fail(ApiError::Encoding(format!(
                "body for `{}` must serialize to a JSON object",
                self.spec.name
            ))),
            Err(e) => self.fail(ApiError::Encoding(e.to_string())),
        }
        self
    }

    fn fail(&mut self, error: ApiError) {
        if self.error.is_none() {
            self.error = Some(error);
        }
    }

    /// Resolve everything into an immutable descriptor.
    pub fn build(mut self, config: &ClientConfig) -> Result<Descriptor, ApiError> {
        if let Some(error) = self.error.take() {
            return Err(error);
        }

        let credential = self
            .credential
            .as_deref()
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| ApiError::MissingCredential(self.spec.name.to_string()))?;

        let url = self.resolve_url(config)?;
        let parameters = self.checked_parameters()?;

        let mut headers = Vec::with_capacity(2);
        if let Some(content_type) = self.spec.encoding.content_type() {
            headers.push(("Content-Type".to_string(), content_type.to_string()));
        }
        headers.push(("Authorization".to_string(), self.spec.auth.header_value(credential)));

        Ok(Descriptor {
            endpoint: self.spec.name,
            method: self.spec.method,
            url,
            headers,
            encoding: self.spec.encoding,
            parameters,
        })
    }

    fn resolve_url(&self, config: &ClientConfig) -> Result<String, ApiError> {
        let base = match self.spec.api {
            Api::Control => config.control_base_url(),
            Api::Authorization => config.auth_base_url(),
        };

        let mut url = String::with_capacity(base.len() + self.spec.path.len() + 32);
        url.push_str(base);

        let mut rest = self.spec.path;
        while let Some(start) = rest.find('{') {
            url.push_str(&rest[..start]);
            let after = &rest[start + 1..];
            let end = after.find('}').ok_or_else(|| {
                ApiError::Encoding(format!("unterminated placeholder in `{}`", self.spec.path))
            })?;
            let name = &after[..end];
            let value = self
                .path
                .iter()
                .find(|(key, _)| key == name)
                .map(|(_, value)| value.as_str())
                .ok_or_else(|| ApiError::MissingPathParameter(name.to_string()))?;
            if !is_path_segment(value) {
                return Err(ApiError::InvalidPathParameter(name.to_string()));
            }
            url.push_str(value);
            rest = &after[end + 1..];
        }
        url.push_str(rest);

        let known = self.spec.path_parameters();
        if let Some((name, _)) = self.path.iter().find(|(name, _)| !known.contains(&name.as_str())) {
            return Err(ApiError::UnknownParameter(name.clone()));
        }

        Ok(url)
    }

    fn checked_parameters(&self) -> Result<Option<Parameters>, ApiError> {
        let Some(schema) = self.spec.params else {
            return match self.parameters.keys().next() {
                Some(name) => Err(ApiError::UnknownParameter(name.clone())),
                None => Ok(None),
            };
        };

        if let Some(name) = self.parameters.keys().find(|name| !self.spec.accepts(name)) {
            return Err(ApiError::UnknownParameter(name.clone()));
        }
        if let Some(param) = schema
            .iter()
            .find(|p| p.required && !self.parameters.contains_key(p.name))
        {
            return Err(ApiError::MissingParameter(param.name.to_string()));
        }

        Ok(Some(self.parameters.clone()))
    }
}

fn is_path_segment(value: &str) -> bool {
    !matches!(value, "" | "." | "..")
        && !value.contains(|c: char| {
            matches!(c, '/' | '?' | '#' | '{' | '}') || c.is_whitespace() || c.is_control()
        })
}
