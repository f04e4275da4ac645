//! The request-description contract consumed by the dispatcher.
//!
//! # Design
//! A `RequestDescriptor` answers five pure questions (method, URL, headers,
//! body encoding, parameters) and knows how to turn those answers into an
//! `HttpRequest`. `Descriptor` is the only implementation the crate builds;
//! the trait stays open so callers can describe endpoints the catalogue does
//! not cover.

use serde_json::{Map, Value};
use url::form_urlencoded;

use crate::error::ApiError;
use crate::http::{BodyEncoding, HttpMethod, HttpRequest};

/// Body parameters keyed by their wire name.
pub type Parameters = Map<String, Value>;

/// Declarative description of one HTTP call.
///
/// Accessors must be free of side effects: repeated calls return equal
/// values. The only stateful operation is dispatching the descriptor.
pub trait RequestDescriptor {
    fn method(&self) -> HttpMethod;

    /// Fully resolved absolute URL.
    fn url(&self) -> &str;

    fn headers(&self) -> Option<&[(String, String)]>;

    fn body_encoding(&self) -> BodyEncoding;

    fn parameters(&self) -> Option<&Parameters>;

    /// Encode into a transport request. Fails without any I/O.
    fn to_request(&self) -> Result<HttpRequest, ApiError> {
        let url = self.url();
        if url.contains('{') || url.contains('}') {
            return Err(ApiError::Encoding(format!("unresolved placeholder in `{url}`")));
        }
        url::Url::parse(url).map_err(|e| ApiError::Encoding(format!("invalid url `{url}`: {e}")))?;

        let body = match self.parameters() {
            None => None,
            Some(params) => encode_body(self.body_encoding(), params)?,
        };

        Ok(HttpRequest {
            method: self.method(),
            url: url.to_string(),
            headers: self.headers().map(<[_]>::to_vec).unwrap_or_default(),
            body,
        })
    }
}

fn encode_body(encoding: BodyEncoding, params: &Parameters) -> Result<Option<String>, ApiError> {
    match encoding {
        BodyEncoding::Json => Ok(Some(serde_json::to_string(params)?)),
        BodyEncoding::Form => {
            let mut form = form_urlencoded::Serializer::new(String::new());
            for (key, value) in params {
                form.append_pair(key, &form_value(key, value)?);
            }
            Ok(Some(form.finish()))
        }
        BodyEncoding::None if params.is_empty() => Ok(None),
        BodyEncoding::None => Err(ApiError::Encoding(
            "parameters supplied to a request without a body".to_string(),
        )),
    }
}

fn form_value(key: &str, value: &Value) -> Result<String, ApiError> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => Err(ApiError::Encoding(format!(
            "form parameter `{key}` must be a string, number or boolean"
        ))),
    }
}

/// An immutable, fully resolved request description.
///
/// Built by `EndpointRequest::build`; consumed by value when dispatched.
#[derive(Debug, Clone, PartialEq)]
pub struct Descriptor {
    pub(crate) endpoint: &'static str,
    pub(crate) method: HttpMethod,
    pub(crate) url: String,
    pub(crate) headers: Vec<(String, String)>,
    pub(crate) encoding: BodyEncoding,
    pub(crate) parameters: Option<Parameters>,
}

impl Descriptor {
    /// Catalogue name of the endpoint this descriptor was built from.
    pub fn endpoint(&self) -> &'static str {
        self.endpoint
    }
}

impl RequestDescriptor for Descriptor {
    fn method(&self) -> HttpMethod {
        self.method
    }

    fn url(&self) -> &str {
        &self.url
    }

    fn headers(&self) -> Option<&[(String, String)]> {
        Some(&self.headers)
    }

    fn body_encoding(&self) -> BodyEncoding {
        self.encoding
    }

    fn parameters(&self) -> Option<&Parameters> {
        self.parameters.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn descriptor(encoding: BodyEncoding, parameters: Option<Value>) -> Descriptor {
        Descriptor {
            endpoint: "test",
            method: HttpMethod::Post,
            url: "https://api.ws.sonos.com/control/api/v1/groups/G1/playback/seek".to_string(),
            headers: vec![("Content-Type".to_string(), "application/json".to_string())],
            encoding,
            parameters: parameters.map(|v| v.as_object().cloned().unwrap()),
        }
    }

    #[test]
    fn json_body_is_serialized_parameters() {
        let d = descriptor(BodyEncoding::Json, Some(json!({"positionMillis": 1500, "itemId": "i1"})));
        let req = d.to_request().unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.header("content-type"), Some("application/json"));
        let body: Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body, json!({"positionMillis": 1500, "itemId": "i1"}));
    }

    #[test]
    fn empty_json_parameters_send_empty_object() {
        let d = descriptor(BodyEncoding::Json, Some(json!({})));
        assert_eq!(d.to_request().unwrap().body.as_deref(), Some("{}"));
    }

    #[test]
    fn absent_parameters_send_no_body() {
        let d = descriptor(BodyEncoding::Json, None);
        assert!(d.to_request().unwrap().body.is_none());
    }

    #[test]
    fn form_body_escapes_values() {
        let d = descriptor(
            BodyEncoding::Form,
            Some(json!({"grant_type": "authorization_code", "redirect_uri": "https://app.example/cb?x=1"})),
        );
        let body = d.to_request().unwrap().body.unwrap();
        assert!(body.contains("grant_type=authorization_code"));
        assert!(body.contains("redirect_uri=https%3A%2F%2Fapp.example%2Fcb%3Fx%3D1"));
    }

    #[test]
    fn form_rejects_nested_values() {
        let d = descriptor(BodyEncoding::Form, Some(json!({"playerIds": ["a", "b"]})));
        let err = d.to_request().unwrap_err();
        assert!(matches!(err, ApiError::Encoding(_)));
    }

    #[test]
    fn bodyless_encoding_rejects_parameters() {
        let d = descriptor(BodyEncoding::None, Some(json!({"volume": 3})));
        assert!(matches!(d.to_request().unwrap_err(), ApiError::Encoding(_)));
        let d = descriptor(BodyEncoding::None, Some(json!({})));
        assert!(d.to_request().unwrap().body.is_none());
    }

    #[test]
    fn unresolved_placeholder_is_rejected() {
        let mut d = descriptor(BodyEncoding::Json, None);
        d.url = "https://api.ws.sonos.com/control/api/v1/groups/{groupId}/playback".to_string();
        assert!(matches!(d.to_request().unwrap_err(), ApiError::Encoding(_)));
    }

    #[test]
    fn relative_url_is_rejected() {
        let mut d = descriptor(BodyEncoding::Json, None);
        d.url = "/groups/G1/playback".to_string();
        assert!(matches!(d.to_request().unwrap_err(), ApiError::Encoding(_)));
    }

    #[test]
    fn accessors_are_repeatable() {
        let d = descriptor(BodyEncoding::Json, Some(json!({"positionMillis": 1})));
        assert_eq!(d.parameters(), d.parameters());
        assert_eq!(d.headers(), d.headers());
        assert_eq!(d.url(), d.url());
        assert_eq!(d.to_request().unwrap(), d.to_request().unwrap());
    }
}
