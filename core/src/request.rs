//! Request descriptors: what to send before it becomes an [`HttpRequest`].

use serde::Serialize;

use crate::error::ApiError;
use crate::form::{self, FormEncoding};
use crate::http::{Accept, HttpMethod, HttpRequest};

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";
const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// A POST body, either form pairs or a JSON value.
#[derive(Debug, Clone, PartialEq)]
pub enum EncodedBody {
    Form(Vec<(String, String)>),
    Json(serde_json::Value),
}

impl EncodedBody {
    /// Collect form pairs into an owned body.
    pub fn form<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        EncodedBody::Form(
            pairs
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }

    /// Serialize `payload` into a JSON body.
    pub fn json<P: Serialize + ?Sized>(payload: &P) -> Result<Self, ApiError> {
        serde_json::to_value(payload)
            .map(EncodedBody::Json)
            .map_err(ApiError::Encode)
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            EncodedBody::Form(_) => FORM_CONTENT_TYPE,
            EncodedBody::Json(_) => JSON_CONTENT_TYPE,
        }
    }

    /// Wire text of the body.
    pub fn encode(&self, encoding: FormEncoding) -> String {
        match self {
            EncodedBody::Form(pairs) => form::encode_pairs(pairs.iter().map(|(k, v)| (k, v)), encoding),
            EncodedBody::Json(value) => value.to_string(),
        }
    }

    /// Stable text used in failure messages: the unescaped form string, or
    /// compact JSON.
    pub fn describe(&self) -> String {
        self.encode(FormEncoding::Raw)
    }
}

/// Everything the executor needs to issue one request.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestDescriptor {
    method: HttpMethod,
    url: String,
    accept: Accept,
    body: Option<EncodedBody>,
}

impl RequestDescriptor {
    /// Validate and build a descriptor.
    ///
    /// The URL must not be empty, POST must carry a body and GET must not.
    pub fn new(
        method: HttpMethod,
        url: impl Into<String>,
        accept: Accept,
        body: Option<EncodedBody>,
    ) -> Result<Self, ApiError> {
        let url = url.into();
        if url.trim().is_empty() {
            return Err(ApiError::InvalidArgument("url must not be empty".to_string()));
        }
        match (method, &body) {
            (HttpMethod::Post, None) => {
                return Err(ApiError::InvalidArgument("POST request requires a body".to_string()));
            }
            (HttpMethod::Get, Some(_)) => {
                return Err(ApiError::InvalidArgument("GET request must not carry a body".to_string()));
            }
            _ => {}
        }
        Ok(Self {
            method,
            url,
            accept,
            body,
        })
    }

    pub fn get(url: impl Into<String>, accept: Accept) -> Result<Self, ApiError> {
        Self::new(HttpMethod::Get, url, accept, None)
    }

    pub fn post(url: impl Into<String>, accept: Accept, body: EncodedBody) -> Result<Self, ApiError> {
        Self::new(HttpMethod::Post, url, accept, Some(body))
    }

    pub fn method(&self) -> HttpMethod {
        self.method
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn accept(&self) -> Accept {
        self.accept
    }

    pub fn body(&self) -> Option<&EncodedBody> {
        self.body.as_ref()
    }

    /// Render the wire request: `Accept` always, `Content-Type` with a body.
    pub fn to_http(&self, encoding: FormEncoding) -> HttpRequest {
        let mut headers = vec![("accept".to_string(), self.accept.media_type().to_string())];
        if let Some(body) = &self.body {
            headers.push(("content-type".to_string(), body.content_type().to_string()));
        }
        HttpRequest {
            method: self.method,
            url: self.url.clone(),
            headers,
            body: self.body.as_ref().map(|body| body.encode(encoding)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_request_has_accept_only() {
        let req = RequestDescriptor::get("http://localhost:3000/items", Accept::Json)
            .unwrap()
            .to_http(FormEncoding::Raw);
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.url, "http://localhost:3000/items");
        assert_eq!(
            req.headers,
            vec![("accept".to_string(), "application/json".to_string())]
        );
        assert!(req.body.is_none());
    }

    #[test]
    fn form_post_sets_content_type_and_body() {
        let body = EncodedBody::form([("a", "1"), ("b", "2")]);
        let req = RequestDescriptor::post("http://localhost:3000/form", Accept::Json, body)
            .unwrap()
            .to_http(FormEncoding::Raw);
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.header("content-type"), Some("application/x-www-form-urlencoded"));
        assert_eq!(req.header("accept"), Some("application/json"));
        assert_eq!(req.body.as_deref(), Some("a=1&b=2"));
    }

    #[test]
    fn form_post_honors_percent_mode() {
        let body = EncodedBody::form([("q", "a b")]);
        let req = RequestDescriptor::post("http://h/f", Accept::Json, body)
            .unwrap()
            .to_http(FormEncoding::Percent);
        assert_eq!(req.body.as_deref(), Some("q=a+b"));
    }

    #[test]
    fn json_post_serializes_payload() {
        #[derive(Serialize)]
        struct Payload {
            title: String,
            done: bool,
        }
        let body = EncodedBody::json(&Payload {
            title: "Buy milk".to_string(),
            done: false,
        })
        .unwrap();
        let req = RequestDescriptor::post("http://h/json", Accept::Json, body)
            .unwrap()
            .to_http(FormEncoding::Raw);
        assert_eq!(req.header("content-type"), Some("application/json; charset=utf-8"));
        let sent: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(sent["title"], "Buy milk");
        assert_eq!(sent["done"], false);
    }

    #[test]
    fn empty_url_is_rejected() {
        let err = RequestDescriptor::get("", Accept::Html).unwrap_err();
        assert!(matches!(err, ApiError::InvalidArgument(_)));
        let err = RequestDescriptor::get("   ", Accept::Html).unwrap_err();
        assert!(matches!(err, ApiError::InvalidArgument(_)));
    }

    #[test]
    fn post_without_body_is_rejected() {
        let err = RequestDescriptor::new(HttpMethod::Post, "http://h", Accept::Json, None).unwrap_err();
        assert!(matches!(err, ApiError::InvalidArgument(_)));
    }

    #[test]
    fn get_with_body_is_rejected() {
        let body = EncodedBody::form([("a", "1")]);
        let err = RequestDescriptor::new(HttpMethod::Get, "http://h", Accept::Json, Some(body)).unwrap_err();
        assert!(matches!(err, ApiError::InvalidArgument(_)));
    }

    #[test]
    fn describe_is_raw_even_when_wire_is_escaped() {
        let body = EncodedBody::form([("q", "a b")]);
        assert_eq!(body.describe(), "q=a b");
        assert_eq!(body.encode(FormEncoding::Percent), "q=a+b");
    }

    #[test]
    fn unserializable_payload_is_encode_error() {
        use std::collections::BTreeMap;
        let mut map = BTreeMap::new();
        map.insert(vec![1u8], "non-string key");
        let err = EncodedBody::json(&map).unwrap_err();
        assert!(matches!(err, ApiError::Encode(_)));
    }
}
