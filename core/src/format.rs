//! Response formats: how a successful body becomes a value.
//!
//! Each format fixes the `Accept` header it negotiates and the decoder it
//! runs. The executor is generic over [`ResponseFormat`], so adding a shape
//! never adds a request path.

use std::marker::PhantomData;

use serde::de::DeserializeOwned;

use crate::error::DecodeError;
use crate::http::Accept;
use crate::xml::{self, XmlNode};

/// Schema-less JSON object. Missing fields read as `None`.
pub type GenericResponse = serde_json::Map<String, serde_json::Value>;

/// Decoder for one response representation.
pub trait ResponseFormat {
    type Output;

    /// Representation requested from the server.
    const ACCEPT: Accept;

    fn decode(body: &str) -> Result<Self::Output, DecodeError>;
}

/// JSON decoded into `T`. Use [`GenericResponse`] for the untyped form.
#[derive(Debug)]
pub struct JsonFormat<T>(PhantomData<fn() -> T>);

impl<T: DeserializeOwned> ResponseFormat for JsonFormat<T> {
    type Output = T;
    const ACCEPT: Accept = Accept::Json;

    fn decode(body: &str) -> Result<T, DecodeError> {
        match serde_json::from_str(body) {
            Ok(value) => Ok(value),
            Err(err) if err.is_data() => Err(DecodeError::Shape(err.to_string())),
            Err(err) => Err(DecodeError::Json(err)),
        }
    }
}

/// Body text returned unchanged.
#[derive(Debug)]
pub struct HtmlFormat;

impl ResponseFormat for HtmlFormat {
    type Output = String;
    const ACCEPT: Accept = Accept::Html;

    fn decode(body: &str) -> Result<String, DecodeError> {
        Ok(body.to_string())
    }
}

/// XML document converted into an [`XmlNode`] tree.
#[derive(Debug)]
pub struct XmlFormat;

impl ResponseFormat for XmlFormat {
    type Output = XmlNode;
    const ACCEPT: Accept = Accept::Xml;

    fn decode(body: &str) -> Result<XmlNode, DecodeError> {
        xml::parse_document(body)
    }
}
