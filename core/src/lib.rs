//! Generic REST request helpers with content negotiation.
//!
//! # Overview
//! Issues GET and POST requests and decodes the answer as JSON (generic or
//! typed), raw HTML text, or an XML element tree. POST bodies are either
//! `application/x-www-form-urlencoded` pairs or JSON. Every operation exists
//! as an `async` method on [`RestClient`] and as a blocking method on
//! [`BlockingClient`].
//!
//! # Design
//! - The network sits behind the [`Transport`] trait. The executor builds an
//!   [`HttpRequest`], the transport returns an [`HttpResponse`], and the
//!   executor decodes it. [`ReqwestTransport`] is the bundled transport.
//! - A 2xx status is the only success signal. Anything else becomes
//!   [`ApiError::Request`] and the body is not decoded.
//! - Operations differ only in their [`ResponseFormat`] and body; they all
//!   share [`RestClient::execute`]. The blocking client waits on that same
//!   path.
//! - Nothing is shared between calls: no client pool, no cache, no retries.

pub mod blocking;
pub mod client;
pub mod error;
pub mod form;
pub mod format;
pub mod http;
pub mod request;
pub mod transport;
pub mod xml;

pub use blocking::BlockingClient;
pub use client::{RestClient, RestClientBuilder};
pub use error::{ApiError, DecodeError, RequestFailure, TransportError};
pub use form::FormEncoding;
pub use format::{GenericResponse, HtmlFormat, JsonFormat, ResponseFormat, XmlFormat};
pub use http::{Accept, HttpMethod, HttpRequest, HttpResponse};
pub use request::{EncodedBody, RequestDescriptor};
pub use transport::{ReqwestTransport, ReqwestTransportBuilder, Transport};
pub use xml::XmlNode;
