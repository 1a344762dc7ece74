//! Non-blocking request executor.
//!
//! # Design
//! `RestClient` holds a transport and the form encoding mode, and carries no
//! state between calls. Every public operation picks a [`ResponseFormat`]
//! and funnels into [`RestClient::execute`]: build the descriptor, send it,
//! then [`parse_response`]. The status code alone decides success; a failed
//! response is mapped to [`RequestFailure`](crate::RequestFailure) without
//! looking at its body.

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, instrument, Span};

use crate::error::{map_failure, ApiError, FailureContext};
use crate::form::FormEncoding;
use crate::format::{GenericResponse, HtmlFormat, JsonFormat, ResponseFormat, XmlFormat};
use crate::http::HttpResponse;
use crate::request::{EncodedBody, RequestDescriptor};
use crate::transport::Transport;
use crate::xml::XmlNode;

/// Builder for [`RestClient`].
#[derive(Debug, Clone)]
pub struct RestClientBuilder<T> {
    transport: T,
    form_encoding: FormEncoding,
}

impl<T: Transport> RestClientBuilder<T> {
    /// How form bodies are escaped. Defaults to [`FormEncoding::Raw`].
    pub fn form_encoding(mut self, encoding: FormEncoding) -> Self {
        self.form_encoding = encoding;
        self
    }

    pub fn build(self) -> RestClient<T> {
        RestClient {
            transport: self.transport,
            form_encoding: self.form_encoding,
        }
    }
}

/// Async REST client over a [`Transport`].
///
/// ```rust,ignore
/// use webreq_core::{ReqwestTransport, RestClient};
///
/// let client = RestClient::new(ReqwestTransport::new());
/// let item = client.get_json("https://api.example.com/items/1").await?;
/// println!("{:?}", item.get("name"));
/// ```
#[derive(Debug, Clone)]
pub struct RestClient<T> {
    transport: T,
    form_encoding: FormEncoding,
}

impl<T: Transport> RestClient<T> {
    pub fn new(transport: T) -> Self {
        Self::builder(transport).build()
    }

    pub fn builder(transport: T) -> RestClientBuilder<T> {
        RestClientBuilder {
            transport,
            form_encoding: FormEncoding::default(),
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn form_encoding(&self) -> FormEncoding {
        self.form_encoding
    }

    /// GET with `Accept: application/json`, decoded as a generic object.
    pub async fn get_json(&self, url: &str) -> Result<GenericResponse, ApiError> {
        self.get::<JsonFormat<GenericResponse>>("get_json", url).await
    }

    /// GET with `Accept: application/json`, decoded into `R`.
    pub async fn get_json_as<R: DeserializeOwned>(&self, url: &str) -> Result<R, ApiError> {
        self.get::<JsonFormat<R>>("get_json", url).await
    }

    /// GET with `Accept: text/html`. The body is returned as received.
    pub async fn get_html(&self, url: &str) -> Result<String, ApiError> {
        self.get::<HtmlFormat>("get_html", url).await
    }

    /// GET with `Accept: application/xml`, converted into an element tree.
    pub async fn get_xml(&self, url: &str) -> Result<XmlNode, ApiError> {
        self.get::<XmlFormat>("get_xml", url).await
    }

    /// POST a form body, decode the JSON answer as a generic object.
    pub async fn post_form(
        &self,
        url: &str,
        pairs: impl IntoIterator<Item = (impl Into<String>, impl Into<String>)>,
    ) -> Result<GenericResponse, ApiError> {
        self.post::<JsonFormat<GenericResponse>>("post_form", url, EncodedBody::form(pairs))
            .await
    }

    /// POST a form body, decode the JSON answer into `R`.
    pub async fn post_form_as<R: DeserializeOwned>(
        &self,
        url: &str,
        pairs: impl IntoIterator<Item = (impl Into<String>, impl Into<String>)>,
    ) -> Result<R, ApiError> {
        self.post::<JsonFormat<R>>("post_form", url, EncodedBody::form(pairs))
            .await
    }

    /// POST `payload` as JSON, decode the JSON answer as a generic object.
    pub async fn post_json(
        &self,
        url: &str,
        payload: &(impl Serialize + ?Sized),
    ) -> Result<GenericResponse, ApiError> {
        let body = EncodedBody::json(payload)?;
        self.post::<JsonFormat<GenericResponse>>("post_json", url, body)
            .await
    }

    /// POST `payload` as JSON, decode the JSON answer into `R`.
    pub async fn post_json_as<R: DeserializeOwned>(
        &self,
        url: &str,
        payload: &(impl Serialize + ?Sized),
    ) -> Result<R, ApiError> {
        let body = EncodedBody::json(payload)?;
        self.post::<JsonFormat<R>>("post_json", url, body).await
    }

    pub(crate) async fn get<F: ResponseFormat>(
        &self,
        operation: &'static str,
        url: &str,
    ) -> Result<F::Output, ApiError> {
        let descriptor = RequestDescriptor::get(url, F::ACCEPT)?;
        self.execute::<F>(operation, descriptor).await
    }

    pub(crate) async fn post<F: ResponseFormat>(
        &self,
        operation: &'static str,
        url: &str,
        body: EncodedBody,
    ) -> Result<F::Output, ApiError> {
        let descriptor = RequestDescriptor::post(url, F::ACCEPT, body)?;
        self.execute::<F>(operation, descriptor).await
    }

    /// Send `descriptor` and decode the answer with `F`.
    ///
    /// `operation` names the caller in failure messages and in the span.
    ///
    /// ## Errors
    ///
    /// - [`ApiError::Transport`] when no response was obtained
    /// - [`ApiError::Request`] for any non-2xx status
    /// - [`ApiError::Decode`] when a 2xx body does not decode
    #[instrument(
        name = "rest_request",
        skip(self, descriptor),
        fields(
            http.method = %descriptor.method(),
            http.url = %descriptor.url(),
            http.status_code = tracing::field::Empty,
            otel.kind = "client",
        )
    )]
    pub async fn execute<F: ResponseFormat>(
        &self,
        operation: &'static str,
        descriptor: RequestDescriptor,
    ) -> Result<F::Output, ApiError> {
        let request = descriptor.to_http(self.form_encoding);
        let response = self.transport.send(request).await?;
        Span::current().record("http.status_code", response.status);
        debug!(operation, success = response.is_success(), "response received");
        parse_response::<F>(operation, &descriptor, response)
    }
}

/// Map a response to the decoded value or the uniform failure.
///
/// Non-2xx responses never reach the decoder.
pub fn parse_response<F: ResponseFormat>(
    operation: &'static str,
    descriptor: &RequestDescriptor,
    response: HttpResponse,
) -> Result<F::Output, ApiError> {
    if !response.is_success() {
        let context = FailureContext {
            operation,
            method: descriptor.method(),
            url: descriptor.url(),
            body: descriptor.body(),
        };
        return Err(map_failure(context, response.status).into());
    }
    Ok(F::decode(&response.body)?)
}
