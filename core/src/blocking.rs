//! Blocking entry points.
//!
//! # Design
//! [`BlockingClient`] adds no request logic. Each method calls the matching
//! [`RestClient`] helper and waits on it with [`block_on`], so both forms
//! share one execution path.
//!
//! Waiting on a future from inside the executor that must drive it
//! deadlocks on a single-threaded scheduler. `block_on` therefore never
//! re-enters the caller's runtime: it drives the future on a fresh
//! current-thread runtime owned by the call, and when it is itself invoked
//! from inside a tokio runtime it does that on a dedicated scoped thread.
//! The calling thread still blocks, so anything the request depends on
//! (such as a local test server) must run on another thread.

use std::future::Future;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::client::RestClient;
use crate::error::ApiError;
use crate::form::FormEncoding;
use crate::format::{GenericResponse, HtmlFormat, JsonFormat, XmlFormat};
use crate::request::EncodedBody;
use crate::transport::Transport;
use crate::xml::XmlNode;

/// Synchronous wrapper over [`RestClient`].
#[derive(Debug, Clone)]
pub struct BlockingClient<T> {
    inner: RestClient<T>,
}

impl<T: Transport + Sync> BlockingClient<T> {
    pub fn new(transport: T) -> Self {
        Self {
            inner: RestClient::new(transport),
        }
    }

    pub fn inner(&self) -> &RestClient<T> {
        &self.inner
    }

    pub fn form_encoding(&self) -> FormEncoding {
        self.inner.form_encoding()
    }

    pub fn get_json(&self, url: &str) -> Result<GenericResponse, ApiError> {
        block_on(self.inner.get::<JsonFormat<GenericResponse>>("get_json", url))
    }

    pub fn get_json_as<R: DeserializeOwned + Send>(&self, url: &str) -> Result<R, ApiError> {
        block_on(self.inner.get::<JsonFormat<R>>("get_json", url))
    }

    pub fn get_html(&self, url: &str) -> Result<String, ApiError> {
        block_on(self.inner.get::<HtmlFormat>("get_html", url))
    }

    pub fn get_xml(&self, url: &str) -> Result<XmlNode, ApiError> {
        block_on(self.inner.get::<XmlFormat>("get_xml", url))
    }

    pub fn post_form(
        &self,
        url: &str,
        pairs: impl IntoIterator<Item = (impl Into<String>, impl Into<String>)>,
    ) -> Result<GenericResponse, ApiError> {
        let body = EncodedBody::form(pairs);
        block_on(self.inner.post::<JsonFormat<GenericResponse>>("post_form", url, body))
    }

    pub fn post_form_as<R: DeserializeOwned + Send>(
        &self,
        url: &str,
        pairs: impl IntoIterator<Item = (impl Into<String>, impl Into<String>)>,
    ) -> Result<R, ApiError> {
        let body = EncodedBody::form(pairs);
        block_on(self.inner.post::<JsonFormat<R>>("post_form", url, body))
    }

    pub fn post_json(
        &self,
        url: &str,
        payload: &(impl Serialize + ?Sized),
    ) -> Result<GenericResponse, ApiError> {
        let body = EncodedBody::json(payload)?;
        block_on(self.inner.post::<JsonFormat<GenericResponse>>("post_json", url, body))
    }

    pub fn post_json_as<R: DeserializeOwned + Send>(
        &self,
        url: &str,
        payload: &(impl Serialize + ?Sized),
    ) -> Result<R, ApiError> {
        let body = EncodedBody::json(payload)?;
        block_on(self.inner.post::<JsonFormat<R>>("post_json", url, body))
    }
}

impl<T> From<RestClient<T>> for BlockingClient<T> {
    fn from(inner: RestClient<T>) -> Self {
        Self { inner }
    }
}

/// Run `future` to completion on the current thread.
///
/// Safe to call from inside a tokio runtime; see the module docs.
pub fn block_on<F, R>(future: F) -> Result<R, ApiError>
where
    F: Future<Output = Result<R, ApiError>> + Send,
    R: Send,
{
    if tokio::runtime::Handle::try_current().is_err() {
        return run_to_completion(future);
    }
    std::thread::scope(|scope| {
        match scope.spawn(|| run_to_completion(future)).join() {
            Ok(result) => result,
            Err(panic) => std::panic::resume_unwind(panic),
        }
    })
}

fn run_to_completion<F, R>(future: F) -> Result<R, ApiError>
where
    F: Future<Output = Result<R, ApiError>>,
{
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(ApiError::Runtime)?;
    runtime.block_on(future)
}
