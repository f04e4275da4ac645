//! Client core for the Sonos Control API.
//!
//! # Overview
//! Every API operation is a row in a declarative endpoint table
//! (`endpoints`). A row plus caller arguments becomes a `Descriptor`: a
//! fully resolved method, URL, header set and parameter map. Descriptors
//! turn into plain-data `HttpRequest` values, and a `Dispatcher` executes
//! them through an injected `Transport`, delivering either the raw response
//! body or an `ApiError`.
//!
//! # Design
//! - `SonosClient` is stateless. It holds only the base URLs.
//! - Building never touches the network. Only `Dispatcher` does I/O, and
//!   only through `Transport`, so tests substitute a canned transport.
//! - Response bodies are returned as bytes. Decoding them is the caller's
//!   concern.
//! - The typed `build_*` methods all go through the same generic
//!   `EndpointRequest` builder, which enforces path placeholders, required
//!   and unknown parameters, and the credential.

pub mod client;
pub mod config;
pub mod descriptor;
pub mod dispatch;
pub mod endpoint;
pub mod endpoints;
pub mod error;
mod finite;
pub mod http;
pub mod transport;
pub mod types;

pub use client::{encode_client_keys, SonosClient};
pub use config::ClientConfig;
pub use descriptor::{Descriptor, Parameters, RequestDescriptor};
pub use dispatch::{DispatchHandle, Dispatcher};
pub use endpoint::{Api, Auth, EndpointRequest, EndpointSpec, Param};
pub use error::{ApiError, ErrorKind, TransportError, TransportErrorKind};
pub use http::{BodyEncoding, HttpMethod, HttpRequest, HttpResponse};
pub use transport::{Transport, UreqTransport};
