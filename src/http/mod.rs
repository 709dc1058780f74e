// HTTP plumbing: transport seam, base-address selection and the envelope-aware client

pub mod base_url;
pub mod client;
pub mod transport;


#[cfg(test)]
pub(crate) use test::support;

pub use base_url::{select_base_address, ApiAddress};
pub use client::{default_headers, ApiClient, RequestOptions};
pub use transport::{FormPart, HttpRequest, HttpResponse, HttpTransport, RequestBody, ReqwestTransport, TransportError};
