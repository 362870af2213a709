//! Type aliases for use with `hyper` crate's HTTP client.

pub type FutureGeocode<T> =
    crate::FutureGeocode<hyper_pkg::client::ResponseFuture, hyper_pkg::Body, T>;
pub type Error = crate::Error<hyper_pkg::Error>;
