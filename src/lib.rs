#![doc(html_root_url = "https://docs.rs/mapbox-geocoder/0.3.0")]

/*!
# Mapbox Geocoder

A client library for the [Mapbox Geocoding API][api].

[api]: https://docs.mapbox.com/api/search/geocoding/

## Usage

Add `mapbox-geocoder` to your dependencies in your project's `Cargo.toml`:

```toml
[dependencies]
mapbox-geocoder = "0.3"
tokio = { version = "1", features = ["macros", "rt-multi-thread"] }
```

## Overview

Here is a basic example that prints the results of a forward geocoding request:

```rust,no_run
use mapbox_geocoder::{GeocodeOptions, Geocoder};

# #[tokio::main]
# async fn main() {
let geocoder = Geocoder::from_env().expect("`MAPBOX_ACCESS_TOKEN` is not set");

let mut options = GeocodeOptions::forward("200 queen street");
options.focal_location(mapbox_geocoder::Coordinate::new(45.3, -66.1));

let result = geocoder.geocode(&options).await.unwrap();
for placemark in &result.placemarks {
    println!("{} ({:?})", placemark.formatted_name(), placemark.location());
}
println!("{}", result.attribution);
# }
```

Responses obtained by other means can be decoded with [`decode_single`] and
[`decode_batch`].
*/

#[cfg(feature = "hyper")]
extern crate hyper_pkg;

#[macro_use]
mod util;

pub mod error;
#[cfg(feature = "hyper")]
pub mod hyper;
pub mod placemark;
pub mod types;

mod body;
mod options;
mod query_builder;
mod rate_limit;
mod region;
mod response;
mod scope;

pub use crate::error::{DecodeError, Error};
pub use crate::options::{GeocodeOptions, MAXIMUM_BATCH_QUERY_COUNT};
pub use crate::placemark::{
    AddressDictionary, AddressValue, Geocoded, Placemark, PlacemarkKind, PostalAddress,
    Properties,
};
pub use crate::rate_limit::RateLimit;
pub use crate::region::{ParseRegionError, RectangularRegion};
pub use crate::response::{decode_batch, decode_single, BatchGeocodeResult, GeocodeResult};
pub use crate::scope::PlacemarkScope;
pub use crate::types::{Coordinate, PlacemarkPrecision};

use std::borrow::Borrow;
use std::env;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures_util::ready;
use http::header::{HeaderValue, ACCEPT_ENCODING, CONTENT_ENCODING, USER_AGENT};
use http::response::Parts;
use http::uri::InvalidUri;
use http::{Request, Response};
use http_body::Body;
use pin_project_lite::pin_project;
use tower_service::Service;

use crate::body::ReadBody;
use crate::query_builder::QueryBuilder;
use crate::types::{StatusCode, Uri};

const DEFAULT_ENDPOINT: &str = "https://api.mapbox.com";

/// The environment variable read by [`Geocoder::from_env`].
pub const ACCESS_TOKEN_VAR: &str = "MAPBOX_ACCESS_TOKEN";

/// A geocoder object that allows you to query the Mapbox Geocoding API.
///
/// Every request is authorized with the access token the geocoder was created with.
#[derive(Clone, Debug)]
pub struct Geocoder<T = String> {
    access_token: T,
    endpoint: Uri,
}

pin_project! {
    /// A future returned by the request methods of [`Geocoder`], which resolves to the decoded
    /// response.
    pub struct FutureGeocode<F, B, T>
    where
        B: Body,
    {
        #[pin]
        response: F,
        #[pin]
        body: Option<ReadBody<B>>,
        status: StatusCode,
        rate_limit: Option<RateLimit>,
        decode: fn(&[u8]) -> Result<T, DecodeError>,
    }
}

impl Geocoder {
    /// Creates a geocoder with the access token in the `MAPBOX_ACCESS_TOKEN` environment
    /// variable. Returns `None` if the variable is unset or empty.
    pub fn from_env() -> Option<Self> {
        env::var(ACCESS_TOKEN_VAR)
            .ok()
            .filter(|token| !token.is_empty())
            .map(Geocoder::new)
    }
}

impl<T: Borrow<str>> Geocoder<T> {
    /// Creates a geocoder that sends requests to `api.mapbox.com`.
    pub fn new(access_token: T) -> Self {
        Geocoder {
            access_token,
            endpoint: Uri::from_static(DEFAULT_ENDPOINT),
        }
    }

    /// Creates a geocoder that sends requests to an alternative host over HTTPS.
    pub fn with_host(access_token: T, host: &str) -> Result<Self, InvalidUri> {
        let endpoint = format!("https://{}", host).parse()?;
        Ok(Geocoder {
            access_token,
            endpoint,
        })
    }

    pub fn access_token(&self) -> &str {
        self.access_token.borrow()
    }

    pub fn endpoint(&self) -> &Uri {
        &self.endpoint
    }

    /// Returns the URL of the request described by `options`.
    pub fn url_for_geocoding(&self, options: &GeocodeOptions) -> Uri {
        let endpoint = self.endpoint.to_string();
        let mut qb = QueryBuilder::new(format!(
            "{}{}",
            endpoint.trim_end_matches('/'),
            options.path(),
        ));
        options.append_params(&mut qb);
        qb.append("access_token", self.access_token.borrow());

        // The endpoint was validated on construction and everything else is percent-encoded.
        qb.build().parse().expect("invalid geocoding URL")
    }

    /// Sends a single-query request with an HTTPS client.
    ///
    /// # Panics
    ///
    /// This will panic if the underlying HTTPS connector failed to initialize.
    #[cfg(feature = "hyper")]
    pub fn geocode(&self, options: &GeocodeOptions) -> crate::hyper::FutureGeocode<GeocodeResult> {
        self.geocode_with_client(options, https_client())
    }

    /// Sends a batch request with an HTTPS client.
    ///
    /// # Panics
    ///
    /// This will panic if the underlying HTTPS connector failed to initialize.
    #[cfg(feature = "hyper")]
    pub fn batch_geocode(
        &self,
        options: &GeocodeOptions,
    ) -> crate::hyper::FutureGeocode<BatchGeocodeResult> {
        self.batch_geocode_with_client(options, https_client())
    }

    /// Same as `geocode` except that it uses `client` to make the HTTP request.
    ///
    /// `options` should describe a single-query request; the response to a batch request is an
    /// array of feature collections, which is reported as `DecodeError::EnvelopeShapeMismatch`.
    ///
    /// # Panics
    ///
    /// This will call `<S as Service>::call` without checking for `<S as Service>::poll_ready`
    /// and may cause a panic if `client` is not ready to send an HTTP request yet.
    pub fn geocode_with_client<S, ReqB, ResB>(
        &self,
        options: &GeocodeOptions,
        client: S,
    ) -> FutureGeocode<S::Future, ResB, GeocodeResult>
    where
        S: Service<Request<ReqB>, Response = Response<ResB>>,
        ReqB: Default,
        ResB: Body,
    {
        self.send(options, client, decode_single)
    }

    /// Same as `batch_geocode` except that it uses `client` to make the HTTP request.
    ///
    /// # Panics
    ///
    /// This will call `<S as Service>::call` without checking for `<S as Service>::poll_ready`
    /// and may cause a panic if `client` is not ready to send an HTTP request yet.
    pub fn batch_geocode_with_client<S, ReqB, ResB>(
        &self,
        options: &GeocodeOptions,
        client: S,
    ) -> FutureGeocode<S::Future, ResB, BatchGeocodeResult>
    where
        S: Service<Request<ReqB>, Response = Response<ResB>>,
        ReqB: Default,
        ResB: Body,
    {
        self.send(options, client, decode_batch)
    }

    fn send<S, ReqB, ResB, R>(
        &self,
        options: &GeocodeOptions,
        mut client: S,
        decode: fn(&[u8]) -> Result<R, DecodeError>,
    ) -> FutureGeocode<S::Future, ResB, R>
    where
        S: Service<Request<ReqB>, Response = Response<ResB>>,
        ReqB: Default,
        ResB: Body,
    {
        let uri = self.url_for_geocoding(options);
        tracing::debug!(
            path = uri.path(),
            queries = options.queries().len(),
            "sending geocoding request"
        );

        let mut req = Request::new(ReqB::default());
        *req.uri_mut() = uri;
        let headers = req.headers_mut();
        headers.insert(USER_AGENT, user_agent());
        if cfg!(feature = "gzip") {
            headers.insert(ACCEPT_ENCODING, HeaderValue::from_static("gzip"));
        }

        FutureGeocode {
            response: client.call(req),
            body: None,
            status: StatusCode::OK,
            rate_limit: None,
            decode,
        }
    }
}

#[cfg(feature = "hyper")]
fn https_client() -> hyper_pkg::Client<hyper_tls::HttpsConnector<hyper_pkg::client::HttpConnector>>
{
    let conn = hyper_tls::HttpsConnector::new();
    hyper_pkg::Client::builder().build::<_, hyper_pkg::Body>(conn)
}

fn user_agent() -> HeaderValue {
    let ua = format!(
        "mapbox-geocoder/{} ({}; {})",
        env!("CARGO_PKG_VERSION"),
        env::consts::OS,
        env::consts::ARCH,
    );
    HeaderValue::from_str(&ua).unwrap_or_else(|_| {
        HeaderValue::from_static(concat!("mapbox-geocoder/", env!("CARGO_PKG_VERSION")))
    })
}

impl<F, B, T, E> Future for FutureGeocode<F, B, T>
where
    F: Future<Output = Result<Response<B>, E>>,
    B: Body,
    B::Error: Into<E>,
{
    type Output = Result<T, Error<E>>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let mut this = self.project();

        loop {
            if let Some(body) = this.body.as_mut().as_pin_mut() {
                let data = ready!(body.poll(cx)).map_err(|e| e.map_service(Into::<E>::into))?;
                let rate_limit = this.rate_limit.take();
                return Poll::Ready(finish(*this.status, rate_limit, &data, *this.decode));
            }

            let res = match ready!(this.response.as_mut().poll(cx)) {
                Ok(res) => res,
                Err(e) => return Poll::Ready(Err(Error::Service(e))),
            };
            let (parts, body) = res.into_parts();
            let Parts {
                status, headers, ..
            } = parts;

            let use_gzip = headers
                .get_all(CONTENT_ENCODING)
                .iter()
                .any(|e| e == "gzip");
            *this.status = status;
            *this.rate_limit = RateLimit::from_headers(&headers);
            this.body.set(Some(crate::body::read(body, use_gzip)));
        }
    }
}

fn finish<T, E>(
    status: StatusCode,
    rate_limit: Option<RateLimit>,
    body: &[u8],
    decode: fn(&[u8]) -> Result<T, DecodeError>,
) -> Result<T, Error<E>> {
    if status == StatusCode::TOO_MANY_REQUESTS {
        let rate_limit = rate_limit.unwrap_or_default();
        tracing::warn!(%rate_limit, "rate limited");
        return Err(Error::RateLimited(rate_limit));
    }

    if status != StatusCode::OK {
        #[derive(serde::Deserialize)]
        struct ApiMessage {
            message: Option<String>,
        }

        let message = serde_json::from_slice::<ApiMessage>(body)
            .ok()
            .and_then(|m| m.message);
        tracing::debug!(%status, ?message, "geocoding request failed");
        return Err(Error::Http { status, message });
    }

    decode(body).map_err(Error::Decode)
}
