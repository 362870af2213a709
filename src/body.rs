//! Reading response bodies.

use std::future::Future;
use std::mem;
use std::pin::Pin;
use std::task::{Context, Poll};

use bytes::{Buf, Bytes};
use futures_core::{Stream, TryStream};
use futures_util::ready;
use http_body::Body;
use pin_project_lite::pin_project;

use crate::error::Error;

pub use self::imp::MaybeGzip;

pin_project! {
    /// Adapts an HTTP body into a stream of `Bytes`.
    pub struct BodyStream<B> {
        #[pin]
        body: B,
    }
}

pin_project! {
    /// Concatenates the chunks of a stream.
    pub struct Collect<S> {
        #[pin]
        stream: S,
        buf: Vec<u8>,
    }
}

pub type ReadBody<B> = Collect<MaybeGzip<BodyStream<B>>>;

/// Reads `body` to the end, decompressing it if `gzip` is set.
pub fn read<B: Body>(body: B, gzip: bool) -> ReadBody<B> {
    let stream = BodyStream { body };
    let stream = if gzip {
        imp::gzip(stream)
    } else {
        imp::identity(stream)
    };
    Collect {
        stream,
        buf: Vec::new(),
    }
}

impl<B: Body> Stream for BodyStream<B> {
    type Item = Result<Bytes, Error<B::Error>>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.project().body.poll_data(cx).map(|item| {
            item.map(|result| {
                result
                    .map(|mut buf| buf.copy_to_bytes(buf.remaining()))
                    .map_err(Error::Service)
            })
        })
    }
}

impl<S, E> Future for Collect<S>
where
    S: TryStream<Ok = Bytes, Error = Error<E>>,
{
    type Output = Result<Vec<u8>, Error<E>>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let mut this = self.project();
        while let Some(chunk) = ready!(this.stream.as_mut().try_poll_next(cx)?) {
            this.buf.extend_from_slice(&chunk);
        }
        Poll::Ready(Ok(mem::take(this.buf)))
    }
}

#[cfg(feature = "gzip")]
mod imp {
    use std::io;
    use std::pin::Pin;
    use std::task::{Context, Poll};

    use async_compression::tokio::bufread::GzipDecoder;
    use bytes::{Buf, Bytes};
    use futures_core::{Stream, TryStream};
    use futures_util::future::Either;
    use futures_util::ready;
    use pin_project_lite::pin_project;
    use tokio_util::codec::{BytesCodec, FramedRead};
    use tokio_util::io::StreamReader;

    use crate::error::Error;

    pub type MaybeGzip<S> = Either<Gzip<S>, S>;

    type Decoder<S> = FramedRead<GzipDecoder<StreamReader<S, <S as TryStream>::Ok>>, BytesCodec>;

    pin_project! {
        pub struct Gzip<S: TryStream> {
            #[pin]
            inner: Decoder<Stash<S>>,
        }
    }

    pin_project! {
        // Keeps the error of the underlying stream, which `StreamReader` can only report as an
        // `io::Error`.
        struct Stash<S>
        where
            S: TryStream,
        {
            #[pin]
            inner: S,
            error: Option<S::Error>,
        }
    }

    impl<S: TryStream<Error = Error<E>>, E> Stream for Gzip<S>
    where
        S::Ok: Buf,
    {
        type Item = Result<Bytes, Error<E>>;

        fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
            let mut inner = self.project().inner;
            match ready!(inner.as_mut().poll_next(cx)) {
                Some(Ok(buf)) => Poll::Ready(Some(Ok(buf.freeze()))),
                Some(Err(e)) => {
                    let stashed = inner
                        .get_pin_mut()
                        .get_pin_mut()
                        .get_pin_mut()
                        .project()
                        .error
                        .take();
                    Poll::Ready(Some(Err(stashed.unwrap_or(Error::Gzip(e)))))
                }
                None => Poll::Ready(None),
            }
        }
    }

    impl<S: TryStream> Stream for Stash<S> {
        type Item = io::Result<S::Ok>;

        fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
            let mut this = self.project();
            let item = ready!(this.inner.as_mut().try_poll_next(cx)).map(|result| {
                result.map_err(|e| {
                    *this.error = Some(e);
                    io::Error::new(io::ErrorKind::Other, "response body stream failed")
                })
            });
            Poll::Ready(item)
        }
    }

    pub fn gzip<S: TryStream>(s: S) -> MaybeGzip<S>
    where
        S::Ok: Buf,
    {
        let stash = Stash {
            inner: s,
            error: None,
        };
        let inner = FramedRead::new(GzipDecoder::new(StreamReader::new(stash)), BytesCodec::new());
        Either::Left(Gzip { inner })
    }

    pub fn identity<S: TryStream>(s: S) -> MaybeGzip<S> {
        Either::Right(s)
    }
}

#[cfg(not(feature = "gzip"))]
mod imp {
    use bytes::Bytes;
    use futures_core::TryStream;

    pub type MaybeGzip<S> = S;

    pub fn gzip<S: TryStream<Ok = Bytes>>(s: S) -> MaybeGzip<S> {
        s
    }

    pub fn identity<S: TryStream<Ok = Bytes>>(s: S) -> MaybeGzip<S> {
        s
    }
}
