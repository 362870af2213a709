//! Rate limit information reported by the API.

use std::fmt::{self, Display, Formatter};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use http::header::HeaderMap;

const INTERVAL: &str = "x-rate-limit-interval";
const LIMIT: &str = "x-rate-limit-limit";
const RESET: &str = "x-rate-limit-reset";

/// The request quota of an access token, as reported in the headers of a response.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RateLimit {
    /// The number of requests allowed per `interval`.
    pub limit: Option<u64>,
    /// The length of the rate limiting period.
    pub interval: Option<Duration>,
    /// The time at which the current period ends.
    pub reset: Option<SystemTime>,
}

impl RateLimit {
    /// Reads the `X-Rate-Limit-*` headers. Returns `None` if none of them is present and valid.
    pub fn from_headers(headers: &HeaderMap) -> Option<Self> {
        fn number(headers: &HeaderMap, name: &str) -> Option<u64> {
            headers.get(name)?.to_str().ok()?.trim().parse().ok()
        }

        let limit = RateLimit {
            limit: number(headers, LIMIT),
            interval: number(headers, INTERVAL).map(Duration::from_secs),
            reset: number(headers, RESET)
                .and_then(|secs| UNIX_EPOCH.checked_add(Duration::from_secs(secs))),
        };

        if limit == RateLimit::default() {
            None
        } else {
            Some(limit)
        }
    }

    /// Explains why the request failed.
    pub fn failure_reason(&self) -> String {
        match (self.limit, self.interval) {
            (Some(limit), Some(interval)) => format!(
                "More than {} requests have been made with this access token within a period of {}.",
                limit,
                Period(interval),
            ),
            _ => "Too many requests have been made with this access token.".to_owned(),
        }
    }

    /// Suggests when the request may be retried.
    pub fn recovery_suggestion(&self) -> Option<String> {
        let reset = self.reset?.duration_since(UNIX_EPOCH).ok()?;
        Some(format!(
            "Wait until {} (Unix time) before retrying.",
            reset.as_secs(),
        ))
    }
}

impl Display for RateLimit {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.failure_reason())?;
        if let Some(suggestion) = self.recovery_suggestion() {
            write!(f, " {}", suggestion)?;
        }
        Ok(())
    }
}

/// Writes a duration in the largest whole unit among hours, minutes and seconds.
struct Period(Duration);

impl Display for Period {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let secs = self.0.as_secs();
        let (n, unit) = if secs != 0 && secs % 3600 == 0 {
            (secs / 3600, "hour")
        } else if secs != 0 && secs % 60 == 0 {
            (secs / 60, "minute")
        } else {
            (secs, "second")
        };
        write!(f, "{} {}{}", n, unit, if n == 1 { "" } else { "s" })
    }
}

#[cfg(test)]
mod tests {
    use http::header::HeaderValue;

    use super::*;

    #[test]
    fn from_headers() {
        let mut headers = HeaderMap::new();
        assert_eq!(RateLimit::from_headers(&headers), None);

        headers.insert(INTERVAL, HeaderValue::from_static("60"));
        headers.insert(LIMIT, HeaderValue::from_static("600"));
        headers.insert(RESET, HeaderValue::from_static("1479460584"));

        let limit = RateLimit::from_headers(&headers).unwrap();
        assert_eq!(limit.limit, Some(600));
        assert_eq!(limit.interval, Some(Duration::from_secs(60)));
        assert_eq!(limit.reset, Some(UNIX_EPOCH + Duration::from_secs(1479460584)));
        assert_eq!(
            limit.to_string(),
            "More than 600 requests have been made with this access token within a period of \
             1 minute. Wait until 1479460584 (Unix time) before retrying.",
        );
    }

    #[test]
    fn invalid_headers_are_ignored() {
        let mut headers = HeaderMap::new();
        headers.insert(LIMIT, HeaderValue::from_static("lots"));
        assert_eq!(RateLimit::from_headers(&headers), None);

        assert_eq!(
            RateLimit::default().to_string(),
            "Too many requests have been made with this access token.",
        );
    }

    #[test]
    fn unrepresentable_reset_is_ignored() {
        let mut headers = HeaderMap::new();
        headers.insert(RESET, HeaderValue::from_static("18446744073709551615"));
        assert_eq!(RateLimit::from_headers(&headers), None);

        headers.insert(LIMIT, HeaderValue::from_static("600"));
        let limit = RateLimit::from_headers(&headers).unwrap();
        assert_eq!(limit.limit, Some(600));
        assert_eq!(limit.reset, None);
    }

    #[test]
    fn period() {
        macro_rules! test {
            ($($secs:expr => $expected:expr,)*) => {$(
                assert_eq!(Period(Duration::from_secs($secs)).to_string(), $expected);
            )*};
        }

        test! {
            0 => "0 seconds",
            1 => "1 second",
            45 => "45 seconds",
            60 => "1 minute",
            90 => "90 seconds",
            600 => "10 minutes",
            3600 => "1 hour",
            7200 => "2 hours",
        }
    }
}
