//! The impls and functions
//!
use std::{io::Write, time::Duration};
use log::*;
use reqwest::Client;
use tokio::time::{self, Instant, MissedTickBehavior};
use crate::utility;
use crate::memstats::{MemoryStatsRecord, VarsDocument};
use crate::poller::{CeilingBreached, DecodeError, ErrorCounter, PollConfig, PollError};

// tokio panics on a zero period.
const MIN_INTERVAL: Duration = Duration::from_millis(1);

impl PollConfig {
    pub fn url(&self) -> String
    {
        format!("http://{}/debug/vars", self.addr)
    }
    /// The HTTP client used for every tick, with the request timeout applied if one is set.
    pub fn build_client(&self) -> reqwest::Result<Client>
    {
        let mut builder = Client::builder();
        if let Some(timeout) = self.timeout
        {
            builder = builder.timeout(timeout);
        }
        builder.build()
    }
}

impl ErrorCounter {
    pub fn new(ceiling: u32) -> Self
    {
        ErrorCounter { count: 0, ceiling }
    }
    pub fn record_failure(&mut self)
    {
        self.count = self.count.saturating_add(1);
    }
    pub fn count(&self) -> u32 { self.count }
    pub fn ceiling(&self) -> u32 { self.ceiling }
    pub fn is_breached(&self) -> bool
    {
        self.count >= self.ceiling
    }
}

/// Perform a single tick: fetch, decode, extract and write one line to `out`.
///
/// Nothing is written unless every step succeeded.
pub async fn poll_once<W: Write>(
    client: &Client,
    url: &str,
    out: &mut W,
) -> Result<(), PollError>
{
    // a failure while reading the body happens after the response arrived, so it is a decode failure.
    let body = utility::http_get(client, url)
        .await
        .map_err(|e| {
            if e.is_body() || e.is_decode()
            {
                PollError::Decode(DecodeError::Body(e))
            }
            else
            {
                PollError::Transport(e)
            }
        })?;

    let vars = parse_vars(&body)?;

    let record = MemoryStatsRecord::from_vars(&vars)?;
    let line = record.to_json_line()?;

    out.write_all(&line)
        .and_then(|_| out.flush())
        .map_err(serde_json::Error::io)?;

    debug!("memstats written, timestamp: {}", record.timestamp);
    Ok(())
}

/// Decode the first JSON value of the body as the vars document.
///
/// Anything after the first value is ignored, so a complete document followed by stray bytes still decodes.
pub fn parse_vars(
    body: &str,
) -> Result<VarsDocument, DecodeError>
{
    match serde_json::Deserializer::from_str(body)
        .into_iter::<VarsDocument>()
        .next()
    {
        Some(vars) => Ok(vars?),
        None => Err(DecodeError::Empty),
    }
}

/// Poll `config.url()` every `config.interval` until the error ceiling is reached.
///
/// The first tick fires one full interval after the start.
/// A tick that takes longer than the interval delays the following ticks; they are not skipped and not bunched up.
/// The ceiling is checked at the start of every tick, so no request is made once it is reached.
pub async fn run<W: Write>(
    config: &PollConfig,
    client: &Client,
    out: &mut W,
) -> CeilingBreached
{
    let url = config.url();
    let period = config.interval.max(MIN_INTERVAL);
    let mut errors = ErrorCounter::new(config.max_errors);

    info!("checking expvars at {} every {:?}", url, period);

    let mut ticker = time::interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop
    {
        ticker.tick().await;

        if errors.is_breached()
        {
            return CeilingBreached {
                ceiling: errors.ceiling(),
                failures: errors.count(),
            };
        }

        if let Err(e) = poll_once(client, &url, out).await
        {
            errors.record_failure();
            warn!("{} ({}/{} errors)", e, errors.count(), errors.ceiling());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_default_config() {
        let config = PollConfig::default();
        assert_eq!(config.addr, "localhost:6060");
        assert_eq!(config.interval, Duration::from_secs(30));
        assert_eq!(config.max_errors, 10);
        assert_eq!(config.timeout, None);
        assert_eq!(config.url(), "http://localhost:6060/debug/vars");
    }

    #[test]
    fn unit_url_uses_addr() {
        let config = PollConfig { addr: "10.1.2.3:8080".to_string(), ..Default::default() };
        assert_eq!(config.url(), "http://10.1.2.3:8080/debug/vars");
    }

    #[test]
    fn unit_error_counter_reaches_ceiling() {
        let mut errors = ErrorCounter::new(3);
        assert!(!errors.is_breached());
        errors.record_failure();
        errors.record_failure();
        assert!(!errors.is_breached());
        errors.record_failure();
        assert!(errors.is_breached());
        errors.record_failure();
        assert!(errors.is_breached());
        assert_eq!(errors.count(), 4);
    }

    #[test]
    fn unit_error_counter_zero_ceiling_is_breached_immediately() {
        assert!(ErrorCounter::new(0).is_breached());
    }

    #[test]
    fn unit_ceiling_breached_message() {
        let breached = CeilingBreached { ceiling: 10, failures: 10 };
        assert_eq!(breached.to_string(), "maximum error threshold of 10 breached; exiting");
    }

    #[test]
    fn unit_parse_vars_ignores_data_after_the_document() {
        let vars = parse_vars(r#"{"memstats":{"Alloc":1}} trailing"#).unwrap();
        assert!(vars.contains_key("memstats"));
    }

    #[test]
    fn unit_parse_vars_empty_body() {
        assert!(matches!(parse_vars(""), Err(DecodeError::Empty)));
        assert!(matches!(parse_vars("  \n"), Err(DecodeError::Empty)));
    }

    #[test]
    fn unit_parse_vars_rejects_malformed_and_non_object() {
        assert!(matches!(parse_vars(r#"{"memstats":{"Alloc":1"#), Err(DecodeError::Json(_))));
        assert!(matches!(parse_vars("404 page not found"), Err(DecodeError::Json(_))));
        assert!(matches!(parse_vars("[1,2,3]"), Err(DecodeError::Json(_))));
    }

    #[tokio::test]
    async fn unit_zero_ceiling_terminates_without_request() {
        // nothing listens on the discard port; a request would be a counted failure, not a hang.
        let config = PollConfig {
            addr: "127.0.0.1:9".to_string(),
            interval: Duration::from_millis(5),
            max_errors: 0,
            timeout: Some(Duration::from_secs(1)),
        };
        let client = config.build_client().unwrap();
        let mut out = Vec::new();
        let breached = run(&config, &client, &mut out).await;
        assert_eq!(breached, CeilingBreached { ceiling: 0, failures: 0 });
        assert!(out.is_empty());
    }
}
