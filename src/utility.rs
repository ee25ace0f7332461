//! Utilities
use std::{collections::BTreeMap, env, fmt::Display, fs, io::Write, path::Path, str::FromStr, time::Duration};
use log::*;
use anyhow::{Context, Result};
use reqwest::Client;
use crate::{DEFAULT_ADDR, DEFAULT_INTERVAL, DEFAULT_MAX_ERRORS};

/// Perform a HTTP GET and return the body.
///
/// The status is not checked: an error page is returned like any other body,
/// and will fail to decode as the vars document.
/// A failure reading the body is flagged by [`reqwest::Error::is_body`].
pub async fn http_get(
    client: &Client,
    url: &str,
) -> reqwest::Result<String>
{
    let response = client.get(url).send().await?;

    if !response.status().is_success()
    {
        debug!("Non success response: {} = {}", url, response.status());
    }
    else
    {
        debug!("Success response: {} = {}", url, response.status());
    }

    response.text().await
}

pub fn set_addr(
    option: &Option<String>,
    changed_options: &mut BTreeMap<&'static str, String>,
) -> String
{
    resolve_setting("ADDR", option, changed_options, |addr: &String| !addr.is_empty())
        .unwrap_or_else(|| {
            info!("addr not set: and not set via .env: using DEFAULT_ADDR: {}", DEFAULT_ADDR);
            DEFAULT_ADDR.to_string()
        })
}

pub fn set_interval(
    option: &Option<u64>,
    changed_options: &mut BTreeMap<&'static str, String>,
) -> Duration
{
    let seconds = resolve_setting("INTERVAL", option, changed_options, |seconds: &u64| *seconds > 0)
        .unwrap_or_else(|| {
            info!("interval not set: and not set via .env: using DEFAULT_INTERVAL: {}", DEFAULT_INTERVAL);
            DEFAULT_INTERVAL
        });
    Duration::from_secs(seconds)
}

pub fn set_max_errors(
    option: &Option<u32>,
    changed_options: &mut BTreeMap<&'static str, String>,
) -> u32
{
    resolve_setting("MAX_ERRORS", option, changed_options, |max_errors: &u32| *max_errors > 0)
        .unwrap_or_else(|| {
            info!("max errors not set: and not set via .env: using DEFAULT_MAX_ERRORS: {}", DEFAULT_MAX_ERRORS);
            DEFAULT_MAX_ERRORS
        })
}

/// There is no default timeout: unset means the request is bounded by the transport only.
pub fn set_timeout(
    option: &Option<u64>,
    changed_options: &mut BTreeMap<&'static str, String>,
) -> Option<Duration>
{
    resolve_setting("TIMEOUT", option, changed_options, |seconds: &u64| *seconds > 0)
        .map(Duration::from_secs)
}

// The command line option wins over the environment variable, which is populated from .env if present.
// An environment value that does not parse, or is not valid, is ignored.
fn resolve_setting<T>(
    name: &'static str,
    option: &Option<T>,
    changed_options: &mut BTreeMap<&'static str, String>,
    is_valid: fn(&T) -> bool,
) -> Option<T>
where
    T: FromStr + Display + Clone,
{
    if let Some(value) = option
    {
        info!("{} argument set: using: {}", name, value);
        changed_options.insert(name, value.to_string());
        return Some(value.clone());
    }
    match env::var(name)
    {
        Ok(set_var) => {
            match parse_setting(&set_var, is_valid)
            {
                Some(value) => {
                    info!("{} not set as argument: set via .env: {}", name, value);
                    changed_options.insert(name, set_var);
                    Some(value)
                }
                None => {
                    debug!("{} set via .env to invalid value: {:?}, ignoring", name, set_var);
                    None
                }
            }
        }
        Err(_e) => None,
    }
}

fn parse_setting<T: FromStr>(
    value: &str,
    is_valid: fn(&T) -> bool,
) -> Option<T>
{
    value.parse().ok().filter(is_valid)
}

/// Persist the settings that were set as argument or via the environment to `.env` in the current directory,
/// so the next run picks them up without arguments.
pub fn dotenv_writer(
    write_dotenv: bool,
    changed_options: &BTreeMap<&'static str, String>,
) -> Result<()>
{
    if write_dotenv && !changed_options.is_empty()
    {
        write_dotenv_file(Path::new(".env"), changed_options)?;
    }
    Ok(())
}

fn write_dotenv_file(
    path: &Path,
    changed_options: &BTreeMap<&'static str, String>,
) -> Result<()>
{
    info!("Writing {}", path.display());
    let contents: String = changed_options.iter()
        .map(|(key, value)| format!("{}={}\n", key, value))
        .collect();
    fs::File::create(path)
        .and_then(|mut file| file.write_all(contents.as_bytes()))
        .with_context(|| format!("Error writing .env file: {}", path.display()))?;
    for (key, value) in changed_options
    {
        info!("{}={}", key, value);
    }
    Ok(())
}
