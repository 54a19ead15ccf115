//! Default header set for exchange requests

use reqwest::header::{
    HeaderMap, HeaderName, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, USER_AGENT,
};

use crate::config::NseConfig;
use crate::errors::NseError;

const X_REQUESTED_WITH: &str = "x-requested-with";

/// Build the headers every session carries.
///
/// The API rejects requests that do not look like the website's own XHR
/// calls, so all four are required.
pub fn nse_headers(config: &NseConfig) -> Result<HeaderMap, NseError> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, header_value("Accept", &config.accept)?);
    headers.insert(
        ACCEPT_LANGUAGE,
        header_value("Accept-Language", &config.accept_language)?,
    );
    headers.insert(USER_AGENT, header_value("User-Agent", &config.user_agent)?);
    headers.insert(
        HeaderName::from_static(X_REQUESTED_WITH),
        header_value("X-Requested-With", &config.x_requested_with)?,
    );
    Ok(headers)
}

fn header_value(name: &str, value: &str) -> Result<HeaderValue, NseError> {
    HeaderValue::from_str(value)
        .map_err(|e| NseError::Config(format!("{} header: {}", name, e)))
}
