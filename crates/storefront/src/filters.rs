//! Askama filters used by `base.html`.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;

/// Year for the footer: `{{ ""|current_year }}`.
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    use chrono::Datelike;
    Ok(chrono::Utc::now().year())
}

/// Content version of `static/`, set by the build script:
/// `/static/css/main.css?v={{ ""|asset_version }}`.
#[askama::filter_fn]
pub fn asset_version(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<&'static str> {
    Ok(env!("ASSET_VERSION"))
}
