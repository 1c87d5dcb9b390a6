//! Filter expressions shared by command-line flags and the browse loop.
//!
//! - facet: `gender=men`
//! - range: `price=100..400`, `price=..400`, `size=50..`

use anyhow::{Context, Result, bail};
use catalog_core::NumericRange;
use catalog_model::FacetName;

/// Parse `name=value`.
pub fn parse_facet_assignment(raw: &str) -> Result<(FacetName, String)> {
    let (name, value) = split_assignment(raw)?;
    if value.is_empty() {
        bail!("missing value in {raw:?}");
    }
    Ok((name, value.to_string()))
}

/// Parse `name=min..max`.
pub fn parse_range_assignment(raw: &str) -> Result<(FacetName, NumericRange)> {
    let (name, bounds) = split_assignment(raw)?;
    let range = parse_bounds(bounds).with_context(|| format!("range for {name}"))?;
    Ok((name, range))
}

/// Parse `min..max` where either side may be omitted.
pub fn parse_bounds(raw: &str) -> Result<NumericRange> {
    let Some((min, max)) = raw.trim().split_once("..") else {
        bail!("expected MIN..MAX, got {raw:?}");
    };
    let min = parse_bound(min)?;
    let max = parse_bound(max)?;
    if let (Some(min), Some(max)) = (min, max)
        && min > max
    {
        bail!("minimum {min} is greater than maximum {max}");
    }
    Ok(NumericRange { min, max })
}

fn split_assignment(raw: &str) -> Result<(FacetName, &str)> {
    let Some((name, value)) = raw.split_once('=') else {
        bail!("expected NAME=VALUE, got {raw:?}");
    };
    let name = FacetName::new(name.trim())?;
    Ok((name, value.trim()))
}

fn parse_bound(raw: &str) -> Result<Option<f64>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    let value: f64 = raw
        .parse()
        .with_context(|| format!("invalid number {raw:?}"))?;
    if !value.is_finite() {
        bail!("bound must be finite, got {raw:?}");
    }
    Ok(Some(value))
}
