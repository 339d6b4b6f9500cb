//! Display formatting shared by the page view-models and the CLI.

#[cfg(test)]
#[path = "format_test.rs"]
mod format_test;

use serde::Serialize;

/// Abbreviate a count: `1234` -> `1.2K`, `2500000` -> `2.5M`. Absent is `0`.
#[must_use]
pub fn format_number(value: Option<i64>) -> String {
    let Some(n) = value else {
        return "0".to_owned();
    };
    #[allow(clippy::cast_precision_loss)]
    let f = n as f64;
    if n >= 1_000_000_000 {
        format!("{:.1}B", f / 1_000_000_000.0)
    } else if n >= 1_000_000 {
        format!("{:.1}M", f / 1_000_000.0)
    } else if n >= 1_000 {
        format!("{:.1}K", f / 1_000.0)
    } else {
        n.to_string()
    }
}

/// Render a value already expressed in percent (`4.2`) as `4.2%`.
#[must_use]
pub fn format_percent(value: Option<f64>) -> String {
    format!("{:.1}%", value.unwrap_or_default())
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Up,
    Down,
    Flat,
}

impl Trend {
    #[must_use]
    pub fn of(growth: Option<f64>) -> Self {
        match growth {
            Some(g) if g > 0.0 => Self::Up,
            Some(g) if g < 0.0 => Self::Down,
            _ => Self::Flat,
        }
    }

    #[must_use]
    pub fn arrow(self) -> &'static str {
        match self {
            Self::Up => "↗",
            Self::Down => "↘",
            Self::Flat => "→",
        }
    }
}

/// `+12.5% ↗`, `-3.0% ↘`, `n/a →`.
#[must_use]
pub fn format_growth(growth: Option<f64>) -> String {
    let trend = Trend::of(growth);
    match growth {
        Some(g) => format!("{g:+.1}% {}", trend.arrow()),
        None => format!("n/a {}", trend.arrow()),
    }
}
