//! Public landing page. Signed-in users are sent onward by the gate.

#[cfg(test)]
#[path = "landing_test.rs"]
mod landing_test;

use serde::Serialize;

use crate::session::gate::{Navigation, Route};
use crate::session::provider::SessionProvider;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Feature {
    pub title: &'static str,
    pub summary: &'static str,
}

pub static FEATURES: [Feature; 3] = [
    Feature {
        title: "Performance Analytics in Your Niche",
        summary: "Track your reach, engagement, and growth with analytics that make complex data simple to understand.",
    },
    Feature {
        title: "Creator Recommendations",
        summary: "Discover successful creators in your niche and learn what makes them stand out.",
    },
    Feature {
        title: "Engaged Leads",
        summary: "Identify your most engaged followers and get strategies to turn them into collaboration partners.",
    },
];

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LandingPage {
    pub headline: &'static str,
    pub features: &'static [Feature],
    /// Where "Get Started" leads.
    pub get_started: Route,
}

impl Default for LandingPage {
    fn default() -> Self {
        Self {
            headline: "Navigate Your TikTok Success with Data-Driven Insights",
            features: &FEATURES,
            get_started: Route::Onboarding,
        }
    }
}

impl LandingPage {
    /// Render the landing page, or return where the gate sends the caller.
    pub async fn mount(provider: &SessionProvider) -> Result<Self, Route> {
        let outcome = provider.guard(Route::Landing).await;
        match outcome.navigation {
            Navigation::Stay => Ok(Self::default()),
            Navigation::Redirect(to) => Err(to),
        }
    }
}
