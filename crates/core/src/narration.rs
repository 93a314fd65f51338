//! Spoken narration text derivation.

use serde::{Deserialize, Serialize};

/// On-screen text overlay for a scene.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TextOverlay {
    pub headline: Option<String>,
    pub subtext: Option<String>,
    pub cta: Option<String>,
}

impl TextOverlay {
    pub fn is_empty(&self) -> bool {
        self.headline.is_none() && self.subtext.is_none() && self.cta.is_none()
    }
}

/// Optional business-identity metadata supplied when the campaign's
/// videos are enqueued. Used for watermarking and narration contact
/// lines.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BusinessIdentity {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
}

/// Build the spoken narration text for one scene.
///
/// Joins the overlay lines in order (headline, subtext, CTA) and, when
/// the scene carries a CTA, appends the business contact lines. An
/// empty overlay yields an empty string; the caller decides whether to
/// synthesize silence or skip narration entirely.
pub fn build_scene_narration(overlay: &TextOverlay, business: Option<&BusinessIdentity>) -> String {
    let mut parts: Vec<String> = Vec::new();

    if let Some(headline) = &overlay.headline {
        parts.push(headline.clone());
    }
    if let Some(subtext) = &overlay.subtext {
        parts.push(subtext.clone());
    }
    if let Some(cta) = &overlay.cta {
        parts.push(cta.clone());
    }

    // Contact lines ride along with the CTA only.
    if overlay.cta.is_some() {
        if let Some(business) = business {
            if let Some(phone) = &business.phone {
                parts.push(format!("Call us at {phone}"));
            }
            if let Some(website) = &business.website {
                parts.push(format!("Visit {website}"));
            }
        }
    }

    parts.join(". ")
}
