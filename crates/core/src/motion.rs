//! Scene roles and their motion directives.
//!
//! Each scene declares a role describing its place in the ad's arc;
//! the role maps to a fixed motion/style directive fed to the video
//! synthesizer. The lookup never fails: unknown or missing roles fall
//! back to the `brand` directive.

/// Declared role of a scene within the campaign arc.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneRole {
    /// Establishing brand shot. The default.
    Brand,
    /// Service being performed.
    Service,
    /// Customer reaction.
    Reaction,
    /// Call to action.
    Cta,
}

impl SceneRole {
    /// String representation for database storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            SceneRole::Brand => "brand",
            SceneRole::Service => "service",
            SceneRole::Reaction => "reaction",
            SceneRole::Cta => "cta",
        }
    }

    /// Parse from a string, falling back to [`SceneRole::Brand`] for
    /// unknown values. Fallback is intentional, never an error.
    pub fn from_str(s: &str) -> Self {
        match s {
            "service" => SceneRole::Service,
            "reaction" => SceneRole::Reaction,
            "cta" => SceneRole::Cta,
            _ => SceneRole::Brand,
        }
    }

    /// The motion/style directive for this role.
    pub fn motion_directive(&self) -> &'static str {
        match self {
            SceneRole::Brand => {
                "Subject stands confidently, gentle head movement and blinking. \
                 Slow cinematic camera push-in. Stable framing."
            }
            SceneRole::Service => {
                "Medium eye-level shot. Person and activity visible together. \
                 Hands move naturally but not close to camera. \
                 Slow, smooth camera push-in."
            }
            SceneRole::Reaction => {
                "Medium eye-level shot. Subject smiles naturally and blinks. \
                 Subtle breathing visible. \
                 Very slow, smooth camera push-in. Stable framing."
            }
            SceneRole::Cta => {
                "Subject looks confidently toward camera. \
                 Minimal movement with gentle blinking. \
                 Slow push-in. Stable framing."
            }
        }
    }
}
