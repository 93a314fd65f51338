//! Output framing derivation.
//!
//! The framing for a scene's video is derived deterministically from
//! the scene's stored visual description: the image stage embeds a
//! composition keyword in every prompt. Only landscape and portrait
//! outputs are supported by the video provider; a scene whose
//! description derives any other framing (e.g. square) is skipped as
//! a non-fatal scene failure.

/// Supported output framings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Framing {
    /// 16:9 landscape.
    Landscape,
    /// 9:16 vertical.
    Portrait,
}

impl Framing {
    /// Aspect-ratio string sent to the video provider.
    pub fn as_str(&self) -> &'static str {
        match self {
            Framing::Landscape => "16:9",
            Framing::Portrait => "9:16",
        }
    }
}

/// Derive the output framing from a scene's visual description.
///
/// Keyword-based: a `9:16`/vertical marker selects portrait, a square
/// marker (`1:1`) is unsupported and returns `None`, and everything
/// else (including the explicit `16:9` marker) defaults to landscape.
pub fn derive_framing(visual_description: &str) -> Option<Framing> {
    let lower = visual_description.to_lowercase();

    if lower.contains("9:16") || lower.contains("vertical") {
        return Some(Framing::Portrait);
    }
    if lower.contains("1:1") || lower.contains("square") {
        return None;
    }
    Some(Framing::Landscape)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_landscape_marker() {
        assert_eq!(
            derive_framing("Wide shot entering the salon. Photorealistic, 16:9."),
            Some(Framing::Landscape)
        );
    }

    #[test]
    fn vertical_markers_select_portrait() {
        assert_eq!(
            derive_framing("Portrait shoulders-up. Photorealistic, 9:16."),
            Some(Framing::Portrait)
        );
        assert_eq!(
            derive_framing("9:16 vertical composition"),
            Some(Framing::Portrait)
        );
    }

    #[test]
    fn square_is_unsupported() {
        assert_eq!(derive_framing("Medium close-up. Photorealistic, 1:1."), None);
        assert_eq!(derive_framing("square crop, centered subject"), None);
    }

    #[test]
    fn no_marker_defaults_to_landscape() {
        assert_eq!(
            derive_framing("Medium shot at the reception counter."),
            Some(Framing::Landscape)
        );
    }

    #[test]
    fn aspect_strings() {
        assert_eq!(Framing::Landscape.as_str(), "16:9");
        assert_eq!(Framing::Portrait.as_str(), "9:16");
    }
}
