//! Configuration for highlight rendering and selection observation
//!
//! The core never hardcodes colors or visual styles. It only toggles the
//! class and attribute markers configured here; an external stylesheet
//! decides what a "focused" or "tinted" highlight looks like.

use serde::Deserialize;

/// Configuration for highlight creation and styling markers
#[derive(Debug, Clone, Deserialize)]
pub struct HighlightConfig {
    /// CSS class prefix for highlight containers and overlay shapes
    pub class_prefix: String,
    /// Data attribute carrying the highlight handle id
    pub id_attribute: String,
    /// Class toggled on a subtree root to make its highlights visible
    pub visible_class: String,
    /// Class marking the transparent text layer of a rasterized page
    pub text_layer_class: String,
    /// Class identifying the vector overlay canvas of a page
    pub overlay_class: String,
    /// Nesting depth beyond which stacked highlights stop darkening
    pub max_blend_depth: u32,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            class_prefix: "mg-highlight".to_string(),
            id_attribute: "data-highlight-id".to_string(),
            visible_class: "mg-highlights-visible".to_string(),
            text_layer_class: "text-layer".to_string(),
            overlay_class: "mg-overlay".to_string(),
            max_blend_depth: 4,
        }
    }
}

impl HighlightConfig {
    /// Class applied to every highlight container
    pub fn base_class(&self) -> String {
        self.class_prefix.clone()
    }

    /// Class for a per-category tint grouping (e.g. "mg-highlight-note")
    pub fn tint_class(&self, style_tag: &str) -> String {
        format!("{}-{}", self.class_prefix, style_tag)
    }

    /// Class for the focused state
    pub fn focused_class(&self) -> String {
        format!("{}-focused", self.class_prefix)
    }

    /// Class marking highlighted text as visually transparent
    /// (the vector overlay carries the visible color instead)
    pub fn transparent_class(&self) -> String {
        format!("{}-transparent", self.class_prefix)
    }

    /// Class encoding the capped nesting depth of a highlight
    pub fn depth_class(&self, depth: u32) -> String {
        format!("{}-depth-{}", self.class_prefix, depth.min(self.max_blend_depth))
    }

    /// Class applied to overlay rectangle shapes
    pub fn shape_class(&self) -> String {
        format!("{}-shape", self.class_prefix)
    }
}

/// Configuration for the selection observer debounce behavior
#[derive(Debug, Clone, Deserialize)]
pub struct ObserverConfig {
    /// Fast-path delay in milliseconds, used after a mouse release.
    /// Browsers defer the selection update by one tick after mouse-up,
    /// so this only needs to cover that tick.
    pub mouseup_delay_ms: u64,
    /// Slow-path delay in milliseconds, used for keyboard, touch-handle
    /// and programmatic changes so rapid bursts coalesce into one
    /// notification.
    pub input_delay_ms: u64,
}

impl Default for ObserverConfig {
    fn default() -> Self {
        Self {
            mouseup_delay_ms: 50,
            input_delay_ms: 300,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_classes() {
        let config = HighlightConfig::default();

        assert_eq!(config.base_class(), "mg-highlight");
        assert_eq!(config.tint_class("note"), "mg-highlight-note");
        assert_eq!(config.focused_class(), "mg-highlight-focused");
        assert_eq!(config.depth_class(2), "mg-highlight-depth-2");
    }

    #[test]
    fn test_depth_class_caps_at_max() {
        let config = HighlightConfig::default();

        assert_eq!(config.depth_class(4), "mg-highlight-depth-4");
        assert_eq!(config.depth_class(9), "mg-highlight-depth-4");
    }

    #[test]
    fn test_deserialize_observer_config() {
        let json = r#"{"mouseup_delay_ms": 10, "input_delay_ms": 500}"#;
        let config: ObserverConfig = serde_json::from_str(json).unwrap();

        assert_eq!(config.mouseup_delay_ms, 10);
        assert_eq!(config.input_delay_ms, 500);
    }
}
