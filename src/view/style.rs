use eframe::egui::{Color32, Stroke};
use serde::Deserialize;

use crate::error::{Error, Result};
use crate::network::Node;

pub const COMMUNITY_PALETTE: [Color32; 10] = [
    Color32::from_rgb(0xFF, 0x6B, 0x6B),
    Color32::from_rgb(0x4E, 0xCD, 0xC4),
    Color32::from_rgb(0x45, 0xB7, 0xD1),
    Color32::from_rgb(0xFF, 0xA0, 0x7A),
    Color32::from_rgb(0x98, 0xD8, 0xC8),
    Color32::from_rgb(0xF7, 0xDC, 0x6F),
    Color32::from_rgb(0xBB, 0x8F, 0xCE),
    Color32::from_rgb(0x85, 0xC1, 0xE2),
    Color32::from_rgb(0xF8, 0xB7, 0x39),
    Color32::from_rgb(0x52, 0xB7, 0x88),
];

const EDGE_COLOR: Color32 = Color32::from_rgb(0x88, 0x88, 0x88);
const HIGHLIGHT_COLOR: Color32 = Color32::from_rgb(0xFF, 0xD7, 0x00);
const BORDER_COLOR: Color32 = Color32::from_rgb(0x22, 0x22, 0x22);
const SELECTED_BORDER_COLOR: Color32 = Color32::BLACK;

const MIN_NODE_WIDTH: f32 = 100.0;
const MAX_NODE_WIDTH: f32 = 200.0;

pub fn community_color(community: u32) -> Color32 {
    COMMUNITY_PALETTE[community as usize % COMMUNITY_PALETTE.len()]
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EdgeStyle {
    pub stroke: Stroke,
    pub opacity: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NodeStyle {
    pub fill: Color32,
    pub border: Stroke,
    pub width: f32,
}

pub fn node_style(node: &Node, selected: bool) -> NodeStyle {
    let border = if selected {
        Stroke::new(3.0, SELECTED_BORDER_COLOR)
    } else {
        Stroke::new(1.0, BORDER_COLOR)
    };

    NodeStyle {
        fill: community_color(node.community),
        border,
        width: (node.size * 2.0).clamp(MIN_NODE_WIDTH, MAX_NODE_WIDTH),
    }
}

/// Stroke widths and opacities for the three edge states.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct EdgeStylePolicy {
    pub base_scale: f32,
    pub base_cap: f32,
    pub highlight_scale: f32,
    pub highlight_cap: f32,
    pub dimmed_width: f32,
    pub dimmed_opacity: f32,
}

impl Default for EdgeStylePolicy {
    fn default() -> Self {
        Self {
            base_scale: 1.5,
            base_cap: 8.0,
            highlight_scale: 4.0,
            highlight_cap: 8.0,
            dimmed_width: 1.0,
            dimmed_opacity: 0.15,
        }
    }
}

impl EdgeStylePolicy {
    pub fn validate(&self) -> Result<()> {
        let widths = [
            ("base_scale", self.base_scale),
            ("base_cap", self.base_cap),
            ("highlight_scale", self.highlight_scale),
            ("highlight_cap", self.highlight_cap),
            ("dimmed_width", self.dimmed_width),
        ];
        for (name, value) in widths {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::Config(format!(
                    "edges.{name} must be a non-negative number"
                )));
            }
        }
        if !(0.0..=1.0).contains(&self.dimmed_opacity) {
            return Err(Error::Config(
                "edges.dimmed_opacity must lie within 0..=1".to_owned(),
            ));
        }
        Ok(())
    }

    /// Selection-independent style, computed once per snapshot.
    pub fn baseline(&self, weight: f32) -> EdgeStyle {
        EdgeStyle {
            stroke: Stroke::new((weight * self.base_scale).min(self.base_cap), EDGE_COLOR),
            opacity: 1.0,
        }
    }

    pub fn connected(&self, weight: f32) -> EdgeStyle {
        EdgeStyle {
            stroke: Stroke::new(
                (weight * self.highlight_scale).min(self.highlight_cap),
                HIGHLIGHT_COLOR,
            ),
            opacity: 1.0,
        }
    }

    pub fn dimmed(&self) -> EdgeStyle {
        EdgeStyle {
            stroke: Stroke::new(self.dimmed_width, EDGE_COLOR),
            opacity: self.dimmed_opacity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::node;

    #[test]
    fn test_community_color_wraps() {
        assert_eq!(community_color(0), COMMUNITY_PALETTE[0]);
        assert_eq!(community_color(12), COMMUNITY_PALETTE[2]);
    }

    #[test]
    fn test_node_style() {
        let mut n = node("a", 3, 0);
        n.size = 20.0;
        let style = node_style(&n, false);
        assert_eq!(style.fill, COMMUNITY_PALETTE[3]);
        assert_eq!(style.width, 100.0);
        assert_eq!(style.border.width, 1.0);

        n.size = 500.0;
        let selected = node_style(&n, true);
        assert_eq!(selected.width, 200.0);
        assert_eq!(selected.border, Stroke::new(3.0, Color32::BLACK));
    }

    #[test]
    fn test_edge_policy_caps() {
        let policy = EdgeStylePolicy::default();
        assert_eq!(policy.baseline(2.0).stroke.width, 3.0);
        assert_eq!(policy.baseline(20.0).stroke.width, 8.0);
        assert_eq!(policy.connected(1.0).stroke.width, 4.0);
        assert_eq!(policy.connected(5.0).stroke.width, 8.0);
        assert_eq!(policy.dimmed().opacity, 0.15);
        assert_eq!(policy.dimmed().stroke.width, 1.0);
    }

    #[test]
    fn test_edge_policy_validation() {
        assert!(EdgeStylePolicy::default().validate().is_ok());
        let bad = EdgeStylePolicy {
            dimmed_opacity: 1.5,
            ..EdgeStylePolicy::default()
        };
        assert!(bad.validate().is_err());
    }
}
