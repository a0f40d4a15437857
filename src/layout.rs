use std::collections::BTreeMap;
use std::f32::consts::TAU;

use eframe::egui::{Pos2, pos2, vec2};
use serde::Deserialize;

use crate::error::{Error, Result};
use crate::network::Node;

/// Grid and ring constants for the community layout.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub origin_x: f32,
    pub origin_y: f32,
    pub column_spacing: f32,
    pub row_spacing: f32,
    /// Radius of the first ring position around a hub.
    pub ring_radius: f32,
    /// Extra radius per ring position.
    pub ring_step: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            origin_x: 250.0,
            origin_y: 250.0,
            column_spacing: 400.0,
            row_spacing: 350.0,
            ring_radius: 100.0,
            ring_step: 8.0,
        }
    }
}

impl LayoutConfig {
    pub fn validate(&self) -> Result<()> {
        let values = [
            ("origin_x", self.origin_x),
            ("origin_y", self.origin_y),
            ("column_spacing", self.column_spacing),
            ("row_spacing", self.row_spacing),
            ("ring_radius", self.ring_radius),
            ("ring_step", self.ring_step),
        ];
        for (name, value) in values {
            if !value.is_finite() {
                return Err(Error::Config(format!("layout.{name} must be finite")));
            }
        }
        if self.column_spacing <= 0.0 || self.row_spacing <= 0.0 {
            return Err(Error::Config("layout spacing must be positive".to_owned()));
        }
        if self.ring_radius <= 0.0 || self.ring_step < 0.0 {
            return Err(Error::Config(
                "layout.ring_radius must be positive and layout.ring_step non-negative".to_owned(),
            ));
        }
        Ok(())
    }

    pub fn community_center(&self, grid_index: usize, columns: usize) -> Pos2 {
        let columns = columns.max(1);
        let column = (grid_index % columns) as f32;
        let row = (grid_index / columns) as f32;
        pos2(
            self.origin_x + column * self.column_spacing,
            self.origin_y + row * self.row_spacing,
        )
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct LayoutPoint {
    pub node_id: String,
    pub position: Pos2,
}

/// Places communities on a square-ish grid; within each community the
/// highest-degree node sits on the cell centre and the rest circle it on a
/// widening ring.
pub fn compute_layout<F>(nodes: &[Node], community_of: F, config: &LayoutConfig) -> Vec<LayoutPoint>
where
    F: Fn(&Node) -> u32,
{
    if nodes.is_empty() {
        return Vec::new();
    }

    let mut groups: BTreeMap<u32, Vec<&Node>> = BTreeMap::new();
    for node in nodes {
        groups.entry(community_of(node)).or_default().push(node);
    }

    let columns = (groups.len() as f64).sqrt().ceil() as usize;
    let mut points = Vec::with_capacity(nodes.len());

    for (grid_index, members) in groups.values_mut().enumerate() {
        // `sort_by` is stable, so equal degrees keep input order.
        members.sort_by(|a, b| b.degree.cmp(&a.degree));

        let center = config.community_center(grid_index, columns);
        let ring_slots = members.len().saturating_sub(1).max(1) as f32;

        for (slot, node) in members.iter().enumerate() {
            let position = if slot == 0 {
                center
            } else {
                let angle = TAU * slot as f32 / ring_slots;
                let radius = config.ring_radius + config.ring_step * slot as f32;
                center + vec2(angle.cos(), angle.sin()) * radius
            };

            points.push(LayoutPoint {
                node_id: node.id.clone(),
                position,
            });
        }
    }

    points
}
