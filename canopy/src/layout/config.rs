use serde::Deserialize;

use crate::graph::RoutingStyle;
use crate::layout::LayoutError;

/// Layout constants, in layout units (pixels for most renderers).
///
/// Node sizes are estimated, not measured: the width of a row is its character count times
/// [`Self::char_width`], which is good enough for monospace node bodies.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Horizontal gap between the right edge of one column and the left edge of the next.
    pub column_gap: f64,
    /// Minimum free space below every node, and the increment nodes slide down by when their
    /// preferred slot is taken.
    pub vertical_spacing: f64,
    /// x of the first column.
    pub left_padding: f64,
    /// y at which a column without a parent to align to starts.
    pub top_padding: f64,
    pub min_node_width: f64,
    pub max_node_width: f64,
    /// Estimated width of one character.
    pub char_width: f64,
    /// Added to the estimated text width of the longest row.
    pub horizontal_padding: f64,
    pub header_height: f64,
    pub row_height: f64,
    /// Added below the last row.
    pub body_padding: f64,
    pub edge_style: RoutingStyle,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            column_gap: 80.0,
            vertical_spacing: 40.0,
            left_padding: 50.0,
            top_padding: 40.0,
            min_node_width: 200.0,
            max_node_width: 400.0,
            char_width: 8.0,
            horizontal_padding: 40.0,
            header_height: 40.0,
            row_height: 24.0,
            body_padding: 20.0,
            edge_style: RoutingStyle::default(),
        }
    }
}

impl LayoutConfig {
    pub fn validate(&self) -> Result<(), LayoutError> {
        let non_negative = [
            ("column_gap", self.column_gap),
            ("vertical_spacing", self.vertical_spacing),
            ("left_padding", self.left_padding),
            ("top_padding", self.top_padding),
            ("min_node_width", self.min_node_width),
            ("max_node_width", self.max_node_width),
            ("char_width", self.char_width),
            ("horizontal_padding", self.horizontal_padding),
            ("row_height", self.row_height),
            ("body_padding", self.body_padding),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(LayoutError::InvalidConfig(format!(
                    "`{name}` must be a finite, non-negative number (got {value})"
                )));
            }
        }

        // Every node must claim a non-empty slice of its column.
        if !self.header_height.is_finite() || self.header_height <= 0.0 {
            return Err(LayoutError::InvalidConfig(format!(
                "`header_height` must be positive (got {})",
                self.header_height
            )));
        }

        if self.min_node_width > self.max_node_width {
            return Err(LayoutError::InvalidConfig(format!(
                "`min_node_width` ({}) is larger than `max_node_width` ({})",
                self.min_node_width, self.max_node_width
            )));
        }

        Ok(())
    }
}
