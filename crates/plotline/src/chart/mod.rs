//! Chart specifications: the contract between a chart advisor, the manual
//! override controls and the renderers.
//!
//! A [`ChartSpec`] only ever refers to columns by exact name. It never
//! touches row data, so overriding a field is cheap and cannot corrupt the
//! [`Dataset`](crate::types::Dataset) it describes.

mod recommend;

pub use recommend::{ChartRecommendation, ChartRequest, RecommendationSource, recommend_chart};

use crate::types::Column;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Title used when no better one is known.
pub const DEFAULT_TITLE: &str = "Chart";

// ============================================================================
// Chart types
// ============================================================================

/// The chart kinds a renderer knows how to draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartType {
    Bar,
    Line,
    Scatter,
    Bubble,
    Histogram,
    GroupedBar,
    Pie,
}

impl ChartType {
    pub const ALL: [ChartType; 7] = [
        ChartType::Bar,
        ChartType::Line,
        ChartType::Scatter,
        ChartType::Bubble,
        ChartType::Histogram,
        ChartType::GroupedBar,
        ChartType::Pie,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bar => "bar",
            Self::Line => "line",
            Self::Scatter => "scatter",
            Self::Bubble => "bubble",
            Self::Histogram => "histogram",
            Self::GroupedBar => "grouped_bar",
            Self::Pie => "pie",
        }
    }

    /// Whether a secondary y series can be drawn.
    pub fn supports_y2(&self) -> bool {
        matches!(self, Self::Line | Self::GroupedBar)
    }

    /// Whether point size can encode a column.
    pub fn supports_size(&self) -> bool {
        matches!(self, Self::Bubble)
    }

    /// Whether color can encode a grouping column.
    pub fn supports_color(&self) -> bool {
        matches!(self, Self::Scatter | Self::Bubble | Self::Bar | Self::GroupedBar)
    }

    /// Whether `field` is meaningful for this chart type.
    pub fn supports(&self, field: ChartField) -> bool {
        match field {
            ChartField::X | ChartField::Y => true,
            ChartField::Y2 => self.supports_y2(),
            ChartField::Size => self.supports_size(),
            ChartField::Color => self.supports_color(),
        }
    }
}

impl fmt::Display for ChartType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChartType {
    type Err = ChartSpecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        ChartType::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(needle))
            .ok_or_else(|| ChartSpecError::UnknownChartType(s.to_string()))
    }
}

/// A column-valued field of a [`ChartSpec`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChartField {
    X,
    Y,
    Y2,
    Size,
    Color,
}

impl ChartField {
    pub const ALL: [ChartField; 5] = [
        ChartField::X,
        ChartField::Y,
        ChartField::Y2,
        ChartField::Size,
        ChartField::Color,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::X => "x",
            Self::Y => "y",
            Self::Y2 => "y2",
            Self::Size => "size",
            Self::Color => "color",
        }
    }

    /// `x` and `y` must always name a column.
    pub fn is_required(&self) -> bool {
        matches!(self, Self::X | Self::Y)
    }
}

impl fmt::Display for ChartField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Errors
// ============================================================================

/// Why a chart spec or an override was rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChartSpecError {
    #[error("Unknown chart type '{0}'")]
    UnknownChartType(String),

    #[error("Field '{field}' refers to unknown column '{name}'")]
    UnknownColumn { field: ChartField, name: String },

    #[error("Field '{0}' is required")]
    MissingField(ChartField),

    #[error("A {chart_type} chart has no '{field}' channel")]
    UnsupportedField {
        field: ChartField,
        chart_type: ChartType,
    },
}

// ============================================================================
// Chart spec
// ============================================================================

/// A chart recommendation as produced by an advisor or the fallback rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSpec {
    pub chart_type: ChartType,
    #[serde(default)]
    pub x: Option<String>,
    #[serde(default)]
    pub y: Option<String>,
    #[serde(default)]
    pub y2: Option<String>,
    #[serde(default)]
    pub size: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub x_label: String,
    #[serde(default)]
    pub y_label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<String>,
}

impl ChartSpec {
    /// The deterministic default: a bar chart of the first column against
    /// the second.
    pub fn fallback(columns: &[Column]) -> Self {
        let x = columns.first().map(|c| c.name.clone());
        let y = columns.get(1).map(|c| c.name.clone());
        Self {
            chart_type: ChartType::Bar,
            x_label: x.clone().unwrap_or_default(),
            y_label: y.clone().unwrap_or_default(),
            x,
            y,
            y2: None,
            size: None,
            color: None,
            title: DEFAULT_TITLE.to_string(),
            reasoning: None,
        }
    }

    pub fn column(&self, field: ChartField) -> Option<&str> {
        match field {
            ChartField::X => self.x.as_deref(),
            ChartField::Y => self.y.as_deref(),
            ChartField::Y2 => self.y2.as_deref(),
            ChartField::Size => self.size.as_deref(),
            ChartField::Color => self.color.as_deref(),
        }
    }

    fn column_slot(&mut self, field: ChartField) -> &mut Option<String> {
        match field {
            ChartField::X => &mut self.x,
            ChartField::Y => &mut self.y,
            ChartField::Y2 => &mut self.y2,
            ChartField::Size => &mut self.size,
            ChartField::Color => &mut self.color,
        }
    }

    /// The title to display, falling back to [`DEFAULT_TITLE`].
    pub fn display_title(&self) -> &str {
        let title = self.title.trim();
        if title.is_empty() { DEFAULT_TITLE } else { title }
    }

    /// Check that `x` and `y` are set and every column reference exists.
    pub fn validate(&self, columns: &[Column]) -> Result<(), ChartSpecError> {
        for field in ChartField::ALL {
            match self.column(field) {
                Some(name) => ensure_known(field, name, columns)?,
                None if field.is_required() => return Err(ChartSpecError::MissingField(field)),
                None => {}
            }
        }
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Manual overrides
    // ------------------------------------------------------------------------

    pub fn set_chart_type(&mut self, chart_type: ChartType) {
        self.chart_type = chart_type;
    }

    /// Point `field` at a column, or clear it with `None`.
    ///
    /// # Errors
    ///
    /// - [`ChartSpecError::MissingField`] when clearing `x` or `y`
    /// - [`ChartSpecError::UnknownColumn`] when `name` is not a column
    /// - [`ChartSpecError::UnsupportedField`] when the current chart type
    ///   has no such channel
    pub fn set_column(
        &mut self,
        field: ChartField,
        name: Option<String>,
        columns: &[Column],
    ) -> Result<(), ChartSpecError> {
        match &name {
            None if field.is_required() => return Err(ChartSpecError::MissingField(field)),
            None => {}
            Some(name) => {
                if !self.chart_type.supports(field) {
                    return Err(ChartSpecError::UnsupportedField {
                        field,
                        chart_type: self.chart_type,
                    });
                }
                ensure_known(field, name, columns)?;
            }
        }
        *self.column_slot(field) = name;
        Ok(())
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn set_x_label(&mut self, label: impl Into<String>) {
        self.x_label = label.into();
    }

    pub fn set_y_label(&mut self, label: impl Into<String>) {
        self.y_label = label.into();
    }
}

fn ensure_known(field: ChartField, name: &str, columns: &[Column]) -> Result<(), ChartSpecError> {
    if columns.iter().any(|c| c.name == name) {
        Ok(())
    } else {
        Err(ChartSpecError::UnknownColumn {
            field,
            name: name.to_string(),
        })
    }
}
