//! Time-series brush selection and its reconciliation into the filter.
//!
//! A view owns one [`BrushReconciler`]. The rendering layer reports drag
//! start/end positions as indices into the chart's x-axis values; the
//! reconciler keeps the resulting [`BrushSelection`] and, on "Apply
//! Selection", writes the selected value range into a new [`FilterModel`]
//! snapshot.
//!
//! ```text
//!            begin_drag          end_drag (valid)          apply
//!   Idle ───────────────▶ Brushing ──────────────▶ Selected ──────▶ Applied
//!    ▲                      │ end_drag (degenerate)                    │
//!    └──────────────────────┴──────── reset / set_dimension / close ───┘
//! ```

use std::collections::BTreeSet;

use accident_map_filter_models::{FieldUpdate, FilterError, FilterModel, TimeDimension};
use serde::Serialize;

/// A committed, normalized drag selection over a chart axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BrushSelection {
    /// Axis the chart is broken down by.
    pub dimension: TimeDimension,
    /// First selected axis value.
    pub start_value: u16,
    /// Last selected axis value.
    pub end_value: u16,
    /// Index of the first selected point.
    pub start_index: usize,
    /// Index of the last selected point.
    pub end_index: usize,
}

impl BrushSelection {
    /// Builds a selection from two drag indices in either order.
    ///
    /// Returns `None` when either index is outside `time_values` or both
    /// indices land on the same point.
    #[must_use]
    pub fn from_indices(
        dimension: TimeDimension,
        a: usize,
        b: usize,
        time_values: &[u16],
    ) -> Option<Self> {
        let (start_index, end_index) = if a <= b { (a, b) } else { (b, a) };
        if start_index == end_index {
            return None;
        }
        let first = *time_values.get(start_index)?;
        let last = *time_values.get(end_index)?;
        let (start_value, end_value) = if first <= last {
            (first, last)
        } else {
            (last, first)
        };
        Some(Self {
            dimension,
            start_value,
            end_value,
            start_index,
            end_index,
        })
    }

    /// The inclusive value range this selection covers.
    #[must_use]
    pub const fn range(&self) -> TimeRange {
        TimeRange {
            dimension: self.dimension,
            start: self.start_value,
            end: self.end_value,
        }
    }
}

/// An inclusive range of values along one time dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeRange {
    /// Axis the range lies on.
    pub dimension: TimeDimension,
    /// First value (inclusive).
    pub start: u16,
    /// Last value (inclusive).
    pub end: u16,
}

impl TimeRange {
    /// Every value in the range, ascending.
    pub fn values(&self) -> impl Iterator<Item = u16> {
        self.start..=self.end
    }
}

/// Where a view's brush interaction currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrushState {
    /// No brush.
    Idle,
    /// The user is dragging; nothing is committed yet.
    Brushing {
        /// Index where the drag started.
        anchor_index: usize,
    },
    /// A drag finished and produced a selection.
    Selected(BrushSelection),
    /// The selection has been folded into the filter and a detail view is
    /// shown.
    Applied(BrushSelection),
}

/// Result of [`BrushReconciler::apply`].
#[derive(Debug, Clone, PartialEq)]
pub struct Applied {
    /// The new filter snapshot with the selection written in.
    pub filter: FilterModel,
    /// The range the dependent detail fetch is scoped to.
    pub range: TimeRange,
}

/// Per-view brush state machine.
#[derive(Debug, Clone)]
pub struct BrushReconciler {
    dimension: TimeDimension,
    state: BrushState,
}

impl BrushReconciler {
    /// Creates an idle reconciler for the given chart dimension.
    #[must_use]
    pub const fn new(dimension: TimeDimension) -> Self {
        Self {
            dimension,
            state: BrushState::Idle,
        }
    }

    /// The dimension the chart is currently broken down by.
    #[must_use]
    pub const fn dimension(&self) -> TimeDimension {
        self.dimension
    }

    /// The current state.
    #[must_use]
    pub const fn state(&self) -> &BrushState {
        &self.state
    }

    /// The committed selection, whether applied or not.
    #[must_use]
    pub const fn selection(&self) -> Option<&BrushSelection> {
        match &self.state {
            BrushState::Selected(selection) | BrushState::Applied(selection) => Some(selection),
            BrushState::Idle | BrushState::Brushing { .. } => None,
        }
    }

    /// Returns `true` while a selection is folded into the filter.
    #[must_use]
    pub const fn is_applied(&self) -> bool {
        matches!(self.state, BrushState::Applied(_))
    }

    /// Starts a drag at `index`.
    ///
    /// A pending (unapplied) selection is discarded. Ignored while already
    /// dragging or while a selection is applied; an applied range has to
    /// be reset first. Returns whether the drag started.
    pub fn begin_drag(&mut self, index: usize) -> bool {
        match self.state {
            BrushState::Idle | BrushState::Selected(_) => {
                self.state = BrushState::Brushing {
                    anchor_index: index,
                };
                true
            }
            BrushState::Brushing { .. } | BrushState::Applied(_) => false,
        }
    }

    /// Finishes a drag at `index` over the chart's axis values.
    ///
    /// Degenerate drags (indices outside the axis, or a drag that never
    /// left its starting point) fall back to idle without an error.
    pub fn end_drag(&mut self, index: usize, time_values: &[u16]) -> Option<&BrushSelection> {
        let BrushState::Brushing { anchor_index } = self.state else {
            return None;
        };

        match BrushSelection::from_indices(self.dimension, anchor_index, index, time_values) {
            Some(selection) => {
                log::debug!(
                    "brush selected {} {}..={}",
                    selection.dimension,
                    selection.start_value,
                    selection.end_value
                );
                self.state = BrushState::Selected(selection);
            }
            None => {
                log::debug!("ignoring degenerate brush {anchor_index}..{index}");
                self.state = BrushState::Idle;
            }
        }
        self.selection()
    }

    /// Folds the pending selection into `filter` ("Apply Selection").
    ///
    /// The selected values replace the dimension's field (hours, days of
    /// week or months) and the other two of those fields are cleared.
    /// Returns `Ok(None)` when there is no pending selection.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::OutOfRange`] if the chart's axis values fall
    /// outside the field's domain; the reconciler then stays `Selected`.
    pub fn apply(&mut self, filter: &FilterModel) -> Result<Option<Applied>, FilterError> {
        let BrushState::Selected(selection) = self.state else {
            return Ok(None);
        };

        let range = selection.range();
        let selected = to_field_values(range)?;

        let mut next = filter.clone();
        for &dimension in TimeDimension::all() {
            let values = if dimension == range.dimension {
                selected.clone()
            } else {
                BTreeSet::new()
            };
            next = next.set_field(dimension_update(dimension, values))?;
        }

        self.state = BrushState::Applied(selection);
        log::debug!(
            "applied brush {} {}..={}",
            range.dimension,
            range.start,
            range.end
        );
        Ok(Some(Applied {
            filter: next,
            range,
        }))
    }

    /// Returns to idle.
    ///
    /// When a selection was applied, returns a copy of `filter` with the
    /// dimension's field cleared; the caller hides the detail view.
    pub fn reset(&mut self, filter: &FilterModel) -> Option<FilterModel> {
        let was_applied = self.is_applied();
        self.state = BrushState::Idle;
        if !was_applied {
            return None;
        }

        // Clearing to an empty set never violates a field domain.
        filter
            .set_field(dimension_update(self.dimension, BTreeSet::new()))
            .ok()
    }

    /// Switches the chart dimension, resetting any brush first. Setting the
    /// current dimension again changes nothing.
    pub fn set_dimension(
        &mut self,
        dimension: TimeDimension,
        filter: &FilterModel,
    ) -> Option<FilterModel> {
        if dimension == self.dimension {
            return None;
        }
        let cleared = self.reset(filter);
        self.dimension = dimension;
        cleared
    }

    /// Tears down the brush when the owning view closes.
    pub fn close(&mut self, filter: &FilterModel) -> Option<FilterModel> {
        self.reset(filter)
    }
}

fn dimension_update(dimension: TimeDimension, values: BTreeSet<u8>) -> FieldUpdate {
    match dimension {
        TimeDimension::Hour => FieldUpdate::Hours(values),
        TimeDimension::Day => FieldUpdate::DayOfWeek(values),
        TimeDimension::Month => FieldUpdate::Months(values),
    }
}

fn to_field_values(range: TimeRange) -> Result<BTreeSet<u8>, FilterError> {
    let field = range.dimension.field();
    range
        .values()
        .map(|value| {
            field.check(value)?;
            let (min, max) = field.domain();
            u8::try_from(value).map_err(|_| FilterError::OutOfRange {
                field,
                value,
                min,
                max,
            })
        })
        .collect()
}
