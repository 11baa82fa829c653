//! Replication planning: how many copies of the real content the view system is told about.

use alloc::vec::Vec;

use kurbo::Size;

use crate::index;
use crate::{Axis, FlowMetrics, IndexPath, LayoutOptions};

/// Extra spacing accounted for between consecutive sections when estimating content extent.
pub const INTER_SECTION_GAP: f64 = 240.0;

/// Screen geometry the replication thresholds are derived from.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScreenMetrics {
    pub size: Size,
}

impl ScreenMetrics {
    pub fn new(size: Size) -> Self {
        Self { size }
    }

    /// Four times the larger screen dimension.
    pub fn minimum_content_extent(&self) -> f64 {
        self.size.width.max(self.size.height) * 4.0
    }

    /// The screen's extent along `axis`.
    ///
    /// This is the minimum tile extent the looping engine accepts.
    pub fn minimum_content_extent_for(&self, axis: Axis) -> f64 {
        axis.extent(self.size)
    }

    /// Threshold the content extent must reach before inflation kicks in.
    ///
    /// Single-section grids use the screen extent along the scroll axis; grids with several
    /// sections use [`Self::minimum_content_extent`].
    pub fn replication_threshold(&self, axis: Axis, real_section_count: usize) -> f64 {
        if real_section_count > 1 {
            self.minimum_content_extent()
        } else {
            self.minimum_content_extent_for(axis)
        }
    }
}

/// Per-axis metrics used to estimate the real content extent.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReplicationMetrics {
    pub item_extent: f64,
    pub spacing_extent: f64,
    /// Leading + trailing section inset along the scroll axis.
    pub section_inset_extent: f64,
    pub inter_section_gap: f64,
}

impl ReplicationMetrics {
    pub fn from_flow(metrics: &FlowMetrics) -> Self {
        let axis = metrics.axis;
        Self {
            item_extent: axis.extent(metrics.item_size),
            spacing_extent: metrics.line_spacing,
            section_inset_extent: axis.leading(metrics.section_inset)
                + axis.trailing(metrics.section_inset),
            inter_section_gap: INTER_SECTION_GAP,
        }
    }

    /// Estimated extent of `item_count` items spread over `section_count` sections.
    pub fn content_extent(&self, item_count: usize, section_count: usize) -> f64 {
        let items = item_count as f64;
        let sections = section_count as f64;
        items * self.item_extent
            + item_count.saturating_sub(1) as f64 * self.spacing_extent
            + sections * self.section_inset_extent
            + section_count.saturating_sub(1) as f64 * self.inter_section_gap
    }
}

/// Computes the replication multiplier.
///
/// Returns 1 (no inflation) when there are no items or when the estimated content extent is
/// below `threshold`; otherwise `ceil(threshold / item_extent)`.
pub fn multiplier(
    metrics: &ReplicationMetrics,
    item_count: usize,
    section_count: usize,
    threshold: f64,
) -> usize {
    if item_count == 0 || metrics.item_extent <= 0.0 {
        return 1;
    }
    let extent = metrics.content_extent(item_count, section_count);
    if extent < threshold {
        return 1;
    }
    ((threshold / metrics.item_extent).ceil() as usize).max(1)
}

pub fn inflated_section_count(real_section_count: usize, multiplier: usize) -> usize {
    if real_section_count > 1 {
        real_section_count.saturating_mul(multiplier)
    } else {
        real_section_count
    }
}

pub fn inflated_item_count(
    real_item_count: usize,
    real_section_count: usize,
    multiplier: usize,
) -> usize {
    if real_section_count > 1 {
        real_item_count
    } else {
        real_item_count.saturating_mul(multiplier)
    }
}

/// Real counts for one layout pass plus the multiplier derived from them.
///
/// Plans are rebuilt from the host's counts on every pass and never outlive it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReplicationPlan {
    real_item_counts: Vec<usize>,
    multiplier: usize,
}

impl Default for ReplicationPlan {
    fn default() -> Self {
        Self::identity(Vec::new())
    }
}

impl ReplicationPlan {
    pub fn new(real_item_counts: Vec<usize>, multiplier: usize) -> Self {
        Self {
            real_item_counts,
            multiplier: multiplier.max(1),
        }
    }

    /// A plan without inflation.
    pub fn identity(real_item_counts: Vec<usize>) -> Self {
        Self::new(real_item_counts, 1)
    }

    /// Plans replication for `real_item_counts` (one entry per real section).
    ///
    /// Disabled layouts always get a multiplier of 1.
    pub fn for_layout(real_item_counts: Vec<usize>, options: &LayoutOptions) -> Self {
        if !options.enabled {
            return Self::identity(real_item_counts);
        }
        let sections = real_item_counts.len();
        let items: usize = real_item_counts.iter().sum();
        let metrics = ReplicationMetrics::from_flow(&options.metrics);
        let threshold = options
            .screen
            .replication_threshold(options.metrics.axis, sections);
        let m = multiplier(&metrics, items, sections, threshold);
        idebug!(sections, items, threshold, multiplier = m, "ReplicationPlan::for_layout");
        Self::new(real_item_counts, m)
    }

    pub fn multiplier(&self) -> usize {
        self.multiplier
    }

    pub fn real_section_count(&self) -> usize {
        self.real_item_counts.len()
    }

    /// Item count of a real section (0 when out of range).
    pub fn real_item_count(&self, real_section: usize) -> usize {
        self.real_item_counts
            .get(real_section)
            .copied()
            .unwrap_or(0)
    }

    pub fn real_item_counts(&self) -> &[usize] {
        &self.real_item_counts
    }

    /// Section count reported to the view system.
    pub fn section_count(&self) -> usize {
        inflated_section_count(self.real_section_count(), self.multiplier)
    }

    /// Item count reported to the view system for a virtual section.
    pub fn item_count(&self, virtual_section: usize) -> usize {
        let real_sections = self.real_section_count();
        let real = index::section_in_real(virtual_section, real_sections);
        inflated_item_count(self.real_item_count(real), real_sections, self.multiplier)
    }

    /// Virtual item counts, one per virtual section.
    pub fn item_counts(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.section_count()).map(|s| self.item_count(s))
    }

    pub fn to_real(&self, virtual_index_path: IndexPath) -> IndexPath {
        let real_sections = self.real_section_count();
        let real_section = index::section_in_real(virtual_index_path.section, real_sections);
        index::to_real(
            virtual_index_path,
            real_sections,
            self.real_item_count(real_section),
        )
    }

    /// Every virtual index path inside one tile that maps to `real_index_path`.
    pub fn virtual_copies(&self, real_index_path: IndexPath) -> impl Iterator<Item = IndexPath> {
        let real_sections = self.real_section_count();
        let real_items = self.real_item_count(real_index_path.section);
        (0..self.multiplier).map(move |copy| {
            if real_sections > 1 {
                IndexPath::new(real_index_path.section + copy * real_sections, real_index_path.item)
            } else {
                IndexPath::new(real_index_path.section, real_index_path.item + copy * real_items)
            }
        })
    }

    pub fn contains_real(&self, real_index_path: IndexPath) -> bool {
        real_index_path.item < self.real_item_count(real_index_path.section)
    }

    pub fn contains_virtual(&self, virtual_index_path: IndexPath) -> bool {
        virtual_index_path.section < self.section_count()
            && virtual_index_path.item < self.item_count(virtual_index_path.section)
    }
}
