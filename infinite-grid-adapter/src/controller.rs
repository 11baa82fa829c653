use alloc::boxed::Box;
use alloc::vec::Vec;

use infinite_grid::{
    ElementKind, Error, IndexPath, LayoutOptions, LayoutRecord, LoopingLayout, MIDDLE_PAGE,
    PagingController, ReplicationPlan, Result, ScrollDirection, Viewport,
};
use kurbo::{Point, Vec2};

use crate::{
    CellRequest, ControllerOptions, DataSource, DataSourceSelector, Delegate, DelegateSelector,
    ForwardingProxy, Tween,
};

/// Where [`Controller::move_to`] places the item.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ScrollAlignment {
    /// The item starts at the leading edge of the visible area.
    #[default]
    Leading,
    Centered,
}

/// A selected cell: the virtual copy the view system should highlight and its real index path.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Selection {
    pub index_path: IndexPath,
    pub real_index_path: IndexPath,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SelectionOutcome {
    Selected(Selection),
    /// The selection is issued by [`Controller::tick`] once the scroll to `target` completes.
    Scheduled { selection: Selection, target: Point },
}

/// State owned by the core responder.
struct Surface {
    options: ControllerOptions,
    layout: LoopingLayout,
    paging: PagingController,
    dragging: bool,
    decelerating: bool,
    skip_next_layout: bool,
    centered: Option<IndexPath>,
    focused: Option<IndexPath>,
    selected: Option<Selection>,
    pending_selection: Option<Selection>,
    tween: Option<Tween>,
}

impl Surface {
    fn is_tracking(&self) -> bool {
        self.dragging || self.decelerating
    }

    fn relayout(&mut self) {
        let plan = self.layout.plan().clone();
        let viewport = *self.layout.viewport();
        self.layout.prepare(plan, viewport);
    }

    /// Loop, recenter, then refresh the centered index.
    fn settle(&mut self) {
        if self.layout.loop_if_needed().is_some() {
            self.relayout();
        }
        let tracking = self.is_tracking();
        if let Some(offset) = self.paging.center_if_needed(&self.layout, tracking, None) {
            self.layout.set_offset(offset);
        }
        self.update_centered();
    }

    fn update_centered(&mut self) {
        let next = self
            .layout
            .visible_records(None)
            .first()
            .map(|r| r.real_index_path);
        if next == self.centered {
            return;
        }
        idebug!(from = ?self.centered, to = ?next, "centered index changed");
        self.centered = next;
        if let Some(on_change) = &self.options.on_centered_index_change {
            on_change(next);
        }
    }

    fn cancel_animation(&mut self) {
        self.tween = None;
        if self.pending_selection.take().is_some() {
            itrace!("pending selection dropped");
        }
    }

    fn scroll_to(&mut self, target: Point, animated: bool, now_ms: u64, duration_ms: u64) {
        if animated {
            let from = self.layout.offset();
            self.tween = Some(Tween::new(
                from,
                target,
                now_ms,
                duration_ms,
                self.options.easing,
            ));
        } else {
            self.tween = None;
            self.layout.set_offset(target);
            self.update_centered();
        }
    }

    fn visible_copy(&self, real_index_path: IndexPath) -> Option<LayoutRecord> {
        self.layout
            .visible_records(None)
            .into_iter()
            .find(|r| r.real_index_path == real_index_path)
    }

    /// The copy of `real_index_path` to scroll to when a selection continues across the loop
    /// boundary: the nearest copy ahead in `direction`, looking at the current tile and the
    /// next one over.
    fn boundary_copy(
        &self,
        real_index_path: IndexPath,
        direction: ScrollDirection,
    ) -> Option<LayoutRecord> {
        let axis = self.layout.axis();
        let current = axis.main(self.layout.offset());
        let distance = |r: &LayoutRecord| axis.main(self.layout.centered_offset(r.frame)) - current;
        let next_page = match direction {
            ScrollDirection::Forward => 1,
            ScrollDirection::Backward => -1,
        };
        [0, next_page]
            .into_iter()
            .flat_map(move |delta| {
                self.layout
                    .plan()
                    .virtual_copies(real_index_path)
                    .filter_map(move |copy| self.layout.record_for_item_at_page_offset(copy, delta))
            })
            .filter(|r| match direction {
                ScrollDirection::Forward => distance(r) > 0.0,
                ScrollDirection::Backward => distance(r) < 0.0,
            })
            .min_by(|a, b| distance(a).abs().total_cmp(&distance(b).abs()))
    }

    fn out_of_range(&self, index_path: IndexPath) -> Error {
        Error::IndexPathOutOfRange {
            index_path,
            sections: self.layout.plan().real_section_count(),
        }
    }
}

fn plan_for(host: &dyn DataSource, options: &LayoutOptions) -> ReplicationPlan {
    let counts: Vec<usize> = (0..host.number_of_sections())
        .map(|section| host.number_of_items(section))
        .collect();
    ReplicationPlan::for_layout(counts, options)
}

/// Whether selecting `real_index_path` in `direction` crosses the loop boundary.
fn wraps_around(plan: &ReplicationPlan, real_index_path: IndexPath, direction: ScrollDirection) -> bool {
    let counts = plan.real_item_counts();
    match direction {
        ScrollDirection::Forward => counts
            .iter()
            .position(|&n| n > 0)
            .is_some_and(|section| real_index_path == IndexPath::new(section, 0)),
        ScrollDirection::Backward => counts
            .iter()
            .rposition(|&n| n > 0)
            .is_some_and(|section| real_index_path == IndexPath::new(section, counts[section] - 1)),
    }
}

/// A framework-neutral controller for an infinite grid.
///
/// It owns a [`LoopingLayout`], a [`PagingController`], and one [`ForwardingProxy`] per host
/// role. This type does not hold any UI objects. Adapters drive it by calling:
/// - `layout_pass` whenever the view lays out
/// - `on_scroll` and the drag lifecycle methods when UI events occur
/// - `tick(now_ms)` each frame while [`Self::is_animating`]
///
/// Methods that return an offset expect the adapter to write it to the real scroll view.
pub struct Controller {
    surface: Surface,
    data_source: ForwardingProxy<DataSourceSelector, dyn DataSource>,
    delegate: ForwardingProxy<DelegateSelector, dyn Delegate>,
}

impl Controller {
    pub fn new(options: ControllerOptions) -> Self {
        let mut paging =
            PagingController::new(options.item_paging_enabled, options.velocity_multiplier);
        paging.set_preferred_index_path(options.preferred_centered_index_path);
        Self {
            surface: Surface {
                layout: LoopingLayout::new(options.layout),
                paging,
                options,
                dragging: false,
                decelerating: false,
                skip_next_layout: false,
                centered: None,
                focused: None,
                selected: None,
                pending_selection: None,
                tween: None,
            },
            data_source: ForwardingProxy::new(),
            delegate: ForwardingProxy::new(),
        }
    }

    pub fn options(&self) -> &ControllerOptions {
        &self.surface.options
    }

    /// Replaces the options. Geometry is recomputed on the next [`Self::layout_pass`].
    pub fn set_options(&mut self, options: ControllerOptions) {
        let s = &mut self.surface;
        s.layout.set_options(options.layout);
        s.paging.set_enabled(options.item_paging_enabled);
        s.paging.set_velocity_multiplier(options.velocity_multiplier);
        s.paging
            .set_preferred_index_path(options.preferred_centered_index_path);
        s.paging.reset();
        s.options = options;
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.surface.options.layout.enabled = enabled;
        self.surface.layout.set_enabled(enabled);
        self.surface.paging.reset();
    }

    pub fn set_item_paging_enabled(&mut self, enabled: bool) {
        self.surface.options.item_paging_enabled = enabled;
        self.surface.paging.set_enabled(enabled);
    }

    pub fn set_velocity_multiplier(&mut self, velocity_multiplier: f64) {
        self.surface.options.velocity_multiplier = velocity_multiplier;
        self.surface
            .paging
            .set_velocity_multiplier(velocity_multiplier);
    }

    pub fn set_preferred_centered_index_path(&mut self, index_path: IndexPath) {
        self.surface.options.preferred_centered_index_path = index_path;
        self.surface.paging.set_preferred_index_path(index_path);
    }

    pub fn set_on_centered_index_change(
        &mut self,
        on_change: Option<impl Fn(Option<IndexPath>) + Send + Sync + 'static>,
    ) {
        self.surface.options = self
            .surface
            .options
            .clone()
            .with_on_centered_index_change(on_change);
    }

    pub fn layout(&self) -> &LoopingLayout {
        &self.surface.layout
    }

    pub fn paging(&self) -> &PagingController {
        &self.surface.paging
    }

    /// Installs the host data source and hands back the previous one.
    pub fn set_data_source(
        &mut self,
        data_source: Option<Box<dyn DataSource>>,
    ) -> Option<Box<dyn DataSource>> {
        self.data_source.set_host(data_source)
    }

    pub fn data_source(&self) -> Option<&dyn DataSource> {
        self.data_source.host()
    }

    pub fn data_source_mut(&mut self) -> Option<&mut (dyn DataSource + 'static)> {
        self.data_source.host_mut()
    }

    /// Installs the host delegate and hands back the previous one.
    pub fn set_delegate(
        &mut self,
        delegate: Option<Box<dyn Delegate>>,
    ) -> Option<Box<dyn Delegate>> {
        self.delegate.set_host(delegate)
    }

    pub fn delegate(&self) -> Option<&dyn Delegate> {
        self.delegate.host()
    }

    pub fn delegate_mut(&mut self) -> Option<&mut (dyn Delegate + 'static)> {
        self.delegate.host_mut()
    }

    /// Skips the next [`Self::layout_pass`] once.
    pub fn set_skip_next_layout(&mut self) {
        self.surface.skip_next_layout = true;
    }

    // -- count provider -------------------------------------------------------------------

    /// Section count reported to the view system (inflated).
    pub fn number_of_sections(&mut self) -> Result<usize> {
        self.data_source
            .dispatch(
                DataSourceSelector::NumberOfSections,
                &mut self.surface,
                |surface, host| {
                    let host = host.ok_or(Error::MissingDataSource)?;
                    Ok(plan_for(host, &surface.options.layout).section_count())
                },
                |_| Err(Error::MissingDataSource),
            )
            .unwrap_or(Err(Error::MissingDataSource))
    }

    /// Item count reported to the view system for a virtual section (inflated).
    pub fn number_of_items(&mut self, virtual_section: usize) -> Result<usize> {
        self.data_source
            .dispatch(
                DataSourceSelector::NumberOfItems,
                &mut self.surface,
                |surface, host| {
                    let host = host.ok_or(Error::MissingDataSource)?;
                    Ok(plan_for(host, &surface.options.layout).item_count(virtual_section))
                },
                |_| Err(Error::MissingDataSource),
            )
            .unwrap_or(Err(Error::MissingDataSource))
    }

    /// Asks the host to configure the cell at a virtual index path.
    ///
    /// Returns whether a host answered.
    pub fn configure_cell(&mut self, index_path: IndexPath) -> bool {
        let request = self.cell_request(index_path);
        self.data_source
            .forward(DataSourceSelector::ConfigureCell, |host| {
                host.configure_cell(request)
            })
            .is_some()
    }

    pub fn configure_supplementary(&mut self, kind: ElementKind, index_path: IndexPath) -> bool {
        let request = CellRequest {
            index_path,
            real_index_path: IndexPath::new(self.section_in_real(index_path.section), 0),
        };
        self.data_source
            .forward(DataSourceSelector::ConfigureSupplementary, |host| {
                host.configure_supplementary(kind, request)
            })
            .is_some()
    }

    pub fn real_index_path(&self, index_path: IndexPath) -> IndexPath {
        self.surface.layout.plan().to_real(index_path)
    }

    pub fn section_in_real(&self, virtual_section: usize) -> usize {
        infinite_grid::index::section_in_real(
            virtual_section,
            self.surface.layout.plan().real_section_count(),
        )
    }

    fn cell_request(&self, index_path: IndexPath) -> CellRequest {
        CellRequest {
            index_path,
            real_index_path: self.real_index_path(index_path),
        }
    }

    // -- view lifecycle -------------------------------------------------------------------

    /// Runs one layout pass for `viewport`.
    ///
    /// Recomputes the replication plan from the host's counts, prepares the layout, loops and
    /// recenters if needed, then refreshes the centered index. Returns the offset the adapter
    /// must apply when it differs from `viewport.offset`.
    pub fn layout_pass(&mut self, viewport: Viewport) -> Result<Option<Point>> {
        if self.surface.skip_next_layout {
            self.surface.skip_next_layout = false;
            itrace!("layout_pass: skipped");
            return Ok(None);
        }
        let host = self.data_source.host().ok_or(Error::MissingDataSource)?;
        let plan = plan_for(host, &self.surface.options.layout);
        self.surface.layout.prepare(plan, viewport);
        self.surface.settle();
        let offset = self.surface.layout.offset();
        Ok((offset != viewport.offset).then_some(offset))
    }

    /// Call this when the UI reports a scroll offset change (e.g. user wheel/drag).
    ///
    /// This cancels any active tween and pending selection. Returns the corrected offset
    /// when looping or recentering moved it.
    pub fn on_scroll(&mut self, offset: Point) -> Option<Point> {
        self.surface.cancel_animation();
        self.delegate
            .dispatch(
                DelegateSelector::DidScroll,
                &mut self.surface,
                |surface, host| {
                    surface.layout.set_offset(offset);
                    if let Some(host) = host {
                        host.did_scroll(offset);
                    }
                    surface.settle();
                    let applied = surface.layout.offset();
                    (applied != offset).then_some(applied)
                },
                |_| None,
            )
            .flatten()
    }

    pub fn on_begin_dragging(&mut self) {
        self.surface.cancel_animation();
        self.surface.dragging = true;
        self.delegate
            .forward(DelegateSelector::WillBeginDragging, |host| {
                host.will_begin_dragging()
            });
    }

    /// Returns the (possibly rewritten) target offset of the ending drag.
    ///
    /// Paging runs first; the host delegate may adjust the result afterwards.
    pub fn will_end_dragging(&mut self, velocity: Vec2, target: Point) -> Point {
        self.delegate
            .dispatch(
                DelegateSelector::WillEndDragging,
                &mut self.surface,
                |surface, host| {
                    let mut target =
                        surface
                            .paging
                            .center_on_drag_end(&surface.layout, velocity, target);
                    if let Some(host) = host {
                        host.will_end_dragging(velocity, &mut target);
                    }
                    target
                },
                |_| target,
            )
            .unwrap_or(target)
    }

    pub fn on_end_dragging(&mut self, will_decelerate: bool) {
        self.surface.dragging = false;
        self.surface.decelerating = will_decelerate;
        self.delegate
            .forward(DelegateSelector::DidEndDragging, |host| {
                host.did_end_dragging(will_decelerate)
            });
    }

    pub fn on_end_decelerating(&mut self) {
        self.surface.decelerating = false;
        self.delegate
            .forward(DelegateSelector::DidEndDecelerating, |host| {
                host.did_end_decelerating()
            });
    }

    pub fn is_tracking(&self) -> bool {
        self.surface.is_tracking()
    }

    // -- focus ----------------------------------------------------------------------------

    /// Records the newly focused cell (virtual index path) and tells the host its real index.
    pub fn did_update_focus(&mut self, next: Option<IndexPath>) {
        let real = next.map(|index_path| self.real_index_path(index_path));
        self.delegate.dispatch(
            DelegateSelector::DidUpdateFocus,
            &mut self.surface,
            |surface, host| {
                surface.focused = real;
                if let Some(host) = host {
                    host.did_update_focus(real);
                }
            },
            |_| {},
        );
    }

    /// The virtual index path focus should return to.
    ///
    /// The host's preference wins over the last focused item; either only counts while one of
    /// its copies is visible.
    pub fn preferred_focus_index_path(&mut self) -> Option<IndexPath> {
        self.delegate
            .dispatch(
                DelegateSelector::PreferredFocusIndexPath,
                &mut self.surface,
                |surface, host| {
                    let wanted = host
                        .and_then(|host| host.preferred_focus_index_path())
                        .or(surface.focused)?;
                    surface.visible_copy(wanted).map(|r| r.index_path)
                },
                |_| None,
            )
            .flatten()
    }

    /// Real index path of the last focused cell.
    pub fn focused_index_path(&self) -> Option<IndexPath> {
        self.surface.focused
    }

    pub fn reset_focus(&mut self) {
        self.surface.focused = None;
    }

    // -- display and selection ------------------------------------------------------------

    pub fn will_display(&mut self, index_path: IndexPath) {
        let request = self.cell_request(index_path);
        self.delegate
            .forward(DelegateSelector::WillDisplay, |host| host.will_display(request));
    }

    /// Call this when the user selects a cell (virtual index path) in the view.
    pub fn did_select_item(&mut self, index_path: IndexPath) {
        let selection = Selection {
            index_path,
            real_index_path: self.real_index_path(index_path),
        };
        self.issue_selection(selection);
    }

    fn issue_selection(&mut self, selection: Selection) {
        idebug!(
            index_path = ?selection.index_path,
            real = ?selection.real_index_path,
            "selection issued"
        );
        self.surface.selected = Some(selection);
        self.delegate.forward(DelegateSelector::DidSelectItem, |host| {
            host.did_select_item(selection.real_index_path)
        });
    }

    pub fn selected(&self) -> Option<Selection> {
        self.surface.selected
    }

    /// Selects a real item, continuing across the loop boundary in `direction`.
    ///
    /// When the previous selection differs and the target is the first real item (moving
    /// forward) or the last one (moving backward), the controller first scrolls to the copy
    /// ahead in `direction` and issues the selection from [`Self::tick`] once that scroll
    /// completes. Otherwise the selection is issued immediately on the nearest copy, without
    /// scrolling. A newer request replaces a pending one.
    pub fn select_item_in_direction(
        &mut self,
        real_index_path: IndexPath,
        direction: Option<ScrollDirection>,
        now_ms: u64,
    ) -> Result<SelectionOutcome> {
        let s = &mut self.surface;
        if !s.layout.plan().contains_real(real_index_path) {
            return Err(s.out_of_range(real_index_path));
        }
        s.cancel_animation();

        let previous = s.selected.map(|selection| selection.real_index_path);
        let wrapping_direction = match (direction, previous) {
            (Some(direction), Some(previous))
                if previous != real_index_path
                    && s.layout.has_valid_layout()
                    && wraps_around(s.layout.plan(), real_index_path, direction) =>
            {
                Some(direction)
            }
            _ => None,
        };

        if let Some(direction) = wrapping_direction {
            let record = s
                .boundary_copy(real_index_path, direction)
                .ok_or_else(|| s.out_of_range(real_index_path))?;
            let target = s.layout.centered_offset(record.frame);
            let selection = Selection {
                index_path: record.index_path,
                real_index_path,
            };
            itrace!(
                ?direction,
                index_path = ?record.index_path,
                page = record.page,
                "select across loop boundary"
            );
            let duration_ms = s.options.selection_animation_ms;
            s.scroll_to(target, true, now_ms, duration_ms);
            s.pending_selection = Some(selection);
            return Ok(SelectionOutcome::Scheduled { selection, target });
        }

        let record = s
            .visible_copy(real_index_path)
            .or_else(|| {
                s.layout
                    .record_for_real_item(real_index_path, s.layout.current_page())
            })
            .ok_or_else(|| s.out_of_range(real_index_path))?;
        let selection = Selection {
            index_path: record.index_path,
            real_index_path,
        };
        self.issue_selection(selection);
        Ok(SelectionOutcome::Selected(selection))
    }

    /// Selects a real item without a direction.
    ///
    /// This cannot continue across the loop boundary, so it logs a warning; prefer
    /// [`Self::select_item_in_direction`]. With `animated`, the selected copy is scrolled to
    /// the center.
    pub fn select_item(
        &mut self,
        real_index_path: IndexPath,
        animated: bool,
        now_ms: u64,
    ) -> Result<SelectionOutcome> {
        iwarn!(
            index_path = ?real_index_path,
            "select_item does not continue across the loop boundary; use select_item_in_direction"
        );
        let outcome = self.select_item_in_direction(real_index_path, None, now_ms)?;
        if animated {
            if let SelectionOutcome::Selected(selection) = outcome {
                let s = &mut self.surface;
                if let Some(frame) = s
                    .layout
                    .record_for_item(selection.index_path, s.layout.current_page())
                    .map(|r| r.frame)
                {
                    let target = s.layout.centered_offset(frame);
                    let duration_ms = s.options.scroll_animation_ms;
                    s.scroll_to(target, true, now_ms, duration_ms);
                }
            }
        }
        Ok(outcome)
    }

    // -- programmatic scrolling -----------------------------------------------------------

    /// Scrolls to the middle-tile copy of a real item (the plain frame when not looping).
    ///
    /// Without animation the offset is applied immediately; with animation a tween starts and
    /// [`Self::tick`] drives it. Returns the target offset.
    pub fn move_to(
        &mut self,
        real_index_path: IndexPath,
        align: ScrollAlignment,
        animated: bool,
        now_ms: u64,
    ) -> Result<Point> {
        let s = &mut self.surface;
        let page = if s.layout.has_valid_layout() {
            MIDDLE_PAGE
        } else {
            0
        };
        let record = s
            .layout
            .record_for_real_item(real_index_path, page)
            .ok_or_else(|| s.out_of_range(real_index_path))?;
        let target = match align {
            ScrollAlignment::Leading => s.layout.leading_offset(record.frame),
            ScrollAlignment::Centered => s.layout.centered_offset(record.frame),
        };
        s.cancel_animation();
        let duration_ms = s.options.scroll_animation_ms;
        s.scroll_to(target, animated, now_ms, duration_ms);
        Ok(target)
    }

    pub fn is_animating(&self) -> bool {
        self.surface.tween.is_some()
    }

    /// Stops the active tween and drops any pending selection.
    pub fn cancel_animation(&mut self) {
        self.surface.cancel_animation();
    }

    /// Advances the controller.
    ///
    /// - If a tween is active, applies its sample and returns the new offset. When it
    ///   completes, loops and recenters if needed and issues any pending selection.
    /// - Otherwise returns `None`.
    pub fn tick(&mut self, now_ms: u64) -> Option<Point> {
        let tween = self.surface.tween?;
        self.surface.layout.set_offset(tween.sample(now_ms));

        if tween.is_done(now_ms) {
            self.surface.tween = None;
            self.surface.settle();
            if let Some(selection) = self.surface.pending_selection.take() {
                self.issue_selection(selection);
            }
        } else {
            self.surface.update_centered();
        }

        Some(self.surface.layout.offset())
    }

    /// Real index path of the cell nearest the viewport center.
    pub fn centered_index_path(&self) -> Option<IndexPath> {
        self.surface.centered
    }
}

impl core::fmt::Debug for Controller {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let s = &self.surface;
        f.debug_struct("Controller")
            .field("options", &s.options)
            .field("snapshot", &s.layout.snapshot())
            .field("centered", &s.centered)
            .field("selected", &s.selected)
            .field("tween", &s.tween)
            .field("data_source", &self.data_source)
            .field("delegate", &self.delegate)
            .finish_non_exhaustive()
    }
}
