//! Focus management.
//!
//! A [`FocusHandler`] keeps the flat sequence of widgets registered with it
//! (every widget attached to a tree that uses the handler) and a set of
//! singular slots: focused, modal focused, modal mouse input focused,
//! dragged, last pressed, plus the trackers the `Gui` uses to detect modal
//! focus transitions.
//!
//! The handler only manipulates handles. Operations that change focus return
//! the [`FocusTransition`]s to deliver, in order; the
//! [`WidgetRegistry`](super::WidgetRegistry) wraps every operation and
//! delivers them to the widgets' focus listeners.
//!
//! # Tab Order
//!
//! Tab order is registration order. `tab_next`/`tab_previous` scan circularly
//! from the focused widget, visiting each registered widget at most once, so
//! a registry where nothing is focusable never loops.

use guichan_core::{GuiError, Result, WidgetId, gcn_debug};

/// Read access to widget state needed by the focus handler.
pub trait WidgetAccess {
    /// Whether the handle refers to a live widget.
    fn exists(&self, id: WidgetId) -> bool;

    /// The widget's parent.
    fn parent_of(&self, id: WidgetId) -> Option<WidgetId>;

    /// Own focusable flag, effective visibility and effective enabled state.
    fn is_focusable(&self, id: WidgetId) -> bool;

    /// Whether tabbing may move focus into the widget.
    fn is_tab_in_enabled(&self, id: WidgetId) -> bool;

    /// Whether tabbing may move focus away from the widget.
    fn is_tab_out_enabled(&self, id: WidgetId) -> bool;
}

/// A focus change to deliver to listeners.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusTransition {
    /// The widget gained focus.
    Gained(WidgetId),
    /// The widget lost focus.
    Lost(WidgetId),
}

/// Scan direction for focus cycling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Forward,
    Backward,
}

/// Tracks focus and modal state for one widget tree.
#[derive(Debug, Default)]
pub struct FocusHandler {
    widgets: Vec<WidgetId>,
    focused: Option<WidgetId>,
    modal_focused: Option<WidgetId>,
    modal_mouse_input_focused: Option<WidgetId>,
    dragged: Option<WidgetId>,
    last_widget_pressed: Option<WidgetId>,
    last_widget_with_mouse: Option<WidgetId>,
    last_widget_with_modal_focus: Option<WidgetId>,
    last_widget_with_modal_mouse_input_focus: Option<WidgetId>,
}

impl FocusHandler {
    /// Create an empty focus handler.
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Registration
    // =========================================================================

    /// Register a widget. Registration order is tab order.
    pub fn add(&mut self, widget: WidgetId) {
        if !self.widgets.contains(&widget) {
            self.widgets.push(widget);
        }
    }

    /// Unregister a widget and clear every slot that refers to it.
    ///
    /// No focus events are produced.
    pub fn remove(&mut self, widget: WidgetId) {
        self.widgets.retain(|w| *w != widget);

        for slot in [
            &mut self.focused,
            &mut self.modal_focused,
            &mut self.modal_mouse_input_focused,
            &mut self.dragged,
            &mut self.last_widget_pressed,
            &mut self.last_widget_with_mouse,
            &mut self.last_widget_with_modal_focus,
            &mut self.last_widget_with_modal_mouse_input_focus,
        ] {
            if *slot == Some(widget) {
                *slot = None;
            }
        }
    }

    /// Whether the widget is registered.
    pub fn contains(&self, widget: WidgetId) -> bool {
        self.widgets.contains(&widget)
    }

    /// Registered widgets in tab order.
    pub fn widgets(&self) -> &[WidgetId] {
        &self.widgets
    }

    // =========================================================================
    // Focus
    // =========================================================================

    /// The focused widget.
    #[inline]
    pub fn focused(&self) -> Option<WidgetId> {
        self.focused
    }

    /// Whether `widget` is focused.
    #[inline]
    pub fn is_focused(&self, widget: WidgetId) -> bool {
        self.focused == Some(widget)
    }

    /// Focus `widget`.
    ///
    /// Does nothing if the widget is already focused, or if modal focus is
    /// held and the widget is outside the modal scope. Fails with
    /// [`GuiError::NotRegistered`] if the widget is not registered.
    pub fn request_focus<A: WidgetAccess>(
        &mut self,
        access: &A,
        widget: WidgetId,
    ) -> Result<Vec<FocusTransition>> {
        if self.focused == Some(widget) {
            return Ok(Vec::new());
        }

        if !self.contains(widget) {
            return Err(GuiError::NotRegistered(widget));
        }

        if self.modal_focused.is_some() && !self.is_modal_focused(access, widget) {
            gcn_debug!(?widget, "focus request outside modal scope ignored");
            return Ok(Vec::new());
        }

        let mut transitions = Vec::with_capacity(2);
        if let Some(old) = self.focused.replace(widget) {
            transitions.push(FocusTransition::Lost(old));
        }
        transitions.push(FocusTransition::Gained(widget));
        gcn_debug!(?widget, "focus changed");
        Ok(transitions)
    }

    /// Clear focus.
    pub fn focus_none(&mut self) -> Vec<FocusTransition> {
        match self.focused.take() {
            Some(old) => {
                gcn_debug!(widget = ?old, "focus cleared");
                vec![FocusTransition::Lost(old)]
            }
            None => Vec::new(),
        }
    }

    /// Move focus to the next focusable widget, wrapping around.
    pub fn focus_next<A: WidgetAccess>(&mut self, access: &A) -> Vec<FocusTransition> {
        self.cycle(Direction::Forward, |id| access.is_focusable(id))
    }

    /// Move focus to the previous focusable widget, wrapping around.
    pub fn focus_previous<A: WidgetAccess>(&mut self, access: &A) -> Vec<FocusTransition> {
        self.cycle(Direction::Backward, |id| access.is_focusable(id))
    }

    /// Move focus to the next widget reachable by tabbing.
    ///
    /// Nothing happens if the focused widget has tab-out disabled.
    pub fn tab_next<A: WidgetAccess>(&mut self, access: &A) -> Vec<FocusTransition> {
        self.tab(access, Direction::Forward)
    }

    /// Move focus to the previous widget reachable by tabbing.
    pub fn tab_previous<A: WidgetAccess>(&mut self, access: &A) -> Vec<FocusTransition> {
        self.tab(access, Direction::Backward)
    }

    fn tab<A: WidgetAccess>(&mut self, access: &A, direction: Direction) -> Vec<FocusTransition> {
        if let Some(focused) = self.focused {
            if !access.is_tab_out_enabled(focused) {
                return Vec::new();
            }
        }

        if self.widgets.is_empty() {
            self.focused = None;
            return Vec::new();
        }

        let modal = self.modal_focused.is_some();
        let eligible = |id: WidgetId| {
            access.is_focusable(id)
                && access.is_tab_in_enabled(id)
                && (!modal || self.is_modal_focused(access, id))
        };
        let target = self.find_candidate(direction, eligible);
        self.apply_cycle(target)
    }

    fn cycle(
        &mut self,
        direction: Direction,
        eligible: impl Fn(WidgetId) -> bool,
    ) -> Vec<FocusTransition> {
        let target = self.find_candidate(direction, eligible);
        self.apply_cycle(target)
    }

    /// Scan circularly from the focused widget. Returns `None` when the scan
    /// comes back to the start or exhausts the sequence.
    fn find_candidate(
        &self,
        direction: Direction,
        eligible: impl Fn(WidgetId) -> bool,
    ) -> Option<WidgetId> {
        let len = self.widgets.len();
        if len == 0 {
            return None;
        }
        let start = self
            .focused
            .and_then(|f| self.widgets.iter().position(|w| *w == f));

        let mut index = start;
        for _ in 0..len {
            let next = match (direction, index) {
                (Direction::Forward, Some(i)) => (i + 1) % len,
                (Direction::Forward, None) => 0,
                (Direction::Backward, Some(i)) => (i + len - 1) % len,
                (Direction::Backward, None) => len - 1,
            };
            if Some(next) == start {
                return None;
            }
            index = Some(next);
            if eligible(self.widgets[next]) {
                return Some(self.widgets[next]);
            }
        }
        None
    }

    /// Focus the cycled-to widget. The new holder hears about it before the
    /// old one.
    fn apply_cycle(&mut self, target: Option<WidgetId>) -> Vec<FocusTransition> {
        let Some(target) = target else {
            return Vec::new();
        };
        let mut transitions = vec![FocusTransition::Gained(target)];
        if let Some(old) = self.focused.replace(target) {
            transitions.push(FocusTransition::Lost(old));
        }
        gcn_debug!(widget = ?target, "focus cycled");
        transitions
    }

    // =========================================================================
    // Modal focus
    // =========================================================================

    /// The widget holding modal focus.
    #[inline]
    pub fn modal_focused(&self) -> Option<WidgetId> {
        self.modal_focused
    }

    /// The widget holding modal mouse input focus.
    #[inline]
    pub fn modal_mouse_input_focused(&self) -> Option<WidgetId> {
        self.modal_mouse_input_focused
    }

    /// Give `widget` modal focus.
    ///
    /// Idempotent for the current holder. Clears focus if the focused widget
    /// is outside the new modal scope.
    pub fn request_modal_focus<A: WidgetAccess>(
        &mut self,
        access: &A,
        widget: WidgetId,
    ) -> Result<Vec<FocusTransition>> {
        if let Some(holder) = self.modal_focused {
            if holder != widget {
                return Err(GuiError::ModalFocusTaken { holder });
            }
        }

        self.modal_focused = Some(widget);
        gcn_debug!(?widget, "modal focus acquired");

        match self.focused {
            Some(focused) if !self.is_modal_focused(access, focused) => Ok(self.focus_none()),
            _ => Ok(Vec::new()),
        }
    }

    /// Give `widget` modal mouse input focus. Idempotent for the current holder.
    pub fn request_modal_mouse_input_focus(&mut self, widget: WidgetId) -> Result<()> {
        if let Some(holder) = self.modal_mouse_input_focused {
            if holder != widget {
                return Err(GuiError::ModalMouseInputFocusTaken { holder });
            }
        }
        self.modal_mouse_input_focused = Some(widget);
        gcn_debug!(?widget, "modal mouse input focus acquired");
        Ok(())
    }

    /// Release modal focus if `widget` holds it.
    pub fn release_modal_focus(&mut self, widget: WidgetId) {
        if self.modal_focused == Some(widget) {
            self.modal_focused = None;
            gcn_debug!(?widget, "modal focus released");
        }
    }

    /// Release modal mouse input focus if `widget` holds it.
    pub fn release_modal_mouse_input_focus(&mut self, widget: WidgetId) {
        if self.modal_mouse_input_focused == Some(widget) {
            self.modal_mouse_input_focused = None;
            gcn_debug!(?widget, "modal mouse input focus released");
        }
    }

    /// Whether `widget` or one of its ancestors holds modal focus.
    pub fn is_modal_focused<A: WidgetAccess>(&self, access: &A, widget: WidgetId) -> bool {
        Self::chain_contains(access, widget, self.modal_focused)
    }

    /// Whether `widget` or one of its ancestors holds modal mouse input focus.
    pub fn is_modal_mouse_input_focused<A: WidgetAccess>(
        &self,
        access: &A,
        widget: WidgetId,
    ) -> bool {
        Self::chain_contains(access, widget, self.modal_mouse_input_focused)
    }

    fn chain_contains<A: WidgetAccess>(
        access: &A,
        widget: WidgetId,
        holder: Option<WidgetId>,
    ) -> bool {
        let Some(holder) = holder else {
            return false;
        };
        let mut current = Some(widget);
        while let Some(id) = current {
            if id == holder {
                return true;
            }
            current = access.parent_of(id);
        }
        false
    }

    // =========================================================================
    // Tracking slots used by the Gui
    // =========================================================================

    /// The widget receiving drag events.
    pub fn dragged(&self) -> Option<WidgetId> {
        self.dragged
    }

    pub fn set_dragged(&mut self, widget: Option<WidgetId>) {
        self.dragged = widget;
    }

    /// The widget that received the last press.
    pub fn last_widget_pressed(&self) -> Option<WidgetId> {
        self.last_widget_pressed
    }

    pub fn set_last_widget_pressed(&mut self, widget: Option<WidgetId>) {
        self.last_widget_pressed = widget;
    }

    pub fn last_widget_with_mouse(&self) -> Option<WidgetId> {
        self.last_widget_with_mouse
    }

    pub fn set_last_widget_with_mouse(&mut self, widget: Option<WidgetId>) {
        self.last_widget_with_mouse = widget;
    }

    /// The modal focus holder seen at the last modal transition check.
    pub fn last_widget_with_modal_focus(&self) -> Option<WidgetId> {
        self.last_widget_with_modal_focus
    }

    pub fn set_last_widget_with_modal_focus(&mut self, widget: Option<WidgetId>) {
        self.last_widget_with_modal_focus = widget;
    }

    /// The modal mouse input holder seen at the last modal transition check.
    pub fn last_widget_with_modal_mouse_input_focus(&self) -> Option<WidgetId> {
        self.last_widget_with_modal_mouse_input_focus
    }

    pub fn set_last_widget_with_modal_mouse_input_focus(&mut self, widget: Option<WidgetId>) {
        self.last_widget_with_modal_mouse_input_focus = widget;
    }
}
