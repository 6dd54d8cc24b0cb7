//! The widget registry.
//!
//! Every widget lives in a [`WidgetRegistry`], an arena keyed by [`WidgetId`].
//! The registry replaces raw back-pointers: parents, focus handler slots and
//! the `Gui`'s "widgets under the mouse" queue all store ids, and every
//! dereference goes through the arena, which fails cleanly for destroyed
//! widgets.
//!
//! The registry also owns the focus handlers, so that focus changes can be
//! delivered to widget listeners as soon as they happen.
//!
//! # Example
//!
//! ```
//! use guichan::widget::WidgetRegistry;
//! use guichan::widgets::{Button, Container};
//!
//! let mut widgets = WidgetRegistry::new();
//! let root = Container::create(&mut widgets);
//! let ok = Button::create(&mut widgets, "Ok");
//! widgets.add(root, ok).unwrap();
//!
//! assert_eq!(widgets.parent(ok), Some(root));
//! widgets.remove(root, ok).unwrap();
//! assert_eq!(widgets.parent(ok), None);
//! ```

use std::sync::Arc;

use guichan_core::logging::targets;
use guichan_core::{FocusHandlerId, GuiError, Rectangle, Result, WidgetId, gcn_trace, gcn_warn};
use parking_lot::Mutex;
use slotmap::SlotMap;

use super::base::WidgetBase;
use super::events::{
    ActionEvent, DeathEvent, FocusEvent, KeyEvent, KeyEventType, MouseEvent, MouseEventType,
    WidgetEvent,
};
use super::focus::{FocusHandler, FocusTransition, WidgetAccess};
use super::listeners::{FocusListener, SharedFocusListener};
use super::traits::{SharedWidget, Widget};
use crate::graphics::Font;
use crate::widget::listeners::shared;

/// Whether a widget can hold children.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidgetKind {
    /// A widget without children.
    Leaf,
    /// A widget with an ordered child sequence.
    Container,
}

/// A child entry in a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Child {
    pub(crate) id: WidgetId,
    /// Owned children are destroyed with the container; borrowed ones are
    /// only detached.
    pub(crate) owned: bool,
}

pub(crate) struct WidgetNode {
    pub(crate) base: WidgetBase,
    pub(crate) behavior: SharedWidget,
    /// Back to front. `None` for leaves.
    pub(crate) children: Option<Vec<Child>>,
}

/// Arena storage for widgets plus the queries that only need widget state.
#[derive(Default)]
pub struct WidgetArena {
    nodes: SlotMap<WidgetId, WidgetNode>,
}

impl WidgetArena {
    #[inline]
    pub(crate) fn get(&self, id: WidgetId) -> Option<&WidgetNode> {
        self.nodes.get(id)
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, id: WidgetId) -> Option<&mut WidgetNode> {
        self.nodes.get_mut(id)
    }

    /// Own visible flag AND every ancestor's.
    pub fn is_visible(&self, id: WidgetId) -> bool {
        let mut current = Some(id);
        while let Some(id) = current {
            match self.nodes.get(id) {
                Some(node) if node.base.visible => current = node.base.parent,
                _ => return false,
            }
        }
        true
    }

    /// Own enabled flag AND effective visibility.
    pub fn is_enabled(&self, id: WidgetId) -> bool {
        self.nodes.get(id).is_some_and(|n| n.base.enabled) && self.is_visible(id)
    }

    /// Own focusable flag AND effective visibility AND effective enabled.
    pub fn is_focusable(&self, id: WidgetId) -> bool {
        self.nodes.get(id).is_some_and(|n| n.base.focusable) && self.is_enabled(id)
    }

    /// The area children are laid out in, relative to the widget.
    pub fn children_area(&self, id: WidgetId) -> Rectangle {
        self.nodes
            .get(id)
            .map(|n| Rectangle::new(0, 0, n.base.width(), n.base.height()))
            .unwrap_or_default()
    }

    /// Position on screen: the sum of every ancestor's position and
    /// children area offset.
    pub fn absolute_position(&self, id: WidgetId) -> Option<(i32, i32)> {
        let node = self.nodes.get(id)?;
        let (mut x, mut y) = (node.base.x(), node.base.y());
        let mut parent = node.base.parent;
        while let Some(pid) = parent {
            let pnode = self.nodes.get(pid)?;
            let area = self.children_area(pid);
            x += pnode.base.x() + area.x;
            y += pnode.base.y() + area.y;
            parent = pnode.base.parent;
        }
        Some((x, y))
    }
}

impl WidgetAccess for WidgetArena {
    fn exists(&self, id: WidgetId) -> bool {
        self.nodes.contains_key(id)
    }

    fn parent_of(&self, id: WidgetId) -> Option<WidgetId> {
        self.nodes.get(id).and_then(|n| n.base.parent)
    }

    fn is_focusable(&self, id: WidgetId) -> bool {
        WidgetArena::is_focusable(self, id)
    }

    fn is_tab_in_enabled(&self, id: WidgetId) -> bool {
        self.nodes.get(id).is_some_and(|n| n.base.is_tab_in_enabled())
    }

    fn is_tab_out_enabled(&self, id: WidgetId) -> bool {
        self.nodes.get(id).is_some_and(|n| n.base.is_tab_out_enabled())
    }
}

fn call_focus_listener(
    listener: &mut dyn FocusListener,
    transition: FocusTransition,
    widgets: &mut WidgetRegistry,
) {
    match transition {
        FocusTransition::Gained(source) => listener.focus_gained(&FocusEvent { source }, widgets),
        FocusTransition::Lost(source) => listener.focus_lost(&FocusEvent { source }, widgets),
    }
}

/// Owns all widgets and focus handlers of a GUI session.
///
/// Created with the `Gui` (or injected into it) and cleared at teardown with
/// [`WidgetRegistry::clear`].
#[derive(Default)]
pub struct WidgetRegistry {
    pub(crate) arena: WidgetArena,
    pub(crate) handlers: SlotMap<FocusHandlerId, FocusHandler>,
    global_font: Option<Arc<dyn Font>>,
    /// Focus changes for listeners that were running when the change
    /// happened, delivered once they return.
    pending_focus: Vec<(SharedFocusListener, FocusTransition)>,
}

impl WidgetRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Create a leaf widget.
    pub fn create<W: Widget + 'static>(&mut self, widget: W) -> WidgetId {
        self.insert(shared(widget), WidgetKind::Leaf)
    }

    /// Create a widget that can hold children.
    pub fn create_container<W: Widget + 'static>(&mut self, widget: W) -> WidgetId {
        self.insert(shared(widget), WidgetKind::Container)
    }

    /// Insert a widget whose behavior handle is shared with the caller, for
    /// example because the behavior also acts as one of its listeners.
    pub fn insert(&mut self, behavior: SharedWidget, kind: WidgetKind) -> WidgetId {
        let id = self.arena.nodes.insert_with_key(|id| WidgetNode {
            base: WidgetBase::new(id),
            behavior,
            children: match kind {
                WidgetKind::Leaf => None,
                WidgetKind::Container => Some(Vec::new()),
            },
        });
        gcn_trace!(?id, ?kind, "widget created");
        id
    }

    /// Destroy a widget.
    ///
    /// Death listeners run first, while the widget is still alive. Owned
    /// children are destroyed, borrowed children are detached, and the
    /// widget is removed from its parent and its focus handler.
    pub fn destroy(&mut self, id: WidgetId) -> Result<()> {
        let listeners = self.node(id)?.base.death_listeners.clone();
        let event = DeathEvent { source: id };
        self.notify(listeners, |l, widgets| l.death(&event, widgets));

        // A death listener may already have destroyed it.
        if !self.contains(id) {
            return Ok(());
        }

        let children = self
            .arena
            .get_mut(id)
            .and_then(|n| n.children.as_mut().map(std::mem::take))
            .unwrap_or_default();
        for child in children {
            if !self.contains(child.id) {
                continue;
            }
            if child.owned {
                self.destroy(child.id)?;
            } else {
                self.detach(child.id);
            }
        }

        if let Some(parent) = self.parent(id) {
            if let Some(siblings) = self.arena.get_mut(parent).and_then(|n| n.children.as_mut()) {
                siblings.retain(|c| c.id != id);
            }
        }

        self.unregister_from_focus_handler(id);
        self.arena.nodes.remove(id);
        gcn_trace!(?id, "widget destroyed");
        Ok(())
    }

    /// Destroy every widget.
    pub fn clear(&mut self) {
        while let Some(id) = self.arena.nodes.keys().next() {
            if self.destroy(id).is_err() {
                self.arena.nodes.remove(id);
            }
        }
    }

    /// Whether `id` refers to a live widget.
    #[inline]
    pub fn contains(&self, id: WidgetId) -> bool {
        self.arena.nodes.contains_key(id)
    }

    /// Number of live widgets.
    pub fn len(&self) -> usize {
        self.arena.nodes.len()
    }

    /// Whether the registry holds no widgets.
    pub fn is_empty(&self) -> bool {
        self.arena.nodes.is_empty()
    }

    /// All live widget ids.
    pub fn widget_ids(&self) -> impl Iterator<Item = WidgetId> + '_ {
        self.arena.nodes.keys()
    }

    /// Read-only widget queries.
    pub fn arena(&self) -> &WidgetArena {
        &self.arena
    }

    pub(crate) fn node(&self, id: WidgetId) -> Result<&WidgetNode> {
        self.arena.get(id).ok_or(GuiError::InvalidWidget(id))
    }

    pub(crate) fn node_mut(&mut self, id: WidgetId) -> Result<&mut WidgetNode> {
        self.arena.get_mut(id).ok_or(GuiError::InvalidWidget(id))
    }

    /// The widget's base state.
    pub fn base(&self, id: WidgetId) -> Result<&WidgetBase> {
        self.node(id).map(|n| &n.base)
    }

    /// Mutable base state, for attributes without side effects (colors,
    /// names, tab flags, frame size, listeners).
    pub fn base_mut(&mut self, id: WidgetId) -> Result<&mut WidgetBase> {
        self.node_mut(id).map(|n| &mut n.base)
    }

    /// The widget's behavior handle.
    pub fn behavior(&self, id: WidgetId) -> Result<SharedWidget> {
        self.node(id).map(|n| n.behavior.clone())
    }

    /// The widget's parent container.
    pub fn parent(&self, id: WidgetId) -> Option<WidgetId> {
        self.arena.get(id).and_then(|n| n.base.parent)
    }

    /// Whether the widget can hold children.
    pub fn is_container(&self, id: WidgetId) -> bool {
        self.arena.get(id).is_some_and(|n| n.children.is_some())
    }

    /// The children of a container, back to front.
    pub fn children(&self, id: WidgetId) -> Result<Vec<WidgetId>> {
        let children = self
            .node(id)?
            .children
            .as_ref()
            .ok_or(GuiError::NotAContainer(id))?;
        Ok(children.iter().map(|c| c.id).collect())
    }

    // =========================================================================
    // Geometry
    // =========================================================================

    /// Position relative to the parent's children area, and size.
    pub fn dimension(&self, id: WidgetId) -> Result<Rectangle> {
        self.base(id).map(|b| b.dimension())
    }

    /// Set position and size. Widget listeners hear `widget_resized` and
    /// `widget_moved` only for the parts that actually changed.
    pub fn set_dimension(&mut self, id: WidgetId, dimension: Rectangle) -> Result<()> {
        let node = self.node_mut(id)?;
        let old = std::mem::replace(&mut node.base.dimension, dimension);
        let listeners = node.base.widget_listeners.clone();
        let event = WidgetEvent { source: id };

        if old.width != dimension.width || old.height != dimension.height {
            self.notify(listeners.clone(), |l, widgets| l.widget_resized(&event, widgets));
        }
        if old.x != dimension.x || old.y != dimension.y {
            self.notify(listeners, |l, widgets| l.widget_moved(&event, widgets));
        }
        Ok(())
    }

    pub fn set_position(&mut self, id: WidgetId, x: i32, y: i32) -> Result<()> {
        let d = self.dimension(id)?;
        self.set_dimension(id, Rectangle::new(x, y, d.width, d.height))
    }

    pub fn set_size(&mut self, id: WidgetId, width: i32, height: i32) -> Result<()> {
        let d = self.dimension(id)?;
        self.set_dimension(id, Rectangle::new(d.x, d.y, width, height))
    }

    pub fn set_x(&mut self, id: WidgetId, x: i32) -> Result<()> {
        let d = self.dimension(id)?;
        self.set_dimension(id, Rectangle { x, ..d })
    }

    pub fn set_y(&mut self, id: WidgetId, y: i32) -> Result<()> {
        let d = self.dimension(id)?;
        self.set_dimension(id, Rectangle { y, ..d })
    }

    pub fn set_width(&mut self, id: WidgetId, width: i32) -> Result<()> {
        let d = self.dimension(id)?;
        self.set_dimension(id, Rectangle { width, ..d })
    }

    pub fn set_height(&mut self, id: WidgetId, height: i32) -> Result<()> {
        let d = self.dimension(id)?;
        self.set_dimension(id, Rectangle { height, ..d })
    }

    /// Screen position of the widget's top-left corner.
    pub fn absolute_position(&self, id: WidgetId) -> Result<(i32, i32)> {
        self.arena
            .absolute_position(id)
            .ok_or(GuiError::InvalidWidget(id))
    }

    /// The area children are laid out in, relative to the widget.
    pub fn children_area(&self, id: WidgetId) -> Result<Rectangle> {
        self.node(id)?;
        Ok(self.arena.children_area(id))
    }

    // =========================================================================
    // Flags
    // =========================================================================

    /// Effective visibility. False for destroyed widgets.
    pub fn is_visible(&self, id: WidgetId) -> bool {
        self.arena.is_visible(id)
    }

    /// Effective enabled state. False for destroyed widgets.
    pub fn is_enabled(&self, id: WidgetId) -> bool {
        self.arena.is_enabled(id)
    }

    /// Whether the widget can take focus right now.
    pub fn is_focusable(&self, id: WidgetId) -> bool {
        self.arena.is_focusable(id)
    }

    /// Show or hide the widget. Hiding the focused widget clears focus.
    pub fn set_visible(&mut self, id: WidgetId, visible: bool) -> Result<()> {
        let was_focused = self.is_focused(id);
        let node = self.node_mut(id)?;
        let changed = node.base.visible != visible;
        node.base.visible = visible;
        let listeners = node.base.widget_listeners.clone();

        if !visible && was_focused {
            self.focus_none_of(id);
        }

        if changed {
            let event = WidgetEvent { source: id };
            if visible {
                self.notify(listeners, |l, widgets| l.widget_shown(&event, widgets));
            } else {
                self.notify(listeners, |l, widgets| l.widget_hidden(&event, widgets));
            }
        }
        Ok(())
    }

    /// Enable or disable the widget. Disabling the focused widget clears
    /// focus.
    pub fn set_enabled(&mut self, id: WidgetId, enabled: bool) -> Result<()> {
        let was_focused = self.is_focused(id);
        self.node_mut(id)?.base.enabled = enabled;
        if !enabled && was_focused {
            self.focus_none_of(id);
        }
        Ok(())
    }

    /// Allow or forbid focus. Forbidding focus on the focused widget clears
    /// focus.
    pub fn set_focusable(&mut self, id: WidgetId, focusable: bool) -> Result<()> {
        let was_focused = self.is_focused(id);
        self.node_mut(id)?.base.focusable = focusable;
        if !focusable && was_focused {
            self.focus_none_of(id);
        }
        Ok(())
    }

    // =========================================================================
    // Fonts
    // =========================================================================

    /// Set the font used by every widget without a font of its own.
    pub fn set_global_font(&mut self, font: Option<Arc<dyn Font>>) {
        self.global_font = font;
        let affected: Vec<_> = self
            .arena
            .nodes
            .iter()
            .filter(|(_, n)| n.base.font.is_none())
            .map(|(id, _)| id)
            .collect();
        for id in affected {
            self.notify_font_changed(id);
        }
    }

    /// The global font.
    pub fn global_font(&self) -> Option<Arc<dyn Font>> {
        self.global_font.clone()
    }

    /// Set the widget's own font. `None` falls back to the global font.
    pub fn set_font(&mut self, id: WidgetId, font: Option<Arc<dyn Font>>) -> Result<()> {
        self.node_mut(id)?.base.font = font;
        self.notify_font_changed(id);
        Ok(())
    }

    /// The effective font: the widget's own, else the global one.
    pub fn font(&self, id: WidgetId) -> Option<Arc<dyn Font>> {
        self.arena
            .get(id)
            .and_then(|n| n.base.font.clone())
            .or_else(|| self.global_font.clone())
    }

    fn notify_font_changed(&self, id: WidgetId) {
        let Some(node) = self.arena.get(id) else {
            return;
        };
        match node.behavior.try_lock() {
            Some(mut behavior) => behavior.font_changed(&node.base),
            None => tracing::warn!(target: targets::WIDGET, ?id, "font change during widget callback skipped"),
        }
    }

    // =========================================================================
    // Focus handlers
    // =========================================================================

    /// Create a focus handler.
    pub fn create_focus_handler(&mut self) -> FocusHandlerId {
        self.handlers.insert(FocusHandler::new())
    }

    /// Remove a focus handler. Widgets using it are left without one.
    pub fn remove_focus_handler(&mut self, handler: FocusHandlerId) -> Result<()> {
        self.handlers
            .remove(handler)
            .ok_or(GuiError::InvalidFocusHandler(handler))?;
        for node in self.arena.nodes.values_mut() {
            if node.base.focus_handler == Some(handler) {
                node.base.focus_handler = None;
            }
            if node.base.internal_focus_handler == Some(handler) {
                node.base.internal_focus_handler = None;
            }
        }
        Ok(())
    }

    /// Read a focus handler.
    pub fn focus_handler(&self, handler: FocusHandlerId) -> Result<&FocusHandler> {
        self.handlers
            .get(handler)
            .ok_or(GuiError::InvalidFocusHandler(handler))
    }

    /// Mutate a focus handler directly. Changes made this way deliver no
    /// focus events.
    pub fn focus_handler_mut(&mut self, handler: FocusHandlerId) -> Result<&mut FocusHandler> {
        self.handlers
            .get_mut(handler)
            .ok_or(GuiError::InvalidFocusHandler(handler))
    }

    /// Attach the widget (and, unless it has an internal focus handler, its
    /// descendants) to `handler`, detaching from the previous one.
    ///
    /// Detaching releases any modal focus the widget holds and clears every
    /// focus handler slot that refers to it.
    pub fn set_focus_handler(
        &mut self,
        id: WidgetId,
        handler: Option<FocusHandlerId>,
    ) -> Result<()> {
        self.node(id)?;
        self.unregister_from_focus_handler(id);
        if let Some(h) = handler {
            self.focus_handler_mut(h)?.add(id);
        }
        let node = self.node_mut(id)?;
        node.base.focus_handler = handler;

        if node.base.internal_focus_handler.is_some() {
            return Ok(());
        }
        let children: Vec<_> = node
            .children
            .iter()
            .flatten()
            .map(|c| c.id)
            .collect();
        for child in children {
            self.set_focus_handler(child, handler)?;
        }
        Ok(())
    }

    fn unregister_from_focus_handler(&mut self, id: WidgetId) {
        let Some(old) = self.arena.get(id).and_then(|n| n.base.focus_handler) else {
            return;
        };
        if let Some(handler) = self.handlers.get_mut(old) {
            handler.release_modal_focus(id);
            handler.release_modal_mouse_input_focus(id);
            handler.remove(id);
        }
        if let Some(node) = self.arena.get_mut(id) {
            node.base.focus_handler = None;
        }
    }

    fn handler_of(&self, id: WidgetId) -> Result<FocusHandlerId> {
        self.node(id)?
            .base
            .focus_handler
            .ok_or(GuiError::NoFocusHandler(id))
    }

    fn with_handler<R>(
        &mut self,
        handler: FocusHandlerId,
        f: impl FnOnce(&mut FocusHandler, &WidgetArena) -> R,
    ) -> Result<R> {
        let h = self
            .handlers
            .get_mut(handler)
            .ok_or(GuiError::InvalidFocusHandler(handler))?;
        Ok(f(h, &self.arena))
    }

    /// Deliver focus transitions to focus listeners, skipping widgets that
    /// no longer exist.
    ///
    /// A listener that is running further up the stack gets its events once
    /// it returns, in the order they happened.
    pub(crate) fn deliver_focus(&mut self, transitions: Vec<FocusTransition>) {
        self.flush_pending_focus();
        for transition in transitions {
            let (FocusTransition::Gained(id) | FocusTransition::Lost(id)) = transition;
            let Some(node) = self.arena.get(id) else {
                continue;
            };
            for listener in node.base.focus_listeners.clone() {
                if self.has_pending_focus(&listener) {
                    self.pending_focus.push((listener, transition));
                    continue;
                }
                let Some(mut guard) = listener.try_lock() else {
                    tracing::debug!(target: targets::FOCUS, widget = ?id, "focus event deferred, listener busy");
                    self.pending_focus.push((listener.clone(), transition));
                    continue;
                };
                call_focus_listener(&mut *guard, transition, self);
            }
        }
    }

    fn has_pending_focus(&self, listener: &SharedFocusListener) -> bool {
        self.pending_focus
            .iter()
            .any(|(pending, _)| Arc::ptr_eq(pending, listener))
    }

    /// Deliver deferred focus events to listeners that are no longer busy.
    pub(crate) fn flush_pending_focus(&mut self) {
        if self.pending_focus.is_empty() {
            return;
        }
        let pending = std::mem::take(&mut self.pending_focus);
        let mut blocked: Vec<SharedFocusListener> = Vec::new();
        for (listener, transition) in pending {
            if blocked.iter().any(|b| Arc::ptr_eq(b, &listener)) {
                self.pending_focus.push((listener, transition));
                continue;
            }
            let Some(mut guard) = listener.try_lock() else {
                blocked.push(listener.clone());
                self.pending_focus.push((listener.clone(), transition));
                continue;
            };
            call_focus_listener(&mut *guard, transition, self);
        }
    }

    fn focus_none_of(&mut self, id: WidgetId) {
        if let Some(handler) = self.arena.get(id).and_then(|n| n.base.focus_handler) {
            if let Ok(t) = self.with_handler(handler, |h, _| h.focus_none()) {
                self.deliver_focus(t);
            }
        }
    }

    // =========================================================================
    // Focus requests by widget
    // =========================================================================

    /// Whether the widget holds focus in its focus handler.
    pub fn is_focused(&self, id: WidgetId) -> bool {
        self.arena
            .get(id)
            .and_then(|n| n.base.focus_handler)
            .and_then(|h| self.handlers.get(h))
            .is_some_and(|h| h.is_focused(id))
    }

    /// Request focus for the widget.
    ///
    /// Fails with [`GuiError::NoFocusHandler`] if the widget is not attached
    /// to a tree. Does nothing if the widget is not focusable.
    pub fn request_focus(&mut self, id: WidgetId) -> Result<()> {
        let handler = self.handler_of(id)?;
        if !self.is_focusable(id) {
            return Ok(());
        }
        let transitions = self.with_handler(handler, |h, arena| h.request_focus(arena, id))??;
        self.deliver_focus(transitions);
        Ok(())
    }

    /// Request modal focus for the widget.
    pub fn request_modal_focus(&mut self, id: WidgetId) -> Result<()> {
        let handler = self.handler_of(id)?;
        let transitions =
            self.with_handler(handler, |h, arena| h.request_modal_focus(arena, id))??;
        self.deliver_focus(transitions);
        Ok(())
    }

    /// Request modal mouse input focus for the widget.
    pub fn request_modal_mouse_input_focus(&mut self, id: WidgetId) -> Result<()> {
        let handler = self.handler_of(id)?;
        self.with_handler(handler, |h, _| h.request_modal_mouse_input_focus(id))?
    }

    /// Release modal focus if the widget holds it. No-op when detached.
    pub fn release_modal_focus(&mut self, id: WidgetId) -> Result<()> {
        if let Some(handler) = self.node(id)?.base.focus_handler {
            self.with_handler(handler, |h, _| h.release_modal_focus(id))?;
        }
        Ok(())
    }

    /// Release modal mouse input focus if the widget holds it. No-op when
    /// detached.
    pub fn release_modal_mouse_input_focus(&mut self, id: WidgetId) -> Result<()> {
        if let Some(handler) = self.node(id)?.base.focus_handler {
            self.with_handler(handler, |h, _| h.release_modal_mouse_input_focus(id))?;
        }
        Ok(())
    }

    /// Whether the widget or an ancestor holds modal focus.
    pub fn is_modal_focused(&self, id: WidgetId) -> Result<bool> {
        let handler = self.focus_handler(self.handler_of(id)?)?;
        Ok(handler.is_modal_focused(&self.arena, id))
    }

    /// Whether the widget or an ancestor holds modal mouse input focus.
    pub fn is_modal_mouse_input_focused(&self, id: WidgetId) -> Result<bool> {
        let handler = self.focus_handler(self.handler_of(id)?)?;
        Ok(handler.is_modal_mouse_input_focused(&self.arena, id))
    }

    // =========================================================================
    // Focus operations by handler
    // =========================================================================

    /// Focus a widget through `handler`, bypassing the focusable check.
    pub fn focus_widget(&mut self, handler: FocusHandlerId, id: WidgetId) -> Result<()> {
        let transitions = self.with_handler(handler, |h, arena| h.request_focus(arena, id))??;
        self.deliver_focus(transitions);
        Ok(())
    }

    /// Clear focus in `handler`.
    pub fn focus_none(&mut self, handler: FocusHandlerId) -> Result<()> {
        let transitions = self.with_handler(handler, |h, _| h.focus_none())?;
        self.deliver_focus(transitions);
        Ok(())
    }

    /// Move focus to the next focusable widget of `handler`.
    pub fn focus_next(&mut self, handler: FocusHandlerId) -> Result<()> {
        let transitions = self.with_handler(handler, |h, arena| h.focus_next(arena))?;
        self.deliver_focus(transitions);
        Ok(())
    }

    /// Move focus to the previous focusable widget of `handler`.
    pub fn focus_previous(&mut self, handler: FocusHandlerId) -> Result<()> {
        let transitions = self.with_handler(handler, |h, arena| h.focus_previous(arena))?;
        self.deliver_focus(transitions);
        Ok(())
    }

    /// Tab forward in `handler`.
    pub fn tab_next(&mut self, handler: FocusHandlerId) -> Result<()> {
        let transitions = self.with_handler(handler, |h, arena| h.tab_next(arena))?;
        self.deliver_focus(transitions);
        Ok(())
    }

    /// Tab backward in `handler`.
    pub fn tab_previous(&mut self, handler: FocusHandlerId) -> Result<()> {
        let transitions = self.with_handler(handler, |h, arena| h.tab_previous(arena))?;
        self.deliver_focus(transitions);
        Ok(())
    }

    // =========================================================================
    // Listener dispatch
    // =========================================================================

    /// Call every listener in the snapshot. A listener that is already
    /// running further up the stack is skipped.
    pub(crate) fn notify<L: ?Sized>(
        &mut self,
        listeners: Vec<Arc<Mutex<L>>>,
        mut call: impl FnMut(&mut L, &mut WidgetRegistry),
    ) {
        self.notify_until(listeners, |listener, widgets| {
            call(listener, widgets);
            false
        });
    }

    /// Like [`notify`](Self::notify), but stops as soon as `call` returns
    /// true.
    pub(crate) fn notify_until<L: ?Sized>(
        &mut self,
        listeners: Vec<Arc<Mutex<L>>>,
        mut call: impl FnMut(&mut L, &mut WidgetRegistry) -> bool,
    ) {
        for listener in listeners {
            let Some(mut guard) = listener.try_lock() else {
                gcn_warn!("re-entrant listener call skipped");
                continue;
            };
            let stop = call(&mut *guard, self);
            drop(guard);
            self.flush_pending_focus();
            if stop {
                break;
            }
        }
    }

    /// Deliver a mouse event to the listeners of one widget, stopping once
    /// a listener consumes it.
    pub(crate) fn distribute_mouse_event_to(&mut self, id: WidgetId, event: &mut MouseEvent) {
        let Some(node) = self.arena.get(id) else {
            return;
        };
        let listeners = node.base.mouse_listeners.clone();
        self.notify_until(listeners, |l, widgets| {
            match event.kind() {
                MouseEventType::Entered => l.mouse_entered(event, widgets),
                MouseEventType::Exited => l.mouse_exited(event, widgets),
                MouseEventType::Moved => l.mouse_moved(event, widgets),
                MouseEventType::Pressed => l.mouse_pressed(event, widgets),
                MouseEventType::Released => l.mouse_released(event, widgets),
                MouseEventType::WheelMovedUp => l.mouse_wheel_moved_up(event, widgets),
                MouseEventType::WheelMovedDown => l.mouse_wheel_moved_down(event, widgets),
                MouseEventType::Dragged => l.mouse_dragged(event, widgets),
                MouseEventType::Clicked => l.mouse_clicked(event, widgets),
            }
            event.is_consumed()
        });
    }

    /// Deliver a key event to the listeners of one widget, stopping once a
    /// listener consumes it.
    pub(crate) fn distribute_key_event_to(&mut self, id: WidgetId, event: &mut KeyEvent) {
        let Some(node) = self.arena.get(id) else {
            return;
        };
        let listeners = node.base.key_listeners.clone();
        self.notify_until(listeners, |l, widgets| {
            match event.kind() {
                KeyEventType::Pressed => l.key_pressed(event, widgets),
                KeyEventType::Released => l.key_released(event, widgets),
            }
            event.is_consumed()
        });
    }

    /// Fire an action event from the widget to its action listeners.
    pub fn distribute_action_event(&mut self, id: WidgetId) -> Result<()> {
        let base = self.base(id)?;
        let listeners = base.action_listeners.clone();
        let event = ActionEvent {
            source: id,
            id: base.action_event_id().to_owned(),
        };
        self.notify(listeners, |l, widgets| l.action(&event, widgets));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graphics::{FixedWidthFont, Graphics};
    use crate::widget::listeners::{DeathListener, FocusListener, WidgetListener};

    struct Plain;

    impl Widget for Plain {
        fn draw(&mut self, _base: &WidgetBase, _graphics: &mut dyn Graphics) {}
    }

    #[derive(Default)]
    struct FontWatcher {
        changes: usize,
    }

    impl Widget for FontWatcher {
        fn draw(&mut self, _base: &WidgetBase, _graphics: &mut dyn Graphics) {}

        fn font_changed(&mut self, _base: &WidgetBase) {
            self.changes += 1;
        }
    }

    #[derive(Default)]
    struct Log(Vec<String>);

    impl WidgetListener for Log {
        fn widget_resized(&mut self, _e: &WidgetEvent, _w: &mut WidgetRegistry) {
            self.0.push("resized".into());
        }
        fn widget_moved(&mut self, _e: &WidgetEvent, _w: &mut WidgetRegistry) {
            self.0.push("moved".into());
        }
        fn widget_hidden(&mut self, _e: &WidgetEvent, _w: &mut WidgetRegistry) {
            self.0.push("hidden".into());
        }
        fn widget_shown(&mut self, _e: &WidgetEvent, _w: &mut WidgetRegistry) {
            self.0.push("shown".into());
        }
    }

    impl FocusListener for Log {
        fn focus_gained(&mut self, _e: &FocusEvent, _w: &mut WidgetRegistry) {
            self.0.push("gained".into());
        }
        fn focus_lost(&mut self, _e: &FocusEvent, _w: &mut WidgetRegistry) {
            self.0.push("lost".into());
        }
    }

    impl DeathListener for Log {
        fn death(&mut self, e: &DeathEvent, w: &mut WidgetRegistry) {
            assert!(w.contains(e.source));
            self.0.push("death".into());
        }
    }

    fn setup() -> (WidgetRegistry, FocusHandlerId, WidgetId) {
        let mut widgets = WidgetRegistry::new();
        let handler = widgets.create_focus_handler();
        let id = widgets.create(Plain);
        widgets.set_focus_handler(id, Some(handler)).unwrap();
        widgets.set_focusable(id, true).unwrap();
        (widgets, handler, id)
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    #[test]
    fn test_destroy_invalidates_handle() {
        let (mut widgets, handler, id) = setup();
        widgets.destroy(id).unwrap();
        assert!(!widgets.contains(id));
        assert_eq!(widgets.destroy(id), Err(GuiError::InvalidWidget(id)));
        assert!(!widgets.focus_handler(handler).unwrap().contains(id));
    }

    #[test]
    fn test_death_listener_sees_live_widget() {
        let (mut widgets, _, id) = setup();
        let log = shared(Log::default());
        widgets.base_mut(id).unwrap().add_death_listener(log.clone());
        widgets.destroy(id).unwrap();
        assert_eq!(log.lock().0, vec!["death"]);
    }

    #[test]
    fn test_clear_destroys_everything() {
        let (mut widgets, _, _) = setup();
        widgets.create(Plain);
        widgets.clear();
        assert!(widgets.is_empty());
    }

    // =========================================================================
    // Geometry
    // =========================================================================

    #[test]
    fn test_geometry_events_only_on_change() {
        let (mut widgets, _, id) = setup();
        let log = shared(Log::default());
        widgets.base_mut(id).unwrap().add_widget_listener(log.clone());

        widgets.set_size(id, 10, 10).unwrap();
        widgets.set_size(id, 10, 10).unwrap();
        widgets.set_position(id, 5, 5).unwrap();
        widgets
            .set_dimension(id, Rectangle::new(6, 5, 11, 10))
            .unwrap();

        assert_eq!(log.lock().0, vec!["resized", "moved", "resized", "moved"]);
    }

    #[test]
    fn test_visibility_events_only_on_change() {
        let (mut widgets, _, id) = setup();
        let log = shared(Log::default());
        widgets.base_mut(id).unwrap().add_widget_listener(log.clone());

        widgets.set_visible(id, false).unwrap();
        widgets.set_visible(id, false).unwrap();
        widgets.set_visible(id, true).unwrap();
        assert_eq!(log.lock().0, vec!["hidden", "shown"]);
    }

    // =========================================================================
    // Focus
    // =========================================================================

    #[test]
    fn test_focusable_requires_visible_and_enabled() {
        let (mut widgets, _, id) = setup();
        assert!(widgets.is_focusable(id));

        widgets.set_enabled(id, false).unwrap();
        assert!(!widgets.is_focusable(id));
        widgets.set_enabled(id, true).unwrap();

        widgets.set_visible(id, false).unwrap();
        assert!(!widgets.is_enabled(id));
        assert!(!widgets.is_focusable(id));
    }

    #[test]
    fn test_request_focus_without_handler_fails() {
        let mut widgets = WidgetRegistry::new();
        let id = widgets.create(Plain);
        assert_eq!(
            widgets.request_focus(id),
            Err(GuiError::NoFocusHandler(id))
        );
        assert_eq!(
            widgets.request_modal_focus(id),
            Err(GuiError::NoFocusHandler(id))
        );
        assert!(widgets.release_modal_focus(id).is_ok());
    }

    #[test]
    fn test_request_focus_not_focusable_is_noop() {
        let (mut widgets, handler, id) = setup();
        widgets.set_focusable(id, false).unwrap();
        widgets.request_focus(id).unwrap();
        assert_eq!(widgets.focus_handler(handler).unwrap().focused(), None);
    }

    #[test]
    fn test_hiding_focused_widget_clears_focus() {
        let (mut widgets, handler, id) = setup();
        let log = shared(Log::default());
        widgets.base_mut(id).unwrap().add_focus_listener(log.clone());

        widgets.request_focus(id).unwrap();
        widgets.request_focus(id).unwrap();
        assert!(widgets.is_focused(id));

        widgets.set_visible(id, false).unwrap();
        assert_eq!(widgets.focus_handler(handler).unwrap().focused(), None);
        assert_eq!(log.lock().0, vec!["gained", "lost"]);
    }

    #[test]
    fn test_detach_releases_modal_focus() {
        let (mut widgets, handler, id) = setup();
        widgets.request_modal_focus(id).unwrap();
        widgets.request_modal_mouse_input_focus(id).unwrap();
        widgets.set_focus_handler(id, None).unwrap();

        let h = widgets.focus_handler(handler).unwrap();
        assert_eq!(h.modal_focused(), None);
        assert_eq!(h.modal_mouse_input_focused(), None);
    }

    // =========================================================================
    // Fonts
    // =========================================================================

    #[test]
    fn test_global_font_reaches_widgets_without_own_font() {
        let mut widgets = WidgetRegistry::new();
        let watcher = shared(FontWatcher::default());
        let a = widgets.insert(watcher.clone(), WidgetKind::Leaf);
        let own = widgets.create(FontWatcher::default());
        let own_font: Arc<dyn Font> = Arc::new(FixedWidthFont::new(6, 10));
        widgets.set_font(own, Some(own_font.clone())).unwrap();

        let global: Arc<dyn Font> = Arc::new(FixedWidthFont::new(8, 12));
        widgets.set_global_font(Some(global));

        assert_eq!(watcher.lock().changes, 1);
        assert_eq!(widgets.font(a).map(|f| f.height()), Some(12));
        assert_eq!(widgets.font(own).map(|f| f.height()), Some(10));
    }
}
