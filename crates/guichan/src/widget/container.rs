//! Container operations.
//!
//! A container is a registry node with a child sequence, ordered back to
//! front. These operations live on [`WidgetRegistry`] because attaching a
//! child touches the child's parent link and focus handler as well as the
//! container.

use guichan_core::logging::targets;
use guichan_core::{FocusHandlerId, GuiError, Rectangle, Result, WidgetId, gcn_trace};

use super::registry::{Child, WidgetRegistry};
use crate::graphics::Graphics;

impl WidgetRegistry {
    // =========================================================================
    // Children
    // =========================================================================

    /// Add a borrowed child. Destroying the container detaches it.
    pub fn add(&mut self, container: WidgetId, widget: WidgetId) -> Result<()> {
        self.attach(container, widget, false)
    }

    /// Add an owned child. Destroying the container destroys it.
    pub fn add_owned(&mut self, container: WidgetId, widget: WidgetId) -> Result<()> {
        self.attach(container, widget, true)
    }

    /// Add a borrowed child at a position.
    pub fn add_at(&mut self, container: WidgetId, widget: WidgetId, x: i32, y: i32) -> Result<()> {
        self.attach(container, widget, false)?;
        self.set_position(widget, x, y)
    }

    fn attach(&mut self, container: WidgetId, widget: WidgetId, owned: bool) -> Result<()> {
        let cnode = self.node(container)?;
        if cnode.children.is_none() {
            return Err(GuiError::NotAContainer(container));
        }
        let handler = cnode
            .base
            .internal_focus_handler
            .or(cnode.base.focus_handler);

        if self.node(widget)?.base.parent.is_some() {
            return Err(GuiError::AlreadyInContainer(widget));
        }
        let mut ancestor = Some(container);
        while let Some(id) = ancestor {
            if id == widget {
                return Err(GuiError::CircularParentage(widget));
            }
            ancestor = self.parent(id);
        }

        if let Some(children) = self.node_mut(container)?.children.as_mut() {
            children.push(Child { id: widget, owned });
        }
        self.node_mut(widget)?.base.parent = Some(container);
        self.set_focus_handler(widget, handler)?;
        gcn_trace!(?container, ?widget, owned, "child added");
        Ok(())
    }

    /// Remove a child. The child survives, detached.
    pub fn remove(&mut self, container: WidgetId, widget: WidgetId) -> Result<()> {
        let children = self.children_mut(container)?;
        let index = children
            .iter()
            .position(|c| c.id == widget)
            .ok_or(GuiError::NotInContainer { container, widget })?;
        children.remove(index);
        self.detach(widget);
        gcn_trace!(?container, ?widget, "child removed");
        Ok(())
    }

    /// Detach every child without destroying any.
    pub fn clear_children(&mut self, container: WidgetId) -> Result<()> {
        let children = std::mem::take(self.children_mut(container)?);
        for child in children {
            self.detach(child.id);
        }
        Ok(())
    }

    /// Clear a child's parent link and focus handler.
    pub(crate) fn detach(&mut self, widget: WidgetId) {
        if let Some(node) = self.arena.get_mut(widget) {
            node.base.parent = None;
        }
        if self.set_focus_handler(widget, None).is_err() {
            tracing::warn!(target: targets::WIDGET, ?widget, "detached widget kept a stale focus handler");
        }
    }

    fn children_mut(&mut self, container: WidgetId) -> Result<&mut Vec<Child>> {
        self.node_mut(container)?
            .children
            .as_mut()
            .ok_or(GuiError::NotAContainer(container))
    }

    // =========================================================================
    // Z-order
    // =========================================================================

    /// Move a child to the front.
    pub fn move_to_top(&mut self, container: WidgetId, widget: WidgetId) -> Result<()> {
        let children = self.children_mut(container)?;
        let index = children
            .iter()
            .position(|c| c.id == widget)
            .ok_or(GuiError::NotInContainer { container, widget })?;
        let child = children.remove(index);
        children.push(child);
        Ok(())
    }

    /// Move a child to the back.
    pub fn move_to_bottom(&mut self, container: WidgetId, widget: WidgetId) -> Result<()> {
        let children = self.children_mut(container)?;
        let index = children
            .iter()
            .position(|c| c.id == widget)
            .ok_or(GuiError::NotInContainer { container, widget })?;
        let child = children.remove(index);
        children.insert(0, child);
        Ok(())
    }

    /// Ask the widget's parent to move it to the front. No-op without a
    /// parent.
    pub fn request_move_to_top(&mut self, widget: WidgetId) -> Result<()> {
        match self.node(widget)?.base.parent {
            Some(parent) => self.move_to_top(parent, widget),
            None => Ok(()),
        }
    }

    /// Ask the widget's parent to move it to the back. No-op without a
    /// parent.
    pub fn request_move_to_bottom(&mut self, widget: WidgetId) -> Result<()> {
        match self.node(widget)?.base.parent {
            Some(parent) => self.move_to_bottom(parent, widget),
            None => Ok(()),
        }
    }

    // =========================================================================
    // Focus within a container
    // =========================================================================

    /// Focus the next focusable child after the focused one, wrapping.
    pub fn container_focus_next(&mut self, container: WidgetId) -> Result<()> {
        self.container_cycle_focus(container, true)
    }

    /// Focus the previous focusable child before the focused one, wrapping.
    pub fn container_focus_previous(&mut self, container: WidgetId) -> Result<()> {
        self.container_cycle_focus(container, false)
    }

    fn container_cycle_focus(&mut self, container: WidgetId, forward: bool) -> Result<()> {
        let children = self.children(container)?;
        let len = children.len();
        if len == 0 {
            return Ok(());
        }

        let start = children.iter().position(|&c| self.is_focused(c));
        for step in 1..=len {
            let index = match (start, forward) {
                (Some(s), true) => (s + step) % len,
                (Some(s), false) => (s + len * 2 - step) % len,
                (None, true) => step - 1,
                (None, false) => len - step,
            };
            let candidate = children[index];
            if self.is_focusable(candidate) {
                return self.request_focus(candidate);
            }
        }
        Ok(())
    }

    /// Give the container a private focus handler for its descendants, or
    /// clear it so they share the container's own handler again.
    pub fn set_internal_focus_handler(
        &mut self,
        container: WidgetId,
        handler: Option<FocusHandlerId>,
    ) -> Result<()> {
        if let Some(h) = handler {
            self.focus_handler(h)?;
        }
        let node = self.node_mut(container)?;
        node.base.internal_focus_handler = handler;
        let effective = handler.or(node.base.focus_handler);

        for child in self.children(container)? {
            self.set_focus_handler(child, effective)?;
        }
        Ok(())
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Depth-first search of the container's descendants by name.
    pub fn find_widget_by_name(&self, container: WidgetId, name: &str) -> Option<WidgetId> {
        let children = self.arena.get(container)?.children.as_ref()?;
        for child in children {
            let Some(node) = self.arena.get(child.id) else {
                continue;
            };
            if node.base.name() == name {
                return Some(child.id);
            }
            if let Some(found) = self.find_widget_by_name(child.id, name) {
                return Some(found);
            }
        }
        None
    }

    /// The front-most visible child containing the point, given in the
    /// container's coordinates. `None` for leaves and points outside the
    /// children area.
    pub fn get_widget_at(&self, container: WidgetId, x: i32, y: i32) -> Option<WidgetId> {
        let children = self.arena.get(container)?.children.as_ref()?;
        let area = self.arena.children_area(container);
        if !area.is_point_in_rect(x, y) {
            return None;
        }
        let (x, y) = (x - area.x, y - area.y);

        children.iter().rev().map(|c| c.id).find(|&id| {
            self.arena
                .get(id)
                .is_some_and(|n| n.base.visible && n.base.dimension.is_point_in_rect(x, y))
        })
    }

    /// Move a child so that `area`, given in the child's coordinates, lies
    /// inside the container's children area.
    pub fn show_widget_part(
        &mut self,
        container: WidgetId,
        widget: WidgetId,
        area: Rectangle,
    ) -> Result<()> {
        if !self.children(container)?.contains(&widget) {
            return Err(GuiError::NotInContainer { container, widget });
        }
        let visible = self.arena.children_area(container);
        let child = self.dimension(widget)?;
        let area = area.translated(child.x, child.y);

        let mut x = child.x;
        let mut y = child.y;
        if area.x + area.width > visible.width {
            x -= area.x + area.width - visible.width;
        }
        if area.y + area.height > visible.height {
            y -= area.y + area.height - visible.height;
        }
        if area.x < 0 {
            x -= area.x;
        }
        if area.y < 0 {
            y -= area.y;
        }
        self.set_position(widget, x, y)
    }

    // =========================================================================
    // Drawing and logic
    // =========================================================================

    /// Draw a widget and its visible descendants.
    ///
    /// `graphics` must already be clipped to the widget's parent children
    /// area. Pushes a frame clip when the widget has a frame, then a clip
    /// for its dimension, and pops both.
    pub fn draw_tree(&self, id: WidgetId, graphics: &mut dyn Graphics) -> Result<()> {
        let node = self.node(id)?;
        let frame = node.base.frame_size() as i32;

        if frame > 0 {
            graphics.push_clip_area(node.base.dimension().expanded(frame));
            graphics.set_font(self.font(id));
            match node.behavior.try_lock() {
                Some(mut behavior) => behavior.draw_frame(&node.base, graphics),
                None => tracing::warn!(target: targets::GRAPHICS, ?id, "frame draw skipped, widget busy"),
            }
            graphics.pop_clip_area()?;
        }

        graphics.push_clip_area(node.base.dimension());
        graphics.set_font(self.font(id));
        match node.behavior.try_lock() {
            Some(mut behavior) => behavior.draw(&node.base, graphics),
            None => tracing::warn!(target: targets::GRAPHICS, ?id, "draw skipped, widget busy"),
        }
        if let Some(children) = &node.children {
            graphics.push_clip_area(self.arena.children_area(id));
            for child in children {
                if self.arena.get(child.id).is_some_and(|c| c.base.visible) {
                    self.draw_tree(child.id, graphics)?;
                }
            }
            graphics.pop_clip_area()?;
        }
        graphics.pop_clip_area()?;
        Ok(())
    }

    /// Run logic for a widget, then for its children.
    pub fn logic_tree(&mut self, id: WidgetId) {
        let Some(behavior) = self.arena.get(id).map(|n| n.behavior.clone()) else {
            return;
        };
        match behavior.try_lock() {
            Some(mut behavior) => behavior.logic(id, self),
            None => tracing::warn!(target: targets::WIDGET, ?id, "logic skipped, widget busy"),
        }

        for child in self.children(id).unwrap_or_default() {
            if self.contains(child) {
                self.logic_tree(child);
            }
        }
    }
}
