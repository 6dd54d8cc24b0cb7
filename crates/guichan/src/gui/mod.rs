//! The GUI façade.
//!
//! A [`Gui`] owns the [`WidgetRegistry`], one focus handler for the tree
//! rooted at its top widget, and the attached graphics sink and input
//! source. Each frame the embedding application calls [`Gui::logic`] to
//! drain input and dispatch events, then [`Gui::draw`] to render.
//!
//! # Example
//!
//! ```
//! use guichan::input::GenericInput;
//! use guichan::widget::{MouseButton, shared};
//! use guichan::widgets::Container;
//! use guichan::Gui;
//!
//! let mut gui = Gui::new();
//! let top = Container::create(gui.widgets_mut());
//! gui.widgets_mut().set_size(top, 320, 240).unwrap();
//! gui.set_top(Some(top)).unwrap();
//!
//! let input = shared(GenericInput::new());
//! gui.set_input(Some(input.clone()));
//! input.lock().push_mouse_button_pressed(5, 5, MouseButton::Left);
//!
//! gui.logic().unwrap();
//! assert!(input.lock().dequeue_mouse_input().is_err());
//! # use guichan::input::Input;
//! ```

mod keyboard;
mod mouse;

use std::collections::VecDeque;
use std::sync::Arc;

use guichan_core::logging::span_names;
use guichan_core::{FocusHandlerId, GuiError, PerfSpan, Result, WidgetId, gcn_debug};
use parking_lot::Mutex;

use crate::config::GuiConfig;
use crate::graphics::Graphics;
use crate::input::SharedInput;
use crate::widget::{
    FocusHandler, KeyModifiers, MouseButton, SharedKeyListener, WidgetRegistry,
};

/// Shared handle to a graphics sink.
pub type SharedGraphics = Arc<Mutex<dyn Graphics + Send>>;

/// The top-level GUI object.
pub struct Gui {
    widgets: WidgetRegistry,
    focus_handler: FocusHandlerId,
    top: Option<WidgetId>,
    graphics: Option<SharedGraphics>,
    input: Option<SharedInput>,
    config: GuiConfig,
    key_listeners: Vec<SharedKeyListener>,

    modifiers: KeyModifiers,
    last_mouse_x: i32,
    last_mouse_y: i32,
    click_count: u32,
    last_mouse_press_button: MouseButton,
    last_mouse_press_timestamp: u64,
    last_mouse_drag_button: MouseButton,
    /// Widgets the mouse is currently over, innermost first.
    widgets_with_mouse: VecDeque<WidgetId>,
}

impl Default for Gui {
    fn default() -> Self {
        Self::new()
    }
}

impl Gui {
    /// Create a GUI with an empty registry and default configuration.
    pub fn new() -> Self {
        Self::with_registry(WidgetRegistry::new(), GuiConfig::default())
    }

    /// Create a GUI with the given configuration.
    pub fn with_config(config: GuiConfig) -> Self {
        Self::with_registry(WidgetRegistry::new(), config)
    }

    /// Create a GUI around an existing registry.
    pub fn with_registry(mut widgets: WidgetRegistry, config: GuiConfig) -> Self {
        let focus_handler = widgets.create_focus_handler();
        Self {
            widgets,
            focus_handler,
            top: None,
            graphics: None,
            input: None,
            config,
            key_listeners: Vec::new(),
            modifiers: KeyModifiers::NONE,
            last_mouse_x: 0,
            last_mouse_y: 0,
            click_count: 1,
            last_mouse_press_button: MouseButton::Empty,
            last_mouse_press_timestamp: 0,
            last_mouse_drag_button: MouseButton::Empty,
            widgets_with_mouse: VecDeque::new(),
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn widgets(&self) -> &WidgetRegistry {
        &self.widgets
    }

    pub fn widgets_mut(&mut self) -> &mut WidgetRegistry {
        &mut self.widgets
    }

    /// The focus handler of the top widget's tree.
    pub fn focus_handler_id(&self) -> FocusHandlerId {
        self.focus_handler
    }

    /// The focus handler of the top widget's tree.
    pub fn focus_handler(&self) -> Result<&FocusHandler> {
        self.widgets.focus_handler(self.focus_handler)
    }

    pub fn config(&self) -> &GuiConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: GuiConfig) {
        self.config = config;
    }

    /// Set the root of the widget tree. The previous top widget and its
    /// descendants are detached from the focus handler.
    pub fn set_top(&mut self, top: Option<WidgetId>) -> Result<()> {
        if let Some(new) = top {
            self.widgets.base(new)?;
        }
        if let Some(old) = self.top.take() {
            if self.widgets.contains(old) {
                self.widgets.set_focus_handler(old, None)?;
            }
        }
        if let Some(new) = top {
            self.widgets.set_focus_handler(new, Some(self.focus_handler))?;
        }
        self.top = top;
        gcn_debug!(?top, "top widget set");
        Ok(())
    }

    pub fn top(&self) -> Option<WidgetId> {
        self.top
    }

    pub fn set_graphics(&mut self, graphics: Option<SharedGraphics>) {
        self.graphics = graphics;
    }

    pub fn graphics(&self) -> Option<SharedGraphics> {
        self.graphics.clone()
    }

    pub fn set_input(&mut self, input: Option<SharedInput>) {
        self.input = input;
    }

    pub fn input(&self) -> Option<SharedInput> {
        self.input.clone()
    }

    /// Whether an unconsumed Tab press moves focus.
    pub fn set_tabbing_enabled(&mut self, enabled: bool) {
        self.config.tabbing_enabled = enabled;
    }

    pub fn is_tabbing_enabled(&self) -> bool {
        self.config.tabbing_enabled
    }

    /// Listen to every key event before the focused widget sees it.
    pub fn add_global_key_listener(&mut self, listener: SharedKeyListener) {
        self.key_listeners.push(listener);
    }

    pub fn remove_global_key_listener(&mut self, listener: &SharedKeyListener) {
        self.key_listeners.retain(|l| !Arc::ptr_eq(l, listener));
    }

    /// Clear focus in the top widget's tree.
    pub fn focus_none(&mut self) -> Result<()> {
        self.widgets.focus_none(self.focus_handler)
    }

    // =========================================================================
    // Frame cycle
    // =========================================================================

    fn live_top(&self) -> Result<WidgetId> {
        let top = self.top.ok_or(GuiError::NoTopWidget)?;
        if !self.widgets.contains(top) {
            return Err(GuiError::InvalidWidget(top));
        }
        Ok(top)
    }

    /// Run one logic pass: resolve modal focus changes, drain input, then
    /// run widget logic down the tree.
    pub fn logic(&mut self) -> Result<()> {
        let _span = PerfSpan::new(span_names::LOGIC);
        self.live_top()?;

        self.handle_modal_focus()?;
        self.handle_modal_mouse_input_focus()?;

        if let Some(input) = self.input.clone() {
            input.lock().poll_input();
            self.handle_key_input(&input)?;
            self.handle_mouse_input(&input)?;
        }

        // Listeners may have destroyed the top widget.
        if let Ok(top) = self.live_top() {
            self.widgets.logic_tree(top);
        }
        Ok(())
    }

    /// Draw the tree. Skipped when the top widget is invisible.
    pub fn draw(&mut self) -> Result<()> {
        let _span = PerfSpan::new(span_names::DRAW);
        let top = self.live_top()?;
        let graphics = self.graphics.clone().ok_or(GuiError::NoGraphics)?;
        if !self.widgets.is_visible(top) {
            return Ok(());
        }

        let mut graphics = graphics.lock();
        let expected = graphics.clip_depth();
        graphics.begin_draw();
        let drawn = self.widgets.draw_tree(top, &mut *graphics);
        graphics.end_draw();
        drawn?;

        let actual = graphics.clip_depth();
        if actual != expected {
            return Err(GuiError::UnbalancedClipStack { expected, actual });
        }
        Ok(())
    }

    // =========================================================================
    // Focus handler queries
    // =========================================================================

    fn handler(&self) -> Option<&FocusHandler> {
        self.widgets.handlers.get(self.focus_handler)
    }

    fn handler_mut(&mut self) -> Option<&mut FocusHandler> {
        self.widgets.handlers.get_mut(self.focus_handler)
    }

    fn focused(&self) -> Option<WidgetId> {
        self.handler().and_then(|h| h.focused())
    }

    fn modal_focused(&self) -> Option<WidgetId> {
        self.handler().and_then(|h| h.modal_focused())
    }

    fn modal_mouse_input_focused(&self) -> Option<WidgetId> {
        self.handler().and_then(|h| h.modal_mouse_input_focused())
    }

    fn dragged(&self) -> Option<WidgetId> {
        self.handler().and_then(|h| h.dragged())
    }

    fn is_modal_focused(&self, widget: WidgetId) -> bool {
        self.handler()
            .is_some_and(|h| h.is_modal_focused(&self.widgets.arena, widget))
    }

    fn is_modal_mouse_input_focused(&self, widget: WidgetId) -> bool {
        self.handler()
            .is_some_and(|h| h.is_modal_mouse_input_focused(&self.widgets.arena, widget))
    }

    /// The widget at a screen position: the deepest widget found by
    /// descending from the top widget. The top widget itself when no child
    /// contains the point.
    pub fn get_widget_at(&self, x: i32, y: i32) -> Result<WidgetId> {
        let mut parent = self.live_top()?;
        loop {
            let (px, py) = self.widgets.absolute_position(parent)?;
            match self.widgets.get_widget_at(parent, x - px, y - py) {
                Some(child) => parent = child,
                None => return Ok(parent),
            }
        }
    }
}

impl Drop for Gui {
    fn drop(&mut self) {
        self.widgets.clear();
    }
}

impl std::fmt::Debug for Gui {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Gui")
            .field("top", &self.top)
            .field("widgets", &self.widgets.len())
            .field("config", &self.config)
            .field("widgets_with_mouse", &self.widgets_with_mouse)
            .finish_non_exhaustive()
    }
}
