//! Widget base state.
//!
//! [`WidgetBase`] is the state every widget in the registry carries: geometry,
//! flags, colors, tree links and listener lists. Widget implementations see it
//! read-only while drawing; mutations that have side effects (geometry,
//! visibility, focus) go through [`WidgetRegistry`](super::WidgetRegistry) so
//! that listeners and the focus handler stay consistent.

use std::sync::Arc;

use guichan_core::{FocusHandlerId, Rectangle, WidgetId};

use super::listeners::{
    SharedActionListener, SharedDeathListener, SharedFocusListener, SharedKeyListener,
    SharedMouseListener, SharedWidgetListener, remove_listener,
};
use crate::graphics::{Color, Font};

/// The base state for all widgets.
pub struct WidgetBase {
    id: WidgetId,

    /// Position relative to the parent's children area, and size.
    pub(crate) dimension: Rectangle,
    pub(crate) frame_size: u32,

    pub(crate) focusable: bool,
    pub(crate) visible: bool,
    pub(crate) enabled: bool,
    tab_in: bool,
    tab_out: bool,

    name: String,
    action_event_id: String,

    base_color: Color,
    foreground_color: Color,
    background_color: Color,
    selection_color: Color,
    pub(crate) font: Option<Arc<dyn Font>>,

    pub(crate) parent: Option<WidgetId>,
    pub(crate) focus_handler: Option<FocusHandlerId>,
    pub(crate) internal_focus_handler: Option<FocusHandlerId>,

    pub(crate) mouse_listeners: Vec<SharedMouseListener>,
    pub(crate) key_listeners: Vec<SharedKeyListener>,
    pub(crate) focus_listeners: Vec<SharedFocusListener>,
    pub(crate) action_listeners: Vec<SharedActionListener>,
    pub(crate) death_listeners: Vec<SharedDeathListener>,
    pub(crate) widget_listeners: Vec<SharedWidgetListener>,
}

impl WidgetBase {
    pub(crate) fn new(id: WidgetId) -> Self {
        Self {
            id,
            dimension: Rectangle::default(),
            frame_size: 0,
            focusable: false,
            visible: true,
            enabled: true,
            tab_in: true,
            tab_out: true,
            name: String::new(),
            action_event_id: String::new(),
            base_color: Color::from_hex(0x808090),
            foreground_color: Color::from_hex(0x000000),
            background_color: Color::from_hex(0xffffff),
            selection_color: Color::from_hex(0xc3d9ff),
            font: None,
            parent: None,
            focus_handler: None,
            internal_focus_handler: None,
            mouse_listeners: Vec::new(),
            key_listeners: Vec::new(),
            focus_listeners: Vec::new(),
            action_listeners: Vec::new(),
            death_listeners: Vec::new(),
            widget_listeners: Vec::new(),
        }
    }

    // =========================================================================
    // Identity and tree links
    // =========================================================================

    /// The widget's handle.
    #[inline]
    pub fn id(&self) -> WidgetId {
        self.id
    }

    /// The parent container, if attached.
    #[inline]
    pub fn parent(&self) -> Option<WidgetId> {
        self.parent
    }

    /// The focus handler the widget is registered with.
    #[inline]
    pub fn focus_handler(&self) -> Option<FocusHandlerId> {
        self.focus_handler
    }

    /// The private focus handler children are registered with, if any.
    #[inline]
    pub fn internal_focus_handler(&self) -> Option<FocusHandlerId> {
        self.internal_focus_handler
    }

    /// The string name used by `find_widget_by_name`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Set the string name.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// The id carried by action events this widget fires.
    pub fn action_event_id(&self) -> &str {
        &self.action_event_id
    }

    /// Set the id carried by action events.
    pub fn set_action_event_id(&mut self, id: impl Into<String>) {
        self.action_event_id = id.into();
    }

    // =========================================================================
    // Geometry
    // =========================================================================

    /// Position relative to the parent's children area, and size.
    #[inline]
    pub fn dimension(&self) -> Rectangle {
        self.dimension
    }

    #[inline]
    pub fn x(&self) -> i32 {
        self.dimension.x
    }

    #[inline]
    pub fn y(&self) -> i32 {
        self.dimension.y
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.dimension.width
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.dimension.height
    }

    /// Width of the frame drawn around the widget, outside its dimension.
    #[inline]
    pub fn frame_size(&self) -> u32 {
        self.frame_size
    }

    /// Set the frame width.
    pub fn set_frame_size(&mut self, frame_size: u32) {
        self.frame_size = frame_size;
    }

    // =========================================================================
    // Own flags
    // =========================================================================
    //
    // These are the widget's own flags. Effective visibility and enabled
    // state also depend on the ancestors; query those through the registry.

    #[inline]
    pub fn is_focusable_flag(&self) -> bool {
        self.focusable
    }

    #[inline]
    pub fn is_visible_flag(&self) -> bool {
        self.visible
    }

    #[inline]
    pub fn is_enabled_flag(&self) -> bool {
        self.enabled
    }

    /// Whether tabbing may move focus into this widget.
    #[inline]
    pub fn is_tab_in_enabled(&self) -> bool {
        self.tab_in
    }

    pub fn set_tab_in_enabled(&mut self, enabled: bool) {
        self.tab_in = enabled;
    }

    /// Whether tabbing may move focus away from this widget.
    #[inline]
    pub fn is_tab_out_enabled(&self) -> bool {
        self.tab_out
    }

    pub fn set_tab_out_enabled(&mut self, enabled: bool) {
        self.tab_out = enabled;
    }

    // =========================================================================
    // Colors and font
    // =========================================================================

    pub fn base_color(&self) -> Color {
        self.base_color
    }

    pub fn set_base_color(&mut self, color: Color) {
        self.base_color = color;
    }

    pub fn foreground_color(&self) -> Color {
        self.foreground_color
    }

    pub fn set_foreground_color(&mut self, color: Color) {
        self.foreground_color = color;
    }

    pub fn background_color(&self) -> Color {
        self.background_color
    }

    pub fn set_background_color(&mut self, color: Color) {
        self.background_color = color;
    }

    pub fn selection_color(&self) -> Color {
        self.selection_color
    }

    pub fn set_selection_color(&mut self, color: Color) {
        self.selection_color = color;
    }

    /// The widget's own font, ignoring the global font.
    pub fn own_font(&self) -> Option<&Arc<dyn Font>> {
        self.font.as_ref()
    }

    // =========================================================================
    // Listeners
    // =========================================================================

    pub fn add_mouse_listener(&mut self, listener: SharedMouseListener) {
        self.mouse_listeners.push(listener);
    }

    pub fn remove_mouse_listener(&mut self, listener: &SharedMouseListener) {
        remove_listener(&mut self.mouse_listeners, listener);
    }

    pub fn add_key_listener(&mut self, listener: SharedKeyListener) {
        self.key_listeners.push(listener);
    }

    pub fn remove_key_listener(&mut self, listener: &SharedKeyListener) {
        remove_listener(&mut self.key_listeners, listener);
    }

    pub fn add_focus_listener(&mut self, listener: SharedFocusListener) {
        self.focus_listeners.push(listener);
    }

    pub fn remove_focus_listener(&mut self, listener: &SharedFocusListener) {
        remove_listener(&mut self.focus_listeners, listener);
    }

    pub fn add_action_listener(&mut self, listener: SharedActionListener) {
        self.action_listeners.push(listener);
    }

    pub fn remove_action_listener(&mut self, listener: &SharedActionListener) {
        remove_listener(&mut self.action_listeners, listener);
    }

    pub fn add_death_listener(&mut self, listener: SharedDeathListener) {
        self.death_listeners.push(listener);
    }

    pub fn remove_death_listener(&mut self, listener: &SharedDeathListener) {
        remove_listener(&mut self.death_listeners, listener);
    }

    pub fn add_widget_listener(&mut self, listener: SharedWidgetListener) {
        self.widget_listeners.push(listener);
    }

    pub fn remove_widget_listener(&mut self, listener: &SharedWidgetListener) {
        remove_listener(&mut self.widget_listeners, listener);
    }
}

impl std::fmt::Debug for WidgetBase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WidgetBase")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("dimension", &self.dimension)
            .field("visible", &self.visible)
            .field("enabled", &self.enabled)
            .field("focusable", &self.focusable)
            .field("parent", &self.parent)
            .finish_non_exhaustive()
    }
}
