//! Stable handles for widgets and focus handlers.
//!
//! Widgets live in an arena owned by the widget registry. Everything else
//! (parents, focus handler slots, the queue of widgets under the mouse)
//! refers to them through a [`WidgetId`]. A handle whose widget was destroyed
//! is simply absent from the arena, so every lookup doubles as a liveness
//! check.

use slotmap::{Key, KeyData, new_key_type};

new_key_type! {
    /// A unique identifier for a widget in the registry.
    ///
    /// `WidgetId`s are generational: once the widget is destroyed the id is
    /// never handed out again, and lookups through it fail.
    pub struct WidgetId;

    /// A unique identifier for a focus handler in the registry.
    pub struct FocusHandlerId;
}

impl WidgetId {
    /// Convert the id to a raw u64 value.
    ///
    /// The raw value can be converted back using [`WidgetId::from_raw`].
    #[inline]
    pub fn as_raw(self) -> u64 {
        self.data().as_ffi()
    }

    /// Create a `WidgetId` from a raw u64 value.
    ///
    /// This does not check if the widget exists in any registry.
    #[inline]
    pub fn from_raw(raw: u64) -> Self {
        Self::from(KeyData::from_ffi(raw))
    }
}

impl FocusHandlerId {
    /// Convert the id to a raw u64 value.
    #[inline]
    pub fn as_raw(self) -> u64 {
        self.data().as_ffi()
    }

    /// Create a `FocusHandlerId` from a raw u64 value.
    #[inline]
    pub fn from_raw(raw: u64) -> Self {
        Self::from(KeyData::from_ffi(raw))
    }
}
