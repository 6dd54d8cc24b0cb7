//! Tests for focus handling and key dispatch through the Gui.

use std::sync::Arc;

use guichan::graphics::{DrawCommand, Graphics, RecordingGraphics};
use guichan::input::GenericInput;
use guichan::widget::{
    FocusEvent, FocusListener, Key, KeyEvent, KeyListener, KeyModifiers, Widget, WidgetBase,
    WidgetRegistry, shared,
};
use guichan::widgets::Container;
use guichan::{Gui, GuiError, Rectangle, WidgetId};
use parking_lot::Mutex;

type Log = Arc<Mutex<Vec<String>>>;

struct Plain;

impl Widget for Plain {
    fn draw(&mut self, _base: &WidgetBase, _graphics: &mut dyn Graphics) {}
}

/// Logs key and focus events as `name:kind`.
struct Recorder {
    name: &'static str,
    log: Log,
    consume: bool,
}

impl Recorder {
    fn attach(widgets: &mut WidgetRegistry, id: WidgetId, name: &'static str, log: &Log) {
        Self::attach_with(widgets, id, name, log, false);
    }

    fn attach_with(
        widgets: &mut WidgetRegistry,
        id: WidgetId,
        name: &'static str,
        log: &Log,
        consume: bool,
    ) {
        let recorder = shared(Recorder {
            name,
            log: log.clone(),
            consume,
        });
        let base = widgets.base_mut(id).unwrap();
        base.add_key_listener(recorder.clone());
        base.add_focus_listener(recorder);
    }

    fn record(&self, kind: &str) {
        self.log.lock().push(format!("{}:{}", self.name, kind));
    }
}

impl KeyListener for Recorder {
    fn key_pressed(&mut self, event: &mut KeyEvent, _widgets: &mut WidgetRegistry) {
        self.record("key_pressed");
        if self.consume {
            event.consume();
        }
    }

    fn key_released(&mut self, _event: &mut KeyEvent, _widgets: &mut WidgetRegistry) {
        self.record("key_released");
    }
}

impl FocusListener for Recorder {
    fn focus_gained(&mut self, _event: &FocusEvent, _widgets: &mut WidgetRegistry) {
        self.record("gained");
    }

    fn focus_lost(&mut self, _event: &FocusEvent, _widgets: &mut WidgetRegistry) {
        self.record("lost");
    }
}

struct Fixture {
    gui: Gui,
    input: Arc<Mutex<GenericInput>>,
    top: WidgetId,
    /// Three focusable leaves laid out left to right.
    leaves: [WidgetId; 3],
}

fn setup() -> Fixture {
    let mut gui = Gui::new();
    let top = gui
        .widgets_mut()
        .create_container(Container::new().with_opaque(false));
    gui.widgets_mut().set_size(top, 300, 100).unwrap();

    let mut leaves = [WidgetId::default(); 3];
    for (i, slot) in leaves.iter_mut().enumerate() {
        let leaf = gui.widgets_mut().create(Plain);
        gui.widgets_mut()
            .set_dimension(leaf, Rectangle::new(i as i32 * 100, 0, 50, 50))
            .unwrap();
        gui.widgets_mut().set_focusable(leaf, true).unwrap();
        gui.widgets_mut().add(top, leaf).unwrap();
        *slot = leaf;
    }

    gui.set_top(Some(top)).unwrap();
    let input = shared(GenericInput::new());
    gui.set_input(Some(input.clone()));
    Fixture {
        gui,
        input,
        top,
        leaves,
    }
}

fn focused(gui: &Gui) -> Option<WidgetId> {
    gui.focus_handler().unwrap().focused()
}

// =========================================================================
// Focus
// =========================================================================

#[test]
fn test_focus_next_cycles_and_wraps() {
    let Fixture {
        mut gui, leaves, ..
    } = setup();
    let handler = gui.focus_handler_id();

    gui.widgets_mut().focus_next(handler).unwrap();
    assert_eq!(focused(&gui), Some(leaves[0]));
    gui.widgets_mut().focus_next(handler).unwrap();
    assert_eq!(focused(&gui), Some(leaves[1]));
    gui.widgets_mut().focus_next(handler).unwrap();
    assert_eq!(focused(&gui), Some(leaves[2]));
    gui.widgets_mut().focus_next(handler).unwrap();
    assert_eq!(focused(&gui), Some(leaves[0]));

    gui.widgets_mut().focus_previous(handler).unwrap();
    assert_eq!(focused(&gui), Some(leaves[2]));
}

#[test]
fn test_focus_next_skips_unfocusable() {
    let Fixture {
        mut gui, leaves, ..
    } = setup();
    let handler = gui.focus_handler_id();
    gui.widgets_mut().set_focusable(leaves[1], false).unwrap();

    gui.widgets_mut().request_focus(leaves[0]).unwrap();
    gui.widgets_mut().focus_next(handler).unwrap();
    assert_eq!(focused(&gui), Some(leaves[2]));
}

#[test]
fn test_request_focus_notifies_old_then_new() {
    let Fixture {
        mut gui, leaves, ..
    } = setup();
    let log = Log::default();
    Recorder::attach(gui.widgets_mut(), leaves[0], "a", &log);
    Recorder::attach(gui.widgets_mut(), leaves[1], "b", &log);

    gui.widgets_mut().request_focus(leaves[0]).unwrap();
    gui.widgets_mut().request_focus(leaves[1]).unwrap();
    // Requesting focus for the holder again is silent.
    gui.widgets_mut().request_focus(leaves[1]).unwrap();

    assert_eq!(*log.lock(), vec!["a:gained", "a:lost", "b:gained"]);
}

#[test]
fn test_removing_focused_widget_sends_no_focus_lost() {
    let Fixture {
        mut gui,
        top,
        leaves,
        ..
    } = setup();
    let log = Log::default();
    Recorder::attach(gui.widgets_mut(), leaves[0], "a", &log);

    gui.widgets_mut().request_focus(leaves[0]).unwrap();
    gui.widgets_mut().remove(top, leaves[0]).unwrap();

    assert_eq!(focused(&gui), None);
    assert_eq!(*log.lock(), vec!["a:gained"]);
    assert!(gui.widgets().contains(leaves[0]));
    assert_eq!(
        gui.widgets_mut().request_focus(leaves[0]),
        Err(GuiError::NoFocusHandler(leaves[0]))
    );
}

#[test]
fn test_add_then_remove_restores_tree() {
    let Fixture { mut gui, top, .. } = setup();
    let extra = gui.widgets_mut().create(Plain);
    let before = gui.widgets().children(top).unwrap();

    gui.widgets_mut().add(top, extra).unwrap();
    assert_eq!(gui.widgets().parent(extra), Some(top));
    assert!(gui.focus_handler().unwrap().contains(extra));

    gui.widgets_mut().remove(top, extra).unwrap();
    assert_eq!(gui.widgets().children(top).unwrap(), before);
    assert_eq!(gui.widgets().parent(extra), None);
    assert!(!gui.focus_handler().unwrap().contains(extra));
}

#[test]
fn test_modal_focus_blocks_siblings() {
    let Fixture {
        mut gui, leaves, ..
    } = setup();
    gui.widgets_mut().request_modal_focus(leaves[0]).unwrap();

    gui.widgets_mut().request_focus(leaves[1]).unwrap();
    assert_eq!(focused(&gui), None);

    gui.widgets_mut().request_focus(leaves[0]).unwrap();
    assert_eq!(focused(&gui), Some(leaves[0]));

    assert_eq!(
        gui.widgets_mut().request_modal_focus(leaves[1]),
        Err(GuiError::ModalFocusTaken { holder: leaves[0] })
    );
    // Idempotent for the holder.
    assert_eq!(gui.widgets_mut().request_modal_focus(leaves[0]), Ok(()));

    gui.widgets_mut().release_modal_focus(leaves[0]).unwrap();
    gui.widgets_mut().request_focus(leaves[1]).unwrap();
    assert_eq!(focused(&gui), Some(leaves[1]));
}

#[test]
fn test_modal_focus_clears_focus_outside_scope() {
    let Fixture {
        mut gui, leaves, ..
    } = setup();
    gui.widgets_mut().request_focus(leaves[2]).unwrap();
    gui.widgets_mut().request_modal_focus(leaves[0]).unwrap();
    assert_eq!(focused(&gui), None);
}

#[test]
fn test_modal_mouse_input_focus_conflict() {
    let Fixture {
        mut gui, leaves, ..
    } = setup();
    gui.widgets_mut()
        .request_modal_mouse_input_focus(leaves[0])
        .unwrap();
    assert_eq!(
        gui.widgets_mut().request_modal_mouse_input_focus(leaves[1]),
        Err(GuiError::ModalMouseInputFocusTaken { holder: leaves[0] })
    );
}

// =========================================================================
// Keys
// =========================================================================

#[test]
fn test_key_goes_to_focused_widget_and_bubbles() {
    let Fixture {
        mut gui,
        input,
        top,
        leaves,
    } = setup();
    let log = Log::default();
    Recorder::attach(gui.widgets_mut(), leaves[0], "a", &log);
    Recorder::attach(gui.widgets_mut(), top, "top", &log);
    gui.widgets_mut().request_focus(leaves[0]).unwrap();
    log.lock().clear();

    {
        let mut input = input.lock();
        input.push_key_pressed(Key::from_char('x'));
        input.push_key_released(Key::from_char('x'));
    }
    gui.logic().unwrap();

    assert_eq!(
        *log.lock(),
        vec!["a:key_pressed", "top:key_pressed", "a:key_released", "top:key_released"]
    );
}

#[test]
fn test_consumed_key_stops_bubbling() {
    let Fixture {
        mut gui,
        input,
        top,
        leaves,
    } = setup();
    let log = Log::default();
    Recorder::attach_with(gui.widgets_mut(), leaves[0], "a", &log, true);
    Recorder::attach(gui.widgets_mut(), top, "top", &log);
    gui.widgets_mut().request_focus(leaves[0]).unwrap();
    log.lock().clear();

    input.lock().push_key_pressed(Key::from_char('x'));
    gui.logic().unwrap();

    assert_eq!(*log.lock(), vec!["a:key_pressed"]);
}

#[test]
fn test_global_key_listener_consumes_first() {
    let Fixture {
        mut gui,
        input,
        leaves,
        ..
    } = setup();
    let log = Log::default();
    Recorder::attach(gui.widgets_mut(), leaves[0], "a", &log);
    gui.widgets_mut().request_focus(leaves[0]).unwrap();
    log.lock().clear();

    let global = shared(Recorder {
        name: "global",
        log: log.clone(),
        consume: true,
    });
    gui.add_global_key_listener(global.clone());

    input.lock().push_key_pressed(Key::from_char('x'));
    gui.logic().unwrap();
    assert_eq!(*log.lock(), vec!["global:key_pressed"]);

    let global: guichan::widget::SharedKeyListener = global;
    gui.remove_global_key_listener(&global);
    log.lock().clear();
    input.lock().push_key_pressed(Key::from_char('x'));
    gui.logic().unwrap();
    assert_eq!(*log.lock(), vec!["a:key_pressed"]);
}

#[test]
fn test_tab_moves_focus_both_ways() {
    let Fixture {
        mut gui,
        input,
        leaves,
        ..
    } = setup();
    gui.widgets_mut().request_focus(leaves[0]).unwrap();

    input.lock().push_key_pressed(Key::TAB);
    gui.logic().unwrap();
    assert_eq!(focused(&gui), Some(leaves[1]));

    {
        let mut input = input.lock();
        input.set_modifiers(KeyModifiers::SHIFT);
        input.push_key_pressed(Key::TAB);
        input.push_key_pressed(Key::TAB);
    }
    gui.logic().unwrap();
    assert_eq!(focused(&gui), Some(leaves[2]));
}

#[test]
fn test_tab_ignored_when_disabled_or_consumed() {
    let Fixture {
        mut gui,
        input,
        leaves,
        ..
    } = setup();
    let log = Log::default();
    Recorder::attach_with(gui.widgets_mut(), leaves[0], "a", &log, true);
    gui.widgets_mut().request_focus(leaves[0]).unwrap();

    input.lock().push_key_pressed(Key::TAB);
    gui.logic().unwrap();
    assert_eq!(focused(&gui), Some(leaves[0]));

    gui.set_tabbing_enabled(false);
    gui.widgets_mut().request_focus(leaves[1]).unwrap();
    input.lock().push_key_pressed(Key::TAB);
    gui.logic().unwrap();
    assert_eq!(focused(&gui), Some(leaves[1]));
}

#[test]
fn test_tab_out_disabled_keeps_focus() {
    let Fixture {
        mut gui,
        input,
        leaves,
        ..
    } = setup();
    gui.widgets_mut()
        .base_mut(leaves[0])
        .unwrap()
        .set_tab_out_enabled(false);
    gui.widgets_mut().request_focus(leaves[0]).unwrap();

    input.lock().push_key_pressed(Key::TAB);
    gui.logic().unwrap();
    assert_eq!(focused(&gui), Some(leaves[0]));
}

// =========================================================================
// Drawing
// =========================================================================

#[test]
fn test_draw_balances_clip_stack() {
    let Fixture { mut gui, top, .. } = setup();
    let inner = Container::create(gui.widgets_mut());
    gui.widgets_mut()
        .set_dimension(inner, Rectangle::new(10, 60, 40, 30))
        .unwrap();
    gui.widgets_mut().base_mut(inner).unwrap().set_frame_size(2);
    gui.widgets_mut().add(top, inner).unwrap();

    let graphics = shared(RecordingGraphics::new());
    gui.set_graphics(Some(graphics.clone()));
    gui.draw().unwrap();

    let graphics = graphics.lock();
    let commands = graphics.commands();
    let pushes = commands
        .iter()
        .filter(|c| matches!(c, DrawCommand::PushClip(_)))
        .count();
    let pops = commands
        .iter()
        .filter(|c| matches!(c, DrawCommand::PopClip))
        .count();
    assert_eq!(pushes, pops);
    assert_eq!(graphics.clip_depth(), 0);
    assert!(commands.contains(&DrawCommand::FillRectangle(Rectangle::new(10, 60, 40, 30))));
}
