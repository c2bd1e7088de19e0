//! Selection observer
//!
//! Converts the noisy stream of raw selection-change and mouse events
//! into a single settled notification per gesture: "the user has a
//! stable text selection now, or none". Mouse drags suppress
//! notifications entirely until release; every other trigger re-arms a
//! debounce timer so bursts coalesce. When the timer fires, the
//! selection is read fresh from the document, word-snapped, and handed
//! to the consumer callback exactly once.
//!
//! The observer is driven explicitly: the host forwards raw events via
//! [`SelectionObserver::handle_event`] and pumps time via
//! [`SelectionObserver::poll`], keeping the whole machine synchronous
//! and deterministic under test.

pub mod snap;
pub mod timer;

use std::time::Duration;

use tracing::{debug, trace, warn};

use crate::config::ObserverConfig;
use crate::dom::{Document, DocumentRange, Selection};

use timer::DebounceTimer;

/// Raw input events the host forwards to the observer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionEvent {
    /// The document's selection changed (keyboard, touch handles,
    /// programmatic)
    SelectionChange,
    /// A mouse-driven selection gesture started
    MouseDown,
    /// The mouse-driven gesture ended
    MouseUp,
}

/// Externally visible observer state, for hosts and tests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObserverState {
    Idle,
    MouseDown,
    PendingNotify,
}

/// Consumer callback invoked once per settled selection state
pub type SelectionCallback = Box<dyn FnMut(Option<DocumentRange>)>;

/// Debounced, gesture-aware selection watcher
pub struct SelectionObserver {
    config: ObserverConfig,
    timer: DebounceTimer,
    mouse_down: bool,
    connected: bool,
    callback: SelectionCallback,
}

impl SelectionObserver {
    /// Create a connected observer reporting to `callback`
    pub fn new(config: ObserverConfig, callback: impl FnMut(Option<DocumentRange>) + 'static) -> Self {
        Self {
            config,
            timer: DebounceTimer::new(),
            mouse_down: false,
            connected: true,
            callback: Box::new(callback),
        }
    }

    /// Current machine state
    pub fn state(&self) -> ObserverState {
        if self.mouse_down {
            ObserverState::MouseDown
        } else if self.timer.is_armed() {
            ObserverState::PendingNotify
        } else {
            ObserverState::Idle
        }
    }

    /// Feed one raw input event at the given monotonic time
    pub fn handle_event(&mut self, event: SelectionEvent, now: Duration) {
        if !self.connected {
            return;
        }
        match event {
            SelectionEvent::MouseDown => {
                self.mouse_down = true;
                self.timer.cancel();
                trace!("mouse down; notifications suppressed");
            }
            SelectionEvent::MouseUp => {
                self.mouse_down = false;
                // browsers settle the selection one tick after mouse-up
                self.timer
                    .arm(now, Duration::from_millis(self.config.mouseup_delay_ms));
                trace!("mouse up; fast-path timer armed");
            }
            SelectionEvent::SelectionChange => {
                if self.mouse_down {
                    trace!("selection change during drag ignored");
                    return;
                }
                self.timer
                    .arm(now, Duration::from_millis(self.config.input_delay_ms));
                trace!("selection change; slow-path timer armed");
            }
        }
    }

    /// Pump the debounce timer; fires at most one notification
    ///
    /// The selection is read fresh from the document, never from a
    /// cached value. A read failure is reported as "no selection" for
    /// this cycle rather than corrupting the machine.
    pub fn poll(&mut self, doc: &mut Document, now: Duration) {
        if !self.connected || !self.timer.fire_if_due(now) {
            return;
        }
        let settled = self.read_settled_selection(doc);
        debug!(has_selection = settled.is_some(), "selection settled");
        (self.callback)(settled);
    }

    /// Disconnect the observer: pending notifications are discarded,
    /// never fired late, and further events are ignored
    pub fn disconnect(&mut self) {
        self.timer.cancel();
        self.connected = false;
        self.mouse_down = false;
        debug!("selection observer disconnected");
    }

    /// Whether the observer still accepts events
    pub fn is_connected(&self) -> bool {
        self.connected
    }

    fn read_settled_selection(&self, doc: &mut Document) -> Option<DocumentRange> {
        let selection = doc.selection()?.clone();
        if selection.is_collapsed(doc) {
            return None;
        }
        let snapped = match snap::snap_to_words(doc, &selection) {
            Ok(snapped) => snapped,
            Err(err) => {
                warn!(error = %err, "selection read failed; treating as no selection");
                return None;
            }
        };
        if snapped.is_collapsed(doc) {
            return None;
        }
        // write the snapped endpoints back so extension gestures
        // continue from the snapped boundaries
        doc.set_selection(Some(snapped.clone()));
        Some(snapped.to_range(doc))
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use crate::dom::{Anchor, NodeId};

    use super::*;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    fn text_doc(text: &str) -> (Document, NodeId) {
        let mut doc = Document::new("body");
        let p = doc.create_element("p");
        doc.append_child(doc.root(), p).unwrap();
        let t = doc.create_text(text);
        doc.append_child(p, t).unwrap();
        (doc, t)
    }

    fn recording_observer() -> (SelectionObserver, Rc<RefCell<Vec<Option<DocumentRange>>>>) {
        let seen: Rc<RefCell<Vec<Option<DocumentRange>>>> = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let observer = SelectionObserver::new(ObserverConfig::default(), move |settled| {
            sink.borrow_mut().push(settled);
        });
        (observer, seen)
    }

    #[test]
    fn test_burst_of_changes_coalesces_to_one_callback() {
        let (mut doc, t) = text_doc("Hello world");
        let (mut observer, seen) = recording_observer();

        for tick in 0..5usize {
            doc.set_selection(Some(Selection::new(
                Anchor::new(t, 0),
                Anchor::new(t, tick + 1),
            )));
            observer.handle_event(SelectionEvent::SelectionChange, ms(tick as u64 * 10));
            observer.poll(&mut doc, ms(tick as u64 * 10));
        }
        assert!(seen.borrow().is_empty());

        // last event at t=40ms; slow path fires 300ms later
        observer.poll(&mut doc, ms(340));

        let seen = seen.borrow();
        assert_eq!(seen.len(), 1);
        let range = seen[0].clone().unwrap();
        // selection as of the last event, word-snapped outward
        assert_eq!(range.start, Anchor::new(t, 0));
        assert_eq!(range.end, Anchor::new(t, 5));
    }

    #[test]
    fn test_mouse_drag_suppresses_notifications() {
        let (mut doc, t) = text_doc("Hello world");
        let (mut observer, seen) = recording_observer();

        observer.handle_event(SelectionEvent::MouseDown, ms(0));
        assert_eq!(observer.state(), ObserverState::MouseDown);

        for tick in 1..10usize {
            doc.set_selection(Some(Selection::new(
                Anchor::new(t, 0),
                Anchor::new(t, tick),
            )));
            observer.handle_event(SelectionEvent::SelectionChange, ms(tick as u64 * 100));
            observer.poll(&mut doc, ms(tick as u64 * 100));
        }
        assert!(seen.borrow().is_empty());

        observer.handle_event(SelectionEvent::MouseUp, ms(1000));
        assert_eq!(observer.state(), ObserverState::PendingNotify);
        observer.poll(&mut doc, ms(1050));

        let seen = seen.borrow();
        assert_eq!(seen.len(), 1);
        // reflects the selection at release time
        let range = seen[0].clone().unwrap();
        assert_eq!(range.end.offset, 11);
    }

    #[test]
    fn test_mousedown_cancels_pending_timer() {
        let (mut doc, t) = text_doc("Hello world");
        let (mut observer, seen) = recording_observer();
        doc.set_selection(Some(Selection::new(Anchor::new(t, 0), Anchor::new(t, 5))));

        observer.handle_event(SelectionEvent::SelectionChange, ms(0));
        observer.handle_event(SelectionEvent::MouseDown, ms(10));
        observer.poll(&mut doc, ms(400));

        assert!(seen.borrow().is_empty());
        assert_eq!(observer.state(), ObserverState::MouseDown);
    }

    #[test]
    fn test_collapsed_selection_reports_none() {
        let (mut doc, t) = text_doc("Hello world");
        let (mut observer, seen) = recording_observer();
        doc.set_selection(Some(Selection::caret(Anchor::new(t, 3))));

        observer.handle_event(SelectionEvent::SelectionChange, ms(0));
        observer.poll(&mut doc, ms(300));

        assert_eq!(seen.borrow().as_slice(), &[None]);
    }

    #[test]
    fn test_no_selection_reports_none() {
        let (mut doc, _) = text_doc("Hello world");
        let (mut observer, seen) = recording_observer();
        doc.set_selection(None);

        observer.handle_event(SelectionEvent::MouseUp, ms(0));
        observer.poll(&mut doc, ms(50));

        assert_eq!(seen.borrow().as_slice(), &[None]);
    }

    #[test]
    fn test_unreadable_selection_reports_none_and_recovers() {
        let (mut doc, t) = text_doc("Hi");
        let (mut observer, seen) = recording_observer();
        doc.set_selection(Some(Selection::new(Anchor::new(t, 0), Anchor::new(t, 99))));

        observer.handle_event(SelectionEvent::MouseUp, ms(0));
        observer.poll(&mut doc, ms(50));
        assert_eq!(seen.borrow().as_slice(), &[None]);

        // the machine is not stuck: a later valid selection reports
        doc.set_selection(Some(Selection::new(Anchor::new(t, 0), Anchor::new(t, 2))));
        observer.handle_event(SelectionEvent::MouseUp, ms(100));
        observer.poll(&mut doc, ms(150));
        assert_eq!(seen.borrow().len(), 2);
        assert!(seen.borrow()[1].is_some());
    }

    #[test]
    fn test_word_snap_writes_back_to_document() {
        let (mut doc, t) = text_doc("Hello world");
        let (mut observer, seen) = recording_observer();
        // backward drag over "llo " inside "Hello"
        doc.set_selection(Some(Selection::new(Anchor::new(t, 6), Anchor::new(t, 2))));

        observer.handle_event(SelectionEvent::MouseUp, ms(0));
        observer.poll(&mut doc, ms(50));

        let seen = seen.borrow();
        let range = seen[0].clone().unwrap();
        assert_eq!(range.start, Anchor::new(t, 0));
        assert_eq!(range.end, Anchor::new(t, 5));

        // direction survives snapping for later extension gestures
        let live = doc.selection().unwrap();
        assert_eq!(live.anchor, Anchor::new(t, 5));
        assert_eq!(live.focus, Anchor::new(t, 0));
    }

    #[test]
    fn test_fast_path_is_faster_than_slow_path() {
        let (mut doc, t) = text_doc("Hello world");
        let (mut observer, seen) = recording_observer();
        doc.set_selection(Some(Selection::new(Anchor::new(t, 0), Anchor::new(t, 5))));

        observer.handle_event(SelectionEvent::MouseUp, ms(0));
        observer.poll(&mut doc, ms(60));
        assert_eq!(seen.borrow().len(), 1);

        observer.handle_event(SelectionEvent::SelectionChange, ms(100));
        observer.poll(&mut doc, ms(160));
        // slow path has not elapsed yet
        assert_eq!(seen.borrow().len(), 1);
        observer.poll(&mut doc, ms(400));
        assert_eq!(seen.borrow().len(), 2);
    }

    #[test]
    fn test_disconnect_discards_pending_notification() {
        let (mut doc, t) = text_doc("Hello world");
        let (mut observer, seen) = recording_observer();
        doc.set_selection(Some(Selection::new(Anchor::new(t, 0), Anchor::new(t, 5))));

        observer.handle_event(SelectionEvent::SelectionChange, ms(0));
        observer.disconnect();
        observer.poll(&mut doc, ms(1000));
        observer.handle_event(SelectionEvent::SelectionChange, ms(1100));
        observer.poll(&mut doc, ms(2000));

        assert!(seen.borrow().is_empty());
        assert!(!observer.is_connected());
    }
}
