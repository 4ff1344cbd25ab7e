//! The session loop: channel input, synchronous rendering, idle hooks.

mod common;

use common::{RecordingRenderer, lines, open, with_captured_logs};
use core_render::{CursorHint, NoopRenderer, UpdateHint};
use core_state::{Action, IdleContext, IdleHook, Motion, SessionError, write_document};
use core_text::Position;
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

struct CountingHook(Rc<RefCell<u32>>);

impl IdleHook for CountingHook {
    fn name(&self) -> &'static str {
        "counting"
    }
    fn on_idle(&mut self, _ctx: &mut IdleContext<'_>) -> anyhow::Result<()> {
        *self.0.borrow_mut() += 1;
        Ok(())
    }
}

/// Writes the document into a shared buffer when dirty.
struct MemorySave(Rc<RefCell<Vec<u8>>>);

impl IdleHook for MemorySave {
    fn name(&self) -> &'static str {
        "memory_save"
    }
    fn on_idle(&mut self, ctx: &mut IdleContext<'_>) -> anyhow::Result<()> {
        if !ctx.dirty {
            return Ok(());
        }
        let mut out = Vec::new();
        write_document(ctx.store, &mut out)?;
        *self.0.borrow_mut() = out;
        ctx.mark_saved();
        Ok(())
    }
}

#[test]
fn renders_initial_frame_then_one_frame_per_action() {
    let mut s = open("abc");
    let (tx, rx) = crossbeam_channel::unbounded();
    tx.send(Action::Move(Motion::LineEnd)).unwrap();
    tx.send(Action::InsertChar('d')).unwrap();
    tx.send(Action::Newline).unwrap();
    drop(tx);

    let mut renderer = RecordingRenderer::default();
    let summary = s
        .run(&rx, &mut renderer, Duration::from_millis(5))
        .unwrap();
    assert_eq!(summary.actions, 3);
    assert_eq!(summary.rejected, 0);
    assert_eq!(renderer.frames.len(), 4);

    let first = &renderer.frames[0];
    assert_eq!(first.hint.update, UpdateHint::Screen);
    assert_eq!(first.anchor_row.as_deref(), Some("abc"));

    let insert = &renderer.frames[2];
    assert_eq!(insert.hint.update, UpdateHint::LinePastPoint);
    assert_eq!(insert.hint.anchor, Position::new(0, 3));
    assert_eq!(insert.anchor_row.as_deref(), Some("abcd"));

    let split = &renderer.frames[3];
    assert_eq!(split.hint.cursor, CursorHint::WrapDown);
    assert_eq!(split.cursor, Position::new(1, 0));
    assert_eq!(lines(&mut s), vec!["abcd", ""]);
}

#[test]
fn quit_stops_before_later_actions() {
    let mut s = open("abc");
    let (tx, rx) = crossbeam_channel::unbounded();
    tx.send(Action::InsertChar('x')).unwrap();
    tx.send(Action::Quit).unwrap();
    tx.send(Action::InsertChar('y')).unwrap();

    let mut renderer = RecordingRenderer::default();
    let summary = s.run(&rx, &mut renderer, Duration::from_millis(5)).unwrap();
    assert_eq!(summary.actions, 1);
    assert_eq!(lines(&mut s), vec!["xabc"]);
}

#[test]
fn renderer_failure_is_fatal() {
    let mut s = open("abc");
    let (_tx, rx) = crossbeam_channel::unbounded::<Action>();
    let mut renderer = RecordingRenderer {
        fail: true,
        ..Default::default()
    };
    let err = s
        .run(&rx, &mut renderer, Duration::from_millis(5))
        .unwrap_err();
    assert!(matches!(err, SessionError::Render(_)));
    assert!(err.is_fatal());
}

#[test]
fn idle_hooks_run_while_waiting() {
    let mut s = open("abc");
    let hits = Rc::new(RefCell::new(0));
    s.register_idle(Box::new(CountingHook(hits.clone())));

    let (tx, rx) = crossbeam_channel::unbounded();
    let producer = std::thread::spawn(move || {
        std::thread::sleep(Duration::from_millis(60));
        tx.send(Action::InsertChar('z')).unwrap();
        std::thread::sleep(Duration::from_millis(60));
    });
    let mut renderer = RecordingRenderer::default();
    let summary = s.run(&rx, &mut renderer, Duration::from_millis(5)).unwrap();
    producer.join().unwrap();

    assert_eq!(summary.actions, 1);
    assert!(summary.idle_passes >= 2);
    assert_eq!(*hits.borrow() as u64, summary.idle_passes);
    assert_eq!(lines(&mut s), vec!["zabc"]);
}

#[test]
fn saving_hook_clears_dirty_flag() {
    let mut s = open("one\ntwo\n");
    let saved = Rc::new(RefCell::new(Vec::new()));
    let id = s.register_idle(Box::new(MemorySave(saved.clone())));

    s.run_idle();
    assert!(saved.borrow().is_empty(), "clean document is not saved");

    s.apply(Action::InsertChar('>')).unwrap();
    assert!(s.is_dirty());
    assert_eq!(s.run_idle(), 0);
    assert!(!s.is_dirty());
    assert_eq!(saved.borrow().as_slice(), b">one\ntwo\n");

    assert!(s.unregister_idle(id));
    assert!(!s.unregister_idle(id));
}

#[test]
fn rejected_actions_are_logged_and_skipped() {
    let mut s = open("abc");
    let (tx, rx) = crossbeam_channel::unbounded();
    tx.send(Action::Reload(vec![0xc3])).unwrap();
    tx.send(Action::InsertChar('!')).unwrap();
    drop(tx);

    let (summary, logs) = with_captured_logs(|| {
        s.run(&rx, &mut NoopRenderer, Duration::from_millis(5))
            .unwrap()
    });
    assert_eq!(summary.actions, 2);
    assert_eq!(summary.rejected, 1);
    assert!(logs.contains("WARN state.session:"), "{logs}");
    assert!(logs.contains("edit_rejected"));
    assert!(logs.contains("op=\"reload\""));
    assert!(logs.contains("run_complete"));
    assert_eq!(lines(&mut s), vec!["!abc"]);
}
