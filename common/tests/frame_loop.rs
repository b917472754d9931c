use std::cell::Cell;
use std::rc::Rc;

use common::{Canvas, Color, CommandRecorder, FrameLoop, Scene};

#[derive(Default)]
struct Counters {
    updates: Cell<u32>,
    draws: Cell<u32>,
}

struct CountingScene {
    counters: Rc<Counters>,
}

impl Scene for CountingScene {
    fn title(&self) -> &str {
        "counting"
    }

    fn update(&mut self, _dt: f32) {
        self.counters.updates.set(self.counters.updates.get() + 1);
    }

    fn draw(&self, canvas: &mut dyn Canvas) {
        self.counters.draws.set(self.counters.draws.get() + 1);
        canvas.clear(Color::BLACK);
    }
}

fn mounted() -> (FrameLoop, Rc<Counters>) {
    let counters = Rc::new(Counters::default());
    let mut frame_loop = FrameLoop::new();
    frame_loop.mount(Box::new(CountingScene {
        counters: counters.clone(),
    }));
    (frame_loop, counters)
}

#[test]
fn test_mount_schedules_a_frame() {
    let (frame_loop, _) = mounted();
    assert!(frame_loop.is_mounted());
    assert!(frame_loop.pending_request().is_some());
}

#[test]
fn test_tick_updates_and_draws() {
    let (mut frame_loop, counters) = mounted();
    let mut recorder = CommandRecorder::new(800.0, 600.0);

    for _ in 0..3 {
        assert!(frame_loop.tick(0.016, Some(&mut recorder)));
    }
    assert_eq!(counters.updates.get(), 3);
    assert_eq!(counters.draws.get(), 3);
    assert_eq!(recorder.commands.len(), 3);
}

#[test]
fn test_missing_surface_steps_without_drawing() {
    let (mut frame_loop, counters) = mounted();
    assert!(frame_loop.tick(0.016, None));
    assert_eq!(counters.updates.get(), 1);
    assert_eq!(counters.draws.get(), 0);
}

#[test]
fn test_unmount_cancels_pending_frame() {
    let (mut frame_loop, counters) = mounted();
    frame_loop.tick(0.016, None);
    let scene = frame_loop.unmount();
    assert!(scene.is_some());
    assert!(frame_loop.pending_request().is_none());

    // No orphan loop keeps running after teardown
    drop(scene);
    assert!(!frame_loop.tick(0.016, None));
    assert_eq!(counters.updates.get(), 1);
    assert_eq!(Rc::strong_count(&counters), 1);
}

#[test]
fn test_remount_replaces_scene() {
    let (mut frame_loop, first) = mounted();
    let second = Rc::new(Counters::default());
    frame_loop.mount(Box::new(CountingScene {
        counters: second.clone(),
    }));

    // the first scene was dropped on remount
    assert_eq!(Rc::strong_count(&first), 1);
    frame_loop.tick(0.016, None);
    assert_eq!(first.updates.get(), 0);
    assert_eq!(second.updates.get(), 1);
    assert_eq!(frame_loop.frames(), 1);
}
