use drop_scene::*;
use std::sync::{atomic::Ordering, Arc, Mutex};
use std::thread;
use std::time::Duration;

#[test]
fn scene_types_are_send() {
    fn assert_send<T: Send>() {}
    assert_send::<PhysicsWorld>();
    assert_send::<DropScene>();
}

#[test]
fn stop_handle_ends_loop_from_another_thread() {
    let frame_loop = FrameLoop::new(240.0);
    let stop = frame_loop.stop_handle();

    let stopper = thread::spawn(move || {
        thread::sleep(Duration::from_millis(50));
        stop.store(false, Ordering::Release);
    });

    let mut scene = DropScene::new(SceneConfig::default().with_seed(12), SilentClip);
    let mut clock = WallClock::start();
    let mut renderer = NullRenderer::new();
    let frames = frame_loop.run(&mut scene, &mut clock, &mut renderer);

    stopper.join().expect("stopper thread");
    assert!(frames > 0);
    assert!(!frame_loop.is_running());
}

#[test]
fn shared_world_steps_across_threads() {
    let world = Arc::new(Mutex::new(PhysicsWorld::default()));

    let mut handles = vec![];
    for _ in 0..4 {
        let world_clone = Arc::clone(&world);
        handles.push(thread::spawn(move || {
            let mut world = world_clone.lock().unwrap();
            world.step(1.0 / 60.0, 1.0 / 60.0, 3);
        }));
    }
    for handle in handles {
        handle.join().unwrap();
    }

    assert!(world.lock().unwrap().time() > 0.0);
}

#[cfg(feature = "parallel")]
#[test]
fn parallel_integration_matches_sequential() {
    fn run(parallel: bool) -> Vec<Vec3> {
        let mut scene = DropScene::new(SceneConfig::default().with_seed(31), SilentClip);
        scene.world_mut().set_parallel_enabled(parallel);
        let mut clock = ManualClock::ticking(1.0 / 60.0);
        for _ in 0..120 {
            scene.tick(clock.elapsed());
        }
        scene
            .registry()
            .iter()
            .map(|object| scene.world().body(object.body).expect("body").position())
            .collect()
    }

    assert_eq!(run(false), run(true));
}
