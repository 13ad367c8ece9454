use drop_scene::*;

fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let config = match std::env::args().nth(1) {
        Some(path) => SceneConfig::from_toml_str(&std::fs::read_to_string(path)?)?,
        None => SceneConfig::default().with_seed(2024),
    };

    let clip = RecordingClip::new();
    let mut scene = DropScene::new(config, clip.clone());
    let mut clock = ManualClock::ticking(1.0 / 60.0);
    let mut renderer = NullRenderer::new();

    // three seconds of the initial drop, then a ball and a brick on top
    FrameLoop::unpaced()
        .with_frame_limit(180)
        .run(&mut scene, &mut clock, &mut renderer);
    for action in ["drop-ball", "drop-brick"] {
        scene.apply(action.parse()?);
    }
    FrameLoop::unpaced()
        .with_frame_limit(420)
        .run(&mut scene, &mut clock, &mut renderer);

    println!(
        "Simulated {:.1} s over {} frames, {} hit sounds",
        scene.world().time(),
        renderer.frames(),
        clip.play_count()
    );
    for object in scene.registry().iter() {
        let Some(mesh) = scene.render_scene().mesh(object.mesh) else {
            continue;
        };
        let asleep = scene
            .world()
            .body(object.body)
            .is_some_and(RigidBody::is_sleeping);
        println!(
            "{:?} at {:.3} (sleeping: {asleep})",
            object.kind,
            mesh.transform().position
        );
    }

    let removed = scene.reset();
    println!("Cleaned up {removed} objects");
    Ok(())
}
