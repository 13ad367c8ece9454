use approx::assert_relative_eq;
use drop_scene::*;

const DT: f32 = 1.0 / 60.0;

fn world_with_floor() -> (PhysicsWorld, MaterialId, MaterialId) {
    let (table, default, concrete) = MaterialTable::drop_scene();
    let mut world = PhysicsWorld::new(table);
    world.add_body(RigidBody::fixed(ColliderShape::Plane, default));
    (world, default, concrete)
}

#[test]
fn bodies_fall_under_gravity() {
    let (mut world, default, _) = world_with_floor();
    let id = world.add_body(
        RigidBody::dynamic(ColliderShape::sphere(0.6), 10.0, default)
            .with_position(Vec3::new(0.0, 10.0, 0.0)),
    );

    world.step(DT, DT, 3);

    let position_y = world.body(id).expect("body should exist").position().y;
    assert!(position_y < 10.0, "body should start falling, y = {}", position_y);
}

#[test]
fn dropped_sphere_comes_to_rest_on_the_floor() {
    let (mut world, default, _) = world_with_floor();
    let id = world.add_body(
        RigidBody::dynamic(ColliderShape::sphere(0.6), 10.0, default)
            .with_position(Vec3::new(0.0, 6.0, 0.0)),
    );

    for _ in 0..600 {
        world.step(DT, DT, 3);
    }

    let body = world.body(id).expect("body");
    assert_relative_eq!(body.position().y, 0.6, epsilon = 0.05);
    assert!(body.velocity.linear.length() < 0.1);
    assert!(body.is_sleeping());

    let rested = body.position();
    for _ in 0..120 {
        world.step(DT, DT, 3);
    }
    let later = world.body(id).expect("body").position();
    assert_relative_eq!(later.y, rested.y, epsilon = 1e-4);
}

#[test]
fn brick_settles_flat_without_bouncing() {
    let (mut world, _, concrete) = world_with_floor();
    let id = world.add_body(
        RigidBody::dynamic(ColliderShape::cuboid(Vec3::new(1.0, 0.5, 0.25)), 100.0, concrete)
            .with_position(Vec3::new(0.0, 3.0, 0.0)),
    );

    let mut highest_after_landing = f32::MIN;
    let mut landed = false;
    for _ in 0..480 {
        world.step(DT, DT, 3);
        let y = world.body(id).expect("body").position().y;
        if y < 0.6 {
            landed = true;
        }
        if landed {
            highest_after_landing = highest_after_landing.max(y);
        }
    }

    let body = world.body(id).expect("body");
    assert!(landed);
    assert_relative_eq!(body.position().y, 0.5, epsilon = 0.05);
    assert!(highest_after_landing < 0.7, "brick bounced to {highest_after_landing}");
}

#[test]
fn catch_up_stops_at_the_substep_cap() {
    let (mut world, _, _) = world_with_floor();

    assert_eq!(world.step(DT, 0.5, 3), 3);
    assert_relative_eq!(world.time(), 3.0 * DT, epsilon = 1e-6);

    // the dropped backlog is not replayed on later frames
    assert_eq!(world.step(DT, 0.0, 3), 0);
    assert_eq!(world.step(DT, DT, 3), 1);
}

#[test]
fn zero_substep_cap_still_runs_one() {
    let (mut world, _, _) = world_with_floor();
    assert_eq!(world.step(DT, DT * 2.0, 0), 1);
}

#[test]
fn sleeping_body_reacts_to_gravity_change() {
    let (mut world, default, _) = world_with_floor();
    let id = world.add_body(
        RigidBody::dynamic(ColliderShape::sphere(0.6), 10.0, default)
            .with_position(Vec3::new(0.0, 0.6, 0.0)),
    );
    for _ in 0..180 {
        world.step(DT, DT, 3);
    }
    assert!(world.body(id).expect("body").is_sleeping());

    world.set_gravity(Vec3::new(0.0, 9.82, 0.0));
    for _ in 0..30 {
        world.step(DT, DT, 3);
    }

    let body = world.body(id).expect("body");
    assert!(!body.is_sleeping());
    assert!(body.position().y > 1.0);
}

#[test]
fn sleep_can_be_disabled() {
    let (mut world, default, _) = world_with_floor();
    world.set_allow_sleep(false);
    let id = world.add_body(
        RigidBody::dynamic(ColliderShape::sphere(0.6), 10.0, default)
            .with_position(Vec3::new(0.0, 0.6, 0.0)),
    );
    for _ in 0..180 {
        world.step(DT, DT, 3);
    }
    assert!(!world.body(id).expect("body").is_sleeping());
}

#[test]
fn ball_falls_onto_resting_ball_and_wakes_it() {
    let (mut world, default, _) = world_with_floor();
    let lower = world.add_body(
        RigidBody::dynamic(ColliderShape::sphere(0.6), 10.0, default)
            .with_position(Vec3::new(0.0, 0.6, 0.0)),
    );
    for _ in 0..180 {
        world.step(DT, DT, 3);
    }
    assert!(world.body(lower).expect("lower").is_sleeping());

    world.add_body(
        RigidBody::dynamic(ColliderShape::sphere(0.6), 10.0, default)
            .with_position(Vec3::new(0.3, 4.0, 0.0)),
    );
    let mut woke = false;
    for _ in 0..120 {
        world.step(DT, DT, 3);
        woke |= !world.body(lower).expect("lower").is_sleeping();
    }
    assert!(woke);
}

fn crossed_brick_rest_position(angle: f32) -> (Vec3, Quat) {
    let (mut world, _, concrete) = world_with_floor();
    let brick = ColliderShape::cuboid(Vec3::new(1.0, 0.5, 0.25));
    world.add_body(
        RigidBody::dynamic(brick, 100.0, concrete).with_position(Vec3::new(0.0, 0.5, 0.0)),
    );
    let top = world.add_body(
        RigidBody::dynamic(brick, 100.0, concrete)
            .with_position(Vec3::new(0.0, 1.52, 0.0))
            .with_rotation(Quat::from_rotation_y(angle)),
    );

    for _ in 0..900 {
        world.step(DT, DT, 3);
    }

    let body = world.body(top).expect("top brick");
    (body.position(), body.rotation())
}

#[test]
fn brick_rests_across_another_brick() {
    for angle in [std::f32::consts::FRAC_PI_2, 0.6, 1.2] {
        let (position, rotation) = crossed_brick_rest_position(angle);

        assert_relative_eq!(position.y, 1.5, epsilon = 0.05);
        assert!(position.x.abs() < 0.1, "angle {angle}: drifted to {position}");
        assert!(position.z.abs() < 0.1, "angle {angle}: drifted to {position}");
        assert!((rotation * Vec3::Y).y > 0.99, "angle {angle}: brick tipped");
    }
}
