//! Headless demo: a shuttling conveyor carries a crate while a lantern
//! sways overhead on a fluctuation effect.
//!
//! Pass a RON profile path to re-tune the lantern, e.g.
//! `motile demos/lantern.ron`.

use motile::prelude::*;

const DT: f32 = 1.0 / 120.0;
const STEPS: u32 = 960;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    log::info!("Starting motion demo");

    let mut world = hecs::World::new();
    let mut physics = Physics::new();
    let mut surfaces = SurfaceTable::new();

    // Ground slab
    let ground = physics.create_static_body(Vec3::ZERO, Quat::IDENTITY);
    physics.add_box_collider(ground, Vec3::new(20.0, 0.1, 20.0), 1.0);

    // Conveyor platform, kinematic so it can shuttle while the belt runs
    let platform_body = physics.create_kinematic_body(Vec3::new(0.0, 1.0, 0.0), Quat::IDENTITY);
    let platform_collider = physics.add_box_collider(platform_body, Vec3::new(2.0, 0.1, 1.0), 1.0);
    world.spawn((
        Name::new("conveyor platform"),
        ColliderRef(platform_collider),
        SurfaceMotion::new(Conveyor::new(Vec3::Z, 1.5)),
    ));

    // Crate riding the belt
    let crate_body = physics.create_dynamic_body(Vec3::new(0.0, 1.4, 0.0), Quat::IDENTITY);
    physics.add_box_collider(crate_body, Vec3::splat(0.2), 1.0);

    // Swaying lantern, purely procedural
    let lantern = world.spawn((
        Name::new("lantern"),
        Transform::from_position(Vec3::new(0.0, 3.0, 0.0)),
        Fluctuate::new(
            FluctuateParams::default()
                .with_magnitude(0.4)
                .with_frequency(0.8),
        ),
    ));

    // Optional overrides from a RON profile
    if let Some(path) = std::env::args().nth(1) {
        let profile = MotionProfile::load_ron(&path)?;
        log::info!("Applying profile '{}' from {path}", profile.name);
        profile.apply(&mut world, lantern)?;
    }

    for warning in motile::surface::configuration_warnings(&world) {
        log::warn!("{warning}");
    }

    for step in 0..STEPS {
        let t = step as f32 * DT;

        // Shuttle the platform along x while the belt runs across it
        physics.set_kinematic_position(platform_body, Vec3::new((t * 0.5).sin() * 0.5, 1.0, 0.0));

        surfaces.sync(&world, &mut physics);
        physics.step_with_surfaces(DT, &surfaces);
        motile::fluctuate::update(&mut world, DT);

        if step % 120 == 0 {
            let crate_pos = physics.get_position(crate_body).unwrap_or(Vec3::ZERO);
            let crate_vel = physics.get_linear_velocity(crate_body).unwrap_or(Vec3::ZERO);
            let lantern_pos = world
                .get::<&Transform>(lantern)
                .map(|transform| transform.position)
                .unwrap_or(Vec3::ZERO);
            let hover = physics
                .raycast(lantern_pos, Vec3::NEG_Y, 50.0)
                .map_or(f32::NAN, |hit| hit.distance);

            log::info!(
                "t={t:.1}s crate=({:.2}, {:.2}, {:.2}) vel=({:.2}, {:.2}, {:.2}) lantern=({:.2}, {:.2}, {:.2}) hover={hover:.2}",
                crate_pos.x,
                crate_pos.y,
                crate_pos.z,
                crate_vel.x,
                crate_vel.y,
                crate_vel.z,
                lantern_pos.x,
                lantern_pos.y,
                lantern_pos.z,
            );
        }
    }

    let final_pos = physics.get_position(crate_body).unwrap_or(Vec3::ZERO);
    log::info!(
        "Demo finished, crate came to rest at ({:.2}, {:.2}, {:.2})",
        final_pos.x,
        final_pos.y,
        final_pos.z
    );
    Ok(())
}
