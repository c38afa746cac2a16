use cgmath::{Deg, Point3};
use voxel_editor::{
    config::EditorConfig,
    editor_state::{
        camera_state::camera::{OrbitCamera, OrbitSettings},
        math::Ray,
        picking,
        session::{EditOutcome, EditorActions, EditorSession},
        voxels::{material::Material, world::VoxelWorld},
    },
};
use web_time::{Duration, Instant};

#[test]
fn pick_then_place_against_the_facing_side() {
    let mut world = VoxelWorld::empty(10, 1.0);
    world.set_voxel(Point3::new(5, 5, 5), true, Material::STONE);
    world.rebuild_instance_data();

    let ray = Ray::towards(Point3::new(5.5, 5.5, 20.0), Point3::new(5.5, 5.5, 5.5)).unwrap();
    let selected = picking::pick(&world, &ray);
    assert_eq!(selected, Some(Point3::new(5, 5, 5)));

    let placed = picking::add_adjacent(&mut world, Point3::new(5, 5, 5), &ray, Material::SAND);
    assert_eq!(placed, Some(Point3::new(5, 5, 6)));
    assert_eq!(world.instance_count(), 2);
    assert_eq!(world.instance_positions(), &[[5.0, 5.0, 5.0], [5.0, 5.0, 6.0]]);
    assert_eq!(world.instance_material_ids(), &[2.0, 3.0]);

    assert!(picking::remove_voxel(&mut world, selected));
    assert_eq!(world.instance_positions(), &[[5.0, 5.0, 6.0]]);
}

#[test]
fn camera_limits_hold_under_repeated_input() {
    let mut camera = OrbitCamera::new(Deg(45.0), Deg(30.0), 25.0, OrbitSettings::default());

    for _ in 0..10 {
        camera.zoom(100.0);
        camera.update_from_mouse_delta(0.0, 1000.0);
    }

    assert_eq!(camera.radius, 5.0);
    assert_eq!(camera.pitch, Deg(89.0));
}

#[test]
fn session_builds_a_column_then_tears_it_down() {
    let config = EditorConfig {
        grid_size: 9,
        camera_yaw: 90.0,
        camera_pitch: 0.0,
        ..Default::default()
    };
    let viewport = (1280, 720);
    let mut session = EditorSession::new(&config, viewport);
    let start = Instant::now();

    let add = EditorActions {
        cursor_position: (640.0, 360.0),
        select_material: Some(Material::LEAVES),
        add_voxel: true,
        ..Default::default()
    };

    // Cells (4,4,6) and (4,4,7) fill in; (4,4,8) is the last cell inside the grid
    let mut placed = Vec::new();
    for step in 0..5 {
        let report = session.frame(&add, viewport, start + Duration::from_millis(200 * step));
        if let Some(EditOutcome::Added { coord, material }) = report.edit {
            assert_eq!(material, Material::LEAVES);
            placed.push(coord);
        }
    }
    assert_eq!(
        placed,
        vec![Point3::new(4, 4, 6), Point3::new(4, 4, 7), Point3::new(4, 4, 8)]
    );
    assert_eq!(session.world.voxel_count(), 30);

    let remove = EditorActions {
        cursor_position: (640.0, 360.0),
        remove_voxel: true,
        ..Default::default()
    };
    let report = session.frame(&remove, viewport, start + Duration::from_secs(5));
    assert_eq!(report.edit, Some(EditOutcome::Removed { coord: Point3::new(4, 4, 8) }));
    assert_eq!(session.world.voxel_count(), 29);

    let report = session.frame(&remove, viewport, start + Duration::from_secs(6));
    assert_eq!(report.edit, Some(EditOutcome::Removed { coord: Point3::new(4, 4, 7) }));
}
