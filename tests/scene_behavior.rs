use sphere_showcase_lib::{
    animation::update_frame,
    camera::PerspectiveCamera,
    config::ShowcaseConfig,
    input::InputState,
    panel::{DebugPanel, LightParam},
    scene::{LightId, Scene, SceneObject},
    viewport::Viewport,
};

fn startup() -> (ShowcaseConfig, Scene, InputState, Viewport, DebugPanel) {
    let config = ShowcaseConfig::default();
    let viewport = Viewport::new(1280.0, 720.0, 1.0, config.max_pixel_ratio);
    let scene = Scene::new(&config, viewport.aspect());
    let input = InputState::new(1280.0, 720.0);
    let panel = DebugPanel::new(&config);
    (config, scene, input, viewport, panel)
}

#[test]
fn startup_scene_contents() {
    let (_, scene, ..) = startup();

    let (mut meshes, mut lights, mut helpers, mut cameras) = (0, 0, 0, 0);
    for child in scene.children() {
        match child {
            SceneObject::Mesh(_) => meshes += 1,
            SceneObject::PointLight(_) => lights += 1,
            SceneObject::PointLightHelper(_) => helpers += 1,
            SceneObject::Camera(_) => cameras += 1,
        }
    }
    assert_eq!((meshes, lights, helpers, cameras), (1, 2, 2, 1));

    assert_eq!(scene.camera.position, glam::Vec3::new(0.0, 0.0, 2.0));
    assert_eq!(scene.camera.fov_y, 75.0);
    assert_eq!(scene.camera.aspect, 1280.0 / 720.0);
    assert_eq!(scene.sphere.transform.rotation, glam::Vec3::ZERO);
    assert_eq!(scene.sphere.transform.position, glam::Vec3::ZERO);

    let tracked: Vec<LightId> = scene.helpers().iter().map(|helper| helper.light).collect();
    assert_eq!(tracked, vec![LightId::First, LightId::Second]);
}

#[test]
fn resizing_twice_matches_resizing_once() {
    let (_, mut scene, _, mut viewport, _) = startup();
    let mut once_camera: PerspectiveCamera = scene.camera.clone();
    let mut once = viewport;

    once.resize(1024.0, 600.0, 3.0, &mut once_camera);
    viewport.resize(1024.0, 600.0, 3.0, &mut scene.camera);
    viewport.resize(1024.0, 600.0, 3.0, &mut scene.camera);

    assert_eq!(viewport, once);
    assert_eq!(scene.camera.aspect, once_camera.aspect);
    assert_eq!(scene.camera.projection_matrix(), once_camera.projection_matrix());
    assert_eq!(viewport.pixel_ratio, 2.0);
    assert_eq!(viewport.buffer_size().width, 2048);
    assert_eq!(viewport.buffer_size().height, 1200);
}

#[test]
fn intensity_control_writes_only_its_light() {
    let (_, mut scene, _, _, panel) = startup();
    let before = scene.clone();

    let stored = panel.set_number(&mut scene, LightId::First, LightParam::Intensity, 3.0);

    assert_eq!(stored, 3.0);
    let first = scene.light(LightId::First);
    assert_eq!(first.intensity, 3.0);
    assert_eq!(first.position, before.light(LightId::First).position);
    assert_eq!(first.color, before.light(LightId::First).color);

    let second = scene.light(LightId::Second);
    let second_before = before.light(LightId::Second);
    assert_eq!(second.intensity, second_before.intensity);
    assert_eq!(second.position, second_before.position);
    assert_eq!(second.color, second_before.color);
}

#[test]
fn controls_clamp_to_their_range() {
    let (_, mut scene, _, _, panel) = startup();

    for light in LightId::ALL {
        for param in [LightParam::X, LightParam::Y, LightParam::Z] {
            assert_eq!(panel.set_number(&mut scene, light, param, -7.5), -5.0);
            assert_eq!(param.get(scene.light(light)), -5.0);
            assert_eq!(panel.set_number(&mut scene, light, param, 12.0), 5.0);
            assert_eq!(param.get(scene.light(light)), 5.0);
        }
        assert_eq!(
            panel.set_number(&mut scene, light, LightParam::Intensity, -1.0),
            0.0
        );
        assert_eq!(
            panel.set_number(&mut scene, light, LightParam::Intensity, 9.0),
            5.0
        );
        assert_eq!(scene.light(light).intensity, 5.0);
    }
}

#[test]
fn frame_update_follows_the_closed_form() {
    let (config, mut scene, mut input, ..) = startup();

    let (rx, ry) = (0.3_f32, -0.7_f32);
    let z0 = 0.125_f32;
    scene.sphere.transform.rotation = glam::Vec3::new(rx, ry, 0.0);
    scene.sphere.transform.position.z = z0;
    input.on_pointer_move(640.0 + 250.0, 360.0 - 120.0);
    let elapsed = 4.0_f32;

    update_frame(&mut scene, &mut input, elapsed, &config.motion);

    let (mx, my) = (250.0_f32, -120.0_f32);
    let (tx, ty) = (mx * 0.001, my * 0.001);
    let spin = 0.5 * elapsed;
    let expected_y = spin + 0.5 * (tx - spin);
    let expected_x = rx + 0.05 * (ty - rx);
    let expected_z = z0 + -0.05 * (ty - rx);

    let transform = scene.sphere.transform;
    assert_eq!(input.target, glam::Vec2::new(tx, ty));
    assert_eq!(transform.rotation.y, expected_y);
    assert_eq!(transform.rotation.x, expected_x);
    assert_eq!(transform.position.z, expected_z);

    // Reading the eased pitch instead of the previous one gives a different depth.
    assert_ne!(transform.position.z, z0 + -0.05 * (ty - expected_x));
}

#[test]
fn scroll_moves_sphere_without_a_frame() {
    let (config, mut scene, mut input, ..) = startup();

    input.on_scroll(420.0, &config.motion, &mut scene);

    assert_eq!(scene.sphere.transform.position.y, 420.0 * 0.015);
    assert_eq!(scene.sphere.transform.rotation, glam::Vec3::ZERO);
    assert_eq!(input.target, glam::Vec2::ZERO);
}

#[test]
fn pointer_center_is_not_refreshed_by_resize() {
    let (_, mut scene, mut input, mut viewport, _) = startup();

    viewport.resize(800.0, 600.0, 1.0, &mut scene.camera);
    input.on_pointer_move(400.0, 300.0);

    assert_eq!(input.mouse, glam::Vec2::new(-240.0, -60.0));
}
