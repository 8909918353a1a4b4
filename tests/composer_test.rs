use cgmath::Vector3;
use scene_composer::{
    Appearance, LightSource, SceneComposer, SceneDescription, SceneObject, TextureSource,
    UniformNames,
    data_structures::{material::ObjectMaterial, mesh::MeshKind, transform::Transform},
    milestones,
    registry::TEXTURE_CAPACITY,
};

use crate::common::test_utils::{
    FakeBackend, RecordingMeshes, assert_close, composer, composer_with, composer_with_backend,
    grey_png, rgb_png,
};

mod common;

fn textured_scene(tags: &[&str]) -> (SceneDescription, Vec<Result<Vec<u8>, scene_composer::TextureError>>) {
    let mut scene = SceneDescription::new("textured");
    scene.textures = tags
        .iter()
        .map(|tag| TextureSource::new(format!("textures/{tag}.png"), *tag))
        .collect();
    let files = tags.iter().map(|_| Ok(rgb_png(4, 4))).collect();
    (scene, files)
}

#[test]
fn set_color_disables_texturing() {
    let (mut composer, state) = composer();
    composer.set_color(0.2, 0.4, 0.6, 1.0);
    let state = state.borrow();
    assert_eq!(state.object.use_texture, 0);
    assert_close(state.object.object_color, [0.2, 0.4, 0.6, 1.0]);
}

#[test]
fn set_texture_enables_texturing_and_points_sampler_at_slot() {
    let (mut composer, state) = composer();
    let (scene, files) = textured_scene(&["oakWood", "steelTexture"]);
    composer.prepare_scene_with(&scene, files);

    assert_eq!(composer.set_texture("steelTexture"), Some(1));
    assert_eq!(state.borrow().object.use_texture, 1);
    assert_eq!(state.borrow().texture_slot, Some(1));

    composer.set_color(1.0, 1.0, 1.0, 1.0);
    assert_eq!(state.borrow().object.use_texture, 0);
}

#[test]
fn unknown_texture_tag_only_uploads_the_flag() {
    let (mut composer, state) = composer();
    let (scene, files) = textured_scene(&["oakWood"]);
    composer.prepare_scene_with(&scene, files);
    composer.set_texture("oakWood");

    assert_eq!(composer.set_texture("walnut"), None);
    assert_eq!(state.borrow().object.use_texture, 1);
    // The sampler still points at the previously bound unit.
    assert_eq!(state.borrow().texture_slot, Some(0));
    let shader = composer.shader().unwrap();
    assert_eq!(shader.count("objectTexture"), 1);
    assert_eq!(shader.count("bUseTexture"), 2);
}

#[test]
fn set_material_uploads_all_five_fields() {
    let (mut composer, state) = composer();
    composer.define_material(
        ObjectMaterial::new("metal")
            .with_ambient([0.1, 0.2, 0.3], 0.4)
            .with_diffuse([0.5, 0.6, 0.7])
            .with_specular([0.8, 0.9, 1.0], 52.0),
    );

    assert!(composer.set_material("metal"));
    let object = state.borrow().object;
    assert_close(object.ambient, [0.1, 0.2, 0.3, 0.4]);
    assert_close([object.diffuse[0], object.diffuse[1], object.diffuse[2], 0.0], [0.5, 0.6, 0.7, 0.0]);
    assert_close(object.specular, [0.8, 0.9, 1.0, 52.0]);
    let shader = composer.shader().unwrap();
    for name in [
        "material.ambientColor",
        "material.ambientStrength",
        "material.diffuseColor",
        "material.specularColor",
        "material.shininess",
    ] {
        assert_eq!(shader.count(name), 1, "{name}");
    }
}

#[test]
fn missing_material_leaves_uniforms_untouched() {
    let (mut composer, state) = composer();
    composer.define_material(ObjectMaterial::new("wood").with_specular([0.1, 0.1, 0.1], 2.0));
    composer.set_material("wood");
    let before = state.borrow().object;

    assert!(!composer.set_material("glass"));
    assert_eq!(state.borrow().object, before);
}

#[test]
fn coloured_cylinder_draws_with_its_transform_and_colour() {
    let (mut composer, _) = composer();
    let mut scene = SceneDescription::new("cylinder");
    scene.push(SceneObject::new(
        "pillar",
        MeshKind::Cylinder,
        Transform::from_parts([2.0, 3.0, 2.0], [0.0, 90.0, 0.0], [4.0, 0.0, 0.0]),
        Appearance::Color([0.49, 0.678, 1.0, 1.0]),
    ));

    composer.prepare_scene_with(&scene, Vec::new());
    composer.render_scene(&scene);

    let draws = &composer.meshes().draws;
    assert_eq!(draws.len(), 1);
    assert_eq!(draws[0].mesh, MeshKind::Cylinder);
    assert_close(draws[0].uniform.model[3], [4.0, 0.0, 0.0, 1.0]);
    assert_eq!(draws[0].uniform.object_color, [0.49, 0.678, 1.0, 1.0]);
    assert_eq!(draws[0].uniform.use_texture, 0);
}

#[test]
fn set_transform_matches_object_transform() {
    let (mut composer, state) = composer();
    composer.set_transform(Vector3::new(2.0, 3.0, 2.0), 0.0, 90.0, 0.0, Vector3::new(4.0, 0.0, 0.0));
    let loose = state.borrow().object.model;
    composer.apply_transform(&Transform::from_parts([2.0, 3.0, 2.0], [0.0, 90.0, 0.0], [4.0, 0.0, 0.0]));
    assert_eq!(state.borrow().object.model, loose);
}

#[test]
fn second_prepare_is_ignored() {
    let (mut composer, _) = composer();
    let scene = milestones::milestone_three_two();

    let first = composer.prepare_scene_with(&scene, Vec::new());
    assert_eq!(first.map(|s| s.meshes_loaded), Some(5));
    assert!(composer.prepare_scene_with(&scene, Vec::new()).is_none());
    assert_eq!(composer.meshes().loads.len(), 5);
    assert!(composer.is_prepared());
}

#[test]
fn each_mesh_kind_is_loaded_once_with_scene_settings() {
    let (mut composer, _) = composer();
    let scene = milestones::milestone_four();
    composer.prepare_scene_with(&scene, Vec::new());
    let loads = &composer.meshes().loads;
    let kinds: Vec<_> = loads.iter().map(|(kind, _)| *kind).collect();
    assert_eq!(kinds, vec![MeshKind::Plane, MeshKind::Cylinder, MeshKind::Torus]);
    assert!(loads.iter().all(|(_, settings)| settings.torus_thickness == 0.2));
}

#[test]
fn grey_image_is_rejected_without_taking_a_slot() {
    let (mut composer, _) = composer();
    let (scene, mut files) = textured_scene(&["oakWood", "letterA", "ashWood"]);
    files[1] = Ok(grey_png(4, 4));

    let summary = composer.prepare_scene_with(&scene, files).unwrap();
    assert_eq!(summary.textures_loaded, 2);
    assert_eq!(summary.texture_failures, 1);
    assert_eq!(composer.textures().len(), 2);
    assert_eq!(composer.textures().find_slot("letterA"), None);
    assert_eq!(composer.textures().find_slot("ashWood"), Some(1));
}

#[test]
fn unreadable_file_is_not_fatal() {
    let (mut composer, _) = composer();
    let (scene, mut files) = textured_scene(&["oakWood", "metalTexture"]);
    files[0] = Err(scene_composer::TextureError::Io {
        path: "textures/oakWood.png".into(),
        source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
    });

    let summary = composer.prepare_scene_with(&scene, files).unwrap();
    assert_eq!(summary.texture_failures, 1);
    assert_eq!(composer.textures().find_slot("metalTexture"), Some(0));
}

#[test]
fn oversized_texture_is_skipped_and_preparation_continues() {
    let backend = FakeBackend {
        max_side: Some(8),
        ..Default::default()
    };
    let (mut composer, _) = composer_with_backend(UniformNames::default(), backend);
    let (mut scene, mut files) = textured_scene(&["big", "oakWood"]);
    files[0] = Ok(rgb_png(16, 4));
    scene.push(SceneObject::new(
        "floor",
        MeshKind::Plane,
        Transform::default(),
        Appearance::texture("big"),
    ));

    let summary = composer.prepare_scene_with(&scene, files).unwrap();
    assert_eq!(summary.textures_loaded, 1);
    assert_eq!(summary.texture_failures, 1);
    assert_eq!(summary.meshes_loaded, 1);
    assert_eq!(composer.textures().find_slot("big"), None);
    assert_eq!(composer.textures().find_slot("oakWood"), Some(0));

    composer.render_scene(&scene);
    assert_eq!(composer.meshes().draws.len(), 1);
}

#[test]
fn seventeenth_texture_does_not_fit() {
    let (mut composer, _) = composer();
    let tags: Vec<String> = (0..=TEXTURE_CAPACITY).map(|i| format!("t{i}")).collect();
    let tags: Vec<&str> = tags.iter().map(String::as_str).collect();
    let (scene, files) = textured_scene(&tags);

    let summary = composer.prepare_scene_with(&scene, files).unwrap();
    assert_eq!(summary.textures_loaded, TEXTURE_CAPACITY);
    assert_eq!(summary.texture_failures, 1);
    assert_eq!(composer.textures().find_slot("t16"), None);
}

#[test]
fn textures_are_bound_in_load_order() {
    let (mut composer, _) = composer();
    let (scene, files) = textured_scene(&["a", "b", "c"]);
    composer.prepare_scene_with(&scene, files);
    assert_eq!(composer.textures().backend().bound, vec![(0, 1), (1, 2), (2, 3)]);
}

#[test]
fn release_hands_back_every_texture() {
    let (mut composer, _) = composer();
    let (scene, files) = textured_scene(&["a", "b"]);
    composer.prepare_scene_with(&scene, files);
    composer.release_textures();
    assert!(composer.textures().is_empty());
    assert_eq!(composer.textures().backend().released, vec![1, 2]);
}

#[test]
fn custom_uniform_names_are_used_for_uploads() {
    let names = UniformNames {
        object_color: "u_color".into(),
        use_texture: "u_textured".into(),
        ..Default::default()
    };
    let (mut composer, state) = composer_with(names);
    composer.set_color(0.0, 1.0, 0.0, 1.0);
    let shader = composer.shader().unwrap();
    assert_eq!(shader.count("u_color"), 1);
    assert_eq!(shader.count("u_textured"), 1);
    assert_eq!(shader.count("objectColor"), 0);
    assert_eq!(state.borrow().object.object_color, [0.0, 1.0, 0.0, 1.0]);
}

#[test]
fn missing_shader_still_draws() {
    let state = std::rc::Rc::new(std::cell::RefCell::new(
        scene_composer::shading::UniformState::new(UniformNames::default()),
    ));
    let mut composer: SceneComposer<crate::common::test_utils::RecordingShader, _, _> =
        SceneComposer::new(None, RecordingMeshes::new(state), FakeBackend::default(), UniformNames::default());
    let scene = milestones::milestone_three_two();
    composer.prepare_scene_with(&scene, Vec::new());
    composer.render_scene(&scene);
    assert_eq!(composer.meshes().draws.len(), scene.objects.len());
    assert!(composer.set_texture("anything").is_none());
}

#[test]
fn final_milestone_draws_every_object_with_its_texture() {
    let (mut composer, _) = composer();
    let scene = milestones::milestone_final();
    let files = scene.textures.iter().map(|_| Ok(rgb_png(8, 8))).collect();

    let summary = composer.prepare_scene_with(&scene, files).unwrap();
    assert_eq!(summary.textures_loaded, 13);
    composer.render_scene(&scene);

    let draws = &composer.meshes().draws;
    assert_eq!(draws.len(), scene.objects.len());
    for (object, draw) in scene.objects.iter().zip(draws) {
        match &object.appearance {
            Appearance::Color(color) => {
                assert_eq!(draw.uniform.use_texture, 0, "{}", object.label);
                assert_eq!(draw.uniform.object_color, *color);
            }
            Appearance::Texture { tag, .. } => {
                assert_eq!(draw.uniform.use_texture, 1, "{}", object.label);
                assert_eq!(draw.texture_slot, composer.textures().find_slot(tag), "{}", object.label);
            }
        }
    }
}

#[test]
fn uv_scale_persists_until_changed() {
    let (mut composer, _) = composer();
    let scene = milestones::milestone_final();
    let files = scene.textures.iter().map(|_| Ok(rgb_png(2, 2))).collect();
    composer.prepare_scene_with(&scene, files);
    composer.render_scene(&scene);

    let draws = &composer.meshes().draws;
    let index = |label: &str| scene.objects.iter().position(|o| o.label == label).unwrap();
    // Floor draws before any UV scale is set.
    assert_eq!(draws[index("floor")].uniform.uv_scale, [1.0, 1.0]);
    assert_eq!(draws[index("bead 1")].uniform.uv_scale, [0.5, 0.5]);
    assert_eq!(draws[index("maze rod 1")].uniform.uv_scale, [0.1, 0.1]);
    assert_eq!(
        draws[index("letterC overlay")].uniform.uv_scale,
        draws[index("letterC block")].uniform.uv_scale
    );
}

#[test]
fn lighting_follows_the_scene_lights() {
    let (mut unlit, unlit_state) = composer();
    unlit.prepare_scene_with(&milestones::milestone_three_two(), Vec::new());
    assert_eq!(unlit_state.borrow().lights.use_lighting, 0);

    let (mut lit, lit_state) = composer();
    let scene = milestones::milestone_final_lit();
    let files = scene.textures.iter().map(|_| Ok(rgb_png(2, 2))).collect();
    lit.prepare_scene_with(&scene, files);
    let lights = lit_state.borrow().lights;
    assert_eq!(lights.use_lighting, 1);
    assert_eq!(lights.count, 2);
    assert_eq!(lights.lights[0].position, [-8.0, 12.0, 8.0]);
}

#[test]
fn lit_scene_uploads_materials_per_object() {
    let (mut composer, _) = composer();
    let scene = milestones::milestone_final_lit();
    let files = scene.textures.iter().map(|_| Ok(rgb_png(2, 2))).collect();
    composer.prepare_scene_with(&scene, files);
    composer.render_scene(&scene);

    let metal = scene.materials.iter().find(|m| m.tag == "metal").unwrap();
    let rod = scene.objects.iter().position(|o| o.label == "maze rod 1").unwrap();
    let draw = &composer.meshes().draws[rod];
    assert_eq!(draw.uniform.specular[3], metal.shininess);
}

#[test]
fn extra_lights_are_dropped() {
    let (mut composer, state) = composer();
    let lights: Vec<LightSource> = (0..6).map(|i| LightSource::white([i as f32, 0.0, 0.0])).collect();
    composer.define_lights(&lights);
    assert_eq!(state.borrow().lights.count, 4);
}

#[test]
fn prepare_reads_texture_files_from_the_asset_root() {
    let root = std::env::temp_dir().join(format!("scene-composer-test-{}", std::process::id()));
    std::fs::create_dir_all(root.join("textures")).unwrap();
    std::fs::write(root.join("textures/oakwood.png"), rgb_png(4, 2)).unwrap();

    let mut scene = SceneDescription::new("from disk");
    scene.textures = vec![
        TextureSource::new("textures/oakwood.png", "oakWood"),
        TextureSource::new("textures/missing.png", "missing"),
    ];
    let (mut composer, _) = composer();
    let summary = futures::executor::block_on(composer.prepare_scene(&scene, &root)).unwrap();

    assert_eq!(summary.textures_loaded, 1);
    assert_eq!(summary.texture_failures, 1);
    assert_eq!(composer.textures().backend().created, vec![(1, 4, 2)]);
    std::fs::remove_dir_all(&root).unwrap();
}
