//! The course milestone scenes as data.
//!
//! - `3-2`: coloured primitives on a floor and backdrop
//! - `4`: the coloured ring stacker
//! - `7`: the textured table with ring stacker, bead maze and letter blocks
//! - `7-lit`: milestone 7 with materials and two lights

use crate::{
    data_structures::{
        material::ObjectMaterial,
        mesh::{MeshKind, MeshSettings},
        transform::Transform,
    },
    scene::{Appearance, LightSource, SceneDescription, SceneObject, TextureSource},
};

pub const MILESTONE_NAMES: [&str; 4] = ["3-2", "4", "7", "7-lit"];

/// Look up a milestone scene by its course number.
pub fn by_name(name: &str) -> Option<SceneDescription> {
    match name {
        "3-2" => Some(milestone_three_two()),
        "4" => Some(milestone_four()),
        "7" => Some(milestone_final()),
        "7-lit" => Some(milestone_final_lit()),
        _ => None,
    }
}

fn object(
    label: &str,
    mesh: MeshKind,
    scale: [f32; 3],
    rotation: [f32; 3],
    position: [f32; 3],
    appearance: Appearance,
) -> SceneObject {
    SceneObject::new(
        label,
        mesh,
        Transform::from_parts(scale, rotation, position),
        appearance,
    )
}

fn colored(
    label: &str,
    mesh: MeshKind,
    scale: [f32; 3],
    rotation: [f32; 3],
    position: [f32; 3],
    color: [f32; 4],
) -> SceneObject {
    object(label, mesh, scale, rotation, position, Appearance::Color(color))
}

fn textured(
    label: &str,
    mesh: MeshKind,
    scale: [f32; 3],
    rotation: [f32; 3],
    position: [f32; 3],
    tag: &str,
) -> SceneObject {
    object(label, mesh, scale, rotation, position, Appearance::texture(tag))
}

const NO_ROTATION: [f32; 3] = [0.0, 0.0, 0.0];
const UPRIGHT: [f32; 3] = [90.0, 0.0, 0.0];
const WHITE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];

/// Floor and backdrop planes.
fn stage(scene: &mut SceneDescription, color: [f32; 4], backdrop_height: f32) {
    scene
        .push(colored("floor", MeshKind::Plane, [20.0, 1.0, 10.0], NO_ROTATION, [0.0, 0.0, 0.0], color))
        .push(colored(
            "backdrop",
            MeshKind::Plane,
            [20.0, 1.0, 10.0],
            UPRIGHT,
            [0.0, backdrop_height, -10.0],
            color,
        ));
}

pub fn milestone_three_two() -> SceneDescription {
    let mut scene = SceneDescription::new("3-2");
    let stage_color = [0.66667, 0.77255, 1.0, 1.0];
    let pillar = [0.49020, 0.67843, 1.0, 1.0];
    stage(&mut scene, stage_color, 9.0);

    scene
        .push(colored("right pillar", MeshKind::Cylinder, [2.0, 3.0, 2.0], [0.0, 90.0, 0.0], [4.0, 0.0, 0.0], pillar))
        .push(colored("middle pillar", MeshKind::Cylinder, [2.0, 4.5, 2.0], [0.0, 90.0, 0.0], [0.0, 0.0, 0.0], pillar))
        .push(colored("left pillar", MeshKind::Cylinder, [2.0, 1.5, 2.0], [0.0, 90.0, 0.0], [-4.0, 0.0, 0.0], pillar))
        .push(colored(
            "box",
            MeshKind::Box,
            [2.0, 2.0, 2.0],
            [0.0, 45.0, 0.0],
            [4.0, 4.0, 0.0],
            [0.83137, 0.32549, 0.32549, 1.0],
        ))
        .push(colored(
            "cone",
            MeshKind::Cone,
            [1.25, 3.5, 1.25],
            NO_ROTATION,
            [0.0, 4.5, 0.0],
            [1.0, 1.0, 0.2, 1.0],
        ))
        .push(colored(
            "sphere",
            MeshKind::Sphere,
            [1.5, 1.5, 1.5],
            NO_ROTATION,
            [-4.0, 3.0, 0.0],
            [0.8, 0.3, 0.9, 1.0],
        ));
    scene
}

pub fn milestone_four() -> SceneDescription {
    let mut scene = SceneDescription::new("4");
    scene.mesh_settings = MeshSettings {
        torus_thickness: 0.2,
        ..Default::default()
    };
    stage(&mut scene, WHITE, 10.0);

    let wood = [0.94902, 0.82353, 0.74118, 1.0];
    scene
        .push(colored("stacker base", MeshKind::Cylinder, [3.0, 0.25, 3.0], NO_ROTATION, [10.0, 0.0, -1.5], wood))
        .push(colored("stacker rod", MeshKind::Cylinder, [0.25, 6.5, 0.5], NO_ROTATION, [10.0, 0.5, -1.5], wood));

    let rings: [(f32, f32, [f32; 4]); 6] = [
        (3.5, 0.5, [0.78431, 0.94118, 1.0, 1.0]),
        (3.0, 1.5, [0.28, 0.44, 0.96, 1.0]),
        (2.5, 2.5, [1.0, 0.33556, 1.0, 1.0]),
        (2.0, 3.5, [1.0, 0.19608, 0.19608, 1.0]),
        (1.5, 4.5, [1.0, 0.78431, 0.0, 1.0]),
        (1.0, 5.5, [0.59216, 0.78431, 0.23523, 1.0]),
    ];
    for (i, (size, y, color)) in rings.into_iter().enumerate() {
        scene.push(colored(
            &format!("ring {}", i + 1),
            MeshKind::Torus,
            [size, size, 3.0],
            UPRIGHT,
            [10.0, y, -1.5],
            color,
        ));
    }
    scene
}

fn final_textures() -> Vec<TextureSource> {
    [
        ("oakwood.jpg", "oakWood"),
        ("metal.jpg", "metalTexture"),
        ("stainless.jpg", "steelTexture"),
        ("lightblueplastic.jpg", "ltbluePlastic"),
        ("blueplastic.jpg", "bluePlastic"),
        ("magentaplastic.jpg", "magentaPlastic"),
        ("redplastic.jpg", "redPlastic"),
        ("orangeplastic.jpg", "orangePlastic"),
        ("greenplastic.jpg", "greenPlastic"),
        ("ashwood.jpg", "ashWood"),
        ("letterA.png", "letterA"),
        ("letterB.png", "letterB"),
        ("letterC.png", "letterC"),
    ]
    .into_iter()
    .map(|(file, tag)| TextureSource::new(format!("textures/{file}"), tag))
    .collect()
}

pub fn milestone_final() -> SceneDescription {
    let mut scene = SceneDescription::new("7");
    scene.textures = final_textures();
    stage(&mut scene, WHITE, 10.0);
    ring_stacker(&mut scene);
    bead_maze(&mut scene);
    letter_blocks(&mut scene);
    scene
}

fn ring_stacker(scene: &mut SceneDescription) {
    scene
        .push(
            textured("stacker base", MeshKind::Cylinder, [2.0, 0.25, 2.0], NO_ROTATION, [10.0, 0.0, -1.5], "oakWood")
                .with_uv_scale(1.0, 1.0),
        )
        .push(textured(
            "stacker rod",
            MeshKind::Cylinder,
            [0.2, 5.2, 0.2],
            NO_ROTATION,
            [10.0, 0.1, -1.5],
            "oakWood",
        ));

    let rings: [(f32, f32, &str, MeshKind); 6] = [
        (2.0, 0.6, "ltbluePlastic", MeshKind::Torus),
        (1.75, 1.7, "bluePlastic", MeshKind::Torus),
        (1.5, 2.65, "magentaPlastic", MeshKind::Torus),
        (1.25, 3.4, "redPlastic", MeshKind::Torus),
        (1.0, 4.05, "orangePlastic", MeshKind::Torus),
        (0.75, 4.6, "greenPlastic", MeshKind::ExtraTorus),
    ];
    for (i, (size, y, tag, mesh)) in rings.into_iter().enumerate() {
        scene.push(textured(
            &format!("ring {}", i + 1),
            mesh,
            [size, size, size],
            UPRIGHT,
            [10.0, y, -1.5],
            tag,
        ));
    }
}

fn bead_maze(scene: &mut SceneDescription) {
    scene.push(textured(
        "maze base",
        MeshKind::Box,
        [1.0, 0.75, 10.0],
        [0.0, 90.0, 0.0],
        [0.0, 0.35, -3.5],
        "oakWood",
    ));

    let rods: [([f32; 3], f32, [f32; 3]); 6] = [
        ([0.05, 5.0, 0.05], 0.0, [4.25, 0.75, -3.5]),
        ([0.05, 5.0, 0.05], 0.0, [-4.25, 0.75, -3.5]),
        ([0.05, 8.1, 0.05], 90.0, [4.05, 5.95, -3.5]),
        ([0.05, 3.0, 0.05], 0.0, [2.5, 0.75, -3.5]),
        ([0.05, 3.0, 0.05], 0.0, [-2.5, 0.75, -3.5]),
        ([0.05, 4.75, 0.05], 90.0, [2.375, 3.95, -3.5]),
    ];
    for (i, (scale, z, position)) in rods.into_iter().enumerate() {
        scene.push(
            textured(&format!("maze rod {}", i + 1), MeshKind::Cylinder, scale, [0.0, 0.0, z], position, "steelTexture")
                .with_uv_scale(0.1, 0.1),
        );
    }

    let bends: [(f32, [f32; 3]); 4] = [
        (0.0, [4.05, 5.75, -3.5]),
        (90.0, [-4.05, 5.75, -3.5]),
        (0.0, [2.3, 3.75, -3.5]),
        (90.0, [-2.3, 3.75, -3.5]),
    ];
    for (i, (z, position)) in bends.into_iter().enumerate() {
        scene.push(
            textured(
                &format!("maze bend {}", i + 1),
                MeshKind::QuarterTorus,
                [0.2, 0.2, 0.175],
                [0.0, 0.0, z],
                position,
                "steelTexture",
            )
            .with_uv_scale(0.1, 0.1),
        );
    }

    let beads: [(f32, f32, &str); 10] = [
        (4.25, 1.5, "bluePlastic"),
        (4.25, 3.0, "ltbluePlastic"),
        (4.25, 4.5, "greenPlastic"),
        (-4.25, 1.5, "redPlastic"),
        (-4.25, 3.0, "orangePlastic"),
        (2.375, 1.5, "magentaPlastic"),
        (2.375, 3.0, "redPlastic"),
        (0.75, 3.95, "orangePlastic"),
        (-0.75, 3.95, "greenPlastic"),
        (-2.375, 1.5, "ltbluePlastic"),
    ];
    for (i, (x, y, tag)) in beads.into_iter().enumerate() {
        scene.push(
            textured(&format!("bead {}", i + 1), MeshKind::Sphere, [0.75; 3], NO_ROTATION, [x, y, -3.5], tag)
                .with_uv_scale(0.5, 0.5),
        );
    }
}

fn letter_blocks(scene: &mut SceneDescription) {
    let blocks: [(&str, f32, [f32; 3], [f32; 3], Option<f32>); 3] = [
        ("letterA", 15.0, [-0.75, 1.0, 0.75], [-0.7501, 1.01, 0.7501], Some(1.0)),
        ("letterB", 45.0, [2.0, 1.0, 0.0], [2.01, 1.01, 0.01], Some(1.0)),
        // The C overlay keeps the block's UV scale.
        ("letterC", 25.0, [0.75, 3.0, 0.75], [0.7501, 3.01, 0.7501], None),
    ];
    for (tag, y, block, overlay, overlay_uv) in blocks {
        scene.push(
            textured(&format!("{tag} block"), MeshKind::Box, [2.0; 3], [0.0, y, 0.0], block, "ashWood")
                .with_uv_scale(1.0, 1.0),
        );
        let mut letter = textured(&format!("{tag} overlay"), MeshKind::Box, [2.01; 3], [0.0, y, 0.0], overlay, tag);
        letter.uv_scale = overlay_uv.map(|s| [s, s]);
        scene.push(letter);
    }
}

/// Milestone 7 lit by a key and a fill light, with wood, metal and plastic
/// materials on the textured objects.
pub fn milestone_final_lit() -> SceneDescription {
    let mut scene = milestone_final();
    scene.name = "7-lit".into();
    scene.materials = vec![
        ObjectMaterial::new("wood")
            .with_ambient([0.4, 0.3, 0.1], 0.2)
            .with_diffuse([0.3, 0.2, 0.1])
            .with_specular([0.1, 0.1, 0.1], 0.3),
        ObjectMaterial::new("metal")
            .with_ambient([0.2, 0.2, 0.2], 0.3)
            .with_diffuse([0.3, 0.3, 0.3])
            .with_specular([0.7, 0.7, 0.8], 52.0),
        ObjectMaterial::new("plastic")
            .with_ambient([0.2, 0.2, 0.2], 0.2)
            .with_diffuse([0.5, 0.5, 0.5])
            .with_specular([0.4, 0.4, 0.4], 22.0),
    ];
    scene.lights = vec![
        LightSource::white([-8.0, 12.0, 8.0]),
        LightSource {
            diffuse: [0.3, 0.3, 0.35],
            specular: [0.1, 0.1, 0.1],
            ..LightSource::white([10.0, 6.0, 10.0])
        },
    ];
    for object in &mut scene.objects {
        if let Appearance::Texture { tag, material } = &mut object.appearance {
            *material = Some(material_for(tag).to_string());
        }
    }
    scene
}

fn material_for(tag: &str) -> &'static str {
    if tag.ends_with("Wood") || tag.starts_with("letter") {
        "wood"
    } else if tag.ends_with("Plastic") {
        "plastic"
    } else {
        "metal"
    }
}
