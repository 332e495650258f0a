use std::f32::consts::FRAC_PI_4;

use skinning_rig::import::{MeshData, RawBone, SceneNodeDesc, VertexWeight, IDENTITY_ROWS};
use skinning_rig::{
    skin_position, AnimatedModel, Mat4, Mat4Extended, Quat, SceneData, SkinningConfig, Vec3,
};

/// Scene -> Root (bind at y=1) -> Hand (bind at x=2 from Root).
/// Both bones hold their bind translations; Hand turns 90 degrees about Y
/// over 10 ticks at 10 ticks per second.
const WAVE_SCENE: &str = r#"{
    "root": {
        "name": "Scene",
        "meshes": [0],
        "children": [
            {
                "name": "Root",
                "transform": [1,0,0,0, 0,1,0,1, 0,0,1,0, 0,0,0,1],
                "children": [
                    {
                        "name": "Hand",
                        "transform": [1,0,0,2, 0,1,0,0, 0,0,1,0, 0,0,0,1]
                    }
                ]
            }
        ]
    },
    "meshes": [
        {
            "name": "arm",
            "positions": [[0, 1, 0], [3, 1, 0], [2, 1, 0]],
            "normals": [[0, 0, 1], [0, 0, 1], [0, 0, 1]],
            "tex_coords": [[0, 0], [1, 0], [1, 1]],
            "faces": [[0, 1, 2]],
            "bones": [
                {
                    "name": "Root",
                    "offset_matrix": [1,0,0,0, 0,1,0,-1, 0,0,1,0, 0,0,0,1],
                    "weights": [ { "vertex_id": 0, "weight": 1.0 }, { "vertex_id": 2, "weight": 0.5 } ]
                },
                {
                    "name": "Hand",
                    "offset_matrix": [1,0,0,-2, 0,1,0,-1, 0,0,1,0, 0,0,0,1],
                    "weights": [ { "vertex_id": 1, "weight": 1.0 }, { "vertex_id": 2, "weight": 0.5 } ]
                }
            ],
            "diffuse_texture": "arm.png"
        }
    ],
    "animations": [
        {
            "name": "wave",
            "duration": 10.0,
            "ticks_per_second": 10.0,
            "channels": [
                {
                    "node_name": "Root",
                    "position_keys": [ { "time": 0.0, "value": [0, 1, 0] } ]
                },
                {
                    "node_name": "Hand",
                    "position_keys": [ { "time": 0.0, "value": [2, 0, 0] } ],
                    "rotation_keys": [
                        { "time": 0.0, "value": [0, 0, 0, 1] },
                        { "time": 10.0, "value": [0, 0.70710677, 0, 0.70710677] }
                    ]
                }
            ]
        }
    ]
}"#;

fn hand_expected(angle: f32) -> Mat4 {
    let root_global = Mat4::from_translation(Vec3::Y);
    let hand_local =
        Mat4::from_translation(Vec3::new(2.0, 0.0, 0.0)) * Mat4::from_quat(Quat::from_rotation_y(angle));
    let hand_offset = Mat4::from_translation(Vec3::new(-2.0, -1.0, 0.0));
    root_global * hand_local * hand_offset
}

#[test]
fn test_half_second_reaches_slerp_midpoint() {
    let mut model = AnimatedModel::from_json(WAVE_SCENE, SkinningConfig::default()).unwrap();

    let root = model.registry().find_bone("Root").unwrap();
    let hand = model.registry().find_bone("Hand").unwrap();
    assert_eq!(root.id.0, 0);
    assert_eq!(hand.id.0, 1);

    model.update_animation(0.5);
    assert!(
        (model.animation_time() - 5.0).abs() < 1e-5,
        "Expected tick 5, got {}",
        model.animation_time()
    );

    let hand_final = model.bone_transforms()[1];
    let expected = hand_expected(FRAC_PI_4);
    assert!(
        hand_final.approx_eq(&expected, 1e-5),
        "Hand final {:?} != {:?}",
        hand_final,
        expected
    );

    // Root sits at its bind translation, so it skins to identity
    assert!(model.bone_transforms()[0].approx_eq(&Mat4::IDENTITY, 1e-6));
    assert!(model
        .registry()
        .find_bone("Hand")
        .unwrap()
        .final_transformation
        .approx_eq(&expected, 1e-5));
}

#[test]
fn test_skinned_vertex_follows_hand() {
    let mut model = AnimatedModel::from_json(WAVE_SCENE, SkinningConfig::default()).unwrap();
    model.update_animation(0.5);

    let mesh = &model.meshes()[0];
    let eps = model.config().weight_epsilon;
    let tip = Vec3::from_array(mesh.vertices[1].position);
    let skinned = skin_position(tip, &mesh.skin[1], model.bone_transforms(), eps);

    // One unit along Hand's X axis, turned 45 degrees about Y, at y=1
    let s = FRAC_PI_4.sin();
    let expected = Vec3::new(2.0 + s, 1.0, -s);
    assert!(
        (skinned - expected).length() < 1e-5,
        "Skinned tip {:?} != {:?}",
        skinned,
        expected
    );

    // Root-weighted vertex does not move
    let base = Vec3::from_array(mesh.vertices[0].position);
    let skinned = skin_position(base, &mesh.skin[0], model.bone_transforms(), eps);
    assert!((skinned - base).length() < 1e-6);
}

#[test]
fn test_playback_loops() {
    let mut model = AnimatedModel::from_json(WAVE_SCENE, SkinningConfig::default()).unwrap();
    model.update_animation(0.5);
    model.update_animation(0.5);

    assert_eq!(model.animation_time(), 0.0);
    assert!(model.bone_transforms()[1].approx_eq(&hand_expected(0.0), 1e-5));

    for _ in 0..100 {
        model.update_animation(0.37);
        let t = model.animation_time();
        assert!((0.0..10.0).contains(&t), "Time {} escaped the clip", t);
    }
}

#[test]
fn test_mesh_buffers_from_json() {
    let model = AnimatedModel::from_json(WAVE_SCENE, SkinningConfig::default()).unwrap();
    let mesh = &model.meshes()[0];

    assert_eq!(mesh.indices, vec![0, 1, 2]);
    assert_eq!(mesh.vertices[1].tex_coords, [1.0, 0.0]);
    assert_eq!(mesh.skin[2].bone_ids, [0, 1, -1, -1]);
    assert_eq!(mesh.skin[2].weights, [0.5, 0.5, 0.0, 0.0]);
    assert_eq!(mesh.diffuse_texture.as_deref(), Some("arm.png"));
}

#[test]
fn test_texture_resolves_against_scene_file_directory() {
    let dir = std::env::temp_dir().join("skinning_rig_end_to_end");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("wave.json");
    std::fs::write(&path, WAVE_SCENE).unwrap();

    let model = AnimatedModel::from_json_file(&path, SkinningConfig::default()).unwrap();
    let expected = format!("{}/arm.png", dir.to_string_lossy());
    assert_eq!(
        model.meshes()[0].diffuse_texture.as_deref(),
        Some(expected.as_str())
    );
}

#[test]
fn test_no_clip_uses_bind_pose() {
    let mut scene = SceneData::from_json(WAVE_SCENE).unwrap();
    scene.animations.clear();
    let mut model = AnimatedModel::load(&scene, SkinningConfig::default()).unwrap();
    model.update_animation(0.5);

    for bone in model.registry().bones() {
        assert_eq!(model.bone_transforms()[bone.id.index()], bone.offset_matrix);
    }
}

#[test]
fn test_fifth_influence_is_dropped_end_to_end() {
    let names = ["B0", "B1", "B2", "B3", "B4"];
    let mut root = SceneNodeDesc::new("Scene");
    root.meshes.push(0);
    for name in names {
        root.children.push(SceneNodeDesc::new(name));
    }

    let mesh = MeshData {
        name: "crowded".to_string(),
        positions: vec![[0.0, 0.0, 0.0]],
        bones: names
            .iter()
            .map(|name| RawBone {
                name: name.to_string(),
                offset_matrix: IDENTITY_ROWS,
                weights: vec![VertexWeight {
                    vertex_id: 0,
                    weight: 0.2,
                }],
            })
            .collect(),
        ..Default::default()
    };
    let scene = SceneData {
        root: Some(root),
        meshes: vec![mesh],
        ..Default::default()
    };

    let model = AnimatedModel::load(&scene, SkinningConfig::default()).unwrap();
    assert_eq!(model.registry().bone_count(), 5);

    let skin = model.meshes()[0].skin[0];
    assert_eq!(skin.influence_count(), 4);
    assert_eq!(skin.bone_ids, [0, 1, 2, 3]);
}
