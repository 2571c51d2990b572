// tests/manifest_pipeline.rs
use exploded_assembly::{
    ArrowHandle, ArrowIndicator, AssemblyPlanner, FramingResult, LayoutConfig, LayoutError,
    MANIFEST_FILE, ManualGenerator, Manifest, Palette, Part, Scene, SceneError, estimate_minutes,
    title_from_model_id,
};
use glam::Vec3;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

fn named_parts() -> Vec<Part> {
    [
        ("Leg 1", "leg", Vec3::new(0.0, 0.0, 0.0)),
        ("Leg 2", "leg", Vec3::new(1.0, 0.0, 0.0)),
        ("Seat 1", "seat", Vec3::new(0.0, 1.0, 0.0)),
        ("Screw 1", "screw", Vec3::new(1.0, 1.0, 0.0)),
    ]
    .into_iter()
    .enumerate()
    .map(|(i, (name, category, pos))| {
        Part::new(format!("obj{i}"), pos, Vec3::splat(0.5))
            .with_name(name)
            .with_number(format!("P{:03}", i + 1))
            .with_category(category)
    })
    .collect()
}

fn two_step_plan(parts: &[Part]) -> exploded_assembly::AssemblyPlan {
    AssemblyPlanner::new(LayoutConfig {
        target_steps: 2,
        ..LayoutConfig::default()
    })
    .plan(parts)
    .unwrap()
}

#[test]
fn test_manifest_fields() {
    let parts = named_parts();
    let plan = two_step_plan(&parts);
    let manifest = Manifest::assemble("office_chair", &parts, &plan).unwrap();

    assert_eq!(manifest.model_id, "office_chair");
    assert_eq!(manifest.title, "Office Chair");
    assert!(manifest.has_parts_diagram);
    assert_eq!(manifest.time_estimate, "8 minutes");

    assert_eq!(manifest.parts.len(), 4);
    assert_eq!(manifest.parts[2].name, "Seat 1");
    assert_eq!(manifest.parts[2].number, "P003");
    assert_eq!(manifest.parts[2].part_type, "seat");
    assert_eq!(manifest.parts[2].quantity, 1);

    // Two assembly steps plus the closing entry.
    assert_eq!(manifest.steps.len(), 3);
    assert_eq!(manifest.steps[0].image, "step00.png");
    assert_eq!(manifest.steps[0].parts_added_ids, ["P001", "P002"]);
    assert_eq!(manifest.steps[1].parts_added_ids, ["P003", "P004"]);

    let last = &manifest.steps[2];
    assert_eq!(last.image, "final_assembly.png");
    assert_eq!(last.caption, "Assembly complete.");
    assert!(last.parts_added_ids.is_empty());
}

#[test]
fn test_manifest_json_shape() {
    let parts = named_parts();
    let plan = two_step_plan(&parts);
    let manifest = Manifest::assemble("office_chair", &parts, &plan).unwrap();

    let value: serde_json::Value = serde_json::from_str(&manifest.to_json_pretty().unwrap()).unwrap();
    for key in ["model_id", "title", "parts", "steps", "has_parts_diagram", "time_estimate"] {
        assert!(value.get(key).is_some(), "missing key {key}");
    }
    let part = &value["parts"][0];
    assert_eq!(part["type"], "leg");
    assert_eq!(part["number"], "P001");
    assert!(part.get("part_type").is_none());
    assert_eq!(value["steps"][0]["caption"], "Start assembly with: Leg 1 (P001), Leg 2 (P002).");
}

#[test]
fn test_blank_fields_default_to_na() {
    let parts = vec![
        Part::new("x", Vec3::ZERO, Vec3::ONE)
            .with_name("")
            .with_number("  ")
            .with_category(""),
    ];
    let plan = AssemblyPlanner::default().plan(&parts).unwrap();
    let manifest = Manifest::assemble("", &parts, &plan).unwrap();

    assert_eq!(manifest.model_id, "N/A");
    assert_eq!(manifest.title, "N/A");
    assert_eq!(manifest.parts[0].name, "N/A");
    assert_eq!(manifest.parts[0].number, "N/A");
    assert_eq!(manifest.parts[0].part_type, "N/A");
    assert_eq!(manifest.steps[0].parts_added_ids, ["N/A"]);
}

#[test]
fn test_title_and_time_estimate() {
    assert_eq!(title_from_model_id("office_chair"), "Office Chair");
    assert_eq!(title_from_model_id("TABLE__v2"), "Table V2");
    assert_eq!(estimate_minutes(1, 1), 5);
    assert_eq!(estimate_minutes(10, 4), 18);
}

#[test]
fn test_manifest_write_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join(MANIFEST_FILE);

    let parts = named_parts();
    let manifest = Manifest::assemble("desk", &parts, &two_step_plan(&parts)).unwrap();
    manifest.write_to(&path).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    let loaded: Manifest = serde_json::from_str(&text).unwrap();
    assert_eq!(loaded, manifest);
}

/// In-memory host that records what the generator asked it to do.
#[derive(Default)]
struct RecordingScene {
    parts: Vec<Part>,
    fail_import: bool,
    fail_arrows: bool,
    positions: BTreeMap<String, Vec3>,
    visible: BTreeMap<String, bool>,
    live_arrows: BTreeSet<u64>,
    next_arrow: u64,
    spawned: usize,
    despawned: usize,
    cameras: usize,
    /// Rendered file name with the ids visible at that moment.
    renders: Vec<(String, Vec<String>)>,
    positions_at_render: Vec<BTreeMap<String, Vec3>>,
}

impl RecordingScene {
    fn with_parts(parts: Vec<Part>) -> Self {
        Self {
            parts,
            ..Self::default()
        }
    }

    fn rendered_files(&self) -> Vec<&str> {
        self.renders.iter().map(|(f, _)| f.as_str()).collect()
    }
}

impl Scene for RecordingScene {
    fn import_model(&mut self, path: &Path) -> Result<Vec<Part>, SceneError> {
        if self.fail_import {
            return Err(SceneError::Import(format!("cannot read {}", path.display())));
        }
        Ok(self.parts.clone())
    }

    fn set_part_position(&mut self, part_id: &str, position: Vec3) -> Result<(), SceneError> {
        self.positions.insert(part_id.to_string(), position);
        Ok(())
    }

    fn set_part_visible(&mut self, part_id: &str, visible: bool) -> Result<(), SceneError> {
        self.visible.insert(part_id.to_string(), visible);
        Ok(())
    }

    fn spawn_arrow(
        &mut self,
        _arrow: &ArrowIndicator,
        _palette: &Palette,
    ) -> Result<ArrowHandle, SceneError> {
        if self.fail_arrows {
            return Err(SceneError::Resource("no arrow material".into()));
        }
        self.next_arrow += 1;
        self.spawned += 1;
        self.live_arrows.insert(self.next_arrow);
        Ok(ArrowHandle(self.next_arrow))
    }

    fn despawn_arrow(&mut self, handle: ArrowHandle) {
        assert!(self.live_arrows.remove(&handle.0), "unknown arrow {handle:?}");
        self.despawned += 1;
    }

    fn set_camera(&mut self, _framing: &FramingResult) {
        self.cameras += 1;
    }

    fn render_frame(&mut self, output: &Path) -> Result<(), SceneError> {
        let file = output
            .file_name()
            .and_then(|f| f.to_str())
            .ok_or_else(|| SceneError::Render {
                path: output.to_path_buf(),
                reason: "no file name".into(),
            })?
            .to_string();
        let shown = self
            .visible
            .iter()
            .filter(|(_, v)| **v)
            .map(|(id, _)| id.clone())
            .collect();
        self.renders.push((file, shown));
        self.positions_at_render.push(self.positions.clone());
        Ok(())
    }
}

/// Imported out of assembly order: top, bottom, middle.
fn stacked_parts() -> Vec<Part> {
    vec![
        Part::new("top", Vec3::new(0.0, 0.0, 2.0), Vec3::ONE),
        Part::new("bottom", Vec3::new(0.0, 0.0, 0.0), Vec3::ONE),
        Part::new("mid", Vec3::new(0.0, 0.0, 1.0), Vec3::ONE),
    ]
}

fn model_path() -> PathBuf {
    PathBuf::from("models/office_chair.blend")
}

#[test]
fn test_end_to_end_render_sequence() {
    let out = tempfile::tempdir().unwrap();
    let mut scene = RecordingScene::with_parts(stacked_parts());

    let manifest = ManualGenerator::new(LayoutConfig::default())
        .run(&mut scene, &model_path(), out.path())
        .expect("generation succeeds");

    assert_eq!(
        scene.rendered_files(),
        [
            "overview.png",
            "parts_diagram.png",
            "step00.png",
            "step01.png",
            "step02.png",
            "final_assembly.png"
        ]
    );
    assert_eq!(scene.cameras, 6);

    // Parts are assembled bottom to top.
    assert_eq!(scene.renders[2].1, ["bottom"]);
    assert_eq!(scene.renders[3].1, ["bottom", "mid"]);
    assert_eq!(scene.renders[4].1, ["bottom", "mid", "top"]);

    // One arrow per added part, all cleaned up.
    assert_eq!(scene.spawned, 3);
    assert_eq!(scene.despawned, 3);
    assert!(scene.live_arrows.is_empty());

    // Assembled parts are back at their base positions in later steps.
    let step02 = &scene.positions_at_render[4];
    assert_eq!(step02["bottom"], Vec3::ZERO);
    assert_eq!(step02["mid"], Vec3::new(0.0, 0.0, 1.0));
    let last = &scene.positions_at_render[5];
    assert_eq!(last["top"], Vec3::new(0.0, 0.0, 2.0));

    assert_eq!(manifest.model_id, "office_chair");
    assert_eq!(manifest.title, "Office Chair");
    assert_eq!(manifest.time_estimate, "9 minutes");
    assert_eq!(manifest.steps.len(), 4);
    assert_eq!(manifest.steps[0].caption, "Start assembly with: Part 1 (P001).");
    assert_eq!(manifest.steps[1].caption, "Attach Part 2 (P002) as shown.");
    assert_eq!(manifest.parts[0].name, "Part 1");

    let written: Manifest =
        serde_json::from_str(&std::fs::read_to_string(out.path().join(MANIFEST_FILE)).unwrap())
            .unwrap();
    assert_eq!(written, manifest);
}

#[test]
fn test_import_failure_is_fatal() {
    let out = tempfile::tempdir().unwrap();
    let mut scene = RecordingScene {
        fail_import: true,
        ..RecordingScene::default()
    };

    let err = ManualGenerator::new(LayoutConfig::default())
        .run(&mut scene, &model_path(), out.path())
        .unwrap_err();
    assert!(matches!(err, LayoutError::ModelImport { .. }));
    assert!(scene.renders.is_empty());
    assert!(!out.path().join(MANIFEST_FILE).exists());
}

#[test]
fn test_empty_model_is_fatal() {
    let out = tempfile::tempdir().unwrap();
    let mut scene = RecordingScene::default();

    let err = ManualGenerator::new(LayoutConfig::default())
        .run(&mut scene, &model_path(), out.path())
        .unwrap_err();
    assert!(matches!(err, LayoutError::EmptyPartList));
    assert!(scene.renders.is_empty());
}

#[test]
fn test_arrow_failures_do_not_abort() {
    let out = tempfile::tempdir().unwrap();
    let mut scene = RecordingScene {
        fail_arrows: true,
        ..RecordingScene::with_parts(stacked_parts())
    };

    let manifest = ManualGenerator::new(LayoutConfig::default())
        .run(&mut scene, &model_path(), out.path())
        .expect("arrow failures are not fatal");

    assert_eq!(scene.renders.len(), 6);
    assert_eq!(scene.despawned, 0);
    assert_eq!(manifest.steps.len(), 4);
    assert!(out.path().join(MANIFEST_FILE).exists());
}
