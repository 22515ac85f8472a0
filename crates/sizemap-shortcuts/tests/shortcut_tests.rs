use std::fs;

use sizemap_core::{SizeOrigin, TreeNode};
use sizemap_shortcuts::{FILES_DIR, FOLDERS_DIR, ShortcutConfig, ShortcutFormat, generate};
use tempfile::TempDir;

const MIB: u64 = 1024 * 1024;

fn sample_tree() -> TreeNode {
    TreeNode::directory(
        "home",
        "/home/me",
        vec![
            TreeNode::directory(
                "Videos",
                "/home/me/Videos",
                vec![TreeNode::file("holiday.mp4", "/home/me/Videos/holiday.mp4", 700 * MIB)],
            ),
            TreeNode::file("disk.img", "/home/me/disk.img", 300 * MIB),
            TreeNode::unexpanded("cache", "/home/me/cache", 5 * MIB, SizeOrigin::DepthLimit),
        ],
    )
}

fn sorted_names(dir: &std::path::Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[test]
fn test_generates_ranked_shortcuts() {
    let temp = TempDir::new().unwrap();
    let out = temp.path().join("shortcuts");
    let config = ShortcutConfig::new(&out, 3).with_format(ShortcutFormat::Webloc);

    let summary = generate(&sample_tree(), &config).unwrap();

    assert_eq!(summary.created, 3);
    assert_eq!(summary.failed, 0);
    assert_eq!(
        sorted_names(&out.join(FOLDERS_DIR)),
        vec!["001_1005MB_home.webloc", "002_700MB_Videos.webloc"]
    );
    assert_eq!(
        sorted_names(&out.join(FILES_DIR)),
        vec!["003_700MB_holiday.mp4.webloc"]
    );

    let body = fs::read_to_string(&summary.files[1]).unwrap();
    assert!(body.contains("file:///home/me/Videos"));
}

#[test]
fn test_replaces_previous_output() {
    let temp = TempDir::new().unwrap();
    let out = temp.path().join("shortcuts");
    fs::create_dir_all(out.join("stale")).unwrap();
    fs::write(out.join("stale/old.webloc"), "old").unwrap();

    let config = ShortcutConfig::new(&out, 1).with_format(ShortcutFormat::Desktop);
    generate(&sample_tree(), &config).unwrap();

    assert!(!out.join("stale").exists());
    assert_eq!(sorted_names(&out), vec![FILES_DIR, FOLDERS_DIR]);
    assert_eq!(
        sorted_names(&out.join(FOLDERS_DIR)),
        vec!["001_1005MB_home.desktop"]
    );
}

#[test]
fn test_count_larger_than_tree() {
    let temp = TempDir::new().unwrap();
    let config = ShortcutConfig::new(temp.path().join("s"), 50);
    let summary = generate(&sample_tree(), &config).unwrap();
    assert_eq!(summary.created, 5);
}
