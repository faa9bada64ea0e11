use super::*;

use crate::foundation::error::InvalidConfigReason;

fn norm(raw: &str) -> String {
    normalize_package_path(raw, DEFAULT_CANONICAL_ROOT).unwrap()
}

#[test]
fn root_is_prepended_once() {
    assert_eq!(norm("Textures"), "/Game/Textures");
    assert_eq!(norm("/Textures"), "/Game/Textures");
    assert_eq!(norm("Game/Textures"), "/Game/Textures");
    assert_eq!(norm("/Game/Textures"), "/Game/Textures");
}

#[test]
fn separators_are_cleaned_up() {
    assert_eq!(norm("Game\\Textures\\Rock"), "/Game/Textures/Rock");
    assert_eq!(norm("//Game//Textures///"), "/Game/Textures");
    assert_eq!(norm("./Textures/./Rock/"), "/Game/Textures/Rock");
    assert_eq!(norm("  /Game/Textures  "), "/Game/Textures");
}

#[test]
fn empty_path_lands_at_root() {
    assert_eq!(norm(""), "/Game");
    assert_eq!(norm("///"), "/Game");
    assert_eq!(normalize_package_path("", "/").unwrap(), "/");
}

#[test]
fn parent_segments_are_rejected() {
    for raw in ["../Textures", "/Game/../Engine", "Textures\\..\\x"] {
        assert!(matches!(
            normalize_package_path(raw, DEFAULT_CANONICAL_ROOT),
            Err(BakeError::InvalidConfig(InvalidConfigReason::InvalidSettings(_)))
        ));
    }
}

#[test]
fn root_match_is_by_whole_segment() {
    assert_eq!(norm("GameData/Tex"), "/Game/GameData/Tex");
    assert_eq!(
        normalize_package_path("Tex", "/Project/Content").unwrap(),
        "/Project/Content/Tex"
    );
}

#[test]
fn asset_path_builds_identifier() {
    let p = AssetPath::new("Game/Textures", "T_Test", DEFAULT_CANONICAL_ROOT).unwrap();
    assert_eq!(p.package(), "/Game/Textures");
    assert_eq!(p.name(), "T_Test");
    assert_eq!(p.identifier(), "/Game/Textures/T_Test");
    assert_eq!(p.to_string(), "/Game/Textures/T_Test");
    assert_eq!(p.segments_below(DEFAULT_CANONICAL_ROOT), vec!["Textures"]);

    let at_root = AssetPath::new("", "T_Root", "/").unwrap();
    assert_eq!(at_root.identifier(), "/T_Root");
}

#[test]
fn asset_name_must_be_a_single_segment() {
    for name in ["", "  ", "a/b", "a\\b", ".."] {
        assert!(AssetPath::new("/Game", name, DEFAULT_CANONICAL_ROOT).is_err());
    }
}

#[test]
fn asset_id_is_stable_per_identifier() {
    let a = AssetPath::new("Textures", "T_A", DEFAULT_CANONICAL_ROOT).unwrap();
    let same = AssetPath::new("/Game/Textures/", "T_A", DEFAULT_CANONICAL_ROOT).unwrap();
    let other = AssetPath::new("Textures", "T_B", DEFAULT_CANONICAL_ROOT).unwrap();
    assert_eq!(a, same);
    assert_eq!(a.asset_id(), same.asset_id());
    assert_ne!(a.asset_id(), other.asset_id());
    assert_eq!(AssetId::from_u64(a.asset_id().as_u64()), a.asset_id());
}
