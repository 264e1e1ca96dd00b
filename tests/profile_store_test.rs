//! Integration tests for ProfileStore

use clubmatch::{
    demo_profile, ClubMatchError, NewProfile, PersonalityTrait, Profile, ProfileStore, Rank,
    Region, DEMO_PROFILE_ID,
};
use tempfile::tempdir;

fn draft(name: &str, region: Region) -> NewProfile {
    NewProfile {
        name: name.to_string(),
        employee_number: "E2024001".to_string(),
        region,
        rank: Rank::Manager,
        interests: vec!["축구".to_string(), " 독서 ".to_string(), "축구".to_string()],
        survey_answers: vec![5, 1, 5, 1, 5],
    }
}

#[test]
fn test_load_seeds_demo_profile() {
    let dir = tempdir().unwrap();
    let store = ProfileStore::new(dir.path().join("users.json"));

    let profiles = store.load().unwrap();
    assert_eq!(profiles.len(), 1);
    assert_eq!(profiles[0].id, DEMO_PROFILE_ID);

    // Persisted, so a second load does not add another
    assert_eq!(store.load().unwrap().len(), 1);
}

#[test]
fn test_demo_profile_shape() {
    let demo = demo_profile();
    assert_eq!(demo.region, Region::Seoul);
    assert_eq!(demo.rank, Rank::Staff);
    assert_eq!(demo.personality_trait, PersonalityTrait::Neutral);
    assert_eq!(demo.interests, vec!["축구", "영화보기"]);
}

#[test]
fn test_register() {
    let dir = tempdir().unwrap();
    let store = ProfileStore::new(dir.path().join("users.json"));

    let profile = store.register(draft("김서준", Region::Busan)).unwrap();

    assert!(profile.id.starts_with("u_"));
    assert_eq!(profile.personality_trait, PersonalityTrait::Extrovert);
    assert_eq!(profile.interests, vec!["축구", "독서"]);
    assert_eq!(store.get(&profile.id).unwrap(), profile);
    assert_eq!(store.load().unwrap().len(), 2);
}

#[test]
fn test_register_rejects_duplicate_in_region() {
    let dir = tempdir().unwrap();
    let store = ProfileStore::new(dir.path().join("users.json"));
    store.register(draft("김서준", Region::Busan)).unwrap();

    let result = store.register(draft(" 김서준 ", Region::Busan));
    assert!(matches!(result, Err(ClubMatchError::DuplicateProfile { .. })));

    // Same name elsewhere is fine
    assert!(store.register(draft("김서준", Region::Daegu)).is_ok());
}

#[test]
fn test_register_rejects_bad_survey() {
    let dir = tempdir().unwrap();
    let store = ProfileStore::new(dir.path().join("users.json"));

    let mut bad = draft("이민준", Region::Seoul);
    bad.survey_answers = vec![3, 3];
    assert!(matches!(
        store.register(bad),
        Err(ClubMatchError::InvalidSurvey { .. })
    ));
    assert_eq!(store.load().unwrap().len(), 1);
}

#[test]
fn test_update() {
    let dir = tempdir().unwrap();
    let store = ProfileStore::new(dir.path().join("users.json"));
    let profile = store.register(draft("김서준", Region::Busan)).unwrap();

    let mut edit = draft("김서준", Region::Busan);
    edit.survey_answers = vec![1, 5, 1, 5, 1];
    edit.rank = Rank::GeneralManager;
    let updated = store.update(&profile.id, edit).unwrap();

    assert_eq!(updated.id, profile.id);
    assert_eq!(updated.rank, Rank::GeneralManager);
    assert_eq!(updated.personality_trait, PersonalityTrait::Introvert);
    assert_eq!(store.get(&profile.id).unwrap(), updated);

    assert!(matches!(
        store.update("missing", draft("박서연", Region::Seoul)),
        Err(ClubMatchError::ProfileNotFound(_))
    ));
}

#[test]
fn test_delete_keeps_demo() {
    let dir = tempdir().unwrap();
    let store = ProfileStore::new(dir.path().join("users.json"));
    let profile = store.register(draft("김서준", Region::Busan)).unwrap();

    store.delete(&profile.id).unwrap();
    assert!(matches!(
        store.get(&profile.id),
        Err(ClubMatchError::ProfileNotFound(_))
    ));

    store.delete(DEMO_PROFILE_ID).unwrap();
    assert!(store.get(DEMO_PROFILE_ID).is_ok());

    assert!(store.delete("missing").is_err());
}

#[test]
fn test_add_many_and_reset() {
    let dir = tempdir().unwrap();
    let store = ProfileStore::new(dir.path().join("users.json"));

    let extra: Vec<Profile> = (0..3)
        .map(|i| {
            Profile::new(
                format!("p{i}"),
                Region::Seoul,
                Rank::Staff,
                PersonalityTrait::Neutral,
                ["축구"],
            )
        })
        .collect();
    assert_eq!(store.add_many(extra).unwrap(), 3);
    assert_eq!(store.load().unwrap().len(), 4);

    store.reset().unwrap();
    let profiles = store.load().unwrap();
    assert_eq!(profiles.len(), 1);
    assert_eq!(profiles[0].id, DEMO_PROFILE_ID);
}
