//! Tests for reports module

use clubmatch::*;
use std::collections::BTreeMap;

fn member(id: &str, name: &str, rank: Rank, interests: &[&str]) -> Profile {
    let interests = interests.iter().copied();
    let mut p = Profile::new(id, Region::Seoul, rank, PersonalityTrait::Neutral, interests);
    p.name = name.to_string();
    p
}

fn roster() -> Vec<Profile> {
    vec![
        member("a", "김서준", Rank::Staff, &["축구", "영화보기"]),
        member("b", "이민준", Rank::Manager, &["축구"]),
        member("c", "박서연", Rank::GeneralManager, &["축구", "요리"]),
        member("d", "최지후", Rank::Staff, &["축구"]),
        member("e", "정하윤", Rank::AssistantManager, &["축구", "등산"]),
        member("x", "강지우", Rank::Staff, &["독서"]),
    ]
}

fn club(id: &str, members: &[&str]) -> Club {
    Club {
        id: id.to_string(),
        name: format!("서울 축구 클럽 {id}"),
        member_ids: members.iter().map(|m| m.to_string()).collect(),
        leader_id: members[0].to_string(),
        primary_interest: Some("축구".to_string()),
        status: ClubStatus::Matched,
        chat_link: None,
        match_score_breakdown: None,
        explanations: BTreeMap::new(),
        match_run_id: Some("run-1".to_string()),
        guaranteed: false,
        created_at: "2024-05-01T09:00:00Z".to_string(),
        updated_at: "2024-05-01T09:00:00Z".to_string(),
    }
}

#[test]
fn test_create_report() {
    let report = create_report("club-1", "2024-05-03", "photo.jpg", "축구 경기", Some(4));

    assert!(report.id.starts_with("rep_"));
    assert_eq!(report.status, ReportStatus::Pending);
    assert_eq!(
        report.formatted_report,
        "활동일자: 2024-05-03, 참여인원: 4, 활동내용: 축구 경기"
    );
    assert!(report.points_awarded.is_none());
}

#[test]
fn test_create_report_without_participants() {
    let report = create_report("club-1", "2024-05-03", "", "산책", None);
    assert!(report.formatted_report.contains("참여인원: N/A"));
}

#[test]
fn test_verify_scores_report() {
    let profiles = roster();
    let club = club("c1", &["a", "b", "c", "d", "e"]);
    let text = "축구 시합 후 다 같이 영화보기";
    let mut report = create_report("c1", "2024-05-03", "p.jpg", text, Some(4));

    let points = verify_report(&mut report, &club, &profiles, 10);

    let metrics = report.verification_metrics.clone().expect("metrics recorded");
    assert_eq!(metrics.interest, 2);
    assert!((metrics.participation - 0.8).abs() < 1e-9);
    let detail = text.chars().count() as f64 / 50.0;
    assert!((metrics.detail - detail).abs() < 1e-9);

    let expected = 10 + 5 * 2 + 8 + (5.0 * detail).round() as u32;
    assert_eq!(points, expected);
    assert_eq!(report.points_awarded, Some(points));
    assert_eq!(report.status, ReportStatus::Verified);
    assert!(report.verified_at.is_some());
}

#[test]
fn test_verify_ignores_non_member_interests() {
    let profiles = roster();
    let club = club("c1", &["a", "b", "c", "d", "e"]);
    let mut report = create_report("c1", "2024-05-03", "", "독서 모임", None);

    verify_report(&mut report, &club, &profiles, 0);
    let metrics = report.verification_metrics.unwrap();
    assert_eq!(metrics.interest, 0);
    assert_eq!(metrics.participation, 0.0);
}

#[test]
fn test_participation_capped() {
    let profiles = roster();
    let club = club("c1", &["a", "b", "c", "d", "e"]);
    let mut report = create_report("c1", "2024-05-03", "", "요리", Some(12));

    verify_report(&mut report, &club, &profiles, 0);
    assert_eq!(report.verification_metrics.unwrap().participation, 1.0);
}

#[test]
fn test_reverify_keeps_award() {
    let profiles = roster();
    let club = club("c1", &["a", "b", "c", "d", "e"]);
    let mut report = create_report("c1", "2024-05-03", "", "축구", Some(5));

    let first = verify_report(&mut report, &club, &profiles, 10);
    let second = verify_report(&mut report, &club, &profiles, 100);
    assert_eq!(first, second);
}

#[test]
fn test_points_saturate() {
    let profiles = roster();
    let club = club("c1", &["a", "b", "c", "d", "e"]);
    let mut report = create_report("c1", "2024-05-03", "", "축구 영화보기", Some(5));

    let points = verify_report(&mut report, &club, &profiles, u32::MAX - 1);
    assert_eq!(points, u32::MAX);

    let mut other = create_report("c1", "2024-05-04", "", "축구", Some(5));
    verify_report(&mut other, &club, &profiles, u32::MAX);
    assert_eq!(club_points(&[report, other]).get("c1"), Some(&u32::MAX));
}

#[test]
fn test_unverify() {
    let profiles = roster();
    let club = club("c1", &["a", "b", "c", "d", "e"]);
    let mut report = create_report("c1", "2024-05-03", "", "축구", Some(5));
    verify_report(&mut report, &club, &profiles, 10);

    unverify_report(&mut report);
    assert_eq!(report.status, ReportStatus::Pending);
    assert!(report.points_awarded.is_none());
    assert!(report.verification_metrics.is_none());
}

#[test]
fn test_club_points_only_verified() {
    let profiles = roster();
    let c1 = club("c1", &["a", "b", "c", "d", "e"]);

    let mut verified = create_report("c1", "2024-05-03", "", "축구", Some(5));
    let awarded = verify_report(&mut verified, &c1, &profiles, 10);
    let pending = create_report("c1", "2024-05-04", "", "축구", Some(5));

    let points = club_points(&[verified, pending]);
    assert_eq!(points.get("c1"), Some(&awarded));
}

#[test]
fn test_top_clubs_order_and_labels() {
    let profiles = roster();
    let c1 = club("c1", &["a", "b"]);
    let c2 = club("c2", &["c", "d"]);
    let c3 = club("c3", &["e", "x"]);

    let mut r1 = create_report("c1", "2024-05-03", "", "", None);
    let mut r2 = create_report("c2", "2024-05-03", "", "", None);
    let mut r3 = create_report("c3", "2024-05-03", "", "", None);
    verify_report(&mut r1, &c1, &profiles, 10);
    verify_report(&mut r2, &c2, &profiles, 30);
    verify_report(&mut r3, &c3, &profiles, 10);

    let top = top_clubs(&[c1, c2, c3], &[r1, r2, r3], &profiles, 10);

    let ids: Vec<&str> = top.iter().map(|s| s.club_id.as_str()).collect();
    assert_eq!(ids, vec!["c2", "c1", "c3"]);
    assert_eq!(top[0].label, "박서연 팀");
    assert_eq!(top[0].points, 30);

    let limited = top_clubs(&[club("c1", &["a"])], &[], &profiles, 1);
    assert!(limited.is_empty());
}

#[test]
fn test_system_analytics() {
    let profiles = roster();
    let mut c1 = club("c1", &["a", "b", "c"]);
    c1.status = ClubStatus::Active;
    let c2 = club("c2", &["d", "e"]);

    let mut verified = create_report("c1", "2024-05-03", "", "", None);
    let awarded = verify_report(&mut verified, &c1, &profiles, 10);
    let pending = create_report("c2", "2024-05-03", "", "", None);

    let run = MatchRun {
        id: "run-1".to_string(),
        created_at: "2024-05-01T09:00:00Z".to_string(),
        target_size: 5,
        user_count: 6,
        club_count: 2,
        superseded: false,
    };

    let analytics = SystemAnalytics::compute(&profiles, &[c1, c2], &[run], &[verified, pending]);

    assert_eq!(analytics.total_users, 6);
    assert_eq!(analytics.total_clubs, 2);
    assert_eq!(analytics.active_clubs, 1);
    assert_eq!(analytics.total_match_runs, 1);
    assert_eq!(analytics.pending_reports, 1);
    assert_eq!(analytics.verified_reports, 1);
    assert_eq!(analytics.total_points_awarded, awarded);
    // c1 has ranks {Staff, Manager, GeneralManager}, c2 {Staff, AssistantManager}
    assert!((analytics.avg_rank_diversity - 2.5).abs() < 1e-9);
    // c1 interests {축구, 영화보기, 요리}, c2 {축구, 등산}
    assert!((analytics.avg_interest_variety - 2.5).abs() < 1e-9);
}

#[test]
fn test_system_analytics_empty() {
    let analytics = SystemAnalytics::compute(&[], &[], &[], &[]);
    assert_eq!(analytics, SystemAnalytics::default());
}
