//! End-to-end queue status runs against a catalog-backed repository.

mod support;

use chrono::{NaiveDate, TimeZone, Utc};
use omp_qstatus::config::{ObservingWindow, QueueStatusConfig, SiteConfig};
use omp_qstatus::db::{LocalRepository, MsbCatalog};
use omp_qstatus::models::{MsbKey, WeatherBand};
use omp_qstatus::services::{
    build_report, group_queue_status, order_projects, query_queue_status, ProjectOrder,
    QueueStatus, QueueStatusError, QueueStatusRequest,
};

fn night() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
}

fn sample_repo() -> LocalRepository {
    LocalRepository::from_catalog(MsbCatalog::from_json_str(support::SAMPLE_CATALOG).unwrap())
}

fn run(repo: &LocalRepository, request: &QueueStatusRequest) -> Result<QueueStatus, QueueStatusError> {
    query_queue_status(
        repo,
        &SiteConfig::default(),
        &QueueStatusConfig::default(),
        request,
    )
}

#[test]
fn test_jcmt_night_collects_jcmt_projects_only() {
    let repo = sample_repo();
    let status = run(&repo, &QueueStatusRequest::new("JCMT").on_date(night())).unwrap();

    let ids: Vec<&str> = status.project_ids().collect();
    assert_eq!(ids, vec!["M24AC03", "M24AN02", "M24AU01"]);
    assert_eq!(status.msb_count(), 4);
    assert_eq!(repo.msb_query_count(), status.window.sample_count());
}

#[test]
fn test_hit_counts_bounded_by_samples() {
    let repo = sample_repo();
    let status = run(&repo, &QueueStatusRequest::new("JCMT").on_date(night())).unwrap();
    let samples = status.window.sample_count() as u32;

    for msbs in status.projects.values() {
        for obs in msbs.values() {
            assert!(obs.total_hits() >= 1);
            assert!(obs.total_hits() <= samples);
        }
    }
    // 03:00..17:00 covers the whole daily range of M24AN02
    let all_night = status.observation(&MsbKey::new("M24AN02", "0c3")).unwrap();
    assert_eq!(all_night.total_hits(), 14);
}

#[test]
fn test_full_day_samples_every_hour() {
    let repo = sample_repo();
    let status = run(
        &repo,
        &QueueStatusRequest::new("UKIRT").on_date(night()).full_day(),
    )
    .unwrap();
    assert_eq!(status.window.sample_count(), 24);
    assert_eq!(repo.msb_query_count(), 24);
    let obs = status.observation(&MsbKey::new("U/24A/1", "0e5")).unwrap();
    assert_eq!(obs.total_hits(), 24);
}

#[test]
fn test_country_and_instrument_filters() {
    let repo = sample_repo();
    let request = QueueStatusRequest::new("JCMT")
        .on_date(night())
        .with_country("UK")
        .with_instrument("POL-2");
    let status = run(&repo, &request).unwrap();
    assert_eq!(status.msb_count(), 1);
    assert!(status.observation(&MsbKey::new("M24AU01", "0b2")).is_some());
}

#[test]
fn test_band_excludes_msbs_needing_better_weather() {
    let repo = sample_repo();
    let request = QueueStatusRequest::new("JCMT")
        .on_date(night())
        .with_band(WeatherBand::Band5);
    let status = run(&repo, &request).unwrap();
    assert!(status.observation(&MsbKey::new("M24AU01", "0a1")).is_none());
    assert!(status.observation(&MsbKey::new("M24AC03", "0d4")).is_some());
}

#[test]
fn test_affiliation_filter_keeps_positive_fractions() {
    let repo = sample_repo();
    let request = QueueStatusRequest::new("JCMT")
        .on_date(night())
        .with_affiliation("uk");
    let status = run(&repo, &request).unwrap();
    let ids: Vec<&str> = status.project_ids().collect();
    assert_eq!(ids, vec!["M24AN02", "M24AU01"]);
    assert_eq!(repo.affiliation_fetch_count(), 1);
}

#[test]
fn test_evaluator_failure_returns_no_partial_result() {
    let repo = sample_repo();
    repo.fail_queries_at(Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap());
    let err = run(&repo, &QueueStatusRequest::new("JCMT").on_date(night())).unwrap_err();
    assert_eq!(err.code(), "EVALUATOR_ERROR");
}

#[test]
fn test_missing_telescope_is_configuration_error() {
    let repo = sample_repo();
    let request = QueueStatusRequest {
        date: Some(night()),
        ..Default::default()
    };
    let err = run(&repo, &request).unwrap_err();
    assert!(matches!(err, QueueStatusError::Configuration(_)));
    assert_eq!(repo.msb_query_count(), 0);
}

#[test]
fn test_custom_site_window() {
    let repo = LocalRepository::new();
    repo.add_msb(support::catalog_msb("M24AU09", "x", 1.0, (22, 2)));

    let mut sites = SiteConfig::empty();
    sites.insert(
        "jcmt",
        ObservingWindow::new(
            chrono::NaiveTime::from_hms_opt(20, 30, 0).unwrap(),
            chrono::NaiveTime::from_hms_opt(3, 15, 0).unwrap(),
        )
        .unwrap(),
    );
    let status = query_queue_status(
        &repo,
        &sites,
        &QueueStatusConfig::default(),
        &QueueStatusRequest::new("JCMT").on_date(night()),
    )
    .unwrap();

    // 20:00 .. 04:00 next day
    assert_eq!(status.window.sample_count(), 9);
    let obs = status.observation(&MsbKey::new("M24AU09", "x")).unwrap();
    assert_eq!(obs.total_hits(), 4);
    assert_eq!(obs.hours.get(23), 1);
    assert_eq!(obs.hours.get(1), 1);
}

#[test]
fn test_grouping_and_ordering() {
    let repo = sample_repo();
    let status = run(&repo, &QueueStatusRequest::new("JCMT").on_date(night())).unwrap();

    let summary = group_queue_status(&status);
    assert_eq!(summary.msb_counts["M24AU01"], 2);
    assert_eq!(summary.instrument_counts["M24AU01"]["HARP"], 1);
    assert_eq!(summary.instrument_counts["M24AU01"]["POL-2"], 1);
    // 0a1: 05..09 (4 hours), 0b2: 08..12 (4 hours)
    assert_eq!(summary.hours["M24AU01"].total(), 8);
    assert_eq!(summary.hours["M24AU01"].get(8), 2);

    let by_priority = order_projects(&repo, &status, ProjectOrder::Priority).unwrap();
    assert_eq!(by_priority, vec!["M24AN02", "M24AU01", "M24AC03"]);

    // M24AU01: 10 - 6 = 4 overtakes M24AN02 at 5
    let adjusted = order_projects(&repo, &status, ProjectOrder::AdjustedPriority).unwrap();
    assert_eq!(adjusted, vec!["M24AU01", "M24AN02", "M24AC03"]);

    let report = build_report(&repo, &status, ProjectOrder::AdjustedPriority).unwrap();
    assert_eq!(report.projects[0].projectid, "M24AU01");
    assert_eq!(report.projects[0].adjustment, -6.0);
    assert_eq!(report.projects[0].priority, Some(10.0));
}
