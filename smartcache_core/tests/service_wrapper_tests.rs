//! Cache-backed service wrappers against mock operations

use chrono::TimeDelta;
use smartcache_core::error::{Error, InternalError};
use smartcache_core::services::{
    CoverLetterTemplate, CvAnalysis, CvDocument, CvProcessor, JobFilters, JobMatch, JobMatcher,
    TemplateRequest, TemplateSystem, UserProfile,
};
use smartcache_core::{CacheConfig, CacheType};
use smartcache_test_utils::{
    CountingOperation, FailingOperation, FailingStore, StoreFailure, TestCacheBuilder, fixtures,
};
use std::time::Duration;

fn analysis() -> CvAnalysis {
    CvAnalysis {
        skills: vec!["Rust".to_string()],
        experience: "Senior".to_string(),
        industries: vec!["Technology".to_string()],
        salary_range: "60k-80k".to_string(),
        location: "Durban".to_string(),
        analysis_date: chrono::Utc::now(),
        confidence: 90,
    }
}

fn template() -> CoverLetterTemplate {
    CoverLetterTemplate {
        template: "Dear team at [COMPANY_NAME], I want the [JOB_TITLE] role. [USER_NAME]"
            .to_string(),
        variables: vec!["COMPANY_NAME".to_string(), "JOB_TITLE".to_string()],
        generated_at: chrono::Utc::now(),
        reusable: true,
    }
}

#[tokio::test]
async fn test_cv_analysis_runs_once_per_user() {
    let test = TestCacheBuilder::new()
        .with_max_size_bytes(10_000)
        .build()
        .await
        .unwrap();
    let op = CountingOperation::<CvDocument, CvAnalysis>::returning(analysis());
    let processor = CvProcessor::new(test.cache.clone(), op.clone());

    for _ in 0..3 {
        processor
            .process_cv(&fixtures::cv_document(), "u1")
            .await
            .unwrap();
    }

    assert_eq!(op.calls(), 1);
    let stats = test.cache.stats().await;
    // 2 hits, 1 miss
    assert_eq!(stats.efficiency, 67);
    assert_eq!(stats.total_savings, 100);
}

#[tokio::test]
async fn test_cv_analysis_recomputed_after_retention() {
    let test = TestCacheBuilder::new()
        .with_max_size_bytes(10_000)
        .build()
        .await
        .unwrap();
    let op = CountingOperation::<CvDocument, CvAnalysis>::returning(analysis());
    let processor = CvProcessor::new(test.cache.clone(), op.clone());

    processor.process_cv(&fixtures::cv_document(), "u1").await.unwrap();
    test.advance(TimeDelta::days(31));
    let again = processor.process_cv(&fixtures::cv_document(), "u1").await.unwrap();

    assert!(!again.from_cache);
    assert_eq!(op.calls(), 2);
}

#[tokio::test]
async fn test_failed_operation_is_not_cached() {
    let test = TestCacheBuilder::new().build().await.unwrap();
    let op = FailingOperation::<CvDocument, CvAnalysis>::new("service unavailable");
    let processor = CvProcessor::new(test.cache.clone(), op);

    let err = processor
        .process_cv(&fixtures::cv_document(), "u1")
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        Error::Internal(InternalError::OperationFailed { .. })
    ));
    assert_eq!(test.cache.stats().await.total_entries, 0);
}

#[tokio::test(start_paused = true)]
async fn test_slow_operation_times_out() {
    let mut config = CacheConfig::test();
    config.operation_timeout_secs = 1;
    let test = TestCacheBuilder::new()
        .with_config(config)
        .build()
        .await
        .unwrap();
    let op = CountingOperation::<(UserProfile, JobFilters), Vec<JobMatch>>::returning(Vec::new())
        .with_delay(Duration::from_secs(5));
    let matcher = JobMatcher::new(test.cache.clone(), op);

    let err = matcher
        .find_matches(&fixtures::user_profile("u1"), &JobFilters::new())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        Error::Internal(InternalError::OperationTimeout { .. })
    ));
}

#[tokio::test]
async fn test_wrapper_survives_broken_persistence() {
    let test = TestCacheBuilder::new()
        .with_max_size_bytes(10_000)
        .with_store(FailingStore::new(StoreFailure::Both))
        .build()
        .await
        .unwrap();
    let op = CountingOperation::<CvDocument, CvAnalysis>::returning(analysis());
    let processor = CvProcessor::new(test.cache.clone(), op.clone());

    processor.process_cv(&fixtures::cv_document(), "u1").await.unwrap();
    let second = processor.process_cv(&fixtures::cv_document(), "u1").await.unwrap();

    assert!(second.from_cache);
    assert_eq!(op.calls(), 1);
}

#[tokio::test]
async fn test_job_matches_keyed_by_filters() {
    let test = TestCacheBuilder::new()
        .with_max_size_bytes(10_000)
        .build()
        .await
        .unwrap();
    let op = CountingOperation::<(UserProfile, JobFilters), Vec<JobMatch>>::returning(Vec::new());
    let matcher = JobMatcher::new(test.cache.clone(), op.clone());
    let profile = fixtures::user_profile("u1");

    let remote = fixtures::filters(&[("remote", "true"), ("location", "Cape Town")]);
    let reordered = fixtures::filters(&[("location", "Cape Town"), ("remote", "true")]);
    matcher.find_matches(&profile, &remote).await.unwrap();
    let hit = matcher.find_matches(&profile, &reordered).await.unwrap();

    assert!(hit.from_cache);
    assert_eq!(op.calls(), 1);
    assert_eq!(matcher.cache_type(), CacheType::Semantic);
}

#[tokio::test]
async fn test_templates_shared_per_industry_and_job_type() {
    let test = TestCacheBuilder::new()
        .with_max_size_bytes(10_000)
        .build()
        .await
        .unwrap();
    let op = CountingOperation::<TemplateRequest, CoverLetterTemplate>::returning(template());
    let system = TemplateSystem::new(test.cache.clone(), op.clone());
    let profile = fixtures::user_profile("u1");

    let a = system
        .generate_cover_letter(&fixtures::job("Developer", "Acme", "fulltime"), &profile)
        .await
        .unwrap();
    let b = system
        .generate_cover_letter(&fixtures::job("Engineer", "Initech", "fulltime"), &profile)
        .await
        .unwrap();
    let c = system
        .generate_cover_letter(&fixtures::job("Engineer", "Initech", "contract"), &profile)
        .await
        .unwrap();

    assert_eq!(op.calls(), 2);
    assert!(!a.cached && b.cached && !c.cached);
    assert_eq!(
        b.content,
        "Dear team at Initech, I want the Engineer role. Test Candidate"
    );
}
