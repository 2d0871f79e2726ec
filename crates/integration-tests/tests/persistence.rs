//! File-backed database survives a restart

mod common;

use serde_json::json;

#[tokio::test]
async fn test_jobs_survive_restart() {
    let dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite://{}", dir.path().join("jobs.db").display());

    let (first_id, deleted_id) = {
        let service = common::service_at(&url).await;
        let first = service
            .create(&common::job("Actuarial Analyst", "Acme", "NY", "Full-time"))
            .await
            .unwrap();
        let second = service
            .create(&common::job("Summer Intern", "Gamma", "Remote", "Internship"))
            .await
            .unwrap();
        service
            .update(first.id, &json!({"tags": ["life"]}))
            .await
            .unwrap();
        service.delete(second.id).await.unwrap();
        (first.id, second.id)
    };

    // reopen: migrations are idempotent and the data is still there
    let service = common::service_at(&url).await;
    let restored = service.get(first_id).await.unwrap();
    assert_eq!(restored.title, "Actuarial Analyst");
    assert_eq!(restored.tags, ["life"]);
    assert!(service.get(deleted_id).await.unwrap_err().is_not_found());

    // the deleted id stays retired across restarts
    let next = service
        .create(&common::job("Pricing Actuary", "Beta Re", "Remote", "Contract"))
        .await
        .unwrap();
    assert!(next.id > deleted_id);

    println!("✅ Persistence verified at {}", url);
}
