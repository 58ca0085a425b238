use super::*;

async fn storage_with_club() -> (Storage, Club) {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    let club = storage
        .create_club("Point Quest", "Centralized Platform for College Club Activities", None)
        .await
        .expect("club");
    (storage, club)
}

fn record(club_id: ClubId, email: &str, usn: &str) -> NewBodRecord {
    NewBodRecord {
        id: None,
        first_name: "Ada".into(),
        last_name: "Lovelace".into(),
        email: email.into(),
        password_hash: "$argon2id$stub".into(),
        phone_no: "9876543210".into(),
        branch: "CSE".into(),
        usn: usn.into(),
        club_id,
    }
}

#[tokio::test]
async fn health_check_succeeds_for_live_pool() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    storage.health_check().await.expect("health check");
}

#[tokio::test]
async fn in_memory_database_survives_connection_recycling() {
    let (storage, club) = storage_with_club().await;

    let options = storage.pool.options();
    assert_eq!(options.get_min_connections(), 1);
    assert_eq!(options.get_idle_timeout(), None);
    assert_eq!(options.get_max_lifetime(), None);

    // what the pool reaper does to an idle or expired connection
    let conn = storage.pool.acquire().await.expect("acquire").detach();
    sqlx::Connection::close(conn).await.expect("close");

    assert_eq!(storage.list_clubs().await.expect("clubs"), vec![club]);
}

#[tokio::test]
async fn creates_database_file_when_missing() {
    let temp_root = tempfile::tempdir().expect("tempdir");
    let db_path = temp_root.path().join("nested").join("clubs.db");
    let database_url = format!("sqlite://{}", db_path.to_string_lossy().replace('\\', "/"));

    let storage = Storage::new(&database_url).await.expect("db");
    drop(storage);

    assert!(
        db_path.exists(),
        "database file should exist: {}",
        db_path.display()
    );
}

#[tokio::test]
async fn stores_and_lists_clubs_in_insert_order() {
    let (storage, first) = storage_with_club().await;
    let second = storage
        .create_club("Tech Innovators", "Bringing Tomorrow's Tech Today", Some("/logo.png"))
        .await
        .expect("club");

    let clubs = storage.list_clubs().await.expect("clubs");
    assert_eq!(clubs, vec![first, second.clone()]);
    assert_eq!(
        storage.get_club(second.id).await.expect("get"),
        Some(second)
    );
    assert_eq!(storage.get_club(ClubId(999)).await.expect("get"), None);
}

#[tokio::test]
async fn duplicate_club_name_is_a_unique_violation() {
    let (storage, club) = storage_with_club().await;
    let err = storage
        .create_club(&club.name, "again", None)
        .await
        .expect_err("duplicate");
    assert!(is_unique_violation(&err));
}

#[tokio::test]
async fn creates_bod_with_server_assigned_id() {
    let (storage, club) = storage_with_club().await;
    let bod = storage
        .create_bod(&record(club.id, "ada@example.com", "1AB23CS001"))
        .await
        .expect("bod");
    assert!(bod.id.0 > 0);
    assert_eq!(bod.first_name, "Ada");
    assert_eq!(bod.club_id, club.id);

    let listed = storage.list_bods().await.expect("list");
    assert_eq!(listed, vec![bod]);
}

#[tokio::test]
async fn creates_bod_with_requested_id() {
    let (storage, club) = storage_with_club().await;
    let mut new = record(club.id, "ada@example.com", "1AB23CS001");
    new.id = Some(BodId(42));
    let bod = storage.create_bod(&new).await.expect("bod");
    assert_eq!(bod.id, BodId(42));

    let mut clash = record(club.id, "grace@example.com", "1AB23CS002");
    clash.id = Some(BodId(42));
    let err = storage.create_bod(&clash).await.expect_err("id taken");
    assert!(is_unique_violation(&err));
}

#[tokio::test]
async fn duplicate_email_is_a_unique_violation() {
    let (storage, club) = storage_with_club().await;
    storage
        .create_bod(&record(club.id, "ada@example.com", "1AB23CS001"))
        .await
        .expect("first");
    let err = storage
        .create_bod(&record(club.id, "ada@example.com", "1AB23CS002"))
        .await
        .expect_err("duplicate email");
    assert!(is_unique_violation(&err));
}

#[tokio::test]
async fn unknown_club_is_a_foreign_key_violation() {
    let (storage, _club) = storage_with_club().await;
    let err = storage
        .create_bod(&record(ClubId(999), "ada@example.com", "1AB23CS001"))
        .await
        .expect_err("missing club");
    assert!(is_foreign_key_violation(&err));
}

#[tokio::test]
async fn update_changes_only_given_columns() {
    let (storage, club) = storage_with_club().await;
    let bod = storage
        .create_bod(&record(club.id, "ada@example.com", "1AB23CS001"))
        .await
        .expect("bod");

    let updated = storage
        .update_bod(
            bod.id,
            &BodChanges {
                branch: Some("ECE".into()),
                password_hash: Some("$argon2id$other".into()),
                ..BodChanges::default()
            },
        )
        .await
        .expect("update")
        .expect("row exists");

    assert_eq!(updated.branch, "ECE");
    assert_eq!(updated.first_name, bod.first_name);
    assert_eq!(updated.email, bod.email);
    let hash: String = sqlx::query_scalar("SELECT password_hash FROM bods WHERE id = ?")
        .bind(bod.id.0)
        .fetch_one(&storage.pool)
        .await
        .expect("hash");
    assert_eq!(hash, "$argon2id$other");
}

#[tokio::test]
async fn update_of_missing_bod_returns_none() {
    let (storage, _club) = storage_with_club().await;
    let updated = storage
        .update_bod(BodId(5), &BodChanges::default())
        .await
        .expect("update");
    assert!(updated.is_none());
}
