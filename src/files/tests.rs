//! Tests for files module
//!
//! These tests verify upload validation, bookkeeping, and listings against
//! an in-memory database and a recording blob store.

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use axum::extract::Extension;
    use chrono::Duration;
    use sqlx::sqlite::SqlitePoolOptions;
    use sqlx::SqlitePool;
    use tokio::sync::RwLock;

    use super::super::handlers;
    use super::super::validators::{is_allowed_file_type, MAX_FILE_SIZE};
    use crate::auth::models::NewUser;
    use crate::auth::{directory, AuthedUser};
    use crate::common::{migrations, ApiError, AppState};
    use crate::services::{
        BlobStore, ExternalIdentity, IdentityProvider, OAuthError, StorageError,
    };

    struct NoProvider;

    #[async_trait]
    impl IdentityProvider for NoProvider {
        async fn sign_in_url(&self, _redirect_uri: &str) -> Result<String, OAuthError> {
            Err(OAuthError::NotConfigured)
        }

        async fn exchange_code(&self, _code: &str) -> Result<ExternalIdentity, OAuthError> {
            Err(OAuthError::NotConfigured)
        }
    }

    /// Records every put so tests can assert the store was (not) called.
    #[derive(Default)]
    struct RecordingStore {
        puts: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl BlobStore for RecordingStore {
        async fn put(
            &self,
            key: &str,
            _data: Vec<u8>,
            _content_type: &str,
        ) -> Result<(), StorageError> {
            self.puts.lock().expect("lock").push(key.to_string());
            Ok(())
        }
    }

    async fn test_state(store: Arc<RecordingStore>) -> Arc<RwLock<AppState>> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("in-memory pool");
        migrations::run_migrations(&pool, false)
            .await
            .expect("migrations");

        Arc::new(RwLock::new(AppState {
            db: pool,
            jwt_secret: "test_secret_key".to_string(),
            token_ttl: Duration::days(7),
            oauth_redirect_url: "http://localhost".to_string(),
            provider: Arc::new(NoProvider),
            storage: store,
        }))
    }

    async fn seed_user(pool: &SqlitePool, email: &str) -> AuthedUser {
        let user = directory::create(
            pool,
            &NewUser {
                email: email.to_string(),
                first_name: "Test".to_string(),
                last_name: "User".to_string(),
                picture: String::new(),
                provider: "google".to_string(),
            },
        )
        .await
        .expect("seed user");

        AuthedUser {
            id: user.id,
            email: user.email,
            role: user.role,
        }
    }

    async fn file_count(pool: &SqlitePool) -> i64 {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM files")
            .fetch_one(pool)
            .await
            .expect("count");
        count.0
    }

    #[test]
    fn test_allowed_file_types() {
        assert!(is_allowed_file_type("image/png"));
        assert!(is_allowed_file_type("image/svg+xml"));
        assert!(is_allowed_file_type("audio/mpeg"));
        assert!(is_allowed_file_type("video/mp4"));
        assert!(is_allowed_file_type("application/pdf"));
        assert!(is_allowed_file_type("text/plain"));
        assert!(is_allowed_file_type(
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
        ));
    }

    #[test]
    fn test_disallowed_file_types() {
        assert!(!is_allowed_file_type("application/zip"));
        assert!(!is_allowed_file_type("application/octet-stream"));
        assert!(!is_allowed_file_type("application/x-msdownload"));
        assert!(!is_allowed_file_type("text/html"));
    }

    #[tokio::test]
    async fn test_upload_rejects_disallowed_type_before_any_side_effect() {
        let store = Arc::new(RecordingStore::default());
        let shared = test_state(store.clone()).await;
        let state = shared.read().await.clone();
        let authed = seed_user(&state.db, "zip@example.com").await;

        let result = handlers::store_upload(
            &state,
            &authed,
            "archive.zip",
            "application/zip",
            vec![0u8; 128],
        )
        .await;

        assert!(matches!(result, Err(ApiError::BadRequest(_))));
        assert_eq!(file_count(&state.db).await, 0);
        assert!(store.puts.lock().expect("lock").is_empty());
    }

    #[tokio::test]
    async fn test_upload_rejects_oversized_file() {
        let store = Arc::new(RecordingStore::default());
        let shared = test_state(store.clone()).await;
        let state = shared.read().await.clone();
        let authed = seed_user(&state.db, "big@example.com").await;

        let result = handlers::store_upload(
            &state,
            &authed,
            "huge.png",
            "image/png",
            vec![0u8; MAX_FILE_SIZE + 1],
        )
        .await;

        assert!(matches!(result, Err(ApiError::BadRequest(_))));
        assert_eq!(file_count(&state.db).await, 0);
        assert!(store.puts.lock().expect("lock").is_empty());
    }

    #[tokio::test]
    async fn test_upload_records_file_and_ships_blob() {
        let store = Arc::new(RecordingStore::default());
        let shared = test_state(store.clone()).await;
        let state = shared.read().await.clone();
        let authed = seed_user(&state.db, "up@example.com").await;

        let uploaded = handlers::store_upload(
            &state,
            &authed,
            "photo.png",
            "image/png",
            vec![1u8; 2048],
        )
        .await
        .expect("upload");

        assert_eq!(uploaded.file.user_id, authed.id);
        assert_eq!(uploaded.file.original_name, "photo.png");
        assert_eq!(uploaded.file.mime_type, "image/png");
        assert_eq!(uploaded.file.size, 2048);
        assert_eq!(uploaded.user.email, "up@example.com");

        let puts = store.puts.lock().expect("lock");
        assert_eq!(puts.len(), 1);
        assert_eq!(puts[0], format!("uploads/{}.png", uploaded.file.id));
    }

    #[tokio::test]
    async fn test_upload_without_extension_keys_blob_by_id_alone() {
        let store = Arc::new(RecordingStore::default());
        let shared = test_state(store.clone()).await;
        let state = shared.read().await.clone();
        let authed = seed_user(&state.db, "noext@example.com").await;

        let uploaded =
            handlers::store_upload(&state, &authed, "README", "text/plain", vec![1u8; 16])
                .await
                .expect("upload");

        let puts = store.puts.lock().expect("lock");
        assert_eq!(puts[0], format!("uploads/{}", uploaded.file.id));
    }

    #[tokio::test]
    async fn test_my_files_lists_only_caller_newest_first() {
        let store = Arc::new(RecordingStore::default());
        let shared = test_state(store.clone()).await;
        let state = shared.read().await.clone();
        let alice = seed_user(&state.db, "alice@example.com").await;
        let bob = seed_user(&state.db, "bob@example.com").await;

        for (id, owner, uploaded_at) in [
            ("F_OLD001", &alice, "2024-01-01 00:00:00"),
            ("F_NEW001", &alice, "2024-06-01 00:00:00"),
            ("F_BOB001", &bob, "2024-03-01 00:00:00"),
        ] {
            sqlx::query(
                "INSERT INTO files (id, user_id, original_name, mime_type, size, upload_time) VALUES (?, ?, ?, ?, ?, ?)",
            )
            .bind(id)
            .bind(&owner.id)
            .bind("doc.pdf")
            .bind("application/pdf")
            .bind(10)
            .bind(uploaded_at)
            .execute(&state.db)
            .await
            .expect("insert file");
        }

        let response = handlers::my_files(Extension(shared.clone()), alice.clone())
            .await
            .expect("list");
        let files = response.0;

        assert_eq!(files.len(), 2);
        assert_eq!(files[0].id, "F_NEW001");
        assert_eq!(files[1].id, "F_OLD001");
    }

    #[tokio::test]
    async fn test_all_files_includes_owners_newest_first() {
        let store = Arc::new(RecordingStore::default());
        let shared = test_state(store.clone()).await;
        let state = shared.read().await.clone();
        let alice = seed_user(&state.db, "alice@example.com").await;
        let bob = seed_user(&state.db, "bob@example.com").await;

        for (id, owner, uploaded_at) in [
            ("F_A1", &alice, "2024-01-01 00:00:00"),
            ("F_B1", &bob, "2024-05-01 00:00:00"),
        ] {
            sqlx::query(
                "INSERT INTO files (id, user_id, original_name, mime_type, size, upload_time) VALUES (?, ?, ?, ?, ?, ?)",
            )
            .bind(id)
            .bind(&owner.id)
            .bind("doc.pdf")
            .bind("application/pdf")
            .bind(10)
            .bind(uploaded_at)
            .execute(&state.db)
            .await
            .expect("insert file");
        }

        let response = handlers::all_files(Extension(shared.clone()))
            .await
            .expect("list");
        let files = response.0;

        assert_eq!(files.len(), 2);
        assert_eq!(files[0].file.id, "F_B1");
        assert_eq!(files[0].user.email, "bob@example.com");
        assert_eq!(files[1].file.id, "F_A1");
        assert_eq!(files[1].user.email, "alice@example.com");
    }
}
