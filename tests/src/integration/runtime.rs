//! A hub wired from TOML the way the binary does it, driven over HTTP.

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{header, Method, Request, StatusCode};
    use axum::Router;
    use hub_runtime::{build_hub, HubConfig};
    use serde_json::{json, Value};
    use shared_types::SystemClock;
    use std::sync::Arc;
    use tokio_test::assert_ok;
    use tower::ServiceExt;

    const CONFIG: &str = r#"
        [gateway.http]
        host = "127.0.0.1"
        port = 0

        [store.retry]
        max_attempts = 2
        initial_backoff = "1ms"
        max_backoff = "2ms"

        [workflow]
        points_per_completion = 25

        [[seed.users]]
        email = "Donor@Example.org"
        display_name = "Dana"
        role = "donor"
        token = "seed-donor"

        [[seed.users]]
        email = "vol@example.org"
        display_name = "Vic"
        role = "volunteer"
        token = "seed-volunteer"
    "#;

    async fn router() -> Router {
        let config = assert_ok!(HubConfig::from_toml_str(CONFIG));
        let hub = assert_ok!(build_hub(&config, Arc::new(SystemClock)).await);
        hub.gateway.router()
    }

    async fn send(
        router: &Router,
        method: Method,
        uri: &str,
        token: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .header(header::CONTENT_TYPE, "application/json");
        let body = body.map_or_else(Body::empty, |b| Body::from(b.to_string()));
        let response = router
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    #[tokio::test]
    async fn test_seeded_users_run_a_full_cycle() {
        let router = router().await;

        let (status, me) = send(&router, Method::GET, "/api/users/me", "seed-donor", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(me["email"], "donor@example.org");

        let (status, donation) = send(
            &router,
            Method::POST,
            "/api/donations",
            "seed-donor",
            Some(json!({"title": "Rice sacks", "category": "food", "quantity": 3})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let donation_id = donation["id"].as_str().unwrap().to_string();

        let (status, request) = send(
            &router,
            Method::POST,
            "/api/volunteers/request",
            "seed-volunteer",
            Some(json!({"donationId": donation_id, "beneficiaryCount": 12})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let path = format!("/api/volunteers/requests/{}/status", request["id"].as_str().unwrap());

        for (token, to) in [
            ("seed-donor", "accepted"),
            ("seed-volunteer", "collected"),
            ("seed-volunteer", "distributed"),
            ("seed-donor", "completed"),
        ] {
            let (status, body) =
                send(&router, Method::PUT, &path, token, Some(json!({"status": to}))).await;
            assert_eq!(status, StatusCode::OK, "{to}: {body}");
            assert_eq!(body["status"], to);
        }

        let (_, volunteer) =
            send(&router, Method::GET, "/api/users/me", "seed-volunteer", None).await;
        assert_eq!(volunteer["points"], 25);
    }

    #[tokio::test]
    async fn test_metrics_reflect_traffic() {
        let router = router().await;
        send(
            &router,
            Method::POST,
            "/api/donations",
            "seed-donor",
            Some(json!({"title": "Blankets", "category": "clothes"})),
        )
        .await;

        let response = router
            .clone()
            .oneshot(Request::get("/metrics").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let text = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(text.contains("hub_donations_created_total"));
        assert!(text.contains("hub_http_requests_total"));
        let gathered = hub_telemetry::gather_text().expect("metrics encode");
        assert!(gathered.contains("hub_donations_created_total"));
    }
}
