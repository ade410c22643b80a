//! The HTTP surface end to end: routing, auth, JSON shapes and the
//! error-kind to status mapping, driven through `tower::ServiceExt::oneshot`.

#[cfg(test)]
mod tests {
    use crate::fixtures::Harness;
    use axum::body::Body;
    use axum::http::{header, Method, Request, StatusCode};
    use axum::Router;
    use dh_06_api_gateway::{GatewayConfig, STORAGE_MESSAGE};
    use serde_json::{json, Value};
    use shared_types::{Role, User};
    use std::time::Duration;
    use tower::ServiceExt;

    const DONOR: &str = "donor-token";
    const VOLUNTEER: &str = "volunteer-token";
    const STRANGER: &str = "stranger-token";

    struct Api {
        hub: Harness,
        router: Router,
        donor: User,
        volunteer: User,
    }

    async fn api() -> Api {
        api_with(GatewayConfig::for_testing()).await
    }

    async fn api_with(config: GatewayConfig) -> Api {
        let hub = Harness::new();
        let donor = hub.user("dana", Role::Donor).await;
        let volunteer = hub.user("vic", Role::Volunteer).await;
        let stranger = hub.user("sam", Role::Volunteer).await;
        let router = hub.router_with(
            config,
            &[(DONOR, &donor), (VOLUNTEER, &volunteer), (STRANGER, &stranger)],
        );
        Api {
            hub,
            router,
            donor,
            volunteer,
        }
    }

    impl Api {
        async fn call(
            &self,
            method: Method,
            uri: &str,
            token: Option<&str>,
            body: Option<Value>,
        ) -> (StatusCode, Value) {
            let mut builder = Request::builder().method(method).uri(uri);
            if let Some(token) = token {
                builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
            }
            let request = match body {
                Some(body) => builder
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
                None => builder.body(Body::empty()).unwrap(),
            };
            let response = self.router.clone().oneshot(request).await.unwrap();
            let status = response.status();
            let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
                .await
                .unwrap();
            (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
        }

        async fn coats(&self) -> Value {
            let (status, body) = self
                .call(
                    Method::POST,
                    "/api/donations",
                    Some(DONOR),
                    Some(json!({
                        "title": "Winter Coats",
                        "category": "clothes",
                        "quantity": 5,
                        "location": {"type": "Point", "coordinates": [77.59, 12.97]}
                    })),
                )
                .await;
            assert_eq!(status, StatusCode::CREATED, "{body}");
            body
        }

        async fn claim(&self, donation_id: &str) -> (StatusCode, Value) {
            self.call(
                Method::POST,
                "/api/volunteers/request",
                Some(VOLUNTEER),
                Some(json!({"donationId": donation_id, "message": "Can collect Saturday"})),
            )
            .await
        }
    }

    fn kind(body: &Value) -> &str {
        body["error"]["kind"].as_str().unwrap_or_default()
    }

    #[tokio::test]
    async fn test_winter_coats_over_http() {
        let api = api().await;

        let coats = api.coats().await;
        assert_eq!(coats["status"], "available");
        assert_eq!(coats["donor"], api.donor.id.to_string());
        let id = coats["id"].as_str().unwrap().to_string();

        let (status, nearby) = api
            .call(
                Method::GET,
                "/api/donations/nearby?lon=77.60&lat=12.98&radius=5",
                None,
                None,
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(nearby["donations"][0]["id"], id.as_str());
        assert!(nearby["donations"][0]["distanceMeters"].as_f64().unwrap() > 0.0);

        let (status, request) = api.claim(&id).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(request["status"], "pending");
        assert_eq!(request["volunteer"], api.volunteer.id.to_string());
        let request_id = request["id"].as_str().unwrap().to_string();

        let (status, incoming) = api
            .call(Method::GET, "/api/volunteers/incoming-requests", Some(DONOR), None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(incoming["requests"].as_array().unwrap().len(), 1);

        let (status, accepted) = api
            .call(
                Method::PUT,
                &format!("/api/volunteers/requests/{request_id}/status"),
                Some(DONOR),
                Some(json!({"status": "accepted"})),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(accepted["status"], "accepted");

        let (_, donation) = api
            .call(Method::GET, &format!("/api/donations/{id}"), None, None)
            .await;
        assert_eq!(donation["status"], "requested");

        let (status, body) = api.claim(&id).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(kind(&body), "duplicate_request");
    }

    #[tokio::test]
    async fn test_auth_failures() {
        let api = api().await;
        let (status, body) = api
            .call(Method::GET, "/api/donations/mine", None, None)
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(kind(&body), "unauthenticated");

        let (status, _) = api
            .call(Method::GET, "/api/users/me", Some("forged"), None)
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, me) = api
            .call(Method::GET, "/api/users/me", Some(VOLUNTEER), None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(me["role"], "volunteer");
    }

    #[tokio::test]
    async fn test_donation_status_codes() {
        let api = api().await;
        let coats = api.coats().await;
        let id = coats["id"].as_str().unwrap();
        let path = format!("/api/donations/{id}/status");

        // Not the owner.
        let (status, body) = api
            .call(
                Method::PUT,
                &path,
                Some(VOLUNTEER),
                Some(json!({"status": "cancelled"})),
            )
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(kind(&body), "unauthorized");

        // Skips an edge.
        let (status, body) = api
            .call(
                Method::PUT,
                &path,
                Some(DONOR),
                Some(json!({"status": "distributed"})),
            )
            .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(kind(&body), "invalid_transition");

        // Only an accepted volunteer request moves a donation to `requested`.
        let (status, body) = api
            .call(
                Method::PUT,
                &path,
                Some(DONOR),
                Some(json!({"status": "requested"})),
            )
            .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(kind(&body), "invalid_transition");

        // Unknown status word.
        let (status, body) = api
            .call(Method::PUT, &path, Some(DONOR), Some(json!({"status": "lost"})))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(kind(&body), "validation_error");

        // Missing donation.
        let missing = shared_types::DonationId::new();
        let (status, body) = api
            .call(
                Method::PUT,
                &format!("/api/donations/{missing}/status"),
                Some(DONOR),
                Some(json!({"status": "cancelled"})),
            )
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(kind(&body), "not_found");

        let (status, cancelled) = api
            .call(Method::PUT, &path, Some(DONOR), Some(json!({"status": "cancelled"})))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(cancelled["status"], "cancelled");
    }

    #[tokio::test]
    async fn test_create_validation() {
        let api = api().await;
        for (body, needle) in [
            (json!({"category": "food"}), "title"),
            (json!({"title": "Rice"}), "category"),
            (json!({"title": "Rice", "category": "food", "quantity": 0}), "quantity"),
            (json!({"title": "Rice", "category": "furniture"}), "furniture"),
        ] {
            let (status, response) = api
                .call(Method::POST, "/api/donations", Some(DONOR), Some(body))
                .await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(kind(&response), "validation_error");
            assert!(
                response["error"]["message"].as_str().unwrap().contains(needle),
                "{response}"
            );
        }
    }

    #[tokio::test]
    async fn test_request_status_codes() {
        let api = api().await;
        let coats = api.coats().await;
        let (_, request) = api.claim(coats["id"].as_str().unwrap()).await;
        let request_id = request["id"].as_str().unwrap();
        let path = format!("/api/volunteers/requests/{request_id}/status");

        // Volunteers cannot accept their own request.
        let (status, _) = api
            .call(Method::PUT, &path, Some(VOLUNTEER), Some(json!({"status": "accepted"})))
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        // Strangers cannot view it.
        let (status, _) = api
            .call(
                Method::GET,
                &format!("/api/volunteers/requests/{request_id}"),
                Some(STRANGER),
                None,
            )
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        // pending → collected skips accept.
        let (status, body) = api
            .call(Method::PUT, &path, Some(VOLUNTEER), Some(json!({"status": "collected"})))
            .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(kind(&body), "invalid_transition");

        let missing = shared_types::RequestId::new();
        let (status, _) = api
            .call(
                Method::PUT,
                &format!("/api/volunteers/requests/{missing}/status"),
                Some(DONOR),
                Some(json!({"status": "accepted"})),
            )
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, body) = api
            .call(
                Method::POST,
                "/api/volunteers/request",
                Some(VOLUNTEER),
                Some(json!({"donationId": shared_types::DonationId::new().to_string()})),
            )
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(kind(&body), "not_found");

        let (status, body) = api
            .call(
                Method::POST,
                "/api/volunteers/request",
                Some(VOLUNTEER),
                Some(json!({"donationId": "not-an-id"})),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(kind(&body), "validation_error");
    }

    #[tokio::test]
    async fn test_listing_filters() {
        let api = api().await;
        api.coats().await;

        let (status, body) = api
            .call(Method::GET, "/api/donations?category=clothes", None, None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["donations"].as_array().unwrap().len(), 1);

        let (_, body) = api
            .call(Method::GET, "/api/donations?category=food", None, None)
            .await;
        assert!(body["donations"].as_array().unwrap().is_empty());

        let (status, body) = api
            .call(Method::GET, "/api/donations?status=misplaced", None, None)
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(kind(&body), "validation_error");

        let (_, mine) = api
            .call(Method::GET, "/api/donations/mine", Some(DONOR), None)
            .await;
        assert_eq!(mine["donations"].as_array().unwrap().len(), 1);
        let (_, none) = api
            .call(Method::GET, "/api/donations/mine", Some(VOLUNTEER), None)
            .await;
        assert!(none["donations"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_nearby_zero_radius_and_bad_numbers() {
        let api = api().await;
        api.coats().await;

        let (status, body) = api
            .call(
                Method::GET,
                "/api/donations/nearby?lon=77.59&lat=12.97&radius=0",
                None,
                None,
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["donations"].as_array().unwrap().is_empty());

        let (status, body) = api
            .call(
                Method::GET,
                "/api/donations/nearby?lon=east&lat=12.97",
                None,
                None,
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["message"], "lon must be a number, got 'east'");
    }

    #[tokio::test]
    async fn test_storage_failure_is_generic_500() {
        let api = api().await;
        let coats = api.coats().await;
        let id = coats["id"].as_str().unwrap();

        api.hub.memory.faults().fail_next(1);
        let (status, body) = api
            .call(Method::GET, &format!("/api/donations/{id}"), None, None)
            .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(kind(&body), "storage_error");
        assert_eq!(body["error"]["message"], STORAGE_MESSAGE);
    }

    #[tokio::test]
    async fn test_slow_storage_hits_deadline() {
        let mut config = GatewayConfig::for_testing();
        config.timeouts.request = Duration::from_secs(2);
        config.timeouts.storage = Duration::from_millis(20);
        let api = api_with(config).await;

        api.hub.memory.faults().set_latency(Duration::from_millis(200));
        let (status, body) = api
            .call(Method::GET, "/api/donations", None, None)
            .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"]["message"], STORAGE_MESSAGE);
    }
}
