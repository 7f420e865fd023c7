//! Integration tests for the HTML pages and static assets

mod test_utils;

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{Request, StatusCode, header},
    };
    use chrono::Local;
    use serde_json::json;
    use tower::util::ServiceExt;

    use crate::test_utils::{body_to_string, test_app, write_session};

    async fn get(app: axum::Router, uri: &str) -> (StatusCode, String) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        (status, body_to_string(response.into_body()).await)
    }

    /// Tests the index only lists today's sessions by default
    #[tokio::test]
    async fn it_shows_todays_sessions_by_default() {
        let (app, dir) = test_app();
        let now = Local::now().naive_local().format("%Y-%m-%dT%H:%M:%S");
        write_session(
            dir.path(),
            "today",
            &json!([{
                "start_time": now.to_string(),
                "request_body": {"kwargs": {"messages": [{"role": "user", "content": "Fresh question"}]}}
            }]),
        );

        let (status, body) = get(app, "/").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Fresh question"));
        assert!(body.contains("href=\"/sessions/today\""));
        assert!(!body.contains("Up 2%"));
    }

    /// Tests listing every session grouped by day
    #[tokio::test]
    async fn it_lists_all_sessions() {
        let (app, _dir) = test_app();
        let (status, body) = get(app, "/?date=all").await;
        assert_eq!(status, StatusCode::OK);

        let jan_2 = body.find("Tue, Jan 2, 2024").unwrap();
        let jan_1 = body.find("Mon, Jan 1, 2024").unwrap();
        let unknown = body.find("Unknown Date").unwrap();
        assert!(jan_2 < jan_1 && jan_1 < unknown);
        assert!(body.contains("10:00 AM"));
        assert!(body.contains("It is 21C and &lt;b&gt;sunny&lt;/b&gt; in Paris."));
        assert!(body.contains("No message content"));
    }

    /// Tests searching from the index
    #[tokio::test]
    async fn it_searches_sessions() {
        let (app, _dir) = test_app();
        let (_, body) = get(app, "/?date=all&q=paris").await;
        assert!(body.contains("sunny"));
        assert!(!body.contains("Up 2%"));
    }

    /// Tests an invalid date on the index
    #[tokio::test]
    async fn it_rejects_an_invalid_date() {
        let (app, _dir) = test_app();
        let (status, _) = get(app, "/?date=01-01-2024").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    /// Tests the viewer shows the latest entry by default
    #[tokio::test]
    async fn it_views_the_latest_entry() {
        let (app, _dir) = test_app();
        let (status, body) = get(app, "/sessions/weather").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Entry 2 of 2"));
        assert!(body.contains("Context Messages (3)"));
        assert!(body.contains("Tool Response:"));
        assert!(body.contains("&quot;temp&quot;: 21"));
        assert!(body.contains("&lt;b&gt;sunny&lt;/b&gt;"));
        assert!(!body.contains("<b>sunny</b>"));
        assert!(body.contains("800ms"));
    }

    /// Tests navigating to a specific entry
    #[tokio::test]
    async fn it_views_a_chosen_entry() {
        let (app, _dir) = test_app();
        let (status, body) = get(app, "/sessions/weather?entry=0").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Entry 1 of 2"));
        assert!(body.contains("gpt-4o-2024-08-06 (openai)"));
        assert!(body.contains("<strong>Tool:</strong> get_weather"));
        assert!(body.contains("(40 prompt, 10 completion)"));
        assert!(body.contains("href=\"/sessions/weather?entry=1\" id=\"next-btn\""));
    }

    /// Tests an out of range entry is clamped to the last one
    #[tokio::test]
    async fn it_clamps_the_entry() {
        let (app, _dir) = test_app();
        let (status, body) = get(app, "/sessions/weather?entry=99").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Entry 2 of 2"));
    }

    /// Tests error pages for sessions that can't be shown
    #[tokio::test]
    async fn it_renders_error_pages() {
        let (app, _dir) = test_app();
        let (status, body) = get(app, "/sessions/nope").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body.contains("Failed to load session data."));

        let (app, _dir) = test_app();
        let (status, body) = get(app, "/sessions/object").await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body.contains("Invalid session format."));

        let (app, _dir) = test_app();
        let (status, body) = get(app, "/sessions/empty").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("This session has no entries."));
    }

    /// Tests the stylesheet is served without caching
    #[tokio::test]
    async fn it_serves_the_stylesheet() {
        let (app, _dir) = test_app();
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/viewer.css")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CACHE_CONTROL], "no-cache");
    }
}
