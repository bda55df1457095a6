use super::*;

#[test]
fn status_401_maps_to_unauthorized() {
    assert_eq!(
        classify(401, "Unauthorized", r#"{"detail":"Token expired"}"#),
        ApiError::Unauthorized
    );
    // detail 不影响分类
    assert_eq!(classify(401, "Unauthorized", ""), ApiError::Unauthorized);
}

#[test]
fn status_403_maps_to_forbidden() {
    assert_eq!(
        classify(403, "Forbidden", r#"{"detail":"Admin role required"}"#),
        ApiError::Forbidden
    );
}

#[test]
fn status_409_carries_server_detail() {
    assert_eq!(
        classify(409, "Conflict", r#"{"detail":"Competition ID already exists"}"#),
        ApiError::Conflict("Competition ID already exists".to_string())
    );
    assert_eq!(
        classify(409, "Conflict", "not json"),
        ApiError::Conflict("Conflict with existing data".to_string())
    );
}

#[test]
fn other_statuses_prefer_detail_over_reason() {
    assert_eq!(
        classify(422, "Unprocessable Entity", r#"{"detail":"end_date before start_date"}"#),
        ApiError::Http {
            status: 422,
            message: "end_date before start_date".to_string()
        }
    );
}

#[test]
fn other_statuses_fall_back_to_status_line() {
    assert_eq!(
        classify(404, "Not Found", ""),
        ApiError::Http {
            status: 404,
            message: "HTTP 404: Not Found".to_string()
        }
    );
    assert_eq!(
        classify(500, "Internal Server Error", "<html>oops</html>"),
        ApiError::Http {
            status: 500,
            message: "HTTP 500: Internal Server Error".to_string()
        }
    );
}

#[test]
fn user_messages_are_presentable() {
    assert!(ApiError::Unauthorized.user_message().contains("sign in"));
    assert!(ApiError::Forbidden.user_message().contains("permission"));
    assert_eq!(
        ApiError::Conflict("Team name taken".to_string()).user_message(),
        "Team name taken"
    );
    assert!(
        ApiError::Network("fetch rejected".to_string())
            .user_message()
            .contains("connection")
    );
}
