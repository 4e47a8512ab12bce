use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use specboard_core::SpecboardError;

/// Unified error type for HTTP responses.
#[derive(Debug)]
pub struct AppError(pub anyhow::Error);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = if let Some(e) = self.0.downcast_ref::<SpecboardError>() {
            match e {
                SpecboardError::ProjectNotFound(_)
                | SpecboardError::FeatureNotFound(_)
                | SpecboardError::TaskNotFound(_)
                | SpecboardError::SpecFileNotFound(_)
                | SpecboardError::ConstitutionNotFound(_) => StatusCode::NOT_FOUND,
                SpecboardError::FileNotAllowed(_)
                | SpecboardError::InvalidFilename(_)
                | SpecboardError::RootNotFound(_) => StatusCode::BAD_REQUEST,
                SpecboardError::TaskLineNotFound(_) => StatusCode::CONFLICT,
                SpecboardError::Watch(_)
                | SpecboardError::HomeNotFound
                | SpecboardError::Io(_)
                | SpecboardError::Yaml(_)
                | SpecboardError::Json(_) => StatusCode::INTERNAL_SERVER_ERROR,
            }
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };

        let body = serde_json::json!({ "error": self.0.to_string() });
        (status, axum::Json(body)).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::response::IntoResponse;

    #[test]
    fn project_not_found_maps_to_404() {
        let err = AppError(SpecboardError::ProjectNotFound("abc".into()).into());
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn feature_not_found_maps_to_404() {
        let err = AppError(SpecboardError::FeatureNotFound("001-auth".into()).into());
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn task_not_found_maps_to_404() {
        let err = AppError(SpecboardError::TaskNotFound("T001".into()).into());
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn file_not_allowed_maps_to_400() {
        let err = AppError(SpecboardError::FileNotAllowed("secrets.md".into()).into());
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn invalid_filename_maps_to_400() {
        let err = AppError(SpecboardError::InvalidFilename("../x".into()).into());
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn stale_task_line_maps_to_409() {
        let err = AppError(SpecboardError::TaskLineNotFound("- [ ] T001".into()).into());
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn io_error_maps_to_500() {
        let io_err = std::io::Error::other("disk full");
        let err = AppError(SpecboardError::Io(io_err).into());
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn non_core_error_maps_to_500() {
        let err = AppError(anyhow::anyhow!("something unexpected"));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn response_body_is_json_error_object() {
        let err = AppError(SpecboardError::ProjectNotFound("abc".into()).into());
        let response = err.into_response();
        let ct = response
            .headers()
            .get(axum::http::header::CONTENT_TYPE)
            .expect("should have content-type");
        assert!(ct.to_str().unwrap().contains("application/json"));
    }
}
