use uuid::Uuid;

use super::ApiError;

/// Ids that cannot name a movie are reported the same way as unknown ones.
pub fn parse_movie_id(raw: &str) -> Result<i32, ApiError> {
    match raw.trim().parse::<i32>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(ApiError::not_found("Movie", raw)),
    }
}

pub fn parse_user_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw.trim()).map_err(|_| ApiError::not_found("User", raw))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_movie_id() {
        assert_eq!(parse_movie_id("1").unwrap(), 1);
        assert_eq!(parse_movie_id("12345").unwrap(), 12345);
        assert!(matches!(parse_movie_id("0"), Err(ApiError::NotFound(_))));
        assert!(matches!(parse_movie_id("-1"), Err(ApiError::NotFound(_))));
        assert!(matches!(parse_movie_id("abc"), Err(ApiError::NotFound(_))));
        assert!(matches!(
            parse_movie_id("99999999999"),
            Err(ApiError::NotFound(_))
        ));
    }

    #[test]
    fn test_parse_user_id() {
        let id = Uuid::now_v7();
        assert_eq!(parse_user_id(&id.to_string()).unwrap(), id);
        assert!(matches!(
            parse_user_id("not-a-uuid"),
            Err(ApiError::NotFound(_))
        ));
    }
}
