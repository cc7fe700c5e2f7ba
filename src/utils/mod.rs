//! Request field validation shared by the authors and books handlers.
//!
//! Handlers run these checks before any service logic; failures classify as
//! 400 Bad Request.

use catalog_http::ApiError;

pub const MIN_AUTHOR_NAME_LEN: usize = 2;
pub const ISBN_LEN: usize = 10;
pub const MIN_PUBLISHED_YEAR: i64 = 1000;
pub const MAX_PUBLISHED_YEAR: i64 = 9999;

/// Author name: required, at least 2 characters after trimming.
pub fn author_name(raw: Option<&str>) -> Result<String, ApiError> {
    let name = raw.map(str::trim).unwrap_or_default();
    if name.chars().count() < MIN_AUTHOR_NAME_LEN {
        return Err(ApiError::bad_request(
            "Author name must be at least 2 characters",
        ));
    }
    Ok(name.to_string())
}

/// Email: required, normalized to trimmed lowercase, must look like
/// `local@domain.tld`.
pub fn email(raw: Option<&str>) -> Result<String, ApiError> {
    let email = raw.map(str::trim).unwrap_or_default().to_ascii_lowercase();

    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    };

    if !valid {
        return Err(ApiError::bad_request("Please enter a valid email address"));
    }
    Ok(email)
}

/// Book title: required, non-empty after trimming.
pub fn book_title(raw: Option<&str>) -> Result<String, ApiError> {
    let title = raw.map(str::trim).unwrap_or_default();
    if title.is_empty() {
        return Err(ApiError::bad_request("Title is required"));
    }
    Ok(title.to_string())
}

/// ISBN: required, exactly 10 ASCII digits.
pub fn isbn(raw: Option<&str>) -> Result<String, ApiError> {
    let isbn = raw.map(str::trim).unwrap_or_default();
    if isbn.len() != ISBN_LEN || !isbn.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ApiError::bad_request("ISBN must be exactly 10 digits"));
    }
    Ok(isbn.to_string())
}

/// Published year: optional, but when present must be a 4-digit year.
pub fn published_year(raw: Option<i64>) -> Result<Option<i64>, ApiError> {
    match raw {
        Some(year) if !(MIN_PUBLISHED_YEAR..=MAX_PUBLISHED_YEAR).contains(&year) => {
            Err(ApiError::bad_request(
                "Published year must be a 4-digit number representing a valid year",
            ))
        }
        other => Ok(other),
    }
}

/// Author reference: required, positive integer.
pub fn author_id(raw: Option<i64>) -> Result<i64, ApiError> {
    match raw {
        Some(id) if id >= 1 => Ok(id),
        _ => Err(ApiError::bad_request("Author ID must be a positive integer")),
    }
}

/// List-endpoint `year` filter: optional, must parse as an integer when
/// present and non-empty.
pub fn year_filter(raw: Option<&str>) -> Result<Option<i64>, ApiError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value
            .parse::<i64>()
            .map(Some)
            .map_err(|_| ApiError::bad_request("Year filter must be an integer")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn author_name_rejects_short_or_missing() {
        assert!(author_name(None).is_err());
        assert!(author_name(Some(" a ")).is_err());
        assert_eq!(author_name(Some("  Jo  ")).unwrap(), "Jo");
    }

    #[test]
    fn email_is_normalized_and_validated() {
        assert_eq!(
            email(Some("  JK.Rowling@Gmail.COM ")).unwrap(),
            "jk.rowling@gmail.com"
        );
        for bad in [None, Some(""), Some("not-an-email"), Some("a@b"), Some("@x.com")] {
            assert!(email(bad).is_err(), "accepted {:?}", bad);
        }
    }

    #[test]
    fn isbn_must_be_ten_digits() {
        assert_eq!(isbn(Some("1234567890")).unwrap(), "1234567890");
        for bad in [None, Some("123456789"), Some("12345678901"), Some("12345678ab")] {
            assert!(isbn(bad).is_err(), "accepted {:?}", bad);
        }
    }

    #[test]
    fn published_year_range_is_enforced() {
        assert_eq!(published_year(None).unwrap(), None);
        assert_eq!(published_year(Some(1996)).unwrap(), Some(1996));
        assert!(published_year(Some(999)).is_err());
        assert!(published_year(Some(10000)).is_err());
    }

    #[test]
    fn author_id_must_be_positive() {
        assert_eq!(author_id(Some(1)).unwrap(), 1);
        assert!(author_id(Some(0)).is_err());
        assert!(author_id(None).is_err());
    }

    #[test]
    fn year_filter_parses_leniently_but_rejects_garbage() {
        assert_eq!(year_filter(None).unwrap(), None);
        assert_eq!(year_filter(Some("  ")).unwrap(), None);
        assert_eq!(year_filter(Some("1999")).unwrap(), Some(1999));
        assert!(year_filter(Some("next year")).is_err());
    }
}
