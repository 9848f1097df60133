//! Shared validation helpers for query parameters.

use serde_json::json;
use uuid::Uuid;

use crate::domain::Error;

/// Parse a comma-separated UUID list query parameter.
///
/// An absent or empty parameter yields an empty list. A malformed entry is
/// a validation error naming the field and the zero-based index of the
/// offending item.
pub(crate) fn parse_uuid_list(field: &'static str, raw: Option<&str>) -> Result<Vec<Uuid>, Error> {
    let Some(raw) = raw else {
        return Ok(Vec::new());
    };
    let mut ids = Vec::new();
    for (index, part) in raw.split(',').enumerate() {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        let id = Uuid::parse_str(part).map_err(|_| {
            Error::invalid_request(format!("{field} must be a comma-separated list of UUIDs"))
                .with_details(json!({ "field": field, "index": index }))
        })?;
        if !ids.contains(&id) {
            ids.push(id);
        }
    }
    Ok(ids)
}

/// Parse the `assigned_only` flag: absent or `0` is off, `1` is on,
/// anything else is a validation error.
pub(crate) fn parse_assigned_only(raw: Option<&str>) -> Result<bool, Error> {
    match raw {
        None | Some("0") => Ok(false),
        Some("1") => Ok(true),
        Some(_) => Err(
            Error::invalid_request("assigned_only must be 0 or 1")
                .with_details(json!({ "field": "assigned_only" })),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    #[test]
    fn absent_list_is_empty() {
        assert!(parse_uuid_list("tags", None).expect("parse").is_empty());
        assert!(parse_uuid_list("tags", Some("")).expect("parse").is_empty());
    }

    #[test]
    fn valid_list_parses_and_dedupes() {
        let id = Uuid::new_v4();
        let other = Uuid::new_v4();
        let raw = format!("{id},{other},{id}");
        let ids = parse_uuid_list("tags", Some(&raw)).expect("parse");
        assert_eq!(ids, vec![id, other]);
    }

    #[test]
    fn malformed_entry_reports_field_and_index() {
        let raw = format!("{},oops", Uuid::new_v4());
        let err = parse_uuid_list("ingredients", Some(&raw)).expect_err("malformed");
        assert_eq!(err.code, ErrorCode::InvalidRequest);
        let details = err.details.expect("details");
        assert_eq!(details["field"], "ingredients");
        assert_eq!(details["index"], 1);
    }

    #[rstest]
    #[case::absent(None, false)]
    #[case::zero(Some("0"), false)]
    #[case::one(Some("1"), true)]
    fn assigned_only_accepts_flag_values(#[case] raw: Option<&str>, #[case] expected: bool) {
        assert_eq!(parse_assigned_only(raw).expect("parse"), expected);
    }

    #[rstest]
    #[case::word(Some("yes"))]
    #[case::two(Some("2"))]
    fn assigned_only_rejects_other_values(#[case] raw: Option<&str>) {
        let err = parse_assigned_only(raw).expect_err("reject");
        assert_eq!(err.code, ErrorCode::InvalidRequest);
    }
}
