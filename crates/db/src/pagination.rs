//! Opaque cursor pagination.
//!
//! A client-facing cursor is URL-safe base64 of `"<prefix>|<position>"`:
//! - `n|…` asks for the page *after* the position,
//! - `p|…` asks for the page *before* it.
//!
//! A position is the `(created, id)` key of a row, written as
//! `"<created unix micros>_<uuid>"`.  Rows are always returned in ascending
//! key order regardless of the direction of travel.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

/// Earliest instant a Postgres `timestamptz` holds (4714-11-24 BC), in unix
/// microseconds.  chrono's latest instant is already inside the Postgres range.
const MIN_POSTGRES_MICROS: i64 = -210_866_803_200_000_000;

const NEXT_PREFIX: &str = "n";
const PREVIOUS_PREFIX: &str = "p";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PaginationError {
    #[error("invalid cursor: {0}")]
    InvalidCursor(String),
}

// ---------------------------------------------------------------------------
// Position
// ---------------------------------------------------------------------------

/// Keyset position of a row. Ordered by `created`, then `id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    pub created: DateTime<Utc>,
    pub id: Uuid,
}

impl Position {
    pub fn new(created: DateTime<Utc>, id: Uuid) -> Self {
        Self { created, id }
    }

    pub fn encode(&self) -> String {
        format!("{}_{}", self.created.timestamp_micros(), self.id)
    }

    pub fn decode(token: &str) -> Result<Self, PaginationError> {
        let invalid = || PaginationError::InvalidCursor(token.to_owned());

        let (micros, id) = token.split_once('_').ok_or_else(invalid)?;
        let micros: i64 = micros.parse().map_err(|_| invalid())?;
        if micros < MIN_POSTGRES_MICROS {
            return Err(invalid());
        }
        let created = DateTime::<Utc>::from_timestamp_micros(micros).ok_or_else(invalid)?;
        let id = Uuid::parse_str(id).map_err(|_| invalid())?;

        Ok(Self { created, id })
    }
}

// ---------------------------------------------------------------------------
// Cursor encode / decode
// ---------------------------------------------------------------------------

/// The two halves of a client cursor. At most one is set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecodedCursor {
    pub next_cursor: Option<String>,
    pub previous_cursor: Option<String>,
}

/// Split an opaque client cursor into next/previous position tokens.
///
/// `None` (first page) decodes to an empty cursor.
pub fn decode_cursor(cursor: Option<&str>) -> Result<DecodedCursor, PaginationError> {
    let Some(cursor) = cursor else {
        return Ok(DecodedCursor::default());
    };
    let invalid = || PaginationError::InvalidCursor(cursor.to_owned());

    let bytes = URL_SAFE_NO_PAD.decode(cursor).map_err(|_| invalid())?;
    let decoded = String::from_utf8(bytes).map_err(|_| invalid())?;
    let (prefix, token) = decoded.split_once('|').ok_or_else(invalid)?;

    match prefix {
        NEXT_PREFIX => Ok(DecodedCursor {
            next_cursor: Some(token.to_owned()),
            previous_cursor: None,
        }),
        PREVIOUS_PREFIX => Ok(DecodedCursor {
            next_cursor: None,
            previous_cursor: Some(token.to_owned()),
        }),
        _ => Err(invalid()),
    }
}

pub fn encode_next_cursor(token: &str) -> String {
    URL_SAFE_NO_PAD.encode(format!("{NEXT_PREFIX}|{token}"))
}

pub fn encode_previous_cursor(token: &str) -> String {
    URL_SAFE_NO_PAD.encode(format!("{PREVIOUS_PREFIX}|{token}"))
}

// ---------------------------------------------------------------------------
// Page request / result
// ---------------------------------------------------------------------------

/// Where a page starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Seek {
    First,
    After(Position),
    Before(Position),
}

/// One page request against an ordered table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageQuery {
    pub limit: u32,
    pub seek: Seek,
}

impl PageQuery {
    /// Build a query from a decoded client cursor.
    pub fn new(limit: u32, cursor: &DecodedCursor) -> Result<Self, PaginationError> {
        let seek = match (&cursor.next_cursor, &cursor.previous_cursor) {
            (Some(next), _) => Seek::After(Position::decode(next)?),
            (None, Some(previous)) => Seek::Before(Position::decode(previous)?),
            (None, None) => Seek::First,
        };
        Ok(Self { limit, seek })
    }
}

/// Position tokens to continue from, as produced by a paginator.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageCursor {
    pub after_cursor: Option<String>,
    pub before_cursor: Option<String>,
}

/// Rows of one page plus the raw cursor to continue from.
#[derive(Debug, Clone)]
pub struct PaginationResult<T> {
    pub data: Vec<T>,
    pub cursor: PageCursor,
}

/// Client-facing page envelope.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeekPage<T> {
    pub data: Vec<T>,
    pub next: Option<String>,
    pub previous: Option<String>,
}

/// Wrap page data with encoded client cursors.
pub fn create_page<T>(data: Vec<T>, cursor: PageCursor) -> SeekPage<T> {
    SeekPage {
        data,
        next: cursor.after_cursor.as_deref().map(encode_next_cursor),
        previous: cursor.before_cursor.as_deref().map(encode_previous_cursor),
    }
}

/// Turn the rows of a keyset query into a page.
///
/// `rows` must be in the order the query walked the key: ascending for
/// [`Seek::First`] / [`Seek::After`], descending for [`Seek::Before`], with
/// at most `limit + 1` entries.  The extra row only signals that another page
/// exists and is dropped.
pub fn finish_page<T>(
    mut rows: Vec<T>,
    query: &PageQuery,
    position: impl Fn(&T) -> Position,
) -> PaginationResult<T> {
    let limit = query.limit as usize;
    let has_more = rows.len() > limit;
    rows.truncate(limit);

    if matches!(query.seek, Seek::Before(_)) {
        rows.reverse();
    }

    let first = rows.first().map(|row| position(row).encode());
    let last = rows.last().map(|row| position(row).encode());

    let cursor = match query.seek {
        Seek::First => PageCursor {
            after_cursor: if has_more { last } else { None },
            before_cursor: None,
        },
        Seek::After(_) => PageCursor {
            after_cursor: if has_more { last } else { None },
            before_cursor: first,
        },
        Seek::Before(_) => PageCursor {
            after_cursor: last,
            before_cursor: if has_more { first } else { None },
        },
    };

    PaginationResult { data: rows, cursor }
}

// ============================================================
// Unit tests
// ============================================================
#[cfg(test)]
mod tests {
    use super::*;

    fn position(micros: i64) -> Position {
        Position::new(
            DateTime::<Utc>::from_timestamp_micros(micros).unwrap(),
            Uuid::from_u128(micros as u128),
        )
    }

    #[test]
    fn missing_cursor_decodes_to_first_page() {
        let decoded = decode_cursor(None).expect("empty cursor is valid");
        assert_eq!(decoded, DecodedCursor::default());

        let query = PageQuery::new(10, &decoded).unwrap();
        assert_eq!(query.seek, Seek::First);
    }

    #[test]
    fn next_and_previous_prefixes_are_told_apart() {
        let token = position(1_700_000_000_000_000).encode();

        let next = decode_cursor(Some(&encode_next_cursor(&token))).unwrap();
        assert_eq!(next.next_cursor.as_deref(), Some(token.as_str()));
        assert!(next.previous_cursor.is_none());

        let previous = decode_cursor(Some(&encode_previous_cursor(&token))).unwrap();
        assert_eq!(previous.previous_cursor.as_deref(), Some(token.as_str()));
        assert!(previous.next_cursor.is_none());
    }

    #[test]
    fn garbage_cursor_is_rejected() {
        assert!(matches!(
            decode_cursor(Some("%%not-base64%%")),
            Err(PaginationError::InvalidCursor(_))
        ));

        // Valid base64, unknown prefix.
        let unknown = URL_SAFE_NO_PAD.encode("x|123_abc");
        assert!(decode_cursor(Some(&unknown)).is_err());

        // Valid envelope, broken position.
        let broken = decode_cursor(Some(&encode_next_cursor("not-a-position"))).unwrap();
        assert!(PageQuery::new(10, &broken).is_err());
    }

    #[test]
    fn position_outside_postgres_range_is_rejected() {
        let id = Uuid::new_v4();

        let too_early = format!("-8000000000000000000_{id}");
        assert!(matches!(
            Position::decode(&too_early),
            Err(PaginationError::InvalidCursor(_))
        ));

        let earliest = format!("{MIN_POSTGRES_MICROS}_{id}");
        assert!(Position::decode(&earliest).is_ok());

        let cursor = decode_cursor(Some(&encode_next_cursor(&too_early))).unwrap();
        assert!(PageQuery::new(10, &cursor).is_err());
    }

    #[test]
    fn position_token_keeps_microseconds_and_id() {
        let original = position(1_712_345_678_901_234);
        let decoded = Position::decode(&original.encode()).unwrap();
        assert_eq!(decoded, original);
    }

    #[test]
    fn first_page_with_more_rows_only_points_forward() {
        let rows: Vec<Position> = (1..=4).map(position).collect();
        let query = PageQuery { limit: 3, seek: Seek::First };

        let page = finish_page(rows, &query, |p| *p);

        assert_eq!(page.data, vec![position(1), position(2), position(3)]);
        assert_eq!(page.cursor.after_cursor, Some(position(3).encode()));
        assert_eq!(page.cursor.before_cursor, None);
    }

    #[test]
    fn last_page_after_cursor_has_no_next() {
        let rows = vec![position(4), position(5)];
        let query = PageQuery { limit: 3, seek: Seek::After(position(3)) };

        let page = finish_page(rows, &query, |p| *p);

        assert_eq!(page.cursor.after_cursor, None);
        assert_eq!(page.cursor.before_cursor, Some(position(4).encode()));
    }

    #[test]
    fn before_cursor_rows_come_back_ascending() {
        // Query walked backwards from position 5: 4, 3, 2 (+1 extra row: 1).
        let rows = vec![position(4), position(3), position(2), position(1)];
        let query = PageQuery { limit: 3, seek: Seek::Before(position(5)) };

        let page = finish_page(rows, &query, |p| *p);

        assert_eq!(page.data, vec![position(2), position(3), position(4)]);
        assert_eq!(page.cursor.after_cursor, Some(position(4).encode()));
        assert_eq!(page.cursor.before_cursor, Some(position(2).encode()));
    }

    #[test]
    fn create_page_encodes_client_cursors() {
        let token = position(7).encode();
        let page = create_page(
            vec![1, 2],
            PageCursor { after_cursor: Some(token.clone()), before_cursor: None },
        );

        assert_eq!(page.data, vec![1, 2]);
        assert_eq!(page.next, Some(encode_next_cursor(&token)));
        assert_eq!(page.previous, None);
    }
}
