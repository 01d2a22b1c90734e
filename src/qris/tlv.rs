//! Structural walk over a flat TLV payload string.
//!
//! Fields are concatenated as `<2-digit tag><2-digit decimal length><value>`
//! with no delimiters. Lookup walks the chain field by field, so a tag is
//! only ever matched at a field boundary. A naive substring search would
//! misfire when the two tag characters happen to appear inside a preceding
//! field's value (e.g. a merchant name containing "54").
//!
//! Lengths count bytes. All slicing is checked, so a payload that is
//! truncated mid-character or carries a garbage length field reads as
//! "tag absent" rather than panicking.

/// Locate a field by tag. Returns the half-open byte range covering the
/// whole field (tag + length digits + value), or `None` when the tag is
/// absent or the chain is malformed from the walk's perspective.
///
/// Callers treat `None` as "field absent", never as corruption.
pub fn locate(payload: &str, tag: &str) -> Option<(usize, usize)> {
    let mut pos = 0;
    while pos + 4 <= payload.len() {
        let field_tag = payload.get(pos..pos + 2)?;
        let len: usize = payload.get(pos + 2..pos + 4)?.parse().ok()?;
        let end = pos + 4 + len;
        if end > payload.len() {
            return None;
        }
        if field_tag == tag {
            // A length that cuts a character in half is malformed too
            payload.get(pos..end)?;
            return Some((pos, end));
        }
        pos = end;
    }
    None
}

/// Walk to the field boundary where `tag` begins and return its offset.
///
/// Unlike [`locate`], the matched field's own length digits are not
/// validated. Truncating a payload at the checksum tag must still work when
/// the trailer itself is garbled or cut short.
pub fn start_of(payload: &str, tag: &str) -> Option<usize> {
    let mut pos = 0;
    while pos + 2 <= payload.len() {
        if payload.get(pos..pos + 2)? == tag {
            return Some(pos);
        }
        if pos + 4 > payload.len() {
            return None;
        }
        let len: usize = payload.get(pos + 2..pos + 4)?.parse().ok()?;
        pos += 4 + len;
    }
    None
}

/// Remove a field by tag. Returns the payload unchanged when the tag is not
/// present.
pub fn remove(payload: &str, tag: &str) -> String {
    match locate(payload, tag) {
        Some((start, end)) => format!("{}{}", &payload[..start], &payload[end..]),
        None => payload.to_string(),
    }
}
