//! Parsing of the `emotes` tag into positioned [`Emote`] occurrences.
//!
//! The tag looks like `25:0-4,12-16/1902:6-10`: groups separated by `/`,
//! each group an emote id followed by comma separated inclusive ranges.
//! Offsets count Unicode code points, not bytes.

use std::num::ParseIntError;

use thiserror::Error;

use crate::Emote;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EmoteParseError {
    #[error("emote group `{0}` is not in `id:positions` form")]
    MissingPositions(String),
    #[error("emote range `{0}` is not in `start-end` form")]
    MissingRangeSeparator(String),
    #[error("emote range `{range}` has a non-numeric bound")]
    InvalidBound {
        range: String,
        #[source]
        source: ParseIntError,
    },
    #[error("emote range `{0}` starts after it ends")]
    InvertedRange(String),
    #[error("emote range `{0}` ends past the largest supported offset")]
    RangeOverflow(String),
}

/// Parses the emote positions of `text`.
///
/// Returns one entry per occurrence in tag order; repeated ids are kept.
/// An absent or empty tag yields no emotes.
pub fn parse_emotes(text: &str, field: Option<&str>) -> Result<Vec<Emote>, EmoteParseError> {
    let mut parsed = Vec::new();
    let Some(field) = field.filter(|f| !f.is_empty()) else {
        return Ok(parsed);
    };

    for group in field.split('/') {
        let (id, positions) = group
            .split_once(':')
            .ok_or_else(|| EmoteParseError::MissingPositions(group.to_string()))?;

        for range in positions.split(',') {
            let (start, end) = range
                .split_once('-')
                .ok_or_else(|| EmoteParseError::MissingRangeSeparator(range.to_string()))?;

            let start_index = parse_bound(range, start)?;
            let end = parse_bound(range, end)?;
            if start_index > end {
                return Err(EmoteParseError::InvertedRange(range.to_string()));
            }
            let end_index = end
                .checked_add(1)
                .ok_or_else(|| EmoteParseError::RangeOverflow(range.to_string()))?;

            parsed.push(Emote {
                id: id.to_string(),
                start_index,
                end_index,
                code: code_points(text, start_index, end_index),
            });
        }
    }

    Ok(parsed)
}

fn parse_bound(range: &str, bound: &str) -> Result<usize, EmoteParseError> {
    bound
        .parse::<usize>()
        .map_err(|source| EmoteParseError::InvalidBound {
            range: range.to_string(),
            source,
        })
}

/// Substring over code points `[start, end)`, clamped to the text length.
fn code_points(text: &str, start: usize, end: usize) -> String {
    text.chars().skip(start).take(end - start).collect()
}

/// A piece of message text, either plain or covered by an emote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fragment<'a> {
    Text(String),
    Emote(&'a Emote),
}

/// Splits `text` into plain and emote fragments for rendering.
///
/// Emotes are taken in position order; one that overlaps an earlier emote
/// or lies past the end of the text is skipped.
pub fn fragments<'a>(text: &str, emotes: &'a [Emote]) -> Vec<Fragment<'a>> {
    let chars: Vec<char> = text.chars().collect();
    let mut ordered: Vec<&Emote> = emotes.iter().collect();
    ordered.sort_by_key(|emote| emote.start_index);

    let mut out = Vec::new();
    let mut cursor = 0;
    for emote in ordered {
        if emote.start_index < cursor || emote.end_index > chars.len() {
            continue;
        }
        if emote.start_index > cursor {
            out.push(Fragment::Text(chars[cursor..emote.start_index].iter().collect()));
        }
        out.push(Fragment::Emote(emote));
        cursor = emote.end_index;
    }
    if cursor < chars.len() {
        out.push(Fragment::Text(chars[cursor..].iter().collect()));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn emote(id: &str, start_index: usize, end_index: usize, code: &str) -> Emote {
        Emote {
            id: id.to_string(),
            start_index,
            end_index,
            code: code.to_string(),
        }
    }

    #[test]
    fn test_parses_two_groups() {
        let parsed = parse_emotes("Kappa test Keepo", Some("25:0-4/1902:11-15")).unwrap();
        assert_eq!(
            parsed,
            vec![emote("25", 0, 5, "Kappa"), emote("1902", 11, 16, "Keepo")]
        );
    }

    #[test]
    fn test_absent_or_empty_field_is_empty() {
        assert!(parse_emotes("Kappa", None).unwrap().is_empty());
        assert!(parse_emotes("Kappa", Some("")).unwrap().is_empty());
        assert!(parse_emotes("", None).unwrap().is_empty());
    }

    #[test]
    fn test_repeated_occurrences_are_kept_in_order() {
        let parsed = parse_emotes("Kappa Kappa Kappa", Some("25:12-16,0-4,6-10")).unwrap();
        let starts: Vec<usize> = parsed.iter().map(|e| e.start_index).collect();
        assert_eq!(starts, vec![12, 0, 6]);
        assert!(parsed.iter().all(|e| e.id == "25" && e.code == "Kappa"));
    }

    #[test]
    fn test_offsets_count_code_points() {
        // "ü" and the emoji are multi-byte but one code point each
        let text = "ü 🙂 Kappa";
        let parsed = parse_emotes(text, Some("25:4-8")).unwrap();
        assert_eq!(parsed, vec![emote("25", 4, 9, "Kappa")]);
    }

    #[test]
    fn test_range_past_end_is_clamped() {
        let parsed = parse_emotes("Kap", Some("25:0-4")).unwrap();
        assert_eq!(parsed, vec![emote("25", 0, 5, "Kap")]);
    }

    #[test]
    fn test_malformed_input_fails() {
        assert_eq!(
            parse_emotes("Kappa", Some("25")),
            Err(EmoteParseError::MissingPositions("25".to_string()))
        );
        assert_eq!(
            parse_emotes("Kappa", Some("25:0")),
            Err(EmoteParseError::MissingRangeSeparator("0".to_string()))
        );
        assert!(matches!(
            parse_emotes("Kappa", Some("25:a-4")),
            Err(EmoteParseError::InvalidBound { .. })
        ));
        assert_eq!(
            parse_emotes("Kappa", Some("25:4-0")),
            Err(EmoteParseError::InvertedRange("4-0".to_string()))
        );
    }

    #[test]
    fn test_largest_end_bound_is_rejected() {
        let range = format!("0-{}", usize::MAX);
        assert_eq!(
            parse_emotes("Kappa", Some(&format!("25:{}", range))),
            Err(EmoteParseError::RangeOverflow(range))
        );

        let below_max = format!("25:0-{}", usize::MAX - 1);
        let parsed = parse_emotes("Kappa", Some(&below_max)).unwrap();
        assert_eq!(parsed[0].end_index, usize::MAX);
        assert_eq!(parsed[0].code, "Kappa");
    }

    #[test]
    fn test_fragments_split_around_emotes() {
        let emotes = vec![emote("1902", 11, 16, "Keepo"), emote("25", 0, 5, "Kappa")];
        let parts = fragments("Kappa test Keepo!", &emotes);
        assert_eq!(
            parts,
            vec![
                Fragment::Emote(&emotes[1]),
                Fragment::Text(" test ".to_string()),
                Fragment::Emote(&emotes[0]),
                Fragment::Text("!".to_string()),
            ]
        );
    }

    #[test]
    fn test_fragments_skip_overlapping_and_out_of_range() {
        let emotes = vec![
            emote("1", 0, 5, "Kappa"),
            emote("2", 2, 4, "pp"),
            emote("3", 40, 45, "?"),
        ];
        let parts = fragments("Kappa hi", &emotes);
        assert_eq!(
            parts,
            vec![Fragment::Emote(&emotes[0]), Fragment::Text(" hi".to_string())]
        );
    }

    #[test]
    fn test_fragments_without_emotes() {
        assert_eq!(
            fragments("plain", &[]),
            vec![Fragment::Text("plain".to_string())]
        );
        assert!(fragments("", &[]).is_empty());
    }
}
