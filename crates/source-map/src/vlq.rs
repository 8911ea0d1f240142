//! Base64 VLQ encoding of the `mappings` field.
//!
//! Generated lines are separated by `;` and segments within a line by `,`.
//! Each segment holds the generated column (relative to the previous segment
//! on the same line), then the source index, original line and original
//! column (relative to the previous segment anywhere in the map), and
//! optionally a name index.

use crate::{LineCol, Mapping, SourceMapError};

const BASE64_ALPHABET: &[u8; 64] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

const VLQ_BASE_SHIFT: u32 = 5;
const VLQ_BASE_MASK: u64 = (1 << VLQ_BASE_SHIFT) - 1;
const VLQ_CONTINUATION_BIT: u64 = 1 << VLQ_BASE_SHIFT;

/// Encodes mappings into a `mappings` string.
///
/// `mappings` must be sorted by generated position, as [`crate::SourceMap`]
/// keeps them. Nothing is emitted after the last mapped line.
pub fn encode_mappings(mappings: &[Mapping]) -> String {
    let mut out = String::new();
    let mut line = 0u32;
    let mut first_in_line = true;
    let mut prev_col = 0i64;
    let mut prev_source = 0i64;
    let mut prev_original_line = 0i64;
    let mut prev_original_col = 0i64;

    for mapping in mappings {
        while line < mapping.generated.line {
            out.push(';');
            line += 1;
            prev_col = 0;
            first_in_line = true;
        }

        if !first_in_line {
            out.push(',');
        }
        first_in_line = false;

        let col = i64::from(mapping.generated.col);
        let source = i64::from(mapping.source);
        let original_line = i64::from(mapping.original.line);
        let original_col = i64::from(mapping.original.col);

        encode_vlq(&mut out, col - prev_col);
        encode_vlq(&mut out, source - prev_source);
        encode_vlq(&mut out, original_line - prev_original_line);
        encode_vlq(&mut out, original_col - prev_original_col);

        prev_col = col;
        prev_source = source;
        prev_original_line = original_line;
        prev_original_col = original_col;
    }

    out
}

/// Decodes a `mappings` string.
///
/// Segments with a single field mark generated text without an original
/// position and produce no [`Mapping`]. Name indices are validated but dropped.
pub fn decode_mappings(input: &str) -> Result<Vec<Mapping>, SourceMapError> {
    let bytes = input.as_bytes();
    let mut mappings = Vec::new();
    let mut pos = 0;

    let mut line = 0u32;
    let mut col = 0i64;
    let mut source = 0i64;
    let mut original_line = 0i64;
    let mut original_col = 0i64;
    let mut name = 0i64;

    while pos < bytes.len() {
        match bytes[pos] {
            b';' => {
                line += 1;
                col = 0;
                pos += 1;
            }
            b',' => pos += 1,
            _ => {
                let start = pos;
                let mut fields = [0i64; 5];
                let mut count = 0;

                while pos < bytes.len() && bytes[pos] != b',' && bytes[pos] != b';' {
                    if count == fields.len() {
                        return Err(invalid(start, "segment has more than 5 fields"));
                    }
                    let (value, next) = decode_vlq(bytes, pos)?;
                    fields[count] = value;
                    count += 1;
                    pos = next;
                }

                accumulate(&mut col, fields[0], start, "generated column")?;
                match count {
                    1 => {}
                    4 | 5 => {
                        accumulate(&mut source, fields[1], start, "source index")?;
                        accumulate(&mut original_line, fields[2], start, "original line")?;
                        accumulate(&mut original_col, fields[3], start, "original column")?;
                        if count == 5 {
                            accumulate(&mut name, fields[4], start, "name index")?;
                            to_u32(name, start, "name index")?;
                        }

                        mappings.push(Mapping {
                            generated: LineCol::new(line, to_u32(col, start, "generated column")?),
                            original: LineCol::new(
                                to_u32(original_line, start, "original line")?,
                                to_u32(original_col, start, "original column")?,
                            ),
                            source: to_u32(source, start, "source index")?,
                        });
                    }
                    n => {
                        return Err(invalid(start, format!("segment has {n} fields")));
                    }
                }
            }
        }
    }

    Ok(mappings)
}

fn encode_vlq(out: &mut String, value: i64) {
    let mut vlq = if value < 0 {
        (value.unsigned_abs() << 1) | 1
    } else {
        (value as u64) << 1
    };

    loop {
        let mut digit = vlq & VLQ_BASE_MASK;
        vlq >>= VLQ_BASE_SHIFT;
        if vlq > 0 {
            digit |= VLQ_CONTINUATION_BIT;
        }
        out.push(BASE64_ALPHABET[digit as usize] as char);
        if vlq == 0 {
            break;
        }
    }
}

fn decode_vlq(bytes: &[u8], mut pos: usize) -> Result<(i64, usize), SourceMapError> {
    let mut result = 0u64;
    let mut shift = 0u32;

    loop {
        let Some(&byte) = bytes.get(pos) else {
            return Err(invalid(pos, "unterminated VLQ value"));
        };
        let digit = base64_value(byte)
            .ok_or_else(|| invalid(pos, format!("unexpected character {:?}", byte as char)))?;
        if shift > 55 {
            return Err(invalid(pos, "VLQ value overflows 64 bits"));
        }

        result |= (digit & VLQ_BASE_MASK) << shift;
        pos += 1;

        if digit & VLQ_CONTINUATION_BIT == 0 {
            break;
        }
        shift += VLQ_BASE_SHIFT;
    }

    let magnitude = (result >> 1) as i64;
    let value = if result & 1 == 1 { -magnitude } else { magnitude };
    Ok((value, pos))
}

fn base64_value(byte: u8) -> Option<u64> {
    let value = match byte {
        b'A'..=b'Z' => byte - b'A',
        b'a'..=b'z' => byte - b'a' + 26,
        b'0'..=b'9' => byte - b'0' + 52,
        b'+' => 62,
        b'/' => 63,
        _ => return None,
    };
    Some(u64::from(value))
}

fn accumulate(
    total: &mut i64,
    delta: i64,
    position: usize,
    what: &str,
) -> Result<(), SourceMapError> {
    *total = total
        .checked_add(delta)
        .ok_or_else(|| invalid(position, format!("{what} overflows")))?;
    Ok(())
}

fn to_u32(value: i64, position: usize, what: &str) -> Result<u32, SourceMapError> {
    u32::try_from(value).map_err(|_| invalid(position, format!("{what} out of range: {value}")))
}

fn invalid(position: usize, message: impl Into<String>) -> SourceMapError {
    SourceMapError::InvalidVlq {
        position,
        message: message.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn mapping(gen: (u32, u32), orig: (u32, u32)) -> Mapping {
        Mapping {
            generated: LineCol::new(gen.0, gen.1),
            original: LineCol::new(orig.0, orig.1),
            source: 0,
        }
    }

    #[test]
    fn test_encode_single_values() {
        let cases = [(0, "A"), (1, "C"), (-1, "D"), (2, "E"), (15, "e"), (16, "gB"), (-19, "nB")];
        for (value, expected) in cases {
            let mut out = String::new();
            encode_vlq(&mut out, value);
            assert_eq!(out, expected, "encoding {value}");
        }
    }

    #[test]
    fn test_encode_line_per_statement() {
        let mappings = [
            mapping((2, 2), (0, 0)),
            mapping((3, 2), (1, 0)),
            mapping((4, 2), (2, 0)),
        ];
        assert_eq!(encode_mappings(&mappings), ";;EAAA;EACA;EACA");
    }

    #[test]
    fn test_encode_multiple_segments_per_line() {
        let mappings = [mapping((0, 0), (0, 0)), mapping((0, 4), (0, 4)), mapping((2, 1), (3, 0))];
        assert_eq!(encode_mappings(&mappings), "AAAA,IAAI;;CAGJ");
    }

    #[test]
    fn test_encode_empty() {
        assert_eq!(encode_mappings(&[]), "");
    }

    #[test]
    fn test_decode_reference_mappings() {
        let mappings =
            decode_mappings("AAAA,AAAA,IAAI,CAAA;EACF,UAAU,EAAC,MAAO,GACnB").unwrap();
        assert_eq!(mappings.len(), 9);
        assert_eq!(mappings[2], mapping((0, 4), (0, 4)));
        assert_eq!(mappings[4], mapping((1, 2), (1, 2)));
        assert_eq!(mappings[8], mapping((1, 23), (2, 1)));
    }

    #[test]
    fn test_decode_inverts_encode() {
        let mappings = vec![
            mapping((2, 2), (0, 0)),
            mapping((3, 2), (1, 0)),
            mapping((7, 2), (5, 0)),
        ];
        assert_eq!(decode_mappings(&encode_mappings(&mappings)).unwrap(), mappings);
    }

    #[test]
    fn test_decode_skips_unmapped_segments() {
        let mappings = decode_mappings("A,EAAA").unwrap();
        assert_eq!(mappings, vec![mapping((0, 2), (0, 0))]);
    }

    #[test]
    fn test_decode_errors() {
        assert!(matches!(
            decode_mappings("EA!A"),
            Err(SourceMapError::InvalidVlq { position: 2, .. })
        ));
        // Continuation bit set on the last character
        assert!(matches!(
            decode_mappings("EAAg"),
            Err(SourceMapError::InvalidVlq { position: 4, .. })
        ));
        // Two- and three-field segments are not valid
        assert!(decode_mappings("EA").is_err());
        assert!(decode_mappings("EAA").is_err());
        assert!(decode_mappings("AAAAAA").is_err());
        // Negative absolute positions
        assert!(decode_mappings("DAAA").is_err());
        assert!(decode_mappings("gggggggggggggB").is_err());
    }

    #[test]
    fn test_decode_rejects_overflowing_totals() {
        // Each value is close to 2^59; the running column total passes i64::MAX
        let input = vec!["+//////////f"; 20].join(",");
        assert!(matches!(
            decode_mappings(&input),
            Err(SourceMapError::InvalidVlq { ref message, .. }) if message.contains("overflows")
        ));
    }
}
