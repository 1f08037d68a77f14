//! `$HEX[...]` decoding for target and wordlist lines.

const PREFIX: &str = "$HEX[";

/// Strip a trailing `\r` (tolerating CRLF-terminated input files) and
/// decode a `$HEX[...]` line. Lines not in that form are returned as-is.
///
/// Decoding is best-effort: if the bracket contents do not decode as hex,
/// non-hex characters are stripped and, if the remaining length is odd,
/// left-padded with a `'0'` before a second attempt. If that also fails,
/// the original line (sans `\r`) is returned verbatim.
pub fn decode_line(line: &str) -> Vec<u8> {
    let line = line.strip_suffix('\r').unwrap_or(line);

    let Some(rest) = line.strip_prefix(PREFIX) else {
        return line.as_bytes().to_vec();
    };

    let inner = rest.strip_suffix(']').unwrap_or(rest);

    if let Ok(bytes) = hex::decode(inner) {
        return bytes;
    }

    let cleaned: String = inner.chars().filter(|c| c.is_ascii_hexdigit()).collect();
    let padded = if cleaned.len() % 2 == 1 {
        format!("0{cleaned}")
    } else {
        cleaned
    };

    match hex::decode(&padded) {
        Ok(bytes) => bytes,
        Err(_) => line.as_bytes().to_vec(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn passthrough_for_plain_line() {
        assert_eq!(decode_line("hello"), b"hello");
    }

    #[test]
    fn decodes_well_formed_hex() {
        assert_eq!(decode_line("$HEX[6162]"), b"ab");
    }

    #[test]
    fn repairs_missing_closing_bracket() {
        assert_eq!(decode_line("$HEX[6162"), b"ab");
    }

    #[test]
    fn strips_crlf() {
        assert_eq!(decode_line("$HEX[6162]\r"), b"ab");
    }

    #[test]
    fn falls_back_on_invalid_hex_by_stripping_and_padding() {
        // "6z62" -> strip non-hex -> "662" -> odd length -> pad -> "0662"
        assert_eq!(decode_line("$HEX[6z62]"), vec![0x06, 0x62]);
    }

    #[test]
    fn returns_verbatim_when_unrecoverable() {
        assert_eq!(decode_line("$HEX[zzzz]"), b"$HEX[zzzz]");
    }
}
