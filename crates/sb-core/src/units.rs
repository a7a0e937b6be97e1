//! CSS pixel lengths as stored in saved documents (`"120px"`).

use crate::error::{BoardError, Result};
use winnow::ascii::{float, multispace0};
use winnow::combinator::{delimited, opt, terminated};
use winnow::prelude::*;

fn px_length(input: &mut &str) -> ModalResult<f32> {
    delimited(multispace0, terminated(float, opt("px")), multispace0).parse_next(input)
}

/// Parse `"120px"`, `"120"`, or `"-4.5px"` into a finite number of pixels.
pub fn parse_px(text: &str) -> Result<f32> {
    let value = px_length
        .parse(text)
        .map_err(|e| BoardError::MalformedDocument(format!("invalid pixel length `{text}`: {e}")))?;
    if !value.is_finite() {
        return Err(BoardError::MalformedDocument(format!(
            "pixel length `{text}` is not finite"
        )));
    }
    Ok(value)
}

/// Format pixels with the shortest decimal form: `100.0` → `"100px"`.
pub fn format_px(value: f32) -> String {
    // Normalize -0 so it does not print as "-0px".
    let value = if value == 0.0 { 0.0 } else { value };
    format!("{value}px")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_common_forms() {
        assert_eq!(parse_px("120px").unwrap(), 120.0);
        assert_eq!(parse_px("120").unwrap(), 120.0);
        assert_eq!(parse_px(" -4.5px ").unwrap(), -4.5);
        assert_eq!(parse_px("0px").unwrap(), 0.0);
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_px("").is_err());
        assert!(parse_px("px").is_err());
        assert!(parse_px("12em").is_err());
        assert!(parse_px("12px3").is_err());
        assert!(parse_px("inf").is_err());
    }

    #[test]
    fn formats_shortest() {
        assert_eq!(format_px(100.0), "100px");
        assert_eq!(format_px(12.5), "12.5px");
        assert_eq!(format_px(-0.0), "0px");
    }

    #[test]
    fn format_then_parse_is_stable() {
        for v in [0.0, 1.0, 33.25, 1999.0, -7.75] {
            assert_eq!(parse_px(&format_px(v)).unwrap(), v);
        }
    }
}
