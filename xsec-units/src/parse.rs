//! Unit string parsing - resolve "kN", "Kilonewton" or "12.5 kN·m"

use crate::{Quantity, QuantityKind, Unit};
use crate::unit::ConversionError;

/// Parse a unit string into a Unit of any kind
///
/// Accepted spellings, in lookup order:
/// - Display abbreviation: "kN", "m⁻¹", "N/mm²"
/// - ASCII abbreviation: "kN*m", "1/m", "deg"
/// - Variant name, case-insensitive: "Kilonewton", "permeter"
pub fn parse_unit(s: &str) -> Result<Unit, ConversionError> {
    let s = s.trim();
    QuantityKind::ALL
        .iter()
        .find_map(|&kind| lookup(kind, s))
        .ok_or_else(|| ConversionError::UnknownUnit(s.to_string()))
}

/// Parse a unit string, accepting only units of `kind`
pub fn parse_unit_of(kind: QuantityKind, s: &str) -> Result<Unit, ConversionError> {
    let s = s.trim();
    if let Some(unit) = lookup(kind, s) {
        return Ok(unit);
    }
    // Give a kind mismatch instead of "unknown" when the unit exists elsewhere
    match parse_unit(s) {
        Ok(other) => Err(ConversionError::IncompatibleKinds {
            from: other.abbreviation().to_string(),
            to: Unit::si(kind).abbreviation().to_string(),
            from_kind: other.kind(),
            to_kind: kind,
        }),
        Err(e) => Err(e),
    }
}

fn lookup(kind: QuantityKind, s: &str) -> Option<Unit> {
    let units = Unit::all(kind);
    units.iter().find(|u| u.abbreviation() == s)
        .or_else(|| units.iter().find(|u| u.ascii() == s))
        .or_else(|| units.iter().find(|u| u.variant_name().eq_ignore_ascii_case(s)))
        .copied()
}

/// Parse a quantity string like "5 kN" or "-0.35%"
pub fn parse_quantity(s: &str) -> Result<Quantity, ConversionError> {
    let (num_str, unit_str) = split_quantity(s)?;
    let value = parse_number(num_str)?;
    Ok(Quantity::new(value, parse_unit(unit_str)?))
}

/// Parse a quantity string for a known kind; a bare number is read in `default_unit`
pub fn parse_quantity_of(
    kind: QuantityKind,
    s: &str,
    default_unit: Unit,
) -> Result<Quantity, ConversionError> {
    let (num_str, unit_str) = split_quantity(s)?;
    let value = parse_number(num_str)?;
    let unit = if unit_str.is_empty() {
        default_unit
    } else {
        parse_unit_of(kind, unit_str)?
    };
    Ok(Quantity::new(value, unit))
}

/// Split "12.5kN" into ("12.5", "kN")
fn split_quantity(s: &str) -> Result<(&str, &str), ConversionError> {
    let s = s.trim();

    // Find where the number ends and unit begins
    let mut split_pos = 0;
    let mut found_digit = false;
    let mut prev: Option<char> = None;

    for (i, c) in s.char_indices() {
        let exponent_sign = (c == '-' || c == '+') && matches!(prev, Some('e') | Some('E'));
        let numeric = c.is_ascii_digit()
            || c == '.'
            || ((c == '-' || c == '+') && i == 0)
            || exponent_sign;
        let exponent = (c == 'e' || c == 'E')
            && found_digit
            && s[i + 1..].starts_with(|n: char| n.is_ascii_digit() || n == '-' || n == '+');

        if numeric || exponent {
            found_digit |= c.is_ascii_digit();
            split_pos = i + c.len_utf8();
        } else {
            break;
        }
        prev = Some(c);
    }

    if !found_digit {
        return Err(ConversionError::InvalidNumber(format!("no number found in: {}", s)));
    }

    Ok((s[..split_pos].trim(), s[split_pos..].trim()))
}

fn parse_number(s: &str) -> Result<f64, ConversionError> {
    s.parse::<f64>()
        .map_err(|_| ConversionError::InvalidNumber(s.to_string()))
}
