//! Relative coordinate arguments.
//!
//! Spatial commands accept `~` for "the current value" and `~N` for "the
//! current value plus N", so `tp 5 ~ ~-2` keeps Y and moves Z down by two.

use bevy::math::Vec3;

use super::convar::parse_number;

/// Marker for a value relative to the current one.
pub const RELATIVE_MARKER: char = '~';

/// Parse one coordinate, resolving `~` against `base`.
///
/// The error is a message ready to print.
///
/// # Examples
///
/// ```
/// use bevy_dev_console::core::parse_relative;
///
/// assert_eq!(parse_relative("5", 3.2), Ok(5.0));
/// assert_eq!(parse_relative("~", 3.2), Ok(3.2));
/// assert_eq!(parse_relative("~2", 3.0), Ok(5.0));
/// assert!(parse_relative("~x", 3.0).is_err());
/// ```
pub fn parse_relative(arg: &str, base: f32) -> Result<f32, String> {
    let (offset, text) = match arg.strip_prefix(RELATIVE_MARKER) {
        Some("") => return Ok(base),
        Some(rest) => (base, rest),
        None => (0.0, arg),
    };

    parse_number(text)
        .map(|value| offset + value)
        .ok_or_else(|| format!("Incorrect coordinate: '{}'", text))
}

/// Parse exactly three coordinates, resolving `~` per axis against `base`.
pub fn parse_relative_vec3(args: &[String], base: Vec3) -> Result<Vec3, String> {
    let [x, y, z] = args else {
        return Err(format!("Incorrect number of parameters: '{}'", args.len()));
    };

    Ok(Vec3::new(
        parse_relative(x, base.x)?,
        parse_relative(y, base.y)?,
        parse_relative(z, base.z)?,
    ))
}

/// Autocomplete helper for `x y z` arguments: offers the current value of the
/// axis being typed, once the user has started a new empty argument.
pub fn complete_coordinate(args: &[String], base: Vec3) -> Option<Vec<String>> {
    if args.last()?.is_empty() {
        let value = match args.len() {
            1 => base.x,
            2 => base.y,
            3 => base.z,
            _ => return None,
        };
        Some(vec![format!("{:.3}", value)])
    } else {
        None
    }
}
