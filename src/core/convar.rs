//! Console variable (ConVar) implementation.
//!
//! A ConVar is a named setting readable as text, float, int or bool. The value
//! is stored once as text plus a number; the int and bool views are derived
//! on read so the representations can never disagree.

use std::fmt::{self, Display};

/// Callback invoked after every write to a [`ConVar`].
pub type ChangeCallback = Box<dyn Fn(&ConVar) + Send + Sync>;

/// A named console variable with optional integer bounds.
///
/// # Examples
///
/// ```
/// use bevy_dev_console::core::ConVar;
///
/// let mut fov = ConVar::new("fov", "fov <value> - camera field of view", "90")
///     .min(60)
///     .max(120);
///
/// fov.set_string("150");
/// assert_eq!(fov.as_int(), 120);
/// assert_eq!(fov.as_str(), "120");
///
/// fov.set_bool(true);
/// assert_eq!(fov.as_int(), 60); // 1 clamped to min
/// ```
pub struct ConVar {
    name: Box<str>,
    help: Box<str>,
    text: String,
    number: f32,
    default: String,
    min: Option<i32>,
    max: Option<i32>,
    save_on_change: bool,
    callbacks: Vec<ChangeCallback>,
}

impl ConVar {
    /// Create a new ConVar with the given name, help text and default value.
    pub fn new(
        name: impl Into<Box<str>>,
        help: impl Into<Box<str>>,
        default: impl Into<String>,
    ) -> Self {
        let default = default.into();
        let mut cvar = Self {
            name: name.into(),
            help: help.into(),
            text: String::new(),
            number: 0.0,
            default: default.clone(),
            min: None,
            max: None,
            save_on_change: false,
            callbacks: Vec::new(),
        };
        cvar.assign_text(default);
        cvar
    }

    /// Set the minimum integer value.
    pub fn min(mut self, min: i32) -> Self {
        self.min = Some(min);
        self.clamp();
        self
    }

    /// Set the maximum integer value.
    pub fn max(mut self, max: i32) -> Self {
        self.max = Some(max);
        self.clamp();
        self
    }

    /// Persist the variable set to disk whenever this variable changes.
    pub fn save_on_change(mut self, save: bool) -> Self {
        self.save_on_change = save;
        self
    }

    /// Subscribe to changes of this variable.
    pub fn on_changed<F>(mut self, callback: F) -> Self
    where
        F: Fn(&ConVar) + Send + Sync + 'static,
    {
        self.callbacks.push(Box::new(callback));
        self
    }

    /// Get the name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the help text.
    #[inline]
    pub fn help_text(&self) -> &str {
        &self.help
    }

    /// The value as text.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// The value as a float. Text that is not a number reads as `0.0`.
    #[inline]
    pub fn as_float(&self) -> f32 {
        self.number
    }

    /// The value as an integer, truncated toward zero.
    #[inline]
    pub fn as_int(&self) -> i32 {
        self.number as i32
    }

    /// The value as a bool: `true`, `on`, `yes` (any case) or any non-zero number.
    pub fn as_bool(&self) -> bool {
        let text = self.text.trim();
        text.eq_ignore_ascii_case("true")
            || text.eq_ignore_ascii_case("on")
            || text.eq_ignore_ascii_case("yes")
            || self.number != 0.0
    }

    /// The default value as text.
    #[inline]
    pub fn default_str(&self) -> &str {
        &self.default
    }

    /// Check if the current value differs from the default.
    #[inline]
    pub fn is_modified(&self) -> bool {
        self.text != self.default
    }

    /// The lower integer bound, if any.
    #[inline]
    pub fn get_min(&self) -> Option<i32> {
        self.min
    }

    /// The upper integer bound, if any.
    #[inline]
    pub fn get_max(&self) -> Option<i32> {
        self.max
    }

    /// Whether writes to this variable rewrite the variables file.
    #[inline]
    pub fn saves_on_change(&self) -> bool {
        self.save_on_change
    }

    /// Set the value from text.
    ///
    /// Empty text is ignored and returns `false`.
    pub fn set_string(&mut self, value: &str) -> bool {
        if value.is_empty() {
            return false;
        }
        self.assign_text(value.to_string());
        self.changed();
        true
    }

    /// Set the value from a float.
    pub fn set_float(&mut self, value: f32) {
        self.text = format_float(value);
        self.number = value;
        self.changed();
    }

    /// Set the value from an integer.
    pub fn set_int(&mut self, value: i32) {
        self.text = value.to_string();
        self.number = value as f32;
        self.changed();
    }

    /// Set the value from a bool, stored as `1` or `0`.
    pub fn set_bool(&mut self, value: bool) {
        self.set_int(i32::from(value));
    }

    /// Reset to the default value.
    pub fn reset(&mut self) {
        let default = self.default.clone();
        self.set_string(&default);
    }

    fn assign_text(&mut self, text: String) {
        self.number = parse_number(&text).unwrap_or(0.0);
        self.text = text;
    }

    fn changed(&mut self) {
        self.clamp();
        for callback in &self.callbacks {
            callback(self);
        }
    }

    fn clamp(&mut self) {
        let value = self.as_int();
        let mut clamped = value;
        if let Some(min) = self.min {
            clamped = clamped.max(min);
        }
        if let Some(max) = self.max {
            clamped = clamped.min(max);
        }
        if clamped != value {
            self.text = clamped.to_string();
            self.number = clamped as f32;
        }
    }
}

impl Display for ConVar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {}", self.name, self.text)
    }
}

impl fmt::Debug for ConVar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConVar")
            .field("name", &self.name)
            .field("value", &self.text)
            .field("min", &self.min)
            .field("max", &self.max)
            .field("save_on_change", &self.save_on_change)
            .finish_non_exhaustive()
    }
}

/// Parse console number text. Non-finite results are rejected.
pub fn parse_number(text: &str) -> Option<f32> {
    text.trim().parse::<f32>().ok().filter(|v| v.is_finite())
}

/// Format a float without a trailing `.0` for whole numbers.
pub fn format_float(value: f32) -> String {
    if value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        format!("{}", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_convar_views_from_text() {
        let mut cvar = ConVar::new("timescale", "", "2.75");
        assert_eq!(cvar.as_str(), "2.75");
        assert_eq!(cvar.as_float(), 2.75);
        assert_eq!(cvar.as_int(), 2);
        assert!(cvar.as_bool());

        cvar.set_string("-1.9");
        assert_eq!(cvar.as_int(), -1);

        cvar.set_string("hello");
        assert_eq!(cvar.as_float(), 0.0);
        assert!(!cvar.as_bool());
    }

    #[test]
    fn test_convar_bool_words() {
        let mut cvar = ConVar::new("flag", "", "0");
        assert!(!cvar.as_bool());

        for word in ["true", "on", "yes", "YES", "1", "0.5"] {
            cvar.set_string(word);
            assert!(cvar.as_bool(), "{word} should read as true");
        }
        for word in ["false", "off", "no", "0"] {
            cvar.set_string(word);
            assert!(!cvar.as_bool(), "{word} should read as false");
        }
    }

    #[test]
    fn test_convar_typed_writers() {
        let mut cvar = ConVar::new("value", "", "0");

        cvar.set_float(800.0);
        assert_eq!(cvar.as_str(), "800");
        cvar.set_float(0.5);
        assert_eq!(cvar.as_str(), "0.5");
        assert_eq!(cvar.as_int(), 0);

        cvar.set_int(-7);
        assert_eq!(cvar.as_str(), "-7");
        assert_eq!(cvar.as_float(), -7.0);

        cvar.set_bool(true);
        assert_eq!(cvar.as_str(), "1");
        assert!(cvar.as_bool());
        cvar.set_bool(false);
        assert_eq!(cvar.as_str(), "0");
    }

    #[test]
    fn test_convar_empty_string_ignored() {
        let mut cvar = ConVar::new("name", "", "gomez");
        assert!(!cvar.set_string(""));
        assert_eq!(cvar.as_str(), "gomez");
    }

    #[test]
    fn test_convar_clamping() {
        let mut cvar = ConVar::new("toggle", "", "0").min(0).max(1);

        cvar.set_string("5");
        assert_eq!(cvar.as_int(), 1);
        assert_eq!(cvar.as_str(), "1");

        cvar.set_string("-3");
        assert_eq!(cvar.as_int(), 0);
        assert_eq!(cvar.as_str(), "0");

        cvar.set_string("0.5");
        assert_eq!(cvar.as_str(), "0.5");
    }

    #[test]
    fn test_convar_single_bound() {
        let mut cvar = ConVar::new("count", "", "3").min(1);
        cvar.set_int(-10);
        assert_eq!(cvar.as_int(), 1);
        cvar.set_int(1000);
        assert_eq!(cvar.as_int(), 1000);
    }

    #[test]
    fn test_convar_default_clamped_by_builder() {
        let cvar = ConVar::new("fov", "", "200").max(120);
        assert_eq!(cvar.as_int(), 120);
        assert_eq!(cvar.default_str(), "200");
    }

    #[test]
    fn test_convar_callbacks() {
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = calls.clone();
        let mut cvar = ConVar::new("hud", "", "0").on_changed(move |var| {
            assert_eq!(var.name(), "hud");
            seen.fetch_add(1, Ordering::SeqCst);
        });

        cvar.set_string("1");
        cvar.set_int(2);
        cvar.set_string("");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_convar_callback_sees_clamped_value() {
        let mut cvar = ConVar::new("level", "", "0")
            .min(0)
            .max(3)
            .on_changed(|var| assert!(var.as_int() <= 3));
        cvar.set_string("9");
        assert_eq!(cvar.as_int(), 3);
    }

    #[test]
    fn test_convar_reset_and_modified() {
        let mut cvar = ConVar::new("speed", "", "1");
        assert!(!cvar.is_modified());
        cvar.set_string("4");
        assert!(cvar.is_modified());
        cvar.reset();
        assert_eq!(cvar.as_str(), "1");
        assert!(!cvar.is_modified());
    }

    #[test]
    fn test_parse_number_rejects_non_finite() {
        assert_eq!(parse_number(" 1.5 "), Some(1.5));
        assert_eq!(parse_number("inf"), None);
        assert_eq!(parse_number("NaN"), None);
        assert_eq!(parse_number("abc"), None);
    }
}
