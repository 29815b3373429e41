//! Typed, validated configuration values.
//!
//! `Property` is the object-safe face every property kind shows to the rest of
//! the framework (groups, settings, conversion). Concrete kinds are either
//! `PropertyValue<T>` for plain value types or dedicated structs such as
//! `PropertyEnumeration`. New kinds can live in any crate: implement
//! `Property` and register a converter with `PropertyValueConversion`.
//!
//! Writes go through typed setters which run the property's check. A check
//! either rejects the value or, for ranges built with `RangeMode::Clamp`,
//! returns the clamped value.

use std::any::Any;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use crate::enumeration::{EnumItem, Enumeration};
use crate::error::PropertyError;
use crate::Color;

/// Identity and display metadata of a property
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyMeta {
    /// Key segment, unique within the owning group
    pub name: String,
    pub label: String,
    pub description: String,
    /// Shown in settings editors
    pub user_visible: bool,
    /// Written to and read from persisted settings
    pub persistent: bool,
}

impl PropertyMeta {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            label: name.to_string(),
            description: String::new(),
            user_visible: true,
            persistent: true,
        }
    }
}

pub trait Property: Any + Send + Sync + fmt::Debug {
    fn meta(&self) -> &PropertyMeta;
    fn meta_mut(&mut self) -> &mut PropertyMeta;

    /// Short name of the property kind ("bool", "real", "enum", ...)
    fn kind(&self) -> &'static str;

    /// Restore the default value
    fn reset(&mut self);
    fn is_default(&self) -> bool;

    /// Human-readable rendering of the current value
    fn display_value(&self) -> String;

    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;

    fn name(&self) -> &str {
        &self.meta().name
    }
}

impl<'a> dyn Property + 'a {
    pub fn downcast_ref<P: Property>(&self) -> Option<&P> {
        self.as_any().downcast_ref::<P>()
    }

    pub fn downcast_mut<P: Property>(&mut self) -> Option<&mut P> {
        self.as_any_mut().downcast_mut::<P>()
    }
}

/// Builder helpers available on every concrete property
pub trait PropertyExt: Property + Sized {
    fn with_label(mut self, label: &str) -> Self {
        self.meta_mut().label = label.to_string();
        self
    }

    fn with_description(mut self, description: &str) -> Self {
        self.meta_mut().description = description.to_string();
        self
    }

    /// Not shown in settings editors
    fn hidden(mut self) -> Self {
        self.meta_mut().user_visible = false;
        self
    }

    /// Never persisted
    fn transient(mut self) -> Self {
        self.meta_mut().persistent = false;
        self
    }
}

impl<P: Property> PropertyExt for P {}

// ---------------------------------------------------------------------------
// Plain value properties
// ---------------------------------------------------------------------------

/// Value types storable in a `PropertyValue`
pub trait PropertyType: Clone + PartialEq + fmt::Debug + Send + Sync + 'static {
    const KIND: &'static str;

    fn display(&self) -> String;
}

impl PropertyType for bool {
    const KIND: &'static str = "bool";

    fn display(&self) -> String {
        self.to_string()
    }
}

impl PropertyType for i64 {
    const KIND: &'static str = "int";

    fn display(&self) -> String {
        self.to_string()
    }
}

impl PropertyType for f64 {
    const KIND: &'static str = "real";

    fn display(&self) -> String {
        self.to_string()
    }
}

impl PropertyType for String {
    const KIND: &'static str = "string";

    fn display(&self) -> String {
        self.clone()
    }
}

impl PropertyType for PathBuf {
    const KIND: &'static str = "file_path";

    fn display(&self) -> String {
        std::path::Path::display(self).to_string()
    }
}

impl PropertyType for Color {
    const KIND: &'static str = "color";

    fn display(&self) -> String {
        if self.a < 1.0 {
            format!("{} @ {:.0}%", self.to_hex_string(), self.a * 100.0)
        } else {
            self.to_hex_string()
        }
    }
}

/// What a numeric range does with an out-of-range write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeMode {
    Reject,
    Clamp,
}

type Check<T> = Arc<dyn Fn(T) -> Result<T, PropertyError> + Send + Sync>;

pub struct PropertyValue<T: PropertyType> {
    meta: PropertyMeta,
    value: T,
    default: T,
    check: Option<Check<T>>,
}

pub type PropertyBool = PropertyValue<bool>;
pub type PropertyInt = PropertyValue<i64>;
pub type PropertyReal = PropertyValue<f64>;
pub type PropertyString = PropertyValue<String>;
pub type PropertyFilePath = PropertyValue<PathBuf>;
pub type PropertyColor = PropertyValue<Color>;

impl<T: PropertyType> PropertyValue<T> {
    pub fn new(name: &str, default: T) -> Self {
        Self {
            meta: PropertyMeta::new(name),
            value: default.clone(),
            default,
            check: None,
        }
    }

    /// Add a validity check. Checks run in the order they were added.
    pub fn with_check<F>(mut self, check: F) -> Self
    where
        F: Fn(T) -> Result<T, PropertyError> + Send + Sync + 'static,
    {
        let combined: Check<T> = match self.check.take() {
            Some(previous) => Arc::new(move |v: T| -> Result<T, PropertyError> { check(previous(v)?) }),
            None => Arc::new(check),
        };
        self.check = Some(combined);
        self
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    pub fn default_value(&self) -> &T {
        &self.default
    }

    /// Run the checks without storing. Returns the value that would be stored.
    pub fn validate(&self, value: T) -> Result<T, PropertyError> {
        match &self.check {
            Some(check) => check(value),
            None => Ok(value),
        }
    }

    pub fn set_value(&mut self, value: T) -> Result<(), PropertyError> {
        self.value = self.validate(value)?;
        Ok(())
    }
}

fn check_range<T>(value: T, min: T, max: T, mode: RangeMode) -> Result<T, PropertyError>
where
    T: PartialOrd + Copy + fmt::Display,
{
    if value >= min && value <= max {
        return Ok(value);
    }
    match mode {
        RangeMode::Clamp if value < min => Ok(min),
        RangeMode::Clamp => Ok(max),
        RangeMode::Reject => Err(PropertyError::OutOfRange {
            value: value.to_string(),
            min: min.to_string(),
            max: max.to_string(),
        }),
    }
}

impl PropertyValue<i64> {
    pub fn with_range(self, min: i64, max: i64, mode: RangeMode) -> Self {
        self.with_check(move |v| check_range(v, min, max, mode))
    }
}

impl PropertyValue<f64> {
    pub fn with_range(self, min: f64, max: f64, mode: RangeMode) -> Self {
        self.with_check(move |v: f64| {
            if v.is_nan() {
                return Err(PropertyError::Invalid("value is not a number".to_string()));
            }
            check_range(v, min, max, mode)
        })
    }

    /// Strictly positive, finite values only
    pub fn positive(self) -> Self {
        self.with_check(|v: f64| {
            if v.is_finite() && v > 0.0 {
                Ok(v)
            } else {
                Err(PropertyError::Invalid(format!("{v} is not strictly positive")))
            }
        })
    }
}

impl PropertyValue<Color> {
    /// Channels must lie in [0, 1]
    pub fn normalized(self) -> Self {
        self.with_check(|c: Color| {
            if c.is_normalized() {
                Ok(c)
            } else {
                Err(PropertyError::Invalid("color channel outside [0, 1]".to_string()))
            }
        })
    }
}

impl<T: PropertyType> Clone for PropertyValue<T> {
    fn clone(&self) -> Self {
        Self {
            meta: self.meta.clone(),
            value: self.value.clone(),
            default: self.default.clone(),
            check: self.check.clone(),
        }
    }
}

impl<T: PropertyType> fmt::Debug for PropertyValue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyValue")
            .field("name", &self.meta.name)
            .field("value", &self.value)
            .field("default", &self.default)
            .field("checked", &self.check.is_some())
            .finish()
    }
}

impl<T: PropertyType> Property for PropertyValue<T> {
    fn meta(&self) -> &PropertyMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut PropertyMeta {
        &mut self.meta
    }

    fn kind(&self) -> &'static str {
        T::KIND
    }

    fn reset(&mut self) {
        self.value = self.default.clone();
    }

    fn is_default(&self) -> bool {
        self.value == self.default
    }

    fn display_value(&self) -> String {
        self.value.display()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

// ---------------------------------------------------------------------------
// Enumeration property
// ---------------------------------------------------------------------------

/// Holds the stable value of one item of a shared `Enumeration`
#[derive(Debug, Clone)]
pub struct PropertyEnumeration {
    meta: PropertyMeta,
    enumeration: Arc<Enumeration>,
    value: i64,
    default: i64,
}

impl PropertyEnumeration {
    /// `default` falls back to the first item if it is not part of `enumeration`
    pub fn new(name: &str, enumeration: Arc<Enumeration>, default: i64) -> Self {
        let default = if enumeration.contains(default) {
            default
        } else {
            let fallback = enumeration.items().first().map(|i| i.value).unwrap_or(default);
            log::warn!("Enumeration property '{}': default {} unknown, using {}", name, default, fallback);
            fallback
        };
        Self {
            meta: PropertyMeta::new(name),
            enumeration,
            value: default,
            default,
        }
    }

    pub fn enumeration(&self) -> &Enumeration {
        &self.enumeration
    }

    pub fn value(&self) -> i64 {
        self.value
    }

    pub fn default_value(&self) -> i64 {
        self.default
    }

    pub fn item(&self) -> Option<&EnumItem> {
        self.enumeration.find_by_value(self.value)
    }

    pub fn item_name(&self) -> Option<&str> {
        self.item().map(|i| i.name.as_str())
    }

    pub fn set_value(&mut self, value: i64) -> Result<(), PropertyError> {
        if !self.enumeration.contains(value) {
            return Err(PropertyError::UnknownEnumValue(value));
        }
        self.value = value;
        Ok(())
    }

    pub fn set_by_name(&mut self, name: &str) -> Result<(), PropertyError> {
        let value = self
            .enumeration
            .find_by_name(name)
            .map(|i| i.value)
            .ok_or_else(|| PropertyError::UnknownEnumName(name.to_string()))?;
        self.value = value;
        Ok(())
    }
}

impl Property for PropertyEnumeration {
    fn meta(&self) -> &PropertyMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut PropertyMeta {
        &mut self.meta
    }

    fn kind(&self) -> &'static str {
        "enum"
    }

    fn reset(&mut self) {
        self.value = self.default;
    }

    fn is_default(&self) -> bool {
        self.value == self.default
    }

    fn display_value(&self) -> String {
        match self.item_name() {
            Some(name) => name.to_string(),
            None => self.value.to_string(),
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reject_range() {
        let mut p = PropertyInt::new("decimals", 2).with_range(1, 99, RangeMode::Reject);
        assert!(p.set_value(0).is_err());
        assert_eq!(*p.value(), 2);
        p.set_value(5).unwrap();
        assert_eq!(*p.value(), 5);
        assert!(!p.is_default());
        p.reset();
        assert!(p.is_default());
    }

    #[test]
    fn test_clamp_range() {
        let mut p = PropertyReal::new("opacity", 1.0).with_range(0.0, 1.0, RangeMode::Clamp);
        p.set_value(4.0).unwrap();
        assert_eq!(*p.value(), 1.0);
        p.set_value(-1.0).unwrap();
        assert_eq!(*p.value(), 0.0);
        assert!(p.set_value(f64::NAN).is_err());
    }

    #[test]
    fn test_positive() {
        let mut p = PropertyReal::new("deflection", 1.0).positive();
        assert!(p.set_value(0.0).is_err());
        assert!(p.set_value(-0.5).is_err());
        assert!(p.set_value(f64::INFINITY).is_err());
        p.set_value(0.25).unwrap();
        assert_eq!(*p.value(), 0.25);
    }

    #[test]
    fn test_checks_chain_in_order() {
        let p = PropertyInt::new("even", 2)
            .with_range(0, 10, RangeMode::Clamp)
            .with_check(|v| if v % 2 == 0 { Ok(v) } else { Err(PropertyError::Invalid("odd".into())) });
        assert_eq!(p.validate(12), Ok(10));
        assert!(p.validate(3).is_err());
    }

    #[test]
    fn test_enumeration_property() {
        let e = Arc::new(Enumeration::new().with_item(0, "en", "English").with_item(1, "fr", "Français"));
        let mut p = PropertyEnumeration::new("language", e.clone(), 0);
        assert_eq!(p.item_name(), Some("en"));
        assert_eq!(p.set_value(9), Err(PropertyError::UnknownEnumValue(9)));
        p.set_by_name("fr").unwrap();
        assert_eq!(p.value(), 1);
        assert_eq!(p.display_value(), "fr");

        let fallback = PropertyEnumeration::new("language", e, 42);
        assert_eq!(fallback.value(), 0);
    }

    #[test]
    fn test_builder_and_downcast() {
        let p: Box<dyn Property> = Box::new(
            PropertyBool::new("relative", false)
                .with_label("Relative deflection")
                .hidden()
                .transient(),
        );
        assert_eq!(p.name(), "relative");
        assert_eq!(p.meta().label, "Relative deflection");
        assert!(!p.meta().user_visible);
        assert!(!p.meta().persistent);
        assert_eq!(p.kind(), "bool");
        assert!(p.downcast_ref::<PropertyBool>().is_some());
        assert!(p.downcast_ref::<PropertyInt>().is_none());
    }
}
