//! Property <-> Variant conversion service.
//!
//! Converters are registered per concrete property type and looked up by the
//! runtime `TypeId` of the property, so a crate defining a new property kind
//! registers its own converter without touching the built-in ones.
//!
//! A failed `from_variant` never mutates the property.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::marker::PhantomData;
use std::path::PathBuf;

use crate::error::ConversionError;
use crate::property::{Property, PropertyEnumeration, PropertyType, PropertyValue};
use crate::variant::Variant;
use crate::Color;

/// Conversion behavior for one concrete property type
pub trait VariantConverter<P: Property>: Send + Sync {
    fn to_variant(&self, property: &P) -> Variant;
    fn from_variant(&self, property: &mut P, variant: &Variant) -> Result<(), ConversionError>;
}

/// Value types with a canonical Variant form, usable by `PropertyValue<T>`
pub trait VariantValue: Sized {
    fn to_variant(&self) -> Variant;
    fn from_variant(variant: &Variant) -> Option<Self>;
}

impl VariantValue for bool {
    fn to_variant(&self) -> Variant {
        Variant::Bool(*self)
    }

    fn from_variant(variant: &Variant) -> Option<Self> {
        variant.as_bool()
    }
}

impl VariantValue for i64 {
    fn to_variant(&self) -> Variant {
        Variant::Int(*self)
    }

    fn from_variant(variant: &Variant) -> Option<Self> {
        variant.as_int()
    }
}

impl VariantValue for f64 {
    fn to_variant(&self) -> Variant {
        Variant::Real(*self)
    }

    fn from_variant(variant: &Variant) -> Option<Self> {
        variant.as_real()
    }
}

impl VariantValue for String {
    fn to_variant(&self) -> Variant {
        Variant::String(self.clone())
    }

    fn from_variant(variant: &Variant) -> Option<Self> {
        variant.as_str().map(str::to_string)
    }
}

impl VariantValue for PathBuf {
    fn to_variant(&self) -> Variant {
        Variant::String(self.to_string_lossy().into_owned())
    }

    fn from_variant(variant: &Variant) -> Option<Self> {
        variant.as_str().map(PathBuf::from)
    }
}

/// `[r, g, b, a]` as reals; a 3-element list means opaque
impl VariantValue for Color {
    fn to_variant(&self) -> Variant {
        Variant::List(
            [self.r, self.g, self.b, self.a]
                .iter()
                .map(|c| Variant::Real(f64::from(*c)))
                .collect(),
        )
    }

    fn from_variant(variant: &Variant) -> Option<Self> {
        let channels = variant
            .as_list()?
            .iter()
            .map(|v| v.as_real().map(|c| c as f32))
            .collect::<Option<Vec<f32>>>()?;
        match channels.as_slice() {
            [r, g, b] => Some(Color::from_rgb(*r, *g, *b)),
            [r, g, b, a] => Some(Color::from_rgba(*r, *g, *b, *a)),
            _ => None,
        }
    }
}

/// Converter for every `PropertyValue<T>` whose value type has a Variant form
#[derive(Debug, Clone, Copy, Default)]
pub struct ValueConverter;

impl<T> VariantConverter<PropertyValue<T>> for ValueConverter
where
    T: PropertyType + VariantValue,
{
    fn to_variant(&self, property: &PropertyValue<T>) -> Variant {
        property.value().to_variant()
    }

    fn from_variant(&self, property: &mut PropertyValue<T>, variant: &Variant) -> Result<(), ConversionError> {
        let value = T::from_variant(variant).ok_or(ConversionError::IncompatibleVariant {
            kind: T::KIND,
            found: variant.type_name(),
        })?;
        property.set_value(value)?;
        Ok(())
    }
}

/// Enumerations travel as their stable item value
#[derive(Debug, Clone, Copy, Default)]
pub struct EnumerationConverter;

impl VariantConverter<PropertyEnumeration> for EnumerationConverter {
    fn to_variant(&self, property: &PropertyEnumeration) -> Variant {
        Variant::Enum(property.value())
    }

    fn from_variant(&self, property: &mut PropertyEnumeration, variant: &Variant) -> Result<(), ConversionError> {
        let value = match variant {
            Variant::Enum(v) | Variant::Int(v) => *v,
            other => {
                return Err(ConversionError::IncompatibleVariant {
                    kind: "enum",
                    found: other.type_name(),
                })
            }
        };
        property.set_value(value)?;
        Ok(())
    }
}

trait ErasedConverter: Send + Sync {
    fn to_variant(&self, property: &dyn Any) -> Option<Variant>;
    fn from_variant(&self, property: &mut dyn Any, variant: &Variant) -> Option<Result<(), ConversionError>>;
}

struct Typed<P, C> {
    converter: C,
    _marker: PhantomData<fn() -> P>,
}

impl<P, C> ErasedConverter for Typed<P, C>
where
    P: Property,
    C: VariantConverter<P>,
{
    fn to_variant(&self, property: &dyn Any) -> Option<Variant> {
        property.downcast_ref::<P>().map(|p| self.converter.to_variant(p))
    }

    fn from_variant(&self, property: &mut dyn Any, variant: &Variant) -> Option<Result<(), ConversionError>> {
        property
            .downcast_mut::<P>()
            .map(|p| self.converter.from_variant(p, variant))
    }
}

/// Registry of converters keyed by concrete property type
pub struct PropertyValueConversion {
    converters: HashMap<TypeId, Box<dyn ErasedConverter>>,
}

impl PropertyValueConversion {
    /// Service with the built-in property kinds registered
    pub fn new() -> Self {
        let mut conversion = Self::empty();
        conversion.register::<PropertyValue<bool>, _>(ValueConverter);
        conversion.register::<PropertyValue<i64>, _>(ValueConverter);
        conversion.register::<PropertyValue<f64>, _>(ValueConverter);
        conversion.register::<PropertyValue<String>, _>(ValueConverter);
        conversion.register::<PropertyValue<PathBuf>, _>(ValueConverter);
        conversion.register::<PropertyValue<Color>, _>(ValueConverter);
        conversion.register::<PropertyEnumeration, _>(EnumerationConverter);
        conversion
    }

    /// Service without any converter
    pub fn empty() -> Self {
        Self {
            converters: HashMap::new(),
        }
    }

    /// Register (or replace) the converter for property type `P`
    pub fn register<P, C>(&mut self, converter: C)
    where
        P: Property,
        C: VariantConverter<P> + 'static,
    {
        let erased: Box<dyn ErasedConverter> = Box::new(Typed::<P, C> {
            converter,
            _marker: PhantomData,
        });
        if self.converters.insert(TypeId::of::<P>(), erased).is_some() {
            log::debug!("Replaced variant converter for {}", std::any::type_name::<P>());
        }
    }

    pub fn supports(&self, property: &dyn Property) -> bool {
        self.converters.contains_key(&property.as_any().type_id())
    }

    pub fn to_variant(&self, property: &dyn Property) -> Result<Variant, ConversionError> {
        self.converters
            .get(&property.as_any().type_id())
            .and_then(|c| c.to_variant(property.as_any()))
            .ok_or(ConversionError::UnsupportedKind(property.kind()))
    }

    pub fn from_variant(&self, property: &mut dyn Property, variant: &Variant) -> Result<(), ConversionError> {
        let kind = property.kind();
        let converter = self
            .converters
            .get(&property.as_any().type_id())
            .ok_or(ConversionError::UnsupportedKind(kind))?;
        converter
            .from_variant(property.as_any_mut(), variant)
            .unwrap_or(Err(ConversionError::UnsupportedKind(kind)))
    }
}

impl Default for PropertyValueConversion {
    fn default() -> Self {
        Self::new()
    }
}
