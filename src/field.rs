//! Field descriptors: how a target structure exposes its fields to the binder.
//!
//! A target implements [`Annotated`] by listing its fields in declaration
//! order, each with a tag and a mutable borrow of the field itself:
//!
//! ```
//! use annobind::{Annotated, Field};
//!
//! #[derive(Default)]
//! struct Infoblox {
//!     host: String,
//!     port: u16,
//! }
//!
//! impl Annotated for Infoblox {
//!     fn fields(&mut self) -> Vec<Field<'_>> {
//!         vec![
//!             Field::leaf("host", "host,require=true", &mut self.host),
//!             Field::leaf("port", "port,default=443", &mut self.port),
//!         ]
//!     }
//! }
//!
//! #[derive(Default)]
//! struct Config {
//!     ttl: i32,
//!     infoblox: Infoblox,
//! }
//!
//! impl Annotated for Config {
//!     fn fields(&mut self) -> Vec<Field<'_>> {
//!         vec![
//!             Field::leaf("ttl", "dns-ttl-seconds,default=30", &mut self.ttl),
//!             Field::nested("infoblox", "infoblox", &mut self.infoblox),
//!         ]
//!     }
//! }
//! ```

use crate::convert::{self, Element, Scalar};
use crate::error::BindError;
use crate::types::{Kind, Mapping};
use crate::walk::ResolvedBinding;

/// A structure whose fields can be bound from annotations.
pub trait Annotated {
    /// Describe every field, in declaration order.
    fn fields(&mut self) -> Vec<Field<'_>>;

    /// Bind `annotations` into `self`. Shorthand for [`crate::bind`].
    fn bind_from(&mut self, annotations: &Mapping) -> Result<(), BindError>
    where
        Self: Sized,
    {
        crate::bind(Some(annotations), Some(self))
    }
}

/// Write capability for one leaf field.
pub trait Bindable {
    fn kind(&self) -> Kind;

    /// Whether the field holds its kind's zero value (`false`, `0`, `""`, empty).
    fn is_zero(&self) -> bool;

    /// Convert the binding's raw value (or its default) and store it.
    fn assign(&mut self, binding: &ResolvedBinding) -> Result<(), BindError>;
}

macro_rules! bindable_scalar {
    ($($ty:ty),* $(,)?) => {$(
        impl Bindable for $ty {
            fn kind(&self) -> Kind {
                Kind::Scalar(<$ty as Scalar>::KIND)
            }

            fn is_zero(&self) -> bool {
                Scalar::is_zero(self)
            }

            fn assign(&mut self, binding: &ResolvedBinding) -> Result<(), BindError> {
                let key = binding.key();
                let default = convert::default_scalar::<$ty>(key, binding.default())?;
                *self = convert::scalar(key, binding.raw(), default)?;
                Ok(())
            }
        }
    )*};
}

bindable_scalar!(
    bool, String, i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64
);

impl<T: Element> Bindable for Vec<T> {
    fn kind(&self) -> Kind {
        Kind::Sequence(T::KIND)
    }

    fn is_zero(&self) -> bool {
        self.is_empty()
    }

    fn assign(&mut self, binding: &ResolvedBinding) -> Result<(), BindError> {
        *self = T::sequence(binding.key(), binding.raw(), binding.default())?;
        Ok(())
    }
}

/// One declared field of an [`Annotated`] structure.
pub struct Field<'a> {
    pub(crate) name: &'static str,
    pub(crate) tag: &'a str,
    pub(crate) target: Target<'a>,
}

pub(crate) enum Target<'a> {
    Leaf(&'a mut dyn Bindable),
    Nested(Vec<Field<'a>>),
    Unsupported(&'static str),
}

impl<'a> Field<'a> {
    /// A bindable leaf. An empty tag leaves the field untouched.
    pub fn leaf(name: &'static str, tag: &'a str, value: &'a mut dyn Bindable) -> Self {
        Field {
            name,
            tag,
            target: Target::Leaf(value),
        }
    }

    /// A nested structure. The tag's key name becomes a prefix for every key
    /// below it; an empty tag adds no prefix.
    pub fn nested<N: Annotated>(name: &'static str, tag: &'a str, value: &'a mut N) -> Self {
        Field {
            name,
            tag,
            target: Target::Nested(value.fields()),
        }
    }

    /// A tagged field of a type the binder cannot convert. Binding it fails
    /// with [`BindError::UnsupportedKind`].
    pub fn unsupported<T: ?Sized>(name: &'static str, tag: &'a str) -> Self {
        Field {
            name,
            tag,
            target: Target::Unsupported(std::any::type_name::<T>()),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn tag(&self) -> &str {
        self.tag
    }
}
