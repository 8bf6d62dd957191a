//! Field descriptors and the statically declared, ordered schema of every section kind.

use std::ops::BitOr;

use crate::engine::Lines;
use crate::errors::{AttributeError, ParseError, ValidationError};
use crate::values::{Kind, Value};

/// Directions in which a field has to carry a value.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub struct Required(u8);

impl Required {
    pub const NONE: Required = Required(0);
    pub const TO_BANK: Required = Required(0b01);
    pub const FROM_BANK: Required = Required(0b10);
    pub const BOTH: Required = Required(0b11);

    pub const fn contains(self, other: Required) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for Required {
    type Output = Required;

    fn bitor(self, rhs: Required) -> Required {
        Required(self.0 | rhs.0)
    }
}

/// Binds a format key to a semantic type and its directional requirement.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Field {
    /// Programmatic attribute name, e.g. `bank_bic`.
    pub attribute: &'static str,
    /// Key as it appears in the text, e.g. `ПлательщикБИК`.
    pub key: &'static str,
    pub description: &'static str,
    pub required: Required,
    pub kind: Kind,
}

impl Field {
    pub fn is_required_to_bank(&self) -> bool {
        self.required.contains(Required::TO_BANK)
    }

    pub fn is_required_from_bank(&self) -> bool {
        self.required.contains(Required::FROM_BANK)
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Display, EnumIter)]
pub enum SectionKind {
    Header,
    Balance,
    Receipt,
    Payer,
    Receiver,
    Payment,
    Tax,
    Special,
    Document,
}

/// A typed block of `key=value` lines.
///
/// Implementations are generated by `section!`, which keeps `FIELDS` in declaration order. That
/// order is the order lines are written in.
pub trait Section: Default + Sized {
    const KIND: SectionKind;
    const FIELDS: &'static [Field];

    fn from_lines(lines: &Lines<'_>) -> Result<Self, ParseError>;

    /// Rendered lines in schema order, empty optional fields left out.
    fn render_lines(&self, validate: bool) -> Result<Vec<String>, ValidationError>;

    fn get(&self, attribute: &str) -> Result<Option<Value>, AttributeError>;

    fn set(&mut self, attribute: &str, value: Option<Value>) -> Result<(), AttributeError>;

    /// Parse the section out of a span that was already cut out of the full text.
    fn from_text(span: &str) -> Result<Self, ParseError> {
        let lines = Lines::scan(span)?;
        Self::from_lines(&lines)
    }

    fn to_text(&self, validate: bool) -> Result<String, ValidationError> {
        Ok(self.render_lines(validate)?.join("\n"))
    }

    fn field(attribute: &str) -> Option<&'static Field> {
        Self::FIELDS.iter().find(|f| f.attribute == attribute)
    }

    fn values(&self) -> Vec<(&'static Field, Option<Value>)> {
        Self::FIELDS
            .iter()
            .map(|f| (f, self.get(f.attribute).ok().flatten()))
            .collect()
    }

    fn is_empty(&self) -> bool {
        self.values().iter().all(|(_, value)| value.is_none())
    }
}

/// Declare a section kind: its struct, one slot per field, and its `Section` impl.
///
/// Every field reads `attribute: SlotType = ("Key", "Description", REQUIREMENT),` where the slot
/// type picks the semantic type (`Option<String>`, `Option<NaiveDate>`, `Option<NaiveTime>`,
/// `Option<Decimal>`, `bool` for flags, `Vec<String>` for lists). Sub-sections listed under
/// `embeds` become optional members which the generic machinery leaves alone.
macro_rules! section {
    (@field $field:ident, $ty:ty, $key:literal, $description:literal, $required:ident) => {
        $crate::schema::Field {
            attribute: stringify!($field),
            key: $key,
            description: $description,
            required: $crate::schema::Required::$required,
            kind: <$ty as $crate::engine::Slot>::KIND,
        }
    };

    (
        $(#[$meta:meta])*
        pub struct $name:ident: $kind:ident {
            $( $field:ident: $ty:ty = ($key:literal, $description:literal, $required:ident), )*
        }
        $( embeds { $( $(#[$embed_meta:meta])* $embed:ident: $embed_ty:ty, )* } )?
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
        #[serde(default)]
        pub struct $name {
            $(
                #[doc = $description]
                pub $field: $ty,
            )*
            $($(
                $(#[$embed_meta])*
                pub $embed: Option<$embed_ty>,
            )*)?
        }

        impl $crate::schema::Section for $name {
            const KIND: $crate::schema::SectionKind = $crate::schema::SectionKind::$kind;
            const FIELDS: &'static [$crate::schema::Field] = &[
                $( section!(@field $field, $ty, $key, $description, $required), )*
            ];

            fn from_lines(
                lines: &$crate::engine::Lines<'_>,
            ) -> Result<Self, $crate::errors::ParseError> {
                Ok($name {
                    $( $field: lines.load(&section!(@field $field, $ty, $key, $description, $required))?, )*
                    $($( $embed: None, )*)?
                })
            }

            fn render_lines(
                &self,
                validate: bool,
            ) -> Result<Vec<String>, $crate::errors::ValidationError> {
                let mut lines = Vec::new();
                $(
                    $crate::engine::render(
                        &section!(@field $field, $ty, $key, $description, $required),
                        &self.$field,
                        validate,
                        &mut lines,
                    )?;
                )*
                Ok(lines)
            }

            fn get(
                &self,
                attribute: &str,
            ) -> Result<Option<$crate::values::Value>, $crate::errors::AttributeError> {
                $(
                    if attribute == stringify!($field) {
                        return Ok($crate::engine::Slot::to_value(&self.$field));
                    }
                )*
                Err($crate::errors::AttributeError::Unknown {
                    section: <Self as $crate::schema::Section>::KIND,
                    attribute: attribute.to_string(),
                })
            }

            fn set(
                &mut self,
                attribute: &str,
                value: Option<$crate::values::Value>,
            ) -> Result<(), $crate::errors::AttributeError> {
                $(
                    if attribute == stringify!($field) {
                        self.$field = <$ty as $crate::engine::Slot>::from_value(value).ok_or_else(|| {
                            $crate::errors::AttributeError::KindMismatch {
                                section: <Self as $crate::schema::Section>::KIND,
                                attribute: attribute.to_string(),
                                expected: <$ty as $crate::engine::Slot>::KIND,
                            }
                        })?;
                        return Ok(());
                    }
                )*
                Err($crate::errors::AttributeError::Unknown {
                    section: <Self as $crate::schema::Section>::KIND,
                    attribute: attribute.to_string(),
                })
            }
        }
    };
}
