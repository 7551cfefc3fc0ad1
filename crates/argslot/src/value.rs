//! Destination types and their default conversions.
//!
//! A destination is any `&mut B` where `B: Binding`. Scalars are overwritten,
//! `Vec<T>` collects every value in order and `Option<T>` wraps the value in
//! `Some`.

use std::path::PathBuf;

use crate::error::ConversionError;

/// A single value parsed from one raw token.
pub trait FromArg: Sized {
    /// Name used in conversion diagnostics.
    const TYPE_NAME: &'static str;

    fn from_arg(raw: &str) -> Result<Self, ConversionError>;

    /// Value to bind when the flag appears without a value token.
    ///
    /// `None` means the type is not a switch.
    fn switch_value() -> Option<Self> {
        None
    }

    fn render(&self) -> String;
}

macro_rules! from_str_arg {
    ($($ty:ty),* $(,)?) => {
        $(
            impl FromArg for $ty {
                const TYPE_NAME: &'static str = stringify!($ty);

                fn from_arg(raw: &str) -> Result<Self, ConversionError> {
                    raw.parse::<$ty>().map_err(|e| {
                        ConversionError::new(raw, Self::TYPE_NAME).with_reason(e.to_string())
                    })
                }

                fn render(&self) -> String {
                    self.to_string()
                }
            }
        )*
    };
}

from_str_arg!(
    i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64, char,
);

impl FromArg for String {
    const TYPE_NAME: &'static str = "string";

    fn from_arg(raw: &str) -> Result<Self, ConversionError> {
        Ok(raw.to_string())
    }

    fn render(&self) -> String {
        self.clone()
    }
}

impl FromArg for PathBuf {
    const TYPE_NAME: &'static str = "path";

    fn from_arg(raw: &str) -> Result<Self, ConversionError> {
        if raw.is_empty() {
            return Err(ConversionError::new(raw, Self::TYPE_NAME).with_reason("empty path"));
        }
        Ok(PathBuf::from(raw))
    }

    fn render(&self) -> String {
        self.display().to_string()
    }
}

impl FromArg for bool {
    const TYPE_NAME: &'static str = "bool";

    fn from_arg(raw: &str) -> Result<Self, ConversionError> {
        match raw.to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(true),
            "false" | "0" | "no" | "off" => Ok(false),
            _ => Err(ConversionError::new(raw, Self::TYPE_NAME)),
        }
    }

    fn switch_value() -> Option<Self> {
        Some(true)
    }

    fn render(&self) -> String {
        self.to_string()
    }
}

/// Storage that values are written into.
pub trait Binding {
    type Item;

    fn type_name() -> &'static str;

    fn convert(raw: &str) -> Result<Self::Item, ConversionError>;

    fn store(&mut self, item: Self::Item);

    fn switch_item() -> Option<Self::Item> {
        None
    }

    /// Current contents as text, for help defaults. `None` when empty.
    fn render(&self) -> Option<String>;
}

macro_rules! scalar_binding {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Binding for $ty {
                type Item = $ty;

                fn type_name() -> &'static str {
                    <$ty as FromArg>::TYPE_NAME
                }

                fn convert(raw: &str) -> Result<Self::Item, ConversionError> {
                    <$ty as FromArg>::from_arg(raw)
                }

                fn store(&mut self, item: Self::Item) {
                    *self = item;
                }

                fn switch_item() -> Option<Self::Item> {
                    <$ty as FromArg>::switch_value()
                }

                fn render(&self) -> Option<String> {
                    Some(FromArg::render(self))
                }
            }
        )*
    };
}

scalar_binding!(
    i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64, char, bool,
    String, PathBuf,
);

impl<T: FromArg> Binding for Vec<T> {
    type Item = T;

    fn type_name() -> &'static str {
        T::TYPE_NAME
    }

    fn convert(raw: &str) -> Result<Self::Item, ConversionError> {
        T::from_arg(raw)
    }

    fn store(&mut self, item: Self::Item) {
        self.push(item);
    }

    fn switch_item() -> Option<Self::Item> {
        T::switch_value()
    }

    fn render(&self) -> Option<String> {
        if self.is_empty() {
            return None;
        }
        let parts: Vec<String> = self.iter().map(FromArg::render).collect();
        Some(parts.join(" "))
    }
}

impl<T: FromArg> Binding for Option<T> {
    type Item = T;

    fn type_name() -> &'static str {
        T::TYPE_NAME
    }

    fn convert(raw: &str) -> Result<Self::Item, ConversionError> {
        T::from_arg(raw)
    }

    fn store(&mut self, item: Self::Item) {
        *self = Some(item);
    }

    fn switch_item() -> Option<Self::Item> {
        T::switch_value()
    }

    fn render(&self) -> Option<String> {
        self.as_ref().map(FromArg::render)
    }
}
