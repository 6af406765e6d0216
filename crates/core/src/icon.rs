//! Closed set of section icons.
//!
//! Schemas reference icons by symbolic name (the set the form generator is
//! allowed to emit). Unknown names resolve to the [`SectionIcon::HelpCircle`]
//! fallback instead of failing, so a schema with a novel icon name still
//! loads and renders.

use serde::de::Deserializer;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

/// Renderable icon handle for a form section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SectionIcon {
    Globe,
    Store,
    IceCream2,
    Package,
    Truck,
    CreditCard,
    ShoppingCart,
    /// Fallback for missing or unknown icon names.
    #[default]
    HelpCircle,
}

impl SectionIcon {
    /// Resolve a symbolic icon name, falling back to `HelpCircle`.
    pub fn from_name(name: &str) -> Self {
        match name {
            "Globe" => Self::Globe,
            "Store" => Self::Store,
            "IceCream2" => Self::IceCream2,
            "Package" => Self::Package,
            "Truck" => Self::Truck,
            "CreditCard" => Self::CreditCard,
            "ShoppingCart" => Self::ShoppingCart,
            _ => Self::HelpCircle,
        }
    }

    /// The symbolic name used on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Globe => "Globe",
            Self::Store => "Store",
            Self::IceCream2 => "IceCream2",
            Self::Package => "Package",
            Self::Truck => "Truck",
            Self::CreditCard => "CreditCard",
            Self::ShoppingCart => "ShoppingCart",
            Self::HelpCircle => "HelpCircle",
        }
    }
}

impl Serialize for SectionIcon {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for SectionIcon {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(Self::from_name(&name))
    }
}
