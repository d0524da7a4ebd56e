//! Product types.

use crate::ids::ProductId;
use crate::money::Money;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Product category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Cameras,
    Lenses,
    Lighting,
    Audio,
    Accessories,
    Presets,
    Luts,
    Templates,
    Scripts,
    Plugins,
}

impl Category {
    /// All categories in display order.
    pub const ALL: [Category; 10] = [
        Category::Cameras,
        Category::Lenses,
        Category::Lighting,
        Category::Audio,
        Category::Accessories,
        Category::Presets,
        Category::Luts,
        Category::Templates,
        Category::Scripts,
        Category::Plugins,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Cameras => "cameras",
            Category::Lenses => "lenses",
            Category::Lighting => "lighting",
            Category::Audio => "audio",
            Category::Accessories => "accessories",
            Category::Presets => "presets",
            Category::Luts => "luts",
            Category::Templates => "templates",
            Category::Scripts => "scripts",
            Category::Plugins => "plugins",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        let s = s.to_lowercase();
        Self::ALL.into_iter().find(|c| c.as_str() == s)
    }
}

/// Condition of a physical item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Condition {
    #[default]
    New,
    LikeNew,
    Used,
    Refurbished,
}

impl Condition {
    pub fn as_str(&self) -> &'static str {
        match self {
            Condition::New => "new",
            Condition::LikeNew => "like-new",
            Condition::Used => "used",
            Condition::Refurbished => "refurbished",
        }
    }
}

/// License model of a digital item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum LicenseType {
    #[default]
    SingleUse,
    MultiSeat,
    Subscription,
}

impl LicenseType {
    pub fn as_str(&self) -> &'static str {
        match self {
            LicenseType::SingleUse => "single-use",
            LicenseType::MultiSeat => "multi-seat",
            LicenseType::Subscription => "subscription",
        }
    }
}

/// Fields only physical products carry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct PhysicalDetails {
    pub brand: String,
    pub model: String,
    #[serde(default)]
    pub condition: Condition,
    /// Free-form spec sheet (e.g., "Sensor" -> "Full Frame").
    #[serde(default)]
    pub specifications: BTreeMap<String, String>,
    #[serde(default)]
    pub included_items: Vec<String>,
    #[serde(default)]
    pub stock: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight_grams: Option<u32>,
}

impl PhysicalDetails {
    pub fn new(brand: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            brand: brand.into(),
            model: model.into(),
            ..Default::default()
        }
    }
}

/// Fields only digital products carry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct DigitalDetails {
    pub file_type: String,
    #[serde(default)]
    pub file_size_bytes: u64,
    #[serde(default)]
    pub version: String,
    /// Host applications (e.g., "Lightroom").
    #[serde(default)]
    pub compatibility: Vec<String>,
    #[serde(default)]
    pub license: LicenseType,
    #[serde(default)]
    pub download_url: String,
}

impl DigitalDetails {
    pub fn new(file_type: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            file_type: file_type.into(),
            version: version.into(),
            ..Default::default()
        }
    }
}

/// Variant-specific product data, tagged by `type`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ProductDetails {
    Physical(PhysicalDetails),
    Digital(DigitalDetails),
}

impl ProductDetails {
    /// The serialized tag.
    pub fn kind(&self) -> &'static str {
        match self {
            ProductDetails::Physical(_) => "physical",
            ProductDetails::Digital(_) => "digital",
        }
    }

    /// Whether `other` carries the same tag.
    pub fn same_kind(&self, other: &ProductDetails) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }

    /// Text fields that feed the search index.
    pub fn text_fields(&self) -> Vec<&str> {
        match self {
            ProductDetails::Physical(p) => {
                let mut fields = vec![p.brand.as_str(), p.model.as_str(), p.condition.as_str()];
                fields.extend(p.specifications.values().map(String::as_str));
                fields.extend(p.included_items.iter().map(String::as_str));
                fields
            }
            ProductDetails::Digital(d) => {
                let mut fields = vec![d.file_type.as_str(), d.version.as_str(), d.license.as_str()];
                fields.extend(d.compatibility.iter().map(String::as_str));
                fields
            }
        }
    }
}

/// A product in the catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub category: Category,
    #[serde(default)]
    pub tags: BTreeSet<String>,
    /// Unit price; a record without one is priced at zero.
    #[serde(default)]
    pub price: Money,
    pub updated_at: DateTime<Utc>,
    #[serde(flatten)]
    pub details: ProductDetails,
    /// Arbitrary extra attributes. Only string values are searchable.
    #[serde(default)]
    pub metadata: BTreeMap<String, serde_json::Value>,
}

impl Product {
    /// Create a product stamped with the current time.
    pub fn new(
        id: impl Into<ProductId>,
        title: impl Into<String>,
        category: Category,
        price: Money,
        details: ProductDetails,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: String::new(),
            category,
            tags: BTreeSet::new(),
            price,
            updated_at: Utc::now(),
            details,
            metadata: BTreeMap::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.insert(tag.into());
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    pub fn with_updated_at(mut self, updated_at: DateTime<Utc>) -> Self {
        self.updated_at = updated_at;
        self
    }

    pub fn is_physical(&self) -> bool {
        matches!(self.details, ProductDetails::Physical(_))
    }

    pub fn is_digital(&self) -> bool {
        matches!(self.details, ProductDetails::Digital(_))
    }

    /// Merge `patch` into this product and stamp `updated_at`.
    ///
    /// Replacement details carrying a different variant tag are dropped so the
    /// product keeps its kind. Returns `false` when that happened.
    pub fn apply_patch(&mut self, patch: ProductPatch, now: DateTime<Utc>) -> bool {
        let ProductPatch {
            title,
            description,
            category,
            tags,
            price,
            details,
            metadata,
        } = patch;

        if let Some(title) = title {
            self.title = title;
        }
        if let Some(description) = description {
            self.description = description;
        }
        if let Some(category) = category {
            self.category = category;
        }
        if let Some(tags) = tags {
            self.tags = tags;
        }
        if let Some(price) = price {
            self.price = price;
        }
        if let Some(metadata) = metadata {
            self.metadata = metadata;
        }

        let mut kept_kind = true;
        if let Some(details) = details {
            if self.details.same_kind(&details) {
                self.details = details;
            } else {
                kept_kind = false;
            }
        }

        self.updated_at = now;
        kept_kind
    }
}

/// A partial update to a product. `None` fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ProductPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<BTreeSet<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Money>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<ProductDetails>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<BTreeMap<String, serde_json::Value>>,
}

impl ProductPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    pub fn tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = Some(tags.into_iter().map(Into::into).collect());
        self
    }

    pub fn price(mut self, price: Money) -> Self {
        self.price = Some(price);
        self
    }

    pub fn details(mut self, details: ProductDetails) -> Self {
        self.details = Some(details);
        self
    }

    pub fn metadata(mut self, metadata: BTreeMap<String, serde_json::Value>) -> Self {
        self.metadata = Some(metadata);
        self
    }
}

/// One entry of a batch update.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductChange {
    pub id: ProductId,
    pub patch: ProductPatch,
}

impl ProductChange {
    pub fn new(id: impl Into<ProductId>, patch: ProductPatch) -> Self {
        Self {
            id: id.into(),
            patch,
        }
    }
}
