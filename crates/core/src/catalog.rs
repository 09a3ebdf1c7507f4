//! Shared catalog vocabulary and mapping tables.
//!
//! The listing form and the product catalog speak slightly different
//! dialects: the form offers marketing-facing groupings (gowns, suits,
//! watches) while the catalog schema has a fixed storage enumeration. This
//! module is the single owner of both vocabularies and of the mapping
//! between them, consumed by the wizard on one side and the product service
//! on the other.
//!
//! Mapping policy: unmapped categories fall back to [`Category::Other`];
//! unmapped size and condition values pass through to storage unchanged.

use serde::{Deserialize, Serialize};

// =============================================================================
// Categories
// =============================================================================

/// The category vocabulary offered by the listing form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListingCategory {
    Gowns,
    Dresses,
    Suits,
    Outerwear,
    Bags,
    Shoes,
    Jewelry,
    Watches,
    Accessories,
    Tops,
}

impl ListingCategory {
    /// All form categories in display order.
    pub const ALL: [Self; 10] = [
        Self::Gowns,
        Self::Dresses,
        Self::Suits,
        Self::Outerwear,
        Self::Bags,
        Self::Shoes,
        Self::Jewelry,
        Self::Watches,
        Self::Accessories,
        Self::Tops,
    ];

    /// The wire value sent to the product service.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Gowns => "gowns",
            Self::Dresses => "dresses",
            Self::Suits => "suits",
            Self::Outerwear => "outerwear",
            Self::Bags => "bags",
            Self::Shoes => "shoes",
            Self::Jewelry => "jewelry",
            Self::Watches => "watches",
            Self::Accessories => "accessories",
            Self::Tops => "tops",
        }
    }

    /// Display label shown in the form.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Gowns => "Gowns",
            Self::Dresses => "Dresses",
            Self::Suits => "Suits & Tailoring",
            Self::Outerwear => "Outerwear",
            Self::Bags => "Handbags",
            Self::Shoes => "Shoes",
            Self::Jewelry => "Fine Jewelry",
            Self::Watches => "Watches",
            Self::Accessories => "Accessories",
            Self::Tops => "Tops & Blouses",
        }
    }

    /// The storage category this form category maps onto.
    #[must_use]
    pub const fn storage(self) -> Category {
        match self {
            Self::Gowns | Self::Dresses => Category::Dresses,
            Self::Suits => Category::Other,
            Self::Outerwear => Category::Outerwear,
            Self::Bags => Category::Bags,
            Self::Shoes => Category::Shoes,
            Self::Jewelry => Category::Jewelry,
            Self::Watches | Self::Accessories => Category::Accessories,
            Self::Tops => Category::Tops,
        }
    }
}

/// The category enumeration of the catalog schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Tops,
    Bottoms,
    Dresses,
    Outerwear,
    Shoes,
    Accessories,
    Bags,
    Jewelry,
    Activewear,
    Swimwear,
    Other,
}

impl Category {
    /// The storage token for this category.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Tops => "tops",
            Self::Bottoms => "bottoms",
            Self::Dresses => "dresses",
            Self::Outerwear => "outerwear",
            Self::Shoes => "shoes",
            Self::Accessories => "accessories",
            Self::Bags => "bags",
            Self::Jewelry => "jewelry",
            Self::Activewear => "activewear",
            Self::Swimwear => "swimwear",
            Self::Other => "other",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "tops" => Ok(Self::Tops),
            "bottoms" => Ok(Self::Bottoms),
            "dresses" => Ok(Self::Dresses),
            "outerwear" => Ok(Self::Outerwear),
            "shoes" => Ok(Self::Shoes),
            "accessories" => Ok(Self::Accessories),
            "bags" => Ok(Self::Bags),
            "jewelry" => Ok(Self::Jewelry),
            "activewear" => Ok(Self::Activewear),
            "swimwear" => Ok(Self::Swimwear),
            "other" => Ok(Self::Other),
            _ => Err(format!("invalid category: {s}")),
        }
    }
}

/// Map an incoming category value onto the storage enumeration.
///
/// Form-only groupings are folded into their storage home; values already in
/// the storage vocabulary map to themselves; anything unrecognized falls
/// back to [`Category::Other`].
#[must_use]
pub fn map_category(value: &str) -> Category {
    match value {
        "gowns" => Category::Dresses,
        "suits" => Category::Other,
        "watches" => Category::Accessories,
        direct => direct.parse().unwrap_or(Category::Other),
    }
}

// =============================================================================
// Sizes
// =============================================================================

/// Garment sizes offered by the listing form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Size {
    #[serde(rename = "XXS")]
    Xxs,
    #[serde(rename = "XS")]
    Xs,
    #[serde(rename = "S")]
    S,
    #[serde(rename = "M")]
    M,
    #[serde(rename = "L")]
    L,
    #[serde(rename = "XL")]
    Xl,
    #[serde(rename = "XXL")]
    Xxl,
    #[serde(rename = "XXXL")]
    Xxxl,
    #[serde(rename = "One Size")]
    OneSize,
}

impl Size {
    /// All sizes in display order.
    pub const ALL: [Self; 9] = [
        Self::Xxs,
        Self::Xs,
        Self::S,
        Self::M,
        Self::L,
        Self::Xl,
        Self::Xxl,
        Self::Xxxl,
        Self::OneSize,
    ];

    /// The label shown in the form and sent on the wire.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Xxs => "XXS",
            Self::Xs => "XS",
            Self::S => "S",
            Self::M => "M",
            Self::L => "L",
            Self::Xl => "XL",
            Self::Xxl => "XXL",
            Self::Xxxl => "XXXL",
            Self::OneSize => "One Size",
        }
    }

    /// The storage token for this size.
    #[must_use]
    pub const fn storage_token(self) -> &'static str {
        match self {
            Self::OneSize => "ONE_SIZE",
            other => other.label(),
        }
    }
}

/// Map an incoming size value onto its storage token.
///
/// Known labels get their storage spelling; unknown values pass through
/// unchanged.
#[must_use]
pub fn map_size(value: &str) -> String {
    match value {
        "One Size" => "ONE_SIZE".to_owned(),
        "XXS" | "XS" | "S" | "M" | "L" | "XL" | "XXL" | "XXXL" => value.to_owned(),
        other => other.to_owned(),
    }
}

// =============================================================================
// Conditions
// =============================================================================

/// Item condition grades.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    NewWithTags,
    LikeNew,
    Good,
    Fair,
}

impl Condition {
    /// All conditions in display order (best first).
    pub const ALL: [Self; 4] = [Self::NewWithTags, Self::LikeNew, Self::Good, Self::Fair];

    /// The storage token for this condition.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NewWithTags => "new_with_tags",
            Self::LikeNew => "like_new",
            Self::Good => "good",
            Self::Fair => "fair",
        }
    }

    /// Display label shown in the form.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::NewWithTags => "New with Tags",
            Self::LikeNew => "Pristine",
            Self::Good => "Excellent",
            Self::Fair => "Good",
        }
    }

    /// Longer description shown under the label.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::NewWithTags => "Unworn, original tags and packaging intact",
            Self::LikeNew => "Worn once or twice for special occasions, flawless condition",
            Self::Good => "Gently worn, professionally maintained, minimal signs of wear",
            Self::Fair => "Visible wear consistent with age, well-preserved",
        }
    }
}

impl std::fmt::Display for Condition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Map an incoming condition value onto its storage token.
///
/// The known grades map to themselves; unknown values pass through
/// unchanged.
#[must_use]
pub fn map_condition(value: &str) -> String {
    match value {
        "new_with_tags" | "like_new" | "good" | "fair" => value.to_owned(),
        other => other.to_owned(),
    }
}

// =============================================================================
// Shipping
// =============================================================================

/// Shipping weight categories and their flat rates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ShippingWeight {
    Small,
    #[default]
    Medium,
    Large,
}

impl ShippingWeight {
    /// All weight categories in display order.
    pub const ALL: [Self; 3] = [Self::Small, Self::Medium, Self::Large];

    /// The storage token for this weight category.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Small => "small",
            Self::Medium => "medium",
            Self::Large => "large",
        }
    }

    /// Display label shown in the form.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Small => "Small",
            Self::Medium => "Medium",
            Self::Large => "Large",
        }
    }

    /// Example items shown under the label.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Small => "Light items (t-shirts, accessories)",
            Self::Medium => "Regular items (jeans, dresses)",
            Self::Large => "Heavy items (coats, boots)",
        }
    }

    /// Flat shipping rate displayed next to the option.
    #[must_use]
    pub const fn flat_rate(self) -> &'static str {
        match self {
            Self::Small => "$4.99",
            Self::Medium => "$7.99",
            Self::Large => "$12.99",
        }
    }
}

impl std::fmt::Display for ShippingWeight {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ShippingWeight {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "small" => Ok(Self::Small),
            "medium" => Ok(Self::Medium),
            "large" => Ok(Self::Large),
            _ => Err(format!("invalid shipping weight: {s}")),
        }
    }
}

// =============================================================================
// Statuses
// =============================================================================

/// Lifecycle status of a locally-stored listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ListingStatus {
    Draft,
    #[default]
    Available,
    Sold,
}

/// Lifecycle status of a catalog product row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ProductStatus {
    Draft,
    #[default]
    Available,
    Sold,
    Archived,
}

impl ProductStatus {
    /// The storage token for this status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Available => "available",
            Self::Sold => "sold",
            Self::Archived => "archived",
        }
    }
}

impl std::fmt::Display for ProductStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ProductStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(Self::Draft),
            "available" => Ok(Self::Available),
            "sold" => Ok(Self::Sold),
            "archived" => Ok(Self::Archived),
            _ => Err(format!("invalid product status: {s}")),
        }
    }
}

/// Fulfillment status of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Pending,
    Confirmed,
    Shipped,
    Delivered,
    Cancelled,
}

/// How a sold item reaches the buyer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FulfillmentMethod {
    Delivery,
    Pickup,
}

/// Account standing of a seller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SellerStatus {
    Active,
    Pending,
    Suspended,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_map_category_form_groupings() {
        assert_eq!(map_category("gowns"), Category::Dresses);
        assert_eq!(map_category("suits"), Category::Other);
        assert_eq!(map_category("watches"), Category::Accessories);
    }

    #[test]
    fn test_map_category_direct() {
        assert_eq!(map_category("dresses"), Category::Dresses);
        assert_eq!(map_category("bags"), Category::Bags);
        assert_eq!(map_category("activewear"), Category::Activewear);
    }

    #[test]
    fn test_map_category_unknown_falls_back_to_other() {
        assert_eq!(map_category("spacesuits"), Category::Other);
        assert_eq!(map_category(""), Category::Other);
    }

    #[test]
    fn test_form_category_storage_agrees_with_map() {
        for category in ListingCategory::ALL {
            assert_eq!(category.storage(), map_category(category.as_str()));
        }
    }

    #[test]
    fn test_map_size_one_size_token() {
        assert_eq!(map_size("One Size"), "ONE_SIZE");
        assert_eq!(map_size("M"), "M");
    }

    #[test]
    fn test_map_size_unknown_passes_through() {
        assert_eq!(map_size("EU 38"), "EU 38");
    }

    #[test]
    fn test_map_condition_passes_through() {
        assert_eq!(map_condition("like_new"), "like_new");
        assert_eq!(map_condition("museum_grade"), "museum_grade");
    }

    #[test]
    fn test_size_serde_uses_labels() {
        assert_eq!(
            serde_json::to_string(&Size::OneSize).unwrap(),
            "\"One Size\""
        );
        let size: Size = serde_json::from_str("\"XXL\"").unwrap();
        assert_eq!(size, Size::Xxl);
    }

    #[test]
    fn test_condition_serde_tokens() {
        assert_eq!(
            serde_json::to_string(&Condition::NewWithTags).unwrap(),
            "\"new_with_tags\""
        );
    }

    #[test]
    fn test_product_status_roundtrip() {
        for status in [
            ProductStatus::Draft,
            ProductStatus::Available,
            ProductStatus::Sold,
            ProductStatus::Archived,
        ] {
            assert_eq!(status.as_str().parse::<ProductStatus>().unwrap(), status);
        }
    }

    #[test]
    fn test_shipping_weight_default_is_medium() {
        assert_eq!(ShippingWeight::default(), ShippingWeight::Medium);
    }
}
