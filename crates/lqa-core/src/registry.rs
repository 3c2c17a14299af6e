//! The declarative field registry.
//!
//! One immutable table shared by export shaping and change detection, so
//! the set of tracked fields is defined in exactly one place. Registry
//! order is the report order: change lists come out in this order no
//! matter which fields changed.

/// Where a field lives in a stored snapshot, and whether it is a first-class
/// observation or computed from one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageClass {
    /// Extracted page attribute; may be nested under an `attributes`
    /// grouping in older stored snapshots.
    Attribute,
    /// Stored at the top level of a snapshot.
    Root,
    /// Computed from another field; never compared.
    Derived,
}

/// One registry entry.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    /// Serialized field name (matches [`crate::Record`]'s serde output).
    pub name: &'static str,
    pub class: StorageClass,
    /// Entity-identifier fields key the snapshot lookup itself and are
    /// excluded from comparison.
    pub identity: bool,
}

impl FieldSpec {
    const fn attr(name: &'static str) -> Self {
        Self {
            name,
            class: StorageClass::Attribute,
            identity: false,
        }
    }

    const fn derived(name: &'static str) -> Self {
        Self {
            name,
            class: StorageClass::Derived,
            identity: false,
        }
    }

    /// True when this field participates in field-level comparison.
    #[must_use]
    pub fn compared(&self) -> bool {
        self.class != StorageClass::Derived && !self.identity
    }
}

/// The single source of truth for tracked fields, in report order.
pub const FIELD_REGISTRY: &[FieldSpec] = &[
    FieldSpec::attr("quality_score"),
    FieldSpec::attr("marketplace"),
    FieldSpec::attr("brand"),
    FieldSpec::attr("page_title"),
    FieldSpec::attr("meta_title"),
    FieldSpec {
        name: "media_asin",
        class: StorageClass::Attribute,
        identity: true,
    },
    FieldSpec::attr("parent_asin"),
    FieldSpec::attr("display_price"),
    FieldSpec::attr("stock_status"),
    FieldSpec::attr("sold_by"),
    FieldSpec::attr("rating_raw"),
    FieldSpec::derived("rating_value"),
    FieldSpec::attr("reviews_raw"),
    FieldSpec::derived("review_count"),
    FieldSpec::attr("bsr"),
    FieldSpec::attr("free_delivery_date"),
    FieldSpec::attr("paid_delivery_date"),
    FieldSpec::attr("prime_or_fastest_delivery_date"),
    FieldSpec::attr("delivery_location"),
    FieldSpec::attr("has_bullets"),
    FieldSpec::attr("bullets"),
    FieldSpec::derived("bullet_count"),
    FieldSpec::attr("has_description"),
    FieldSpec::attr("description"),
    FieldSpec::derived("description_length"),
    FieldSpec::attr("variation_exists"),
    FieldSpec::attr("variation_theme"),
    FieldSpec::attr("variation_count"),
    FieldSpec::attr("variation_family"),
    FieldSpec::attr("has_brand_story"),
    FieldSpec::attr("brand_story_images"),
    FieldSpec::attr("has_aplus"),
    FieldSpec::attr("aplus_images"),
    FieldSpec::attr("has_video"),
    FieldSpec::attr("videos"),
    FieldSpec::derived("images"),
    FieldSpec {
        name: "url",
        class: StorageClass::Root,
        identity: true,
    },
];
