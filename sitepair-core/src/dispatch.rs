//! Element dispatch tables.
//!
//! A [`Profile`] maps namespace-stripped local names to a closed set of
//! handler kinds. Matching is exact and case-sensitive; names missing from
//! the table are a no-op, not an error. Tables are static `phf` maps, so a
//! new element kind is one map entry (and at most one new variant) away.

use phf::phf_map;

use crate::scalar::ScalarKind;

/// Which of the two pairing queues a value element feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueSlot {
    First,
    Second,
}

/// Handler kind for a recognized element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    /// Leaf whose text is echoed verbatim to the output stream
    /// (e.g. `publicationTime`).
    Announcement,
    /// Block boundary: the start tag resets the block, the end tag flushes
    /// then resets.
    BlockBoundary,
    /// Carries the site identifier in the named attribute.
    SiteReference { attr: &'static str },
    /// Leaf whose text becomes the block's secondary context
    /// (e.g. a record version time).
    Context,
    /// Numeric observation for one of the two pairing slots.
    Value { slot: ValueSlot, kind: ScalarKind },
}

/// How matched pairs are rendered by the line sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordStyle {
    /// `seq site first second`
    Sequenced,
    /// `site context first second`
    Contextual,
}

/// One extraction vocabulary: element table plus record rendering.
pub struct Profile {
    pub name: &'static str,
    pub elements: &'static phf::Map<&'static str, ElementKind>,
    pub style: RecordStyle,
}

impl Profile {
    /// Look up the handler kind for a local name.
    #[inline]
    pub fn lookup(&self, local_name: &str) -> Option<ElementKind> {
        self.elements.get(local_name).copied()
    }

    /// Is this name the block boundary element?
    #[inline]
    pub fn is_block_boundary(&self, local_name: &str) -> bool {
        matches!(self.lookup(local_name), Some(ElementKind::BlockBoundary))
    }
}

static TRAFFIC_FLOW_ELEMENTS: phf::Map<&'static str, ElementKind> = phf_map! {
    "publicationTime" => ElementKind::Announcement,
    "siteMeasurements" => ElementKind::BlockBoundary,
    "measurementSiteReference" => ElementKind::SiteReference { attr: "id" },
    "speed" => ElementKind::Value { slot: ValueSlot::First, kind: ScalarKind::Float },
    "vehicleFlowRate" => ElementKind::Value { slot: ValueSlot::Second, kind: ScalarKind::Integer },
};

/// Speed / vehicle-flow-rate extraction from measured-data publications.
pub static TRAFFIC_FLOW: Profile = Profile {
    name: "traffic-flow",
    elements: &TRAFFIC_FLOW_ELEMENTS,
    style: RecordStyle::Sequenced,
};

static SITE_TABLE_ELEMENTS: phf::Map<&'static str, ElementKind> = phf_map! {
    "publicationTime" => ElementKind::Announcement,
    "measurementSiteTable" => ElementKind::BlockBoundary,
    "measurementSiteRecord" => ElementKind::SiteReference { attr: "id" },
    "measurementSiteRecordVersionTime" => ElementKind::Context,
    "latitude" => ElementKind::Value { slot: ValueSlot::First, kind: ScalarKind::Float },
    "longitude" => ElementKind::Value { slot: ValueSlot::Second, kind: ScalarKind::Float },
};

/// Latitude / longitude extraction from measurement-site tables.
pub static SITE_TABLE: Profile = Profile {
    name: "site-table",
    elements: &SITE_TABLE_ELEMENTS,
    style: RecordStyle::Contextual,
};
