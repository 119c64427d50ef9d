//! Predefined avatars and backgrounds offered by the studio form.

use serde::Serialize;

/// One selectable option: the provider identifier and a human label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CatalogueEntry {
    pub id: &'static str,
    pub label: &'static str,
}

/// Avatar used when a request does not name one.
pub const DEFAULT_AVATAR: &str = "anna_costume1_cameraA";

/// Background used when a request does not name one.
pub const DEFAULT_BACKGROUND: &str = "green_screen";

pub const AVATARS: &[CatalogueEntry] = &[
    CatalogueEntry {
        id: "anna_costume1_cameraA",
        label: "Anna (Costume 1, Camera A)",
    },
    CatalogueEntry {
        id: "anna_costume1_cameraB",
        label: "Anna (Costume 1, Camera B)",
    },
    CatalogueEntry {
        id: "james_costume1_cameraA",
        label: "James (Costume 1, Camera A)",
    },
    CatalogueEntry {
        id: "james_costume1_cameraB",
        label: "James (Costume 1, Camera B)",
    },
];

pub const BACKGROUNDS: &[CatalogueEntry] = &[
    CatalogueEntry {
        id: "green_screen",
        label: "Green Screen",
    },
    CatalogueEntry {
        id: "office",
        label: "Office",
    },
    CatalogueEntry {
        id: "white",
        label: "White Background",
    },
    CatalogueEntry {
        id: "blue",
        label: "Blue Background",
    },
];

/// Look up an entry by provider identifier.
pub fn find(entries: &[CatalogueEntry], id: &str) -> Option<CatalogueEntry> {
    entries.iter().copied().find(|e| e.id == id)
}
