//! Avatar catalog offered at onboarding

use crate::error::ModelError;

/// A selectable avatar background
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Avatar {
    /// Catalog identifier
    pub id: u8,
    /// Display name
    pub name: &'static str,
    /// Background image
    pub url: &'static str,
}

impl Avatar {
    /// Look up an avatar by id
    pub fn find(id: u8) -> Result<&'static Avatar, ModelError> {
        AVATARS.iter().find(|a| a.id == id).ok_or(ModelError::UnknownAvatar(id))
    }
}

/// Every avatar, first is the onboarding default
pub static AVATARS: [Avatar; 4] = [
    Avatar {
        id: 1,
        name: "Whispering Woods",
        url: "https://images.unsplash.com/photo-1448375240586-882707db888b?q=80&w=1956&auto=format&fit=crop",
    },
    Avatar {
        id: 2,
        name: "Harmony Valley",
        url: "https://images.unsplash.com/photo-1509099395498-a26c959ba0b7?q=80&w=1960&auto=format&fit=crop",
    },
    Avatar {
        id: 3,
        name: "Mountain Peak",
        url: "https://images.unsplash.com/photo-1486870591958-9b9d0d1dda99?q=80&w=1976&auto=format&fit=crop",
    },
    Avatar {
        id: 4,
        name: "Golden Dunes",
        url: "https://images.unsplash.com/photo-1473580044384-7ba9967e16a0?q=80&w=2070&auto=format&fit=crop",
    },
];
