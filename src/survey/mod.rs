//! Geological survey catalog.
//!
//! Drill sites shown on the exchange's map. Encrypted sites keep their
//! mineral and token value hidden until the viewer asks to reveal them.

use serde::Serialize;

/// Placeholder shown instead of a hidden field.
pub const REDACTED: &str = "████████";

/// Shorter placeholder for value badges.
pub const REDACTED_SHORT: &str = "████";

/// Shown for every encrypted site, revealed or not.
pub const ENCRYPTED_NOTICE: &str = "Full details protected until trade finalization";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SiteStatus {
    Active,
    Pending,
    Completed,
}

impl SiteStatus {
    /// Badge style class.
    pub fn badge(&self) -> &'static str {
        match self {
            SiteStatus::Active => "accent",
            SiteStatus::Pending => "primary",
            SiteStatus::Completed => "secondary",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DrillSite {
    pub id: &'static str,
    /// Horizontal map position, percent.
    pub x: u8,
    /// Vertical map position, percent.
    pub y: u8,
    pub mineral: &'static str,
    pub value: &'static str,
    pub encrypted: bool,
    pub status: SiteStatus,
}

static SITES: [DrillSite; 5] = [
    DrillSite { id: "1", x: 25, y: 35, mineral: "Copper", value: "2.5M RWAC", encrypted: true, status: SiteStatus::Active },
    DrillSite { id: "2", x: 60, y: 45, mineral: "Gold", value: "8.2M RWAG", encrypted: false, status: SiteStatus::Pending },
    DrillSite { id: "3", x: 40, y: 70, mineral: "Silver", value: "1.8M RWAS", encrypted: true, status: SiteStatus::Completed },
    DrillSite { id: "4", x: 75, y: 25, mineral: "Lithium", value: "4.1M RWAL", encrypted: false, status: SiteStatus::Active },
    DrillSite { id: "5", x: 15, y: 80, mineral: "Iron", value: "950K RWAI", encrypted: true, status: SiteStatus::Pending },
];

/// All surveyed sites.
pub fn sites() -> &'static [DrillSite] {
    &SITES
}

pub fn find_site(id: &str) -> Option<&'static DrillSite> {
    SITES.iter().find(|site| site.id == id)
}

/// A site as a viewer sees it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SiteView {
    pub id: &'static str,
    pub x: u8,
    pub y: u8,
    pub mineral: &'static str,
    pub value: &'static str,
    pub marker: &'static str,
    pub status: SiteStatus,
    pub status_badge: &'static str,
    pub encrypted: bool,
    pub masked: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<&'static str>,
}

impl DrillSite {
    fn masked(&self, show_encrypted: bool) -> bool {
        self.encrypted && !show_encrypted
    }

    /// Marker style class.
    pub fn marker(&self, show_encrypted: bool) -> &'static str {
        if self.masked(show_encrypted) {
            return "encrypted";
        }
        match self.mineral {
            "Copper" => "copper",
            "Gold" => "gold",
            "Silver" => "stone",
            "Lithium" => "primary",
            "Iron" => "earth",
            _ => "muted",
        }
    }

    pub fn view(&self, show_encrypted: bool) -> SiteView {
        let masked = self.masked(show_encrypted);
        SiteView {
            id: self.id,
            x: self.x,
            y: self.y,
            mineral: if masked { REDACTED } else { self.mineral },
            value: if masked { REDACTED } else { self.value },
            marker: self.marker(show_encrypted),
            status: self.status,
            status_badge: self.status.badge(),
            encrypted: self.encrypted,
            masked,
            notice: self.encrypted.then_some(ENCRYPTED_NOTICE),
        }
    }
}

/// One row of the active-trades list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActiveTrade {
    pub site_id: &'static str,
    /// e.g. "Copper Rights".
    pub title: String,
    /// Leading amount of the token value, e.g. "2.5M".
    pub badge: &'static str,
}

pub fn active_trades(show_encrypted: bool) -> Vec<ActiveTrade> {
    SITES
        .iter()
        .filter(|site| site.status == SiteStatus::Active)
        .map(|site| {
            let masked = site.masked(show_encrypted);
            ActiveTrade {
                site_id: site.id,
                title: format!("{} Rights", if masked { REDACTED } else { site.mineral }),
                badge: if masked {
                    REDACTED_SHORT
                } else {
                    site.value.split(' ').next().unwrap_or(site.value)
                },
            }
        })
        .collect()
}
