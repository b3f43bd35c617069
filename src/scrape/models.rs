// src/scrape/models.rs

/// One table row exactly as the DOM gave it to us: untrimmed meanings,
/// no interpretation. Every field is optional because the extractor
/// records what it saw, not what should have been there.
#[derive(Debug, Clone, Default)]
pub struct RawRow {
    /// 0-based position in source presentation order, counted across
    /// pages.
    pub index: usize,
    /// The ladder's own rank column, when the variant being served has
    /// one. Captured for diagnostics only.
    pub source_rank: Option<u32>,
    pub character_name: Option<String>,
    pub profile_url: Option<String>,
    /// Text of the level cell, e.g. "96" or "96 Berserker".
    pub level: Option<String>,
    /// Alt text of the ascendancy icon.
    pub ascendancy_alt: Option<String>,
    /// Src of the ascendancy icon, the fallback when alt is empty.
    pub ascendancy_icon: Option<String>,
    pub life: Option<String>,
    pub energy_shield: Option<String>,
    pub effective_hp: Option<String>,
    pub dps: Option<String>,
    /// Src of the main skill gem icon.
    pub skill_icon: Option<String>,
    /// Alt texts of the keystone icons, in display order.
    pub keystone_alts: Vec<String>,
}
