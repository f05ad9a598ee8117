use std::sync::LazyLock;

use crate::types::{CapacityTable, ErrorCorrectionLevel, SizeProfile, SizeTier};

/// Highest QR symbol version.
pub const MAX_VERSION: u8 = 40;

const DEFAULT_INDEX: usize = 2;

static CATALOG: LazyLock<[SizeProfile; 5]> = LazyLock::new(|| {
    [
        tier(SizeTier::Xs, "Extra small", 5, 2, "For very dense print", [100, 80, 60, 40], 10),
        tier(SizeTier::S, "Small", 8, 3, "For documents and business cards", [200, 160, 120, 80], 20),
        tier(SizeTier::M, "Medium", 10, 4, "General purpose", [300, 240, 180, 120], 30),
        tier(SizeTier::L, "Large", 15, 5, "For posters and displays", [500, 400, 300, 200], 40),
        tier(SizeTier::Xl, "Extra large", 20, 6, "For large displays and banners", [700, 550, 400, 280], 40),
    ]
});

fn tier(
    id: SizeTier,
    name: &str,
    box_size: u32,
    border: u32,
    description: &str,
    [l, m, q, h]: [u32; 4],
    max_version: u8,
) -> SizeProfile {
    let chars = |n: u32| format!("~{n} characters");
    SizeProfile {
        id,
        name: name.to_string(),
        box_size,
        border,
        description: description.to_string(),
        capacity: CapacityTable {
            l: chars(l),
            m: chars(m),
            q: chars(q),
            h: chars(h),
        },
        max_version: Some(max_version),
    }
}

/// The built-in tiers, smallest first.
pub fn builtin() -> &'static [SizeProfile; 5] {
    &CATALOG
}

pub fn default_profile() -> &'static SizeProfile {
    &CATALOG[DEFAULT_INDEX]
}

/// Look up a built-in tier; unknown ids get tier `m`.
pub fn resolve(tier_id: &str) -> &'static SizeProfile {
    resolve_in(builtin(), tier_id)
}

/// Look up a tier in `catalog`. Unknown ids get the catalog's `m` tier, or the
/// built-in one if the catalog has none.
pub fn resolve_in<'a>(catalog: &'a [SizeProfile], tier_id: &str) -> &'a SizeProfile {
    let find = |tier: SizeTier| catalog.iter().find(|p| p.id == tier);
    SizeTier::parse(tier_id)
        .and_then(find)
        .or_else(|| find(SizeTier::M))
        .unwrap_or_else(|| default_profile())
}

/// Advisory capacity text. Unknown levels read the `M` column.
pub fn capacity_estimate(tier_id: &str, level_id: &str) -> &'static str {
    resolve(tier_id).capacity.get(ErrorCorrectionLevel::from_id(level_id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_is_ordered_and_complete() {
        let ids: Vec<&str> = builtin().iter().map(|p| p.id.id()).collect();
        assert_eq!(ids, ["xs", "s", "m", "l", "xl"]);
        assert!(builtin().iter().all(|p| p.box_size > 0));
        assert!(builtin().windows(2).all(|w| w[0].box_size < w[1].box_size));
    }

    #[test]
    fn resolve_known_tiers() {
        let xs = resolve("xs");
        assert_eq!((xs.box_size, xs.border, xs.max_version), (5, 2, Some(10)));
        let xl = resolve("xl");
        assert_eq!((xl.box_size, xl.border, xl.max_version), (20, 6, Some(40)));
    }

    #[test]
    fn unknown_tier_resolves_to_medium() {
        for id in ["", "XL", "huge", "m "] {
            assert_eq!(resolve(id).id, SizeTier::M, "tier id {id:?}");
        }
        assert_eq!(default_profile().box_size, 10);
    }

    #[test]
    fn custom_catalog_without_medium_uses_builtin_medium() {
        let catalog = vec![resolve("xs").clone()];
        assert_eq!(resolve_in(&catalog, "xs").id, SizeTier::Xs);
        assert_eq!(resolve_in(&catalog, "l"), default_profile());
        assert_eq!(resolve_in(&[], "s"), default_profile());
    }

    #[test]
    fn capacity_estimates() {
        assert_eq!(capacity_estimate("m", "M"), "~240 characters");
        assert_eq!(capacity_estimate("xs", "H"), "~40 characters");
        assert_eq!(capacity_estimate("xl", "L"), "~700 characters");
    }

    #[test]
    fn capacity_unknown_level_reads_medium_column() {
        assert_eq!(capacity_estimate("s", "Z"), "~160 characters");
        assert_eq!(capacity_estimate("bogus", ""), "~240 characters");
    }
}
