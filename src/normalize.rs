// normalize.rs
//
// Pure text-to-value parsing for ladder cells. Nothing here touches the
// network or the DOM; callers hand in raw strings and decide what a
// `None` means for their field.

use once_cell::sync::OnceCell;
use regex::Regex;

/// Image extensions the icon-name deriver recognizes. A final path
/// segment with any other extension is passed through unsplit.
const IMAGE_EXTENSIONS: [&str; 5] = ["png", "webp", "jpg", "jpeg", "gif"];

/// Cell texts that mean "no value here" rather than a garbled one.
pub fn is_empty_marker(text: &str) -> bool {
    let trimmed = text.trim();
    trimmed.is_empty() || trimmed == "-" || trimmed.eq_ignore_ascii_case("any")
}

/// Parse a ladder magnitude: `63` and `5,240` directly, `63k`/`63K`
/// scaled by a thousand, `1.3M`/`1.3m` by a million. Returns `None` for
/// anything else; the caller decides whether that absence is silent or
/// a flagged issue.
pub fn parse_scaled_number(value: &str) -> Option<u64> {
    let value = value.trim();
    let (head, scale) = match value.chars().last()? {
        'k' | 'K' => (&value[..value.len() - 1], 1_000u64),
        'm' | 'M' => (&value[..value.len() - 1], 1_000_000u64),
        _ => (value, 1),
    };
    if scale == 1 {
        return head.replace(',', "").parse::<u64>().ok();
    }
    let magnitude: f64 = head.trim().parse().ok()?;
    if !magnitude.is_finite() || magnitude < 0.0 {
        return None;
    }
    Some((magnitude * scale as f64) as u64)
}

/// Derive a display name from a gem or ascendancy icon reference.
///
/// `.../SpikeSlamGem.png?w=1` becomes `Spike Slam`: final path segment,
/// minus query, minus extension, minus a trailing `Gem`, then split at
/// camel-case boundaries. A segment without a known image extension is
/// returned as-is rather than guessed at.
pub fn name_from_icon(reference: &str) -> Option<String> {
    let reference = reference.trim();
    if reference.is_empty() {
        return None;
    }
    let path = reference.split(['?', '#']).next().unwrap_or(reference);
    let segment = path.rsplit('/').next().unwrap_or(path);
    if segment.is_empty() {
        return None;
    }
    let Some(stem) = strip_image_extension(segment) else {
        return Some(segment.to_string());
    };
    let stem = stem.strip_suffix("Gem").unwrap_or(stem);
    let name = split_camel_words(stem);
    if name.is_empty() {
        None
    } else {
        Some(name)
    }
}

fn strip_image_extension(segment: &str) -> Option<&str> {
    let (stem, extension) = segment.rsplit_once('.')?;
    IMAGE_EXTENSIONS
        .iter()
        .any(|known| extension.eq_ignore_ascii_case(known))
        .then_some(stem)
}

/// `SpikeSlam` -> `Spike Slam`, `VortexOfProjection` -> `Vortex Of
/// Projection`. Two passes: lower-to-upper boundaries first, then
/// capital runs followed by a lowercase letter.
fn split_camel_words(compact: &str) -> String {
    static LOWER_UPPER: OnceCell<Regex> = OnceCell::new();
    static CAPITAL_RUN: OnceCell<Regex> = OnceCell::new();
    let lower_upper = LOWER_UPPER.get_or_init(|| Regex::new(r"([a-z])([A-Z])").unwrap());
    let capital_run = CAPITAL_RUN.get_or_init(|| Regex::new(r"([A-Z])([A-Z][a-z])").unwrap());

    let spaced = lower_upper.replace_all(compact, "$1 $2");
    let spaced = capital_run.replace_all(&spaced, "$1 $2");
    spaced.trim().to_string()
}

/// Pull the account segment out of a profile link shaped like
/// `/builds/<league>/character/<account>/<character>`.
pub fn account_from_profile_url(profile_url: &str) -> Option<String> {
    let path = profile_url.split(['?', '#']).next().unwrap_or(profile_url);
    let mut segments = path.split('/');
    segments.find(|segment| *segment == "character")?;
    segments
        .next()
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
}

/// Keystone alt texts arrive clean in practice; trim is all they need.
pub fn clean_keystone_name(name: &str) -> String {
    name.trim().to_string()
}

/// Ascendancy labels poe.ninja attaches to builds, including the base
/// classes shown for characters that have not ascended yet. Values
/// outside this set are kept verbatim and flagged, so schema drift shows
/// up in the run summary instead of disappearing.
pub const KNOWN_ASCENDANCIES: &[&str] = &[
    // Base classes, pre-ascendancy
    "Marauder",
    "Duelist",
    "Ranger",
    "Shadow",
    "Witch",
    "Templar",
    "Scion",
    // Ascendancy classes
    "Juggernaut",
    "Berserker",
    "Chieftain",
    "Slayer",
    "Gladiator",
    "Champion",
    "Deadeye",
    "Pathfinder",
    "Raider",
    "Warden",
    "Assassin",
    "Saboteur",
    "Trickster",
    "Necromancer",
    "Occultist",
    "Elementalist",
    "Inquisitor",
    "Hierophant",
    "Guardian",
    "Ascendant",
];

/// Keystone passives worth tracking on the ladder.
pub const KNOWN_KEYSTONES: &[&str] = &[
    "Elemental Overload",
    "Resolute Technique",
    "Avatar of Fire",
    "Acrobatics",
    "Phase Acrobatics",
    "Mind Over Matter",
    "Ghost Dance",
    "Divine Shield",
    "Zealot's Oath",
    "Chaos Inoculation",
    "Eldritch Battery",
    "Blood Magic",
    "Unwavering Stance",
    "Iron Reflexes",
    "Ancestral Bond",
    "Elemental Equilibrium",
    "Point Blank",
    "Perfect Agony",
    "Crimson Dance",
    "Ghost Reaver",
    "Vaal Pact",
    "Necromantic Aegis",
    "Arrow Dancing",
    "Supremacy",
    "Divine Flesh",
    "Glancing Blows",
    "The Agnostic",
    "Magebane",
    "Runebinder",
    "Call to Arms",
];

/// Exact, case-sensitive membership check.
pub fn is_known_ascendancy(name: &str) -> bool {
    KNOWN_ASCENDANCIES.contains(&name)
}

pub fn is_known_keystone(name: &str) -> bool {
    KNOWN_KEYSTONES.contains(&name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_and_suffixed_magnitudes() {
        assert_eq!(parse_scaled_number("63"), Some(63));
        assert_eq!(parse_scaled_number("0"), Some(0));
        assert_eq!(parse_scaled_number("5,240"), Some(5_240));
        assert_eq!(parse_scaled_number("63k"), Some(63_000));
        assert_eq!(parse_scaled_number("63K"), Some(63_000));
        assert_eq!(parse_scaled_number("63.5k"), Some(63_500));
        assert_eq!(parse_scaled_number("1.3M"), Some(1_300_000));
        assert_eq!(parse_scaled_number("2m"), Some(2_000_000));
        assert_eq!(parse_scaled_number(" 4812 "), Some(4_812));
    }

    #[test]
    fn junk_magnitudes_parse_to_none_not_zero() {
        assert_eq!(parse_scaled_number(""), None);
        assert_eq!(parse_scaled_number("N/A"), None);
        assert_eq!(parse_scaled_number("garbage"), None);
        assert_eq!(parse_scaled_number("-12"), None);
        assert_eq!(parse_scaled_number("1.3"), None);
        assert_eq!(parse_scaled_number("k"), None);
        assert_eq!(parse_scaled_number("12kk"), None);
    }

    #[test]
    fn empty_markers_cover_site_placeholders() {
        assert!(is_empty_marker(""));
        assert!(is_empty_marker("  "));
        assert!(is_empty_marker("-"));
        assert!(is_empty_marker("Any"));
        assert!(is_empty_marker("any"));
        assert!(!is_empty_marker("N/A"));
        assert!(!is_empty_marker("0"));
    }

    #[test]
    fn derives_skill_names_from_gem_icons() {
        assert_eq!(
            name_from_icon("https://web.poecdn.com/image/Art/2DItems/Gems/SpikeSlamGem.png"),
            Some("Spike Slam".to_string())
        );
        assert_eq!(
            name_from_icon("BoneshatterGem.png"),
            Some("Boneshatter".to_string())
        );
        assert_eq!(
            name_from_icon("VortexOfProjectionGem.png"),
            Some("Vortex Of Projection".to_string())
        );
    }

    #[test]
    fn ignores_query_strings_and_handles_webp() {
        assert_eq!(
            name_from_icon("https://cdn.example/gems/SpikeSlamGem.png?w=1&scale=1"),
            Some("Spike Slam".to_string())
        );
        assert_eq!(
            name_from_icon("IceNovaGem.webp"),
            Some("Ice Nova".to_string())
        );
    }

    #[test]
    fn ascendancy_icons_lose_extension_but_keep_name() {
        assert_eq!(
            name_from_icon("https://web.poecdn.com/image/Berserker.png"),
            Some("Berserker".to_string())
        );
    }

    #[test]
    fn unknown_extension_passes_segment_through_unsplit() {
        assert_eq!(
            name_from_icon("https://cdn.example/misc/SpikeSlamGem.svg"),
            Some("SpikeSlamGem.svg".to_string())
        );
        assert_eq!(
            name_from_icon("PlainSegment"),
            Some("PlainSegment".to_string())
        );
    }

    #[test]
    fn blank_icon_reference_yields_none() {
        assert_eq!(name_from_icon(""), None);
        assert_eq!(name_from_icon("   "), None);
    }

    #[test]
    fn account_comes_from_the_segment_after_character() {
        assert_eq!(
            account_from_profile_url(
                "/builds/mercenarieshcssf/character/neradus94-0540/NeraFuarkLeGoat?i=0&search="
            ),
            Some("neradus94-0540".to_string())
        );
        assert_eq!(
            account_from_profile_url("https://poe.ninja/builds/abc/character/acct/Char"),
            Some("acct".to_string())
        );
    }

    #[test]
    fn profile_urls_without_character_segment_yield_none() {
        assert_eq!(account_from_profile_url("/builds/mercenarieshcssf"), None);
        assert_eq!(account_from_profile_url(""), None);
        assert_eq!(account_from_profile_url("/builds/x/character/"), None);
    }

    #[test]
    fn canonical_sets_are_exact_match() {
        assert!(is_known_ascendancy("Berserker"));
        assert!(is_known_ascendancy("Scion"));
        assert!(!is_known_ascendancy("berserker"));
        assert!(!is_known_ascendancy("Harbinger"));
        assert!(is_known_keystone("Resolute Technique"));
        assert!(is_known_keystone("Zealot's Oath"));
        assert!(!is_known_keystone("Resolute technique"));
    }

    #[test]
    fn keystone_names_only_need_a_trim() {
        assert_eq!(clean_keystone_name("  Vaal Pact "), "Vaal Pact");
    }
}
