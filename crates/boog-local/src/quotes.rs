use rand::seq::SliceRandom;

/// Mode used when the requested quote mode is unknown.
pub const FALLBACK_MODE: &str = "roast";

const WISDOM: &[&str] = &[
    "Sleep is the answer to most problems.",
    "If it fits, sit. If it doesn’t fit, sit anyway.",
    "The humans rush, the cat observes.",
    "Sometimes doing nothing is doing everything.",
    "Patience is a purr-tue.",
];

const ROAST: &[&str] = &[
    "That's your plan? I've seen mice with better strategy.",
    "You're typing? Cute. Still won't fix your code.",
    "Bold of you to assume anyone cares.",
    "Wow. Even the litter box smells better than that idea.",
    "You again? I was hoping for someone interesting.",
];

/// The phrase list for `mode`, if it is a quote mode.
pub fn phrases(mode: &str) -> Option<&'static [&'static str]> {
    match mode {
        "wisdom" => Some(WISDOM),
        "roast" => Some(ROAST),
        _ => None,
    }
}

pub fn is_quote_mode(mode: &str) -> bool {
    phrases(mode).is_some()
}

/// Uniformly random phrase for `mode`, or for the fallback mode when `mode` is unknown.
pub fn pick(mode: &str) -> &'static str {
    let list = phrases(mode).unwrap_or(ROAST);
    list.choose(&mut rand::thread_rng()).copied().unwrap_or(ROAST[0])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_mode_picks_from_its_own_list() {
        for mode in ["wisdom", "roast"] {
            let list = phrases(mode).unwrap();
            for _ in 0..50 {
                assert!(list.contains(&pick(mode)));
            }
        }
    }

    #[test]
    fn unknown_mode_uses_fallback_list() {
        let fallback = phrases(FALLBACK_MODE).unwrap();
        for mode in ["", "nope", "WISDOM", "web"] {
            assert!(fallback.contains(&pick(mode)));
        }
    }

    #[test]
    fn each_mode_has_five_phrases() {
        assert_eq!(phrases("wisdom").unwrap().len(), 5);
        assert_eq!(phrases("roast").unwrap().len(), 5);
        assert!(!is_quote_mode("ai"));
    }

    #[test]
    fn picks_eventually_cover_the_list() {
        let mut seen = std::collections::HashSet::new();
        for _ in 0..500 {
            seen.insert(pick("wisdom"));
        }
        assert_eq!(seen.len(), WISDOM.len());
    }
}
