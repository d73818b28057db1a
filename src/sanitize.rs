//! Free-text cleanup for search input: drops apostrophes, turns punctuation into
//! spaces, collapses whitespace.

use regex::Regex;
use std::sync::LazyLock;

static APOSTROPHES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"['’‘`]+").expect("apostrophe pattern"));

static PUNCTUATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"[!"“”#$%()*\x{FFFD}+,\\/:±;<【】=>?\[\]\^™{|}~®（）一°]+"#)
        .expect("punctuation pattern")
});

/// Periods that touch whitespace or either end of the text. Dots inside a
/// token (`a.b@c.com`) are kept.
static LOOSE_PERIODS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^|\s)\.+|\.+(?:\s|$)").expect("period pattern"));

static SPACES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("space pattern"));

/// Sanitize search text. `None` is treated as empty.
pub fn sanitize(text: Option<&str>) -> String {
    let text = text.unwrap_or("");
    let text = APOSTROPHES.replace_all(text, "");
    let text = PUNCTUATION.replace_all(&text, " ");
    let text = LOOSE_PERIODS.replace_all(&text, " ");
    SPACES.replace_all(&text, " ").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::sanitize;

    #[test]
    fn strips_apostrophes_punctuation_and_extra_space() {
        assert_eq!(sanitize(Some("O'Brien!! Co.")), "OBrien Co");
    }

    #[test]
    fn none_is_empty() {
        assert_eq!(sanitize(None), "");
        assert_eq!(sanitize(Some("   ")), "");
    }

    #[test]
    fn every_apostrophe_variant_is_removed() {
        assert_eq!(sanitize(Some("rock’n‘roll `n' more")), "rocknroll n more");
    }

    #[test]
    fn punctuation_becomes_a_single_space() {
        assert_eq!(sanitize(Some("a,b;;c  (d)")), "a b c d");
        assert_eq!(sanitize(Some("【x】 ~y~ ®")), "x y");
    }

    #[test]
    fn whitespace_runs_collapse() {
        assert_eq!(sanitize(Some("\t Suman \n\n Das  ")), "Suman Das");
    }

    #[test]
    fn dots_inside_an_address_survive() {
        assert_eq!(sanitize(Some(" john.doe@mail.example.com. ")), "john.doe@mail.example.com");
        assert_eq!(sanitize(Some("... hi ...")), "hi");
    }

    #[test]
    fn is_deterministic() {
        let input = Some("Saurabh  Ganguly!?");
        assert_eq!(sanitize(input), sanitize(input));
        assert_eq!(sanitize(input), "Saurabh Ganguly");
    }
}
