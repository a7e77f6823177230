//! # Ordering Module
//!
//! Human-friendly filename ordering.
//!
//! Names are compared in two tiers:
//! 1. Names that start with the folder's own name (case-insensitive) come
//!    first, so already-cleaned files keep their slots on a re-run.
//! 2. Within a tier, names are split into digit and non-digit runs. Digit
//!    runs compare by value, everything else compares case-sensitively.
//!
//! `img2.jpg` therefore sorts before `img10.jpg`.

use regex::Regex;
use std::cmp::Ordering;
use std::sync::OnceLock;

/// Only ASCII digits form number runs; other Unicode digits compare as text.
fn digit_runs() -> &'static Regex {
    static DIGITS: OnceLock<Regex> = OnceLock::new();
    DIGITS.get_or_init(|| Regex::new(r"[0-9]+").expect("digit pattern is valid"))
}

/// One run of a split filename
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    Text(&'a str),
    Number(&'a str),
}

impl Ord for Segment<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Segment::Number(a), Segment::Number(b)) => compare_digits(a, b),
            (Segment::Text(a), Segment::Text(b)) => a.cmp(b),
            (Segment::Number(_), Segment::Text(_)) => Ordering::Less,
            (Segment::Text(_), Segment::Number(_)) => Ordering::Greater,
        }
    }
}

impl PartialOrd for Segment<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Split a name into alternating text and number runs.
///
/// The result always starts and ends with a text run (possibly empty), so
/// two split names line up run by run: `"2.jpg"` becomes
/// `["", 2, ".jpg"]` and `"img2"` becomes `["img", 2, ""]`.
pub fn segments(name: &str) -> Vec<Segment<'_>> {
    let mut parts = Vec::new();
    let mut last = 0;
    for run in digit_runs().find_iter(name) {
        parts.push(Segment::Text(&name[last..run.start()]));
        parts.push(Segment::Number(run.as_str()));
        last = run.end();
    }
    parts.push(Segment::Text(&name[last..]));
    parts
}

/// Compare two digit strings by numeric value without parsing them.
fn compare_digits(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

/// Whether `name` belongs to the first tier for the folder `dir_name`
pub fn has_folder_prefix(name: &str, dir_name: &str) -> bool {
    name.to_lowercase().starts_with(&dir_name.to_lowercase())
}

/// Total order over filenames inside the folder `dir_name`.
///
/// Names that compare equal run by run (`a01` vs `a1`) fall back to a byte
/// comparison so sorting never depends on listing order.
pub fn natural_cmp(a: &str, b: &str, dir_name: &str) -> Ordering {
    let tier_a = !has_folder_prefix(a, dir_name);
    let tier_b = !has_folder_prefix(b, dir_name);

    tier_a
        .cmp(&tier_b)
        .then_with(|| segments(a).cmp(&segments(b)))
        .then_with(|| a.cmp(b))
}

/// Sort items in place by the natural order of the name `key` returns.
pub fn sort_natural<T, F>(items: &mut [T], dir_name: &str, key: F)
where
    F: Fn(&T) -> &str,
{
    items.sort_by(|a, b| natural_cmp(key(a), key(b), dir_name));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted(names: &[&str], dir_name: &str) -> Vec<String> {
        let mut names: Vec<String> = names.iter().map(|n| n.to_string()).collect();
        sort_natural(&mut names, dir_name, |n| n.as_str());
        names
    }

    #[test]
    fn numbers_compare_by_value() {
        assert_eq!(
            sorted(&["img10.jpg", "img2.jpg", "img1.jpg"], "Album"),
            vec!["img1.jpg", "img2.jpg", "img10.jpg"]
        );
    }

    #[test]
    fn text_runs_compare_case_sensitively() {
        // Uppercase sorts before lowercase, as with plain byte comparison.
        assert_eq!(
            sorted(&["cover.jpg", "img10.jpg", "img2.jpg"], "Album"),
            vec!["cover.jpg", "img2.jpg", "img10.jpg"]
        );
        assert_eq!(sorted(&["b.jpg", "B.jpg"], "x"), vec!["B.jpg", "b.jpg"]);
    }

    #[test]
    fn folder_prefix_sorts_first() {
        assert_eq!(
            sorted(&["img10.jpg", "album_3.jpg", "img2.jpg", "Album_1.jpg"], "Album"),
            vec!["Album_1.jpg", "album_3.jpg", "img2.jpg", "img10.jpg"]
        );
        assert_eq!(
            sorted(&["MyAlbum_01.jpg", "MyAlbum_cover.jpg"], "MyAlbum"),
            vec!["MyAlbum_01.jpg", "MyAlbum_cover.jpg"]
        );
    }

    #[test]
    fn prefix_tier_beats_segment_order() {
        assert_eq!(
            sorted(&["a.jpg", "myalbum_cover.jpg"], "MyAlbum"),
            vec!["myalbum_cover.jpg", "a.jpg"]
        );
    }

    #[test]
    fn segments_line_up() {
        assert_eq!(
            segments("2.jpg"),
            vec![Segment::Text(""), Segment::Number("2"), Segment::Text(".jpg")]
        );
        assert_eq!(
            segments("img"),
            vec![Segment::Text("img")]
        );
    }

    #[test]
    fn long_digit_runs_do_not_overflow() {
        let big = "x99999999999999999999999999.jpg";
        let small = "x100.jpg";
        assert_eq!(natural_cmp(small, big, "dir"), Ordering::Less);
    }

    #[test]
    fn leading_zeros_tie_breaks_deterministically() {
        assert_eq!(natural_cmp("a01", "a1", "dir"), Ordering::Less);
        assert_eq!(natural_cmp("a1", "a01", "dir"), Ordering::Greater);
        assert_eq!(natural_cmp("a1", "a1", "dir"), Ordering::Equal);
    }

    #[test]
    fn shorter_name_sorts_first() {
        assert_eq!(sorted(&["img2b", "img2"], "dir"), vec!["img2", "img2b"]);
    }

    #[test]
    fn non_ascii_digits_are_text() {
        assert_eq!(
            segments("img\u{0663}.jpg"),
            vec![Segment::Text("img\u{0663}.jpg")]
        );
        assert_eq!(segments("img3.jpg")[1], Segment::Number("3"));
    }
}
