use std::sync::LazyLock;

use regex::Regex;

/// Letters that are never vowels, used to expand doubled-consonant patterns.
const CONSONANTS: &str = "BCDFGHJKLMNPQRSTVWXZ";

/// A maximal run of vowels. `Y` counts as a vowel here only.
static VOWEL_RUNS: LazyLock<Regex> = LazyLock::new(|| compile(r"[AEIOUY]+"));

/// Special cases: one syllable less than the vowel runs suggest.
static SUBTRACTIONS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
	vec![
		// give, love, bone, done, ride
		compile(r"[^AEIOU]E$"),
		// bared, liked, called, tricked, bashed, matched
		compile(&format!(r"[AEIOU](?:{}|CK|SH|[RT]CH)E[DS]$", doubled("CFGHKLMNPRSVWZ", true))),
		// absolutely, nicely, likeness, basement, hopeless, hopeful, tastefully
		compile(r".E(?:LY|LESS(?:LY)?|NESS?|FUL(?:LY)?|MENTS?)$"),
		// action, diction, fiction
		compile(r"ION"),
		// special, initial, physician, christian
		compile(r"[CT]IA[NL]"),
		// illustrious, but not spacious or anxious
		compile(r"[^CX]IOU"),
		// amnesia, polynesia
		compile(r"SIA$"),
		// dialogue, intrigue, colleague
		compile(r".GUE$"),
	]
});

/// Special cases: one syllable more than the vowel runs suggest.
static ADDITIONS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
	vec![
		// alias, science, phobia
		compile(r"I[AIOU]"),
		// salient, gradient, transient
		compile(r"[DLS]IEN"),
		// -Vble, plus -mble
		compile(r"[AEIOUYM]BLE$"),
		// agreeable
		compile(r"[AEIOU]{3}"),
		// mcwhatever
		compile(r"^MC"),
		// sexism, racism
		compile(r"ISM$"),
		// bubble, cattle, cackle, sample, angle
		compile(&format!(r"(?:{}|CK|MP|NG)LE$", doubled(CONSONANTS, false))),
		// couldnt
		compile(r"DNT$"),
		// annoying, layer
		compile(r"[AEIOU]Y[AEIOU]"),
	]
});

/// Builds an alternation of doubled letters (`BB|CC|...`).
///
/// `regex` has no backreferences, so `([C])\1` style patterns are spelled out.
/// With `optional`, the second letter may be absent (`BB?|CC?|...`).
fn doubled(letters: &str, optional: bool) -> String {
	letters
		.chars()
		.map(|c| if optional { format!("{c}{c}?") } else { format!("{c}{c}") })
		.collect::<Vec<_>>()
		.join("|")
}

/// Compiles a rule pattern.
///
/// Every pattern is a constant of this module, so failure is a programming error.
fn compile(pattern: &str) -> Regex {
	Regex::new(pattern).expect("syllable rule pattern must compile")
}

/// Guesses the number of syllables of a normalized (uppercase, letters only) word.
///
/// Starts from the number of vowel runs, then applies every subtraction and
/// every addition rule once. All rules are matched against the unmodified word,
/// so overlapping matches compound. The result is never below 1.
pub(crate) fn guess(word: &str) -> usize {
	if word.chars().count() == 1 {
		return 1;
	}

	let runs = VOWEL_RUNS.find_iter(word).count() as isize;
	let removed = SUBTRACTIONS.iter().filter(|pattern| pattern.is_match(word)).count() as isize;
	let added = ADDITIONS.iter().filter(|pattern| pattern.is_match(word)).count() as isize;

	// No vowels at all still makes one syllable
	(runs - removed + added).max(1) as usize
}
