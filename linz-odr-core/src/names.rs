//! Resource name formatting

/// Characters that upper case the character following them
const WORD_BOUNDARIES: [char; 4] = [' ', '-', '_', '/'];
/// Characters removed from the formatted name, `/` is kept
const SEPARATORS: [char; 3] = [' ', '-', '_'];

/// Convert strings into title case
///
/// The input is lower cased, the first character and every character after a
/// space, `-`, `_` or `/` is upper cased, then spaces, `-` and `_` are removed.
/// Case folding is ASCII only.
///
/// ```
/// use linz_odr_core::title_case;
///
/// assert_eq!(title_case("linz-imagery-bucket"), "LinzImageryBucket");
/// assert_eq!(title_case("linz_imagery_bucket"), "LinzImageryBucket");
/// assert_eq!(title_case("linz imagery bucket"), "LinzImageryBucket");
/// assert_eq!(title_case("nz/imagery"), "Nz/Imagery");
/// ```
pub fn title_case(text: &str) -> String {
    let mut titled = String::with_capacity(text.len());
    let mut upper_next = true;

    for ch in text.chars() {
        let cased = if upper_next {
            ch.to_ascii_uppercase()
        } else {
            ch.to_ascii_lowercase()
        };
        upper_next = WORD_BOUNDARIES.contains(&ch);
        if !SEPARATORS.contains(&ch) {
            titled.push(cased);
        }
    }

    titled
}
