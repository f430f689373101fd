//! accessors/locale.rs
//! Locale preference matching for i18n strings.
//!
//! A stored locale matches a requested one when they are equal, or equal
//! once the requested one is stripped of `@dialect`, then `.encoding`, then
//! `_COUNTRY`. A preference list is colon separated and tried left to right;
//! within one item, more specific forms are tried first.

/// Does the stored locale `stored` satisfy the single requested `wanted`?
pub fn locale_matches(stored: &str, wanted: &str) -> bool {
    fallbacks(wanted).contains(&stored)
}

/// `wanted`, then `wanted` without `@dialect`, `.encoding`, `_COUNTRY`.
fn fallbacks(wanted: &str) -> Vec<&str> {
    let mut forms = vec![wanted];
    let mut rest = wanted;
    for sep in ['@', '.', '_'] {
        if let Some(i) = rest.find(sep) {
            rest = &rest[..i];
            forms.push(rest);
        }
    }
    forms
}

/// Indexes of `table` matching `preference`, best first.
///
/// Each preference item tries its exact form before the stripped ones.
/// Empty items are skipped; an index may repeat when several items match.
pub fn locale_candidates<'a, S: AsRef<str>>(
    table: &'a [S],
    preference: &'a str,
) -> impl Iterator<Item = usize> + 'a {
    preference
        .split(':')
        .filter(|l| !l.is_empty())
        .flat_map(fallbacks)
        .flat_map(move |form| {
            table
                .iter()
                .enumerate()
                .filter(move |(_, stored)| <S as AsRef<str>>::as_ref(*stored) == form)
                .map(|(i, _)| i)
        })
}

/// Best index of `table` for `preference`, if any stored locale matches.
pub fn select_locale<S: AsRef<str>>(table: &[S], preference: &str) -> Option<usize> {
    locale_candidates(table, preference).next()
}
