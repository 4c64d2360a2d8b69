// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Mood classification from a listener's top genres.

/// Returned when there are no genres at all.
pub const UNKNOWN_MOOD: &str = "Unknown Mood";
/// Returned when genres are present but none are recognized.
pub const BALANCED_VIBES: &str = "🎧 Balanced Vibes";

const MAX_MOODS: usize = 3;

/// Genre fragment → mood. Order matters: it fixes tie-breaking.
const GENRE_TO_MOOD: &[(&str, &str)] = &[
    ("rap", "Bold & Confident"),
    ("hip hop", "Bold & Confident"),
    ("trap", "Bold & Confident"),
    ("pop", "Upbeat & Fun"),
    ("r&b", "Smooth & Chill"),
    ("dark r&b", "Smooth & Chill"),
    ("trap soul", "Smooth & Chill"),
    ("indie", "Mellow & Indie"),
    ("edm", "High Energy"),
    ("dance", "High Energy"),
    ("rock", "Intense & Driven"),
    ("lofi", "Chill Study Vibes"),
    ("lo-fi", "Chill Study Vibes"),
    ("latin", "Vibrant & Rhythmic"),
    ("classical", "Calm & Peaceful"),
];

/// Top three moods suggested by `genres`.
///
/// Each genre is lowercased and scored against every table fragment it
/// contains, so "trap soul" counts toward both Bold & Confident and Smooth &
/// Chill. Moods are ranked by hit count; equal counts keep the order in
/// which the mood was first hit.
pub fn top_moods_from_genres<S: AsRef<str>>(genres: Option<&[S]>) -> Vec<String> {
    let genres = match genres {
        Some(g) if !g.is_empty() => g,
        _ => return vec![UNKNOWN_MOOD.to_string()],
    };

    // (mood, hits) in first-hit order
    let mut scores: Vec<(&str, usize)> = Vec::new();

    for genre in genres {
        let genre = genre.as_ref().to_lowercase();
        for &(fragment, mood) in GENRE_TO_MOOD {
            if !genre.contains(fragment) {
                continue;
            }
            match scores.iter_mut().find(|(m, _)| *m == mood) {
                Some((_, hits)) => *hits += 1,
                None => scores.push((mood, 1)),
            }
        }
    }

    if scores.is_empty() {
        return vec![BALANCED_VIBES.to_string()];
    }

    // Stable sort keeps first-hit order among ties.
    scores.sort_by(|a, b| b.1.cmp(&a.1));

    scores
        .into_iter()
        .take(MAX_MOODS)
        .map(|(mood, _)| mood.to_string())
        .collect()
}
