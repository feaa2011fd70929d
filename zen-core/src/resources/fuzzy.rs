//! Fuzzy string scoring for snippet names
//!
//! Characters of the query must appear in the candidate in order. Each match
//! earns a base score, with bonuses for same case, for matching right at the
//! start of the unmatched remainder and for matching the first letter of a
//! word. Missing characters are tolerated at the cost of `fuzziness`.

/// Similarity of `abbreviation` to `string` in the `0.0..=1.0` range
pub fn string_score(string: &str, abbreviation: &str, fuzziness: f64) -> f64 {
    if string == abbreviation {
        return 1.0;
    }
    if abbreviation.is_empty() {
        return 0.0;
    }

    let abbreviation: Vec<char> = abbreviation.chars().collect();
    let mut remainder: Vec<char> = string.chars().collect();
    let string_length = remainder.len() as f64;
    let mut total = 0.0;
    let mut fuzzies = 1.0;
    let mut start_bonus = false;

    for (i, &c) in abbreviation.iter().enumerate() {
        let lower = c.to_lowercase().next().unwrap_or(c);
        let upper = c.to_uppercase().next().unwrap_or(c);
        let found = remainder.iter().position(|&s| s == lower || s == upper);

        let Some(index) = found else {
            if fuzziness > 0.0 {
                fuzzies += 1.0 - fuzziness;
                continue;
            }
            return 0.0;
        };

        let mut score = 0.1;
        if remainder[index] == c {
            score += 0.1;
        }
        if index == 0 {
            score += 0.6;
            if i == 0 {
                start_bonus = true;
            }
        } else if remainder[index - 1] == ' ' {
            score += 0.8;
        }

        remainder.drain(..=index);
        total += score;
    }

    let abbreviation_length = abbreviation.len() as f64;
    let abbreviation_score = total / abbreviation_length;
    let mut final_score =
        (abbreviation_score * (abbreviation_length / string_length) + abbreviation_score) / 2.0;
    final_score /= fuzzies;
    if start_bonus && final_score + 0.15 < 1.0 {
        final_score += 0.15;
    }
    final_score
}
