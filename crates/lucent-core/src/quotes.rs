//! Quotes shown in the exit confirmation dialog.

use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

const QUOTES: &[(&str, &str)] = &[
    (
        "We are what we repeatedly do. Excellence, then, is not an act, but a habit.",
        "Aristotle",
    ),
    (
        "The successful warrior is the average man, with laser-like focus.",
        "Bruce Lee",
    ),
    (
        "Concentrate all your thoughts upon the work at hand. The sun's rays do not burn until brought to a focus.",
        "Alexander Graham Bell",
    ),
    ("To be everywhere is to be nowhere.", "Seneca"),
    (
        "It does not matter how slowly you go as long as you do not stop.",
        "Confucius",
    ),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    pub text: String,
    pub author: String,
}

impl Quote {
    fn from_pair(&(text, author): &(&str, &str)) -> Self {
        Self {
            text: text.to_string(),
            author: author.to_string(),
        }
    }
}

pub fn all_quotes() -> Vec<Quote> {
    QUOTES.iter().map(Quote::from_pair).collect()
}

pub fn random_quote() -> Quote {
    let pair = QUOTES.choose(&mut rand::thread_rng()).unwrap_or(&QUOTES[0]);
    Quote::from_pair(pair)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_quote_comes_from_the_list() {
        let all = all_quotes();
        for _ in 0..20 {
            assert!(all.contains(&random_quote()));
        }
    }
}
