//! Person-name parsing and similarity, used to match authors that arrive
//! as plain names instead of references.

use labtransfer_model::Person;

/// A person name split into first and last parts, display-formatted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonName {
    pub first_name: String,
    pub last_name: String,
}

impl PersonName {
    /// Parses `Last, First` or `First [I.] Last`. Initials directly after
    /// the first component belong to the first name.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        if let Some((last, first)) = raw.split_once(',') {
            let last = last.trim();
            if last.is_empty() {
                return None;
            }
            return Some(Self {
                first_name: display_case(first.trim()),
                last_name: display_case(last),
            });
        }
        let parts: Vec<&str> = raw.split_whitespace().collect();
        if parts.len() == 1 {
            return Some(Self {
                first_name: String::new(),
                last_name: display_case(parts[0]),
            });
        }
        let mut split = 1;
        while split < parts.len() - 1 && is_initial(parts[split]) {
            split += 1;
        }
        Some(Self {
            first_name: display_case(&parts[..split].join(" ")),
            last_name: display_case(&parts[split..].join(" ")),
        })
    }
}

fn is_initial(part: &str) -> bool {
    part.ends_with('.') || part.chars().count() == 1
}

/// Upper-cases the first letter of every component; components are
/// separated by whitespace, `-` and `.`.
#[must_use]
pub fn display_case(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut at_start = true;
    for c in raw.chars() {
        if c.is_whitespace() || c == '-' || c == '.' {
            out.push(c);
            at_start = true;
        } else if at_start {
            out.extend(c.to_uppercase());
            at_start = false;
        } else {
            out.extend(c.to_lowercase());
        }
    }
    out
}

fn fold_accent(c: char) -> &'static str {
    match c {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' => "a",
        'ç' => "c",
        'è' | 'é' | 'ê' | 'ë' => "e",
        'ì' | 'í' | 'î' | 'ï' => "i",
        'ñ' => "n",
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' => "o",
        'ù' | 'ú' | 'û' | 'ü' => "u",
        'ý' | 'ÿ' => "y",
        'æ' => "ae",
        'œ' => "oe",
        'ß' => "ss",
        _ => "",
    }
}

/// Splits a name into accent-free, upper-case components.
#[must_use]
pub fn name_tokens(raw: &str) -> Vec<String> {
    raw.split(|c: char| c.is_whitespace() || c == '-' || c == '.')
        .filter(|t| !t.is_empty())
        .map(|token| {
            let mut folded = String::with_capacity(token.len());
            for c in token.chars().flat_map(char::to_lowercase) {
                match fold_accent(c) {
                    "" => folded.push(c),
                    replacement => folded.push_str(replacement),
                }
            }
            folded.to_uppercase()
        })
        .collect()
}

/// Decides whether two names denote the same person.
#[derive(Debug, Clone, Copy)]
pub struct NameMatcher {
    threshold: f64,
}

impl NameMatcher {
    #[must_use]
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    /// Last names must be equal once normalized. First names must be
    /// equal, match as initials, or reach the Jaro-Winkler threshold.
    #[must_use]
    pub fn is_similar(&self, first_a: &str, last_a: &str, first_b: &str, last_b: &str) -> bool {
        let (last_a, last_b) = (name_tokens(last_a), name_tokens(last_b));
        if last_a.is_empty() || last_a.concat() != last_b.concat() {
            return false;
        }
        let (first_a, first_b) = (name_tokens(first_a), name_tokens(first_b));
        if first_a == first_b {
            return true;
        }
        if first_a.is_empty() || first_b.is_empty() {
            return false;
        }
        if initials_match(&first_a, &first_b) || initials_match(&first_b, &first_a) {
            return true;
        }
        strsim::jaro_winkler(&first_a.join(" "), &first_b.join(" ")) >= self.threshold
    }

    /// First stored person similar to `name`.
    pub fn find<'p>(&self, name: &PersonName, persons: &'p [Person]) -> Option<&'p Person> {
        persons.iter().find(|p| {
            self.is_similar(
                &name.first_name,
                &name.last_name,
                p.first_name.as_deref().unwrap_or_default(),
                p.last_name.as_deref().unwrap_or_default(),
            )
        })
    }
}

fn initials_match(initials: &[String], full: &[String]) -> bool {
    initials.len() == full.len()
        && initials.iter().all(|t| t.chars().count() == 1)
        && initials
            .iter()
            .zip(full)
            .all(|(i, f)| f.starts_with(i.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn name(first: &str, last: &str) -> PersonName {
        PersonName {
            first_name: first.into(),
            last_name: last.into(),
        }
    }

    #[test]
    fn parse_comma_form() {
        assert_eq!(PersonName::parse("curie, marie"), Some(name("Marie", "Curie")));
    }

    #[test]
    fn parse_first_last_with_initials() {
        assert_eq!(
            PersonName::parse("Jean P. de la fontaine"),
            Some(name("Jean P.", "De La Fontaine"))
        );
        assert_eq!(PersonName::parse("Ada Lovelace"), Some(name("Ada", "Lovelace")));
        assert_eq!(PersonName::parse("jean-pierre DUPONT"), Some(name("Jean-Pierre", "Dupont")));
    }

    #[test]
    fn parse_single_component_is_last_name() {
        assert_eq!(PersonName::parse("Plato"), Some(name("", "Plato")));
        assert_eq!(PersonName::parse("   "), None);
    }

    #[test]
    fn tokens_fold_accents() {
        assert_eq!(name_tokens("Stéphane Galland"), vec!["STEPHANE", "GALLAND"]);
        assert_eq!(name_tokens("Jean-Noël"), vec!["JEAN", "NOEL"]);
    }

    #[test]
    fn similarity_rules() {
        let m = NameMatcher::new(0.92);
        assert!(m.is_similar("Stéphane", "Galland", "stephane", "GALLAND"));
        assert!(m.is_similar("S.", "Galland", "Stéphane", "Galland"));
        assert!(m.is_similar("J.-P.", "Dupont", "Jean-Pierre", "Dupont"));
        assert!(m.is_similar("Stephan", "Galland", "Stephane", "Galland"));
        assert!(!m.is_similar("Stéphane", "Galland", "Stéphane", "Gallant"));
        assert!(!m.is_similar("Marc", "Dupont", "Maria", "Dupont"));
        assert!(!m.is_similar("", "Dupont", "Maria", "Dupont"));
    }

    #[test]
    fn find_first_similar() {
        let persons = vec![
            Person {
                first_name: Some("Marie".into()),
                last_name: Some("Curie".into()),
                ..Person::default()
            },
            Person {
                first_name: Some("Pierre".into()),
                last_name: Some("Curie".into()),
                ..Person::default()
            },
        ];
        let m = NameMatcher::new(0.92);
        let found = m.find(&name("P.", "Curie"), &persons).unwrap();
        assert_eq!(found.first_name.as_deref(), Some("Pierre"));
        assert!(m.find(&name("Irène", "Joliot"), &persons).is_none());
    }

    proptest! {
        #[test]
        fn similarity_is_reflexive(first in "[A-Za-z]{1,12}", last in "[A-Za-z]{1,12}") {
            prop_assert!(NameMatcher::new(0.92).is_similar(&first, &last, &first, &last));
        }

        #[test]
        fn similarity_ignores_case(first in "[a-z]{1,12}", last in "[a-z]{1,12}") {
            let m = NameMatcher::new(0.92);
            prop_assert!(m.is_similar(&first.to_uppercase(), &last.to_uppercase(), &first, &last));
        }

        #[test]
        fn comma_form_splits_on_the_comma(first in "[a-z]{1,10}", last in "[a-z]{1,10}") {
            let parsed = PersonName::parse(&format!("{last}, {first}")).unwrap();
            prop_assert_eq!(parsed, name(&display_case(&first), &display_case(&last)));
        }
    }
}
