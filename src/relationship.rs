//! Relationship vocabulary: label reversal and path descriptions.
//!
//! A label on a connection `(source, target, label)` reads "source's `label`
//! is target". Walking that connection backwards needs the label that reads
//! "target's `?` is source", which depends on the gender of `source`.

use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::dataset::Gender;

/// Connective placed between a name and the following relationship label.
pub const CONNECTIVE: &str = "ning";

#[derive(Debug, Clone, Copy)]
enum Reverse {
    /// The relation reads the same in both directions.
    Same,
    Fixed(&'static str),
    ByGender {
        male: &'static str,
        female: &'static str,
    },
}

/// Reverse label for each known relationship, keyed by the forward label.
///
/// Child labels follow the parent's gender: `O'g'li` and `Qizi` reverse to
/// `Otasi` when the parent is male and `Onasi` when the parent is female, so
/// a mother is not read back as `Otasi`.
static REVERSE_TABLE: Lazy<HashMap<&'static str, Reverse>> = Lazy::new(|| {
    use Reverse::*;
    let parent = ByGender {
        male: "O'g'li",
        female: "Qizi",
    };
    let child = ByGender {
        male: "Otasi",
        female: "Onasi",
    };
    let older_sibling = ByGender {
        male: "Ukasi",
        female: "Singlisi",
    };
    let younger_sibling = ByGender {
        male: "Akasi",
        female: "Opasi",
    };
    let uncle_or_aunt = ByGender {
        male: "Jiyani",
        female: "Jiyani",
    };
    HashMap::from([
        ("Otasi", parent),
        ("Onasi", parent),
        ("O'g'li", child),
        ("Qizi", child),
        ("Akasi", older_sibling),
        ("Opasi", older_sibling),
        ("Ukasi", younger_sibling),
        ("Singlisi", younger_sibling),
        ("Amakisi", uncle_or_aunt),
        ("Tog'asi", uncle_or_aunt),
        ("Xolasi", uncle_or_aunt),
        (
            "Jiyani",
            ByGender {
                male: "Tog'asi",
                female: "Xolasi",
            },
        ),
        ("Ustozi", Fixed("Shogirdi")),
        ("Shogirdi", Fixed("Ustozi")),
        ("Hamshirasi", Fixed("Bemori")),
        ("Bemori", Fixed("Hamshirasi")),
        ("Do'sti", Same),
        ("Dugonasi", Same),
        ("Turmush o'rtog'i", Same),
        ("Sinfdoshi", Same),
        ("Kursdoshi", Same),
        ("Hamkasbi", Same),
        ("Qo'shnisi", Same),
        ("Qarindoshi", Same),
    ])
});

/// Looks up the reverse of `label`, where `other` is the gender of the person
/// the reversed label will describe. `None` when the label is not in the table.
pub fn lookup_reverse(label: &str, other: Gender) -> Option<&'static str> {
    let (key, rule) = REVERSE_TABLE.get_key_value(label)?;
    Some(match *rule {
        Reverse::Same => *key,
        Reverse::Fixed(reversed) => reversed,
        Reverse::ByGender { male, female } => match other {
            Gender::Male => male,
            Gender::Female => female,
        },
    })
}

/// Reverses `label` for backwards traversal. Labels missing from the table are
/// returned unchanged.
pub fn reverse_relationship(label: &str, other: Gender) -> String {
    match lookup_reverse(label, other) {
        Some(reversed) => reversed.to_string(),
        None => {
            log::warn!("no reverse known for relationship '{label}'; keeping it as is");
            label.to_string()
        }
    }
}

pub fn is_known_relationship(label: &str) -> bool {
    REVERSE_TABLE.contains_key(label)
}

/// Builds "n0 ning r0 n1 ning r1 n2 ..." for a path of names and the labels
/// between them.
pub fn describe_path(names: &[String], relationships: &[String]) -> String {
    let mut description = String::new();
    for (idx, name) in names.iter().enumerate() {
        if idx == 0 {
            description.push_str(name);
            continue;
        }
        let label = relationships
            .get(idx - 1)
            .map(|label| label.to_lowercase())
            .unwrap_or_default();
        description.push(' ');
        description.push_str(CONNECTIVE);
        description.push(' ');
        description.push_str(&label);
        description.push(' ');
        description.push_str(name);
    }
    description
}
