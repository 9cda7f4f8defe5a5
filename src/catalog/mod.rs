//! Static catalog of languages the assistant can answer questions about.

pub struct Category {
    pub name: &'static str,
    pub languages: &'static [(&'static str, &'static str)],
}

pub const CATEGORIES: &[Category] = &[
    Category {
        name: "Web Development",
        languages: &[
            ("HTML", "Markup language for creating web pages"),
            ("CSS", "Style sheet language for designing web pages"),
            ("JavaScript", "Programming language for web interactivity"),
        ],
    },
    Category {
        name: "Backend Languages",
        languages: &[
            ("Python", "Versatile language known for simplicity and readability"),
            ("Java", "Object-oriented language for enterprise applications"),
            ("PHP", "Server-side scripting language for web development"),
            ("Ruby", "Dynamic language focused on simplicity"),
            ("C#", "Microsoft's language for .NET development"),
        ],
    },
    Category {
        name: "Systems Programming",
        languages: &[
            ("C++", "Extension of C with object-oriented features"),
            ("Rust", "Systems language focusing on safety and performance"),
            ("Go", "Google's language for efficient concurrent programming"),
        ],
    },
    Category {
        name: "Mobile Development",
        languages: &[
            ("Swift", "Apple's language for iOS development"),
            ("Kotlin", "Modern language for Android development"),
        ],
    },
];

pub fn all_languages() -> impl Iterator<Item = &'static str> {
    CATEGORIES
        .iter()
        .flat_map(|c| c.languages.iter().map(|(name, _)| *name))
}

pub fn is_known(language: &str) -> bool {
    all_languages().any(|l| l == language)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::ProfileTable;

    #[test]
    fn every_runnable_language_is_catalogued() {
        for name in ProfileTable::default().languages() {
            assert!(is_known(name), "{name} missing from catalog");
        }
    }

    #[test]
    fn known_is_exact_match() {
        assert!(is_known("Rust"));
        assert!(!is_known("rust"));
        assert_eq!(all_languages().count(), 13);
    }
}
