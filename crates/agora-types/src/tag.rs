//! The built-in tag catalog.

/// A tag users can file questions under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tag {
    /// Tag name as stored on questions.
    pub name: &'static str,
    /// Short description shown on the tags page.
    pub description: &'static str,
}

/// Tags every deployment ships with.
///
/// Backends accept arbitrary tag strings; this catalog only seeds
/// discovery and the watched-tags picker.
pub const BUILTIN_TAGS: &[Tag] = &[
    Tag {
        name: "javascript",
        description: "For questions about programming in ECMAScript and its dialects.",
    },
    Tag {
        name: "python",
        description: "Python is a multi-paradigm, dynamically typed, general-purpose language.",
    },
    Tag {
        name: "java",
        description: "Java is a high-level, class-based, object-oriented language.",
    },
    Tag {
        name: "c#",
        description: "C# is a managed, multi-paradigm language from Microsoft.",
    },
    Tag {
        name: "php",
        description: "PHP is a widely used server-side scripting language.",
    },
    Tag {
        name: "html",
        description: "HTML is the markup language of the web.",
    },
    Tag {
        name: "css",
        description: "CSS describes how HTML is rendered.",
    },
    Tag {
        name: "reactjs",
        description: "React is a JavaScript library for building user interfaces.",
    },
    Tag {
        name: "node.js",
        description: "Node.js is a JavaScript runtime built on the V8 engine.",
    },
    Tag {
        name: "rust",
        description: "Rust is a systems language focused on safety and performance.",
    },
    Tag {
        name: "solidity",
        description: "Solidity is a contract-oriented language for on-chain programs.",
    },
    Tag {
        name: "mongodb",
        description: "MongoDB is a document-oriented NoSQL database.",
    },
];

/// Looks up a built-in tag by name, case-insensitively.
#[must_use]
pub fn find_tag(name: &str) -> Option<&'static Tag> {
    BUILTIN_TAGS
        .iter()
        .find(|t| t.name.eq_ignore_ascii_case(name))
}
