//! Code blocks: `<pre><code class="language-css">` to `[code=css]`.

use super::{ElementView, ProcessingRule, Verdict};

/// Class prefix carrying the language of a code block.
pub const LANGUAGE_CLASS_PREFIX: &str = "language-";

/// Language used when a code block names none.
pub const DEFAULT_LANGUAGE: &str = "plaintext";

/// Extracts a language token from a class name, if the class carries one.
pub type LanguageExtractor = fn(&str) -> Option<&str>;

/// True for a language that means "not set", which renders as bare `[code]`.
pub type UnsetLanguage = fn(&str) -> bool;

pub fn default_language_of(class: &str) -> Option<&str> {
    class
        .strip_prefix(LANGUAGE_CLASS_PREFIX)
        .filter(|lang| !lang.is_empty())
}

pub fn default_unset_language(language: &str) -> bool {
    language == DEFAULT_LANGUAGE
}

#[derive(Clone, Copy)]
pub struct CodeOptions {
    pub language_of: LanguageExtractor,
    pub is_unset: UnsetLanguage,
}

impl Default for CodeOptions {
    fn default() -> Self {
        CodeOptions {
            language_of: default_language_of,
            is_unset: default_unset_language,
        }
    }
}

#[derive(Clone, Copy, Default)]
pub struct CodeRule {
    pub options: CodeOptions,
}

impl CodeRule {
    pub fn new(options: CodeOptions) -> Self {
        CodeRule { options }
    }
}

impl ProcessingRule for CodeRule {
    fn id(&self) -> &str {
        "code"
    }

    fn tags(&self) -> &[&'static str] {
        &["code"]
    }

    fn to_data(&self, element: &ElementView<'_>, content: &str) -> Verdict {
        if element.name() != "pre" {
            return Verdict::abstain();
        }

        // The first child that names a language wins.
        let found = element.element().child_elements().find_map(|child| {
            child
                .classes
                .iter()
                .filter(|class| !element.consumed().has_class(class))
                .find_map(|class| (self.options.language_of)(class).map(|lang| (class, lang)))
        });

        let open = match found {
            Some((_, lang)) if !(self.options.is_unset)(lang) => format!("[code={}]", lang),
            _ => "[code]".to_owned(),
        };

        // Leading indentation is content; only newlines go at the start.
        let body = content.trim_matches('\n').trim_end();
        let verdict = Verdict::matched(format!("{}\n{}\n[/code]\n", open, body));
        match found {
            Some((class, _)) => verdict.consuming_class(class),
            None => verdict,
        }
    }
}
