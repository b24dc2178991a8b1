//! Prompt templates embedded in the binary

pub(crate) const BUILTIN_TEMPLATES: &[(&str, &str)] = &[
    ("code-gen", include_str!("../../prompts/code-gen.md")),
    ("code-review", include_str!("../../prompts/code-review.md")),
    ("godoc-func", include_str!("../../prompts/godoc-func.md")),
    ("godoc-package", include_str!("../../prompts/godoc-package.md")),
    ("refactor", include_str!("../../prompts/refactor.md")),
    ("unit-test", include_str!("../../prompts/unit-test.md")),
];
