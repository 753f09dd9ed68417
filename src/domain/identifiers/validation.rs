/// Validates an identifier string.
///
/// Checks:
/// - Non-empty
/// - No path separators (/, \)
/// - Not "." or ".."
/// - Characters are alphanumeric, '-', '_', or (optionally) '.'
pub fn validate_identifier(id: &str, allow_dots: bool) -> bool {
    if id.is_empty() {
        return false;
    }
    if id.contains('/') || id.contains('\\') {
        return false;
    }
    if id == "." || id == ".." {
        return false;
    }
    id.chars().all(|c| c.is_alphanumeric() || c == '-' || c == '_' || (allow_dots && c == '.'))
}

/// Derive an identifier from a display name.
///
/// Whitespace becomes '-', anything else outside the identifier alphabet is dropped.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for c in name.trim().chars() {
        if c.is_whitespace() {
            if !slug.ends_with('-') {
                slug.push('-');
            }
        } else if c.is_alphanumeric() || c == '-' || c == '_' {
            slug.extend(c.to_lowercase());
        }
    }
    slug.trim_matches('-').to_string()
}

#[macro_export]
macro_rules! impl_validated_id {
    ($name:ident, $allow_dots:expr, $err_variant:path) => {
        impl $name {
            /// Validate and create a new instance.
            pub fn new(id: &str) -> Result<Self, $crate::domain::AppError> {
                if $crate::domain::identifiers::validation::validate_identifier(id, $allow_dots) {
                    Ok(Self(id.to_string()))
                } else {
                    Err($err_variant(id.to_string()))
                }
            }

            /// Return the inner string value.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::ops::Deref for $name {
            type Target = str;
            fn deref(&self) -> &Self::Target {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_unicode_names() {
        assert!(validate_identifier("职业商务照", false));
        assert!(validate_identifier("iron-man_2", false));
    }

    #[test]
    fn rejects_paths_and_dots() {
        assert!(!validate_identifier("", false));
        assert!(!validate_identifier("a/b", false));
        assert!(!validate_identifier("..", true));
        assert!(!validate_identifier("v1.2", false));
        assert!(validate_identifier("v1.2", true));
    }

    #[test]
    fn slugify_collapses_whitespace() {
        assert_eq!(slugify("  Iron  Man (MCU) "), "iron-man-mcu");
        assert_eq!(slugify("海边 婚纱"), "海边-婚纱");
        assert_eq!(slugify("!!!"), "");
    }
}
