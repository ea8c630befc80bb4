//! Import-path normalisation.
//!
//! The resolver only sees raw path segments from `import` items; turning
//! them into a normalised module path is project policy, so it sits behind a
//! trait. The default resolver joins segments with `/` and resolves leading
//! `.`/`..` segments against the importing module's directory.

/// Maps raw import segments to a normalised module path.
pub trait ImportPathResolver {
    fn resolve_import_path(&self, current_module: &str, base_dir: &str, segments: &[&str])
    -> String;
}

/// Default project policy.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProjectPathResolver;

impl ImportPathResolver for ProjectPathResolver {
    fn resolve_import_path(
        &self,
        current_module: &str,
        _base_dir: &str,
        segments: &[&str],
    ) -> String {
        let relative = matches!(segments.first(), Some(&".") | Some(&".."));
        let mut parts: Vec<&str> = if relative {
            // Start from the importing module's directory.
            let mut dir: Vec<&str> = current_module.split('/').collect();
            dir.pop();
            dir
        } else {
            Vec::new()
        };
        for &seg in segments {
            match seg {
                "" | "." => {}
                ".." => {
                    parts.pop();
                }
                _ => parts.push(seg),
            }
        }
        parts.join("/")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absolute_paths_join() {
        let resolver = ProjectPathResolver;
        assert_eq!(
            resolver.resolve_import_path("app/main", "", &["core", "io"]),
            "core/io"
        );
        assert_eq!(resolver.resolve_import_path("app/main", "", &["util"]), "util");
    }

    #[test]
    fn relative_paths_resolve_against_module_dir() {
        let resolver = ProjectPathResolver;
        assert_eq!(
            resolver.resolve_import_path("app/sub/main", "", &[".", "helper"]),
            "app/sub/helper"
        );
        assert_eq!(
            resolver.resolve_import_path("app/sub/main", "", &["..", "other"]),
            "app/other"
        );
    }
}
