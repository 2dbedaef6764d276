use std::collections::BTreeMap;
use std::env;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};
use std::time::SystemTime;

use toml_edit::{Document, Item, Table};

const FACADE_NAME: &str = "objdoc";
const CRATE_PREFIX: &str = "od_";

/// The calling crate's `Cargo.toml`, used to find how generated code should
/// name one of the workspace crates.
///
/// Code emitted by `#[derive(Reflect)]` refers to `od_reflect` items. A crate
/// may depend on `od_reflect` directly or only on the `objdoc` facade, which
/// re-exports it as `objdoc::reflect`. The derive asks the manifest which one
/// is reachable.
///
/// # Resolution rules
///
/// 1. The requested crate is a direct dependency: `::name`.
/// 2. The name starts with `od_` and `objdoc` is a dependency:
///    `::objdoc::<name without prefix>` (`od_reflect` becomes `::objdoc::reflect`).
/// 3. Rules 1 and 2 again, for `dev-dependencies`.
/// 4. Otherwise `::name`.
///
/// A crate that expands the derive on its own types must make its own name
/// resolvable, e.g. `extern crate self as od_reflect;`.
///
/// # Example
///
/// ```no_run
/// # use od_macro_utils::Manifest;
/// let path: syn::Path = Manifest::shared(|m| m.get_crate_path("od_reflect"));
/// ```
#[derive(Debug)]
pub struct Manifest {
    pub manifest: Document<Box<str>>,
    pub modified_time: SystemTime,
}

impl Manifest {
    fn manifest_path() -> PathBuf {
        let dir = env::var_os("CARGO_MANIFEST_DIR")
            .expect("CARGO_MANIFEST_DIR should be auto-defined by cargo.");
        let mut path = PathBuf::from(dir);
        path.push("Cargo.toml");
        path
    }

    fn modified_time(path: &Path) -> Option<SystemTime> {
        std::fs::metadata(path).and_then(|m| m.modified()).ok()
    }

    fn read_manifest(path: &Path) -> Document<Box<str>> {
        let source = std::fs::read_to_string(path)
            .unwrap_or_else(|_| panic!("Unable to read cargo manifest: {}", path.display()))
            .into_boxed_str();
        Document::parse(source)
            .unwrap_or_else(|_| panic!("Failed to parse cargo manifest: {}", path.display()))
    }

    fn parse_path(path: &str) -> syn::Path {
        syn::parse_str(path).unwrap_or_else(|_| panic!("`{path}` is not a valid path"))
    }

    fn find_in_deps(deps: &Table, name: &str) -> Option<syn::Path> {
        if deps.contains_key(name) {
            return Some(Self::parse_path(&format!("::{name}")));
        }
        let module = name.strip_prefix(CRATE_PREFIX)?;
        if deps.contains_key(FACADE_NAME) {
            return Some(Self::parse_path(&format!("::{FACADE_NAME}::{module}")));
        }
        None
    }

    /// Returns the path under which crate `name` is reachable from the caller.
    pub fn get_crate_path(&self, name: &str) -> syn::Path {
        for table in ["dependencies", "dev-dependencies"] {
            if let Some(Item::Table(deps)) = self.manifest.get(table)
                && let Some(path) = Self::find_in_deps(deps, name)
            {
                return path;
            }
        }
        Self::parse_path(&format!("::{name}"))
    }

    /// Runs `func` with the caller's manifest.
    ///
    /// Parsed manifests are cached per path and re-read when the file's
    /// modification time changes.
    pub fn shared<R>(func: impl FnOnce(&Self) -> R) -> R {
        static MANIFESTS: RwLock<BTreeMap<PathBuf, Manifest>> = RwLock::new(BTreeMap::new());

        let path = Self::manifest_path();
        let modified_time = Self::modified_time(&path).unwrap_or(SystemTime::UNIX_EPOCH);

        {
            let manifests = MANIFESTS.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(manifest) = manifests.get(&path)
                && manifest.modified_time == modified_time
            {
                return func(manifest);
            }
        }

        let manifest = Manifest {
            manifest: Self::read_manifest(&path),
            modified_time,
        };
        let result = func(&manifest);

        MANIFESTS
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(path, manifest);

        result
    }
}

#[cfg(test)]
mod tests {
    use toml_edit::Document;

    use super::Manifest;

    fn path_to_string(path: &syn::Path) -> String {
        let segments: Vec<String> = path.segments.iter().map(|s| s.ident.to_string()).collect();
        let prefix = if path.leading_colon.is_some() { "::" } else { "" };
        format!("{prefix}{}", segments.join("::"))
    }

    fn manifest(source: &str) -> Manifest {
        Manifest {
            manifest: Document::parse(source.to_owned().into_boxed_str()).unwrap(),
            modified_time: std::time::SystemTime::UNIX_EPOCH,
        }
    }

    #[test]
    fn direct_dependency() {
        let m = manifest("[dependencies]\nod_reflect = \"0.0.1\"\n");
        assert_eq!(path_to_string(&m.get_crate_path("od_reflect")), "::od_reflect");
    }

    #[test]
    fn through_facade() {
        let m = manifest("[dependencies]\nobjdoc = \"0.0.1\"\n");
        assert_eq!(path_to_string(&m.get_crate_path("od_reflect")), "::objdoc::reflect");
    }

    #[test]
    fn dev_dependency_and_fallback() {
        let m = manifest("[dev-dependencies]\nobjdoc = \"0.0.1\"\n");
        assert_eq!(path_to_string(&m.get_crate_path("od_invoke")), "::objdoc::invoke");

        let empty = manifest("[package]\nname = \"x\"\n");
        assert_eq!(path_to_string(&empty.get_crate_path("od_reflect")), "::od_reflect");
    }
}
