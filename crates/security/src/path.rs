//! Path validation — filesystem confinement to configured sandbox roots.
//!
//! Every file-touching tool resolves its target through a [`Sandbox`].
//! Resolution canonicalizes the longest existing ancestor (following
//! symlinks) and re-appends the part that does not exist yet, so a file
//! about to be created validates the same way as one that already exists.
//!
//! Drive-letter (`C:\x`, `C:x`) and UNC (`\\server\share`, `//server/share`)
//! spellings are rejected on every platform so the accepted path language
//! is identical wherever the binary runs.

use std::path::{Component, Path, PathBuf};
use tracing::debug;

/// Error returned when path validation fails.
///
/// Messages never include the candidate path; callers log it separately.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PathValidationError {
    #[error("sandbox not configured")]
    NotConfigured,

    #[error("path is empty")]
    EmptyPath,

    #[error("path escapes sandbox root")]
    EscapesRoot,

    #[error("path escapes sandbox root: unsupported absolute path form")]
    UnsupportedForm,

    #[error("failed to resolve parent path")]
    ResolveParent,

    #[error("path could not be resolved")]
    Unresolvable,

    #[error("path is not a directory")]
    NotADirectory,
}

/// An ordered set of root directories outside of which nothing resolves.
///
/// Immutable after construction; clone it into every tool that needs it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sandbox {
    roots: Vec<PathBuf>,
}

impl Sandbox {
    /// Create a sandbox from root directories. Blank entries are ignored.
    pub fn new<I, P>(roots: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let roots = roots
            .into_iter()
            .map(Into::into)
            .filter(|p: &PathBuf| !p.as_os_str().is_empty())
            .collect();
        Self { roots }
    }

    /// A sandbox with no roots; every validation fails.
    pub fn unconfigured() -> Self {
        Self::default()
    }

    pub fn is_configured(&self) -> bool {
        !self.roots.is_empty()
    }

    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    /// The first configured root, canonicalized.
    pub fn first_root(&self) -> Result<PathBuf, PathValidationError> {
        let root = self.roots.first().ok_or(PathValidationError::NotConfigured)?;
        resolve(root)
    }

    /// Validate `candidate` and return its canonical absolute form.
    pub fn validate(&self, candidate: &str) -> Result<PathBuf, PathValidationError> {
        validate_path(candidate, &self.roots)
    }

    /// Like [`Sandbox::validate`], but the target must be an existing directory.
    pub fn validate_dir(&self, candidate: &str) -> Result<PathBuf, PathValidationError> {
        let path = self.validate(candidate)?;
        if path.is_dir() {
            Ok(path)
        } else {
            Err(PathValidationError::NotADirectory)
        }
    }
}

/// Validate that `candidate` resolves inside at least one of `roots`.
///
/// Checks, in order:
/// 1. At least one root is configured
/// 2. The candidate is not blank
/// 3. The candidate is not a drive-letter or UNC path
/// 4. The resolved (symlink-free) path is within a canonicalized root
///
/// Relative candidates are tried under each root in order and the first
/// that stays confined wins.
pub fn validate_path(candidate: &str, roots: &[PathBuf]) -> Result<PathBuf, PathValidationError> {
    if roots.is_empty() {
        return Err(PathValidationError::NotConfigured);
    }

    let candidate = candidate.trim();
    if candidate.is_empty() {
        return Err(PathValidationError::EmptyPath);
    }

    if is_foreign_absolute(candidate) {
        return Err(PathValidationError::UnsupportedForm);
    }

    let canonical_roots: Vec<PathBuf> = roots
        .iter()
        .filter_map(|root| match resolve(root) {
            Ok(resolved) => Some(resolved),
            Err(e) => {
                debug!(root = %root.display(), error = %e, "Skipping unresolvable sandbox root");
                None
            }
        })
        .collect();
    if canonical_roots.is_empty() {
        return Err(PathValidationError::ResolveParent);
    }

    let input = Path::new(candidate);
    if input.is_absolute() {
        let resolved = resolve(input)?;
        return if is_within(&resolved, &canonical_roots) {
            Ok(resolved)
        } else {
            Err(PathValidationError::EscapesRoot)
        };
    }

    let mut last_error = PathValidationError::EscapesRoot;
    for root in &canonical_roots {
        match resolve(&root.join(input)) {
            Ok(resolved) if is_within(&resolved, &canonical_roots) => return Ok(resolved),
            Ok(_) => last_error = PathValidationError::EscapesRoot,
            Err(e) => last_error = e,
        }
    }
    Err(last_error)
}

/// True if `path` equals or lies under one of `roots` (component-wise).
fn is_within(path: &Path, roots: &[PathBuf]) -> bool {
    roots.iter().any(|root| path.starts_with(root))
}

/// Drive-letter and UNC spellings, detected textually on every host.
fn is_foreign_absolute(candidate: &str) -> bool {
    let bytes = candidate.as_bytes();
    let drive_letter = bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':';
    let unc = candidate.starts_with("//") || candidate.starts_with('\\');
    drive_letter || unc
}

/// Canonicalize `path`, tolerating a non-existent tail.
///
/// Walks up from the full path until an existing ancestor canonicalizes,
/// then re-appends the remaining components. An entry that exists but
/// cannot be canonicalized (dangling symlink, symlink loop) is rejected
/// rather than walked past. If the tail contained `..`, the joined result
/// is resolved once more so a lexical `..` cannot land on a symlink that
/// was never followed.
fn resolve(path: &Path) -> Result<PathBuf, PathValidationError> {
    let components: Vec<Component<'_>> = path.components().collect();
    let mut split = components.len();

    loop {
        if split == 0 {
            return Err(PathValidationError::ResolveParent);
        }

        let prefix: PathBuf = components[..split].iter().collect();
        match std::fs::canonicalize(&prefix) {
            Ok(mut base) => {
                let mut had_parent_dir = false;
                for component in &components[split..] {
                    match component {
                        Component::Normal(part) => base.push(part),
                        Component::ParentDir => {
                            had_parent_dir = true;
                            base.pop();
                        }
                        Component::CurDir => {}
                        Component::RootDir | Component::Prefix(_) => {
                            return Err(PathValidationError::ResolveParent);
                        }
                    }
                }
                if had_parent_dir {
                    return resolve(&base);
                }
                return Ok(base);
            }
            Err(_) if std::fs::symlink_metadata(&prefix).is_ok() => {
                return Err(PathValidationError::Unresolvable);
            }
            Err(_) => split -= 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn setup() -> (tempfile::TempDir, Sandbox) {
        let dir = tempfile::tempdir().unwrap();
        let sandbox = Sandbox::new([dir.path().to_path_buf()]);
        (dir, sandbox)
    }

    fn canonical_root(dir: &tempfile::TempDir) -> PathBuf {
        fs::canonicalize(dir.path()).unwrap()
    }

    #[test]
    fn unconfigured_sandbox_fails_closed() {
        let sandbox = Sandbox::unconfigured();
        assert_eq!(
            sandbox.validate("file.txt"),
            Err(PathValidationError::NotConfigured)
        );
        assert_eq!(sandbox.validate("file.txt").unwrap_err().to_string(), "sandbox not configured");
    }

    #[test]
    fn empty_candidate_rejected() {
        let (_dir, sandbox) = setup();
        assert_eq!(sandbox.validate("   "), Err(PathValidationError::EmptyPath));
    }

    #[test]
    fn relative_path_joined_under_root() {
        let (dir, sandbox) = setup();
        fs::write(dir.path().join("notes.txt"), "hi").unwrap();
        let resolved = sandbox.validate("notes.txt").unwrap();
        assert_eq!(resolved, canonical_root(&dir).join("notes.txt"));
    }

    #[test]
    fn absolute_path_inside_root_accepted() {
        let (dir, sandbox) = setup();
        let file = dir.path().join("a.txt");
        fs::write(&file, "x").unwrap();
        let resolved = sandbox.validate(file.to_str().unwrap()).unwrap();
        assert!(resolved.starts_with(canonical_root(&dir)));
    }

    #[test]
    fn root_itself_is_valid() {
        let (dir, sandbox) = setup();
        let resolved = sandbox.validate(dir.path().to_str().unwrap()).unwrap();
        assert_eq!(resolved, canonical_root(&dir));
        assert_eq!(sandbox.validate(".").unwrap(), canonical_root(&dir));
    }

    #[test]
    #[cfg(unix)]
    fn absolute_path_outside_root_rejected() {
        let (_dir, sandbox) = setup();
        assert_eq!(
            sandbox.validate("/etc/passwd"),
            Err(PathValidationError::EscapesRoot)
        );
    }

    #[test]
    fn dotdot_traversal_blocked() {
        let (dir, sandbox) = setup();
        fs::create_dir(dir.path().join("sub")).unwrap();
        assert_eq!(
            sandbox.validate("sub/../../outside.txt"),
            Err(PathValidationError::EscapesRoot)
        );
        assert_eq!(
            sandbox.validate("missing/../../../etc/passwd"),
            Err(PathValidationError::EscapesRoot)
        );
    }

    #[test]
    fn dotdot_that_stays_inside_is_fine() {
        let (dir, sandbox) = setup();
        fs::create_dir(dir.path().join("sub")).unwrap();
        let resolved = sandbox.validate("sub/../kept.txt").unwrap();
        assert_eq!(resolved, canonical_root(&dir).join("kept.txt"));
    }

    #[test]
    fn new_file_in_missing_directories_validates() {
        let (dir, sandbox) = setup();
        let resolved = sandbox.validate("a/b/c/new.txt").unwrap();
        assert_eq!(resolved, canonical_root(&dir).join("a/b/c/new.txt"));
    }

    #[test]
    #[cfg(unix)]
    fn symlink_escape_blocked() {
        let (dir, sandbox) = setup();
        let outside = tempfile::tempdir().unwrap();
        fs::write(outside.path().join("secret.txt"), "s").unwrap();
        std::os::unix::fs::symlink(outside.path(), dir.path().join("escape")).unwrap();

        assert_eq!(
            sandbox.validate("escape/secret.txt"),
            Err(PathValidationError::EscapesRoot)
        );
        // Not-yet-existing file behind the link is rejected too
        assert_eq!(
            sandbox.validate("escape/new.txt"),
            Err(PathValidationError::EscapesRoot)
        );
    }

    #[test]
    #[cfg(unix)]
    fn lexical_dotdot_onto_symlink_blocked() {
        let (dir, sandbox) = setup();
        let outside = tempfile::tempdir().unwrap();
        std::os::unix::fs::symlink(outside.path(), dir.path().join("link")).unwrap();
        assert_eq!(
            sandbox.validate("missing/../link/file.txt"),
            Err(PathValidationError::EscapesRoot)
        );
    }

    #[test]
    #[cfg(unix)]
    fn dangling_symlink_rejected() {
        let (dir, sandbox) = setup();
        std::os::unix::fs::symlink("/nonexistent/sandclaw/target", dir.path().join("dangling")).unwrap();
        assert_eq!(
            sandbox.validate("dangling"),
            Err(PathValidationError::Unresolvable)
        );
    }

    #[test]
    #[cfg(unix)]
    fn symlink_within_root_allowed() {
        let (dir, sandbox) = setup();
        fs::create_dir(dir.path().join("real")).unwrap();
        fs::write(dir.path().join("real/f.txt"), "x").unwrap();
        std::os::unix::fs::symlink(dir.path().join("real"), dir.path().join("alias")).unwrap();
        let resolved = sandbox.validate("alias/f.txt").unwrap();
        assert_eq!(resolved, canonical_root(&dir).join("real/f.txt"));
    }

    #[test]
    fn windows_forms_rejected_everywhere() {
        let (_dir, sandbox) = setup();
        for candidate in [
            "C:\\Windows\\system32",
            "c:/windows",
            "D:relative",
            "\\\\server\\share\\file",
            "//server/share/file",
            "\\rooted",
        ] {
            assert_eq!(
                sandbox.validate(candidate),
                Err(PathValidationError::UnsupportedForm),
                "{candidate}"
            );
        }
    }

    #[test]
    fn multiple_roots_any_match_allowed() {
        let first = tempfile::tempdir().unwrap();
        let second = tempfile::tempdir().unwrap();
        fs::write(second.path().join("only-here.txt"), "x").unwrap();
        let sandbox = Sandbox::new([first.path().to_path_buf(), second.path().to_path_buf()]);

        let in_second = second.path().join("only-here.txt");
        assert!(sandbox.validate(in_second.to_str().unwrap()).is_ok());

        // Relative paths land under the first root
        let resolved = sandbox.validate("new.txt").unwrap();
        assert_eq!(resolved, fs::canonicalize(first.path()).unwrap().join("new.txt"));
    }

    #[test]
    fn validated_paths_always_under_a_root() {
        let (dir, sandbox) = setup();
        fs::create_dir_all(dir.path().join("x/y")).unwrap();
        let root = canonical_root(&dir);
        for candidate in [
            "x", "x/y", "x/y/z.txt", "./x/../x/y", "x/./y/../../q", "../q", "x/../../q",
            "/", "/tmp", "~", "x//y", "..",
        ] {
            if let Ok(path) = sandbox.validate(candidate) {
                assert!(path.starts_with(&root), "{candidate} -> {}", path.display());
            }
        }
    }

    #[test]
    fn validate_dir_requires_directory() {
        let (dir, sandbox) = setup();
        fs::write(dir.path().join("f.txt"), "x").unwrap();
        assert!(sandbox.validate_dir(".").is_ok());
        assert_eq!(
            sandbox.validate_dir("f.txt"),
            Err(PathValidationError::NotADirectory)
        );
        assert_eq!(
            sandbox.validate_dir("missing"),
            Err(PathValidationError::NotADirectory)
        );
    }

    #[test]
    fn first_root_is_canonical() {
        let (dir, sandbox) = setup();
        assert_eq!(sandbox.first_root().unwrap(), canonical_root(&dir));
        assert_eq!(
            Sandbox::unconfigured().first_root(),
            Err(PathValidationError::NotConfigured)
        );
    }
}
