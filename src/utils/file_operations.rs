use crate::error::DeployError;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

/// Make sure `path` is a usable output directory, creating it if absent.
/// An existing non-directory at `path` is a usage error.
pub fn ensure_output_dir<P: AsRef<Path>>(path: P) -> Result<()> {
    let dir_path = path.as_ref();

    if !dir_path.exists() {
        info!("'{}' path does not exist. Creating folder...", dir_path.display());
        fs::create_dir_all(dir_path)
            .with_context(|| format!("Failed to create directory: {:?}", dir_path))?;
    }

    if !dir_path.is_dir() {
        return Err(DeployError::OutputNotADirectory(dir_path.to_path_buf()).into());
    }

    Ok(())
}

/// Copy a single file, creating the destination's parent directories.
/// Existing destination files are overwritten.
/// Copying a file onto itself is refused, since `fs::copy` would truncate it.
pub fn copy_file_safe<P: AsRef<Path>, Q: AsRef<Path>>(
    source: P,
    destination: Q,
) -> Result<()> {
    let src_path = source.as_ref();
    let dest_path = destination.as_ref();

    if !src_path.is_file() {
        return Err(DeployError::MissingSource(src_path.to_path_buf()).into());
    }

    if is_same_file(src_path, dest_path)? {
        return Err(DeployError::SameFile(src_path.to_path_buf()).into());
    }

    if let Some(parent) = dest_path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {:?}", parent))?;
    }

    fs::copy(src_path, dest_path)
        .with_context(|| format!("Failed to copy file from {:?} to {:?}", src_path, dest_path))?;

    debug!("Copied {} -> {}", src_path.display(), dest_path.display());
    Ok(())
}

fn is_same_file(src_path: &Path, dest_path: &Path) -> Result<bool> {
    if !dest_path.exists() {
        return Ok(false);
    }
    let src = fs::canonicalize(src_path)
        .with_context(|| format!("Failed to resolve path: {:?}", src_path))?;
    let dest = fs::canonicalize(dest_path)
        .with_context(|| format!("Failed to resolve path: {:?}", dest_path))?;
    Ok(src == dest)
}

/// Recursively mirror `source_dir` into `dest_dir`.
/// Returns the destination path of every file copied.
/// Symlinked directories are descended into.
pub fn copy_tree<P: AsRef<Path>, Q: AsRef<Path>>(
    source_dir: P,
    dest_dir: Q,
) -> Result<Vec<PathBuf>> {
    let src_root = source_dir.as_ref();
    let dest_root = dest_dir.as_ref();

    if !src_root.is_dir() {
        return Err(DeployError::MissingSource(src_root.to_path_buf()).into());
    }

    let mut copied = Vec::new();
    for entry in WalkDir::new(src_root).follow_links(true).sort_by_file_name() {
        let entry = entry.with_context(|| format!("Failed to walk directory: {:?}", src_root))?;
        let relative = entry
            .path()
            .strip_prefix(src_root)
            .map_err(|_| anyhow::anyhow!("Failed to strip prefix {:?}", src_root))?;
        let target = dest_root.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)
                .with_context(|| format!("Failed to create directory: {:?}", target))?;
        } else {
            copy_file_safe(entry.path(), &target)?;
            copied.push(target);
        }
    }

    Ok(copied)
}

/// List every file below `root` as a `/`-separated path relative to `root`.
/// Directories themselves are not listed.
pub fn list_files_recursive<P: AsRef<Path>>(root: P) -> Result<Vec<String>> {
    let root = root.as_ref();

    let mut files = Vec::new();
    for entry in WalkDir::new(root).follow_links(true).sort_by_file_name() {
        let entry = entry.with_context(|| format!("Failed to walk directory: {:?}", root))?;
        // file_type() follows links here, so a linked folder is a dir
        if entry.file_type().is_dir() {
            continue;
        }
        let relative = entry
            .path()
            .strip_prefix(root)
            .map_err(|_| anyhow::anyhow!("Failed to strip prefix {:?}", root))?;
        files.push(to_slash_path(relative));
    }

    Ok(files)
}

fn to_slash_path(path: &Path) -> String {
    path.components()
        .map(|component| component.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Replace every occurrence of `target` in a text file, in place.
/// Returns how many occurrences were replaced.
pub fn replace_in_file<P: AsRef<Path>>(
    file_path: P,
    target: &str,
    replacement: &str,
) -> Result<usize> {
    let path = file_path.as_ref();

    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {:?}", path))?;

    let occurrences = if target.is_empty() {
        0
    } else {
        contents.matches(target).count()
    };
    if occurrences == 0 {
        return Ok(0);
    }

    fs::write(path, contents.replace(target, replacement))
        .with_context(|| format!("Failed to write file: {:?}", path))?;

    Ok(occurrences)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(path: &Path, contents: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    #[test]
    fn test_ensure_output_dir_creates_missing_path() {
        let temp_dir = TempDir::new().unwrap();
        let output = temp_dir.path().join("a/b/out");

        ensure_output_dir(&output).unwrap();
        assert!(output.is_dir());

        // second call on an existing directory is fine
        ensure_output_dir(&output).unwrap();
    }

    #[test]
    fn test_ensure_output_dir_rejects_file() {
        let temp_dir = TempDir::new().unwrap();
        let output = temp_dir.path().join("out");
        fs::write(&output, "not a folder").unwrap();

        let err = ensure_output_dir(&output).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DeployError>(),
            Some(DeployError::OutputNotADirectory(_))
        ));
        assert_eq!(fs::read_to_string(&output).unwrap(), "not a folder");
    }

    #[test]
    fn test_copy_file_safe_missing_source() {
        let temp_dir = TempDir::new().unwrap();
        let err = copy_file_safe(temp_dir.path().join("nope.js"), temp_dir.path().join("out.js"))
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DeployError>(),
            Some(DeployError::MissingSource(_))
        ));
        assert!(!temp_dir.path().join("out.js").exists());
    }

    #[test]
    fn test_copy_file_safe_overwrites() {
        let temp_dir = TempDir::new().unwrap();
        let src = temp_dir.path().join("src.js");
        let dest = temp_dir.path().join("nested/dest.js");
        fs::write(&src, "new").unwrap();
        write(&dest, "old");

        copy_file_safe(&src, &dest).unwrap();
        assert_eq!(fs::read_to_string(&dest).unwrap(), "new");
    }

    #[test]
    fn test_copy_tree_mirrors_structure() {
        let temp_dir = TempDir::new().unwrap();
        let src = temp_dir.path().join("assets");
        write(&src.join("index.html"), "<html/>");
        write(&src.join("css/main.css"), "body {}");
        write(&src.join("img/icons/logo.svg"), "<svg/>");
        fs::create_dir_all(src.join("empty")).unwrap();

        let dest = temp_dir.path().join("out/assets");
        let copied = copy_tree(&src, &dest).unwrap();

        assert_eq!(copied.len(), 3);
        assert_eq!(fs::read_to_string(dest.join("css/main.css")).unwrap(), "body {}");
        assert!(dest.join("img/icons/logo.svg").is_file());
        assert!(dest.join("empty").is_dir());
    }

    #[test]
    fn test_copy_file_safe_refuses_same_file() {
        let temp_dir = TempDir::new().unwrap();
        let src = temp_dir.path().join("build/js/vonsim-opt.js");
        write(&src, "var a=1;");
        let same = temp_dir.path().join("build/../build/js/vonsim-opt.js");

        let err = copy_file_safe(&src, &same).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DeployError>(),
            Some(DeployError::SameFile(_))
        ));
        assert_eq!(fs::read_to_string(&src).unwrap(), "var a=1;");
    }

    #[cfg(unix)]
    #[test]
    fn test_copy_tree_follows_symlinked_dirs() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        write(&root.join("shared/lib.js"), "lib");
        write(&root.join("assets/index.html"), "<html/>");
        std::os::unix::fs::symlink(root.join("shared"), root.join("assets/lib")).unwrap();

        let dest = root.join("out/assets");
        let copied = copy_tree(root.join("assets"), &dest).unwrap();

        assert_eq!(copied.len(), 2);
        assert!(dest.join("lib").is_dir());
        assert_eq!(fs::read_to_string(dest.join("lib/lib.js")).unwrap(), "lib");
    }

    #[cfg(unix)]
    #[test]
    fn test_list_files_recursive_follows_symlinked_dirs() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        write(&root.join("shared/lib.js"), "lib");
        write(&root.join("out/index.html"), "");
        std::os::unix::fs::symlink(root.join("shared"), root.join("out/lib")).unwrap();

        let files = list_files_recursive(root.join("out")).unwrap();
        assert_eq!(
            files,
            vec!["index.html".to_string(), "lib/lib.js".to_string()]
        );
    }

    #[test]
    fn test_copy_tree_missing_source_dir() {
        let temp_dir = TempDir::new().unwrap();
        assert!(copy_tree(temp_dir.path().join("missing"), temp_dir.path().join("out")).is_err());
    }

    #[test]
    fn test_list_files_recursive_relative_slash_paths() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        write(&root.join("b.txt"), "");
        write(&root.join("assets/index.html"), "");
        write(&root.join("target/scala-2.11/vonsim-opt.js"), "");
        fs::create_dir_all(root.join("empty")).unwrap();

        let files = list_files_recursive(root).unwrap();
        assert_eq!(
            files,
            vec![
                "assets/index.html".to_string(),
                "b.txt".to_string(),
                "target/scala-2.11/vonsim-opt.js".to_string(),
            ]
        );
    }

    #[test]
    fn test_replace_in_file_counts_occurrences() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("index.html");
        fs::write(
            &path,
            r#"<script src="vonsim-fastopt.js"></script><!-- fastopt.js -->"#,
        )
        .unwrap();

        let replaced = replace_in_file(&path, "fastopt.js", "opt.js").unwrap();
        assert_eq!(replaced, 2);
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            r#"<script src="vonsim-opt.js"></script><!-- opt.js -->"#
        );

        assert_eq!(replace_in_file(&path, "fastopt.js", "opt.js").unwrap(), 0);
    }
}
